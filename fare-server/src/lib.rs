//! Taxi fare prediction server.
//!
//! Answers: "what will a taxi from here to there cost at this time of
//! day?" A trip is routed over the road network, assigned to one of the
//! Tunisian governorates, and priced by an external fare model.

pub mod config;
pub mod domain;
pub mod geo;
pub mod nominatim;
pub mod osrm;
pub mod pipeline;
pub mod region;
pub mod routing;
pub mod scoring;
pub mod store;
pub mod web;
