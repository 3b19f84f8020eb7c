//! Nominatim (OpenStreetMap) reverse-geocoding client.
//!
//! Nominatim's usage policy requires an identifying `User-Agent`; requests
//! without one are rejected.

mod client;

pub use client::{NominatimClient, NominatimConfig};
