//! Trip requests and their validation.

use serde::Deserialize;

use crate::domain::{Coordinate, InvalidCoordinate, InvalidTimeBucket, TimeBucket};

/// Bad input, rejected before any external call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing coordinate: {point}.{component}")]
    MissingCoordinate {
        point: &'static str,
        component: &'static str,
    },

    #[error("{point} point: {source}")]
    InvalidCoordinate {
        point: &'static str,
        #[source]
        source: InvalidCoordinate,
    },

    #[error(transparent)]
    InvalidTimeBucket(#[from] InvalidTimeBucket),

    #[error("region override must not be blank")]
    BlankRegion,
}

/// A point as supplied by a caller, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PointInput {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl PointInput {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    fn validate(&self, point: &'static str) -> Result<Coordinate, ValidationError> {
        let lat = self.lat.ok_or(ValidationError::MissingCoordinate {
            point,
            component: "lat",
        })?;
        let lng = self.lng.ok_or(ValidationError::MissingCoordinate {
            point,
            component: "lng",
        })?;
        Coordinate::new(lat, lng)
            .map_err(|source| ValidationError::InvalidCoordinate { point, source })
    }
}

/// Raw inputs for one fare estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub start: PointInput,
    pub end: PointInput,
    pub time_bucket: String,
    /// Region to price in. `None` detects the region from the start point.
    pub region_override: Option<String>,
}

/// A request whose fields have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTrip {
    pub start: Coordinate,
    pub end: Coordinate,
    pub time_bucket: TimeBucket,
    pub region_override: Option<String>,
}

impl TripRequest {
    pub fn new(start: PointInput, end: PointInput, time_bucket: impl Into<String>) -> Self {
        Self {
            start,
            end,
            time_bucket: time_bucket.into(),
            region_override: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region_override = Some(region.into());
        self
    }

    /// Check every field, reporting the first problem found.
    pub fn validate(&self) -> Result<ValidTrip, ValidationError> {
        let start = self.start.validate("start")?;
        let end = self.end.validate("end")?;
        let time_bucket = TimeBucket::parse(&self.time_bucket)?;

        if self
            .region_override
            .as_deref()
            .is_some_and(|r| r.trim().is_empty())
        {
            return Err(ValidationError::BlankRegion);
        }

        Ok(ValidTrip {
            start,
            end,
            time_bucket,
            region_override: self.region_override.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TripRequest {
        TripRequest::new(
            PointInput::new(36.80, 10.18),
            PointInput::new(36.85, 10.20),
            "morning",
        )
    }

    #[test]
    fn valid_request() {
        let trip = request().validate().unwrap();
        assert_eq!(trip.start, Coordinate::new(36.80, 10.18).unwrap());
        assert_eq!(trip.end, Coordinate::new(36.85, 10.20).unwrap());
        assert_eq!(trip.time_bucket, TimeBucket::Morning);
        assert_eq!(trip.region_override, None);
    }

    #[test]
    fn override_is_kept_verbatim() {
        let trip = request().with_region("Ben Arous").validate().unwrap();
        assert_eq!(trip.region_override.as_deref(), Some("Ben Arous"));
    }

    #[test]
    fn missing_component() {
        let mut req = request();
        req.end.lng = None;
        let err = req.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingCoordinate {
                point: "end",
                component: "lng"
            }
        );
        assert_eq!(err.to_string(), "missing coordinate: end.lng");
    }

    #[test]
    fn out_of_range_component() {
        let mut req = request();
        req.start.lat = Some(95.0);
        assert!(matches!(
            req.validate(),
            Err(ValidationError::InvalidCoordinate { point: "start", .. })
        ));

        let mut req = request();
        req.end.lng = Some(f64::NAN);
        assert!(matches!(
            req.validate(),
            Err(ValidationError::InvalidCoordinate { point: "end", .. })
        ));
    }

    #[test]
    fn unknown_time_bucket() {
        let mut req = request();
        req.time_bucket = "noon".into();
        let err = req.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimeBucket(_)));
        assert!(err.to_string().contains("noon"));
    }

    #[test]
    fn blank_override() {
        assert_eq!(
            request().with_region("  ").validate(),
            Err(ValidationError::BlankRegion)
        );
        assert_eq!(
            request().with_region("").validate(),
            Err(ValidationError::BlankRegion)
        );
    }

    #[test]
    fn point_input_deserializes_missing_fields() {
        let p: PointInput = serde_json::from_str(r#"{"lat": 36.8}"#).unwrap();
        assert_eq!(p.lat, Some(36.8));
        assert_eq!(p.lng, None);
    }
}
