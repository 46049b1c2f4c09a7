//! Typed errors for the search engines.
//!
//! Geocoding failures are deliberately absent: they are reported inside
//! [`GeocodeResult`](crate::geocode::GeocodeResult), never as errors.

use thiserror::Error;

/// Input rejected before any data access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid latitude {0}: must be between -90 and 90")]
    Latitude(f64),
    #[error("invalid longitude {0}: must be between -180 and 180")]
    Longitude(f64),
    #[error("invalid radius {0}: must be a finite number of kilometres")]
    Radius(f64),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("data store error: {0}")]
    DataStore(#[from] rusqlite::Error),
    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("data store lock poisoned")]
    LockPoisoned,
}

impl LocateError {
    /// `true` for caller mistakes, `false` for infrastructure failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, LocateError>;
