//! Geocell encoding, distance, validation, and proximity search.

pub mod distance;
pub mod geocell;
pub mod search;
pub mod validation;
