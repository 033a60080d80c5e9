//! Prediction core tests.

pub mod properties;
pub mod table;
