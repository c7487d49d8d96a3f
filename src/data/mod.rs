//! Data loading
//!
//! Datasets are dense: every sample carries a value for every feature
//! column, stored row-major in an `ndarray` matrix.

pub mod csv;

pub use self::csv::*;
