//! LS-SVM solver implementations
//!
//! Training reduces to one symmetric linear system ([`LinearSystem`]) that is
//! solved iteratively with MINRES ([`MinresSolver`]).

pub mod minres;
pub mod system;

pub use self::minres::*;
pub use self::system::*;
