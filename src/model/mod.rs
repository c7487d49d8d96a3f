//! LS-SVM models
//!
//! [`BinaryModel`] handles one two-class or regression problem;
//! [`MulticlassModel`] coordinates several of them through a
//! [`Decomposition`] strategy.

pub mod binary;
pub mod decomposition;
pub mod multiclass;

pub use self::binary::*;
pub use self::decomposition::*;
pub use self::multiclass::*;
