//! Game implementations.

pub mod spy;
