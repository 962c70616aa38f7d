//! CLI command implementations.

pub mod check;
pub mod moments;
pub mod sum;
pub mod sweep;
