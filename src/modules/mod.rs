//! Consumers of decoded trees
//!
//! - outline: indented text rendering of a decoded tree
//! - export: JSON and CSV files for decoded trees

pub mod export;
pub mod outline;
