//! SQLite persistence for lookup tables between runs

mod resolutions;
mod signatures;

pub use resolutions::ResolutionStore;
pub use signatures::SignatureStore;
