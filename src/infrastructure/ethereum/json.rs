//! JSON reading for arbitrarily deep call trees

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Deserialize without serde_json's nesting limit
///
/// Each call frame costs two nesting levels (object and child array), so the
/// default limit of 128 stops at roughly 63 frames while the EVM allows 1024.
/// The stack grows on demand instead of overflowing.
pub(crate) fn from_deep_str<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value: T = Deserialize::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
