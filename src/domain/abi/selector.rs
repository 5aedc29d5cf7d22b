//! Function selector extraction

use alloy_primitives::Selector;

/// Pull the 4-byte function selector off the front of call input.
///
/// Input shorter than four bytes is a plain value transfer and has no selector.
pub fn extract_selector(input: &[u8]) -> Option<Selector> {
    let head = input.get(..4)?;
    Selector::try_from(head).ok()
}

/// Format a selector as `0x`-prefixed lowercase hex
pub fn selector_hex(selector: Selector) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Parse a selector hex string (e.g., "0xa9059cbb")
pub fn parse_selector(value: &str) -> Option<Selector> {
    let trimmed = value.trim();
    let normalized = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if normalized.len() != 8 {
        return None;
    }

    let bytes = hex::decode(normalized).ok()?;
    Selector::try_from(bytes.as_slice()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_has_no_selector() {
        assert!(extract_selector(&[]).is_none());
        assert!(extract_selector(&[0xa9]).is_none());
        assert!(extract_selector(&[0xa9, 0x05, 0x9c]).is_none());
    }

    #[test]
    fn test_extract_selector() {
        let selector = extract_selector(&[0xa9, 0x05, 0x9c, 0xbb]).unwrap();
        assert_eq!(selector_hex(selector), "0xa9059cbb");

        let selector = extract_selector(&[0xd0, 0xe3, 0x0d, 0xb0, 0x00, 0x01]).unwrap();
        assert_eq!(selector_hex(selector), "0xd0e30db0");
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(
            parse_selector("0xA9059CBB").map(selector_hex).as_deref(),
            Some("0xa9059cbb")
        );
        assert!(parse_selector("a9059cbb").is_some());
        assert!(parse_selector("0xa9059c").is_none());
        assert!(parse_selector("0xzz059cbb").is_none());
    }
}
