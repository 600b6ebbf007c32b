//! Deterministic key helpers.

use std::collections::BTreeMap;

/// Not a real KDF; stable output for a seed and index.
pub fn derive_key(seed: &[u8], index: u32) -> String {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325 ^ u64::from(index);
    for byte in seed {
        state ^= u64::from(*byte);
        state = state.wrapping_mul(0x0100_0000_01b3);
    }
    format!("{state:016x}")
}

/// `name/index` labels in key order.
pub fn key_labels(keys: BTreeMap<String, u32>) -> Vec<String> {
    keys.into_iter()
        .map(|(name, index)| format!("{name}/{index}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_stable() {
        assert_eq!(derive_key(b"seed", 0), derive_key(b"seed", 0));
        assert_ne!(derive_key(b"seed", 0), derive_key(b"seed", 1));
        assert_eq!(derive_key(b"", 0).len(), 16);
    }
}
