//! Ordering keys
//!
//! A key is the prefix `a` followed by the element's zero-based position in
//! base 36, left-padded with zeros to five digits. Keys sort lexicographically
//! in document order, and assigning them is a pure function of position.

use super::element::DocumentElement;

const INDEX_PREFIX: char = 'a';
const INDEX_WIDTH: usize = 5;
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Ordering key for the element at `position`
pub fn index_key(position: usize) -> String {
    let mut digits = Vec::new();
    let mut n = position;
    loop {
        digits.push(DIGITS[n % 36] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    let encoded: String = digits.iter().rev().collect();
    format!("{INDEX_PREFIX}{encoded:0>INDEX_WIDTH$}")
}

/// Recover the position encoded in a key produced by [`index_key`]
pub fn decode_index(key: &str) -> Option<usize> {
    let digits = key.strip_prefix(INDEX_PREFIX)?;
    usize::from_str_radix(digits, 36).ok()
}

/// Assign ordering keys to every element in sequence order
pub fn assign_indices(elements: &mut [DocumentElement]) {
    for (position, element) in elements.iter_mut().enumerate() {
        element.index = index_key(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::element::{ElementKind, ShapeProps};

    #[test]
    fn test_index_key_format() {
        assert_eq!(index_key(0), "a00000");
        assert_eq!(index_key(35), "a0000z");
        assert_eq!(index_key(36), "a00010");
        assert_eq!(index_key(1295), "a000zz");
    }

    #[test]
    fn test_keys_sort_in_position_order() {
        let keys: Vec<String> = (0..2000).map(index_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_decode_round_trip() {
        for position in [0, 7, 36, 1000, 60_000] {
            assert_eq!(decode_index(&index_key(position)), Some(position));
        }
        assert_eq!(decode_index("b00001"), None);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut elements: Vec<DocumentElement> = (0..40)
            .map(|i| {
                DocumentElement::new(
                    format!("e{i}"),
                    ElementKind::Rectangle(ShapeProps::default()),
                    1,
                    1,
                    0,
                )
            })
            .collect();
        assign_indices(&mut elements);
        let first: Vec<String> = elements.iter().map(|e| e.index.clone()).collect();
        assign_indices(&mut elements);
        let second: Vec<String> = elements.iter().map(|e| e.index.clone()).collect();
        assert_eq!(first, second);
    }
}
