//! Key-range helpers

/// Exclusive upper bound of every key starting with `prefix`
///
/// Trailing `0xff` bytes are dropped and the last remaining byte is
/// incremented. Returns `None` when no finite bound exists (empty prefix or
/// all `0xff`), meaning the range is unbounded above.
pub fn prefix_range_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_increment() {
        assert_eq!(prefix_range_end(b"abc"), Some(b"abd".to_vec()));
    }

    #[test]
    fn test_trailing_ff_stripped() {
        assert_eq!(prefix_range_end(&[b'a', 0xff, 0xff]), Some(vec![b'b']));
    }

    #[test]
    fn test_unbounded() {
        assert_eq!(prefix_range_end(b""), None);
        assert_eq!(prefix_range_end(&[0xff, 0xff]), None);
    }

    proptest! {
        #[test]
        fn prop_prefixed_keys_fall_below_end(
            prefix in proptest::collection::vec(any::<u8>(), 1..8),
            suffix in proptest::collection::vec(any::<u8>(), 0..8),
        ) {
            let mut key = prefix.clone();
            key.extend_from_slice(&suffix);
            match prefix_range_end(&prefix) {
                Some(end) => {
                    prop_assert!(key < end);
                    prop_assert!(prefix < end);
                }
                None => prop_assert!(prefix.iter().all(|b| *b == 0xff)),
            }
        }
    }
}
