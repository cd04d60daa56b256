//! Fixed-size grouping of line sequences.
//!
//! Meter records span two lines, so the content zone is walked in pairs.
//! Any trailing items that do not fill a whole chunk are kept aside in the
//! remainder for the caller to reject.

use std::slice::ChunksExact;

/// Split `items` into non-overlapping chunks of exactly `size` items.
///
/// Panics if `size` is zero.
pub fn chunks<T>(items: &[T], size: usize) -> ChunksExact<'_, T> {
    items.chunks_exact(size)
}

/// Lazily yields consecutive `(first, second)` pairs
#[derive(Debug, Clone)]
pub struct Pairs<'a, T> {
    inner: ChunksExact<'a, T>,
}

/// Pair up `items` two at a time, left to right
pub fn pairs<T>(items: &[T]) -> Pairs<'_, T> {
    Pairs {
        inner: chunks(items, 2),
    }
}

impl<'a, T> Pairs<'a, T> {
    /// The unpaired trailing item, if the input length is odd
    pub fn remainder(&self) -> Option<&'a T> {
        self.inner.remainder().first()
    }
}

impl<'a, T> Iterator for Pairs<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|pair| (&pair[0], &pair[1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Pairs<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_preserve_order() {
        let items = [1, 2, 3, 4, 5, 6];
        let groups: Vec<&[i32]> = chunks(&items, 3).collect();
        assert_eq!(groups, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
    }

    #[test]
    fn test_pairs() {
        let lines = ["id-a", "data-a", "id-b", "data-b"];
        let paired: Vec<_> = pairs(&lines).collect();
        assert_eq!(paired, vec![(&"id-a", &"data-a"), (&"id-b", &"data-b")]);
        assert_eq!(pairs(&lines).len(), 2);
        assert!(pairs(&lines).remainder().is_none());
    }

    #[test]
    fn test_pairs_odd_length_exposes_remainder() {
        let lines = ["id-a", "data-a", "id-b"];
        let iter = pairs(&lines);
        assert_eq!(iter.remainder(), Some(&"id-b"));
        assert_eq!(iter.count(), 1);
    }

    #[test]
    fn test_pairs_empty() {
        let lines: [&str; 0] = [];
        assert_eq!(pairs(&lines).count(), 0);
        assert!(pairs(&lines).remainder().is_none());
    }
}
