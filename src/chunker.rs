//! Fixed-size batching for bulk graph writes.

/// Split `items` into groups of at most `size`, preserving order. The
/// final group may be shorter; no group is ever empty. Groups are
/// produced lazily, so a single-pass source is consumed exactly once.
///
/// `size` must be positive.
pub fn chunk<I>(items: I, size: usize) -> Chunks<I::IntoIter>
where
    I: IntoIterator,
{
    assert!(size > 0, "batch size must be positive");
    Chunks {
        inner: items.into_iter(),
        size,
    }
}

pub struct Chunks<I: Iterator> {
    inner: I,
    size: usize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.size);
        for item in self.inner.by_ref() {
            batch.push(item);
            if batch.len() >= self.size {
                break;
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenating_batches_reproduces_the_input() {
        for size in 1..=10 {
            let input: Vec<u32> = (0..23).collect();
            let rejoined: Vec<u32> = chunk(input.clone(), size).flatten().collect();
            assert_eq!(rejoined, input, "size {}", size);
        }
    }

    #[test]
    fn every_batch_but_the_last_is_full() {
        let batches: Vec<Vec<u32>> = chunk(0..23, 5).collect();
        assert_eq!(batches.len(), 5);
        for batch in &batches[..batches.len() - 1] {
            assert_eq!(batch.len(), 5);
        }
        assert_eq!(batches.last().map(Vec::len), Some(3));
    }

    #[test]
    fn no_batch_is_empty() {
        let batches: Vec<Vec<u32>> = chunk(0..20, 5).collect();
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|b| !b.is_empty()));
    }

    #[test]
    fn empty_input_yields_no_batches() {
        let batches: Vec<Vec<u32>> = chunk(Vec::new(), 100).collect();
        assert!(batches.is_empty());
    }

    #[test]
    fn size_larger_than_input_yields_one_short_batch() {
        let batches: Vec<Vec<u32>> = chunk(0..3, 100).collect();
        assert_eq!(batches, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn consumes_a_single_pass_iterator_once() {
        let mut pulls = 0;
        let source = (0..7).inspect(|_| pulls += 1);
        let batches: Vec<Vec<u32>> = chunk(source, 3).collect();
        assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
        assert_eq!(pulls, 7);
    }

    #[test]
    #[should_panic(expected = "batch size must be positive")]
    fn zero_size_is_rejected() {
        let _ = chunk(0..3, 0);
    }
}
