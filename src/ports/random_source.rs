//! Random Source Port - injectable randomness.
//!
//! Random choice drives both content selection and state advancement, so
//! it comes in through a port: production uses a thread RNG, tests inject
//! a seeded source and assert exact branch selection.

/// Port for the randomness skills consume.
pub trait RandomSource: Send + Sync {
    /// A uniform draw from `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// A uniform index draw from `0..len`. `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Uniformly chooses one item from a slice, `None` when empty.
pub fn choose<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.pick_index(items.len())])
    }
}

/// True with probability `p`.
pub fn chance(rng: &dyn RandomSource, p: f64) -> bool {
    rng.next_f64() < p
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cycles through a fixed list of draws.
    struct FixedSource(std::sync::Mutex<Vec<f64>>);

    impl RandomSource for FixedSource {
        fn next_f64(&self) -> f64 {
            let mut draws = self.0.lock().unwrap();
            if draws.is_empty() {
                0.0
            } else {
                draws.remove(0)
            }
        }

        fn pick_index(&self, len: usize) -> usize {
            ((self.next_f64() * len as f64) as usize).min(len - 1)
        }
    }

    #[test]
    fn choose_returns_none_for_empty_slice() {
        let rng = FixedSource(std::sync::Mutex::new(vec![0.5]));
        let empty: &[&str] = &[];
        assert_eq!(choose(&rng, empty), None);
    }

    #[test]
    fn choose_picks_indexed_item() {
        let rng = FixedSource(std::sync::Mutex::new(vec![0.5]));
        let items = ["a", "b", "c", "d"];
        assert_eq!(choose(&rng, &items), Some(&"c"));
    }

    #[test]
    fn chance_compares_against_probability() {
        let rng = FixedSource(std::sync::Mutex::new(vec![0.3, 0.7]));
        assert!(chance(&rng, 0.5));
        assert!(!chance(&rng, 0.5));
    }
}
