use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the editing surface on every content change, consumed by the
/// sync loop.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    dirty: AtomicBool,
}

impl DirtyFlag {
    /// A clean flag.
    pub const fn new() -> Self {
        Self {
            dirty: AtomicBool::new(false),
        }
    }

    /// Mark the buffer as changed. Idempotent.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clear the flag if it was set, returning whether it was.
    ///
    /// The test and the clear happen in one compare-and-swap, so an edit
    /// racing with the sync loop is either consumed now or seen next tick.
    pub fn consume_if_dirty(&self) -> bool {
        self.dirty
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Peek without consuming.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_new_flag_is_clean() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_dirty());
        assert!(!flag.consume_if_dirty());
    }

    #[test]
    fn test_consume_clears_flag() {
        let flag = DirtyFlag::new();
        flag.mark_dirty();
        assert!(flag.consume_if_dirty());
        assert!(!flag.is_dirty());
        assert!(!flag.consume_if_dirty());
    }

    #[test]
    fn test_repeated_marks_consume_once() {
        let flag = DirtyFlag::new();
        flag.mark_dirty();
        flag.mark_dirty();
        flag.mark_dirty();
        assert!(flag.consume_if_dirty());
        assert!(!flag.consume_if_dirty());
    }

    #[test]
    fn test_concurrent_consumers_never_double_clear() {
        let flag = Arc::new(DirtyFlag::new());
        flag.mark_dirty();
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let flag = Arc::clone(&flag);
                let wins = Arc::clone(&wins);
                std::thread::spawn(move || {
                    if flag.consume_if_dirty() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert!(!flag.is_dirty());
    }

    #[test]
    fn test_mark_after_final_consume_is_not_lost() {
        let flag = Arc::new(DirtyFlag::new());
        let writer = {
            let flag = Arc::clone(&flag);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    flag.mark_dirty();
                }
            })
        };
        let mut consumed = 0;
        for _ in 0..1000 {
            if flag.consume_if_dirty() {
                consumed += 1;
            }
        }
        writer.join().unwrap();
        // The last mark either landed after our last consume or was consumed.
        if flag.consume_if_dirty() {
            consumed += 1;
        }
        assert!(consumed >= 1);
        assert!(!flag.is_dirty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn one_consume_per_marked_tick(ticks in proptest::collection::vec(0..5usize, 0..50)) {
                let flag = DirtyFlag::new();
                for marks in ticks {
                    for _ in 0..marks {
                        flag.mark_dirty();
                    }
                    let first = flag.consume_if_dirty();
                    prop_assert_eq!(first, marks > 0);
                    prop_assert!(!flag.consume_if_dirty());
                    prop_assert!(!flag.is_dirty());
                }
            }
        }
    }
}
