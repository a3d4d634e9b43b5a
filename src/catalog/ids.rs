//! Time-based id allocation.
//!
//! Ids are millisecond timestamps. Two games added within the same
//! millisecond (or an imported id that happens to equal "now") would collide,
//! so the allocator remembers the last id it issued and bumps forward past
//! anything already taken.

use chrono::Utc;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Default)]
pub struct IdAllocator {
    last_issued: i64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id from the wall clock that `taken` does not claim.
    pub fn next(&mut self, taken: impl Fn(i64) -> bool) -> i64 {
        self.next_at(now_millis(), taken)
    }

    /// Allocate an id no smaller than `now_ms` and greater than any id
    /// previously issued by this allocator.
    pub fn next_at(&mut self, now_ms: i64, taken: impl Fn(i64) -> bool) -> i64 {
        let mut candidate = now_ms.max(self.last_issued.saturating_add(1));
        while taken(candidate) {
            candidate = candidate.saturating_add(1);
        }
        self.last_issued = candidate;
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_is_bumped() {
        let mut ids = IdAllocator::new();
        let a = ids.next_at(1_000, |_| false);
        let b = ids.next_at(1_000, |_| false);
        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
    }

    #[test]
    fn skips_ids_already_in_use() {
        let mut ids = IdAllocator::new();
        let taken = [5_000, 5_001, 5_002];
        let id = ids.next_at(5_000, |id| taken.contains(&id));
        assert_eq!(id, 5_003);
    }

    #[test]
    fn clock_going_backwards_still_increases() {
        let mut ids = IdAllocator::new();
        let first = ids.next_at(9_000, |_| false);
        let second = ids.next_at(8_000, |_| false);
        assert!(second > first);
    }

    #[test]
    fn wall_clock_ids_are_positive() {
        let mut ids = IdAllocator::new();
        assert!(ids.next(|_| false) > 0);
    }
}
