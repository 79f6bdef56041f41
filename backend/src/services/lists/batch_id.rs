//! Batch identifiers: `BATCH-` followed by a millisecond timestamp.
//!
//! The timestamp comes from a shared monotonic counter. When two uploads land
//! in the same millisecond (or the clock steps backwards) the second one gets
//! the next free millisecond instead of a duplicate.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

pub const BATCH_PREFIX: &str = "BATCH-";

#[derive(Debug, Default)]
pub struct BatchIdGenerator {
    last: AtomicI64,
}

impl BatchIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts after an id that was already handed out, e.g. the newest batch
    /// in the database. Ids that don't follow the `BATCH-<millis>` shape are
    /// ignored.
    pub fn resume_after(previous: Option<&str>) -> Self {
        let last = previous.and_then(parse_stamp).unwrap_or(0);
        BatchIdGenerator {
            last: AtomicI64::new(last),
        }
    }

    pub fn next_id(&self) -> String {
        let stamp = self.next_stamp(Utc::now().timestamp_millis());
        format!("{}{}", BATCH_PREFIX, stamp)
    }

    fn next_stamp(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = if now_ms > prev { now_ms } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

pub fn parse_stamp(batch_id: &str) -> Option<i64> {
    batch_id.strip_prefix(BATCH_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn same_millisecond_moves_forward() {
        let ids = BatchIdGenerator::new();
        assert_eq!(ids.next_stamp(1_000), 1_000);
        assert_eq!(ids.next_stamp(1_000), 1_001);
        // Clock went backwards.
        assert_eq!(ids.next_stamp(900), 1_002);
        assert_eq!(ids.next_stamp(5_000), 5_000);
    }

    #[test]
    fn resumes_past_a_stored_id() {
        let ids = BatchIdGenerator::resume_after(Some("BATCH-9999999999999"));
        assert_eq!(ids.next_id(), "BATCH-10000000000000");

        let fresh = BatchIdGenerator::resume_after(Some("legacy-id"));
        assert!(fresh.next_id().starts_with(BATCH_PREFIX));
    }

    #[test]
    fn parse_stamp_reads_the_suffix() {
        assert_eq!(parse_stamp("BATCH-1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_stamp("BATCH-x"), None);
        assert_eq!(parse_stamp("1700000000000"), None);
    }

    #[test]
    fn concurrent_callers_never_collide() {
        let ids = Arc::new(BatchIdGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..500).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate batch id");
            }
        }
        assert_eq!(seen.len(), 4_000);
    }
}
