use std::collections::{HashSet, VecDeque};

pub const RECENT_EVENTS_CAPACITY: usize = 100;

/// Key collapsing redeliveries of the same document revision.
pub fn dedup_key(document_id: &str, updated_at: &str) -> String {
    format!("{}:{}", document_id, updated_at)
}

/// Bounded set of recently seen keys; the oldest key is evicted first.
#[derive(Debug)]
pub struct RecentEvents {
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl RecentEvents {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Records `key`, returning `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.order.push_back(key.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for RecentEvents {
    fn default() -> Self {
        Self::new(RECENT_EVENTS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key() {
        assert_eq!(dedup_key("doc1", "2024-01-01T00:00:00Z"), "doc1:2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut events = RecentEvents::default();
        assert!(events.insert("a:1"));
        assert!(!events.insert("a:1"));
        assert!(events.insert("a:2"), "new revision of same document is fresh");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut events = RecentEvents::new(3);
        for key in ["k1", "k2", "k3", "k4"] {
            assert!(events.insert(key));
        }

        assert_eq!(events.len(), 3);
        assert!(!events.contains("k1"));
        assert!(events.contains("k2"));
        assert!(events.contains("k4"));

        assert!(events.insert("k1"), "evicted key is accepted again");
        assert!(!events.contains("k2"));
    }

    #[test]
    fn test_duplicate_does_not_refresh_position() {
        let mut events = RecentEvents::new(2);
        events.insert("k1");
        events.insert("k2");
        events.insert("k1");
        events.insert("k3");

        assert!(!events.contains("k1"));
        assert!(events.contains("k2"));
        assert!(events.contains("k3"));
    }

    #[test]
    fn test_default_capacity() {
        let mut events = RecentEvents::default();
        for i in 0..150 {
            events.insert(&format!("doc:{i}"));
        }
        assert_eq!(events.len(), RECENT_EVENTS_CAPACITY);
        assert!(!events.contains("doc:49"));
        assert!(events.contains("doc:50"));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut events = RecentEvents::new(0);
        assert!(events.is_empty());
        assert!(events.insert("a"));
        assert_eq!(events.len(), 1);
    }
}
