use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use rand::Rng;

/// A record: field name → value.
pub type Fields = HashMap<String, String>;

/// In-memory hash store with simulated round-trip latency.
///
/// Stands in for a remote key-value server so the demo has a nested,
/// slow-ish call to monitor under every request.
pub struct Store {
    records: RwLock<HashMap<String, Fields>>,
    /// Simulated round-trip, uniformly drawn from this range (μs)
    latency_us: (u64, u64),
}

impl Store {
    pub fn new(min_latency_us: u64, max_latency_us: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            latency_us: (min_latency_us, max_latency_us.max(min_latency_us)),
        }
    }

    pub async fn hgetall(&self, key: &str) -> Fields {
        self.round_trip().await;
        self.records.read().get(key).cloned().unwrap_or_default()
    }

    pub async fn hset(&self, key: &str, fields: Fields) {
        self.round_trip().await;
        self.hset_now(key, fields);
    }

    /// Write without simulated latency (seeding).
    pub fn hset_now(&self, key: &str, fields: Fields) {
        self.records.write().insert(key.to_owned(), fields);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    async fn round_trip(&self) {
        let (lo, hi) = self.latency_us;
        let us = rand::thread_rng().gen_range(lo..=hi);
        tokio::time::sleep(Duration::from_micros(us)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = Store::new(0, 10);
        store
            .hset("user:1", Fields::from([("name".to_string(), "Ava".to_string())]))
            .await;
        assert_eq!(store.hgetall("user:1").await["name"], "Ava");
        assert!(store.hgetall("user:2").await.is_empty());
        assert_eq!(store.len(), 1);
    }
}
