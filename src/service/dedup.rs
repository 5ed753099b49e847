//! Idempotency window for device punches. Terminals retry on ambiguous
//! network conditions; a request_id seen twice inside the window is routine,
//! not an operator-attention error.

use std::time::Duration;

use moka::future::Cache;

/// Injectable so tests run against a deterministic fake and a multi-instance
/// deployment can swap in a shared backing store.
pub trait DedupStore {
    async fn seen(&self, request_id: &str) -> bool;
    async fn mark_seen(&self, request_id: &str);
}

/// Bounded, time-windowed in-process store. Process-local: duplicate retries
/// landing on another instance are not caught (known limitation).
#[derive(Clone)]
pub struct MokaDedupStore {
    cache: Cache<String, ()>,
}

impl MokaDedupStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl DedupStore for MokaDedupStore {
    async fn seen(&self, request_id: &str) -> bool {
        self.cache.get(request_id).await.is_some()
    }

    async fn mark_seen(&self, request_id: &str) {
        self.cache.insert(request_id.to_string(), ()).await;
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeDedupStore {
        keys: Mutex<HashSet<String>>,
    }

    impl DedupStore for FakeDedupStore {
        async fn seen(&self, request_id: &str) -> bool {
            self.keys.lock().unwrap().contains(request_id)
        }

        async fn mark_seen(&self, request_id: &str) {
            self.keys.lock().unwrap().insert(request_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn second_submission_is_flagged() {
        let store = MokaDedupStore::new(1000, Duration::from_secs(300));

        assert!(!store.seen("req-1").await);
        store.mark_seen("req-1").await;
        assert!(store.seen("req-1").await);
        assert!(!store.seen("req-2").await);
    }

    #[actix_web::test]
    async fn expired_keys_reopen_the_window() {
        let store = MokaDedupStore::new(1000, Duration::from_millis(50));

        store.mark_seen("req-1").await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!store.seen("req-1").await);
    }
}
