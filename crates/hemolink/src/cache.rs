use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Clock seam so cache expiry is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// String-keyed cache whose entries expire a fixed duration after
/// insertion. Expired entries are dropped on the read path; a single mutex
/// guards the map against concurrent workers.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Self::DEFAULT_TTL, Arc::new(SystemClock))
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let now = self.clock.now();
        let fresh = entries
            .get(key)
            .map(|entry| now.duration_since(entry.stored_at) < self.ttl)?;
        if !fresh {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.into(),
            Entry {
                value,
                stored_at: self.clock.now(),
            },
        );
    }
}
