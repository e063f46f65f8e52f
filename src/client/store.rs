use std::collections::HashMap;

use mockall::automock;
use parking_lot::Mutex;

/// Durable client-side key-value storage (the browser's localStorage in the
/// deployed form). Holds a single key: the last successful send timestamp.
#[automock]
pub trait CooldownStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: CooldownStore + ?Sized> CooldownStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// Process-local store, durable for the lifetime of the controller's host.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl CooldownStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_round_trip() {
        let store = MemoryStore::default();
        assert_eq!(store.get("contact_last_sent"), None);

        store.put("contact_last_sent", "1700000000000");
        assert_eq!(store.get("contact_last_sent").as_deref(), Some("1700000000000"));

        store.remove("contact_last_sent");
        assert_eq!(store.get("contact_last_sent"), None);
    }
}
