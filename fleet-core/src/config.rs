//! # Configuration
//!
//! A minimal string key/value configuration store. Applications layer
//! their own loading strategy (environment, files, secrets manager) on
//! top and hand immutable snapshots to the pieces that need them.
//!
//! ```rust
//! use fleet_core::FleetConfig;
//!
//! let mut config = FleetConfig::new();
//! config.set("find.limit.default", "50");
//! config.set("find.limit.max", "200");
//!
//! let snap = config.snapshot();
//! assert_eq!(snap.get_usize("find.limit.default"), Some(50));
//! ```

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FleetConfig {
    values: HashMap<String, String>,
}

impl FleetConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// An immutable copy for handing to long-lived components. Handles
    /// built from a snapshot never observe later mutations.
    pub fn snapshot(&self) -> FleetConfigSnapshot {
        FleetConfigSnapshot {
            map: self.values.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FleetConfigSnapshot {
    map: HashMap<String, String>,
}

impl FleetConfigSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}
