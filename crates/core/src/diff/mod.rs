//! Snapshot comparison engine.
//!
//! Given two snapshots of the same host, produce a deterministic report of
//! services added, removed, and modified. The engine is pure: it never mutates
//! its inputs, performs no I/O, and has no failure mode. Missing fields degrade
//! to "absent" and are compared as such.
//!
//! - `key`: `ServiceKey` and `index_services`.
//! - `changes`: `ChangeMap` and `compare_services`.
//! - this module: `DiffReport` and `diff_snapshots`.

mod changes;
mod key;

pub use changes::*;
pub use key::*;

use serde::Serialize;

use crate::model::Snapshot;

/// A service identity as it appears in `services_added` / `services_removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRef {
    pub port: i64,
    pub protocol: String,
}

impl From<&ServiceKey> for ServiceRef {
    fn from(key: &ServiceKey) -> Self {
        Self { port: key.port, protocol: key.protocol.clone() }
    }
}

/// A service present in both snapshots with at least one changed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifiedService {
    pub port: i64,
    pub protocol: String,
    pub changes: ChangeMap,
}

/// Result of comparing two snapshots. All lists are in `(port, protocol)` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffReport {
    pub services_added: Vec<ServiceRef>,
    pub services_removed: Vec<ServiceRef>,
    pub services_modified: Vec<ModifiedService>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.services_added.is_empty()
            && self.services_removed.is_empty()
            && self.services_modified.is_empty()
    }

    /// Find the modification entry for a given service, if any.
    pub fn modified(&self, port: i64, protocol: &str) -> Option<&ModifiedService> {
        self.services_modified.iter().find(|m| m.port == port && m.protocol == protocol)
    }
}

/// Compare two snapshots: `old` is the baseline, `new` the later scan.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> DiffReport {
    let old_index = index_services(old);
    let new_index = index_services(new);

    // BTreeMap iteration is already in key order, so every list below comes
    // out sorted without an explicit sort.
    let services_added: Vec<ServiceRef> = new_index
        .keys()
        .filter(|key| !old_index.contains_key(*key))
        .map(ServiceRef::from)
        .collect();
    let services_removed: Vec<ServiceRef> = old_index
        .keys()
        .filter(|key| !new_index.contains_key(*key))
        .map(ServiceRef::from)
        .collect();

    let mut services_modified = Vec::new();
    for (key, old_service) in &old_index {
        let Some(new_service) = new_index.get(key) else {
            continue;
        };
        let changes = compare_services(old_service, new_service);
        if !changes.is_empty() {
            services_modified.push(ModifiedService {
                port: key.port,
                protocol: key.protocol.clone(),
                changes,
            });
        }
    }

    tracing::debug!(
        added = services_added.len(),
        removed = services_removed.len(),
        modified = services_modified.len(),
        "computed snapshot diff"
    );

    DiffReport { services_added, services_removed, services_modified }
}

/// A diff between two stored snapshots of one host, as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostDiff {
    pub ip: String,
    pub ts1: String,
    pub ts2: String,
    pub diff: DiffReport,
}
