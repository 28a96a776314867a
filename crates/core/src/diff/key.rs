use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Scalar, Service, Snapshot};

/// Composite identity of a service within one snapshot.
///
/// Field order matters: the derived ordering is ascending port, then
/// lexicographic protocol, which is the order every report list uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    pub port: i64,
    pub protocol: String,
}

impl ServiceKey {
    pub fn new(port: i64, protocol: impl Into<String>) -> Self {
        Self { port, protocol: protocol.into() }
    }

    /// Derive the key for a service, or `None` when it cannot be indexed.
    ///
    /// Protocol is taken as given (no case folding). A port that is neither a
    /// number nor a decimal string counts as missing.
    pub fn from_service(service: &Service) -> Option<Self> {
        let port = coerce_port(service.port.as_ref()?)?;
        let protocol = protocol_text(service.protocol.as_ref()?);
        Some(Self { port, protocol })
    }
}

/// Text form of a non-string protocol: `True`/`False` for booleans, and
/// integral floats keep their `.0`.
fn protocol_text(raw: &Scalar) -> String {
    match raw {
        Scalar::Text(s) => s.clone(),
        Scalar::Bool(true) => "True".to_string(),
        Scalar::Bool(false) => "False".to_string(),
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
            format!("{f:.1}")
        }
        Scalar::Float(f) => f.to_string(),
    }
}

fn coerce_port(raw: &Scalar) -> Option<i64> {
    match raw {
        Scalar::Integer(i) => Some(*i),
        Scalar::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Scalar::Float(_) => None,
        Scalar::Bool(b) => Some(i64::from(*b)),
        Scalar::Text(s) => s.trim().parse().ok(),
    }
}

/// Lookup of a snapshot's services by key. Iterates in key order.
pub type ServiceIndex<'a> = BTreeMap<ServiceKey, &'a Service>;

/// Index a snapshot's services by `(port, protocol)`.
///
/// Services without a usable port or protocol are left out. When two services
/// share a key, the later one in the list replaces the earlier one.
pub fn index_services(snapshot: &Snapshot) -> ServiceIndex<'_> {
    let mut index = BTreeMap::new();
    for service in snapshot.services() {
        match ServiceKey::from_service(service) {
            Some(key) => {
                if index.insert(key, service).is_some() {
                    tracing::trace!(
                        port = ?service.port,
                        "duplicate service key, keeping later entry"
                    );
                }
            }
            None => tracing::trace!(
                port = ?service.port,
                protocol = ?service.protocol,
                "skipping service without port/protocol"
            ),
        }
    }
    index
}
