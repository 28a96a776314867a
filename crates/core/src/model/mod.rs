//! Snapshot document model.
//!
//! A snapshot is a point-in-time scan result for one host. Every field is
//! optional: scanners omit what they did not observe, and JSON `null` is read
//! the same as a missing key. Nothing here validates a document beyond that.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A JSON scalar as it appears in scan documents (`status`, `port`, `protocol`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the scalar, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Integers and floats holding the same value are equal (`200 == 200.0`).
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Integer(_) | Scalar::Float(_), Scalar::Integer(_) | Scalar::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Software banner identified on a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// TLS configuration observed on a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tls {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub cipher: Option<String>,
    #[serde(default)]
    pub cert_fingerprint_sha256: Option<String>,
}

/// One observed open service on a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub port: Option<Scalar>,
    #[serde(default)]
    pub protocol: Option<Scalar>,
    #[serde(default)]
    pub status: Option<Scalar>,
    #[serde(default)]
    pub software: Option<Software>,
    #[serde(default)]
    pub tls: Option<Tls>,
    #[serde(default)]
    pub vulnerabilities: Option<Vec<String>>,
}

impl Service {
    /// Builder-style constructor for the two identifying fields.
    pub fn new(port: i64, protocol: impl Into<String>) -> Self {
        Self {
            port: Some(Scalar::Integer(port)),
            protocol: Some(Scalar::Text(protocol.into())),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<Scalar>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_software(mut self, software: Software) -> Self {
        self.software = Some(software);
        self
    }

    pub fn with_tls(mut self, tls: Tls) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_vulnerabilities<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vulnerabilities = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

/// A point-in-time scan result for one host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: Option<Vec<Service>>,
}

impl Snapshot {
    pub fn new(services: Vec<Service>) -> Self {
        Self { ip: None, timestamp: None, services: Some(services) }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Parse a snapshot from an already-decoded JSON document.
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Services in declaration order; empty when the list is absent.
    pub fn services(&self) -> &[Service] {
        self.services.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_compare_by_value() {
        assert_eq!(Scalar::Integer(200), Scalar::Float(200.0));
        assert_ne!(Scalar::Integer(200), Scalar::Text("200".into()));
        assert_ne!(Scalar::Bool(true), Scalar::Integer(1));
    }

    #[test]
    fn nulls_read_as_absent() {
        let snap = Snapshot::from_json_str(
            r#"{"ip": null, "services": [{"port": 80, "protocol": "HTTP", "software": null, "tls": null, "vulnerabilities": null}]}"#,
        )
        .unwrap();
        assert!(snap.ip.is_none());
        let svc = &snap.services()[0];
        assert!(svc.software.is_none());
        assert!(svc.tls.is_none());
        assert!(svc.vulnerabilities.is_none());
    }

    #[test]
    fn missing_service_list_is_empty() {
        let snap = Snapshot::from_json_str(r#"{"service_count": 0}"#).unwrap();
        assert!(snap.services().is_empty());
        let snap = Snapshot::from_json_str(r#"{"services": null}"#).unwrap();
        assert!(snap.services().is_empty());
    }

    #[test]
    fn scalars_keep_their_kind() {
        let snap = Snapshot::from_json_str(
            r#"{"services": [{"port": "443", "protocol": "HTTPS", "status": 200.5}]}"#,
        )
        .unwrap();
        let svc = &snap.services()[0];
        assert_eq!(svc.port, Some(Scalar::Text("443".into())));
        assert!(matches!(svc.status, Some(Scalar::Float(_))));
    }
}
