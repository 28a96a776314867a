use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{Scalar, Service, Software, Tls};

/// Path under which a status change is reported.
pub const STATUS_PATH: &str = "status";

/// Software sub-fields compared, in report order.
pub const SOFTWARE_FIELDS: [&str; 3] = ["vendor", "product", "version"];

/// TLS sub-fields compared, in report order.
pub const TLS_FIELDS: [&str; 3] = ["version", "cipher", "cert_fingerprint_sha256"];

/// Before/after pair for one differing field. `None` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub from: Option<Scalar>,
    pub to: Option<Scalar>,
}

/// Field-level changes for one service, keyed by dotted path.
///
/// Serializes as a flat object: one `{from, to}` entry per changed path plus
/// `vulnerabilities_added` / `vulnerabilities_removed` when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeMap {
    #[serde(flatten)]
    fields: BTreeMap<String, FieldChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vulnerabilities_added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vulnerabilities_removed: Vec<String>,
}

impl ChangeMap {
    /// Number of entries, counting each non-empty vulnerability list as one.
    pub fn len(&self) -> usize {
        self.fields.len()
            + usize::from(!self.vulnerabilities_added.is_empty())
            + usize::from(!self.vulnerabilities_removed.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, path: &str) -> Option<&FieldChange> {
        self.fields.get(path)
    }

    /// Changed field paths in ascending order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldChange> {
        &self.fields
    }

    /// Identifiers present only in the newer service, sorted.
    pub fn vulnerabilities_added(&self) -> &[String] {
        &self.vulnerabilities_added
    }

    /// Identifiers present only in the older service, sorted.
    pub fn vulnerabilities_removed(&self) -> &[String] {
        &self.vulnerabilities_removed
    }

    fn record(&mut self, path: impl Into<String>, from: Option<Scalar>, to: Option<Scalar>) {
        if from != to {
            self.fields.insert(path.into(), FieldChange { from, to });
        }
    }
}

fn text(value: Option<&String>) -> Option<Scalar> {
    value.map(|s| Scalar::Text(s.clone()))
}

fn software_field<'a>(software: &'a Software, name: &str) -> Option<&'a String> {
    match name {
        "vendor" => software.vendor.as_ref(),
        "product" => software.product.as_ref(),
        "version" => software.version.as_ref(),
        _ => None,
    }
}

fn tls_field<'a>(tls: &'a Tls, name: &str) -> Option<&'a String> {
    match name {
        "version" => tls.version.as_ref(),
        "cipher" => tls.cipher.as_ref(),
        "cert_fingerprint_sha256" => tls.cert_fingerprint_sha256.as_ref(),
        _ => None,
    }
}

fn vulnerability_set(service: &Service) -> BTreeSet<&str> {
    service.vulnerabilities.iter().flatten().map(String::as_str).collect()
}

/// Compare two services that share a key.
///
/// An empty result means the services are equivalent for reporting purposes.
pub fn compare_services(old: &Service, new: &Service) -> ChangeMap {
    let mut changes = ChangeMap::default();

    changes.record(STATUS_PATH, old.status.clone(), new.status.clone());

    let empty_software = Software::default();
    let old_sw = old.software.as_ref().unwrap_or(&empty_software);
    let new_sw = new.software.as_ref().unwrap_or(&empty_software);
    for field in SOFTWARE_FIELDS {
        changes.record(
            format!("software.{field}"),
            text(software_field(old_sw, field)),
            text(software_field(new_sw, field)),
        );
    }

    let empty_tls = Tls::default();
    let old_tls = old.tls.as_ref().unwrap_or(&empty_tls);
    let new_tls = new.tls.as_ref().unwrap_or(&empty_tls);
    for field in TLS_FIELDS {
        changes.record(
            format!("tls.{field}"),
            text(tls_field(old_tls, field)),
            text(tls_field(new_tls, field)),
        );
    }

    let old_vulns = vulnerability_set(old);
    let new_vulns = vulnerability_set(new);
    changes.vulnerabilities_added =
        new_vulns.difference(&old_vulns).map(|id| id.to_string()).collect();
    changes.vulnerabilities_removed =
        old_vulns.difference(&new_vulns).map(|id| id.to_string()).collect();

    changes
}
