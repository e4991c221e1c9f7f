//! Subject identity and the first-seen registry.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use json_livelink_net::Endpoint;
use serde::Serialize;

/// Global counter for generating unique source IDs.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one source instance for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocate a new, process-unique source ID.
    pub fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this source ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source-{}", self.0)
    }
}

/// An endpoint-scoped subject name: `<field>@<endpoint>`.
///
/// The same field name arriving through two endpoints yields two distinct
/// names. No normalization is applied beyond the concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubjectName(String);

impl SubjectName {
    /// Scope a raw field name to the endpoint it arrived on.
    pub fn scoped(field: &str, endpoint: &Endpoint) -> Self {
        Self(format!("{field}@{endpoint}"))
    }

    /// The full name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The field name without the endpoint suffix.
    pub fn field(&self) -> &str {
        self.0.rsplit_once('@').map_or(self.0.as_str(), |(field, _)| field)
    }
}

impl fmt::Display for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The key the publisher sees: which source, which subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubjectKey {
    /// The source the subject arrived on.
    pub source: SourceId,
    /// The endpoint-scoped subject name.
    pub name: SubjectName,
}

impl SubjectKey {
    /// Create a new subject key.
    pub fn new(source: SourceId, name: SubjectName) -> Self {
        Self { source, name }
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.name)
    }
}

/// Subjects that have already had their static data registered.
///
/// Entries are added on first sight and never removed while the source is
/// active. The registry is plain owned state: it lives inside the decoder,
/// which only the consumer context can reach.
#[derive(Debug, Default, Clone)]
pub struct SubjectRegistry {
    seen: HashSet<SubjectName>,
}

impl SubjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a subject has been registered.
    pub fn contains(&self, name: &SubjectName) -> bool {
        self.seen.contains(name)
    }

    /// Record a subject. Returns `true` if it was not seen before.
    pub fn insert(&mut self, name: SubjectName) -> bool {
        self.seen.insert(name)
    }

    /// Number of registered subjects.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if no subject has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Iterate over registered subjects in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SubjectName> {
        self.seen.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_name() {
        let endpoint = Endpoint::localhost(54321);
        let name = SubjectName::scoped("camA", &endpoint);
        assert_eq!(name.as_str(), "camA@127.0.0.1:54321");
        assert_eq!(name.field(), "camA");
    }

    #[test]
    fn test_scoped_name_is_endpoint_specific() {
        let a = SubjectName::scoped("camA", &Endpoint::localhost(5000));
        let b = SubjectName::scoped("camA", &Endpoint::localhost(5001));
        assert_ne!(a, b);
    }

    #[test]
    fn test_scoped_name_keeps_field_verbatim() {
        let name = SubjectName::scoped("Cam A@rig", &Endpoint::localhost(1));
        assert_eq!(name.as_str(), "Cam A@rig@127.0.0.1:1");
        assert_eq!(name.field(), "Cam A@rig");
    }

    #[test]
    fn test_registry_insert_once() {
        let mut registry = SubjectRegistry::new();
        let name = SubjectName::scoped("camA", &Endpoint::localhost(1));

        assert!(registry.insert(name.clone()));
        assert!(!registry.insert(name.clone()));
        assert!(registry.contains(&name));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_source_ids_are_unique() {
        let a = SourceId::next();
        let b = SourceId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("source-"));
    }
}
