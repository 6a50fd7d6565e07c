//! Schema versioning for exported reports.

use crate::SCHEMA_VERSION;

/// Schema version information embedded in exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    /// Major version - breaking changes increment this.
    pub major: u32,

    /// Minor version - backwards-compatible additions increment this.
    pub minor: u32,
}

impl SchemaVersion {
    /// The current schema version used by this library.
    pub const fn current() -> Self {
        Self {
            major: SCHEMA_VERSION,
            minor: 0,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_major_minor() {
        let json = serde_json::to_value(SchemaVersion::current()).unwrap();
        assert_eq!(json["major"], SCHEMA_VERSION);
        assert_eq!(json["minor"], 0);
    }
}
