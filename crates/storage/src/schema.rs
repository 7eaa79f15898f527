//! Table schema declarations
//!
//! A table schema declares which fields of an entity kind are indexed
//! and which indexes the upsert engine may treat as a uniqueness
//! constraint. Schemas are plain consts: the platform's schema lives
//! in `tabula-entities`, and a store is built from a slice of them.

use tabula_core::EntityKind;

/// Declaration of one secondary index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name, e.g. `"by_user_id"`
    pub name: &'static str,
    /// Field the index is keyed on
    pub field: &'static str,
    /// Whether the upsert engine treats this index as a natural-key
    /// uniqueness constraint. The store itself never rejects
    /// duplicates; it only *detects* them in unique lookups.
    pub unique: bool,
}

impl IndexDef {
    /// Declare a non-unique index
    pub const fn new(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            unique: false,
        }
    }

    /// Declare an index used as a natural-key uniqueness constraint
    pub const fn unique(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            unique: true,
        }
    }
}

/// Schema for one entity kind's table
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    /// The entity kind this table holds
    pub kind: EntityKind,
    /// Secondary indexes maintained for this table
    pub indexes: &'static [IndexDef],
}

impl TableSchema {
    /// Create a table schema
    pub const fn new(kind: EntityKind, indexes: &'static [IndexDef]) -> Self {
        Self { kind, indexes }
    }

    /// Look up an index declaration by name
    pub fn index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEXES: [IndexDef; 2] = [
        IndexDef::unique("by_user_id", "user_id"),
        IndexDef::new("by_date", "started_at"),
    ];

    #[test]
    fn test_index_lookup() {
        let schema = TableSchema::new(EntityKind::Session, &INDEXES);
        assert_eq!(schema.index("by_user_id").unwrap().field, "user_id");
        assert!(schema.index("by_user_id").unwrap().unique);
        assert!(!schema.index("by_date").unwrap().unique);
        assert!(schema.index("nope").is_none());
    }
}
