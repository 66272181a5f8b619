//! The normalized in-memory schema snapshot.
//!
//! A [`Schema`] is built fresh on each introspection pass and owned by the
//! caller that requested it; there is no cross-call cache and no partial or
//! incremental update path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key participation of a column, mirroring the catalog's key flag
/// (MySQL `COLUMN_KEY`: empty, `PRI`, `UNI`, `MUL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Not part of any key.
    #[default]
    None,
    /// Part of the primary key.
    Primary,
    /// First column of a unique index.
    Unique,
    /// First column of a non-unique index, or a non-leading key column.
    Multiple,
}

/// A single column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Catalog-reported type name (e.g. `int(11)`, `varchar(255)`).
    pub data_type: String,
    /// Whether the column allows NULL.
    pub nullable: bool,
    /// Key participation flag.
    pub key_role: KeyRole,
    /// Catalog-reported extra attribute (e.g. `auto_increment`).
    pub extra: String,
}

/// A foreign key constraint.
///
/// The referenced table is reported as-is: if the catalog hands back a
/// dangling reference it is surfaced, not validated or repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// A secondary index entry, one per catalog statistics row.
///
/// `columns` is the catalog's reported column string, left unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: String,
    /// Storage/index method (e.g. `BTREE`).
    #[serde(rename = "type")]
    pub index_type: String,
    /// Inverted catalog non-uniqueness flag.
    pub unique: bool,
}

/// One table's structure: columns in catalog declaration order, the primary
/// key column set, foreign keys and secondary indexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

impl Table {
    /// Whether `name` is one of this table's columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// A complete schema snapshot, fully determined by one catalog pass.
///
/// Tables keep their discovery order so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Iterate over `(name, table)` pairs in discovery order.
    pub fn iter_tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Table names in discovery order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|n| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> Table {
        Table {
            columns: vec![
                Column {
                    name: "id".into(),
                    data_type: "int(11)".into(),
                    nullable: false,
                    key_role: KeyRole::Primary,
                    extra: "auto_increment".into(),
                },
                Column {
                    name: "email".into(),
                    data_type: "varchar(255)".into(),
                    nullable: true,
                    key_role: KeyRole::Unique,
                    extra: String::new(),
                },
            ],
            primary_key: vec!["id".into()],
            foreign_keys: vec![],
            indexes: vec![Index {
                name: "idx_email".into(),
                columns: "email".into(),
                index_type: "BTREE".into(),
                unique: true,
            }],
        }
    }

    #[test]
    fn has_column_checks_membership() {
        let table = users_table();
        assert!(table.has_column("email"));
        assert!(!table.has_column("created_at"));
    }

    #[test]
    fn schema_lookup_and_order() {
        let mut schema = Schema::new();
        schema.tables.insert("users".into(), users_table());
        schema.tables.insert("orders".into(), Table::default());

        assert!(schema.get_table("users").is_some());
        assert!(schema.get_table("missing").is_none());
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["users", "orders"]);
    }

    #[test]
    fn serialization_shape_matches_catalog_vocabulary() {
        let mut schema = Schema::new();
        schema.tables.insert("users".into(), users_table());

        let json = serde_json::to_value(&schema).unwrap();
        let col = &json["tables"]["users"]["columns"][0];
        assert_eq!(col["name"], "id");
        assert_eq!(col["key_role"], "primary");
        assert_eq!(json["tables"]["users"]["indexes"][0]["type"], "BTREE");
        assert_eq!(json["tables"]["users"]["primary_key"][0], "id");
    }
}
