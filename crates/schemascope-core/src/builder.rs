//! Schema builder: raw per-table catalog rows into a [`Schema`].
//!
//! This is a pure function over rows the catalog reader already fetched.
//! Classification is pass-through: key roles come straight from the
//! catalog's flag, and nothing beyond structural typing is validated. A
//! table with zero columns, no primary key, or a self-referencing foreign
//! key is accepted as-is.

use crate::types::{Column, ForeignKey, Index, KeyRole, Schema, Table};

/// A column row as reported by the catalog, prior to normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    /// Catalog key flag (`PRI`, `UNI`, `MUL`, or empty).
    pub column_key: String,
    pub extra: String,
}

/// A key-usage row restricted to foreign keys (non-null referenced table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawForeignKey {
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// An index statistics row, with the synthetic primary-key entry already
/// excluded by the catalog reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIndex {
    pub name: String,
    pub columns: String,
    pub index_type: String,
    pub non_unique: bool,
}

/// All catalog rows for one table, in catalog-reported order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<RawColumn>,
    pub foreign_keys: Vec<RawForeignKey>,
    pub indexes: Vec<RawIndex>,
}

/// Normalize raw catalog rows into a [`Schema`].
pub fn build_schema(raw_tables: Vec<RawTable>) -> Schema {
    let mut schema = Schema::new();
    for raw in raw_tables {
        let table = build_table(&raw);
        schema.tables.insert(raw.name, table);
    }
    schema
}

fn build_table(raw: &RawTable) -> Table {
    let mut columns = Vec::with_capacity(raw.columns.len());
    let mut primary_key = Vec::new();

    for col in &raw.columns {
        let key_role = classify_key(&col.column_key);
        if key_role == KeyRole::Primary {
            primary_key.push(col.name.clone());
        }
        columns.push(Column {
            name: col.name.clone(),
            data_type: col.data_type.clone(),
            nullable: col.nullable,
            key_role,
            extra: col.extra.clone(),
        });
    }

    let foreign_keys = raw
        .foreign_keys
        .iter()
        .map(|fk| ForeignKey {
            column_name: fk.column_name.clone(),
            referenced_table_name: fk.referenced_table_name.clone(),
            referenced_column_name: fk.referenced_column_name.clone(),
        })
        .collect();

    let indexes = raw
        .indexes
        .iter()
        .map(|idx| Index {
            name: idx.name.clone(),
            columns: idx.columns.clone(),
            index_type: idx.index_type.clone(),
            unique: !idx.non_unique,
        })
        .collect();

    Table {
        columns,
        primary_key,
        foreign_keys,
        indexes,
    }
}

/// Map the catalog key flag onto [`KeyRole`]. Unrecognized flags fall back
/// to `None`; no roles are invented.
fn classify_key(column_key: &str) -> KeyRole {
    match column_key {
        "PRI" => KeyRole::Primary,
        "UNI" => KeyRole::Unique,
        "MUL" => KeyRole::Multiple,
        _ => KeyRole::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_column(name: &str, column_key: &str) -> RawColumn {
        RawColumn {
            name: name.into(),
            data_type: "int(11)".into(),
            nullable: false,
            column_key: column_key.into(),
            extra: String::new(),
        }
    }

    #[test]
    fn key_flags_pass_through() {
        assert_eq!(classify_key("PRI"), KeyRole::Primary);
        assert_eq!(classify_key("UNI"), KeyRole::Unique);
        assert_eq!(classify_key("MUL"), KeyRole::Multiple);
        assert_eq!(classify_key(""), KeyRole::None);
        assert_eq!(classify_key("SPATIAL"), KeyRole::None);
    }

    #[test]
    fn primary_key_collects_pri_columns_in_order() {
        let schema = build_schema(vec![RawTable {
            name: "order_items".into(),
            columns: vec![
                raw_column("order_id", "PRI"),
                raw_column("quantity", ""),
                raw_column("product_id", "PRI"),
            ],
            ..Default::default()
        }]);

        let table = schema.get_table("order_items").unwrap();
        assert_eq!(table.primary_key, vec!["order_id", "product_id"]);
    }

    #[test]
    fn primary_key_is_subset_of_columns() {
        let schema = build_schema(vec![RawTable {
            name: "users".into(),
            columns: vec![raw_column("id", "PRI"), raw_column("email", "UNI")],
            ..Default::default()
        }]);

        for (_, table) in schema.iter_tables() {
            for pk in &table.primary_key {
                assert!(table.has_column(pk));
            }
        }
    }

    #[test]
    fn foreign_key_columns_belong_to_their_table() {
        let schema = build_schema(vec![RawTable {
            name: "orders".into(),
            columns: vec![raw_column("id", "PRI"), raw_column("user_id", "MUL")],
            foreign_keys: vec![RawForeignKey {
                column_name: "user_id".into(),
                referenced_table_name: "users".into(),
                referenced_column_name: "id".into(),
            }],
            ..Default::default()
        }]);

        let table = schema.get_table("orders").unwrap();
        for fk in &table.foreign_keys {
            assert!(table.has_column(&fk.column_name));
        }
    }

    #[test]
    fn dangling_foreign_key_is_surfaced_as_is() {
        let schema = build_schema(vec![RawTable {
            name: "orders".into(),
            columns: vec![raw_column("user_id", "MUL")],
            foreign_keys: vec![RawForeignKey {
                column_name: "user_id".into(),
                referenced_table_name: "deleted_table".into(),
                referenced_column_name: "id".into(),
            }],
            ..Default::default()
        }]);

        let fks = &schema.get_table("orders").unwrap().foreign_keys;
        assert_eq!(fks[0].referenced_table_name, "deleted_table");
    }

    #[test]
    fn index_uniqueness_is_inverted_non_unique_flag() {
        let schema = build_schema(vec![RawTable {
            name: "users".into(),
            columns: vec![raw_column("email", "UNI")],
            indexes: vec![
                RawIndex {
                    name: "uq_email".into(),
                    columns: "email".into(),
                    index_type: "BTREE".into(),
                    non_unique: false,
                },
                RawIndex {
                    name: "idx_email_domain".into(),
                    columns: "email".into(),
                    index_type: "BTREE".into(),
                    non_unique: true,
                },
            ],
            ..Default::default()
        }]);

        let indexes = &schema.get_table("users").unwrap().indexes;
        assert!(indexes[0].unique);
        assert!(!indexes[1].unique);
    }

    #[test]
    fn zero_column_table_is_accepted() {
        let schema = build_schema(vec![RawTable {
            name: "empty".into(),
            ..Default::default()
        }]);

        let table = schema.get_table("empty").unwrap();
        assert!(table.columns.is_empty());
        assert!(table.primary_key.is_empty());
    }
}
