//! Model generator: one Rust struct stub per discovered table.
//!
//! The output is advisory scaffolding, plain text mirroring each table's
//! columns; nothing else in the system treats it as structured code.

use indexmap::IndexMap;

use crate::types::{Schema, Table};

/// Generate one source stub per table, keyed by table name, in schema
/// discovery order.
pub fn generate_models(schema: &Schema) -> IndexMap<String, String> {
    schema
        .iter_tables()
        .map(|(name, table)| (name.to_string(), generate_model(name, table)))
        .collect()
}

/// Convert a table name to a type name: underscore-separated words,
/// capitalized and concatenated (`order_items` -> `OrderItems`).
///
/// Pure and deterministic; the same rule is applied when a foreign key's
/// referenced table is rendered as a type reference.
pub fn type_name(table_name: &str) -> String {
    table_name
        .split('_')
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render the stub for one table: a struct with one field per column in
/// declared order, then one comment line per foreign key.
fn generate_model(table_name: &str, table: &Table) -> String {
    let mut stub = format!("/// Model for table `{table_name}`.\n");
    stub.push_str(&format!("pub struct {} {{\n", type_name(table_name)));
    for column in &table.columns {
        stub.push_str(&format!(
            "    pub {}: {},\n",
            column.name,
            field_type(&column.data_type, column.nullable)
        ));
    }
    stub.push_str("}\n");

    for fk in &table.foreign_keys {
        stub.push_str(&format!(
            "\n// Relationship to {} via {}\n",
            type_name(&fk.referenced_table_name),
            fk.column_name
        ));
    }

    stub
}

/// Map a catalog-reported column type to a Rust field type, wrapping in
/// `Option` when the column is nullable. Unrecognized types render as
/// `String`; the stub is not a compiled artifact.
fn field_type(data_type: &str, nullable: bool) -> String {
    let base = base_type(data_type);
    if nullable {
        format!("Option<{base}>")
    } else {
        base.to_string()
    }
}

fn base_type(data_type: &str) -> &'static str {
    let lower = data_type.to_ascii_lowercase();
    // MySQL's conventional boolean spelling.
    if lower.starts_with("tinyint(1)") {
        return "bool";
    }
    let name = lower.split(['(', ' ']).next().unwrap_or("");
    match name {
        "tinyint" | "smallint" => "i16",
        "mediumint" | "int" | "integer" => "i32",
        "bigint" => "i64",
        "float" => "f32",
        "double" | "real" => "f64",
        "bit" | "boolean" | "bool" => "bool",
        "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" => "Vec<u8>",
        _ => "String",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ForeignKey, KeyRole};

    fn column(name: &str, data_type: &str, nullable: bool) -> Column {
        Column {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            key_role: KeyRole::None,
            extra: String::new(),
        }
    }

    fn order_items() -> Table {
        Table {
            columns: vec![
                column("id", "bigint(20)", false),
                column("order_id", "int(11)", false),
                column("note", "varchar(255)", true),
            ],
            primary_key: vec!["id".into()],
            foreign_keys: vec![ForeignKey {
                column_name: "order_id".into(),
                referenced_table_name: "orders".into(),
                referenced_column_name: "id".into(),
            }],
            indexes: vec![],
        }
    }

    /// Pull the field names back out of a generated stub.
    fn field_names(stub: &str) -> Vec<&str> {
        stub.lines()
            .filter_map(|line| Some(line.trim().strip_prefix("pub ")?.split_once(':')?.0))
            .collect()
    }

    #[test]
    fn name_generation_is_deterministic() {
        assert_eq!(type_name("order_items"), "OrderItems");
        assert_eq!(type_name("order_items"), type_name("order_items"));
        assert_eq!(type_name("users"), "Users");
        assert_eq!(type_name("a_b_c"), "ABC");
    }

    #[test]
    fn stub_fields_round_trip_column_order() {
        let table = order_items();
        let stub = generate_model("order_items", &table);
        assert_eq!(field_names(&stub), vec!["id", "order_id", "note"]);
    }

    #[test]
    fn stub_declares_struct_and_relationship() {
        let stub = generate_model("order_items", &order_items());
        assert!(stub.contains("pub struct OrderItems {"));
        assert!(stub.contains("// Relationship to Orders via order_id"));
    }

    #[test]
    fn nullable_columns_become_options() {
        let stub = generate_model("order_items", &order_items());
        assert!(stub.contains("pub id: i64,"));
        assert!(stub.contains("pub order_id: i32,"));
        assert!(stub.contains("pub note: Option<String>,"));
    }

    #[test]
    fn catalog_types_map_to_rust_types() {
        assert_eq!(base_type("tinyint(1)"), "bool");
        assert_eq!(base_type("tinyint(4)"), "i16");
        assert_eq!(base_type("INT(11) unsigned"), "i32");
        assert_eq!(base_type("double"), "f64");
        assert_eq!(base_type("mediumblob"), "Vec<u8>");
        assert_eq!(base_type("decimal(10,2)"), "String");
        assert_eq!(base_type("datetime"), "String");
    }

    #[test]
    fn generate_models_covers_every_table_in_order() {
        let mut schema = Schema::new();
        schema.tables.insert("users".into(), Table::default());
        schema.tables.insert("order_items".into(), order_items());

        let models = generate_models(&schema);
        let keys: Vec<_> = models.keys().cloned().collect();
        assert_eq!(keys, vec!["users", "order_items"]);
        assert!(models["users"].contains("pub struct Users {"));
    }
}
