// =====================================================
// SCHEMA MODULE
// Column comparison and CREATE TABLE synthesis
// =====================================================

use crate::models::{CharLength, ColumnDef, TableIdentifier};
use crate::sql_utils::quote_identifier;

/// Base types whose declaration carries a length argument.
const SIZED_TYPES: [&str; 6] = [
    "varchar",
    "nvarchar",
    "char",
    "nchar",
    "binary",
    "varbinary",
];

/// Strict positional schema equality.
///
/// Column counts must agree and every ordinal position must match in
/// name, base type, length, precision, scale and nullability. Names and
/// base types compare case-insensitively; everything else is exact. The
/// same columns in a different order do not match, and no widening or
/// type coercion is attempted: the copy stage assumes the target is laid
/// out exactly like the source.
pub fn schemas_match(source: &[ColumnDef], target: &[ColumnDef]) -> bool {
    if source.len() != target.len() {
        return false;
    }
    source
        .iter()
        .zip(target.iter())
        .all(|(a, b)| columns_match(a, b))
}

fn columns_match(a: &ColumnDef, b: &ColumnDef) -> bool {
    a.name.eq_ignore_ascii_case(&b.name)
        && a.data_type.eq_ignore_ascii_case(&b.data_type)
        && a.char_length == b.char_length
        && a.numeric_precision == b.numeric_precision
        && a.numeric_scale == b.numeric_scale
        && a.is_nullable == b.is_nullable
}

/// Renders a CREATE TABLE statement mirroring the given columns.
///
/// Only the column layout is carried over. Keys, indexes, defaults,
/// identity and other constraints are not part of the copy.
pub fn build_create_table(table: &TableIdentifier, columns: &[ColumnDef]) -> String {
    let column_lines: Vec<String> = columns
        .iter()
        .map(|column| {
            format!(
                "    {} {} {}",
                quote_identifier(&column.name),
                type_spec(column),
                if column.is_nullable { "NULL" } else { "NOT NULL" }
            )
        })
        .collect();

    format!(
        "CREATE TABLE {} (\n{}\n)",
        table.qualified(),
        column_lines.join(",\n")
    )
}

// varchar-family columns keep their length, with unbounded rendered as
// (max); decimal and numeric keep precision and scale; everything else
// is declared by its bare base type.
fn type_spec(column: &ColumnDef) -> String {
    let base = column.data_type.trim();
    let lowered = base.to_ascii_lowercase();

    if SIZED_TYPES.contains(&lowered.as_str()) {
        let length = match column.char_length {
            Some(CharLength::Bounded(n)) => n.to_string(),
            Some(CharLength::Max) | None => "max".to_string(),
        };
        format!("{}({})", base, length)
    } else if lowered == "decimal" || lowered == "numeric" {
        format!(
            "{}({},{})",
            base,
            column.numeric_precision.unwrap_or(18),
            column.numeric_scale.unwrap_or(0)
        )
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests;
