// =====================================================
// SQL UTILITIES MODULE
// Identifier quoting for generated T-SQL
// =====================================================

/// Wraps an identifier in brackets, doubling any closing bracket inside it.
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Builds a `[schema].[table]` reference safe to splice into a statement.
pub fn qualified_table_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(table))
}
