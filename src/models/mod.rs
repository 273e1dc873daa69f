use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::sql_utils::qualified_table_name;

/// Schema assumed when a table identifier carries no schema part.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// A validated request to copy one table between two SQL Server instances.
///
/// The only way to obtain an instance is [`TransferRequest::new`], which
/// rejects blank fields, so every request reaching the engine is known to
/// be complete. All six fields are stored trimmed.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    source_connection: String,
    source_database: String,
    source_table: String,
    target_connection: String,
    target_database: String,
    target_table: String,
}

impl TransferRequest {
    pub fn new(
        source_connection: &str,
        source_database: &str,
        source_table: &str,
        target_connection: &str,
        target_database: &str,
        target_table: &str,
    ) -> Result<Self, TransferError> {
        Ok(Self {
            source_connection: required("sourceConnection", source_connection)?,
            source_database: required("sourceDatabase", source_database)?,
            source_table: required("sourceTable", source_table)?,
            target_connection: required("targetConnection", target_connection)?,
            target_database: required("targetDatabase", target_database)?,
            target_table: required("targetTable", target_table)?,
        })
    }

    pub fn source_connection(&self) -> &str {
        &self.source_connection
    }

    pub fn source_database(&self) -> &str {
        &self.source_database
    }

    pub fn source_table(&self) -> &str {
        &self.source_table
    }

    pub fn target_connection(&self) -> &str {
        &self.target_connection
    }

    pub fn target_database(&self) -> &str {
        &self.target_database
    }

    pub fn target_table(&self) -> &str {
        &self.target_table
    }
}

fn required(label: &str, value: &str) -> Result<String, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::Validation(format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

/// Schema-qualified table reference.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    pub schema: String,
    pub name: String,
}

impl TableIdentifier {
    /// Splits a raw identifier into schema and table name.
    ///
    /// One layer of bracket delimiters is stripped from the whole input and
    /// again from each half. The first dot separates schema from name; with
    /// no dot the schema defaults to `dbo`. Parsing never fails: a name that
    /// comes out empty or wrong simply fails the later existence probe.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_delimiters(raw);
        match cleaned.find('.') {
            Some(split) => TableIdentifier {
                schema: strip_delimiters(&cleaned[..split]).to_string(),
                name: strip_delimiters(&cleaned[split + 1..]).to_string(),
            },
            None => TableIdentifier {
                schema: DEFAULT_SCHEMA.to_string(),
                name: cleaned.to_string(),
            },
        }
    }

    /// Bracket-quoted `[schema].[table]` form for generated statements.
    pub fn qualified(&self) -> String {
        qualified_table_name(&self.schema, &self.name)
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

fn strip_delimiters(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix('[').unwrap_or(value);
    let value = value.strip_suffix(']').unwrap_or(value);
    value.trim()
}

/// Declared length of a character or binary column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CharLength {
    /// Concrete upper bound, e.g. `varchar(50)`.
    Bounded(u32),
    /// The `(max)` variants.
    Max,
}

impl CharLength {
    /// Converts the catalog's CHARACTER_MAXIMUM_LENGTH value, where -1
    /// marks an unbounded column.
    pub fn from_catalog(raw: i32) -> Self {
        if raw < 0 {
            CharLength::Max
        } else {
            CharLength::Bounded(raw as u32)
        }
    }
}

/// One column as reported by INFORMATION_SCHEMA.COLUMNS, in ordinal order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub char_length: Option<CharLength>,
    pub numeric_precision: Option<u8>,
    pub numeric_scale: Option<u8>,
    pub is_nullable: bool,
}

/// What a completed transfer did.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    /// Source row count measured just before the copy started.
    pub rows_copied: u64,
    /// True when this run created the target table.
    pub target_created: bool,
}
