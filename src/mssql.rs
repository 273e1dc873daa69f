// =====================================================
// MSSQL OPERATIONS (via Tiberius)
// Connections, catalog probes, schema and row reads
// =====================================================

use tiberius::{Client, Config, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::error::TransferError;
use crate::models::{CharLength, ColumnDef, TableIdentifier};
use crate::sql_utils::quote_identifier;

pub type MssqlClient = Client<Compat<TcpStream>>;

// --- Connection ---

/// Opens a client from an ADO.NET style connection string, e.g.
/// `Server=tcp:host,1433;User Id=app;Password=...;TrustServerCertificate=true`.
pub async fn connect(connection_string: &str) -> Result<MssqlClient, TransferError> {
    let config = Config::from_ado_string(connection_string)?;
    let addr = config.get_addr();

    let tcp = TcpStream::connect(&addr).await?;
    tcp.set_nodelay(true)?;

    let client = Client::connect(config, tcp.compat_write()).await?;
    log::debug!("connected to {}", addr);
    Ok(client)
}

// --- Statement Execution ---

/// Runs a statement whose rows do not matter (DDL, USE, transaction
/// control) and drains the whole response stream.
pub async fn run_statement(client: &mut MssqlClient, sql: &str) -> Result<(), TransferError> {
    client.simple_query(sql).await?.into_results().await?;
    Ok(())
}

// --- Catalog Probes ---

pub async fn database_exists(
    client: &mut MssqlClient,
    database: &str,
) -> Result<bool, TransferError> {
    let row = client
        .query(
            "SELECT name FROM sys.databases WHERE name = @P1",
            &[&database],
        )
        .await?
        .into_row()
        .await?;
    Ok(row.is_some())
}

/// Switches the connection's active database.
pub async fn use_database(client: &mut MssqlClient, database: &str) -> Result<(), TransferError> {
    run_statement(client, &format!("USE {}", quote_identifier(database))).await
}

pub async fn table_exists(
    client: &mut MssqlClient,
    table: &TableIdentifier,
) -> Result<bool, TransferError> {
    let row = client
        .query(
            "SELECT t.name FROM sys.tables t \
             INNER JOIN sys.schemas s ON t.schema_id = s.schema_id \
             WHERE s.name = @P1 AND t.name = @P2",
            &[&table.schema, &table.name],
        )
        .await?
        .into_row()
        .await?;
    Ok(row.is_some())
}

// --- Schema Read ---

const COLUMN_METADATA_SQL: &str = "SELECT COLUMN_NAME, DATA_TYPE, \
     CAST(CHARACTER_MAXIMUM_LENGTH AS INT) AS CHAR_LEN, \
     CAST(NUMERIC_PRECISION AS INT) AS NUM_PREC, \
     CAST(NUMERIC_SCALE AS INT) AS NUM_SCALE, \
     IS_NULLABLE \
     FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = @P1 AND TABLE_NAME = @P2 \
     ORDER BY ORDINAL_POSITION";

/// Reads the column layout of a table in ordinal order.
///
/// Fails with a validation error when the catalog reports no columns,
/// which is how a vanished or permission-hidden table shows up here.
pub async fn read_schema(
    client: &mut MssqlClient,
    table: &TableIdentifier,
) -> Result<Vec<ColumnDef>, TransferError> {
    let rows = client
        .query(COLUMN_METADATA_SQL, &[&table.schema, &table.name])
        .await?
        .into_first_result()
        .await?;

    if rows.is_empty() {
        return Err(TransferError::Validation(format!(
            "Could not read the schema of table '{}'",
            table
        )));
    }

    rows.iter().map(column_from_row).collect()
}

fn column_from_row(row: &Row) -> Result<ColumnDef, TransferError> {
    let name: &str = row.try_get(0)?.ok_or_else(|| missing_metadata("COLUMN_NAME"))?;
    let data_type: &str = row.try_get(1)?.ok_or_else(|| missing_metadata("DATA_TYPE"))?;
    let char_length: Option<i32> = row.try_get(2)?;
    let precision: Option<i32> = row.try_get(3)?;
    let scale: Option<i32> = row.try_get(4)?;
    let is_nullable: &str = row.try_get(5)?.ok_or_else(|| missing_metadata("IS_NULLABLE"))?;

    Ok(ColumnDef {
        name: name.to_string(),
        data_type: data_type.to_string(),
        char_length: char_length.map(CharLength::from_catalog),
        numeric_precision: precision.map(|value| value as u8),
        numeric_scale: scale.map(|value| value as u8),
        is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
    })
}

fn missing_metadata(column: &str) -> TransferError {
    TransferError::Unexpected(format!(
        "INFORMATION_SCHEMA.COLUMNS returned a null {}",
        column
    ))
}

// --- Row Count ---

pub async fn count_rows(
    client: &mut MssqlClient,
    table: &TableIdentifier,
) -> Result<u64, TransferError> {
    let sql = format!("SELECT COUNT_BIG(*) FROM {}", table.qualified());
    let row = client
        .query(sql, &[])
        .await?
        .into_row()
        .await?
        .ok_or_else(|| TransferError::Unexpected("row count query returned no row".to_string()))?;
    let count: i64 = row.try_get(0)?.ok_or_else(|| {
        TransferError::Unexpected("row count query returned a null value".to_string())
    })?;
    Ok(count as u64)
}
