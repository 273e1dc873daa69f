use futures::TryStreamExt;
use tiberius::{QueryItem, TokenRow};

use crate::error::TransferError;
use crate::models::{TableIdentifier, TransferOutcome, TransferRequest};
use crate::mssql::{self, MssqlClient};
use crate::schema;

/// Copies one table between the two servers named by the request.
///
/// The run works through fixed stages: parse both table identifiers,
/// open the source connection, verify the source database and table,
/// read the source schema, open the target connection, verify the
/// target database, then either verify that an existing target table
/// matches the source column for column or create it, and finally copy
/// every row inside a single target-side transaction. Both connections
/// close on every exit path.
///
/// The returned row count is measured just before the copy starts, so
/// rows written to the source while the copy runs may or may not be
/// included. Each run appends the full source table: running the same
/// transfer twice leaves the target with every row twice.
///
/// Rows travel over the TDS bulk-load path. Nullability and unique keys
/// apply while the load runs; CHECK and foreign key constraints on the
/// target are revalidated before commit, so a violating row fails the
/// run and rolls it back. Triggers on the target do not fire during the
/// copy. That trigger gap is the one deviation from ordinary row-by-row
/// insert semantics.
pub async fn run_transfer(request: &TransferRequest) -> Result<TransferOutcome, TransferError> {
    let source_table = TableIdentifier::parse(request.source_table());
    let target_table = TableIdentifier::parse(request.target_table());

    let mut source = mssql::connect(request.source_connection()).await?;
    if !mssql::database_exists(&mut source, request.source_database()).await? {
        return Err(TransferError::Validation(format!(
            "Source database '{}' does not exist",
            request.source_database()
        )));
    }
    mssql::use_database(&mut source, request.source_database()).await?;

    if !mssql::table_exists(&mut source, &source_table).await? {
        return Err(TransferError::Validation(format!(
            "Source table '{}' does not exist in database '{}'",
            source_table,
            request.source_database()
        )));
    }
    let source_schema = mssql::read_schema(&mut source, &source_table).await?;
    log::info!(
        "source table {} has {} columns",
        source_table,
        source_schema.len()
    );

    let mut target = mssql::connect(request.target_connection()).await?;
    if !mssql::database_exists(&mut target, request.target_database()).await? {
        return Err(TransferError::Validation(format!(
            "Target database '{}' does not exist",
            request.target_database()
        )));
    }
    mssql::use_database(&mut target, request.target_database()).await?;

    let target_created = if mssql::table_exists(&mut target, &target_table).await? {
        let target_schema = mssql::read_schema(&mut target, &target_table).await?;
        if !schema::schemas_match(&source_schema, &target_schema) {
            return Err(TransferError::Validation(format!(
                "Target table '{}' already exists with a different schema than source table '{}'; choose another target table",
                target_table, source_table
            )));
        }
        false
    } else {
        let ddl = schema::build_create_table(&target_table, &source_schema);
        log::info!("creating target table {}", target_table);
        mssql::run_statement(&mut target, &ddl).await?;
        true
    };

    let rows_copied = copy_rows(&mut source, &source_table, &mut target, &target_table).await?;
    log::info!(
        "copied {} rows from {} into {}",
        rows_copied,
        source_table,
        target_table
    );

    Ok(TransferOutcome {
        rows_copied,
        target_created,
    })
}

/// Streams every source row into the target inside one transaction.
///
/// The transaction wraps the data load and the constraint revalidation
/// that follows it. Creating the target table happens earlier and is
/// not undone by a rollback; a failed first run leaves an empty target
/// table behind.
async fn copy_rows(
    source: &mut MssqlClient,
    source_table: &TableIdentifier,
    target: &mut MssqlClient,
    target_table: &TableIdentifier,
) -> Result<u64, TransferError> {
    let total = mssql::count_rows(source, source_table).await?;

    mssql::run_statement(target, "SET TRANSACTION ISOLATION LEVEL READ COMMITTED").await?;
    mssql::run_statement(target, "BEGIN TRAN").await?;

    match stream_rows(source, source_table, target, target_table).await {
        Ok(sent) => {
            mssql::run_statement(target, "COMMIT TRAN").await?;
            log::debug!(
                "bulk load committed ({} rows sent, {} counted beforehand)",
                sent,
                total
            );
            Ok(total)
        }
        Err(err) => {
            // A failed bulk load can leave @@TRANCOUNT already at zero.
            if let Err(rollback_err) =
                mssql::run_statement(target, "IF @@TRANCOUNT > 0 ROLLBACK TRAN").await
            {
                log::warn!("rollback after failed copy also failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn stream_rows(
    source: &mut MssqlClient,
    source_table: &TableIdentifier,
    target: &mut MssqlClient,
    target_table: &TableIdentifier,
) -> Result<u64, TransferError> {
    let select = format!("SELECT * FROM {}", source_table.qualified());
    let mut rows = source.query(select, &[]).await?;

    let destination = target_table.qualified();
    let mut load = target.bulk_insert(&destination).await?;

    let mut sent = 0u64;
    while let Some(item) = rows.try_next().await? {
        if let QueryItem::Row(row) = item {
            let mut token_row = TokenRow::new();
            for value in row.into_iter() {
                token_row.push(value);
            }
            load.send(token_row).await?;
            sent += 1;
        }
    }

    let result = load.finalize().await?;
    log::debug!("server acknowledged {} bulk rows", result.total());

    // The bulk request loads rows without applying CHECK or foreign key
    // constraints; revalidating the target inside the transaction turns
    // a violating row into a failed, rolled-back transfer.
    let validate = format!("ALTER TABLE {} WITH CHECK CHECK CONSTRAINT ALL", destination);
    mssql::run_statement(target, &validate).await?;

    Ok(sent)
}
