//! One-shot table replication between two SQL Server instances.
//!
//! A transfer copies a single table from a source server and database to
//! a target server and database over two Tiberius connections. The target
//! table is created from the source's column layout when it is missing;
//! when it already exists its columns must match the source position for
//! position, with no coercion. Rows move through the TDS bulk load path
//! inside one target-side transaction, so a failed copy leaves the target
//! table's contents untouched. Check and foreign key constraints on the
//! target are revalidated before commit; triggers do not fire during the
//! copy.
//!
//! Two behaviors worth knowing up front: the reported row count is taken
//! just before the copy starts, so writes racing the copy may not be
//! reflected in it, and every run appends the complete source table, so
//! re-running a finished transfer duplicates the target's rows.
//!
//! ```no_run
//! use tableferry::{run_transfer, TransferRequest};
//!
//! # async fn demo() -> Result<(), tableferry::TransferError> {
//! let request = TransferRequest::new(
//!     "Server=tcp:10.0.0.5,1433;User Id=app;Password=secret;TrustServerCertificate=true",
//!     "SalesDb",
//!     "dbo.Customers",
//!     "Server=tcp:10.0.0.9,1433;User Id=app;Password=secret;TrustServerCertificate=true",
//!     "ReportingDb",
//!     "dbo.Customers",
//! )?;
//! let outcome = run_transfer(&request).await?;
//! println!("copied {} rows", outcome.rows_copied);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod schema;
pub mod sql_utils;

mod mssql;

pub use engine::run_transfer;
pub use error::TransferError;
pub use models::{CharLength, ColumnDef, TableIdentifier, TransferOutcome, TransferRequest};
pub use schema::{build_create_table, schemas_match};
