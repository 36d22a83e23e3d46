//! Query result streaming into CSV.
//!
//! Rows are pulled from the cursor one at a time and written straight to the
//! CSV sink, so memory use does not depend on the size of the result set.
//! The sink sees, in order: the header (column names), then one record per
//! successfully decoded row, then a flush.
//!
//! A row whose cells cannot be decoded is logged and skipped. A failure of the
//! cursor itself ends the export with [`ExportError::RowIteration`]; rows
//! accepted before that point stay in the file.

use std::io::Write;

use csv::Writer;
use futures::{Stream, TryStreamExt};
use log::{debug, error, warn};
use sqlx::{Column, Executor, Statement};
use thiserror::Error;

use crate::database::{DbConnection, DecodeCells, RowValue};
use crate::error_handling::ExportError;
use crate::export::types::StreamSummary;

#[derive(Debug, Error)]
enum ScanError {
    #[error("row has {actual} cells, expected {expected}")]
    Width { expected: usize, actual: usize },

    #[error(transparent)]
    Decode(#[from] sqlx::Error),
}

/// Executes `query` on `connection` and streams the result into `sink`.
///
/// The column list comes from the prepared statement, so the header is written
/// even when the query returns no rows.
pub async fn stream<W: Write + Send>(
    connection: &mut DbConnection,
    query: &str,
    sink: &mut Writer<W>,
) -> Result<StreamSummary, ExportError> {
    match connection {
        DbConnection::MySql(conn) => {
            let statement = (&mut *conn).prepare(query).await.map_err(query_error)?;
            let columns = column_names(statement.columns());
            write_header(sink, &columns)?;
            write_rows(columns, statement.query().fetch(&mut *conn), sink).await
        }
        DbConnection::Sqlite(conn) => {
            let statement = (&mut *conn).prepare(query).await.map_err(query_error)?;
            let columns = column_names(statement.columns());
            write_header(sink, &columns)?;
            write_rows(columns, statement.query().fetch(&mut *conn), sink).await
        }
    }
}

/// Writes the header record.
pub fn write_header<W: Write>(sink: &mut Writer<W>, columns: &[String]) -> Result<(), ExportError> {
    debug!("Writing header with {} columns", columns.len());
    sink.write_record(columns).map_err(write_error)
}

/// Drains `rows` into `sink` after the header has been written.
///
/// Each row is decoded cell by cell; a decode failure or a row whose width does
/// not match `columns` skips that row. The sink is flushed before returning,
/// on the cursor-failure path as well.
pub async fn write_rows<R, S, W>(
    columns: Vec<String>,
    mut rows: S,
    sink: &mut Writer<W>,
) -> Result<StreamSummary, ExportError>
where
    R: DecodeCells,
    S: Stream<Item = Result<R, sqlx::Error>> + Unpin,
    W: Write,
{
    let width = columns.len();
    let mut summary = StreamSummary::new(columns);
    let mut cells: Vec<RowValue> = Vec::with_capacity(width);

    loop {
        let row = match rows.try_next().await {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => {
                error!(
                    "Cursor failed after {} rows: {e}",
                    summary.rows_written + summary.rows_skipped
                );
                if let Err(flush_err) = sink.flush() {
                    warn!("Failed to flush partial export: {flush_err}");
                }
                return Err(ExportError::RowIteration(e.to_string()));
            }
        };

        let position = summary.rows_written + summary.rows_skipped + 1;
        if let Err(e) = scan_row(&row, width, &mut cells) {
            warn!("Error scanning row {position}: {e}; row skipped");
            summary.rows_skipped += 1;
            continue;
        }

        sink.write_record(cells.iter().map(RowValue::to_field))
            .map_err(write_error)?;
        summary.rows_written += 1;
    }

    sink.flush()
        .map_err(|e| ExportError::FileWrite(e.to_string()))?;
    Ok(summary)
}

fn scan_row<R: DecodeCells>(
    row: &R,
    width: usize,
    cells: &mut Vec<RowValue>,
) -> Result<(), ScanError> {
    let actual = row.cell_count();
    if actual != width {
        return Err(ScanError::Width {
            expected: width,
            actual,
        });
    }
    cells.clear();
    for index in 0..width {
        cells.push(row.decode_cell(index)?);
    }
    Ok(())
}

fn column_names<C: Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

fn query_error(e: sqlx::Error) -> ExportError {
    error!("Query execution failed: {e}");
    ExportError::Query(e.to_string())
}

fn write_error(e: csv::Error) -> ExportError {
    error!("Failed to write output file: {e}");
    ExportError::FileWrite(e.to_string())
}
