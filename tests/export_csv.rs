//! Tests for streaming query results into CSV.

use csv::Writer;
use futures::stream;
use tempfile::TempDir;

use query_export::database::{DbConnection, DecodeCells, RowValue};
use query_export::export::{stream, write_header, write_rows};
use query_export::{run_export, ExportErrorKind, ExportRequest};

#[path = "helpers.rs"]
mod helpers;

use helpers::{create_test_database, insert_people, insert_person, read_records, sqlite_config};

async fn open(db_path: &std::path::Path) -> DbConnection {
    let config = sqlite_config(db_path, db_path);
    DbConnection::open(&config.database)
        .await
        .expect("Failed to open export connection")
}

async fn export_to_string(db_path: &std::path::Path, query: &str) -> String {
    let mut conn = open(db_path).await;
    let mut sink = Writer::from_writer(Vec::new());
    stream(&mut conn, query, &mut sink)
        .await
        .expect("export should succeed");
    conn.close().await;
    String::from_utf8(sink.into_inner().expect("flush")).expect("utf-8 output")
}

#[tokio::test]
async fn test_export_has_header_plus_one_record_per_row() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, pool) = create_test_database(temp_dir.path()).await;
    insert_people(&pool, 25).await;

    let mut conn = open(&db_path).await;
    let out_path = temp_dir.path().join("people.csv");
    let mut sink = Writer::from_path(&out_path).expect("Failed to create output");
    let summary = stream(
        &mut conn,
        "SELECT id, name, score, avatar FROM people ORDER BY id",
        &mut sink,
    )
    .await
    .expect("export should succeed");
    drop(sink);

    assert_eq!(summary.columns, vec!["id", "name", "score", "avatar"]);
    assert_eq!(summary.rows_written, 25);
    assert_eq!(summary.rows_skipped, 0);

    let records = read_records(&out_path);
    assert_eq!(records.len(), 26, "header plus 25 data rows");
    assert!(records.iter().all(|r| r.len() == 4));
    assert_eq!(
        records[0],
        vec![
            b"id".to_vec(),
            b"name".to_vec(),
            b"score".to_vec(),
            b"avatar".to_vec()
        ]
    );
    assert_eq!(
        records[1],
        vec![
            b"1".to_vec(),
            b"person 1".to_vec(),
            b"0.5".to_vec(),
            b"NULL".to_vec()
        ]
    );
    assert_eq!(records[25][0], b"25".to_vec());
}

#[tokio::test]
async fn test_null_cells_render_as_null_text() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, pool) = create_test_database(temp_dir.path()).await;
    insert_person(&pool, 1, None, None, None).await;

    let output = export_to_string(&db_path, "SELECT id, name, score, avatar FROM people").await;
    assert_eq!(output, "id,name,score,avatar\n1,NULL,NULL,NULL\n");
}

#[tokio::test]
async fn test_binary_and_text_cells_are_written_verbatim() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, pool) = create_test_database(temp_dir.path()).await;
    let avatar: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, b',', b'"', b'\n', 0xff];
    let name = "O'Brien, \"Pat\"\nsecond line";
    insert_person(&pool, 1, Some(name), Some(1.25), Some(avatar)).await;

    let mut conn = open(&db_path).await;
    let out_path = temp_dir.path().join("binary.csv");
    let mut sink = Writer::from_path(&out_path).expect("Failed to create output");
    stream(&mut conn, "SELECT name, avatar FROM people", &mut sink)
        .await
        .expect("export should succeed");
    drop(sink);

    let records = read_records(&out_path);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1][0], name.as_bytes());
    assert_eq!(records[1][1], avatar);
}

#[tokio::test]
async fn test_empty_result_still_writes_header() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, _pool) = create_test_database(temp_dir.path()).await;

    let output = export_to_string(&db_path, "SELECT id, name FROM people").await;
    assert_eq!(output, "id,name\n");
}

#[tokio::test]
async fn test_select_literal() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, _pool) = create_test_database(temp_dir.path()).await;

    let output = export_to_string(&db_path, "SELECT 1").await;
    assert_eq!(output, "1\n1\n");
}

#[tokio::test]
async fn test_unknown_table_is_query_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, _pool) = create_test_database(temp_dir.path()).await;

    let mut conn = open(&db_path).await;
    let mut sink = Writer::from_writer(Vec::new());
    let err = stream(&mut conn, "SELECT * FROM no_such_table", &mut sink)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::QueryError);
    assert!(err.to_string().contains("no such table"));
    assert!(sink.into_inner().expect("flush").is_empty());
}

#[tokio::test]
async fn test_cursor_failure_is_row_iteration_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, _pool) = create_test_database(temp_dir.path()).await;

    // abs() of the smallest integer overflows while the statement is stepped
    let mut conn = open(&db_path).await;
    let mut sink = Writer::from_writer(Vec::new());
    let err = stream(
        &mut conn,
        "SELECT 1 AS a UNION ALL SELECT abs(-9223372036854775808)",
        &mut sink,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::RowIterationError);
    let output = String::from_utf8(sink.into_inner().expect("flush")).unwrap();
    assert!(output.starts_with("a\n"), "header is written before the failure");
}

#[tokio::test]
async fn test_repeated_exports_are_byte_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let (db_path, pool) = create_test_database(temp_dir.path()).await;
    insert_people(&pool, 50).await;
    insert_person(&pool, 51, None, Some(-3.75), Some(b"\x00\x01")).await;
    let config = sqlite_config(&db_path, &temp_dir.path().join("exports"));

    let mut paths = Vec::new();
    for name in ["first.csv", "second.csv"] {
        let request = ExportRequest {
            query: "SELECT * FROM people ORDER BY id".to_string(),
            output_file: Some(name.to_string()),
        };
        let result = run_export(&config, &request)
            .await
            .expect("export should succeed");
        assert_eq!(result.rows_written, 51);
        paths.push(result.file_path);
    }

    let first = std::fs::read(&paths[0]).expect("read first export");
    let second = std::fs::read(&paths[1]).expect("read second export");
    assert_ne!(paths[0], paths[1]);
    assert_eq!(first, second);
}

/// Row with one column whose decoding fails when `readable` is false.
struct ScannedRow {
    id: i64,
    readable: bool,
}

impl DecodeCells for ScannedRow {
    fn cell_count(&self) -> usize {
        2
    }

    fn decode_cell(&self, index: usize) -> Result<RowValue, sqlx::Error> {
        match index {
            0 => Ok(RowValue::Int(self.id)),
            _ if self.readable => Ok(RowValue::Bytes(format!("row {}", self.id).into_bytes())),
            _ => Err(sqlx::Error::Decode("invalid utf-8 sequence".into())),
        }
    }
}

#[tokio::test]
async fn test_one_unreadable_row_in_a_thousand_is_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_path = temp_dir.path().join("thousand.csv");
    let columns = vec!["id".to_string(), "label".to_string()];
    let rows: Vec<Result<ScannedRow, sqlx::Error>> = (1..=1000)
        .map(|id| {
            Ok(ScannedRow {
                id,
                readable: id != 500,
            })
        })
        .collect();

    let mut sink = Writer::from_path(&out_path).expect("Failed to create output");
    write_header(&mut sink, &columns).expect("header");
    let summary = write_rows(columns, stream::iter(rows), &mut sink)
        .await
        .expect("scan failures do not fail the export");
    drop(sink);

    assert_eq!(summary.rows_written, 999);
    assert_eq!(summary.rows_skipped, 1);

    let contents = std::fs::read_to_string(&out_path).expect("read export");
    assert_eq!(contents.lines().count(), 1000);
    assert!(!contents.contains("row 500"));
    assert!(contents.contains("499,row 499\n501,row 501\n"));
}
