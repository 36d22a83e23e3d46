// Shared test helpers for database setup and server startup.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use query_export::config::{DatabaseConfig, DbDriver};
use query_export::{router, Config};

/// Creates a SQLite database file in `dir` with a `people` table and returns its path
/// together with a pool for inserting test data.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_database(dir: &Path) -> (PathBuf, SqlitePool) {
    let db_path = dir.join("test.db");
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to create test database");

    sqlx::query(
        "CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name TEXT,
            score REAL,
            avatar BLOB
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create people table");

    (db_path, pool)
}

/// Inserts one person and returns nothing; `None` values are stored as NULL.
#[allow(dead_code)] // Used by other test files
pub async fn insert_person(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    score: Option<f64>,
    avatar: Option<&[u8]>,
) {
    sqlx::query("INSERT INTO people (id, name, score, avatar) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(score)
        .bind(avatar)
        .execute(pool)
        .await
        .expect("Failed to insert test person");
}

/// Inserts `count` people with ids starting at 1.
#[allow(dead_code)] // Used by other test files
pub async fn insert_people(pool: &SqlitePool, count: i64) {
    for id in 1..=count {
        let name = format!("person {}", id);
        insert_person(pool, id, Some(&name), Some(id as f64 / 2.0), None).await;
    }
}

/// Configuration pointing at a SQLite file, exporting into `export_dir`.
#[allow(dead_code)] // Used by other test files
pub fn sqlite_config(db_path: &Path, export_dir: &Path) -> Config {
    Config {
        database: DatabaseConfig {
            driver: DbDriver::Sqlite,
            database: db_path.to_string_lossy().into_owned(),
            ..Default::default()
        },
        export_dir: export_dir.to_path_buf(),
        ..Default::default()
    }
}

/// Serves the export router on an ephemeral loopback port.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_server(config: Config) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    let app = router(Arc::new(config));
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server failed");
    });
    addr
}

/// Reads a CSV file into raw byte records (header included).
#[allow(dead_code)] // Used by other test files
pub fn read_records(path: &Path) -> Vec<Vec<Vec<u8>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open export");
    reader
        .byte_records()
        .map(|record| {
            record
                .expect("Failed to read record")
                .iter()
                .map(|field| field.to_vec())
                .collect()
        })
        .collect()
}
