//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//! - Provide the destructive schema re-initialization path.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - `reset_db` leaves no domain table behind before recreating them.

use super::migrations::{apply_migrations, ALL_TABLES};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");
    let conn = Connection::open(path);
    finish_open(conn, "file", started_at)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory();
    finish_open(conn, "memory", started_at)
}

/// Drops every domain table and recreates the schema from scratch.
///
/// Destructive by design: all persisted rows are lost. Foreign key
/// enforcement is suspended only for the drop batch so tables can go in
/// one pass, then re-enabled before the schema is rebuilt.
pub fn reset_db(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();
    info!("event=db_reset module=db status=start");

    let result = drop_all_tables(conn).and_then(|()| apply_migrations(conn));
    match result {
        Ok(()) => {
            info!(
                "event=db_reset module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_reset module=db status=error duration_ms={} error_code=db_reset_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn finish_open(
    conn: rusqlite::Result<Connection>,
    mode: &'static str,
    started_at: Instant,
) -> DbResult<Connection> {
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

fn drop_all_tables(conn: &mut Connection) -> DbResult<()> {
    let mut batch = String::from("PRAGMA foreign_keys = OFF;\n");
    for table in ALL_TABLES {
        batch.push_str(&format!("DROP TABLE IF EXISTS {table};\n"));
    }
    batch.push_str("PRAGMA user_version = 0;\nPRAGMA foreign_keys = ON;");
    conn.execute_batch(&batch)?;
    Ok(())
}
