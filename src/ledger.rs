//! SQLite-backed ledger of benchmark runs: one row per pipeline invocation,
//! queried afterwards for the aggregate report.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{BenchError, Result};

/// One pipeline invocation as recorded in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub run_id: String,
    pub run_type: String,
    pub invoice_id: String,
    pub ts_start: DateTime<Utc>,
    pub ts_end: DateTime<Utc>,
    pub cycle_time_s: f64,
    pub cost_usd: f64,
    pub status: String,
    pub error_details: Option<String>,
    pub error_type: Option<String>,
    pub merkle_root: Option<String>,
}

pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// Opens (creating if needed) the ledger database at `path`.
    pub fn open_at_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory ledger, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn log_run(&self, run: &RunRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO runs (run_id, run_type, invoice_id, ts_start, ts_end, cycle_time_s, cost_usd, status, error_details, error_type, merkle_root)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                run.run_id,
                run.run_type,
                run.invoice_id,
                run.ts_start.to_rfc3339(),
                run.ts_end.to_rfc3339(),
                run.cycle_time_s,
                run.cost_usd,
                run.status,
                run.error_details,
                run.error_type,
                run.merkle_root,
            ],
        )?;
        Ok(())
    }

    pub fn fetch_runs(&self) -> Result<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, run_type, invoice_id, ts_start, ts_end, cycle_time_s, cost_usd, status, error_details, error_type, merkle_root
             FROM runs ORDER BY ts_start, run_id",
        )?;
        let mut rows = stmt.query([])?;

        let mut runs = Vec::new();
        while let Some(row) = rows.next()? {
            let ts_start: String = row.get(3)?;
            let ts_end: String = row.get(4)?;
            runs.push(RunRecord {
                run_id: row.get(0)?,
                run_type: row.get(1)?,
                invoice_id: row.get(2)?,
                ts_start: parse_timestamp(&ts_start)?,
                ts_end: parse_timestamp(&ts_end)?,
                cycle_time_s: row.get(5)?,
                cost_usd: row.get(6)?,
                status: row.get(7)?,
                error_details: row.get(8)?,
                error_type: row.get(9)?,
                merkle_root: row.get(10)?,
            });
        }
        Ok(runs)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM runs", [])?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS runs (
            run_id        TEXT PRIMARY KEY,
            run_type      TEXT NOT NULL,
            invoice_id    TEXT NOT NULL,
            ts_start      TEXT NOT NULL,
            ts_end        TEXT NOT NULL,
            cycle_time_s  REAL NOT NULL,
            cost_usd      REAL NOT NULL,
            status        TEXT NOT NULL,
            error_details TEXT,
            error_type    TEXT,
            merkle_root   TEXT
        );
        "#,
    )?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| BenchError::InvalidRecord(format!("bad ledger timestamp `{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run(run_id: &str, run_type: &str) -> RunRecord {
        let now = Utc::now();
        RunRecord {
            run_id: run_id.to_string(),
            run_type: run_type.to_string(),
            invoice_id: "inv-1".to_string(),
            ts_start: now,
            ts_end: now,
            cycle_time_s: 720.0,
            cost_usd: 9.0,
            status: "SUCCESS".to_string(),
            error_details: None,
            error_type: None,
            merkle_root: Some("abc123".to_string()),
        }
    }

    #[test]
    fn round_trips_runs_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open_at_path(dir.path().join("runs.db")).unwrap();

        ledger.log_run(&sample_run("a", "baseline")).unwrap();
        ledger.log_run(&sample_run("b", "kognitos")).unwrap();

        let runs = ledger.fetch_runs().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].invoice_id, "inv-1");
        assert_eq!(runs[1].merkle_root.as_deref(), Some("abc123"));
    }

    #[test]
    fn preserves_nullable_failure_columns() {
        let ledger = Ledger::open_in_memory().unwrap();
        let mut run = sample_run("a", "baseline");
        run.status = "FAILURE".to_string();
        run.error_details = Some("Manual data entry error: incorrect total.".to_string());
        run.error_type = Some("data_quality".to_string());
        run.merkle_root = None;
        ledger.log_run(&run).unwrap();

        let fetched = ledger.fetch_runs().unwrap();
        assert_eq!(fetched[0].error_type.as_deref(), Some("data_quality"));
        assert_eq!(fetched[0].merkle_root, None);
    }

    #[test]
    fn clear_empties_the_table() {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.log_run(&sample_run("a", "baseline")).unwrap();
        ledger.clear().unwrap();
        assert!(ledger.fetch_runs().unwrap().is_empty());
    }
}
