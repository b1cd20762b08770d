use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::model::series::DailyBar;
use crate::source::PriceSource;

/// Daily price/volume store backed by a single SQLite table.
#[derive(Debug)]
pub struct SqlitePriceStore {
    conn: Connection,
}

impl SqlitePriceStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS daily_bars (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                price REAL NOT NULL,
                volume REAL,
                updated_at_ms INTEGER NOT NULL,
                PRIMARY KEY(symbol, date)
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Insert or overwrite bars for `symbol`; returns the number of rows written.
    pub fn upsert_bars(&mut self, symbol: &str, bars: &[DailyBar]) -> Result<usize> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let tx = self.conn.transaction()?;
        let mut written = 0;
        for bar in bars {
            written += tx.execute(
                r#"
                INSERT INTO daily_bars (symbol, date, price, volume, updated_at_ms)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(symbol, date) DO UPDATE SET
                    price = excluded.price,
                    volume = excluded.volume,
                    updated_at_ms = excluded.updated_at_ms
                "#,
                params![symbol, bar.date, bar.price, bar.volume, now_ms],
            )?;
        }
        tx.commit()?;
        tracing::debug!(symbol, rows = written, "Stored daily bars");
        Ok(written)
    }

    pub fn symbols(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT symbol FROM daily_bars ORDER BY symbol ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn load_column(&self, symbol: &str, column: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let sql = format!(
            "SELECT date, {col} FROM daily_bars WHERE symbol = ?1 AND {col} IS NOT NULL ORDER BY date ASC",
            col = column
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([symbol], |row| {
            Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, f64>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.with_context(|| format!("bad {} row for {}", column, symbol))?);
        }
        Ok(out)
    }
}

impl PriceSource for SqlitePriceStore {
    fn price_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        self.load_column(symbol, "price")
    }

    fn volume_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        self.load_column(symbol, "volume")
    }
}
