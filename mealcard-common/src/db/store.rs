//! Student record store
//!
//! A handle over the `students` table. Records are keyed by admission number
//! and are only ever inserted (never overwritten) and flipped to processed.

use crate::db::init::{init_database, init_memory_database};
use crate::db::models::{MergeSummary, StoreCounts, StudentRecord};
use crate::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Scoped handle to the persistent record store
///
/// Open at the start of a run and [`close`](StudentStore::close) at the end,
/// on error paths too, so the database file is not left locked.
pub struct StudentStore {
    pool: SqlitePool,
}

impl StudentStore {
    /// Open or create the store at `db_path` and ensure the schema exists
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path).await?;
        Ok(Self { pool })
    }

    /// Fresh store that lives only as long as the handle
    pub async fn open_in_memory() -> Result<Self> {
        let pool = init_memory_database().await?;
        Ok(Self { pool })
    }

    /// Underlying pool, for read-only inspection
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Release all connections
    pub async fn close(self) {
        self.pool.close().await;
        debug!("Record store closed");
    }

    /// Insert each record whose admission number is not yet stored
    ///
    /// Existing rows (including their processed flag) are left untouched.
    /// The batch is one transaction: if any insert fails nothing is applied and
    /// the error names the admission number that failed. A blank admission
    /// number rejects the batch before anything is written.
    pub async fn merge_insert(&self, records: &[StudentRecord]) -> Result<MergeSummary> {
        if let Some(blank) = records.iter().find(|r| r.admission_number.trim().is_empty()) {
            return Err(Error::InvalidInput(format!(
                "blank admission number for student '{}'",
                blank.name
            )));
        }

        let mut summary = MergeSummary::default();
        let mut tx = self.pool.begin().await?;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO students (ADMNO, NAME, GRADE, STREAM)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&record.admission_number)
            .bind(&record.name)
            .bind(&record.grade)
            .bind(&record.stream)
            .execute(&mut *tx)
            .await
            .map_err(|source| Error::MergeRejected {
                admission_number: record.admission_number.clone(),
                source,
            })?;

            if result.rows_affected() == 0 {
                summary.skipped += 1;
            } else {
                summary.inserted += 1;
            }
        }

        tx.commit().await?;

        info!(
            "Merged roster: {} new, {} already known",
            summary.inserted, summary.skipped
        );
        Ok(summary)
    }

    /// All records without a card yet, in insertion order
    pub async fn unprocessed(&self) -> Result<Vec<StudentRecord>> {
        let rows: Vec<(String, Option<String>, Option<String>, Option<String>, i64)> =
            sqlx::query_as(
                r#"
                SELECT ADMNO, NAME, GRADE, STREAM, PROCESSED
                FROM students
                WHERE PROCESSED = 0
                ORDER BY rowid
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(admission_number, name, grade, stream, processed)| StudentRecord {
                admission_number,
                name: name.unwrap_or_default(),
                grade: grade.unwrap_or_default(),
                stream: stream.unwrap_or_default(),
                processed: processed != 0,
            })
            .collect())
    }

    /// Flag the given admission numbers as processed
    ///
    /// Unknown admission numbers are ignored. Returns the number of rows changed.
    pub async fn mark_processed<I, S>(&self, admission_numbers: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = 0;
        let mut tx = self.pool.begin().await?;

        for admission_number in admission_numbers {
            let result = sqlx::query(
                r#"
                UPDATE students SET PROCESSED = 1
                WHERE ADMNO = ? AND PROCESSED = 0
                "#,
            )
            .bind(admission_number.as_ref())
            .execute(&mut *tx)
            .await?;
            changed += result.rows_affected();
        }

        tx.commit().await?;

        info!("Marked {} student(s) as processed", changed);
        Ok(changed)
    }

    /// Every stored admission number
    pub async fn admission_numbers(&self) -> Result<Vec<String>> {
        let numbers: Vec<String> = sqlx::query_scalar("SELECT ADMNO FROM students ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(numbers)
    }

    /// Row counts by processed state
    pub async fn counts(&self) -> Result<StoreCounts> {
        let (total, processed): (i64, Option<i64>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(CASE WHEN PROCESSED != 0 THEN 1 ELSE 0 END) FROM students",
        )
        .fetch_one(&self.pool)
        .await?;

        let processed = processed.unwrap_or(0);
        Ok(StoreCounts {
            total,
            processed,
            unprocessed: total - processed,
        })
    }
}
