//! SQLite backend.
//!
//! `rusqlite` is synchronous, so the connection lives behind a mutex and every
//! operation runs on the blocking thread pool. A job handed to the pool runs
//! to completion even if the awaiting future is dropped, so a transaction is
//! always committed or rolled back as a whole.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{ffi, Connection, OptionalExtension};

use super::row::{timestamp_from_micros, timestamp_to_micros, TextRow};
use super::schema::Statements;
use super::traits::{echo_sql, BackendError, BackendResult, TextBackend};
use super::url::SqliteLocation;

type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// SQLite storage backend (file or in-memory).
pub struct SqliteBackend {
    conn: SharedConnection,
    statements: Arc<Statements>,
    echo: bool,
}

impl SqliteBackend {
    /// Open the database at `location`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` if the file cannot be opened.
    pub async fn open(
        location: SqliteLocation,
        statements: Statements,
        echo: bool,
    ) -> BackendResult<Self> {
        let conn = tokio::task::spawn_blocking(move || match &location {
            SqliteLocation::Memory => Connection::open_in_memory(),
            SqliteLocation::File(path) => Connection::open(path),
        })
        .await
        .map_err(|e| BackendError::Unavailable(format!("SQLite open task failed: {}", e)))?
        .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            statements: Arc::new(statements),
            echo,
        })
    }

    /// Run `op` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: F) -> BackendResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &Statements, bool) -> BackendResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let statements = Arc::clone(&self.statements);
        let echo = self.echo;

        tokio::task::spawn_blocking(move || {
            let mut guard = lock_conn(&conn)?;
            let conn = guard
                .as_mut()
                .ok_or_else(|| BackendError::Transient("SQLite connection closed".to_string()))?;
            op(conn, &statements, echo)
        })
        .await
        .map_err(|e| BackendError::Transient(format!("SQLite task failed: {}", e)))?
    }
}

fn lock_conn(conn: &SharedConnection) -> BackendResult<MutexGuard<'_, Option<Connection>>> {
    conn.lock()
        .map_err(|_| BackendError::Transient("SQLite connection poisoned".to_string()))
}

/// Translate a driver error. Only key constraints count as duplicates.
fn classify(err: rusqlite::Error) -> BackendError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            BackendError::Duplicate
        }
        _ => BackendError::Transient(err.to_string()),
    }
}

/// Run a single-parameter DELETE in its own transaction.
fn delete_where<P: rusqlite::ToSql>(
    conn: &mut Connection,
    sql: &str,
    echo: bool,
    param: P,
) -> BackendResult<u64> {
    echo_sql(echo, sql);
    let tx = conn.transaction().map_err(classify)?;
    let affected = tx.execute(sql, [param]).map_err(classify)?;

    if affected == 0 {
        tx.rollback().map_err(classify)?;
        return Ok(0);
    }
    tx.commit().map_err(classify)?;
    Ok(affected as u64)
}

#[async_trait]
impl TextBackend for SqliteBackend {
    async fn create_schema(&self) -> BackendResult<()> {
        self.with_conn(|conn, statements, echo| {
            let tx = conn
                .transaction()
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
            for sql in &statements.create {
                echo_sql(echo, sql);
                tx.execute_batch(sql)
                    .map_err(|e| BackendError::Unavailable(e.to_string()))?;
            }
            tx.commit()
                .map_err(|e| BackendError::Unavailable(e.to_string()))
        })
        .await
    }

    async fn insert(&self, row: TextRow) -> BackendResult<()> {
        self.with_conn(move |conn, statements, echo| {
            echo_sql(echo, &statements.insert);
            // Dropping an uncommitted transaction rolls it back
            let tx = conn.transaction().map_err(classify)?;
            tx.execute(
                &statements.insert,
                rusqlite::params![
                    row.text_id,
                    row.content,
                    row.salt,
                    timestamp_to_micros(row.created),
                    row.expires.map(timestamp_to_micros),
                ],
            )
            .map_err(classify)?;
            tx.commit().map_err(classify)
        })
        .await
    }

    async fn fetch(&self, key: &str) -> BackendResult<Option<TextRow>> {
        let key = key.to_string();
        self.with_conn(move |conn, statements, echo| {
            echo_sql(echo, &statements.select);
            let raw = conn
                .query_row(&statements.select, [&key], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                    ))
                })
                .optional()
                .map_err(classify)?;

            let Some((text_id, content, salt, created, expires)) = raw else {
                return Ok(None);
            };
            Ok(Some(TextRow {
                text_id,
                content,
                salt,
                created: timestamp_from_micros(created)?,
                expires: expires.map(timestamp_from_micros).transpose()?,
            }))
        })
        .await
    }

    async fn delete(&self, key: &str) -> BackendResult<u64> {
        let key = key.to_string();
        self.with_conn(move |conn, statements, echo| {
            delete_where(conn, &statements.delete, echo, key)
        })
        .await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> BackendResult<u64> {
        let now = timestamp_to_micros(now);
        self.with_conn(move |conn, statements, echo| {
            delete_where(conn, &statements.purge_expired, echo, now)
        })
        .await
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> BackendResult<u64> {
        let cutoff = timestamp_to_micros(cutoff);
        self.with_conn(move |conn, statements, echo| {
            delete_where(conn, &statements.purge_created_before, echo, cutoff)
        })
        .await
    }

    async fn close(&self) -> BackendResult<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let taken = lock_conn(&conn)?.take();
            match taken {
                Some(conn) => conn
                    .close()
                    .map_err(|(_, e)| BackendError::Transient(e.to_string())),
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| BackendError::Transient(format!("SQLite task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{Dialect, Schema};
    use chrono::{Duration, TimeZone};

    async fn open_memory() -> SqliteBackend {
        let statements = Schema::default().statements(Dialect::Sqlite);
        let backend = SqliteBackend::open(SqliteLocation::Memory, statements, false)
            .await
            .unwrap();
        backend.create_schema().await.unwrap();
        backend
    }

    fn row(text_id: &str, created: DateTime<Utc>, expires: Option<DateTime<Utc>>) -> TextRow {
        TextRow {
            text_id: text_id.to_string(),
            content: "FooBar".to_string(),
            salt: None,
            created,
            expires,
        }
    }

    fn count_rows(backend: &SqliteBackend) -> i64 {
        let guard = backend.conn.lock().unwrap();
        guard
            .as_ref()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let backend = open_memory().await;
        let created = DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(1_500);
        let expected = TextRow {
            salt: Some("00ff".to_string()),
            ..row("abc", created, Some(created + Duration::days(1)))
        };

        backend.insert(expected.clone()).await.unwrap();

        assert_eq!(backend.fetch("abc").await.unwrap(), Some(expected));
        assert_eq!(backend.fetch("ABC").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_key_detected() {
        let backend = open_memory().await;
        let now = Utc::now();

        backend.insert(row("abc", now, None)).await.unwrap();
        let err = backend.insert(row("abc", now, None)).await.unwrap_err();

        assert_eq!(err, BackendError::Duplicate);
        assert_eq!(count_rows(&backend), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_affected_rows() {
        let backend = open_memory().await;
        backend.insert(row("abc", Utc::now(), None)).await.unwrap();

        assert_eq!(backend.delete("abc").await.unwrap(), 1);
        assert_eq!(backend.delete("abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_expired_is_strict() {
        let backend = open_memory().await;
        let now = Utc::now();
        backend
            .insert(row("past", now, Some(now - Duration::seconds(1))))
            .await
            .unwrap();
        backend.insert(row("exact", now, Some(now))).await.unwrap();
        backend
            .insert(row("future", now, Some(now + Duration::days(1))))
            .await
            .unwrap();
        backend.insert(row("never", now, None)).await.unwrap();

        assert_eq!(backend.purge_expired(now).await.unwrap(), 1);
        assert_eq!(backend.purge_expired(now).await.unwrap(), 0);
        assert_eq!(count_rows(&backend), 3);
    }

    #[tokio::test]
    async fn test_purge_created_before() {
        let backend = open_memory().await;
        let now = Utc::now();
        backend
            .insert(row("old", now - Duration::days(91), None))
            .await
            .unwrap();
        backend.insert(row("new", now, None)).await.unwrap();

        let removed = backend
            .purge_created_before(now - Duration::days(90))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(backend.fetch("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_far_future_expiry_round_trips() {
        let backend = open_memory().await;
        let now = Utc::now();
        let far = Utc.with_ymd_and_hms(10240, 7, 6, 20, 16, 41).unwrap();
        let stored = row("far", DateTime::<Utc>::UNIX_EPOCH, Some(far));

        backend.insert(stored.clone()).await.unwrap();

        assert_eq!(backend.fetch("far").await.unwrap(), Some(stored));
        assert_eq!(backend.purge_expired(now).await.unwrap(), 0);
        assert_eq!(count_rows(&backend), 1);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() {
        let backend = open_memory().await;
        {
            let guard = backend.conn.lock().unwrap();
            guard
                .as_ref()
                .unwrap()
                .execute_batch(
                    "CREATE TRIGGER reject_boom BEFORE INSERT ON texts
                     WHEN NEW.content = 'boom'
                     BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
                )
                .unwrap();
        }
        let mut rejected = row("abc", Utc::now(), None);
        rejected.content = "boom".to_string();

        let err = backend.insert(rejected).await.unwrap_err();

        assert!(matches!(err, BackendError::Transient(ref msg) if msg.contains("boom rejected")));
        assert_eq!(count_rows(&backend), 0);
    }

    #[tokio::test]
    async fn test_closed_backend_rejects_operations() {
        let backend = open_memory().await;
        backend.close().await.unwrap();
        backend.close().await.unwrap();

        assert!(matches!(
            backend.fetch("abc").await,
            Err(BackendError::Transient(_))
        ));
    }

    #[tokio::test]
    async fn test_unopenable_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let location = SqliteLocation::File(dir.path().join("missing").join("texts.db"));
        let statements = Schema::default().statements(Dialect::Sqlite);

        let result = SqliteBackend::open(location, statements, false).await;

        assert!(matches!(result, Err(BackendError::Unavailable(_))));
    }
}
