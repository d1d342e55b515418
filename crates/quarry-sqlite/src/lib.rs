//! SQLite connection source for quarry, backed by `rusqlite`.
//!
//! [`SqliteDatabase`] owns one `rusqlite` connection behind a mutex and
//! lends it out, one operation at a time, through quarry's blocking
//! connection traits. [`SqliteSource`] instead opens a fresh connection
//! per operation against a database file. Result sets are fully
//! materialized while the statement is live, so entities outlive the
//! borrow.
//!
//! ```ignore
//! use quarry::Adapter;
//! use quarry_sqlite::SqliteDatabase;
//!
//! let db = SqliteDatabase::in_memory()?;
//! db.execute_batch("CREATE TABLE Users (id INTEGER, username TEXT);")?;
//! let adapter = Adapter::new(&db);
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use quarry::{Connection, ConnectionSource, Error, PreparedStatement, Result, Rows, SqlValue};
use rusqlite::types::Value;

/// A SQLite database shared behind a mutex.
#[derive(Debug)]
pub struct SqliteDatabase {
    connection: Mutex<rusqlite::Connection>,
}

impl SqliteDatabase {
    /// Opens a database file, creating it when absent.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let connection = rusqlite::Connection::open(path.as_ref()).map_err(|e| {
            Error::execution(format!("open sqlite database `{}`", path.as_ref().display()), e)
        })?;
        Ok(Self::from_connection(connection))
    }

    /// Opens a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`] when SQLite refuses the connection.
    pub fn in_memory() -> Result<Self> {
        let connection = rusqlite::Connection::open_in_memory()
            .map_err(|e| Error::execution("open in-memory sqlite database", e))?;
        Ok(Self::from_connection(connection))
    }

    /// Wraps an already opened `rusqlite` connection.
    #[must_use]
    pub const fn from_connection(connection: rusqlite::Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    /// Runs raw SQL outside the adapter, typically schema setup.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`] when any statement in the batch fails.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.lock()
            .execute_batch(sql)
            .map_err(|e| Error::execution(format!("execute batch `{sql}`"), e))
    }

    fn lock(&self) -> MutexGuard<'_, rusqlite::Connection> {
        // A panic mid-statement leaves no partial adapter state behind, so
        // a poisoned lock is still usable.
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A file-backed source that opens a fresh connection for every operation.
///
/// Suits short-lived processes and tests; long-running applications that
/// want to reuse one connection should prefer [`SqliteDatabase`].
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    /// Points the source at a database file. Nothing is opened until the
    /// first operation acquires a connection.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConnectionSource for SqliteSource {
    type Connection<'a>
        = OwnedSqliteConnection
    where
        Self: 'a;

    fn acquire(&self) -> Result<Self::Connection<'_>> {
        let inner = rusqlite::Connection::open(&self.path).map_err(|e| {
            Error::execution(format!("open sqlite database `{}`", self.path.display()), e)
        })?;
        Ok(OwnedSqliteConnection { inner })
    }
}

/// A connection owned for the duration of one operation, closed on drop.
#[derive(Debug)]
pub struct OwnedSqliteConnection {
    inner: rusqlite::Connection,
}

impl Connection for OwnedSqliteConnection {
    type Statement<'c>
        = SqliteStatement<'c>
    where
        Self: 'c;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement<'_>> {
        let statement = self
            .inner
            .prepare(sql)
            .map_err(|e| Error::execution(format!("prepare `{sql}`"), e))?;
        Ok(SqliteStatement { statement })
    }
}

impl ConnectionSource for SqliteDatabase {
    type Connection<'a>
        = SqliteConnection<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Result<Self::Connection<'_>> {
        Ok(SqliteConnection { guard: self.lock() })
    }
}

/// Exclusive access to the underlying connection for one operation.
#[derive(Debug)]
pub struct SqliteConnection<'a> {
    guard: MutexGuard<'a, rusqlite::Connection>,
}

impl Connection for SqliteConnection<'_> {
    type Statement<'c>
        = SqliteStatement<'c>
    where
        Self: 'c;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement<'_>> {
        let statement = self
            .guard
            .prepare(sql)
            .map_err(|e| Error::execution(format!("prepare `{sql}`"), e))?;
        Ok(SqliteStatement { statement })
    }
}

/// A prepared `rusqlite` statement.
pub struct SqliteStatement<'c> {
    statement: rusqlite::Statement<'c>,
}

impl PreparedStatement for SqliteStatement<'_> {
    fn query(&mut self, params: &[SqlValue]) -> Result<Rows> {
        // Column names must be captured before the statement is consumed;
        // the materialized result set keeps them past the borrow.
        let columns: Vec<String> = self
            .statement
            .column_names()
            .iter()
            .map(|name| String::from(*name))
            .collect();

        let mut fetched = self
            .statement
            .query(rusqlite::params_from_iter(params.iter().map(bind_value)))
            .map_err(|e| Error::execution("bind and run query", e))?;

        let mut rows = Vec::new();
        while let Some(row) = fetched
            .next()
            .map_err(|e| Error::execution("advance result set", e))?
        {
            let mut cells = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                let value: Value = row
                    .get(index)
                    .map_err(|e| Error::execution(format!("read result column {index}"), e))?;
                cells.push(read_value(value));
            }
            rows.push(cells);
        }

        Ok(Rows { columns, rows })
    }

    fn execute(&mut self, params: &[SqlValue]) -> Result<u64> {
        let affected = self
            .statement
            .execute(rusqlite::params_from_iter(params.iter().map(bind_value)))
            .map_err(|e| Error::execution("bind and run statement", e))?;
        u64::try_from(affected).map_err(|e| Error::execution("read affected row count", e))
    }
}

/// SQLite has no boolean storage class; booleans bind as integers.
fn bind_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

fn read_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}
