//! The connection collaborator interface.
//!
//! The adapter owns no connection machinery of its own. It works against
//! these blocking traits: a source hands out a connection immediately
//! before each operation, the connection prepares one statement, the
//! statement binds parameters by position and runs. Everything is released
//! by drop, on every exit path, as soon as the result set has been
//! materialized — some drivers invalidate result metadata once their
//! connection closes, so column names are captured into [`Rows`] before
//! release.

use crate::error::Result;
use crate::value::SqlValue;

/// Hands out connections, one per operation.
pub trait ConnectionSource {
    /// The connection type lent or produced by this source.
    type Connection<'a>: Connection
    where
        Self: 'a;

    /// Acquires a connection.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`](crate::Error::Execution) when no connection is
    /// available.
    fn acquire(&self) -> Result<Self::Connection<'_>>;
}

impl<S: ConnectionSource> ConnectionSource for &S {
    type Connection<'a>
        = S::Connection<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Result<Self::Connection<'_>> {
        (**self).acquire()
    }
}

/// A live database connection.
pub trait Connection {
    /// The prepared statement type, borrowing from this connection.
    type Statement<'c>: PreparedStatement
    where
        Self: 'c;

    /// Prepares a statement for execution.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`](crate::Error::Execution) when the engine
    /// rejects the statement text.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement<'_>>;
}

/// A prepared statement. Parameters bind by slice position, in strict
/// left-to-right correspondence with the `?` placeholders.
pub trait PreparedStatement {
    /// Binds parameters and runs a statement that returns rows.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`](crate::Error::Execution) on any driver failure.
    fn query(&mut self, params: &[SqlValue]) -> Result<Rows>;

    /// Binds parameters and runs a statement that returns an affected-row
    /// count.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`](crate::Error::Execution) on any driver failure.
    fn execute(&mut self, params: &[SqlValue]) -> Result<u64>;
}

/// A fully materialized result set: column names plus every row, captured
/// while the connection was still open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    /// Result column names, in select order.
    pub columns: Vec<String>,
    /// One value per column per row.
    pub rows: Vec<Vec<SqlValue>>,
}

impl Rows {
    /// An empty result set with no columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}
