//! Scripted in-memory database for adapter tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use quarry::{Connection, ConnectionSource, PreparedStatement, Result, Rows, SqlValue};

/// Pops pre-loaded result sets for queries and records every statement
/// with its bound parameters.
#[derive(Debug, Default)]
pub struct MockDb {
    responses: RefCell<VecDeque<Rows>>,
    statements: RefCell<Vec<(String, Vec<SqlValue>)>>,
}

impl MockDb {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a result set; queries consume them in order. An unscripted
    /// query receives an empty result set.
    pub fn push_response(&self, rows: Rows) {
        self.responses.borrow_mut().push_back(rows);
    }

    /// Every statement run so far, with its parameters, in order.
    #[must_use]
    pub fn recorded(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.borrow().clone()
    }
}

impl ConnectionSource for MockDb {
    type Connection<'a>
        = MockConnection<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Result<Self::Connection<'_>> {
        Ok(MockConnection { db: self })
    }
}

#[derive(Debug)]
pub struct MockConnection<'a> {
    db: &'a MockDb,
}

impl Connection for MockConnection<'_> {
    type Statement<'c>
        = MockStatement<'c>
    where
        Self: 'c;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement<'_>> {
        Ok(MockStatement {
            db: self.db,
            sql: String::from(sql),
        })
    }
}

#[derive(Debug)]
pub struct MockStatement<'c> {
    db: &'c MockDb,
    sql: String,
}

impl PreparedStatement for MockStatement<'_> {
    fn query(&mut self, params: &[SqlValue]) -> Result<Rows> {
        self.db
            .statements
            .borrow_mut()
            .push((self.sql.clone(), params.to_vec()));
        Ok(self
            .db
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(Rows::empty))
    }

    fn execute(&mut self, params: &[SqlValue]) -> Result<u64> {
        self.db
            .statements
            .borrow_mut()
            .push((self.sql.clone(), params.to_vec()));
        Ok(1)
    }
}
