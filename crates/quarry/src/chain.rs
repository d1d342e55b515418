//! The query chain: a fluent accumulator of query operations.
//!
//! A [`Query`] collects where-conditions, ordering clauses and paging state,
//! then compiles into a single SQL statement when a terminal operation runs.
//! Builder calls never fail; all validation is deferred to generation and
//! execution time. A chain is built and consumed within one logical call —
//! it is a consuming builder, with each call returning the chain for
//! further chaining.

use std::marker::PhantomData;

use crate::config::Config;
use crate::connection::ConnectionSource;
use crate::error::Result;
use crate::executor::Adapter;
use crate::generator::{self, Finisher};
use crate::schema::Entity;
use crate::value::{SqlValue, ToSqlValue};

/// Sort direction for an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (`ASC`).
    Ascending,
    /// Descending order (`DESC`).
    Descending,
}

impl Direction {
    /// The SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// How a condition chains onto the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Combinator {
    pub(crate) const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A single condition within a query.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub(crate) expr: String,
    pub(crate) value: SqlValue,
    pub(crate) combinator: Combinator,
}

impl WhereCondition {
    /// Builds a condition. If the expression contains no `?` placeholder, a
    /// simple equality comparison (` = ?`) is appended — exactly once, here,
    /// never at generation time.
    fn new(expr: &str, value: SqlValue, combinator: Combinator) -> Self {
        let expr = if expr.contains('?') {
            String::from(expr)
        } else {
            format!("{expr} = ?")
        };
        Self {
            expr,
            value,
            combinator,
        }
    }
}

/// An ordering clause. Multiple clauses apply in declared order; later
/// clauses act as secondary sort keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub(crate) attribute: String,
    pub(crate) direction: Direction,
}

impl OrderClause {
    /// Parses an order specification: a `-` prefix selects descending
    /// order, e.g. `"-created_at"`.
    fn parse(spec: &str) -> Self {
        spec.strip_prefix('-').map_or_else(
            || Self {
                attribute: String::from(spec),
                direction: Direction::Ascending,
            },
            |attribute| Self {
                attribute: String::from(attribute),
                direction: Direction::Descending,
            },
        )
    }
}

/// A chain of query operations against one entity type.
///
/// # Example
///
/// ```ignore
/// let users = User::all()
///     .filter("username", "becky")
///     .or_filter("admin", true)
///     .order("-created_at")
///     .limit(10)
///     .page(2)
///     .fetch(&adapter)?;
/// ```
#[derive(Debug)]
pub struct Query<E: Entity> {
    pub(crate) wheres: Vec<WhereCondition>,
    pub(crate) orders: Vec<OrderClause>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) page: Option<i64>,
    _marker: PhantomData<E>,
}

// Manual Clone to avoid an E: Clone bound.
impl<E: Entity> Clone for Query<E> {
    fn clone(&self) -> Self {
        Self {
            wheres: self.wheres.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
            page: self.page,
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> Default for Query<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Query<E> {
    /// Creates an empty chain matching every row of the entity's table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            page: None,
            _marker: PhantomData,
        }
    }

    /// Adds a condition, chained with `AND`.
    ///
    /// The shorthand form `filter("username", v)` compares for equality. An
    /// expression containing a `?` placeholder passes through untouched, so
    /// any operator works: `filter("published_at >= ?", date)`.
    #[must_use]
    pub fn filter(mut self, expr: &str, value: impl ToSqlValue) -> Self {
        self.wheres
            .push(WhereCondition::new(expr, value.to_sql_value(), Combinator::And));
        self
    }

    /// Adds a condition, chained with `OR`. Same placeholder rule as
    /// [`filter`](Self::filter).
    #[must_use]
    pub fn or_filter(mut self, expr: &str, value: impl ToSqlValue) -> Self {
        self.wheres
            .push(WhereCondition::new(expr, value.to_sql_value(), Combinator::Or));
        self
    }

    /// Appends an order clause. A `-` prefix orders descending:
    /// `order("-created_at")`.
    #[must_use]
    pub fn order(mut self, spec: &str) -> Self {
        self.orders.push(OrderClause::parse(spec));
        self
    }

    /// Appends an order clause with an explicit direction.
    #[must_use]
    pub fn order_by(mut self, attribute: &str, direction: Direction) -> Self {
        self.orders.push(OrderClause {
            attribute: String::from(attribute),
            direction,
        });
        self
    }

    /// Clears any previously defined orders, then adds the given one.
    #[must_use]
    pub fn reorder(mut self, spec: &str) -> Self {
        self.orders.clear();
        self.order(spec)
    }

    /// Clears any previously defined orders, then adds the given one with
    /// an explicit direction.
    #[must_use]
    pub fn reorder_by(mut self, attribute: &str, direction: Direction) -> Self {
        self.orders.clear();
        self.order_by(attribute, direction)
    }

    /// Removes all order clauses.
    #[must_use]
    pub fn clear_order(mut self) -> Self {
        self.orders.clear();
        self
    }

    /// Limits the number of returned records. A negative limit means no
    /// limit is emitted.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Removes any record limit.
    #[must_use]
    pub const fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Alias of [`limit`](Self::limit); reads better when paging.
    #[must_use]
    pub const fn per(self, per: i64) -> Self {
        self.limit(per)
    }

    /// Alias of [`clear_limit`](Self::clear_limit).
    #[must_use]
    pub const fn clear_per(self) -> Self {
        self.clear_limit()
    }

    /// Offsets the results by the given number of rows.
    ///
    /// Also resets any page, so that the paging mechanism set last wins.
    /// The reverse does not hold: [`page`](Self::page) leaves an explicit
    /// offset in place and simply takes precedence at generation time.
    #[must_use]
    pub const fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self.page = None;
        self
    }

    /// Removes any offset, and any page along with it.
    #[must_use]
    pub const fn clear_offset(mut self) -> Self {
        self.offset = None;
        self.page = None;
        self
    }

    /// Selects which page of the result set to return. Pages are
    /// one-based and only take effect while a limit is set.
    #[must_use]
    pub const fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Resets the current page.
    #[must_use]
    pub const fn clear_page(mut self) -> Self {
        self.page = None;
        self
    }

    /// Compiles the chain to SQL and its ordered bind parameters without
    /// executing it.
    #[must_use]
    pub fn to_sql(&self, config: Config) -> (String, Vec<SqlValue>) {
        generator::select(self, Finisher::Execute, config)
    }

    /// Renders a preview of the generated SQL with parameter values
    /// substituted inline. For display only; execution always binds through
    /// placeholders.
    #[must_use]
    pub fn preview(&self, config: Config) -> String {
        let (sql, params) = self.to_sql(config);
        let mut out = String::with_capacity(sql.len());
        let mut values = params.iter();
        for piece in sql.split_inclusive('?') {
            match (piece.strip_suffix('?'), values.next()) {
                (Some(prefix), Some(value)) => {
                    out.push_str(prefix);
                    out.push_str(&value.render_inline());
                }
                _ => out.push_str(piece),
            }
        }
        out
    }

    /// Finishes the chain and returns all matching entities.
    ///
    /// # Errors
    ///
    /// Propagates execution and row-mapping failures.
    pub fn fetch<S: ConnectionSource>(&self, db: &Adapter<S>) -> Result<Vec<E>> {
        db.fetch(self)
    }

    /// Finishes the chain and returns the number of matching rows.
    ///
    /// # Errors
    ///
    /// Propagates execution failures; an empty COUNT result set is a
    /// mapping error.
    pub fn count<S: ConnectionSource>(&self, db: &Adapter<S>) -> Result<i64> {
        db.count(self)
    }

    /// Finishes the chain and reports whether a matching row exists.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`count`](Self::count).
    pub fn exists<S: ConnectionSource>(&self, db: &Adapter<S>) -> Result<bool> {
        db.exists(self)
    }
}
