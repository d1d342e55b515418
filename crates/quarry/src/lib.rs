//! # quarry
//!
//! A small object-relational mapping layer built around a fluent query
//! chain. Application code describes entities once, then builds queries by
//! chaining operations; the chain compiles deterministically into one
//! parameterized SQL statement plus an ordered bind list, and result rows
//! map back into typed entity instances.
//!
//! This crate provides:
//! - The [`Entity`] trait: a static schema descriptor per entity type,
//!   generated by `#[derive(Entity)]` from `quarry-derive`
//! - [`Query`]: the chainable builder for conditions, ordering and paging
//! - SQL generation with a strict placeholder/parameter correspondence
//! - [`Adapter`]: blocking execution over a pluggable connection source
//! - [`Case`]-based table and column name inference with pluralization
//!
//! ## Quick start
//!
//! ```ignore
//! use quarry::{Adapter, Entity, Validate};
//! use quarry_sqlite::SqliteDatabase;
//!
//! #[derive(Debug, Default, Entity)]
//! struct User {
//!     #[entity(primary_key)]
//!     id: i64,
//!     username: String,
//!     #[entity(excluded)]
//!     cached_display: String,
//! }
//!
//! impl Validate for User {}
//!
//! fn example(db: &SqliteDatabase) -> quarry::Result<()> {
//!     let adapter = Adapter::new(db);
//!
//!     let mut user = User { id: 1, username: "becky".into(), ..User::default() };
//!     adapter.save(&mut user)?;
//!
//!     let found = User::find("username", "becky").fetch(&adapter)?;
//!     let total = User::all().count(&adapter)?;
//!
//!     let page = User::all()
//!         .filter("username LIKE ?", "b%")
//!         .order("-id")
//!         .per(10)
//!         .page(2)
//!         .fetch(&adapter)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## The chain
//!
//! Builder calls never fail, interact deterministically, and compile in one
//! pass:
//!
//! ```ignore
//! // filter("attr", v) infers equality; a `?` in the expression passes
//! // through untouched.
//! User::all().filter("age >= ?", 18).or_filter("admin", true);
//!
//! // Setting an offset resets any page (last mechanism wins); setting a
//! // page leaves the offset in place but takes precedence when generated.
//! User::all().limit(10).offset(5).page(2); // LIMIT 10 OFFSET 10
//! ```
//!
//! Generated SQL is a single `;`-terminated statement whose `?`
//! placeholders correspond one-to-one, left to right, with the bound
//! parameter list.

pub mod chain;
pub mod config;
pub mod connection;
mod error;
pub mod executor;
pub mod generator;
pub mod naming;
pub mod schema;
pub mod value;

pub use chain::{Combinator, Direction, OrderClause, Query, WhereCondition};
pub use config::{Config, Verbosity};
pub use connection::{Connection, ConnectionSource, PreparedStatement, Rows};
pub use error::{Error, Result};
pub use executor::Adapter;
pub use generator::Finisher;
pub use naming::{pluralize, table_name, Case};
pub use schema::{Attribute, Entity, Validate};
pub use value::{FromSqlValue, SqlValue, ToSqlValue};
