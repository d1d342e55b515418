//! Statement execution and row-to-entity materialization.
//!
//! The [`Adapter`] orchestrates each terminal operation: ask the generator
//! for SQL plus parameters, log per the configured verbosity, run the
//! statement over a freshly acquired connection, and map rows back into
//! entity instances. Execution failures are never retried or suppressed;
//! they propagate with context, cause preserved. Nothing is marked
//! persisted until the statement has succeeded.

use tracing::info;

use crate::chain::Query;
use crate::config::{self, Config, Verbosity};
use crate::connection::{Connection, ConnectionSource, PreparedStatement, Rows};
use crate::error::{Error, Result};
use crate::generator::{self, Finisher};
use crate::schema::{self, Entity, Validate};
use crate::value::{FromSqlValue, SqlValue};

/// Orchestrates generation, execution and mapping over a connection source.
#[derive(Debug)]
pub struct Adapter<S: ConnectionSource> {
    source: S,
    config: Config,
}

impl<S: ConnectionSource> Adapter<S> {
    /// Creates an adapter using the process-wide default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, config::default())
    }

    /// Creates an adapter with an explicit configuration.
    #[must_use]
    pub const fn with_config(source: S, config: Config) -> Self {
        Self { source, config }
    }

    /// The configuration this adapter generates under.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a select and maps each result row into one entity instance.
    ///
    /// The column-to-attribute table is resolved once per result set, then
    /// each row populates a blank instance, which is marked persisted after
    /// population.
    ///
    /// # Errors
    ///
    /// Execution failures propagate; a result column with no matching
    /// attribute, or a cell that cannot be assigned, is a mapping error.
    pub fn fetch<E: Entity>(&self, query: &Query<E>) -> Result<Vec<E>> {
        let (sql, params) = generator::select(query, Finisher::Execute, self.config);
        let result = self.run_query(&sql, &params)?;

        let columns = schema::attributes_from_columns(&result.columns);
        let lookup: Vec<(String, &'static str)> = E::ATTRIBUTES
            .iter()
            .filter(|a| !a.excluded)
            .map(|a| (self.config.column_case.convert(a.name), a.name))
            .collect();

        let mut entities = Vec::with_capacity(result.rows.len());
        for row in result.rows {
            let mut entity = E::default();
            for (column, value) in columns.iter().zip(row) {
                let attribute = lookup
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|&(_, attribute)| attribute)
                    .ok_or_else(|| {
                        Error::Mapping(format!(
                            "result column `{column}` matches no attribute of `{}`",
                            E::TYPE_NAME
                        ))
                    })?;
                entity.set(attribute, value)?;
            }
            entity.mark_persisted();
            entities.push(entity);
        }

        Ok(entities)
    }

    /// Returns the number of rows matching the chain.
    ///
    /// # Errors
    ///
    /// An empty result set is a mapping error: COUNT always returns exactly
    /// one row, so absence indicates a generator or driver defect, never a
    /// valid "zero rows" outcome.
    pub fn count<E: Entity>(&self, query: &Query<E>) -> Result<i64> {
        let (sql, params) = generator::select(query, Finisher::Count, self.config);
        let result = self.run_query(&sql, &params)?;
        Self::scalar(&result)
    }

    /// Reports whether a row matching the chain exists.
    ///
    /// Forces a limit of one and delegates to [`count`](Self::count); the
    /// result is whether that count equals one.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`count`](Self::count).
    pub fn exists<E: Entity>(&self, query: &Query<E>) -> Result<bool> {
        let limited = query.clone().limit(1);
        let (sql, params) = generator::select(&limited, Finisher::Exists, self.config);
        let result = self.run_query(&sql, &params)?;
        Ok(Self::scalar(&result)? == 1)
    }

    /// Inserts an entity's current attribute values as a new row, then
    /// marks the instance persisted.
    ///
    /// # Errors
    ///
    /// Generation and execution failures propagate before the persisted
    /// flag is touched.
    pub fn insert<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let (sql, params) = generator::insert(entity, self.config)?;
        self.run_execute(&sql, &params)?;
        entity.mark_persisted();
        Ok(())
    }

    /// Updates the row identified by the entity's primary key.
    ///
    /// # Errors
    ///
    /// A missing primary-key attribute surfaces here as a mapping error;
    /// execution failures propagate.
    pub fn update_by_key<E: Entity>(&self, entity: &E) -> Result<()> {
        let (sql, params) = generator::update(entity, self.config)?;
        self.run_execute(&sql, &params)?;
        Ok(())
    }

    /// Validates, then inserts.
    ///
    /// # Errors
    ///
    /// A validation failure returns [`Error::Validation`] before any I/O.
    pub fn save<E: Entity + Validate>(&self, entity: &mut E) -> Result<()> {
        entity.validate()?;
        self.insert(entity)
    }

    /// Validates, then updates by primary key.
    ///
    /// # Errors
    ///
    /// A validation failure returns [`Error::Validation`] before any I/O.
    pub fn update<E: Entity + Validate>(&self, entity: &E) -> Result<()> {
        entity.validate()?;
        self.update_by_key(entity)
    }

    fn run_query(&self, sql: &str, params: &[SqlValue]) -> Result<Rows> {
        self.log(sql, params);
        let mut connection = self.source.acquire()?;
        let mut statement = connection.prepare(sql)?;
        statement.query(params)
    }

    fn run_execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        self.log(sql, params);
        let mut connection = self.source.acquire()?;
        let mut statement = connection.prepare(sql)?;
        statement.execute(params)
    }

    fn log(&self, sql: &str, params: &[SqlValue]) {
        if self.config.verbosity == Verbosity::SqlOnly {
            let rendered: Vec<String> = params.iter().map(SqlValue::render_inline).collect();
            let rendered = rendered.join(", ");
            info!(target: "quarry::sql", sql, params = %rendered);
        }
    }

    /// Reads the first column of the first row of a scalar result set.
    fn scalar(result: &Rows) -> Result<i64> {
        let cell = result
            .rows
            .first()
            .and_then(|row| row.first())
            .ok_or_else(|| {
                Error::Mapping(String::from(
                    "scalar result set was empty; this only occurs under catastrophic circumstances",
                ))
            })?;
        i64::from_sql_value(cell.clone())
    }
}
