//! SQL generation.
//!
//! Pure translation from chain or entity state into a single `;`-terminated
//! SQL statement plus its ordered bind parameters. The critical invariant
//! throughout: the parameter list's length and order exactly match the `?`
//! placeholders in the emitted text, left to right.

use crate::chain::Query;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::naming;
use crate::schema::{self, Entity};
use crate::value::SqlValue;

/// The terminal shape of a select statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finisher {
    /// `SELECT *` returning entity rows.
    Execute,
    /// `SELECT COUNT(*)` returning a single scalar.
    Count,
    /// An existence check; generates the same SQL as `Count`.
    Exists,
}

/// Infers the table name for an entity type under the given configuration.
#[must_use]
pub fn table_name<E: Entity>(config: Config) -> String {
    naming::table_name(E::TYPE_NAME, config.table_case)
}

/// Compiles a query chain into a select statement.
#[must_use]
pub fn select<E: Entity>(
    query: &Query<E>,
    finisher: Finisher,
    config: Config,
) -> (String, Vec<SqlValue>) {
    let mut sql = String::new();
    let mut params = Vec::with_capacity(query.wheres.len());

    // Statement head
    match finisher {
        Finisher::Execute => sql.push_str("SELECT * FROM "),
        Finisher::Count | Finisher::Exists => sql.push_str("SELECT COUNT(*) FROM "),
    }
    sql.push_str(&table_name::<E>(config));

    // Conditions: the first has no leading combinator, every later one is
    // prefixed with its own AND/OR. One bound parameter per condition.
    for (i, condition) in query.wheres.iter().enumerate() {
        if i == 0 {
            sql.push_str(" WHERE ");
        } else {
            sql.push(' ');
            sql.push_str(condition.combinator.keyword());
            sql.push(' ');
        }
        sql.push_str(&condition.expr);
        params.push(condition.value.clone());
    }

    // Ordering, in declared order
    for (i, clause) in query.orders.iter().enumerate() {
        sql.push_str(if i == 0 { " ORDER BY " } else { ", " });
        sql.push_str(&clause.attribute);
        sql.push(' ');
        sql.push_str(clause.direction.as_sql());
    }

    generate_paging(query, &mut sql);

    sql.push(';');
    (sql, params)
}

/// Emits LIMIT/OFFSET. A page only takes effect while a limit is set, and
/// takes precedence over any explicit offset.
fn generate_paging<E: Entity>(query: &Query<E>, sql: &mut String) {
    if let Some(limit) = query.limit {
        if limit >= 0 {
            sql.push_str(&format!(" LIMIT {limit}"));

            if let Some(page) = query.page {
                // Page numbers come straight from callers, so the offset
                // computation must tolerate any i64 without overflowing.
                let offset = page.saturating_sub(1).saturating_mul(limit).max(0);
                sql.push_str(&format!(" OFFSET {offset}"));
                return;
            }
        }
    }

    if let Some(offset) = query.offset {
        if offset >= 0 {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }
}

/// Compiles an insert statement from an entity's current attribute values.
///
/// Columns are the non-excluded attributes in declaration order, so the
/// placeholder list aligns with the parameter list by construction.
///
/// # Errors
///
/// [`Error::Generation`] if the entity has no persisted attributes;
/// [`Error::Mapping`] if an attribute value cannot be read.
pub fn insert<E: Entity>(entity: &E, config: Config) -> Result<(String, Vec<SqlValue>)> {
    let attributes = schema::persisted_attributes::<E>();
    if attributes.is_empty() {
        return Err(Error::Generation(format!(
            "`{}` has no persisted attributes to insert",
            E::TYPE_NAME
        )));
    }

    let columns: Vec<String> = attributes
        .iter()
        .map(|a| config.column_case.convert(a.name))
        .collect();
    let placeholders: Vec<&str> = attributes.iter().map(|_| "?").collect();
    let params: Vec<SqlValue> = attributes
        .iter()
        .map(|a| entity.get(a.name))
        .collect::<Result<_>>()?;

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table_name::<E>(config),
        columns.join(", "),
        placeholders.join(", "),
    );

    Ok((sql, params))
}

/// Compiles an update statement keyed on the entity's primary key.
///
/// # Errors
///
/// [`Error::Mapping`] if the entity type has no primary-key attribute —
/// surfaced here, when the update is generated, not at declaration time.
pub fn update<E: Entity>(entity: &E, config: Config) -> Result<(String, Vec<SqlValue>)> {
    let attributes = schema::persisted_attributes::<E>();
    if attributes.is_empty() {
        return Err(Error::Generation(format!(
            "`{}` has no persisted attributes to update",
            E::TYPE_NAME
        )));
    }

    let assignments: Vec<String> = attributes
        .iter()
        .map(|a| format!("{} = ?", config.column_case.convert(a.name)))
        .collect();
    let mut params: Vec<SqlValue> = attributes
        .iter()
        .map(|a| entity.get(a.name))
        .collect::<Result<_>>()?;

    let key = schema::primary_key::<E>()?;
    params.push(entity.get(key)?);

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?;",
        table_name::<E>(config),
        assignments.join(", "),
        config.column_case.convert(key),
    );

    Ok((sql, params))
}
