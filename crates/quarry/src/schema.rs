//! Entity schema descriptors.
//!
//! Instead of discovering persisted fields through runtime reflection, every
//! entity type carries an explicit, statically registered descriptor: the
//! [`Entity`] trait exposes its attribute table and typed get/set access.
//! The `#[derive(Entity)]` macro in `quarry-derive` generates the
//! implementation from per-field markers.

use crate::chain::Query;
use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

/// Descriptor for one persisted field of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, identical to the field name. The column name is this
    /// name passed through the configured column case.
    pub name: &'static str,
    /// Excluded attributes are skipped by insert/update generation and by
    /// row mapping.
    pub excluded: bool,
    /// Marks the single attribute used as the update predicate. Absence is
    /// an error only when an update runs, not at declaration time.
    pub primary_key: bool,
}

/// A schema-bound entity type, mapping to one table.
///
/// `Default` provides the blank instance that row mapping populates.
pub trait Entity: Default {
    /// Simple type name, used to infer the table name.
    const TYPE_NAME: &'static str;

    /// All declared attributes, in declaration order. Order is significant:
    /// it fixes INSERT column/value alignment.
    const ATTRIBUTES: &'static [Attribute];

    /// Returns the current value of an attribute.
    ///
    /// # Errors
    ///
    /// [`Error::Mapping`] if the attribute does not exist.
    fn get(&self, attribute: &str) -> Result<SqlValue>;

    /// Assigns an attribute from a result cell.
    ///
    /// # Errors
    ///
    /// [`Error::Mapping`] if the attribute does not exist or the value's
    /// type does not match the field.
    fn set(&mut self, attribute: &str, value: SqlValue) -> Result<()>;

    /// Whether this instance is known to exist in the database.
    fn is_persisted(&self) -> bool {
        false
    }

    /// Records that this instance now exists in the database. Called after
    /// a successful insert and after row materialization.
    fn mark_persisted(&mut self) {}

    /// Starts a query chain matching every instance of this entity.
    #[must_use]
    fn all() -> Query<Self> {
        Query::new()
    }

    /// Starts a query chain for a single instance matched on a unique
    /// attribute.
    #[must_use]
    fn find(attribute: &str, value: impl ToSqlValue) -> Query<Self> {
        Query::new().filter(attribute, value).limit(1)
    }
}

/// Pre-persistence validation, run by [`Adapter::save`](crate::Adapter::save)
/// and [`Adapter::update`](crate::Adapter::update) before any I/O.
pub trait Validate {
    /// Returns `Err(Error::Validation)` to reject the entity.
    ///
    /// # Errors
    ///
    /// Implementations report a rejected entity as [`Error::Validation`].
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Returns the persisted (non-excluded) attributes of an entity type, in
/// declaration order.
#[must_use]
pub fn persisted_attributes<E: Entity>() -> Vec<&'static Attribute> {
    E::ATTRIBUTES.iter().filter(|a| !a.excluded).collect()
}

/// Returns the name of the primary-key attribute.
///
/// # Errors
///
/// [`Error::Mapping`] if no attribute is marked as the primary key. Callers
/// surface this only when an operation that needs the key runs.
pub fn primary_key<E: Entity>() -> Result<&'static str> {
    E::ATTRIBUTES
        .iter()
        .find(|a| a.primary_key)
        .map(|a| a.name)
        .ok_or_else(|| {
            Error::Mapping(format!(
                "no attribute on `{}` is marked as the primary key",
                E::TYPE_NAME
            ))
        })
}

/// Echoes a result set's column list. Column names correspond 1:1 to
/// attribute names through the configured column case; no renaming happens
/// here.
#[must_use]
pub fn attributes_from_columns(columns: &[String]) -> Vec<String> {
    columns.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Gadget {
        id: i64,
        label: String,
        cached: bool,
    }

    impl Entity for Gadget {
        const TYPE_NAME: &'static str = "Gadget";
        const ATTRIBUTES: &'static [Attribute] = &[
            Attribute {
                name: "id",
                excluded: false,
                primary_key: true,
            },
            Attribute {
                name: "label",
                excluded: false,
                primary_key: false,
            },
            Attribute {
                name: "cached",
                excluded: true,
                primary_key: false,
            },
        ];

        fn get(&self, attribute: &str) -> Result<SqlValue> {
            match attribute {
                "id" => Ok(self.id.to_sql_value()),
                "label" => Ok(self.label.clone().to_sql_value()),
                "cached" => Ok(self.cached.to_sql_value()),
                _ => Err(Error::Mapping(format!("unknown attribute `{attribute}`"))),
            }
        }

        fn set(&mut self, attribute: &str, value: SqlValue) -> Result<()> {
            use crate::value::FromSqlValue;
            match attribute {
                "id" => self.id = i64::from_sql_value(value)?,
                "label" => self.label = String::from_sql_value(value)?,
                "cached" => self.cached = bool::from_sql_value(value)?,
                _ => return Err(Error::Mapping(format!("unknown attribute `{attribute}`"))),
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Keyless;

    impl Entity for Keyless {
        const TYPE_NAME: &'static str = "Keyless";
        const ATTRIBUTES: &'static [Attribute] = &[Attribute {
            name: "tag",
            excluded: false,
            primary_key: false,
        }];

        fn get(&self, _attribute: &str) -> Result<SqlValue> {
            Ok(SqlValue::Null)
        }

        fn set(&mut self, _attribute: &str, _value: SqlValue) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_persisted_attributes_skip_excluded_keep_order() {
        let names: Vec<&str> = persisted_attributes::<Gadget>()
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["id", "label"]);
    }

    #[test]
    fn test_primary_key_found() {
        assert_eq!(primary_key::<Gadget>().unwrap(), "id");
    }

    #[test]
    fn test_primary_key_missing() {
        let err = primary_key::<Keyless>().unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
        assert!(err.to_string().contains("Keyless"));
    }

    #[test]
    fn test_attributes_from_columns_echoes_verbatim() {
        let columns = vec![String::from("id"), String::from("label")];
        assert_eq!(attributes_from_columns(&columns), columns);
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut gadget = Gadget::default();
        gadget
            .set("label", SqlValue::Text(String::from("widget")))
            .unwrap();
        assert_eq!(
            gadget.get("label").unwrap(),
            SqlValue::Text(String::from("widget"))
        );
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut gadget = Gadget::default();
        let err = gadget
            .set("id", SqlValue::Text(String::from("nope")))
            .unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
    }
}
