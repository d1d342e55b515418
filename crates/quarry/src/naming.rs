//! Identifier casing and table name inference.
//!
//! Table and column names are derived from entity type and attribute names
//! by converting them through a configured [`Case`]. Conversion is
//! one-directional: `Camel` is the identity and `Snake`/`Kebab` are lossy
//! on case boundaries, so no inverse transform exists.

/// A naming convention for tables and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `snake_case`
    Snake,
    /// `CamelCase` — the identity transform, since type and attribute names
    /// are already cased this way.
    Camel,
    /// `kebab-case`
    Kebab,
}

impl Case {
    /// Converts an identifier to this case.
    ///
    /// Boundary rule for `Snake` and `Kebab`: a separator is inserted before
    /// an uppercase letter that follows a lowercase letter or digit, and
    /// before the last uppercase letter of an uppercase run that is followed
    /// by a lowercase letter. Spaces, hyphens and underscores normalize to
    /// the target separator, and the result is lowercased.
    ///
    /// Fixtures: `HTMLEntity` → `html_entity`, `CaseTests` → `case_tests`,
    /// `parse2JSON` → `parse2_json`.
    #[must_use]
    pub fn convert(self, identifier: &str) -> String {
        match self {
            Self::Camel => String::from(identifier),
            Self::Snake => delimit(identifier, '_'),
            Self::Kebab => delimit(identifier, '-'),
        }
    }
}

/// Lowercases `identifier`, separating words with `separator`.
fn delimit(identifier: &str, separator: char) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with(separator) {
                out.push(separator);
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with(separator) {
                out.push(separator);
            }
        }

        out.extend(c.to_lowercase());
    }

    out
}

/// Words that have no distinct plural form. Checked case-sensitively on the
/// singular form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "bison",
    "milk",
    "wheat",
    "sunshine",
    "snow",
    "sleep",
];

/// Pluralizes a singular word by appending `s`, unless the word is
/// uncountable.
#[must_use]
pub fn pluralize(singular: &str) -> String {
    if UNCOUNTABLE.contains(&singular) {
        String::from(singular)
    } else {
        format!("{singular}s")
    }
}

/// Infers the table name for an entity type name: the pluralized type name
/// converted to the given case.
#[must_use]
pub fn table_name(type_name: &str, case: Case) -> String {
    case.convert(&pluralize(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_simple() {
        assert_eq!(Case::Snake.convert("CaseTests"), "case_tests");
        assert_eq!(Case::Snake.convert("username"), "username");
    }

    #[test]
    fn test_snake_initialism() {
        assert_eq!(Case::Snake.convert("HTMLEntity"), "html_entity");
    }

    #[test]
    fn test_snake_digit_boundary() {
        assert_eq!(Case::Snake.convert("parse2JSON"), "parse2_json");
    }

    #[test]
    fn test_snake_phrase() {
        assert_eq!(
            Case::Snake.convert("The quick brown fox"),
            "the_quick_brown_fox"
        );
    }

    #[test]
    fn test_snake_single_letter() {
        assert_eq!(Case::Snake.convert("A"), "a");
    }

    #[test]
    fn test_camel_is_identity() {
        assert_eq!(Case::Camel.convert("HTMLEntity"), "HTMLEntity");
        assert_eq!(Case::Camel.convert("CaseTests"), "CaseTests");
    }

    #[test]
    fn test_kebab() {
        assert_eq!(Case::Kebab.convert("CaseTests"), "case-tests");
        assert_eq!(Case::Kebab.convert("HTMLEntity"), "html-entity");
        assert_eq!(
            Case::Kebab.convert("The quick brown fox"),
            "the-quick-brown-fox"
        );
    }

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("cow"), "cows");
        assert_eq!(pluralize("User"), "Users");
    }

    #[test]
    fn test_pluralize_uncountable() {
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("species"), "species");
        assert_eq!(pluralize("fish"), "fish");
    }

    #[test]
    fn test_pluralize_is_case_sensitive() {
        // Only the exact singular form is uncountable.
        assert_eq!(pluralize("Sheep"), "Sheeps");
    }

    #[test]
    fn test_table_name_inference() {
        assert_eq!(table_name("User", Case::Camel), "Users");
        assert_eq!(table_name("User", Case::Snake), "users");
        assert_eq!(table_name("BlogPost", Case::Snake), "blog_posts");
        assert_eq!(table_name("BlogPost", Case::Kebab), "blog-posts");
    }
}
