//! SQL dialects understood by the reference join renderer.

use assocjoin_core::{quote_ident, quote_ident_mysql};
use serde::{Deserialize, Serialize};

/// SQL dialect for identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Sqlite,
    Mysql,
}

impl Dialect {
    /// Quote an identifier for this dialect.
    ///
    /// Properly escapes embedded quote characters by doubling them:
    /// - For Postgres/SQLite: `"` becomes `""`
    /// - For MySQL: `` ` `` becomes ``` `` ```
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_ident(name),
            Dialect::Mysql => quote_ident_mysql(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_per_dialect() {
        assert_eq!(Dialect::Postgres.quote_identifier("heroes"), "\"heroes\"");
        assert_eq!(Dialect::Sqlite.quote_identifier("he\"roes"), "\"he\"\"roes\"");
        assert_eq!(Dialect::Mysql.quote_identifier("heroes"), "`heroes`");
    }

    #[test]
    fn test_dialect_serde() {
        let d: Dialect = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(d, Dialect::Mysql);
        assert_eq!(Dialect::default(), Dialect::Postgres);
    }
}
