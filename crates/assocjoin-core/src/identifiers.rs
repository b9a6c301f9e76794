//! SQL identifier quoting, qualification and alias checks.

use regex::Regex;
use std::sync::OnceLock;

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them (`"` → `""`).
///
/// # Examples
///
/// ```
/// use assocjoin_core::quote_ident;
///
/// assert_eq!(quote_ident("heroes"), "\"heroes\"");
/// assert_eq!(quote_ident("hero\"name"), "\"hero\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// ```
/// use assocjoin_core::quote_ident_mysql;
///
/// assert_eq!(quote_ident_mysql("heroes"), "`heroes`");
/// assert_eq!(quote_ident_mysql("hero`name"), "`hero``name`");
/// ```
#[inline]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

const PLAIN_IDENTIFIER: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

fn plain_identifier() -> Option<&'static Regex> {
    static PLAIN: OnceLock<Option<Regex>> = OnceLock::new();
    PLAIN
        .get_or_init(|| match Regex::new(PLAIN_IDENTIFIER) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(error = %e, "Identifier pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Check whether `alias` is a plain, unquoted SQL identifier.
///
/// ```
/// use assocjoin_core::is_plain_identifier;
///
/// assert!(is_plain_identifier("hero0_"));
/// assert!(!is_plain_identifier("0hero"));
/// assert!(!is_plain_identifier("h.team"));
/// ```
pub fn is_plain_identifier(alias: &str) -> bool {
    plain_identifier().is_some_and(|regex| regex.is_match(alias))
}

/// Qualify a column with a table alias unless it is already qualified.
///
/// ```
/// use assocjoin_core::qualify_column;
///
/// assert_eq!(qualify_column("h", "team_id"), "h.team_id");
/// assert_eq!(qualify_column("h", "x.team_id"), "x.team_id");
/// ```
pub fn qualify_column(alias: &str, column: &str) -> String {
    if column.contains('.') || alias.is_empty() {
        column.to_string()
    } else {
        format!("{alias}.{column}")
    }
}
