//! SQL dialects and identifier quoting.

use std::fmt;

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SqlDialect {
    /// PostgreSQL uses $1, $2, etc.
    #[default]
    PostgreSQL,
    /// MySQL uses ?, ?, etc.
    MySQL,
    /// SQLite uses ?, ?, etc.
    SQLite,
}

impl SqlDialect {
    /// Get the parameter placeholder for a 1-based parameter index.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }

    /// Clause appended to `LIKE` so [`escape_like`] patterns are honored.
    ///
    /// MySQL already escapes `LIKE` with `\` and reads `'\'` as an
    /// unterminated literal, so it gets no clause.
    pub fn like_escape(&self) -> &'static str {
        match self {
            Self::MySQL => "",
            Self::PostgreSQL | Self::SQLite => " ESCAPE '\\'",
        }
    }

    /// Quote an identifier unconditionally.
    pub fn escape_identifier(&self, name: &str) -> String {
        match self {
            Self::MySQL => format!("`{}`", name.replace('`', "``")),
            Self::PostgreSQL | Self::SQLite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Quote an identifier if needed.
    pub fn quote_identifier(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.escape_identifier(name)
        } else {
            name.to_string()
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgresql",
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RESERVED: &[&str] = &[
    "user", "order", "group", "select", "from", "where", "table", "index", "key", "primary",
    "foreign", "check", "default", "null", "not", "and", "or", "in", "is", "like", "between",
    "case", "when", "then", "else", "end", "as", "on", "join", "left", "right", "inner", "outer",
    "cross", "natural", "using", "limit", "offset", "union", "intersect", "except", "all",
    "distinct", "having", "create", "alter", "drop", "insert", "update", "delete", "into",
    "values", "set", "returning",
];

/// Check if an identifier needs quoting: reserved words, special characters,
/// or a leading digit.
pub fn needs_quoting(name: &str) -> bool {
    if RESERVED.contains(&name.to_lowercase().as_str()) {
        return true;
    }

    name.is_empty()
        || name.starts_with(|c: char| c.is_ascii_digit())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape `LIKE` wildcards so `value` matches literally. Pair with [`SqlDialect::like_escape`].
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders() {
        assert_eq!(SqlDialect::PostgreSQL.placeholder(1), "$1");
        assert_eq!(SqlDialect::PostgreSQL.placeholder(5), "$5");
        assert_eq!(SqlDialect::MySQL.placeholder(1), "?");
        assert_eq!(SqlDialect::SQLite.placeholder(3), "?");
    }

    #[test]
    fn test_like_escape_per_dialect() {
        assert_eq!(SqlDialect::PostgreSQL.like_escape(), " ESCAPE '\\'");
        assert_eq!(SqlDialect::SQLite.like_escape(), " ESCAPE '\\'");
        assert_eq!(SqlDialect::MySQL.like_escape(), "");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(SqlDialect::PostgreSQL.quote_identifier("user"), "\"user\"");
        assert_eq!(SqlDialect::MySQL.quote_identifier("order"), "`order`");
        assert_eq!(SqlDialect::SQLite.quote_identifier("my_table"), "my_table");
        assert_eq!(SqlDialect::PostgreSQL.escape_identifier("has\"quote"), "\"has\"\"quote\"");
        assert!(needs_quoting("has space"));
        assert!(needs_quoting("1st"));
        assert!(!needs_quoting("users"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
