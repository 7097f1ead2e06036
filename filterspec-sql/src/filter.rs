//! Column filter tree rendered to parameterized SQL.

use smallvec::SmallVec;
use std::fmt;

use filterspec_core::{Comparison, FieldValue, Fragment};

use crate::dialect::SqlDialect;

/// Bound parameters, inline for typical WHERE clauses.
pub type SqlParams = SmallVec<[FieldValue; 8]>;

/// A WHERE-clause filter over quoted column expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlFilter {
    /// No filter (always true).
    #[default]
    None,
    /// Never matches.
    Never,

    /// Equals comparison.
    Equals(String, FieldValue),
    /// Not equals comparison.
    NotEquals(String, FieldValue),
    /// Ordered comparison.
    Compare(String, Comparison, FieldValue),

    /// In a list of values.
    In(String, Vec<FieldValue>),
    /// Not in a list of values.
    NotIn(String, Vec<FieldValue>),

    /// `LIKE` with an already escaped pattern.
    Like(String, String),
    /// `NOT LIKE` with an already escaped pattern.
    NotLike(String, String),

    /// Is null check.
    IsNull(String),
    /// Is not null check.
    IsNotNull(String),

    /// Logical AND of multiple filters.
    And(Vec<SqlFilter>),
    /// Logical OR of multiple filters.
    Or(Vec<SqlFilter>),
    /// Logical NOT of a filter.
    Not(Box<SqlFilter>),
}

impl SqlFilter {
    /// Check if this filter is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Render with placeholders numbered from 1.
    pub fn to_sql(&self, dialect: SqlDialect) -> (String, SqlParams) {
        self.to_sql_with_offset(dialect, 0)
    }

    /// Render with placeholders numbered after `offset` already-bound parameters.
    pub fn to_sql_with_offset(&self, dialect: SqlDialect, offset: usize) -> (String, SqlParams) {
        let mut writer = SqlWriter {
            dialect,
            offset,
            params: SqlParams::new(),
        };
        let sql = writer.write(self);
        (sql, writer.params)
    }

    /// Render as a ` WHERE ...` clause, or an empty string for no filter.
    pub fn to_where_clause(&self, dialect: SqlDialect) -> (String, SqlParams) {
        if self.is_none() {
            return (String::new(), SqlParams::new());
        }
        let (sql, params) = self.to_sql(dialect);
        (format!(" WHERE {}", sql), params)
    }
}

struct SqlWriter {
    dialect: SqlDialect,
    offset: usize,
    params: SqlParams,
}

impl SqlWriter {
    fn bind(&mut self, value: FieldValue) -> String {
        self.params.push(value);
        self.dialect.placeholder(self.offset + self.params.len())
    }

    fn bind_all(&mut self, values: &[FieldValue]) -> String {
        values
            .iter()
            .map(|v| self.bind(v.clone()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn join(&mut self, filters: &[SqlFilter], sep: &str) -> String {
        let parts = filters.iter().map(|f| self.write(f)).collect::<Vec<_>>();
        format!("({})", parts.join(sep))
    }

    fn write(&mut self, filter: &SqlFilter) -> String {
        match filter {
            SqlFilter::None => "TRUE".to_string(),
            SqlFilter::Never => "FALSE".to_string(),

            SqlFilter::Equals(col, val) => {
                if val.is_null() {
                    format!("{} IS NULL", col)
                } else {
                    format!("{} = {}", col, self.bind(val.clone()))
                }
            }
            SqlFilter::NotEquals(col, val) => {
                if val.is_null() {
                    format!("{} IS NOT NULL", col)
                } else {
                    format!("{} <> {}", col, self.bind(val.clone()))
                }
            }
            SqlFilter::Compare(col, op, val) => {
                format!("{} {} {}", col, op.symbol(), self.bind(val.clone()))
            }

            SqlFilter::In(col, values) => {
                if values.is_empty() {
                    return "FALSE".to_string();
                }
                format!("{} IN ({})", col, self.bind_all(values))
            }
            SqlFilter::NotIn(col, values) => {
                if values.is_empty() {
                    return "TRUE".to_string();
                }
                format!("{} NOT IN ({})", col, self.bind_all(values))
            }

            SqlFilter::Like(col, pattern) => format!(
                "{} LIKE {}{}",
                col,
                self.bind(FieldValue::String(pattern.clone())),
                self.dialect.like_escape()
            ),
            SqlFilter::NotLike(col, pattern) => format!(
                "{} NOT LIKE {}{}",
                col,
                self.bind(FieldValue::String(pattern.clone())),
                self.dialect.like_escape()
            ),

            SqlFilter::IsNull(col) => format!("{} IS NULL", col),
            SqlFilter::IsNotNull(col) => format!("{} IS NOT NULL", col),

            SqlFilter::And(filters) => {
                if filters.is_empty() {
                    return "TRUE".to_string();
                }
                self.join(filters, " AND ")
            }
            SqlFilter::Or(filters) => {
                if filters.is_empty() {
                    return "FALSE".to_string();
                }
                self.join(filters, " OR ")
            }
            SqlFilter::Not(filter) => format!("NOT ({})", self.write(filter)),
        }
    }
}

impl Fragment for SqlFilter {
    fn empty() -> Self {
        Self::None
    }

    fn never() -> Self {
        Self::Never
    }

    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, f) | (f, Self::None) => f,
            (Self::Never, _) | (_, Self::Never) => Self::Never,
            (Self::And(mut filters), Self::And(more)) => {
                filters.extend(more);
                Self::And(filters)
            }
            (Self::And(mut filters), f) => {
                filters.push(f);
                Self::And(filters)
            }
            (f, g) => Self::And(vec![f, g]),
        }
    }

    fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => Self::None,
            (Self::Never, f) | (f, Self::Never) => f,
            (Self::Or(mut filters), Self::Or(more)) => {
                filters.extend(more);
                Self::Or(filters)
            }
            (Self::Or(mut filters), f) => {
                filters.push(f);
                Self::Or(filters)
            }
            (f, g) => Self::Or(vec![f, g]),
        }
    }

    fn not(self) -> Self {
        match self {
            Self::None => Self::Never,
            Self::Never => Self::None,
            Self::Equals(col, val) => Self::NotEquals(col, val),
            Self::NotEquals(col, val) => Self::Equals(col, val),
            Self::In(col, values) => Self::NotIn(col, values),
            Self::NotIn(col, values) => Self::In(col, values),
            Self::Like(col, pattern) => Self::NotLike(col, pattern),
            Self::NotLike(col, pattern) => Self::Like(col, pattern),
            Self::IsNull(col) => Self::IsNotNull(col),
            Self::IsNotNull(col) => Self::IsNull(col),
            Self::And(filters) => Self::Or(filters.into_iter().map(Self::not).collect()),
            Self::Or(filters) => Self::And(filters.into_iter().map(Self::not).collect()),
            Self::Not(inner) => *inner,
            f => Self::Not(Box::new(f)),
        }
    }
}

impl fmt::Display for SqlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sql, _) = self.to_sql(SqlDialect::PostgreSQL);
        f.write_str(&sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equals() {
        let filter = SqlFilter::Equals("email".into(), "test@example.com".into());
        let (sql, params) = filter.to_sql(SqlDialect::PostgreSQL);
        assert_eq!(sql, "email = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_placeholders_are_sequential() {
        let filter = SqlFilter::all([
            SqlFilter::In("id".into(), vec![FieldValue::Int(1), FieldValue::Int(2)]),
            SqlFilter::Compare("age".into(), Comparison::Gte, FieldValue::Int(18)),
            SqlFilter::Like("name".into(), "%ab%".into()),
        ]);

        let (sql, params) = filter.to_sql(SqlDialect::PostgreSQL);
        assert_eq!(
            sql,
            "(id IN ($1, $2) AND age >= $3 AND name LIKE $4 ESCAPE '\\')"
        );
        assert_eq!(params.len(), 4);

        let (sql, _) = filter.to_sql_with_offset(SqlDialect::PostgreSQL, 2);
        assert!(sql.starts_with("(id IN ($3, $4)"));

        let (sql, _) = filter.to_sql(SqlDialect::MySQL);
        assert_eq!(sql, "(id IN (?, ?) AND age >= ? AND name LIKE ?)");

        let (sql, _) = filter.to_sql(SqlDialect::SQLite);
        assert_eq!(sql, "(id IN (?, ?) AND age >= ? AND name LIKE ? ESCAPE '\\')");
    }

    #[test]
    fn test_empty_lists() {
        let within = SqlFilter::In("id".into(), Vec::new());
        assert_eq!(within.to_string(), "FALSE");
        assert_eq!(within.not().to_string(), "TRUE");
    }

    #[test]
    fn test_not_pushes_into_leaves() {
        let filter = SqlFilter::In("id".into(), vec![FieldValue::Int(1)]).not();
        assert_eq!(filter.to_string(), "id NOT IN ($1)");

        let filter = SqlFilter::IsNull("deleted_at".into()).not();
        assert_eq!(filter.to_string(), "deleted_at IS NOT NULL");

        let filter = SqlFilter::Or(vec![SqlFilter::IsNull("a".into()), SqlFilter::IsNull("b".into())]).not();
        assert_eq!(filter.to_string(), "(a IS NOT NULL AND b IS NOT NULL)");

        let filter = SqlFilter::Compare("age".into(), Comparison::Gt, FieldValue::Int(3)).not();
        assert_eq!(filter.to_string(), "NOT (age > $1)");
    }

    #[test]
    fn test_negated_guarded_like_admits_nulls() {
        let guarded = SqlFilter::IsNotNull("note".into()).and(SqlFilter::Like("note".into(), "%ab%".into()));
        assert_eq!(
            guarded.clone().not().to_string(),
            "(note IS NULL OR note NOT LIKE $1 ESCAPE '\\')"
        );
        assert_eq!(guarded.not().not().to_string(), "(note IS NOT NULL AND note LIKE $1 ESCAPE '\\')");
    }

    #[test]
    fn test_combinator_identities() {
        let leaf = SqlFilter::IsNull("a".into());
        assert_eq!(SqlFilter::None.and(leaf.clone()), leaf);
        assert_eq!(leaf.clone().and(SqlFilter::Never), SqlFilter::Never);
        assert_eq!(leaf.clone().or(SqlFilter::None), SqlFilter::None);
        assert_eq!(SqlFilter::any(Vec::new()), SqlFilter::Never);
    }

    #[test]
    fn test_where_clause() {
        assert_eq!(SqlFilter::None.to_where_clause(SqlDialect::SQLite).0, "");
        let (sql, params) = SqlFilter::Equals("id".into(), FieldValue::Int(5))
            .to_where_clause(SqlDialect::SQLite);
        assert_eq!(sql, " WHERE id = ?");
        assert_eq!(params[0], FieldValue::Int(5));
    }
}
