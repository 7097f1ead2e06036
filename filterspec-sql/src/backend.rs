//! The SQL backend.

use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use filterspec_core::{
    Backend, Comparison, FieldTarget, FieldValue, Fragment, Model, ModelField, NullCheck,
    SpecResult, StringMatch,
};

use crate::dialect::{SqlDialect, escape_like};
use crate::filter::SqlFilter;

/// Builds [`SqlFilter`] fragments over the columns of model type `M`.
///
/// Column names are the model field names, quoted for the dialect when they
/// collide with reserved words, and optionally qualified with a table alias.
pub struct SqlBackend<M> {
    dialect: SqlDialect,
    table: Option<String>,
    _model: PhantomData<fn() -> M>,
}

impl<M> SqlBackend<M> {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            table: None,
            _model: PhantomData,
        }
    }

    pub fn postgres() -> Self {
        Self::new(SqlDialect::PostgreSQL)
    }

    pub fn mysql() -> Self {
        Self::new(SqlDialect::MySQL)
    }

    pub fn sqlite() -> Self {
        Self::new(SqlDialect::SQLite)
    }

    /// Qualify every column with a table name or alias.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    fn column(target: FieldTarget<'_, M>) -> String {
        target.path().to_string()
    }
}

impl<M> Default for SqlBackend<M> {
    fn default() -> Self {
        Self::new(SqlDialect::default())
    }
}

impl<M> Clone for SqlBackend<M> {
    fn clone(&self) -> Self {
        Self {
            dialect: self.dialect,
            table: self.table.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for SqlBackend<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlBackend")
            .field("dialect", &self.dialect)
            .field("table", &self.table)
            .finish()
    }
}

impl<M: Model> Backend for SqlBackend<M> {
    type Model = M;
    type Fragment = SqlFilter;

    fn name(&self) -> &'static str {
        "sql"
    }

    fn field_path(&self, field: &ModelField<M>) -> String {
        let column = self.dialect.quote_identifier(field.name());
        match &self.table {
            Some(table) => format!("{}.{}", self.dialect.quote_identifier(table), column),
            None => column,
        }
    }

    fn equals(&self, target: FieldTarget<'_, M>, value: &FieldValue) -> SpecResult<SqlFilter> {
        let column = Self::column(target);
        if value.is_null() {
            return Ok(SqlFilter::IsNull(column));
        }
        Ok(SqlFilter::Equals(column, value.clone()))
    }

    fn one_of(&self, target: FieldTarget<'_, M>, values: &[FieldValue]) -> SpecResult<SqlFilter> {
        if values.is_empty() {
            return Ok(SqlFilter::never());
        }
        Ok(SqlFilter::In(Self::column(target), values.to_vec()))
    }

    fn null_check(&self, target: FieldTarget<'_, M>, check: NullCheck) -> SpecResult<SqlFilter> {
        let column = Self::column(target);
        Ok(match check {
            NullCheck::IsNull => SqlFilter::IsNull(column),
            NullCheck::IsNotNull => SqlFilter::IsNotNull(column),
        })
    }

    fn compare(
        &self,
        target: FieldTarget<'_, M>,
        op: Comparison,
        value: &FieldValue,
    ) -> SpecResult<SqlFilter> {
        Ok(SqlFilter::Compare(Self::column(target), op, value.clone()))
    }

    /// Matches on nullable columns are guarded with `IS NOT NULL`, so an
    /// inverted match renders `col IS NULL OR col NOT LIKE ...` and keeps
    /// null rows.
    fn text(&self, target: FieldTarget<'_, M>, mode: StringMatch, value: &str) -> SpecResult<SqlFilter> {
        let column = Self::column(target);
        let escaped = escape_like(value);
        let pattern = match mode {
            StringMatch::Exact => None,
            StringMatch::Contains => Some(format!("%{}%", escaped)),
            StringMatch::StartsWith => Some(format!("{}%", escaped)),
            StringMatch::EndsWith => Some(format!("%{}", escaped)),
        };
        let matched = match pattern {
            Some(pattern) => {
                trace!(column = %column, pattern = %pattern, "LIKE pattern");
                SqlFilter::Like(column.clone(), pattern)
            }
            None => SqlFilter::Equals(column.clone(), value.into()),
        };

        if target.field().is_nullable() {
            return Ok(SqlFilter::IsNotNull(column).and(matched));
        }
        Ok(matched)
    }
}
