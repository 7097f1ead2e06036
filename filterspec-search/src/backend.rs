//! The search backend.

use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use filterspec_core::{
    Backend, Comparison, FieldTarget, FieldValue, Fragment, Model, ModelField, NullCheck,
    SpecResult, StringMatch,
};

use crate::naming::FieldNaming;
use crate::query::SearchQuery;

/// Builds [`SearchQuery`] documents for model type `M`.
pub struct SearchBackend<M> {
    naming: FieldNaming,
    disable_scoring: bool,
    case_insensitive: bool,
    _model: PhantomData<fn() -> M>,
}

impl<M> SearchBackend<M> {
    pub fn new() -> Self {
        Self {
            naming: FieldNaming::default(),
            disable_scoring: false,
            case_insensitive: false,
            _model: PhantomData,
        }
    }

    /// Set the index field naming strategy.
    pub fn naming(mut self, naming: FieldNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Put every leaf query in filter context.
    pub fn disable_scoring(mut self) -> Self {
        self.disable_scoring = true;
        self
    }

    /// Make wildcard queries case-insensitive.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn field_naming(&self) -> FieldNaming {
        self.naming
    }

    pub fn is_scoring_disabled(&self) -> bool {
        self.disable_scoring
    }

    fn leaf(&self, query: SearchQuery) -> SearchQuery {
        if self.disable_scoring {
            query.into_filter_context()
        } else {
            query
        }
    }

    fn missing(&self, field: &str) -> SearchQuery {
        self.leaf(SearchQuery::exists(field)).not()
    }
}

impl<M> Default for SearchBackend<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for SearchBackend<M> {
    fn clone(&self) -> Self {
        Self {
            naming: self.naming,
            disable_scoring: self.disable_scoring,
            case_insensitive: self.case_insensitive,
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for SearchBackend<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBackend")
            .field("naming", &self.naming)
            .field("disable_scoring", &self.disable_scoring)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

/// Escape wildcard metacharacters so `value` matches literally.
pub fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl<M: Model> Backend for SearchBackend<M> {
    type Model = M;
    type Fragment = SearchQuery;

    fn name(&self) -> &'static str {
        "search"
    }

    fn field_path(&self, field: &ModelField<M>) -> String {
        self.naming.apply(field.name())
    }

    fn equals(&self, target: FieldTarget<'_, M>, value: &FieldValue) -> SpecResult<SearchQuery> {
        if value.is_null() {
            return Ok(self.missing(target.path()));
        }
        Ok(self.leaf(SearchQuery::term(target.path(), value.clone())))
    }

    fn one_of(&self, target: FieldTarget<'_, M>, values: &[FieldValue]) -> SpecResult<SearchQuery> {
        if values.is_empty() {
            return Ok(SearchQuery::never());
        }
        Ok(self.leaf(SearchQuery::terms(target.path(), values.to_vec())))
    }

    fn null_check(&self, target: FieldTarget<'_, M>, check: NullCheck) -> SpecResult<SearchQuery> {
        Ok(match check {
            NullCheck::IsNull => self.missing(target.path()),
            NullCheck::IsNotNull => self.leaf(SearchQuery::exists(target.path())),
        })
    }

    fn compare(
        &self,
        target: FieldTarget<'_, M>,
        op: Comparison,
        value: &FieldValue,
    ) -> SpecResult<SearchQuery> {
        Ok(self.leaf(SearchQuery::range(target.path(), op, value.clone())))
    }

    fn text(&self, target: FieldTarget<'_, M>, mode: StringMatch, value: &str) -> SpecResult<SearchQuery> {
        let field = target.path();

        let query = if target.field().is_full_text() {
            match mode {
                StringMatch::Exact => SearchQuery::match_phrase(field, value),
                _ => SearchQuery::match_text(field, value),
            }
        } else {
            let escaped = escape_wildcard(value);
            let pattern = match mode {
                StringMatch::Exact => return Ok(self.leaf(SearchQuery::term(field, value.into()))),
                StringMatch::Contains => format!("*{}*", escaped),
                StringMatch::StartsWith => format!("{}*", escaped),
                StringMatch::EndsWith => format!("*{}", escaped),
            };
            SearchQuery::wildcard(field, pattern, self.case_insensitive)
        };

        trace!(field, mode = mode.as_str(), "Text query");
        Ok(self.leaf(query))
    }
}
