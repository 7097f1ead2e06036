//! The in-memory backend.

use std::fmt;
use std::marker::PhantomData;

use filterspec_core::{
    Backend, Comparison, FieldTarget, FieldValue, Fragment, Model, NullCheck, SpecResult,
    StringMatch,
};

use crate::predicate::Predicate;

/// Builds [`Predicate`] fragments for model type `M`.
pub struct MemoryBackend<M> {
    ignore_case: bool,
    _model: PhantomData<fn() -> M>,
}

impl<M> MemoryBackend<M> {
    pub fn new() -> Self {
        Self {
            ignore_case: false,
            _model: PhantomData,
        }
    }

    /// Match strings case-insensitively.
    pub fn case_insensitive(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case
    }
}

impl<M> Default for MemoryBackend<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for MemoryBackend<M> {
    fn clone(&self) -> Self {
        Self {
            ignore_case: self.ignore_case,
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for MemoryBackend<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}

impl<M: Model> Backend for MemoryBackend<M> {
    type Model = M;
    type Fragment = Predicate<M>;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn equals(&self, target: FieldTarget<'_, M>, value: &FieldValue) -> SpecResult<Predicate<M>> {
        let field = target.field().clone();
        if value.is_null() {
            return Ok(Predicate::IsNull(field));
        }
        Ok(Predicate::Eq {
            field,
            value: value.clone(),
        })
    }

    fn one_of(&self, target: FieldTarget<'_, M>, values: &[FieldValue]) -> SpecResult<Predicate<M>> {
        if values.is_empty() {
            return Ok(Predicate::never());
        }
        Ok(Predicate::In {
            field: target.field().clone(),
            values: values.to_vec(),
        })
    }

    fn null_check(&self, target: FieldTarget<'_, M>, check: NullCheck) -> SpecResult<Predicate<M>> {
        let field = target.field().clone();
        Ok(match check {
            NullCheck::IsNull => Predicate::IsNull(field),
            NullCheck::IsNotNull => Predicate::IsNotNull(field),
        })
    }

    fn compare(
        &self,
        target: FieldTarget<'_, M>,
        op: Comparison,
        value: &FieldValue,
    ) -> SpecResult<Predicate<M>> {
        Ok(Predicate::Cmp {
            field: target.field().clone(),
            op,
            value: value.clone(),
        })
    }

    fn text(&self, target: FieldTarget<'_, M>, mode: StringMatch, value: &str) -> SpecResult<Predicate<M>> {
        Ok(Predicate::Text {
            field: target.field().clone(),
            mode,
            value: value.to_string(),
            ignore_case: self.ignore_case,
        })
    }
}
