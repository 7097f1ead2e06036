//! Per-field evaluation context handed through the handler pipeline.

use std::fmt;

use crate::fragment::{Backend, FieldTarget, Fragment};
use crate::schema::{FilterValue, ModelField};

/// State for one filter field on its way through the pipeline.
///
/// Handlers read the filter value and the target model field, and AND their
/// fragments onto the context with [`FilterContext::push`].
pub struct FilterContext<'a, B: Backend> {
    backend: &'a B,
    filter_field: &'a str,
    value: &'a FilterValue,
    model_field: &'a ModelField<B::Model>,
    path: String,
    fragment: B::Fragment,
}

impl<'a, B: Backend> FilterContext<'a, B> {
    /// Create a context with an empty fragment.
    pub fn new(
        backend: &'a B,
        filter_field: &'a str,
        value: &'a FilterValue,
        model_field: &'a ModelField<B::Model>,
    ) -> Self {
        Self {
            backend,
            filter_field,
            value,
            model_field,
            path: backend.field_path(model_field),
            fragment: B::Fragment::empty(),
        }
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// Name of the filter field being processed.
    pub fn filter_field(&self) -> &'a str {
        self.filter_field
    }

    /// The filter field's runtime value.
    pub fn value(&self) -> &'a FilterValue {
        self.value
    }

    /// The target model field.
    pub fn model_field(&self) -> &'a ModelField<B::Model> {
        self.model_field
    }

    /// Backend path of the model field.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fragment target for backend calls.
    pub fn target(&self) -> FieldTarget<'_, B::Model> {
        FieldTarget::new(self.model_field, &self.path)
    }

    /// The fragment accumulated so far.
    pub fn fragment(&self) -> &B::Fragment {
        &self.fragment
    }

    /// AND a fragment onto the accumulated fragment.
    pub fn push(&mut self, fragment: B::Fragment) {
        let current = std::mem::replace(&mut self.fragment, B::Fragment::empty());
        self.fragment = current.and(fragment);
    }

    /// Consume the context, returning the accumulated fragment.
    pub fn into_fragment(self) -> B::Fragment {
        self.fragment
    }
}

impl<B: Backend> fmt::Debug for FilterContext<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("backend", &self.backend.name())
            .field("filter_field", &self.filter_field)
            .field("value", &self.value)
            .field("model_field", &self.model_field.name())
            .field("path", &self.path)
            .field("fragment", &self.fragment)
            .finish()
    }
}
