//! Filter handlers: the chain-of-responsibility stages of the pipeline.
//!
//! Each handler inspects a [`FilterContext`] and either contributes a
//! fragment or defers. The built-in handlers, in default order:
//!
//! 1. [`ConstantFilterHandler`] - plain scalars, `field == value`
//! 2. [`EnumerableFilterHandler`] - plain sequences, `field in values`
//! 3. [`NullableFilterHandler`] - null checks, exhaustive for the field
//! 4. [`ListFilterHandler`] - list filters, optionally inverted
//! 5. [`StringFilterHandler`] - string filters, optionally inverted
//! 6. [`RangeFilterHandler`] - range filters
//!
//! # Writing a handler
//!
//! ```rust
//! use filterspec_core::{Backend, FilterContext, FilterHandler, Next, SpecResult};
//!
//! struct AuditHandler;
//!
//! impl<B: Backend> FilterHandler<B> for AuditHandler {
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//!
//!     fn can_handle(&self, _ctx: &FilterContext<'_, B>) -> bool {
//!         true
//!     }
//!
//!     fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
//!         tracing::info!(field = ctx.filter_field(), "filtering");
//!         next.run(ctx)
//!     }
//! }
//! ```

mod constant;
mod enumerable;
mod list;
mod nullable;
mod range;
mod string;

pub use constant::ConstantFilterHandler;
pub use enumerable::EnumerableFilterHandler;
pub use list::ListFilterHandler;
pub use nullable::NullableFilterHandler;
pub use range::RangeFilterHandler;
pub use string::StringFilterHandler;

use std::sync::Arc;

use tracing::trace;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::Backend;

/// A pipeline stage that turns one category of filter value into a fragment.
pub trait FilterHandler<B: Backend>: Send + Sync + 'static {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this handler applies to the context. When false the handler
    /// is skipped entirely and [`FilterHandler::handle`] is not called.
    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool;

    /// Contribute to the context, then call `next` to let later handlers run.
    ///
    /// Not calling `next` stops the pipeline for this field.
    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()>;
}

/// A shared, type-erased handler.
pub type SharedHandler<B> = Arc<dyn FilterHandler<B>>;

/// Continuation over the handlers remaining in the pipeline.
pub struct Next<'a, B: Backend> {
    remaining: &'a [SharedHandler<B>],
}

impl<'a, B: Backend> Next<'a, B> {
    pub(crate) fn new(remaining: &'a [SharedHandler<B>]) -> Self {
        Self { remaining }
    }

    /// Run the next applicable handler.
    pub fn run(self, ctx: &mut FilterContext<'_, B>) -> SpecResult<()> {
        let mut remaining = self.remaining;
        while let Some((handler, rest)) = remaining.split_first() {
            if handler.can_handle(ctx) {
                trace!(handler = handler.name(), field = ctx.filter_field(), "FilterHandler::handle()");
                return handler.handle(ctx, Next::new(rest));
            }
            remaining = rest;
        }
        Ok(())
    }

    /// Number of handlers left, including ones that will be skipped.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ListFilter, NullFilter, RangeFilter, StringFilter};
    use crate::pipeline::HandlerCollection;
    use crate::schema::{FilterValue, Model};
    use crate::test_support::{Person, TextBackend};
    use pretty_assertions::assert_eq;

    fn run(field: &str, value: FilterValue) -> String {
        let backend = TextBackend::default();
        let fields = Person::model_fields();
        let model_field = fields
            .iter()
            .find(|f| f.name() == field)
            .expect("model field");
        let handlers = HandlerCollection::<TextBackend<Person>>::with_defaults().handlers();
        let mut ctx = FilterContext::new(&backend, field, &value, model_field);
        Next::new(&handlers).run(&mut ctx).expect("pipeline");
        ctx.into_fragment().to_string()
    }

    #[test]
    fn test_constant() {
        assert_eq!(run("id", FilterValue::constant(5)), "id == 5");
    }

    #[test]
    fn test_sequence() {
        assert_eq!(run("id", FilterValue::sequence(&[1, 2])), "id in [1, 2]");
    }

    #[test]
    fn test_list_inverted() {
        let value = FilterValue::list(&ListFilter::with_values([1, 2, 3]).inverted());
        assert_eq!(run("list_id", value), "!(list_id in [1, 2, 3])");
    }

    #[test]
    fn test_unassigned_list_is_empty() {
        let value = FilterValue::list(&ListFilter::<i32>::new());
        assert_eq!(run("list_id", value), "true");
    }

    #[test]
    fn test_assigned_empty_list_matches_nothing() {
        let value = FilterValue::list(&ListFilter::<i32>::with_values([]));
        assert_eq!(run("list_id", value), "false");
    }

    #[test]
    fn test_string_modes() {
        let value = FilterValue::String(StringFilter::contains("ab"));
        assert_eq!(run("name", value), "name contains \"ab\"");

        let value = FilterValue::String(StringFilter::starts_with("ab").inverted());
        assert_eq!(run("name", value), "!(name starts_with \"ab\")");

        let value = FilterValue::String(StringFilter::exact(""));
        assert_eq!(run("name", value), "true");
    }

    #[test]
    fn test_range_bounds() {
        let value = FilterValue::range(&RangeFilter::between(0, 5));
        assert_eq!(run("age", value), "(age >= 0 && age <= 5)");

        let value = FilterValue::range(&RangeFilter::between(0, 5).exclusive());
        assert_eq!(run("age", value), "(age > 0 && age < 5)");

        let value = FilterValue::range(&RangeFilter::between(5, 9).start_as_equals());
        assert_eq!(run("age", value), "age == 5");

        let value = FilterValue::range(&RangeFilter::<i32>::new());
        assert_eq!(run("age", value), "true");
    }

    #[test]
    fn test_null_check_is_exhaustive() {
        let value = FilterValue::String(StringFilter::contains("ab").null());
        assert_eq!(run("nickname", value), "nickname is null");

        let value = FilterValue::String(StringFilter::contains("ab").not_null());
        assert_eq!(run("nickname", value), "nickname is not null");
    }

    #[test]
    fn test_null_check_on_required_field() {
        let value = FilterValue::Nullable(NullFilter::null());
        assert_eq!(run("id", value), "false");

        let value = FilterValue::range(&RangeFilter::starting_at(3).not_null());
        assert_eq!(run("age", value), "age >= 3");
    }

    #[test]
    fn test_next_remaining() {
        let handlers = HandlerCollection::<TextBackend<Person>>::with_defaults().handlers();
        assert_eq!(Next::new(&handlers).remaining(), 6);
        assert_eq!(Next::new(&handlers[4..]).remaining(), 2);
    }
}
