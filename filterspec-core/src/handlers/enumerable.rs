use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::Backend;
use crate::schema::FilterValue;

use super::{FilterHandler, Next};

/// Handles plain sequences with a membership fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerableFilterHandler;

impl<B: Backend> FilterHandler<B> for EnumerableFilterHandler {
    fn name(&self) -> &'static str {
        "enumerable"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        matches!(ctx.value(), FilterValue::Sequence { .. })
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let FilterValue::Sequence { values, .. } = ctx.value() {
            let fragment = ctx.backend().one_of(ctx.target(), values)?;
            debug!(field = ctx.filter_field(), fragment = ?fragment, "Created enumerable fragment");
            ctx.push(fragment);
        }
        next.run(ctx)
    }
}
