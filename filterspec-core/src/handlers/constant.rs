use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::Backend;
use crate::schema::FilterValue;

use super::{FilterHandler, Next};

/// Handles plain scalar filter fields with an equality fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFilterHandler;

impl<B: Backend> FilterHandler<B> for ConstantFilterHandler {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        matches!(ctx.value(), FilterValue::Constant(_))
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let FilterValue::Constant(value) = ctx.value() {
            let fragment = ctx.backend().equals(ctx.target(), value)?;
            debug!(field = ctx.filter_field(), fragment = ?fragment, "Created constant fragment");
            ctx.push(fragment);
        }
        next.run(ctx)
    }
}
