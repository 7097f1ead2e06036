use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::{Backend, Fragment};
use crate::schema::FilterValue;

use super::{FilterHandler, Next};

/// Handles [`StringFilter`](crate::StringFilter) values.
///
/// Filters without a value produce nothing here; their null flags are the
/// nullable handler's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFilterHandler;

impl<B: Backend> FilterHandler<B> for StringFilterHandler {
    fn name(&self) -> &'static str {
        "string"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        matches!(ctx.value(), FilterValue::String(_))
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let FilterValue::String(filter) = ctx.value() {
            if let Some(value) = filter.value().filter(|v| !v.is_empty()) {
                let mut fragment = ctx.backend().text(ctx.target(), filter.mode(), value)?;
                if filter.is_inverted() {
                    fragment = fragment.not();
                }
                debug!(field = ctx.filter_field(), fragment = ?fragment, "Created string fragment");
                ctx.push(fragment);
            }
        }
        next.run(ctx)
    }
}
