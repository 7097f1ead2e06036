use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::{Backend, Fragment};
use crate::schema::FilterValue;

use super::{FilterHandler, Next};

/// Handles [`ListFilter`](crate::ListFilter) values with a membership fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilterHandler;

impl<B: Backend> FilterHandler<B> for ListFilterHandler {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        matches!(ctx.value(), FilterValue::List { .. })
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let FilterValue::List { filter, .. } = ctx.value() {
            if let Some(values) = filter.values() {
                let mut fragment = ctx.backend().one_of(ctx.target(), values)?;
                if filter.is_inverted() {
                    fragment = fragment.not();
                }
                debug!(field = ctx.filter_field(), fragment = ?fragment, "Created list fragment");
                ctx.push(fragment);
            }
        }
        next.run(ctx)
    }
}
