use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::{Backend, Comparison, Fragment};
use crate::schema::FilterValue;

use super::{FilterHandler, Next};

/// Handles [`RangeFilter`](crate::RangeFilter) values with bound comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeFilterHandler;

impl RangeFilterHandler {
    fn fragment<B: Backend>(ctx: &FilterContext<'_, B>) -> SpecResult<Option<B::Fragment>> {
        let FilterValue::Range { filter, .. } = ctx.value() else {
            return Ok(None);
        };
        let backend = ctx.backend();

        if let (true, Some(start)) = (filter.use_start_as_equals(), filter.start()) {
            return backend.equals(ctx.target(), start).map(Some);
        }

        let lower = filter
            .start()
            .map(|start| backend.compare(ctx.target(), Comparison::lower(filter.is_exclusive()), start))
            .transpose()?;
        let upper = filter
            .end()
            .map(|end| backend.compare(ctx.target(), Comparison::upper(filter.is_exclusive()), end))
            .transpose()?;

        Ok(match (lower, upper) {
            (Some(lower), Some(upper)) => Some(lower.and(upper)),
            (Some(lower), None) => Some(lower),
            (None, upper) => upper,
        })
    }
}

impl<B: Backend> FilterHandler<B> for RangeFilterHandler {
    fn name(&self) -> &'static str {
        "range"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        matches!(ctx.value(), FilterValue::Range { .. })
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        if let Some(fragment) = Self::fragment(ctx)? {
            debug!(field = ctx.filter_field(), fragment = ?fragment, "Created range fragment");
            ctx.push(fragment);
        }
        next.run(ctx)
    }
}
