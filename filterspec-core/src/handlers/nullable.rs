use tracing::debug;

use crate::context::FilterContext;
use crate::error::SpecResult;
use crate::fragment::{Backend, Fragment, NullCheck};

use super::{FilterHandler, Next};

/// Handles the null-check flags carried by every filter kind.
///
/// A matched null check is exhaustive: later handlers do not run for the
/// field. `is_null` on a field that cannot hold null never matches.
/// `is_not_null` on such a field is always true, so the pipeline continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableFilterHandler;

impl<B: Backend> FilterHandler<B> for NullableFilterHandler {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn can_handle(&self, ctx: &FilterContext<'_, B>) -> bool {
        ctx.value().null_flags().is_some()
    }

    fn handle(&self, ctx: &mut FilterContext<'_, B>, next: Next<'_, B>) -> SpecResult<()> {
        let Some(flags) = ctx.value().null_flags() else {
            return next.run(ctx);
        };
        let nullable = ctx.model_field().is_nullable();

        let fragment = if flags.is_null() {
            if nullable {
                ctx.backend().null_check(ctx.target(), NullCheck::IsNull)?
            } else {
                B::Fragment::never()
            }
        } else if flags.is_not_null() && nullable {
            ctx.backend().null_check(ctx.target(), NullCheck::IsNotNull)?
        } else {
            return next.run(ctx);
        };

        debug!(field = ctx.filter_field(), fragment = ?fragment, "Created nullable fragment");
        ctx.push(fragment);
        Ok(())
    }
}
