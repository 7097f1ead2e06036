//! Handler collection and the cached handler pipeline.
//!
//! [`HandlerCollection`] is the ordered, mutable registry used while
//! configuring. [`HandlerPipeline`] owns a backend and a collection and
//! snapshots the handler order on first execution. The order is fixed from
//! then on.
//!
//! ```rust,ignore
//! let mut handlers = HandlerCollection::with_defaults();
//! handlers.add_before::<ConstantFilterHandler, _>(AuditHandler)?;
//! let pipeline = HandlerPipeline::new(backend, handlers);
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::context::FilterContext;
use crate::error::{SpecError, SpecResult};
use crate::fragment::Backend;
use crate::handlers::{
    ConstantFilterHandler, EnumerableFilterHandler, FilterHandler, ListFilterHandler, Next,
    NullableFilterHandler, RangeFilterHandler, SharedHandler, StringFilterHandler,
};
use crate::schema::{FilterValue, ModelField};

struct HandlerEntry<B: Backend> {
    id: TypeId,
    handler: SharedHandler<B>,
}

impl<B: Backend> Clone for HandlerEntry<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Ordered registry of filter handlers keyed by handler type.
pub struct HandlerCollection<B: Backend> {
    entries: Vec<HandlerEntry<B>>,
}

impl<B: Backend> HandlerCollection<B> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a collection holding the built-in handlers in default order.
    pub fn with_defaults() -> Self {
        let mut collection = Self::new();
        collection
            .add_last(ConstantFilterHandler)
            .add_last(EnumerableFilterHandler)
            .add_last(NullableFilterHandler)
            .add_last(ListFilterHandler)
            .add_last(StringFilterHandler)
            .add_last(RangeFilterHandler);
        collection
    }

    fn entry<H: FilterHandler<B>>(handler: H) -> HandlerEntry<B> {
        HandlerEntry {
            id: TypeId::of::<H>(),
            handler: Arc::new(handler),
        }
    }

    fn position<M: 'static>(&self) -> SpecResult<usize> {
        let id = TypeId::of::<M>();
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(SpecError::HandlerNotFound(type_name::<M>()))
    }

    /// Insert a handler at the front.
    pub fn add_first<H: FilterHandler<B>>(&mut self, handler: H) -> &mut Self {
        self.entries.insert(0, Self::entry(handler));
        self
    }

    /// Append a handler at the end.
    pub fn add_last<H: FilterHandler<B>>(&mut self, handler: H) -> &mut Self {
        self.entries.push(Self::entry(handler));
        self
    }

    /// Insert a handler immediately before the first `Marker` handler.
    pub fn add_before<Marker: 'static, H: FilterHandler<B>>(
        &mut self,
        handler: H,
    ) -> SpecResult<&mut Self> {
        let index = self.position::<Marker>()?;
        self.entries.insert(index, Self::entry(handler));
        Ok(self)
    }

    /// Insert a handler immediately after the first `Marker` handler.
    pub fn add_after<Marker: 'static, H: FilterHandler<B>>(
        &mut self,
        handler: H,
    ) -> SpecResult<&mut Self> {
        let index = self.position::<Marker>()?;
        self.entries.insert(index + 1, Self::entry(handler));
        Ok(self)
    }

    /// Remove every handler of type `H`. Returns true if any was removed.
    pub fn remove<H: 'static>(&mut self) -> bool {
        let id = TypeId::of::<H>();
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Check if a handler of type `H` is registered.
    pub fn contains<H: 'static>(&self) -> bool {
        let id = TypeId::of::<H>();
        self.entries.iter().any(|e| e.id == id)
    }

    /// Handler names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the handlers in execution order.
    pub fn handlers(&self) -> Vec<SharedHandler<B>> {
        self.entries.iter().map(|e| Arc::clone(&e.handler)).collect()
    }
}

impl<B: Backend> Default for HandlerCollection<B> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<B: Backend> Clone for HandlerCollection<B> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for HandlerCollection<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A backend plus a fixed handler order, shared by every specification of a registry.
pub struct HandlerPipeline<B: Backend> {
    backend: B,
    collection: HandlerCollection<B>,
    chain: OnceLock<Vec<SharedHandler<B>>>,
}

impl<B: Backend> HandlerPipeline<B> {
    /// Create a pipeline over `collection`.
    pub fn new(backend: B, collection: HandlerCollection<B>) -> Self {
        Self {
            backend,
            collection,
            chain: OnceLock::new(),
        }
    }

    /// Create a pipeline with the built-in handlers.
    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, HandlerCollection::with_defaults())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The handler collection the chain is built from.
    pub fn collection(&self) -> &HandlerCollection<B> {
        &self.collection
    }

    /// Whether the chain has been built.
    pub fn is_built(&self) -> bool {
        self.chain.get().is_some()
    }

    /// The handler chain, built on first call.
    pub fn chain(&self) -> &[SharedHandler<B>] {
        self.chain.get_or_init(|| {
            debug!(
                backend = self.backend.name(),
                handlers = ?self.collection.names(),
                "HandlerPipeline built"
            );
            self.collection.handlers()
        })
    }

    /// Run one filter field through the chain and return its fragment.
    pub fn execute(
        &self,
        filter_field: &str,
        value: &FilterValue,
        model_field: &ModelField<B::Model>,
    ) -> SpecResult<B::Fragment> {
        let mut ctx = FilterContext::new(&self.backend, filter_field, value, model_field);
        Next::new(self.chain()).run(&mut ctx)?;
        Ok(ctx.into_fragment())
    }
}

impl<B: Backend + fmt::Debug> fmt::Debug for HandlerPipeline<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerPipeline")
            .field("backend", &self.backend)
            .field("handlers", &self.collection)
            .field("built", &self.is_built())
            .finish()
    }
}
