//! Specification registration.
//!
//! Applications declare each specification as a [`SpecificationDefinition`]
//! and register it on a [`RegistryBuilder`]. Building the registry constructs
//! every specification up front over one shared [`HandlerPipeline`], so
//! configuration errors surface at startup.
//!
//! A registry is bound to one backend, and so to one model type. Applications
//! filtering several models keep one registry per model and check them
//! together with [`validate_all`].
//!
//! ```rust,ignore
//! let mut builder = SpecificationRegistry::builder(MemoryBackend::<User>::new());
//! builder
//!     .add_specification(UserSpecification)
//!     .options(SpecOptions::default());
//! builder
//!     .handlers_mut()
//!     .add_before::<ConstantFilterHandler, _>(AuditHandler)?;
//!
//! let registry = builder.build()?;
//! registry.validate_specifications()?;
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{SpecError, SpecResult};
use crate::fragment::Backend;
use crate::options::SpecOptions;
use crate::pipeline::{HandlerCollection, HandlerPipeline};
use crate::schema::FilterSchema;
use crate::specification::{ErasedSpecification, Specification, SpecificationBuilder};

/// A user-declared specification: its filter type and explicit handlers.
pub trait SpecificationDefinition<B: Backend>: Send + Sync + 'static {
    /// The filter type this specification compiles.
    type Filter: FilterSchema;

    /// Name used in diagnostics. Defaults to the type name without its path.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Register explicit field handlers.
    fn configure(&self, _builder: &mut SpecificationBuilder<B, Self::Filter>) -> SpecResult<()> {
        Ok(())
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let name = type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

type ErasedBox<B> = Box<dyn ErasedSpecification<B>>;

type PendingSpecification<B> =
    Box<dyn FnOnce(&Arc<HandlerPipeline<B>>, &SpecOptions) -> SpecResult<ErasedBox<B>> + Send>;

struct Pending<B: Backend> {
    id: TypeId,
    name: &'static str,
    create: PendingSpecification<B>,
}

/// Collects definitions, handler order and options for a registry.
pub struct RegistryBuilder<B: Backend> {
    backend: B,
    handlers: HandlerCollection<B>,
    options: SpecOptions,
    pending: Vec<Pending<B>>,
}

impl<B: Backend> RegistryBuilder<B> {
    /// Start with the built-in handlers and default options.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handlers: HandlerCollection::with_defaults(),
            options: SpecOptions::default(),
            pending: Vec::new(),
        }
    }

    /// Register a specification definition.
    pub fn add_specification<D: SpecificationDefinition<B>>(&mut self, definition: D) -> &mut Self {
        let name = definition.name();
        self.pending.push(Pending {
            id: TypeId::of::<D>(),
            name,
            create: Box::new(move |pipeline: &Arc<HandlerPipeline<B>>, options: &SpecOptions| {
                let mut builder = SpecificationBuilder::<B, D::Filter>::new(name);
                definition.configure(&mut builder)?;
                let spec: Specification<B, D::Filter> =
                    builder.build(Arc::clone(pipeline), options.clone());
                Ok(Box::new(spec) as ErasedBox<B>)
            }),
        });
        self
    }

    /// The handler collection, for reordering before build.
    pub fn handlers_mut(&mut self) -> &mut HandlerCollection<B> {
        &mut self.handlers
    }

    /// Replace the handler collection.
    pub fn handlers(&mut self, handlers: HandlerCollection<B>) -> &mut Self {
        self.handlers = handlers;
        self
    }

    /// Set the options shared by every specification.
    pub fn options(&mut self, options: SpecOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Construct every specification. The first configuration error aborts.
    pub fn build(self) -> SpecResult<SpecificationRegistry<B>> {
        let pipeline = Arc::new(HandlerPipeline::new(self.backend, self.handlers));
        let mut specifications: IndexMap<TypeId, ErasedBox<B>> = IndexMap::new();

        for pending in self.pending {
            if specifications.contains_key(&pending.id) {
                return Err(SpecError::configuration(
                    pending.name,
                    "specification is registered more than once",
                ));
            }
            let spec = (pending.create)(&pipeline, &self.options)?;
            debug!(specification = spec.name(), filter = spec.filter_name(), "Specification registered");
            specifications.insert(pending.id, spec);
        }

        info!(
            backend = pipeline.backend().name(),
            specifications = specifications.len(),
            "SpecificationRegistry built"
        );

        Ok(SpecificationRegistry {
            pipeline,
            options: self.options,
            specifications,
        })
    }
}

impl<B: Backend> fmt::Debug for RegistryBuilder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("backend", &self.backend.name())
            .field("handlers", &self.handlers)
            .field("options", &self.options)
            .field("pending", &self.pending.iter().map(|p| p.name).collect::<Vec<_>>())
            .finish()
    }
}

/// Every specification of an application over one backend.
pub struct SpecificationRegistry<B: Backend> {
    pipeline: Arc<HandlerPipeline<B>>,
    options: SpecOptions,
    specifications: IndexMap<TypeId, ErasedBox<B>>,
}

impl<B: Backend> SpecificationRegistry<B> {
    pub fn builder(backend: B) -> RegistryBuilder<B> {
        RegistryBuilder::new(backend)
    }

    /// The shared handler pipeline.
    pub fn pipeline(&self) -> &HandlerPipeline<B> {
        &self.pipeline
    }

    pub fn options(&self) -> &SpecOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// Specification names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.specifications.values().map(|s| s.name()).collect()
    }

    /// The specification built from definition `D`.
    pub fn get<D: SpecificationDefinition<B>>(&self) -> Option<&Specification<B, D::Filter>> {
        self.specifications
            .get(&TypeId::of::<D>())
            .and_then(|spec| spec.as_any().downcast_ref())
    }

    /// Find a specification by name.
    pub fn find(&self, name: &str) -> Option<&dyn ErasedSpecification<B>> {
        self.specifications
            .values()
            .find(|spec| spec.name() == name)
            .map(|spec| &**spec)
    }

    /// Compile a filter with the specification built from `D`.
    pub fn create_filter_query<D: SpecificationDefinition<B>>(
        &self,
        filter: &D::Filter,
    ) -> SpecResult<B::Fragment> {
        let spec = self.get::<D>().ok_or_else(|| {
            SpecError::configuration(
                <D::Filter as FilterSchema>::filter_name(),
                format!("specification '{}' is not registered", short_type_name::<D>()),
            )
        })?;
        spec.create_filter_query(filter)
    }

    /// Compile a type-erased filter with the specification named `name`.
    pub fn create_filter_query_erased(&self, name: &str, filter: &dyn Any) -> SpecResult<B::Fragment> {
        let spec = self.find(name).ok_or_else(|| {
            SpecError::configuration(name, "no specification is registered under this name")
        })?;
        spec.create_filter_query_any(filter)
    }

    /// Run every specification against a default filter and collect all failures.
    pub fn validate_specifications(&self) -> SpecResult<()> {
        let errors: Vec<SpecError> = self
            .specifications
            .values()
            .filter_map(|spec| match spec.validate() {
                Ok(()) => None,
                Err(err) => {
                    warn!(specification = spec.name(), error = %err, "Specification failed validation");
                    Some(err)
                }
            })
            .collect();

        if errors.is_empty() {
            debug!(specifications = self.specifications.len(), "All specifications validated");
            Ok(())
        } else {
            Err(SpecError::Validation(errors))
        }
    }
}

/// Startup validation of a registry, independent of its backend type.
pub trait ValidateSpecifications {
    fn validate_specifications(&self) -> SpecResult<()>;
}

impl<B: Backend> ValidateSpecifications for SpecificationRegistry<B> {
    fn validate_specifications(&self) -> SpecResult<()> {
        SpecificationRegistry::validate_specifications(self)
    }
}

/// Validate several registries, collecting every failure into one
/// [`SpecError::Validation`].
pub fn validate_all(registries: &[&dyn ValidateSpecifications]) -> SpecResult<()> {
    let mut errors = Vec::new();
    for registry in registries {
        match registry.validate_specifications() {
            Ok(()) => {}
            Err(SpecError::Validation(failures)) => errors.extend(failures),
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SpecError::Validation(errors))
    }
}

impl<B: Backend> fmt::Debug for SpecificationRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationRegistry")
            .field("backend", &self.pipeline.backend().name())
            .field("handlers", self.pipeline.collection())
            .field("options", &self.options)
            .field("specifications", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::handlers::ConstantFilterHandler;
    use crate::specification::FieldScope;
    use crate::test_support::{Person, Recorder, TextBackend};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    type TestBackend = TextBackend<Person>;

    #[derive(Default)]
    struct PersonFilter {
        id: Option<i32>,
        search: Option<String>,
    }

    crate::filter_schema!(PersonFilter { id, search });

    #[derive(Default)]
    struct DriftedFilter {
        id: Option<i32>,
        removed_column: Option<i32>,
    }

    crate::filter_schema!(DriftedFilter { id, removed_column });

    struct PersonSpecification;

    impl SpecificationDefinition<TestBackend> for PersonSpecification {
        type Filter = PersonFilter;

        fn configure(&self, builder: &mut SpecificationBuilder<TestBackend, PersonFilter>) -> SpecResult<()> {
            builder.handle_field_as("search", "name")?;
            Ok(())
        }
    }

    struct DriftedSpecification;

    impl SpecificationDefinition<TestBackend> for DriftedSpecification {
        type Filter = DriftedFilter;
    }

    struct MisconfiguredSpecification;

    impl SpecificationDefinition<TestBackend> for MisconfiguredSpecification {
        type Filter = DriftedFilter;

        fn name(&self) -> &'static str {
            "Misconfigured"
        }

        fn configure(&self, builder: &mut SpecificationBuilder<TestBackend, DriftedFilter>) -> SpecResult<()> {
            builder.ignore_field("id")?;
            Ok(())
        }
    }

    #[test]
    fn test_default_definition_name() {
        assert_eq!(PersonSpecification.name(), "PersonSpecification");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_get_and_query() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder.add_specification(PersonSpecification);
        let registry = builder.build().unwrap();

        assert_eq!(registry.names(), vec!["PersonSpecification"]);
        assert!(registry.get::<PersonSpecification>().is_some());
        assert!(registry.get::<DriftedSpecification>().is_none());

        let filter = PersonFilter {
            id: Some(2),
            search: Some("ab".into()),
        };
        let fragment = registry.create_filter_query::<PersonSpecification>(&filter).unwrap();
        assert_eq!(fragment.to_string(), "(id == 2 && name == \"ab\")");

        let fragment = registry
            .create_filter_query_erased("PersonSpecification", &filter)
            .unwrap();
        assert_eq!(fragment.to_string(), "(id == 2 && name == \"ab\")");
    }

    #[test]
    fn test_unregistered_specification() {
        let registry = SpecificationRegistry::builder(TestBackend::default()).build().unwrap();
        assert!(registry.is_empty());

        let err = registry
            .create_filter_query::<PersonSpecification>(&PersonFilter::default())
            .unwrap_err();
        assert!(err.to_string().contains("'PersonSpecification' is not registered"));

        let err = registry.create_filter_query_erased("Nope", &1_i32).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_build_fails_fast() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder
            .add_specification(PersonSpecification)
            .add_specification(MisconfiguredSpecification);
        let err = builder.build().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("by convention"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder
            .add_specification(PersonSpecification)
            .add_specification(PersonSpecification);
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_specifications_aggregates() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder
            .add_specification(PersonSpecification)
            .add_specification(DriftedSpecification);
        let registry = builder.build().unwrap();

        let err = registry.validate_specifications().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        match err {
            SpecError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].is_unhandled_fields());
                assert!(errors[0].to_string().contains("'removed_column'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_handler_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder.add_specification(PersonSpecification);
        builder
            .handlers_mut()
            .add_before::<ConstantFilterHandler, _>(Recorder::<1>::new(log.clone()))
            .unwrap();
        let registry = builder.build().unwrap();

        assert_eq!(registry.pipeline().collection().names()[0], "recorder-1");

        let filter = PersonFilter {
            id: Some(3),
            search: None,
        };
        registry.create_filter_query::<PersonSpecification>(&filter).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["recorder-1:id"]);
    }

    #[test]
    fn test_options_reach_specifications() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder
            .add_specification(PersonSpecification)
            .options(SpecOptions::new().auto_handling_disabled(true));
        let registry = builder.build().unwrap();

        let spec = registry.get::<PersonSpecification>().unwrap();
        assert!(spec.options().disable_property_auto_handling);

        let filter = PersonFilter {
            id: Some(3),
            search: Some("x".into()),
        };
        assert_eq!(
            spec.create_filter_query(&filter).unwrap().to_string(),
            "name == \"x\""
        );
    }

    #[test]
    fn test_explicit_closure_sees_filter() {
        struct ScopedSpecification;

        impl SpecificationDefinition<TestBackend> for ScopedSpecification {
            type Filter = PersonFilter;

            fn configure(&self, builder: &mut SpecificationBuilder<TestBackend, PersonFilter>) -> SpecResult<()> {
                builder.handle_field("search", |scope: &FieldScope<'_, TestBackend, PersonFilter>| {
                    // Only search by name when no id is given
                    if scope.filter().id.is_some() {
                        return Ok(None);
                    }
                    match scope.value() {
                        Some(value) => scope.fragment_for("name", &value),
                        None => Ok(None),
                    }
                })?;
                Ok(())
            }
        }

        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder.add_specification(ScopedSpecification);
        let registry = builder.build().unwrap();

        let filter = PersonFilter {
            id: Some(1),
            search: Some("ab".into()),
        };
        assert_eq!(
            registry.create_filter_query::<ScopedSpecification>(&filter).unwrap().to_string(),
            "id == 1"
        );
    }

    #[test]
    fn test_validate_all_collects_across_registries() {
        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder.add_specification(PersonSpecification);
        let healthy = builder.build().unwrap();

        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder
            .add_specification(PersonSpecification)
            .add_specification(DriftedSpecification);
        let mixed = builder.build().unwrap();

        let mut builder = SpecificationRegistry::builder(TestBackend::default());
        builder.add_specification(DriftedSpecification);
        let drifted = builder.build().unwrap();

        validate_all(&[&healthy]).unwrap();
        assert!(validate_all(&[]).is_ok());

        let err = validate_all(&[&healthy, &mixed, &drifted]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        match err {
            SpecError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(SpecError::is_unhandled_fields));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
