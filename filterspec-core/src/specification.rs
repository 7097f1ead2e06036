//! The specification engine: one per (model, filter) pair.
//!
//! A [`Specification`] pairs every filter field with a model field of the
//! same name, or with an explicit handler registered on the
//! [`SpecificationBuilder`]. [`Specification::create_filter_query`] walks the
//! filter fields in declaration order, produces one fragment per field and
//! ANDs them together.
//!
//! ```rust,ignore
//! let mut builder = SpecificationBuilder::<MemoryBackend<User>, UserFilter>::new("UserSpec");
//! builder
//!     .handle_field_as("user_name", "name")?
//!     .ignore_field("page")?;
//! let spec = builder.build(pipeline, SpecOptions::default());
//!
//! let predicate = spec.create_filter_query(&filter)?;
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, error};

use crate::error::{SpecError, SpecResult};
use crate::fragment::{Backend, Fragment};
use crate::options::SpecOptions;
use crate::pipeline::HandlerPipeline;
use crate::schema::{FilterField, FilterSchema, FilterValue, Model, ModelField};
use crate::value::FieldType;

/// Model path reported for failures inside explicit field handlers.
pub const EXPLICIT_PATH: &str = "(explicit)";

/// An explicit per-field handler.
///
/// Returning `Ok(None)` contributes nothing for the field.
pub type FieldHandlerFn<B, F> = Arc<
    dyn Fn(&FieldScope<'_, B, F>) -> SpecResult<Option<<B as Backend>::Fragment>> + Send + Sync,
>;

/// What an explicit field handler sees.
pub struct FieldScope<'a, B: Backend, F: FilterSchema> {
    spec: &'a Specification<B, F>,
    field: &'a FilterField<F>,
    filter: &'a F,
}

impl<'a, B: Backend, F: FilterSchema> FieldScope<'a, B, F> {
    /// The whole filter instance.
    pub fn filter(&self) -> &'a F {
        self.filter
    }

    /// Name of the filter field being handled.
    pub fn field_name(&self) -> &'static str {
        self.field.name()
    }

    /// This field's value, `None` when unset.
    pub fn value(&self) -> Option<FilterValue> {
        self.field.value(self.filter)
    }

    pub fn backend(&self) -> &'a B {
        self.spec.pipeline.backend()
    }

    /// Look up a model field by name.
    pub fn model_field(&self, name: &str) -> Option<&'a ModelField<B::Model>> {
        self.spec.model_fields.get(name)
    }

    /// Run the default per-field fragment creation against `model_field`.
    ///
    /// Absent values and values producing no rule yield `None`. Failures are
    /// reported against `model_field`.
    pub fn fragment_for(
        &self,
        model_field: &str,
        value: &FilterValue,
    ) -> SpecResult<Option<B::Fragment>> {
        let target = self.spec.model_fields.get(model_field).ok_or_else(|| {
            SpecError::unknown_model_field(B::Model::model_name(), model_field)
        })?;

        self.spec
            .field_fragment(self.field.name(), value.element_type(), value, target)
            .map_err(|e| {
                let path = self.backend().field_path(target);
                e.in_field(&self.spec.name, self.field.name(), path)
            })
    }
}

/// Configures explicit handlers before a [`Specification`] is built.
///
/// Every registration fails fast: a filter field can be claimed once, and only
/// if no model field of the same name exists.
pub struct SpecificationBuilder<B: Backend, F: FilterSchema> {
    name: String,
    filter_fields: Vec<FilterField<F>>,
    model_fields: IndexMap<&'static str, ModelField<B::Model>>,
    unmatched: IndexSet<&'static str>,
    explicit: IndexMap<&'static str, FieldHandlerFn<B, F>>,
}

impl<B: Backend, F: FilterSchema> SpecificationBuilder<B, F> {
    /// Enumerate the filter and model fields and compute the unmatched set.
    pub fn new(name: impl Into<String>) -> Self {
        let filter_fields = F::filter_fields();
        let model_fields: IndexMap<_, _> = B::Model::model_fields()
            .into_iter()
            .map(|field| (field.name(), field))
            .collect();
        let unmatched = filter_fields
            .iter()
            .map(FilterField::name)
            .filter(|name| !model_fields.contains_key(name))
            .collect();

        Self {
            name: name.into(),
            filter_fields,
            model_fields,
            unmatched,
            explicit: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filter fields still awaiting a handler.
    pub fn unmatched(&self) -> Vec<&'static str> {
        self.unmatched.iter().copied().collect()
    }

    fn claim(&mut self, field: &str) -> SpecResult<&'static str> {
        if self.explicit.contains_key(field) {
            return Err(SpecError::configuration(
                F::filter_name(),
                format!("field '{}' is already handled", field),
            ));
        }

        let name = self
            .filter_fields
            .iter()
            .map(FilterField::name)
            .find(|name| *name == field)
            .ok_or_else(|| {
                SpecError::configuration(F::filter_name(), format!("unknown filter field '{}'", field))
            })?;

        if !self.unmatched.shift_remove(name) {
            return Err(SpecError::configuration(
                F::filter_name(),
                format!(
                    "field '{}' is mapped to '{}.{}' by convention",
                    field,
                    B::Model::model_name(),
                    field
                ),
            ));
        }

        Ok(name)
    }

    /// Register an explicit handler for `field`.
    pub fn handle_field<H>(&mut self, field: &str, handler: H) -> SpecResult<&mut Self>
    where
        H: Fn(&FieldScope<'_, B, F>) -> SpecResult<Option<B::Fragment>> + Send + Sync + 'static,
    {
        let name = self.claim(field)?;
        self.explicit.insert(name, Arc::new(handler));
        Ok(self)
    }

    /// Route `field` through the default pipeline against a differently named
    /// model field.
    pub fn handle_field_as(&mut self, field: &str, model_field: &str) -> SpecResult<&mut Self> {
        let target = self
            .model_fields
            .get(model_field)
            .map(ModelField::name)
            .ok_or_else(|| SpecError::unknown_model_field(B::Model::model_name(), model_field))?;

        self.handle_field(field, move |scope: &FieldScope<'_, B, F>| match scope.value() {
            Some(value) => scope.fragment_for(target, &value),
            None => Ok(None),
        })
    }

    /// Mark `field` as handled without contributing any fragment.
    pub fn ignore_field(&mut self, field: &str) -> SpecResult<&mut Self> {
        self.handle_field(field, |_: &FieldScope<'_, B, F>| Ok(None))
    }

    /// Finish configuration.
    pub fn build(self, pipeline: Arc<HandlerPipeline<B>>, options: SpecOptions) -> Specification<B, F> {
        debug!(
            specification = %self.name,
            filter = F::filter_name(),
            model = B::Model::model_name(),
            explicit = self.explicit.len(),
            unmatched = self.unmatched.len(),
            "Specification built"
        );

        Specification {
            name: self.name,
            pipeline,
            options,
            filter_fields: self.filter_fields,
            model_fields: self.model_fields,
            unmatched: self.unmatched,
            explicit: self.explicit,
        }
    }
}

impl<B: Backend, F: FilterSchema> fmt::Debug for SpecificationBuilder<B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationBuilder")
            .field("name", &self.name)
            .field("explicit", &self.explicit.keys().collect::<Vec<_>>())
            .field("unmatched", &self.unmatched)
            .finish()
    }
}

/// Compiles filter instances of type `F` into fragments of backend `B`.
pub struct Specification<B: Backend, F: FilterSchema> {
    name: String,
    pipeline: Arc<HandlerPipeline<B>>,
    options: SpecOptions,
    filter_fields: Vec<FilterField<F>>,
    model_fields: IndexMap<&'static str, ModelField<B::Model>>,
    unmatched: IndexSet<&'static str>,
    explicit: IndexMap<&'static str, FieldHandlerFn<B, F>>,
}

impl<B: Backend, F: FilterSchema> Specification<B, F> {
    /// Start configuring a specification.
    pub fn builder(name: impl Into<String>) -> SpecificationBuilder<B, F> {
        SpecificationBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &SpecOptions {
        &self.options
    }

    pub fn pipeline(&self) -> &HandlerPipeline<B> {
        &self.pipeline
    }

    /// Filter fields in declaration order.
    pub fn filter_fields(&self) -> &[FilterField<F>] {
        &self.filter_fields
    }

    /// Look up a model field by name.
    pub fn model_field(&self, name: &str) -> Option<&ModelField<B::Model>> {
        self.model_fields.get(name)
    }

    /// Filter fields neither convention-mapped nor explicitly handled.
    pub fn unmatched(&self) -> Vec<&'static str> {
        self.unmatched.iter().copied().collect()
    }

    /// Whether `field` has an explicit handler.
    pub fn is_explicit(&self, field: &str) -> bool {
        self.explicit.contains_key(field)
    }

    /// Compile a filter instance into one fragment.
    pub fn create_filter_query(&self, filter: &F) -> SpecResult<B::Fragment> {
        let mut fragments = Vec::with_capacity(self.filter_fields.len());

        for field in &self.filter_fields {
            if let Some(handler) = self.explicit.get(field.name()) {
                let scope = FieldScope {
                    spec: self,
                    field,
                    filter,
                };
                let fragment = handler(&scope)
                    .map_err(|e| self.field_failed(e, field.name(), EXPLICIT_PATH))?;
                fragments.extend(fragment);
                continue;
            }

            if self.options.disable_property_auto_handling {
                continue;
            }

            // Unmatched fields are reported after the loop
            let Some(model_field) = self.model_fields.get(field.name()) else {
                continue;
            };
            let Some(value) = field.value(filter) else {
                continue;
            };

            let fragment = self
                .field_fragment(field.name(), field.element_type(), &value, model_field)
                .map_err(|e| {
                    let path = self.pipeline.backend().field_path(model_field);
                    self.field_failed(e, field.name(), &path)
                })?;
            fragments.extend(fragment);
        }

        self.check_unhandled()?;

        let fragment = B::Fragment::all(fragments);
        if self.options.log_fragments {
            debug!(specification = %self.name, fragment = ?fragment, "Created filter query");
        }
        Ok(fragment)
    }

    /// Run `create_filter_query` on a default filter.
    pub fn validate(&self) -> SpecResult<()> {
        self.create_filter_query(&F::default()).map(|_| ())
    }

    fn field_failed(&self, err: SpecError, field: &str, model_path: &str) -> SpecError {
        let err = err.in_field(&self.name, field, model_path);
        error!(specification = %self.name, field, model_path, error = %err, "Filter field failed");
        err
    }

    fn check_unhandled(&self) -> SpecResult<()> {
        if self.unmatched.is_empty() {
            return Ok(());
        }

        let err = SpecError::UnhandledFields {
            filter: F::filter_name().to_string(),
            model: B::Model::model_name().to_string(),
            fields: self.unmatched.iter().map(ToString::to_string).collect(),
        };
        error!(specification = %self.name, error = %err, "Unhandled filter fields");
        Err(err)
    }

    fn field_fragment(
        &self,
        field: &str,
        declared: Option<FieldType>,
        value: &FilterValue,
        model_field: &ModelField<B::Model>,
    ) -> SpecResult<Option<B::Fragment>> {
        if value.is_absent() {
            return Ok(None);
        }

        check_types(field, declared, value, model_field)?;

        let fragment = self.pipeline.execute(field, value, model_field)?;
        Ok((!fragment.is_empty()).then_some(fragment))
    }
}

/// Both the declared and the runtime element types must be assignable to the
/// model field type. Null filters carry no type and always pass.
fn check_types<M>(
    field: &str,
    declared: Option<FieldType>,
    value: &FilterValue,
    model_field: &ModelField<M>,
) -> SpecResult<()> {
    let target = model_field.field_type();
    let mismatch = |filter_type: FieldType| SpecError::TypeMismatch {
        filter_field: field.to_string(),
        filter_type,
        model_field: model_field.name().to_string(),
        model_type: target,
    };

    for filter_type in declared.into_iter().chain(value.element_type()) {
        if !filter_type.is_assignable_to(target) {
            return Err(mismatch(filter_type));
        }
    }

    if let Some(filter_type) = value.mismatched_value().and_then(|v| v.field_type()) {
        return Err(mismatch(filter_type));
    }

    Ok(())
}

impl<B: Backend, F: FilterSchema> fmt::Debug for Specification<B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("name", &self.name)
            .field("filter", &F::filter_name())
            .field("model", &B::Model::model_name())
            .field("explicit", &self.explicit.keys().collect::<Vec<_>>())
            .field("unmatched", &self.unmatched)
            .field("options", &self.options)
            .finish()
    }
}

/// A specification with its filter type erased.
pub trait ErasedSpecification<B: Backend>: Send + Sync {
    fn name(&self) -> &str;

    fn filter_name(&self) -> &'static str;

    fn model_name(&self) -> &'static str;

    /// Filter fields neither convention-mapped nor explicitly handled.
    fn unmatched(&self) -> Vec<&'static str>;

    /// Run `create_filter_query` on a default filter.
    fn validate(&self) -> SpecResult<()>;

    /// Compile a filter given as `&dyn Any`. Fails when it is not the
    /// specification's filter type.
    fn create_filter_query_any(&self, filter: &dyn Any) -> SpecResult<B::Fragment>;

    fn as_any(&self) -> &dyn Any;
}

impl<B: Backend, F: FilterSchema> ErasedSpecification<B> for Specification<B, F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter_name(&self) -> &'static str {
        F::filter_name()
    }

    fn model_name(&self) -> &'static str {
        B::Model::model_name()
    }

    fn unmatched(&self) -> Vec<&'static str> {
        Specification::unmatched(self)
    }

    fn validate(&self) -> SpecResult<()> {
        Specification::validate(self)
    }

    fn create_filter_query_any(&self, filter: &dyn Any) -> SpecResult<B::Fragment> {
        let filter = filter
            .downcast_ref::<F>()
            .ok_or_else(|| SpecError::FilterTypeMismatch {
                specification: self.name.clone(),
                expected: F::filter_name(),
            })?;
        self.create_filter_query(filter)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
