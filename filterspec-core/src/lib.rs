//! # filterspec-core
//!
//! Compiles filter DTOs into backend predicates.
//!
//! This crate provides the backend-independent machinery:
//! - Typed filter primitives (`ListFilter`, `RangeFilter`, `StringFilter`, `NullFilter`)
//! - Static field descriptor tables for filter and model types
//! - The `Fragment` / `Backend` contract implemented by backend crates
//! - The ordered filter handler pipeline
//! - Specifications: convention mapping, explicit field handlers, validation
//! - A registry that builds and validates every specification at startup
//!
//! ## Filters
//!
//! ```rust
//! use filterspec_core::{FilterCriteria, ListFilter, RangeFilter, StringFilter};
//!
//! // Membership, inverted
//! let ids = ListFilter::with_values([1, 2, 3]).inverted();
//! assert!(ids.has_value());
//!
//! // Bounds, exclusive on both ends
//! let age = RangeFilter::between(18, 65).exclusive();
//! assert!(!age.is_empty());
//!
//! // Substring match
//! let name = StringFilter::contains("ab");
//! assert_eq!(name.value(), Some("ab"));
//! ```
//!
//! ## Field Tables
//!
//! ```rust
//! use filterspec_core::{filter_schema, model_schema, FilterSchema, Model, RangeFilter, StringFilter};
//!
//! struct User {
//!     id: i64,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! model_schema!(User { id, name, age });
//!
//! #[derive(Default)]
//! struct UserFilter {
//!     id: Option<i64>,
//!     name: Option<StringFilter>,
//!     age: RangeFilter<i32>,
//! }
//!
//! filter_schema!(UserFilter { id, name, age });
//!
//! assert_eq!(User::model_fields().len(), 3);
//! assert_eq!(UserFilter::filter_name(), "UserFilter");
//! ```
//!
//! ## Specifications
//!
//! ```rust,ignore
//! struct UserSpecification;
//!
//! impl SpecificationDefinition<MemoryBackend<User>> for UserSpecification {
//!     type Filter = UserFilter;
//! }
//!
//! let mut builder = SpecificationRegistry::builder(MemoryBackend::new());
//! builder.add_specification(UserSpecification);
//! let registry = builder.build()?;
//! registry.validate_specifications()?;
//!
//! let predicate = registry.create_filter_query::<UserSpecification>(&filter)?;
//! ```

pub mod context;
pub mod error;
pub mod filters;
pub mod fragment;
pub mod handlers;
pub mod logging;
#[macro_use]
pub mod macros;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod specification;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::FilterContext;
pub use error::{ErrorCode, SpecError, SpecResult};
pub use filters::{
    FilterCriteria, ListFilter, NullFilter, NullFlags, NullableFilter, RangeFilter, StringFilter,
    StringMatch,
};
pub use fragment::{Backend, Comparison, FieldTarget, Fragment, NullCheck};
pub use handlers::{
    ConstantFilterHandler, EnumerableFilterHandler, FilterHandler, ListFilterHandler, Next,
    NullableFilterHandler, RangeFilterHandler, SharedHandler, StringFilterHandler,
};
pub use options::{SpecConfig, SpecOptions};
pub use pipeline::{HandlerCollection, HandlerPipeline};
pub use registry::{
    RegistryBuilder, SpecificationDefinition, SpecificationRegistry, ValidateSpecifications,
    validate_all,
};
pub use schema::{
    FilterField, FilterFieldValue, FilterKind, FilterSchema, FilterValue, Model, ModelField,
    ModelValue,
};
pub use specification::{
    ErasedSpecification, FieldHandlerFn, FieldScope, Specification, SpecificationBuilder,
};
pub use value::{FieldType, FieldValue, Scalar};

// Re-export logging utilities
pub use logging::{init as init_logging, init_debug, init_with_level, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{SpecError, SpecResult};
    pub use crate::filters::{
        FilterCriteria, ListFilter, NullFilter, NullableFilter, RangeFilter, StringFilter,
        StringMatch,
    };
    pub use crate::fragment::{Backend, Fragment};
    pub use crate::handlers::{FilterHandler, Next};
    pub use crate::context::FilterContext;
    pub use crate::options::SpecOptions;
    pub use crate::pipeline::HandlerCollection;
    pub use crate::registry::{SpecificationDefinition, SpecificationRegistry};
    pub use crate::schema::{FilterSchema, Model};
    pub use crate::specification::{FieldScope, SpecificationBuilder};
    pub use crate::{filter_schema, model_schema};
}
