//! # filterspec
//!
//! Compile filter DTOs into backend query predicates.
//!
//! filterspec provides:
//! - Typed filter primitives: lists, ranges, string matches and null checks
//! - Convention mapping from filter fields to model fields, with explicit overrides
//! - An ordered, extensible handler pipeline that turns each field into a predicate
//! - Backends for in-memory predicates, parameterized SQL and search query documents
//!
//! ## Quick Start
//!
//! ```rust
//! use filterspec::prelude::*;
//!
//! struct Person {
//!     id: i32,
//!     name: String,
//!     age: i32,
//! }
//!
//! model_schema!(Person { id, name, age });
//!
//! #[derive(Default)]
//! struct PersonFilter {
//!     id: ListFilter<i32>,
//!     age: RangeFilter<i32>,
//! }
//!
//! filter_schema!(PersonFilter { id, age });
//!
//! struct PersonSpecification;
//!
//! impl SpecificationDefinition<MemoryBackend<Person>> for PersonSpecification {
//!     type Filter = PersonFilter;
//! }
//!
//! fn main() -> Result<(), SpecError> {
//!     let mut builder = SpecificationRegistry::builder(MemoryBackend::new());
//!     builder.add_specification(PersonSpecification);
//!     let registry = builder.build()?;
//!     registry.validate_specifications()?;
//!
//!     let filter = PersonFilter {
//!         age: RangeFilter::starting_at(18),
//!         ..Default::default()
//!     };
//!     let predicate = registry.create_filter_query::<PersonSpecification>(&filter)?;
//!
//!     let people = vec![
//!         Person { id: 1, name: "Ana".into(), age: 17 },
//!         Person { id: 2, name: "Ben".into(), age: 30 },
//!     ];
//!     let adults: Vec<i32> = predicate.filter(&people).map(|p| p.id).collect();
//!     assert_eq!(adults, vec![2]);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub use filterspec_core::*;

/// In-memory predicate backend.
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub mod memory {
    pub use filterspec_memory::*;
}

/// SQL WHERE-clause backend.
#[cfg(feature = "sql")]
#[cfg_attr(docsrs, doc(cfg(feature = "sql")))]
pub mod sql {
    pub use filterspec_sql::*;
}

/// Search query document backend.
#[cfg(feature = "search")]
#[cfg_attr(docsrs, doc(cfg(feature = "search")))]
pub mod search {
    pub use filterspec_search::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use filterspec_core::prelude::*;

    #[cfg(feature = "memory")]
    pub use filterspec_memory::{MemoryBackend, Predicate};
    #[cfg(feature = "search")]
    pub use filterspec_search::{FieldNaming, SearchBackend, SearchQuery};
    #[cfg(feature = "sql")]
    pub use filterspec_sql::{SqlBackend, SqlDialect, SqlFilter};
}
