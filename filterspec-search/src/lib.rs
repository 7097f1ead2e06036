//! # filterspec-search
//!
//! Search-engine backend for filterspec.
//!
//! Fragments are [`SearchQuery`] documents in the Elasticsearch/OpenSearch
//! query DSL: `term`, `terms`, `range`, `wildcard`, `match`, `match_phrase`,
//! `exists` and `bool`.
//!
//! ```rust
//! use filterspec_core::{HandlerPipeline, FilterValue, ListFilter, Model, model_schema};
//! use filterspec_search::{FieldNaming, SearchBackend};
//!
//! struct Ticket {
//!     queue_id: i32,
//! }
//!
//! model_schema!(Ticket { queue_id });
//!
//! let backend = SearchBackend::<Ticket>::new().naming(FieldNaming::CamelCase);
//! let pipeline = HandlerPipeline::with_defaults(backend);
//! let fields = Ticket::model_fields();
//! let value = FilterValue::list(&ListFilter::with_values([4, 9]));
//! let query = pipeline.execute("queue_id", &value, &fields[0]).unwrap();
//!
//! assert_eq!(query.to_string(), r#"{"terms":{"queueId":[4,9]}}"#);
//! ```

pub mod backend;
pub mod naming;
pub mod query;

pub use backend::{SearchBackend, escape_wildcard};
pub use naming::FieldNaming;
pub use query::{BoolQuery, LeafQuery, SearchQuery};
