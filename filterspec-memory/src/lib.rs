//! # filterspec-memory
//!
//! In-memory backend for filterspec.
//!
//! Fragments are [`Predicate`] trees that evaluate directly against model
//! values, for filtering slices, iterators and caches without a database.
//!
//! ```rust
//! use filterspec_core::{HandlerPipeline, FilterValue, ListFilter, Model, model_schema};
//! use filterspec_memory::MemoryBackend;
//!
//! struct Order {
//!     id: i32,
//!     status: String,
//! }
//!
//! model_schema!(Order { id, status });
//!
//! let pipeline = HandlerPipeline::with_defaults(MemoryBackend::<Order>::new());
//! let fields = Order::model_fields();
//! let value = FilterValue::list(&ListFilter::with_values([1, 3]));
//! let predicate = pipeline.execute("id", &value, &fields[0]).unwrap();
//!
//! let orders = vec![
//!     Order { id: 1, status: "open".into() },
//!     Order { id: 2, status: "open".into() },
//! ];
//! assert_eq!(predicate.filter(&orders).count(), 1);
//! assert_eq!(predicate.to_string(), "id in [1, 3]");
//! ```

pub mod backend;
pub mod predicate;

pub use backend::MemoryBackend;
pub use predicate::Predicate;
