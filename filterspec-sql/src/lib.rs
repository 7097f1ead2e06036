//! # filterspec-sql
//!
//! SQL backend for filterspec.
//!
//! Fragments are [`SqlFilter`] trees over quoted column names. Rendering binds
//! every value as a parameter, using `$n` placeholders for PostgreSQL and `?`
//! for MySQL and SQLite.
//!
//! ```rust
//! use filterspec_core::{HandlerPipeline, FilterValue, RangeFilter, Model, model_schema};
//! use filterspec_sql::{SqlBackend, SqlDialect};
//!
//! struct Product {
//!     id: i32,
//!     price: f64,
//! }
//!
//! model_schema!(Product { id, price });
//!
//! let pipeline = HandlerPipeline::with_defaults(SqlBackend::<Product>::postgres());
//! let fields = Product::model_fields();
//! let value = FilterValue::range(&RangeFilter::between(10.0, 20.0));
//! let filter = pipeline.execute("price", &value, &fields[1]).unwrap();
//!
//! let (sql, params) = filter.to_where_clause(SqlDialect::PostgreSQL);
//! assert_eq!(sql, " WHERE (price >= $1 AND price <= $2)");
//! assert_eq!(params.len(), 2);
//! ```

pub mod backend;
pub mod dialect;
pub mod filter;

pub use backend::SqlBackend;
pub use dialect::{SqlDialect, escape_like, needs_quoting};
pub use filter::{SqlFilter, SqlParams};
