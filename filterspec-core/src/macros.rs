//! Declarative macros for descriptor tables.

/// Implement [`FilterSchema`](crate::FilterSchema) for a filter struct.
///
/// List the fields in declaration order. Each field's type must implement
/// [`FilterFieldValue`](crate::FilterFieldValue).
///
/// ```rust
/// use filterspec_core::{filter_schema, FilterSchema, ListFilter, StringFilter};
///
/// #[derive(Default)]
/// struct UserFilter {
///     id: Option<i64>,
///     ids: ListFilter<i64>,
///     name: Option<StringFilter>,
/// }
///
/// filter_schema!(UserFilter { id, ids, name });
///
/// let names: Vec<_> = UserFilter::filter_fields().iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["id", "ids", "name"]);
/// ```
#[macro_export]
macro_rules! filter_schema {
    ($filter:ident { $($field:ident),* $(,)? }) => {
        impl $crate::FilterSchema for $filter {
            fn filter_name() -> &'static str {
                stringify!($filter)
            }

            fn filter_fields() -> ::std::vec::Vec<$crate::FilterField<Self>> {
                ::std::vec![
                    $( $crate::FilterField::of(stringify!($field), |f: &Self| &f.$field) ),*
                ]
            }
        }
    };
}

/// Implement [`Model`](crate::Model) for a model struct.
///
/// A field may be followed by `: modifier` to call a builder method on its
/// descriptor, e.g. `: full_text`.
///
/// ```rust
/// use filterspec_core::{model_schema, Model};
///
/// struct Article {
///     id: i64,
///     title: String,
///     body: Option<String>,
/// }
///
/// model_schema!(Article { id, title, body: full_text });
///
/// let fields = Article::model_fields();
/// assert!(fields[2].is_full_text());
/// assert!(fields[2].is_nullable());
/// ```
#[macro_export]
macro_rules! model_schema {
    ($model:ident { $($field:ident $(: $modifier:ident)?),* $(,)? }) => {
        impl $crate::Model for $model {
            fn model_name() -> &'static str {
                stringify!($model)
            }

            fn model_fields() -> ::std::vec::Vec<$crate::ModelField<Self>> {
                ::std::vec![
                    $( $crate::ModelField::of(stringify!($field), |m: &Self| &m.$field) $( .$modifier() )? ),*
                ]
            }
        }
    };
}
