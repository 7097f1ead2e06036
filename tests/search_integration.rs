//! Integration tests for specifications over the search backend.
//!
//! These tests verify query document generation including:
//! - term / terms / range / wildcard / match queries per filter kind
//! - bool composition of several filter fields
//! - camelCase index field naming
//! - filter context when scoring is disabled

use filterspec::prelude::*;
use filterspec::search::{FieldNaming, SearchBackend, SearchQuery};
use filterspec::{FilterValue, SpecificationBuilder};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

struct Product {
    id: i32,
    category_id: i32,
    title: String,
    description: Option<String>,
    price: f64,
}

model_schema!(Product {
    id,
    category_id,
    title,
    description: full_text,
    price
});

#[derive(Default)]
struct ProductFilter {
    id: Option<i32>,
    category_id: ListFilter<i32>,
    title: Option<StringFilter>,
    description: Option<StringFilter>,
    price: RangeFilter<f64>,
    min_price: RangeFilter<f64>,
    text: Option<String>,
}

filter_schema!(ProductFilter {
    id,
    category_id,
    title,
    description,
    price,
    min_price,
    text
});

type ProductBackend = SearchBackend<Product>;

struct ProductSpecification;

impl SpecificationDefinition<ProductBackend> for ProductSpecification {
    type Filter = ProductFilter;

    fn configure(&self, builder: &mut SpecificationBuilder<ProductBackend, ProductFilter>) -> SpecResult<()> {
        builder.handle_field("text", |scope: &FieldScope<'_, ProductBackend, ProductFilter>| {
            let Some(text) = scope.filter().text.as_deref() else {
                return Ok(None);
            };
            let value = FilterValue::String(StringFilter::contains(text));
            let title = scope.fragment_for("title", &value)?;
            let description = scope.fragment_for("description", &value)?;
            Ok(Some(SearchQuery::any(title.into_iter().chain(description))))
        })?;
        builder.handle_field_as("min_price", "price")?;
        Ok(())
    }
}

fn compile(backend: ProductBackend, filter: &ProductFilter) -> Value {
    let mut builder = SpecificationRegistry::builder(backend);
    builder.add_specification(ProductSpecification);
    let registry = builder.build().expect("registry");
    registry
        .create_filter_query::<ProductSpecification>(filter)
        .expect("query")
        .to_request_body()
}

#[test]
fn test_empty_filter_is_match_all() {
    assert_eq!(
        compile(SearchBackend::new(), &ProductFilter::default()),
        json!({ "query": { "match_all": {} } })
    );
}

#[test]
fn test_fields_compose_into_bool_must() {
    let filter = ProductFilter {
        id: Some(7),
        category_id: ListFilter::with_values([1, 2]),
        price: RangeFilter::between(5.0, 50.0),
        ..Default::default()
    };

    assert_eq!(
        compile(SearchBackend::new(), &filter),
        json!({ "query": { "bool": { "must": [
            { "term": { "id": 7 } },
            { "terms": { "category_id": [1, 2] } },
            { "range": { "price": { "gte": 5.0, "lte": 50.0 } } },
        ] } } })
    );
}

#[test]
fn test_two_lower_bounds_on_one_field_keep_both() {
    let filter = ProductFilter {
        price: RangeFilter::starting_at(18.0),
        min_price: RangeFilter::starting_at(10.0),
        ..Default::default()
    };

    assert_eq!(
        compile(SearchBackend::new(), &filter),
        json!({ "query": { "bool": { "must": [
            { "range": { "price": { "gte": 18.0 } } },
            { "range": { "price": { "gte": 10.0 } } },
        ] } } })
    );
}

#[test]
fn test_redirected_bound_merges_with_opposite_bound() {
    let filter = ProductFilter {
        price: RangeFilter::until(40.0),
        min_price: RangeFilter::starting_at(10.0),
        ..Default::default()
    };

    assert_eq!(
        compile(SearchBackend::new(), &filter),
        json!({ "query": { "range": { "price": { "lte": 40.0, "gte": 10.0 } } } })
    );
}

#[test]
fn test_camel_case_and_filter_context() {
    let filter = ProductFilter {
        category_id: ListFilter::with_values([3]).inverted(),
        title: Some(StringFilter::ends_with("kit")),
        ..Default::default()
    };
    let backend = SearchBackend::new()
        .naming(FieldNaming::CamelCase)
        .disable_scoring();

    assert_eq!(
        compile(backend, &filter),
        json!({ "query": { "bool": {
            "must_not": [{ "bool": { "filter": [{ "term": { "categoryId": 3 } }] } }],
            "filter": [{ "wildcard": { "title": { "value": "*kit" } } }],
        } } })
    );
}

#[test]
fn test_explicit_text_search() {
    let filter = ProductFilter {
        text: Some("lamp".into()),
        ..Default::default()
    };

    assert_eq!(
        compile(SearchBackend::new(), &filter),
        json!({ "query": { "bool": { "should": [
            { "wildcard": { "title": { "value": "*lamp*" } } },
            { "match": { "description": "lamp" } },
        ] } } })
    );
}

#[test]
fn test_null_check_on_full_text_field() {
    let filter = ProductFilter {
        description: Some(StringFilter::new().not_null()),
        ..Default::default()
    };

    assert_eq!(
        compile(SearchBackend::new(), &filter),
        json!({ "query": { "exists": { "field": "description" } } })
    );
}
