//! Integration tests for specifications over the in-memory backend.
//!
//! These tests compile filter DTOs through a registry and evaluate the
//! resulting predicates against model values:
//! - Convention mapping for constants, lists, ranges and strings
//! - Explicit handlers, including the OR-across-fields pattern
//! - Null checks on nullable and non-nullable fields
//! - Options that disable automatic field handling

use filterspec::memory::{MemoryBackend, Predicate};
use filterspec::prelude::*;
use filterspec::{FilterValue, SpecificationBuilder};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone)]
struct Contact {
    id: i32,
    list_id: i32,
    name: String,
    nickname: Option<String>,
    age: i32,
}

model_schema!(Contact {
    id,
    list_id,
    name,
    nickname,
    age
});

#[derive(Debug, Clone, Default)]
struct ContactFilter {
    id: Option<i32>,
    list_id: ListFilter<i32>,
    age: RangeFilter<i32>,
    name: Option<StringFilter>,
    nickname: NullFilter,
    name_or_nickname: Option<String>,
    page: Option<u32>,
}

filter_schema!(ContactFilter {
    id,
    list_id,
    age,
    name,
    nickname,
    name_or_nickname,
    page
});

type ContactBackend = MemoryBackend<Contact>;

struct ContactSpecification;

impl SpecificationDefinition<ContactBackend> for ContactSpecification {
    type Filter = ContactFilter;

    fn configure(&self, builder: &mut SpecificationBuilder<ContactBackend, ContactFilter>) -> SpecResult<()> {
        builder.handle_field(
            "name_or_nickname",
            |scope: &FieldScope<'_, ContactBackend, ContactFilter>| {
                let Some(term) = scope.filter().name_or_nickname.as_deref() else {
                    return Ok(None);
                };
                let value = FilterValue::String(StringFilter::contains(term));
                let name = scope.fragment_for("name", &value)?;
                let nickname = scope.fragment_for("nickname", &value)?;
                Ok(Some(Predicate::any(name.into_iter().chain(nickname))))
            },
        )?;
        builder.ignore_field("page")?;
        Ok(())
    }
}

fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            list_id: 1,
            name: "Abby".into(),
            nickname: None,
            age: 0,
        },
        Contact {
            id: 2,
            list_id: 2,
            name: "Carl".into(),
            nickname: Some("Cab".into()),
            age: 3,
        },
        Contact {
            id: 3,
            list_id: 3,
            name: "Dana".into(),
            nickname: Some("Dee".into()),
            age: 5,
        },
        Contact {
            id: 4,
            list_id: 4,
            name: "Eve".into(),
            nickname: None,
            age: 7,
        },
    ]
}

fn registry(options: SpecOptions) -> SpecificationRegistry<ContactBackend> {
    let mut builder = SpecificationRegistry::builder(MemoryBackend::new());
    builder.add_specification(ContactSpecification).options(options);
    builder.build().expect("registry")
}

fn matching(filter: &ContactFilter) -> Vec<i32> {
    let registry = registry(SpecOptions::default());
    let predicate = registry
        .create_filter_query::<ContactSpecification>(filter)
        .expect("predicate");
    predicate.filter(&contacts()).map(|c| c.id).collect()
}

#[test]
fn test_default_filter_matches_everything() {
    let registry = registry(SpecOptions::default());
    let predicate = registry
        .create_filter_query::<ContactSpecification>(&ContactFilter::default())
        .unwrap();
    assert!(predicate.is_empty());
    assert_eq!(matching(&ContactFilter::default()), vec![1, 2, 3, 4]);
}

#[test]
fn test_constant_equality() {
    let filter = ContactFilter {
        id: Some(3),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![3]);

    let registry = registry(SpecOptions::default());
    let predicate = registry
        .create_filter_query::<ContactSpecification>(&filter)
        .unwrap();
    assert_eq!(predicate.to_string(), "id == 3");
}

#[test]
fn test_list_membership_and_inversion() {
    let filter = ContactFilter {
        list_id: ListFilter::with_values([1, 2, 3]),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![1, 2, 3]);

    let filter = ContactFilter {
        list_id: ListFilter::with_values([1, 2, 3]).inverted(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![4]);
}

#[test]
fn test_assigned_empty_list_matches_nothing() {
    let filter = ContactFilter {
        list_id: ListFilter::with_values(Vec::new()),
        ..Default::default()
    };
    assert_eq!(matching(&filter), Vec::<i32>::new());
}

#[test]
fn test_range_bounds() {
    let filter = ContactFilter {
        age: RangeFilter::between(0, 5),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![1, 2, 3]);

    let filter = ContactFilter {
        age: RangeFilter::between(0, 5).exclusive(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![2]);

    let filter = ContactFilter {
        age: RangeFilter::between(5, 7).start_as_equals(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![3]);
}

#[test]
fn test_string_contains_and_inverted() {
    let filter = ContactFilter {
        name: Some(StringFilter::contains("ab")),
        ..Default::default()
    };
    assert_eq!(matching(&filter), Vec::<i32>::new());

    let filter = ContactFilter {
        name: Some(StringFilter::contains("a")),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![2, 3]);

    let filter = ContactFilter {
        name: Some(StringFilter::contains("a").inverted()),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![1, 4]);
}

#[test]
fn test_explicit_or_across_fields() {
    let filter = ContactFilter {
        name_or_nickname: Some("ab".into()),
        ..Default::default()
    };
    // "Abby" does not contain lowercase "ab"; "Cab" does
    assert_eq!(matching(&filter), vec![2]);

    let registry = registry(SpecOptions::default());
    let predicate = registry
        .create_filter_query::<ContactSpecification>(&filter)
        .unwrap();
    assert_eq!(
        predicate.to_string(),
        r#"(name contains "ab" || nickname contains "ab")"#
    );
}

#[test]
fn test_null_checks() {
    let filter = ContactFilter {
        nickname: NullFilter::null(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![1, 4]);

    let filter = ContactFilter {
        nickname: NullFilter::not_null(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![2, 3]);
}

#[test]
fn test_null_check_on_non_nullable_field_never_matches() {
    let filter = ContactFilter {
        age: RangeFilter::between(0, 10).null(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), Vec::<i32>::new());

    let filter = ContactFilter {
        age: RangeFilter::between(0, 4).not_null(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![1, 2]);
}

#[test]
fn test_combined_fields_are_anded() {
    let filter = ContactFilter {
        list_id: ListFilter::with_values([2, 3, 4]),
        age: RangeFilter::starting_at(5),
        nickname: NullFilter::not_null(),
        ..Default::default()
    };
    assert_eq!(matching(&filter), vec![3]);
}

#[test]
fn test_disabled_auto_handling_keeps_explicit_handlers() {
    let options = SpecOptions::new().auto_handling_disabled(true);
    let registry = registry(options);

    let filter = ContactFilter {
        id: Some(3),
        name_or_nickname: Some("Dee".into()),
        ..Default::default()
    };
    let predicate = registry
        .create_filter_query::<ContactSpecification>(&filter)
        .unwrap();
    assert_eq!(
        predicate.to_string(),
        r#"(name contains "Dee" || nickname contains "Dee")"#
    );
}

#[test]
fn test_case_insensitive_backend() {
    let mut builder = SpecificationRegistry::builder(MemoryBackend::new().case_insensitive());
    builder.add_specification(ContactSpecification);
    let registry = builder.build().unwrap();

    let filter = ContactFilter {
        name: Some(StringFilter::starts_with("ab")),
        ..Default::default()
    };
    let predicate = registry
        .create_filter_query::<ContactSpecification>(&filter)
        .unwrap();
    let ids: Vec<i32> = predicate.filter(&contacts()).map(|c| c.id).collect();
    assert_eq!(ids, vec![1]);
}
