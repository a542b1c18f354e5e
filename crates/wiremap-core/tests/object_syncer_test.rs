//! Integration test: object syncing end to end
//!
//! Builds syncers through the builder DSL and runs them against JSON wire
//! fixtures in both directions.

use wiremap_core::accessor::Attributes;
use wiremap_core::builder::{ArrayProperty, ObjectSyncerBuilder, Property};
use wiremap_core::syncer::Syncer;
use wiremap_core::validator::Predicate;
use wiremap_core::{Context, Error, ErrorKind, Failure, Options};
use wiremap_value::{Path, Value};

#[derive(Default, Debug, PartialEq)]
struct Person {
    name: String,
    age: i64,
    numbers: Vec<i64>,
}

impl Attributes for Person {
    fn get_attr(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name.clone())),
            "age" => Some(Value::Integer(self.age)),
            "numbers" => Some(Value::Array(
                self.numbers.iter().copied().map(Value::Integer).collect(),
            )),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: Value) -> bool {
        match name {
            "name" => {
                self.name = value.as_str().unwrap_or_default().to_string();
                true
            }
            "age" => {
                self.age = value.as_i64().unwrap_or_default();
                true
            }
            "numbers" => {
                self.numbers = value
                    .as_array()
                    .map(|items| items.iter().filter_map(Value::as_i64).collect())
                    .unwrap_or_default();
                true
            }
            _ => false,
        }
    }
}

fn wire(json: serde_json::Value) -> Value {
    serde_json::from_value(json).unwrap()
}

fn call() -> (Options, Context) {
    (Options::default(), Context::default())
}

fn too_big() -> Error {
    Error::new(ErrorKind::validation("too_big", [("max", 5)]))
}

fn person_syncer() -> impl Syncer<Person, Value> {
    ObjectSyncerBuilder::<Person>::new()
        .property("name")
        .property_with("age", Property::new().optional())
        .array(
            "numbers",
            ArrayProperty::new().element_validator(Predicate::new(too_big(), |v: &Value| {
                v.as_i64().is_some_and(|n| n < 5)
            })),
        )
        .build()
}

#[test]
fn test_push_produces_wire_object() {
    let (options, context) = call();
    let person = Person {
        name: "Marten".to_string(),
        age: 21,
        numbers: vec![2, 4, 3],
    };

    let mut target = Value::empty_object();
    person_syncer()
        .push(&person, &mut target, &options, &context)
        .unwrap();

    assert_eq!(
        target,
        wire(serde_json::json!({
            "name": "Marten",
            "age": 21,
            "numbers": [2, 4, 3],
        }))
    );
}

#[test]
fn test_pull_fills_domain_object() {
    let (options, context) = call();
    let source = wire(serde_json::json!({
        "name": "Marten",
        "age": 21,
        "numbers": [1, 2],
    }));

    let mut person = Person::default();
    person_syncer()
        .pull(&mut person, &source, &options, &context)
        .unwrap();

    assert_eq!(
        person,
        Person {
            name: "Marten".to_string(),
            age: 21,
            numbers: vec![1, 2],
        }
    );
}

#[test]
fn test_pull_tolerates_absent_optional_property() {
    let (options, context) = call();
    let source = wire(serde_json::json!({
        "name": "Marten",
        "numbers": [],
    }));

    let mut person = Person {
        age: 33,
        ..Person::default()
    };
    person_syncer()
        .pull(&mut person, &source, &options, &context)
        .unwrap();

    // The absent key left the attribute alone.
    assert_eq!(person.age, 33);
}

#[test]
fn test_element_failures_locate_exactly() {
    let (options, context) = call();
    let person = Person {
        name: "Marten".to_string(),
        age: 21,
        numbers: vec![2, 7, 3, 9],
    };

    let mut target = Value::empty_object();
    let result = person_syncer().push(&person, &mut target, &options, &context);

    let expected = Failure::of(vec![
        too_big().sink(&Path::of([1usize])).sink(&Path::of(["numbers"])),
        too_big().sink(&Path::of([3usize])).sink(&Path::of(["numbers"])),
    ]);
    assert_eq!(result, Err(expected));

    // The failed array never reached the target, the valid siblings did.
    assert_eq!(target.get("numbers"), None);
    assert_eq!(target.get("name"), Some(&Value::from("Marten")));
}

#[test]
fn test_failures_merge_across_properties_in_order() {
    let (options, context) = call();
    let empty = Error::new(ErrorKind::validation("empty", [] as [(&str, Value); 0]));
    let syncer = ObjectSyncerBuilder::<Person>::new()
        .property_with(
            "name",
            Property::new().validator(Predicate::new(empty.clone(), |v: &Value| {
                v.as_str().is_some_and(|s| !s.is_empty())
            })),
        )
        .array(
            "numbers",
            ArrayProperty::new().element_validator(Predicate::new(too_big(), |v: &Value| {
                v.as_i64().is_some_and(|n| n < 5)
            })),
        )
        .build();

    let person = Person {
        numbers: vec![9],
        ..Person::default()
    };
    let mut target = Value::empty_object();
    let result = syncer.push(&person, &mut target, &options, &context);

    let failure = result.unwrap_err();
    assert_eq!(failure.errors().len(), 2);
    assert_eq!(failure.errors()[0], empty.sink(&Path::of(["name"])));
    assert_eq!(
        failure.errors()[1],
        too_big().sink(&Path::of([0usize])).sink(&Path::of(["numbers"]))
    );
}

#[test]
fn test_failure_renders_as_error_report() {
    let (options, context) = call();
    let person = Person {
        name: "Marten".to_string(),
        numbers: vec![7],
        ..Person::default()
    };

    let mut target = Value::empty_object();
    let failure = person_syncer()
        .push(&person, &mut target, &options, &context)
        .unwrap_err();

    assert_eq!(
        failure.to_value(),
        wire(serde_json::json!({
            "errors": [{
                "path": ["numbers", 0],
                "name": "too_big",
                "params": {"max": 5},
            }],
        }))
    );
}
