use confidence_core::{Resolver, Store};
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};

/// Strictly ascending integer limits.
fn limits() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(-1000i64..1000, 1..8).prop_map(|set| set.into_iter().collect())
}

fn ranged_store(limits: &[i64]) -> Store {
    let range: Vec<Value> = limits
        .iter()
        .enumerate()
        .map(|(index, limit)| json!({ "limit": limit, "value": index }))
        .collect();
    Store::from_document(&json!({
        "k": { "$filter": "n", "$range": range, "$default": limits.len() }
    }))
    .unwrap()
}

fn filter_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["env", "n", "user.tier", "user-agent", "$env.A", "$env.B.C"])
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-5i64..5).prop_map(Value::from),
        "[a-c]{1,3}".prop_map(Value::from),
        Just(json!("$env.A")),
        Just(json!("$env.B.C")),
    ]
}

fn with_optional(mut map: Map<String, Value>, entries: Vec<(&str, Option<Value>)>) -> Value {
    for (key, value) in entries {
        if let Some(value) = value {
            map.insert(key.to_string(), value);
        }
    }
    Value::Object(map)
}

/// Documents mixing plain data with every directive.
fn documents() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner.clone(), 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
            (
                filter_name(),
                prop::collection::btree_map(prop::sample::select(vec!["a", "b", "1", "true", "null"]), inner.clone(), 1..3),
                prop::option::of(inner.clone()),
                prop::option::of(inner.clone()),
                prop::option::of(Just(json!("filter_id"))),
                prop::option::of(Just(json!({ "note": "m" }))),
            )
                .prop_map(|(name, branches, default, base, id, meta)| {
                    let mut map: Map<String, Value> = branches.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
                    map.insert("$filter".into(), json!(name));
                    with_optional(map, vec![("$default", default), ("$base", base), ("$id", id), ("$meta", meta)])
                }),
            (
                filter_name(),
                prop::collection::btree_map(-5i64..5, inner.clone(), 1..4),
                prop::option::of(inner.clone()),
            )
                .prop_map(|(name, entries, default)| {
                    let range: Vec<Value> = entries
                        .into_iter()
                        .map(|(limit, value)| json!({ "limit": limit, "value": value }))
                        .collect();
                    let mut map = Map::new();
                    map.insert("$filter".into(), json!(name));
                    map.insert("$range".into(), Value::Array(range));
                    with_optional(map, vec![("$default", default)])
                }),
            (inner.clone(), prop::option::of(inner), prop::option::of(Just(json!("m"))))
                .prop_map(|(value, base, meta)| {
                    let mut map = Map::new();
                    map.insert("$value".into(), value);
                    with_optional(map, vec![("$base", base), ("$meta", meta)])
                }),
        ]
    })
}

fn criteria_maps() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop::sample::select(vec!["a", "b", "1"])),
        prop::option::of(-6i64..6),
        prop::option::of(prop_oneof![Just(json!(true)), Just(json!(null)), Just(json!("b"))]),
        prop::option::of(Just(json!("a"))),
    )
        .prop_map(|(env, n, tier, agent)| {
            let mut map = Map::new();
            if let Some(env) = env {
                map.insert("env".into(), json!(env));
            }
            if let Some(n) = n {
                map.insert("n".into(), json!(n));
            }
            if let Some(tier) = tier {
                map.insert("user".into(), json!({ "tier": tier }));
            }
            if let Some(agent) = agent {
                map.insert("user-agent".into(), agent);
            }
            Value::Object(map)
        })
}

fn carries_directive(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(key, child)| key.starts_with('$') || carries_directive(child)),
        Value::Array(items) => items.iter().any(carries_directive),
        _ => false,
    }
}

proptest! {
    #[test]
    fn range_selection_is_monotonic(limits in limits(), mut criteria in prop::collection::vec(-1500i64..1500, 2..20)) {
        let store = ranged_store(&limits);
        criteria.sort_unstable();

        let mut previous = 0u64;
        for n in criteria {
            let selected = store.get("/k", &json!({ "n": n })).and_then(|v| v.as_u64());
            prop_assert!(selected.is_some());
            let selected = selected.unwrap();
            prop_assert!(selected >= previous, "{} selected entry {} after {}", n, selected, previous);
            previous = selected;
        }
    }

    #[test]
    fn range_picks_first_limit_at_or_above_criterion(limits in limits(), n in -1500i64..1500) {
        let store = ranged_store(&limits);
        let expected = limits.iter().position(|limit| n <= *limit).unwrap_or(limits.len());
        prop_assert_eq!(store.get("/k", &json!({ "n": n })), Some(json!(expected)));
    }

    #[test]
    fn base_never_overrides_branch(
        branch in prop::collection::btree_map("[a-e]", 0i64..100, 0..5),
        base in prop::collection::btree_map("[a-h]", 100i64..200, 0..8),
    ) {
        let store = Store::from_document(&json!({
            "k": { "$filter": "env", "production": branch, "$base": base }
        }))
        .unwrap();

        let resolved = store.get("/k", &json!({ "env": "production" })).unwrap();
        let resolved: BTreeMap<String, i64> = serde_json::from_value(resolved).unwrap();

        for (key, value) in &branch {
            prop_assert_eq!(resolved.get(key), Some(value));
        }
        for (key, value) in &base {
            if !branch.contains_key(key) {
                prop_assert_eq!(resolved.get(key), Some(value));
            }
        }
        prop_assert_eq!(resolved.len(), branch.keys().chain(base.keys()).collect::<std::collections::BTreeSet<_>>().len());
    }

    #[test]
    fn repeated_lookups_are_identical(env in "[a-z]{1,6}", n in -50i64..50) {
        let store = Store::from_document(&json!({
            "a": { "$filter": "env", "production": { "x": 1 }, "$default": { "$filter": "n", "$range": [{ "limit": 0, "value": "neg" }], "$default": "pos" } },
            "b": [1, { "$filter": "env", "qa": 2 }]
        }))
        .unwrap();
        let criteria = json!({ "env": env, "n": n });

        prop_assert_eq!(store.get("/", &criteria), store.get("/", &criteria));
    }

    #[test]
    fn unmatched_filters_are_omitted_not_null(env in prop_oneof![Just("production".to_string()), "[a-z]{1,6}"]) {
        let store = Store::from_document(&json!({
            "a": { "$filter": "env", "production": 1 },
            "b": [{ "$filter": "env", "production": 2 }]
        }))
        .unwrap();

        let resolved = store.get("/", &json!({ "env": env.clone() })).unwrap();
        if env == "production" {
            prop_assert_eq!(resolved, json!({ "a": 1, "b": [2] }));
        } else {
            prop_assert_eq!(resolved, json!({ "b": [] }));
        }
    }

    #[test]
    fn valid_documents_always_resolve(
        document in documents(),
        criteria in criteria_maps(),
        a_set in any::<bool>(),
    ) {
        prop_assume!(Store::validate(&document).is_ok());
        let store = Store::from_document(&document).unwrap();

        let mut env: HashMap<String, String> = HashMap::new();
        if a_set {
            env.insert("A".into(), "a".into());
        }

        let mut first_log = Vec::new();
        let first = {
            let mut resolver = Resolver::new(&criteria).with_env(&env).with_applied(&mut first_log);
            store.resolve("/", &mut resolver)
        };
        let mut second_log = Vec::new();
        let second = {
            let mut resolver = Resolver::new(&criteria).with_env(&env).with_applied(&mut second_log);
            store.resolve("/", &mut resolver)
        };

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_log, second_log);
        if let Some(value) = &first {
            prop_assert!(!carries_directive(value), "directive leaked into {}", value);
        }
        let _ = store.meta("/", &criteria);
    }
}
