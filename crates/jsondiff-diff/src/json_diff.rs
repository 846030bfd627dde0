//! Structural diff of two JSON values.
//!
//! Objects are walked key by key. Arrays and scalars are compared as whole
//! values, and a change of kind at any path is reported once at that path
//! without descending further. The result is three disjoint maps keyed by
//! [`JsonPath`], where no reported path is an ancestor of another.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use jsondiff_types::{JsonPath, JsonValue};

/// The before and after values of a modified path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modification {
    pub old: JsonValue,
    pub new: JsonValue,
}

/// The result of comparing two JSON values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonDiff {
    /// Paths present only in the new value, with the new subtree.
    pub added: BTreeMap<JsonPath, JsonValue>,
    /// Paths present only in the old value, with the old subtree.
    pub removed: BTreeMap<JsonPath, JsonValue>,
    /// Paths present in both with a different value or kind.
    pub modified: BTreeMap<JsonPath, Modification>,
}

impl JsonDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.additions() + self.removals() + self.modifications()
    }

    /// Number of added paths.
    pub fn additions(&self) -> usize {
        self.added.len()
    }

    /// Number of removed paths.
    pub fn removals(&self) -> usize {
        self.removed.len()
    }

    /// Number of modified paths.
    pub fn modifications(&self) -> usize {
        self.modified.len()
    }

    /// Entry counts for each of the three maps.
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.additions(),
            removed: self.removals(),
            modified: self.modifications(),
        }
    }

    /// Modified paths paired with their new values.
    pub fn modified_values(&self) -> impl Iterator<Item = (&JsonPath, &JsonValue)> {
        self.modified.iter().map(|(path, m)| (path, &m.new))
    }

    /// Modified paths paired with their old values.
    pub fn modified_old(&self) -> impl Iterator<Item = (&JsonPath, &JsonValue)> {
        self.modified.iter().map(|(path, m)| (path, &m.old))
    }

    /// Every change, ordered by path.
    pub fn changes(&self) -> Vec<Change<'_>> {
        let mut changes: Vec<Change<'_>> = self
            .added
            .iter()
            .map(|(path, value)| Change::Added { path, value })
            .chain(
                self.removed
                    .iter()
                    .map(|(path, value)| Change::Removed { path, value }),
            )
            .chain(self.modified.iter().map(|(path, m)| Change::Modified {
                path,
                old: &m.old,
                new: &m.new,
            }))
            .collect();
        // Paths are disjoint across the three maps, so this order is total.
        changes.sort_by(|a, b| a.path().cmp(b.path()));
        changes
    }

    /// The wire shape consumers render:
    /// `{"added": {..}, "removed": {..}, "modified": {..}}`, each keyed by the
    /// path's canonical notation. Modified entries carry the new value only.
    ///
    /// Building the contract does not recurse, but `serde_json` drops and
    /// serializes its own values recursively. Keep very deep results as
    /// [`JsonValue`]s, or convert the contract back with `JsonValue::from`.
    pub fn to_contract(&self) -> Value {
        json!({
            "added": contract_map(self.added.iter()),
            "removed": contract_map(self.removed.iter()),
            "modified": contract_map(self.modified_values()),
        })
    }
}

fn contract_map<'a>(entries: impl Iterator<Item = (&'a JsonPath, &'a JsonValue)>) -> Value {
    Value::Object(
        entries
            .map(|(path, value)| (path.to_string(), Value::from(value.clone())))
            .collect(),
    )
}

/// A single change, borrowed from a [`JsonDiff`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change<'a> {
    /// A path that exists only in the new value.
    Added { path: &'a JsonPath, value: &'a JsonValue },
    /// A path that exists only in the old value.
    Removed { path: &'a JsonPath, value: &'a JsonValue },
    /// A path whose value or kind changed.
    Modified {
        path: &'a JsonPath,
        old: &'a JsonValue,
        new: &'a JsonValue,
    },
}

impl<'a> Change<'a> {
    /// The path this change is reported under.
    pub fn path(&self) -> &'a JsonPath {
        match *self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => {
                path
            }
        }
    }
}

/// Entry counts per change map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} modified",
            self.added, self.removed, self.modified
        )
    }
}

/// Parent-linked object keys visited during a walk.
///
/// Frames refer to a node instead of owning a full path, so descending costs
/// one push regardless of depth. Paths are materialized only when recorded.
#[derive(Default)]
struct PathArena<'a> {
    nodes: Vec<(Option<usize>, &'a str)>,
}

impl<'a> PathArena<'a> {
    fn child(&mut self, parent: Option<usize>, key: &'a str) -> Option<usize> {
        self.nodes.push((parent, key));
        Some(self.nodes.len() - 1)
    }

    fn resolve(&self, mut node: Option<usize>) -> JsonPath {
        let mut keys = Vec::new();
        while let Some(index) = node {
            let (parent, key) = self.nodes[index];
            keys.push(key);
            node = parent;
        }
        keys.into_iter().rev().collect()
    }

    fn resolve_child(&self, parent: Option<usize>, key: &str) -> JsonPath {
        self.resolve(parent).child(key)
    }
}

/// Compute the structural diff between two JSON values.
///
/// | before | after | outcome |
/// |---|---|---|
/// | object | object | compare the union of keys |
/// | array | array | modified if not deeply equal |
/// | scalar | same scalar kind | modified if not equal |
/// | any | different kind | modified, no descent |
/// | key absent | key present | added |
/// | key present | key absent | removed |
///
/// Added and removed entries hold the whole subtree. Numbers compare
/// numerically, so `1` and `1.0` are unchanged. The walk uses an explicit
/// stack, so nesting depth is bounded by memory rather than the call stack.
pub fn diff(before: &JsonValue, after: &JsonValue) -> JsonDiff {
    let mut result = JsonDiff::new();
    let mut arena = PathArena::default();
    let mut pending = vec![(None, before, after)];

    while let Some((node, before, after)) = pending.pop() {
        match (before, after) {
            (JsonValue::Object(old), JsonValue::Object(new)) => {
                for (key, old_value) in old {
                    match new.get(key) {
                        Some(new_value) => {
                            let child = arena.child(node, key);
                            pending.push((child, old_value, new_value));
                        }
                        None => {
                            result
                                .removed
                                .insert(arena.resolve_child(node, key), old_value.clone());
                        }
                    }
                }
                for (key, new_value) in new {
                    if !old.contains_key(key) {
                        result
                            .added
                            .insert(arena.resolve_child(node, key), new_value.clone());
                    }
                }
            }
            (JsonValue::Array(_), JsonValue::Array(_))
            | (JsonValue::Null, JsonValue::Null)
            | (JsonValue::Bool(_), JsonValue::Bool(_))
            | (JsonValue::Number(_), JsonValue::Number(_))
            | (JsonValue::String(_), JsonValue::String(_)) => {
                if before != after {
                    record_modified(&mut result, arena.resolve(node), before, after);
                }
            }
            (
                JsonValue::Null
                | JsonValue::Bool(_)
                | JsonValue::Number(_)
                | JsonValue::String(_)
                | JsonValue::Array(_)
                | JsonValue::Object(_),
                _,
            ) => {
                // Kind changed: the new subtree replaces the old one wholesale.
                record_modified(&mut result, arena.resolve(node), before, after);
            }
        }
    }

    result
}

fn record_modified(result: &mut JsonDiff, path: JsonPath, before: &JsonValue, after: &JsonValue) {
    result.modified.insert(
        path,
        Modification {
            old: before.clone(),
            new: after.clone(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: Value) -> JsonValue {
        JsonValue::from(v)
    }

    fn path(notation: &str) -> JsonPath {
        notation.parse().unwrap()
    }

    fn contract(before: Value, after: Value) -> Value {
        diff(&value(before), &value(after)).to_contract()
    }

    #[test]
    fn scenario_added_and_modified() {
        let out = contract(
            json!({"name": "John", "age": 30}),
            json!({"name": "Jane", "age": 30, "city": "NYC"}),
        );
        assert_eq!(
            out,
            json!({
                "added": {"city": "NYC"},
                "removed": {},
                "modified": {"name": "Jane"},
            })
        );
    }

    #[test]
    fn scenario_identical() {
        let d = diff(&value(json!({"a": 1})), &value(json!({"a": 1})));
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn scenario_type_change_is_not_descended() {
        let d = diff(&value(json!({"a": {"b": 1}})), &value(json!({"a": [1, 2]})));
        assert_eq!(d.modifications(), 1);
        assert_eq!(d.modified[&path("a")].new, value(json!([1, 2])));
        assert_eq!(d.modified[&path("a")].old, value(json!({"b": 1})));
        let ab = path("a.b");
        assert!(!d.added.contains_key(&ab));
        assert!(!d.removed.contains_key(&ab));
        assert!(!d.modified.contains_key(&ab));
    }

    #[test]
    fn scenario_arrays_are_atomic() {
        let out = contract(json!({"tags": ["x", "y"]}), json!({"tags": ["y", "x"]}));
        assert_eq!(out["modified"], json!({"tags": ["y", "x"]}));
        assert_eq!(out["added"], json!({}));
        assert_eq!(out["removed"], json!({}));
    }

    #[test]
    fn scenario_removal() {
        let out = contract(json!({"a": 1, "b": 2}), json!({"a": 1}));
        assert_eq!(
            out,
            json!({"added": {}, "removed": {"b": 2}, "modified": {}})
        );
    }

    #[test]
    fn nested_objects_report_leaf_paths() {
        let d = diff(
            &value(json!({"config": {"debug": false, "port": 8080, "db": {"host": "a"}}})),
            &value(json!({"config": {"debug": true, "port": 8080, "db": {"host": "a", "pool": 4}}})),
        );
        assert_eq!(d.modified.keys().collect::<Vec<_>>(), vec![&path("config.debug")]);
        assert_eq!(d.added.get(&path("config.db.pool")), Some(&value(json!(4))));
        assert!(d.removed.is_empty());
    }

    #[test]
    fn added_subtree_is_reported_once() {
        let d = diff(&value(json!({})), &value(json!({"user": {"name": "x", "tags": []}})));
        assert_eq!(d.additions(), 1);
        assert_eq!(d.added[&path("user")], value(json!({"name": "x", "tags": []})));
    }

    #[test]
    fn numbers_compare_numerically() {
        let d = diff(&value(json!({"n": 1, "m": [2]})), &value(json!({"n": 1.0, "m": [2.0]})));
        assert!(d.is_empty());

        let d = diff(&value(json!({"n": 1})), &value(json!({"n": 1.5})));
        assert_eq!(d.modified_values().count(), 1);
    }

    #[test]
    fn strings_compare_exactly() {
        let d = diff(&value(json!({"s": "abc"})), &value(json!({"s": "abc "})));
        assert_eq!(d.modifications(), 1);
        let d = diff(&value(json!({"s": "1"})), &value(json!({"s": 1})));
        assert_eq!(d.modifications(), 1);
    }

    #[test]
    fn null_versus_value_is_a_kind_change() {
        let d = diff(&value(json!({"x": null})), &value(json!({"x": {"y": 1}})));
        assert_eq!(d.modified[&path("x")].new, value(json!({"y": 1})));
        let d = diff(&value(json!({"x": "v"})), &value(json!({"x": null})));
        assert_eq!(d.modified[&path("x")].new, JsonValue::Null);
        let d = diff(&value(json!({"x": null})), &value(json!({"x": null})));
        assert!(d.is_empty());
    }

    #[test]
    fn root_mismatch_uses_empty_path() {
        let d = diff(&value(json!({"a": 1})), &value(json!([1])));
        assert_eq!(d.modified.keys().collect::<Vec<_>>(), vec![&JsonPath::root()]);
        assert_eq!(
            d.to_contract(),
            json!({"added": {}, "removed": {}, "modified": {"": [1]}})
        );

        let d = diff(&value(json!(1)), &value(json!(2)));
        assert_eq!(d.modified[&JsonPath::root()].new, value(json!(2)));

        let d = diff(&value(json!([1, 2])), &value(json!([1, 2])));
        assert!(d.is_empty());
    }

    #[test]
    fn keys_needing_brackets_are_quoted_in_contract() {
        let out = contract(
            json!({"a.b": 1, "": {"x y": true}}),
            json!({"a.b": 2, "": {"x y": false}}),
        );
        assert_eq!(
            out["modified"],
            json!({"[\"\"][\"x y\"]": false, "[\"a.b\"]": 2})
        );
    }

    #[test]
    fn changes_are_ordered_by_path() {
        let d = diff(
            &value(json!({"b": 1, "c": 1, "d": {"e": 1}})),
            &value(json!({"a": 1, "c": 2, "d": {"e": 1, "f": 1}})),
        );
        let changes = d.changes();
        let paths: Vec<String> = changes.iter().map(|c| c.path().to_string()).collect();
        assert_eq!(paths, vec!["a", "b", "c", "d.f"]);
        assert!(matches!(changes[0], Change::Added { .. }));
        assert!(matches!(changes[1], Change::Removed { .. }));
        match changes[2] {
            Change::Modified { old, new, .. } => {
                assert_eq!(*old, value(json!(1)));
                assert_eq!(*new, value(json!(2)));
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn summary_counts() {
        let d = diff(
            &value(json!({"keep": true, "modify": "old", "remove": 42})),
            &value(json!({"keep": true, "modify": "new", "added": [1, 2, 3]})),
        );
        let summary = d.summary();
        assert_eq!(summary, DiffSummary { added: 1, removed: 1, modified: 1 });
        assert_eq!(summary.to_string(), "1 added, 1 removed, 1 modified");
        assert_eq!(d.len(), 3);
        assert_eq!(
            d.modified_old().next(),
            Some((&path("modify"), &value(json!("old"))))
        );
    }

    #[test]
    fn inputs_are_not_mutated() {
        let before = value(json!({"a": {"b": [1, 2]}, "c": null}));
        let after = value(json!({"a": {"b": [2]}, "d": 1}));
        let (before_copy, after_copy) = (before.clone(), after.clone());
        let first = diff(&before, &after);
        let second = diff(&before, &after);
        assert_eq!(first, second);
        assert_eq!(before, before_copy);
        assert_eq!(after, after_copy);
    }

    const DEPTH: usize = 10_000;

    fn nest(leaf: JsonValue) -> JsonValue {
        (0..DEPTH).fold(leaf, |inner, _| [("k", inner)].into_iter().collect())
    }

    fn deep_path() -> JsonPath {
        std::iter::repeat("k").take(DEPTH).collect()
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        let before = nest(value(json!(1)));
        let after = nest(value(json!(2)));

        let result = diff(&before, &after);
        assert_eq!(result.modifications(), 1);
        assert!(result.modified.contains_key(&deep_path()));
    }

    #[test]
    fn deep_added_and_removed_subtrees() {
        let subtree = nest(value(json!({"leaf": [1, 2]})));
        let with: JsonValue = [("root", subtree.clone())].into_iter().collect();
        let without = value(json!({}));

        let added = diff(&without, &with);
        assert_eq!(added.additions(), 1);
        assert!(added.added[&path("root")] == subtree);

        let removed = diff(&with, &without);
        assert_eq!(removed.removals(), 1);
        assert!(removed.removed[&path("root")] == subtree);
    }

    #[test]
    fn deep_kind_change_at_root() {
        let after = nest(JsonValue::Null);
        let result = diff(&JsonValue::Null, &after);
        assert_eq!(result.modifications(), 1);
        assert!(result.modified[&JsonPath::root()].new == after);

        let contract = JsonValue::from(result.to_contract());
        let modified = contract.get("modified").and_then(|m| m.get(""));
        assert!(modified == Some(&after));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use jsondiff_types::Number;
    use proptest::prelude::*;

    fn json_value() -> impl Strategy<Value = JsonValue> {
        let leaf = prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::from),
            (-3i64..3).prop_map(JsonValue::from),
            (-3i32..3).prop_map(|n| JsonValue::Number(Number::Float(f64::from(n)))),
            (-1.0e3f64..1.0e3).prop_map(|f| JsonValue::Number(Number::Float(f))),
            "[ab]{0,2}".prop_map(JsonValue::from),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(JsonValue::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(JsonValue::Object),
            ]
        })
    }

    fn all_paths(d: &JsonDiff) -> Vec<&JsonPath> {
        d.added
            .keys()
            .chain(d.removed.keys())
            .chain(d.modified.keys())
            .collect()
    }

    proptest! {
        #[test]
        fn identity_is_empty(x in json_value()) {
            prop_assert!(diff(&x, &x).is_empty());
        }

        #[test]
        fn maps_are_disjoint(a in json_value(), b in json_value()) {
            let d = diff(&a, &b);
            let paths = all_paths(&d);
            let mut unique = paths.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), paths.len());
        }

        #[test]
        fn no_path_has_a_reported_descendant(a in json_value(), b in json_value()) {
            let d = diff(&a, &b);
            let paths = all_paths(&d);
            for p in &paths {
                for q in &paths {
                    prop_assert!(!p.is_ancestor_of(q), "{} is above {}", p, q);
                }
            }
        }

        #[test]
        fn additions_mirror_removals(a in json_value(), b in json_value()) {
            let forward = diff(&a, &b);
            let backward = diff(&b, &a);
            prop_assert_eq!(&forward.added, &backward.removed);
            prop_assert_eq!(&forward.removed, &backward.added);
            prop_assert_eq!(
                forward.modified.keys().collect::<Vec<_>>(),
                backward.modified.keys().collect::<Vec<_>>()
            );
        }

        #[test]
        fn entries_resolve_against_inputs(a in json_value(), b in json_value()) {
            let d = diff(&a, &b);
            for (path, value) in &d.added {
                prop_assert_eq!(b.get_path(path), Some(value));
                prop_assert!(a.get_path(path).is_none());
            }
            for (path, value) in &d.removed {
                prop_assert_eq!(a.get_path(path), Some(value));
                prop_assert!(b.get_path(path).is_none());
            }
            for (path, m) in &d.modified {
                prop_assert_eq!(a.get_path(path), Some(&m.old));
                prop_assert_eq!(b.get_path(path), Some(&m.new));
                prop_assert_ne!(&m.old, &m.new);
            }
        }
    }
}
