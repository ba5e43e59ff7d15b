//! Layered deep-merge of configuration mappings.
//!
//! Later layers win. Two plain mappings under the same key merge
//! recursively; any other pairing is a wholesale replacement. Opaque and
//! shared nodes are never looked into, they are carried over as a unit.
//!
//! The two modes differ on [`ConfigValue::Undefined`]:
//!
//! | Mode            | `{x: 1}` + `{x: Undefined}` |
//! |-----------------|-----------------------------|
//! | non-destructive | `{x: 1}` (no-op)            |
//! | destructive     | `{}` (key removed)          |

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::value::{ConfigValue, Mapping};

/// How [`merge_layers`] treats its first layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Build fresh output, never touching the inputs.
    #[default]
    NonDestructive,
    /// Merge into the first layer in place.
    Destructive,
}

/// Merge `layers` into a fresh mapping.
///
/// No input is modified. Undefined entries are dropped: an absent override
/// leaves the earlier value alone.
pub fn deep_merge(layers: &[Mapping]) -> Mapping {
    trace!(layers = layers.len(), "deep merge");
    let mut out = Mapping::new();
    for layer in layers {
        merge_fresh(&mut out, layer);
    }
    out
}

/// Merge `layers` into `base` in place and hand `base` back.
///
/// An Undefined entry removes the key. A nested mapping left empty by the
/// merge is removed as well.
pub fn deep_merge_into<'a>(base: &'a mut Mapping, layers: &[Mapping]) -> &'a mut Mapping {
    trace!(layers = layers.len() + 1, "destructive deep merge");
    for layer in layers {
        merge_destructive(base, layer);
    }
    base
}

/// Merge owned layers according to `mode`.
///
/// In destructive mode the first layer becomes the result.
pub fn merge_layers(layers: Vec<Mapping>, mode: MergeMode) -> Mapping {
    match mode {
        MergeMode::NonDestructive => deep_merge(&layers),
        MergeMode::Destructive => {
            let mut layers = layers.into_iter();
            let Some(mut base) = layers.next() else {
                return Mapping::new();
            };
            let rest: Vec<Mapping> = layers.collect();
            deep_merge_into(&mut base, &rest);
            base
        }
    }
}

fn merge_fresh(target: &mut Mapping, layer: &Mapping) {
    for (key, incoming) in layer {
        match incoming {
            ConfigValue::Undefined => {}
            ConfigValue::Mapping(incoming) => match target.get_mut(key) {
                Some(ConfigValue::Mapping(existing)) => merge_fresh(existing, incoming),
                _ => {
                    let mut fresh = Mapping::with_capacity(incoming.len());
                    merge_fresh(&mut fresh, incoming);
                    target.insert(key.clone(), ConfigValue::Mapping(fresh));
                }
            },
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

fn merge_destructive(target: &mut Mapping, layer: &Mapping) {
    for (key, incoming) in layer {
        match incoming {
            ConfigValue::Undefined => {
                target.shift_remove(key);
            }
            ConfigValue::Mapping(incoming) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| ConfigValue::Mapping(Mapping::new()));
                if !slot.is_mapping() {
                    *slot = ConfigValue::Mapping(Mapping::new());
                }

                let now_empty = match slot {
                    ConfigValue::Mapping(existing) => {
                        merge_destructive(existing, incoming);
                        existing.is_empty()
                    }
                    _ => false,
                };
                if now_empty {
                    target.shift_remove(key);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::{OpaqueNode, SharedNode};
    use serde_json::json;

    fn map(value: serde_json::Value) -> Mapping {
        ConfigValue::from(value).into_mapping().unwrap()
    }

    fn with_undefined(key: &str) -> Mapping {
        let mut m = Mapping::new();
        m.insert(key.into(), ConfigValue::Undefined);
        m
    }

    /// Panics if anything tries to compare it structurally.
    struct Untouchable;

    impl PartialEq for Untouchable {
        fn eq(&self, _: &Self) -> bool {
            panic!("opaque payload was compared")
        }
    }

    // ── non-destructive ──────────────────────────────────────────────────

    #[test]
    fn merges_nested_mappings() {
        let original = map(json!({ "a": { "b": 3 } }));
        let merged = deep_merge(&[original.clone(), map(json!({ "a": { "c": 4 } }))]);

        assert_eq!(merged, map(json!({ "a": { "b": 3, "c": 4 } })));
        assert_eq!(original, map(json!({ "a": { "b": 3 } })));
    }

    #[test]
    fn overwrites_non_mappings() {
        let merged = deep_merge(&[map(json!({ "a": "foo" })), map(json!({ "a": { "b": 3 } }))]);
        assert_eq!(merged, map(json!({ "a": { "b": 3 } })));

        let merged = deep_merge(&[map(json!({ "a": { "b": 3 } })), map(json!({ "a": [1] }))]);
        assert_eq!(merged, map(json!({ "a": [1] })));
    }

    #[test]
    fn undefined_is_a_no_op() {
        let original = map(json!({ "a": 1 }));
        let merged = deep_merge(&[original.clone(), with_undefined("a")]);

        assert_eq!(merged, map(json!({ "a": 1 })));
        assert_eq!(original, map(json!({ "a": 1 })));
    }

    #[test]
    fn null_overwrites() {
        let merged = deep_merge(&[map(json!({ "a": 1 })), map(json!({ "a": null }))]);
        assert_eq!(merged, map(json!({ "a": null })));
    }

    #[test]
    fn single_layer_is_identity() {
        let x = map(json!({ "a": { "b": [1, 2] }, "c": "d" }));
        assert_eq!(deep_merge(std::slice::from_ref(&x)), x);
    }

    #[test]
    fn later_wins_is_associative() {
        let a = map(json!({ "a": { "x": 1, "y": 1 }, "b": 1 }));
        let b = map(json!({ "a": { "y": 2 }, "c": [1] }));
        let c = map(json!({ "a": { "z": 3 }, "b": { "nested": true } }));

        let all_at_once = deep_merge(&[a.clone(), b.clone(), c.clone()]);
        let stepwise = deep_merge(&[deep_merge(&[a, b]), c]);
        assert_eq!(all_at_once, stepwise);
    }

    #[test]
    fn does_not_recurse_into_opaque_nodes() {
        let first = OpaqueNode::new("project-1", Untouchable);
        let second = OpaqueNode::new("project-2", Untouchable);

        let mut a = Mapping::new();
        a.insert("a".into(), first.clone().into());
        let mut b = Mapping::new();
        b.insert("a".into(), second.clone().into());

        let merged = deep_merge(&[a, b]);
        match merged.get("a") {
            Some(ConfigValue::Opaque(node)) => {
                assert!(node.ptr_eq(&second));
                assert!(!node.ptr_eq(&first));
            }
            other => panic!("expected opaque node, got {other:?}"),
        }
    }

    #[test]
    fn shared_nodes_are_carried_as_a_unit() {
        let shared = SharedNode::new(ConfigValue::from(json!({ "x": 1 })));
        let mut a = Mapping::new();
        a.insert("s".into(), shared.clone().into());

        let merged = deep_merge(&[a, map(json!({ "s": { "y": 2 } }))]);
        assert_eq!(merged, map(json!({ "s": { "y": 2 } })));
        assert_eq!(*shared.read(), ConfigValue::from(json!({ "x": 1 })));
    }

    #[test]
    fn fresh_nested_mapping_drops_undefined() {
        let mut inner = Mapping::new();
        inner.insert("keep".into(), 1i64.into());
        inner.insert("drop".into(), ConfigValue::Undefined);
        let mut layer = Mapping::new();
        layer.insert("a".into(), ConfigValue::Mapping(inner));

        assert_eq!(deep_merge(&[layer]), map(json!({ "a": { "keep": 1 } })));
    }

    // ── destructive ──────────────────────────────────────────────────────

    #[test]
    fn destructive_merges_in_place() {
        let mut original = map(json!({ "a": { "b": 3 } }));
        deep_merge_into(&mut original, &[map(json!({ "a": { "c": 4 } }))]);
        assert_eq!(original, map(json!({ "a": { "b": 3, "c": 4 } })));
    }

    #[test]
    fn destructive_overwrites_non_mappings() {
        let mut original = map(json!({ "a": "foo" }));
        deep_merge_into(&mut original, &[map(json!({ "a": { "b": 3 } }))]);
        assert_eq!(original, map(json!({ "a": { "b": 3 } })));
    }

    #[test]
    fn destructive_undefined_removes_key() {
        let mut original = map(json!({ "a": 1 }));
        deep_merge_into(&mut original, &[with_undefined("a")]);
        assert!(original.is_empty());
    }

    #[test]
    fn destructive_prunes_emptied_mappings() {
        let mut original = map(json!({ "a": { "b": 1 }, "keep": true }));
        let mut nested = Mapping::new();
        nested.insert("a".into(), ConfigValue::Mapping(with_undefined("b")));

        deep_merge_into(&mut original, &[nested]);
        assert_eq!(original, map(json!({ "keep": true })));
    }

    #[test]
    fn destructive_does_not_recurse_into_opaque_nodes() {
        let second = OpaqueNode::new("component-2", Untouchable);
        let mut a = Mapping::new();
        a.insert("a".into(), OpaqueNode::new("component-1", Untouchable).into());
        let mut b = Mapping::new();
        b.insert("a".into(), second.clone().into());

        deep_merge_into(&mut a, &[b.clone()]);
        assert_eq!(a, b);
    }

    #[test]
    fn modes_diverge_on_undefined() {
        let a = map(json!({ "x": 1 }));

        let kept = merge_layers(vec![a.clone(), with_undefined("x")], MergeMode::NonDestructive);
        let removed = merge_layers(vec![a, with_undefined("x")], MergeMode::Destructive);

        assert_eq!(kept, map(json!({ "x": 1 })));
        assert_eq!(removed, Mapping::new());
    }

    #[test]
    fn merge_layers_of_nothing_is_empty() {
        assert!(merge_layers(Vec::new(), MergeMode::Destructive).is_empty());
        assert!(merge_layers(Vec::new(), MergeMode::NonDestructive).is_empty());
    }
}
