//! Key folding and path expansion: the optional dotted-path passes on
//! either side of the codec.

use crate::error::DecodeError;
use crate::lexical::is_identifier_segment;
use serde_json::{Map, Value};

/// Collapse single-key object chains into dotted keys, at most
/// `flatten_depth` segments per folded key. Chains containing a
/// non-identifier segment are left alone; everything else recurses.
pub(crate) fn fold_keys(value: &Value, flatten_depth: usize) -> Value {
    match value {
        Value::Object(obj) => {
            let mut out = Map::new();
            for (key, val) in obj {
                match fold_chain(key, val, flatten_depth) {
                    Some((folded, leaf)) => {
                        out.insert(folded, fold_keys(leaf, flatten_depth));
                    }
                    None => {
                        out.insert(key.clone(), fold_keys(val, flatten_depth));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| fold_keys(v, flatten_depth)).collect())
        }
        _ => value.clone(),
    }
}

/// Walk the single-key chain under `key`. A fold needs at least two
/// segments, every one an identifier.
fn fold_chain<'a>(
    key: &'a str,
    value: &'a Value,
    flatten_depth: usize,
) -> Option<(String, &'a Value)> {
    let mut segments = vec![key];
    let mut leaf = value;
    while segments.len() < flatten_depth {
        let Value::Object(obj) = leaf else { break };
        if obj.len() != 1 {
            break;
        }
        let (next_key, next_val) = obj.iter().next()?;
        segments.push(next_key);
        leaf = next_val;
    }
    if segments.len() < 2 || !segments.iter().all(|s| is_identifier_segment(s)) {
        return None;
    }
    Some((segments.join("."), leaf))
}

/// Rebuild nested objects from dotted keys. A key expands iff it contains
/// a dot and every segment is an identifier. Conflicts are
/// [`DecodeError::PathConflict`] in strict mode, last-write-wins otherwise.
pub(crate) fn expand_paths(value: &Value, strict: bool) -> Result<Value, DecodeError> {
    match value {
        Value::Object(obj) => {
            let mut out = Map::new();
            for (key, val) in obj {
                let expanded = expand_paths(val, strict)?;
                let segments: Vec<&str> = key.split('.').collect();
                if segments.len() >= 2 && segments.iter().all(|s| is_identifier_segment(s)) {
                    insert_path(&mut out, &segments, expanded, strict, key)?;
                } else if out.insert(key.clone(), expanded).is_some() && strict {
                    return Err(DecodeError::PathConflict { path: key.clone() });
                }
            }
            Ok(Value::Object(out))
        }
        Value::Array(arr) => Ok(Value::Array(
            arr.iter()
                .map(|v| expand_paths(v, strict))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        _ => Ok(value.clone()),
    }
}

fn insert_path(
    out: &mut Map<String, Value>,
    segments: &[&str],
    value: Value,
    strict: bool,
    full_key: &str,
) -> Result<(), DecodeError> {
    let mut cursor = out;
    for segment in &segments[..segments.len() - 1] {
        let slot = cursor
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            if strict {
                return Err(DecodeError::PathConflict {
                    path: full_key.to_string(),
                });
            }
            *slot = Value::Object(Map::new());
        }
        cursor = match slot {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
    }
    let last = segments[segments.len() - 1];
    if cursor.insert(last.to_string(), value).is_some() && strict {
        return Err(DecodeError::PathConflict {
            path: full_key.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn folds_single_key_chain() {
        let v = json!({"a": {"b": {"c": {"value": 42}}}});
        assert_eq!(fold_keys(&v, usize::MAX), json!({"a.b.c.value": 42}));
    }

    #[test]
    fn flatten_depth_caps_segments() {
        let v = json!({"a": {"b": {"c": 1}}});
        assert_eq!(fold_keys(&v, 2), json!({"a.b": {"c": 1}}));
        assert_eq!(fold_keys(&v, 1), v);
        assert_eq!(fold_keys(&v, 0), v);
    }

    #[test]
    fn multi_key_objects_stop_the_chain() {
        let v = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(fold_keys(&v, usize::MAX), v);
        let v = json!({"a": {"b": {"x": 1, "y": 2}}});
        assert_eq!(fold_keys(&v, usize::MAX), json!({"a.b": {"x": 1, "y": 2}}));
    }

    #[test]
    fn non_identifier_segments_block_folding() {
        let v = json!({"a": {"has space": 1}});
        assert_eq!(fold_keys(&v, usize::MAX), v);
        let v = json!({"a-b": {"c": 1}});
        assert_eq!(fold_keys(&v, usize::MAX), v);
    }

    #[test]
    fn folding_recurses_into_arrays() {
        let v = json!({"items": [{"a": {"b": 1}}, 2]});
        assert_eq!(
            fold_keys(&v, usize::MAX),
            json!({"items": [{"a.b": 1}, 2]})
        );
    }

    #[test]
    fn expands_dotted_keys() {
        let v = json!({"a.b.c.value": 42});
        assert_eq!(
            expand_paths(&v, false).unwrap(),
            json!({"a": {"b": {"c": {"value": 42}}}})
        );
    }

    #[test]
    fn expansion_merges_shared_prefixes() {
        let v = json!({"a.b": 1, "a.c": 2});
        assert_eq!(expand_paths(&v, false).unwrap(), json!({"a": {"b": 1, "c": 2}}));
    }

    #[test]
    fn non_identifier_keys_stay_literal() {
        let v = json!({"a.1b": 1, "x.": 2});
        assert_eq!(expand_paths(&v, false).unwrap(), v);
    }

    #[test]
    fn leaf_branch_conflict_strict() {
        let v = json!({"a": 1, "a.b": 2});
        assert!(matches!(
            expand_paths(&v, true),
            Err(DecodeError::PathConflict { .. })
        ));
        // lax: last write wins
        assert_eq!(expand_paths(&v, false).unwrap(), json!({"a": {"b": 2}}));
    }

    #[test]
    fn fold_then_expand_round_trips() {
        let v = json!({"root": {"deep": {"leaf": "x"}}, "other": [1, 2]});
        let folded = fold_keys(&v, usize::MAX);
        assert_eq!(expand_paths(&folded, true).unwrap(), v);
    }
}
