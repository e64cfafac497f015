//! Built-in behaviours for scalar, list and map attributes.
//!
//! Each behaviour receives the storage slot chosen by the scope policy and
//! the call arguments. Slots holding a value of the wrong shape are reset to
//! an empty list or map before they are mutated.

use serde_json::{Map, Value};

use crate::error::ArgumentError;

type Outcome = Result<Value, ArgumentError>;

/// Plain get/set: no arguments reads, one argument stores it, several store a list.
pub(crate) fn scalar_accessor(slot: &mut Value, args: &[Value]) -> Outcome {
    match args {
        [] => Ok(slot.clone()),
        [value] => {
            *slot = value.clone();
            Ok(value.clone())
        }
        many => {
            *slot = Value::Array(many.to_vec());
            Ok(slot.clone())
        }
    }
}

/// Whole-list get/set.
pub(crate) fn list_accessor(slot: &mut Value, args: &[Value]) -> Outcome {
    match args {
        [] => Ok(slot.clone()),
        [Value::Array(items)] => {
            *slot = Value::Array(items.clone());
            Ok(slot.clone())
        }
        items => {
            *slot = Value::Array(items.to_vec());
            Ok(slot.clone())
        }
    }
}

pub(crate) fn list_append(slot: &mut Value, args: &[Value]) -> Outcome {
    with_list(slot, |items| {
        items.extend_from_slice(args);
        Ok(Value::from(items.len()))
    })
}

pub(crate) fn list_remove_last(slot: &mut Value, _args: &[Value]) -> Outcome {
    with_list(slot, |items| Ok(items.pop().unwrap_or(Value::Null)))
}

pub(crate) fn list_remove_first(slot: &mut Value, _args: &[Value]) -> Outcome {
    with_list(slot, |items| {
        if items.is_empty() {
            return Ok(Value::Null);
        }
        Ok(items.remove(0))
    })
}

pub(crate) fn list_prepend(slot: &mut Value, args: &[Value]) -> Outcome {
    with_list(slot, |items| {
        items.splice(0..0, args.iter().cloned());
        Ok(Value::from(items.len()))
    })
}

/// `splice(offset, length, items...)` with Perl's offset and length rules.
pub(crate) fn list_splice(slot: &mut Value, args: &[Value]) -> Outcome {
    let (offset, length, replacement) = match args {
        [] => (0, None, &[][..]),
        [offset] => (index_arg(offset)?, None, &[][..]),
        [offset, length, rest @ ..] => (index_arg(offset)?, optional_index(length)?, rest),
    };
    with_list(slot, |items| {
        let len = items.len();
        let start = resolve_offset(offset, len);
        let end = match length {
            None => len,
            Some(count) if count >= 0 => start.saturating_add(to_len(count)).min(len),
            Some(count) => len.saturating_sub(to_len(count.saturating_neg())).max(start),
        };
        let removed: Vec<Value> = items
            .splice(start..end, replacement.iter().cloned())
            .collect();
        Ok(Value::Array(removed))
    })
}

/// Elements at the requested indexes; negative indexes count from the end.
pub(crate) fn list_slice(slot: &mut Value, args: &[Value]) -> Outcome {
    let indexes = args
        .iter()
        .map(index_arg)
        .collect::<Result<Vec<_>, ArgumentError>>()?;
    with_list(slot, |items| {
        let picked = indexes
            .iter()
            .map(|index| {
                position(*index, items.len())
                    .and_then(|at| items.get(at))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();
        Ok(Value::Array(picked))
    })
}

/// Whole-map get/set.
pub(crate) fn map_accessor(slot: &mut Value, args: &[Value]) -> Outcome {
    match args {
        [] => Ok(slot.clone()),
        [Value::Object(map)] => {
            *slot = Value::Object(map.clone());
            Ok(slot.clone())
        }
        pairs => {
            let map: Map<String, Value> = key_value_pairs(pairs)?.into_iter().collect();
            *slot = Value::Object(map);
            Ok(slot.clone())
        }
    }
}

pub(crate) fn map_delete(slot: &mut Value, args: &[Value]) -> Outcome {
    let keys = string_keys(args)?;
    with_map(slot, |map| {
        let removed = keys
            .iter()
            .map(|key| map.remove(*key).unwrap_or(Value::Null))
            .collect();
        Ok(Value::Array(removed))
    })
}

pub(crate) fn map_set(slot: &mut Value, args: &[Value]) -> Outcome {
    let pairs = key_value_pairs(args)?;
    with_map(slot, |map| {
        let mut stored = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            stored.push(value.clone());
            map.insert(key, value);
        }
        Ok(Value::Array(stored))
    })
}

pub(crate) fn map_get(slot: &mut Value, args: &[Value]) -> Outcome {
    let keys = string_keys(args)?;
    with_map(slot, |map| {
        let values = keys
            .iter()
            .map(|key| map.get(*key).cloned().unwrap_or(Value::Null))
            .collect();
        Ok(Value::Array(values))
    })
}

fn with_list<F>(slot: &mut Value, f: F) -> Outcome
where
    F: FnOnce(&mut Vec<Value>) -> Outcome,
{
    let mut items = match std::mem::take(slot) {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    let outcome = f(&mut items);
    *slot = Value::Array(items);
    outcome
}

fn with_map<F>(slot: &mut Value, f: F) -> Outcome
where
    F: FnOnce(&mut Map<String, Value>) -> Outcome,
{
    let mut map = match std::mem::take(slot) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let outcome = f(&mut map);
    *slot = Value::Object(map);
    outcome
}

fn string_keys(args: &[Value]) -> Result<Vec<&str>, ArgumentError> {
    args.iter().map(key_arg).collect()
}

fn key_value_pairs(args: &[Value]) -> Result<Vec<(String, Value)>, ArgumentError> {
    let chunks = args.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(ArgumentError::new(format!(
            "expected key/value pairs, got {} arguments",
            args.len()
        )));
    }
    chunks
        .map(|pair| match pair {
            [key, value] => Ok((key_arg(key)?.to_owned(), value.clone())),
            _ => Err(ArgumentError::new("expected key/value pairs")),
        })
        .collect()
}

fn key_arg(key: &Value) -> Result<&str, ArgumentError> {
    key.as_str()
        .ok_or_else(|| ArgumentError::new(format!("map keys must be strings, got {key}")))
}

fn index_arg(index: &Value) -> Result<i64, ArgumentError> {
    index
        .as_i64()
        .ok_or_else(|| ArgumentError::new(format!("expected an integer index, got {index}")))
}

fn optional_index(index: &Value) -> Result<Option<i64>, ArgumentError> {
    if index.is_null() {
        Ok(None)
    } else {
        index_arg(index).map(Some)
    }
}

fn to_len(count: i64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

fn resolve_offset(offset: i64, len: usize) -> usize {
    if offset >= 0 {
        to_len(offset).min(len)
    } else {
        len.saturating_sub(to_len(offset.saturating_neg()))
    }
}

fn position(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok().filter(|at| *at < len)
    } else {
        len.checked_sub(to_len(index.saturating_neg()))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the built-in behaviours.

    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn scalar_accessor_reads_and_writes() {
        let mut slot = json!("red");
        assert_eq!(scalar_accessor(&mut slot, &[]), Ok(json!("red")));
        assert_eq!(scalar_accessor(&mut slot, &[json!("blue")]), Ok(json!("blue")));
        assert_eq!(slot, json!("blue"));
        assert_eq!(
            scalar_accessor(&mut slot, &[json!(1), json!(2)]),
            Ok(json!([1, 2]))
        );
    }

    #[test]
    fn list_accessor_replaces_whole_list() {
        let mut slot = json!([1]);
        assert_eq!(list_accessor(&mut slot, &[json!([7, 8])]), Ok(json!([7, 8])));
        assert_eq!(list_accessor(&mut slot, &[json!("a"), json!("b")]), Ok(json!(["a", "b"])));
        assert_eq!(list_accessor(&mut slot, &[json!("solo")]), Ok(json!(["solo"])));
    }

    #[test]
    fn push_pop_shift_unshift() {
        let mut slot = json!([2, 3]);
        assert_eq!(list_append(&mut slot, &[json!(4)]), Ok(json!(3)));
        assert_eq!(list_prepend(&mut slot, &[json!(0), json!(1)]), Ok(json!(5)));
        assert_eq!(slot, json!([0, 1, 2, 3, 4]));
        assert_eq!(list_remove_last(&mut slot, &[]), Ok(json!(4)));
        assert_eq!(list_remove_first(&mut slot, &[]), Ok(json!(0)));
        assert_eq!(slot, json!([1, 2, 3]));
    }

    #[test]
    fn removing_from_empty_list_yields_null() {
        let mut slot = json!([]);
        assert_eq!(list_remove_last(&mut slot, &[]), Ok(Value::Null));
        assert_eq!(list_remove_first(&mut slot, &[]), Ok(Value::Null));
    }

    #[rstest]
    #[case::remove_middle(vec![json!(1), json!(2)], json!([1, 2]), json!([0, 3, 4]))]
    #[case::negative_offset(vec![json!(-2)], json!([3, 4]), json!([0, 1, 2]))]
    #[case::to_end_with_null(vec![json!(3), Value::Null], json!([3, 4]), json!([0, 1, 2]))]
    #[case::negative_length(vec![json!(1), json!(-1)], json!([1, 2, 3]), json!([0, 4]))]
    #[case::insert_only(vec![json!(2), json!(0), json!("x")], json!([]), json!([0, 1, "x", 2, 3, 4]))]
    #[case::replace(vec![json!(0), json!(2), json!("a"), json!("b"), json!("c")], json!([0, 1]), json!(["a", "b", "c", 2, 3, 4]))]
    #[case::clear(vec![], json!([0, 1, 2, 3, 4]), json!([]))]
    #[case::offset_past_end(vec![json!(9), json!(1), json!("z")], json!([]), json!([0, 1, 2, 3, 4, "z"]))]
    fn splice_follows_perl_rules(
        #[case] args: Vec<Value>,
        #[case] removed: Value,
        #[case] remaining: Value,
    ) {
        let mut slot = json!([0, 1, 2, 3, 4]);
        assert_eq!(list_splice(&mut slot, &args), Ok(removed));
        assert_eq!(slot, remaining);
    }

    #[test]
    fn slice_picks_indexes() {
        let mut slot = json!(["a", "b", "c"]);
        assert_eq!(
            list_slice(&mut slot, &[json!(0), json!(-1), json!(5), json!(-9)]),
            Ok(json!(["a", "c", null, null]))
        );
    }

    #[test]
    fn slice_rejects_non_integer_index() {
        let mut slot = json!(["a"]);
        let err = list_slice(&mut slot, &[json!("first")]).expect_err("string index");
        assert!(err.message().contains("integer index"));
    }

    #[test]
    fn list_behaviours_normalise_wrong_shape() {
        let mut slot = json!("scalar");
        assert_eq!(list_append(&mut slot, &[json!(1)]), Ok(json!(1)));
        assert_eq!(slot, json!([1]));
    }

    #[test]
    fn map_set_get_delete() {
        let mut slot = json!({"a": 1});
        assert_eq!(
            map_set(&mut slot, &[json!("b"), json!(2), json!("a"), json!(3)]),
            Ok(json!([2, 3]))
        );
        assert_eq!(map_get(&mut slot, &[json!("a"), json!("zz")]), Ok(json!([3, null])));
        assert_eq!(map_delete(&mut slot, &[json!("a"), json!("zz")]), Ok(json!([3, null])));
        assert_eq!(slot, json!({"b": 2}));
    }

    #[test]
    fn map_accessor_builds_from_pairs() {
        let mut slot = json!({});
        assert_eq!(
            map_accessor(&mut slot, &[json!("k"), json!("v")]),
            Ok(json!({"k": "v"}))
        );
        assert_eq!(map_accessor(&mut slot, &[json!({"x": 1})]), Ok(json!({"x": 1})));
    }

    #[rstest]
    #[case::odd_count(vec![json!("a")], "key/value pairs")]
    #[case::non_string_key(vec![json!(1), json!(2)], "must be strings")]
    fn map_set_rejects_malformed_pairs(#[case] args: Vec<Value>, #[case] needle: &str) {
        let mut slot = json!({});
        let err = map_set(&mut slot, &args).expect_err("malformed pairs");
        assert!(err.message().contains(needle), "unexpected message: {err}");
    }
}
