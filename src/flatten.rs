//! Flattening between nested YAML documents and dotted key-value maps.
//!
//! `flatten` walks a decoded document and emits one entry per scalar leaf,
//! keyed by its full dotted path. `unflatten` goes the other way for typed
//! extraction.

use serde_yaml::{Mapping, Number, Value};

use crate::types::FlatMap;

/// Flatten a decoded document into dotted key-value pairs.
///
/// Mapping values are recursed into, building dotted key paths:
/// `{server: {port: 25565}}` → `{"server.port": "25565"}`.
///
/// Every leaf is stringified with [`scalar_to_string`]. An empty nested
/// mapping contributes nothing. `None`, null, or a root that is not a mapping
/// yields an empty map.
pub fn flatten(node: Option<&Value>) -> FlatMap {
    let mut out = FlatMap::new();
    if let Some(Value::Mapping(mapping)) = node {
        flatten_into("", mapping, &mut out);
    }
    out
}

fn flatten_into(prefix: &str, mapping: &Mapping, out: &mut FlatMap) {
    for (key, value) in mapping {
        let key = scalar_to_string(key);
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Mapping(sub) => flatten_into(&path, sub, out),
            other => {
                out.insert(path, scalar_to_string(other));
            }
        }
    }
}

/// Render a YAML value in its literal text form.
///
/// Strings are returned verbatim, `null` becomes `"null"`, sequences render as
/// `[a, b]` and mappings nested inside sequences as `{k: v}`.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(scalar_to_string).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(mapping) => {
            let entries: Vec<String> = mapping
                .iter()
                .map(|(k, v)| format!("{}: {}", scalar_to_string(k), scalar_to_string(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    }
}

/// Rebuild a nested mapping from dotted key-value pairs.
///
/// Values are re-typed heuristically: `true`/`false` → bool, then integer,
/// then float, `null` → null, otherwise string. A key that is both a leaf and
/// a parent (`a` and `a.b`) ends up as a mapping.
pub fn unflatten(values: &FlatMap) -> Value {
    let mut root = Mapping::new();
    for (key, value) in values {
        let segments: Vec<&str> = key.split('.').collect();
        insert_nested(&mut root, &segments, retype(value));
    }
    Value::Mapping(root)
}

fn insert_nested(mapping: &mut Mapping, segments: &[&str], value: Value) {
    debug_assert!(!segments.is_empty());

    let key = Value::String(segments[0].to_string());

    if segments.len() == 1 {
        match mapping.get(segments[0]) {
            Some(Value::Mapping(_)) => {}
            _ => {
                mapping.insert(key, value);
            }
        }
        return;
    }

    let sub = mapping
        .entry(key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !sub.is_mapping() {
        *sub = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(sub_mapping) = sub {
        insert_nested(sub_mapping, &segments[1..], value);
    }
}

/// Tries: bool → integer → float → null → string.
fn retype(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if let Ok(f) = s.parse::<f64>()
        && f.is_finite()
    {
        return Value::Number(Number::from(f));
    }
    if s == "null" || s == "~" {
        return Value::Null;
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn flat_scalars() {
        let map = flatten(Some(&doc("login: first\nretries: 3\n")));
        assert_eq!(map.len(), 2);
        assert_eq!(map["login"], "first");
        assert_eq!(map["retries"], "3");
    }

    #[test]
    fn nested_keys_use_dotted_paths() {
        let map = flatten(Some(&doc(
            "server:\n  name: \"x\"\n  port: 25565\n  tls:\n    enabled: false\n",
        )));
        assert_eq!(map["server.name"], "x");
        assert_eq!(map["server.port"], "25565");
        assert_eq!(map["server.tls.enabled"], "false");
        assert!(!map.contains_key("server"));
        assert!(!map.contains_key("server.tls"));
    }

    #[test]
    fn only_scalar_leaves_remain() {
        let map = flatten(Some(&doc("a:\n  b:\n    c: 1\n  d: 2\ne: 3\n")));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.b.c", "a.d", "e"]);
    }

    #[test]
    fn scalars_use_literal_text() {
        let map = flatten(Some(&doc(
            "x: 1.5\ny: -4\nflag: true\nnothing: null\nempty:\n",
        )));
        assert_eq!(map["x"], "1.5");
        assert_eq!(map["y"], "-4");
        assert_eq!(map["flag"], "true");
        assert_eq!(map["nothing"], "null");
        assert_eq!(map["empty"], "null");
    }

    #[test]
    fn sequences_render_inline() {
        let map = flatten(Some(&doc("worlds:\n  - world\n  - nether\n")));
        assert_eq!(map["worlds"], "[world, nether]");
    }

    #[test]
    fn numeric_keys_are_stringified() {
        let map = flatten(Some(&doc("levels:\n  1: low\n  2: high\n")));
        assert_eq!(map["levels.1"], "low");
        assert_eq!(map["levels.2"], "high");
    }

    #[test]
    fn empty_nested_mapping_contributes_nothing() {
        let map = flatten(Some(&doc("a: {}\nb: 1\n")));
        assert_eq!(map.len(), 1);
        assert_eq!(map["b"], "1");
    }

    #[test]
    fn none_and_null_are_empty() {
        assert!(flatten(None).is_empty());
        assert!(flatten(Some(&Value::Null)).is_empty());
        assert!(flatten(Some(&doc("just a string"))).is_empty());
    }

    #[test]
    fn literal_dotted_key_reads_back_as_same_path() {
        let map = flatten(Some(&doc("a:\n  b: \"1\"\na.c: \"2\"\n")));
        assert_eq!(map["a.b"], "1");
        assert_eq!(map["a.c"], "2");
    }

    #[test]
    fn unflatten_rebuilds_nesting() {
        let mut values = FlatMap::new();
        values.insert("server.port".into(), "25565".into());
        values.insert("server.name".into(), "lobby".into());
        values.insert("debug".into(), "true".into());

        let tree = unflatten(&values);
        assert_eq!(tree["server"]["port"].as_i64(), Some(25565));
        assert_eq!(tree["server"]["name"].as_str(), Some("lobby"));
        assert_eq!(tree["debug"].as_bool(), Some(true));
    }

    #[test]
    fn unflatten_parent_wins_over_leaf() {
        let mut values = FlatMap::new();
        values.insert("a".into(), "1".into());
        values.insert("a.b".into(), "2".into());

        let tree = unflatten(&values);
        assert_eq!(tree["a"]["b"].as_i64(), Some(2));
    }

    #[test]
    fn retype_heuristics() {
        assert_eq!(retype("FALSE"), Value::Bool(false));
        assert_eq!(retype("7"), Value::Number(Number::from(7)));
        assert_eq!(retype("2.5"), Value::Number(Number::from(2.5)));
        assert_eq!(retype("null"), Value::Null);
        assert_eq!(retype("nan"), Value::String("nan".into()));
        assert_eq!(retype("lobby"), Value::String("lobby".into()));
    }
}
