//! `validate` and its per-keyword checks.
//!
//! The schema combinator scan is a linear pass over the schema object's
//! keys: each key that's present contributes one more
//! constraint to check, and `anyOf`/`oneOf`/`not` recurse back into
//! [`validate_at`] for their sub-schemas. `enum`/`uniqueItems` deep-compare
//! via [`ucl_value::Value::deep_eq`] rather than a bespoke comparator.

use regex::Regex;
use ucl_util::{SchemaError, SchemaErrorKind};
use ucl_value::value::ValueData;
use ucl_value::{ObjectMap, Tag, Value};

/// Validates `candidate` against `schema`, returning the first failure
/// encountered.
pub fn validate(schema: &Value, candidate: &Value) -> Result<(), SchemaError> {
    validate_at(schema, candidate, "")
}

fn push_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}/{segment}")
    }
}

fn schema_object<'a>(schema: &'a Value, path: &str) -> Result<std::cell::Ref<'a, ValueData>, SchemaError> {
    let data = schema.borrow();
    if matches!(data.tag, Tag::Object(_)) {
        Ok(data)
    } else {
        Err(SchemaError::invalid_schema("schema must be an object", path))
    }
}

fn with_object_map<T>(data: &ValueData, f: impl FnOnce(&ObjectMap) -> T) -> T {
    match &data.tag {
        Tag::Object(map) => f(map),
        _ => unreachable!("caller already checked the tag is Object"),
    }
}

fn validate_at(schema: &Value, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let data = schema_object(schema, path)?;
    with_object_map(&data, |map| {
        check_type(map, candidate, path)?;
        check_enum(map, candidate, path)?;
        check_combinators(map, candidate, path)?;
        if candidate.is_object() {
            check_object(map, candidate, path)?;
        }
        if candidate.is_array() {
            check_array(map, candidate, path)?;
        }
        check_numeric(map, candidate, path)?;
        check_string(map, candidate, path)?;
        Ok(())
    })
}

fn type_name(value: &Value) -> Option<String> {
    value.as_bytes().map(|b| b.as_str().into_owned())
}

fn candidate_matches_type(candidate: &Value, type_name: &str) -> bool {
    let data = candidate.borrow();
    match type_name {
        "object" => matches!(data.tag, Tag::Object(_)),
        "array" => matches!(data.tag, Tag::Array(_)),
        "string" => matches!(data.tag, Tag::String(_)),
        "boolean" => matches!(data.tag, Tag::Bool(_)),
        "null" => matches!(data.tag, Tag::Null),
        "integer" => matches!(data.tag, Tag::Int(_)),
        "time" => matches!(data.tag, Tag::Time(_)),
        // integer ⊆ number; time ⊆ number.
        "number" => matches!(data.tag, Tag::Int(_) | Tag::Float(_) | Tag::Time(_)),
        _ => false,
    }
}

fn check_type(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let Some(type_val) = map.find(b"type") else {
        return Ok(());
    };
    let allowed: Vec<String> = {
        let data = type_val.borrow();
        match &data.tag {
            Tag::String(_) => vec![type_name(type_val).unwrap()],
            Tag::Array(items) => items.iter().filter_map(type_name).collect(),
            _ => {
                return Err(SchemaError::invalid_schema(
                    "'type' must be a string or an array of strings",
                    path,
                ))
            }
        }
    };
    if allowed.iter().any(|t| candidate_matches_type(candidate, t)) {
        Ok(())
    } else {
        Err(SchemaError::type_mismatch(
            format!("expected type {allowed:?}"),
            path,
        ))
    }
}

fn check_enum(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let Some(enum_val) = map.find(b"enum") else {
        return Ok(());
    };
    let data = enum_val.borrow();
    let Tag::Array(items) = &data.tag else {
        return Err(SchemaError::invalid_schema("'enum' must be an array", path));
    };
    if items.iter().any(|item| item.deep_eq(candidate)) {
        Ok(())
    } else {
        Err(SchemaError::constraint(
            "candidate does not equal any enumerated value",
            path,
        ))
    }
}

fn sub_schemas<'a>(value: &'a Value, keyword: &str, path: &str) -> Result<Vec<Value>, SchemaError> {
    let data = value.borrow();
    match &data.tag {
        Tag::Array(items) => Ok(items.clone()),
        _ => Err(SchemaError::invalid_schema(
            format!("'{keyword}' must be an array of sub-schemas"),
            path,
        )),
    }
}

fn check_combinators(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    if let Some(all_of) = map.find(b"allOf") {
        for sub in sub_schemas(all_of, "allOf", path)? {
            validate_at(&sub, candidate, path)?;
        }
    }
    if let Some(any_of) = map.find(b"anyOf") {
        let subs = sub_schemas(any_of, "anyOf", path)?;
        let mut last_err = None;
        let mut matched = false;
        for sub in &subs {
            match validate_at(sub, candidate, path) {
                Ok(()) => {
                    matched = true;
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        if !matched {
            return Err(last_err
                .unwrap_or_else(|| SchemaError::constraint("'anyOf' had no branches", path)));
        }
    }
    if let Some(one_of) = map.find(b"oneOf") {
        let subs = sub_schemas(one_of, "oneOf", path)?;
        let matches = subs
            .iter()
            .filter(|sub| validate_at(sub, candidate, path).is_ok())
            .count();
        if matches != 1 {
            return Err(SchemaError::constraint(
                format!("'oneOf' expected exactly one match, got {matches}"),
                path,
            ));
        }
    }
    if let Some(not_schema) = map.find(b"not") {
        if validate_at(not_schema, candidate, path).is_ok() {
            return Err(SchemaError::constraint("'not' sub-schema matched", path));
        }
    }
    Ok(())
}

/// `false` forbids, an object schema validates the overflow, anything else
/// (including absence) allows it unconstrained.
enum Overflow<'a> {
    Forbidden,
    Schema(&'a Value),
    Allowed,
}

fn overflow_policy(value: Option<&Value>) -> Overflow<'_> {
    match value {
        None => Overflow::Allowed,
        Some(v) => match &v.borrow().tag {
            Tag::Bool(false) => Overflow::Forbidden,
            Tag::Bool(true) => Overflow::Allowed,
            Tag::Object(_) => Overflow::Schema(v),
            _ => Overflow::Allowed,
        },
    }
}

fn check_object(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let cdata = candidate.borrow();
    let Tag::Object(cmap) = &cdata.tag else {
        return Ok(());
    };

    let mut consumed: std::collections::HashSet<Vec<u8>> = std::collections::HashSet::new();

    if let Some(properties) = map.find(b"properties") {
        let pdata = properties.borrow();
        let Tag::Object(pmap) = &pdata.tag else {
            return Err(SchemaError::invalid_schema("'properties' must be an object", path));
        };
        for (key, subschema) in pmap.iter() {
            consumed.insert(key.as_slice().to_vec());
            if let Some(member) = cmap.find(key.as_slice()) {
                validate_at(subschema, member, &push_path(path, &key.as_str()))?;
            }
        }
    }

    if let Some(pattern_properties) = map.find(b"patternProperties") {
        let pdata = pattern_properties.borrow();
        let Tag::Object(pmap) = &pdata.tag else {
            return Err(SchemaError::invalid_schema(
                "'patternProperties' must be an object",
                path,
            ));
        };
        for (pattern, subschema) in pmap.iter() {
            let pattern_str = pattern.as_str();
            let regex = Regex::new(&pattern_str).map_err(|e| {
                SchemaError::invalid_schema(format!("invalid regex '{pattern_str}': {e}"), path)
            })?;
            for (ckey, head) in cmap.iter() {
                let ckey_str = ckey.as_str();
                if regex.is_match(&ckey_str) {
                    consumed.insert(ckey.as_slice().to_vec());
                    for member in head.chain_iter() {
                        validate_at(subschema, &member, &push_path(path, &ckey_str))?;
                    }
                }
            }
        }
    }

    let additional = map.find(b"additionalProperties");
    if !matches!(overflow_policy(additional), Overflow::Allowed) {
        for (ckey, head) in cmap.iter() {
            if consumed.contains(ckey.as_slice()) {
                continue;
            }
            match overflow_policy(additional) {
                Overflow::Forbidden => {
                    return Err(SchemaError::constraint(
                        format!("unexpected property '{}'", ckey.as_str()),
                        path,
                    ))
                }
                Overflow::Schema(sub) => {
                    for member in head.chain_iter() {
                        validate_at(sub, &member, &push_path(path, &ckey.as_str()))?;
                    }
                }
                Overflow::Allowed => {}
            }
        }
    }

    if let Some(required) = map.find(b"required") {
        let rdata = required.borrow();
        let Tag::Array(names) = &rdata.tag else {
            return Err(SchemaError::invalid_schema("'required' must be an array", path));
        };
        for name in names {
            let name_bytes = name.as_bytes().ok_or_else(|| {
                SchemaError::invalid_schema("'required' entries must be strings", path)
            })?;
            if cmap.find(name_bytes.as_slice()).is_none() {
                return Err(SchemaError::missing_property(
                    format!("missing required property '{}'", name_bytes.as_str()),
                    path,
                ));
            }
        }
    }

    check_bounds(map, b"minProperties", b"maxProperties", cmap.len(), path)?;

    Ok(())
}

fn check_array(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let cdata = candidate.borrow();
    let Tag::Array(items) = &cdata.tag else {
        return Ok(());
    };

    let mut schema_count = None;
    if let Some(items_schema) = map.find(b"items") {
        let idata = items_schema.borrow();
        match &idata.tag {
            Tag::Array(schemas) => {
                schema_count = Some(schemas.len());
                for (i, item) in items.iter().enumerate() {
                    if let Some(sub) = schemas.get(i) {
                        validate_at(sub, item, &push_path(path, &i.to_string()))?;
                    }
                }
            }
            _ => {
                for (i, item) in items.iter().enumerate() {
                    validate_at(items_schema, item, &push_path(path, &i.to_string()))?;
                }
            }
        }
    }

    if let Some(count) = schema_count {
        if items.len() > count {
            let additional = map.find(b"additionalItems");
            match overflow_policy(additional) {
                Overflow::Forbidden => {
                    return Err(SchemaError::constraint(
                        "array has more elements than positional 'items' schemas allow",
                        path,
                    ))
                }
                Overflow::Schema(sub) => {
                    for (i, item) in items.iter().enumerate().skip(count) {
                        validate_at(sub, item, &push_path(path, &i.to_string()))?;
                    }
                }
                Overflow::Allowed => {}
            }
        }
    }

    if map.find(b"uniqueItems").and_then(|v| v.as_bool()).unwrap_or(false) {
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if items[i].deep_eq(&items[j]) {
                    return Err(SchemaError::constraint(
                        format!("elements {i} and {j} are not unique"),
                        path,
                    ));
                }
            }
        }
    }

    check_bounds(map, b"minItems", b"maxItems", items.len(), path)?;

    Ok(())
}

fn check_bounds(
    map: &ObjectMap,
    min_key: &[u8],
    max_key: &[u8],
    actual: usize,
    path: &str,
) -> Result<(), SchemaError> {
    if let Some(min) = map.find(min_key).and_then(|v| v.as_int()) {
        if (actual as i64) < min {
            return Err(SchemaError::constraint(
                format!("{actual} is below the minimum of {min}"),
                path,
            ));
        }
    }
    if let Some(max) = map.find(max_key).and_then(|v| v.as_int()) {
        if (actual as i64) > max {
            return Err(SchemaError::constraint(
                format!("{actual} exceeds the maximum of {max}"),
                path,
            ));
        }
    }
    Ok(())
}

fn check_numeric(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let Some(number) = candidate.as_float() else {
        return Ok(());
    };
    if !matches!(candidate.borrow().tag, Tag::Int(_) | Tag::Float(_) | Tag::Time(_)) {
        return Ok(());
    }

    if let Some(min) = map.find(b"minimum").and_then(|v| v.as_float()) {
        let exclusive = map
            .find(b"exclusiveMinimum")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let violated = if exclusive { number <= min } else { number < min };
        if violated {
            return Err(SchemaError::constraint(
                format!("{number} is below the minimum of {min}"),
                path,
            ));
        }
    }
    if let Some(max) = map.find(b"maximum").and_then(|v| v.as_float()) {
        let exclusive = map
            .find(b"exclusiveMaximum")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let violated = if exclusive { number >= max } else { number > max };
        if violated {
            return Err(SchemaError::constraint(
                format!("{number} exceeds the maximum of {max}"),
                path,
            ));
        }
    }
    if let Some(divisor) = map.find(b"multipleOf").and_then(|v| v.as_float()) {
        if divisor != 0.0 {
            let quotient = number / divisor;
            let remainder = (quotient - quotient.round()).abs();
            if remainder > 1e-16 {
                return Err(SchemaError::constraint(
                    format!("{number} is not a multiple of {divisor}"),
                    path,
                ));
            }
        }
    }
    Ok(())
}

fn check_string(map: &ObjectMap, candidate: &Value, path: &str) -> Result<(), SchemaError> {
    let Some(bytes) = candidate.as_bytes() else {
        return Ok(());
    };
    let len = bytes.len();
    if let Some(min) = map.find(b"minLength").and_then(|v| v.as_int()) {
        if (len as i64) < min {
            return Err(SchemaError::constraint(
                format!("string of length {len} is shorter than minLength {min}"),
                path,
            ));
        }
    }
    if let Some(max) = map.find(b"maxLength").and_then(|v| v.as_int()) {
        if (len as i64) > max {
            return Err(SchemaError::constraint(
                format!("string of length {len} is longer than maxLength {max}"),
                path,
            ));
        }
    }
    Ok(())
}
