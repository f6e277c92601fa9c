//! Jinja template functions: ref() and var().

use crate::resolver::RefResolver;
use minijinja::value::Value;
use minijinja::Error;
use std::collections::HashMap;

/// Create the ref() function that resolves a view name to its warehouse
/// identifier
///
/// Usage in templates:
/// ```jinja
/// SELECT * FROM {{ ref('stg_orders') }}
/// SELECT * FROM {{ ref('stg_orders', 'other-project') }}
/// ```
pub(crate) fn make_ref_fn(
    resolver: RefResolver,
) -> impl Fn(&str, Option<String>) -> Result<String, Error> + Send + Sync + Clone + 'static {
    move |name: &str, catalog: Option<String>| {
        if name.trim().is_empty() {
            return Err(Error::new(
                minijinja::ErrorKind::InvalidOperation,
                "ref() requires a non-empty view name",
            ));
        }
        Ok(resolver.resolve(
            name,
            catalog.as_deref().filter(|c| !c.is_empty()),
        ))
    }
}

/// Create the var() function that retrieves variables from config
///
/// Usage in templates:
/// ```jinja
/// {{ var('start_date') }}
/// {{ var('missing', 'default_value') }}
/// ```
pub(crate) fn make_var_fn(
    vars: HashMap<String, serde_json::Value>,
) -> impl Fn(&str, Option<Value>) -> Result<Value, Error> + Send + Sync + Clone + 'static {
    move |name: &str, default: Option<Value>| {
        if let Some(value) = vars.get(name) {
            Ok(json_to_minijinja_value(value))
        } else if let Some(default_val) = default {
            Ok(default_val)
        } else {
            Err(Error::new(
                minijinja::ErrorKind::UndefinedError,
                format!(
                    "Variable '{}' is not defined and no default provided. Define it in the vars: section of viewforge.yml",
                    name
                ),
            ))
        }
    }
}

/// Convert serde_json::Value to minijinja::Value
pub(crate) fn json_to_minijinja_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::from(()),
        serde_json::Value::Bool(b) => Value::from(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(f) = n.as_f64() {
                Value::from(f)
            } else {
                Value::from(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(arr) => {
            let values: Vec<Value> = arr.iter().map(json_to_minijinja_value).collect();
            Value::from(values)
        }
        serde_json::Value::Object(obj) => {
            let map: HashMap<String, Value> = obj
                .iter()
                .map(|(k, v)| (k.clone(), json_to_minijinja_value(v)))
                .collect();
            Value::from_iter(map)
        }
    }
}

/// Convert serde_yaml::Value to serde_json::Value
pub(crate) fn yaml_to_json(yaml: &serde_yaml::Value) -> serde_json::Value {
    match yaml {
        serde_yaml::Value::Null => serde_json::Value::Null,
        serde_yaml::Value::Bool(b) => serde_json::Value::Bool(*b),
        serde_yaml::Value::Number(n) => convert_yaml_number(n),
        serde_yaml::Value::String(s) => serde_json::Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            serde_json::Value::Array(seq.iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let obj: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .filter_map(|(k, v): (&serde_yaml::Value, &serde_yaml::Value)| {
                    k.as_str().map(|key| (key.to_string(), yaml_to_json(v)))
                })
                .collect();
            serde_json::Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Convert a YAML number to a JSON value; NaN and Infinity become null.
fn convert_yaml_number(n: &serde_yaml::Number) -> serde_json::Value {
    if let Some(i) = n.as_i64() {
        return serde_json::Value::Number(serde_json::Number::from(i));
    }
    if let Some(f) = n.as_f64() {
        return match serde_json::Number::from_f64(f) {
            Some(num) => serde_json::Value::Number(num),
            None => {
                log::warn!(
                    "YAML number {} is NaN or Infinity; converting to JSON null",
                    f
                );
                serde_json::Value::Null
            }
        };
    }
    serde_json::Value::Null
}

#[cfg(test)]
#[path = "functions_test.rs"]
mod tests;
