use anyhow::Result;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}:]+)(?::-(.*?))?\}").expect("valid regex"))
}

/// Interpolate `${VAR}` and `${VAR:-default}` references in a string.
/// Names that resolve to nothing are appended to `missing_vars`.
fn interpolate_str<F>(input: &str, lookup: &F, missing_vars: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    variable_pattern()
        .replace_all(input, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match (lookup(var_name), cap.get(2)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }
            }
        })
        .into_owned()
}

fn interpolate_value<F>(value: &mut Value, lookup: &F, missing_vars: &mut Vec<String>)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) => *s = interpolate_str(s, lookup, missing_vars),
        Value::Sequence(items) => items.iter_mut().for_each(|item| interpolate_value(item, lookup, missing_vars)),
        Value::Mapping(mapping) => {
            mapping.iter_mut().for_each(|(_, item)| interpolate_value(item, lookup, missing_vars))
        }
        Value::Tagged(tagged) => interpolate_value(&mut tagged.value, lookup, missing_vars),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Interpolate the string scalars of an already parsed YAML document.
///
/// Substituted values are never re-parsed as YAML, so they may contain `#`, `: ` or
/// quotes. Mapping keys are left as written. Every unresolved name is reported at once.
pub fn interpolate_yaml_value<F>(mut value: Value, lookup: F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing_vars = Vec::new();
    interpolate_value(&mut value, &lookup, &mut missing_vars);
    if !missing_vars.is_empty() {
        anyhow::bail!("Missing required environment variables: {}", missing_vars.join(", "));
    }
    Ok(value)
}
