//! Client-side Modelfile parsing for `/api/create`.
//!
//! Ollama's create endpoint takes structured fields (`from`, `system`,
//! `template`, `parameters`, ...) rather than raw Modelfile text, so the
//! file is parsed here the same way `ollama create -f` does.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::OllamaError;

/// Parameters that Ollama always expects as a list.
const LIST_PARAMETERS: &[&str] = &["stop"];

/// Structured contents of a Modelfile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Modelfile {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl Modelfile {
    /// Parse Modelfile text. `FROM` is required.
    pub fn parse(text: &str) -> Result<Self, OllamaError> {
        let mut from = None;
        let mut modelfile = Modelfile::default();
        let mut lines = text.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (instruction, rest) = match line.split_once(char::is_whitespace) {
                Some((instruction, rest)) => (instruction, rest.trim()),
                None => (line, ""),
            };

            let value = if let Some(after) = rest.strip_prefix("\"\"\"") {
                read_block(after, &mut lines)
                    .ok_or_else(|| invalid(idx, "unterminated \"\"\" block"))?
            } else {
                unquote(rest).to_string()
            };

            match instruction.to_ascii_uppercase().as_str() {
                "FROM" => from = Some(value),
                "SYSTEM" => modelfile.system = Some(value),
                "TEMPLATE" => modelfile.template = Some(value),
                "LICENSE" => modelfile.license = Some(value),
                "PARAMETER" => {
                    let (key, raw_value) = value
                        .split_once(char::is_whitespace)
                        .ok_or_else(|| invalid(idx, "PARAMETER needs a name and a value"))?;
                    add_parameter(&mut modelfile.parameters, key, unquote(raw_value.trim()));
                }
                other => {
                    return Err(invalid(
                        idx,
                        &format!("unsupported instruction '{}'", other),
                    ))
                }
            }
        }

        modelfile.from = from
            .filter(|f| !f.is_empty())
            .ok_or_else(|| OllamaError::InvalidModelfile("missing FROM instruction".to_string()))?;
        Ok(modelfile)
    }
}

fn invalid(idx: usize, message: &str) -> OllamaError {
    OllamaError::InvalidModelfile(format!("line {}: {}", idx + 1, message))
}

/// Collect a `"""` block that may close on the same line or a later one.
fn read_block<'a>(
    first: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Option<String> {
    if let Some(end) = first.find("\"\"\"") {
        return Some(first[..end].to_string());
    }

    let mut parts = vec![first.to_string()];
    for (_, line) in lines {
        if let Some(end) = line.find("\"\"\"") {
            parts.push(line[..end].to_string());
            return Some(parts.join("\n").trim().to_string());
        }
        parts.push(line.to_string());
    }
    None
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn typed_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(float) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(float);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// Repeated names and list-typed names (`stop`) accumulate into arrays.
fn add_parameter(parameters: &mut Map<String, Value>, key: &str, raw: &str) {
    let value = typed_value(raw);
    match parameters.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None if LIST_PARAMETERS.contains(&key) => {
            parameters.insert(key.to_string(), Value::Array(vec![value]));
        }
        None => {
            parameters.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repo_modelfile() {
        let modelfile = Modelfile::parse(include_str!("../../../Modelfile")).unwrap();

        assert_eq!(modelfile.from, "qwen2.5-coder:1.5b");
        assert_eq!(modelfile.parameters["temperature"], json!(0.2));
        assert_eq!(modelfile.parameters["num_ctx"], json!(8192));
        let system = modelfile.system.as_deref().unwrap();
        assert!(system.starts_with("You write production-quality FastAPI REST endpoints"));
        assert!(system.ends_with("Return only code."));
        assert!(modelfile.template.is_none());
    }

    #[test]
    fn test_single_line_values_and_stop_list() {
        let text = r#"
# comment
from llama3.2:1b
SYSTEM "Be brief."
TEMPLATE """{{ .Prompt }}"""
PARAMETER stop "<|im_end|>"
PARAMETER stop "<|endoftext|>"
PARAMETER mirostat false
"#;
        let modelfile = Modelfile::parse(text).unwrap();

        assert_eq!(modelfile.from, "llama3.2:1b");
        assert_eq!(modelfile.system.as_deref(), Some("Be brief."));
        assert_eq!(modelfile.template.as_deref(), Some("{{ .Prompt }}"));
        assert_eq!(
            modelfile.parameters["stop"],
            json!(["<|im_end|>", "<|endoftext|>"])
        );
        assert_eq!(modelfile.parameters["mirostat"], json!(false));
    }

    #[test]
    fn test_missing_from() {
        let err = Modelfile::parse("SYSTEM hi\n").unwrap_err();
        assert!(matches!(err, OllamaError::InvalidModelfile(ref m) if m.contains("FROM")));
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(matches!(
            Modelfile::parse("FROM base\nADAPTER ./lora.gguf\n"),
            Err(OllamaError::InvalidModelfile(ref m)) if m.starts_with("line 2")
        ));
        assert!(Modelfile::parse("FROM base\nPARAMETER temperature\n").is_err());
        assert!(Modelfile::parse("FROM base\nSYSTEM \"\"\"open\nnever closed\n").is_err());
    }

    #[test]
    fn test_empty_sections_not_serialized() {
        let modelfile = Modelfile::parse("FROM base\n").unwrap();
        assert_eq!(serde_json::to_value(&modelfile).unwrap(), json!({"from": "base"}));
    }
}
