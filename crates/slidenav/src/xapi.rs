//! Minimal xAPI statement model: just the parts the player emits and the chrome rewrites.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ADL_VERBS: &str = "http://adlnet.gov/expapi/verbs/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub verb: Verb,
    pub object: Activity,
    #[serde(default)]
    pub context: Context,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verb {
    pub id: String,
    #[serde(default)]
    pub display: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl Verb {
    /// A verb from the ADL vocabulary, e.g. `Verb::adl("answered")`.
    pub fn adl(short: &str) -> Self {
        Self {
            id: format!("{ADL_VERBS}{short}"),
            display: BTreeMap::from([("en-US".to_string(), short.to_string())]),
        }
    }

    /// Last path segment of the verb id.
    pub fn short(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

impl Statement {
    pub fn new(verb: &str, object: Activity) -> Self {
        Self {
            verb: Verb::adl(verb),
            object,
            context: Context::default(),
            result: None,
        }
    }

    pub fn short_verb(&self) -> &str {
        self.verb.short()
    }

    /// Replace the verb, keeping everything else.
    pub fn with_verb(mut self, verb: &str) -> Self {
        self.verb = Verb::adl(verb);
        self
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Set a context extension, creating the extensions map if needed.
    pub fn with_extension(mut self, key: &str, value: Value) -> Self {
        self.context
            .extensions
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.context.extensions.as_ref()?.get(key)
    }
}

/// Append-only JSON-lines sink for published statements.
pub struct StatementLog<W: Write> {
    out: W,
    written: usize,
}

impl StatementLog<std::fs::File> {
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open statement log {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> StatementLog<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write(&mut self, statement: &Statement) -> Result<()> {
        serde_json::to_writer(&mut self.out, statement)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.written += 1;
        tracing::trace!(verb = statement.short_verb(), id = %statement.object.id, "statement");
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity() -> Activity {
        Activity {
            id: "slidenav://demo/0/1".to_string(),
            name: None,
        }
    }

    #[test]
    fn test_short_verb() {
        let statement = Statement::new("interacted", activity());
        assert_eq!(statement.short_verb(), "interacted");
        assert_eq!(
            statement.verb.id,
            "http://adlnet.gov/expapi/verbs/interacted"
        );
    }

    #[test]
    fn test_extensions_created_on_demand() {
        let statement = Statement::new("completed", activity());
        assert!(statement.context.extensions.is_none());
        let statement = statement.with_extension("urn:x", json!(3));
        assert_eq!(statement.extension("urn:x"), Some(&json!(3)));
    }

    #[test]
    fn test_existing_extensions_are_kept() {
        let statement = Statement::new("completed", activity())
            .with_extension("urn:a", json!("kept"))
            .with_extension("urn:b", json!(1));
        assert_eq!(statement.extension("urn:a"), Some(&json!("kept")));
        assert_eq!(statement.extension("urn:b"), Some(&json!(1)));
    }

    #[test]
    fn test_context_without_extensions_deserializes() {
        let statement: Statement = serde_json::from_value(json!({
            "verb": {"id": "http://adlnet.gov/expapi/verbs/completed"},
            "object": {"id": "urn:task"},
            "context": {}
        }))
        .unwrap();
        assert_eq!(statement.short_verb(), "completed");
        assert!(statement.context.extensions.is_none());
    }

    #[test]
    fn test_log_writes_json_lines() {
        let mut log = StatementLog::new(Vec::new());
        log.write(&Statement::new("interacted", activity())).unwrap();
        log.write(&Statement::new("answered", activity())).unwrap();
        assert_eq!(log.written(), 2);

        let bytes = log.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let verbs: Vec<String> = text
            .lines()
            .map(|line| {
                let statement: Statement = serde_json::from_str(line).unwrap();
                statement.short_verb().to_string()
            })
            .collect();
        assert_eq!(verbs, ["interacted", "answered"]);
    }
}
