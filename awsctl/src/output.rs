use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CommandError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
  /// Pretty printed JSON, one document per emitted value
  #[default]
  Json,
  /// YAML, one document per emitted value
  Yaml,
  /// Scalars as-is, objects as compact JSON lines
  Text,
}

/// Destination for the values a command emits
pub trait Sink {
  fn emit(&mut self, value: &Value) -> Result<(), CommandError>;

  /// Informational messages that are not results (`--what-if` descriptions, resume tokens)
  fn note(&mut self, message: &str) -> Result<(), CommandError>;
}

pub fn render(format: OutputFormat, value: &Value) -> Result<String, CommandError> {
  let rendered = match (format, value) {
    (OutputFormat::Text, Value::String(s)) => s.to_owned(),
    (OutputFormat::Text, Value::Object(_) | Value::Array(_)) => serde_json::to_string(value)?,
    (OutputFormat::Text, other) => other.to_string(),
    (OutputFormat::Json, _) => serde_json::to_string_pretty(value)?,
    (OutputFormat::Yaml, _) => {
      let doc = serde_yaml::to_string(value).map_err(|e| CommandError::Validation(e.to_string()))?;
      format!("---\n{}", doc.trim_end())
    }
  };

  Ok(rendered)
}

/// Writes results to stdout and notes to stderr
pub struct Console {
  format: OutputFormat,
}

impl Console {
  pub fn new(format: OutputFormat) -> Self {
    Self { format }
  }
}

impl Sink for Console {
  fn emit(&mut self, value: &Value) -> Result<(), CommandError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render(self.format, value)?)?;
    Ok(())
  }

  fn note(&mut self, message: &str) -> Result<(), CommandError> {
    writeln!(io::stderr(), "{message}")?;
    Ok(())
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use rstest::*;
  use serde_json::json;

  use super::*;

  /// Collects everything a command emits
  #[derive(Default)]
  pub(crate) struct Captured {
    pub values: Vec<Value>,
    pub notes: Vec<String>,
  }

  impl Sink for Captured {
    fn emit(&mut self, value: &Value) -> Result<(), CommandError> {
      self.values.push(value.clone());
      Ok(())
    }

    fn note(&mut self, message: &str) -> Result<(), CommandError> {
      self.notes.push(message.to_owned());
      Ok(())
    }
  }

  #[rstest]
  #[case(OutputFormat::Json, json!("completed"), "\"completed\"")]
  #[case(OutputFormat::Json, json!(42), "42")]
  #[case(OutputFormat::Json, json!({"Status": "pending"}), "{\n  \"Status\": \"pending\"\n}")]
  #[case(OutputFormat::Text, json!("completed"), "completed")]
  #[case(OutputFormat::Text, json!(true), "true")]
  #[case(OutputFormat::Text, json!({"BlockIndex": 3, "BlockToken": "t"}), "{\"BlockIndex\":3,\"BlockToken\":\"t\"}")]
  #[case(OutputFormat::Yaml, json!({"Status": "pending"}), "---\nStatus: pending")]
  fn renders(#[case] format: OutputFormat, #[case] value: Value, #[case] expected: &str) {
    assert_eq!(render(format, &value).unwrap(), expected);
  }
}
