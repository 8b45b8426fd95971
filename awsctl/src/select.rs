use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde_json::Value;

/// What part of a response becomes the command's output
///
/// - `*` emits the whole response
/// - `^Name` emits the value bound to the parameter `Name`
/// - `Prop` or `Prop.Nested` emits the property at that path; arrays are unrolled into one value per element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
  Response,
  Parameter(String),
  Path(Vec<String>),
}

impl FromStr for Selector {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    if s == "*" {
      return Ok(Selector::Response);
    }

    if let Some(name) = s.strip_prefix('^') {
      if name.is_empty() {
        bail!("'^' must be followed by a parameter name");
      }
      return Ok(Selector::Parameter(name.to_owned()));
    }

    let segments = s.split('.').map(str::to_owned).collect::<Vec<_>>();
    if segments.iter().any(|seg| seg.is_empty()) {
      bail!("Invalid select expression '{s}'");
    }

    Ok(Selector::Path(segments))
  }
}

impl fmt::Display for Selector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Selector::Response => write!(f, "*"),
      Selector::Parameter(name) => write!(f, "^{name}"),
      Selector::Path(segments) => write!(f, "{}", segments.join(".")),
    }
  }
}

/// Case-insensitive property lookup, preferring an exact match
fn property<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
  let map = value.as_object()?;
  map
    .get(name)
    .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
}

/// Resolve one path segment against each of the current values, unrolling arrays along the way
fn step<'a>(values: Vec<&'a Value>, segment: &str) -> Vec<&'a Value> {
  values
    .into_iter()
    .flat_map(|v| match v {
      Value::Array(items) => items.iter().filter_map(|i| property(i, segment)).collect::<Vec<_>>(),
      _ => property(v, segment).into_iter().collect(),
    })
    .collect()
}

fn unroll(value: &Value) -> Vec<Value> {
  match value {
    Value::Null => vec![],
    Value::Array(items) => items.iter().filter(|i| !i.is_null()).cloned().collect(),
    other => vec![other.clone()],
  }
}

impl Selector {
  /// Project the response (and bound parameters) into the values to emit
  pub fn project(&self, response: &Value, params: &Value) -> Vec<Value> {
    match self {
      Selector::Response => match response {
        Value::Null => vec![],
        Value::Object(map) if map.is_empty() => vec![],
        other => vec![other.clone()],
      },
      Selector::Parameter(name) => property(params, name).map(unroll).unwrap_or_default(),
      Selector::Path(segments) => {
        let found = segments.iter().fold(vec![response], |acc, seg| step(acc, seg));
        found.into_iter().flat_map(unroll).collect()
      }
    }
  }

  /// Whether the selector reads from the response rather than the parameters
  pub fn reads_response(&self) -> bool {
    !matches!(self, Selector::Parameter(_))
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;
  use serde_json::json;

  use super::*;

  fn response() -> Value {
    json!({
      "Blocks": [
        {"BlockIndex": 0, "BlockToken": "a"},
        {"BlockIndex": 7, "BlockToken": "b"}
      ],
      "BlockSize": 524288,
      "Rule": {"RuleId": "high_risk", "RuleVersion": "1"},
      "Status": "pending",
      "NextToken": null
    })
  }

  #[rstest]
  #[case("*", Selector::Response)]
  #[case("^SnapshotId", Selector::Parameter("SnapshotId".to_owned()))]
  #[case("Blocks", Selector::Path(vec!["Blocks".to_owned()]))]
  #[case(" Rule.RuleId ", Selector::Path(vec!["Rule".to_owned(), "RuleId".to_owned()]))]
  fn parses_selectors(#[case] input: &str, #[case] expected: Selector) {
    assert_eq!(input.parse::<Selector>().unwrap(), expected);
  }

  #[rstest]
  #[case("^")]
  #[case("Rule..RuleId")]
  #[case("")]
  fn rejects_bad_selectors(#[case] input: &str) {
    assert!(input.parse::<Selector>().is_err());
  }

  #[test]
  fn whole_response() {
    let result = Selector::Response.project(&response(), &json!({}));
    assert_eq!(result, vec![response()]);
  }

  #[test]
  fn empty_response_emits_nothing() {
    assert!(Selector::Response.project(&json!({}), &json!({})).is_empty());
  }

  #[test]
  fn collection_is_unrolled() {
    let result = "Blocks".parse::<Selector>().unwrap().project(&response(), &json!({}));
    assert_eq!(result.len(), 2);
    assert_eq!(result[1]["BlockToken"], "b");
  }

  #[test]
  fn path_through_collection() {
    let result = "Blocks.BlockIndex".parse::<Selector>().unwrap().project(&response(), &json!({}));
    assert_eq!(result, vec![json!(0), json!(7)]);
  }

  #[rstest]
  #[case("Status", vec![json!("pending")])]
  #[case("status", vec![json!("pending")])]
  #[case("rule.ruleid", vec![json!("high_risk")])]
  #[case("NextToken", vec![])]
  #[case("Missing", vec![])]
  #[case("Rule.Missing", vec![])]
  fn property_paths(#[case] select: &str, #[case] expected: Vec<Value>) {
    let result = select.parse::<Selector>().unwrap().project(&response(), &json!({}));
    assert_eq!(result, expected);
  }

  #[test]
  fn parameter_echo() {
    let params = json!({"SnapshotId": "snap-0123", "Tags": [{"Key": "a", "Value": "b"}]});
    let select = "^snapshotid".parse::<Selector>().unwrap();
    assert_eq!(select.project(&response(), &params), vec![json!("snap-0123")]);
    assert!(!select.reads_response());
  }

  #[test]
  fn display_round_trips() {
    for s in ["*", "^DetectorId", "Rule.RuleId"] {
      assert_eq!(s.parse::<Selector>().unwrap().to_string(), s);
    }
  }
}
