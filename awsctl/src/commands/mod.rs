pub mod ebs;
pub mod frauddetector;

use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// A `Key=Value` pair given on the command line (tags, event variables)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
  pub key: String,
  pub value: String,
}

impl FromStr for KeyValue {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let (key, value) = s
      .split_once('=')
      .ok_or_else(|| anyhow!("Expected KEY=VALUE, found '{s}'"))?;
    if key.is_empty() {
      return Err(anyhow!("Key must not be empty in '{s}'"));
    }

    Ok(KeyValue {
      key: key.to_owned(),
      value: value.to_owned(),
    })
  }
}

/// Split `s` into exactly `N` non-empty `:` separated parts
pub(crate) fn split_fields<const N: usize>(s: &str, expected: &str) -> Result<[String; N]> {
  let parts = s.split(':').map(str::to_owned).collect::<Vec<_>>();
  if parts.len() != N || parts.iter().any(|p| p.is_empty()) {
    return Err(anyhow!("Expected {expected}, found '{s}'"));
  }

  parts.try_into().map_err(|_| anyhow!("Expected {expected}, found '{s}'"))
}
