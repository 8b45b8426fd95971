//! Amazon Fraud Detector
//!
//! https://docs.aws.amazon.com/frauddetector/latest/api/API_Operations.html
pub mod detector;
pub mod entity_type;
pub mod event_type;
pub mod label;
pub mod outcome;
pub mod prediction;
pub mod rule;
pub mod tag;
pub mod variable;

use std::{fmt, str::FromStr};

use anyhow::Result;
use aws_sdk_frauddetector::types;
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use super::{split_fields, KeyValue};
use crate::{error::CommandError, Session};

#[derive(Debug, Subcommand)]
pub enum FraudDetectorCommands {
  /// Create or update a detector
  PutDetector(detector::PutDetectorInput),
  /// Get all detectors or a single detector
  GetDetectors(detector::GetDetectorsInput),
  /// Delete a detector; all versions must be deleted first
  DeleteDetector(detector::DeleteDetectorInput),
  /// Create a detector version in the DRAFT state
  CreateDetectorVersion(detector::CreateDetectorVersionInput),
  /// Get a particular detector version
  GetDetectorVersion(detector::GetDetectorVersionInput),
  /// Update the status of a detector version
  UpdateDetectorVersionStatus(detector::UpdateDetectorVersionStatusInput),
  /// Delete a detector version that is not ACTIVE
  DeleteDetectorVersion(detector::DeleteDetectorVersionInput),

  /// Create a rule for use with the specified detector
  CreateRule(rule::CreateRuleInput),
  /// Get all rules for a detector, or a specific rule or rule version
  GetRules(rule::GetRulesInput),
  /// Create a new version of a rule
  UpdateRuleVersion(rule::UpdateRuleVersionInput),
  /// Delete a rule version not used by an ACTIVE or INACTIVE detector version
  DeleteRule(rule::DeleteRuleInput),

  /// Create a variable
  CreateVariable(variable::CreateVariableInput),
  /// Get all variables or a specific variable
  GetVariables(variable::GetVariablesInput),
  /// Delete a variable not used in an event type or rule
  DeleteVariable(variable::DeleteVariableInput),

  /// Create or update an event type
  PutEventType(event_type::PutEventTypeInput),
  /// Get all event types or a specific event type
  GetEventTypes(event_type::GetEventTypesInput),
  /// Delete an event type not used by a detector
  DeleteEventType(event_type::DeleteEventTypeInput),

  /// Create or update an entity type
  PutEntityType(entity_type::PutEntityTypeInput),
  /// Get all entity types or a specific entity type
  GetEntityTypes(entity_type::GetEntityTypesInput),
  /// Delete an entity type not used by an event type
  DeleteEntityType(entity_type::DeleteEntityTypeInput),

  /// Create or update an outcome
  PutOutcome(outcome::PutOutcomeInput),
  /// Get all outcomes or a specific outcome
  GetOutcomes(outcome::GetOutcomesInput),
  /// Delete an outcome not used in a rule version
  DeleteOutcome(outcome::DeleteOutcomeInput),

  /// Create or update a label
  PutLabel(label::PutLabelInput),
  /// Get all labels or a specific label
  GetLabels(label::GetLabelsInput),
  /// Delete a label not used by an event type
  DeleteLabel(label::DeleteLabelInput),

  /// Assign tags to a resource
  TagResource(tag::TagResourceInput),
  /// Remove tags from a resource
  UntagResource(tag::UntagResourceInput),
  /// List the tags associated with a resource
  ListTagsForResource(tag::ListTagsForResourceInput),

  /// Evaluate an event against a detector version
  GetEventPrediction(prediction::GetEventPredictionInput),
}

impl FraudDetectorCommands {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    use FraudDetectorCommands::*;

    match self {
      PutDetector(input) => input.exec(session).await,
      GetDetectors(input) => input.exec(session).await,
      DeleteDetector(input) => input.exec(session).await,
      CreateDetectorVersion(input) => input.exec(session).await,
      GetDetectorVersion(input) => input.exec(session).await,
      UpdateDetectorVersionStatus(input) => input.exec(session).await,
      DeleteDetectorVersion(input) => input.exec(session).await,
      CreateRule(input) => input.exec(session).await,
      GetRules(input) => input.exec(session).await,
      UpdateRuleVersion(input) => input.exec(session).await,
      DeleteRule(input) => input.exec(session).await,
      CreateVariable(input) => input.exec(session).await,
      GetVariables(input) => input.exec(session).await,
      DeleteVariable(input) => input.exec(session).await,
      PutEventType(input) => input.exec(session).await,
      GetEventTypes(input) => input.exec(session).await,
      DeleteEventType(input) => input.exec(session).await,
      PutEntityType(input) => input.exec(session).await,
      GetEntityTypes(input) => input.exec(session).await,
      DeleteEntityType(input) => input.exec(session).await,
      PutOutcome(input) => input.exec(session).await,
      GetOutcomes(input) => input.exec(session).await,
      DeleteOutcome(input) => input.exec(session).await,
      PutLabel(input) => input.exec(session).await,
      GetLabels(input) => input.exec(session).await,
      DeleteLabel(input) => input.exec(session).await,
      TagResource(input) => input.exec(session).await,
      UntagResource(input) => input.exec(session).await,
      ListTagsForResource(input) => input.exec(session).await,
      GetEventPrediction(input) => input.exec(session).await,
    }
  }
}

/// Response of operations that return no fields
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

/// Convert `Key=Value` arguments into SDK tags; `None` when no tags were given
pub(crate) fn tags(tags: &[KeyValue]) -> Result<Option<Vec<types::Tag>>, CommandError> {
  if tags.is_empty() {
    return Ok(None);
  }

  tags
    .iter()
    .map(|t| {
      types::Tag::builder()
        .key(&t.key)
        .value(&t.value)
        .build()
        .map_err(|e| CommandError::Validation(e.to_string()))
    })
    .collect::<Result<Vec<_>, _>>()
    .map(Some)
}

/// `None` when the list is empty so the field is left out of the request
pub(crate) fn non_empty(values: &[String]) -> Option<Vec<String>> {
  (!values.is_empty()).then(|| values.to_vec())
}

/// A rule version reference given as `DETECTOR_ID:RULE_ID:RULE_VERSION`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleRef {
  pub detector_id: String,
  pub rule_id: String,
  pub rule_version: String,
}

impl FromStr for RuleRef {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let [detector_id, rule_id, rule_version] = split_fields::<3>(s, "DETECTOR_ID:RULE_ID:RULE_VERSION")?;

    Ok(RuleRef {
      detector_id,
      rule_id,
      rule_version,
    })
  }
}

impl fmt::Display for RuleRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.detector_id, self.rule_id, self.rule_version)
  }
}

impl RuleRef {
  pub fn to_sdk(&self) -> Result<types::Rule, CommandError> {
    types::Rule::builder()
      .detector_id(&self.detector_id)
      .rule_id(&self.rule_id)
      .rule_version(&self.rule_version)
      .build()
      .map_err(|e| CommandError::Validation(e.to_string()))
  }
}

/// An entity given as `ENTITY_TYPE:ENTITY_ID`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityRef {
  pub entity_type: String,
  pub entity_id: String,
}

impl FromStr for EntityRef {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let [entity_type, entity_id] = split_fields::<2>(s, "ENTITY_TYPE:ENTITY_ID")?;

    Ok(EntityRef { entity_type, entity_id })
  }
}

impl EntityRef {
  pub fn to_sdk(&self) -> Result<types::Entity, CommandError> {
    types::Entity::builder()
      .entity_type(&self.entity_type)
      .entity_id(&self.entity_id)
      .build()
      .map_err(|e| CommandError::Validation(e.to_string()))
  }
}

/// Rule view shared by create-rule and update-rule-version
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
  detector_id: String,
  rule_id: String,
  rule_version: String,
}

impl From<types::Rule> for Rule {
  fn from(rule: types::Rule) -> Self {
    Rule {
      detector_id: rule.detector_id,
      rule_id: rule.rule_id,
      rule_version: rule.rule_version,
    }
  }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum Language {
  #[default]
  #[value(name = "DETECTORPL")]
  #[serde(rename = "DETECTORPL")]
  Detectorpl,
}

impl From<Language> for types::Language {
  fn from(_: Language) -> Self {
    types::Language::from("DETECTORPL")
  }
}

#[derive(Copy, Clone, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleExecutionMode {
  #[value(name = "ALL_MATCHED")]
  AllMatched,
  #[value(name = "FIRST_MATCHED")]
  FirstMatched,
}

impl From<RuleExecutionMode> for types::RuleExecutionMode {
  fn from(mode: RuleExecutionMode) -> Self {
    match mode {
      RuleExecutionMode::AllMatched => types::RuleExecutionMode::AllMatched,
      RuleExecutionMode::FirstMatched => types::RuleExecutionMode::FirstMatched,
    }
  }
}

#[derive(Copy, Clone, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectorVersionStatus {
  #[value(name = "DRAFT")]
  Draft,
  #[value(name = "ACTIVE")]
  Active,
  #[value(name = "INACTIVE")]
  Inactive,
}

impl From<DetectorVersionStatus> for types::DetectorVersionStatus {
  fn from(status: DetectorVersionStatus) -> Self {
    match status {
      DetectorVersionStatus::Draft => types::DetectorVersionStatus::Draft,
      DetectorVersionStatus::Active => types::DetectorVersionStatus::Active,
      DetectorVersionStatus::Inactive => types::DetectorVersionStatus::Inactive,
    }
  }
}

#[derive(Copy, Clone, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
  #[value(name = "STRING")]
  String,
  #[value(name = "INTEGER")]
  Integer,
  #[value(name = "FLOAT")]
  Float,
  #[value(name = "BOOLEAN")]
  Boolean,
  #[value(name = "DATETIME")]
  Datetime,
}

impl From<DataType> for types::DataType {
  fn from(data_type: DataType) -> Self {
    match data_type {
      DataType::String => types::DataType::String,
      DataType::Integer => types::DataType::Integer,
      DataType::Float => types::DataType::Float,
      DataType::Boolean => types::DataType::Boolean,
      DataType::Datetime => types::DataType::from("DATETIME"),
    }
  }
}

#[derive(Copy, Clone, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
  #[value(name = "EVENT")]
  Event,
  #[value(name = "MODEL_SCORE")]
  ModelScore,
  #[value(name = "EXTERNAL_MODEL_SCORE")]
  ExternalModelScore,
}

impl From<DataSource> for types::DataSource {
  fn from(source: DataSource) -> Self {
    match source {
      DataSource::Event => types::DataSource::Event,
      DataSource::ModelScore => types::DataSource::ModelScore,
      DataSource::ExternalModelScore => types::DataSource::ExternalModelScore,
    }
  }
}

#[derive(Copy, Clone, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventIngestion {
  #[value(name = "ENABLED")]
  Enabled,
  #[value(name = "DISABLED")]
  Disabled,
}

impl From<EventIngestion> for types::EventIngestion {
  fn from(ingestion: EventIngestion) -> Self {
    match ingestion {
      EventIngestion::Enabled => types::EventIngestion::Enabled,
      EventIngestion::Disabled => types::EventIngestion::Disabled,
    }
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  #[test]
  fn parses_rule_ref() {
    let rule = "fraud_detector:high_risk:1".parse::<RuleRef>().unwrap();

    assert_eq!(rule.detector_id, "fraud_detector");
    assert_eq!(rule.rule_id, "high_risk");
    assert_eq!(rule.rule_version, "1");
    assert_eq!(rule.to_string(), "fraud_detector:high_risk:1");

    let sdk = rule.to_sdk().unwrap();
    assert_eq!(sdk.rule_version, "1");
  }

  #[rstest]
  #[case("fraud_detector:high_risk")]
  #[case("fraud_detector::1")]
  fn rejects_rule_ref(#[case] input: &str) {
    let err = input.parse::<RuleRef>().unwrap_err();
    assert!(err.to_string().contains("DETECTOR_ID:RULE_ID:RULE_VERSION"));
  }

  #[test]
  fn parses_entity_ref() {
    let entity = "customer:12345".parse::<EntityRef>().unwrap();

    assert_eq!(entity.entity_type, "customer");
    assert_eq!(entity.entity_id, "12345");
    assert!("customer".parse::<EntityRef>().is_err());
  }

  #[test]
  fn empty_tags_are_omitted() {
    assert!(tags(&[]).unwrap().is_none());

    let given = vec!["team=fraud".parse::<KeyValue>().unwrap()];
    let sdk = tags(&given).unwrap().unwrap();
    assert_eq!(sdk[0].key, "team");
    assert_eq!(sdk[0].value, "fraud");
  }

  #[rstest]
  #[case(DataType::Datetime, "DATETIME")]
  #[case(DataType::Float, "FLOAT")]
  fn data_type_wire_values(#[case] data_type: DataType, #[case] expected: &str) {
    assert_eq!(types::DataType::from(data_type).as_str(), expected);
  }

  #[test]
  fn empty_response_serializes_to_empty_object() {
    assert_eq!(serde_json::to_value(Empty::default()).unwrap(), serde_json::json!({}));
  }
}
