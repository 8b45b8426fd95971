use std::collections::{BTreeMap, HashMap};

use aws_sdk_frauddetector::operation::get_event_prediction::GetEventPredictionOutput;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{detector::ModelVersion, EntityRef};
use crate::{
  commands::KeyValue,
  confirm::Impact,
  error::CommandError,
  invoke::{Invocation, Operation, SdkResultExt, SelectArgs},
  Session,
};

pub static GET_EVENT_PREDICTION: Operation = Operation {
  name: "GetEventPrediction",
  default_select: "*",
  impact: Impact::None,
  target: None,
  required: &[
    "DetectorId",
    "EventId",
    "EventTypeName",
    "Entities",
    "EventTimestamp",
    "EventVariables",
  ],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetEventPredictionInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The detector version ID; the active version is used when omitted
  #[arg(long)]
  pub detector_version_id: Option<String>,

  /// The unique ID used to identify the event
  #[arg(long)]
  pub event_id: String,

  /// The event type associated with the detector
  #[arg(long)]
  pub event_type_name: String,

  /// The entity the event is evaluated for (ENTITY_TYPE:ENTITY_ID, repeatable)
  #[arg(long = "entity", required = true)]
  pub entities: Vec<EntityRef>,

  /// Timestamp of when the event occurred, in ISO 8601 format
  #[arg(long)]
  pub event_timestamp: String,

  /// Event variable values (NAME=VALUE, repeatable)
  #[arg(long = "event-variable", required = true)]
  pub event_variables: Vec<KeyValue>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelScores {
  model_version: Option<ModelVersion>,
  scores: BTreeMap<String, f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleResult {
  rule_id: Option<String>,
  outcomes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExternalModelOutputs {
  model_endpoint: Option<String>,
  model_source: Option<String>,
  outputs: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventPrediction {
  model_scores: Vec<ModelScores>,
  rule_results: Vec<RuleResult>,
  external_model_outputs: Vec<ExternalModelOutputs>,
}

impl From<GetEventPredictionOutput> for EventPrediction {
  fn from(output: GetEventPredictionOutput) -> Self {
    EventPrediction {
      model_scores: output
        .model_scores
        .unwrap_or_default()
        .into_iter()
        .map(|m| ModelScores {
          model_version: m.model_version.map(ModelVersion::from),
          scores: m.scores.unwrap_or_default().into_iter().collect(),
        })
        .collect(),
      rule_results: output
        .rule_results
        .unwrap_or_default()
        .into_iter()
        .map(|r| RuleResult {
          rule_id: r.rule_id,
          outcomes: r.outcomes.unwrap_or_default(),
        })
        .collect(),
      external_model_outputs: output
        .external_model_outputs
        .unwrap_or_default()
        .into_iter()
        .map(|e| {
          let summary = e.external_model;
          ExternalModelOutputs {
            model_endpoint: summary.as_ref().and_then(|s| s.model_endpoint.clone()),
            model_source: summary
              .as_ref()
              .and_then(|s| s.model_source.as_ref())
              .map(|s| s.as_str().to_owned()),
            outputs: e.outputs.unwrap_or_default().into_iter().collect(),
          }
        })
        .collect(),
    }
  }
}

impl GetEventPredictionInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let inv = Invocation::new(&GET_EVENT_PREDICTION, session.shell(), &self.select, self)?;

    let entities = self
      .entities
      .iter()
      .map(EntityRef::to_sdk)
      .collect::<Result<Vec<_>, _>>()?;
    let variables = self
      .event_variables
      .iter()
      .map(|v| (v.key.clone(), v.value.clone()))
      .collect::<HashMap<_, _>>();

    let request = client
      .get_event_prediction()
      .detector_id(&self.detector_id)
      .set_detector_version_id(self.detector_version_id.clone())
      .event_id(&self.event_id)
      .event_type_name(&self.event_type_name)
      .set_entities(Some(entities))
      .event_timestamp(&self.event_timestamp)
      .set_event_variables(Some(variables));

    inv
      .call(async {
        request
          .send()
          .await
          .map(EventPrediction::from)
          .or_command_error(&GET_EVENT_PREDICTION, region.as_deref())
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use aws_sdk_frauddetector::types;
  use serde_json::json;

  use super::*;
  use crate::select::Selector;

  #[test]
  fn rule_outcomes_path() {
    let output = GetEventPredictionOutput::builder()
      .rule_results(
        types::RuleResult::builder()
          .rule_id("high_risk")
          .outcomes("review")
          .outcomes("block")
          .build(),
      )
      .model_scores(
        types::ModelScores::builder()
          .scores("sample_fraud_detection_model_insightscore", 912.0)
          .build(),
      )
      .build();
    let view = serde_json::to_value(EventPrediction::from(output)).unwrap();
    let select = "RuleResults.Outcomes".parse::<Selector>().unwrap();

    assert_eq!(select.project(&view, &json!({})), vec![json!("review"), json!("block")]);
    assert_eq!(
      view["ModelScores"][0]["Scores"]["sample_fraud_detection_model_insightscore"],
      json!(912.0)
    );
  }

  #[test]
  fn empty_prediction_emits_whole_response() {
    let view = serde_json::to_value(EventPrediction::from(GetEventPredictionOutput::builder().build())).unwrap();
    let select = GET_EVENT_PREDICTION.default_select.parse::<Selector>().unwrap();

    assert_eq!(
      select.project(&view, &json!({})),
      vec![json!({"ModelScores": [], "RuleResults": [], "ExternalModelOutputs": []})]
    );
  }
}
