use aws_sdk_frauddetector::operation::{
  create_detector_version::CreateDetectorVersionOutput, get_detector_version::GetDetectorVersionOutput,
  get_detectors::GetDetectorsOutput,
};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{non_empty, tags, DetectorVersionStatus, Empty, Rule, RuleExecutionMode, RuleRef};
use crate::{
  commands::KeyValue,
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

pub static PUT_DETECTOR: Operation = Operation {
  name: "PutDetector",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("DetectorId"),
  required: &["DetectorId", "EventTypeName"],
};

pub static GET_DETECTORS: Operation = Operation {
  name: "GetDetectors",
  default_select: "Detectors",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_DETECTOR: Operation = Operation {
  name: "DeleteDetector",
  default_select: "*",
  impact: Impact::High,
  target: Some("DetectorId"),
  required: &["DetectorId"],
};

pub static CREATE_DETECTOR_VERSION: Operation = Operation {
  name: "CreateDetectorVersion",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("DetectorId"),
  required: &["DetectorId", "Rules"],
};

pub static GET_DETECTOR_VERSION: Operation = Operation {
  name: "GetDetectorVersion",
  default_select: "*",
  impact: Impact::None,
  target: None,
  required: &["DetectorId", "DetectorVersionId"],
};

pub static UPDATE_DETECTOR_VERSION_STATUS: Operation = Operation {
  name: "UpdateDetectorVersionStatus",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("DetectorVersionId"),
  required: &["DetectorId", "DetectorVersionId", "Status"],
};

pub static DELETE_DETECTOR_VERSION: Operation = Operation {
  name: "DeleteDetectorVersion",
  default_select: "*",
  impact: Impact::High,
  target: Some("DetectorVersionId"),
  required: &["DetectorId", "DetectorVersionId"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutDetectorInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The name of the event type
  #[arg(long)]
  pub event_type_name: String,

  /// The description of the detector
  #[arg(long)]
  pub description: Option<String>,

  /// Tags to assign (KEY=VALUE, repeatable)
  #[arg(long = "tag")]
  pub tags: Vec<KeyValue>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl PutDetectorInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_DETECTOR, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .put_detector()
      .detector_id(&self.detector_id)
      .event_type_name(&self.event_type_name)
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&PUT_DETECTOR, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDetectorsInput {
  /// Return only this detector
  #[arg(long)]
  pub detector_id: Option<String>,

  /// The maximum number of objects to return per page
  #[arg(long)]
  pub max_results: Option<i32>,

  #[command(flatten)]
  #[serde(flatten)]
  pub paging: PagingArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Detector {
  detector_id: Option<String>,
  description: Option<String>,
  event_type_name: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Detectors {
  detectors: Vec<Detector>,
  next_token: Option<String>,
}

impl From<GetDetectorsOutput> for Detectors {
  fn from(output: GetDetectorsOutput) -> Self {
    Detectors {
      detectors: output
        .detectors
        .unwrap_or_default()
        .into_iter()
        .map(|d| Detector {
          detector_id: d.detector_id,
          description: d.description,
          event_type_name: d.event_type_name,
          last_updated_time: d.last_updated_time,
          created_time: d.created_time,
          arn: d.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for Detectors {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetDetectorsInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_DETECTORS, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_detectors()
          .set_detector_id(self.detector_id.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(Detectors::from)
            .or_command_error(&GET_DETECTORS, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDetectorInput {
  /// The ID of the detector to delete
  #[arg(long)]
  pub detector_id: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteDetectorInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_DETECTOR, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_detector().detector_id(&self.detector_id);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_DETECTOR, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDetectorVersionInput {
  /// The ID of the detector under which to create the version
  #[arg(long)]
  pub detector_id: String,

  /// Rules to include (DETECTOR_ID:RULE_ID:RULE_VERSION, repeatable)
  #[arg(long = "rule", required = true)]
  pub rules: Vec<RuleRef>,

  /// The description of the detector version
  #[arg(long)]
  pub description: Option<String>,

  /// Amazon SageMaker model endpoints to include (repeatable)
  #[arg(long = "external-model-endpoint")]
  pub external_model_endpoints: Vec<String>,

  /// How rules are evaluated; defaults to FIRST_MATCHED on the service
  #[arg(long, value_enum)]
  pub rule_execution_mode: Option<RuleExecutionMode>,

  /// Tags to assign (KEY=VALUE, repeatable)
  #[arg(long = "tag")]
  pub tags: Vec<KeyValue>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedDetectorVersion {
  detector_id: Option<String>,
  detector_version_id: Option<String>,
  status: Option<String>,
}

impl From<CreateDetectorVersionOutput> for CreatedDetectorVersion {
  fn from(output: CreateDetectorVersionOutput) -> Self {
    CreatedDetectorVersion {
      status: output.status.as_ref().map(|s| s.as_str().to_owned()),
      detector_id: output.detector_id,
      detector_version_id: output.detector_version_id,
    }
  }
}

impl CreateDetectorVersionInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&CREATE_DETECTOR_VERSION, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let rules = self.rules.iter().map(RuleRef::to_sdk).collect::<Result<Vec<_>, _>>()?;
    let request = client
      .create_detector_version()
      .detector_id(&self.detector_id)
      .set_rules(Some(rules))
      .set_description(self.description.clone())
      .set_external_model_endpoints(non_empty(&self.external_model_endpoints))
      .set_rule_execution_mode(self.rule_execution_mode.map(Into::into))
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(CreatedDetectorVersion::from)
          .or_command_error(&CREATE_DETECTOR_VERSION, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDetectorVersionInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The detector version ID
  #[arg(long)]
  pub detector_version_id: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelVersion {
  model_id: String,
  model_type: String,
  model_version_number: String,
  arn: Option<String>,
}

impl From<aws_sdk_frauddetector::types::ModelVersion> for ModelVersion {
  fn from(mv: aws_sdk_frauddetector::types::ModelVersion) -> Self {
    ModelVersion {
      model_type: mv.model_type.as_str().to_owned(),
      model_id: mv.model_id,
      model_version_number: mv.model_version_number,
      arn: mv.arn,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectorVersion {
  detector_id: Option<String>,
  detector_version_id: Option<String>,
  description: Option<String>,
  external_model_endpoints: Vec<String>,
  model_versions: Vec<ModelVersion>,
  rules: Vec<Rule>,
  status: Option<String>,
  rule_execution_mode: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

impl From<GetDetectorVersionOutput> for DetectorVersion {
  fn from(output: GetDetectorVersionOutput) -> Self {
    DetectorVersion {
      status: output.status.as_ref().map(|s| s.as_str().to_owned()),
      rule_execution_mode: output.rule_execution_mode.as_ref().map(|m| m.as_str().to_owned()),
      detector_id: output.detector_id,
      detector_version_id: output.detector_version_id,
      description: output.description,
      external_model_endpoints: output.external_model_endpoints.unwrap_or_default(),
      model_versions: output
        .model_versions
        .unwrap_or_default()
        .into_iter()
        .map(ModelVersion::from)
        .collect(),
      rules: output.rules.unwrap_or_default().into_iter().map(Rule::from).collect(),
      last_updated_time: output.last_updated_time,
      created_time: output.created_time,
      arn: output.arn,
    }
  }
}

impl GetDetectorVersionInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let inv = Invocation::new(&GET_DETECTOR_VERSION, session.shell(), &self.select, self)?;

    let request = client
      .get_detector_version()
      .detector_id(&self.detector_id)
      .detector_version_id(&self.detector_version_id);

    inv
      .call(async {
        request
          .send()
          .await
          .map(DetectorVersion::from)
          .or_command_error(&GET_DETECTOR_VERSION, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDetectorVersionStatusInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The detector version ID
  #[arg(long)]
  pub detector_version_id: String,

  /// The new status
  #[arg(long, value_enum)]
  pub status: DetectorVersionStatus,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl UpdateDetectorVersionStatusInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&UPDATE_DETECTOR_VERSION_STATUS, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .update_detector_version_status()
      .detector_id(&self.detector_id)
      .detector_version_id(&self.detector_version_id)
      .status(self.status.into());

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&UPDATE_DETECTOR_VERSION_STATUS, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDetectorVersionInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The detector version ID
  #[arg(long)]
  pub detector_version_id: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteDetectorVersionInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_DETECTOR_VERSION, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .delete_detector_version()
      .detector_id(&self.detector_id)
      .detector_version_id(&self.detector_version_id);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_DETECTOR_VERSION, region.as_deref())
      })
      .await
  }
}
