use aws_sdk_frauddetector::operation::{
  create_rule::CreateRuleOutput, get_rules::GetRulesOutput, update_rule_version::UpdateRuleVersionOutput,
};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{tags, Empty, Language, Rule, RuleRef};
use crate::{
  commands::KeyValue,
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

pub static CREATE_RULE: Operation = Operation {
  name: "CreateRule",
  default_select: "Rule",
  impact: Impact::Medium,
  target: Some("RuleId"),
  required: &["RuleId", "DetectorId", "Expression", "Language", "Outcomes"],
};

pub static GET_RULES: Operation = Operation {
  name: "GetRules",
  default_select: "RuleDetails",
  impact: Impact::None,
  target: None,
  required: &["DetectorId"],
};

pub static UPDATE_RULE_VERSION: Operation = Operation {
  name: "UpdateRuleVersion",
  default_select: "Rule",
  impact: Impact::Medium,
  target: Some("Rule"),
  required: &["Rule", "Expression", "Language", "Outcomes"],
};

pub static DELETE_RULE: Operation = Operation {
  name: "DeleteRule",
  default_select: "*",
  impact: Impact::High,
  target: Some("Rule"),
  required: &["Rule"],
};

/// Optional view of a rule in create/update responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleResponse {
  rule: Option<Rule>,
}

impl From<CreateRuleOutput> for RuleResponse {
  fn from(output: CreateRuleOutput) -> Self {
    RuleResponse {
      rule: output.rule.map(Rule::from),
    }
  }
}

impl From<UpdateRuleVersionOutput> for RuleResponse {
  fn from(output: UpdateRuleVersionOutput) -> Self {
    RuleResponse {
      rule: output.rule.map(Rule::from),
    }
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRuleInput {
  /// The rule ID
  #[arg(long)]
  pub rule_id: String,

  /// The detector ID for the rule's parent detector
  #[arg(long)]
  pub detector_id: String,

  /// The rule expression
  #[arg(long)]
  pub expression: String,

  /// The language of the rule
  #[arg(long, value_enum, default_value_t)]
  pub language: Language,

  /// Outcomes returned when the rule matches (repeatable)
  #[arg(long = "outcome", required = true)]
  pub outcomes: Vec<String>,

  /// The rule description
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

impl CreateRuleInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&CREATE_RULE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .create_rule()
      .rule_id(&self.rule_id)
      .detector_id(&self.detector_id)
      .expression(&self.expression)
      .language(self.language.into())
      .set_outcomes(Some(self.outcomes.clone()))
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(RuleResponse::from)
          .or_command_error(&CREATE_RULE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRulesInput {
  /// The detector ID
  #[arg(long)]
  pub detector_id: String,

  /// The rule ID
  #[arg(long)]
  pub rule_id: Option<String>,

  /// The rule version; requires --rule-id
  #[arg(long, requires = "rule_id")]
  pub rule_version: Option<String>,

  /// The maximum number of rules to return per page
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
pub struct RuleDetail {
  rule_id: Option<String>,
  description: Option<String>,
  detector_id: Option<String>,
  rule_version: Option<String>,
  expression: Option<String>,
  language: Option<String>,
  outcomes: Vec<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleDetails {
  rule_details: Vec<RuleDetail>,
  next_token: Option<String>,
}

impl From<GetRulesOutput> for RuleDetails {
  fn from(output: GetRulesOutput) -> Self {
    RuleDetails {
      rule_details: output
        .rule_details
        .unwrap_or_default()
        .into_iter()
        .map(|r| RuleDetail {
          language: r.language.as_ref().map(|l| l.as_str().to_owned()),
          rule_id: r.rule_id,
          description: r.description,
          detector_id: r.detector_id,
          rule_version: r.rule_version,
          expression: r.expression,
          outcomes: r.outcomes.unwrap_or_default(),
          last_updated_time: r.last_updated_time,
          created_time: r.created_time,
          arn: r.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for RuleDetails {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetRulesInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_RULES, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_rules()
          .detector_id(&self.detector_id)
          .set_rule_id(self.rule_id.clone())
          .set_rule_version(self.rule_version.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(RuleDetails::from)
            .or_command_error(&GET_RULES, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRuleVersionInput {
  /// The rule to update (DETECTOR_ID:RULE_ID:RULE_VERSION)
  #[arg(long)]
  pub rule: RuleRef,

  /// The rule expression
  #[arg(long)]
  pub expression: String,

  /// The language of the rule
  #[arg(long, value_enum, default_value_t)]
  pub language: Language,

  /// Outcomes returned when the rule matches (repeatable)
  #[arg(long = "outcome", required = true)]
  pub outcomes: Vec<String>,

  /// The description
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

impl UpdateRuleVersionInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&UPDATE_RULE_VERSION, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .update_rule_version()
      .rule(self.rule.to_sdk()?)
      .expression(&self.expression)
      .language(self.language.into())
      .set_outcomes(Some(self.outcomes.clone()))
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(RuleResponse::from)
          .or_command_error(&UPDATE_RULE_VERSION, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRuleInput {
  /// The rule version to delete (DETECTOR_ID:RULE_ID:RULE_VERSION)
  #[arg(long)]
  pub rule: RuleRef,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteRuleInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_RULE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_rule().rule(self.rule.to_sdk()?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_RULE, region.as_deref())
      })
      .await
  }
}
