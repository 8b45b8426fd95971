use aws_sdk_frauddetector::operation::get_outcomes::GetOutcomesOutput;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{tags, Empty};
use crate::{
  commands::KeyValue,
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

pub static PUT_OUTCOME: Operation = Operation {
  name: "PutOutcome",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("Name"),
  required: &["Name"],
};

pub static GET_OUTCOMES: Operation = Operation {
  name: "GetOutcomes",
  default_select: "Outcomes",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_OUTCOME: Operation = Operation {
  name: "DeleteOutcome",
  default_select: "*",
  impact: Impact::High,
  target: Some("Name"),
  required: &["Name"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutOutcomeInput {
  /// The name of the outcome
  #[arg(long)]
  pub name: String,

  /// The outcome description
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

impl PutOutcomeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_OUTCOME, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .put_outcome()
      .name(&self.name)
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&PUT_OUTCOME, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetOutcomesInput {
  /// Return only this outcome
  #[arg(long)]
  pub name: Option<String>,

  /// The maximum number of outcomes to return per page
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
pub struct Outcome {
  name: Option<String>,
  description: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Outcomes {
  outcomes: Vec<Outcome>,
  next_token: Option<String>,
}

impl From<GetOutcomesOutput> for Outcomes {
  fn from(output: GetOutcomesOutput) -> Self {
    Outcomes {
      outcomes: output
        .outcomes
        .unwrap_or_default()
        .into_iter()
        .map(|o| Outcome {
          name: o.name,
          description: o.description,
          last_updated_time: o.last_updated_time,
          created_time: o.created_time,
          arn: o.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for Outcomes {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetOutcomesInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_OUTCOMES, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_outcomes()
          .set_name(self.name.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(Outcomes::from)
            .or_command_error(&GET_OUTCOMES, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteOutcomeInput {
  /// The name of the outcome to delete
  #[arg(long)]
  pub name: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteOutcomeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_OUTCOME, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_outcome().name(&self.name);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_OUTCOME, region.as_deref())
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
  fn get_outcomes_unrolls_outcomes() {
    let output = GetOutcomesOutput::builder()
      .outcomes(
        types::Outcome::builder()
          .name("verify_customer")
          .description("Send to manual review")
          .arn("arn:aws:frauddetector:us-east-1:123456789012:outcome/verify_customer")
          .build(),
      )
      .outcomes(types::Outcome::builder().name("approve").build())
      .next_token("more")
      .build();
    let view = Outcomes::from(output);
    let select = GET_OUTCOMES.default_select.parse::<Selector>().unwrap();
    let result = select.project(&serde_json::to_value(&view).unwrap(), &json!({}));

    assert_eq!(view.next_token(), Some("more"));
    assert_eq!(result.len(), 2);
    assert_eq!(result[0]["Name"], "verify_customer");
    assert_eq!(result[0]["Description"], "Send to manual review");
    assert_eq!(result[1]["Name"], "approve");
    assert_eq!(result[1]["Arn"], json!(null));
  }
}
