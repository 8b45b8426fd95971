use aws_sdk_frauddetector::operation::get_labels::GetLabelsOutput;
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

pub static PUT_LABEL: Operation = Operation {
  name: "PutLabel",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("Name"),
  required: &["Name"],
};

pub static GET_LABELS: Operation = Operation {
  name: "GetLabels",
  default_select: "Labels",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_LABEL: Operation = Operation {
  name: "DeleteLabel",
  default_select: "*",
  impact: Impact::High,
  target: Some("Name"),
  required: &["Name"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutLabelInput {
  /// The label name
  #[arg(long)]
  pub name: String,

  /// The label description
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

impl PutLabelInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_LABEL, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .put_label()
      .name(&self.name)
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&PUT_LABEL, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLabelsInput {
  /// Return only this label
  #[arg(long)]
  pub name: Option<String>,

  /// The maximum number of labels to return per page
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
pub struct Label {
  name: Option<String>,
  description: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Labels {
  labels: Vec<Label>,
  next_token: Option<String>,
}

impl From<GetLabelsOutput> for Labels {
  fn from(output: GetLabelsOutput) -> Self {
    Labels {
      labels: output
        .labels
        .unwrap_or_default()
        .into_iter()
        .map(|l| Label {
          name: l.name,
          description: l.description,
          last_updated_time: l.last_updated_time,
          created_time: l.created_time,
          arn: l.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for Labels {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetLabelsInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_LABELS, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_labels()
          .set_name(self.name.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(Labels::from)
            .or_command_error(&GET_LABELS, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteLabelInput {
  /// The name of the label to delete
  #[arg(long)]
  pub name: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteLabelInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_LABEL, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_label().name(&self.name);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_LABEL, region.as_deref())
      })
      .await
  }
}
