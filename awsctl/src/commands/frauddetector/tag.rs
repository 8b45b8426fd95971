use aws_sdk_frauddetector::operation::list_tags_for_resource::ListTagsForResourceOutput;
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

pub static TAG_RESOURCE: Operation = Operation {
  name: "TagResource",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("ResourceARN"),
  required: &["ResourceARN", "Tags"],
};

pub static UNTAG_RESOURCE: Operation = Operation {
  name: "UntagResource",
  default_select: "*",
  impact: Impact::High,
  target: Some("ResourceARN"),
  required: &["ResourceARN", "TagKeys"],
};

pub static LIST_TAGS_FOR_RESOURCE: Operation = Operation {
  name: "ListTagsForResource",
  default_select: "Tags",
  impact: Impact::None,
  target: None,
  required: &["ResourceARN"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResourceInput {
  /// The resource ARN
  #[arg(long = "resource-arn")]
  pub resource_arn: String,

  /// Tags to assign (KEY=VALUE, repeatable)
  #[arg(long = "tag", required = true)]
  pub tags: Vec<KeyValue>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl TagResourceInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&TAG_RESOURCE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .tag_resource()
      .resource_arn(&self.resource_arn)
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&TAG_RESOURCE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagResourceInput {
  /// The resource ARN
  #[arg(long = "resource-arn")]
  pub resource_arn: String,

  /// Keys of the tags to remove (repeatable)
  #[arg(long = "tag-key", required = true)]
  pub tag_keys: Vec<String>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl UntagResourceInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&UNTAG_RESOURCE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .untag_resource()
      .resource_arn(&self.resource_arn)
      .set_tag_keys(Some(self.tag_keys.clone()));

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&UNTAG_RESOURCE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceInput {
  /// The resource ARN
  #[arg(long = "resource-arn")]
  pub resource_arn: String,

  /// The maximum number of tags to return per page
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
pub struct ResourceTags {
  tags: Vec<KeyValue>,
  next_token: Option<String>,
}

impl From<ListTagsForResourceOutput> for ResourceTags {
  fn from(output: ListTagsForResourceOutput) -> Self {
    ResourceTags {
      tags: output
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| KeyValue {
          key: t.key,
          value: t.value,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for ResourceTags {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl ListTagsForResourceInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&LIST_TAGS_FOR_RESOURCE, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .list_tags_for_resource()
          .resource_arn(&self.resource_arn)
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(ResourceTags::from)
            .or_command_error(&LIST_TAGS_FOR_RESOURCE, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use aws_sdk_frauddetector::types;
  use serde_json::json;

  use super::*;
  use crate::select::Selector;

  #[test]
  fn lists_tags_as_key_value() {
    let output = ListTagsForResourceOutput::builder()
      .tags(types::Tag::builder().key("team").value("fraud").build().unwrap())
      .build();
    let view = ResourceTags::from(output);
    let select = LIST_TAGS_FOR_RESOURCE.default_select.parse::<Selector>().unwrap();

    assert_eq!(
      select.project(&serde_json::to_value(&view).unwrap(), &json!({})),
      vec![json!({"Key": "team", "Value": "fraud"})]
    );
  }
}
