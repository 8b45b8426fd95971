use aws_sdk_frauddetector::operation::get_entity_types::GetEntityTypesOutput;
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

pub static PUT_ENTITY_TYPE: Operation = Operation {
  name: "PutEntityType",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("Name"),
  required: &["Name"],
};

pub static GET_ENTITY_TYPES: Operation = Operation {
  name: "GetEntityTypes",
  default_select: "EntityTypes",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_ENTITY_TYPE: Operation = Operation {
  name: "DeleteEntityType",
  default_select: "*",
  impact: Impact::High,
  target: Some("Name"),
  required: &["Name"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutEntityTypeInput {
  /// The name of the entity type
  #[arg(long)]
  pub name: String,

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

impl PutEntityTypeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_ENTITY_TYPE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .put_entity_type()
      .name(&self.name)
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&PUT_ENTITY_TYPE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetEntityTypesInput {
  /// Return only this entity type
  #[arg(long)]
  pub name: Option<String>,

  /// The maximum number of entity types to return per page
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
pub struct EntityType {
  name: Option<String>,
  description: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityTypes {
  entity_types: Vec<EntityType>,
  next_token: Option<String>,
}

impl From<GetEntityTypesOutput> for EntityTypes {
  fn from(output: GetEntityTypesOutput) -> Self {
    EntityTypes {
      entity_types: output
        .entity_types
        .unwrap_or_default()
        .into_iter()
        .map(|e| EntityType {
          name: e.name,
          description: e.description,
          last_updated_time: e.last_updated_time,
          created_time: e.created_time,
          arn: e.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for EntityTypes {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetEntityTypesInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_ENTITY_TYPES, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_entity_types()
          .set_name(self.name.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(EntityTypes::from)
            .or_command_error(&GET_ENTITY_TYPES, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteEntityTypeInput {
  /// The name of the entity type to delete
  #[arg(long)]
  pub name: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteEntityTypeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_ENTITY_TYPE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_entity_type().name(&self.name);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_ENTITY_TYPE, region.as_deref())
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
  fn selects_entity_type_names() {
    let output = GetEntityTypesOutput::builder()
      .entity_types(types::EntityType::builder().name("customer").build())
      .entity_types(types::EntityType::builder().name("merchant").build())
      .build();
    let view = serde_json::to_value(EntityTypes::from(output)).unwrap();
    let select = "entitytypes.name".parse::<Selector>().unwrap();

    assert_eq!(select.project(&view, &json!({})), vec![json!("customer"), json!("merchant")]);
  }
}
