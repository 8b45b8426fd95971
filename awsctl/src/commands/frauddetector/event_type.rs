use aws_sdk_frauddetector::operation::get_event_types::GetEventTypesOutput;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{non_empty, tags, Empty, EventIngestion};
use crate::{
  commands::KeyValue,
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

pub static PUT_EVENT_TYPE: Operation = Operation {
  name: "PutEventType",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("Name"),
  required: &["Name", "EventVariables", "EntityTypes"],
};

pub static GET_EVENT_TYPES: Operation = Operation {
  name: "GetEventTypes",
  default_select: "EventTypes",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_EVENT_TYPE: Operation = Operation {
  name: "DeleteEventType",
  default_select: "*",
  impact: Impact::High,
  target: Some("Name"),
  required: &["Name"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutEventTypeInput {
  /// The name of the event type
  #[arg(long)]
  pub name: String,

  /// Variables the event carries (repeatable)
  #[arg(long = "event-variable", required = true)]
  pub event_variables: Vec<String>,

  /// Entity types for the event (repeatable)
  #[arg(long = "entity-type", required = true)]
  pub entity_types: Vec<String>,

  /// Labels to classify the event (repeatable)
  #[arg(long = "label")]
  pub labels: Vec<String>,

  /// Whether events of this type are stored
  #[arg(long, value_enum)]
  pub event_ingestion: Option<EventIngestion>,

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

impl PutEventTypeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_EVENT_TYPE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .put_event_type()
      .name(&self.name)
      .set_event_variables(Some(self.event_variables.clone()))
      .set_entity_types(Some(self.entity_types.clone()))
      .set_labels(non_empty(&self.labels))
      .set_event_ingestion(self.event_ingestion.map(Into::into))
      .set_description(self.description.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&PUT_EVENT_TYPE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetEventTypesInput {
  /// Return only this event type
  #[arg(long)]
  pub name: Option<String>,

  /// The maximum number of event types to return per page
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
pub struct EventType {
  name: Option<String>,
  description: Option<String>,
  event_variables: Vec<String>,
  labels: Vec<String>,
  entity_types: Vec<String>,
  event_ingestion: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventTypes {
  event_types: Vec<EventType>,
  next_token: Option<String>,
}

impl From<GetEventTypesOutput> for EventTypes {
  fn from(output: GetEventTypesOutput) -> Self {
    EventTypes {
      event_types: output
        .event_types
        .unwrap_or_default()
        .into_iter()
        .map(|e| EventType {
          event_ingestion: e.event_ingestion.as_ref().map(|i| i.as_str().to_owned()),
          name: e.name,
          description: e.description,
          event_variables: e.event_variables.unwrap_or_default(),
          labels: e.labels.unwrap_or_default(),
          entity_types: e.entity_types.unwrap_or_default(),
          last_updated_time: e.last_updated_time,
          created_time: e.created_time,
          arn: e.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for EventTypes {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetEventTypesInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_EVENT_TYPES, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_event_types()
          .set_name(self.name.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(EventTypes::from)
            .or_command_error(&GET_EVENT_TYPES, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteEventTypeInput {
  /// The name of the event type to delete
  #[arg(long)]
  pub name: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteEventTypeInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_EVENT_TYPE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_event_type().name(&self.name);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_EVENT_TYPE, region.as_deref())
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
  fn event_type_path_through_collection() {
    let output = GetEventTypesOutput::builder()
      .event_types(
        types::EventType::builder()
          .name("sign_up")
          .event_variables("ip_address")
          .event_variables("email_address")
          .entity_types("customer")
          .event_ingestion(types::EventIngestion::Enabled)
          .build(),
      )
      .build();
    let view = serde_json::to_value(EventTypes::from(output)).unwrap();
    let select = "EventTypes.EventVariables".parse::<Selector>().unwrap();

    assert_eq!(
      select.project(&view, &json!({})),
      vec![json!("ip_address"), json!("email_address")]
    );
    assert_eq!(view["EventTypes"][0]["EventIngestion"], "ENABLED");
  }
}
