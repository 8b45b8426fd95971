use aws_sdk_frauddetector::operation::get_variables::GetVariablesOutput;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{tags, DataSource, DataType, Empty};
use crate::{
  commands::KeyValue,
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

pub static CREATE_VARIABLE: Operation = Operation {
  name: "CreateVariable",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("Name"),
  required: &["Name", "DataType", "DataSource", "DefaultValue"],
};

pub static GET_VARIABLES: Operation = Operation {
  name: "GetVariables",
  default_select: "Variables",
  impact: Impact::None,
  target: None,
  required: &[],
};

pub static DELETE_VARIABLE: Operation = Operation {
  name: "DeleteVariable",
  default_select: "*",
  impact: Impact::High,
  target: Some("Name"),
  required: &["Name"],
};

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateVariableInput {
  /// The name of the variable
  #[arg(long)]
  pub name: String,

  /// The data type of the variable
  #[arg(long, value_enum)]
  pub data_type: DataType,

  /// The source of the data
  #[arg(long, value_enum)]
  pub data_source: DataSource,

  /// The default value for the variable when no value is received
  #[arg(long)]
  pub default_value: String,

  /// The description
  #[arg(long)]
  pub description: Option<String>,

  /// The variable type, e.g. IP_ADDRESS or EMAIL_ADDRESS
  #[arg(long)]
  pub variable_type: Option<String>,

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

impl CreateVariableInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&CREATE_VARIABLE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client
      .create_variable()
      .name(&self.name)
      .data_type(self.data_type.into())
      .data_source(self.data_source.into())
      .default_value(&self.default_value)
      .set_description(self.description.clone())
      .set_variable_type(self.variable_type.clone())
      .set_tags(tags(&self.tags)?);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&CREATE_VARIABLE, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetVariablesInput {
  /// Return only this variable
  #[arg(long)]
  pub name: Option<String>,

  /// The maximum number of variables to return per page
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
pub struct Variable {
  name: Option<String>,
  data_type: Option<String>,
  data_source: Option<String>,
  default_value: Option<String>,
  description: Option<String>,
  variable_type: Option<String>,
  last_updated_time: Option<String>,
  created_time: Option<String>,
  arn: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Variables {
  variables: Vec<Variable>,
  next_token: Option<String>,
}

impl From<GetVariablesOutput> for Variables {
  fn from(output: GetVariablesOutput) -> Self {
    Variables {
      variables: output
        .variables
        .unwrap_or_default()
        .into_iter()
        .map(|v| Variable {
          data_type: v.data_type.as_ref().map(|t| t.as_str().to_owned()),
          data_source: v.data_source.as_ref().map(|s| s.as_str().to_owned()),
          name: v.name,
          default_value: v.default_value,
          description: v.description,
          variable_type: v.variable_type,
          last_updated_time: v.last_updated_time,
          created_time: v.created_time,
          arn: v.arn,
        })
        .collect(),
      next_token: output.next_token,
    }
  }
}

impl Paged for Variables {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl GetVariablesInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&GET_VARIABLES, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .get_variables()
          .set_name(self.name.clone())
          .set_max_results(self.max_results)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(Variables::from)
            .or_command_error(&GET_VARIABLES, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteVariableInput {
  /// The name of the variable to delete
  #[arg(long)]
  pub name: String,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

impl DeleteVariableInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.frauddetector();
    let region = session.region();
    let mut inv = Invocation::new(&DELETE_VARIABLE, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let request = client.delete_variable().name(&self.name);

    inv
      .call(async {
        request
          .send()
          .await
          .map(|_| Empty {})
          .or_command_error(&DELETE_VARIABLE, region.as_deref())
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
  fn get_variables_unrolls_variables() {
    let output = GetVariablesOutput::builder()
      .variables(
        types::Variable::builder()
          .name("ip_address")
          .data_type(types::DataType::String)
          .data_source(types::DataSource::Event)
          .default_value("<unknown>")
          .variable_type("IP_ADDRESS")
          .build(),
      )
      .next_token("more")
      .build();
    let view = Variables::from(output);
    let select = GET_VARIABLES.default_select.parse::<Selector>().unwrap();
    let result = select.project(&serde_json::to_value(&view).unwrap(), &json!({}));

    assert_eq!(view.next_token(), Some("more"));
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["Name"], "ip_address");
    assert_eq!(result[0]["DataType"], "STRING");
    assert_eq!(result[0]["DataSource"], "EVENT");
  }
}
