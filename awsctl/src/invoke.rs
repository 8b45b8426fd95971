//! The command wrapper shared by every operation
//!
//! An [`Invocation`] binds one operation's metadata and parameters to a [`Shell`], then drives the call:
//! required-value checks, the confirmation gate, cancellation, `NextToken` pagination, and projecting each
//! response through the selector before handing it to the sink.
use std::future::Future;

use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
  confirm::{self, ConfirmArgs, Decision, Impact, Prompt},
  error::{CommandError, ProvideErrorMetadata, SdkError},
  output::Sink,
  select::Selector,
};

/// Static description of one API operation
#[derive(Debug)]
pub struct Operation {
  /// API operation name, e.g. `CreateRule`
  pub name: &'static str,
  /// Selector applied when `--select` is not supplied
  pub default_select: &'static str,
  /// Confirmation impact; `Impact::None` for read-only operations
  pub impact: Impact,
  /// Parameter whose value names the resource in confirmation messages
  pub target: Option<&'static str>,
  /// Parameters the service requires
  pub required: &'static [&'static str],
}

/// `--select` flag shared by every operation
#[derive(Args, Debug, Default, Clone)]
pub struct SelectArgs {
  /// Output selection: `*` for the whole response, `^Name` for a parameter value, or a property path such as
  /// `Rule.RuleId`
  #[arg(long)]
  pub select: Option<Selector>,
}

/// Paging flags shared by list operations
#[derive(Args, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagingArgs {
  /// Resume from this token; only the one page is returned
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,

  /// Make a single call instead of following NextToken until the results are exhausted
  #[arg(long)]
  #[serde(skip)]
  pub no_auto_iteration: bool,
}

impl PagingArgs {
  /// The caller takes over paging by asking for one page or resuming from a token
  pub fn user_controlled(&self) -> bool {
    self.no_auto_iteration || self.next_token.is_some()
  }
}

/// A response page that may carry a continuation token
pub trait Paged {
  fn next_token(&self) -> Option<&str>;
}

/// Where results, notes, and confirmation prompts go for one command
pub struct Shell<'a> {
  pub sink: &'a mut dyn Sink,
  pub prompt: &'a mut dyn Prompt,
  pub preference: Impact,
  pub cancel: CancellationToken,
}

/// Map SDK failures on a call's result into command errors for `op`
pub trait SdkResultExt<T> {
  fn or_command_error(self, op: &'static Operation, region: Option<&str>) -> Result<T, CommandError>;
}

impl<T, E, R> SdkResultExt<T> for Result<T, SdkError<E, R>>
where
  E: ProvideErrorMetadata + std::error::Error + 'static,
  R: std::fmt::Debug + 'static,
{
  fn or_command_error(self, op: &'static Operation, region: Option<&str>) -> Result<T, CommandError> {
    self.map_err(|err| CommandError::from_sdk(op.name, region, err))
  }
}

/// Human readable form of a parameter value for confirmation messages
fn describe(value: &Value) -> String {
  match value {
    Value::String(s) => s.to_owned(),
    Value::Array(items) => items.iter().map(describe).collect::<Vec<_>>().join(", "),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

fn lookup<'v>(params: &'v Value, name: &str) -> Option<&'v Value> {
  params
    .as_object()
    .and_then(|map| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
}

pub struct Invocation<'a> {
  op: &'static Operation,
  shell: Shell<'a>,
  select: Selector,
  params: Value,
}

impl<'a> Invocation<'a> {
  pub fn new<A: Serialize>(
    op: &'static Operation,
    shell: Shell<'a>,
    select: &SelectArgs,
    args: &A,
  ) -> Result<Self, CommandError> {
    let select = match &select.select {
      Some(select) => select.clone(),
      None => op
        .default_select
        .parse::<Selector>()
        .map_err(|e| CommandError::Validation(e.to_string()))?,
    };

    let invocation = Self {
      op,
      shell,
      select,
      params: serde_json::to_value(args)?,
    };

    for name in invocation.blank_required() {
      warn!(
        "You are passing an empty value for parameter {name} which is marked as required by {}; the request will \
         be sent and the service may reject it",
        op.name
      );
    }

    Ok(invocation)
  }

  /// Required parameters that were bound to an empty value
  pub fn blank_required(&self) -> Vec<&'static str> {
    self
      .op
      .required
      .iter()
      .copied()
      .filter(|name| match lookup(&self.params, name) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
      })
      .collect()
  }

  /// Run the confirmation gate; `false` means the call must not be made
  pub fn should_process(&mut self, args: &ConfirmArgs) -> Result<bool, CommandError> {
    let target = self
      .op
      .target
      .and_then(|name| lookup(&self.params, name))
      .map(describe)
      .unwrap_or_default();

    let decision = confirm::should_process(
      &mut *self.shell.prompt,
      args,
      self.op.impact,
      self.shell.preference,
      self.op.name,
      &target,
    )?;

    match decision {
      Decision::Proceed => Ok(true),
      Decision::WhatIf(message) => {
        self.shell.sink.note(&message)?;
        Ok(false)
      }
      Decision::Declined => {
        info!("{} declined for {target}", self.op.name);
        Ok(false)
      }
    }
  }

  /// Await `fut` unless the invocation is cancelled first
  async fn guarded<T, Fut>(&self, fut: Fut) -> Result<T, CommandError>
  where
    Fut: Future<Output = Result<T, CommandError>>,
  {
    tokio::select! {
      biased;
      _ = self.shell.cancel.cancelled() => Err(CommandError::Cancelled { operation: self.op.name }),
      result = fut => result,
    }
  }

  fn emit(&mut self, response: &Value) -> Result<(), CommandError> {
    for value in self.select.project(response, &self.params) {
      self.shell.sink.emit(&value)?;
    }
    Ok(())
  }

  /// Make a single call and emit its projected response
  pub async fn call<T, Fut>(mut self, fut: Fut) -> Result<(), CommandError>
  where
    T: Serialize,
    Fut: Future<Output = Result<T, CommandError>>,
  {
    debug!("Calling {}", self.op.name);
    let response = self.guarded(fut).await?;
    self.emit(&serde_json::to_value(&response)?)
  }

  /// Call `fetch` with each continuation token until the service stops returning one
  ///
  /// Returns the number of pages fetched
  pub async fn paginate<T, F, Fut>(mut self, paging: &PagingArgs, mut fetch: F) -> Result<usize, CommandError>
  where
    T: Serialize + Paged,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<T, CommandError>>,
  {
    let user_controlled = paging.user_controlled();
    let mut token = paging.next_token.clone();
    let mut pages = 0;

    loop {
      debug!("Calling {} (page {})", self.op.name, pages + 1);
      let page = self.guarded(fetch(token.clone())).await?;
      pages += 1;

      let next = page.next_token().filter(|t| !t.is_empty()).map(str::to_owned);
      if self.select.reads_response() {
        self.emit(&serde_json::to_value(&page)?)?;
      }

      match next {
        None => break,
        Some(next) if user_controlled => {
          let message = format!(
            "More results are available; to retrieve the next page call again with --next-token {next}"
          );
          self.shell.sink.note(&message)?;
          break;
        }
        Some(next) if token.as_deref() == Some(next.as_str()) => {
          warn!("{} returned the same NextToken that was sent; stopping", self.op.name);
          break;
        }
        Some(next) => token = Some(next),
      }
    }

    if !self.select.reads_response() {
      self.emit(&Value::Null)?;
    }

    Ok(pages)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::VecDeque;

  use rstest::*;
  use serde_json::json;

  use super::*;
  use crate::{confirm::tests::Scripted, output::tests::Captured};

  static LIST: Operation = Operation {
    name: "ListSnapshotBlocks",
    default_select: "Blocks",
    impact: Impact::None,
    target: None,
    required: &["SnapshotId"],
  };

  static DELETE: Operation = Operation {
    name: "DeleteDetector",
    default_select: "*",
    impact: Impact::High,
    target: Some("DetectorId"),
    required: &["DetectorId"],
  };

  #[derive(Serialize)]
  #[serde(rename_all = "PascalCase")]
  struct ListArgs {
    snapshot_id: String,
    #[serde(flatten)]
    paging: PagingArgs,
  }

  #[derive(Clone, Serialize)]
  #[serde(rename_all = "PascalCase")]
  struct Page {
    blocks: Vec<u32>,
    next_token: Option<String>,
  }

  impl Paged for Page {
    fn next_token(&self) -> Option<&str> {
      self.next_token.as_deref()
    }
  }

  fn page(blocks: &[u32], next: Option<&str>) -> Page {
    Page {
      blocks: blocks.to_vec(),
      next_token: next.map(str::to_owned),
    }
  }

  fn shell<'a>(sink: &'a mut Captured, prompt: &'a mut Scripted) -> Shell<'a> {
    Shell {
      sink,
      prompt,
      preference: Impact::High,
      cancel: CancellationToken::new(),
    }
  }

  fn list_args(next_token: Option<&str>, no_auto_iteration: bool) -> ListArgs {
    ListArgs {
      snapshot_id: "snap-1".to_owned(),
      paging: PagingArgs {
        next_token: next_token.map(str::to_owned),
        no_auto_iteration,
      },
    }
  }

  /// Replays canned pages, recording the tokens each call was made with
  async fn run_pages(
    args: &ListArgs,
    select: Option<&str>,
    mut pages: VecDeque<Page>,
  ) -> (Result<usize, CommandError>, Vec<Option<String>>, Vec<Value>) {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let mut tokens = vec![];
    let select = SelectArgs {
      select: select.map(|s| s.parse().unwrap()),
    };

    let result = {
      let inv = Invocation::new(&LIST, shell(&mut sink, &mut prompt), &select, args).unwrap();
      inv
        .paginate(&args.paging, |token| {
          tokens.push(token);
          let next = pages.pop_front();
          async move { next.ok_or(CommandError::Validation("no more pages".to_owned())) }
        })
        .await
    };

    (result, tokens, sink.values)
  }

  #[tokio::test]
  async fn follows_tokens_until_absent() {
    let pages = VecDeque::from(vec![
      page(&[0, 1], Some("t1")),
      page(&[2], Some("t2")),
      page(&[3, 4], None),
    ]);
    let (result, tokens, values) = run_pages(&list_args(None, false), None, pages).await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(tokens, vec![None, Some("t1".to_owned()), Some("t2".to_owned())]);
    assert_eq!(values, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
  }

  #[tokio::test]
  async fn empty_token_ends_iteration() {
    let pages = VecDeque::from(vec![page(&[0], Some("t1")), page(&[1], Some(""))]);
    let (result, _, values) = run_pages(&list_args(None, false), None, pages).await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(values.len(), 2);
  }

  #[tokio::test]
  async fn repeated_token_ends_iteration() {
    let pages = VecDeque::from(vec![
      page(&[0], Some("t1")),
      page(&[1], Some("t1")),
      page(&[2], None),
    ]);
    let (result, _, _) = run_pages(&list_args(None, false), None, pages).await;

    assert_eq!(result.unwrap(), 2);
  }

  #[rstest]
  #[case(Some("resume"), false, Some("resume"))]
  #[case(None, true, None)]
  #[tokio::test]
  async fn user_controlled_paging_makes_one_call(
    #[case] next_token: Option<&str>,
    #[case] no_auto_iteration: bool,
    #[case] first_token: Option<&str>,
  ) {
    let pages = VecDeque::from(vec![page(&[5], Some("more")), page(&[6], None)]);
    let (result, tokens, values) = run_pages(&list_args(next_token, no_auto_iteration), Some("*"), pages).await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(tokens, vec![first_token.map(str::to_owned)]);
    assert_eq!(values, vec![json!({"Blocks": [5], "NextToken": "more"})]);
  }

  #[rstest]
  #[case(None, true)]
  #[case(Some("resume"), false)]
  #[tokio::test]
  async fn user_controlled_paging_notes_resume_token(
    #[case] next_token: Option<&str>,
    #[case] no_auto_iteration: bool,
  ) {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = list_args(next_token, no_auto_iteration);

    let result = Invocation::new(&LIST, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args)
      .unwrap()
      .paginate(&args.paging, |_| async { Ok(page(&[0], Some("tok-2"))) })
      .await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(sink.values, vec![json!(0)]);
    assert_eq!(sink.notes.len(), 1);
    assert!(sink.notes[0].contains("--next-token tok-2"));
  }

  #[tokio::test]
  async fn auto_paging_writes_no_notes() {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = list_args(None, false);
    let mut pages = VecDeque::from(vec![page(&[0], Some("t1")), page(&[1], None)]);

    Invocation::new(&LIST, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args)
      .unwrap()
      .paginate(&args.paging, |_| {
        let next = pages.pop_front();
        async move { next.ok_or(CommandError::Validation("no more pages".to_owned())) }
      })
      .await
      .unwrap();

    assert!(sink.notes.is_empty());
  }

  #[tokio::test]
  async fn parameter_select_emits_once_after_paging() {
    let pages = VecDeque::from(vec![page(&[0], Some("t1")), page(&[1], None)]);
    let (result, _, values) = run_pages(&list_args(None, false), Some("^SnapshotId"), pages).await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(values, vec![json!("snap-1")]);
  }

  #[tokio::test]
  async fn failure_stops_paging() {
    let pages = VecDeque::from(vec![page(&[0], Some("t1"))]);
    let (result, tokens, values) = run_pages(&list_args(None, false), None, pages).await;

    assert!(matches!(result, Err(CommandError::Validation(_))));
    assert_eq!(tokens.len(), 2);
    assert_eq!(values, vec![json!(0)]);
  }

  #[derive(Serialize)]
  #[serde(rename_all = "PascalCase")]
  struct DeleteArgs {
    detector_id: String,
  }

  #[tokio::test]
  async fn call_error_is_returned_not_emitted() {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = DeleteArgs {
      detector_id: "d1".to_owned(),
    };

    let result = Invocation::new(&DELETE, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args)
      .unwrap()
      .call(async {
        Err::<Value, _>(CommandError::Service {
          operation: "DeleteDetector",
          code: Some("ConflictException".to_owned()),
          message: "detector has versions".to_owned(),
          request_id: None,
        })
      })
      .await;

    assert!(matches!(result, Err(CommandError::Service { .. })));
    assert!(sink.values.is_empty());
  }

  #[tokio::test]
  async fn cancelled_call() {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = DeleteArgs {
      detector_id: "d1".to_owned(),
    };
    let sh = shell(&mut sink, &mut prompt);
    sh.cancel.cancel();

    let result = Invocation::new(&DELETE, sh, &SelectArgs::default(), &args)
      .unwrap()
      .call(std::future::pending::<Result<Value, CommandError>>())
      .await;

    assert!(matches!(result, Err(CommandError::Cancelled { operation: "DeleteDetector" })));
  }

  #[rstest]
  #[case("d1", vec![])]
  #[case("", vec!["DetectorId"])]
  #[case("   ", vec!["DetectorId"])]
  fn blank_required_values(#[case] detector_id: &str, #[case] expected: Vec<&str>) {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = DeleteArgs {
      detector_id: detector_id.to_owned(),
    };
    let inv = Invocation::new(&DELETE, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args).unwrap();

    assert_eq!(inv.blank_required(), expected);
  }

  #[test]
  fn declined_confirmation_blocks_call() {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(false);
    let args = DeleteArgs {
      detector_id: "d1".to_owned(),
    };
    let mut inv = Invocation::new(&DELETE, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args).unwrap();

    assert!(!inv.should_process(&ConfirmArgs::default()).unwrap());
    drop(inv);
    assert!(prompt.asked[0].contains("on target \"d1\""));
  }

  #[test]
  fn what_if_writes_note() {
    let mut sink = Captured::default();
    let mut prompt = Scripted::new(true);
    let args = DeleteArgs {
      detector_id: "d1".to_owned(),
    };
    let confirm = ConfirmArgs {
      force: false,
      what_if: true,
    };
    let mut inv = Invocation::new(&DELETE, shell(&mut sink, &mut prompt), &SelectArgs::default(), &args).unwrap();

    assert!(!inv.should_process(&confirm).unwrap());
    drop(inv);
    assert_eq!(
      sink.notes,
      vec!["What if: Performing the operation \"DeleteDetector\" on target \"d1\".".to_owned()]
    );
    assert!(prompt.asked.is_empty());
  }

  #[rstest]
  #[case(json!("snap-1"), "snap-1")]
  #[case(json!(["a", "b"]), "a, b")]
  #[case(json!(12), "12")]
  #[case(Value::Null, "")]
  fn describes_targets(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(describe(&value), expected);
  }
}
