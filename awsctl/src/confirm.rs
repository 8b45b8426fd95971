use std::io::{self, BufRead, IsTerminal, Write};

use clap::{Args, ValueEnum};

use crate::error::CommandError;

/// How disruptive an operation is
///
/// An operation prompts for confirmation when its impact is at or above the configured preference
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Impact {
  /// Never prompt
  None,
  Low,
  Medium,
  #[default]
  High,
}

/// Flags shared by every operation that changes service state
#[derive(Args, Debug, Default, Clone)]
pub struct ConfirmArgs {
  /// Skip the confirmation prompt
  #[arg(long)]
  pub force: bool,

  /// Show what would happen without calling the service
  #[arg(long)]
  pub what_if: bool,
}

/// Answers a confirmation request
pub trait Prompt {
  fn ask(&mut self, question: &str) -> Result<bool, CommandError>;
}

/// Interactive prompt on the controlling terminal
///
/// Questions are written to stderr so stdout stays clean for results
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
  fn ask(&mut self, question: &str) -> Result<bool, CommandError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
      return Err(CommandError::Validation(format!(
        "{question} requires confirmation but stdin is not interactive; pass --force to proceed"
      )));
    }

    let mut stderr = io::stderr();
    write!(stderr, "{question}\n[Y] Yes  [N] No  (default is \"Y\"): ")?;
    stderr.flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;

    Ok(parse_answer(&answer))
  }
}

fn parse_answer(answer: &str) -> bool {
  matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

/// Outcome of the confirmation gate
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
  Proceed,
  WhatIf(String),
  Declined,
}

/// Decide whether a mutating operation should run
pub fn should_process(
  prompt: &mut dyn Prompt,
  args: &ConfirmArgs,
  impact: Impact,
  preference: Impact,
  operation: &str,
  target: &str,
) -> Result<Decision, CommandError> {
  let description = format!("Performing the operation \"{operation}\" on target \"{target}\".");

  if args.what_if {
    return Ok(Decision::WhatIf(format!("What if: {description}")));
  }

  if args.force || preference == Impact::None || impact < preference {
    return Ok(Decision::Proceed);
  }

  match prompt.ask(&format!("Are you sure you want to perform this action?\n{description}"))? {
    true => Ok(Decision::Proceed),
    false => Ok(Decision::Declined),
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use rstest::*;

  use super::*;

  /// Records questions and replies with a fixed answer
  pub(crate) struct Scripted {
    pub answer: bool,
    pub asked: Vec<String>,
  }

  impl Scripted {
    pub fn new(answer: bool) -> Self {
      Self { answer, asked: vec![] }
    }
  }

  impl Prompt for Scripted {
    fn ask(&mut self, question: &str) -> Result<bool, CommandError> {
      self.asked.push(question.to_owned());
      Ok(self.answer)
    }
  }

  #[rstest]
  #[case("", true)]
  #[case("y\n", true)]
  #[case("YES", true)]
  #[case("n", false)]
  #[case("nope", false)]
  fn parses_answers(#[case] answer: &str, #[case] expected: bool) {
    assert_eq!(parse_answer(answer), expected);
  }

  #[rstest]
  // impact below preference never prompts
  #[case(Impact::Medium, Impact::High, false, Decision::Proceed, 0)]
  #[case(Impact::Low, Impact::Medium, false, Decision::Proceed, 0)]
  // preference none disables prompting entirely
  #[case(Impact::High, Impact::None, false, Decision::Proceed, 0)]
  // at or above preference prompts
  #[case(Impact::High, Impact::High, true, Decision::Proceed, 1)]
  #[case(Impact::High, Impact::High, false, Decision::Declined, 1)]
  #[case(Impact::Medium, Impact::Low, false, Decision::Declined, 1)]
  fn gate(
    #[case] impact: Impact,
    #[case] preference: Impact,
    #[case] answer: bool,
    #[case] expected: Decision,
    #[case] prompts: usize,
  ) {
    let mut prompt = Scripted::new(answer);
    let result = should_process(&mut prompt, &ConfirmArgs::default(), impact, preference, "DeleteRule", "r1").unwrap();

    assert_eq!(result, expected);
    assert_eq!(prompt.asked.len(), prompts);
  }

  #[test]
  fn force_skips_prompt() {
    let mut prompt = Scripted::new(false);
    let args = ConfirmArgs {
      force: true,
      what_if: false,
    };
    let result = should_process(&mut prompt, &args, Impact::High, Impact::High, "DeleteDetector", "d1").unwrap();

    assert_eq!(result, Decision::Proceed);
    assert!(prompt.asked.is_empty());
  }

  #[test]
  fn what_if_wins_over_force() {
    let mut prompt = Scripted::new(true);
    let args = ConfirmArgs {
      force: true,
      what_if: true,
    };
    let result = should_process(&mut prompt, &args, Impact::High, Impact::High, "DeleteDetector", "d1").unwrap();

    assert_eq!(
      result,
      Decision::WhatIf("What if: Performing the operation \"DeleteDetector\" on target \"d1\".".to_owned())
    );
  }

  #[test]
  fn prompt_names_target() {
    let mut prompt = Scripted::new(true);
    should_process(
      &mut prompt,
      &ConfirmArgs::default(),
      Impact::High,
      Impact::Medium,
      "DeleteVariable",
      "ip_address",
    )
    .unwrap();

    assert!(prompt.asked[0].contains("\"DeleteVariable\" on target \"ip_address\""));
  }
}
