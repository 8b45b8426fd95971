use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::{commands, confirm::Impact, output::OutputFormat};

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[clap(flatten)]
  pub global: GlobalArgs,

  #[clap(flatten)]
  pub verbose: Verbosity<WarnLevel>,
}

/// Settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
  /// The AWS region to send requests to
  ///
  /// Falls back to AWS_DEFAULT_REGION and then the shared config/profile region
  #[arg(long, global = true, env = "AWS_REGION")]
  pub region: Option<String>,

  /// The named profile from the shared config/credentials files
  #[arg(long, global = true, env = "AWS_PROFILE")]
  pub profile: Option<String>,

  /// Override the service endpoint URL
  #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
  pub endpoint_url: Option<String>,

  /// Maximum attempts per request, including the initial one
  #[arg(long, global = true, env = "AWSCTL_MAX_ATTEMPTS", default_value_t = 3)]
  pub max_attempts: u32,

  /// Output format for results
  #[arg(long, global = true, env = "AWSCTL_OUTPUT", value_enum, default_value_t)]
  pub output: OutputFormat,

  /// Prompt before running operations whose impact is at or above this level
  #[arg(long, global = true, env = "AWSCTL_CONFIRM_PREFERENCE", value_enum, default_value_t)]
  pub confirm_preference: Impact,

  /// Disable colored log output
  #[arg(long, global = true)]
  pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Amazon EBS direct APIs for reading and writing snapshot blocks
  #[command(subcommand)]
  Ebs(commands::ebs::EbsCommands),

  /// Amazon Fraud Detector
  #[command(subcommand, name = "frauddetector", alias = "fd")]
  FraudDetector(commands::frauddetector::FraudDetectorCommands),
}
