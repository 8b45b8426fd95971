use std::env;

use anyhow::Result;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, SdkConfig};
use aws_types::region::Region;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
  cli::GlobalArgs,
  confirm::{Impact, Prompt, TerminalPrompt},
  invoke::Shell,
  output::{Console, Sink},
};

/// Get the configuration to authn/authz with AWS that will be used across AWS clients
pub async fn get_sdk_config(global: &GlobalArgs) -> Result<SdkConfig> {
  let aws_region = match &global.region {
    Some(region) => Some(Region::new(region.to_owned())),
    None => env::var("AWS_DEFAULT_REGION").ok().map(Region::new),
  };

  let region_provider = RegionProviderChain::first_try(aws_region).or_default_provider();

  let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
  if let Some(profile) = &global.profile {
    loader = loader.profile_name(profile);
  }
  if let Some(endpoint) = &global.endpoint_url {
    loader = loader.endpoint_url(endpoint);
  }

  Ok(loader.load().await)
}

/// Get the EBS client
pub fn ebs_client(config: &SdkConfig, retries: u32) -> aws_sdk_ebs::Client {
  use aws_sdk_ebs::config::{self, retry::RetryConfig};

  aws_sdk_ebs::Client::from_conf(
    // Start with the shared environment configuration
    config::Builder::from(config)
      // Set max attempts
      .retry_config(RetryConfig::standard().with_max_attempts(retries))
      .build(),
  )
}

/// Get the Fraud Detector client
pub fn frauddetector_client(config: &SdkConfig, retries: u32) -> aws_sdk_frauddetector::Client {
  use aws_sdk_frauddetector::config::{self, retry::RetryConfig};

  aws_sdk_frauddetector::Client::from_conf(
    config::Builder::from(config)
      .retry_config(RetryConfig::standard().with_max_attempts(retries))
      .build(),
  )
}

/// Everything a command needs beyond its own arguments
pub struct Session {
  pub config: SdkConfig,
  pub max_attempts: u32,
  pub preference: Impact,
  pub cancel: CancellationToken,
  sink: Box<dyn Sink>,
  prompt: Box<dyn Prompt>,
}

impl Session {
  pub async fn load(global: &GlobalArgs, cancel: CancellationToken) -> Result<Self> {
    let config = get_sdk_config(global).await?;
    debug!("Using region {:?}", config.region());

    Ok(Self {
      config,
      max_attempts: global.max_attempts,
      preference: global.confirm_preference,
      cancel,
      sink: Box::new(Console::new(global.output)),
      prompt: Box::new(TerminalPrompt),
    })
  }

  /// The region requests will be sent to, if one was resolved
  pub fn region(&self) -> Option<String> {
    self.config.region().map(|r| r.to_string())
  }

  pub fn ebs(&self) -> aws_sdk_ebs::Client {
    ebs_client(&self.config, self.max_attempts)
  }

  pub fn frauddetector(&self) -> aws_sdk_frauddetector::Client {
    frauddetector_client(&self.config, self.max_attempts)
  }

  pub fn shell(&mut self) -> Shell<'_> {
    Shell {
      sink: self.sink.as_mut(),
      prompt: self.prompt.as_mut(),
      preference: self.preference,
      cancel: self.cancel.clone(),
    }
  }
}
