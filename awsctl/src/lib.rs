pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod invoke;
pub mod output;
pub mod select;

pub use cli::{Cli, Commands};
pub use config::Session;
pub use error::CommandError;

impl Commands {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    match self {
      Commands::Ebs(cmd) => cmd.exec(session).await,
      Commands::FraudDetector(cmd) => cmd.exec(session).await,
    }
  }
}
