use std::process;

use anyhow::Result;
use awsctl::{Cli, CommandError, Session};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

/// Write the failure to stderr, structured when it came from a command
fn report(err: &anyhow::Error) {
  match err.downcast_ref::<CommandError>() {
    Some(cmd_err) => match serde_json::to_string_pretty(&cmd_err.to_record()) {
      Ok(record) => eprintln!("{record}"),
      Err(_) => eprintln!("{cmd_err}"),
    },
    None => eprintln!("{err:#}"),
  }
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let subscriber = FmtSubscriber::builder()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .with_writer(std::io::stderr)
    .without_time()
    .with_ansi(!cli.global.no_color)
    .finish();
  tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

  // Stop the in-flight call on Ctrl-C
  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      debug!("Interrupt received, cancelling");
      on_interrupt.cancel();
    }
  });

  let result = match Session::load(&cli.global, cancel).await {
    Ok(mut session) => cli.command.exec(&mut session).await.map_err(anyhow::Error::from),
    Err(err) => Err(err),
  };

  match result {
    Ok(_) => Ok(()),
    Err(err) => {
      report(&err);
      process::exit(2);
    }
  }
}
