use clap::Parser;
use rpmlog::cli::Cli;
use rpmlog::run;
use rpmlog_config::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_directive()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !cli.is_trigger() {
        cli.reject_command();
        return ExitCode::SUCCESS;
    }

    let result = Config::load(cli.config.as_deref(), &cli.overrides())
        .map_err(rpmlog::error::ErrorKind::config)
        .and_then(|config| run(&config));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            tracing::debug!("{err:?}");
            ExitCode::FAILURE
        },
    }
}
