#![warn(clippy::all, clippy::pedantic)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sitewatch::{
    Config, CycleRunner, DiscordNotifier, HttpProber, LogNotifier, MonitoringScheduler, Notifier,
};
use tracing::{error, info, warn};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init_with(cli.log_level(), cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration in two layers
///
/// The first value holds the config file plus command line flags and is what
/// `--write-config` persists. The second adds environment overrides on top,
/// with command line flags still taking precedence.
fn load_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<(Config, Config)> {
    let mut stored = Config::from_config(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut stored);

    let mut effective = stored.clone();
    effective.apply_env_with(env);
    cli.apply(&mut effective);

    Ok((stored, effective))
}

async fn run(cli: Cli) -> Result<()> {
    let (stored, config) = load_config(&cli, |key| dotenvy::var(key).ok())?;

    if let Some(path) = &cli.write_config {
        stored.validate()?;
        stored.write_config(path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    config.validate()?;

    if cli.print_config {
        println!("{config}");
        return Ok(());
    }

    info!("Website health checker started");

    let targets = config.load_targets().context("loading sites")?;
    info!("Loaded {} sites", targets.len());

    let prober = match &config.user_agent {
        Some(user_agent) => HttpProber::with_user_agent(config.probe_timeout(), user_agent)?,
        None => HttpProber::new(config.probe_timeout())?,
    };
    let mut runner = CycleRunner::new(Arc::new(prober), notifier(&config, cli.dry_run)?);
    runner.extend_targets(targets);

    if cli.once {
        let report = runner.run_cycle().await;
        info!(
            "Cycle finished: {} probed, {} unhealthy, {:?}",
            report.probed,
            report.failures.len(),
            report.delivery
        );
        return Ok(());
    }

    MonitoringScheduler::new(runner, config.cycle_interval())
        .with_run_immediately(config.run_immediately)
        .run(shutdown_signal())
        .await;

    Ok(())
}

fn notifier(config: &Config, dry_run: bool) -> Result<Arc<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) if !dry_run => {
            Ok(Arc::new(DiscordNotifier::new(url.clone(), config.embed.clone())?))
        }
        Some(_) => {
            info!("Dry run, failures will only be logged");
            Ok(Arc::new(LogNotifier))
        }
        None => {
            warn!("No webhook configured (set {}), failures will only be logged", sitewatch::WEBHOOK_URL_ENV);
            Ok(Arc::new(LogNotifier))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C, running until killed: {e}");
        std::future::pending::<()>().await;
    }
}
