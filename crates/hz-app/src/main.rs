use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use hz_app::app;
use hz_app::cli::{self, Cli, Launch};
use hz_app::shutdown::{ShutdownToken, is_halt};
use hz_core::config::DisplayMode;
use hz_core::error::CoreError;

fn main() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            println!("{}", cli::usage());
            return Ok(ExitCode::FAILURE);
        }
    };

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Résoudre la config (fichier + CLI)
    let config = match cli.launch() {
        Ok(Launch::Help) => {
            println!("{}", cli::usage());
            return Ok(ExitCode::SUCCESS);
        }
        Ok(Launch::Version) => {
            println!("{}", cli::version_line());
            return Ok(ExitCode::SUCCESS);
        }
        Ok(Launch::Run(config)) => config,
        Err(e) if e.is::<CoreError>() => {
            eprintln!("hozumi: {e}");
            println!("{}", cli::usage());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e),
    };
    log::debug!("Resolved config: {config:?}");

    // 4. Lancer l'animation jusqu'à l'arrêt demandé
    let token = ShutdownToken::new();
    let result = match config.mode {
        DisplayMode::Scroll => app::run_scroll(&config, &token),
        DisplayMode::Grid => app::run_grid(&config, &token),
    };

    match result {
        Err(e) if is_halt(&e) => Ok(ExitCode::SUCCESS),
        other => other.map(|()| ExitCode::SUCCESS),
    }
}
