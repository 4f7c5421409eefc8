//! Terminal setup and teardown around the two rendering regimes.

use std::io;
use std::thread;

use anyhow::{Context, Result, anyhow};
use crossterm::execute;
use crossterm::style::ResetColor;
use hz_core::clock::SystemClock;
use hz_core::config::WriterConfig;
use hz_render::{ScreenRenderer, StreamRenderer};

use crate::dance;
use crate::sequencer::{GridStage, ScrollStage, Sequencer};
use crate::shutdown::{self, ShutdownToken};

/// Scrolling mode on stdout until interrupted.
///
/// Colours are reset on the way out, error or not.
///
/// # Errors
/// Returns [`Halted`](crate::shutdown::Halted) on interrupt, or the first
/// terminal error.
pub fn run_scroll(config: &WriterConfig, token: &ShutdownToken) -> Result<()> {
    shutdown::install_interrupt_handler(token)?;

    let renderer = StreamRenderer::new(io::stdout());
    let mut stage = ScrollStage::new(renderer, SystemClock, token.clone());
    let result = if config.graphical {
        dance::run(&mut stage, &config.timing)
    } else {
        Sequencer::new(config).run_scroll(&mut stage)
    };

    // Toujours restaurer les couleurs, même en cas d'erreur.
    if let Err(e) = execute!(io::stdout(), ResetColor) {
        log::warn!("Cannot reset terminal colours: {e}");
    }
    result
}

/// Grid mode in the alternate screen until a key press or a resize.
///
/// The animation runs on a dedicated render thread that owns the terminal;
/// this thread watches input. The terminal is restored before returning,
/// error or not.
///
/// # Errors
/// Returns an error if the terminal cannot be initialised, input cannot be
/// read, or the render thread failed.
pub fn run_grid(config: &WriterConfig, token: &ShutdownToken) -> Result<()> {
    let renderer = init_or_restore(ScreenRenderer::init, ratatui::restore)?;

    let spawned = {
        let config = config.clone();
        let token = token.clone();
        thread::Builder::new()
            .name("hozumi-render".into())
            .spawn(move || {
                let mut stage = GridStage::new(renderer, SystemClock, token);
                Sequencer::new(&config).run_grid(&mut stage)
            })
    };
    let render = match spawned {
        Ok(handle) => handle,
        Err(e) => {
            ratatui::restore();
            return Err(e).context("cannot start the render thread");
        }
    };

    let watched = shutdown::watch_input(token, &render);
    token.trigger();
    let rendered = render
        .join()
        .map_err(|_| anyhow!("render thread panicked"));

    // Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    watched?;
    rendered?
}

/// Run `init`, calling `restore` before returning its error.
///
/// Terminal init can fail after raw mode is already on.
fn init_or_restore<T>(init: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    init().inspect_err(|_| restore())
}
