use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;

/// Period at which the input watcher re-checks the render thread.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Requested stop of the animation. Not a failure: `main` exits with 0.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("animation halted")]
pub struct Halted;

/// `true` if `err` is (or wraps) a [`Halted`].
#[must_use]
pub fn is_halt(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Halted>().is_some()
}

/// Process-wide stop flag shared by the signal handler, the input watcher
/// and the render thread.
///
/// # Example
/// ```
/// use hz_app::shutdown::ShutdownToken;
/// let token = ShutdownToken::new();
/// let remote = token.clone();
/// assert!(token.check().is_ok());
/// remote.trigger();
/// assert!(token.check().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    /// Untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask everything holding a clone to stop.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`trigger`](Self::trigger) has been called on any clone.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Halted)` once triggered.
    ///
    /// # Errors
    /// Returns [`Halted`] if a stop was requested.
    pub fn check(&self) -> Result<(), Halted> {
        if self.is_triggered() {
            Err(Halted)
        } else {
            Ok(())
        }
    }
}

/// Route SIGINT to `token` (scrolling mode).
///
/// # Errors
/// Returns an error if a handler is already installed.
pub fn install_interrupt_handler(token: &ShutdownToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        log::info!("Interrupt received, stopping");
        token.trigger();
    })
    .context("cannot install the interrupt handler")
}

/// Block on terminal input until a key press or a resize (grid mode).
///
/// Either event triggers `token`. Returns early, without triggering, if the
/// token is set elsewhere or the render thread has finished on its own.
///
/// # Errors
/// Returns an error if reading terminal events fails.
pub fn watch_input<T>(token: &ShutdownToken, render: &JoinHandle<T>) -> Result<()> {
    while !token.is_triggered() && !render.is_finished() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                log::info!("Key {:?} pressed, stopping", key.code);
                token.trigger();
            }
            Event::Resize(w, h) => {
                log::info!("Terminal resized to {w}×{h}, stopping");
                token.trigger();
            }
            _ => {}
        }
    }
    Ok(())
}
