//! Parallel band animation.
//!
//! Each row of a band runs on its own lane thread. Lanes never touch the
//! grid: they send [`RowEvent`]s over a flume channel and the coordinator,
//! which owns the grid and the renderer, applies and flushes them in
//! arrival order. Lanes start [`ROW_STAGGER`] apart.

use std::ops::Range;
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use flume::{Receiver, Sender};
use hz_core::clock::Clock;
use hz_core::config::WriterConfig;
use hz_core::frame::{CellGrid, Line};
use hz_core::timing::{ROW_STAGGER, Timing};
use hz_core::traits::GridRenderer;

use crate::sequencer::{GridStage, Stage, reveal_row, shout_row};
use crate::shutdown::{Halted, ShutdownToken};

/// Message from a lane to the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowEvent {
    /// Replace the content of `row`.
    Draw {
        /// Grid row to overwrite.
        row: usize,
        /// New content of the row.
        line: Line,
    },
    /// The lane for `row` has finished its animation.
    Done {
        /// Row whose lane finished.
        row: usize,
    },
}

/// Exclusive right to animate one grid row.
///
/// Only obtainable from [`Band::split`] and not `Clone`, so two lanes can
/// never hold the same row.
#[derive(Debug, PartialEq, Eq)]
pub struct Lane {
    row: usize,
}

impl Lane {
    /// Grid row this lane writes.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Consecutive rows animated together.
///
/// # Example
/// ```
/// use hz_app::fanout::Band;
/// let band = Band::new(4, 3);
/// assert_eq!(band.span(), 4..7);
/// let rows: Vec<usize> = band.split().iter().map(|l| l.row()).collect();
/// assert_eq!(rows, [4, 5, 6]);
/// ```
#[derive(Debug)]
pub struct Band {
    top: usize,
    rows: usize,
}

impl Band {
    /// Band of `rows` rows starting at grid row `top`.
    #[must_use]
    pub fn new(top: usize, rows: usize) -> Self {
        Self { top, rows }
    }

    /// Rows covered by the band.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.top..self.top + self.rows
    }

    /// One lane per row, top to bottom.
    #[must_use]
    pub fn split(self) -> Vec<Lane> {
        self.span().map(|row| Lane { row }).collect()
    }
}

/// What a lane animates.
#[derive(Clone, Copy, Debug)]
enum Job<'a> {
    Text(&'a str),
    Shout,
}

/// Stage seen by a lane: buffers its row and forwards it on `present`.
struct LaneStage<'a, C> {
    lane: Lane,
    pending: Option<Line>,
    tx: Sender<RowEvent>,
    clock: &'a C,
    token: &'a ShutdownToken,
}

impl<C: Clock> Stage for LaneStage<'_, C> {
    fn set_row(&mut self, row: usize, line: Line) {
        debug_assert_eq!(row, self.lane.row, "lane wrote outside its row");
        self.pending = Some(line);
    }

    fn present(&mut self, hold: Duration) -> Result<()> {
        if let Some(line) = self.pending.take() {
            let row = self.lane.row;
            // Coordinateur parti : on s'arrête comme sur un signal.
            self.tx
                .send(RowEvent::Draw { row, line })
                .map_err(|_| Halted)?;
        }
        self.clock.sleep(hold);
        // Arrêt vu à la fin du maintien : au plus 600 ms (palier low).
        self.token.check()?;
        Ok(())
    }
}

impl<C: Clock> LaneStage<'_, C> {
    fn run(mut self, job: Job<'_>, timing: &Timing) -> Result<()> {
        let row = self.lane.row;
        match job {
            Job::Text(content) => reveal_row(&mut self, row, content, timing)?,
            Job::Shout => shout_row(&mut self, row, timing)?,
        }
        self.tx.send(RowEvent::Done { row }).map_err(|_| Halted)?;
        Ok(())
    }
}

/// Outcome of one parallel band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandReport {
    /// Lanes that signalled completion.
    pub completions: usize,
}

/// Animate one band starting at grid row `top`, all rows at once.
///
/// Returns once every lane has signalled completion.
///
/// # Errors
/// Returns [`Halted`] if a stop was requested, or the renderer's error.
pub fn run_band<R: GridRenderer, C: Clock>(
    stage: &mut GridStage<R, C>,
    config: &WriterConfig,
    top: usize,
) -> Result<BandReport> {
    let GridStage {
        grid,
        renderer,
        clock,
        token,
    } = stage;
    let clock: &C = clock;
    let token: &ShutdownToken = token;
    let timing = &config.timing;

    let jobs: Vec<Job<'_>> = config
        .contents
        .iter()
        .map(|c| Job::Text(c))
        .chain(config.cool.then_some(Job::Shout))
        .collect();
    let band = Band::new(top, jobs.len());
    let span = band.span();
    let expected = jobs.len();
    let lanes = band.split();

    let (tx, rx) = flume::unbounded();
    let completions = thread::scope(|s| {
        let _launcher = thread::Builder::new()
            .name("hozumi-launcher".into())
            .spawn_scoped(s, move || {
                for (i, (lane, job)) in lanes.into_iter().zip(jobs).enumerate() {
                    if i > 0 {
                        clock.sleep(ROW_STAGGER);
                    }
                    if token.is_triggered() {
                        break;
                    }
                    let lane_stage = LaneStage {
                        lane,
                        pending: None,
                        tx: tx.clone(),
                        clock,
                        token,
                    };
                    let spawned = thread::Builder::new()
                        .name(format!("hozumi-lane-{i}"))
                        .spawn_scoped(s, move || {
                            if let Err(e) = lane_stage.run(job, timing) {
                                log::debug!("Lane {i} stopped: {e}");
                            }
                        });
                    if let Err(e) = spawned {
                        log::error!("Impossible de lancer la ligne {i}: {e}");
                        token.trigger();
                        break;
                    }
                }
            })?;
        coordinate(rx, grid, renderer, &span, expected)
    })?;

    token.check()?;
    if completions < expected {
        bail!("band at row {top} ended with {completions}/{expected} lane(s)");
    }
    Ok(BandReport { completions })
}

/// Apply lane events to the grid until `expected` lanes are done or every
/// sender is gone. Flushes once per draw.
///
/// Takes the receiver by value: returning early drops it, which stops the
/// lanes at their next send.
#[allow(clippy::needless_pass_by_value)] // rx must be dropped on return
fn coordinate<R: GridRenderer>(
    rx: Receiver<RowEvent>,
    grid: &mut CellGrid,
    renderer: &mut R,
    span: &Range<usize>,
    expected: usize,
) -> Result<usize> {
    let mut completions = 0;
    while completions < expected {
        let Ok(event) = rx.recv() else { break };
        match event {
            RowEvent::Draw { row, line } => {
                if !span.contains(&row) {
                    log::warn!("Ignoring draw for row {row} outside band {span:?}");
                    continue;
                }
                grid.write_row(row, &line);
                renderer.render(grid)?;
            }
            RowEvent::Done { row } => {
                log::trace!("Row {row} done");
                completions += 1;
            }
        }
    }
    Ok(completions)
}
