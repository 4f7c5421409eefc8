//! In-memory renderers capturing every frame, for sequencer tests.

use std::collections::BTreeSet;

use anyhow::Result;
use hz_core::frame::{CellGrid, Line, Tone};
use hz_core::traits::{FrameRenderer, GridRenderer};

use crate::shutdown::ShutdownToken;

/// Scrolling renderer recording the text of each rendered frame.
#[derive(Default)]
pub struct RecordingStream {
    pub frames: Vec<Vec<String>>,
    pub erases: usize,
    pub settles: usize,
    /// Rows that carried a highlighted segment at least once.
    pub highlighted_rows: BTreeSet<usize>,
    halt: Option<(usize, ShutdownToken)>,
}

impl RecordingStream {
    /// Triggers `token` once `renders` frames have been drawn.
    pub fn halting_after(renders: usize, token: ShutdownToken) -> Self {
        Self {
            halt: Some((renders, token)),
            ..Self::default()
        }
    }
}

impl FrameRenderer for RecordingStream {
    type Frame = [Line];

    fn render(&mut self, frame: &[Line]) -> Result<()> {
        for (row, line) in frame.iter().enumerate() {
            if line.segments.iter().any(|s| s.tone == Tone::Highlight) {
                self.highlighted_rows.insert(row);
            }
        }
        self.frames.push(frame.iter().map(Line::text).collect());
        if let Some((limit, token)) = &self.halt
            && self.frames.len() >= *limit
        {
            token.trigger();
        }
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        self.erases += 1;
        Ok(())
    }

    fn settle(&mut self) {
        self.settles += 1;
    }
}

/// Grid renderer of a fixed size recording each row's text per flush.
pub struct RecordingGrid {
    width: u16,
    height: u16,
    pub frames: Vec<Vec<String>>,
    pub highlighted_rows: BTreeSet<usize>,
    halt: Option<(usize, ShutdownToken)>,
}

impl RecordingGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            highlighted_rows: BTreeSet::new(),
            halt: None,
        }
    }

    /// Triggers `token` once `renders` frames have been flushed.
    pub fn halting_after(mut self, renders: usize, token: ShutdownToken) -> Self {
        self.halt = Some((renders, token));
        self
    }

    /// Successive distinct texts of row `y`, in flush order.
    pub fn row_history(&self, y: usize) -> Vec<String> {
        let mut history: Vec<String> = Vec::new();
        for frame in &self.frames {
            let text = &frame[y];
            if !text.is_empty() && history.last() != Some(text) {
                history.push(text.clone());
            }
        }
        history
    }
}

impl FrameRenderer for RecordingGrid {
    type Frame = CellGrid;

    fn render(&mut self, grid: &CellGrid) -> Result<()> {
        for y in 0..grid.height {
            let highlighted = grid
                .row(y)
                .is_some_and(|cells| cells.iter().any(|c| c.tone == Tone::Highlight));
            if highlighted {
                self.highlighted_rows.insert(usize::from(y));
            }
        }
        self.frames
            .push((0..grid.height).map(|y| grid.row_text(y)).collect());
        if let Some((limit, token)) = &self.halt
            && self.frames.len() >= *limit
        {
            token.trigger();
        }
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        Ok(())
    }
}

impl GridRenderer for RecordingGrid {
    fn dimensions(&mut self) -> Result<(u16, u16)> {
        Ok((self.width, self.height))
    }
}
