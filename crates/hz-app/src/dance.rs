//! Dancing logo shown with `--graphical`.
//!
//! The five-line HOZUMI logo swings right one column per frame up to
//! [`MAX_INDENT`], then back to the margin, forever.

use anyhow::Result;
use hz_core::clock::Clock;
use hz_core::frame::{Line, Tone};
use hz_core::timing::Timing;
use hz_core::traits::FrameRenderer;

use crate::sequencer::{ScrollStage, Stage};

/// Largest indent reached by the swing, in columns.
pub const MAX_INDENT: usize = 40;

/// Letter blocks of each logo line: H, O, Z, U, M, I.
const LOGO: [[&str; 6]; 5] = [
    ["-  -  ", "----  ", "----  ", "-  -  ", "-   -  ", "--- "],
    ["-  -  ", "-  -  ", "  -   ", "-  -  ", "-- --  ", " -  "],
    ["----  ", "-  -  ", " -    ", "-  -  ", "- - -  ", " -  "],
    ["-  -  ", "-  -  ", "-     ", "-  -  ", "-   -  ", " -  "],
    ["-  -  ", "----  ", "----  ", "----  ", "-   -  ", "--- "],
];

/// Letters alternate between the two tones, starting with the highlight.
fn letter_tone(index: usize) -> Tone {
    if index % 2 == 0 {
        Tone::Highlight
    } else {
        Tone::Accent
    }
}

/// Indents of one full swing: `0, 1, …, 40, 40, …, 1, 0`.
///
/// # Example
/// ```
/// use hz_app::dance::{MAX_INDENT, dance_offsets};
/// let offsets: Vec<usize> = dance_offsets().collect();
/// assert_eq!(offsets.len(), 2 * (MAX_INDENT + 1));
/// assert_eq!(offsets[MAX_INDENT], offsets[MAX_INDENT + 1]);
/// ```
pub fn dance_offsets() -> impl Iterator<Item = usize> {
    (0..=MAX_INDENT).chain((0..=MAX_INDENT).rev())
}

/// The logo shifted right by `indent` spaces.
#[must_use]
pub fn logo_frame(indent: usize) -> Vec<Line> {
    LOGO.iter()
        .map(|letters| {
            letters.iter().enumerate().fold(
                Line::plain(" ".repeat(indent)),
                |line, (i, block)| line.with(*block, letter_tone(i)),
            )
        })
        .collect()
}

/// One full swing, each frame held for `timing.letter`.
///
/// # Errors
/// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
pub fn swing<R, C>(stage: &mut ScrollStage<R, C>, timing: &Timing) -> Result<()>
where
    R: FrameRenderer<Frame = [Line]>,
    C: Clock,
{
    for indent in dance_offsets() {
        stage.show(logo_frame(indent));
        stage.present(timing.letter)?;
    }
    Ok(())
}

/// Dance forever. Only returns with an error or a halt.
///
/// # Errors
/// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
pub fn run<R, C>(stage: &mut ScrollStage<R, C>, timing: &Timing) -> Result<()>
where
    R: FrameRenderer<Frame = [Line]>,
    C: Clock,
{
    log::info!("Graphical mode, holding {:?} per frame", timing.letter);
    loop {
        swing(stage, timing)?;
    }
}
