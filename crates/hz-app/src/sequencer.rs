use std::time::Duration;

use anyhow::Result;
use hz_core::clock::Clock;
use hz_core::config::WriterConfig;
use hz_core::frame::{CellGrid, Dashboard, Line, Tone};
use hz_core::reveal::{SHOUT, letters, prefixes};
use hz_core::timing::{ROW_STAGGER, Timing};
use hz_core::traits::{FrameRenderer, GridRenderer};

use crate::fanout;
use crate::shutdown::ShutdownToken;

/// Surface the reveal logic draws on.
///
/// Implemented by [`ScrollStage`], [`GridStage`] and the fan-out lanes.
pub trait Stage {
    /// Replace the content of display row `row`.
    fn set_row(&mut self, row: usize, line: Line);

    /// Show the current state and hold it for `hold`.
    ///
    /// # Errors
    /// Returns an error if drawing fails or a stop was requested.
    fn present(&mut self, hold: Duration) -> Result<()>;
}

/// Reveal one content string on `row`.
///
/// Single-letter flicker (each character alone, `timing.row` each), then the
/// typewriter prefix (one character longer per frame, `timing.letter` each),
/// then one more `timing.row` hold on the full string.
///
/// # Errors
/// Propagates the stage's errors.
pub fn reveal_row<S: Stage + ?Sized>(
    stage: &mut S,
    row: usize,
    content: &str,
    timing: &Timing,
) -> Result<()> {
    for letter in letters(content) {
        stage.set_row(row, Line::plain(letter));
        stage.present(timing.row)?;
    }
    for prefix in prefixes(content) {
        stage.set_row(row, Line::plain(prefix));
        stage.present(timing.letter)?;
    }
    stage.set_row(row, Line::plain(content));
    stage.present(timing.row)
}

/// Reveal the shout banner on `row`, one character per `timing.cool`.
///
/// # Errors
/// Propagates the stage's errors.
pub fn shout_row<S: Stage + ?Sized>(stage: &mut S, row: usize, timing: &Timing) -> Result<()> {
    for prefix in prefixes(SHOUT) {
        stage.set_row(row, Line::toned(prefix, Tone::Highlight));
        stage.present(timing.cool)?;
    }
    Ok(())
}

/// Scrolling-mode stage: owns the dashboard, reprints and erases it per frame.
pub struct ScrollStage<R, C> {
    board: Dashboard,
    renderer: R,
    clock: C,
    token: ShutdownToken,
}

impl<R, C> ScrollStage<R, C>
where
    R: FrameRenderer<Frame = [Line]>,
    C: Clock,
{
    /// Stage with an empty dashboard.
    pub fn new(renderer: R, clock: C, token: ShutdownToken) -> Self {
        Self {
            board: Dashboard::new(),
            renderer,
            clock,
            token,
        }
    }

    /// Replace every row at once (dance frames).
    pub fn show(&mut self, lines: Vec<Line>) {
        self.board.replace(lines);
    }

    /// Print the dashboard one last time and leave it on screen, then start
    /// over with an empty one.
    ///
    /// # Errors
    /// Returns an error if the terminal write fails.
    pub fn settle(&mut self) -> Result<()> {
        if !self.board.is_empty() {
            self.renderer.render(self.board.lines())?;
            self.renderer.settle();
        }
        self.board.clear();
        Ok(())
    }

    /// Current rows.
    pub fn board(&self) -> &Dashboard {
        &self.board
    }

    /// Renderer, for inspection.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R, C> Stage for ScrollStage<R, C>
where
    R: FrameRenderer<Frame = [Line]>,
    C: Clock,
{
    fn set_row(&mut self, row: usize, line: Line) {
        self.board.set(row, line);
    }

    fn present(&mut self, hold: Duration) -> Result<()> {
        self.renderer.render(self.board.lines())?;
        self.clock.sleep(hold);
        self.renderer.erase()?;
        // Arrêt vu à la fin du maintien : au plus 600 ms (palier low).
        self.token.check()?;
        Ok(())
    }
}

/// Grid-mode stage: owns the cell grid and flushes it whole every frame.
pub struct GridStage<R, C> {
    pub(crate) grid: CellGrid,
    pub(crate) renderer: R,
    pub(crate) clock: C,
    pub(crate) token: ShutdownToken,
}

impl<R: GridRenderer, C: Clock> GridStage<R, C> {
    /// Stage with an empty grid; sized by [`resize`](Self::resize).
    pub fn new(renderer: R, clock: C, token: ShutdownToken) -> Self {
        Self {
            grid: CellGrid::new(0, 0),
            renderer,
            clock,
            token,
        }
    }

    /// Query the terminal and start from a blank grid of that size.
    ///
    /// # Errors
    /// Returns an error if the terminal size cannot be read.
    pub fn resize(&mut self) -> Result<(u16, u16)> {
        let (width, height) = self.renderer.dimensions()?;
        self.grid = CellGrid::new(width, height);
        log::debug!("Grid sized to {width}×{height}");
        Ok((width, height))
    }

    /// Blank the grid and flush it.
    ///
    /// # Errors
    /// Returns an error if the terminal write fails.
    pub fn blank(&mut self) -> Result<()> {
        self.grid.clear();
        self.renderer.render(&self.grid)
    }

    /// Current grid.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Renderer, for inspection.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: GridRenderer, C: Clock> Stage for GridStage<R, C> {
    fn set_row(&mut self, row: usize, line: Line) {
        self.grid.write_row(row, &line);
    }

    fn present(&mut self, hold: Duration) -> Result<()> {
        self.renderer.render(&self.grid)?;
        self.clock.sleep(hold);
        // Arrêt vu à la fin du maintien : au plus 600 ms (palier low).
        self.token.check()?;
        Ok(())
    }
}

/// Drives reveal cycles over the configured contents.
pub struct Sequencer<'a> {
    config: &'a WriterConfig,
}

impl<'a> Sequencer<'a> {
    /// Sequencer over `config`.
    #[must_use]
    pub fn new(config: &'a WriterConfig) -> Self {
        Self { config }
    }

    /// Rows taken by one band: every content string, plus the shout.
    #[must_use]
    pub fn band_height(&self) -> usize {
        self.config.contents.len() + usize::from(self.config.cool)
    }

    /// One reveal cycle in scrolling mode, left on screen at the end.
    ///
    /// # Errors
    /// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
    pub fn scroll_cycle<R, C>(&self, stage: &mut ScrollStage<R, C>) -> Result<()>
    where
        R: FrameRenderer<Frame = [Line]>,
        C: Clock,
    {
        let timing = &self.config.timing;
        for (row, content) in self.config.contents.iter().enumerate() {
            reveal_row(stage, row, content, timing)?;
        }
        if self.config.cool {
            shout_row(stage, self.config.contents.len(), timing)?;
        }
        stage.settle()
    }

    /// Scrolling mode forever. Only returns with an error or a halt.
    ///
    /// # Errors
    /// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
    pub fn run_scroll<R, C>(&self, stage: &mut ScrollStage<R, C>) -> Result<()>
    where
        R: FrameRenderer<Frame = [Line]>,
        C: Clock,
    {
        log::info!(
            "Scrolling mode: {} row(s), cool={}",
            self.config.contents.len(),
            self.config.cool
        );
        loop {
            self.scroll_cycle(stage)?;
        }
    }

    /// One pass over the screen in grid mode.
    ///
    /// The terminal is measured once, bands are drawn top to bottom while a
    /// whole band still fits (the first band always runs, clipped if the
    /// screen is too short), then the grid is cleared.
    ///
    /// # Errors
    /// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
    pub fn grid_pass<R: GridRenderer, C: Clock>(&self, stage: &mut GridStage<R, C>) -> Result<()> {
        let (_, height) = stage.resize()?;
        let height = usize::from(height);
        let band = self.band_height();
        stage.blank()?;

        let mut top = 0;
        loop {
            if self.config.parallel {
                let report = fanout::run_band(stage, self.config, top)?;
                log::trace!("Band at row {top}: {} completion(s)", report.completions);
            } else {
                self.sequential_band(stage, top)?;
            }
            top += band;
            if top + band > height {
                break;
            }
        }

        log::debug!("Screen full after {top} row(s), wrapping");
        stage.blank()
    }

    /// Grid mode forever. Only returns with an error or a halt.
    ///
    /// # Errors
    /// Propagates drawing errors and [`Halted`](crate::shutdown::Halted).
    pub fn run_grid<R: GridRenderer, C: Clock>(&self, stage: &mut GridStage<R, C>) -> Result<()> {
        log::info!(
            "Grid mode: {} row(s), cool={}, parallel={}",
            self.config.contents.len(),
            self.config.cool,
            self.config.parallel
        );
        loop {
            self.grid_pass(stage)?;
        }
    }

    fn sequential_band<R: GridRenderer, C: Clock>(
        &self,
        stage: &mut GridStage<R, C>,
        top: usize,
    ) -> Result<()> {
        let timing = &self.config.timing;
        for (i, content) in self.config.contents.iter().enumerate() {
            reveal_row(stage, top + i, content, timing)?;
            stage.present(ROW_STAGGER)?;
        }
        if self.config.cool {
            shout_row(stage, top + self.config.contents.len(), timing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::is_halt;
    use crate::testing::{RecordingGrid, RecordingStream};
    use hz_core::clock::ManualClock;
    use hz_core::reveal::DEFAULT_CONTENT;
    use hz_core::timing::SpeedTier;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config(contents: &[&str], tier: SpeedTier, cool: bool) -> WriterConfig {
        WriterConfig {
            contents: contents.iter().map(ToString::to_string).collect(),
            timing: Timing::for_tier(tier),
            cool,
            ..WriterConfig::default()
        }
    }

    fn scroll_stage(clock: &ManualClock) -> ScrollStage<RecordingStream, &ManualClock> {
        ScrollStage::new(RecordingStream::default(), clock, ShutdownToken::new())
    }

    #[test]
    fn two_rows_high_speed_cycle() {
        let config = config(&["A", "B"], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        Sequencer::new(&config).scroll_cycle(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        assert_eq!(
            frames,
            &[
                vec!["A"],
                vec!["A"],
                vec!["A"],
                vec!["A", "B"],
                vec!["A", "B"],
                vec!["A", "B"],
                // Frame laissée à l'écran en fin de cycle.
                vec!["A", "B"],
            ]
        );
        assert_eq!(
            clock.holds(),
            [ms(150), ms(90), ms(150), ms(150), ms(90), ms(150)]
        );
        assert_eq!(stage.renderer().erases, 6);
        assert_eq!(stage.renderer().settles, 1);
    }

    #[test]
    fn cycle_restarts_from_first_row() {
        let config = config(&["A", "B"], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        let sequencer = Sequencer::new(&config);
        sequencer.scroll_cycle(&mut stage).unwrap();
        let first: Vec<_> = stage.renderer().frames.clone();
        sequencer.scroll_cycle(&mut stage).unwrap();
        assert_eq!(stage.renderer().frames[first.len()..], first[..]);
        assert!(stage.board().is_empty());
    }

    #[test]
    fn default_content_reveals_three_characters() {
        let config = config(&[DEFAULT_CONTENT], SpeedTier::Middle, false);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        Sequencer::new(&config).scroll_cycle(&mut stage).unwrap();

        let texts: Vec<&str> = stage.renderer().frames[..7]
            .iter()
            .map(|f| f[0].as_str())
            .collect();
        assert_eq!(texts, ["ほ", "ず", "み", "ほ", "ほず", "ほずみ", "ほずみ"]);
        assert_eq!(
            clock.holds(),
            [ms(300), ms(300), ms(300), ms(180), ms(180), ms(180), ms(300)]
        );
    }

    #[test]
    fn prefix_state_emits_one_frame_per_character() {
        let content = "aほ!z";
        let config = config(&[content], SpeedTier::Low, false);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        Sequencer::new(&config).scroll_cycle(&mut stage).unwrap();

        let n = content.chars().count();
        let prefix_frames = &stage.renderer().frames[n..2 * n];
        for (i, frame) in prefix_frames.iter().enumerate() {
            assert_eq!(frame[0].chars().count(), i + 1);
            assert!(content.starts_with(frame[0].as_str()));
        }
        let holds = clock.holds();
        assert!(holds[n..2 * n].iter().all(|&h| h == ms(270)));
    }

    #[test]
    fn empty_content_holds_once() {
        let config = config(&[""], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        Sequencer::new(&config).scroll_cycle(&mut stage).unwrap();
        assert_eq!(clock.holds(), [ms(150)]);
        assert_eq!(stage.renderer().frames[0], [""]);
    }

    #[test]
    fn cool_appends_highlighted_shout_row() {
        let config = config(&["A"], SpeedTier::High, true);
        let clock = ManualClock::new();
        let mut stage = scroll_stage(&clock);
        Sequencer::new(&config).scroll_cycle(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        let shout: Vec<&Vec<String>> = frames[3..frames.len() - 1].iter().collect();
        assert_eq!(shout.len(), 88);
        assert_eq!(shout[0], &["A", "C"]);
        assert_eq!(shout[87][1], SHOUT);
        assert!(stage.renderer().highlighted_rows.contains(&1));

        let holds = clock.holds();
        assert_eq!(holds.len(), 3 + 88);
        assert!(holds[3..].iter().all(|&h| h == ms(10)));
    }

    #[test]
    fn run_scroll_stops_on_halt() {
        let config = config(&["A", "B"], SpeedTier::High, true);
        let clock = ManualClock::new();
        let token = ShutdownToken::new();
        let renderer = RecordingStream::halting_after(500, token.clone());
        let mut stage = ScrollStage::new(renderer, &clock, token);
        let err = Sequencer::new(&config).run_scroll(&mut stage).unwrap_err();
        assert!(is_halt(&err));
        // Plus d'un cycle complet avant l'arrêt.
        assert!(stage.renderer().settles >= 1);
        // La dernière frame affichée a été effacée.
        assert_eq!(stage.renderer().erases, clock.count());
    }

    #[test]
    fn grid_pass_fills_screen_then_clears() {
        let config = config(&["ab"], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = GridStage::new(RecordingGrid::new(10, 3), &clock, ShutdownToken::new());
        Sequencer::new(&config).grid_pass(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        let full = &frames[frames.len() - 2];
        assert_eq!(full, &["ab", "ab", "ab"]);
        assert_eq!(frames.last().unwrap(), &["", "", ""]);

        // Par ligne : 2 lettres, 2 préfixes, 1 maintien, 1 décalage.
        let per_row = [ms(150), ms(150), ms(90), ms(90), ms(150), ROW_STAGGER];
        assert_eq!(clock.holds(), per_row.repeat(3));
    }

    #[test]
    fn grid_letter_state_flickers_single_characters() {
        let config = config(&["abc"], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = GridStage::new(RecordingGrid::new(10, 1), &clock, ShutdownToken::new());
        Sequencer::new(&config).grid_pass(&mut stage).unwrap();

        let row0: Vec<&str> = stage.renderer().frames[1..4]
            .iter()
            .map(|f| f[0].as_str())
            .collect();
        assert_eq!(row0, ["a", "b", "c"]);
    }

    #[test]
    fn grid_pass_wraps_before_partial_band() {
        let config = config(&["x", "y"], SpeedTier::High, false);
        let clock = ManualClock::new();
        let mut stage = GridStage::new(RecordingGrid::new(4, 5), &clock, ShutdownToken::new());
        Sequencer::new(&config).grid_pass(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        assert_eq!(frames[frames.len() - 2], ["x", "y", "x", "y", ""]);
    }

    #[test]
    fn grid_band_taller_than_screen_is_clipped() {
        let config = config(&["x", "y", "z"], SpeedTier::High, true);
        let clock = ManualClock::new();
        let mut stage = GridStage::new(RecordingGrid::new(4, 2), &clock, ShutdownToken::new());
        Sequencer::new(&config).grid_pass(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        assert_eq!(frames[frames.len() - 2], ["x", "y"]);
        // Les lignes hors écran restent cadencées : 4 maintiens par ligne d'un caractère.
        assert_eq!(clock.count(), 3 * 4 + 88);
    }

    #[test]
    fn grid_shout_row_is_highlighted() {
        let config = config(&["x"], SpeedTier::High, true);
        let clock = ManualClock::new();
        let mut stage = GridStage::new(RecordingGrid::new(100, 2), &clock, ShutdownToken::new());
        Sequencer::new(&config).grid_pass(&mut stage).unwrap();

        let frames = &stage.renderer().frames;
        assert_eq!(frames[frames.len() - 2][1], SHOUT);
        assert!(stage.renderer().highlighted_rows.contains(&1));
    }
}
