//! Terminal rendering of playback snapshots.
//!
//! The driver publishes a snapshot on every tick, including ticks that only
//! move the elapsed clock while a step is held. [`Renderer`] collapses those
//! into frames keyed on what is actually visible.

use std::io::{self, Write};

use velocity_playback::{PlaybackPhase, PlaybackSnapshot, ScenarioDefinition};

use crate::theme::{Theme, format_elapsed};

/// Width of the per-step progress bar in cells.
const BAR_WIDTH: usize = 30;

/// Output format for the play loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OutputFormat {
    /// Human-readable progress lines.
    #[default]
    Pretty,
    /// One JSON snapshot per line.
    Json,
}

/// Fields that decide whether a snapshot is a new frame.
#[derive(Debug, Clone, PartialEq)]
struct FrameKey {
    scenario_id: String,
    step: Option<usize>,
    progress: f64,
    phase: PlaybackPhase,
    is_playing: bool,
}

impl FrameKey {
    fn of(snapshot: &PlaybackSnapshot) -> Self {
        Self {
            scenario_id: snapshot.scenario_id.clone(),
            step: snapshot.current_step_index,
            progress: snapshot.progress_percent,
            phase: snapshot.phase,
            is_playing: snapshot.is_playing,
        }
    }
}

/// Stateful writer of playback frames.
pub(crate) struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
    last_frame: Option<FrameKey>,
    entered: Option<(String, usize)>,
    revealed: Option<(String, usize)>,
    prompted: Option<(String, usize)>,
}

impl<W: Write> Renderer<W> {
    pub(crate) fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            last_frame: None,
            entered: None,
            revealed: None,
            prompted: None,
        }
    }

    /// Scenario banner. Silent in JSON mode.
    pub(crate) fn intro(&mut self, scenario: &ScenarioDefinition, interactive: bool) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.out, "{}", Theme::header(&scenario.title))?;
        writeln!(self.out, "{}", Theme::dimmed(&scenario.description))?;
        writeln!(
            self.out,
            "{}",
            Theme::dimmed(&format!(
                "{} steps, {} nominal",
                scenario.len(),
                format_elapsed(scenario.total_duration_seconds())
            ))
        )?;
        if interactive {
            writeln!(
                self.out,
                "{}",
                Theme::dimmed("Commands: [s]tart [p]ause [r]eset [a]dvance (or Enter), use <id>, [q]uit")
            )?;
        }
        writeln!(self.out, "{}", Theme::separator())
    }

    /// Render `snapshot` if it differs visibly from the previous frame.
    ///
    /// Returns whether anything was written.
    pub(crate) fn snapshot(
        &mut self,
        scenario: &ScenarioDefinition,
        snapshot: &PlaybackSnapshot,
    ) -> io::Result<bool> {
        let key = FrameKey::of(snapshot);
        if self.last_frame.as_ref() == Some(&key) {
            return Ok(false);
        }
        if self
            .last_frame
            .as_ref()
            .is_some_and(|last| last.scenario_id != key.scenario_id)
        {
            self.entered = None;
            self.revealed = None;
            self.prompted = None;
        }
        if key.step.is_none() {
            self.entered = None;
            self.revealed = None;
            self.prompted = None;
        }
        self.last_frame = Some(key);

        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(snapshot).map_err(io::Error::other)?;
                writeln!(self.out, "{line}")?;
            },
            OutputFormat::Pretty => self.pretty(scenario, snapshot)?,
        }
        self.out.flush()?;
        Ok(true)
    }

    fn pretty(&mut self, scenario: &ScenarioDefinition, snapshot: &PlaybackSnapshot) -> io::Result<()> {
        let Some(index) = snapshot.current_step_index else {
            return writeln!(
                self.out,
                "{} {}",
                Theme::step_marker(snapshot),
                Theme::dimmed("Ready")
            );
        };
        let Some(step) = scenario.step(index) else {
            return Ok(());
        };
        let marker = (snapshot.scenario_id.clone(), index);

        if self.entered.as_ref() != Some(&marker) {
            writeln!(
                self.out,
                "\n{}",
                Theme::header(&format!("[{}/{}] {}", index.saturating_add(1), scenario.len(), step.title))
            )?;
            writeln!(self.out, "{}", Theme::dimmed(&step.description))?;
            self.entered = Some(marker.clone());
        }

        writeln!(
            self.out,
            "{} {} {:>5.1}%  overall {:>5.1}%  {}{}",
            Theme::step_marker(snapshot),
            Theme::progress_bar(snapshot.progress_percent, BAR_WIDTH),
            snapshot.progress_percent,
            snapshot.overall_progress_percent,
            format_elapsed(snapshot.elapsed_seconds),
            if snapshot.is_playing { "" } else { "  (paused)" },
        )?;

        if let Some(payload) = &snapshot.revealed_payload
            && self.revealed.as_ref() != Some(&marker)
        {
            for (key, value) in payload {
                writeln!(self.out, "    {} {value}", Theme::dimmed(&format!("{key}:")))?;
            }
            self.revealed = Some(marker.clone());
        }

        if snapshot.phase == PlaybackPhase::Held && self.prompted.as_ref() != Some(&marker) {
            writeln!(self.out, "{}", Theme::info("Step complete. Press Enter to continue."))?;
            self.prompted = Some(marker);
        }
        Ok(())
    }

    /// A one-off message outside the frame stream. Skipped in JSON mode.
    pub(crate) fn notice(&mut self, message: &str) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.out, "{message}")
    }

    /// Closing summary.
    pub(crate) fn finished(&mut self, snapshot: &PlaybackSnapshot) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(self.out, "{}", Theme::separator())?;
        let line = if snapshot.is_complete() {
            Theme::success(&format!(
                "{} complete in {}",
                snapshot.scenario_title,
                format_elapsed(snapshot.elapsed_seconds)
            ))
        } else {
            Theme::warning(&format!(
                "{} stopped at {:.1}%",
                snapshot.scenario_title, snapshot.overall_progress_percent
            ))
        };
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use velocity_playback::{PlaybackEvent, PlaybackState, ScenarioCatalog};

    use super::*;

    fn text(renderer: Renderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn json_frames_skip_elapsed_only_changes() {
        let scenario = ScenarioCatalog::builtin().first().unwrap();
        let mut state = PlaybackState::new(scenario.clone());
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Json);

        assert!(renderer.snapshot(&scenario, &state.snapshot()).unwrap());
        assert!(!renderer.snapshot(&scenario, &state.snapshot()).unwrap());

        state.apply(PlaybackEvent::Start);
        assert!(renderer.snapshot(&scenario, &state.snapshot()).unwrap());

        let mut elapsed_only = state.snapshot();
        elapsed_only.elapsed_seconds = elapsed_only.elapsed_seconds.saturating_add(1);
        assert!(!renderer.snapshot(&scenario, &elapsed_only).unwrap());

        let out = text(renderer);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let frame: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(frame["scenario_id"], scenario.id.as_str());
        assert_eq!(frame["current_step_index"], 0);
        assert_eq!(frame["is_playing"], true);
    }

    #[test]
    fn pretty_reveals_payload_once_per_step() {
        colored::control::set_override(false);
        let scenario = ScenarioCatalog::builtin().first().unwrap();
        let step = scenario.step(0).unwrap().clone();
        let mut state = PlaybackState::new(scenario.clone());
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Pretty);

        state.apply(PlaybackEvent::Start);
        renderer.snapshot(&scenario, &state.snapshot()).unwrap();
        for _ in 0..step.duration_seconds {
            state.apply(PlaybackEvent::Tick);
            renderer.snapshot(&scenario, &state.snapshot()).unwrap();
        }
        state.apply(PlaybackEvent::Pause);
        renderer.snapshot(&scenario, &state.snapshot()).unwrap();

        let out = text(renderer);
        assert_eq!(out.matches(&step.title).count(), 1);
        assert!(out.contains("(paused)"));
        if let Some((key, _)) = step.payload.iter().next() {
            assert_eq!(out.matches(&format!("{key}:")).count(), 1);
        }
    }

    #[test]
    fn pretty_prompts_once_for_held_step() {
        colored::control::set_override(false);
        let scenario = ScenarioCatalog::builtin()
            .iter()
            .find(|s| s.steps.iter().any(|step| !step.auto_advance))
            .cloned()
            .unwrap();
        let mut state = PlaybackState::new(scenario.clone());
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Pretty);

        state.apply(PlaybackEvent::Start);
        for _ in 0..scenario.total_duration_seconds().saturating_add(5) {
            state.apply(PlaybackEvent::Tick);
            renderer.snapshot(&scenario, &state.snapshot()).unwrap();
            if state.snapshot().phase == PlaybackPhase::Held {
                break;
            }
        }
        state.apply(PlaybackEvent::Tick);
        renderer.snapshot(&scenario, &state.snapshot()).unwrap();

        let out = text(renderer);
        assert_eq!(out.matches("Press Enter to continue").count(), 1);
    }

    #[test]
    fn json_mode_skips_banner_and_notices() {
        let scenario = ScenarioCatalog::builtin().first().unwrap();
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Json);
        renderer.intro(&scenario, true).unwrap();
        renderer.notice("hello").unwrap();
        assert!(text(renderer).is_empty());
    }

    #[test]
    fn finished_reports_stop_point() {
        colored::control::set_override(false);
        let scenario = ScenarioCatalog::builtin().first().unwrap();
        let mut state = PlaybackState::new(scenario.clone());
        state.apply(PlaybackEvent::Start);
        state.apply(PlaybackEvent::Tick);

        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Pretty);
        renderer.finished(&state.snapshot()).unwrap();
        let out = text(renderer);
        assert!(out.contains("stopped at"));
        assert!(out.contains(&scenario.title));
    }
}
