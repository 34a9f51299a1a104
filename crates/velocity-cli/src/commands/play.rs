//! `play` - drive a scenario in the terminal.
//!
//! Keyboard input is read line by line on a plain thread and forwarded over a
//! channel, so the play loop can `select!` between typed commands and
//! snapshot updates from the driver.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};
use velocity_config::{Config, validate};
use velocity_playback::{PlaybackDriver, PlaybackHandle, ScenarioCatalog, ScenarioDefinition};
use velocity_telemetry::{SessionContext, SessionGuard};

use crate::config_bridge;
use crate::render::{OutputFormat, Renderer};
use crate::theme::Theme;

/// Arguments for `velocity-demo play`.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct PlayArgs {
    /// Scenario id (default: `playback.default_scenario`, then the first built-in)
    pub(crate) scenario: Option<String>,

    /// Emit one JSON snapshot per line instead of progress bars
    #[arg(long)]
    pub(crate) json: bool,

    /// Continue past manual steps without waiting for input
    #[arg(long)]
    pub(crate) auto_confirm: bool,

    /// Override `playback.tick_interval_ms`
    #[arg(long, value_name = "MS")]
    pub(crate) tick_ms: Option<u64>,

    /// Override `playback.auto_advance_delay_ms`
    #[arg(long, value_name = "MS")]
    pub(crate) delay_ms: Option<u64>,
}

/// A line typed during playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlayCommand {
    Start,
    Pause,
    Reset,
    Advance,
    Select(String),
    Quit,
    Unknown(String),
}

impl PlayCommand {
    pub(crate) fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "" | "a" | "advance" | "n" | "next" => Self::Advance,
            "s" | "start" | "play" | "resume" => Self::Start,
            "p" | "pause" => Self::Pause,
            "r" | "reset" => Self::Reset,
            "q" | "quit" | "exit" => Self::Quit,
            "use" | "select" if !rest.is_empty() => Self::Select(rest.to_owned()),
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

/// Resolve which scenario to open.
fn pick_scenario(
    catalog: &ScenarioCatalog,
    requested: Option<&str>,
    configured: Option<&str>,
) -> anyhow::Result<Arc<ScenarioDefinition>> {
    if let Some(id) = requested {
        return Ok(catalog.require(id)?);
    }
    if let Some(id) = configured {
        return catalog
            .require(id)
            .with_context(|| format!("playback.default_scenario = \"{id}\""));
    }
    catalog.first().context("scenario catalog is empty")
}

/// Apply command-line overrides and re-validate.
fn effective_config(base: &Config, args: &PlayArgs) -> anyhow::Result<Config> {
    let mut config = base.clone();
    if let Some(ms) = args.tick_ms {
        config.playback.tick_interval_ms = ms;
    }
    if let Some(ms) = args.delay_ms {
        config.playback.auto_advance_delay_ms = ms;
    }
    validate::validate(&config)?;
    Ok(config)
}

fn spawn_stdin_reader() -> anyhow::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("velocity-stdin".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn input reader")?;
    Ok(rx)
}

pub(crate) async fn run_play(base: &Config, args: PlayArgs) -> anyhow::Result<()> {
    let config = effective_config(base, &args)?;
    let catalog = ScenarioCatalog::builtin();
    let scenario = pick_scenario(
        &catalog,
        args.scenario.as_deref(),
        config.playback.default_scenario.as_deref(),
    )?;

    let guard = SessionGuard::new(SessionContext::new("cli").with_scenario(scenario.id.clone()));
    let span = guard.span().clone();
    let result = play(&catalog, scenario, &config, &args).instrument(span).await;
    drop(guard);
    result
}

async fn play(
    catalog: &ScenarioCatalog,
    scenario: Arc<ScenarioDefinition>,
    config: &Config,
    args: &PlayArgs,
) -> anyhow::Result<()> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Pretty
    };
    let mut renderer = Renderer::new(std::io::stdout(), format);
    let driver_config = config_bridge::to_driver_config(&config.playback);
    info!(
        scenario = %scenario.id,
        tick_ms = config.playback.tick_interval_ms,
        delay_ms = config.playback.auto_advance_delay_ms,
        "Starting playback"
    );

    let handle = PlaybackDriver::spawn(Arc::clone(&scenario), driver_config);
    let mut input = spawn_stdin_reader()?;

    renderer.intro(&scenario, !args.auto_confirm)?;
    drive(
        catalog,
        scenario,
        &handle,
        &mut renderer,
        &mut input,
        args.auto_confirm,
    )
    .await?;

    renderer.finished(&handle.snapshot())?;
    handle.shutdown().await;
    Ok(())
}

/// Start playback and run it until completion or `quit`.
///
/// Once `input` closes, held steps are confirmed and a paused or reset run is
/// resumed, so the loop always reaches completion without further input.
async fn drive<W: Write>(
    catalog: &ScenarioCatalog,
    mut scenario: Arc<ScenarioDefinition>,
    handle: &PlaybackHandle,
    renderer: &mut Renderer<W>,
    input: &mut mpsc::UnboundedReceiver<String>,
    auto_confirm: bool,
) -> anyhow::Result<()> {
    let mut updates = handle.subscribe();
    let mut input_open = true;

    let first = handle.start().await?;
    renderer.snapshot(&scenario, &first)?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    debug!("Driver closed its snapshot channel");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                renderer.snapshot(&scenario, &snapshot)?;
                if snapshot.is_complete() {
                    break;
                }
                if snapshot.can_advance() && (auto_confirm || !input_open) {
                    let next = handle.advance().await?;
                    renderer.snapshot(&scenario, &next)?;
                }
            },
            line = input.recv(), if input_open => {
                let Some(line) = line else {
                    debug!("Input closed, continuing without confirmation");
                    input_open = false;
                    let current = handle.snapshot();
                    let snapshot = if current.can_advance() {
                        handle.advance().await?
                    } else if !current.is_playing && !current.is_complete() {
                        renderer.notice(&Theme::info("Input closed, resuming playback"))?;
                        handle.start().await?
                    } else {
                        continue;
                    };
                    renderer.snapshot(&scenario, &snapshot)?;
                    if snapshot.is_complete() {
                        break;
                    }
                    continue;
                };
                let snapshot = match PlayCommand::parse(&line) {
                    PlayCommand::Start => handle.start().await?,
                    PlayCommand::Pause => handle.pause().await?,
                    PlayCommand::Reset => handle.reset().await?,
                    PlayCommand::Advance => handle.advance().await?,
                    PlayCommand::Quit => break,
                    PlayCommand::Select(id) => {
                        let Some(next) = catalog.get(&id) else {
                            renderer.notice(&Theme::error(&format!("Unknown scenario '{id}'")))?;
                            continue;
                        };
                        scenario = next;
                        handle.select(Arc::clone(&scenario)).await?;
                        renderer.intro(&scenario, !auto_confirm)?;
                        handle.start().await?
                    },
                    PlayCommand::Unknown(text) => {
                        renderer.notice(&Theme::error(&format!("Unknown command '{text}'")))?;
                        continue;
                    },
                };
                renderer.snapshot(&scenario, &snapshot)?;
                if snapshot.is_complete() {
                    break;
                }
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use velocity_config::ConfigError;
    use velocity_playback::{DriverConfig, PlaybackSnapshot};

    use super::*;

    fn fast_driver() -> DriverConfig {
        DriverConfig::default()
            .with_tick_interval(Duration::from_millis(50))
            .with_auto_advance_delay(Duration::ZERO)
    }

    /// Feed `lines` to `drive`, close the input and collect the output.
    async fn drive_scripted(scenario_id: &str, lines: &[&str]) -> (PlaybackSnapshot, String) {
        colored::control::set_override(false);
        let catalog = ScenarioCatalog::builtin();
        let scenario = catalog.require(scenario_id).unwrap();
        let handle = PlaybackDriver::spawn(Arc::clone(&scenario), fast_driver());
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Pretty);

        let (tx, mut rx) = mpsc::unbounded_channel();
        for line in lines {
            tx.send((*line).to_owned()).unwrap();
        }
        drop(tx);

        tokio::time::timeout(
            Duration::from_secs(600),
            drive(&catalog, scenario, &handle, &mut renderer, &mut rx, false),
        )
        .await
        .expect("playback should finish once input closes")
        .unwrap();

        let snapshot = handle.snapshot();
        handle.shutdown().await;
        (snapshot, String::from_utf8(renderer.into_inner()).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_resumes_a_paused_run() {
        let (snapshot, out) = drive_scripted("vendor-review", &["p"]).await;
        assert!(snapshot.is_complete());
        assert!(out.contains("Input closed, resuming playback"));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_restarts_a_reset_run() {
        let (snapshot, _) = drive_scripted("audit-readiness", &["r"]).await;
        assert!(snapshot.is_complete());
        assert!(snapshot.step_completed.iter().all(|done| *done));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_input_is_reported_and_playback_continues() {
        let (snapshot, out) = drive_scripted("evidence-sweep", &["rewind", "use nowhere"]).await;
        assert!(snapshot.is_complete());
        assert!(out.contains("Unknown command 'rewind'"));
        assert!(out.contains("Unknown scenario 'nowhere'"));
    }

    #[test]
    fn parses_single_letter_commands() {
        assert_eq!(PlayCommand::parse("s"), PlayCommand::Start);
        assert_eq!(PlayCommand::parse(" P "), PlayCommand::Pause);
        assert_eq!(PlayCommand::parse("r"), PlayCommand::Reset);
        assert_eq!(PlayCommand::parse("a"), PlayCommand::Advance);
        assert_eq!(PlayCommand::parse("q"), PlayCommand::Quit);
    }

    #[test]
    fn empty_line_advances() {
        assert_eq!(PlayCommand::parse(""), PlayCommand::Advance);
        assert_eq!(PlayCommand::parse("   "), PlayCommand::Advance);
    }

    #[test]
    fn select_takes_an_id() {
        assert_eq!(
            PlayCommand::parse("use vendor-review"),
            PlayCommand::Select("vendor-review".to_owned())
        );
        assert_eq!(
            PlayCommand::parse("select  gdpr-transfer "),
            PlayCommand::Select("gdpr-transfer".to_owned())
        );
        assert_eq!(
            PlayCommand::parse("use"),
            PlayCommand::Unknown("use".to_owned())
        );
    }

    #[test]
    fn unknown_input_is_kept_verbatim() {
        assert_eq!(
            PlayCommand::parse("rewind 3"),
            PlayCommand::Unknown("rewind 3".to_owned())
        );
    }

    #[test]
    fn scenario_precedence() {
        let catalog = ScenarioCatalog::builtin();
        let first = catalog.first().unwrap();

        assert_eq!(pick_scenario(&catalog, None, None).unwrap().id, first.id);
        assert_eq!(
            pick_scenario(&catalog, None, Some("gdpr-transfer")).unwrap().id,
            "gdpr-transfer"
        );
        assert_eq!(
            pick_scenario(&catalog, Some("vendor-review"), Some("gdpr-transfer"))
                .unwrap()
                .id,
            "vendor-review"
        );
        assert!(pick_scenario(&catalog, Some("missing"), None).is_err());
        assert!(pick_scenario(&catalog, None, Some("missing")).is_err());
    }

    #[test]
    fn overrides_are_validated() {
        let base = Config::default();
        let args = PlayArgs {
            tick_ms: Some(100),
            delay_ms: Some(0),
            ..PlayArgs::default()
        };
        let config = effective_config(&base, &args).unwrap();
        assert_eq!(config.playback.tick_interval_ms, 100);
        assert_eq!(config.playback.auto_advance_delay_ms, 0);

        let too_fast = PlayArgs {
            tick_ms: Some(1),
            ..PlayArgs::default()
        };
        let err = effective_config(&base, &too_fast).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ValidationError { .. })
        ));
    }
}
