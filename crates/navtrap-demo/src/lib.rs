#![forbid(unsafe_code)]

//! Scripted walkthrough of the navigation drawer.
//!
//! A script is a comma-separated list of steps. Each step is either a key
//! (`tab`, `shift+tab`, `esc`, `enter`, ...) dispatched to the drawer, or one
//! of the pseudo-steps `open` / `close` which click the trigger or the close
//! button. A frame runs after every step, so deferred focus moves land before
//! the transcript line is recorded.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use navtrap_core::event::{Event, KeyEvent, ParseKeyError};
use navtrap_widgets::drawer::{
    Activation, DrawerConfig, InitialFocus, NavLink, NavigationDrawer, TrapAction,
};
use serde::Serialize;

/// Script used when `--keys` is not given.
pub const DEFAULT_SCRIPT: &str = "open,tab,tab,shift+tab,escape";

/// Errors surfaced by the demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("invalid step {step:?} at position {position}: {source}")]
    Step {
        step: String,
        position: usize,
        #[source]
        source: ParseKeyError,
    },
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode transcript: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Transcript output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Initial focus choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitialFocusArg {
    Close,
    First,
}

impl From<InitialFocusArg> for InitialFocus {
    fn from(arg: InitialFocusArg) -> Self {
        match arg {
            InitialFocusArg::Close => Self::CloseControl,
            InitialFocusArg::First => Self::FirstFocusable,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "navtrap-demo", version, about = "Replay keys against the navigation drawer")]
pub struct Cli {
    /// Comma-separated steps: key names, `open`, or `close`.
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    pub keys: String,

    /// Number of navigation links in the drawer (the first is "Home").
    #[arg(long, default_value_t = 1)]
    pub links: usize,

    /// Where focus lands when the drawer opens.
    #[arg(long, value_enum)]
    pub initial_focus: Option<InitialFocusArg>,

    /// Keep the drawer open on Escape.
    #[arg(long)]
    pub no_escape: bool,

    /// JSON file with a drawer configuration; flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Resolve the drawer configuration from the config file and flags.
    pub fn drawer_config(&self) -> Result<DrawerConfig, DemoError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DrawerConfig::default(),
        };
        if let Some(initial) = self.initial_focus {
            config = config.initial_focus(initial.into());
        }
        if self.no_escape {
            config = config.close_on_escape(false);
        }
        Ok(config)
    }

    /// Link set for the drawer.
    #[must_use]
    pub fn nav_links(&self) -> Vec<NavLink> {
        (0..self.links)
            .map(|i| match i {
                0 => NavLink::new("Home", "/"),
                n => NavLink::new(format!("Page {n}"), format!("/page/{n}")),
            })
            .collect()
    }
}

/// Read a JSON drawer config. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<DrawerConfig, DemoError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DemoError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DemoError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// One script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Close,
    Key(KeyEvent),
}

impl FromStr for Step {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            _ => s.parse().map(Self::Key),
        }
    }
}

/// Parse a comma-separated script. Empty entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<(String, Step)>, DemoError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(position, raw)| {
            raw.parse::<Step>()
                .map(|step| (raw.to_string(), step))
                .map_err(|source| DemoError::Step {
                    step: raw.to_string(),
                    position,
                    source,
                })
        })
        .collect()
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub input: String,
    pub action: String,
    pub default_prevented: bool,
    pub open: bool,
    pub focused: Option<String>,
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<14} {:<6} focus={}",
            self.input,
            self.action,
            if self.open { "open" } else { "closed" },
            self.focused.as_deref().unwrap_or("-"),
        )?;
        if self.default_prevented {
            write!(f, " (default prevented)")?;
        }
        Ok(())
    }
}

fn describe_action(action: TrapAction) -> &'static str {
    match action {
        TrapAction::Ignored => "ignored",
        TrapAction::Passthrough => "passthrough",
        TrapAction::Closed => "closed",
        TrapAction::EmptySet => "empty-set",
        TrapAction::Entered(_) => "entered",
        TrapAction::Wrapped(_) => "wrapped",
    }
}

fn describe_activation(activation: &Activation) -> String {
    match activation {
        Activation::Opened => "opened".to_string(),
        Activation::Closed => "closed".to_string(),
        Activation::Navigated { href } => format!("navigate {href}"),
        Activation::Ignored => "ignored".to_string(),
    }
}

/// Run `steps` against a fresh drawer whose trigger starts focused.
pub fn run(
    config: DrawerConfig,
    links: Vec<NavLink>,
    steps: &[(String, Step)],
) -> Vec<TranscriptLine> {
    let mut nav = NavigationDrawer::new(config, links);
    nav.focus_trigger();

    let mut transcript = Vec::with_capacity(steps.len());
    for (input, step) in steps {
        let (action, default_prevented) = match *step {
            Step::Open => (describe_activation(&nav.activate(nav.trigger())), false),
            Step::Close => (describe_activation(&nav.activate(nav.close_button())), false),
            Step::Key(key) => {
                let outcome = nav.dispatch(&Event::Key(key));
                let action = match &outcome.activation {
                    Some(activation) => describe_activation(activation),
                    None => describe_action(outcome.action).to_string(),
                };
                (action, outcome.default_prevented)
            }
        };
        nav.tick();

        let line = TranscriptLine {
            input: input.clone(),
            action,
            default_prevented,
            open: nav.is_open(),
            focused: nav.focused_label().map(str::to_string),
        };
        tracing::info!(
            input = %line.input,
            action = %line.action,
            open = line.open,
            focused = line.focused.as_deref().unwrap_or("-"),
            "step"
        );
        transcript.push(line);
    }
    transcript
}

/// Render a transcript in the requested format.
pub fn render(transcript: &[TranscriptLine], format: OutputFormat) -> Result<String, DemoError> {
    match format {
        OutputFormat::Text => Ok(transcript
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transcript)?),
    }
}
