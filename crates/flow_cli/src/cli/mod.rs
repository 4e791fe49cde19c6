use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use flow_core::config::{ConfigOverrides, canonical_key};

#[derive(Parser, Debug)]
#[command(name = "flow", author, version, about = "Tasks, notes, focus timer and goals in one dashboard", long_about = None)]
pub struct Cli {
    /// Omit to start an interactive session
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q error only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill a form with the given fields and submit it
    ///
    /// Example: flow add task "Write report" --priority high --subject Work
    /// Example: flow add note "Lecture 3" "Ownership rules" --subject Rust
    /// Example: flow add goal "Read pages" --target 100
    Add {
        #[command(subcommand)]
        entity: AddCommand,
    },
    /// Set one field of a form without submitting it
    ///
    /// Example: flow set task title "Write report"
    /// Example: flow set goal target 20
    Set {
        form: FormKind,
        field: String,
        value: String,
    },
    /// Show the contents of a form (all forms when omitted)
    ///
    /// Example: flow form task
    Form { form: Option<FormKind> },
    /// Discard the contents of a form
    ///
    /// Example: flow clear note
    Clear { form: FormKind },
    /// Flip a task between pending and completed
    ///
    /// Example: flow toggle task-1734652800000000000
    Toggle { id: String },
    /// Move a goal's progress by a signed amount
    ///
    /// Example: flow progress goal-1734652800000000000 -2
    Progress {
        id: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Add one to a goal's progress
    ///
    /// Example: flow inc goal-1734652800000000000
    Inc { id: String },
    /// Subtract one from a goal's progress
    ///
    /// Example: flow dec goal-1734652800000000000
    Dec { id: String },
    /// Control the focus timer
    ///
    /// Example: flow timer start
    Timer {
        #[command(subcommand)]
        action: TimerCommand,
    },
    /// Advance a running timer by whole seconds without waiting
    ///
    /// Example: flow tick 60
    Tick {
        #[arg(default_value_t = 1)]
        seconds: u32,
    },
    /// Switch the active tab
    ///
    /// Example: flow tab analytics
    Tab { name: String },
    /// Render the active tab
    ///
    /// Example: flow show
    Show,
    /// List entities
    ///
    /// Example: flow list tasks
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Show completion rate, focus time and breakdowns
    ///
    /// Example: flow analytics
    Analytics,
}

#[derive(Subcommand, Debug)]
pub enum AddCommand {
    /// Submit the task form
    Task {
        title: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Submit the note form
    Note {
        title: Option<String>,
        content: Option<String>,
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Submit the goal form
    Goal {
        title: Option<String>,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        current: Option<i64>,
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Return to a paused 25:00 focus session
    Reset,
    /// Show the current phase and remaining time
    Status,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Tasks,
    Notes,
    Goals,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Task,
    Note,
    Goal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    LogLevel,
    DefaultTab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_key(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match canonical_field.as_str() {
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            return Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            });
        }
        "theme" => ConfigOverrideTarget::Theme,
        "log_level" | "log" => ConfigOverrideTarget::LogLevel,
        "default_tab" | "tab" => ConfigOverrideTarget::DefaultTab,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if remainder.is_some() {
        return Err(format!("{canonical_field} override cannot have subfields"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Collect every `--config-override` value into a single override set.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
            ConfigOverrideTarget::DefaultTab => overrides.default_tab = Some(parsed.value),
        }
    }
    Ok(overrides)
}
