use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dashboard view currently selected by the user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Tasks,
    Notes,
    Focus,
    Goals,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Tasks, Tab::Notes, Tab::Focus, Tab::Goals, Tab::Analytics];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Notes => "notes",
            Self::Focus => "focus",
            Self::Goals => "goals",
            Self::Analytics => "analytics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Notes => "Notes",
            Self::Focus => "Focus Timer",
            Self::Goals => "Goals",
            Self::Analytics => "Analytics",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tasks" | "task" => Ok(Self::Tasks),
            "notes" | "note" => Ok(Self::Notes),
            "focus" | "timer" | "pomodoro" => Ok(Self::Focus),
            "goals" | "goal" => Ok(Self::Goals),
            "analytics" | "stats" => Ok(Self::Analytics),
            other => Err(AppError::invalid_input(format!("unknown tab '{other}'"))),
        }
    }
}
