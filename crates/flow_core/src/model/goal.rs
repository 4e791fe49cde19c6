use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    /// Always at least 1.
    pub target: u32,
    /// Kept within `0..=target`.
    pub current: u32,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: String,
}

impl Goal {
    /// Returns a copy with `current` moved by `delta` and clamped into `0..=target`.
    pub fn adjusted(&self, delta: i64) -> Goal {
        let next = i64::from(self.current)
            .saturating_add(delta)
            .clamp(0, i64::from(self.target));
        Goal {
            current: next as u32,
            ..self.clone()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}
