use serde::{Deserialize, Serialize};

/// Final recommendation attached to an enriched record.
///
/// Starts at [`Action::ConsiderForEntry`] and can only be downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    ConsiderForEntry,
    WeakVolume,
    TrendNotConfirmed,
    NotReady,
    Outdated,
    WeakFundamentals,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConsiderForEntry => "Consider for Entry",
            Self::WeakVolume => "Watchlist Only – Weak volume",
            Self::TrendNotConfirmed => "Watchlist Only – Trend not confirmed",
            Self::NotReady => "Wait – Not ready",
            Self::Outdated => "Avoid – Signal is outdated",
            Self::WeakFundamentals => "Watchlist Only – Weak fundamentals",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::ConsiderForEntry => "✅",
            Self::WeakVolume | Self::TrendNotConfirmed | Self::WeakFundamentals => "⚠️",
            Self::NotReady => "🔻",
            Self::Outdated => "🚫",
        }
    }

    /// Only an untouched recommendation is eligible for an alert.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::ConsiderForEntry)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// One explained sub-signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryNote {
    pub text: String,
    pub positive: bool,
}

impl CommentaryNote {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            positive: true,
        }
    }

    pub fn negative(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            positive: false,
        }
    }

    pub fn render(&self) -> String {
        if self.positive {
            format!("🔸 {} ✅", self.text)
        } else {
            format!("🔻 {} ❌", self.text)
        }
    }
}

/// Ordered explanation plus the resulting action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Commentary {
    pub notes: Vec<CommentaryNote>,
    pub action: Action,
}

impl Commentary {
    /// Notes one per line.
    pub fn render_notes(&self) -> String {
        self.notes
            .iter()
            .map(CommentaryNote::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
