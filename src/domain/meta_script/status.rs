//! Meta-script progression statuses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Position within one run of the activity small-talk script.
///
/// The script runs strictly forward. The two middle "deeper" questions
/// are optional: advancement may jump from either of them straight to
/// the opinion question, so a run is three to five bot turns long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaScriptStatus {
    /// The activity was just brought up.
    Starting,
    /// First follow-up question about the activity.
    Deeper1,
    /// Second, optional follow-up.
    Deeper2,
    /// Third, optional follow-up.
    Deeper3,
    /// Asked what the user thinks of the activity overall.
    Opinion,
    /// Commented on the user's opinion; the run is over.
    Comment,
}

impl MetaScriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Deeper1 => "deeper1",
            Self::Deeper2 => "deeper2",
            Self::Deeper3 => "deeper3",
            Self::Opinion => "opinion",
            Self::Comment => "comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "starting" => Some(Self::Starting),
            "deeper1" => Some(Self::Deeper1),
            "deeper2" => Some(Self::Deeper2),
            "deeper3" => Some(Self::Deeper3),
            "opinion" => Some(Self::Opinion),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }

    /// Rank along the script; later statuses have higher ranks.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Starting => 0,
            Self::Deeper1 => 1,
            Self::Deeper2 => 2,
            Self::Deeper3 => 3,
            Self::Opinion => 4,
            Self::Comment => 5,
        }
    }
}

impl StateMachine for MetaScriptStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MetaScriptStatus::*;
        match self {
            Starting => vec![Deeper1],
            Deeper1 => vec![Deeper2, Opinion],
            Deeper2 => vec![Deeper3, Opinion],
            Deeper3 => vec![Opinion],
            Opinion => vec![Comment],
            Comment => vec![],
        }
    }
}
