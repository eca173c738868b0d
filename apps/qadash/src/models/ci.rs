//! CI job state decoded from Jenkins ball colors.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Success,
    Failure,
    Unstable,
    NotBuilt,
    Disabled,
    Aborted,
    Unknown,
}

impl JobState {
    /// Decode a color such as `blue`, `red_anime` or `notbuilt`.
    /// Returns the state and whether a build is currently running.
    pub fn from_color(color: &str) -> (Self, bool) {
        let (base, building) = match color.strip_suffix("_anime") {
            Some(b) => (b, true),
            None => (color, false),
        };
        let state = match base {
            "blue" | "green" => Self::Success,
            "red" => Self::Failure,
            "yellow" => Self::Unstable,
            "notbuilt" | "grey" => Self::NotBuilt,
            "disabled" => Self::Disabled,
            "aborted" => Self::Aborted,
            _ => Self::Unknown,
        };
        (state, building)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Unstable => "unstable",
            Self::NotBuilt => "not built",
            Self::Disabled => "disabled",
            Self::Aborted => "aborted",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// One CI job as shown on the dashboard: link plus decoded color.
pub struct JobLink {
    pub name: String,
    pub url: String,
    pub color: Option<String>,
    pub state: JobState,
    pub building: bool,
}

impl JobLink {
    pub fn new(name: String, url: String, color: Option<String>) -> Self {
        let (state, building) = color
            .as_deref()
            .map(JobState::from_color)
            .unwrap_or((JobState::Unknown, false));
        Self {
            name,
            url,
            color,
            state,
            building,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Builds remembered by the CI server for one job.
pub struct BuildSummary {
    /// Builds that finished with any result
    pub total: usize,
    /// Builds whose result is `SUCCESS`
    pub success: usize,
}

impl BuildSummary {
    pub fn success_ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.success as f64 / self.total as f64)
        }
    }
}
