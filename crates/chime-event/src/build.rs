// build.rs — Build snapshot and status enum.
//
// The Build struct is the minimal event shape the engine needs: identity,
// status, substitution variables, and the log URL. Upstream sources carry
// far more; everything beyond this shape is out of scope and dropped at
// the source adapter.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The lifecycle status of a build.
///
/// Wire values are SCREAMING_SNAKE_CASE. Statuses this crate does not know
/// about deserialize to [`BuildStatus::StatusUnknown`] — an unrecognized
/// status is never an error by itself; renderers treat it as "unexpected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    /// The build is waiting for approval before it may run.
    Pending,
    /// The build has been accepted and is waiting for a worker.
    Queued,
    /// The build is running.
    Working,
    /// The build finished successfully.
    Success,
    /// The build finished with a failure caused by the build itself.
    Failure,
    /// The build system itself failed.
    InternalError,
    /// The build ran longer than its deadline.
    Timeout,
    /// The build was canceled by a user.
    Cancelled,
    /// The build was queued longer than its queue TTL.
    Expired,
    /// Catch-all for statuses this crate does not recognize.
    #[serde(other)]
    StatusUnknown,
}

impl BuildStatus {
    /// Canonical SCREAMING_SNAKE_CASE name, as used on the wire and in
    /// filter expressions.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStatus::Pending => "PENDING",
            BuildStatus::Queued => "QUEUED",
            BuildStatus::Working => "WORKING",
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::InternalError => "INTERNAL_ERROR",
            BuildStatus::Timeout => "TIMEOUT",
            BuildStatus::Cancelled => "CANCELLED",
            BuildStatus::Expired => "EXPIRED",
            BuildStatus::StatusUnknown => "STATUS_UNKNOWN",
        }
    }

    /// Reverse lookup by canonical name.
    ///
    /// Returns `None` for names this crate does not recognize — the filter
    /// compiler uses this to reject unknown status literals at compile time
    /// instead of letting them silently never match.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PENDING" => Some(BuildStatus::Pending),
            "QUEUED" => Some(BuildStatus::Queued),
            "WORKING" => Some(BuildStatus::Working),
            "SUCCESS" => Some(BuildStatus::Success),
            "FAILURE" => Some(BuildStatus::Failure),
            "INTERNAL_ERROR" => Some(BuildStatus::InternalError),
            "TIMEOUT" => Some(BuildStatus::Timeout),
            "CANCELLED" => Some(BuildStatus::Cancelled),
            "EXPIRED" => Some(BuildStatus::Expired),
            "STATUS_UNKNOWN" => Some(BuildStatus::StatusUnknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable snapshot of one build, as delivered to a notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Unique build identifier assigned by the upstream build system.
    pub id: String,

    /// The project the build belongs to.
    #[serde(default)]
    pub project_id: String,

    /// Build status at the time the event was emitted.
    pub status: BuildStatus,

    /// The trigger that started this build, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<String>,

    /// Substitution variables (e.g. BRANCH_NAME, COMMIT_SHA, TRIGGER_NAME).
    #[serde(default)]
    pub substitutions: HashMap<String, String>,

    /// URL of the build's log/result page.
    #[serde(default)]
    pub log_url: String,

    /// When the build was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    /// When the build reached a terminal status, if it has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
}

impl Build {
    /// Look up a substitution variable.
    ///
    /// Absent keys are the empty string, never an error. This is the single
    /// defined absent-key semantic; both the filter evaluator and message
    /// renderers rely on it.
    pub fn substitution(&self, key: &str) -> &str {
        self.substitutions.get(key).map(String::as_str).unwrap_or("")
    }
}
