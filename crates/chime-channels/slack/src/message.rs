// message.rs — Slack webhook payload types and the status renderer.
//
// Rendering is a pure function of (status, substitutions, log_url): the
// same build always yields the same message. The status table maps each
// terminal state to a severity color and a one-line summary; anything
// unmapped renders as a cautionary "unexpected status" message rather
// than an error.

use serde::{Deserialize, Serialize};

use chime_engine::{add_utm_params, RenderError, UtmMedium};
use chime_event::{Build, BuildStatus};

/// Affirmative attachment color (Slack's named green).
const COLOR_GOOD: &str = "good";
/// Negative attachment color (Slack's named red).
const COLOR_DANGER: &str = "danger";
/// Cautionary attachment color (Slack's named yellow).
const COLOR_WARNING: &str = "warning";
/// Neutral gray for builds awaiting approval.
const COLOR_PENDING: &str = "#bab8b8";

/// Top-level webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub attachments: Vec<Attachment>,
}

/// One colored attachment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AttachmentAction>,
}

/// An interactive action button on an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentAction {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Render the webhook message for one build.
///
/// The log URL is annotated with tracking parameters first; a build whose
/// log URL cannot be annotated is undeliverable (the message must not go
/// out without a valid link) and the error propagates to the engine.
pub fn write_message(build: &Build) -> Result<WebhookMessage, RenderError> {
    let trigger_name = build.substitution("TRIGGER_NAME");
    let branch_name = build.substitution("BRANCH_NAME");
    let commit_sha = build.substitution("COMMIT_SHA");

    let (color, headline) = match build.status {
        BuildStatus::Success => (
            COLOR_GOOD,
            format!("A new build of {trigger_name} has succeeded! :rocket:"),
        ),
        BuildStatus::Failure => (
            COLOR_DANGER,
            format!("A new build of {trigger_name} has failed! :scream:"),
        ),
        BuildStatus::InternalError => (
            COLOR_DANGER,
            format!("A new build of {trigger_name} has had an internal error! :scream:"),
        ),
        BuildStatus::Timeout => (
            COLOR_DANGER,
            format!("A build of {trigger_name} has had a timeout! :thinking_face:"),
        ),
        BuildStatus::Cancelled => (
            COLOR_WARNING,
            format!("A build of {trigger_name} was manually canceled. :no_good:"),
        ),
        BuildStatus::Expired => (
            COLOR_WARNING,
            format!("A build of {trigger_name} has expired. :headstone:"),
        ),
        BuildStatus::Pending => (
            COLOR_PENDING,
            format!("A build of {trigger_name} needs to be approved. :vertical_traffic_light:"),
        ),
        _ => (
            COLOR_WARNING,
            format!(
                "A new build of {trigger_name} has completed with an unexpected status! :thinking_face:"
            ),
        ),
    };

    let text = format!("{headline}\nBranch: {branch_name}\nCommit: {commit_sha}");
    let log_url = add_utm_params(&build.log_url, UtmMedium::Chat)?;

    Ok(WebhookMessage {
        attachments: vec![Attachment {
            text,
            color: color.to_string(),
            actions: vec![AttachmentAction {
                text: "View Logs".to_string(),
                kind: "button".to_string(),
                url: log_url,
            }],
        }],
    })
}
