// Command API request/response types

use serde::{Deserialize, Serialize};

/// Outcome of an imperative command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// `success` or `failed`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Command-specific payload, e.g. the participant IDs created by a dial.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl CommandResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Targets a single live conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConferenceCommand {
    pub conference_id: String,
}

impl ConferenceCommand {
    pub fn new(conference_id: impl Into<String>) -> Self {
        Self {
            conference_id: conference_id.into(),
        }
    }
}

/// Targets a single live participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantCommand {
    pub participant_id: String,
}

impl ParticipantCommand {
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformLayoutRequest {
    pub conference_id: String,
    /// e.g. `1:7`, `ac`, `4:0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_overlay_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_indicator: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParticipantTransferRequest {
    pub participant_id: String,
    /// Alias of the conference to move the participant into.
    pub conference_alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRoleRequest {
    pub participant_id: String,
    /// `chair` or `guest`.
    pub role: String,
}

/// Dial a new participant out of a running conference.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DialRequest {
    pub conference_alias: String,
    pub destination: String,
    /// `chair` or `guest`.
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf_sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_conference_alive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
}

#[derive(Clone, Serialize)]
pub struct BackupCreateRequest {
    pub passphrase: String,
}

impl std::fmt::Debug for BackupCreateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupCreateRequest")
            .field("passphrase", &"[redacted]")
            .finish()
    }
}
