// Configuration API resource types
//
// Read models use `#[serde(default)]` liberally because fields come and go
// across Controller releases; unknown fields land in `extra`. Write models
// use `Option` for every field the caller may leave untouched so that
// "absent" never reaches the wire as `false` or `0`.

use serde::{Deserialize, Serialize};

use crate::time::Time;

// ── Conference (VMR) ─────────────────────────────────────────────────

/// A virtual meeting room, gateway rule target, or lecture service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conference {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `conference`, `lecture`, `two_stage_dialing`, `test_call`, …
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub guest_pin: String,
    #[serde(default)]
    pub allow_guests: bool,
    #[serde(default)]
    pub guests_muted: bool,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub max_callrate_in: Option<u32>,
    #[serde(default)]
    pub max_callrate_out: Option<u32>,
    #[serde(default)]
    pub participant_limit: Option<u32>,
    #[serde(default)]
    pub aliases: Vec<ConferenceAliasRef>,
    #[serde(default)]
    pub creation_time: Option<Time>,
    #[serde(default)]
    pub resource_uri: String,
    /// Catch-all for fields not modelled here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Alias entry embedded in a [`Conference`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceAliasRef {
    #[serde(default)]
    pub id: Option<u64>,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConferenceCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_guests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_callrate_in: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_callrate_out: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<ConferenceAliasRef>>,
}

/// Partial update: only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConferenceUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_guests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_limit: Option<u32>,
}

// ── Conference alias ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceAlias {
    pub id: u64,
    pub alias: String,
    /// Resource URI of the owning conference.
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creation_time: Option<Time>,
    #[serde(default)]
    pub resource_uri: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConferenceAliasCreateRequest {
    pub alias: String,
    /// Resource URI of the owning conference, e.g. `/api/admin/configuration/v1/conference/3/`.
    pub conference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── End user ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndUser {
    pub id: u64,
    pub primary_email_address: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub telephone_number: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub user_oid: Option<String>,
    #[serde(default)]
    pub sync_tag: String,
    #[serde(default)]
    pub resource_uri: String,
}

/// Body for creating or replacing an end user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EndUserRequest {
    pub primary_email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

// ── System location ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLocation {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mtu: Option<u32>,
    /// Resource URIs of the DNS servers used by nodes in this location.
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default)]
    pub ntp_servers: Vec<String>,
    #[serde(default)]
    pub syslog_servers: Vec<String>,
    #[serde(default)]
    pub resource_uri: String,
}

// ── Automatic participant ────────────────────────────────────────────

/// A participant the Controller dials automatically when a conference starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomaticParticipant {
    pub id: u64,
    pub alias: String,
    /// Resource URIs of the conferences this participant is attached to.
    #[serde(default)]
    pub conference: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub keep_conference_alive: String,
    #[serde(default)]
    pub routing: String,
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub system_location: Option<String>,
    #[serde(default)]
    pub creation_time: Option<Time>,
    #[serde(default)]
    pub resource_uri: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutomaticParticipantCreateRequest {
    pub alias: String,
    pub conference: Vec<String>,
    /// `guest` or `chair`.
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `sip`, `h323`, `mssip`, `rtmp`, or `gms`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_conference_alive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_location: Option<String>,
}

// ── Global configuration ─────────────────────────────────────────────

/// Platform-wide settings singleton (`config/v1/global/1/`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub enable_webrtc: bool,
    #[serde(default)]
    pub enable_sip: bool,
    #[serde(default)]
    pub enable_h323: bool,
    #[serde(default)]
    pub enable_rtmp: bool,
    #[serde(default)]
    pub enable_chat: bool,
    #[serde(default)]
    pub enable_analytics: bool,
    #[serde(default)]
    pub crypto_mode: String,
    #[serde(default)]
    pub max_pixels_per_second: String,
    #[serde(default)]
    pub media_ports_start: Option<u16>,
    #[serde(default)]
    pub media_ports_end: Option<u16>,
    #[serde(default)]
    pub signalling_ports_start: Option<u16>,
    #[serde(default)]
    pub signalling_ports_end: Option<u16>,
    #[serde(default)]
    pub guests_only_timeout: Option<u32>,
    #[serde(default)]
    pub waiting_for_chair_timeout: Option<u32>,
    #[serde(default)]
    pub resource_uri: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Partial update of the global settings. Unset fields keep their value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalConfigurationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_webrtc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_h323: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rtmp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_analytics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pixels_per_second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_only_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_for_chair_timeout: Option<u32>,
}
