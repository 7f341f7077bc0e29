// Status API resource types (live, read-only)

use serde::{Deserialize, Serialize};

use crate::time::Time;

/// A conference instance currently running on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceStatus {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_started: bool,
    #[serde(default)]
    pub guests_muted: bool,
    #[serde(default)]
    pub start_time: Option<Time>,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub resource_uri: String,
}

/// A call leg currently connected to a conference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantStatus {
    pub id: String,
    /// Name of the conference the participant is in.
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub source_alias: String,
    #[serde(default)]
    pub destination_alias: String,
    #[serde(default)]
    pub remote_address: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub call_direction: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub connect_time: Option<Time>,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub is_presenting: bool,
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub encryption: String,
    #[serde(default)]
    pub bandwidth: Option<u32>,
    #[serde(default)]
    pub call_quality: String,
    #[serde(default)]
    pub system_location: String,
    #[serde(default)]
    pub media_node: String,
    #[serde(default)]
    pub signalling_node: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub resource_uri: String,
}

/// A Conferencing Node or the management node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerVmStatus {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub system_location: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub configuration_id: Option<u64>,
    #[serde(default)]
    pub booted_time: Option<Time>,
    #[serde(default)]
    pub last_updated: Option<Time>,
    #[serde(default)]
    pub cpu_count: Option<u32>,
    #[serde(default)]
    pub max_audio_calls: Option<u32>,
    #[serde(default)]
    pub max_hd_calls: Option<u32>,
    #[serde(default)]
    pub max_sd_calls: Option<u32>,
    #[serde(default)]
    pub media_load: Option<u32>,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub sync_status: String,
    #[serde(default)]
    pub upgrade_status: String,
    #[serde(default)]
    pub resource_uri: String,
}

/// A currently raised alarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmStatus {
    pub id: u64,
    pub name: String,
    /// `error`, `warning`, or `critical`.
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub identifier: Option<u64>,
    #[serde(default)]
    pub time_raised: Option<Time>,
    #[serde(default)]
    pub resource_uri: String,
}

/// License usage counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicensingStatus {
    pub audio_count: u32,
    pub audio_total: u32,
    pub port_count: u32,
    pub port_total: u32,
    pub vmr_count: u32,
    pub vmr_total: u32,
    pub ghm_count: u32,
    pub ghm_total: u32,
    pub teams_count: u32,
    pub teams_total: u32,
    pub system_count: u32,
    pub system_total: u32,
}

impl LicensingStatus {
    /// Ports still available for new calls.
    pub fn ports_available(&self) -> u32 {
        self.port_total.saturating_sub(self.port_count)
    }
}
