// History API resource types (completed conferences, calls and alarms)

use serde::{Deserialize, Serialize};

use crate::time::Time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceHistory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub start_time: Option<Time>,
    #[serde(default)]
    pub end_time: Option<Time>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub instant_message_count: u32,
    #[serde(default)]
    pub tag: String,
    /// Resource URIs of the participant history records.
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub resource_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantHistory {
    pub id: String,
    /// Resource URI of the conference history record.
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub conference_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub source_alias: String,
    #[serde(default)]
    pub destination_alias: String,
    #[serde(default)]
    pub remote_address: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub call_direction: String,
    #[serde(default)]
    pub start_time: Option<Time>,
    #[serde(default)]
    pub end_time: Option<Time>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub disconnect_reason: String,
    #[serde(default)]
    pub encryption: String,
    #[serde(default)]
    pub bandwidth: Option<u32>,
    #[serde(default)]
    pub call_quality: String,
    #[serde(default)]
    pub system_location: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub media_node: String,
    #[serde(default)]
    pub signalling_node: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub license_type: String,
    #[serde(default)]
    pub resource_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmHistory {
    pub id: u64,
    pub name: String,
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
    pub time_lowered: Option<Time>,
    #[serde(default)]
    pub resource_uri: String,
}
