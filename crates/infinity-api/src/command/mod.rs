// Command API service
//
// Imperative actions under `command/v1/…`. Every command is a POST whose
// answer is a `CommandResponse`.

pub mod types;

use serde::Serialize;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::Error;
use crate::requester::Requester;

pub use types::*;

#[derive(Debug, Clone)]
pub struct CommandService<R> {
    requester: R,
}

impl<R: Requester> CommandService<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    async fn send<B: Serialize + Sync>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<CommandResponse, Error> {
        debug!(endpoint, "sending command");
        self.requester.post_json(ctx, endpoint, body).await
    }

    // ── Conference ───────────────────────────────────────────────────

    pub async fn lock_conference(
        &self,
        ctx: &RequestContext,
        conference_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(ctx, "command/v1/conference/lock/", &ConferenceCommand::new(conference_id))
            .await
    }

    pub async fn unlock_conference(
        &self,
        ctx: &RequestContext,
        conference_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(ctx, "command/v1/conference/unlock/", &ConferenceCommand::new(conference_id))
            .await
    }

    /// Disconnect every participant and end the conference.
    pub async fn disconnect_conference(
        &self,
        ctx: &RequestContext,
        conference_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/conference/disconnect/",
            &ConferenceCommand::new(conference_id),
        )
        .await
    }

    pub async fn mute_guests(
        &self,
        ctx: &RequestContext,
        conference_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/conference/mute_guests/",
            &ConferenceCommand::new(conference_id),
        )
        .await
    }

    pub async fn unmute_guests(
        &self,
        ctx: &RequestContext,
        conference_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/conference/unmute_guests/",
            &ConferenceCommand::new(conference_id),
        )
        .await
    }

    pub async fn transform_layout(
        &self,
        ctx: &RequestContext,
        req: &TransformLayoutRequest,
    ) -> Result<CommandResponse, Error> {
        self.send(ctx, "command/v1/conference/transform_layout/", req)
            .await
    }

    // ── Participant ──────────────────────────────────────────────────

    pub async fn disconnect_participant(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/participant/disconnect/",
            &ParticipantCommand::new(participant_id),
        )
        .await
    }

    pub async fn mute_participant(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/participant/mute/",
            &ParticipantCommand::new(participant_id),
        )
        .await
    }

    pub async fn unmute_participant(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
    ) -> Result<CommandResponse, Error> {
        self.send(
            ctx,
            "command/v1/participant/unmute/",
            &ParticipantCommand::new(participant_id),
        )
        .await
    }

    pub async fn transfer_participant(
        &self,
        ctx: &RequestContext,
        req: &ParticipantTransferRequest,
    ) -> Result<CommandResponse, Error> {
        self.send(ctx, "command/v1/participant/transfer/", req).await
    }

    pub async fn change_participant_role(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
        role: &str,
    ) -> Result<CommandResponse, Error> {
        let req = ParticipantRoleRequest {
            participant_id: participant_id.to_owned(),
            role: role.to_owned(),
        };
        self.send(ctx, "command/v1/participant/role/", &req).await
    }

    pub async fn dial(
        &self,
        ctx: &RequestContext,
        req: &DialRequest,
    ) -> Result<CommandResponse, Error> {
        self.send(ctx, "command/v1/participant/dial/", req).await
    }

    // ── Platform ─────────────────────────────────────────────────────

    /// Start a configuration backup encrypted with `passphrase`.
    pub async fn create_backup(
        &self,
        ctx: &RequestContext,
        passphrase: &str,
    ) -> Result<CommandResponse, Error> {
        let req = BackupCreateRequest {
            passphrase: passphrase.to_owned(),
        };
        self.send(ctx, "command/v1/platform/backup_create/", &req)
            .await
    }
}
