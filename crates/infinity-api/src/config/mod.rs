// Configuration API service
//
// Mutable CRUD over `config/v1/…`. Creation calls return the `PostResponse`
// so callers can pull the new ID out of `Location`.

pub mod types;

use serde::de::IgnoredAny;
use tracing::debug;

use crate::codec::PostResponse;
use crate::context::RequestContext;
use crate::error::Error;
use crate::list::{ListResponse, collect_all};
use crate::options::{ListOptions, SearchableListOptions};
use crate::requester::Requester;

pub use types::*;

const CONFERENCE: &str = "config/v1/conference/";
const CONFERENCE_ALIAS: &str = "config/v1/conference_alias/";
const END_USER: &str = "config/v1/end_user/";
const SYSTEM_LOCATION: &str = "config/v1/system_location/";
const AUTOMATIC_PARTICIPANT: &str = "config/v1/automatic_participant/";
const GLOBAL: &str = "config/v1/global/1/";

/// Typed access to configuration resources.
#[derive(Debug, Clone)]
pub struct ConfigService<R> {
    requester: R,
}

impl<R: Requester> ConfigService<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    // ── Conferences ──────────────────────────────────────────────────

    pub async fn list_conferences(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<Conference>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, CONFERENCE, Some(&query)).await
    }

    /// Every conference matching `opts.search`, walking all pages.
    pub async fn list_all_conferences(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<Vec<Conference>, Error> {
        collect_all(opts.list.limit, |list| {
            let page_opts = SearchableListOptions {
                list,
                ..opts.clone()
            };
            async move { self.list_conferences(ctx, &page_opts).await }
        })
        .await
    }

    pub async fn get_conference(&self, ctx: &RequestContext, id: u64) -> Result<Conference, Error> {
        self.requester
            .get_json(ctx, &format!("{CONFERENCE}{id}/"), None)
            .await
    }

    pub async fn create_conference(
        &self,
        ctx: &RequestContext,
        req: &ConferenceCreateRequest,
    ) -> Result<PostResponse, Error> {
        debug!(name = %req.name, "creating conference");
        self.requester.post_with_response(ctx, CONFERENCE, req).await
    }

    pub async fn update_conference(
        &self,
        ctx: &RequestContext,
        id: u64,
        req: &ConferenceUpdateRequest,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self
            .requester
            .patch_json(ctx, &format!("{CONFERENCE}{id}/"), req)
            .await?;
        Ok(())
    }

    pub async fn delete_conference(&self, ctx: &RequestContext, id: u64) -> Result<(), Error> {
        debug!(id, "deleting conference");
        let _: IgnoredAny = self
            .requester
            .delete_json(ctx, &format!("{CONFERENCE}{id}/"))
            .await?;
        Ok(())
    }

    // ── Conference aliases ───────────────────────────────────────────

    /// Search matches against the alias string.
    pub async fn list_conference_aliases(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<ConferenceAlias>, Error> {
        let query = opts.to_query_or_field("alias__icontains");
        self.requester
            .get_json(ctx, CONFERENCE_ALIAS, Some(&query))
            .await
    }

    pub async fn get_conference_alias(
        &self,
        ctx: &RequestContext,
        id: u64,
    ) -> Result<ConferenceAlias, Error> {
        self.requester
            .get_json(ctx, &format!("{CONFERENCE_ALIAS}{id}/"), None)
            .await
    }

    pub async fn create_conference_alias(
        &self,
        ctx: &RequestContext,
        req: &ConferenceAliasCreateRequest,
    ) -> Result<PostResponse, Error> {
        self.requester
            .post_with_response(ctx, CONFERENCE_ALIAS, req)
            .await
    }

    pub async fn delete_conference_alias(&self, ctx: &RequestContext, id: u64) -> Result<(), Error> {
        let _: IgnoredAny = self
            .requester
            .delete_json(ctx, &format!("{CONFERENCE_ALIAS}{id}/"))
            .await?;
        Ok(())
    }

    // ── End users ────────────────────────────────────────────────────

    /// Search matches against the primary email address.
    pub async fn list_end_users(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<EndUser>, Error> {
        let query = opts.to_query_or_field("primary_email_address__icontains");
        self.requester.get_json(ctx, END_USER, Some(&query)).await
    }

    pub async fn get_end_user(&self, ctx: &RequestContext, id: u64) -> Result<EndUser, Error> {
        self.requester
            .get_json(ctx, &format!("{END_USER}{id}/"), None)
            .await
    }

    pub async fn create_end_user(
        &self,
        ctx: &RequestContext,
        req: &EndUserRequest,
    ) -> Result<PostResponse, Error> {
        self.requester.post_with_response(ctx, END_USER, req).await
    }

    /// Full update: every writable field is replaced.
    pub async fn update_end_user(
        &self,
        ctx: &RequestContext,
        id: u64,
        req: &EndUserRequest,
    ) -> Result<EndUser, Error> {
        self.requester
            .put_json(ctx, &format!("{END_USER}{id}/"), req)
            .await
    }

    pub async fn delete_end_user(&self, ctx: &RequestContext, id: u64) -> Result<(), Error> {
        let _: IgnoredAny = self
            .requester
            .delete_json(ctx, &format!("{END_USER}{id}/"))
            .await?;
        Ok(())
    }

    // ── System locations ─────────────────────────────────────────────

    pub async fn list_system_locations(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<SystemLocation>, Error> {
        let query = opts.to_query();
        self.requester
            .get_json(ctx, SYSTEM_LOCATION, Some(&query))
            .await
    }

    pub async fn get_system_location(
        &self,
        ctx: &RequestContext,
        id: u64,
    ) -> Result<SystemLocation, Error> {
        self.requester
            .get_json(ctx, &format!("{SYSTEM_LOCATION}{id}/"), None)
            .await
    }

    // ── Automatic participants ───────────────────────────────────────

    pub async fn list_automatic_participants(
        &self,
        ctx: &RequestContext,
        opts: &ListOptions,
    ) -> Result<ListResponse<AutomaticParticipant>, Error> {
        let query = opts.to_query();
        self.requester
            .get_json(ctx, AUTOMATIC_PARTICIPANT, Some(&query))
            .await
    }

    pub async fn create_automatic_participant(
        &self,
        ctx: &RequestContext,
        req: &AutomaticParticipantCreateRequest,
    ) -> Result<PostResponse, Error> {
        self.requester
            .post_with_response(ctx, AUTOMATIC_PARTICIPANT, req)
            .await
    }

    pub async fn delete_automatic_participant(
        &self,
        ctx: &RequestContext,
        id: u64,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self
            .requester
            .delete_json(ctx, &format!("{AUTOMATIC_PARTICIPANT}{id}/"))
            .await?;
        Ok(())
    }

    // ── Global configuration ─────────────────────────────────────────

    pub async fn global_configuration(
        &self,
        ctx: &RequestContext,
    ) -> Result<GlobalConfiguration, Error> {
        self.requester.get_json(ctx, GLOBAL, None).await
    }

    pub async fn update_global_configuration(
        &self,
        ctx: &RequestContext,
        req: &GlobalConfigurationUpdate,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self.requester.patch_json(ctx, GLOBAL, req).await?;
        Ok(())
    }
}
