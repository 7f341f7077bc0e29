// History API service
//
// Completed conferences, participant calls and cleared alarms under
// `history/v1/…`. List calls accept a time window.

pub mod types;

use crate::context::RequestContext;
use crate::error::Error;
use crate::list::ListResponse;
use crate::options::TimeFilteredListOptions;
use crate::requester::Requester;

pub use types::*;

const CONFERENCE: &str = "history/v1/conference/";
const PARTICIPANT: &str = "history/v1/participant/";
const ALARM: &str = "history/v1/alarm/";

#[derive(Debug, Clone)]
pub struct HistoryService<R> {
    requester: R,
}

impl<R: Requester> HistoryService<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    pub async fn list_conferences(
        &self,
        ctx: &RequestContext,
        opts: &TimeFilteredListOptions,
    ) -> Result<ListResponse<ConferenceHistory>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, CONFERENCE, Some(&query)).await
    }

    pub async fn get_conference(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ConferenceHistory, Error> {
        self.requester
            .get_json(ctx, &format!("{CONFERENCE}{id}/"), None)
            .await
    }

    /// Search matches against the participant's display name unless the
    /// options name another `search_field`.
    pub async fn list_participants(
        &self,
        ctx: &RequestContext,
        opts: &TimeFilteredListOptions,
    ) -> Result<ListResponse<ParticipantHistory>, Error> {
        let query = opts.to_query_or_field("display_name__icontains");
        self.requester.get_json(ctx, PARTICIPANT, Some(&query)).await
    }

    pub async fn get_participant(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ParticipantHistory, Error> {
        self.requester
            .get_json(ctx, &format!("{PARTICIPANT}{id}/"), None)
            .await
    }

    pub async fn list_alarms(
        &self,
        ctx: &RequestContext,
        opts: &TimeFilteredListOptions,
    ) -> Result<ListResponse<AlarmHistory>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, ALARM, Some(&query)).await
    }
}
