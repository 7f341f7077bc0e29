// Status API service
//
// Read-only snapshots of live platform state under `status/v1/…`.

pub mod types;

use crate::context::RequestContext;
use crate::error::Error;
use crate::list::ListResponse;
use crate::options::{ListOptions, SearchableListOptions};
use crate::requester::Requester;

pub use types::*;

const CONFERENCE: &str = "status/v1/conference/";
const PARTICIPANT: &str = "status/v1/participant/";
const WORKER_VM: &str = "status/v1/worker_vm/";
const ALARM: &str = "status/v1/alarm/";
const LICENSING: &str = "status/v1/licensing/";

#[derive(Debug, Clone)]
pub struct StatusService<R> {
    requester: R,
}

impl<R: Requester> StatusService<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    pub async fn list_conferences(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<ConferenceStatus>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, CONFERENCE, Some(&query)).await
    }

    pub async fn get_conference(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ConferenceStatus, Error> {
        self.requester
            .get_json(ctx, &format!("{CONFERENCE}{id}/"), None)
            .await
    }

    /// Search matches against the participant's display name unless the
    /// options name another `search_field`.
    pub async fn list_participants(
        &self,
        ctx: &RequestContext,
        opts: &SearchableListOptions,
    ) -> Result<ListResponse<ParticipantStatus>, Error> {
        let query = opts.to_query_or_field("display_name__icontains");
        self.requester.get_json(ctx, PARTICIPANT, Some(&query)).await
    }

    /// Participants of the named conference.
    pub async fn list_conference_participants(
        &self,
        ctx: &RequestContext,
        conference: &str,
        opts: &ListOptions,
    ) -> Result<ListResponse<ParticipantStatus>, Error> {
        let mut query = opts.to_query();
        query.set("conference", conference);
        self.requester.get_json(ctx, PARTICIPANT, Some(&query)).await
    }

    pub async fn get_participant(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ParticipantStatus, Error> {
        self.requester
            .get_json(ctx, &format!("{PARTICIPANT}{id}/"), None)
            .await
    }

    pub async fn list_worker_vms(
        &self,
        ctx: &RequestContext,
        opts: &ListOptions,
    ) -> Result<ListResponse<WorkerVmStatus>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, WORKER_VM, Some(&query)).await
    }

    pub async fn get_worker_vm(&self, ctx: &RequestContext, id: u64) -> Result<WorkerVmStatus, Error> {
        self.requester
            .get_json(ctx, &format!("{WORKER_VM}{id}/"), None)
            .await
    }

    pub async fn list_alarms(
        &self,
        ctx: &RequestContext,
        opts: &ListOptions,
    ) -> Result<ListResponse<AlarmStatus>, Error> {
        let query = opts.to_query();
        self.requester.get_json(ctx, ALARM, Some(&query)).await
    }

    /// Current license usage.
    ///
    /// The endpoint answers with a one-element list; an empty list is a
    /// decode error.
    pub async fn licensing(&self, ctx: &RequestContext) -> Result<LicensingStatus, Error> {
        let page: ListResponse<LicensingStatus> =
            self.requester.get_json(ctx, LICENSING, None).await?;
        page.objects.into_iter().next().ok_or_else(|| Error::Decode {
            message: "licensing response contained no objects".into(),
            body: String::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::MockRequester;

    fn page(objects: serde_json::Value) -> serde_json::Value {
        json!({
            "meta": {"limit": 20, "next": null, "offset": 0, "previous": null, "total_count": 1},
            "objects": objects,
        })
    }

    #[tokio::test]
    async fn participants_search_by_display_name() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([{
            "id": "5e9c2a8e-6d2b-4b0c-9a57-1d2f3e4a5b6c",
            "conference": "Board Room",
            "display_name": "Alice",
            "connect_time": "2024-03-01T09:00:00.123456",
            "is_muted": true
        }])));

        let ctx = RequestContext::background();
        let resp = StatusService::new(&mock)
            .list_participants(&ctx, &SearchableListOptions::new("ali"))
            .await
            .unwrap();

        let p = &resp.objects[0];
        assert_eq!(p.display_name, "Alice");
        assert!(p.is_muted);
        assert!(p.connect_time.is_some());
        let call = mock.last_call().unwrap();
        assert_eq!(call.endpoint, "status/v1/participant/");
        assert_eq!(call.query.unwrap().get("display_name__icontains"), Some("ali"));
    }

    #[tokio::test]
    async fn participants_honour_explicit_search_field() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([])));

        let opts = SearchableListOptions::new("sip:bob").with_search_field("source_alias__icontains");
        let ctx = RequestContext::background();
        StatusService::new(&mock)
            .list_participants(&ctx, &opts)
            .await
            .unwrap();

        let query = mock.last_call().unwrap().query.unwrap();
        assert_eq!(query.get("source_alias__icontains"), Some("sip:bob"));
        assert!(!query.contains_key("display_name__icontains"));
    }

    #[tokio::test]
    async fn conference_participants_filter_by_name() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([])));

        let ctx = RequestContext::background();
        StatusService::new(&mock)
            .list_conference_participants(&ctx, "Board Room", &ListOptions::new(10, 0))
            .await
            .unwrap();

        let query = mock.last_call().unwrap().query.unwrap();
        assert_eq!(query.get("conference"), Some("Board Room"));
        assert_eq!(query.get("limit"), Some("10"));
    }

    #[tokio::test]
    async fn get_conference_by_id() {
        let mock = MockRequester::new();
        mock.push_json(json!({"id": "abc", "name": "Board Room", "is_locked": true}));

        let ctx = RequestContext::background();
        let conf = StatusService::new(&mock)
            .get_conference(&ctx, "abc")
            .await
            .unwrap();

        assert!(conf.is_locked);
        assert_eq!(mock.last_call().unwrap().endpoint, "status/v1/conference/abc/");
    }

    #[tokio::test]
    async fn licensing_takes_first_object() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([{"port_count": 12, "port_total": 50, "vmr_total": 100}])));

        let ctx = RequestContext::background();
        let lic = StatusService::new(&mock).licensing(&ctx).await.unwrap();
        assert_eq!(lic.port_count, 12);
        assert_eq!(lic.ports_available(), 38);
    }

    #[tokio::test]
    async fn licensing_empty_list_is_an_error() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([])));

        let ctx = RequestContext::background();
        let err = StatusService::new(&mock).licensing(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn worker_vms_and_alarms() {
        let mock = MockRequester::new();
        mock.push_json(page(json!([{"id": 3, "name": "conf-node-1", "media_load": 40}])));
        mock.push_json(page(json!([{"id": 9, "name": "cpu_overload", "level": "warning"}])));

        let ctx = RequestContext::background();
        let svc = StatusService::new(&mock);
        let vms = svc.list_worker_vms(&ctx, &ListOptions::default()).await.unwrap();
        let alarms = svc.list_alarms(&ctx, &ListOptions::default()).await.unwrap();

        assert_eq!(vms.objects[0].media_load, Some(40));
        assert_eq!(alarms.objects[0].level, "warning");
        let calls = mock.calls();
        assert_eq!(calls[0].endpoint, "status/v1/worker_vm/");
        assert_eq!(calls[1].endpoint, "status/v1/alarm/");
    }
}
