//! In-memory [`Requester`] for exercising services without a Controller.
//!
//! Every call is recorded; answers are popped from a FIFO queue of canned
//! responses. An empty queue answers with JSON `null`.
//!
//! ```rust,ignore
//! let mock = MockRequester::new();
//! mock.push_json(json!({"meta": {...}, "objects": []}));
//! let page = ConfigService::new(&mock).list_conferences(&ctx, &opts).await?;
//! assert_eq!(mock.last_call().unwrap().endpoint, "config/v1/conference/");
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::{PostResponse, decode_json};
use crate::context::RequestContext;
use crate::error::Error;
use crate::options::QueryParams;
use crate::requester::Requester;

/// One call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: String,
    pub query: Option<QueryParams>,
    pub body: Option<Value>,
}

/// A canned answer.
#[derive(Debug)]
pub enum MockResponse {
    Json(Value),
    Created { location: String, body: Value },
    Error(Error),
}

#[derive(Debug, Default)]
pub struct MockRequester {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<MockResponse>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: MockResponse) -> &Self {
        lock(&self.responses).push_back(response);
        self
    }

    pub fn push_json(&self, value: Value) -> &Self {
        self.push(MockResponse::Json(value))
    }

    pub fn push_created(&self, location: impl Into<String>, body: Value) -> &Self {
        self.push(MockResponse::Created {
            location: location.into(),
            body,
        })
    }

    pub fn push_error(&self, error: Error) -> &Self {
        self.push(MockResponse::Error(error))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record<B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &str,
        query: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<MockResponse, Error> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(Error::Serialization)?;
        lock(&self.calls).push(RecordedCall {
            method,
            endpoint: endpoint.to_owned(),
            query: query.cloned(),
            body,
        });
        Ok(lock(&self.responses)
            .pop_front()
            .unwrap_or(MockResponse::Json(Value::Null)))
    }

    fn answer<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &str,
        query: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.record(ctx, method, endpoint, query, body)? {
            MockResponse::Json(value) | MockResponse::Created { body: value, .. } => {
                let raw = serde_json::to_vec(&value).map_err(Error::Serialization)?;
                decode_json(&raw)
            }
            MockResponse::Error(err) => Err(err),
        }
    }
}

impl Requester for MockRequester {
    async fn get_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        query: Option<&QueryParams>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        self.answer::<(), T>(ctx, Method::GET, endpoint, query, None)
    }

    async fn post_json<B, T>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.answer(ctx, Method::POST, endpoint, None, Some(body))
    }

    async fn put_json<B, T>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.answer(ctx, Method::PUT, endpoint, None, Some(body))
    }

    async fn patch_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        self.answer(ctx, Method::PATCH, endpoint, None, Some(body))
    }

    async fn delete_json<T>(&self, ctx: &RequestContext, endpoint: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        self.answer::<(), T>(ctx, Method::DELETE, endpoint, None, None)
    }

    async fn post_with_response<B>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> Result<PostResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        match self.record(ctx, Method::POST, endpoint, None, Some(body))? {
            MockResponse::Created { location, body } => Ok(PostResponse {
                body: Bytes::from(serde_json::to_vec(&body).map_err(Error::Serialization)?),
                resource_uri: location,
                content_type: Some("application/json".to_owned()),
            }),
            MockResponse::Json(body) => Ok(PostResponse {
                body: Bytes::from(serde_json::to_vec(&body).map_err(Error::Serialization)?),
                ..PostResponse::default()
            }),
            MockResponse::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn records_calls_and_replays_answers() {
        let mock = MockRequester::new();
        mock.push_json(json!({"status": "success"}));

        let ctx = RequestContext::background();
        let answer: Value = mock
            .post_json(&ctx, "command/v1/conference/lock/", &json!({"conference_id": "c1"}))
            .await
            .unwrap();

        assert_eq!(answer["status"], "success");
        let call = mock.last_call().unwrap();
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.endpoint, "command/v1/conference/lock/");
        assert_eq!(call.body, Some(json!({"conference_id": "c1"})));
    }

    #[tokio::test]
    async fn empty_queue_answers_null() {
        let mock = MockRequester::new();
        let ctx = RequestContext::background();
        mock.delete_json::<()>(&ctx, "config/v1/conference/1/")
            .await
            .unwrap();
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn queued_error_is_returned_once() {
        let mock = MockRequester::new();
        mock.push_error(Error::DeadlineExceeded)
            .push_json(json!({"name": "ok"}));

        let ctx = RequestContext::background();
        let first: Result<Value, Error> =
            tokio_test::block_on(mock.get_json(&ctx, "status/v1/alarm/", None));
        let second: Value =
            tokio_test::block_on(mock.get_json(&ctx, "status/v1/alarm/", None)).unwrap();

        assert!(matches!(first, Err(Error::DeadlineExceeded)));
        assert_eq!(second["name"], "ok");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn cancelled_context_is_not_recorded() {
        let mock = MockRequester::new();
        let ctx = RequestContext::background();
        ctx.cancel();
        let result: Result<Value, Error> = mock.get_json(&ctx, "status/v1/alarm/", None).await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(mock.call_count(), 0);
    }
}
