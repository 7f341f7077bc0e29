use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::PostResponse;
use crate::context::RequestContext;
use crate::error::Error;
use crate::options::QueryParams;

/// The engine capability resource services depend on.
///
/// [`Client`](crate::Client) is the production implementation;
/// [`MockRequester`](crate::testing::MockRequester) records calls and
/// replays canned answers in tests.
///
/// JSON helpers decode an empty body as `null`, so `()` works as the target
/// for calls whose answer is not interesting.
pub trait Requester: Send + Sync {
    fn get_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        query: Option<&QueryParams>,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: DeserializeOwned + Send;

    fn post_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;

    fn put_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;

    fn patch_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;

    fn delete_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: DeserializeOwned + Send;

    /// POST that also captures the `Location` of the created resource.
    fn post_with_response<B>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<PostResponse, Error>> + Send
    where
        B: Serialize + Sync + ?Sized;
}

impl<R: Requester> Requester for &R {
    fn get_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        query: Option<&QueryParams>,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).get_json(ctx, endpoint, query)
    }

    fn post_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        (**self).post_json(ctx, endpoint, body)
    }

    fn put_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        (**self).put_json(ctx, endpoint, body)
    }

    fn patch_json<B, T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        (**self).patch_json(ctx, endpoint, body)
    }

    fn delete_json<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).delete_json(ctx, endpoint)
    }

    fn post_with_response<B>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        body: &B,
    ) -> impl Future<Output = Result<PostResponse, Error>> + Send
    where
        B: Serialize + Sync + ?Sized,
    {
        (**self).post_with_response(ctx, endpoint, body)
    }
}
