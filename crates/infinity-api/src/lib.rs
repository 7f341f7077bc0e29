// infinity-api: Async Rust client for the Infinity management API (/api/admin/)
//
// The engine (`Client`) owns transport, authentication, retries and error
// normalisation. Resource services (`config`, `status`, `history`, `command`)
// are thin typed wrappers over the `Requester` trait and can be driven by
// `testing::MockRequester` in tests.

pub mod auth;
pub mod client;
pub mod codec;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod list;
pub mod options;
pub mod requester;
pub mod retry;
pub mod status;
pub mod testing;
pub mod time;
pub mod transport;

pub use auth::{Authenticator, BasicAuth, BearerAuth, CustomHeaderAuth, TokenAuth};
pub use client::{ApiRequest, ApiResponse, Client, ClientBuilder};
pub use codec::PostResponse;
pub use command::CommandService;
pub use config::ConfigService;
pub use context::RequestContext;
pub use error::{ApiError, Error};
pub use history::HistoryService;
pub use list::{ListMeta, ListResponse};
pub use options::{ListOptions, QueryParams, SearchableListOptions, TimeFilteredListOptions};
pub use requester::Requester;
pub use retry::RetryPolicy;
pub use status::StatusService;
pub use time::Time;
pub use transport::{TlsMode, TransportConfig};
