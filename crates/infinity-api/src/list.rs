// Pagination envelope shared by every list endpoint.
//
// `{ "meta": { limit, next, offset, previous, total_count }, "objects": [...] }`

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::options::ListOptions;

/// Paging metadata from a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub total_count: u64,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub meta: ListMeta,
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

impl<T> ListResponse<T> {
    /// Whether the Controller advertises a further page.
    pub fn has_next(&self) -> bool {
        self.meta.next.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// Default page size used by [`collect_all`] when the caller passes zero.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Walk every page by offset and collect all objects.
///
/// `fetch` receives the paging for each page. Stops on an empty page, when
/// the Controller reports no `next` link, or once `total_count` is reached.
/// The offset advances by the rows actually received, so a Controller that
/// caps the page size below `page_size` is still walked to the end.
pub async fn collect_all<T, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(ListOptions) -> Fut,
    Fut: Future<Output = Result<ListResponse<T>, Error>>,
{
    let limit = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let mut all = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = fetch(ListOptions::new(limit, offset)).await?;
        let received = page.objects.len();
        let more = page.has_next();
        let total = page.meta.total_count;
        all.extend(page.objects);

        let collected = u64::try_from(all.len()).unwrap_or(u64::MAX);
        if received == 0 || !more || (total > 0 && collected >= total) {
            break;
        }

        offset = offset.saturating_add(u32::try_from(received).unwrap_or(u32::MAX));
    }

    Ok(all)
}
