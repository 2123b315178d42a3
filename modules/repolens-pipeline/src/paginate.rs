//! Page-number cursor walker with a hard item cap.

use std::future::Future;

use tracing::{debug, warn};

use crate::source::SourceResult;

/// What a failed page does to the whole walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFailure {
    /// The walk fails with the page's error. Nothing partial is returned.
    Abort,
    /// The walk stops and returns what was accumulated so far.
    Truncate,
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page_size: u32,
    pub cap: Option<usize>,
    pub on_failure: PageFailure,
}

impl Pagination {
    pub fn required(page_size: u32, cap: Option<usize>) -> Self {
        Self {
            page_size,
            cap,
            on_failure: PageFailure::Abort,
        }
    }

    pub fn optional(page_size: u32, cap: Option<usize>) -> Self {
        Self {
            page_size,
            cap,
            on_failure: PageFailure::Truncate,
        }
    }
}

/// Request pages 1, 2, 3… until a short page, an empty page or the cap.
///
/// Items keep server order. The result never exceeds the cap.
pub async fn fetch_pages<T, F, Fut>(
    label: &str,
    pagination: Pagination,
    mut fetch_page: F,
) -> SourceResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = SourceResult<Vec<T>>>,
{
    let page_size = pagination.page_size.max(1);
    let mut items: Vec<T> = Vec::new();
    let mut page = 1u32;

    loop {
        if let Some(cap) = pagination.cap {
            if items.len() >= cap {
                debug!(label, cap, "Item cap reached");
                break;
            }
        }

        let batch = match fetch_page(page).await {
            Ok(batch) => batch,
            Err(e) => match pagination.on_failure {
                PageFailure::Abort => return Err(e),
                PageFailure::Truncate => {
                    warn!(label, page, error = %e, "Page fetch failed, keeping partial results");
                    break;
                }
            },
        };

        let fetched = batch.len();
        items.extend(batch);
        debug!(label, page, fetched, total = items.len(), "Fetched page");

        if fetched < page_size as usize {
            break;
        }
        page += 1;
    }

    if let Some(cap) = pagination.cap {
        items.truncate(cap);
    }
    Ok(items)
}
