//! Cursor-driven listing.
//!
//! [`enumerate`] is lazy: a page is only requested once every identifier of
//! the previous page has been consumed. The first page error ends the stream.
//! [`collect_identifiers`] drains it while keeping everything yielded before
//! the error (or before cancellation).

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ApiError, PageRequest, ResourceApi};

/// Clamp a requested page size into `1..=max_page_size`.
pub fn effective_page_size(requested: u32, max_page_size: u32) -> u32 {
    requested.clamp(1, max_page_size.max(1))
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily list every identifier, one page at a time.
pub fn enumerate(
    api: Arc<dyn ResourceApi>,
    page_size: u32,
) -> impl Stream<Item = Result<String, ApiError>> + Send {
    let page_size = effective_page_size(page_size, api.max_page_size());

    stream::try_unfold(Cursor::Start, move |cursor| {
        let api = Arc::clone(&api);
        async move {
            let cursor = match cursor {
                Cursor::Done => return Ok::<_, ApiError>(None),
                Cursor::Start => None,
                Cursor::Next(cursor) => Some(cursor),
            };

            let page = api.list_page(PageRequest { cursor, page_size }).await?;
            debug!(
                event = "core.sweep.page_listed",
                resource_type = api.resource_type(),
                count = page.identifiers.len(),
                has_more = page.next_cursor.is_some()
            );

            let next = match page.next_cursor {
                Some(cursor) if !cursor.is_empty() => Cursor::Next(cursor),
                _ => Cursor::Done,
            };
            let identifiers = stream::iter(page.identifiers.into_iter().map(Ok::<_, ApiError>));
            Ok::<_, ApiError>(Some((identifiers, next)))
        }
    })
    .try_flatten()
}

/// Everything an enumeration produced.
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Identifiers in listing order, including those seen before an error.
    pub identifiers: Vec<String>,
    /// The page error that ended enumeration early, if any.
    pub error: Option<ApiError>,
    pub cancelled: bool,
}

/// Drain an identifier stream, stopping at the first error or on cancellation.
pub async fn collect_identifiers(
    identifiers: impl Stream<Item = Result<String, ApiError>>,
    cancel: &CancellationToken,
) -> Enumeration {
    let mut identifiers = std::pin::pin!(identifiers);
    let mut enumeration = Enumeration::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(
                    event = "core.sweep.enumerate_cancelled",
                    collected = enumeration.identifiers.len()
                );
                enumeration.cancelled = true;
                break;
            }
            next = identifiers.next() => match next {
                Some(Ok(identifier)) => enumeration.identifiers.push(identifier),
                Some(Err(error)) => {
                    enumeration.error = Some(error);
                    break;
                }
                None => break,
            },
        }
    }

    enumeration
}
