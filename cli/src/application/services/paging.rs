//! Draining paginated list calls.

use std::future::Future;

use crate::application::services::retry::with_retry;
use crate::domain::{ControlPlaneError, Page, RetryPolicy};

/// Follows continuation tokens until the last page, retrying each page
/// request under `policy`, and returns the concatenated items in order.
///
/// # Errors
///
/// Returns the first page error that survives retry, or an error if the
/// service hands back the token it was just given.
pub async fn drain_pages<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut fetch: F,
) -> Result<Vec<T>, ControlPlaneError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ControlPlaneError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = with_retry(policy, operation, || fetch(token.clone())).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_token {
            Some(next) if !next.is_empty() => {
                if token.as_deref() == Some(next.as_str()) {
                    return Err(ControlPlaneError::Other(format!(
                        "{operation} returned the same continuation token twice"
                    )));
                }
                token = Some(next);
            }
            _ => break,
        }
    }

    tracing::debug!(operation, pages, items = items.len(), "drained pages");
    Ok(items)
}
