//! Error forwarding for async route bodies.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

/// Awaits `handler` and passes any error to `next`.
///
/// `next` runs exactly once when the body fails and never when it succeeds,
/// so a rejected future can not escape the request pipeline unhandled.
/// Routes pair this with [`super::error_handler`]:
///
/// ```ignore
/// forward_errors(async move { repo.get(&id).map(ApiResponse::ok) }, error_handler).await
/// ```
pub async fn forward_errors<Fut, T, E, N, R>(handler: Fut, next: N) -> Result<T, R>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    N: FnOnce(E) -> R,
{
    match handler.await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(error = %err, "Handler failed, forwarding to error handler");
            Err(next(err))
        }
    }
}
