use std::future::Future;

/// Decide whether a form may close. A clean form closes at once and `confirm`
/// is never called; a dirty form closes only if `confirm` resolves to `true`.
pub async fn request_close<F, Fut>(is_dirty: bool, confirm: F) -> bool
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = bool>,
{
    if !is_dirty {
        return true;
    }
    confirm().await
}
