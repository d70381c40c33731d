//! Visit-tracking session hook.

/// The visit-tracking session bound to the current request context.
pub trait VisitTracker: Send + Sync + std::fmt::Debug + 'static {
    /// Whether tracking is active for the current context.
    fn is_active(&self) -> bool;

    /// Whether the current page visit is already cancelled.
    fn is_page_cancelled(&self) -> bool;

    /// Cancel the current page visit.
    fn cancel_page(&self);
}

/// Cancel the current page if tracking is active and the page is still live.
///
/// Returns whether a cancellation was issued.
pub fn cancel_active_page(tracker: &dyn VisitTracker) -> bool {
    if tracker.is_active() && !tracker.is_page_cancelled() {
        tracker.cancel_page();
        tracing::debug!("Cancelled active page visit before deployment");
        return true;
    }
    false
}
