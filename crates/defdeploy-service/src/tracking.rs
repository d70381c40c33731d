//! Visit tracker used when no analytics session is bound to requests.

use defdeploy_core::traits::VisitTracker;

/// A tracker that is never active.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVisitTracker;

impl VisitTracker for DisabledVisitTracker {
    fn is_active(&self) -> bool {
        false
    }

    fn is_page_cancelled(&self) -> bool {
        false
    }

    fn cancel_page(&self) {}
}
