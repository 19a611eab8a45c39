//! Page size caps for audit reads.

/// Maximum entries returned by the global audit view.
pub const GLOBAL_PAGE_MAX: usize = 500;

/// Maximum entries returned by a per-dealer audit view.
pub const DEALER_PAGE_MAX: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScope {
    Global,
    Dealer,
}

impl PageScope {
    pub fn max(self) -> usize {
        match self {
            PageScope::Global => GLOBAL_PAGE_MAX,
            PageScope::Dealer => DEALER_PAGE_MAX,
        }
    }
}

/// Requested limits above the cap are clamped; a missing or zero limit means the cap.
pub fn clamp_limit(requested: Option<usize>, scope: PageScope) -> usize {
    match requested {
        Some(0) | None => scope.max(),
        Some(n) => n.min(scope.max()),
    }
}
