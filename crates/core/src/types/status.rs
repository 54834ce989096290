//! Delivery status normalization.
//!
//! Delivery `status` is free text written by the intake process and by the
//! driver app. Comparisons always go through [`normalize_status`].

/// Canonical delivery statuses recognized by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Awaiting pickup or in transit.
    Pending,
    /// Completed by the driver.
    Done,
}

impl DeliveryStatus {
    /// Returns the stored string form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    /// Returns true if the raw status text denotes this status.
    #[must_use]
    pub fn matches(self, raw: Option<&str>) -> bool {
        raw.is_some_and(|s| normalize_status(s) == self.as_str())
    }
}

/// Trim and lower-case a raw status value.
#[must_use]
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase()
}
