/// Work status definitions for pages in the pending-work table
///
/// A page is in the table from the moment its unit of work is accepted by the
/// scheduler until the coordinator finishes it; it is removed, not moved to a
/// terminal status, once finished.
use std::fmt;

/// Represents where a claimed page is in its unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkStatus {
    /// Claimed and submitted, waiting for a scheduler permit
    Queued,

    /// Admitted by the scheduler and being rendered or captured
    Running,
}

impl WorkStatus {
    /// Returns true if the unit of work is currently executing
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_running() {
        assert!(WorkStatus::Running.is_running());
        assert!(!WorkStatus::Queued.is_running());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", WorkStatus::Queued), "queued");
        assert_eq!(format!("{}", WorkStatus::Running), "running");
    }
}
