//! Overflow policies for remote delivery queues
//!
//! Remote delivery never blocks the logging caller, so a full queue always
//! drops the record. The policy only decides how loudly.

use std::fmt;
use std::sync::Arc;

/// Policy for a full remote delivery queue
///
/// # Example
///
/// ```
/// use husplus_logger::OverflowPolicy;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Drop the record and only count it
    DropNewest,

    /// Drop the record, alert on stderr and through the callback on the
    /// first drop and every 1000th thereafter
    #[default]
    AlertAndDrop,
}

impl OverflowPolicy {
    /// Whether the `dropped_count`-th drop (1-based) should raise an alert
    pub fn should_alert(&self, dropped_count: u64) -> bool {
        match self {
            OverflowPolicy::DropNewest => false,
            OverflowPolicy::AlertAndDrop => dropped_count == 1 || dropped_count % 1000 == 0,
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Callback type for overflow notifications
///
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
    }

    #[test]
    fn test_alert_schedule() {
        let policy = OverflowPolicy::AlertAndDrop;
        assert!(policy.should_alert(1));
        assert!(!policy.should_alert(2));
        assert!(!policy.should_alert(999));
        assert!(policy.should_alert(1000));
        assert!(policy.should_alert(2000));

        assert!(!OverflowPolicy::DropNewest.should_alert(1));
    }
}
