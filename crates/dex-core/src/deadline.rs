use std::time::{Duration, Instant};

use crate::error::StoreError;

/// Point in time after which store calls must not be issued.
///
/// Copied into every store call made on behalf of one request. Backends turn
/// the remaining time into a server-side limit where they can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline: calls run until the store answers.
    pub const NONE: Deadline = Deadline(None);

    pub fn after(timeout: Duration) -> Self {
        Deadline(Some(Instant::now() + timeout))
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or(Self::NONE, Self::after)
    }

    /// Time left before the deadline, `None` when unbounded.
    ///
    /// Returns `StoreError::Timeout` once the deadline has passed.
    pub fn remaining(&self) -> Result<Option<Duration>, StoreError> {
        match self.0 {
            None => Ok(None),
            Some(at) => {
                let now = Instant::now();
                if now >= at {
                    Err(StoreError::Timeout)
                } else {
                    Ok(Some(at - now))
                }
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_expires() {
        assert_eq!(Deadline::NONE.remaining().unwrap(), None);
        assert!(!Deadline::default().is_expired());
    }

    #[test]
    fn elapsed_deadline_times_out() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(matches!(deadline.remaining(), Err(StoreError::Timeout)));
    }

    #[test]
    fn future_deadline_reports_remaining_time() {
        let deadline = Deadline::from_timeout(Some(Duration::from_secs(60)));
        let left = deadline.remaining().unwrap().unwrap();
        assert!(left <= Duration::from_secs(60));
        assert!(left > Duration::from_secs(50));
    }
}
