//! Month-capacity limiter for Approval completions

/// Enforces the system-wide cap on Approval completions per month.
///
/// Slots are granted in the order vaccines are simulated within a run.
/// A completion landing in a full month is pushed to the next month with
/// spare capacity; once granted, a slot is never reordered.
#[derive(Debug)]
pub struct ApprovalLimiter {
    limit: u32,
    horizon: u32,
    granted: Vec<u32>,
}

impl ApprovalLimiter {
    /// A limiter covering months `0..=horizon` with `limit` slots each.
    #[must_use]
    pub fn new(limit: u32, horizon: u32) -> Self {
        Self {
            limit,
            horizon,
            granted: vec![0; horizon as usize + 1],
        }
    }

    /// Grant a completion slot at or after `requested`.
    ///
    /// Returns the granted month, or `None` when every month through the
    /// horizon is at capacity. A zero limit never grants.
    pub fn schedule(&mut self, requested: u32) -> Option<u32> {
        if self.limit == 0 {
            return None;
        }
        let mut month = requested;
        while month <= self.horizon {
            let taken = &mut self.granted[month as usize];
            if *taken < self.limit {
                *taken += 1;
                return Some(month);
            }
            month += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_up_to_limit_then_defers() {
        let mut limiter = ApprovalLimiter::new(2, 12);

        assert_eq!(limiter.schedule(5), Some(5));
        assert_eq!(limiter.schedule(5), Some(5));
        assert_eq!(limiter.schedule(5), Some(6), "third request spills over");
        assert_eq!(limiter.schedule(5), Some(6));
        assert_eq!(limiter.schedule(5), Some(7));
    }

    #[test]
    fn test_zero_limit_never_grants() {
        let mut limiter = ApprovalLimiter::new(0, 12);
        assert_eq!(limiter.schedule(0), None);
        assert_eq!(limiter.schedule(12), None);
    }

    #[test]
    fn test_horizon_exhaustion() {
        let mut limiter = ApprovalLimiter::new(1, 3);

        assert_eq!(limiter.schedule(2), Some(2));
        assert_eq!(limiter.schedule(2), Some(3));
        assert_eq!(limiter.schedule(2), None, "no capacity left inside horizon");
        assert_eq!(limiter.schedule(4), None, "requests past the horizon fail");
    }

    #[test]
    fn test_deferral_does_not_steal_earlier_capacity() {
        let mut limiter = ApprovalLimiter::new(1, 12);

        assert_eq!(limiter.schedule(3), Some(3));
        // A later vaccine requesting an earlier month takes the next free slot
        assert_eq!(limiter.schedule(3), Some(4));
        assert_eq!(limiter.schedule(1), Some(1));
    }
}
