// SPDX-License-Identifier: Apache-2.0

//! Connection health accounting.
//!
//! Every logical register operation counts as one packet; every transport
//! timeout (including each retry) counts separately. Once either counter
//! reaches the decay threshold both are divided by four, which bounds growth
//! while keeping an exponentially weighted timeout ratio.

/// Decay threshold for the packet/timeout counters
const DECAY_THRESHOLD: u32 = 1000;

/// Decaying packet/timeout counters and the derived health percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionHealth {
    packets: u32,
    timeouts: u32,
}

impl ConnectionHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one logical register operation.
    ///
    /// The decay check runs before the increment, so the counters shrink on
    /// the first call after either crosses the threshold.
    pub fn record_attempt(&mut self) {
        if self.packets / DECAY_THRESHOLD > 0 || self.timeouts / DECAY_THRESHOLD > 0 {
            self.packets /= 4;
            self.timeouts /= 4;
        }
        self.packets += 1;
    }

    /// Count one transport timeout.
    pub fn record_timeout(&mut self) {
        self.timeouts += 1;
    }

    /// Health as a percentage: 100 minus the timeout-per-packet ratio.
    ///
    /// Defined as 100.0 before any packet has been sent.
    pub fn percentage(&self) -> f64 {
        if self.packets == 0 {
            return 100.0;
        }
        100.0 - (self.timeouts as f64 * 100.0 / self.packets as f64)
    }

    pub fn packets(&self) -> u32 {
        self.packets
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_no_traffic() {
        assert_eq!(ConnectionHealth::new().percentage(), 100.0);
    }

    #[test]
    fn test_health_ratio() {
        let mut health = ConnectionHealth::new();
        health.record_attempt();
        assert_eq!(health.percentage(), 100.0);

        health.record_attempt();
        health.record_timeout();
        assert_eq!(health.packets(), 2);
        assert_eq!(health.timeouts(), 1);
        assert_eq!(health.percentage(), 50.0);
    }

    #[test]
    fn test_decay_fires_on_next_call() {
        let mut health = ConnectionHealth::new();
        for _ in 0..999 {
            health.record_attempt();
        }
        // 999 packets: below threshold, no decay on the 1000th call's check
        health.record_attempt();
        assert_eq!(health.packets(), 1000);

        // 1000 crosses the integer-division threshold, so the very next call
        // decays before incrementing
        health.record_attempt();
        assert_eq!(health.packets(), 251);
    }

    #[test]
    fn test_decay_from_1001() {
        let mut health = ConnectionHealth {
            packets: 1001,
            timeouts: 40,
        };
        health.record_attempt();
        // 1001 / 4 = 250, then the increment lands
        assert_eq!(health.packets(), 251);
        assert_eq!(health.timeouts(), 10);
    }

    #[test]
    fn test_timeout_counter_triggers_decay() {
        let mut health = ConnectionHealth {
            packets: 10,
            timeouts: 1200,
        };
        health.record_attempt();
        assert_eq!(health.packets(), 3);
        assert_eq!(health.timeouts(), 300);
    }
}
