//! Blocking delays.
//!
//! The bootstrap settle waits are plain sleeps tied to hardware power-rail
//! and register-commit timing, not to any I/O, so a thread sleep is the
//! right tool.

use std::{thread, time::Duration};

/// Pause the calling thread for `duration`.
pub fn settle(duration: Duration) {
    thread::sleep(duration);
}
