//! Per-exercise countdown as an explicit tick abstraction.
//!
//! Timed cards count down from their duration in one-second steps; when the
//! countdown reaches zero the driver invokes `advance(skipped=false)` on the
//! engine, crediting the card as completed. Pausing suspends ticks without
//! losing the remainder. Rep-based cards never get a countdown; they only
//! advance on explicit user action.

/// Result of a single one-second tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Countdown decremented; this many seconds remain
    Running(u32),
    /// Countdown just reached (or was already at) zero
    Expired,
    /// Countdown is paused; nothing changed
    Paused,
}

/// A cancellable per-card countdown
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    paused: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            paused: false,
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Ticks are expected to arrive once per second from the driving loop;
    /// a tick while paused or after expiry changes nothing.
    pub fn tick(&mut self) -> Tick {
        if self.paused {
            return Tick::Paused;
        }
        if self.remaining == 0 {
            return Tick::Expired;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    /// Suspend ticks, preserving the remaining count
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume ticks from the stored remainder
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}
