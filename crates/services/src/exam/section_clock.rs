//! One-second countdowns for the overall exam and the listening section.

/// What a single tick did to the countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Both countdowns still have time left (or the clock is stopped).
    Running,
    /// The listening countdown reached zero on this tick.
    ListeningExpired,
    /// The overall countdown reached zero on this tick.
    TimeExpired,
}

/// Overall and listening countdowns in whole seconds.
///
/// The listening countdown only runs until [`SectionClock::stop_listening`] is
/// called; the overall countdown runs until it expires or [`SectionClock::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionClock {
    total_remaining: u32,
    listening_remaining: u32,
    listening_running: bool,
    stopped: bool,
}

impl SectionClock {
    #[must_use]
    pub fn new(total_secs: u32, listening_secs: u32) -> Self {
        Self {
            total_remaining: total_secs,
            listening_remaining: listening_secs.min(total_secs),
            listening_running: true,
            stopped: false,
        }
    }

    /// Applies one second to every running countdown.
    ///
    /// When both reach zero on the same tick, overall expiry wins.
    pub fn tick(&mut self) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Running;
        }

        self.total_remaining = self.total_remaining.saturating_sub(1);
        if self.listening_running {
            self.listening_remaining = self.listening_remaining.saturating_sub(1);
        }

        if self.total_remaining == 0 {
            self.stop();
            return TickOutcome::TimeExpired;
        }
        if self.listening_running && self.listening_remaining == 0 {
            self.listening_running = false;
            return TickOutcome::ListeningExpired;
        }
        TickOutcome::Running
    }

    pub fn stop_listening(&mut self) {
        self.listening_running = false;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.listening_running = false;
    }

    #[must_use]
    pub fn total_remaining_secs(&self) -> u32 {
        self.total_remaining
    }

    #[must_use]
    pub fn listening_remaining_secs(&self) -> u32 {
        self.listening_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listening_expires_before_overall() {
        let mut clock = SectionClock::new(5, 2);
        assert_eq!(clock.tick(), TickOutcome::Running);
        assert_eq!(clock.tick(), TickOutcome::ListeningExpired);
        assert_eq!(clock.listening_remaining_secs(), 0);
        assert_eq!(clock.total_remaining_secs(), 3);

        assert_eq!(clock.tick(), TickOutcome::Running);
        assert_eq!(clock.listening_remaining_secs(), 0);
    }

    #[test]
    fn overall_expiry_wins_a_tie() {
        let mut clock = SectionClock::new(2, 2);
        clock.tick();
        assert_eq!(clock.tick(), TickOutcome::TimeExpired);
        assert_eq!(clock.tick(), TickOutcome::Running);
        assert_eq!(clock.total_remaining_secs(), 0);
    }

    #[test]
    fn stopped_clock_no_longer_counts() {
        let mut clock = SectionClock::new(10, 4);
        clock.stop_listening();
        clock.tick();
        assert_eq!(clock.listening_remaining_secs(), 4);
        assert_eq!(clock.total_remaining_secs(), 9);

        clock.stop();
        clock.tick();
        assert_eq!(clock.total_remaining_secs(), 9);
    }
}
