//! Session-owned deferred actions, due at a point on the session timeline.

use std::time::Duration;

use exam_core::model::QuestionId;

/// Work the controller postpones for pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Move on after a stand-alone reading answer, if still on `from`.
    AdvanceAfterAnswer { from: QuestionId },
    /// Move on after a listening audio ended on `from`.
    AdvanceAfterAudio { from: QuestionId },
    /// End the transition notice and open the reading section.
    EnterReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    AnswerAdvance,
    AudioAdvance,
    Transition,
}

impl DeferredAction {
    #[must_use]
    pub fn kind(&self) -> DeferredKind {
        match self {
            DeferredAction::AdvanceAfterAnswer { .. } => DeferredKind::AnswerAdvance,
            DeferredAction::AdvanceAfterAudio { .. } => DeferredKind::AudioAdvance,
            DeferredAction::EnterReading => DeferredKind::Transition,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Duration,
    seq: u64,
    action: DeferredAction,
}

/// Pending actions ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due, seq, action });
    }

    /// Drops every pending action of `kind`; returns how many were dropped.
    pub fn cancel(&mut self, kind: DeferredKind) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.action.kind() != kind);
        before - self.entries.len()
    }

    #[must_use]
    pub fn is_pending(&self, kind: DeferredKind) -> bool {
        self.entries.iter().any(|entry| entry.action.kind() == kind)
    }

    /// Earliest due time among pending actions.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Removes and returns the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<DeferredAction> {
        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))?;
        Some(self.entries.swap_remove(pos).action)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: QuestionId = QuestionId::new(7);

    #[test]
    fn pops_in_due_then_schedule_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_millis(900), DeferredAction::EnterReading);
        queue.schedule(Duration::from_millis(500), DeferredAction::AdvanceAfterAnswer { from: Q });
        queue.schedule(Duration::from_millis(500), DeferredAction::AdvanceAfterAudio { from: Q });

        assert_eq!(queue.next_due(), Some(Duration::from_millis(500)));
        assert_eq!(queue.pop_due(Duration::from_millis(400)), None);
        assert_eq!(
            queue.pop_due(Duration::from_secs(1)),
            Some(DeferredAction::AdvanceAfterAnswer { from: Q })
        );
        assert_eq!(
            queue.pop_due(Duration::from_secs(1)),
            Some(DeferredAction::AdvanceAfterAudio { from: Q })
        );
        assert_eq!(queue.pop_due(Duration::from_secs(1)), Some(DeferredAction::EnterReading));
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_drops_only_the_given_kind() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::ZERO, DeferredAction::AdvanceAfterAnswer { from: Q });
        queue.schedule(Duration::ZERO, DeferredAction::EnterReading);

        assert_eq!(queue.cancel(DeferredKind::AnswerAdvance), 1);
        assert!(!queue.is_pending(DeferredKind::AnswerAdvance));
        assert!(queue.is_pending(DeferredKind::Transition));
        assert_eq!(queue.len(), 1);
    }
}
