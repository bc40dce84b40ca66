use log::{debug, info, warn};
use thiserror::Error;

use crate::classify::{classify, LiveCounters, RenderModel};
use crate::corpus::{CorpusError, CorpusFeed, DEFAULT_ROUND_TOKENS};
use crate::metrics::{Metrics, MetricsStatus};

/// Default test length in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("duration must be at least one second")]
    InvalidDuration,

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub duration_secs: u64,
    /// Upper bound on tokens requested per round.
    pub max_tokens: usize,
    /// Drop committed slots from the front once more than this many are held.
    pub max_retained_slots: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            max_tokens: DEFAULT_ROUND_TOKENS,
            max_retained_slots: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first keystroke; the clock does not run.
    Idle,
    Running,
    /// Time is up; input is ignored until reset.
    Finished,
}

/// One target word and what was typed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSlot {
    pub target: String,
    pub typed: Option<String>,
    pub status: SlotStatus,
}

impl WordSlot {
    pub fn new(target: String) -> Self {
        Self {
            target,
            typed: None,
            status: SlotStatus::Pending,
        }
    }
}

/// A single commit, kept for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub typed: String,
    pub status: SlotStatus,
}

/// A key press as delivered by the key-capture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Backspace,
}

impl Key {
    /// Parse a captured key name: one code point, or `"Space"` / `"Backspace"`.
    ///
    /// Anything else (including control characters) yields `None`.
    pub fn parse(raw: &str) -> Option<Key> {
        match raw {
            "Space" | " " => return Some(Key::Space),
            "Backspace" => return Some(Key::Backspace),
            _ => {}
        }

        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(Key::Char(c)),
            _ => None,
        }
    }
}

/// The typing test state machine.
///
/// Consumes one tick per second while running and one event per key press.
/// It holds no background tasks; the host owns the clock and stops delivering
/// ticks once the session is finished.
pub struct TypingSession {
    feed: Box<dyn CorpusFeed>,
    config: SessionConfig,
    /// Duration the current session runs for; `config` changes apply on reset.
    duration_secs: u64,
    slots: Vec<WordSlot>,
    /// Number of committed slots dropped from the front of `slots`.
    slot_offset: usize,
    cursor: usize,
    buffer: String,
    seconds_remaining: u64,
    phase: Phase,
    history: Vec<HistoryEntry>,
}

impl std::fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingSession")
            .field("phase", &self.phase)
            .field("cursor", &self.cursor)
            .field("buffer", &self.buffer)
            .field("seconds_remaining", &self.seconds_remaining)
            .field("slots", &self.slots.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl TypingSession {
    pub fn new(feed: Box<dyn CorpusFeed>, config: SessionConfig) -> Result<Self, SessionError> {
        if config.duration_secs == 0 {
            return Err(SessionError::InvalidDuration);
        }
        let slots = fresh_slots(feed.as_ref(), config.max_tokens)?;

        Ok(Self {
            feed,
            duration_secs: config.duration_secs,
            seconds_remaining: config.duration_secs,
            config,
            slots,
            slot_offset: 0,
            cursor: 0,
            buffer: String::new(),
            phase: Phase::Idle,
            history: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Slots still held, the first of which has absolute index `slot_offset()`.
    pub fn slots(&self) -> &[WordSlot] {
        &self.slots
    }

    pub fn slot_offset(&self) -> usize {
        self.slot_offset
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    /// Duration of the current session.
    pub fn duration(&self) -> u64 {
        self.duration_secs
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Change the test length.
    ///
    /// Applies immediately while idle, otherwise from the next reset.
    pub fn configure(&mut self, duration_secs: u64) -> Result<(), SessionError> {
        if duration_secs == 0 {
            return Err(SessionError::InvalidDuration);
        }
        self.config.duration_secs = duration_secs;
        if self.phase == Phase::Idle {
            self.duration_secs = duration_secs;
            self.seconds_remaining = duration_secs;
        }
        debug!("configured duration {duration_secs}s");
        Ok(())
    }

    /// Discard everything and start over idle with a fresh round.
    ///
    /// On error the current state is left untouched.
    pub fn reset(&mut self) -> Result<(), CorpusError> {
        let slots = fresh_slots(self.feed.as_ref(), self.config.max_tokens)?;

        self.slots = slots;
        self.slot_offset = 0;
        self.cursor = 0;
        self.buffer.clear();
        self.history.clear();
        self.duration_secs = self.config.duration_secs;
        self.seconds_remaining = self.duration_secs;
        self.phase = Phase::Idle;
        debug!("session reset, {} slots", self.slots.len());
        Ok(())
    }

    pub fn on_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.finish();
        }
    }

    /// Handle a raw key name, silently ignoring anything `Key::parse` rejects.
    pub fn on_key_str(&mut self, raw: &str) {
        if let Some(key) = Key::parse(raw) {
            self.on_key(key);
        }
    }

    pub fn on_key(&mut self, key: Key) {
        match self.phase {
            Phase::Finished => return,
            Phase::Idle => {
                self.phase = Phase::Running;
                debug!("session started");
            }
            Phase::Running => {}
        }

        match key {
            Key::Space | Key::Char(' ') => {
                if !self.buffer.trim().is_empty() {
                    self.commit();
                }
            }
            Key::Backspace => self.backspace(),
            Key::Char(c) if !c.is_control() => self.buffer.push(c),
            Key::Char(_) => {}
        }
    }

    pub fn metrics(&self) -> MetricsStatus {
        match self.phase {
            Phase::Finished => {
                MetricsStatus::Ready(Metrics::compute(&self.history, self.duration_secs))
            }
            Phase::Idle | Phase::Running => MetricsStatus::Unavailable,
        }
    }

    pub fn live_counters(&self) -> LiveCounters {
        LiveCounters {
            committed: self.history.len(),
            correct: self
                .history
                .iter()
                .filter(|entry| entry.status == SlotStatus::Correct)
                .count(),
        }
    }

    pub fn render_model(&self) -> RenderModel {
        RenderModel {
            words: classify(self),
            seconds_remaining: self.seconds_remaining,
            phase: self.phase,
            live: self.live_counters(),
        }
    }

    fn backspace(&mut self) {
        if self.buffer.pop().is_some() {
            return;
        }

        let Some(previous) = self.cursor.checked_sub(1) else {
            return;
        };
        let slot = &mut self.slots[previous];
        // correct words stay locked
        if slot.status != SlotStatus::Incorrect {
            return;
        }

        self.buffer = slot.typed.clone().unwrap_or_default();
        slot.status = SlotStatus::Pending;
        self.cursor = previous;
        debug!("reopened slot {}", self.slot_offset + previous);
    }

    fn commit(&mut self) {
        let Some(slot) = self.slots.get_mut(self.cursor) else {
            return;
        };

        let typed = self.buffer.trim().to_string();
        let status = if typed == slot.target {
            SlotStatus::Correct
        } else {
            SlotStatus::Incorrect
        };
        slot.typed = Some(typed.clone());
        slot.status = status;

        debug!(
            "committed slot {} {:?} as {:?}",
            self.slot_offset + self.cursor,
            typed,
            status
        );
        self.history.push(HistoryEntry { typed, status });
        self.buffer.clear();
        self.cursor += 1;

        if self.cursor == self.slots.len() {
            self.extend_round();
        }
    }

    fn extend_round(&mut self) {
        match self.feed.next_round(self.config.max_tokens) {
            Ok(tokens) => {
                debug!("appending round of {} words", tokens.len());
                self.slots.extend(tokens.into_iter().map(WordSlot::new));
                self.trim_retained();
            }
            Err(err) => {
                warn!("could not extend text, finishing early: {err}");
                self.finish();
            }
        }
    }

    fn trim_retained(&mut self) {
        let Some(cap) = self.config.max_retained_slots else {
            return;
        };
        // keep the slot just before the cursor so it can still be reopened
        let excess = self
            .slots
            .len()
            .saturating_sub(cap)
            .min(self.cursor.saturating_sub(1));
        if excess == 0 {
            return;
        }

        self.slots.drain(..excess);
        self.cursor -= excess;
        self.slot_offset += excess;
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        let metrics = Metrics::compute(&self.history, self.duration_secs);
        info!(
            "session finished: {} wpm, {}% accuracy ({} of {} words)",
            metrics.wpm, metrics.accuracy, metrics.correct, metrics.attempted
        );
    }
}

fn fresh_slots(feed: &dyn CorpusFeed, max_tokens: usize) -> Result<Vec<WordSlot>, CorpusError> {
    let tokens = feed.next_round(max_tokens)?;
    if tokens.is_empty() {
        return Err(CorpusError::EmptySource {
            name: "feed".to_string(),
        });
    }
    Ok(tokens.into_iter().map(WordSlot::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FixedFeed;
    use assert_matches::assert_matches;
    use std::cell::Cell;

    fn session_with(words: &[&str], duration_secs: u64) -> TypingSession {
        TypingSession::new(
            Box::new(FixedFeed::new(words.iter().copied())),
            SessionConfig {
                duration_secs,
                ..SessionConfig::default()
            },
        )
        .unwrap()
    }

    fn type_str(session: &mut TypingSession, text: &str) {
        for c in text.chars() {
            session.on_key(Key::Char(c));
        }
    }

    fn state(session: &TypingSession) -> (usize, String, Vec<WordSlot>, usize, Phase) {
        (
            session.cursor(),
            session.buffer().to_string(),
            session.slots().to_vec(),
            session.history().len(),
            session.phase(),
        )
    }

    /// Succeeds for the first `remaining` rounds, then reports an empty source.
    struct FlakyFeed {
        remaining: Cell<usize>,
    }

    impl CorpusFeed for FlakyFeed {
        fn next_round(&self, _max_tokens: usize) -> Result<Vec<String>, CorpusError> {
            match self.remaining.get() {
                0 => Err(CorpusError::EmptySource {
                    name: "flaky".to_string(),
                }),
                n => {
                    self.remaining.set(n - 1);
                    Ok(vec!["go".to_string()])
                }
            }
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session_with(&["cat", "dog"], 30);

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.buffer(), "");
        assert_eq!(session.seconds_remaining(), 30);
        assert_eq!(session.slots().len(), 2);
        assert!(session
            .slots()
            .iter()
            .all(|s| s.status == SlotStatus::Pending && s.typed.is_none()));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_new_rejects_zero_duration() {
        let result = TypingSession::new(
            Box::new(FixedFeed::new(["cat"])),
            SessionConfig {
                duration_secs: 0,
                ..SessionConfig::default()
            },
        );
        assert_matches!(result, Err(SessionError::InvalidDuration));
    }

    #[test]
    fn test_new_rejects_empty_feed() {
        let result = TypingSession::new(
            Box::new(FixedFeed::new(Vec::<&str>::new())),
            SessionConfig::default(),
        );
        assert_matches!(
            result,
            Err(SessionError::Corpus(CorpusError::EmptySource { .. }))
        );
    }

    #[test]
    fn test_ticks_while_idle_are_ignored() {
        let mut session = session_with(&["cat"], 5);
        session.on_tick();
        session.on_tick();
        assert_eq!(session.seconds_remaining(), 5);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_first_key_starts_the_clock() {
        let mut session = session_with(&["cat"], 5);
        session.on_key(Key::Char('c'));

        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.buffer(), "c");

        session.on_tick();
        assert_eq!(session.seconds_remaining(), 4);
    }

    #[test]
    fn test_first_key_starts_even_when_a_noop() {
        let mut session = session_with(&["cat"], 5);
        session.on_key(Key::Backspace);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_timer_runs_out() {
        let mut session = session_with(&["cat"], 2);
        session.on_key(Key::Char('c'));
        session.on_tick();
        assert_eq!(session.phase(), Phase::Running);
        assert!(!session.metrics().is_ready());

        session.on_tick();
        assert_eq!(session.seconds_remaining(), 0);
        assert_eq!(session.phase(), Phase::Finished);
        assert!(session.metrics().is_ready());
    }

    #[test]
    fn test_late_ticks_change_nothing() {
        let mut session = session_with(&["cat"], 1);
        session.on_key(Key::Char('c'));
        session.on_tick();
        assert_eq!(session.phase(), Phase::Finished);

        session.on_tick();
        session.on_tick();
        assert_eq!(session.seconds_remaining(), 0);
        assert_eq!(session.phase(), Phase::Finished);
    }

    #[test]
    fn test_keys_after_finish_are_ignored() {
        let mut session = session_with(&["cat", "dog"], 1);
        type_str(&mut session, "ca");
        session.on_tick();

        let before = state(&session);
        type_str(&mut session, "t");
        session.on_key(Key::Space);
        session.on_key(Key::Backspace);
        assert_eq!(state(&session), before);
    }

    #[test]
    fn test_commit_correct_word() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cat");
        session.on_key(Key::Space);

        assert_eq!(session.cursor(), 1);
        assert_eq!(session.buffer(), "");
        assert_eq!(session.slots()[0].status, SlotStatus::Correct);
        assert_eq!(session.slots()[0].typed.as_deref(), Some("cat"));
        assert_eq!(
            session.history(),
            &[HistoryEntry {
                typed: "cat".to_string(),
                status: SlotStatus::Correct
            }]
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "Cat");
        session.on_key(Key::Space);
        assert_eq!(session.slots()[0].status, SlotStatus::Incorrect);
    }

    #[test]
    fn test_char_space_behaves_like_space() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cat ");
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_space_on_empty_buffer_is_ignored() {
        let mut session = session_with(&["cat", "dog"], 60);
        session.on_key(Key::Space);
        session.on_key(Key::Space);

        assert_eq!(session.cursor(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_space_on_whitespace_buffer_is_ignored() {
        let mut session = session_with(&["cat", "dog"], 60);
        // a no-break space is printable but trims away
        session.on_key(Key::Char('\u{a0}'));
        session.on_key(Key::Space);

        assert_eq!(session.cursor(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.buffer(), "\u{a0}");
    }

    #[test]
    fn test_control_chars_are_not_typed() {
        let mut session = session_with(&["cat"], 60);
        session.on_key(Key::Char('\t'));
        session.on_key(Key::Char('\n'));
        assert_eq!(session.buffer(), "");
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let mut session = session_with(&["cat"], 60);
        type_str(&mut session, "cax");
        session.on_key(Key::Backspace);
        assert_eq!(session.buffer(), "ca");
    }

    #[test]
    fn test_backspace_removes_whole_code_point() {
        let mut session = session_with(&["café"], 60);
        type_str(&mut session, "café");
        session.on_key(Key::Backspace);
        assert_eq!(session.buffer(), "caf");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut session = session_with(&["cat"], 60);
        session.on_key(Key::Char('c'));
        session.on_key(Key::Backspace);
        let before = state(&session);
        session.on_key(Key::Backspace);
        assert_eq!(state(&session), before);
    }

    #[test]
    fn test_backspace_into_correct_word_is_noop() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cat");
        session.on_key(Key::Space);

        session.on_key(Key::Backspace);
        let after_first = state(&session);
        assert_eq!(after_first.0, 1);

        session.on_key(Key::Backspace);
        assert_eq!(state(&session), after_first);
        assert_eq!(session.slots()[0].status, SlotStatus::Correct);
    }

    #[test]
    fn test_backspace_reopens_incorrect_word() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cag");
        session.on_key(Key::Space);
        assert_eq!(session.slots()[0].status, SlotStatus::Incorrect);

        session.on_key(Key::Backspace);

        assert_eq!(session.cursor(), 0);
        assert_eq!(session.buffer(), "cag");
        assert_eq!(session.slots()[0].status, SlotStatus::Pending);
        // the original commit stays on record
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_fixing_a_reopened_word() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cag");
        session.on_key(Key::Space);
        session.on_key(Key::Backspace);
        session.on_key(Key::Backspace);
        type_str(&mut session, "t");
        session.on_key(Key::Space);

        assert_eq!(session.cursor(), 1);
        assert_eq!(session.slots()[0].status, SlotStatus::Correct);
        let statuses: Vec<_> = session.history().iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![SlotStatus::Incorrect, SlotStatus::Correct]);
    }

    #[test]
    fn test_backspace_walks_back_through_incorrect_words() {
        let mut session = session_with(&["a", "b", "c"], 60);
        type_str(&mut session, "x y ");
        assert_eq!(session.cursor(), 2);

        session.on_key(Key::Backspace);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.buffer(), "y");

        session.on_key(Key::Backspace);
        assert_eq!(session.buffer(), "");
        session.on_key(Key::Backspace);
        // slot 0 is incorrect and directly behind the cursor again
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.buffer(), "x");
    }

    #[test]
    fn test_slots_before_cursor_are_never_pending() {
        let mut session = session_with(&["a", "b", "c", "d"], 60);
        type_str(&mut session, "a x ");
        session.on_key(Key::Backspace);
        type_str(&mut session, "b c ");

        let cursor = session.cursor();
        assert!(session.slots()[..cursor]
            .iter()
            .all(|s| s.status != SlotStatus::Pending));
    }

    #[test]
    fn test_history_counts_every_commit() {
        let mut session = session_with(&["a", "b", "c"], 60);
        let commits = ["a", "q", "c", "zz", "b"];
        for word in commits {
            type_str(&mut session, word);
            session.on_key(Key::Space);
        }
        session.on_key(Key::Space);

        assert_eq!(session.history().len(), commits.len());
        let correct = session
            .history()
            .iter()
            .filter(|e| e.status == SlotStatus::Correct)
            .count();
        assert!(correct <= session.history().len());
    }

    #[test]
    fn test_round_regeneration_is_seamless() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cat dog");
        session.on_tick();
        session.on_key(Key::Space);

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.slots().len(), 4);
        assert_eq!(session.slots()[2].status, SlotStatus::Pending);
        assert_eq!(session.slots()[3].target, "dog");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.seconds_remaining(), 59);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_failed_regeneration_finishes_early() {
        let feed = FlakyFeed {
            remaining: Cell::new(1),
        };
        let mut session = TypingSession::new(Box::new(feed), SessionConfig::default()).unwrap();
        type_str(&mut session, "go ");

        assert_eq!(session.phase(), Phase::Finished);
        let metrics = session.metrics().ready().unwrap();
        assert_eq!(metrics.correct, 1);
        assert_eq!(metrics.wpm, 1);
    }

    #[test]
    fn test_retention_cap_drops_old_slots() {
        let mut session = TypingSession::new(
            Box::new(FixedFeed::new(["a", "b"])),
            SessionConfig {
                max_retained_slots: Some(3),
                ..SessionConfig::default()
            },
        )
        .unwrap();

        type_str(&mut session, "a x a b ");
        assert_eq!(session.history().len(), 4);
        assert!(session.slots().len() <= 4);
        assert_eq!(session.slot_offset() + session.cursor(), 4);
        assert_eq!(session.slots()[session.cursor()].target, "a");

        // the word right behind the cursor survives trimming
        session.on_key(Key::Backspace);
        assert_eq!(session.slot_offset() + session.cursor(), 4);
    }

    #[test]
    fn test_retention_keeps_reopenable_word() {
        let mut session = TypingSession::new(
            Box::new(FixedFeed::new(["a", "b"])),
            SessionConfig {
                max_retained_slots: Some(2),
                ..SessionConfig::default()
            },
        )
        .unwrap();

        type_str(&mut session, "a x ");
        session.on_key(Key::Backspace);
        assert_eq!(session.buffer(), "x");
        assert_eq!(session.slot_offset() + session.cursor(), 1);
    }

    #[test]
    fn test_metrics_unavailable_until_finished() {
        let mut session = session_with(&["cat"], 60);
        assert_eq!(session.metrics(), MetricsStatus::Unavailable);
        session.on_key(Key::Char('c'));
        assert_eq!(session.metrics(), MetricsStatus::Unavailable);
    }

    #[test]
    fn test_metrics_for_two_of_three() {
        let mut session = session_with(&["cat", "dog", "cow"], 60);
        type_str(&mut session, "cat dog cox ");
        for _ in 0..60 {
            session.on_tick();
        }

        let metrics = session.metrics().ready().unwrap();
        assert_eq!(metrics.wpm, 2);
        assert_eq!(metrics.accuracy, 67);
    }

    #[test]
    fn test_metrics_with_no_attempts() {
        let mut session = session_with(&["cat"], 3);
        session.on_key(Key::Char('c'));
        for _ in 0..3 {
            session.on_tick();
        }

        let metrics = session.metrics().ready().unwrap();
        assert_eq!(metrics.wpm, 0);
        assert_eq!(metrics.accuracy, 0);
    }

    #[test]
    fn test_reset_restores_idle() {
        let mut session = session_with(&["cat", "dog"], 2);
        type_str(&mut session, "cat d");
        session.on_tick();
        session.on_tick();
        assert_eq!(session.phase(), Phase::Finished);

        session.reset().unwrap();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.buffer(), "");
        assert_eq!(session.seconds_remaining(), 2);
        assert!(session.history().is_empty());
        assert!(session
            .slots()
            .iter()
            .all(|s| s.status == SlotStatus::Pending));
    }

    #[test]
    fn test_reset_mid_run() {
        let mut session = session_with(&["cat", "dog"], 10);
        type_str(&mut session, "cat ");
        session.on_tick();
        session.reset().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.seconds_remaining(), 10);
        assert_eq!(session.metrics(), MetricsStatus::Unavailable);
    }

    #[test]
    fn test_failed_reset_keeps_state() {
        let feed = FlakyFeed {
            remaining: Cell::new(1),
        };
        let mut session = TypingSession::new(Box::new(feed), SessionConfig::default()).unwrap();
        type_str(&mut session, "g");

        assert!(session.reset().is_err());
        assert_eq!(session.buffer(), "g");
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_configure_while_idle_applies_now() {
        let mut session = session_with(&["cat"], 60);
        session.configure(15).unwrap();
        assert_eq!(session.seconds_remaining(), 15);
        assert_eq!(session.duration(), 15);
    }

    #[test]
    fn test_configure_while_running_applies_on_reset() {
        let mut session = session_with(&["cat"], 60);
        session.on_key(Key::Char('c'));
        session.configure(15).unwrap();
        assert_eq!(session.seconds_remaining(), 60);
        assert_eq!(session.duration(), 60);

        session.reset().unwrap();
        assert_eq!(session.seconds_remaining(), 15);
    }

    #[test]
    fn test_configure_rejects_zero() {
        let mut session = session_with(&["cat"], 60);
        assert_matches!(session.configure(0), Err(SessionError::InvalidDuration));
        assert_eq!(session.seconds_remaining(), 60);
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("a"), Some(Key::Char('a')));
        assert_eq!(Key::parse("é"), Some(Key::Char('é')));
        assert_eq!(Key::parse(" "), Some(Key::Space));
        assert_eq!(Key::parse("Space"), Some(Key::Space));
        assert_eq!(Key::parse("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::parse("Shift"), None);
        assert_eq!(Key::parse("ab"), None);
        assert_eq!(Key::parse(""), None);
        assert_eq!(Key::parse("\n"), None);
    }

    #[test]
    fn test_malformed_key_changes_nothing() {
        let mut session = session_with(&["cat"], 60);
        let before = state(&session);
        session.on_key_str("Enter");
        session.on_key_str("ArrowLeft");
        assert_eq!(state(&session), before);

        session.on_key_str("c");
        assert_eq!(session.buffer(), "c");
    }

    #[test]
    fn test_live_counters() {
        let mut session = session_with(&["cat", "dog"], 60);
        type_str(&mut session, "cat dig ");
        let live = session.live_counters();
        assert_eq!(live.committed, 2);
        assert_eq!(live.correct, 1);
    }
}
