//! Per-character classification of the session text.
//!
//! This is the only thing a renderer needs: it is recomputed from session
//! state on every event and holds nothing of its own.

use crate::session::{Phase, SlotStatus, TypingSession, WordSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Untyped,
    MatchedCorrect,
    MatchedIncorrect,
    /// Insertion point inside the word at the cursor; carries no character.
    Caret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedChar {
    pub ch: Option<char>,
    pub class: CharClass,
}

impl ClassifiedChar {
    fn target(ch: char, class: CharClass) -> Self {
        Self {
            ch: Some(ch),
            class,
        }
    }

    fn caret() -> Self {
        Self {
            ch: None,
            class: CharClass::Caret,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedWord {
    /// Absolute position of the word in the session text.
    pub index: usize,
    pub status: SlotStatus,
    pub is_current: bool,
    pub chars: Vec<ClassifiedChar>,
}

impl ClassifiedWord {
    /// Target text of the word, without the caret.
    pub fn text(&self) -> String {
        self.chars.iter().filter_map(|c| c.ch).collect()
    }

    pub fn has_caret(&self) -> bool {
        self.chars.iter().any(|c| c.class == CharClass::Caret)
    }
}

/// Words committed so far in this session, and how many were right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveCounters {
    pub committed: usize,
    pub correct: usize,
}

/// Everything a renderer draws for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub words: Vec<ClassifiedWord>,
    pub seconds_remaining: u64,
    pub phase: Phase,
    pub live: LiveCounters,
}

pub fn classify(session: &TypingSession) -> Vec<ClassifiedWord> {
    let cursor = session.cursor();
    let offset = session.slot_offset();

    session
        .slots()
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let chars = if i < cursor {
                classify_committed(slot)
            } else if i == cursor {
                classify_current(&slot.target, session.buffer())
            } else {
                untyped(&slot.target)
            };

            ClassifiedWord {
                index: offset + i,
                status: slot.status,
                is_current: i == cursor,
                chars,
            }
        })
        .collect()
}

fn classify_committed(slot: &WordSlot) -> Vec<ClassifiedChar> {
    match (slot.status, slot.typed.as_deref()) {
        (SlotStatus::Correct, _) => slot
            .target
            .chars()
            .map(|c| ClassifiedChar::target(c, CharClass::MatchedCorrect))
            .collect(),
        (SlotStatus::Incorrect, Some(typed)) => compare(&slot.target, typed),
        _ => untyped(&slot.target),
    }
}

fn classify_current(target: &str, buffer: &str) -> Vec<ClassifiedChar> {
    let mut chars = compare(target, buffer);
    let caret_at = buffer.chars().count().min(chars.len());
    chars.insert(caret_at, ClassifiedChar::caret());
    chars
}

/// Positional comparison of `typed` against every character of `target`.
fn compare(target: &str, typed: &str) -> Vec<ClassifiedChar> {
    let mut typed = typed.chars();
    target
        .chars()
        .map(|expected| {
            let class = match typed.next() {
                Some(actual) if actual == expected => CharClass::MatchedCorrect,
                Some(_) => CharClass::MatchedIncorrect,
                None => CharClass::Untyped,
            };
            ClassifiedChar::target(expected, class)
        })
        .collect()
}

fn untyped(target: &str) -> Vec<ClassifiedChar> {
    target
        .chars()
        .map(|c| ClassifiedChar::target(c, CharClass::Untyped))
        .collect()
}
