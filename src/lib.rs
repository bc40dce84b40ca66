// Library surface for headless/integration tests and reuse.
// The terminal front end lives in main.rs and only talks to these modules.
pub mod app_dirs;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod metrics;
pub mod runtime;
pub mod session;

pub use classify::{classify, CharClass, ClassifiedChar, ClassifiedWord, LiveCounters, RenderModel};
pub use corpus::{CorpusError, CorpusFeed, CorpusKind};
pub use metrics::{Metrics, MetricsStatus};
pub use session::{
    HistoryEntry, Key, Phase, SessionConfig, SessionError, SlotStatus, TypingSession, WordSlot,
};
