//! Application layer of the engine.
//!
//! Everything in this layer depends on traits ([`provider::MappingProvider`],
//! [`emitter::TouchSink`]) and on `touchmap_core` domain types only. The
//! concrete adapters live in `infrastructure` and are injected at
//! construction time, which keeps every mode handler unit-testable.
//!
//! # Sub-modules
//!
//! - **`context`** – Per-session mutable state shared by every handler and
//!   the ticker, guarded by a single lock.
//! - **`emitter`** – Builds touch entities and keeps the pointer cache current.
//! - **`handlers`** – One state machine per input mode.
//! - **`observation_task`** – The 50 ms keyboard-observation ticker.
//! - **`engine`** – Resolves mappings and dispatches events to handlers.
//! - **`sessions`** – One engine per mapped session.

pub mod context;
pub mod emitter;
pub mod engine;
pub mod handlers;
pub mod observation_task;
pub mod provider;
pub mod sessions;
