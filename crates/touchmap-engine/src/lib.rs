//! touchmap-engine library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `touchmap-replay` binary share the same module tree.
//!
//! # What does the engine do?
//!
//! A touch-only application cannot read a keyboard or a mouse. The engine
//! sits between the host's input listener and its touch-injection pipeline:
//!
//! 1. A key, button or motion event arrives from the input source.
//! 2. The engine asks the [`MappingProvider`](application::provider::MappingProvider)
//!    which mapping applies to it.
//! 3. The handler for that mapping's mode decides, from the session's
//!    [`InputToTouchContext`](application::context::InputToTouchContext),
//!    whether a synthetic touch Down, Move or Up is produced.
//! 4. The [`TouchEmitter`](application::emitter::TouchEmitter) pushes the
//!    resulting touch entity into the [`TouchSink`](application::emitter::TouchSink).
//!
//! Keyboard observation (a directional pad emulating an analog stick) also
//! moves its finger from a background ticker, independent of new key events.

/// Application layer: context, handlers, ticker, dispatcher, sessions.
pub mod application;

/// Infrastructure layer: sinks, mapping tables, configuration and scenarios.
pub mod infrastructure;
