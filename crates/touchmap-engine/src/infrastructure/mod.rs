//! Infrastructure layer of the engine.
//!
//! Concrete adapters for the application-layer ports: touch sinks, an
//! in-memory mapping provider, configuration files and replay scenarios.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchmap_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.

pub mod mapping_store;
pub mod scenario;
pub mod storage;
pub mod touch_sink;
