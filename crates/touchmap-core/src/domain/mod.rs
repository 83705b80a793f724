//! Domain entities for the input-to-touch mapping engine.
//!
//! Everything here is plain data plus pure functions. Nothing in this module
//! performs I/O, spawns work or holds a lock across a call boundary, so every
//! rule can be unit-tested in isolation.

/// Directional-pad geometry: the diagonal whitelist and per-tick steps.
pub mod direction;
/// Mapping records handed to the engine by the configuration provider.
pub mod mapping;
/// Virtual pointer id allocation.
pub mod pointer;
/// Emitted touch entities and positions.
pub mod touch;
/// Window bounds used to clamp emitted coordinates.
pub mod window;
