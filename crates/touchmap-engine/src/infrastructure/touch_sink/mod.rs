//! Touch-sink adapters.
//!
//! - [`RecordingTouchSink`] keeps every entity in memory for assertions and
//!   for the replay tool.
//! - [`ChannelTouchSink`] forwards entities over a tokio channel to the task
//!   that owns the host's touch pipeline.

pub mod channel;
pub mod mock;

pub use channel::ChannelTouchSink;
pub use mock::RecordingTouchSink;
