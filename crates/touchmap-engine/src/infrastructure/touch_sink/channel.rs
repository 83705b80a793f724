//! Channel-backed touch sink.
//!
//! The engine emits while holding the session lock, so the sink must never
//! block. An unbounded sender hands each entity to the pipeline task and
//! returns immediately.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use touchmap_core::TouchEntity;

use crate::application::emitter::{SinkError, TouchSink};

pub struct ChannelTouchSink {
    tx: UnboundedSender<TouchEntity>,
}

impl ChannelTouchSink {
    pub fn new(tx: UnboundedSender<TouchEntity>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiver the pipeline task drains.
    pub fn channel() -> (Self, UnboundedReceiver<TouchEntity>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TouchSink for ChannelTouchSink {
    fn inject(&self, entity: &TouchEntity) -> Result<(), SinkError> {
        self.tx.send(*entity).map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchmap_core::{TouchAction, TouchPoint};

    #[tokio::test]
    async fn test_entities_arrive_at_the_receiver() {
        // Arrange
        let (sink, mut rx) = ChannelTouchSink::channel();
        let entity = TouchEntity::new(3, TouchAction::Down, TouchPoint::new(4, 5), 6);

        // Act
        sink.inject(&entity).unwrap();

        // Assert
        assert_eq!(rx.recv().await, Some(entity));
    }

    #[test]
    fn test_closed_receiver_reports_closed() {
        let (sink, rx) = ChannelTouchSink::channel();
        drop(rx);

        let result = sink.inject(&TouchEntity::new(1, TouchAction::Up, TouchPoint::new(0, 0), 0));

        assert!(matches!(result, Err(SinkError::Closed)));
    }
}
