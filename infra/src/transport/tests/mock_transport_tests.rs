//! Tests for the mock transport

use otp_core::services::transport::{event_channel, Transport, TransportEvent};

use crate::transport::MockTransport;

#[tokio::test]
async fn test_initialize_emits_ready() {
    let (sink, mut stream) = event_channel();
    let transport = MockTransport::new(sink);

    transport.initialize().await.unwrap();

    assert_eq!(stream.recv().await, Some(TransportEvent::Ready));
}

#[tokio::test]
async fn test_send_counts_messages() {
    let (sink, _stream) = event_channel();
    let transport = MockTransport::quiet(sink);

    transport.send_message("15551234567@c.us", "hello").await.unwrap();
    transport.send_message("15551234567@c.us", "again").await.unwrap();

    assert_eq!(transport.get_message_count(), 2);
    assert!(transport.destroy().await.is_ok());
}
