//! Transport abstraction: the byte channel to the connected peer.
//!
//! Concrete implementations wrap the wireless stack (a BLE UART-style
//! service in practice).  The scheduler is generic over `Transport`, so
//! tests substitute an in-memory double.
//!
//! Every call except [`Transport::wait_send_buffer_empty`] must return
//! promptly; that one is the single blocking point the loop allows.

/// Byte-oriented channel to the peer.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// A peer is connected and the data channel is usable.
    fn is_available(&self) -> bool;

    /// Number of inbound bytes waiting to be read.
    fn readable(&self) -> usize;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read (0 when nothing is pending).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Block until the outbound buffer has drained.
    fn wait_send_buffer_empty(&mut self) -> Result<(), Self::Error>;

    /// Queue `data` for transmission.
    /// Returns the number of bytes accepted.
    fn send(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
}

/// A transport with no peer, ever.
/// Stands in until a wireless stack adapter is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn is_available(&self) -> bool {
        false
    }

    fn readable(&self) -> usize {
        0
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn wait_send_buffer_empty(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }
}

impl super::negotiation::ConnParamsLink for NullTransport {
    fn is_connected(&self) -> bool {
        false
    }

    fn params_acceptable(&self) -> bool {
        true
    }

    fn request_update(&mut self) -> bool {
        false
    }
}
