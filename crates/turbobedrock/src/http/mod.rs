//! Outbound HTTP seams: signing and transport

pub mod signer;
pub mod transport;

pub use signer::{BearerTokenSigner, NoopSigner, SignableRequest, Signer};
pub use transport::{ByteStream, HttpTransport, HttpTransportBuilder, OutboundRequest, Transport};
