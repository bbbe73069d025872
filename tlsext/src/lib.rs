//! # tlsext - TLS hello extension negotiation
//!
//! tlsext builds and parses the extension blocks carried by TLS 1.2-era
//! ClientHello and ServerHello messages.  It is the part of a handshake that
//! decides which optional capabilities are advertised, serializes them, and
//! validates and records what the peer sent back, reporting the alert the
//! handshake should end with when something is wrong.
//!
//! It does not run a handshake by itself.  A handshake driver owns a
//! [`ConnectionState`] per connection, fills in the local side, and calls
//! into this crate at the right moments:
//!
//! - [`encode_client_hello_extensions`] / [`encode_server_hello_extensions`]
//!   append a complete extension block to an outgoing hello;
//! - [`parse_client_hello_extensions`] / [`parse_server_hello_extensions`]
//!   consume the block at the end of a received hello;
//! - [`parse_client_hello_extension`] / [`parse_server_hello_extension`]
//!   handle a single `(type, payload)` pair for drivers that split the block
//!   themselves.
//!
//! Every failure is an [`Error`], and [`Error::alert()`] gives the
//! [`AlertDescription`] to send.
//!
//! ## Supported extensions
//!
//! In the order they are written, see [`REGISTRY`]:
//!
//! | Extension | Reference |
//! |---|---|
//! | `server_name` | RFC 6066 section 3 |
//! | `renegotiation_info` | RFC 5746 |
//! | `status_request` | RFC 6066 section 8 |
//! | `ec_point_formats` | RFC 8422 section 5.1.2 |
//! | `supported_groups` | RFC 8422 section 5.1.1 |
//! | `session_ticket` | RFC 5077 section 3.2 |
//! | `signature_algorithms` | RFC 5246 section 7.4.1.4.1 |
//!
//! Extensions of any other type are reported as [`Outcome::Unknown`] and
//! otherwise ignored.
//!
//! ## Crate features
//!
//! - `std` (enabled by default): use the standard library.  Without it the
//!   crate is `no_std` and only needs `alloc`.
//! - `log` (enabled by default): emit diagnostics through the `log` crate.

#![no_std]
#![warn(missing_docs, clippy::use_self, unreachable_pub)]
#![forbid(unsafe_code, unused_must_use)]
// our top-level `use log` import causes a false positive,
// https://github.com/rust-lang/rust-clippy/issues/5210
#![allow(clippy::single_component_path_imports)]

extern crate alloc;

// This `extern crate` plus the `#![no_std]` attribute changes the default prelude from
// `std::prelude` to `core::prelude`. That forces one to _explicitly_ import (`use`) everything that
// is in `std::prelude` but not in `core::prelude`. This helps maintain no-std support as even
// developers that are not interested in, or aware of, no-std support and / or that never run
// `cargo build --no-default-features` locally will get errors when they rely on `std::prelude` API.
#[cfg(any(feature = "std", test))]
extern crate std;

// log for logging (optional).
#[cfg(feature = "log")]
use log;

#[cfg(not(feature = "log"))]
mod log {
    macro_rules! trace    ( ($($tt:tt)*) => {{}} );
    macro_rules! debug    ( ($($tt:tt)*) => {{}} );
    macro_rules! warn     ( ($($tt:tt)*) => {{}} );
    pub(crate) use {debug, trace, warn};
}

#[macro_use]
mod msgs;
mod config;
mod enums;
mod error;
mod ext;
mod state;
mod x509;

pub use crate::config::{ExtensionConfig, InspectsSessionTicket, ProcessesSignatureAlgorithms};
pub use crate::enums::{ProtocolVersion, SignatureScheme};
pub use crate::error::{
    AlertDescription, Error, InternalError, InvalidMessage, PeerIncompatible, PeerMisbehaved,
};
pub use crate::ext::{
    Extension, Outcome, REGISTRY, Registry, build_client_hello_extensions,
    build_server_hello_extensions, encode_client_hello_extensions, encode_server_hello_extensions,
    parse_client_hello_extension, parse_client_hello_extensions, parse_server_hello_extension,
    parse_server_hello_extensions,
};
pub use crate::msgs::{
    CertificateStatusType, Codec, ECPointFormat, ExtensionType, NamedGroup, Reader,
    ServerNameType,
};
pub use crate::state::{ConnectionState, SessionRecord};
pub use crate::x509::ResponderId;
