//! The extension registry and the engine that drives it.
//!
//! Each supported extension has a handler implementing [`ExtensionHandler`].
//! The handlers are listed once, in [`REGISTRY`], whose order is the order in
//! which extensions appear on the wire.  Building a hello message walks the
//! registry asking every handler whether it is needed; parsing looks up a
//! single handler by its wire type.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::error::{Error, InternalError, InvalidMessage};
use crate::log::{debug, trace};
use crate::msgs::codec::{Codec, LengthPrefixedBuffer, ListLength, Reader};
use crate::msgs::enums::ExtensionType;
use crate::state::ConnectionState;

mod ec_point_formats;
mod renegotiation;
mod server_name;
mod session_ticket;
mod signature_algorithms;
mod status_request;
mod supported_groups;

#[cfg(test)]
mod tests;

use ec_point_formats::EcPointFormats;
use renegotiation::RenegotiationIndication;
use server_name::ServerNameIndication;
use session_ticket::SessionTicket;
use signature_algorithms::SignatureAlgorithms;
use status_request::CertificateStatusRequest;
use supported_groups::SupportedGroups;

/// The six operations every extension provides.
///
/// `*_build` writes only the extension body; the engine adds the type and
/// length.  `*_parse` is given a reader over exactly the body and may leave
/// bytes unread, which the engine then rejects.
pub(crate) trait ExtensionHandler {
    const TYPE: ExtensionType;

    fn client_hello_needs(state: &ConnectionState) -> bool;
    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error>;
    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error>;

    fn server_hello_needs(state: &ConnectionState) -> bool;
    fn server_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error>;
    fn server_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error>;
}

/// The extensions this crate knows how to negotiate.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extension {
    /// `server_name`, RFC 6066 section 3
    ServerName,
    /// `renegotiation_info`, RFC 5746
    RenegotiationInfo,
    /// `status_request`, RFC 6066 section 8
    StatusRequest,
    /// `ec_point_formats`, RFC 8422 section 5.1.2
    EcPointFormats,
    /// `supported_groups` (née `elliptic_curves`), RFC 8422 section 5.1.1
    SupportedGroups,
    /// `session_ticket`, RFC 5077 section 3.2
    SessionTicket,
    /// `signature_algorithms`, RFC 5246 section 7.4.1.4.1
    SignatureAlgorithms,
}

macro_rules! dispatch {
    ($ext:expr, $method:ident($($arg:expr),*)) => {
        match $ext {
            Extension::ServerName => ServerNameIndication::$method($($arg),*),
            Extension::RenegotiationInfo => RenegotiationIndication::$method($($arg),*),
            Extension::StatusRequest => CertificateStatusRequest::$method($($arg),*),
            Extension::EcPointFormats => EcPointFormats::$method($($arg),*),
            Extension::SupportedGroups => SupportedGroups::$method($($arg),*),
            Extension::SessionTicket => SessionTicket::$method($($arg),*),
            Extension::SignatureAlgorithms => SignatureAlgorithms::$method($($arg),*),
        }
    };
}

impl Extension {
    /// The type code this extension is sent under.
    pub const fn wire_type(self) -> ExtensionType {
        match self {
            Self::ServerName => ServerNameIndication::TYPE,
            Self::RenegotiationInfo => RenegotiationIndication::TYPE,
            Self::StatusRequest => CertificateStatusRequest::TYPE,
            Self::EcPointFormats => EcPointFormats::TYPE,
            Self::SupportedGroups => SupportedGroups::TYPE,
            Self::SessionTicket => SessionTicket::TYPE,
            Self::SignatureAlgorithms => SignatureAlgorithms::TYPE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::ServerName => "ServerName",
            Self::RenegotiationInfo => "RenegotiationInfo",
            Self::StatusRequest => "StatusRequest",
            Self::EcPointFormats => "EcPointFormats",
            Self::SupportedGroups => "SupportedGroups",
            Self::SessionTicket => "SessionTicket",
            Self::SignatureAlgorithms => "SignatureAlgorithms",
        }
    }

    fn needs(self, hello: Hello, state: &ConnectionState) -> bool {
        match hello {
            Hello::Client => dispatch!(self, client_hello_needs(state)),
            Hello::Server => dispatch!(self, server_hello_needs(state)),
        }
    }

    fn build(
        self,
        hello: Hello,
        state: &mut ConnectionState,
        out: &mut Vec<u8>,
    ) -> Result<(), Error> {
        match hello {
            Hello::Client => dispatch!(self, client_hello_build(state, out)),
            Hello::Server => dispatch!(self, server_hello_build(state, out)),
        }
    }

    fn parse(
        self,
        hello: Hello,
        state: &mut ConnectionState,
        r: &mut Reader<'_>,
    ) -> Result<(), Error> {
        match hello {
            Hello::Client => dispatch!(self, client_hello_parse(state, r)),
            Hello::Server => dispatch!(self, server_hello_parse(state, r)),
        }
    }
}

/// An ordered set of extensions with distinct wire types.
#[derive(Debug)]
pub struct Registry {
    extensions: [Extension; 7],
}

impl Registry {
    const fn new(extensions: [Extension; 7]) -> Self {
        let mut i = 0;
        while i < extensions.len() {
            let mut j = i + 1;
            while j < extensions.len() {
                if extensions[i].wire_type().to_uint() == extensions[j].wire_type().to_uint() {
                    panic!("extension registered twice");
                }
                j += 1;
            }
            i += 1;
        }
        Self { extensions }
    }

    /// Extensions in emission order.
    pub fn iter(&self) -> impl Iterator<Item = Extension> + '_ {
        self.extensions.iter().copied()
    }

    /// The extension sent under `typ`, if any.
    pub fn find(&self, typ: ExtensionType) -> Option<Extension> {
        self.iter().find(|ext| ext.wire_type() == typ)
    }
}

/// Every supported extension, in the order they are emitted.
pub static REGISTRY: Registry = Registry::new([
    Extension::ServerName,
    Extension::RenegotiationInfo,
    Extension::StatusRequest,
    Extension::EcPointFormats,
    Extension::SupportedGroups,
    Extension::SessionTicket,
    Extension::SignatureAlgorithms,
]);

/// What happened to a single received extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A handler consumed the extension.
    Accepted,
    /// No handler is registered for the type; nothing was changed.
    Unknown,
}

#[derive(Clone, Copy, Debug)]
enum Hello {
    Client,
    Server,
}

/// Append every extension a ClientHello needs to `out`, without the
/// enclosing block length.
///
/// On error, nothing is left in `out` for the extension that failed.
pub fn build_client_hello_extensions(
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    build_extensions(Hello::Client, state, out)
}

/// Append every extension a ServerHello needs to `out`, without the
/// enclosing block length.
pub fn build_server_hello_extensions(
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    build_extensions(Hello::Server, state, out)
}

/// Write the complete ClientHello extension block, length prefix
/// included.  Nothing is written if no extension is needed.
pub fn encode_client_hello_extensions(
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    encode_extensions(Hello::Client, state, out)
}

/// Write the complete ServerHello extension block, length prefix
/// included.  Nothing is written if no extension is needed.
pub fn encode_server_hello_extensions(
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    encode_extensions(Hello::Server, state, out)
}

/// Process one extension received in a ClientHello.
pub fn parse_client_hello_extension(
    state: &mut ConnectionState,
    typ: ExtensionType,
    payload: &[u8],
) -> Result<Outcome, Error> {
    parse_extension(Hello::Client, state, typ, payload)
}

/// Process one extension received in a ServerHello.
pub fn parse_server_hello_extension(
    state: &mut ConnectionState,
    typ: ExtensionType,
    payload: &[u8],
) -> Result<Outcome, Error> {
    parse_extension(Hello::Server, state, typ, payload)
}

/// Process the extension block at the end of a ClientHello.
///
/// `r` is positioned after the compression methods; an absent block means
/// no extensions.  Returns the types that were accepted, in wire order.
pub fn parse_client_hello_extensions(
    state: &mut ConnectionState,
    r: &mut Reader<'_>,
) -> Result<Vec<ExtensionType>, Error> {
    parse_extensions(Hello::Client, state, r)
}

/// Process the extension block at the end of a ServerHello.
pub fn parse_server_hello_extensions(
    state: &mut ConnectionState,
    r: &mut Reader<'_>,
) -> Result<Vec<ExtensionType>, Error> {
    parse_extensions(Hello::Server, state, r)
}

fn build_extensions(
    hello: Hello,
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    for ext in REGISTRY.iter() {
        if !ext.needs(hello, state) {
            continue;
        }

        let start = out.len();
        ext.wire_type().encode(out);
        let body = LengthPrefixedBuffer::new(ListLength::U16, out);
        let result = match ext.build(hello, state, body.buf) {
            Ok(()) if body.overflowed() => {
                Err(InternalError::ExtensionTooLarge(ext.wire_type()).into())
            }
            other => other,
        };

        if let Err(err) = result {
            body.abandon();
            out.truncate(start);
            debug!("failed to build {:?} for {hello:?}Hello: {err}", ext.wire_type());
            return Err(err);
        }

        trace!("built {:?} ({} bytes)", ext.wire_type(), body.body_len());
    }

    Ok(())
}

fn encode_extensions(
    hello: Hello,
    state: &mut ConnectionState,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let block = LengthPrefixedBuffer::new(ListLength::U16, out);
    match build_extensions(hello, state, block.buf) {
        Ok(()) if block.overflowed() => {
            block.abandon();
            Err(InternalError::ListTooLong("Extensions").into())
        }
        Ok(()) if block.body_len() == 0 => {
            block.abandon();
            Ok(())
        }
        Ok(()) => Ok(()),
        Err(err) => {
            block.abandon();
            Err(err)
        }
    }
}

fn parse_extension(
    hello: Hello,
    state: &mut ConnectionState,
    typ: ExtensionType,
    payload: &[u8],
) -> Result<Outcome, Error> {
    let Some(ext) = REGISTRY.find(typ) else {
        debug!("ignoring unknown extension {typ:?} in {hello:?}Hello");
        return Ok(Outcome::Unknown);
    };

    let mut r = Reader::init(payload);
    ext.parse(hello, state, &mut r)?;
    r.expect_empty(ext.name())?;

    trace!("accepted {typ:?} in {hello:?}Hello");
    Ok(Outcome::Accepted)
}

fn parse_extensions(
    hello: Hello,
    state: &mut ConnectionState,
    r: &mut Reader<'_>,
) -> Result<Vec<ExtensionType>, Error> {
    let mut accepted = Vec::new();
    if !r.any_left() {
        return Ok(accepted);
    }

    let mut block = r.sub_u16_prefixed()?;
    r.expect_empty("Extensions")?;

    let mut seen = BTreeSet::new();
    while block.any_left() {
        let typ = ExtensionType::read(&mut block)?;
        let payload = block.sub_u16_prefixed()?.rest();

        if !seen.insert(typ.to_uint()) {
            return Err(InvalidMessage::DuplicateExtension(typ.to_uint()).into());
        }

        if parse_extension(hello, state, typ, payload)? == Outcome::Accepted {
            accepted.push(typ);
        }
    }

    Ok(accepted)
}
