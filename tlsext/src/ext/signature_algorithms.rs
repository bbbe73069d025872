use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::enums::SignatureScheme;
use crate::error::{Error, InternalError, InvalidMessage, PeerIncompatible, PeerMisbehaved};
use crate::log::trace;
use crate::msgs::codec::{Codec, ListLength, Reader};
use crate::msgs::enums::ExtensionType;
use crate::state::ConnectionState;

/// Signature Algorithms, RFC 5246 section 7.4.1.4.1.
///
/// Strictly client to server.
pub(crate) struct SignatureAlgorithms;

impl ExtensionHandler for SignatureAlgorithms {
    const TYPE: ExtensionType = ExtensionType::SignatureAlgorithms;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state
            .client_version
            .carries_signature_algorithms()
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        let schemes = &state.config.signature_schemes;
        if schemes.is_empty() {
            return Err(InternalError::NoSignatureSchemesConfigured.into());
        }
        if schemes.len() * 2 > ListLength::U16.max_len() {
            return Err(InternalError::ListTooLong("SignatureSchemes").into());
        }

        schemes.encode(out);
        Ok(())
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let raw = r.sub_u16_prefixed()?.rest();
        if raw.is_empty() {
            return Err(InvalidMessage::NoSignatureSchemes.into());
        }

        let mut list = Reader::init(raw);
        let mut schemes = Vec::with_capacity(raw.len() / 2);
        while list.any_left() {
            schemes.push(SignatureScheme::read(&mut list)?);
        }
        trace!("client offered signature schemes {schemes:?}");
        state.peer_signature_schemes = Some(schemes);

        if let Some(processor) = &state.config.signature_algorithm_processor {
            if !processor.process(raw) {
                return Err(PeerIncompatible::SignatureAlgorithmsRejected.into());
            }
        }
        Ok(())
    }

    fn server_hello_needs(_state: &ConnectionState) -> bool {
        false
    }

    fn server_hello_build(_state: &mut ConnectionState, _out: &mut Vec<u8>) -> Result<(), Error> {
        Err(InternalError::ExtensionNotAllowed(Self::TYPE).into())
    }

    fn server_hello_parse(_state: &mut ConnectionState, _r: &mut Reader<'_>) -> Result<(), Error> {
        Err(PeerMisbehaved::SignatureAlgorithmsFromServer.into())
    }
}
