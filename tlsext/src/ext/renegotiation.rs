use alloc::vec::Vec;

use subtle::ConstantTimeEq;

use super::ExtensionHandler;
use crate::error::{Error, InternalError, InvalidMessage, PeerMisbehaved};
use crate::log::trace;
use crate::msgs::codec::{LengthPrefixedBuffer, ListLength, Reader};
use crate::msgs::enums::ExtensionType;
use crate::state::ConnectionState;

/// Renegotiation Indication, RFC 5746.
///
/// Binds a renegotiation to the connection by echoing the `verify_data`
/// of the previous handshake's `Finished` messages.
pub(crate) struct RenegotiationIndication;

impl RenegotiationIndication {
    fn write(out: &mut Vec<u8>, parts: &[&[u8]]) -> Result<(), Error> {
        let body = LengthPrefixedBuffer::new(ListLength::U8, out);
        for part in parts {
            body.buf.extend_from_slice(part);
        }

        if body.overflowed() {
            body.abandon();
            return Err(InternalError::ListTooLong("renegotiated_connection").into());
        }
        Ok(())
    }

    fn binding_matches(received: &[u8], expected: &[u8]) -> bool {
        bool::from(received.ct_eq(expected))
    }

    fn mark_seen(state: &mut ConnectionState) {
        state.renegotiation_seen = true;
        state.send_connection_binding = true;
    }
}

impl ExtensionHandler for RenegotiationIndication {
    const TYPE: ExtensionType = ExtensionType::RenegotiationInfo;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state.renegotiate
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        Self::write(out, &[&state.previous_client_finished[..]])
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let received = r.sub_u8_prefixed()?.rest();
        r.expect_empty("RenegotiationInfo")?;

        if !Self::binding_matches(received, &state.previous_client_finished) {
            return Err(PeerMisbehaved::RenegotiationBindingMismatch.into());
        }

        trace!("client renegotiation binding verified");
        Self::mark_seen(state);
        Ok(())
    }

    fn server_hello_needs(state: &ConnectionState) -> bool {
        state.send_connection_binding
    }

    fn server_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        Self::write(
            out,
            &[
                &state.previous_client_finished[..],
                &state.previous_server_finished[..],
            ],
        )
    }

    fn server_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let client_len = state.previous_client_finished.len();
        let server_len = state.previous_server_finished.len();
        if (client_len == 0) != (server_len == 0) {
            return Err(InternalError::InconsistentFinishedValues.into());
        }

        let mut body = r.sub_u8_prefixed()?;
        let client = body
            .take(client_len)
            .ok_or(InvalidMessage::MessageTooShort)?;
        let server = body
            .take(server_len)
            .ok_or(InvalidMessage::MessageTooShort)?;
        body.expect_empty("RenegotiationInfo")?;
        r.expect_empty("RenegotiationInfo")?;

        if !Self::binding_matches(client, &state.previous_client_finished)
            || !Self::binding_matches(server, &state.previous_server_finished)
        {
            return Err(PeerMisbehaved::RenegotiationBindingMismatch.into());
        }

        trace!("server renegotiation binding verified");
        Self::mark_seen(state);
        Ok(())
    }
}
