use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::error::{Error, InternalError, PeerMisbehaved};
use crate::log::{debug, trace};
use crate::msgs::codec::Reader;
use crate::msgs::enums::ExtensionType;
use crate::state::ConnectionState;

/// SessionTicket, RFC 5077 section 3.2.
///
/// The body is the opaque ticket itself, with no length prefix of its own.
/// An empty body advertises support without attempting resumption.
pub(crate) struct SessionTicket;

impl SessionTicket {
    fn inspect(state: &ConnectionState, ticket: &[u8]) -> bool {
        match &state.config.ticket_inspector {
            Some(inspector) => inspector.inspect(ticket),
            None => true,
        }
    }
}

impl ExtensionHandler for SessionTicket {
    const TYPE: ExtensionType = ExtensionType::SessionTicket;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        if state.config.disable_tickets {
            return false;
        }

        state.new_session
            || !matches!(&state.session_ticket_override, Some(ticket) if ticket.is_empty())
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        if state.new_session {
            return Ok(());
        }

        let override_ticket = state
            .session_ticket_override
            .as_ref()
            .filter(|ticket| !ticket.is_empty())
            .cloned();

        let Some(session) = state.session.as_mut() else {
            return Ok(());
        };

        if session.ticket.is_none() {
            session.ticket = override_ticket;
        }

        if let Some(ticket) = &session.ticket {
            trace!("offering {} byte session ticket", ticket.len());
            out.extend_from_slice(ticket);
        }
        Ok(())
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let ticket = r.rest();
        if !Self::inspect(state, ticket) {
            debug!("session ticket inspector declined a {} byte ticket", ticket.len());
        }
        Ok(())
    }

    fn server_hello_needs(state: &ConnectionState) -> bool {
        state.ticket_expected && !state.config.disable_tickets
    }

    fn server_hello_build(_state: &mut ConnectionState, _out: &mut Vec<u8>) -> Result<(), Error> {
        Ok(())
    }

    fn server_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let body = r.rest();
        if !Self::inspect(state, body) {
            return Err(InternalError::TicketRejected.into());
        }

        if state.config.disable_tickets || !body.is_empty() {
            return Err(PeerMisbehaved::UnsolicitedSessionTicketExtension.into());
        }

        // a NewSessionTicket message will follow
        state.ticket_expected = true;
        Ok(())
    }
}
