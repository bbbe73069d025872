use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::error::{Error, InternalError, PeerMisbehaved};
use crate::log::{trace, warn};
use crate::msgs::codec::{Codec, ListLength, Reader};
use crate::msgs::enums::{ExtensionType, NamedGroup};
use crate::state::ConnectionState;

/// Supported Groups (formerly Supported Elliptic Curves), RFC 8422
/// section 5.1.1.
///
/// Only ever sent by clients.
pub(crate) struct SupportedGroups;

impl ExtensionHandler for SupportedGroups {
    const TYPE: ExtensionType = ExtensionType::EllipticCurves;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state.offers_ecc
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        let groups = &state.config.supported_groups;
        if groups.is_empty() {
            return Err(InternalError::NoSupportedGroupsConfigured.into());
        }
        if groups.len() * 2 > ListLength::U16.max_len() {
            return Err(InternalError::ListTooLong("NamedGroups").into());
        }

        groups.encode(out);
        Ok(())
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let groups = Vec::<NamedGroup>::read(r)?;
        r.expect_empty("NamedGroups")?;

        if state.is_resumption {
            return Ok(());
        }
        if state.peer_supported_groups.is_some() {
            return Err(PeerMisbehaved::DuplicateSupportedGroups.into());
        }

        trace!("client supports groups {groups:?}");
        state.peer_supported_groups = Some(groups);
        Ok(())
    }

    fn server_hello_needs(_state: &ConnectionState) -> bool {
        false
    }

    fn server_hello_build(_state: &mut ConnectionState, _out: &mut Vec<u8>) -> Result<(), Error> {
        Err(InternalError::ExtensionNotAllowed(Self::TYPE).into())
    }

    fn server_hello_parse(_state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        // Servers must not send this, but some widely deployed ones do.
        let skipped = r.rest();
        warn!(
            "ignoring {} byte supported_groups extension sent by server",
            skipped.len()
        );
        Ok(())
    }
}
