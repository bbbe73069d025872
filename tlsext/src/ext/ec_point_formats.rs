use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::enums::ProtocolVersion;
use crate::error::{Error, InternalError, PeerIncompatible, PeerMisbehaved};
use crate::log::trace;
use crate::msgs::codec::{Codec, ListLength, Reader};
use crate::msgs::enums::{ECPointFormat, ExtensionType};
use crate::state::ConnectionState;

/// Supported Point Formats, RFC 8422 section 5.1.2.
///
/// Both hellos carry the same `ECPointFormatList`, so one pair of helpers
/// serves both directions.
pub(crate) struct EcPointFormats;

impl EcPointFormats {
    fn build(state: &ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        let formats = &state.config.ec_point_formats;
        if formats.is_empty() {
            return Err(InternalError::NoPointFormatsConfigured.into());
        }
        if formats.len() > ListLength::U8.max_len() {
            return Err(InternalError::ListTooLong("ECPointFormats").into());
        }

        formats.encode(out);
        Ok(())
    }

    fn parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let formats = Vec::<ECPointFormat>::read(r)?;
        r.expect_empty("ECPointFormats")?;

        if !formats.contains(&ECPointFormat::Uncompressed) {
            return Err(PeerIncompatible::UncompressedEcPointsRequired.into());
        }

        if state.is_resumption {
            return Ok(());
        }

        if state.peer_ec_point_formats.is_some() {
            return Err(PeerMisbehaved::DuplicatePointFormats.into());
        }

        trace!("peer point formats {formats:?}");
        state.peer_ec_point_formats = Some(formats);
        Ok(())
    }
}

impl ExtensionHandler for EcPointFormats {
    const TYPE: ExtensionType = ExtensionType::ECPointFormats;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state.offers_ecc
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        Self::build(state, out)
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        Self::parse(state, r)
    }

    fn server_hello_needs(state: &ConnectionState) -> bool {
        state.version != ProtocolVersion::DTLSv1_0 && state.negotiated_ecc
    }

    fn server_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        Self::build(state, out)
    }

    fn server_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        Self::parse(state, r)
    }
}
