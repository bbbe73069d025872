use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::enums::ProtocolVersion;
use crate::error::{Error, InternalError, PeerMisbehaved};
use crate::log::{debug, trace};
use crate::msgs::codec::{Codec, LengthPrefixedBuffer, ListLength, Reader};
use crate::msgs::enums::{CertificateStatusType, ExtensionType};
use crate::state::ConnectionState;
use crate::x509::{ResponderId, check_request_extensions};

/// Certificate Status Request, RFC 6066 section 8.
///
/// ```text
/// struct {
///     CertificateStatusType status_type;
///     select (status_type) {
///         case ocsp: OCSPStatusRequest;
///     } request;
/// } CertificateStatusRequest;
///
/// struct {
///     ResponderID responder_id_list<0..2^16-1>;
///     Extensions  request_extensions;
/// } OCSPStatusRequest;
/// ```
pub(crate) struct CertificateStatusRequest;

impl CertificateStatusRequest {
    fn responder_ids_len(ids: &[ResponderId]) -> usize {
        ids.iter()
            .map(|id| 2 + id.as_der().len())
            .sum()
    }
}

impl ExtensionHandler for CertificateStatusRequest {
    const TYPE: ExtensionType = ExtensionType::StatusRequest;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state.status_type == Some(CertificateStatusType::OCSP)
            && state.version != ProtocolVersion::DTLSv1_0
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        let max = ListLength::U16.max_len();
        if Self::responder_ids_len(&state.ocsp_responder_ids) > max
            || state
                .ocsp_responder_ids
                .iter()
                .any(|id| id.as_der().len() > max)
        {
            return Err(InternalError::ListTooLong("ResponderIDs").into());
        }
        if state.ocsp_extensions.len() > max {
            return Err(InternalError::ListTooLong("Extensions").into());
        }

        CertificateStatusType::OCSP.encode(out);

        let ids = LengthPrefixedBuffer::new(ListLength::U16, out);
        for id in &state.ocsp_responder_ids {
            let one = LengthPrefixedBuffer::new(ListLength::U16, ids.buf);
            one.buf.extend_from_slice(id.as_der());
        }
        drop(ids);

        let exts = LengthPrefixedBuffer::new(ListLength::U16, out);
        exts.buf.extend_from_slice(&state.ocsp_extensions);
        Ok(())
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let status_type = CertificateStatusType::read(r)?;
        if status_type != CertificateStatusType::OCSP {
            debug!("ignoring unsupported certificate status type {status_type:?}");
            state.status_type = None;
            r.rest();
            return Ok(());
        }
        state.status_type = Some(status_type);

        let mut list = r.sub_u16_prefixed()?;
        let mut responder_ids = Vec::new();
        while list.any_left() {
            let der = list.sub_u16_prefixed()?.rest();
            responder_ids.push(ResponderId::from_der(der)?);
        }
        state.ocsp_responder_ids = responder_ids;

        let exts = r.sub_u16_prefixed()?.rest();
        let count = check_request_extensions(exts)?;
        if count > 0 {
            state.ocsp_extensions = exts.to_vec();
        }

        trace!(
            "client requested OCSP with {} responder ids and {count} extensions",
            state.ocsp_responder_ids.len()
        );
        Ok(())
    }

    fn server_hello_needs(state: &ConnectionState) -> bool {
        state.status_expected
    }

    fn server_hello_build(_state: &mut ConnectionState, _out: &mut Vec<u8>) -> Result<(), Error> {
        Ok(())
    }

    fn server_hello_parse(state: &mut ConnectionState, _r: &mut Reader<'_>) -> Result<(), Error> {
        if state.status_type.is_none() {
            return Err(PeerMisbehaved::UnsolicitedStatusRequestExtension.into());
        }

        // a CertificateStatus message will follow
        state.status_expected = true;
        Ok(())
    }
}
