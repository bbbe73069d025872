use alloc::vec::Vec;

use super::ExtensionHandler;
use crate::error::{Error, InternalError, InvalidMessage, PeerMisbehaved};
use crate::log::trace;
use crate::msgs::codec::{Codec, LengthPrefixedBuffer, ListLength, Reader};
use crate::msgs::enums::{ExtensionType, ServerNameType};
use crate::state::ConnectionState;

/// Server Name Indication, RFC 6066 section 3.
pub(crate) struct ServerNameIndication;

/// RFC 6066: `opaque HostName<1..2^16-1>`, but DNS limits it to 255 bytes.
const MAX_HOST_NAME_LEN: usize = 255;

impl ExtensionHandler for ServerNameIndication {
    const TYPE: ExtensionType = ExtensionType::ServerName;

    fn client_hello_needs(state: &ConnectionState) -> bool {
        state.server_name.is_some()
    }

    fn client_hello_build(state: &mut ConnectionState, out: &mut Vec<u8>) -> Result<(), Error> {
        let name = state
            .local_host_name()
            .ok_or(InternalError::NoServerNameConfigured)?;

        let list = LengthPrefixedBuffer::new(ListLength::U16, out);
        ServerNameType::HostName.encode(list.buf);
        let host_name = LengthPrefixedBuffer::new(ListLength::U16, list.buf);
        host_name.buf.extend_from_slice(name);
        Ok(())
    }

    fn client_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let mut list = r.sub_u16_prefixed()?;

        // Only one name, and only one type of name, is allowed.
        if ServerNameType::read(&mut list)? != ServerNameType::HostName {
            return Err(InvalidMessage::UnsupportedServerNameType.into());
        }

        let host_name = list.sub_u16_prefixed()?.rest();
        if host_name.is_empty() || host_name.len() > MAX_HOST_NAME_LEN || host_name.contains(&0)
        {
            return Err(PeerMisbehaved::IllegalServerName.into());
        }

        if state.is_resumption {
            match state.session_server_name() {
                None => return Err(PeerMisbehaved::MissingServerNameForResumption.into()),
                Some(resumed) if resumed != host_name => {
                    return Err(PeerMisbehaved::ServerNameMismatch.into());
                }
                Some(_) => {}
            }
        } else {
            let session = state.session_mut();
            if session.server_name.is_some() {
                return Err(PeerMisbehaved::DuplicateServerName.into());
            }
            session.server_name = Some(host_name.to_vec());
        }

        list.expect_empty("ServerNameList")?;
        trace!("client asked for server name {:?}", host_name);
        Ok(())
    }

    fn server_hello_needs(state: &ConnectionState) -> bool {
        state.session_server_name().is_some()
    }

    fn server_hello_build(_state: &mut ConnectionState, _out: &mut Vec<u8>) -> Result<(), Error> {
        Ok(())
    }

    fn server_hello_parse(state: &mut ConnectionState, r: &mut Reader<'_>) -> Result<(), Error> {
        let local = match state.local_host_name() {
            Some(local) if !r.any_left() => local.to_vec(),
            _ => return Err(PeerMisbehaved::UnsolicitedServerNameExtension.into()),
        };

        if state.is_resumption {
            return match state.session_server_name() {
                None => Err(PeerMisbehaved::MissingServerNameForResumption.into()),
                Some(resumed) if resumed != local => {
                    Err(PeerMisbehaved::ServerNameMismatch.into())
                }
                Some(_) => Ok(()),
            };
        }

        let session = state.session_mut();
        if session.server_name.is_some() {
            return Err(PeerMisbehaved::DuplicateServerName.into());
        }
        session.server_name = Some(local);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::prelude::v1::*;

    use pki_types::DnsName;

    use super::*;
    use crate::ext::tests::{client_state, server_state};
    use crate::state::SessionRecord;

    fn encode_host_name(name_type: u8, name: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        let list = LengthPrefixedBuffer::new(ListLength::U16, &mut body);
        list.buf.push(name_type);
        let host = LengthPrefixedBuffer::new(ListLength::U16, list.buf);
        host.buf.extend_from_slice(name);
        drop(host);
        drop(list);
        body
    }

    fn parse_client_hello(state: &mut ConnectionState, body: &[u8]) -> Result<(), Error> {
        ServerNameIndication::client_hello_parse(state, &mut Reader::init(body))
    }

    #[test]
    fn client_hello_build_matches_rfc_layout() {
        let mut state = client_state();
        state.server_name = Some(DnsName::try_from("example.com.").unwrap().to_owned());
        assert!(ServerNameIndication::client_hello_needs(&state));

        let mut out = Vec::new();
        ServerNameIndication::client_hello_build(&mut state, &mut out).unwrap();
        assert_eq!(out, encode_host_name(0, b"example.com"));
        assert_eq!(&out[..5], &[0x00, 0x0e, 0x00, 0x00, 0x0b]);
    }

    #[test]
    fn fresh_server_stores_the_name() {
        let mut state = server_state();
        parse_client_hello(&mut state, &encode_host_name(0, b"example.com")).unwrap();
        assert_eq!(state.session_server_name(), Some(&b"example.com"[..]));
        assert!(ServerNameIndication::server_hello_needs(&state));

        let mut out = Vec::new();
        ServerNameIndication::server_hello_build(&mut state, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn illegal_host_names() {
        let names: [&[u8]; 3] = [b"", b"exa\0mple.com", &[b'a'; 256]];
        for name in names {
            let mut state = server_state();
            assert_eq!(
                parse_client_hello(&mut state, &encode_host_name(0, name)),
                Err(PeerMisbehaved::IllegalServerName.into())
            );
        }

        let mut state = server_state();
        assert!(parse_client_hello(&mut state, &encode_host_name(0, &[b'a'; 255])).is_ok());
    }

    #[test]
    fn other_name_types_are_decode_errors() {
        let mut state = server_state();
        assert_eq!(
            parse_client_hello(&mut state, &encode_host_name(1, b"example.com")),
            Err(InvalidMessage::UnsupportedServerNameType.into())
        );
    }

    #[test]
    fn second_name_in_list_is_rejected() {
        let mut body = encode_host_name(0, b"a.com");
        body.extend_from_slice(&[0x00, 0x00, 0x01, b'b']);
        let list_len = (body.len() - 2) as u16;
        body[..2].copy_from_slice(&list_len.to_be_bytes());

        let mut state = server_state();
        assert_eq!(
            parse_client_hello(&mut state, &body),
            Err(InvalidMessage::TrailingData("ServerNameList").into())
        );
    }

    #[test]
    fn fresh_session_already_naming_a_host() {
        let mut state = server_state();
        state.session_mut().server_name = Some(b"a.com".to_vec());
        assert_eq!(
            parse_client_hello(&mut state, &encode_host_name(0, b"b.com")),
            Err(PeerMisbehaved::DuplicateServerName.into())
        );
    }

    #[test]
    fn resumption_requires_matching_name() {
        let session = SessionRecord {
            server_name: Some(b"example.com".to_vec()),
            ticket: None,
        };

        let mut state = server_state();
        state.resume(session.clone());
        assert!(parse_client_hello(&mut state, &encode_host_name(0, b"example.com")).is_ok());

        let mut state = server_state();
        state.resume(session);
        assert_eq!(
            parse_client_hello(&mut state, &encode_host_name(0, b"other.com")),
            Err(PeerMisbehaved::ServerNameMismatch.into())
        );

        let mut state = server_state();
        state.resume(SessionRecord::default());
        assert_eq!(
            parse_client_hello(&mut state, &encode_host_name(0, b"example.com")),
            Err(PeerMisbehaved::MissingServerNameForResumption.into())
        );
    }

    #[test]
    fn server_hello_acknowledgement() {
        let mut state = client_state();
        assert_eq!(
            ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[])),
            Err(PeerMisbehaved::UnsolicitedServerNameExtension.into())
        );

        state.server_name = Some(DnsName::try_from("example.com").unwrap().to_owned());
        assert_eq!(
            ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[0])),
            Err(PeerMisbehaved::UnsolicitedServerNameExtension.into())
        );

        ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[])).unwrap();
        assert_eq!(state.session_server_name(), Some(&b"example.com"[..]));

        // the session now names a host, so a second acknowledgement is a decode error
        assert_eq!(
            ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[])),
            Err(PeerMisbehaved::DuplicateServerName.into())
        );
    }

    #[test]
    fn resumed_client_checks_session_name() {
        let mut state = client_state();
        state.server_name = Some(DnsName::try_from("example.com").unwrap().to_owned());
        state.resume(SessionRecord {
            server_name: Some(b"other.com".to_vec()),
            ticket: None,
        });
        assert_eq!(
            ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[])),
            Err(PeerMisbehaved::ServerNameMismatch.into())
        );

        state.session_mut().server_name = Some(b"example.com".to_vec());
        assert!(
            ServerNameIndication::server_hello_parse(&mut state, &mut Reader::init(&[])).is_ok()
        );
        assert_eq!(state.session_server_name(), Some(&b"example.com"[..]));
    }
}
