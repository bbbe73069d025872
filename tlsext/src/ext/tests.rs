use std::prelude::v1::*;
use std::sync::Arc;
use std::{format, vec};

use pki_types::DnsName;

use super::*;
use crate::config::ExtensionConfig;
use crate::enums::ProtocolVersion;
use crate::error::{AlertDescription, PeerMisbehaved};
use crate::msgs::enums::CertificateStatusType;

pub(crate) fn client_state() -> ConnectionState {
    ConnectionState::new(Arc::new(ExtensionConfig::default()), ProtocolVersion::TLSv1_2)
}

pub(crate) fn server_state() -> ConnectionState {
    ConnectionState::new(Arc::new(ExtensionConfig::default()), ProtocolVersion::TLSv1_2)
}

fn wire_types() -> Vec<u16> {
    REGISTRY
        .iter()
        .map(|ext| ext.wire_type().to_uint())
        .collect()
}

/// Split a block built by `build_*_hello_extensions` into its entries.
fn entries(block: &[u8]) -> Vec<(ExtensionType, Vec<u8>)> {
    let mut r = Reader::init(block);
    let mut ret = Vec::new();
    while r.any_left() {
        let typ = ExtensionType::read(&mut r).unwrap();
        let body = r.sub_u16_prefixed().unwrap().rest();
        ret.push((typ, body.to_vec()));
    }
    ret
}

fn busy_client() -> ConnectionState {
    let mut client = client_state();
    client.server_name = Some(DnsName::try_from("example.com").unwrap().to_owned());
    client.offers_ecc = true;
    client.new_session = true;
    client
}

#[test]
fn registry_order() {
    assert_eq!(
        wire_types(),
        vec![0x0000, 0xff01, 0x0005, 0x000b, 0x000a, 0x0023, 0x000d]
    );
}

#[test]
fn registry_types_are_distinct() {
    let mut types = wire_types();
    types.sort_unstable();
    types.dedup();
    assert_eq!(types.len(), REGISTRY.iter().count());
}

#[test]
fn registry_lookup() {
    assert_eq!(
        REGISTRY.find(ExtensionType::SessionTicket),
        Some(Extension::SessionTicket)
    );
    assert_eq!(
        REGISTRY.find(ExtensionType::EllipticCurves),
        Some(Extension::SupportedGroups)
    );
    assert_eq!(REGISTRY.find(ExtensionType::Heartbeat), None);
    assert_eq!(REGISTRY.find(ExtensionType::Unknown(0x1234)), None);
}

#[test]
fn client_hello_emission_order() {
    let mut client = busy_client();
    let mut out = Vec::new();
    build_client_hello_extensions(&mut client, &mut out).unwrap();

    let types: Vec<_> = entries(&out)
        .into_iter()
        .map(|(typ, _)| typ)
        .collect();
    assert_eq!(
        types,
        vec![
            ExtensionType::ServerName,
            ExtensionType::ECPointFormats,
            ExtensionType::EllipticCurves,
            ExtensionType::SessionTicket,
            ExtensionType::SignatureAlgorithms,
        ]
    );
}

#[test]
fn building_twice_is_identical() {
    let mut client = busy_client();
    client.new_session = false;
    client.session_ticket_override = Some(vec![0x55; 40]);

    let mut first = Vec::new();
    build_client_hello_extensions(&mut client, &mut first).unwrap();
    let mut second = Vec::new();
    build_client_hello_extensions(&mut client, &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_build_leaves_nothing_behind() {
    let mut client = busy_client();
    client.config = Arc::new(ExtensionConfig {
        supported_groups: vec![],
        ..Default::default()
    });

    let mut out = vec![0xde, 0xad];
    let err = build_client_hello_extensions(&mut client, &mut out).unwrap_err();
    assert_eq!(err, InternalError::NoSupportedGroupsConfigured.into());
    assert_eq!(err.alert(), AlertDescription::InternalError);

    // server_name and ec_point_formats precede the failure and stay
    let built = entries(&out[2..]);
    assert_eq!(built.len(), 2);
    assert_eq!(built[1].0, ExtensionType::ECPointFormats);
}

#[test]
fn oversized_extension_is_an_internal_error() {
    let mut client = client_state();
    client.session_ticket_override = Some(vec![0x42; 0x10000]);

    let mut out = Vec::new();
    assert_eq!(
        build_client_hello_extensions(&mut client, &mut out),
        Err(InternalError::ExtensionTooLarge(ExtensionType::SessionTicket).into())
    );
    assert!(out.is_empty());
}

#[test]
fn encode_omits_an_empty_block() {
    let mut server = server_state();
    let mut out = vec![0x01];
    encode_server_hello_extensions(&mut server, &mut out).unwrap();
    assert_eq!(out, vec![0x01]);
}

#[test]
fn encode_prefixes_the_block() {
    let mut server = server_state();
    server.ticket_expected = true;
    server.send_connection_binding = true;

    let mut out = Vec::new();
    encode_server_hello_extensions(&mut server, &mut out).unwrap();
    assert_eq!(
        out,
        vec![0x00, 0x09, 0xff, 0x01, 0x00, 0x01, 0x00, 0x00, 0x23, 0x00, 0x00]
    );
}

#[test]
fn unknown_extension_changes_nothing() {
    let mut server = server_state();
    let before = format!("{server:?}");
    assert_eq!(
        parse_client_hello_extension(&mut server, ExtensionType::Heartbeat, &[0x01]),
        Ok(Outcome::Unknown)
    );
    assert_eq!(
        parse_server_hello_extension(&mut server, ExtensionType::Unknown(0xfafa), &[]),
        Ok(Outcome::Unknown)
    );
    assert_eq!(format!("{server:?}"), before);
}

#[test]
fn leftover_payload_is_a_decode_error() {
    let mut client = client_state();
    client.status_type = Some(CertificateStatusType::OCSP);
    let err = parse_server_hello_extension(&mut client, ExtensionType::StatusRequest, &[0x00])
        .unwrap_err();
    assert_eq!(err, InvalidMessage::TrailingData("StatusRequest").into());
    assert_eq!(err.alert(), AlertDescription::DecodeError);
}

#[test]
fn single_extension_alerts() {
    let mut client = client_state();
    let err =
        parse_server_hello_extension(&mut client, ExtensionType::ServerName, &[]).unwrap_err();
    assert_eq!(err, PeerMisbehaved::UnsolicitedServerNameExtension.into());
    assert_eq!(err.alert(), AlertDescription::UnrecognizedName);

    let err = parse_server_hello_extension(&mut client, ExtensionType::SignatureAlgorithms, &[])
        .unwrap_err();
    assert_eq!(err.alert(), AlertDescription::UnsupportedExtension);
}

#[test]
fn client_hello_block_round_trip() {
    let mut client = busy_client();
    client.renegotiate = true;
    client.status_type = Some(CertificateStatusType::OCSP);

    let mut hello = Vec::new();
    encode_client_hello_extensions(&mut client, &mut hello).unwrap();

    let mut server = server_state();
    let mut r = Reader::init(&hello);
    let accepted = parse_client_hello_extensions(&mut server, &mut r).unwrap();
    assert_eq!(accepted.len(), 7);
    assert_eq!(server.session_server_name(), Some(&b"example.com"[..]));
    assert!(server.send_connection_binding);
    assert_eq!(server.status_type, Some(CertificateStatusType::OCSP));
    assert!(server.peer_supported_groups.is_some());
    assert!(server.peer_ec_point_formats.is_some());
    assert!(server.peer_signature_schemes.is_some());
}

#[test]
fn absent_block_is_no_extensions() {
    let mut server = server_state();
    let accepted = parse_client_hello_extensions(&mut server, &mut Reader::init(&[])).unwrap();
    assert!(accepted.is_empty());
}

#[test]
fn unknown_entries_are_skipped() {
    let block = [
        0x00, 0x0a, // block length
        0x00, 0x0f, 0x00, 0x01, 0x01, // heartbeat
        0x00, 0x23, 0x00, 0x01, 0x07, // session ticket
    ];
    let mut server = server_state();
    let accepted = parse_client_hello_extensions(&mut server, &mut Reader::init(&block)).unwrap();
    assert_eq!(accepted, vec![ExtensionType::SessionTicket]);
}

#[test]
fn duplicate_entries_are_rejected() {
    let block = [
        0x00, 0x08, // block length
        0x00, 0x23, 0x00, 0x00, // session ticket
        0x00, 0x23, 0x00, 0x00, // and again
    ];
    let mut server = server_state();
    let err = parse_client_hello_extensions(&mut server, &mut Reader::init(&block)).unwrap_err();
    assert_eq!(err, InvalidMessage::DuplicateExtension(0x0023).into());
    assert_eq!(err.alert(), AlertDescription::DecodeError);
}

/// The largest block a u16 prefix allows, filled with distinct empty
/// extensions of unregistered types.
fn crowded_block() -> Vec<u8> {
    let count = 0xffff / 4;
    let mut block = Vec::with_capacity(2 + count * 4);
    block.extend_from_slice(&((count * 4) as u16).to_be_bytes());
    for typ in 0x1000..0x1000 + count as u16 {
        block.extend_from_slice(&typ.to_be_bytes());
        block.extend_from_slice(&[0x00, 0x00]);
    }
    block
}

#[test]
fn crowded_block_of_distinct_types() {
    let block = crowded_block();
    assert_eq!(block.len(), 2 + 16383 * 4);

    let mut server = server_state();
    let accepted = parse_client_hello_extensions(&mut server, &mut Reader::init(&block)).unwrap();
    assert!(accepted.is_empty());

    // repeat the first type in the final entry
    let mut block = block;
    let last = block.len() - 4;
    block[last..last + 2].copy_from_slice(&[0x10, 0x00]);
    assert_eq!(
        parse_client_hello_extensions(&mut server, &mut Reader::init(&block)),
        Err(InvalidMessage::DuplicateExtension(0x1000).into())
    );
}

#[test]
fn block_framing_errors() {
    let mut server = server_state();
    // block length overruns the message
    assert_eq!(
        parse_client_hello_extensions(&mut server, &mut Reader::init(&[0x00, 0x05, 0x00])),
        Err(InvalidMessage::MessageTooShort.into())
    );
    // bytes after the block
    assert_eq!(
        parse_client_hello_extensions(&mut server, &mut Reader::init(&[0x00, 0x00, 0x00])),
        Err(InvalidMessage::TrailingData("Extensions").into())
    );
    // entry length overruns the block
    assert_eq!(
        parse_client_hello_extensions(
            &mut server,
            &mut Reader::init(&[0x00, 0x04, 0x00, 0x23, 0x00, 0x01])
        ),
        Err(InvalidMessage::MessageTooShort.into())
    );
}
