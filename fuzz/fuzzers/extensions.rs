#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate tlsext;

use std::sync::Arc;

use tlsext::{
    ConnectionState, ExtensionConfig, ProtocolVersion, Reader, encode_server_hello_extensions,
    parse_client_hello_extensions, parse_server_hello_extensions,
};

fuzz_target!(|data: &[u8]| {
    let _ = env_logger::try_init();

    let Some((&flags, block)) = data.split_first() else {
        return;
    };

    let config = Arc::new(ExtensionConfig::default());
    let version = match flags & 0x03 {
        0 => ProtocolVersion::TLSv1_2,
        1 => ProtocolVersion::TLSv1_1,
        2 => ProtocolVersion::DTLSv1_2,
        _ => ProtocolVersion::DTLSv1_0,
    };

    let mut server = ConnectionState::new(config.clone(), version);
    server.is_resumption = flags & 0x04 != 0;
    server.set_previous_finished(&[0x11; 12], &[0x22; 12][..usize::from(flags & 0x08)]);
    if parse_client_hello_extensions(&mut server, &mut Reader::init(block)).is_ok() {
        server.negotiated_ecc = flags & 0x10 != 0;
        server.ticket_expected = flags & 0x20 != 0;
        let mut reply = Vec::new();
        let _ = encode_server_hello_extensions(&mut server, &mut reply);
    }

    let mut client = ConnectionState::new(config, version);
    client.is_resumption = flags & 0x04 != 0;
    let _ = parse_server_hello_extensions(&mut client, &mut Reader::init(block));
});
