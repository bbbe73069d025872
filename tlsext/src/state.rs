use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use pki_types::DnsName;
use zeroize::Zeroizing;

use crate::config::ExtensionConfig;
use crate::enums::{ProtocolVersion, SignatureScheme};
use crate::msgs::enums::{CertificateStatusType, ECPointFormat, NamedGroup};
use crate::x509::ResponderId;

/// Data about a session that outlives the handshake which created it.
///
/// A handshake driver caches these and hands one back through
/// [`ConnectionState::resume()`] to attempt resumption.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionRecord {
    /// The host name negotiated via `server_name`, exactly as sent.
    pub server_name: Option<Vec<u8>>,

    /// An RFC 5077 session ticket.
    pub ticket: Option<Vec<u8>>,
}

/// Everything the extension handlers read and write during one handshake.
///
/// Fields describing the local side are set up by the handshake driver
/// before building or parsing; fields prefixed `peer_` (and the
/// negotiation flags) are filled in by the handlers.
pub struct ConnectionState {
    /// Shared local preferences.
    pub config: Arc<ExtensionConfig>,

    /// The host name a client asks for in `server_name`.
    pub server_name: Option<DnsName<'static>>,

    /// The negotiated (server) or intended (client) protocol version.
    pub version: ProtocolVersion,

    /// The version the client advertised in its ClientHello.
    pub client_version: ProtocolVersion,

    /// At least one ECC cipher suite is being offered.
    pub offers_ecc: bool,

    /// An ECC cipher suite was selected.
    pub negotiated_ecc: bool,

    /// This handshake resumes `session`.
    pub is_resumption: bool,

    /// The client is starting a fresh session (this includes renegotiation).
    pub new_session: bool,

    /// A renegotiation is in progress.
    pub renegotiate: bool,

    /// A valid `renegotiation_info` extension was received.
    pub renegotiation_seen: bool,

    /// The server echoes `renegotiation_info`.
    pub send_connection_binding: bool,

    /// The `verify_data` of the last client `Finished`, empty on a first handshake.
    pub previous_client_finished: Zeroizing<Vec<u8>>,

    /// The `verify_data` of the last server `Finished`, empty on a first handshake.
    pub previous_server_finished: Zeroizing<Vec<u8>>,

    /// The certificate status the client requests; `None` disables OCSP.
    pub status_type: Option<CertificateStatusType>,

    /// Acceptable OCSP responders.  Empty means the server knows them.
    pub ocsp_responder_ids: Vec<ResponderId>,

    /// DER `Extensions` for the OCSP request, or empty.
    pub ocsp_extensions: Vec<u8>,

    /// A `CertificateStatus` message will follow the server's certificate.
    pub status_expected: bool,

    /// A `NewSessionTicket` message will be sent by the server.
    pub ticket_expected: bool,

    /// A ticket supplied by the application instead of the session's own.
    ///
    /// `Some` of an empty vector suppresses the extension.
    pub session_ticket_override: Option<Vec<u8>>,

    /// Groups from the peer's `supported_groups`.
    pub peer_supported_groups: Option<Vec<NamedGroup>>,

    /// The peer's `ec_point_formats`, in the order received.
    pub peer_ec_point_formats: Option<Vec<ECPointFormat>>,

    /// Schemes from the client's `signature_algorithms`.
    pub peer_signature_schemes: Option<Vec<SignatureScheme>>,

    /// The session being established or resumed.
    pub session: Option<SessionRecord>,
}

impl ConnectionState {
    /// A fresh handshake at `version`, with nothing negotiated yet.
    pub fn new(config: Arc<ExtensionConfig>, version: ProtocolVersion) -> Self {
        Self {
            config,
            server_name: None,
            version,
            client_version: version,
            offers_ecc: false,
            negotiated_ecc: false,
            is_resumption: false,
            new_session: false,
            renegotiate: false,
            renegotiation_seen: false,
            send_connection_binding: false,
            previous_client_finished: Zeroizing::new(Vec::new()),
            previous_server_finished: Zeroizing::new(Vec::new()),
            status_type: None,
            ocsp_responder_ids: Vec::new(),
            ocsp_extensions: Vec::new(),
            status_expected: false,
            ticket_expected: false,
            session_ticket_override: None,
            peer_supported_groups: None,
            peer_ec_point_formats: None,
            peer_signature_schemes: None,
            session: Some(SessionRecord::default()),
        }
    }

    /// Record the `Finished` values of the previous handshake on this connection.
    pub fn set_previous_finished(&mut self, client: &[u8], server: &[u8]) {
        self.previous_client_finished = Zeroizing::new(client.to_vec());
        self.previous_server_finished = Zeroizing::new(server.to_vec());
    }

    /// Install a cached session and mark this handshake as a resumption.
    pub fn resume(&mut self, session: SessionRecord) {
        self.session = Some(session);
        self.is_resumption = true;
    }

    /// Remove the session, for caching once the handshake completes.
    pub fn take_session(&mut self) -> Option<SessionRecord> {
        self.session.take()
    }

    /// Whether this is a datagram connection.
    pub fn is_dtls(&self) -> bool {
        self.version.is_dtls()
    }

    /// The configured host name as it appears on the wire.
    ///
    /// A fully-qualified name's trailing dot is not sent.
    pub(crate) fn local_host_name(&self) -> Option<&[u8]> {
        self.server_name
            .as_ref()
            .map(|name| name.as_ref().trim_end_matches('.').as_bytes())
    }

    pub(crate) fn session_server_name(&self) -> Option<&[u8]> {
        self.session
            .as_ref()
            .and_then(|session| session.server_name.as_deref())
    }

    pub(crate) fn session_mut(&mut self) -> &mut SessionRecord {
        self.session.get_or_insert_with(SessionRecord::default)
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionState")
            .field("server_name", &self.server_name)
            .field("version", &self.version)
            .field("client_version", &self.client_version)
            .field("is_resumption", &self.is_resumption)
            .field("new_session", &self.new_session)
            .field("renegotiate", &self.renegotiate)
            .field("renegotiation_seen", &self.renegotiation_seen)
            .field("status_type", &self.status_type)
            .field("status_expected", &self.status_expected)
            .field("ticket_expected", &self.ticket_expected)
            .field("peer_supported_groups", &self.peer_supported_groups)
            .field("peer_ec_point_formats", &self.peer_ec_point_formats)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
