//! Error types reported while building and parsing hello extensions.

use core::fmt;

use crate::msgs::enums::ExtensionType;


/// tlsext reports extension failures using this type.
///
/// Every value maps onto exactly one TLS alert; see [`Error::alert()`].
#[non_exhaustive]
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The peer sent an extension that could not be decoded.
    InvalidMessage(InvalidMessage),

    /// The peer doesn't support a feature we require.
    /// The parameter gives a hint as to what feature it is.
    PeerIncompatible(PeerIncompatible),

    /// The peer deviated from the standard TLS protocol.
    /// The parameter gives a hint where.
    PeerMisbehaved(PeerMisbehaved),

    /// Something on our side of the connection went wrong: bad
    /// configuration, inconsistent state, or an oversized extension.
    Internal(InternalError),
}

impl Error {
    /// The alert a handshake driver should send for this error.
    pub fn alert(&self) -> AlertDescription {
        AlertDescription::from(self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMessage(typ) => {
                write!(f, "received corrupt extension of type {typ:?}")
            }
            Self::PeerIncompatible(why) => write!(f, "peer is incompatible: {why:?}"),
            Self::PeerMisbehaved(why) => write!(f, "peer misbehaved: {why:?}"),
            Self::Internal(why) => write!(f, "internal error: {why}"),
        }
    }
}

impl From<InvalidMessage> for Error {
    #[inline]
    fn from(e: InvalidMessage) -> Self {
        Self::InvalidMessage(e)
    }
}

impl From<PeerMisbehaved> for Error {
    #[inline]
    fn from(e: PeerMisbehaved) -> Self {
        Self::PeerMisbehaved(e)
    }
}

impl From<PeerIncompatible> for Error {
    #[inline]
    fn from(e: PeerIncompatible) -> Self {
        Self::PeerIncompatible(e)
    }
}

impl From<InternalError> for Error {
    #[inline]
    fn from(e: InternalError) -> Self {
        Self::Internal(e)
    }
}

impl core::error::Error for Error {}

impl From<&Error> for AlertDescription {
    fn from(e: &Error) -> Self {
        match e {
            Error::InvalidMessage(e) => (*e).into(),
            Error::PeerIncompatible(e) => (*e).into(),
            Error::PeerMisbehaved(e) => (*e).into(),
            Error::Internal(_) => Self::InternalError,
        }
    }
}

enum_builder! {
    /// The `AlertDescription` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum AlertDescription {
        CloseNotify => 0x00,
        UnexpectedMessage => 0x0a,
        BadRecordMac => 0x14,
        DecryptionFailed => 0x15,
        RecordOverflow => 0x16,
        DecompressionFailure => 0x1e,
        HandshakeFailure => 0x28,
        NoCertificate => 0x29,
        BadCertificate => 0x2a,
        UnsupportedCertificate => 0x2b,
        CertificateRevoked => 0x2c,
        CertificateExpired => 0x2d,
        CertificateUnknown => 0x2e,
        IllegalParameter => 0x2f,
        UnknownCa => 0x30,
        AccessDenied => 0x31,
        DecodeError => 0x32,
        DecryptError => 0x33,
        ExportRestriction => 0x3c,
        ProtocolVersion => 0x46,
        InsufficientSecurity => 0x47,
        InternalError => 0x50,
        InappropriateFallback => 0x56,
        UserCanceled => 0x5a,
        NoRenegotiation => 0x64,
        UnsupportedExtension => 0x6e,
        CertificateUnobtainable => 0x6f,
        UnrecognizedName => 0x70,
        BadCertificateStatusResponse => 0x71,
        BadCertificateHashValue => 0x72,
    }
}

impl fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // past tense, and reads correctly after "the peer"
        let text = match self {
            Self::CloseNotify => "cleanly closed the connection",
            Self::UnexpectedMessage => "received an unexpected message",
            Self::BadRecordMac => "failed to verify a message",
            Self::DecryptionFailed => "failed to decrypt a message",
            Self::RecordOverflow => "rejected an over-length message",
            Self::DecompressionFailure => "failed to decompress a message",
            Self::HandshakeFailure => "failed to negotiate an acceptable set of security parameters",
            Self::NoCertificate => "found no certificate",
            Self::BadCertificate => "rejected the certificate as corrupt or incorrectly signed",
            Self::UnsupportedCertificate => "did not support the certificate",
            Self::CertificateRevoked => "found the certificate to be revoked",
            Self::CertificateExpired => "found the certificate to be expired",
            Self::CertificateUnknown => "rejected the certificate for an unspecified reason",
            Self::IllegalParameter => {
                "rejected a message because a field was incorrect or inconsistent"
            }
            Self::UnknownCa => "found the certificate was not issued by a trusted CA",
            Self::AccessDenied => "denied access",
            Self::DecodeError => "failed to decode a message",
            Self::DecryptError => "failed to perform a handshake cryptographic operation",
            Self::ExportRestriction => "refused due to export restrictions",
            Self::ProtocolVersion => "did not support a suitable TLS version",
            Self::InsufficientSecurity => "required a higher security level than was offered",
            Self::InternalError => "encountered an internal error",
            Self::InappropriateFallback => "detected an attempted version downgrade",
            Self::UserCanceled => "canceled the handshake",
            Self::NoRenegotiation => "rejected an attempt at renegotiation",
            Self::UnsupportedExtension => "rejected an unsolicited extension",
            Self::CertificateUnobtainable => "failed to retrieve its certificate",
            Self::UnrecognizedName => "did not recognize a name in the `server_name` extension",
            Self::BadCertificateStatusResponse => "rejected the certificate status response",
            Self::BadCertificateHashValue => "rejected the `certificate_hash` extension",
            Self::Unknown(n) => return write!(f, "sent an unknown alert (0x{n:02x?})"),
        };
        f.write_str(text)
    }
}

/// A corrupt extension payload that resulted in an error.
///
/// All of these are reported to the peer as `decode_error`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidMessage {
    /// A length prefix promised more bytes than were available.
    MessageTooShort,
    /// Missing data for the named payload value
    MissingData(&'static str),
    /// Trailing data found for the named payload value
    TrailingData(&'static str),
    /// A peer sent an empty list of items, but a non-empty list is required.
    ///
    /// The argument names the context.
    IllegalEmptyList(&'static str),
    /// A peer sent a message where a given extension type was repeated
    DuplicateExtension(u16),
    /// A peer sent an empty list of signature schemes
    NoSignatureSchemes,
    /// A `server_name` entry used a name type other than `host_name`.
    UnsupportedServerNameType,
    /// A DER structure inside an extension failed to decode.
    ///
    /// The argument names the structure.
    InvalidDer(&'static str),
}

impl From<InvalidMessage> for AlertDescription {
    fn from(_: InvalidMessage) -> Self {
        Self::DecodeError
    }
}

/// The set of cases where we failed to make a connection because we thought
/// the peer was misbehaving.
///
/// This is `non_exhaustive`: we might add or stop using items here in minor
/// versions.
#[expect(missing_docs)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeerMisbehaved {
    DuplicatePointFormats,
    DuplicateServerName,
    DuplicateSupportedGroups,
    IllegalServerName,
    MissingServerNameForResumption,
    RenegotiationBindingMismatch,
    ServerNameMismatch,
    SignatureAlgorithmsFromServer,
    UnsolicitedServerNameExtension,
    UnsolicitedSessionTicketExtension,
    UnsolicitedStatusRequestExtension,
}

impl From<PeerMisbehaved> for AlertDescription {
    fn from(e: PeerMisbehaved) -> Self {
        match e {
            PeerMisbehaved::IllegalServerName
            | PeerMisbehaved::MissingServerNameForResumption
            | PeerMisbehaved::ServerNameMismatch
            | PeerMisbehaved::UnsolicitedServerNameExtension => Self::UnrecognizedName,

            PeerMisbehaved::RenegotiationBindingMismatch => Self::HandshakeFailure,

            PeerMisbehaved::SignatureAlgorithmsFromServer
            | PeerMisbehaved::UnsolicitedSessionTicketExtension
            | PeerMisbehaved::UnsolicitedStatusRequestExtension => Self::UnsupportedExtension,

            PeerMisbehaved::DuplicatePointFormats
            | PeerMisbehaved::DuplicateServerName
            | PeerMisbehaved::DuplicateSupportedGroups => Self::DecodeError,
        }
    }
}

/// The set of cases where we failed to make a connection because a peer
/// doesn't support a feature we require.
///
/// This is `non_exhaustive`: we might add or stop using items here in minor
/// versions.
#[expect(missing_docs)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeerIncompatible {
    SignatureAlgorithmsRejected,
    UncompressedEcPointsRequired,
}

impl From<PeerIncompatible> for AlertDescription {
    fn from(e: PeerIncompatible) -> Self {
        match e {
            PeerIncompatible::SignatureAlgorithmsRejected
            | PeerIncompatible::UncompressedEcPointsRequired => Self::DecodeError,
        }
    }
}

/// Failures that originate locally rather than with the peer.
///
/// These always map to `internal_error`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InternalError {
    /// A single extension body did not fit its 16-bit length prefix.
    ExtensionTooLarge(ExtensionType),

    /// A configured or stored list does not fit its length prefix.
    ///
    /// The argument names the list.
    ListTooLong(&'static str),

    /// `server_name` was to be sent without a configured host name.
    NoServerNameConfigured,

    /// No supported groups are configured but an ECC suite is offered.
    NoSupportedGroupsConfigured,

    /// No EC point formats are configured but an ECC suite is in use.
    NoPointFormatsConfigured,

    /// No signature schemes are configured.
    NoSignatureSchemesConfigured,

    /// Exactly one of the previous client/server `Finished` values is known.
    InconsistentFinishedValues,

    /// An extension was asked to be built in a message that never carries it.
    ExtensionNotAllowed(ExtensionType),

    /// The session ticket callback refused the server's ticket extension.
    TicketRejected,
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl core::error::Error for InternalError {}
