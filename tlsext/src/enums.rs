#![allow(non_camel_case_types)]
#![allow(missing_docs)]
use crate::error::InvalidMessage;
use crate::msgs::codec::{ListLength, TlsListElement};

enum_builder! {
    /// The `ProtocolVersion` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u16)]
    pub enum ProtocolVersion {
        SSLv2 => 0x0002,
        SSLv3 => 0x0300,
        TLSv1_0 => 0x0301,
        TLSv1_1 => 0x0302,
        TLSv1_2 => 0x0303,
        TLSv1_3 => 0x0304,
        DTLSv1_0 => 0xFEFF,
        DTLSv1_2 => 0xFEFD,
        DTLSv1_3 => 0xFEFC,
    }
}

impl ProtocolVersion {
    /// Whether this version belongs to the datagram family.
    pub fn is_dtls(&self) -> bool {
        u16::from(*self) >> 8 == 0xfe
    }

    /// Whether a client offering this version may send `signature_algorithms`.
    ///
    /// Only stream TLS 1.2 and later qualify; DTLS versions count downwards
    /// from 0xfeff so they never compare as "at least TLS 1.2" here.
    pub(crate) fn carries_signature_algorithms(&self) -> bool {
        let v = u16::from(*self);
        v >> 8 == 0x03 && v >= u16::from(Self::TLSv1_2)
    }
}

enum_builder! {
    /// The `SignatureScheme` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u16)]
    pub enum SignatureScheme {
        RSA_PKCS1_SHA1 => 0x0201,
        ECDSA_SHA1_Legacy => 0x0203,
        RSA_PKCS1_SHA256 => 0x0401,
        ECDSA_NISTP256_SHA256 => 0x0403,
        RSA_PKCS1_SHA384 => 0x0501,
        ECDSA_NISTP384_SHA384 => 0x0503,
        RSA_PKCS1_SHA512 => 0x0601,
        ECDSA_NISTP521_SHA512 => 0x0603,
        RSA_PSS_SHA256 => 0x0804,
        RSA_PSS_SHA384 => 0x0805,
        RSA_PSS_SHA512 => 0x0806,
        ED25519 => 0x0807,
        ED448 => 0x0808,
    }
}

/// RFC 5246: `SignatureAndHashAlgorithm supported_signature_algorithms<2..2^16-2>`
impl TlsListElement for SignatureScheme {
    const SIZE_LEN: ListLength = ListLength::NonZeroU16 {
        empty_error: InvalidMessage::NoSignatureSchemes,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::enums::tests::test_enum16;

    #[test]
    fn test_enums() {
        test_enum16::<SignatureScheme>(SignatureScheme::RSA_PKCS1_SHA1, SignatureScheme::ED448);
        test_enum16::<ProtocolVersion>(ProtocolVersion::SSLv2, ProtocolVersion::TLSv1_3);
    }

    #[test]
    fn datagram_versions() {
        assert!(ProtocolVersion::DTLSv1_0.is_dtls());
        assert!(ProtocolVersion::DTLSv1_2.is_dtls());
        assert!(!ProtocolVersion::TLSv1_2.is_dtls());
        assert!(!ProtocolVersion::SSLv3.is_dtls());
    }

    #[test]
    fn signature_algorithms_need_tls12_stream() {
        assert!(ProtocolVersion::TLSv1_2.carries_signature_algorithms());
        assert!(ProtocolVersion::TLSv1_3.carries_signature_algorithms());
        assert!(!ProtocolVersion::TLSv1_1.carries_signature_algorithms());
        assert!(!ProtocolVersion::SSLv3.carries_signature_algorithms());
        assert!(!ProtocolVersion::DTLSv1_2.carries_signature_algorithms());
        assert!(!ProtocolVersion::DTLSv1_0.carries_signature_algorithms());
    }
}
