// DER helpers for the OCSP `status_request` extension.

use alloc::vec::Vec;

use der::asn1::{AnyRef, ObjectIdentifier, OctetStringRef};
use der::{Decode, Sequence, Tag, TagNumber, Tagged};

use crate::error::InvalidMessage;

/// A DER-encoded OCSP `ResponderID` (RFC 6960 section 4.2.1).
///
/// ```text
/// ResponderID ::= CHOICE {
///    byName   [1] Name,
///    byKey    [2] KeyHash }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponderId(Vec<u8>);

impl ResponderId {
    /// Identify a responder by the SHA-1 hash of its public key.
    pub fn by_key_hash(key_hash: &[u8]) -> Self {
        Self(asn1_wrap(
            DER_CONTEXT_2_TAG,
            &wrap_in_octet_string(key_hash),
        ))
    }

    /// Identify a responder by its DER-encoded distinguished name.
    ///
    /// `name` must be a complete `Name` (a DER SEQUENCE).
    pub fn by_name(name: &[u8]) -> Result<Self, InvalidMessage> {
        let any = AnyRef::from_der(name).map_err(|_| InvalidMessage::InvalidDer("Name"))?;
        if any.tag() != Tag::Sequence {
            return Err(InvalidMessage::InvalidDer("Name"));
        }
        Ok(Self(asn1_wrap(DER_CONTEXT_1_TAG, name)))
    }

    /// Accept a responder ID received from a peer.
    ///
    /// The bytes must hold exactly one `[1]` or `[2]` element whose contents
    /// are a `Name` or a `KeyHash` respectively.
    pub(crate) fn from_der(der: &[u8]) -> Result<Self, InvalidMessage> {
        let err = InvalidMessage::InvalidDer("ResponderID");
        let any = AnyRef::from_der(der).map_err(|_| err)?;
        match any.tag() {
            Tag::ContextSpecific {
                constructed: true,
                number: TagNumber::N1,
            } => {
                let name = AnyRef::from_der(any.value()).map_err(|_| err)?;
                if name.tag() != Tag::Sequence {
                    return Err(err);
                }
            }
            Tag::ContextSpecific {
                constructed: true,
                number: TagNumber::N2,
            } => {
                OctetStringRef::from_der(any.value()).map_err(|_| err)?;
            }
            _ => return Err(err),
        }
        Ok(Self(der.to_vec()))
    }

    /// The DER encoding.
    pub fn as_der(&self) -> &[u8] {
        &self.0
    }
}

// Only decoded to prove the request extensions are well formed.
#[allow(dead_code)]
#[derive(Sequence)]
struct RequestExtension<'a> {
    extn_id: ObjectIdentifier,
    #[asn1(default = "Default::default")]
    critical: bool,
    extn_value: OctetStringRef<'a>,
}

/// Check `der` is an OCSP request `Extensions` value, a DER
/// `SEQUENCE OF Extension`.  An empty slice means "no extensions".
///
/// Returns the number of extensions present.
pub(crate) fn check_request_extensions(der: &[u8]) -> Result<usize, InvalidMessage> {
    if der.is_empty() {
        return Ok(0);
    }

    Vec::<RequestExtension<'_>>::from_der(der)
        .map(|exts| exts.len())
        .map_err(|_| InvalidMessage::InvalidDer("Extensions"))
}

/// Prepend stuff to `bytes` to put it in a DER OCTET STRING.
fn wrap_in_octet_string(bytes: &[u8]) -> Vec<u8> {
    asn1_wrap(DER_OCTET_STRING_TAG, bytes)
}

fn asn1_wrap(tag: u8, bytes: &[u8]) -> Vec<u8> {
    let len = bytes.len();
    let mut ret = Vec::with_capacity(2 + 8 + len);
    ret.push(tag);

    if len <= 0x7f {
        // Short form
        ret.push(len as u8);
    } else {
        // Long form
        let size = len.to_be_bytes();
        let leading_zero_bytes = size
            .iter()
            .position(|&x| x != 0)
            .unwrap_or(size.len());
        let encoded_bytes = size.len() - leading_zero_bytes;
        ret.push(0x80 + encoded_bytes as u8);
        ret.extend_from_slice(&size[leading_zero_bytes..]);
    }

    ret.extend_from_slice(bytes);
    ret
}

const DER_OCTET_STRING_TAG: u8 = 0x04;
const DER_CONTEXT_1_TAG: u8 = 0xa1;
const DER_CONTEXT_2_TAG: u8 = 0xa2;

#[cfg(test)]
mod tests {
    use std::prelude::v1::*;
    use std::vec;

    use super::*;

    #[test]
    fn test_small() {
        assert_eq!(
            vec![0x04, 0x04, 0x00, 0x11, 0x22, 0x33],
            wrap_in_octet_string(&[0x00, 0x11, 0x22, 0x33])
        );
    }

    #[test]
    fn test_medium() {
        let val = vec![0x12; 255];
        assert_eq!(
            vec![0x04, 0x81, 0xff, 0x12, 0x12, 0x12],
            wrap_in_octet_string(&val)[..6]
        );
    }

    #[test]
    fn test_large() {
        let val = vec![0x12; 4660];
        assert_eq!(
            vec![0x04, 0x82, 0x12, 0x34, 0x12, 0x12],
            wrap_in_octet_string(&val)[..6]
        );
    }

    #[test]
    fn key_hash_responder_id() {
        let id = ResponderId::by_key_hash(&[0xaa; 20]);
        assert_eq!(&id.as_der()[..4], &[0xa2, 0x16, 0x04, 0x14]);
        assert_eq!(id.as_der().len(), 24);
        assert_eq!(ResponderId::from_der(id.as_der()), Ok(id));
    }

    #[test]
    fn name_responder_id() {
        // SEQUENCE { SET { SEQUENCE { OID 2.5.4.3, UTF8String "ca" } } }
        let name = [
            0x30, 0x0d, 0x31, 0x0b, 0x30, 0x09, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c, 0x02, b'c',
            b'a',
        ];
        let id = ResponderId::by_name(&name).unwrap();
        assert_eq!(&id.as_der()[..2], &[0xa1, 0x0f]);
        assert_eq!(ResponderId::from_der(id.as_der()), Ok(id));
    }

    #[test]
    fn name_must_be_a_sequence() {
        assert_eq!(
            ResponderId::by_name(&[0x04, 0x01, 0x00]),
            Err(InvalidMessage::InvalidDer("Name"))
        );
    }

    #[test]
    fn rejects_malformed_responder_ids() {
        let err = Err(InvalidMessage::InvalidDer("ResponderID"));
        // empty
        assert_eq!(ResponderId::from_der(&[]), err);
        // wrong tag
        assert_eq!(ResponderId::from_der(&[0x04, 0x01, 0x00]), err);
        // [2] holding a SEQUENCE rather than an OCTET STRING
        assert_eq!(ResponderId::from_der(&[0xa2, 0x02, 0x30, 0x00]), err);
        // truncated
        assert_eq!(ResponderId::from_der(&[0xa2, 0x05, 0x04, 0x03, 0x00]), err);
        // trailing element
        assert_eq!(
            ResponderId::from_der(&[0xa2, 0x02, 0x04, 0x00, 0x05, 0x00]),
            err
        );
    }

    #[test]
    fn request_extensions() {
        assert_eq!(check_request_extensions(&[]), Ok(0));

        // SEQUENCE { SEQUENCE { OID 1.3.6.1.5.5.7.48.1.2, OCTET STRING { 00 } } }
        let nonce = [
            0x30, 0x11, 0x30, 0x0f, 0x06, 0x09, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01,
            0x02, 0x04, 0x02, 0x04, 0x00,
        ];
        assert_eq!(check_request_extensions(&nonce), Ok(1));

        assert_eq!(
            check_request_extensions(&[0x30, 0x03, 0x02, 0x01, 0x00]),
            Err(InvalidMessage::InvalidDer("Extensions"))
        );
        assert_eq!(
            check_request_extensions(&nonce[..10]),
            Err(InvalidMessage::InvalidDer("Extensions"))
        );
    }
}
