use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::enums::SignatureScheme;
use crate::error::{Error, InternalError};
use crate::msgs::codec::{ListLength, TlsListElement};
use crate::msgs::enums::{ECPointFormat, NamedGroup};

/// Local preferences consulted when building hello extensions.
///
/// One of these is usually made per process and shared between all
/// connections through an `Arc`.
#[derive(Clone, Debug)]
pub struct ExtensionConfig {
    /// Groups offered in `supported_groups`, most preferred first.
    pub supported_groups: Vec<NamedGroup>,

    /// Formats offered in `ec_point_formats`.  Must include
    /// [`ECPointFormat::Uncompressed`] to interoperate.
    pub ec_point_formats: Vec<ECPointFormat>,

    /// Schemes offered in `signature_algorithms`.
    pub signature_schemes: Vec<SignatureScheme>,

    /// Never offer or accept session tickets.
    pub disable_tickets: bool,

    /// Shown the body of every received `session_ticket` extension.
    pub ticket_inspector: Option<Arc<dyn InspectsSessionTicket>>,

    /// Shown the peer's `signature_algorithms` list.
    pub signature_algorithm_processor: Option<Arc<dyn ProcessesSignatureAlgorithms>>,
}

impl ExtensionConfig {
    /// Check every configured list can be written with its length prefix.
    pub fn validate(&self) -> Result<(), Error> {
        check_list_len::<NamedGroup>(self.supported_groups.len(), 2, "NamedGroups")?;
        check_list_len::<ECPointFormat>(self.ec_point_formats.len(), 1, "ECPointFormats")?;
        check_list_len::<SignatureScheme>(self.signature_schemes.len(), 2, "SignatureSchemes")
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            supported_groups: DEFAULT_GROUPS.to_vec(),
            ec_point_formats: Vec::from([ECPointFormat::Uncompressed]),
            signature_schemes: DEFAULT_SIGNATURE_SCHEMES.to_vec(),
            disable_tickets: false,
            ticket_inspector: None,
            signature_algorithm_processor: None,
        }
    }
}

fn check_list_len<T: TlsListElement>(
    items: usize,
    item_width: usize,
    name: &'static str,
) -> Result<(), Error> {
    let limit: ListLength = T::SIZE_LEN;
    if items * item_width > limit.max_len() {
        return Err(InternalError::ListTooLong(name).into());
    }
    Ok(())
}

static DEFAULT_GROUPS: &[NamedGroup] = &[
    NamedGroup::X25519,
    NamedGroup::secp256r1,
    NamedGroup::secp384r1,
];

static DEFAULT_SIGNATURE_SCHEMES: &[SignatureScheme] = &[
    SignatureScheme::ECDSA_NISTP384_SHA384,
    SignatureScheme::ECDSA_NISTP256_SHA256,
    SignatureScheme::ED25519,
    SignatureScheme::RSA_PSS_SHA512,
    SignatureScheme::RSA_PSS_SHA384,
    SignatureScheme::RSA_PSS_SHA256,
    SignatureScheme::RSA_PKCS1_SHA512,
    SignatureScheme::RSA_PKCS1_SHA384,
    SignatureScheme::RSA_PKCS1_SHA256,
];

/// A hook that sees session ticket extensions as they arrive.
///
/// Returning `false` from a ServerHello inspection aborts the handshake
/// with `internal_error`.  On the ClientHello path the result is only
/// logged.
pub trait InspectsSessionTicket: Debug + Send + Sync {
    /// `ticket` is the raw extension body, possibly empty.
    fn inspect(&self, ticket: &[u8]) -> bool;
}

/// Processes the signature algorithms a client offered.
pub trait ProcessesSignatureAlgorithms: Debug + Send + Sync {
    /// `schemes` is the body of the list, without its length prefix.
    ///
    /// Returning `false` rejects the ClientHello with `decode_error`.
    fn process(&self, schemes: &[u8]) -> bool;
}
