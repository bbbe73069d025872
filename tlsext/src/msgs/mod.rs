//! Wire-level building blocks: the byte cursor, the length-prefixed writer
//! and the IANA enums carried inside hello extensions.

#[macro_use]
mod macros;

pub(crate) mod codec;
pub use codec::{Codec, Reader};

pub(crate) mod enums;
pub use enums::{CertificateStatusType, ECPointFormat, ExtensionType, NamedGroup, ServerNameType};
