/// A macro which defines an enum type.
///
/// Every generated enum carries an `Unknown` variant holding the raw value, so
/// decoding a wire enum never fails on an unrecognised ordinal.
macro_rules! enum_builder {
    (
        $(#[doc = $comment:literal])*
        #[repr($uint:ty)]
        $enum_vis:vis enum $enum_name:ident
        {
          $( $(#[doc = $var_comment:literal])* $enum_var:ident => $enum_val:literal),* $(,)?
        }
    ) => {
        $(#[doc = $comment])*
        #[non_exhaustive]
        #[derive(PartialEq, Eq, Clone, Copy, Hash)]
        $enum_vis enum $enum_name {
            $( $(#[doc = $var_comment])* $enum_var),*
            ,Unknown($uint)
        }

        impl $enum_name {
            // NOTE(allow) generated irrespective if there are callers
            #[allow(dead_code)]
            $enum_vis fn as_str(&self) -> Option<&'static str> {
                match self {
                    $( $enum_name::$enum_var => Some(stringify!($enum_var))),*
                    ,$enum_name::Unknown(_) => None,
                }
            }

            /// The wire value, usable in `const` contexts.
            // NOTE(allow) generated irrespective if there are callers
            #[allow(dead_code)]
            $enum_vis const fn to_uint(self) -> $uint {
                match self {
                    $( $enum_name::$enum_var => $enum_val),*
                    ,$enum_name::Unknown(x) => x
                }
            }
        }

        impl $crate::msgs::codec::Codec<'_> for $enum_name {
            // NOTE(allow) fully qualified Vec is only needed in no-std mode
            #[allow(unused_qualifications)]
            fn encode(&self, bytes: &mut alloc::vec::Vec<u8>) {
                $crate::msgs::codec::Codec::encode(&<$uint>::from(*self), bytes);
            }

            fn read(
                r: &mut $crate::msgs::codec::Reader<'_>,
            ) -> Result<Self, $crate::error::InvalidMessage> {
                match <$uint as $crate::msgs::codec::Codec>::read(r) {
                    Ok(x) => Ok($enum_name::from(x)),
                    Err(_) => Err($crate::error::InvalidMessage::MissingData(stringify!($enum_name))),
                }
            }
        }

        impl From<$uint> for $enum_name {
            fn from(x: $uint) -> Self {
                match x {
                    $($enum_val => $enum_name::$enum_var),*
                    , x => $enum_name::Unknown(x),
                }
            }
        }

        impl From<$enum_name> for $uint {
            fn from(value: $enum_name) -> Self {
                value.to_uint()
            }
        }

        impl core::fmt::Debug for $enum_name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( $enum_name::$enum_var => f.write_str(stringify!($enum_var)), )*
                    _ => write!(f, "{}(0x{:x?})", stringify!($enum_name), <$uint>::from(*self)),
                }
            }
        }
    };
}
