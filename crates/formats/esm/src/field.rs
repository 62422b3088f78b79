//! Fixed-size subrecord payloads.
//!
//! A [`FixedField`] knows its exact on-disk size, so the reader can reject a
//! subrecord whose declared length disagrees with the struct it is decoded into.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::cursor::{ByteWriter, Cursor};
use crate::error::{Error, Result};
use crate::text;

/// A value with a fixed little-endian on-disk layout.
pub trait FixedField: Sized {
    /// Exact encoded size in bytes.
    const SIZE: usize;

    fn decode(c: &mut Cursor<'_>) -> Result<Self>;

    fn encode(&self, w: &mut ByteWriter);
}

macro_rules! primitive_field {
    ($($ty:ty => $read:ident, $write:ident;)*) => {
        $(
            impl FixedField for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn decode(c: &mut Cursor<'_>) -> Result<Self> {
                    c.$read()
                }

                fn encode(&self, w: &mut ByteWriter) {
                    w.$write(*self);
                }
            }
        )*
    };
}

primitive_field! {
    u8 => read_u8, write_u8;
    i8 => read_i8, write_i8;
    i16 => read_i16, write_i16;
    u16 => read_u16, write_u16;
    i32 => read_i32, write_i32;
    u32 => read_u32, write_u32;
    i64 => read_i64, write_i64;
    f32 => read_f32, write_f32;
}

impl<T: FixedField, const N: usize> FixedField for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn decode(c: &mut Cursor<'_>) -> Result<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(c)?);
        }
        items.try_into().map_err(|_| Error::UnexpectedEof {
            offset: c.position(),
            need: Self::SIZE,
            have: c.remaining(),
        })
    }

    fn encode(&self, w: &mut ByteWriter) {
        for item in self {
            item.encode(w);
        }
    }
}

/// A NUL-padded string stored in exactly `N` bytes (`char name[N]` on disk).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize>(pub String);

impl<const N: usize> FixedString<N> {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> From<&str> for FixedString<N> {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<const N: usize> FixedField for FixedString<N> {
    const SIZE: usize = N;

    fn decode(c: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self(text::decode_c(c.read_bytes(N)?)))
    }

    fn encode(&self, w: &mut ByteWriter) {
        let mut bytes = text::encode(&self.0);
        bytes.resize(N, 0);
        w.write_bytes(&bytes);
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> Serialize for FixedString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Define a struct with a fixed on-disk layout, decoded field by field in
/// declaration order.
///
/// ```ignore
/// fixed_field! {
///     pub struct WeightValue {
///         pub weight: f32,
///         pub value: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! fixed_field {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize)]
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $ty),*
        }

        impl $crate::field::FixedField for $name {
            const SIZE: usize = 0 $(+ <$ty as $crate::field::FixedField>::SIZE)*;

            fn decode(c: &mut $crate::cursor::Cursor<'_>) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: <$ty as $crate::field::FixedField>::decode(c)?),*
                })
            }

            fn encode(&self, w: &mut $crate::cursor::ByteWriter) {
                $($crate::field::FixedField::encode(&self.$field, w);)*
            }
        }
    };
}
