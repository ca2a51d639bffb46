//! Checked, sequential reads over a [`Buf`].
//!
//! Every decoder in this crate pulls its input through [`BufParsing`], so a
//! short buffer always surfaces as [`Error::TruncatedInput`] instead of a
//! panic inside [`bytes`].

use bytes::{Buf, Bytes};

use crate::errors::{Result, TruncatedInputSnafu};

/// What was being read when the input ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Typ {
    U8,
    U16Be,
    U32Be,
    Array(usize),
    Take(usize),
}

impl Typ {
    fn size(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16Be => 2,
            Self::U32Be => 4,
            Self::Array(n) | Self::Take(n) => *n,
        }
    }
}

pub trait BufParsing: Buf + Sized {
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(Typ::U8)?;
        Ok(self.get_u8())
    }

    fn read_be_u16(&mut self) -> Result<u16> {
        self.ensure_remaining(Typ::U16Be)?;
        Ok(self.get_u16())
    }

    fn read_be_u32(&mut self) -> Result<u32> {
        self.ensure_remaining(Typ::U32Be)?;
        Ok(self.get_u32())
    }

    fn read_array<const C: usize>(&mut self) -> Result<[u8; C]> {
        self.ensure_remaining(Typ::Array(C))?;
        let mut arr = [0u8; C];
        self.copy_to_slice(&mut arr);
        Ok(arr)
    }

    /// Splits off the next `size` bytes.
    fn read_take(&mut self, size: usize) -> Result<Bytes> {
        self.ensure_remaining(Typ::Take(size))?;
        Ok(self.copy_to_bytes(size))
    }

    fn rest(&mut self) -> Bytes {
        let len = self.remaining();
        self.copy_to_bytes(len)
    }

    fn ensure_remaining(&self, typ: Typ) -> Result<()> {
        let needed = typ.size();
        let remaining = self.remaining();
        if remaining < needed {
            return TruncatedInputSnafu {
                typ,
                needed,
                remaining,
            }
            .fail();
        }

        Ok(())
    }
}

impl<B: Buf> BufParsing for B {}

/// Fails if there is any data left in `i`.
///
/// Packet bodies carry their own length, so leftovers mean the body and the
/// fields inside it disagree.
pub(crate) fn ensure_consumed<B: Buf>(i: &B, context: &'static str) -> Result<()> {
    if i.has_remaining() {
        return Err(format_err!(
            "{}: {} unexpected trailing bytes",
            context,
            i.remaining()
        ));
    }
    Ok(())
}

/// Reads a one-octet length prefix followed by that many bytes, used for
/// curve OIDs and KDF parameters. 0 and 0xFF are reserved.
pub(crate) fn read_len_prefixed<B: Buf>(i: &mut B, context: &'static str) -> Result<Bytes> {
    let len = i.read_u8()?;
    if len == 0 || len == 0xFF {
        bail!("{}: reserved length {}", context, len);
    }
    i.read_take(usize::from(len))
}
