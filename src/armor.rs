//! # Armor module
//!
//! GnuPG exports keys either as binary packets or wrapped in ASCII armor.
//! The packet decoder only accepts the former, so armored input has to be
//! unwrapped explicitly with [`dearmor`] first.
//!
//! Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-6.2>

use std::collections::BTreeMap;
use std::hash::Hasher;
use std::{fmt, str};

use base64::engine::{general_purpose, Engine as _};
use crc24::Crc24Hasher;
use log::debug;

use crate::errors::{Error, Result};

/// Armor block types.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BlockType {
    /// PGP public key
    PublicKey,
    /// PGP private key
    PrivateKey,
    Message,
    Signature,
    // gnupg extension
    File,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::PublicKey => f.write_str("PGP PUBLIC KEY BLOCK"),
            BlockType::PrivateKey => f.write_str("PGP PRIVATE KEY BLOCK"),
            BlockType::Message => f.write_str("PGP MESSAGE"),
            BlockType::Signature => f.write_str("PGP SIGNATURE"),
            BlockType::File => f.write_str("PGP ARMORED FILE"),
        }
    }
}

impl str::FromStr for BlockType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PGP PUBLIC KEY BLOCK" => Ok(BlockType::PublicKey),
            "PGP PRIVATE KEY BLOCK" => Ok(BlockType::PrivateKey),
            "PGP MESSAGE" => Ok(BlockType::Message),
            "PGP SIGNATURE" => Ok(BlockType::Signature),
            "PGP ARMORED FILE" => Ok(BlockType::File),
            _ => Err(Error::InvalidArmorWrappers),
        }
    }
}

/// Armor headers, a key may appear more than once.
pub type Headers = BTreeMap<String, Vec<String>>;

/// The result of [`dearmor`].
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Dearmored {
    pub typ: BlockType,
    pub headers: Headers,
    #[debug("{}", hex::encode(data))]
    pub data: Vec<u8>,
}

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// Returns true if `input` starts with an armor header line.
pub fn is_armored(input: &[u8]) -> bool {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    input[start..].starts_with(b"-----BEGIN PGP")
}

fn parse_wrapper<'a>(line: &'a str, prefix: &str) -> Result<&'a str> {
    line.strip_prefix(prefix)
        .and_then(|l| l.strip_suffix(DASHES))
        .ok_or(Error::InvalidArmorWrappers)
}

/// Strips the armor from `input`.
///
/// The BEGIN and END lines must name the same block type. If the footer
/// carries a CRC-24 checksum it must match the decoded data.
pub fn dearmor(input: &[u8]) -> Result<Dearmored> {
    let text = str::from_utf8(input).map_err(|_| Error::InvalidArmorWrappers)?;
    let mut lines = text.lines().map(str::trim_end).skip_while(|l| l.is_empty());

    let begin = lines.next().ok_or(Error::InvalidArmorWrappers)?;
    let typ: BlockType = parse_wrapper(begin, BEGIN)?.parse()?;

    let mut headers = Headers::new();
    let mut body = String::new();
    let mut in_headers = true;
    let mut checksum = None;
    let mut footer = None;

    for line in lines.by_ref() {
        if line.starts_with(END) {
            footer = Some(line);
            break;
        }
        if in_headers {
            if line.is_empty() {
                in_headers = false;
                continue;
            }
            if let Some((key, value)) = line.split_once(": ") {
                headers
                    .entry(key.to_string())
                    .or_default()
                    .push(value.to_string());
                continue;
            }
            // no header section at all
            in_headers = false;
        }
        if let Some(crc) = line.strip_prefix('=') {
            checksum = Some(read_checksum(crc)?);
            continue;
        }
        ensure!(checksum.is_none(), "armor data after the checksum line");
        body.push_str(line.trim());
    }

    let footer = footer.ok_or(Error::InvalidArmorWrappers)?;
    let footer_typ: BlockType = parse_wrapper(footer, END)?.parse()?;
    if footer_typ != typ {
        debug!("armor footer {} does not match header {}", footer_typ, typ);
        return Err(Error::InvalidArmorWrappers);
    }

    let data = general_purpose::STANDARD.decode(body.as_bytes())?;

    if let Some(expected) = checksum {
        let mut crc = Crc24Hasher::default();
        crc.write(&data);
        if crc.finish() != u64::from(expected) {
            return Err(Error::InvalidChecksum);
        }
    }

    debug!("dearmored {} ({} bytes)", typ, data.len());
    Ok(Dearmored {
        typ,
        headers,
        data,
    })
}

fn read_checksum(line: &str) -> Result<u32> {
    let raw = general_purpose::STANDARD.decode(line.trim())?;
    ensure!(raw.len() == 3, "invalid checksum length {}", raw.len());
    Ok(u32::from(raw[0]) << 16 | u32::from(raw[1]) << 8 | u32::from(raw[2]))
}
