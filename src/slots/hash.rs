//! Key to hash slot mapping.
//!
//! A key's slot is `CRC16(key) mod 16384`, where CRC16 is the XMODEM variant
//! (polynomial 0x1021, initial value 0). When the key carries a hashtag, only
//! the hashtag is hashed so that related keys land on the same slot.

use super::distribution::TOTAL_SLOTS;

const CRC16_POLY: u16 = 0x1021;

/// Lookup table for CRC16/XMODEM, one entry per leading byte.
const CRC16_TABLE: [u16; 256] = build_crc16_table();

const fn build_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute CRC16/XMODEM over `bytes`.
///
/// # Examples
///
/// ```
/// use valkey_cmds::slots::hash::crc16;
///
/// assert_eq!(crc16(b"123456789"), 0x31C3);
/// ```
// The table index is a u8.
#[allow(clippy::indexing_slicing)]
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |crc, &b| {
        let idx = usize::from((crc >> 8) as u8 ^ b);
        (crc << 8) ^ CRC16_TABLE[idx]
    })
}

/// Return the part of `key` that decides its slot.
///
/// A pair is a `{` and the first `}` after it. Pairs are scanned left to right
/// and the interior of the first one enclosing at least one byte is returned.
/// Empty `{}` pairs are skipped. Without such a pair the whole key is.
///
/// # Examples
///
/// ```
/// use valkey_cmds::slots::hash::hashtag;
///
/// assert_eq!(hashtag(b"{user1}.profile"), b"user1");
/// assert_eq!(hashtag(b"plain"), b"plain");
/// assert_eq!(hashtag(b"{}.empty"), b"{}.empty");
/// assert_eq!(hashtag(b"{}{user1}"), b"user1");
/// ```
pub fn hashtag(key: &[u8]) -> &[u8] {
    let find = |from: usize, byte: u8| {
        key.get(from..)
            .and_then(|rest| rest.iter().position(|&b| b == byte))
            .map(|pos| from + pos)
    };

    let mut from = 0;
    while let Some(open) = find(from, b'{') {
        let start = open + 1;
        let Some(close) = find(start, b'}') else {
            return key;
        };
        if close > start {
            return key.get(start..close).unwrap_or(key);
        }
        from = close + 1;
    }
    key
}

/// Compute the hash slot owning `key`.
///
/// The result is always in `[0, TOTAL_SLOTS)`.
///
/// # Examples
///
/// ```
/// use valkey_cmds::slots::hash::key_slot;
///
/// assert_eq!(key_slot(b"foo"), 12182);
/// assert_eq!(key_slot(b"{user1}.profile"), key_slot(b"{user1}.settings"));
/// ```
pub fn key_slot(key: &[u8]) -> u16 {
    crc16(hashtag(key)) % TOTAL_SLOTS
}

/// Compute the hash slot owning a string key.
pub fn slot(key: &str) -> u16 {
    key_slot(key.as_bytes())
}
