//! Frame Check Sequence policies and their computation engines.
//!
//! A policy fixes both the wire width of the FCS field and the algorithm
//! that fills it. All engines are total functions over a byte span; the
//! widest result is widened to `u64` and truncated to the policy width
//! when written to the wire.
//!
//! Algorithm parameters are pinned for cross-implementation compatibility:
//! the CRC family is non-reflected, MSB-first, init 0, no final XOR.

/// Selects the integrity algorithm carried by a framed packet.
///
/// `None` contributes zero bytes to the packet layout and always validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FcsPolicy {
    /// No FCS field; fully trusted links.
    None,
    /// 8-bit additive sum.
    Sum8,
    /// 16-bit additive sum.
    Sum16,
    /// 32-bit additive sum.
    Sum32,
    /// CRC-8, poly 0x07.
    Crc8,
    /// CRC-16/CCITT, poly 0x1021.
    Crc16,
    /// CRC-32, poly 0x04C11DB7.
    Crc32,
    /// CRC-64/ECMA-182, poly 0x42F0E1EBA9EA3693.
    Crc64,
    /// Fletcher-16 over bytes, both sums mod 255.
    Fletcher16,
    /// Fletcher-32 over 16-bit little-endian words, mod 65535.
    Fletcher32,
    /// Adler-32, mod 65521.
    Adler32,
    /// RFC 1071 one's-complement sum, inverted.
    Internet16,
}

impl FcsPolicy {
    /// Width of the FCS field on the wire, in bytes.
    pub const fn size(self) -> usize {
        match self {
            FcsPolicy::None => 0,
            FcsPolicy::Sum8 | FcsPolicy::Crc8 => 1,
            FcsPolicy::Sum16 | FcsPolicy::Crc16 | FcsPolicy::Fletcher16 | FcsPolicy::Internet16 => {
                2
            }
            FcsPolicy::Sum32 | FcsPolicy::Crc32 | FcsPolicy::Fletcher32 | FcsPolicy::Adler32 => 4,
            FcsPolicy::Crc64 => 8,
        }
    }

    /// True when the policy stores an FCS field at all.
    pub const fn carries_fcs(self) -> bool {
        self.size() != 0
    }

    /// Compute the FCS value for `data`, widened to `u64`.
    pub fn compute(self, data: &[u8]) -> u64 {
        match self {
            FcsPolicy::None => 0,
            FcsPolicy::Sum8 => sum(data) & 0xFF,
            FcsPolicy::Sum16 => sum(data) & 0xFFFF,
            FcsPolicy::Sum32 => sum(data) & 0xFFFF_FFFF,
            FcsPolicy::Crc8 => crc8(data) as u64,
            FcsPolicy::Crc16 => crc16(data) as u64,
            FcsPolicy::Crc32 => crc32(data) as u64,
            FcsPolicy::Crc64 => crc64(data),
            FcsPolicy::Fletcher16 => fletcher16(data) as u64,
            FcsPolicy::Fletcher32 => fletcher32(data) as u64,
            FcsPolicy::Adler32 => adler32(data) as u64,
            FcsPolicy::Internet16 => internet16(data) as u64,
        }
    }
}

fn sum(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| acc.wrapping_add(b as u64))
}

const CRC8_POLY: u8 = 0x07;
const CRC16_POLY: u16 = 0x1021;
const CRC32_POLY: u32 = 0x04C1_1DB7;
const CRC64_POLY: u64 = 0x42F0_E1EB_A9EA_3693;

const fn crc8_table(poly: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ poly
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

const fn crc16_table(poly: u16) -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ poly
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

const fn crc32_table(poly: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ poly
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

const fn crc64_table(poly: u64) -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u64) << 56;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000_0000_0000_0000 != 0 {
                (crc << 1) ^ poly
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

static CRC8_TABLE: [u8; 256] = crc8_table(CRC8_POLY);
static CRC16_TABLE: [u16; 256] = crc16_table(CRC16_POLY);
static CRC32_TABLE: [u32; 256] = crc32_table(CRC32_POLY);
static CRC64_TABLE: [u64; 256] = crc64_table(CRC64_POLY);

fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &b in data {
        crc = CRC8_TABLE[(crc ^ b) as usize];
    }
    crc
}

fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &b in data {
        let idx = ((crc >> 8) ^ b as u16) & 0xFF;
        crc = (crc << 8) ^ CRC16_TABLE[idx as usize];
    }
    crc
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &b in data {
        let idx = ((crc >> 24) ^ b as u32) & 0xFF;
        crc = (crc << 8) ^ CRC32_TABLE[idx as usize];
    }
    crc
}

fn crc64(data: &[u8]) -> u64 {
    let mut crc = 0u64;
    for &b in data {
        let idx = ((crc >> 56) ^ b as u64) & 0xFF;
        crc = (crc << 8) ^ CRC64_TABLE[idx as usize];
    }
    crc
}

fn fletcher16(data: &[u8]) -> u16 {
    let mut sum1 = 0u32;
    let mut sum2 = 0u32;
    for &b in data {
        sum1 = (sum1 + b as u32) % 255;
        sum2 = (sum2 + sum1) % 255;
    }
    ((sum2 << 8) | sum1) as u16
}

/// Fletcher-32 over 16-bit little-endian words; a trailing odd byte extends
/// as the low byte of a final word.
fn fletcher32(data: &[u8]) -> u32 {
    let mut sum1 = 0u64;
    let mut sum2 = 0u64;
    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        let word = pair[0] as u64 | ((pair[1] as u64) << 8);
        sum1 = (sum1 + word) % 65535;
        sum2 = (sum2 + sum1) % 65535;
    }
    if let [last] = chunks.remainder() {
        sum1 = (sum1 + *last as u64) % 65535;
        sum2 = (sum2 + sum1) % 65535;
    }
    ((sum2 << 16) | sum1) as u32
}

const ADLER_MOD: u32 = 65521;

fn adler32(data: &[u8]) -> u32 {
    let mut a = 1u32;
    let mut b = 0u32;
    for &byte in data {
        a += byte as u32;
        if a >= ADLER_MOD {
            a -= ADLER_MOD;
        }
        b += a;
        b %= ADLER_MOD;
    }
    (b << 16) | a
}

/// RFC 1071 checksum over 16-bit big-endian words; a trailing odd byte fills
/// the high byte of a final word. The folded sum is bit-inverted.
fn internet16(data: &[u8]) -> u16 {
    let mut total = 0u32;
    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        total += ((pair[0] as u32) << 8) | pair[1] as u32;
    }
    if let [last] = chunks.remainder() {
        total += (*last as u32) << 8;
    }
    while total >> 16 != 0 {
        total = (total & 0xFFFF) + (total >> 16);
    }
    !(total as u16)
}
