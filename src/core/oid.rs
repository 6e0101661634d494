//! Generator for 12-byte object identifiers.
//!
//! An identifier is an 8-byte sequence followed by a 4-byte process salt. The
//! sequence packs the wall clock in milliseconds into its upper 48 bits and a
//! counter into the lower 16, and never repeats or goes backwards inside one
//! process. The hex form therefore sorts in generation order, which is what the
//! paginated scan relies on.

use lazy_static::lazy_static;
use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const COUNTER_BITS: u32 = 16;

static LAST_SEQUENCE: AtomicU64 = AtomicU64::new(0);

lazy_static! {
    static ref PROCESS_SALT: [u8; 4] = {
        let random = uuid::Uuid::new_v4();
        let bytes = random.as_bytes();
        [bytes[0], bytes[1], bytes[2], bytes[3]]
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new identifier, strictly greater than every identifier
    /// previously generated by this process.
    pub fn new() -> Self {
        let sequence = next_sequence();
        let mut bytes = [0u8; 12];
        bytes[..8].copy_from_slice(&sequence.to_be_bytes());
        bytes[8..].copy_from_slice(&*PROCESS_SALT);
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Milliseconds since the epoch at (or shortly before) generation time.
    pub fn timestamp_millis(&self) -> i64 {
        let mut sequence = [0u8; 8];
        sequence.copy_from_slice(&self.0[..8]);
        (u64::from_be_bytes(sequence) >> COUNTER_BITS) as i64
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse a 24-character hex string.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() != 24 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 12];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialOrd for ObjectId {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectId {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn next_sequence() -> u64 {
    let now = (chrono::Utc::now().timestamp_millis().max(0) as u64) << COUNTER_BITS;
    let advance = |prev: u64| (prev + 1).max(now);
    // The closure never returns None, so both arms carry the previous value.
    let prev = match LAST_SEQUENCE.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
        Some(advance(prev))
    }) {
        Ok(prev) | Err(prev) => prev,
    };
    advance(prev)
}

/// Generate a fresh identifier in hex form.
pub fn generate_id() -> String {
    ObjectId::new().to_hex()
}
