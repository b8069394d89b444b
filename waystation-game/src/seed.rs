//! Session seed codes and the deterministic RNG derived from them.
//! Code format: WS-<WORD><NN>, e.g., WS-COMPASS42, WS-LANTERN07

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

// Word list for session codes
pub const WORD_LIST: [&str; 32] = [
    "COMPASS", "LANTERN", "RELAY", "BEACON", "ATLAS", "CIPHER", "SIGNAL", "VECTOR",
    "ARCHIVE", "DOSSIER", "STATION", "OUTPOST", "RATION", "SATCHEL", "LEDGER", "MARKER",
    "PYLON", "ANTENNA", "CANTEEN", "TRANSIT", "SURVEY", "FIELD", "PROBE", "CHART",
    "TERRAIN", "CONSOLE", "UPLINK", "MODULE", "CARGO", "SPECTRA", "NOMAD", "ZENITH",
];

/// Generate a fresh friendly seed code from an entropy value.
///
/// The code is not cryptographically strong; it only needs to be
/// reproducible and easy for players to share.
#[must_use]
pub fn generate_seed(entropy: u64) -> String {
    let word = WORD_LIST[(entropy % WORD_LIST.len() as u64) as usize];
    let nn = (entropy >> 17) % 100;
    format!("WS-{word}{nn:02}")
}

/// Spread a seed string into a 32-byte ChaCha20 key.
///
/// Domain-separated FNV-1a fold of the seed text; the same seed string
/// yields the same key on every platform.
pub(crate) fn seed_bytes(seed: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(seed.len() + 4);
    buf.extend_from_slice(b"WAY-");
    buf.extend_from_slice(seed.as_bytes());
    let s = fnv1a64(&buf);

    #[inline]
    fn b(x: u64, shift: u8, xorv: u8) -> u8 {
        (((x >> shift) & 0xFF) as u8) ^ xorv
    }
    [
        b(s, 56, 0x00),
        b(s, 48, 0x00),
        b(s, 40, 0x00),
        b(s, 32, 0x00),
        b(s, 24, 0x00),
        b(s, 16, 0x00),
        b(s, 8, 0x00),
        b(s, 0, 0x00),
        b(s, 56, 0xAA),
        b(s, 48, 0x55),
        b(s, 40, 0xAA),
        b(s, 32, 0x55),
        b(s, 24, 0xAA),
        b(s, 16, 0x55),
        b(s, 8, 0xAA),
        b(s, 0, 0x55),
        b(s, 56, 0x11),
        b(s, 48, 0x22),
        b(s, 40, 0x33),
        b(s, 32, 0x44),
        b(s, 24, 0x55),
        b(s, 16, 0x66),
        b(s, 8, 0x77),
        b(s, 0, 0x88),
        b(s, 56, 0x99),
        b(s, 48, 0xAA),
        b(s, 40, 0xBB),
        b(s, 32, 0xCC),
        b(s, 24, 0xDD),
        b(s, 16, 0xEE),
        b(s, 8, 0xFF),
        b(s, 0, 0x10),
    ]
}

/// Build the session RNG for a seed string.
#[must_use]
pub fn rng_from_seed(seed: &str) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(seed_bytes(seed))
}

/// Fisher-Yates shuffle consuming the generator stream.
///
/// The input is left untouched; the returned vector holds the same
/// multiset of items in permuted order.
#[must_use]
pub fn shuffle<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}
