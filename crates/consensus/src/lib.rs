//! Chain parameters and subsidy rules consumed by the metrics screen.

pub mod constants;
pub mod money;
pub mod params;
pub mod rewards;

pub use rewards::block_subsidy;

pub type Hash256 = [u8; 32];

/// Renders a hash the way block explorers show it (byte-reversed hex).
pub fn hash256_to_hex(hash: &Hash256) -> String {
    let mut out = String::with_capacity(64);
    for byte in hash.iter().rev() {
        out.push(hex_digit(byte >> 4));
        out.push(hex_digit(byte & 0x0f));
    }
    out
}

fn hex_digit(value: u8) -> char {
    match value {
        0..=9 => (b'0' + value) as char,
        _ => (b'a' + (value - 10)) as char,
    }
}
