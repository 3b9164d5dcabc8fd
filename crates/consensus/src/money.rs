//! Monetary amounts in base units.

pub type Amount = i64;

pub const COIN: Amount = 100_000_000;

/// Formats an amount with up to eight decimals, keeping at least two.
pub fn format_money(amount: Amount) -> String {
    let abs = amount.unsigned_abs();
    let coin = COIN as u64;
    let whole = abs / coin;
    let frac = abs % coin;

    let mut fraction = format!("{frac:08}");
    while fraction.len() > 2 && fraction.ends_with('0') {
        fraction.pop();
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{whole}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::{format_money, COIN};

    #[test]
    fn trims_trailing_zeros_to_two_places() {
        assert_eq!(format_money(0), "0.00");
        assert_eq!(format_money(150 * COIN), "150.00");
        assert_eq!(format_money(COIN / 2), "0.50");
        assert_eq!(format_money(123_456_789), "1.23456789");
        assert_eq!(format_money(-COIN - 10_000_000), "-1.10");
    }
}
