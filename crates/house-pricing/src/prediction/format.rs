//! Display formatting for rupee amounts using lakh/crore units.

pub const LAKH: u64 = 100_000;
pub const CRORE: u64 = 10_000_000;

const RUPEE: char = '₹';

/// Render a price the way the estimate card shows it.
///
/// One crore and above reads `₹X.Y Cr` (or `₹N Cr` when the amount is a whole
/// number of crores), one lakh and above reads `₹N Lakh`, anything smaller is
/// written out with `en-IN` digit grouping.
pub fn format_price(price: u64) -> String {
    if price >= CRORE {
        let crores = price as f64 / CRORE as f64;
        if price % CRORE > 0 {
            format!("{RUPEE}{} Cr", one_decimal(crores))
        } else {
            format!("{RUPEE}{} Cr", price / CRORE)
        }
    } else if price >= LAKH {
        let lakhs = price as f64 / LAKH as f64;
        format!("{RUPEE}{} Lakh", lakhs.round() as u64)
    } else {
        format!("{RUPEE}{}", group_indian(price))
    }
}

/// Digits grouped as thousands first, then pairs: `12,34,567`.
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// One decimal place from the exact binary value, halves rounding up.
fn one_decimal(value: f64) -> String {
    let exact = format!("{value:.60}");
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{exact}.0");
    };

    let whole: u64 = whole.parse().unwrap_or_default();
    let digits = fraction.as_bytes();
    let tenths = digits.first().map_or(0, |digit| u64::from(digit - b'0'));
    let round_up = digits.get(1).is_some_and(|digit| *digit >= b'5');

    let scaled = whole * 10 + tenths + u64::from(round_up);
    format!("{}.{}", scaled / 10, scaled % 10)
}
