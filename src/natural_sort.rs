//! Natural (alphanumeric) ordering for image filenames.
//!
//! Display names are compared by splitting them into alternating digit and
//! non-digit runs. Digit runs compare by numeric value, non-digit runs as
//! plain text, so `img2.png` sorts before `img10.png`.

use std::cmp::Ordering;

/// Compare two display names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut rest_a = a;
    let mut rest_b = b;

    loop {
        match (split_run(rest_a), split_run(rest_b)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((digits_a, run_a, tail_a)), Some((digits_b, run_b, tail_b))) => {
                let ord = if digits_a && digits_b {
                    cmp_digit_runs(run_a, run_b)
                } else {
                    run_a.cmp(run_b)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
                rest_a = tail_a;
                rest_b = tail_b;
            }
        }
    }
}

/// Split off the leading run of digits or non-digits.
/// Returns (is_digit_run, run, remainder), or None for an empty string.
fn split_run(s: &str) -> Option<(bool, &str, &str)> {
    let first = s.chars().next()?;
    let digits = first.is_ascii_digit();
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() != digits)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some((digits, &s[..end], &s[end..]))
}

/// Compare two digit runs by numeric value without parsing into an integer,
/// so arbitrarily long runs cannot overflow. Leading zeros break ties in
/// favor of the shorter run to keep the ordering total.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let trimmed_a = a.trim_start_matches('0');
    let trimmed_b = b.trim_start_matches('0');
    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| trimmed_a.cmp(trimmed_b))
        .then_with(|| a.len().cmp(&b.len()))
}
