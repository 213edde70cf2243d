//! Number formatting for human-readable quote display.
//!
//! Prices get precision based on magnitude (equities, FX pairs and small-cap
//! crypto all render sensibly), changes carry an explicit sign, and volumes
//! are abbreviated with K/M/B/T suffixes.

use rust_decimal::prelude::*;

/// Adds thousands separators to the integer part of an already-formatted number.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn price_decimals(value: &Decimal) -> u32 {
    let abs = value.abs();
    if abs >= Decimal::ONE_HUNDRED {
        2
    } else if abs >= Decimal::ONE {
        4
    } else {
        6
    }
}

/// Format a quote price. Keeps at least two decimals, trims the rest.
pub fn price(value: &Decimal) -> String {
    let decimals = price_decimals(value);
    let mut s = format!("{:.*}", decimals as usize, value.round_dp(decimals));
    if let Some(dot) = s.find('.') {
        while s.len() > dot + 3 && s.ends_with('0') {
            s.pop();
        }
    }
    group_thousands(&s)
}

/// Format an absolute change with an explicit sign: `+1.25`, `-0.50`, `0.00`.
pub fn signed(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    let body = group_thousands(&format!("{:.2}", rounded.abs()));
    if rounded.is_zero() {
        body
    } else if rounded.is_sign_negative() {
        format!("-{}", body)
    } else {
        format!("+{}", body)
    }
}

/// Format a percentage change: `+1.25%`, `-0.40%`.
pub fn percent(value: &Decimal) -> String {
    format!("{}%", signed(value))
}

/// Abbreviate a `Decimal` with K/M/B/T suffixes (volumes).
pub fn abbr(amount: &Decimal, digits: usize) -> String {
    const SUFFIXES: [(i64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let abs_amount = amount.abs();

    for (threshold, suffix) in SUFFIXES {
        let threshold = Decimal::from(threshold);
        if abs_amount >= threshold {
            return format!(
                "{}{:.precision$}{}",
                sign,
                abs_amount / threshold,
                suffix,
                precision = digits
            );
        }
    }
    format!("{}{:.precision$}", sign, abs_amount, precision = digits)
}
