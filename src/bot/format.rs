//! Reply text for chat commands.

use chrono::{DateTime, FixedOffset, Utc};

use crate::core::conversion::ConversionPair;
use crate::core::{Conversion, ConversionResult};

/// Shown when the conversion API itself could not be reached or understood.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "エラー: API の呼び出しに失敗しました";

const ERROR_PREFIX: &str = "エラー";
const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;
const DISPLAY_ZONE_LABEL: &str = "JST";

/// Add thousands separators to the integer part of a plain decimal string.
fn add_thousands_separator(s: &str) -> String {
    let (sign, unsigned) = s.strip_prefix('-').map_or(("", s), |rest| ("-", rest));
    let (integer_part, decimal_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, d)| (i, Some(d)));

    let chars: Vec<char> = integer_part.chars().rev().collect();
    let grouped: String = chars
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(",")
        .chars()
        .rev()
        .collect();

    match decimal_part {
        Some(decimal) => format!("{sign}{grouped}.{decimal}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Grouped, with no trailing zeros and no exponent: `1234.5` -> `1,234.5`.
pub fn format_amount(amount: f64) -> String {
    add_thousands_separator(&amount.to_string())
}

/// Grouped with exactly two decimals: `15025.0` -> `15,025.00`.
pub fn format_money(value: f64) -> String {
    add_thousands_separator(&format!("{value:.2}"))
}

fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// `YYYY-MM-DD HH:MM` in UTC+9.
pub fn format_fetched_at(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&display_offset())
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn format_success(pair: ConversionPair, amount: f64, conversion: &Conversion) -> String {
    format!(
        "{} {} = {} {}\n（レート: {}、取得時刻: {} {}）",
        format_amount(amount),
        pair.from_currency(),
        format_money(conversion.result),
        pair.to_currency(),
        conversion.rate,
        format_fetched_at(&conversion.fetched_at),
        DISPLAY_ZONE_LABEL,
    )
}

pub fn format_failure(message: &str) -> String {
    format!("{ERROR_PREFIX}: {message}")
}

pub fn render_result(pair: ConversionPair, amount: f64, result: &ConversionResult) -> String {
    match result {
        ConversionResult::Success(conversion) => format_success(pair, amount, conversion),
        ConversionResult::Failure { message } => format_failure(message),
    }
}
