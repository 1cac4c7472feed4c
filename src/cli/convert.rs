use super::ui::{self, StyleType};
use crate::bot::format::{format_amount, format_fetched_at, format_money};
use crate::core::{ConversionEngine, ConversionResult};
use anyhow::{Result, bail};

/// Renders a conversion for the terminal.
pub fn display_result(from: &str, to: &str, amount: f64, result: &ConversionResult) -> String {
    match result {
        ConversionResult::Success(conversion) => format!(
            "{} {} = {} {}\n{}",
            ui::style_text(&format_amount(amount), StyleType::Title),
            from,
            ui::style_text(&format_money(conversion.result), StyleType::Value),
            to,
            ui::style_text(
                &format!(
                    "rate {} fetched {} JST",
                    conversion.rate,
                    format_fetched_at(&conversion.fetched_at)
                ),
                StyleType::Subtle
            ),
        ),
        ConversionResult::Failure { message } => ui::style_text(message, StyleType::Error),
    }
}

/// One-shot conversion using the engine in-process.
pub async fn run_convert(
    engine: &ConversionEngine,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<()> {
    let result = engine.convert(from, to, amount).await;
    println!("{}", display_result(from, to, amount, &result));

    if let ConversionResult::Failure { message } = result {
        bail!("Conversion failed: {message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Conversion;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_display_success() {
        console::set_colors_enabled(false);
        let result = ConversionResult::Success(Conversion {
            result: 15025.0,
            rate: 150.25,
            fetched_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        });

        let text = display_result("USD", "JPY", 100.0, &result);
        assert_eq!(
            text,
            "100 USD = 15,025.00 JPY\nrate 150.25 fetched 2024-01-02 12:04 JST"
        );
    }

    #[test]
    fn test_display_failure() {
        console::set_colors_enabled(false);
        let result = ConversionResult::Failure {
            message: "Unsupported currency pair: EUR/USD".to_string(),
        };
        assert_eq!(
            display_result("EUR", "USD", 1.0, &result),
            "Unsupported currency pair: EUR/USD"
        );
    }
}
