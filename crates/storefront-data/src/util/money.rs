use rust_decimal::Decimal;

/// Convert a price reported in minor currency units (cents) to major
/// units. `1999` becomes `19.99`.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Format a one-time purchase price for display.
///
/// Well-known currencies get their symbol; everything else falls back
/// to `"{amount} {code}"`. Always two decimal places.
pub fn format_price(amount: Decimal, currency: &str) -> String {
    match currency {
        "USD" => format!("${:.2}", amount),
        "EUR" => format!("\u{20ac}{:.2}", amount),
        "GBP" => format!("\u{a3}{:.2}", amount),
        other => format!("{:.2} {}", amount, other),
    }
}

/// Format a recurring membership price for display.
///
/// Same as [`format_price`] with a `/mo` marker so tiers are never
/// confused with one-time purchases.
pub fn format_recurring_price(amount: Decimal, currency: &str) -> String {
    format!("{}/mo", format_price(amount, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(1999), dec!(19.99));
        assert_eq!(from_minor_units(500), dec!(5.00));
        assert_eq!(from_minor_units(0), dec!(0.00));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_price(dec!(19.99), "USD"), "$19.99");
        assert_eq!(format_price(dec!(5), "USD"), "$5.00");
    }

    #[test]
    fn test_format_other_currency() {
        assert_eq!(format_price(dec!(12.5), "CAD"), "12.50 CAD");
    }

    #[test]
    fn test_format_recurring() {
        assert_eq!(format_recurring_price(dec!(5), "USD"), "$5.00/mo");
    }
}
