//! The conversion engine: request validation and the rate arithmetic.

use chrono::Local;
use std::fmt;
use thiserror::Error;

use crate::rates::RateMap;

/// Failure modes of a conversion. Validation variants are produced before
/// any network call is made.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Enter a valid amount greater than zero")]
    InvalidAmount,
    #[error("Select both a source and a target currency")]
    MissingCurrency,
    #[error("No rate published for {0}")]
    UnknownCurrency(String),
    #[error("Error fetching conversion rates")]
    Rate(#[source] anyhow::Error),
}

impl ConvertError {
    /// True for failures detected by input validation alone.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::InvalidAmount | ConvertError::MissingCurrency
        )
    }
}

/// A validated request to convert `amount` of `from` into `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Parses raw user input. The amount must be a finite number greater
    /// than zero; both codes must be non-empty and are normalized to upper
    /// case.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConvertError> {
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| ConvertError::InvalidAmount)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConvertError::InvalidAmount);
        }

        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();
        if from.is_empty() || to.is_empty() {
            return Err(ConvertError::MissingCurrency);
        }

        Ok(ConversionRequest { amount, from, to })
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub converted: f64,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ➡️ {:.2} {}",
            self.amount, self.from, self.converted, self.to
        )
    }
}

impl Conversion {
    /// Stamps this conversion with the local time, producing the string
    /// that goes into the persisted history.
    pub fn to_history_entry(&self) -> String {
        format!("{}: {}", Local::now().format("%H:%M:%S"), self)
    }
}

/// Converts the requested amount with the given rate snapshot.
///
/// Pure; recording history and drawing the chart is the caller's job. A
/// target code absent from the snapshot is an error, never a NaN result.
pub fn convert(request: &ConversionRequest, rates: &RateMap) -> Result<Conversion, ConvertError> {
    let rate = *rates
        .get(&request.to)
        .ok_or_else(|| ConvertError::UnknownCurrency(request.to.clone()))?;

    Ok(Conversion {
        amount: request.amount,
        from: request.from.clone(),
        to: request.to.clone(),
        rate,
        converted: round2(rate * request.amount),
    })
}

/// Half-up rounding to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn rates() -> RateMap {
        HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.92),
            ("INR".to_string(), 83.12),
        ])
    }

    #[test]
    fn test_successful_conversion() {
        let request = ConversionRequest::parse("100", "usd", "eur").unwrap();
        let conversion = convert(&request, &rates()).unwrap();

        assert_eq!(conversion.rate, 0.92);
        assert_eq!(conversion.converted, 92.0);
        assert_eq!(conversion.to_string(), "100 USD ➡️ 92.00 EUR");
    }

    #[test]
    fn test_codes_are_normalized() {
        let request = ConversionRequest::parse("1.5", " usd ", "inr").unwrap();
        assert_eq!(request.from, "USD");
        assert_eq!(request.to, "INR");
    }

    #[test]
    fn test_rounding_is_half_up() {
        let request = ConversionRequest::parse("1", "USD", "EUR").unwrap();
        let rates = HashMap::from([("EUR".to_string(), 0.125)]);
        let conversion = convert(&request, &rates).unwrap();
        assert_eq!(conversion.converted, 0.13);
        assert_eq!(conversion.to_string(), "1 USD ➡️ 0.13 EUR");
    }

    #[test]
    fn test_invalid_amounts_are_rejected() {
        for amount in ["0", "-5", "abc", "", "NaN", "inf"] {
            let result = ConversionRequest::parse(amount, "USD", "EUR");
            assert!(
                matches!(result, Err(ConvertError::InvalidAmount)),
                "amount {amount:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_missing_currencies_are_rejected() {
        assert!(matches!(
            ConversionRequest::parse("10", "", "EUR"),
            Err(ConvertError::MissingCurrency)
        ));
        assert!(matches!(
            ConversionRequest::parse("10", "USD", "  "),
            Err(ConvertError::MissingCurrency)
        ));
    }

    #[test]
    fn test_validation_errors_are_flagged() {
        assert!(ConvertError::InvalidAmount.is_validation());
        assert!(ConvertError::MissingCurrency.is_validation());
        assert!(!ConvertError::UnknownCurrency("XXX".to_string()).is_validation());
    }

    #[test]
    fn test_unknown_target_currency_is_an_error() {
        let request = ConversionRequest::parse("10", "USD", "XXX").unwrap();
        let result = convert(&request, &rates());
        match result {
            Err(ConvertError::UnknownCurrency(code)) => assert_eq!(code, "XXX"),
            other => panic!("expected UnknownCurrency, got {other:?}"),
        }
    }

    #[test]
    fn test_history_entry_carries_the_display_form() {
        let conversion = Conversion {
            amount: 100.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
            rate: 0.92,
            converted: 92.0,
        };
        let entry = conversion.to_history_entry();
        assert!(entry.ends_with("100 USD ➡️ 92.00 EUR"));
        // "HH:MM:SS: " prefix
        assert_eq!(entry.as_bytes()[8], b':');
    }
}
