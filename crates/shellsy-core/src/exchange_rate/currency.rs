use super::ExchangeRateError;
use std::fmt;
use std::str::FromStr;

/// ISO 4217-style code: three ASCII letters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = ExchangeRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(ExchangeRateError::InvalidCurrency(s.to_string()))
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case() {
        let c: CurrencyCode = "usd".parse().unwrap();
        assert_eq!(c.as_str(), "USD");
        let c: CurrencyCode = " eUr ".parse().unwrap();
        assert_eq!(c.to_string(), "EUR");
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in ["", "US", "USDX", "U$D", "12A", "ÉUR"] {
            assert_eq!(
                bad.parse::<CurrencyCode>(),
                Err(ExchangeRateError::InvalidCurrency(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
