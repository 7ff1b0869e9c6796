//! Payment methods
//!
//! Payment is settled at delivery (cash) or through one of the two local
//! mobile wallets. The method is recorded on the order; no payment is
//! captured by this side of the system.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the buyer intends to settle the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,

    /// Flooz mobile wallet (Moov).
    Flooz,

    /// TMoney mobile wallet (Togocom).
    #[serde(rename = "tmoney")]
    TMoney,
}

impl PaymentMethod {
    /// Human-readable label, as printed on receipts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Espèces à la livraison",
            Self::Flooz => "Flooz",
            Self::TMoney => "TMoney",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Error for unrecognized payment method names.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method '{0}'")]
pub struct UnknownPaymentMethod(String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" | "especes" | "espèces" => Ok(Self::Cash),
            "flooz" => Ok(Self::Flooz),
            "tmoney" | "t-money" => Ok(Self::TMoney),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn wire_codes_are_stable() -> TestResult {
        assert_eq!(serde_json::to_value(PaymentMethod::Cash)?, "cash");
        assert_eq!(serde_json::to_value(PaymentMethod::Flooz)?, "flooz");
        assert_eq!(serde_json::to_value(PaymentMethod::TMoney)?, "tmoney");

        Ok(())
    }

    #[test]
    fn parses_common_spellings() -> TestResult {
        assert_eq!("cash".parse::<PaymentMethod>()?, PaymentMethod::Cash);
        assert_eq!("Espèces".parse::<PaymentMethod>()?, PaymentMethod::Cash);
        assert_eq!("FLOOZ".parse::<PaymentMethod>()?, PaymentMethod::Flooz);
        assert_eq!("t-money".parse::<PaymentMethod>()?, PaymentMethod::TMoney);

        Ok(())
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = "cheque".parse::<PaymentMethod>();

        assert_eq!(result, Err(UnknownPaymentMethod("cheque".to_string())));
    }
}
