//! Delivery form
//!
//! Buyer identity and drop-off details collected at checkout. The raw form is
//! free text; [`DeliveryForm::validate`] parses it into a [`DeliveryInfo`]
//! whose phone number is already normalized, so downstream code never sees a
//! half-checked buyer. The form lives only for the checkout attempt and is
//! never persisted.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digits of a local subscriber number.
pub const PHONE_DIGITS: usize = 8;

/// Phone validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    /// A character other than a digit or separator was found.
    #[error("phone number may contain only digits")]
    NonDigit,

    /// The digit count after normalization is wrong.
    #[error("phone number must have exactly {PHONE_DIGITS} digits, got {0}")]
    WrongLength(usize),
}

/// A local phone number normalized to exactly eight digits.
///
/// Separators (spaces, dots, dashes, parentheses) and a leading `+228`,
/// `00228` or `228` country prefix are stripped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses and normalizes a raw phone input.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] when the input holds non-digit characters or
    /// does not normalize to exactly eight digits.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '.' | '-' | '(' | ')'))
            .collect();

        let local = strip_country_prefix(&compact);

        if !local.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if local.len() != PHONE_DIGITS {
            return Err(PhoneError::WrongLength(local.len()));
        }

        Ok(Self(local.to_string()))
    }

    /// The normalized eight digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Strips a Togo country prefix, but only when eight digits remain: a local
/// number may itself start with the `228` digits.
fn strip_country_prefix(compact: &str) -> &str {
    for prefix in ["+228", "00228", "228"] {
        if let Some(rest) = compact.strip_prefix(prefix) {
            if rest.len() == PHONE_DIGITS {
                return rest;
            }
        }
    }

    compact
}

/// Raw delivery form state, as typed by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryForm {
    /// Buyer family name.
    pub name: String,

    /// Buyer given name.
    pub surname: String,

    /// Raw phone input; normalized at validation.
    pub phone: String,

    /// Delivery neighborhood.
    pub neighborhood: String,

    /// Optional street address or landmark.
    pub address: String,

    /// Optional free-text note for the deliverer.
    pub notes: String,
}

/// Validation errors for the delivery form, one per failing field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryFormError {
    /// Name is empty or whitespace.
    #[error("name is required")]
    MissingName,

    /// Surname is empty or whitespace.
    #[error("surname is required")]
    MissingSurname,

    /// Neighborhood is empty or whitespace.
    #[error("delivery neighborhood is required")]
    MissingNeighborhood,

    /// Phone did not normalize to eight digits.
    #[error(transparent)]
    Phone(#[from] PhoneError),
}

impl DeliveryForm {
    /// Parses the raw form into validated buyer info.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a [`DeliveryFormError`].
    pub fn validate(&self) -> Result<DeliveryInfo, DeliveryFormError> {
        let name = required(&self.name).ok_or(DeliveryFormError::MissingName)?;
        let surname = required(&self.surname).ok_or(DeliveryFormError::MissingSurname)?;
        let phone = PhoneNumber::parse(&self.phone)?;
        let neighborhood =
            required(&self.neighborhood).ok_or(DeliveryFormError::MissingNeighborhood)?;

        Ok(DeliveryInfo {
            name,
            surname,
            phone,
            neighborhood,
            address: required(&self.address),
            notes: required(&self.notes),
        })
    }

    /// Whether the form currently passes validation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

fn required(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validated buyer identity and drop-off details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryInfo {
    name: String,
    surname: String,
    phone: PhoneNumber,
    neighborhood: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl DeliveryInfo {
    /// Buyer family name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Buyer given name.
    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Normalized phone number.
    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Delivery neighborhood.
    #[must_use]
    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    /// Street address or landmark, if given.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Deliverer note, if given.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn filled_form() -> DeliveryForm {
        DeliveryForm {
            name: "Abalo".to_string(),
            surname: "Essi".to_string(),
            phone: "90112233".to_string(),
            neighborhood: "Tokoin".to_string(),
            address: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn plain_eight_digit_phone_parses() -> TestResult {
        let phone = PhoneNumber::parse("90112233")?;

        assert_eq!(phone.as_str(), "90112233");

        Ok(())
    }

    #[test]
    fn separators_and_country_prefix_are_stripped() -> TestResult {
        assert_eq!(PhoneNumber::parse("+228 90 11 22 33")?.as_str(), "90112233");
        assert_eq!(PhoneNumber::parse("00228-90112233")?.as_str(), "90112233");
        assert_eq!(PhoneNumber::parse("228 90.11.22.33")?.as_str(), "90112233");

        Ok(())
    }

    #[test]
    fn local_number_starting_with_228_is_kept_as_is() -> TestResult {
        let phone = PhoneNumber::parse("22890112")?;

        assert_eq!(phone.as_str(), "22890112");

        Ok(())
    }

    #[test]
    fn short_and_long_inputs_are_rejected() {
        assert_eq!(PhoneNumber::parse("123"), Err(PhoneError::WrongLength(3)));
        assert_eq!(
            PhoneNumber::parse("123456789"),
            Err(PhoneError::WrongLength(9))
        );
    }

    #[test]
    fn letters_are_rejected() {
        assert_eq!(PhoneNumber::parse("9011223a"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn complete_form_validates() -> TestResult {
        let info = filled_form().validate()?;

        assert_eq!(info.name(), "Abalo");
        assert_eq!(info.surname(), "Essi");
        assert_eq!(info.phone().as_str(), "90112233");
        assert_eq!(info.neighborhood(), "Tokoin");
        assert!(info.address().is_none());
        assert!(info.notes().is_none());

        Ok(())
    }

    #[test]
    fn optional_fields_are_trimmed_into_some() -> TestResult {
        let mut form = filled_form();
        form.address = "  Rue des Hydrocarbures  ".to_string();
        form.notes = "sonner au portail".to_string();

        let info = form.validate()?;

        assert_eq!(info.address(), Some("Rue des Hydrocarbures"));
        assert_eq!(info.notes(), Some("sonner au portail"));

        Ok(())
    }

    #[test]
    fn whitespace_only_required_fields_fail() {
        let mut form = filled_form();
        form.name = "   ".to_string();

        assert_eq!(form.validate(), Err(DeliveryFormError::MissingName));

        let mut form = filled_form();
        form.surname = String::new();

        assert_eq!(form.validate(), Err(DeliveryFormError::MissingSurname));

        let mut form = filled_form();
        form.neighborhood = "\t".to_string();

        assert_eq!(form.validate(), Err(DeliveryFormError::MissingNeighborhood));
    }

    #[test]
    fn bad_phone_closes_the_form() {
        let mut form = filled_form();
        form.phone = "123".to_string();

        assert!(!form.is_complete());

        form.phone = "123456789".to_string();
        assert!(!form.is_complete());

        form.phone = "90112233".to_string();
        assert!(form.is_complete());
    }

    #[test]
    fn buyer_serializes_without_empty_optionals() -> TestResult {
        let info = filled_form().validate()?;
        let json = serde_json::to_value(&info)?;

        assert_eq!(json["name"], "Abalo");
        assert_eq!(json["phone"], "90112233");
        assert!(json.get("address").is_none());
        assert!(json.get("notes").is_none());

        Ok(())
    }
}
