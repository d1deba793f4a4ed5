//! Payment field validation

use std::fmt;

use smallvec::SmallVec;

use crate::checkout::PaymentDetails;

/// The individual inputs a payment form can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Credit card number.
    CardNumber,
    /// Name printed on the card.
    CardHolder,
    /// Card expiry in `MM/YY`.
    Expiry,
    /// Card security code.
    Cvv,
    /// Mobile-money phone number.
    PhoneNumber,
    /// Mobile-money account holder name.
    FullName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardNumber => "card number",
            Self::CardHolder => "cardholder name",
            Self::Expiry => "expiry",
            Self::Cvv => "CVV",
            Self::PhoneNumber => "phone number",
            Self::FullName => "full name",
        };

        f.write_str(name)
    }
}

/// A single rejected field with a message to show next to its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Which input was rejected.
    pub field: Field,

    /// What to render next to it.
    pub message: &'static str,
}

/// All rejections for one submission. A form never has more than a handful.
pub type FieldErrors = SmallVec<[FieldError; 4]>;

/// Validate a submission against the rules of its payment method.
///
/// Every field is checked and every failure collected, so the form can show
/// all errors at once; an empty result means the submission may proceed.
pub fn validate(details: &PaymentDetails) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match details {
        PaymentDetails::CreditCard {
            number,
            holder,
            expiry,
            cvv,
        } => {
            if !is_digits(&strip_spaces(number), 16..=19) {
                errors.push(FieldError {
                    field: Field::CardNumber,
                    message: "card number must be 16-19 digits",
                });
            }

            if holder.trim().is_empty() {
                errors.push(FieldError {
                    field: Field::CardHolder,
                    message: "cardholder name is required",
                });
            }

            if !is_valid_expiry(expiry) {
                errors.push(FieldError {
                    field: Field::Expiry,
                    message: "expiry must be MM/YY",
                });
            }

            if !is_digits(cvv, 3..=4) {
                errors.push(FieldError {
                    field: Field::Cvv,
                    message: "CVV must be 3-4 digits",
                });
            }
        }
        PaymentDetails::MobileMoney {
            phone, full_name, ..
        } => {
            if !is_digits(&strip_phone_formatting(phone), 10..=15) {
                errors.push(FieldError {
                    field: Field::PhoneNumber,
                    message: "phone number must be 10-15 digits",
                });
            }

            if full_name.trim().chars().count() < 3 {
                errors.push(FieldError {
                    field: Field::FullName,
                    message: "full name must be at least 3 characters",
                });
            }
        }
    }

    errors
}

/// Card numbers are formatted with spaces for display only.
fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Phone numbers may carry spaces and a single leading `+`.
fn strip_phone_formatting(value: &str) -> String {
    let stripped = strip_spaces(value);

    match stripped.strip_prefix('+') {
        Some(rest) => rest.to_owned(),
        None => stripped,
    }
}

fn is_digits(value: &str, length: std::ops::RangeInclusive<usize>) -> bool {
    length.contains(&value.chars().count()) && value.chars().all(|c| c.is_ascii_digit())
}

/// `MM/YY` with month 01-12.
fn is_valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };

    if !is_digits(month, 2..=2) || !is_digits(year, 2..=2) {
        return false;
    }

    matches!(month.parse::<u8>(), Ok(1..=12))
}
