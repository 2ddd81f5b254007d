//! # Validation Module
//!
//! Checkout input validation. Everything here runs before the first
//! network call; a failure means nothing was sent to the backend.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Register form                                                 │
//! │  └── Immediate feedback while typing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Cart not empty                                                     │
//! │  ├── Phone present and plausible                                        │
//! │  └── Email present (and plausible) iff a receipt is requested           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Stock, customer records, authoritative totals                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that the cart has something to sell.
pub fn validate_cart(cart: &Cart) -> ValidationResult<()> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Must not be blank
/// - Only digits, spaces, `+` and `-`
/// - At least one digit
///
/// ## Returns
/// The trimmed phone number.
///
/// ## Example
/// ```rust
/// use torque_core::validation::validate_phone;
///
/// assert_eq!(validate_phone(" 0712345678 ").unwrap(), "0712345678");
/// assert!(validate_phone("   ").is_err());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "customer phone".to_string(),
        });
    }

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-');
    if !allowed || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "customer phone".to_string(),
            reason: "must contain digits, spaces, '+' or '-' only".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Validates an email address loosely: one `@` with text on both sides
/// and a dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "receipt email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "receipt email".to_string(),
        reason: "expected name@domain".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(email.to_string())
}

/// Resolves the receipt email: required when a receipt is requested,
/// ignored otherwise.
pub fn validate_receipt(requested: bool, email: Option<&str>) -> ValidationResult<Option<String>> {
    if !requested {
        return Ok(None);
    }

    match email {
        Some(email) => validate_email(email).map(Some),
        None => Err(ValidationError::Required {
            field: "receipt email".to_string(),
        }),
    }
}

/// Validates a payment amount.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductRef;

    #[test]
    fn test_validate_cart() {
        let mut cart = Cart::new();
        assert_eq!(validate_cart(&cart), Err(ValidationError::EmptyCart));

        cart.add_line(
            &ProductRef::new("A", "Brake pads"),
            Money::from_cents(100),
            Money::from_cents(100),
            1,
        )
        .unwrap();
        assert!(validate_cart(&cart).is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0712345678").is_ok());
        assert!(validate_phone("+254 712-345-678").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
        assert!(validate_phone("+ -").is_err());
        assert!(validate_phone("07123abc").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@garage.co.ke").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@garage.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a b@garage.com").is_err());
    }

    #[test]
    fn test_validate_receipt() {
        assert_eq!(validate_receipt(false, None), Ok(None));
        assert_eq!(validate_receipt(false, Some("not an email")), Ok(None));
        assert!(validate_receipt(true, None).is_err());
        assert!(validate_receipt(true, Some("  ")).is_err());
        assert_eq!(
            validate_receipt(true, Some(" owner@garage.com ")),
            Ok(Some("owner@garage.com".to_string()))
        );
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }
}
