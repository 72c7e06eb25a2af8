//! Validation rules for user input.
//!
//! Patterns are compiled once when [`UserRules`] is built and the value is
//! passed to the service that needs it.

use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::constants::{
    MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
    OBJECT_ID_HEX_LENGTH, PASSWORD_SPECIAL_CHARS,
};
use crate::error::{DomainError, DomainResult};

// Letters and spaces, at least one letter
const NAME_PATTERN: &str = r"^[\p{L} ]*\p{L}[\p{L} ]*$";

/// Precompiled user validation rules.
#[derive(Debug, Clone)]
pub struct UserRules {
    name: Regex,
    object_id: Regex,
    special_chars: String,
}

impl UserRules {
    /// Compile the rule set.
    pub fn new() -> DomainResult<Self> {
        let object_id_pattern = format!("^[0-9a-fA-F]{{{}}}$", OBJECT_ID_HEX_LENGTH);

        Ok(Self {
            name: compile(NAME_PATTERN)?,
            object_id: compile(&object_id_pattern)?,
            special_chars: PASSWORD_SPECIAL_CHARS.to_string(),
        })
    }

    /// Run the field rules declared on an input type (email, age, address).
    pub fn check_fields<T: Validate>(&self, input: &T) -> DomainResult<()> {
        input
            .validate()
            .map_err(|e| DomainError::invalid_input(validation_message(&e)))
    }

    /// Check that `id` has the storage identifier shape (24 hex characters).
    pub fn check_id(&self, id: &str) -> DomainResult<()> {
        if self.object_id.is_match(id) {
            Ok(())
        } else {
            Err(DomainError::invalid_identifier(id))
        }
    }

    /// Check a display name: 3 to 50 characters, letters and whitespace only.
    pub fn check_name(&self, name: &str) -> DomainResult<()> {
        let length = name.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) || !self.name.is_match(name) {
            return Err(DomainError::invalid_input(format!(
                "Invalid user name: must be {} to {} characters, letters and spaces only",
                MIN_NAME_LENGTH, MAX_NAME_LENGTH
            )));
        }
        Ok(())
    }

    /// Check password length (8 to 128 characters) then strength.
    pub fn check_password(&self, password: &str) -> DomainResult<()> {
        let length = password.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(DomainError::invalid_input(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }
        if !self.is_strong_password(password) {
            return Err(DomainError::WeakPassword);
        }
        Ok(())
    }

    /// At least 8 characters with an uppercase letter, a lowercase letter,
    /// a digit and one of `!@#$%^&*`.
    pub fn is_strong_password(&self, password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LENGTH
            && password.chars().any(char::is_uppercase)
            && password.chars().any(char::is_lowercase)
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| self.special_chars.contains(c))
    }
}

/// Join field rule violations into one message, sorted for a stable order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn compile(pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| DomainError::internal(format!("Invalid validation pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> UserRules {
        UserRules::new().unwrap()
    }

    #[test]
    fn test_valid_object_id() {
        assert!(rules().check_id("507f1f77bcf86cd799439011").is_ok());
        assert!(rules().check_id("507F1F77BCF86CD799439011").is_ok());
    }

    #[test]
    fn test_malformed_object_ids() {
        let rules = rules();
        for id in [
            "",
            "123",
            "507f1f77bcf86cd79943901",
            "507f1f77bcf86cd7994390111",
            "507f1f77bcf86cd79943901g",
            " 507f1f77bcf86cd79943901",
        ] {
            assert_eq!(
                rules.check_id(id),
                Err(DomainError::invalid_identifier(id)),
                "id {:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_names() {
        let rules = rules();
        assert!(rules.check_name("Alice").is_ok());
        assert!(rules.check_name("John Doe").is_ok());
        assert!(rules.check_name("Zoë").is_ok());
        assert!(rules.check_name(&"a".repeat(50)).is_ok());

        assert!(rules.check_name("Al").is_err());
        assert!(rules.check_name(&"a".repeat(51)).is_err());
        assert!(rules.check_name("John3").is_err());
        assert!(rules.check_name("John_Doe").is_err());
    }

    #[test]
    fn test_names_need_a_letter_and_plain_spaces() {
        let rules = rules();
        assert!(rules.check_name("   ").is_err());
        assert!(rules.check_name("John\tDoe").is_err());
        assert!(rules.check_name("John\nDoe").is_err());
        assert!(rules.check_name(" Ann").is_ok());
    }

    #[test]
    fn test_field_rules() {
        use crate::{NewUser, UserPatch};

        let rules = rules();
        let draft = NewUser {
            name: "Alice".to_string(),
            age: Some(0),
            email: Some("not-an-email".to_string()),
            password: "P@ssword123".to_string(),
            address: Some("ab".to_string()),
        };
        match rules.check_fields(&draft) {
            Err(DomainError::InvalidInput(msg)) => assert_eq!(
                msg,
                "Address must be at least 5 characters, Age must be at least 1, \
                 Invalid email address"
            ),
            other => panic!("unexpected {:?}", other),
        }

        let patch = UserPatch {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(rules.check_fields(&patch).is_err());
        assert!(rules.check_fields(&UserPatch::default()).is_ok());
    }

    #[test]
    fn test_password_length_is_invalid_input() {
        let rules = rules();
        assert!(matches!(
            rules.check_password("P@ss1"),
            Err(DomainError::InvalidInput(_))
        ));

        let too_long = format!("P@ss1{}", "a".repeat(124));
        assert!(matches!(
            rules.check_password(&too_long),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_weak_passwords() {
        let rules = rules();
        for password in [
            "password123!", // no uppercase
            "PASSWORD123!", // no lowercase
            "Password!!!!", // no digit
            "Password1234", // no special
        ] {
            assert_eq!(
                rules.check_password(password),
                Err(DomainError::WeakPassword),
                "{:?} should be weak",
                password
            );
        }
    }

    #[test]
    fn test_strong_passwords() {
        let rules = rules();
        assert!(rules.check_password("P@ssword123").is_ok());
        assert!(rules.check_password("Aa1&aaaa").is_ok());
        assert!(rules.is_strong_password("P@sswoooord7"));
    }
}
