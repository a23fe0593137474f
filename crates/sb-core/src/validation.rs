//! Form validation: required fields, password confirmation, and the
//! arithmetic human check shown on the submission and signup forms.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// "What is a + b?" with both operands in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanCheck {
    pub a: u8,
    pub b: u8,
}

impl HumanCheck {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            a: rng.gen_range(1..=10),
            b: rng.gen_range(1..=10),
        }
    }

    pub fn question(&self) -> String {
        format!("What is {} + {}?", self.a, self.b)
    }

    pub fn is_answered_by(&self, answer: &str) -> bool {
        answer
            .trim()
            .parse::<u16>()
            .is_ok_and(|n| n == u16::from(self.a) + u16::from(self.b))
    }

    pub fn verify(&self, answer: &str) -> Result<()> {
        if self.is_answered_by(answer) {
            Ok(())
        } else {
            Err(AppError::ValidationError("Incorrect CAPTCHA answer.".into()))
        }
    }
}

pub fn require_submission_fields(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Title and description cannot be empty.".into(),
        ));
    }
    Ok(())
}

pub fn require_matching_passwords(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(AppError::ValidationError("Passwords do not match.".into()));
    }
    Ok(())
}

pub fn require_non_empty(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_check_operands_in_range() {
        for _ in 0..100 {
            let check = HumanCheck::generate();
            assert!((1..=10).contains(&check.a));
            assert!((1..=10).contains(&check.b));
        }
    }

    #[test]
    fn test_human_check_answers() {
        let check = HumanCheck { a: 3, b: 4 };
        assert_eq!(check.question(), "What is 3 + 4?");
        assert!(check.verify(" 7 ").is_ok());
        assert!(check.verify("8").is_err());
        assert!(check.verify("seven").is_err());
        assert!(check.verify("").is_err());
    }

    #[test]
    fn test_submission_fields_required() {
        assert!(require_submission_fields("Title", "Body").is_ok());
        assert_eq!(
            require_submission_fields("   ", "Body"),
            Err(AppError::ValidationError("Title and description cannot be empty.".into()))
        );
        assert!(require_submission_fields("Title", "").is_err());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(require_matching_passwords("abc", "abc").is_ok());
        assert!(require_matching_passwords("abc", "abd").is_err());
    }
}
