use colored::Colorize;
use inquire::Text;

use crate::BACK_OPTION;
use crate::error::AppError;

/// Maximum length for a profile name
const MAX_NAME_LENGTH: usize = 30;
/// Maximum length for a git username
const MAX_USERNAME_LENGTH: usize = 30;
/// Maximum length for a git email address
const MAX_EMAIL_LENGTH: usize = 100;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

// Validate input helper functions

/// Validates a profile name; uniqueness is the store's job, shape is ours
pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::Validation("profile name cannot be empty".to_string()))
    } else if name.len() > MAX_NAME_LENGTH {
        Err(AppError::Validation(format!(
            "profile name too long, max {MAX_NAME_LENGTH} characters"
        )))
    } else if name == BACK_OPTION {
        Err(AppError::Validation(format!("profile name cannot be '{BACK_OPTION}'")))
    } else {
        Ok(())
    }
}

/// Validates a git username
pub fn validate_username(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::Validation("username cannot be empty".to_string()))
    } else if name.len() > MAX_USERNAME_LENGTH {
        Err(AppError::Validation(format!(
            "username too long, max {MAX_USERNAME_LENGTH} characters"
        )))
    } else {
        Ok(())
    }
}

/// Validates a git email. Emails are stored verbatim, so only emptiness and
/// length are checked, never RFC syntax.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::Validation("email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::Validation(format!(
            "email too long, max {MAX_EMAIL_LENGTH} characters"
        )))
    } else {
        Ok(())
    }
}
