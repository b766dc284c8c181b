//! Validation helpers for DTOs.

use validator::ValidationError;

const MAX_KEY_NAME_LENGTH: usize = 16;

/// Validates a key name such as `Q`, `F5` or `Numpad7`.
///
/// # Examples
///
/// ```ignore
/// validate_key_name("Q")       // Ok
/// validate_key_name("Numpad7") // Ok
/// validate_key_name("")        // Err - empty
/// validate_key_name("Alt+Q")   // Err - modifiers are separate
/// ```
pub fn validate_key_name(key: &str) -> Result<(), ValidationError> {
    let key = key.trim();
    if key.is_empty() || key.len() > MAX_KEY_NAME_LENGTH {
        let mut err = ValidationError::new("key_length");
        err.message = Some(
            format!("Key name must be 1 to {MAX_KEY_NAME_LENGTH} characters (got {})", key.len())
                .into(),
        );
        return Err(err);
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("key_format");
        err.message = Some("Key name must contain only ASCII letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a TCP port given as a decimal string.
pub fn validate_port(port: &str) -> Result<(), ValidationError> {
    match port.parse::<u16>() {
        Ok(value) if value > 0 => Ok(()),
        _ => {
            let mut err = ValidationError::new("port");
            err.message = Some(format!("`{port}` is not a valid port").into());
            Err(err)
        }
    }
}
