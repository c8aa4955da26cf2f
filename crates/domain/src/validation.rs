// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation for admin-supplied service and window data.

use crate::error::DomainError;

/// Maximum length of a display-number prefix.
const MAX_PREFIX_LEN: usize = 3;

/// Validates a service name.
///
/// # Errors
///
/// Returns an error if the name is empty or whitespace-only.
pub fn validate_service_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidServiceName(
            "name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a display-number prefix.
///
/// Prefixes are short alphabetic codes ("C", "REG"); case is
/// normalized elsewhere, so both cases are accepted here.
///
/// # Errors
///
/// Returns an error if the prefix is empty, too long, or contains
/// non-alphabetic characters.
pub fn validate_prefix(prefix: &str) -> Result<(), DomainError> {
    if prefix.is_empty() {
        return Err(DomainError::InvalidPrefix(
            "prefix must not be empty when set".to_string(),
        ));
    }
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(DomainError::InvalidPrefix(format!(
            "prefix must be at most {MAX_PREFIX_LEN} characters"
        )));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidPrefix(
            "prefix must contain only letters".to_string(),
        ));
    }
    Ok(())
}

/// Validates an average service time.
///
/// # Errors
///
/// Returns an error if the value is zero.
pub const fn validate_average_service_time(minutes: u32) -> Result<(), DomainError> {
    if minutes == 0 {
        return Err(DomainError::InvalidAverageServiceTime { minutes });
    }
    Ok(())
}

/// Validates a window number.
///
/// # Errors
///
/// Returns an error if the number is zero.
pub const fn validate_window_number(number: u32) -> Result<(), DomainError> {
    if number == 0 {
        return Err(DomainError::InvalidWindowNumber { number });
    }
    Ok(())
}
