//! Form checks run before any network call.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::services::{RegisterRequest, UpdateProfileRequest};

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));
static OTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4,6}$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter mobile number and password")]
    MissingCredentials,
    #[error("Please fill all fields")]
    MissingFields,
    #[error("Please enter a valid 10-digit mobile number")]
    InvalidMobile,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter the OTP sent to your mobile")]
    InvalidOtp,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please login to continue")]
    NotLoggedIn,
}

pub fn mobile(value: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMobile)
    }
}

pub fn login(mobile_no: &str, password: &str) -> Result<(), ValidationError> {
    if mobile_no.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    mobile(mobile_no)
}

pub fn registration(request: &RegisterRequest) -> Result<(), ValidationError> {
    let required = [
        &request.name,
        &request.mobile,
        &request.password,
        &request.email,
        &request.company_name,
        &request.landmark,
        &request.area_id,
        &request.address,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }
    mobile(&request.mobile)?;
    if !EMAIL_RE.is_match(request.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn otp(value: &str) -> Result<(), ValidationError> {
    if OTP_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidOtp)
    }
}

pub fn password_change(current: &str, new: &str, confirm: &str) -> Result<(), ValidationError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn profile_update(request: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if request.name.trim().is_empty()
        || request.landmark.trim().is_empty()
        || request.address.trim().is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}
