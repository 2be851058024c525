use std::fmt;
use tracing::warn;

use super::{Notice, Outcome, Transition};
use crate::model::{Area, StatusReply};
use crate::navigation::Route;
use crate::services::{AppContext, RegisterRequest};
use crate::validation;

pub struct LoginScreen {
    ctx: AppContext,
    pub mobile: String,
    pub password: String,
    pub busy: bool,
}

impl LoginScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            mobile: String::new(),
            password: String::new(),
            busy: false,
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = validation::login(&self.mobile, &self.password) {
            return Notice::from(err).into();
        }

        self.busy = true;
        let result = self
            .ctx
            .auth
            .login(self.mobile.trim(), &self.password)
            .await;
        self.busy = false;

        match result {
            Ok(resp) if resp.logged_in() => Outcome::notice(Notice::success("Success", "Login successful!"))
                .then(Transition::Replace(Route::Home)),
            Ok(resp) if resp.is_ok() => Notice::error("Login Failed", "Invalid credentials").into(),
            Ok(resp) => Notice::error("Login Failed", resp.message_or("Invalid credentials")).into(),
            Err(err) => Notice::failure("Error", "Failed to login. Please try again.", &err).into(),
        }
    }
}

impl fmt::Display for LoginScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "UPORT - B2B Grocery Shopping")?;
        writeln!(f, "Mobile Number: {}", self.mobile)?;
        write!(f, "Password: {}", "*".repeat(self.password.chars().count()))
    }
}

/// Registration form; submitting sends an OTP to the mobile number.
pub struct RegisterScreen {
    ctx: AppContext,
    pub form: RegisterRequest,
    pub areas: Vec<Area>,
    pub busy: bool,
}

impl RegisterScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: RegisterRequest::default(),
            areas: Vec::new(),
            busy: false,
        }
    }

    /// Loads the delivery area list; a failure leaves the list empty.
    pub async fn load(&mut self) {
        match self.ctx.auth.areas().await {
            Ok(resp) if resp.is_ok() => self.areas = resp.products,
            Ok(resp) => warn!(status = resp.status, "area list unavailable"),
            Err(err) => warn!(error = %err, "failed to load areas"),
        }
    }

    /// Select an area by display name (case-insensitive) or id.
    pub fn choose_area(&mut self, choice: &str) -> bool {
        let choice = choice.trim();
        let found = self
            .areas
            .iter()
            .find(|a| a.id.to_string() == choice || a.name.eq_ignore_ascii_case(choice));
        match found {
            Some(area) => {
                self.form.area_id = area.id.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = validation::registration(&self.form) {
            return Notice::from(err).into();
        }

        self.busy = true;
        let result = self.ctx.auth.send_otp(&self.form).await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => Outcome::notice(Notice::success(
                "OTP Sent",
                resp.message_or("Enter the OTP sent to your mobile"),
            ))
            .then(Transition::Push(Route::VerifyOtp {
                mobile: self.form.mobile.trim().to_string(),
            })),
            Ok(resp) => Notice::error("Registration Failed", resp.message_or("Please try again")).into(),
            Err(err) => {
                Notice::failure("Error", "Registration failed. Please try again.", &err).into()
            }
        }
    }
}

impl fmt::Display for RegisterScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Register")?;
        writeln!(f, "Name: {}", self.form.name)?;
        writeln!(f, "Mobile: {}", self.form.mobile)?;
        writeln!(f, "Email: {}", self.form.email)?;
        writeln!(f, "Company: {}", self.form.company_name)?;
        writeln!(f, "Landmark: {}", self.form.landmark)?;
        writeln!(f, "Address: {}", self.form.address)?;
        write!(f, "Areas:")?;
        for area in &self.areas {
            write!(f, "\n  {:>4}  {}", area.id, area.name)?;
        }
        Ok(())
    }
}

pub struct VerifyOtpScreen {
    ctx: AppContext,
    pub mobile: String,
    pub otp: String,
    pub busy: bool,
}

impl VerifyOtpScreen {
    pub fn new(ctx: AppContext, mobile: impl Into<String>) -> Self {
        Self {
            ctx,
            mobile: mobile.into(),
            otp: String::new(),
            busy: false,
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = validation::mobile(&self.mobile).and_then(|_| validation::otp(&self.otp)) {
            return Notice::from(err).into();
        }

        self.busy = true;
        let result = self
            .ctx
            .auth
            .verify_otp(self.mobile.trim(), self.otp.trim())
            .await;
        self.busy = false;

        match result {
            Ok(resp) if resp.logged_in() => Outcome::notice(Notice::success(
                "Registration Successful",
                resp.message_or("Welcome to Uport"),
            ))
            .then(Transition::Reset(Route::Home)),
            Ok(resp) if resp.is_ok() => Notice::error("Verification Failed", "Invalid OTP").into(),
            Ok(resp) => Notice::error("Verification Failed", resp.message_or("Invalid OTP")).into(),
            Err(err) => Notice::failure("Error", "Verification failed. Please try again.", &err).into(),
        }
    }
}

pub struct ChangePasswordScreen {
    ctx: AppContext,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub busy: bool,
}

impl ChangePasswordScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            current_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            busy: false,
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        if let Err(err) = validation::password_change(
            &self.current_password,
            &self.new_password,
            &self.confirm_password,
        ) {
            return Notice::from(err).into();
        }

        self.busy = true;
        let result = self
            .ctx
            .auth
            .change_password(&self.current_password, &self.new_password)
            .await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => {
                Outcome::notice(Notice::success("Success", "Password changed successfully"))
                    .then(Transition::Back)
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to change password")).into(),
            Err(err) => Notice::failure("Error", "Failed to change password", &err).into(),
        }
    }
}
