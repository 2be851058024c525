use std::fmt;

use super::{Notice, Outcome, Transition};
use crate::model::{Profile, StatusReply, UserType};
use crate::navigation::Route;
use crate::services::{AppContext, UpdateProfileRequest};
use crate::validation::{self, ValidationError};

pub struct ProfileScreen {
    ctx: AppContext,
    pub user_id: Option<i64>,
    pub user_name: String,
    pub user_type: UserType,
    pub profile: Option<Profile>,
    /// Editable fields; filled from the fetched profile.
    pub form: UpdateProfileRequest,
    pub busy: bool,
}

impl ProfileScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user_id: None,
            user_name: String::new(),
            user_type: UserType::default(),
            profile: None,
            form: UpdateProfileRequest::default(),
            busy: false,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        let user = match self.ctx.session.current().await {
            Ok(user) => user,
            Err(err) => return Notice::failure("Error", "Please login to continue", &err).into(),
        };
        let Some(user_id) = user.numeric_id() else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        self.user_id = Some(user_id);
        self.user_name = user.name.clone().unwrap_or_default();
        self.user_type = user.kind();

        self.busy = true;
        let result = self.ctx.auth.my_profile(user_id).await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => {
                if let Some(profile) = resp.result {
                    self.form = UpdateProfileRequest {
                        user_id: user_id.to_string(),
                        name: profile.name.clone().unwrap_or_default(),
                        landmark: profile.landmark.clone().unwrap_or_default(),
                        address: profile.address.clone().unwrap_or_default(),
                    };
                    self.profile = Some(profile);
                }
                Outcome::none()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to load profile")).into(),
            Err(err) => Notice::failure("Error", "Failed to load profile", &err).into(),
        }
    }

    pub async fn update(&mut self) -> Outcome {
        let Some(user_id) = self.user_id else {
            return Notice::from(ValidationError::NotLoggedIn).into();
        };
        self.form.user_id = user_id.to_string();
        if let Err(err) = validation::profile_update(&self.form) {
            return Notice::from(err).into();
        }

        self.busy = true;
        let result = self.ctx.auth.update_profile(&self.form).await;
        self.busy = false;

        match result {
            Ok(resp) if resp.is_ok() => {
                self.user_name = self.form.name.trim().to_string();
                if let Some(profile) = self.profile.as_mut() {
                    profile.name = Some(self.user_name.clone());
                    profile.landmark = Some(self.form.landmark.clone());
                    profile.address = Some(self.form.address.clone());
                }
                Notice::success("Success", resp.message_or("Profile updated successfully")).into()
            }
            Ok(resp) => Notice::error("Error", resp.message_or("Failed to update profile")).into(),
            Err(err) => Notice::failure("Error", "Failed to update profile", &err).into(),
        }
    }

    pub async fn logout(&mut self) -> Outcome {
        match self.ctx.auth.logout().await {
            Ok(()) => Outcome::none().then(Transition::Reset(Route::Login)),
            Err(err) => Notice::failure("Error", "Failed to logout", &err).into(),
        }
    }
}

impl fmt::Display for ProfileScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile")?;
        writeln!(f, "  Name:    {}", self.user_name)?;
        write!(f, "  Type:    {}", self.user_type.label())?;
        if let Some(p) = &self.profile {
            let fields = [
                ("Mobile", &p.mobile),
                ("Email", &p.email),
                ("Company", &p.company_name),
                ("Landmark", &p.landmark),
                ("Address", &p.address),
                ("Area", &p.area),
            ];
            for (label, value) in fields {
                if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                    write!(f, "\n  {:<8} {value}", format!("{label}:"))?;
                }
            }
        }
        Ok(())
    }
}

pub struct SettingsScreen {
    ctx: AppContext,
    pub notifications: bool,
    pub app_version: String,
    /// Set once `check_version` has asked the backend.
    pub update_available: Option<bool>,
}

impl SettingsScreen {
    pub fn new(ctx: AppContext) -> Self {
        let app_version = ctx.app_version.clone();
        Self {
            ctx,
            notifications: true,
            app_version,
            update_available: None,
        }
    }

    pub async fn load(&mut self) -> Outcome {
        match self.ctx.session.notifications_enabled().await {
            Ok(enabled) => {
                self.notifications = enabled;
                Outcome::none()
            }
            Err(err) => Notice::failure("Error", "Failed to load settings", &err).into(),
        }
    }

    pub async fn set_notifications(&mut self, enabled: bool) -> Outcome {
        match self.ctx.session.set_notifications_enabled(enabled).await {
            Ok(()) => {
                self.notifications = enabled;
                let message = if enabled {
                    "Notifications enabled"
                } else {
                    "Notifications disabled"
                };
                Notice::success("Settings", message).into()
            }
            Err(err) => Notice::failure("Error", "Failed to save settings", &err).into(),
        }
    }

    /// A non-success reply means this version is no longer current.
    pub async fn check_version(&mut self) -> Outcome {
        match self.ctx.catalog.check_version(&self.app_version).await {
            Ok(resp) if resp.is_ok() => {
                self.update_available = Some(false);
                Notice::info("App Version", "You are on the latest version").into()
            }
            Ok(resp) => {
                self.update_available = Some(true);
                Notice::info("Update Available", resp.message_or("A new version is available"))
                    .into()
            }
            Err(err) => Notice::failure("Error", "Failed to check for updates", &err).into(),
        }
    }
}

impl fmt::Display for SettingsScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings")?;
        writeln!(
            f,
            "  Notifications: {}",
            if self.notifications { "on" } else { "off" }
        )?;
        write!(f, "  App version:   {}", self.app_version)?;
        if self.update_available == Some(true) {
            write!(f, " (update available)")?;
        }
        Ok(())
    }
}
