//! View models, one per user-facing page.
//!
//! A screen is built from an [`AppContext`](crate::services::AppContext),
//! loads its data on `load`, keeps it in plain fields and renders itself as
//! text. User actions return an [`Outcome`]: a transient notice and an
//! optional navigation step. Failures never escape a screen; they become
//! error notices and leave the screen state as it was.

pub mod auth;
pub mod cart;
pub mod home;
pub mod orders;
pub mod profile;

use std::fmt;
use tracing::warn;

use crate::navigation::{Navigator, Route};

pub use auth::{ChangePasswordScreen, LoginScreen, RegisterScreen, VerifyOtpScreen};
pub use cart::CartScreen;
pub use home::{HomeScreen, ProductScreen, SubCategoryScreen};
pub use orders::{MyOrdersScreen, OrderDetailsScreen};
pub use profile::{ProfileScreen, SettingsScreen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notice for a failed call; the underlying error goes to the log only.
    pub fn failure(
        title: impl Into<String>,
        message: impl Into<String>,
        err: &(dyn std::error::Error + 'static),
    ) -> Self {
        let notice = Self::error(title, message);
        warn!(error = %err, title = %notice.title, "action failed");
        notice
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        write!(f, "[{tag}] {}: {}", self.title, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Push(Route),
    Replace(Route),
    Reset(Route),
    Back,
}

impl Transition {
    pub fn apply(&self, nav: &mut Navigator) {
        match self {
            Transition::Push(route) => nav.navigate(route.clone()),
            Transition::Replace(route) => nav.replace(route.clone()),
            Transition::Reset(route) => nav.reset(route.clone()),
            Transition::Back => {
                nav.back();
            }
        }
    }
}

/// Result of a user action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Option<Notice>,
    pub transition: Option<Transition>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            transition: None,
        }
    }

    pub fn then(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn is_error(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_error)
    }
}

impl From<Notice> for Outcome {
    fn from(notice: Notice) -> Self {
        Outcome::notice(notice)
    }
}

impl From<crate::validation::ValidationError> for Notice {
    fn from(err: crate::validation::ValidationError) -> Self {
        Notice::error("Error", err.to_string())
    }
}
