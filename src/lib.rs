pub mod api;
pub mod checkout;
pub mod config;
pub mod model;
pub mod navigation;
pub mod screens;
pub mod services;
pub mod session;
pub mod store;
pub mod validation;
