pub mod access;
pub mod auth;
pub mod i18n;
