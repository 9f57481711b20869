pub mod admin;
pub mod auth;
pub mod brand;
pub mod pages;
pub mod support;
