//! Entity Module

pub mod principal;
pub mod session;
pub mod user;
