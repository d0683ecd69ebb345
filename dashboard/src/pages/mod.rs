//! Page state machines
//!
//! Each page owns the state a screen shows and turns backend failures into a
//! single user-facing message.

pub mod dashboard;
pub mod deployment;
pub mod env;
pub mod login;

/// Where a page sends the user next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Dashboard(String),
}
