//! Dashboard shell over the wayfinder navigation core.
//!
//! Builds the audit, vendor, user, and policy screens, mounts them in an
//! [`Outlet`](wayfinder_router::Outlet), and drives navigation from a script.

pub mod app;
pub mod breadcrumb;
pub mod config;
pub mod records;
pub mod screens;
pub mod script;

pub use app::{App, AppError};
pub use config::{ConfigError, DashboardConfig};
pub use script::{ScriptError, Step, parse_line, parse_script};
