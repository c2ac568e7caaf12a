//! Trout stream tracker for West Virginia.
//!
//! The service exposes account signup/login backed by Postgres, a
//! token-protected profile route, a health probe, and thin proxies for the
//! WV GIS map layers consumed by the frontend.

pub mod auth;
pub mod cli;
pub mod finventory;
pub mod users;
