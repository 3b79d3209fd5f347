//! Transport session manager module
//!
//! Owns the lifecycle of the single transport session:
//! - Phase tracking (`Uninitialized` → `Authenticating` → `Ready` ...)
//! - Reactive reconnection after session loss or failed authentication
//! - Scheduled proactive restarts while `Ready`
//! - Ordered, best-effort teardown on shutdown

mod config;
mod manager;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use manager::SessionManager;
