//! HTTP surface and process lifecycle for the OTP relay

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;
