//! Herb Origin Report Service
//!
//! This library provides the core functionality for the herb-origin-report
//! service, which validates herb batch provenance submissions and generates
//! consumer-facing origin reports using Cloudflare Workers AI.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;
