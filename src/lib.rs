//! Workforce Engine
//!
//! This crate provides the compensation and time-accounting core of an
//! employee management back end: salary derivation and the monthly payroll
//! batch, attendance check-in/check-out with worked-hour derivation, weighted
//! KPI scoring, and leave day counting, served over HTTP with axum.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
