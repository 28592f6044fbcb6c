//! WeekendExpress - a weekend workshops catalog with an admin back-office
//!
//! This library provides the core functionality for the WeekendExpress
//! catalog: the public workshop listing, the session-guarded admin
//! mutations, and the in-memory entity store behind them.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod services;
pub mod store;
