//! nollmit: LLM-backed poker decisions.
//!
//! A model is asked for a hold'em action, its free-text reply is parsed
//! into a structured [`action::Decision`], and every call is counted
//! against the provider's free and pro tier quotas.
//!
//! ## Modules
//!
//! - [`action`]: parse model text into a decision
//! - [`usage`]: persisted monthly/daily usage counter
//! - [`inference`]: provider trait and HuggingFace client
//! - [`decision`]: orchestrates one decision request
//! - [`server`]: HTTP API
//! - [`config`]: layered configuration

#![forbid(unsafe_code)]

pub mod action;
pub mod config;
pub mod decision;
pub mod inference;
pub mod server;
pub mod usage;
