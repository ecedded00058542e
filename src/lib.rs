//! Dialog Skills - Conversational skill layer
//!
//! This crate implements topic-specific dialog skills (fact retrieval,
//! emotion support, scripted small talk) that decide turn by turn whether
//! to respond, what to say, and how confident they are, so an upstream
//! orchestrator can select among competing skills.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
