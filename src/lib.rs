//! Courant - Real-time notification service for the Raccordement Connect CRM
//!
//! This crate implements the live admin feed: a WebSocket endpoint that
//! pushes new leads, payments, demandes, emails, and dashboard metrics
//! to connected back-office sessions, with persisted read/unread state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
