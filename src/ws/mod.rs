//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams domain events in real time.
//! Clients subscribe per pair or with a wildcard; registry events (no
//! pair) are delivered to wildcard subscribers only.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
