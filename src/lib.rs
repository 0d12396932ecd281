//! VOD Access - Entitlement service for a premium video catalog
//!
//! Decides whether a user may watch a video, lists what they can still buy,
//! records purchases against a Stripe-backed billing account, and keeps the
//! local subscription ledger in step with Stripe webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
