//! Domain logic for inspection-image detection reconciliation.
//!
//! Pure types and functions with no database or HTTP dependencies. The
//! `flarenet-db` crate persists these types and `flarenet-api` exposes them.

pub mod action;
pub mod aggregation;
pub mod annotation;
pub mod classify;
pub mod detection;
pub mod detection_index;
pub mod error;
pub mod geometry;
pub mod policy;
pub mod reconcile;
pub mod review_payload;
pub mod types;
