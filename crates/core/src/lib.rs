//! Reeltrack domain logic.
//!
//! Pure, total functions and closed domain types shared by the record
//! gateway and the API server. Nothing in this crate performs I/O; phase
//! normalization, status derivation, variation pricing, and entitlement
//! filtering are all deterministic and safe to call with arbitrary input.

pub mod access;
pub mod error;
pub mod phase;
pub mod pricing;
pub mod types;
