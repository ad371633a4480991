//! Domain model for the pet-adoption registry.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation at the write boundary; records stay plain data.
//!
//! # Invariants
//! - Every persisted record is identified by a stable engine-assigned id.
//! - Derived values (full name, phone display) are pure functions over
//!   stored fields, never separately stored state.

pub mod person;
pub mod pet;
pub mod phone;
pub mod taxonomy;
