//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod adoption_service;
pub mod pet_service;
pub mod taxonomy_service;
