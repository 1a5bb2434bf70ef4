//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details; every operation takes the
//!   acting `user_id` explicitly instead of reading session state.

pub mod academic_service;
pub mod calendar_service;
pub mod grade_service;
pub mod schedule_service;
