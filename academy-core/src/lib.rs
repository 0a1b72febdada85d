//! # academy-core
//!
//! Core library for Parent Academy - a parenting coaching platform.
//!
//! This library provides:
//! - Safety signal detection and crisis escalation
//! - Knowledge-base response generation for six expert agents
//! - Deterministic 30-day coaching plan generation
//! - Weekly check-in analysis
//! - An optional best-effort workflow engine integration
//!
//! ## Architecture
//!
//! Every inbound parent message passes through the safety classifier first;
//! a high-risk verdict short-circuits straight to the escalation responder.
//! Otherwise control flows to the knowledge-base generator (conversation)
//! or the plan generator / check-in analyzer (onboarding, weekly cadence).
//!
//! The generation components are pure, synchronous functions over their
//! arguments and static tables: no I/O, no shared mutable state, safe to
//! call concurrently without coordination. Persistence, transport, and UI
//! belong to the caller.
//!
//! ## Example
//!
//! ```rust
//! use academy_core::{check_safety, generate_response, AgentContext, AgentType};
//!
//! let verdict = check_safety("My child keeps hitting his sister");
//! assert!(!verdict.is_high_risk);
//!
//! let response = generate_response(
//!     AgentType::Behavior,
//!     "My child keeps hitting his sister",
//!     &AgentContext::default(),
//! );
//! assert!(response.content.contains("Hitting is very common"));
//! ```

// Re-export commonly used items at the crate root
pub use checkin::analyze_check_in;
pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use knowledge::generate_response;
pub use plan::generate_plan;
pub use safety::{check_safety, generate_safety_response, RecommendedAction, RiskCategory, SafetyVerdict};
pub use types::*;

// Public modules
pub mod checkin;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod knowledge;
pub mod logging;
pub mod plan;
pub mod safety;
pub mod types;
pub mod workflow;
