//! Mindline - Conversational Therapy Session Orchestrator
//!
//! This crate drives a multi-turn therapy-intake dialogue, delegating
//! natural-language generation to an LLM provider while tracking session
//! state (interview stage, client profile, selected modality, running
//! anamnesis) across request boundaries.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod ports;
