//! Rostrum: a Korean job-interview rehearsal engine.
//!
//! The crate splits into the HTTP scoring service (`routes`, `evaluation`,
//! `analysis`, `questions`) and the client-side rehearsal loop (`session`).
//! Both sides degrade to local heuristics when no LLM key is configured.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod llm_client;
pub mod models;
pub mod questions;
pub mod routes;
pub mod session;
pub mod state;
