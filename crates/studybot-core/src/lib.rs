//! Core Studybot library (domain model, session store, responder, config).

pub mod auth;
pub mod composer;
pub mod config;
pub mod logging;
pub mod model;
pub mod prompts;
pub mod providers;
pub mod responder;
pub mod session;
pub mod shell;
pub mod storage;
