pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod history;
pub mod log;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod ux;
pub mod wire;
