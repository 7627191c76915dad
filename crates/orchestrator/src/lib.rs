//! Conversation orchestration for the Kabar bot.
//!
//! This crate ties the other pieces together: it resolves the user and
//! their language, runs the slash-command interpreter, replays persisted
//! history into the active provider adapter, and persists both sides of
//! every AI turn. Every failure surfaces to the user as a localized
//! fallback reply, never as a raw error.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use orchestrator::Orchestrator;
//! use transport::NoOpSender;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:kabar.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let orchestrator = Orchestrator::from_env(db, Arc::new(NoOpSender))?;
//! let reply = orchestrator.handle_message("+628111", "Halo, apa kabar?").await;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod commands;
mod config;
mod error;
mod orchestrator;
mod prompt;
mod sessions;

pub use commands::Command;
pub use config::{CompanyInfo, Config, ProviderKind};
pub use error::OrchestratorError;
pub use orchestrator::{build_adapter, Orchestrator};
pub use prompt::build_system_prompt;
pub use sessions::SessionTable;
