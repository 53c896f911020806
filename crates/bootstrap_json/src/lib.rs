#![forbid(unsafe_code)]

//! Fetches a backend `bootstrap.json` document once per build and renders the
//! HTML fragments an application shell template injects at its
//! `{{content-for "..."}}` markers.
//!
//! ```no_run
//! use bootstrap_json::{BootstrapContext, HttpSource};
//! use std::time::Duration;
//!
//! # fn main() -> bootstrap_json::Result<()> {
//! let context = BootstrapContext::new();
//! context.fetch(&HttpSource::new("http://localhost:3000", Duration::from_secs(30))?)?;
//! let head = context.content_for("head").unwrap_or_default();
//! # let _ = head;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod inject;
pub mod render;
pub mod source;
pub mod util;

pub use cli::run_from_env;
pub use config::BootstrapConfig;
pub use context::BootstrapContext;
pub use document::Bootstrap;
pub use error::{BootstrapError, Result};
pub use inject::inject;
pub use render::{Slot, render};
pub use source::{BootstrapSource, FileSource, HttpSource};
