//! # Prestarter library
//!
//! Provisions a language runtime, an optional UI toolkit SDK and a launcher artifact in a working
//! directory, then hands execution over to the launcher. The `prestarter` binary consumes this
//! library.

pub mod arch;
pub mod archive;
pub mod bootstrap;
pub mod command;
pub mod config;
pub mod defaults;
pub mod fetcher;
pub mod handoff;
pub mod http;
pub mod instrumentation;
pub mod locator;
pub mod progress;
pub mod provisioner;
pub mod reporter;
pub mod resource;
pub mod utils;
