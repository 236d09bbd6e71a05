pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::RemoteCatalog;
pub use crate::adapters::memory::MemoryCatalog;
pub use crate::core::engine::ConversionEngine;
pub use crate::core::matcher::{MatchEngine, NoMatchReason, Resolution};
pub use crate::core::parser::{parse_order_line, parse_order_text};
pub use crate::core::session::ConversionSession;
pub use crate::utils::error::{MatchError, Result};
