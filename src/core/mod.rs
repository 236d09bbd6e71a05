pub mod engine;
pub mod learn;
pub mod matcher;
pub mod parser;
pub mod session;
pub mod similarity;

pub use crate::domain::model::{MatchStatus, MatchedLine, ParsedItem, Position, Side};
pub use crate::domain::ports::{AbbreviationWriter, CatalogStore};
pub use crate::utils::error::Result;
