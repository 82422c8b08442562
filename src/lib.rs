//! Menu photo OCR server
//!
//! Recognizes the text of a photographed menu, filters the boilerplate out of
//! the OCR output, numbers the remaining lines as menu items, optionally
//! translates them, and answers free-text searches over them.

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod menu;
pub mod preprocess;
pub mod query;
pub mod server;
pub mod translate;
