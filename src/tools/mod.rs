//! MangeTaMain Tools module
//!
//! Tool implementations behind the MCP server and the offline binaries.

pub mod charts;
pub mod complexity;
pub mod foods;
pub mod ingredients;
pub mod nutriscore;
pub mod reports;
pub mod status;
pub mod tags;
