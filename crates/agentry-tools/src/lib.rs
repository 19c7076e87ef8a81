//! # agentry-tools
//!
//! Built-in tools for the agentry framework and the catalog that makes
//! the zero-configuration ones discoverable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agentry_core::ToolCollection;
//! use agentry_tools::{catalog, ShellTool, WebSearchTool};
//!
//! let mut tools = ToolCollection::new();
//! tools.discover_tools(&catalog::builtin(), "");
//! tools.register_tool(ShellTool::new("./workspace"));
//! tools.register_tool(WebSearchTool::new(api_key, 5));
//! ```

pub mod calculator;
pub mod catalog;
pub mod datetime;
pub mod direct_response;
pub mod search;
pub mod shell;
pub mod text;

pub use calculator::CalculatorTool;
pub use datetime::DateTimeTool;
pub use direct_response::DirectResponseTool;
pub use search::WebSearchTool;
pub use shell::ShellTool;
pub use text::TextTool;
