//! Built-in Tool Catalog
//!
//! The explicit registration table backing tool discovery. Every
//! zero-argument-constructible tool contributes one namespaced entry;
//! tools needing configuration (API keys, provider handles, working
//! directories) are registered as instances by the caller instead.

use agentry_core::error::Result;
use agentry_core::tool::{CatalogEntry, Tool, ToolCatalog, ToolClass};

use crate::calculator::CalculatorTool;
use crate::datetime::DateTimeTool;
use crate::text::TextTool;

fn text_class() -> Result<ToolClass> {
    Ok(ToolClass::new(
        "text",
        "Transform or analyze text",
        || Ok(Box::new(TextTool) as Box<dyn Tool>),
    ))
}

fn calculator_class() -> Result<ToolClass> {
    Ok(ToolClass::new(
        "calculate",
        "Evaluate a mathematical expression",
        || Ok(Box::new(CalculatorTool) as Box<dyn Tool>),
    ))
}

fn datetime_class() -> Result<ToolClass> {
    Ok(ToolClass::new(
        "datetime",
        "Get the current date and time",
        || Ok(Box::new(DateTimeTool) as Box<dyn Tool>),
    ))
}

/// The catalog of built-in tools.
pub fn builtin() -> ToolCatalog {
    ToolCatalog::from_entries(vec![
        CatalogEntry::new("data.text", text_class),
        CatalogEntry::new("math.calculate", calculator_class),
        CatalogEntry::new("time.datetime", datetime_class),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::tool::{ToolCall, ToolCollection, ToolOutcome};
    use serde_json::json;

    #[test]
    fn every_builtin_is_discoverable() {
        let mut collection = ToolCollection::new();
        let discovered = collection.discover_tools(&builtin(), "");
        assert_eq!(discovered, 3);
        assert_eq!(
            collection.names(),
            vec!["calculate".to_string(), "datetime".into(), "text".into()]
        );
    }

    #[test]
    fn namespaces_partition_the_catalog() {
        let mut collection = ToolCollection::new();
        assert_eq!(collection.discover_tools(&builtin(), "data"), 1);
        assert_eq!(collection.names(), vec!["text".to_string()]);
    }

    #[tokio::test]
    async fn discovered_tools_execute_through_the_envelope() {
        let mut collection = ToolCollection::new();
        collection.discover_tools(&builtin(), "");

        let outcome = collection
            .execute_tool(&ToolCall::new(
                "calculate",
                [("expression".to_string(), json!("2 + 2"))],
            ))
            .await;
        match outcome {
            ToolOutcome::Success { result } => assert_eq!(result, json!(4.0)),
            ToolOutcome::Error { error } => panic!("unexpected error: {error}"),
        }
    }
}
