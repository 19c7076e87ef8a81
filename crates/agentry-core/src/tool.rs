//! Tool System
//!
//! Extensible tool framework for agent capabilities. Tools are registered
//! with a [`ToolCollection`] either as live instances or as lazily
//! constructible classes, and invoked by name through a uniform
//! resolve → validate → execute pipeline that always yields a
//! [`ToolOutcome`] envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    /// Build a call from a name and argument pairs
    pub fn new(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
            id: None,
        }
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The value reported through the envelope: structured data when the
    /// tool produced any, otherwise the textual output.
    pub fn into_value(self) -> serde_json::Value {
        self.data
            .unwrap_or(serde_json::Value::String(self.output))
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Check whether the supplied arguments satisfy the declared schema.
    ///
    /// Side-effect free and callable repeatedly. The default checks that
    /// required parameters are present and enumerated values are honored.
    fn validate_input(&self, call: &ToolCall) -> bool {
        for param in &self.schema().parameters {
            match call.arguments.get(&param.name) {
                Some(value) => {
                    if let Some(allowed) = &param.enum_values {
                        if !allowed.contains(value) {
                            return false;
                        }
                    }
                }
                None => {
                    if param.required {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Execute the tool with given arguments.
    ///
    /// Must not assume `validate_input` was called; the collection runs it
    /// first, but a tool may be invoked directly.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;
}

/// Normalized result envelope returned by [`ToolCollection::execute_tool`].
///
/// Every execution attempt produces this shape, regardless of which tool
/// ran or how it failed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success { result: serde_json::Value },
    Error { error: String },
}

impl ToolOutcome {
    pub fn success(result: serde_json::Value) -> Self {
        Self::Success { result }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Constructor signature for lazily built tools. Classes registered for
/// deferred construction must be buildable with no arguments.
pub type ToolConstructor = fn() -> Result<Box<dyn Tool>>;

/// A registered-but-not-yet-constructed tool.
///
/// Carries enough declared metadata to appear in listings without being
/// instantiated.
#[derive(Clone)]
pub struct ToolClass {
    /// Declared tool name (the registration key)
    pub name: String,

    /// Declared description, reported when construction is impossible
    pub description: String,

    /// Zero-argument constructor
    pub construct: ToolConstructor,
}

impl ToolClass {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        construct: ToolConstructor,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            construct,
        }
    }
}

impl std::fmt::Debug for ToolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolClass")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// One entry of a [`ToolCatalog`]: a namespaced path plus a loader that
/// yields the tool class. Loading may fail (a broken entry) without
/// aborting a discovery walk.
#[derive(Clone)]
pub struct CatalogEntry {
    /// Dot-separated namespace path, e.g. `data.text`
    pub path: String,

    /// Loader producing the registrable class
    pub load: fn() -> Result<ToolClass>,
}

impl CatalogEntry {
    pub fn new(path: impl Into<String>, load: fn() -> Result<ToolClass>) -> Self {
        Self {
            path: path.into(),
            load,
        }
    }

    /// Whether this entry lives under the given namespace prefix. An empty
    /// namespace matches everything.
    pub fn matches(&self, namespace: &str) -> bool {
        namespace.is_empty()
            || self.path == namespace
            || self
                .path
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Explicit registration table used for tool discovery.
///
/// Replaces reflective module walking: every tool module contributes an
/// entry, and a discovery walk registers the entries under a namespace.
#[derive(Clone, Debug, Default)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of available tools: live instances plus lazily constructible
/// classes.
///
/// Lookup precedence: an instance shadows a same-named class. Registration
/// under an existing name silently overwrites (last writer wins).
#[derive(Default)]
pub struct ToolCollection {
    tools: HashMap<String, Arc<dyn Tool>>,
    tool_classes: HashMap<String, ToolClass>,
}

impl ToolCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live tool instance, keyed by its declared schema name.
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.schema().name;
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register an already-shared tool instance.
    pub fn register_tool_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        self.tools.insert(name, tool);
    }

    /// Register a class for deferred construction. No instance is created
    /// here.
    pub fn register_tool_class(&mut self, class: ToolClass) {
        self.tool_classes.insert(class.name.clone(), class);
    }

    /// Resolve a tool by name.
    ///
    /// Instance hits return the cached instance (identical on every call).
    /// Class hits construct a fresh instance per resolution. Absence is
    /// `Ok(None)` - an expected outcome, not an error. A failing
    /// constructor is logged and surfaced as
    /// [`AgentError::ToolConstruction`] so a broken tool stays
    /// distinguishable from an absent one.
    pub fn get_tool(&self, name: &str) -> Result<Option<Arc<dyn Tool>>> {
        if let Some(tool) = self.tools.get(name) {
            return Ok(Some(Arc::clone(tool)));
        }

        if let Some(class) = self.tool_classes.get(name) {
            return match (class.construct)() {
                Ok(tool) => Ok(Some(Arc::from(tool))),
                Err(e) => {
                    tracing::error!(tool = name, error = %e, "Tool construction failed");
                    Err(AgentError::ToolConstruction(error_detail(&e)))
                }
            };
        }

        Ok(None)
    }

    /// Execute a tool call through the resolve → validate → execute
    /// pipeline.
    ///
    /// Total over (name, arguments): every failure kind is contained and
    /// normalized into the envelope; nothing propagates past this
    /// boundary.
    pub async fn execute_tool(&self, call: &ToolCall) -> ToolOutcome {
        let tool = match self.get_tool(&call.name) {
            Ok(Some(tool)) => tool,
            Ok(None) => {
                return ToolOutcome::error(format!("Tool not found: {}", call.name));
            }
            Err(e) => {
                return ToolOutcome::error(format!(
                    "Error constructing tool {}: {}",
                    call.name,
                    error_detail(&e)
                ));
            }
        };

        if !tool.validate_input(call) {
            tracing::debug!(tool = %call.name, "Arguments rejected by schema check");
            return ToolOutcome::error(format!("Invalid input for tool {}", call.name));
        }

        match tool.execute(call).await {
            Ok(result) if result.success => ToolOutcome::success(result.into_value()),
            Ok(result) => ToolOutcome::error(format!(
                "Error executing tool {}: {}",
                call.name, result.output
            )),
            Err(e) => ToolOutcome::error(format!(
                "Error executing tool {}: {}",
                call.name,
                error_detail(&e)
            )),
        }
    }

    /// Walk a catalog, registering every loadable entry under the
    /// namespace as a tool class. Failing entries are logged and skipped;
    /// the walk continues. Returns the count of registered classes.
    pub fn discover_tools(&mut self, catalog: &ToolCatalog, namespace: &str) -> usize {
        let mut discovered = 0;

        for entry in catalog.entries() {
            if !entry.matches(namespace) {
                continue;
            }

            match (entry.load)() {
                Ok(class) => {
                    tracing::debug!(tool = %class.name, path = %entry.path, "Discovered tool class");
                    self.register_tool_class(class);
                    discovered += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %entry.path, error = %e, "Failed to load catalog entry");
                }
            }
        }

        discovered
    }

    /// Schemas of every registered tool, each name exactly once. Instances
    /// take precedence over same-named classes for metadata. Class entries
    /// report their full schema by constructing transiently, degrading to
    /// declared name/description when construction fails.
    pub fn list_tools(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();

        for (name, class) in &self.tool_classes {
            if self.tools.contains_key(name) {
                continue;
            }
            match (class.construct)() {
                Ok(tool) => schemas.push(tool.schema()),
                Err(e) => {
                    tracing::warn!(tool = %name, error = %e, "Schema unavailable, using declared metadata");
                    schemas.push(ToolSchema {
                        name: class.name.clone(),
                        description: class.description.clone(),
                        parameters: Vec::new(),
                        category: None,
                        has_side_effects: false,
                    });
                }
            }
        }

        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Registered tool names across both mappings, each exactly once.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.extend(
            self.tool_classes
                .keys()
                .filter(|n| !self.tools.contains_key(*n))
                .cloned(),
        );
        names.sort();
        names
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.tool_classes.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n");

        for schema in self.list_tools() {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n", schema.description));

            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    prompt.push_str(&format!(
                        "- `{}` ({}){}: {}\n",
                        param.name, param.param_type, required, param.description
                    ));
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

/// Underlying message of an error, without the variant prefix the Display
/// impl adds. The envelope embeds this in its own wording.
fn error_detail(err: &AgentError) -> String {
    match err {
        AgentError::Provider(msg)
        | AgentError::ToolValidation(msg)
        | AgentError::ToolExecution(msg)
        | AgentError::ToolConstruction(msg) => msg.clone(),
        other => other.to_string(),
    }
}
