//! Tool registry: declared schemas, argument validation, and dispatch.
//!
//! The registry is built once at startup and never mutated afterwards. It
//! owns every [`ToolDefinition`] in registration order, validates incoming
//! arguments against the declared [`ParamSpec`]s, and runs the matching
//! handler.

use std::collections::HashMap;
use std::future::Future;

use futures_util::future::BoxFuture;
use serde_json::{json, Map, Value};

use crate::{AppError, Result};

/// JSON object carrying tool arguments.
pub type Arguments = Map<String, Value>;

/// JSON type accepted for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
}

impl ParamKind {
    /// JSON Schema `type` keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Declaration of a single tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Argument name.
    pub name: String,
    /// Accepted JSON type.
    pub kind: ParamKind,
    /// Human-readable description.
    pub description: Option<String>,
    /// Whether the caller must supply it.
    pub required: bool,
    /// Value inserted when the caller omits it.
    pub default: Option<Value>,
    /// Inclusive lower bound for numeric kinds.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric kinds.
    pub maximum: Option<f64>,
    /// Allowed values; empty means unrestricted.
    pub allowed: Vec<Value>,
}

impl ParamSpec {
    /// A required parameter of `kind`.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: true,
            default: None,
            minimum: None,
            maximum: None,
            allowed: Vec::new(),
        }
    }

    /// An optional parameter of `kind`.
    #[must_use]
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Default applied when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Inclusive numeric range.
    #[must_use]
    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Restrict the argument to `values`.
    #[must_use]
    pub fn one_of(mut self, values: Vec<Value>) -> Self {
        self.allowed = values;
        self
    }

    fn check(&self, value: &Value) -> std::result::Result<(), String> {
        if !self.kind.accepts(value) {
            return Err(format!(
                "expected {}, got {}",
                self.kind.as_str(),
                json_type_name(value)
            ));
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = self.minimum {
                if number < min {
                    return Err(format!("must be >= {min}, got {number}"));
                }
            }
            if let Some(max) = self.maximum {
                if number > max {
                    return Err(format!("must be <= {max}, got {number}"));
                }
            }
        }

        if !self.allowed.is_empty() && !self.allowed.contains(value) {
            let allowed: Vec<String> = self.allowed.iter().map(Value::to_string).collect();
            return Err(format!("must be one of [{}]", allowed.join(", ")));
        }

        Ok(())
    }

    fn schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.kind.as_str()));
        if let Some(ref description) = self.description {
            prop.insert("description".into(), json!(description));
        }
        if let Some(ref default) = self.default {
            prop.insert("default".into(), default.clone());
        }
        if let Some(min) = self.minimum {
            prop.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            prop.insert("maximum".into(), json!(max));
        }
        if !self.allowed.is_empty() {
            prop.insert("enum".into(), Value::Array(self.allowed.clone()));
        }
        Value::Object(prop)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Static description of a tool as advertised through `tools/list`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Short display title.
    pub title: String,
    /// What the tool does.
    pub description: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamSpec>,
}

impl ToolDefinition {
    /// Start a definition with no parameters.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// JSON Schema object for the tool input.
    #[must_use]
    pub fn input_schema(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for spec in &self.params {
            properties.insert(spec.name.clone(), spec.schema());
            if spec.required {
                required.push(json!(spec.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema
    }

    /// Validate `raw` against the declared parameters.
    ///
    /// Absent optional arguments receive their default; unknown arguments
    /// are dropped; `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` naming the first offending field.
    pub fn validate(&self, raw: Option<Arguments>) -> Result<Arguments> {
        let mut raw = raw.unwrap_or_default();
        let mut validated = Map::new();

        for spec in &self.params {
            match raw.remove(&spec.name).filter(|value| !value.is_null()) {
                Some(value) => {
                    spec.check(&value)
                        .map_err(|message| AppError::InvalidInput {
                            field: spec.name.clone(),
                            message,
                        })?;
                    validated.insert(spec.name.clone(), value);
                }
                None => {
                    if let Some(ref default) = spec.default {
                        validated.insert(spec.name.clone(), default.clone());
                    } else if spec.required {
                        return Err(AppError::InvalidInput {
                            field: spec.name.clone(),
                            message: "is required".into(),
                        });
                    }
                }
            }
        }

        Ok(validated)
    }
}

/// Text-only content block returned by a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Plain text.
    Text(String),
}

/// Result of a tool handler.
///
/// Failures caught inside a handler are still outputs: `failed` is set and
/// the content explains what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Content blocks in display order.
    pub content: Vec<ContentBlock>,
    /// Whether the handler caught an error.
    pub failed: bool,
}

impl ToolOutput {
    /// Successful single-text output.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            failed: false,
        }
    }

    /// Failure rendered as a single text block.
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            failed: true,
        }
    }

    /// First text block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().map(|ContentBlock::Text(text)| text.as_str()).next()
    }
}

type Handler = Box<dyn Fn(Arguments) -> BoxFuture<'static, Result<ToolOutput>> + Send + Sync>;

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Handler,
}

/// Ordered set of tools keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` with its handler.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a tool with the same name exists.
    pub fn register<F, Fut>(&mut self, definition: ToolDefinition, handler: F) -> Result<()>
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        if self.index.contains_key(&definition.name) {
            return Err(AppError::Config(format!(
                "tool `{}` is already registered",
                definition.name
            )));
        }

        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            handler: Box::new(move |args| -> BoxFuture<'static, Result<ToolOutput>> {
                Box::pin(handler(args))
            }),
        });
        Ok(())
    }

    /// Every definition in registration order.
    pub fn list_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|tool| &tool.definition)
    }

    /// Look up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i].definition)
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate `raw` and run the handler registered as `name`.
    ///
    /// # Errors
    ///
    /// - `AppError::UnknownTool` when `name` is not registered.
    /// - `AppError::InvalidInput` when validation fails.
    /// - Whatever the handler itself returns (handlers normally catch their
    ///   own failures and report them as [`ToolOutput::failure`]).
    pub async fn invoke(&self, name: &str, raw: Option<Arguments>) -> Result<ToolOutput> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| AppError::UnknownTool(name.to_owned()))?;

        let args = tool.definition.validate(raw)?;
        (tool.handler)(args).await
    }
}
