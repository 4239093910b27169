use std::sync::Arc;

use serde_json::{json, Map, Value as JsonValue};

/// JSON type of one tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Object,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Integer(i64),
    Boolean(bool),
    String(&'static str),
}

impl DefaultValue {
    fn to_json(self) -> JsonValue {
        match self {
            DefaultValue::Integer(n) => json!(n),
            DefaultValue::Boolean(b) => json!(b),
            DefaultValue::String(s) => json!(s),
        }
    }
}

/// One property of a tool's input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub choices: &'static [&'static str],
    pub format: Option<&'static str>,
    pub example: Option<&'static str>,
}

impl ParamSpec {
    const fn new(ty: ParamType, name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
            required: false,
            default: None,
            choices: &[],
            format: None,
            example: None,
        }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(ParamType::String, name, description)
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(ParamType::Integer, name, description)
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(ParamType::Boolean, name, description)
    }

    pub const fn object(name: &'static str, description: &'static str) -> Self {
        Self::new(ParamType::Object, name, description)
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn default_value(self, default: DefaultValue) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn choices(self, choices: &'static [&'static str]) -> Self {
        Self { choices, ..self }
    }

    pub const fn format(self, format: &'static str) -> Self {
        Self {
            format: Some(format),
            ..self
        }
    }

    pub const fn example(self, example: &'static str) -> Self {
        Self {
            example: Some(example),
            ..self
        }
    }

    fn to_schema(&self) -> JsonValue {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.ty.as_str()));
        prop.insert("description".into(), json!(self.description));
        if let Some(default) = self.default {
            prop.insert("default".into(), default.to_json());
        }
        if !self.choices.is_empty() {
            prop.insert("enum".into(), json!(self.choices));
        }
        if let Some(format) = self.format {
            prop.insert("format".into(), json!(format));
        }
        if let Some(example) = self.example {
            prop.insert("example".into(), json!(example));
        }
        JsonValue::Object(prop)
    }
}

/// Discovery metadata for one invocable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolDescriptor {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }

    /// JSON Schema object for `inputSchema`; `required` is omitted when empty.
    pub fn input_schema(&self) -> Map<String, JsonValue> {
        let properties: Map<String, JsonValue> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.to_schema()))
            .collect();
        let required: Vec<&str> = self.required_params().map(|p| p.name).collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), JsonValue::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        schema
    }

    pub fn to_mcp(&self) -> rmcp::model::Tool {
        rmcp::model::Tool::new(self.name, self.description, Arc::new(self.input_schema()))
    }
}

/// Advertised, non-invocable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl ResourceDescriptor {
    pub fn to_mcp(&self) -> rmcp::model::Resource {
        use rmcp::model::{AnnotateAble, RawResource};
        let mut raw = RawResource::new(self.uri, self.name);
        raw.description = Some(self.description.to_string());
        raw.no_annotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &[ParamSpec] = &[
        ParamSpec::string("fqn", "Fully qualified name").required(),
        ParamSpec::integer("limit", "Max rows").default_value(DefaultValue::Integer(10)),
        ParamSpec::string("include", "Filter")
            .default_value(DefaultValue::String("non-deleted"))
            .choices(&["all", "deleted", "non-deleted"]),
    ];

    const ECHO: ToolDescriptor = ToolDescriptor {
        name: "test.echo",
        description: "echo tool",
        params: PARAMS,
    };

    #[test]
    fn it_renders_input_schema() {
        let schema = JsonValue::Object(ECHO.input_schema());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["fqn"]));
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["limit"]["default"], 10);
        assert_eq!(
            schema["properties"]["include"]["enum"],
            json!(["all", "deleted", "non-deleted"])
        );
        assert!(schema["properties"]["fqn"].get("default").is_none());
    }

    #[test]
    fn it_omits_required_when_nothing_is_required() {
        const OPTIONAL: ToolDescriptor = ToolDescriptor {
            name: "test.optional",
            description: "all optional",
            params: &[ParamSpec::integer("limit", "Max rows")],
        };
        assert!(OPTIONAL.input_schema().get("required").is_none());
    }

    #[test]
    fn it_converts_to_rmcp_tool() {
        let tool = ECHO.to_mcp();
        assert_eq!(tool.name, "test.echo");
        assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
    }
}
