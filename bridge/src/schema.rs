//! JSON Schema generation and validation for tool arguments

use anyhow::{anyhow, bail, Result};
use kali_common::{ParamKind, ParamSpec, ToolSpec};
use serde_json::{json, Map, Value};

/// A compiled argument schema
pub struct ToolSchema {
    schema: Value,
    validator: jsonschema::Validator,
}

impl ToolSchema {
    pub fn compile(schema: Value) -> Result<Self> {
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| anyhow!("Invalid JSON schema: {e}"))?;
        Ok(Self { schema, validator })
    }

    /// Schema for a catalogued tool's parameters.
    pub fn for_tool(spec: &ToolSpec) -> Result<Self> {
        Self::compile(object_schema(spec.params))
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check `args` against the schema.
    pub fn validate(&self, args: &Value) -> Result<()> {
        if let Err(error) = self.validator.validate(args) {
            bail!("Input validation failed: {}", error);
        }
        Ok(())
    }
}

/// `{"type": "object", ...}` over `params`
pub fn object_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    for param in params {
        properties.insert(param.name.to_string(), param_schema(param));
    }
    let required: Vec<&str> = params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn param_schema(param: &ParamSpec) -> Value {
    let mut schema = match param.kind {
        // numbers are stringified when the command is rendered
        ParamKind::String => json!({ "type": ["string", "number"] }),
        ParamKind::Boolean => json!({ "type": "boolean" }),
        ParamKind::Object => json!({
            "type": "object",
            "additionalProperties": { "type": ["string", "number", "boolean"] },
        }),
    };
    schema["description"] = Value::from(param.description);
    if let Some(default) = param.default_value() {
        schema["default"] = default;
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use kali_common::catalog;

    fn nmap() -> ToolSchema {
        ToolSchema::for_tool(catalog::find("nmap").unwrap()).unwrap()
    }

    #[test]
    fn test_required_and_defaults() {
        let schema = nmap();
        let schema = schema.schema();
        assert_eq!(schema["required"], json!(["target"]));
        assert_eq!(schema["properties"]["scan_type"]["default"], "-sCV");
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_valid_args() {
        let schema = nmap();
        assert!(schema.validate(&json!({"target": "10.0.0.1"})).is_ok());
        assert!(schema
            .validate(&json!({"target": "10.0.0.1", "ports": 80}))
            .is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = nmap().validate(&json!({})).unwrap_err();
        assert!(err.to_string().starts_with("Input validation failed:"));
    }

    #[test]
    fn test_unknown_property_rejected() {
        assert!(nmap()
            .validate(&json!({"target": "t", "bogus": "x"}))
            .is_err());
    }

    #[test]
    fn test_boolean_and_object_kinds() {
        let msf = ToolSchema::for_tool(catalog::find("metasploit").unwrap()).unwrap();
        assert!(msf
            .validate(&json!({"module": "exploit/x", "options": {"RHOSTS": "10.0.0.1", "RPORT": 21}}))
            .is_ok());
        assert!(msf
            .validate(&json!({"module": "exploit/x", "options": "RHOSTS=1"}))
            .is_err());

        let searchsploit = ToolSchema::for_tool(catalog::find("searchsploit").unwrap()).unwrap();
        assert!(searchsploit
            .validate(&json!({"query": "vsftpd", "exact": true}))
            .is_ok());
        assert!(searchsploit
            .validate(&json!({"query": "vsftpd", "exact": "yes"}))
            .is_err());
    }

    #[test]
    fn test_every_catalog_tool_compiles() {
        for spec in catalog::TOOLS {
            assert!(ToolSchema::for_tool(spec).is_ok(), "{}", spec.name);
        }
    }
}
