//! Agent-facing tool dispatch
//!
//! Maps a function name and its JSON arguments to a call on the tool server:
//! `server_health` and `execute_command` go to the fixed endpoints, every
//! catalogued function is posted to its `/api/tools/<name>` endpoint with
//! defaults filled in. Arguments are checked against the tool's schema
//! before anything goes over the network.

use std::collections::HashMap;

use anyhow::Result;
use kali_common::{catalog, ParamKind, ParamSpec, ToolSpec};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::client::{error_payload, RemoteClient};
use crate::schema::{object_schema, ToolSchema};

pub const SERVER_HEALTH: &str = "server_health";
pub const EXECUTE_COMMAND: &str = "execute_command";

const COMMAND_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "command",
    kind: ParamKind::String,
    required: true,
    default: None,
    description: "The command to execute",
}];

enum Target {
    Health,
    Command,
    Tool(&'static ToolSpec),
}

/// One callable function
pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: ToolSchema,
    target: Target,
}

pub struct Dispatcher {
    client: RemoteClient,
    entries: Vec<ToolEntry>,
    index: HashMap<&'static str, usize>,
}

impl Dispatcher {
    /// Catalogued tools in catalog order, followed by `server_health` and
    /// `execute_command`.
    pub fn new(client: RemoteClient) -> Result<Self> {
        let mut entries = Vec::with_capacity(catalog::TOOLS.len() + 2);
        for spec in catalog::TOOLS {
            entries.push(ToolEntry {
                name: spec.function,
                description: spec.description,
                schema: ToolSchema::for_tool(spec)?,
                target: Target::Tool(spec),
            });
        }
        entries.push(ToolEntry {
            name: SERVER_HEALTH,
            description: "Check the health status of the Kali API server",
            schema: ToolSchema::compile(object_schema(&[]))?,
            target: Target::Health,
        });
        entries.push(ToolEntry {
            name: EXECUTE_COMMAND,
            description: "Execute an arbitrary command on the Kali server",
            schema: ToolSchema::compile(object_schema(COMMAND_PARAMS))?,
            target: Target::Command,
        });

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name, i))
            .collect();
        info!("Registered {} agent functions", entries.len());
        Ok(Self {
            client,
            entries,
            index,
        })
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn tools(&self) -> &[ToolEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Invoke `name` with `args`. Always yields a JSON object; failures
    /// carry `error` and `success: false`.
    pub async fn call(&self, name: &str, args: Value) -> Value {
        let Some(entry) = self.get(name) else {
            warn!("Call to unknown function {name}");
            return error_payload(format!("Unknown tool: {name}"));
        };
        let args = match args {
            Value::Null => Value::Object(Map::new()),
            // an explicit null means "use the default"
            Value::Object(mut map) => {
                map.retain(|_, v| !v.is_null());
                Value::Object(map)
            }
            other => other,
        };
        if let Err(e) = entry.schema.validate(&args) {
            warn!("Rejected arguments for {name}: {e}");
            return error_payload(e);
        }

        match entry.target {
            Target::Health => self.client.check_health().await.into_json(),
            Target::Command => {
                let command = args.get("command").map(stringify).unwrap_or_default();
                info!("Executing command: {command}");
                self.client.execute_command(&command).await
            }
            Target::Tool(spec) => {
                let body = with_defaults(spec, args);
                info!("Calling {} on {}", spec.name, self.client.base_url());
                self.client.post(&spec.endpoint(), &body).await.into_json()
            }
        }
    }
}

/// Fill catalog defaults for every parameter the caller left out.
fn with_defaults(spec: &ToolSpec, args: Value) -> Value {
    let mut body = match args {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for param in spec.params {
        if body.get(param.name).map_or(true, Value::is_null) {
            if let Some(default) = param.default_value() {
                body.insert(param.name.to_string(), default);
            }
        }
    }
    Value::Object(body)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        // nothing listens on port 1; tests below never reach the network
        Dispatcher::new(RemoteClient::new("http://127.0.0.1:1", Duration::from_secs(2))).unwrap()
    }

    #[test]
    fn test_function_order() {
        let d = dispatcher();
        let names: Vec<&str> = d.tools().iter().map(|t| t.name).collect();
        assert_eq!(names.len(), catalog::TOOLS.len() + 2);
        assert_eq!(names[0], "nmap_scan");
        assert_eq!(names[names.len() - 2], SERVER_HEALTH);
        assert_eq!(names[names.len() - 1], EXECUTE_COMMAND);
    }

    #[test]
    fn test_lookup() {
        let d = dispatcher();
        assert!(d.get("gobuster_scan").is_some());
        assert!(d.get("gobuster").is_none());
        assert_eq!(
            d.get(EXECUTE_COMMAND).unwrap().schema.schema()["required"],
            json!(["command"])
        );
    }

    #[tokio::test]
    async fn test_unknown_function() {
        let reply = dispatcher().call("rm_rf", json!({})).await;
        assert_eq!(reply["error"], "Unknown tool: rm_rf");
        assert_eq!(reply["success"], false);
    }

    #[tokio::test]
    async fn test_schema_violation_is_reported() {
        let reply = dispatcher().call("nmap_scan", json!({"ports": "80"})).await;
        assert_eq!(reply["success"], false);
        assert!(reply["error"]
            .as_str()
            .unwrap()
            .starts_with("Input validation failed:"));

        let reply = dispatcher().call(EXECUTE_COMMAND, Value::Null).await;
        assert_eq!(reply["success"], false);

        let reply = dispatcher().call(EXECUTE_COMMAND, json!({"command": null})).await;
        assert_eq!(reply["success"], false);

        let reply = dispatcher().call("nmap_scan", json!(["10.0.0.1"])).await;
        assert_eq!(reply["success"], false);
    }

    #[test]
    fn test_defaults_filled() {
        let spec = catalog::find("nmap").unwrap();
        let body = with_defaults(spec, json!({"target": "10.0.0.1", "ports": null}));
        assert_eq!(body["target"], "10.0.0.1");
        assert_eq!(body["scan_type"], "-sCV");
        assert_eq!(body["additional_args"], "-T4 -Pn");
        assert!(body.get("ports").unwrap().is_null());
    }

    #[test]
    fn test_explicit_values_kept() {
        let spec = catalog::find("nmap").unwrap();
        let body = with_defaults(spec, json!({"target": "t", "scan_type": ""}));
        assert_eq!(body["scan_type"], "");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("id")), "id");
        assert_eq!(stringify(&json!(42)), "42");
    }
}
