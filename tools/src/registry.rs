//! Tool registry — binds catalog entries to their command renderers

use std::collections::HashMap;

use kali_common::{catalog, ToolSpec};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::commands::{self, ParamError, Params, Rendered, Renderer};

/// In-memory tool registry
pub struct Registry {
    tools: HashMap<&'static str, (&'static ToolSpec, Renderer)>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry with every tool of the catalog bound
    pub fn with_builtin_tools() -> Self {
        let mut reg = Self::new();
        commands::network::register_tools(&mut reg);
        commands::web::register_tools(&mut reg);
        commands::password::register_tools(&mut reg);
        commands::exploitation::register_tools(&mut reg);
        commands::wireless::register_tools(&mut reg);
        commands::windows::register_tools(&mut reg);
        commands::recon::register_tools(&mut reg);
        commands::shells::register_tools(&mut reg);
        commands::vuln::register_tools(&mut reg);
        commands::forensics::register_tools(&mut reg);
        commands::utility::register_tools(&mut reg);
        info!("Registered {} built-in tools", reg.tool_count());
        reg
    }

    /// Bind a renderer to the catalog entry called `name`
    pub fn register_tool(&mut self, name: &str, renderer: Renderer) {
        match catalog::find(name) {
            Some(spec) => {
                debug!("Registered tool: {} ({})", spec.name, spec.category.as_str());
                self.tools.insert(spec.name, (spec, renderer));
            }
            None => warn!("Ignoring renderer for tool missing from the catalog: {name}"),
        }
    }

    pub fn get_tool(&self, name: &str) -> Option<&'static ToolSpec> {
        self.tools.get(name).map(|(spec, _)| *spec)
    }

    /// Registered tools in catalog order
    pub fn list_tools(&self) -> Vec<&'static ToolSpec> {
        catalog::TOOLS
            .iter()
            .filter(|spec| self.tools.contains_key(spec.name))
            .collect()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Render the command line for `name`. `None` when the tool is unknown.
    pub fn render(
        &self,
        name: &str,
        body: &Map<String, Value>,
    ) -> Option<Result<Rendered, ParamError>> {
        let (spec, renderer) = self.tools.get(name)?;
        Some(commands::check_kinds(spec, body).and_then(|()| renderer(&Params::new(spec, body))))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
