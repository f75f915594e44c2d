//! Exploitation frameworks

use super::{ParamError, Params, Rendered, ResourceScript};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("metasploit", metasploit);
    reg.register_tool("searchsploit", searchsploit);
    reg.register_tool("beef", beef);
    reg.register_tool("setoolkit", setoolkit);
    reg.register_tool("routersploit", routersploit);
}

/// msfconsole reads a resource script: `use`, one `set` per option, `exploit`.
/// The script path is appended when the request writes the file.
fn metasploit(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let module = p.required("module", "Module parameter is required")?;

    let mut content = format!("use {module}\n");
    for (key, value) in p.pairs("options") {
        content.push_str(&format!("set {key} {value}\n"));
    }
    content.push_str("exploit\n");

    Ok(Rendered {
        command: "msfconsole -q -r".to_string(),
        resource: Some(ResourceScript {
            prefix: "kali_msf_",
            suffix: ".rc",
            content,
        }),
    })
}

fn searchsploit(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let query = p.required("query", "Query parameter is required")?;
    let mut cmd = String::from("searchsploit");
    if p.flag("exact") {
        cmd.push_str(" -e");
    }
    if p.flag("json_output") {
        cmd.push_str(" -j");
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {query}"));
    Ok(cmd.into())
}

fn beef(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = format!("beef-xss -p {}", p.value("port"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

// SET is interactive; attack_vector, payload and target are accepted but only
// additional_args reach the command line.
fn setoolkit(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = String::from("setoolkit");
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn routersploit(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["module", "target"], "Module and target parameters are required")?;
    let mut cmd = format!("routersploit -m {} -t {}", p.value("module"), p.value("target"));
    if let Some(port) = p.opt("port") {
        cmd.push_str(&format!(" -p {port}"));
    }
    if let Some(options) = p.opt("additional_options") {
        cmd.push_str(&format!(" {options}"));
    }
    Ok(cmd.into())
}
