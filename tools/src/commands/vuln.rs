//! Vulnerability scanners and database injection testing

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("openvas", openvas);
    reg.register_tool("nuclei", nuclei);
    reg.register_tool("lynis", lynis);
    reg.register_tool("nosqlmap", nosqlmap);
}

/// Only creates the GVM target. Starting the task with `scan_config` is left
/// to the operator.
fn openvas(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!(
        "gvm-cli --gmp-username admin --gmp-password admin socket --xml \
         '<create_target><name>{target}</name><hosts>{target}</hosts></create_target>'"
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn nuclei(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!("nuclei -u {target}");
    if let Some(templates) = p.opt("templates") {
        cmd.push_str(&format!(" -t {templates}"));
    }
    if let Some(severity) = p.opt("severity") {
        cmd.push_str(&format!(" -s {severity}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn lynis(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = format!("lynis audit {}", p.value("audit_type"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn nosqlmap(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", "URL parameter is required")?;
    let mut cmd = format!("nosqlmap -u {url}");
    if p.value("method") == "POST" {
        if let Some(data) = p.opt("data") {
            cmd.push_str(&format!(" --data '{data}'"));
        }
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
