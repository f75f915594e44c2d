//! Shells, relays and payload generation

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("weevely", weevely);
    reg.register_tool("netcat", netcat);
    reg.register_tool("socat", socat);
    reg.register_tool("msfvenom", msfvenom);
}

fn weevely(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let password = p.opt("password");
    let mut cmd = match (p.value("mode").as_str(), p.opt("output_file"), p.opt("url"), password) {
        ("generate", Some(output), _, Some(password)) => {
            format!("weevely generate {password} {output}")
        }
        ("connect", _, Some(url), Some(password)) => format!("weevely {url} {password}"),
        _ => return Err(ParamError::invalid("Invalid parameters for weevely mode")),
    };
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn netcat(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let port = p.value("port");
    let mut cmd = match (p.value("mode").as_str(), p.opt("target")) {
        ("listen", _) => format!("nc -lvnp {port}"),
        ("connect", Some(target)) => format!("nc {target} {port}"),
        _ => return Err(ParamError::invalid("Invalid parameters for netcat mode")),
    };
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn socat(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(
        &["source", "destination"],
        "Source and destination parameters are required",
    )?;
    let mut cmd = format!("socat {} {}", p.value("source"), p.value("destination"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn msfvenom(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["payload", "lhost"], "Payload and LHOST parameters are required")?;
    let mut cmd = format!(
        "msfvenom -p {} LHOST={} LPORT={} -f {}",
        p.value("payload"),
        p.value("lhost"),
        p.value("lport"),
        p.value("format")
    );
    if let Some(output) = p.opt("output_file") {
        cmd.push_str(&format!(" -o {output}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
