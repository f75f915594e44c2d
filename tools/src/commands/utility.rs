//! Proxy wrapping and Android package tooling

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("proxychains", proxychains);
    reg.register_tool("apktool", apktool);
}

fn proxychains(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let command = p.required("command", "Command parameter is required")?;
    let mut cmd = String::from("proxychains");
    if let Some(config) = p.opt("config_file") {
        cmd.push_str(&format!(" -f {config}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {command}"));
    Ok(cmd.into())
}

fn apktool(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["mode", "apk_path"], "Mode and APK path parameters are required")?;
    let action = match p.value("mode").as_str() {
        "decode" => "d",
        "build" => "b",
        _ => return Err(ParamError::invalid("Invalid mode. Use 'decode' or 'build'")),
    };
    let mut cmd = format!("apktool {action} {}", p.value("apk_path"));
    if let Some(out) = p.opt("output_dir") {
        cmd.push_str(&format!(" -o {out}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
