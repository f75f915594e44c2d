//! Wireless attacks

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

const INTERFACE_AND_BSSID_REQUIRED: &str = "Interface and BSSID parameters are required";

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("aircrack", aircrack);
    reg.register_tool("reaver", reaver);
    reg.register_tool("bully", bully);
    reg.register_tool("wifite", wifite);
    reg.register_tool("kismet", kismet);
}

fn aircrack(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let capture = p.required("capture_file", "Capture file parameter is required")?;
    let mut cmd = format!("aircrack-ng -w {}", p.value("wordlist"));
    if let Some(bssid) = p.opt("bssid") {
        cmd.push_str(&format!(" -b {bssid}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {capture}"));
    Ok(cmd.into())
}

fn reaver(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["interface", "bssid"], INTERFACE_AND_BSSID_REQUIRED)?;
    let mut cmd = format!("reaver -i {} -b {}", p.value("interface"), p.value("bssid"));
    push_channel(&mut cmd, p);
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn bully(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["interface", "bssid"], INTERFACE_AND_BSSID_REQUIRED)?;
    let mut cmd = format!("bully {} -b {}", p.value("interface"), p.value("bssid"));
    push_channel(&mut cmd, p);
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn push_channel(cmd: &mut String, p: &Params<'_>) {
    if let Some(channel) = p.opt("channel") {
        cmd.push_str(&format!(" -c {channel}"));
    }
}

fn wifite(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = String::from("wifite");
    if let Some(iface) = p.opt("interface") {
        cmd.push_str(&format!(" -i {iface}"));
    }
    if let Some(bssid) = p.opt("target_bssid") {
        cmd.push_str(&format!(" --bssid {bssid}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn kismet(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let iface = p.required("interface", "Interface parameter is required")?;
    let mut cmd = format!("timeout {} kismet -c {iface}", p.value("duration"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
