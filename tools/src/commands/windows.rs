//! Windows and Active Directory

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("enum4linux", enum4linux);
    reg.register_tool("responder", responder);
    reg.register_tool("impacket", impacket);
    reg.register_tool("evil_winrm", evil_winrm);
    reg.register_tool("kerbrute", kerbrute);
    reg.register_tool("mimikatz", mimikatz);
}

// additional_args sits before the target here and defaults to -a
fn enum4linux(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    Ok(format!("enum4linux {} {target}", p.value("additional_args")).into())
}

fn responder(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let iface = p.required("interface", "Interface parameter is required")?;
    let mut cmd = format!("responder -I {iface}");
    if p.flag("analyze") {
        cmd.push_str(" -A");
    }
    if p.flag("wpad") {
        cmd.push_str(" -w");
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn impacket(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["script", "target"], "Script and target parameters are required")?;
    let user = p.opt("username");
    let hash = p.opt("hash");
    let auth = match (&user, p.opt("password"), &hash) {
        (Some(user), Some(password), _) => format!("{user}:{password}@"),
        (Some(user), None, Some(_)) => format!("{user}@"),
        _ => String::new(),
    };

    let mut cmd = format!("{}.py {auth}{}", p.value("script"), p.value("target"));
    if let (Some(hash), Some(_)) = (&hash, &user) {
        cmd.push_str(&format!(" -hashes :{hash}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn evil_winrm(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["target", "username"], "Target and username parameters are required")?;
    let mut cmd = format!("evil-winrm -i {} -u {}", p.value("target"), p.value("username"));
    if let Some(password) = p.opt("password") {
        cmd.push_str(&format!(" -p {password}"));
    } else if let Some(hash) = p.opt("hash") {
        cmd.push_str(&format!(" -H {hash}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn kerbrute(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["domain", "dc_ip"], "Domain and DC IP parameters are required")?;
    let mut cmd = format!(
        "kerbrute {} --dc {} -d {}",
        p.value("mode"),
        p.value("dc_ip"),
        p.value("domain")
    );
    if let Some(wordlist) = p.opt("wordlist") {
        cmd.push_str(&format!(" {wordlist}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn mimikatz(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let command = p.required("command", "Command parameter is required")?;
    let mut cmd = format!("mimikatz '{command}'");
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
