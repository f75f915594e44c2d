//! Web application scanning

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

const GOBUSTER_MODES: [&str; 4] = ["dir", "dns", "fuzz", "vhost"];
const URL_REQUIRED: &str = "URL parameter is required";
const TARGET_REQUIRED: &str = "Target parameter is required";
const DOMAIN_REQUIRED: &str = "Domain parameter is required";

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("gobuster", gobuster);
    reg.register_tool("dirb", dirb);
    reg.register_tool("nikto", nikto);
    reg.register_tool("wpscan", wpscan);
    reg.register_tool("sqlmap", sqlmap);
    reg.register_tool("zap", zap);
    reg.register_tool("wfuzz", wfuzz);
    reg.register_tool("ffuf", ffuf);
    reg.register_tool("whatweb", whatweb);
    reg.register_tool("sublist3r", sublist3r);
    reg.register_tool("amass", amass);
    reg.register_tool("wapiti", wapiti);
    reg.register_tool("commix", commix);
    reg.register_tool("xsstrike", xsstrike);
    reg.register_tool("skipfish", skipfish);
}

fn gobuster(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mode = p.value("mode");
    if !GOBUSTER_MODES.contains(&mode.as_str()) {
        tracing::warn!("Invalid gobuster mode: {mode}");
        return Err(ParamError::invalid(format!(
            "Invalid mode: {mode}. Must be one of: {}",
            GOBUSTER_MODES.join(", ")
        )));
    }
    let mut cmd = format!("gobuster {mode} -u {url} -w {}", p.value("wordlist"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn dirb(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("dirb {url} {}", p.value("wordlist"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn nikto(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", TARGET_REQUIRED)?;
    let mut cmd = format!("nikto -h {target}");
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn wpscan(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("wpscan --url {url}");
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn sqlmap(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("sqlmap -u {url} --batch");
    if let Some(data) = p.opt("data") {
        cmd.push_str(&format!(" --data=\"{data}\""));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn zap(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", TARGET_REQUIRED)?;
    let mut cmd = format!("zap-{}.py -t {target}", p.value("scan_type"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn wfuzz(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("wfuzz -w {}", p.value("wordlist"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {url}"));
    Ok(cmd.into())
}

fn ffuf(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("ffuf -u {url} -w {}", p.value("wordlist"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn whatweb(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", TARGET_REQUIRED)?;
    let mut cmd = format!("whatweb -a {}", p.value("aggression"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn sublist3r(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!("sublist3r -d {domain}");
    if p.flag("bruteforce") {
        cmd.push_str(" -b");
    }
    if let Some(ports) = p.opt("ports") {
        cmd.push_str(&format!(" -p {ports}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn amass(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!("amass {} -d {domain}", p.value("mode"));
    if p.flag("passive") {
        cmd.push_str(" -passive");
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn wapiti(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("wapiti -u {url} --scope {}", p.value("scope"));
    if let Some(modules) = p.opt("modules") {
        cmd.push_str(&format!(" -m {modules}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn commix(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("commix --url={url} --batch");
    if let Some(data) = p.opt("data") {
        cmd.push_str(&format!(" --data='{data}'"));
    }
    if let Some(cookie) = p.opt("cookie") {
        cmd.push_str(&format!(" --cookie='{cookie}'"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn xsstrike(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("xsstrike -u {url}");
    if let Some(data) = p.opt("data") {
        cmd.push_str(&format!(" --data '{data}'"));
    }
    if p.flag("crawl") {
        cmd.push_str(" --crawl");
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn skipfish(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let url = p.required("url", URL_REQUIRED)?;
    let mut cmd = format!("skipfish -o {}", p.value("output_dir"));
    if let Some(wordlist) = p.opt("wordlist") {
        cmd.push_str(&format!(" -W {wordlist}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {url}"));
    Ok(cmd.into())
}
