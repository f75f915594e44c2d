//! Information gathering and OSINT

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

const DOMAIN_REQUIRED: &str = "Domain parameter is required";
const TARGET_REQUIRED: &str = "Target parameter is required";

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("theharvester", theharvester);
    reg.register_tool("reconng", reconng);
    reg.register_tool("shodan", shodan);
    reg.register_tool("spiderfoot", spiderfoot);
    reg.register_tool("dnsenum", dnsenum);
    reg.register_tool("fierce", fierce);
    reg.register_tool("dnsrecon", dnsrecon);
    reg.register_tool("whois", whois);
    reg.register_tool("metagoofil", metagoofil);
}

fn theharvester(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!(
        "theHarvester -d {domain} -b {} -l {}",
        p.value("sources"),
        p.value("limit")
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn reconng(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["module", "target"], "Module and target parameters are required")?;
    let mut cmd = format!(
        "recon-ng -w {} -m {} -o SOURCE={}",
        p.value("workspace"),
        p.value("module"),
        p.value("target")
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn shodan(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let query = p.required("query", "Query parameter is required")?;
    let mut cmd = format!("shodan search --limit {}", p.value("limit"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" '{query}'"));
    Ok(cmd.into())
}

fn spiderfoot(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", TARGET_REQUIRED)?;
    let mut cmd = format!("spiderfoot -s {target} -m {}", p.value("modules"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn dnsenum(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = String::from("dnsenum");
    if let Some(server) = p.opt("dns_server") {
        cmd.push_str(&format!(" --dnsserver {server}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {domain}"));
    Ok(cmd.into())
}

fn fierce(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!("fierce --domain {domain}");
    if let Some(server) = p.opt("dns_server") {
        cmd.push_str(&format!(" --dns-servers {server}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn dnsrecon(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!("dnsrecon -d {domain} -t {}", p.value("scan_type"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn whois(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", TARGET_REQUIRED)?;
    let mut cmd = String::from("whois");
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn metagoofil(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let domain = p.required("domain", DOMAIN_REQUIRED)?;
    let mut cmd = format!(
        "metagoofil -d {domain} -t {} -l {} -o /tmp/metagoofil -f results.html",
        p.value("file_types"),
        p.value("limit")
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
