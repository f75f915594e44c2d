//! Network scanning — nmap, masscan, netdiscover, hping3, unicornscan,
//! arping, tcpdump and tshark.

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("nmap", nmap);
    reg.register_tool("masscan", masscan);
    reg.register_tool("netdiscover", netdiscover);
    reg.register_tool("hping3", hping3);
    reg.register_tool("unicornscan", unicornscan);
    reg.register_tool("arping", arping);
    reg.register_tool("tcpdump", tcpdump);
    reg.register_tool("tshark", tshark);
}

fn nmap(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!("nmap {}", p.value("scan_type"));
    if let Some(ports) = p.opt("ports") {
        cmd.push_str(&format!(" -p {ports}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn masscan(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!(
        "masscan {target} -p{} --rate {}",
        p.value("ports"),
        p.value("rate")
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn netdiscover(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = String::from("netdiscover");
    if let Some(range) = p.opt("range") {
        cmd.push_str(&format!(" -r {range}"));
    }
    if let Some(iface) = p.opt("interface") {
        cmd.push_str(&format!(" -i {iface}"));
    }
    if p.flag("passive_mode") {
        cmd.push_str(" -p");
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn hping3(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mode = match p.value("mode").as_str() {
        "udp" => "--udp",
        "icmp" => "--icmp",
        "raw" => "--rawip",
        _ => "-S",
    };
    let mut cmd = format!("hping3 {mode} -p {} -c {}", p.value("port"), p.value("count"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn unicornscan(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    // anything but tcp scans udp
    let mode = if p.value("mode") == "tcp" { "T" } else { "U" };
    let mut cmd = format!("unicornscan -m{mode} -p {}", p.value("ports"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn arping(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!("arping -c {}", p.value("count"));
    if let Some(iface) = p.opt("interface") {
        cmd.push_str(&format!(" -I {iface}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {target}"));
    Ok(cmd.into())
}

fn tcpdump(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = format!("tcpdump -i {} -c {}", p.value("interface"), p.value("count"));
    if let Some(out) = p.opt("output_file") {
        cmd.push_str(&format!(" -w {out}"));
    }
    p.append_args(&mut cmd);
    if let Some(filter) = p.opt("filter_expr") {
        cmd.push_str(&format!(" '{filter}'"));
    }
    Ok(cmd.into())
}

fn tshark(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let mut cmd = match p.opt("read_file") {
        Some(file) => format!("tshark -r {file}"),
        None => format!("tshark -i {} -c {}", p.value("interface"), p.value("count")),
    };
    if let Some(filter) = p.opt("filter_expr") {
        cmd.push_str(&format!(" -Y '{filter}'"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}
