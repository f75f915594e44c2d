//! Password cracking and login brute-forcing

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

const HASH_FILE_REQUIRED: &str = "Hash file parameter is required";
const TARGET_AND_SERVICE_REQUIRED: &str = "Target and service parameters are required";

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("hydra", hydra);
    reg.register_tool("john", john);
    reg.register_tool("hashcat", hashcat);
    reg.register_tool("medusa", medusa);
    reg.register_tool("crackmapexec", crackmapexec);
    reg.register_tool("patator", patator);
    reg.register_tool("fcrackzip", fcrackzip);
}

/// Single value wins over the list file: ` <single> v` or ` <list> f`
fn push_credential(
    cmd: &mut String,
    p: &Params<'_>,
    (single, single_flag): (&str, &str),
    (list, list_flag): (&str, &str),
) {
    if let Some(value) = p.opt(single) {
        cmd.push_str(&format!(" {single_flag} {value}"));
    } else if let Some(file) = p.opt(list) {
        cmd.push_str(&format!(" {list_flag} {file}"));
    }
}

fn hydra(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["target", "service"], TARGET_AND_SERVICE_REQUIRED)?;
    let has_user = p.opt("username").is_some() || p.opt("username_file").is_some();
    let has_pass = p.opt("password").is_some() || p.opt("password_file").is_some();
    if !has_user || !has_pass {
        return Err(ParamError::missing(
            "Username/username_file and password/password_file are required",
        ));
    }

    let mut cmd = String::from("hydra -t 4");
    push_credential(&mut cmd, p, ("username", "-l"), ("username_file", "-L"));
    push_credential(&mut cmd, p, ("password", "-p"), ("password_file", "-P"));
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {} {}", p.value("target"), p.value("service")));
    Ok(cmd.into())
}

fn john(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let hash_file = p.required("hash_file", HASH_FILE_REQUIRED)?;
    let mut cmd = String::from("john");
    if let Some(format) = p.opt("format") {
        cmd.push_str(&format!(" --format={format}"));
    }
    if let Some(wordlist) = p.opt("wordlist") {
        cmd.push_str(&format!(" --wordlist={wordlist}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {hash_file}"));
    Ok(cmd.into())
}

fn hashcat(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let hash_file = p.required("hash_file", HASH_FILE_REQUIRED)?;
    let mut cmd = format!(
        "hashcat -m {} -a {} {hash_file} {}",
        p.value("hash_type"),
        p.value("attack_mode"),
        p.value("wordlist")
    );
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn medusa(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["target", "service"], TARGET_AND_SERVICE_REQUIRED)?;
    let mut cmd = format!("medusa -h {} -M {}", p.value("target"), p.value("service"));
    push_credential(&mut cmd, p, ("username", "-u"), ("username_file", "-U"));
    push_credential(&mut cmd, p, ("password", "-p"), ("password_file", "-P"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn crackmapexec(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let target = p.required("target", "Target parameter is required")?;
    let mut cmd = format!("crackmapexec {} {target}", p.value("protocol"));
    if let Some(user) = p.opt("username") {
        cmd.push_str(&format!(" -u {user}"));
    }
    push_credential(&mut cmd, p, ("password", "-p"), ("hash", "-H"));
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn patator(p: &Params<'_>) -> Result<Rendered, ParamError> {
    p.require_all(&["module", "target"], "Module and target parameters are required")?;
    let mut cmd = format!("patator {} host={}", p.value("module"), p.value("target"));
    if let Some(users) = p.opt("username_file") {
        cmd.push_str(&format!(" user=FILE0 0={users}"));
    }
    if let Some(passwords) = p.opt("password_file") {
        cmd.push_str(&format!(" password=FILE1 1={passwords}"));
    }
    p.append_args(&mut cmd);
    Ok(cmd.into())
}

fn fcrackzip(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let zip_file = p.required("zip_file", "ZIP file parameter is required")?;
    let mut cmd = if p.flag("bruteforce") {
        format!("fcrackzip -b -c '{}' -l 1-8", p.value("charset"))
    } else if let Some(wordlist) = p.opt("wordlist") {
        format!("fcrackzip -D -p {wordlist}")
    } else {
        return Err(ParamError::invalid("Either wordlist or bruteforce mode required"));
    };
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {zip_file}"));
    Ok(cmd.into())
}
