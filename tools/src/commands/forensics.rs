//! Forensics — firmware analysis and file carving

use super::{ParamError, Params, Rendered};
use crate::registry::Registry;

const FILE_PATH_REQUIRED: &str = "File path parameter is required";

pub fn register_tools(reg: &mut Registry) {
    reg.register_tool("binwalk", binwalk);
    reg.register_tool("foremost", foremost);
}

fn binwalk(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let file = p.required("file_path", FILE_PATH_REQUIRED)?;
    let mut cmd = String::from("binwalk");
    if p.flag("extract") {
        cmd.push_str(" -e");
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" {file}"));
    Ok(cmd.into())
}

fn foremost(p: &Params<'_>) -> Result<Rendered, ParamError> {
    let file = p.required("file_path", FILE_PATH_REQUIRED)?;
    let mut cmd = format!("foremost -o {}", p.value("output_dir"));
    if let Some(types) = p.opt("file_types") {
        cmd.push_str(&format!(" -t {types}"));
    }
    p.append_args(&mut cmd);
    cmd.push_str(&format!(" -i {file}"));
    Ok(cmd.into())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::{command, error};
    use serde_json::json;

    #[test]
    fn test_binwalk() {
        assert_eq!(command("binwalk", json!({"file_path": "fw.bin"})), "binwalk fw.bin");
        assert_eq!(error("binwalk", json!({})), "File path parameter is required");
    }

    #[test]
    fn test_foremost_input_last() {
        assert_eq!(
            command("foremost", json!({"file_path": "disk.img", "file_types": "jpg,pdf"})),
            "foremost -o /tmp/foremost_output -t jpg,pdf -i disk.img"
        );
    }
}
