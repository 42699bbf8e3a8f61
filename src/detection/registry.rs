//! Registry access through the `reg` command line tool.

use crate::host::InstallationRegistry;
use crate::HostError;
use std::path::PathBuf;
use std::process::Command;

/// Reads the local machine hive by running `reg query`.
///
/// `reg` is located with the `which` crate when the registry is built. On
/// hosts without it, every read fails with [`HostError::ToolNotFound`],
/// which refinement treats as "no information".
#[derive(Debug, Clone)]
pub struct RegQueryRegistry {
    program: Option<PathBuf>,
}

impl RegQueryRegistry {
    /// Locate `reg` on the `PATH`.
    pub fn new() -> Self {
        Self {
            program: which::which("reg").ok(),
        }
    }

    /// Use a specific `reg` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }
}

impl Default for RegQueryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallationRegistry for RegQueryRegistry {
    fn read_value(&self, key: &str, value: &str) -> Result<Option<String>, HostError> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| HostError::ToolNotFound("reg".to_string()))?;

        let output = Command::new(program)
            .arg("query")
            .arg(format!(r"HKLM\{key}"))
            .arg("/v")
            .arg(value)
            .output()?;

        // `reg` exits with 1 when the key or value does not exist
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            return Err(HostError::CommandFailed {
                program: program.display().to_string(),
                status: output.status.to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_reg_query_output(&stdout, value)
    }
}

/// Extract `value` from `reg query` output.
///
/// `REG_DWORD` and `REG_QWORD` data is printed in hex and is converted to a
/// decimal string. Other types are returned as printed.
pub(crate) fn parse_reg_query_output(
    output: &str,
    value: &str,
) -> Result<Option<String>, HostError> {
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(kind)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !name.eq_ignore_ascii_case(value) || !kind.starts_with("REG_") {
            continue;
        }

        let data = fields.collect::<Vec<_>>().join(" ");
        if kind == "REG_DWORD" || kind == "REG_QWORD" {
            let hex = data.trim_start_matches("0x");
            let number = u64::from_str_radix(hex, 16)
                .map_err(|_| HostError::InvalidOutput(line.trim().to_string()))?;
            return Ok(Some(number.to_string()));
        }
        return Ok(Some(data));
    }

    Ok(None)
}
