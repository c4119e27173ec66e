//! Machine state probes
//!
//! Implements the engine's `StateProbe` seam against the real machine:
//! installed build numbers come from `reg query`, markers from the
//! filesystem. The engine treats an unreadable probe as "apply", so
//! failures here are reported, never swallowed into a skip.

use deploykit::{Build, Error, Result, StateProbe};
use std::path::Path;
use std::process::Command;

/// Probes registry values and file existence on the target machine
pub struct MachineProbe;

impl MachineProbe {
    fn query_value(&self, key_path: &str, value_name: &str) -> Result<Option<String>> {
        let output = Command::new("reg")
            .args(["query", key_path, "/v", value_name])
            .output()
            .map_err(|e| Error::ProbeUnavailable(format!("could not run reg query: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // "unable to find" means the key simply isn't there; anything
            // else (access denied, bad hive) is a real probe failure.
            if stderr.to_ascii_lowercase().contains("unable to find") {
                return Ok(None);
            }
            return Err(Error::ProbeUnavailable(stderr.trim().to_string()));
        }

        Ok(parse_reg_value(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl StateProbe for MachineProbe {
    fn installed_build(&self, key: &str) -> Result<Option<Build>> {
        // The probe key names the value in its last segment
        let (key_path, value_name) = split_probe_key(key)
            .ok_or_else(|| Error::ProbeUnavailable(format!("malformed probe key '{key}'")))?;

        match self.query_value(key_path, value_name)? {
            Some(value) => {
                let build = value
                    .parse()
                    .map_err(|e: String| Error::ProbeUnavailable(e))?;
                Ok(Some(build))
            }
            None => Ok(None),
        }
    }

    fn file_exists(&self, path: &Path) -> Result<bool> {
        Ok(path.exists())
    }
}

/// Split `HKLM\...\Common\ProductVersion` into key path and value name
fn split_probe_key(key: &str) -> Option<(&str, &str)> {
    let idx = key.rfind('\\')?;
    let (path, value) = key.split_at(idx);
    let value = &value[1..];
    if path.is_empty() || value.is_empty() {
        None
    } else {
        Some((path, value))
    }
}

/// Pull the value data out of `reg query` output
///
/// Expected shape, whitespace-separated:
/// `    ProductVersion    REG_SZ    14.0.6029.1000`
fn parse_reg_value(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let _name = fields.next()?;
        let kind = fields.next()?;
        if !kind.starts_with("REG_") {
            return None;
        }
        let value = fields.next()?;
        Some(value.to_string())
    })
}
