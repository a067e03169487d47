//! Running `llvm-cov export`

use super::LlvmExport;
use crate::result::{LinecovError, LinecovResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Program name used when no explicit `llvm-cov` is configured
pub const DEFAULT_LLVM_COV: &str = "llvm-cov";

/// Handle on an `llvm-cov` executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlvmCovTool {
    program: PathBuf,
}

impl Default for LlvmCovTool {
    fn default() -> Self {
        Self::new(DEFAULT_LLVM_COV)
    }
}

impl LlvmCovTool {
    /// Use `program` as the `llvm-cov` executable
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The configured executable
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to `llvm-cov` for one export
    #[must_use]
    pub fn export_args(binary: &Path, profdata: &Path) -> Vec<String> {
        vec![
            "export".to_string(),
            "-format=text".to_string(),
            format!("-instr-profile={}", profdata.display()),
            binary.display().to_string(),
        ]
    }

    /// Export the coverage of `binary` recorded in `profdata`
    ///
    /// # Errors
    ///
    /// Returns [`LinecovError::ToolFailed`] if the tool cannot be started or
    /// exits unsuccessfully, and a parse error if its output is not a valid
    /// export
    pub fn export(&self, binary: &Path, profdata: &Path) -> LinecovResult<LlvmExport> {
        let tool = self.program.display().to_string();
        let args = Self::export_args(binary, profdata);
        debug!(%tool, ?args, "running coverage export");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| LinecovError::tool_failed(&tool, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                text => text.to_string(),
            };
            return Err(LinecovError::tool_failed(tool, message));
        }

        let export = LlvmExport::from_json(&String::from_utf8_lossy(&output.stdout))?;
        info!(files = export.len(), "loaded coverage export");
        Ok(export)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args() {
        let args = LlvmCovTool::export_args(Path::new("bin/app"), Path::new("default.profdata"));
        assert_eq!(
            args,
            vec![
                "export",
                "-format=text",
                "-instr-profile=default.profdata",
                "bin/app"
            ]
        );
    }

    #[test]
    fn test_default_program() {
        assert_eq!(LlvmCovTool::default().program(), Path::new("llvm-cov"));
    }

    #[test]
    fn test_missing_tool_is_tool_failure() {
        let tool = LlvmCovTool::new("/nonexistent/llvm-cov-for-tests");
        let err = tool
            .export(Path::new("app"), Path::new("default.profdata"))
            .unwrap_err();
        match err {
            LinecovError::ToolFailed { tool, .. } => {
                assert_eq!(tool, "/nonexistent/llvm-cov-for-tests");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_tool_failure() {
        let tool = LlvmCovTool::new("false");
        let err = tool
            .export(Path::new("app"), Path::new("default.profdata"))
            .unwrap_err();
        assert!(matches!(err, LinecovError::ToolFailed { .. }));
    }
}
