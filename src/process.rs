//! External command execution.
//!
//! Small builder over [`std::process::Command`] used for every CMake
//! invocation. Exit status is always checked: a nonzero exit aborts the
//! pipeline unless the caller opted out with [`Cmd::allow_fail`].

use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Builder for an external command invocation.
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    error_msg: Option<String>,
    allow_fail: bool,
}

/// Captured result of a [`Cmd::run`] invocation.
#[derive(Debug)]
pub struct CmdResult {
    status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CmdResult {
    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl Cmd {
    /// Start building an invocation of `program`.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            error_msg: None,
            allow_fail: false,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(OsString::from(arg.into()));
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.args.push(OsString::from(arg.into()));
        }
        self
    }

    /// Append a path argument without lossy conversion.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_os_string());
        self
    }

    /// Message appended to the error when the command fails.
    ///
    /// Use this for operator guidance ("Install: sudo dnf install cmake").
    pub fn error_msg(mut self, msg: &str) -> Self {
        self.error_msg = Some(msg.to_string());
        self
    }

    /// Treat a nonzero exit as a normal result instead of an error.
    ///
    /// Spawn failures (program missing) still error.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Run the command, capturing stdout and stderr.
    pub fn run(self) -> Result<CmdResult> {
        let rendered = self.render();
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("failed to run '{}'", rendered))?;

        let result = CmdResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() && !self.allow_fail {
            return Err(self.failure_error(&rendered, result.status, result.stderr.trim()));
        }

        Ok(result)
    }

    /// Run the command with stdio inherited from this process.
    ///
    /// Use for long-running invocations whose output the operator should
    /// see as it happens (CMake configure and builds).
    pub fn run_interactive(self) -> Result<()> {
        let rendered = self.render();
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .with_context(|| format!("failed to run '{}'", rendered))?;

        if !status.success() && !self.allow_fail {
            return Err(self.failure_error(&rendered, status, ""));
        }

        Ok(())
    }

    /// Command line as a display string for error messages.
    fn render(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }

    fn failure_error(&self, rendered: &str, status: ExitStatus, stderr: &str) -> anyhow::Error {
        let mut msg = format!("'{}' exited with {}", rendered, status);
        if !stderr.is_empty() {
            msg.push('\n');
            msg.push_str(stderr);
        }
        if let Some(hint) = &self.error_msg {
            msg.push('\n');
            msg.push_str(hint);
        }
        anyhow::anyhow!(msg)
    }
}

/// Locate `program` on `PATH`, returning its full path if found.
pub fn which(program: &str) -> Option<String> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(program);
        let is_executable = candidate
            .metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false);
        if is_executable {
            return Some(candidate.display().to_string());
        }
    }
    None
}

/// Check if `program` is available on `PATH`.
pub fn exists(program: &str) -> bool {
    which(program).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists_common_tool() {
        // sh exists on any Unix system
        assert!(exists("sh"));
    }

    #[test]
    fn test_exists_nonexistent() {
        assert!(!exists("definitely_not_a_real_command_12345"));
    }

    #[test]
    fn test_which_returns_path() {
        let path = which("sh").expect("sh should be on PATH");
        assert!(path.ends_with("sh"));
    }

    #[test]
    fn test_run_captures_stdout() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_nonzero_exit_is_error() {
        let err = Cmd::new("sh").args(["-c", "exit 3"]).run().unwrap_err();
        assert!(format!("{:#}", err).contains("exited with"));
    }

    #[test]
    fn test_run_nonzero_exit_allowed() {
        let result = Cmd::new("sh").args(["-c", "exit 3"]).allow_fail().run().unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_run_interactive_nonzero_exit_is_error() {
        let err = Cmd::new("sh")
            .args(["-c", "exit 3"])
            .error_msg("fix the build and re-run")
            .run_interactive()
            .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("exited with"));
        assert!(msg.contains("fix the build and re-run"));
    }

    #[test]
    fn test_error_msg_appears_in_failure() {
        let err = Cmd::new("sh")
            .args(["-c", "exit 1"])
            .error_msg("install the thing first")
            .run()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("install the thing first"));
    }

    #[test]
    fn test_spawn_failure_is_error_even_with_allow_fail() {
        let result = Cmd::new("definitely_not_a_real_command_12345")
            .allow_fail()
            .run();
        assert!(result.is_err());
    }
}
