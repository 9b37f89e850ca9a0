//! Dependency installation for a composed project
//!
//! Runs `<package manager> install` in the project root, streaming its output.
//! A failed install never touches the files composition already wrote; the
//! caller reports the error and the manual command.

use crate::error::{ComposeError, Result};
use crate::workspace::PackageManagerKind;
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for installation (10 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs the package manager's install command
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    kind: PackageManagerKind,
    timeout: Duration,
}

impl PackageInstaller {
    pub fn new(kind: PackageManagerKind) -> Self {
        Self {
            kind,
            timeout: INSTALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    /// Command the user can run by hand if installation fails
    pub fn fallback_command(&self, cwd: &Path) -> String {
        format!("cd {} && {}", cwd.display(), self.kind.install_command())
    }

    fn failure(&self, message: impl Into<String>) -> ComposeError {
        ComposeError::Install {
            command: self.kind.install_command(),
            message: message.into(),
        }
    }

    /// Install dependencies in `cwd`
    pub async fn install(&self, cwd: &Path) -> Result<()> {
        let command = self.kind.install_command();
        println!();
        println!("{} {}", "Running:".dimmed(), command.yellow());
        println!();

        tracing::info!(cwd = %cwd.display(), %command, "running installer");

        let mut child = TokioCommand::new(self.kind.name())
            .arg("install")
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(format!("could not start {}: {}", self.kind.name(), e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failure("stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.failure("stderr not captured"))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let output_task = async {
            let mut stderr_open = true;
            loop {
                tokio::select! {
                    line = stdout_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => break,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                break;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                }
            }
        };

        if timeout(self.timeout, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            return Err(self.failure(format!(
                "timed out after {} seconds",
                self.timeout.as_secs()
            )));
        }

        match timeout(Duration::from_secs(30), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    Err(self.failure(format!(
                        "exited with code {}",
                        status.code().unwrap_or(-1)
                    )))
                }
            }
            Ok(Err(e)) => Err(self.failure(format!("failed to wait for installer: {}", e))),
            Err(_) => {
                let _ = child.kill().await;
                Err(self.failure("installer process hung"))
            }
        }
    }
}
