use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitWorkerError {
    #[error("git push requires a remote name")]
    EmptyRemote,
    #[error("failed to run `{command}`: {message}")]
    SpawnFailed { command: String, message: String },
    #[error("`{command}` failed with code {code:?}: {}", .stderr.trim())]
    CommandFailed { command: String, code: Option<i32>, stderr: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external program to completion. Implementations block the caller.
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandResult, std::io::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandExecutor;

impl CommandExecutor for ProcessCommandExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandResult, std::io::Error> {
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        Ok(CommandResult {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Thin wrapper over the git executable, scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitWorker<E = ProcessCommandExecutor> {
    program: String,
    repo_path: PathBuf,
    executor: E,
}

impl GitWorker<ProcessCommandExecutor> {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self::with_executor(repo_path, ProcessCommandExecutor)
    }
}

impl<E: CommandExecutor> GitWorker<E> {
    pub fn with_executor(repo_path: impl Into<PathBuf>, executor: E) -> Self {
        Self { program: "git".to_string(), repo_path: repo_path.into(), executor }
    }

    /// Override the git binary (e.g. an absolute path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn status(&self) -> Result<GitCommandOutput, GitWorkerError> {
        self.run(vec!["status".to_string()])
    }

    /// Create a commit with no file changes.
    pub fn commit_empty(
        &self,
        message: &str,
        no_verify: bool,
    ) -> Result<GitCommandOutput, GitWorkerError> {
        let mut args = vec![
            "commit".to_string(),
            "--allow-empty".to_string(),
            "-m".to_string(),
            message.to_string(),
        ];
        if no_verify {
            args.push("--no-verify".to_string());
        }
        self.run(args)
    }

    pub fn push(&self, remote: &str, refspec: &str) -> Result<GitCommandOutput, GitWorkerError> {
        if remote.trim().is_empty() {
            return Err(GitWorkerError::EmptyRemote);
        }

        let mut args = vec!["push".to_string(), remote.to_string()];
        if !refspec.trim().is_empty() {
            args.push(refspec.to_string());
        }
        self.run(args)
    }

    fn run(&self, args: Vec<String>) -> Result<GitCommandOutput, GitWorkerError> {
        let command = format!("{} {}", self.program, args.join(" "));
        let result =
            self.executor.execute(&self.program, &args, &self.repo_path).map_err(|error| {
                GitWorkerError::SpawnFailed { command: command.clone(), message: error.to_string() }
            })?;

        if result.success {
            return Ok(GitCommandOutput { stdout: result.stdout, stderr: result.stderr });
        }

        let stderr = if result.stderr.trim().is_empty() { result.stdout } else { result.stderr };

        Err(GitWorkerError::CommandFailed { command, code: result.code, stderr })
    }
}
