use std::path::{Path, PathBuf};
use std::io;
use std::process::{Command, Stdio};

use crate::errors::SweepError;

/// How to compile the benchmarked program.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSpec {
    pub compiler: String,
    pub flags: Vec<String>,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flags: vec!["-O3".to_string(), "-pthread".to_string()],
            source: PathBuf::from("main.cpp"),
            output: PathBuf::from("main"),
        }
    }
}

impl BuildSpec {
    /// Full argument list passed to the compiler: `<flags...> <source> -o <output>`.
    pub fn args(&self) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push(self.source.to_string_lossy().into_owned());
        args.push("-o".to_string());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Human-readable command line, used in logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.compiler.clone();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }

    /// Run the compiler and return the path the built program can be invoked by.
    ///
    /// Compiler diagnostics go to our stderr, stdout included, so they reach
    /// the operator without mixing into machine-readable output. Any non-zero
    /// exit (or death by signal) is an error.
    pub fn run(&self) -> Result<PathBuf, SweepError> {
        tracing::info!(command = %self.command_line(), "compiling");

        let status = Command::new(&self.compiler)
            .args(self.args())
            .stdout(Stdio::from(io::stderr()))
            .status()
            .map_err(|source| SweepError::BuildSpawn {
                compiler: self.compiler.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SweepError::BuildFailed {
                command: self.command_line(),
                status: status.to_string(),
            });
        }

        Ok(executable_path(&self.output))
    }
}

/// Path a freshly built program is invoked by.
///
/// A bare file name would be looked up on `PATH`, so on Unix it is anchored
/// to the current directory. On Windows `.exe` is added when the name has
/// no extension.
pub fn executable_path(output: &Path) -> PathBuf {
    let mut path = output.to_path_buf();

    if cfg!(windows) && path.extension().is_none() {
        path.set_extension("exe");
    }

    let has_dir = path
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if !has_dir && !path.is_absolute() {
        path = Path::new(".").join(path);
    }

    path
}
