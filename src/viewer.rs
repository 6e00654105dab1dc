use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Program and leading arguments of the platform's "open this file" command.
pub fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        return ("open", &[]);
    }
    if cfg!(windows) {
        // `start` is a cmd builtin. The empty string is the window title.
        return ("cmd", &["/C", "start", ""]);
    }
    ("xdg-open", &[])
}

/// Hand the chart to the desktop's default image viewer.
///
/// Returns once the opener command exits. Most openers detach from the
/// viewer, so this does not wait for the window to close.
pub fn show_chart(path: &Path) -> Result<()> {
    let (program, args) = opener();
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("could not run {} to display {}", program, path.display()))?;

    if !status.success() {
        anyhow::bail!("{} exited with {} for {}", program, status, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_matches_platform() {
        let (program, args) = opener();
        if cfg!(target_os = "macos") {
            assert_eq!(program, "open");
        } else if cfg!(windows) {
            assert_eq!(program, "cmd");
            assert_eq!(args, &["/C", "start", ""]);
        } else {
            assert_eq!(program, "xdg-open");
            assert!(args.is_empty());
        }
    }
}
