use std::path::PathBuf;

use crate::compile;
use crate::config::Config;
use crate::display;
use crate::errors::SweepError;
use crate::sweep;
use crate::types::ResultSet;

/// Work out which program to sweep, compiling it first when the build is enabled.
///
/// A failed build returns before anything is invoked. With the build
/// disabled, an explicit executable wins over the configured build output.
pub fn prepare_executable<W>(config: &Config, emit: &mut W) -> Result<PathBuf, SweepError>
where
    W: FnMut(&str),
{
    if config.build_enabled {
        emit(&display::format_build_start(&config.build));
        let built = config.build.run()?;
        return Ok(config.executable.clone().unwrap_or(built));
    }

    Ok(config
        .executable
        .clone()
        .unwrap_or_else(|| compile::executable_path(&config.build.output)))
}

/// Build (if enabled) and sweep. Progress text is passed to `emit` as it happens.
pub fn execute<W>(config: &Config, mut emit: W) -> Result<ResultSet, SweepError>
where
    W: FnMut(&str),
{
    let executable = prepare_executable(config, &mut emit)?;

    tracing::info!(
        executable = %executable.display(),
        invocations = config.plan.invocation_count(),
        "starting sweep"
    );

    let results = sweep::run_sweep(&executable, &config.plan, |event| {
        if let Some(line) = display::format_event(event) {
            emit(&line);
        }
    });

    Ok(results)
}
