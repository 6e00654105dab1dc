use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::compile::BuildSpec;
use crate::errors::SweepError;
use crate::render::ChartSpec;
use crate::sweep::SweepPlan;
use crate::types::{DEFAULT_MAX_THREADS, DEFAULT_WORKLOAD_SIZES};

/// File looked for in the working directory when `--config` is not given.
pub const LOCAL_CONFIG_FILE: &str = "threadsweep.toml";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub build: BuildSpec,
    /// Skip compilation and invoke `executable` (or the build output) directly.
    pub build_enabled: bool,
    pub executable: Option<PathBuf>,
    pub plan: SweepPlan,
    pub chart: ChartSpec,
    pub show_chart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildSpec::default(),
            build_enabled: true,
            executable: None,
            plan: SweepPlan {
                workloads: DEFAULT_WORKLOAD_SIZES.to_vec(),
                max_threads: DEFAULT_MAX_THREADS,
                timeout: None,
            },
            chart: ChartSpec::default(),
            show_chart: true,
        }
    }
}

/// Values taken from the command line. `None` leaves the file/default value alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub workloads: Option<Vec<u64>>,
    pub max_threads: Option<u32>,
    pub compiler: Option<String>,
    pub source: Option<PathBuf>,
    pub executable: Option<PathBuf>,
    pub no_build: bool,
    pub chart: Option<PathBuf>,
    pub timeout_secs: Option<f64>,
    pub no_show: bool,
}

impl Config {
    /// Load the config file (if any), apply `overrides` and validate.
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self, SweepError> {
        let raw = match config_path(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                read_file(&path)?
            }
            None => RawConfig::default(),
        };
        Self::resolve(raw, overrides)
    }

    /// Layer file values and then CLI overrides on top of the defaults.
    pub fn resolve(raw: RawConfig, overrides: &Overrides) -> Result<Self, SweepError> {
        let mut config = Config::default();

        if let Some(compiler) = raw.build.compiler {
            config.build.compiler = compiler;
        }
        if let Some(flags) = raw.build.flags {
            config.build.flags = flags;
        }
        if let Some(source) = raw.build.source {
            config.build.source = source;
        }
        if let Some(output) = raw.build.output {
            config.build.output = output;
        }
        if let Some(enabled) = raw.build.enabled {
            config.build_enabled = enabled;
        }
        config.executable = raw.build.executable;

        if let Some(workloads) = raw.sweep.workload_sizes {
            config.plan.workloads = workloads;
        }
        if let Some(max_threads) = raw.sweep.max_threads {
            config.plan.max_threads = max_threads;
        }
        let mut timeout_secs = raw.sweep.timeout_secs;

        if let Some(path) = raw.chart.path {
            config.chart.path = path;
        }
        if let Some(title) = raw.chart.title {
            config.chart.title = title;
        }
        if let Some(width) = raw.chart.width {
            config.chart.width = width;
        }
        if let Some(height) = raw.chart.height {
            config.chart.height = height;
        }
        if let Some(show) = raw.chart.show {
            config.show_chart = show;
        }

        if let Some(workloads) = &overrides.workloads {
            config.plan.workloads = workloads.clone();
        }
        if let Some(max_threads) = overrides.max_threads {
            config.plan.max_threads = max_threads;
        }
        if let Some(compiler) = &overrides.compiler {
            config.build.compiler = compiler.clone();
        }
        if let Some(source) = &overrides.source {
            config.build.source = source.clone();
        }
        if let Some(executable) = &overrides.executable {
            config.executable = Some(executable.clone());
        }
        if overrides.no_build {
            config.build_enabled = false;
        }
        if let Some(chart) = &overrides.chart {
            config.chart.path = chart.clone();
        }
        if overrides.timeout_secs.is_some() {
            timeout_secs = overrides.timeout_secs;
        }
        if overrides.no_show {
            config.show_chart = false;
        }

        config.plan.timeout = match timeout_secs {
            None => None,
            Some(secs) if secs > 0.0 => Some(
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| invalid(format!("timeout of {} seconds is out of range", secs)))?,
            ),
            Some(secs) => {
                return Err(invalid(format!("timeout must be a positive number of seconds, got {}", secs)));
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SweepError> {
        if self.plan.max_threads == 0 {
            return Err(invalid("max_threads must be at least 1".to_string()));
        }
        if self.plan.workloads.is_empty() {
            return Err(invalid("at least one workload size is required".to_string()));
        }
        if self.plan.workloads.contains(&0) {
            return Err(invalid("workload sizes must be greater than zero".to_string()));
        }
        for (i, size) in self.plan.workloads.iter().enumerate() {
            if self.plan.workloads[..i].contains(size) {
                return Err(invalid(format!("workload size {} is listed more than once", size)));
            }
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(invalid(format!(
                "chart dimensions must be non-zero, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}

fn invalid(detail: String) -> SweepError {
    SweepError::InvalidConfig { detail }
}

/// Pick the config file to read: the explicit path, then `./threadsweep.toml`,
/// then the per-user config directory. Implicit locations are only used if
/// they exist; an explicit path is always returned so a typo is reported.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|p| p.is_file())
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("threadsweep").join("config.toml"))
}

fn read_file(path: &Path) -> Result<RawConfig, SweepError> {
    let contents = fs::read_to_string(path).map_err(|source| SweepError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| SweepError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    build: BuildSection,
    #[serde(default)]
    sweep: SweepSection,
    #[serde(default)]
    chart: ChartSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildSection {
    compiler: Option<String>,
    flags: Option<Vec<String>>,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    executable: Option<PathBuf>,
    enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SweepSection {
    workload_sizes: Option<Vec<u64>>,
    max_threads: Option<u32>,
    timeout_secs: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChartSection {
    path: Option<PathBuf>,
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    show: Option<bool>,
}
