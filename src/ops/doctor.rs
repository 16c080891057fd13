//! Environment health checks.
//!
//! The `doctor` command verifies that the host lookup programs Manifold
//! shells out to are installed.
//!
//! ## Checks Performed
//!
//! - Unit locator / compiled-flags tool (required for external discovery)
//! - Host package name resolution tool (required for packaging listings)
//! - Generic package-config tool (optional discovery fallback)
//! - Host package database query tool (optional ownership fallback)
//! - Distribution selection (optional, can come from the description)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::util::config::Config;
use crate::util::process::find_executable;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..CheckResult::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    pub checks: Vec<CheckResult>,
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        DoctorReport::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Distribution named on the command line or in the environment
    pub distro: Option<String>,
}

/// Run the doctor checks against the configured tools.
pub fn doctor(config: &Config, options: &DoctorOptions) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());

    let tools = &config.tools;
    report.add(check_tool("find", tools.find_tool(), "locates units and their flags"));
    report.add(check_tool(
        "resolve",
        tools.resolve_tool(),
        "maps dependencies to host packages",
    ));
    report.add(
        check_tool(
            "pkg-config",
            tools.pkg_config_tool(),
            "discovery fallback for plain libraries",
        )
        .optional(),
    );
    report.add(
        check_tool(
            "host-query",
            tools.host_query_tool(),
            "finds the host package owning a file",
        )
        .optional(),
    );
    report.add(check_distribution(config, options));

    report.total_duration = start.elapsed();
    report
}

fn check_tool(name: &str, program: &str, purpose: &str) -> CheckResult {
    let start = Instant::now();

    match find_executable(program) {
        Some(path) => CheckResult::pass(name, format!("`{}` {}", program, purpose))
            .with_path(path)
            .with_duration(start.elapsed()),
        None => CheckResult::fail(name, format!("`{}` not found on PATH ({})", program, purpose))
            .with_duration(start.elapsed()),
    }
}

fn check_distribution(config: &Config, options: &DoctorOptions) -> CheckResult {
    let result = match options.distro.as_deref().or(config.distribution.name.as_deref()) {
        Some(name) => CheckResult::pass("distribution", format!("using `{}`", name)),
        None => CheckResult::fail(
            "distribution",
            "no distribution configured; Distribution.toml must name one",
        ),
    };
    result.optional()
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str("Manifold Doctor\n");
    output.push_str("===============\n\n");

    if verbose {
        let unknown = "unknown".to_string();
        output.push_str("Environment:\n");
        output.push_str(&format!(
            "  OS: {} ({})\n\n",
            report.environment.get("os").unwrap_or(&unknown),
            report.environment.get("arch").unwrap_or(&unknown)
        ));
    }

    output.push_str("Checks:\n");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };
        output.push_str(&format!("  {} {}{}\n", status, check.name, required));

        if verbose {
            output.push_str(&format!("      {}\n", check.message));
            if let Some(path) = &check.path {
                output.push_str(&format!("      Path: {}\n", path.display()));
            }
        }
    }

    let failed = report.failed_count();
    let required_failed = report.required_failed_count();
    output.push_str(&format!(
        "\nSummary: {} passed, {} failed\n",
        report.passed_count(),
        failed
    ));

    if required_failed > 0 {
        output.push_str(&format!(
            "\nWarning: {} required check(s) failed. Some features may not work.\n",
            required_failed
        ));
    } else if failed > 0 {
        output.push_str(&format!(
            "\nAll required checks passed. {} optional check(s) failed.\n",
            failed
        ));
    } else {
        output.push_str("\nAll checks passed. Manifold is ready to use.\n");
    }

    output
}
