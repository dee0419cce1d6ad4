//! Pandoc invocation
//!
//! Builds the EPUB command line for a project, finds the executable, runs it
//! with an optional time limit and a cancel flag, and sorts failures into
//! "not installed" versus "ran and failed".

use crate::error::{Error, Result};
use crate::project::ProjectLayout;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Name looked up on `PATH` when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "pandoc";

/// Failure text from shells and loaders that means the program is missing.
const NOT_FOUND_MARKERS: [&str; 3] = ["is not recognized", "The term", "command not found"];

/// How often a running compile is checked for exit, timeout and cancel.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ─────────────────────────────────────────────────────────────────────────────
// Command line
// ─────────────────────────────────────────────────────────────────────────────

/// One EPUB build of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub program: String,
    pub chapters: Vec<PathBuf>,
    pub project_root: PathBuf,
    pub metadata: PathBuf,
    pub cover: PathBuf,
    pub stylesheet: PathBuf,
    pub output: PathBuf,
}

impl CompileRequest {
    /// Request for `layout` writing `<output_dir>/<project name>.epub`.
    pub fn new(
        program: impl Into<String>,
        layout: &ProjectLayout,
        chapters: Vec<PathBuf>,
        output_dir: &Path,
    ) -> Self {
        Self {
            program: program.into(),
            chapters,
            project_root: layout.root().to_path_buf(),
            metadata: layout.metadata_path(),
            cover: layout.cover_path(),
            stylesheet: layout.stylesheet_path(),
            output: output_dir.join(format!("{}.epub", layout.name())),
        }
    }

    /// Arguments after the program name, chapters first.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.chapters.iter().map(|p| p.into()).collect();
        args.extend(
            ["-f", "markdown", "-t", "epub3", "--split-level=1"]
                .iter()
                .map(OsString::from),
        );
        args.push(flag_with_path("--metadata-file=", &self.metadata));
        args.push(flag_with_path("--epub-cover-image=", &self.cover));
        args.push(flag_with_path("--css=", &self.stylesheet));
        args.push(flag_with_path("--resource-path=", &self.project_root));
        args.push("-o".into());
        args.push(self.output.clone().into());
        args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args())
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path.as_os_str());
    arg
}

/// Where finished EPUBs go: the user's Downloads folder.
pub fn output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ─────────────────────────────────────────────────────────────────────────────
// Executable discovery
// ─────────────────────────────────────────────────────────────────────────────

/// Pick the program to run.
///
/// Order: the configured override (surrounding quotes removed, `%VAR%`
/// expanded on Windows), then the per-user and Program Files installs on
/// Windows, then plain `pandoc` for a `PATH` lookup.
pub fn resolve_compiler(override_path: Option<&str>) -> String {
    if let Some(path) = override_path.map(clean_path).filter(|p| !p.is_empty()) {
        return expand_env_vars(&path);
    }

    for candidate in platform_install_paths() {
        if candidate.is_file() {
            return candidate.to_string_lossy().into_owned();
        }
    }

    DEFAULT_PROGRAM.to_string()
}

/// Trim whitespace and one pair of surrounding double quotes.
pub fn clean_path(path: &str) -> String {
    let path = path.trim();
    let path = path.strip_prefix('"').unwrap_or(path);
    let path = path.strip_suffix('"').unwrap_or(path);
    path.trim().to_string()
}

#[cfg(windows)]
fn expand_env_vars(path: &str) -> String {
    use regex::{Captures, Regex};
    match Regex::new(r"%([^%]+)%") {
        Ok(re) => re
            .replace_all(path, |caps: &Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
            })
            .into_owned(),
        Err(_) => path.to_string(),
    }
}

#[cfg(not(windows))]
fn expand_env_vars(path: &str) -> String {
    path.to_string()
}

#[cfg(windows)]
fn platform_install_paths() -> Vec<PathBuf> {
    ["LOCALAPPDATA", "ProgramFiles"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .map(|base| PathBuf::from(base).join("Pandoc").join("pandoc.exe"))
        .collect()
}

#[cfg(not(windows))]
fn platform_install_paths() -> Vec<PathBuf> {
    Vec::new()
}

/// Full path of `program` if it can be executed.
pub fn probe_compiler(program: &str) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!("Compiler probe for '{}' failed: {}", program, e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Running
// ─────────────────────────────────────────────────────────────────────────────

/// Run the compiler for `request`.
///
/// `timeout` of `None` waits indefinitely. Setting `cancel` kills the process
/// at the next poll.
pub fn run(request: &CompileRequest, timeout: Option<Duration>, cancel: &AtomicBool) -> Result<PathBuf> {
    if let Some(parent) = request.output.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    info!(
        "Compiling {} chapter(s) with '{}' to {}",
        request.chapters.len(),
        request.program,
        request.output.display()
    );
    run_command(request.command(), &request.program, timeout, cancel)?;
    info!("Compiled {}", request.output.display());
    Ok(request.output.clone())
}

fn run_command(
    mut command: Command,
    program: &str,
    timeout: Option<Duration>,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut child = command
        .spawn()
        .map_err(|e| classify_spawn_error(program, e))?;

    let stderr_reader = child.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text);
            text
        })
    });

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                warn!("Lost track of compiler process: {}", e);
                terminate(&mut child, stderr_reader);
                return Err(e.into());
            }
        }

        let stop = if cancel.load(Ordering::Relaxed) {
            Some(Error::CompilerCancelled)
        } else {
            timeout
                .filter(|limit| started.elapsed() >= *limit)
                .map(|limit| Error::CompilerTimedOut {
                    seconds: limit.as_secs(),
                })
        };
        if let Some(err) = stop {
            warn!("Stopping compiler: {}", err);
            terminate(&mut child, stderr_reader);
            return Err(err);
        }

        thread::sleep(POLL_INTERVAL);
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if status.success() {
        if !stderr.trim().is_empty() {
            debug!("Compiler output: {}", stderr.trim());
        }
        return Ok(());
    }
    Err(classify_failure(program, status.code(), stderr))
}

/// Kill and reap `child`, then wait for its stderr reader to drain.
fn terminate(child: &mut Child, stderr_reader: Option<JoinHandle<String>>) {
    let _ = child.kill();
    let _ = child.wait();
    if let Some(handle) = stderr_reader {
        let _ = handle.join();
    }
}

fn classify_spawn_error(program: &str, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound || is_not_found_text(&err.to_string()) {
        Error::CompilerNotFound {
            program: program.to_string(),
        }
    } else {
        Error::CompilerFailed {
            status: None,
            stderr: err.to_string(),
        }
    }
}

/// Sort a non-zero exit into not-found or execution failure.
pub fn classify_failure(program: &str, status: Option<i32>, stderr: String) -> Error {
    if is_not_found_text(&stderr) {
        Error::CompilerNotFound {
            program: program.to_string(),
        }
    } else {
        Error::CompilerFailed { status, stderr }
    }
}

fn is_not_found_text(text: &str) -> bool {
    NOT_FOUND_MARKERS.iter().any(|marker| text.contains(marker))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
