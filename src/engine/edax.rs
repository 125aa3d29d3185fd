use super::Solver;
use crate::config::Config;
use crate::error::ExecutionError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const LINUX_BINARY: &str = "edax-4.4-linux";
const WINDOWS_BINARY: &str = "edax-4.4-ms-windows";

pub struct EdaxSolver {
    exe: PathBuf,
    hash_table_size: Option<u32>,
    tasks: Option<u32>,
    level: Option<u32>,
    timeout: Option<Duration>,
}

impl EdaxSolver {
    pub fn new(cfg: &Config) -> Result<Self, ExecutionError> {
        let exe = resolve_executable(&cfg.engine.bin_dir, &cfg.engine.executable)?;
        let timeout = match cfg.engine.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self {
            exe,
            hash_table_size: cfg.engine.hash_table_size,
            tasks: cfg.engine.tasks,
            level: cfg.engine.level,
            timeout,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.exe
    }

    /// The engine's name and version, e.g. `Edax version 4.4`.
    pub fn version(&self) -> Result<String, ExecutionError> {
        let mut cmd = Command::new(&self.exe);
        cmd.args(["-v", "-h"]);
        if let Some(dir) = self.exe.parent() {
            cmd.current_dir(dir);
        }
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ExecutionError::io(format!("spawning {}", self.exe.display()), e))?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(stderr.split_whitespace().take(3).collect::<Vec<_>>().join(" "))
    }

    /// Command line for solving the positions stored in `input`.
    pub fn command_args(&self, input: &Path) -> Vec<String> {
        let mut args = vec!["-solve".to_string(), input.display().to_string()];
        for (flag, value) in [
            ("-h", self.hash_table_size),
            ("-n", self.tasks),
            ("-l", self.level),
        ] {
            if let Some(v) = value {
                args.push(flag.to_string());
                args.push(v.to_string());
            }
        }
        args
    }
}

impl Solver for EdaxSolver {
    fn run(&self, positions: &[String]) -> Result<String, ExecutionError> {
        let mut input = tempfile::Builder::new()
            .prefix("edax-positions-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| ExecutionError::io("creating position file", e))?;
        input
            .write_all(positions.join("\n").as_bytes())
            .and_then(|_| input.flush())
            .map_err(|e| ExecutionError::io("writing position file", e))?;

        let args = self.command_args(input.path());
        debug!(
            "edax run {} {} positions={} timeout={:?}",
            self.exe.display(),
            args.join(" "),
            positions.len(),
            self.timeout
        );

        let mut cmd = Command::new(&self.exe);
        cmd.args(&args);
        if let Some(dir) = self.exe.parent() {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecutionError::io(format!("spawning {}", self.exe.display()), e))?;
        let output = wait_with_timeout(&mut child, self.timeout)?;

        if !output.status.success() {
            return Err(exit_error(&output));
        }

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("edax stderr: {}", stderr.trim());
        }

        String::from_utf8(output.stdout).map_err(ExecutionError::InvalidOutput)
    }
}

fn exit_error(output: &Output) -> ExecutionError {
    ExecutionError::Exit {
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn resolve_executable(bin_dir: &str, executable: &str) -> Result<PathBuf, ExecutionError> {
    if !executable.trim().is_empty() {
        return absolute(PathBuf::from(executable.trim()));
    }

    let dir = PathBuf::from(bin_dir);
    if !dir.exists() {
        return Err(ExecutionError::MissingExecutable(dir));
    }
    absolute(dir.join(platform_binary(std::env::consts::OS)?))
}

/// The engine runs with its own directory as cwd, so a relative program
/// path would be resolved a second time from inside that directory.
fn absolute(exe: PathBuf) -> Result<PathBuf, ExecutionError> {
    if !exe.exists() {
        return Err(ExecutionError::MissingExecutable(exe));
    }
    std::fs::canonicalize(&exe)
        .map_err(|e| ExecutionError::io(format!("resolving {}", exe.display()), e))
}

pub fn platform_binary(os: &str) -> Result<&'static str, ExecutionError> {
    match os {
        "linux" => Ok(LINUX_BINARY),
        "windows" => Ok(WINDOWS_BINARY),
        other => Err(ExecutionError::UnsupportedPlatform(other.to_string())),
    }
}

fn drain<R: Read + Send + 'static>(
    reader: Option<R>,
    what: &'static str,
) -> JoinHandle<Result<Vec<u8>, ExecutionError>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut r) = reader {
            r.read_to_end(&mut buf)
                .map_err(|e| ExecutionError::io(format!("reading {what}"), e))?;
        }
        Ok(buf)
    })
}

fn join(
    handle: JoinHandle<Result<Vec<u8>, ExecutionError>>,
    what: &str,
) -> Result<Vec<u8>, ExecutionError> {
    handle.join().map_err(|_| {
        ExecutionError::io(
            format!("{what} reader thread panicked"),
            std::io::Error::other("panic"),
        )
    })?
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<Output, ExecutionError> {
    // Drain pipes while waiting so a large report can't block the engine
    // on a full stdout buffer.
    let stdout_thread = drain(child.stdout.take(), "stdout");
    let stderr_thread = drain(child.stderr.take(), "stderr");

    let start = Instant::now();
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| ExecutionError::io("waiting for engine", e))?
        {
            return Ok(Output {
                status,
                stdout: join(stdout_thread, "stdout")?,
                stderr: join(stderr_thread, "stderr")?,
            });
        }

        if let Some(limit) = timeout
            && start.elapsed() > limit
        {
            warn!("edax process timed out after {:?}", limit);
            let _ = child.kill();
            child
                .wait()
                .map_err(|e| ExecutionError::io("waiting after kill", e))?;
            let _ = join(stdout_thread, "stdout");
            let stderr = join(stderr_thread, "stderr").unwrap_or_default();
            return Err(ExecutionError::Timeout {
                after: limit,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        std::thread::sleep(Duration::from_millis(20));
    }
}
