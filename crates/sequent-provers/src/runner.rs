//! Subprocess supervision with a wall-clock timeout.
//!
//! The runner knows nothing about provers: it feeds a process some
//! stdin, drains stdout/stderr, and enforces a deadline. A nonzero exit
//! status is ordinary data for the backend adapter to interpret, never
//! an error of the runner itself.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::trace;

use crate::verdict::RawProverResult;

/// How often the supervisor polls a running child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failure to get a prover process off the ground at all (missing
/// executable, permission denied, broken pipes). Fatal for the whole
/// run: no test can produce a meaningful verdict without a prover.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to launch prover `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not open stdio pipes for prover `{program}`")]
    Stdio { program: String },

    #[error("i/o failure while supervising prover `{program}`: {source}")]
    Supervise {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run `program` with `args`, feeding `stdin_text` on standard input.
///
/// Captures stdout and stderr to completion or until `timeout` expires.
/// On expiry the child is killed and whatever partial output was
/// captured comes back with `timed_out = true`.
pub fn run(
    program: &Path,
    args: &[String],
    stdin_text: &str,
    timeout: Duration,
) -> Result<RawProverResult, LaunchError> {
    let program_name = program.display().to_string();
    let start = Instant::now();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        // The child leads its own process group, so a timeout kill also
        // reaches any helper processes the prover forked. Otherwise a
        // surviving grandchild would hold the output pipes open and the
        // reader threads would never see EOF.
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: program_name.clone(),
        source,
    })?;

    let stdin = child.stdin.take().ok_or_else(|| LaunchError::Stdio {
        program: program_name.clone(),
    })?;
    let stdout = child.stdout.take().ok_or_else(|| LaunchError::Stdio {
        program: program_name.clone(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| LaunchError::Stdio {
        program: program_name.clone(),
    })?;

    // Feed and drain on dedicated threads so a chatty or input-hungry
    // prover cannot deadlock against a full pipe.
    let input = stdin_text.as_bytes().to_vec();
    let writer = thread::spawn(move || {
        let mut stdin = stdin;
        // The child may exit without reading its input; a broken pipe
        // here is not an error.
        let _ = stdin.write_all(&input);
    });
    let stdout_reader = thread::spawn(move || read_all(stdout));
    let stderr_reader = thread::spawn(move || read_all(stderr));

    let deadline = start + timeout;
    let (exit_code, timed_out) = loop {
        match child.try_wait() {
            Ok(Some(status)) => break (status.code(), false),
            Ok(None) => {
                if Instant::now() >= deadline {
                    trace!(program = %program_name, "timeout expired, killing prover");
                    terminate(&mut child);
                    break (None, true);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                terminate(&mut child);
                return Err(LaunchError::Supervise {
                    program: program_name,
                    source,
                });
            }
        }
    };

    let _ = writer.join();
    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    Ok(RawProverResult {
        exit_code,
        stdout,
        stderr,
        timed_out,
        duration: start.elapsed(),
    })
}

fn read_all(mut pipe: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(unix)]
extern "C" {
    fn kill(pid: i32, sig: i32) -> i32;
}
#[cfg(unix)]
const SIGKILL: i32 = 9;

/// Forcibly terminate the child and everything in its process group.
fn terminate(child: &mut std::process::Child) {
    #[cfg(unix)]
    {
        // SAFETY: kill(2) with a negated pgid sends SIGKILL to the
        // child's process group; it has no other effect on this process.
        unsafe {
            kill(-(child.id() as i32), SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
