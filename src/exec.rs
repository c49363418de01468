use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::AppError;

/// Wall-clock budget for every external command; a hang becomes a
/// `Timeout` error instead of blocking forever
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured result of an external command that ran to completion
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external command with the default bounded wait
///
/// # Arguments
/// * `program` - Executable name (resolved via PATH)
/// * `args` - Arguments passed verbatim
pub fn run_with_timeout(program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
    run_bounded(program, args, COMMAND_TIMEOUT)
}

/// Runs an external command, killing it once `timeout` expires.
///
/// Both pipes are drained on background threads while waiting, so a command
/// emitting more than a pipe buffer of output cannot deadlock against the
/// bounded wait.
pub fn run_bounded(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput, AppError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            // killing the child closes the pipes, so the readers terminate
            child.kill()?;
            child.wait()?;
            return Err(AppError::Timeout {
                command: format!("{program} {}", args.join(" ")),
                seconds: timeout.as_secs(),
            });
        }
    };

    Ok(CommandOutput {
        success: status.success(),
        stdout: join_reader(stdout_reader)?,
        stderr: join_reader(stderr_reader)?,
    })
}

fn spawn_reader(mut pipe: impl Read + Send + 'static) -> JoinHandle<std::io::Result<String>> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        pipe.read_to_string(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(handle: Option<JoinHandle<std::io::Result<String>>>) -> Result<String, AppError> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(contents) => Ok(contents?),
            Err(_) => Err(AppError::Io(std::io::Error::other(
                "output reader thread panicked",
            ))),
        },
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn captures_stdout_of_successful_command() {
        let output = run_with_timeout("echo", &["hello"]).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    #[cfg(unix)]
    fn reports_nonzero_exit() {
        let output = run_with_timeout("false", &[]).unwrap();
        assert!(!output.success);
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let err = run_with_timeout("definitely-not-a-real-binary", &[]).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    #[cfg(unix)]
    fn hung_command_is_killed_and_reported_as_timeout() {
        let err = run_bounded("sleep", &["60"], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, AppError::Timeout { ref command, .. } if command.contains("sleep")));
    }

    #[test]
    #[cfg(unix)]
    fn output_larger_than_a_pipe_buffer_does_not_stall_the_wait() {
        let output = run_bounded(
            "sh",
            &["-c", "head -c 1000000 /dev/zero"],
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.len(), 1_000_000);
    }
}
