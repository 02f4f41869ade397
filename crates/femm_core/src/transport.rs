//! Connections to the engine.
//!
//! A transport carries one command string out and one reply string back.
//! Calls block until the engine answers; there is no timeout.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransportError};
use crate::session::Session;

/// A synchronous request/response channel to the engine
pub trait Transport {
    fn exchange(&mut self, command: &str) -> std::result::Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exchange(&mut self, command: &str) -> std::result::Result<String, TransportError> {
        (**self).exchange(command)
    }
}

/// Engine bridge running as a child process.
///
/// Commands are written one per line to the child's stdin and each reply is
/// read as one line from its stdout. The child is killed when the transport
/// is dropped.
pub struct ProcessTransport {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl ProcessTransport {
    pub fn spawn(config: &EngineConfig) -> std::result::Result<Self, TransportError> {
        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| TransportError::Spawn {
            program: config.program.clone(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or(TransportError::Closed)?;
        let stdout = child.stdout.take().ok_or(TransportError::Closed)?;

        tracing::debug!(
            program = %config.program.display(),
            pid = child.id(),
            "engine bridge started"
        );

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
        })
    }
}

impl Transport for ProcessTransport {
    fn exchange(&mut self, command: &str) -> std::result::Result<String, TransportError> {
        writeln!(self.stdin, "{command}").map_err(closed_or_io)?;
        self.stdin.flush().map_err(closed_or_io)?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line).map_err(closed_or_io)? == 0 {
            return Err(TransportError::Closed);
        }
        let reply_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(reply_len);
        Ok(line)
    }
}

/// A bridge that has exited shows up as a broken pipe on write or an early
/// EOF on read
fn closed_or_io(e: std::io::Error) -> TransportError {
    match e.kind() {
        ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof => TransportError::Closed,
        _ => TransportError::Io(e),
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                tracing::warn!("failed to stop engine bridge: {e}");
            }
        }
        let _ = self.child.wait();
    }
}

/// How to reach the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine bridge executable
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory the engine should treat as current; defaults to ours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Start a bridge process and open a session on it
    pub fn connect(&self) -> Result<Session<ProcessTransport>> {
        let transport = ProcessTransport::spawn(self)?;
        Session::open(transport, self.working_dir.as_deref())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::FemmError;
    use crate::protocol::{Response, Value};
    use crate::session::fix_path;

    fn sh(script: &str) -> EngineConfig {
        EngineConfig {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: None,
        }
    }

    #[test]
    fn test_echo_round_trip() {
        let mut transport = ProcessTransport::spawn(&EngineConfig::new("cat")).unwrap();

        let reply = transport.exchange("mi_addnode(1.0, 2.0)").unwrap();

        assert_eq!(reply, "mi_addnode(1.0, 2.0)");
    }

    #[test]
    fn test_replies_decode_through_a_session() {
        let transport = ProcessTransport::spawn(&EngineConfig::new("cat")).unwrap();
        let mut session = Session::new(transport);

        let response = session.call_raw("(42.0)").unwrap();
        assert_eq!(response, Response::Value(Value::Float(42.0)));

        let err = session.call_raw("error: x").unwrap_err();
        assert!(matches!(err, FemmError::Engine(ref msg) if msg == "error: x"));
    }

    #[test]
    fn test_crlf_is_trimmed() {
        let mut transport =
            ProcessTransport::spawn(&sh("printf 'ok\\r\\n'; cat >/dev/null")).unwrap();

        assert_eq!(transport.exchange("anything").unwrap(), "ok");
    }

    #[test]
    fn test_exited_engine_is_closed() {
        let mut transport = ProcessTransport::spawn(&sh("exit 0")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));

        let err = transport.exchange("quit()").unwrap_err();

        assert!(matches!(err, TransportError::Closed), "got {err:?}");
    }

    #[test]
    fn test_spawn_failure_names_program() {
        let err = ProcessTransport::spawn(&EngineConfig::new("/nonexistent/femm-bridge"))
            .err()
            .unwrap();

        assert!(matches!(err, TransportError::Spawn { ref program, .. }
            if program == &PathBuf::from("/nonexistent/femm-bridge")));
    }

    #[test]
    fn test_drop_stops_a_running_engine() {
        // `cat` never exits on its own while its stdin is open; drop must kill it
        let mut transport = ProcessTransport::spawn(&EngineConfig::new("cat")).unwrap();
        transport.exchange("ping").unwrap();

        drop(transport);
    }

    #[test]
    fn test_connect_sets_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sh(r#"read -r line; printf '%s\n' "$line" > first.txt; echo; exec cat"#);
        config.working_dir = Some(dir.path().to_path_buf());

        let mut session = config.connect().unwrap();
        assert_eq!(session.call_raw("(1, 2)").unwrap().to_f64_vec(), vec![1.0, 2.0]);

        let first = std::fs::read_to_string(dir.path().join("first.txt")).unwrap();
        let expected = format!(
            "setcurrentdirectory(\"{}\")\n",
            fix_path(&dir.path().to_string_lossy())
        );
        assert_eq!(first, expected);
    }
}
