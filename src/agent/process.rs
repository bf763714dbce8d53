//! Agents running as child processes.
//!
//! The child reads the protocol on stdin and answers on stdout. A
//! reader thread turns stdout into lines on a channel so the engine can
//! wait for a reply with a deadline instead of blocking forever.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, trace, warn};

use crate::agent::protocol::{end_message, is_go, parse_order, setup_message, turn_message};
use crate::agent::{Agent, SetupInfo};
use crate::error::AgentError;
use crate::game::{ColonyId, Order, Torus, VisibleCell, World};

/// A colony played by an external program.
///
/// A program that closes its output or stops reading its input
/// forfeits: it is warned about once and its colony issues no further
/// orders. A reply that misses its deadline counts as no orders; the
/// late `go` is skipped when it eventually arrives.
#[derive(Debug)]
pub struct ProcessAgent {
    command: String,
    colony: ColonyId,
    colonies: usize,
    torus: Torus,
    turn_time: Duration,
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    skip_replies: usize,
    forfeited: bool,
}

impl ProcessAgent {
    /// Start `command` (split on whitespace), send the setup message
    /// and wait for the start-up `go`.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] if the command is empty or the process
    /// cannot be started.
    pub fn spawn(command: &str, setup: &SetupInfo) -> Result<Self, AgentError> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(AgentError::EmptyCommand)?;
        let torus = Torus::new(setup.cols, setup.rows).ok_or(AgentError::InvalidSetup {
            rows: setup.rows,
            cols: setup.cols,
        })?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AgentError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let (stdin, lines) = match connect(&mut child, setup.colony) {
            Ok(pipes) => pipes,
            Err(err) => {
                reap(&mut child);
                return Err(err);
            }
        };

        let mut agent = Self {
            command: command.to_string(),
            colony: setup.colony,
            colonies: setup.colonies,
            torus,
            turn_time: Duration::from_millis(setup.turn_time_ms),
            child,
            stdin: Some(stdin),
            lines,
            skip_replies: 0,
            forfeited: false,
        };

        debug!(colony = %agent.colony, command, "agent started");
        if agent.send(&setup_message(setup)) {
            agent.collect_orders(Duration::from_millis(setup.load_time_ms));
        }
        Ok(agent)
    }

    /// Whether the agent has given up its remaining turns.
    #[must_use]
    pub const fn is_forfeited(&self) -> bool {
        self.forfeited
    }

    fn forfeit(&mut self, reason: &str) {
        if !self.forfeited {
            warn!(colony = %self.colony, command = %self.command, reason, "agent forfeits");
            self.forfeited = true;
            self.stdin = None;
        }
    }

    /// Write a whole message. Returns false (and forfeits) on failure.
    fn send(&mut self, message: &str) -> bool {
        let Some(stdin) = self.stdin.as_mut() else {
            return false;
        };
        trace!(colony = %self.colony, "to agent: {}", message.trim_end());
        let result = stdin
            .write_all(message.as_bytes())
            .and_then(|()| stdin.flush());
        if let Err(err) = result {
            self.forfeit(&err.to_string());
            return false;
        }
        true
    }

    /// Read order lines until `go`, end of stream or the deadline.
    fn collect_orders(&mut self, budget: Duration) -> Vec<Order> {
        // No deadline when the budget runs past what an Instant can hold
        let deadline = Instant::now().checked_add(budget);
        let mut orders = Vec::new();
        loop {
            let received = match deadline {
                Some(deadline) => self.lines.recv_deadline(deadline),
                None => self.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(line) => {
                    trace!(colony = %self.colony, line = %line, "from agent");
                    if is_go(&line) {
                        if self.skip_replies == 0 {
                            return orders;
                        }
                        self.skip_replies -= 1;
                    } else if self.skip_replies == 0 {
                        orders.extend(parse_order(&line, self.torus));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(colony = %self.colony, ?budget, "agent timed out");
                    self.skip_replies += 1;
                    return Vec::new();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.forfeit("output closed");
                    return Vec::new();
                }
            }
        }
    }

    fn shutdown(&mut self) {
        self.stdin = None;
        reap(&mut self.child);
    }
}

impl Agent for ProcessAgent {
    fn name(&self) -> &str {
        &self.command
    }

    fn play_turn(&mut self, view: &[VisibleCell], turn: u32, _world: &World) -> Vec<Order> {
        if self.forfeited {
            return Vec::new();
        }
        let message = turn_message(turn, view, self.colony, self.colonies);
        if !self.send(&message) {
            return Vec::new();
        }
        self.collect_orders(self.turn_time)
    }

    fn end_game(&mut self, scores: &[i32]) {
        if !self.forfeited {
            self.send(&end_message(scores));
        }
        self.shutdown();
    }
}

/// Take the child's pipes and start the thread that reads its output.
fn connect(
    child: &mut Child,
    colony: ColonyId,
) -> Result<(ChildStdin, Receiver<String>), AgentError> {
    let stdin = child.stdin.take().ok_or(AgentError::Pipe("stdin"))?;
    let stdout = child.stdout.take().ok_or(AgentError::Pipe("stdout"))?;
    let lines = spawn_reader(format!("agent-{colony}"), stdout)?;
    Ok((stdin, lines))
}

/// Forward each line of `output` to the returned channel until it ends.
fn spawn_reader<R>(name: String, output: R) -> std::io::Result<Receiver<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new().name(name).spawn(move || {
        for line in BufReader::new(output).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })?;
    Ok(rx)
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_reader_forwards_lines_then_disconnects() {
        let lines = spawn_reader("reader".to_string(), &b"o 0 0 n\ngo\n"[..]).unwrap();
        assert_eq!(lines.recv().unwrap(), "o 0 0 n");
        assert_eq!(lines.recv().unwrap(), "go");
        assert!(lines.recv().is_err());
    }

    #[test]
    fn test_failed_connect_leaves_no_child_behind() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let result = connect(&mut child, ColonyId(0));
        assert!(matches!(result, Err(AgentError::Pipe("stdin"))));

        reap(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }
}
