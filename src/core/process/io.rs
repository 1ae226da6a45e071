// shipit: cross-platform release builder
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> one unbounded channel (arrival order)
//!   select { wait | token.cancelled | timeout }
//!   --> ChildOutcome::{Exited, Interrupted, TimedOut}
//! ```

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, Stream, StreamFlags};

/// How a child process finished.
#[derive(Debug)]
pub(super) enum ChildOutcome {
    Exited(ProcessOutput),
    Interrupted,
    TimedOut(Duration),
}

fn spawn_reader<R>(
    reader: Option<R>,
    stream: Stream,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<(Stream, String)>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    reader.map(|reader| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                            trace!(process = %name, stream = stream.as_str(), line = %line, "output");
                        }
                        if flags.contains(StreamFlags::KEEP_IN_STRING) {
                            let _ = tx.send((stream, line));
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(process = %name, stream = stream.as_str(), error = %e, "error reading stream");
                        break;
                    }
                }
            }
        })
    })
}

async fn await_readers(handles: [Option<JoinHandle<()>>; 2]) {
    for handle in handles.into_iter().flatten() {
        let _ = handle.await;
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<(Stream, String)>) -> Vec<(Stream, String)> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}

impl ProcessBuilder {
    /// Streams output, then waits for exit, cancellation or timeout.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: &CancellationToken,
    ) -> std::io::Result<ChildOutcome> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let readers = [
            spawn_reader(
                child.stdout.take(),
                Stream::Stdout,
                self.stdout_stream_flags(),
                name,
                tx.clone(),
            ),
            spawn_reader(
                child.stderr.take(),
                Stream::Stderr,
                self.stderr_stream_flags(),
                name,
                tx,
            ),
        ];

        let timeout = self.timeout_duration();
        let timer = async {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };

        let outcome = tokio::select! {
            status = child.wait() => {
                let status = status?;
                await_readers(readers).await;
                ChildOutcome::Exited(ProcessOutput::new(status.code().unwrap_or(-1), drain(&mut rx)))
            }
            () = token.cancelled() => {
                warn!(process = %name, "Cancellation requested, terminating process");
                child.kill().await.ok();
                ChildOutcome::Interrupted
            }
            () = timer => {
                warn!(process = %name, timeout = ?timeout, "Process timed out");
                child.kill().await.ok();
                ChildOutcome::TimedOut(timeout.unwrap_or_default())
            }
        };

        Ok(outcome)
    }
}
