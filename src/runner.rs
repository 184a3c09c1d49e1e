//! Wrapped command host
//!
//! Runs a child command as if it were an editor task in a terminal: its
//! output is echoed through unchanged and published chunk by chunk as
//! terminal data, and its exit is published as a task-process-ended event
//! named after the command line.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::host::{EventSource, HostEvent, HostEvents, TaskProcessEnded, TerminalData};

type TerminalSource = EventSource<TerminalData, HostEvent>;

const CHUNK_SIZE: usize = 8192;

/// Task name reported for a wrapped command
pub fn task_name(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Copy `reader` to `sink` chunk by chunk, publishing each chunk
fn pump_output<R: Read, W: Write>(mut reader: R, mut sink: W, source: Option<&TerminalSource>) -> io::Result<()> {
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        sink.write_all(&buf[..n])?;
        sink.flush()?;

        if let Some(source) = source {
            source.publish(TerminalData::new(String::from_utf8_lossy(&buf[..n])));
        }
    }
}

/// Run `program` to completion, publishing its output and exit to `events`
pub fn run_wrapped(events: &HostEvents, program: &str, args: &[String]) -> io::Result<ExitStatus> {
    let name = task_name(program, args);
    tracing::info!("Running task \"{}\"", name);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_source = events.terminal_data.as_ref().cloned();
    let stderr_source = stdout_source.clone();

    let stdout_reader = stdout.map(|out| {
        thread::spawn(move || pump_output(out, io::stdout(), stdout_source.as_ref()))
    });
    let stderr_reader = stderr.map(|err| {
        thread::spawn(move || pump_output(err, io::stderr(), stderr_source.as_ref()))
    });

    for reader in [stdout_reader, stderr_reader].into_iter().flatten() {
        match reader.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Output relay for \"{}\" stopped: {}", name, e),
            Err(_) => tracing::warn!("Output relay for \"{}\" panicked", name),
        }
    }

    let status = child.wait()?;
    tracing::info!("Task \"{}\" finished: {}", name, status);

    events.tasks.publish(TaskProcessEnded {
        name,
        exit_code: status.code(),
    });

    Ok(status)
}
