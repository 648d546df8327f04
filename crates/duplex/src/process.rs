//! crates/duplex/src/process.rs
//!
//! Child process ownership and the two pipe halves.

use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use std::time::Duration;

use rustix::io::Errno;
use segment::Readable;

use crate::command::{CommandLine, Environment};
use crate::error::{DuplexError, DuplexResult};

/// Read side of a duplex child: the child's standard output.
#[derive(Debug)]
pub struct DuplexReader {
    stdout: ChildStdout,
}

impl Read for DuplexReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl AsFd for DuplexReader {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.stdout.as_fd()
    }
}

impl Readable for DuplexReader {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        segment::poll_readable(self.stdout.as_fd(), timeout)
    }
}

/// Write side of a duplex child: the child's standard input.
#[derive(Debug)]
pub struct DuplexWriter {
    stdin: ChildStdin,
}

impl Write for DuplexWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdin.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdin.flush()
    }
}

/// An external command connected to the harness by two pipes.
///
/// The process is owned exclusively by its creator. Dropping it closes both
/// pipes (if [`close`](Self::close) was not called already) and reaps the
/// child only when it has already exited; it is never killed.
///
/// A program that could not be executed yields a process without a child
/// or pipes: reads report end-of-file and writes fail with
/// [`io::ErrorKind::BrokenPipe`].
#[derive(Debug)]
pub struct DuplexProcess {
    command: String,
    child: Option<Child>,
    reader: Option<DuplexReader>,
    writer: Option<DuplexWriter>,
}

impl DuplexProcess {
    /// Spawns `command` with its standard input and output wired to pipes.
    ///
    /// Failing to create the pipes or to fork is an error. Failing to execute
    /// the program only affects this child: it is logged and the returned
    /// process behaves like one that exited without output.
    pub fn spawn(command: &CommandLine, environment: Environment) -> DuplexResult<Self> {
        let rendered = command.to_string();
        let spawned = command
            .to_command(environment)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(error) if is_exec_failure(&error) => {
                tracing::warn!(target: "bat::proc", %error, "cannot execute {rendered}");
                return Ok(Self {
                    command: rendered,
                    child: None,
                    reader: None,
                    writer: None,
                });
            }
            Err(source) => {
                return Err(DuplexError::Spawn {
                    command: rendered,
                    source,
                });
            }
        };

        let stdout = child.stdout.take().ok_or_else(|| DuplexError::MissingPipe {
            command: rendered.clone(),
            stream: "stdout",
        })?;
        let stdin = child.stdin.take().ok_or_else(|| DuplexError::MissingPipe {
            command: rendered.clone(),
            stream: "stdin",
        })?;

        tracing::info!(
            target: "bat::proc",
            pid = child.id(),
            ?environment,
            "started {rendered}"
        );

        Ok(Self {
            command: rendered,
            child: Some(child),
            reader: Some(DuplexReader { stdout }),
            writer: Some(DuplexWriter { stdin }),
        })
    }

    /// Command line the process was started with.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process identifier, or `None` if the program never started.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Returns `true` when the program could not be executed.
    #[must_use]
    pub const fn exec_failed(&self) -> bool {
        self.child.is_none()
    }

    /// Returns the read half, or `None` once the process has been closed.
    pub fn reader_mut(&mut self) -> Option<&mut DuplexReader> {
        self.reader.as_mut()
    }

    /// Returns the write half, or `None` once the process has been closed.
    pub fn writer_mut(&mut self) -> Option<&mut DuplexWriter> {
        self.writer.as_mut()
    }

    /// Reads from the child's standard output.
    ///
    /// A program that never started reads as end-of-file.
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let exec_failed = self.exec_failed();
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None if exec_failed => Ok(0),
            None => Err(closed("stdout")),
        }
    }

    /// Writes all of `bytes` to the child's standard input and flushes.
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| closed("stdin"))?;
        writer.write_all(bytes)?;
        writer.flush()
    }

    /// Closes both pipe ends. Calling this more than once has no effect.
    pub fn close(&mut self) {
        let had_pipes = self.writer.is_some() || self.reader.is_some();
        // stdin first so the child sees EOF before we stop listening
        self.writer = None;
        self.reader = None;
        if had_pipes {
            tracing::debug!(target: "bat::proc", pid = ?self.id(), "closed pipes");
        }
    }

    /// Returns `true` once both pipes have been released.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.reader.is_none() && self.writer.is_none()
    }

    /// Checks, without blocking, whether the child has exited.
    ///
    /// Always `Ok(None)` for a program that never started.
    pub fn try_wait(&mut self) -> io::Result<Option<std::process::ExitStatus>> {
        match self.child.as_mut() {
            Some(child) => child.try_wait(),
            None => Ok(None),
        }
    }
}

impl Drop for DuplexProcess {
    fn drop(&mut self) {
        self.close();
        if let Ok(Some(status)) = self.try_wait() {
            tracing::debug!(target: "bat::proc", command = %self.command, %status, "child exited");
        }
    }
}

/// Errors `execve` reports about the program itself rather than about the
/// harness running out of pipes or processes.
fn is_exec_failure(error: &io::Error) -> bool {
    matches!(
        Errno::from_io_error(error),
        Some(
            Errno::NOENT
                | Errno::ACCESS
                | Errno::PERM
                | Errno::NOEXEC
                | Errno::NOTDIR
                | Errno::ISDIR
                | Errno::LOOP
                | Errno::NAMETOOLONG
                | Errno::TXTBSY
                | Errno::TOOBIG
        )
    )
}

fn closed(stream: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("{stream} of the child has already been closed"),
    )
}
