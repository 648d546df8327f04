//! crates/segment/src/readiness.rs
//!
//! Bounded readiness waits over file descriptors.

use std::fs::File;
use std::io::{self, PipeReader, Read};
use std::os::fd::{AsFd, BorrowedFd};
use std::process::ChildStdout;
use std::time::Duration;

use rustix::event::{PollFd, PollFlags, Timespec, poll};
use rustix::io::Errno;

/// A byte source that can wait, with a deadline, until a read will not block.
pub trait Readable: Read {
    /// Returns `Ok(true)` when data or end-of-file is available within
    /// `timeout`, `Ok(false)` when the wait expired.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;
}

/// Polls a single descriptor for readability.
///
/// Hang-up and error conditions count as readable so the following `read`
/// can report end-of-file or the error. Interrupted waits are retried with
/// the full timeout.
pub fn poll_readable(fd: BorrowedFd<'_>, timeout: Duration) -> io::Result<bool> {
    let timespec = Timespec {
        tv_sec: i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX) as _,
        tv_nsec: timeout.subsec_nanos() as _,
    };
    loop {
        let mut fds = [PollFd::from_borrowed_fd(fd, PollFlags::IN)];
        match poll(&mut fds, Some(&timespec)) {
            Ok(0) => return Ok(false),
            Ok(_) => {
                let revents = fds[0].revents();
                return Ok(revents.intersects(PollFlags::IN | PollFlags::HUP | PollFlags::ERR));
            }
            Err(Errno::INTR) => {}
            Err(errno) => return Err(io::Error::from(errno)),
        }
    }
}

impl Readable for File {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        poll_readable(self.as_fd(), timeout)
    }
}

impl Readable for ChildStdout {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        poll_readable(self.as_fd(), timeout)
    }
}

impl Readable for PipeReader {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        poll_readable(self.as_fd(), timeout)
    }
}

impl<T: Readable + ?Sized> Readable for &mut T {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_readable(timeout)
    }
}
