//! crates/harness/src/session.rs
//!
//! The replay/relay/record cycle.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use arena::{Arena, Block};
use codec::{SessionReader, SessionRecord, SessionWriter};
use collapse::{Normalizer, Outcome, RuleSet};
use duplex::DuplexProcess;
use segment::{BlockReader, Segment, SegmentEnd, SegmentError};

use crate::config::{HarnessConfig, RecordTarget};
use crate::error::{HarnessError, HarnessResult};
use crate::report::Report;

/// Step of the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleState {
    /// Pulling the next reference record from the script.
    #[default]
    ReadScript,
    /// Reading a request block from the client.
    ReadClient,
    /// Sending the request to the server and reading its reply.
    ExchangeWithServer,
    /// Returning the response to the client.
    WriteClient,
    /// Appending the exchanged pair to the record target.
    Record,
    /// Releasing every block of the cycle.
    Reset,
    /// The session is over.
    Finished,
}

/// Which half of a record a comparison judged.
#[derive(Clone, Copy, Debug)]
enum Side {
    Request,
    Response,
}

/// A running harness session.
///
/// Owns the arena, the child processes, the script reader and the record
/// writer for the whole run. Children are spawned by [`open`](Self::open)
/// and their pipes are closed when the session is dropped.
pub struct Session {
    config: HarnessConfig,
    arena: Arena,
    blocks: BlockReader,
    normalizer: Normalizer,
    script: Option<SessionReader<File>>,
    recorder: Option<SessionWriter<Box<dyn Write>>>,
    server: Option<DuplexProcess>,
    client: Option<DuplexProcess>,
    state: CycleState,
    report: Report,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("report", &self.report)
            .field("server", &self.server.as_ref().map(DuplexProcess::command))
            .field("client", &self.client.as_ref().map(DuplexProcess::command))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Validates `config`, loads rules, opens files and spawns children.
    pub fn open(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;

        let rules = match config.rules() {
            Some(path) => {
                let (rules, report) = RuleSet::from_path(path).map_err(HarnessError::Rules)?;
                if !report.is_clean() {
                    tracing::warn!(
                        target: "bat::collapse",
                        skipped = report.skipped.len(),
                        "some collapsible rules were skipped"
                    );
                }
                rules
            }
            None => RuleSet::new(),
        };

        let script = match config.script() {
            Some(path) => {
                let file = File::open(path).map_err(|source| HarnessError::ScriptOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::info!(target: "bat::cycle", path = %path.display(), "open script");
                Some(SessionReader::new(file, config.separators().clone()))
            }
            None => None,
        };

        let recorder = match config.record() {
            RecordTarget::None => None,
            RecordTarget::Stdout => {
                tracing::info!(target: "bat::cycle", "recording to stdout");
                let sink: Box<dyn Write> = Box::new(io::stdout());
                Some(SessionWriter::new(sink, config.separators().clone()))
            }
            RecordTarget::File(path) => {
                let file = File::create(path).map_err(|source| HarnessError::RecordOpen {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(target: "bat::cycle", path = %path.display(), "session is recorded");
                let sink: Box<dyn Write> = Box::new(BufWriter::new(file));
                Some(SessionWriter::new(sink, config.separators().clone()))
            }
        };

        let server = config
            .server()
            .map(|command| DuplexProcess::spawn(command, config.environment()))
            .transpose()
            .map_err(HarnessError::ServerSpawn)?;
        let client = config
            .client()
            .map(|command| DuplexProcess::spawn(command, config.environment()))
            .transpose()
            .map_err(HarnessError::ClientSpawn)?;

        Ok(Self {
            arena: Arena::with_capacity(config.arena_capacity()),
            blocks: BlockReader::new(config.timeouts()),
            normalizer: Normalizer::new(rules),
            script,
            recorder,
            server,
            client,
            state: CycleState::default(),
            report: Report::default(),
            config,
        })
    }

    /// Current step.
    #[must_use]
    pub const fn state(&self) -> CycleState {
        self.state
    }

    /// Tally so far.
    #[must_use]
    pub const fn report(&self) -> Report {
        self.report
    }

    /// Runs cycles until the session ends.
    ///
    /// `OK`/`FAIL` lines go to `out`; with diff dumping enabled, mismatching
    /// blocks go to `err`.
    pub fn run<O, E>(&mut self, out: &mut O, err: &mut E) -> HarnessResult<Report>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        while self.cycle(out, err)? {}
        self.state = CycleState::Finished;
        tracing::info!(
            target: "bat::cycle",
            "{} comparisons, {} failed",
            self.report.comparisons,
            self.report.failures
        );
        Ok(self.report)
    }

    /// Runs one cycle. Returns `false` when the session is over.
    pub fn cycle<O, E>(&mut self, out: &mut O, err: &mut E) -> HarnessResult<bool>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let outcome = self.exchange(out, err);
        self.enter(CycleState::Reset);
        self.arena.reset();
        outcome
    }

    fn exchange<O, E>(&mut self, out: &mut O, err: &mut E) -> HarnessResult<bool>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        self.enter(CycleState::ReadScript);
        let reference = match self.script.as_mut() {
            Some(script) => match script
                .read_record(&mut self.arena)
                .map_err(HarnessError::Script)?
            {
                Some(record) => Some(record),
                None => return Ok(false),
            },
            None => None,
        };

        self.enter(CycleState::ReadClient);
        let from_client = match self.client.as_mut() {
            Some(client) => Some(read_segment(&self.blocks, client, &mut self.arena)?.block),
            None => None,
        };
        if let (Some(reference), Some(actual)) = (reference, from_client) {
            self.judge(Side::Request, reference.request, actual, out, err)?;
        }
        let request = from_client
            .or(reference.map(|record| record.request))
            .unwrap_or_else(|| self.empty_block());

        self.enter(CycleState::ExchangeWithServer);
        let from_server = match self.server.as_mut() {
            Some(server) => {
                if !server.exec_failed() {
                    server
                        .write_all(self.arena.bytes(request))
                        .map_err(HarnessError::ServerWrite)?;
                }
                Some(read_segment(&self.blocks, server, &mut self.arena)?.block)
            }
            None => None,
        };
        if let (Some(reference), Some(actual)) = (reference, from_server) {
            self.judge(Side::Response, reference.response, actual, out, err)?;
        }
        let response = from_server
            .or(reference.map(|record| record.response))
            .unwrap_or_else(|| self.empty_block());

        self.enter(CycleState::WriteClient);
        if let Some(client) = self.client.as_mut() {
            if let Err(error) = client.write_all(self.arena.bytes(response)) {
                tracing::warn!(target: "bat::cycle", %error, "client write fails");
            }
        }

        self.enter(CycleState::Record);
        let moved = !request.is_empty() || !response.is_empty();
        if reference.is_some() || moved {
            self.record(SessionRecord { request, response })?;
        }

        self.report.cycles += 1;
        Ok(reference.is_some() || moved)
    }

    fn judge<O, E>(
        &mut self,
        side: Side,
        expected: Block,
        actual: Block,
        out: &mut O,
        err: &mut E,
    ) -> HarnessResult<()>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let outcome = self.normalizer.compare(&mut self.arena, expected, actual);
        self.report.note(outcome.is_pass());
        writeln!(out, "{}", outcome.label()).map_err(HarnessError::Output)?;

        if let Outcome::Fail {
            expected,
            actual,
            difference,
        } = outcome
        {
            tracing::info!(
                target: "bat::cycle",
                cycle = self.report.cycles + 1,
                ?side,
                ?difference,
                "comparison failed"
            );
            if self.config.dump_diff() {
                dump(err, self.arena.bytes(expected), self.arena.bytes(actual))
                    .map_err(HarnessError::Output)?;
            }
        }
        Ok(())
    }

    fn record(&mut self, record: SessionRecord) -> HarnessResult<()> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(());
        };
        recorder
            .write_record(
                self.arena.bytes(record.request),
                self.arena.bytes(record.response),
            )
            .map_err(HarnessError::RecordWrite)?;
        self.report.recorded += 1;
        Ok(())
    }

    fn empty_block(&self) -> Block {
        self.arena.block_since(self.arena.head())
    }

    fn enter(&mut self, state: CycleState) {
        tracing::trace!(target: "bat::cycle", from = ?self.state, to = ?state, "transition");
        self.state = state;
    }
}

fn read_segment(
    blocks: &BlockReader,
    process: &mut DuplexProcess,
    arena: &mut Arena,
) -> HarnessResult<Segment> {
    let command = process.command().to_owned();
    if process.exec_failed() {
        return Ok(Segment {
            block: arena.block_since(arena.head()),
            end: SegmentEnd::Closed,
        });
    }
    let source = process.reader_mut().ok_or_else(|| {
        SegmentError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            format!("output of '{command}' is closed"),
        ))
    })?;
    let segment = blocks.read_block(source, arena)?;
    tracing::debug!(
        target: "bat::cycle",
        command = %command,
        len = segment.block.len(),
        end = ?segment.end,
        "read block"
    );
    Ok(segment)
}

fn dump<E: Write + ?Sized>(err: &mut E, expected: &[u8], received: &[u8]) -> io::Result<()> {
    err.write_all(b"EXPECTED:\n")?;
    err.write_all(expected)?;
    err.write_all(b"RECEIVED:\n")?;
    err.write_all(received)?;
    err.flush()
}
