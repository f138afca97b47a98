//! Tracing of grammar compilation.
//!
//! A [`Tracer`] notes each decision the compiler makes: rules defined and
//! aliased, types declared, rules spliced into their users, output placed.
//! When switched off, recording is a single branch. Records land in a
//! bounded [`TraceBuffer`] and may also be echoed to stderr.

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::TraceBuffer;
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{CompilePhase, TraceEvent, TraceRecord};

use std::io::{self, Write};
use std::time::Instant;

/// Where records go besides the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// Buffer only.
    #[default]
    None,
    /// Each record is also written to stderr as one line.
    Stderr,
}

/// How a [`Tracer`] records.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Master switch.
    pub enabled: bool,
    /// Echo target.
    pub output: TraceOutput,
    /// Records kept before the oldest are dropped.
    pub capacity: usize,
    /// Echo as JSON instead of the human form.
    pub json: bool,
    /// Event type names to keep; empty keeps everything.
    pub events: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output: TraceOutput::None,
            capacity: buffer::DEFAULT_CAPACITY,
            json: false,
            events: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// A disabled configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to switch tracing on.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Builder method to echo records to stderr.
    #[must_use]
    pub fn to_stderr(mut self) -> Self {
        self.output = TraceOutput::Stderr;
        self
    }

    /// Builder method to echo records as JSON.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Builder method to keep only the named event types.
    #[must_use]
    pub fn filter_events(mut self, types: Vec<String>) -> Self {
        self.events = types;
        self
    }

    fn keeps(&self, event: &TraceEvent) -> bool {
        self.events.is_empty() || self.events.iter().any(|t| t == event.event_type())
    }
}

/// Records compiler decisions, tagged with the phase they were made in.
#[derive(Debug)]
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    phase: CompilePhase,
    started: Instant,
}

impl Tracer {
    /// Creates a tracer from `config`.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            buffer: TraceBuffer::new(config.capacity),
            config,
            phase: CompilePhase::Build,
            started: Instant::now(),
        }
    }

    /// A tracer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// A tracer that keeps records in memory only.
    #[must_use]
    pub fn buffered() -> Self {
        Self::new(TracerConfig::new().enabled())
    }

    /// A tracer that also prints each record to stderr.
    #[must_use]
    pub fn to_stderr() -> Self {
        Self::new(TracerConfig::new().enabled().to_stderr())
    }

    /// Whether records are being kept.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The phase new records are tagged with.
    #[must_use]
    pub fn phase(&self) -> CompilePhase {
        self.phase
    }

    /// The records kept so far.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Records `event` in the current phase.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if self.config.enabled && self.config.keeps(&event) {
            self.store(event);
        }
    }

    fn store(&mut self, event: TraceEvent) {
        let elapsed = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.buffer.push(self.phase, elapsed, event);

        if self.config.output != TraceOutput::Stderr {
            return;
        }
        if let Some(record) = self.buffer.last() {
            let line = if self.config.json {
                JsonFormatter::new().format(record)
            } else {
                HumanFormatter::new().with_timestamps().format(record)
            };
            let _ = writeln!(io::stderr().lock(), "{line}");
        }
    }

    /// Switches to `phase` and records that it started.
    ///
    /// The phase is tracked even when tracing is off.
    pub fn phase_start(&mut self, phase: CompilePhase) {
        self.phase = phase;
        self.record(TraceEvent::PhaseStart { phase });
    }

    /// Records that the current phase finished.
    pub fn phase_end(&mut self) {
        let phase = self.phase;
        self.record(TraceEvent::PhaseEnd { phase });
    }

    /// Records that `rule` received a definition in `scope`.
    pub fn rule_defined(&mut self, rule: &str, scope: u32) {
        if self.is_enabled() {
            self.record(TraceEvent::RuleDefined {
                rule: rule.to_owned(),
                scope,
            });
        }
    }

    /// Records that a writer type was declared for `origin`.
    pub fn type_declared(&mut self, name: &str, origin: &str) {
        if self.is_enabled() {
            self.record(TraceEvent::TypeDeclared {
                name: name.to_owned(),
                origin: origin.to_owned(),
            });
        }
    }

    /// Records that the inline rule `rule` was spliced into `into`.
    pub fn rule_inlined(&mut self, rule: &str, into: &str) {
        if self.is_enabled() {
            self.record(TraceEvent::RuleInlined {
                rule: rule.to_owned(),
                into: into.to_owned(),
            });
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}
