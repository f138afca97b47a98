//! Rendering trace records as text.
//!
//! [`HumanFormatter`] produces one aligned line per record for reading in a
//! terminal. [`JsonFormatter`] produces one JSON object per record with the
//! keys `id`, `phase`, `timestamp_ns`, `type` and `data`.

use std::fmt::{self, Write};

use super::record::{TraceEvent, TraceRecord};

/// Turns a record into a line of text.
pub trait TraceFormatter {
    /// Renders one record.
    fn format(&self, record: &TraceRecord) -> String;

    /// Renders several records, one per line.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let mut out = String::new();
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.format(record));
        }
        out
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseStart { phase } => write!(f, ">> {phase}"),
            Self::PhaseEnd { phase } => write!(f, "<< {phase}"),
            Self::RuleDefined { rule, scope } => write!(f, "  DEFINE {rule} (scope {scope})"),
            Self::RuleAliased { rule, target } => write!(f, "  ALIAS {target} as {rule}"),
            Self::TypeDeclared { name, origin } => write!(f, "  DECLARE {name} for {origin}"),
            Self::RuleInlined { rule, into } => write!(f, "  INLINE {rule} into {into}"),
            Self::MembersGenerated { type_name, count } => {
                write!(f, "  GENERATE {type_name}: {count} member(s)")
            }
            Self::OutputRequested { namespace, file } => write!(f, "  OUTPUT? [{namespace}] {file}"),
            Self::OutputResolved {
                namespace,
                file,
                system_id,
            } => write!(f, "  OUTPUT [{namespace}] {file} -> {system_id}"),
            Self::OutputSkipped { namespace, file } => write!(f, "  SKIP [{namespace}] {file}"),
        }
    }
}

/// Terminal-friendly rendering: `phase [elapsed] event`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HumanFormatter {
    timestamps: bool,
    ids: bool,
}

impl HumanFormatter {
    /// A formatter showing only phase and event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show time since the tracer started.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    /// Builder method to prefix each line with its record id.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.ids = true;
        self
    }
}

#[allow(clippy::cast_precision_loss)]
fn elapsed(ns: u64) -> String {
    match ns {
        0..=999_999 => format!("{}us", ns / 1_000),
        1_000_000..=999_999_999 => format!("{:.3}ms", ns as f64 / 1e6),
        _ => format!("{:.3}s", ns as f64 / 1e9),
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut line = String::new();
        if self.ids {
            let _ = write!(line, "[{:06}] ", record.id);
        }
        let _ = write!(line, "{:<8} ", record.phase);
        if self.timestamps {
            let _ = write!(line, "{:>10} ", elapsed(record.timestamp_ns));
        }
        let _ = write!(line, "{}", record.event);
        line
    }
}

/// One JSON object per record.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates the formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Writes `"key": "value"` with the value escaped.
fn push_str_field(out: &mut String, key: &str, value: &str) {
    let _ = write!(out, "\"{key}\": \"");
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_num_field(out: &mut String, key: &str, value: impl fmt::Display) {
    let _ = write!(out, "\"{key}\": {value}");
}

fn event_data(event: &TraceEvent) -> String {
    let mut data = String::new();
    let sep = |d: &mut String| d.push_str(", ");
    match event {
        TraceEvent::PhaseStart { phase } | TraceEvent::PhaseEnd { phase } => {
            push_str_field(&mut data, "target", &phase.to_string());
        }
        TraceEvent::RuleDefined { rule, scope } => {
            push_str_field(&mut data, "rule", rule);
            sep(&mut data);
            push_num_field(&mut data, "scope", scope);
        }
        TraceEvent::RuleAliased { rule, target } => {
            push_str_field(&mut data, "rule", rule);
            sep(&mut data);
            push_str_field(&mut data, "target", target);
        }
        TraceEvent::TypeDeclared { name, origin } => {
            push_str_field(&mut data, "name", name);
            sep(&mut data);
            push_str_field(&mut data, "origin", origin);
        }
        TraceEvent::RuleInlined { rule, into } => {
            push_str_field(&mut data, "rule", rule);
            sep(&mut data);
            push_str_field(&mut data, "into", into);
        }
        TraceEvent::MembersGenerated { type_name, count } => {
            push_str_field(&mut data, "type", type_name);
            sep(&mut data);
            push_num_field(&mut data, "count", count);
        }
        TraceEvent::OutputRequested { namespace, file }
        | TraceEvent::OutputSkipped { namespace, file } => {
            push_str_field(&mut data, "namespace", namespace);
            sep(&mut data);
            push_str_field(&mut data, "file", file);
        }
        TraceEvent::OutputResolved {
            namespace,
            file,
            system_id,
        } => {
            push_str_field(&mut data, "namespace", namespace);
            sep(&mut data);
            push_str_field(&mut data, "file", file);
            sep(&mut data);
            push_str_field(&mut data, "system_id", system_id);
        }
    }
    data
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut out = String::from("{");
        push_num_field(&mut out, "id", record.id);
        out.push_str(", ");
        push_str_field(&mut out, "phase", &record.phase.to_string());
        out.push_str(", ");
        push_num_field(&mut out, "timestamp_ns", record.timestamp_ns);
        out.push_str(", ");
        push_str_field(&mut out, "type", record.event_type());
        let _ = write!(out, ", \"data\": {{{}}}}}", event_data(&record.event));
        out
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let items: Vec<String> = records.iter().map(|r| self.format(r)).collect();
        format!("[{}]", items.join(","))
    }
}
