//! A resolver wrapper that enforces the output-resolution contract.
//!
//! The wrapped resolver must either decline a namespace or return a sink
//! with a non-empty system id. A sink without one is a bug in the resolver,
//! so the wrapper panics instead of letting the backend write to nowhere.

use std::io;

use rngscribe_foundation::{CompilePhase, TraceEvent, Tracer};

use crate::resolver::{OutputResolver, OutputSink};

/// Checks every sink handed out by the wrapped resolver.
///
/// Calls pass straight through; nothing is cached.
#[derive(Debug)]
pub struct CheckedResolver<R> {
    inner: R,
    tracer: Tracer,
}

impl<R: OutputResolver> CheckedResolver<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            tracer: Tracer::disabled(),
        }
    }

    /// Builder method to record each request through `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, mut tracer: Tracer) -> Self {
        tracer.phase_start(CompilePhase::Output);
        self.tracer = tracer;
        self
    }

    /// The tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// The wrapped resolver.
    #[must_use]
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Unwraps the resolver.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: OutputResolver> OutputResolver for CheckedResolver<R> {
    type Output = R::Output;

    /// # Panics
    ///
    /// Panics if the wrapped resolver returns a sink whose system id is
    /// absent or empty.
    fn create_output(
        &mut self,
        namespace: &str,
        suggested_file_name: &str,
    ) -> io::Result<Option<R::Output>> {
        if self.tracer.is_enabled() {
            self.tracer.record(TraceEvent::OutputRequested {
                namespace: namespace.to_string(),
                file: suggested_file_name.to_string(),
            });
        }

        let output = self.inner.create_output(namespace, suggested_file_name)?;
        let Some(sink) = output else {
            if self.tracer.is_enabled() {
                self.tracer.record(TraceEvent::OutputSkipped {
                    namespace: namespace.to_string(),
                    file: suggested_file_name.to_string(),
                });
            }
            return Ok(None);
        };

        let suffix = format!("(Namespace: [{namespace}], Suggested FileName: [{suggested_file_name}])");
        let system_id = match sink.system_id() {
            None => panic!("System ID cannot be null. {suffix}"),
            Some("") => panic!("System ID cannot be empty. {suffix}"),
            Some(id) => id.to_string(),
        };

        if self.tracer.is_enabled() {
            self.tracer.record(TraceEvent::OutputResolved {
                namespace: namespace.to_string(),
                file: suggested_file_name.to_string(),
                system_id,
            });
        }
        Ok(Some(sink))
    }
}
