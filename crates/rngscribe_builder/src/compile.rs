//! Compilation entry point.

use rngscribe_foundation::{Result, Tracer};
use rngscribe_foundation::trace::TraceBuffer;
use rngscribe_model::{CompilerOptions, NodeSet, TypeModel};

use crate::builder::GrammarBuilder;
use crate::datatype::DatatypeResolver;
use crate::protocol::Parseable;

/// The result of compiling a grammar.
#[derive(Debug)]
pub struct CompiledSchema {
    model: TypeModel,
    tracer: Tracer,
}

impl CompiledSchema {
    /// The generated writer types.
    #[must_use]
    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    /// Consumes the result, returning the writer types.
    #[must_use]
    pub fn into_model(self) -> TypeModel {
        self.model
    }

    /// Trace records gathered while compiling. Empty unless tracing was
    /// enabled in the options.
    #[must_use]
    pub fn trace(&self) -> &TraceBuffer {
        self.tracer.buffer()
    }

    /// The tracer used while compiling.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }
}

/// Parses `source` into a [`GrammarBuilder`] and compiles the result.
///
/// # Errors
///
/// Returns the first schema build error raised while parsing, an
/// `UnresolvedReference` for a rule that is used but never defined, or a
/// `RecursiveInline` error for inline rules that splice into each other.
pub fn compile<P>(
    source: &P,
    resolver: impl DatatypeResolver + 'static,
    options: CompilerOptions,
) -> Result<CompiledSchema>
where
    P: Parseable<GrammarBuilder> + ?Sized,
{
    let tracer = Tracer::new(options.tracer.clone());
    let mut builder = GrammarBuilder::new(resolver).with_tracer(tracer);
    let top = source.parse(&mut builder)?;

    let (defines, entry, mut tracer) = builder.finish(top);
    let model = NodeSet::new(defines, entry, options)?.compile(&mut tracer)?;
    Ok(CompiledSchema { model, tracer })
}
