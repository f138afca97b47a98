//! Compiler configuration.

use rngscribe_foundation::TracerConfig;

/// Options controlling how a grammar is compiled into a type model.
#[derive(Clone, Debug)]
pub struct CompilerOptions {
    /// Type name used when a grammar's start rule is materialized.
    pub root_type_name: String,

    /// Whether members return the enclosing type for fluent chaining.
    pub chain_methods: bool,

    /// Tracing of compiler decisions.
    pub tracer: TracerConfig,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            root_type_name: "Root".to_string(),
            chain_methods: true,
            tracer: TracerConfig::default(),
        }
    }
}

impl CompilerOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for debugging: every decision is traced to stderr.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            tracer: TracerConfig::new().enabled().to_stderr(),
            ..Self::default()
        }
    }

    /// Builder method to set the root type name.
    #[must_use]
    pub fn with_root_type_name(mut self, name: impl Into<String>) -> Self {
        self.root_type_name = name.into();
        self
    }

    /// Builder method to enable/disable method chaining.
    #[must_use]
    pub fn with_chain_methods(mut self, chain: bool) -> Self {
        self.chain_methods = chain;
        self
    }

    /// Builder method to set the tracer configuration.
    #[must_use]
    pub fn with_tracer(mut self, tracer: TracerConfig) -> Self {
        self.tracer = tracer;
        self
    }
}
