//! Output-location resolution.
//!
//! A code-rendering backend asks an [`OutputResolver`] where the output for
//! each namespace should go. The resolver may decline (`Ok(None)`), which
//! skips that namespace. A sink it does return must name where it writes
//! through [`OutputSink::system_id`].

use std::io;
use std::path::{Path, PathBuf};

/// Somewhere generated output can be written.
pub trait OutputSink {
    /// The identifier of the destination, usually a path or URI.
    fn system_id(&self) -> Option<&str>;
}

/// Decides where the output for a namespace goes.
pub trait OutputResolver {
    /// The sink type handed back.
    type Output: OutputSink;

    /// Returns the sink for `namespace`, or `None` to skip it.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while preparing the sink.
    fn create_output(
        &mut self,
        namespace: &str,
        suggested_file_name: &str,
    ) -> io::Result<Option<Self::Output>>;
}

impl<F, O> OutputResolver for F
where
    F: FnMut(&str, &str) -> io::Result<Option<O>>,
    O: OutputSink,
{
    type Output = O;

    fn create_output(
        &mut self,
        namespace: &str,
        suggested_file_name: &str,
    ) -> io::Result<Option<O>> {
        self(namespace, suggested_file_name)
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// A sink described only by its system id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputLocation {
    system_id: Option<String>,
}

impl OutputLocation {
    /// Creates a sink with the given system id.
    #[must_use]
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: Some(system_id.into()),
        }
    }

    /// Creates a sink that does not know its system id.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { system_id: None }
    }
}

impl OutputSink for OutputLocation {
    fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }
}

impl OutputSink for PathBuf {
    fn system_id(&self) -> Option<&str> {
        self.to_str()
    }
}

impl OutputSink for &Path {
    fn system_id(&self) -> Option<&str> {
        self.to_str()
    }
}

/// Resolves every namespace to a file in one directory, named by the
/// suggested file name.
#[derive(Clone, Debug)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Creates a resolver writing under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputResolver for DirectoryResolver {
    type Output = PathBuf;

    fn create_output(
        &mut self,
        _namespace: &str,
        suggested_file_name: &str,
    ) -> io::Result<Option<PathBuf>> {
        Ok(Some(self.root.join(suggested_file_name)))
    }
}
