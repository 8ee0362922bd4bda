//! Helper module with the options for registries.
//!
//! This module provides the options for a [`Registry`](crate::Registry) and
//! the corresponding builder.
//!
//!
//! # Example
//!
//! ```
//! # use prettyscope::opt::{Mirroring, Options};
//! let options = Options::builder()
//!     .mirroring(Mirroring::Never)
//!     .auto_flush(false)
//!     .build();
//!
//! assert_eq!(options.mirroring(), Mirroring::Never);
//! assert!(!options.auto_flush());
//! ```

/// The policy for mirroring escape sequences between standard output and
/// standard error.
///
/// When both standard streams are connected to the same terminal, the
/// terminal has only one set of text attributes, no matter which stream wrote
/// an escape sequence. In that case, the two streams share one effect stack
/// and all escape sequences written to one stream are also written to the
/// other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mirroring {
    /// Link the standard streams if both are terminals. The check happens
    /// once, when the registry is created.
    #[default]
    Auto,
    /// Always link the standard streams, as if both were terminals.
    Always,
    /// Never link the standard streams, as if neither was a terminal.
    Never,
}

#[derive(Clone, Debug)]
struct OptionData {
    mirroring: Mirroring,
    auto_flush: bool,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            mirroring: Mirroring::Auto,
            auto_flush: true,
        }
    }
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set the mirroring policy.
    pub fn mirroring(&mut self, mirroring: Mirroring) -> &mut Self {
        self.0.mirroring = mirroring;
        self
    }

    /// Set whether to flush streams after writing escape sequences.
    ///
    /// Flushing ensures that escape sequences written to one standard stream
    /// take effect before text written to the other standard stream.
    pub fn auto_flush(&mut self, auto_flush: bool) -> &mut Self {
        self.0.auto_flush = auto_flush;
        self
    }

    /// Instantiate the options.
    pub fn build(&self) -> Options {
        Options(self.0.clone())
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Get the mirroring policy.
    pub fn mirroring(&self) -> Mirroring {
        self.0.mirroring
    }

    /// Determine whether streams are flushed after writing escape sequences.
    pub fn auto_flush(&self) -> bool {
        self.0.auto_flush
    }
}
