//! # Pretty 🌸 Scope
//!
//! This crate provides **scoped text styling for terminals**. Instead of
//! writing an escape sequence to turn on some effect and then remembering to
//! write another one that turns it off again, code creates a [`Persist`]
//! guard that styles a stream for as long as the guard lives. When the guard
//! goes away, the stream reverts to whatever style the remaining guards
//! dictate. Guards nest, need not be dropped in creation order, and can be
//! cloned, moved, and released early.
//!
//! The main abstractions are:
//!
//!   * An [`Effect`] is a named SGR escape sequence in one of five
//!     [`Category`]s, i.e., foreground color, background color, weight,
//!     underline, and blink. The [`effect`] module defines constants for all
//!     effects, and an [`EffectSet`] combines at most one per category, as in
//!     `RED | BOLD`.
//!   * A [`Registry`] owns the output streams and one effect stack per
//!     stream. [`Registry::apply`] and [`Registry::persist`] create guards.
//!   * A [`Persist`] guard owns one entry on its stream's effect stack.
//!   * An [`EffectString`] is text with effects that, when rendered, restores
//!     exactly the categories it changes, relative to the guards alive at
//!     that point. [`imbue()`] creates one.
//!
//! When standard output and standard error are both terminals, they most
//! likely share the same screen and hence the same text attributes. In that
//! case, a registry links the two streams: They share one effect stack and
//! all escape sequences written to one are also written to the other. The
//! [`opt`] module has the options controlling this behavior.
//!
//!
//! # Example
//!
//! ```
//! # use std::io::Write;
//! # use prettyscope::effect::{BLUE, BOLD, GREEN};
//! # use prettyscope::{imbue, Registry, Stream};
//! # use prettyscope::opt::{Mirroring, Options};
//! # use prettyscope::util::Capture;
//! let output = Capture::new();
//! let registry = Registry::with_writers(
//!     Options::builder().mirroring(Mirroring::Never).build(),
//!     output.clone(),
//!     std::io::sink(),
//! );
//!
//! {
//!     let mut green = registry.apply(Stream::Stdout, GREEN)?;
//!     green.print(&(imbue(BLUE | BOLD, "blue") + " green"))?;
//! }
//!
//! assert_eq!(
//!     output.contents(),
//!     "\x1b[32m\x1b[34m\x1b[1mblue\x1b[32m\x1b[22m green\
//!     \x1b[39m\x1b[49m\x1b[22m\x1b[24m\x1b[25m"
//! );
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! Registries are not thread-safe. Each thread has its own
//! [`Registry::standard`], which writes to the process's standard streams.
//!
//! Fallible operations return [`std::io::Result`], since writing escape
//! sequences is just more I/O. The crate logs registry creation and stack
//! operations through the [`log`](https://crates.io/crates/log) facade.

pub mod effect;
pub mod err;
mod imbue;
pub mod opt;
mod persist;
mod registry;
mod stack;
mod sys;
pub mod util;

pub use effect::{Category, Effect, EffectSet};
pub use imbue::{imbue, EffectString, Segment};
pub use persist::Persist;
pub use registry::{Registry, Stream, StreamId};
pub use stack::EffectStack;
