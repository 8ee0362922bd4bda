use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::io::{stderr, stdout, Result, Write};
use std::rc::Rc;

use crate::effect::{Category, EffectSet};
use crate::err::Error;
use crate::imbue::EffectString;
use crate::opt::{Mirroring, Options};
use crate::stack::EffectStack;
use crate::{sys, Persist};

/// The opaque identity of a stream added with [`Registry::add_stream`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamId(usize);

/// The identity of an output stream.
///
/// Standard output and standard error have fixed identities. All other
/// streams are identified by the [`StreamId`] assigned by
/// [`Registry::add_stream`], which only makes sense for that registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// Another stream added to a registry.
    Other(StreamId),
}

impl Stream {
    /// Determine whether this stream is standard output or standard error.
    pub const fn is_standard(&self) -> bool {
        matches!(self, Self::Stdout | Self::Stderr)
    }

    /// Get the other standard stream.
    const fn sibling(&self) -> Option<Self> {
        match self {
            Self::Stdout => Some(Self::Stderr),
            Self::Stderr => Some(Self::Stdout),
            Self::Other(_) => None,
        }
    }
}

impl core::fmt::Display for Stream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stdout => f.write_str("standard output"),
            Self::Stderr => f.write_str("standard error"),
            Self::Other(StreamId(index)) => write!(f, "stream #{}", index),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------

struct State {
    options: Options,
    linked: bool,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
    others: Vec<Box<dyn Write>>,
    stacks: HashMap<Stream, EffectStack>,
}

impl State {
    /// Get the key for the stream's stack. Linked standard streams share the
    /// stack of standard output.
    fn key(&self, stream: Stream) -> Stream {
        if self.linked && stream == Stream::Stderr {
            Stream::Stdout
        } else {
            stream
        }
    }

    fn stack(&self, stream: Stream) -> Option<&EffectStack> {
        self.stacks.get(&self.key(stream))
    }

    fn stack_mut(&mut self, stream: Stream) -> &mut EffectStack {
        let key = self.key(stream);
        self.stacks.entry(key).or_default()
    }

    fn effective(&self, stream: Stream, category: Category) -> &'static str {
        self.stack(stream)
            .map_or(category.default_code(), |s| s.effective(category))
    }

    fn check(&self, stream: Stream) -> Result<()> {
        match stream {
            Stream::Other(StreamId(index)) if self.others.len() <= index => {
                Err(Error::UnknownStream(stream).into())
            }
            _ => Ok(()),
        }
    }

    fn writer(&mut self, stream: Stream) -> Result<&mut dyn Write> {
        match stream {
            Stream::Stdout => Ok(&mut *self.stdout),
            Stream::Stderr => Ok(&mut *self.stderr),
            Stream::Other(StreamId(index)) => self
                .others
                .get_mut(index)
                .map(|w| &mut **w as &mut dyn Write)
                .ok_or_else(|| Error::UnknownStream(stream).into()),
        }
    }

    /// Write escape sequences to the stream and, if linked, its sibling.
    fn emit(&mut self, stream: Stream, effects: &EffectSet) -> Result<()> {
        if effects.is_empty() {
            return Ok(());
        }

        let codes = effects.to_string();
        let auto_flush = self.options.auto_flush();
        let mirror = if self.linked { stream.sibling() } else { None };

        for target in core::iter::once(stream).chain(mirror) {
            let writer = self.writer(target)?;
            writer.write_all(codes.as_bytes())?;
            if auto_flush {
                writer.flush()?;
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------------------

thread_local! {
    static STANDARD: Registry = Registry::new();
}

/// A registry of streams and their effect stacks.
///
/// A registry owns the writers for standard output, standard error, and any
/// number of other streams, as well as one [`EffectStack`] per stream. It
/// hands out [`Persist`] guards that style a stream for as long as they
/// live, and renders [`EffectString`]s relative to a stream's current style.
///
/// Registries are cheap handles to shared state; clones refer to the same
/// streams and stacks. Since that state is not synchronized, registries
/// cannot be sent to other threads. [`Registry::standard`] returns the
/// thread's default registry for the process's standard streams.
///
/// A stream's writer must not use its own registry. Operations that write
/// fail with [`Error::Reentrant`] instead, while queries such as
/// [`Registry::effective`] panic. Also, a [`Persist`] added as writer to its
/// own registry keeps that registry alive forever.
///
///
/// # Example
///
/// ```
/// # use std::io::Write;
/// # use prettyscope::{effect::{BOLD, RED}, Registry, Stream};
/// # use prettyscope::opt::{Mirroring, Options};
/// # use prettyscope::util::Capture;
/// let output = Capture::new();
/// let registry = Registry::with_writers(
///     Options::builder().mirroring(Mirroring::Never).build(),
///     output.clone(),
///     std::io::sink(),
/// );
///
/// {
///     let mut warning = registry.apply(Stream::Stdout, RED)?;
///     write!(warning, "careful")?;
///     warning.apply(BOLD)?;
///     write!(warning, "!")?;
/// }
///
/// assert_eq!(
///     output.contents(),
///     "\x1b[31mcareful\x1b[1m!\x1b[39m\x1b[49m\x1b[22m\x1b[24m\x1b[25m"
/// );
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone)]
pub struct Registry {
    state: Rc<RefCell<State>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a new registry for the process's standard streams with the
    /// default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a new registry for the process's standard streams with the
    /// given options.
    pub fn with_options(options: Options) -> Self {
        Self::with_writers(options, stdout(), stderr())
    }

    /// Create a new registry with the given writers standing in for standard
    /// output and standard error.
    ///
    /// With [`Mirroring::Auto`], the decision to link the two streams still
    /// depends on the process's actual standard streams being terminals.
    pub fn with_writers(
        options: Options,
        stdout: impl Write + 'static,
        stderr: impl Write + 'static,
    ) -> Self {
        let linked = match options.mirroring() {
            Mirroring::Auto => {
                sys::is_terminal(Stream::Stdout) && sys::is_terminal(Stream::Stderr)
            }
            Mirroring::Always => true,
            Mirroring::Never => false,
        };
        log::debug!(
            "create registry with {:?} mirroring, standard streams {}",
            options.mirroring(),
            if linked { "linked" } else { "independent" }
        );

        Self {
            state: Rc::new(RefCell::new(State {
                options,
                linked,
                stdout: Box::new(stdout),
                stderr: Box::new(stderr),
                others: Vec::new(),
                stacks: HashMap::new(),
            })),
        }
    }

    /// Get this thread's standard registry.
    ///
    /// The standard registry writes to the process's standard streams and
    /// uses the default options. It is created on first use and lives as long
    /// as the thread.
    pub fn standard() -> Self {
        STANDARD.with(Registry::clone)
    }

    /// Get a copy of this registry's options.
    pub fn options(&self) -> Options {
        self.state.borrow().options.clone()
    }

    /// Determine whether standard output and standard error are linked, i.e.,
    /// share an effect stack and mirror escape sequences.
    pub fn is_linked(&self) -> bool {
        self.state.borrow().linked
    }

    /// Add another stream to this registry.
    pub fn add_stream(&self, writer: impl Write + 'static) -> Result<Stream> {
        let mut state = self.state_mut()?;
        let stream = Stream::Other(StreamId(state.others.len()));
        state.others.push(Box::new(writer));
        log::debug!("add {}", stream);
        Ok(stream)
    }

    /// Style the stream with the given effects until the returned guard is
    /// dropped or released.
    ///
    /// This method writes the escape sequences for the given effects to the
    /// stream.
    pub fn apply(&self, stream: Stream, effects: impl Into<EffectSet>) -> Result<Persist> {
        let effects = effects.into();
        let (index, visible) = {
            let mut state = self.state_mut()?;
            state.check(stream)?;
            state.stack_mut(stream).push(&effects)
        };

        // On error, dropping the guard deletes the entry again.
        let persist = Persist::new(self.clone(), stream, index);
        let result = self
            .state_mut()
            .and_then(|mut state| state.emit(stream, &visible));
        result.map(|()| persist)
    }

    /// Create a guard for the stream that does not style the stream yet.
    ///
    /// The guard's position relative to other guards is fixed upon creation.
    /// Effects applied to it later may thus be masked by guards created
    /// afterwards.
    pub fn persist(&self, stream: Stream) -> Result<Persist> {
        let mut state = self.state_mut()?;
        state.check(stream)?;
        let index = state.stack_mut(stream).push_empty();
        Ok(Persist::new(self.clone(), stream, index))
    }

    /// Write plain text to the stream.
    ///
    /// Plain text is never mirrored.
    pub fn write_str(&self, stream: Stream, text: &str) -> Result<()> {
        self.write_all(stream, text.as_bytes())
    }

    /// Render the effect string for the stream.
    ///
    /// The result embeds escape sequences that restore the stream's current
    /// style after each styled segment. It is only valid until the stream's
    /// style changes next.
    pub fn render(&self, stream: Stream, text: &EffectString) -> String {
        let state = self.state.borrow();
        text.render_with(|category| state.effective(stream, category))
    }

    /// Render the effect string for the stream and write the result to the
    /// stream.
    pub fn print(&self, stream: Stream, text: &EffectString) -> Result<()> {
        let rendered = self.render(stream, text);
        self.write_str(stream, &rendered)
    }

    /// Get the escape sequence currently in force on the stream for the
    /// given category.
    pub fn effective(&self, stream: Stream, category: Category) -> &'static str {
        self.state.borrow().effective(stream, category)
    }

    /// Get the escape sequences currently in force on the stream.
    pub fn effective_set(&self, stream: Stream) -> EffectSet {
        self.state.borrow().stack(stream).map_or_else(
            || Category::ALL.into_iter().map(|c| c.default_effect()).collect(),
            EffectStack::effective_set,
        )
    }

    /// Get the number of entries on the stream's effect stack, not counting
    /// the sentinel but counting deleted entries that have not been compacted
    /// yet.
    pub fn depth(&self, stream: Stream) -> usize {
        self.state
            .borrow()
            .stack(stream)
            .map_or(0, |s| s.len() - 1)
    }

    // --------------------------------------------------------------------------------------------------

    /// Mutably borrow the state, failing if a writer calls back into this
    /// registry.
    fn state_mut(&self) -> Result<RefMut<'_, State>> {
        self.state
            .try_borrow_mut()
            .map_err(|_| Error::Reentrant.into())
    }

    pub(crate) fn write_all(&self, stream: Stream, bytes: &[u8]) -> Result<()> {
        self.state_mut()?.writer(stream)?.write_all(bytes)
    }

    pub(crate) fn flush(&self, stream: Stream) -> Result<()> {
        self.state_mut()?.writer(stream)?.flush()
    }

    pub(crate) fn set(&self, stream: Stream, index: usize, effects: &EffectSet) -> Result<()> {
        let mut state = self.state_mut()?;
        let visible = state.stack_mut(stream).set_all(index, effects);
        state.emit(stream, &visible)
    }

    pub(crate) fn copy(&self, stream: Stream, index: usize) -> Result<usize> {
        let mut state = self.state_mut()?;
        let stack = state.stack_mut(stream);
        let snapshot = stack.snapshot(index);
        let (copy, visible) = stack.push(&snapshot);

        // A failed write must not leak the new entry. With mirroring, the
        // first stream may have received the codes already, so restore it.
        if let Err(error) = state.emit(stream, &visible) {
            if let Some(effective) = state.stack_mut(stream).delete(copy) {
                if let Err(restore_error) = state.emit(stream, &effective) {
                    log::warn!("could not restore style of {}: {}", stream, restore_error);
                }
            }
            return Err(error);
        }
        Ok(copy)
    }

    pub(crate) fn snapshot(&self, stream: Stream, index: usize) -> EffectSet {
        self.state
            .borrow()
            .stack(stream)
            .map_or_else(EffectSet::new, |s| s.snapshot(index))
    }

    pub(crate) fn delete(&self, stream: Stream, index: usize) -> Result<()> {
        let mut state = self.state_mut()?;
        state
            .stack_mut(stream)
            .delete(index)
            .map_or(Ok(()), |effective| state.emit(stream, &effective))
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Registry")
            .field("options", &state.options)
            .field("linked", &state.linked)
            .field("streams", &(2 + state.others.len()))
            .field("stacks", &state.stacks)
            .finish()
    }
}

// ----------------------------------------------------------------------------------------------------------
