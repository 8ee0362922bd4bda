use std::io::{Result, Write};

use crate::effect::EffectSet;
use crate::imbue::EffectString;
use crate::{Registry, Stream};

/// A guard that styles a stream for as long as it lives.
///
/// Each live guard owns one entry on its stream's effect stack. Effects
/// applied to the guard are recorded in that entry and written to the stream
/// unless a guard created later already styles the same category. When the
/// guard is dropped or released, the entry is deleted and the stream reverts
/// to whatever style the remaining guards dictate.
///
/// Guards need not be dropped in the order they were created. Since Rust
/// moves are bitwise, moving a guard has no effect on the stream. Cloning a
/// guard creates a new entry on top of the stack with the same effects as the
/// original, which restyles the stream accordingly.
///
/// Writing to a guard writes plain text to its stream, making it easy to
/// style some output with `write!`.
///
///
/// # Example
///
/// ```
/// # use std::io::Write;
/// # use prettyscope::{effect::{BLUE, BOLD, UNDERLINED}, Registry, Stream};
/// # use prettyscope::opt::{Mirroring, Options};
/// # use prettyscope::util::Capture;
/// let output = Capture::new();
/// let registry = Registry::with_writers(
///     Options::builder().mirroring(Mirroring::Never).build(),
///     output.clone(),
///     std::io::sink(),
/// );
///
/// let mut outer = registry.persist(Stream::Stdout)?;
/// let mut inner = registry.apply(Stream::Stdout, BOLD)?;
///
/// // Bold is masked by the inner guard, blue is not.
/// outer.apply(BLUE | BOLD)?;
/// assert_eq!(output.take(), "\x1b[1m\x1b[34m");
///
/// inner.release()?;
/// write!(outer, "still bold")?;
/// assert!(output.take().ends_with("still bold"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Persist {
    registry: Registry,
    stream: Stream,
    index: usize,
}

impl Persist {
    pub(crate) fn new(registry: Registry, stream: Stream, index: usize) -> Self {
        Self {
            registry,
            stream,
            index,
        }
    }

    /// Get this guard's stream.
    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Get this guard's registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Determine whether this guard has been released and no longer styles
    /// its stream.
    pub fn is_released(&self) -> bool {
        self.index == 0
    }

    /// Apply more effects.
    ///
    /// The effects replace any effects of the same category previously
    /// applied to this guard. The stream changes only for categories not
    /// styled by guards created later. Applying effects to a released guard
    /// does nothing.
    pub fn apply(&mut self, effects: impl Into<EffectSet>) -> Result<&mut Self> {
        if !self.is_released() {
            self.registry
                .set(self.stream, self.index, &effects.into())?;
        }
        Ok(self)
    }

    /// Get the effects applied to this guard so far.
    pub fn snapshot(&self) -> EffectSet {
        self.registry.snapshot(self.stream, self.index)
    }

    /// Render the effect string for this guard's stream and write it.
    pub fn print(&mut self, text: &EffectString) -> Result<&mut Self> {
        self.registry.print(self.stream, text)?;
        Ok(self)
    }

    /// Create a new guard with the same effects on top of the stack.
    ///
    /// Cloning a released guard yields another released guard.
    pub fn try_clone(&self) -> Result<Self> {
        let index = if self.is_released() {
            0
        } else {
            self.registry.copy(self.stream, self.index)?
        };
        Ok(Self::new(self.registry.clone(), self.stream, index))
    }

    /// Take this guard's entry, leaving a released guard behind.
    pub fn take(&mut self) -> Self {
        let index = core::mem::take(&mut self.index);
        Self::new(self.registry.clone(), self.stream, index)
    }

    /// Release this guard.
    ///
    /// This method deletes the guard's entry and restyles the stream. Calling
    /// it more than once is harmless.
    pub fn release(&mut self) -> Result<()> {
        match core::mem::take(&mut self.index) {
            0 => Ok(()),
            index => self.registry.delete(self.stream, index),
        }
    }
}

impl Clone for Persist {
    /// Create a new guard with the same effects.
    ///
    /// If writing the escape sequences fails, the error is logged and the
    /// clone is released. Use [`Persist::try_clone`] to handle the error.
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|error| {
            log::warn!("could not style {} for cloned guard: {}", self.stream, error);
            Self::new(self.registry.clone(), self.stream, 0)
        })
    }

    /// Replace this guard's entry with a copy of the source's entry.
    fn clone_from(&mut self, source: &Self) {
        *self = source.clone();
    }
}

impl Write for Persist {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.registry.write_all(self.stream, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.registry.flush(self.stream)
    }
}

impl Drop for Persist {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            log::warn!("could not restore style of {}: {}", self.stream, error);
        }
    }
}

impl core::fmt::Debug for Persist {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Persist")
            .field("stream", &self.stream)
            .field("index", &self.index)
            .field("effects", &self.snapshot())
            .finish()
    }
}

// ----------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::effect::*;
    use crate::opt::{Mirroring, Options};
    use crate::util::Capture;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn registry() -> (Registry, Capture) {
        let output = Capture::new();
        let registry = Registry::with_writers(
            Options::builder().mirroring(Mirroring::Never).build(),
            output.clone(),
            std::io::sink(),
        );
        (registry, output)
    }

    #[test]
    fn test_apply_and_snapshot() -> Result<()> {
        let (registry, output) = registry();
        let mut guard = registry.persist(Stream::Stdout)?;
        assert!(guard.snapshot().is_empty());
        assert_eq!(registry.depth(Stream::Stdout), 1);
        assert!(output.is_empty());

        guard.apply(RED)?.apply(BOLD | GREEN)?;
        assert_eq!(guard.snapshot(), GREEN | BOLD);
        assert_eq!(output.take(), "\x1b[31m\x1b[32m\x1b[1m");

        write!(guard, "text")?;
        assert_eq!(output.take(), "text");
        Ok(())
    }

    #[test]
    fn test_masked_apply() -> Result<()> {
        let (registry, output) = registry();
        let mut outer = registry.apply(Stream::Stdout, RED)?;
        let inner = registry.apply(Stream::Stdout, GREEN)?;
        output.take();

        outer.apply(BLUE)?;
        assert_eq!(output.take(), "");
        assert_eq!(outer.snapshot(), EffectSet::from(BLUE));

        drop(inner);
        assert_eq!(output.take(), "\x1b[34m\x1b[49m\x1b[22m\x1b[24m\x1b[25m");
        Ok(())
    }

    #[test]
    fn test_release() -> Result<()> {
        let (registry, output) = registry();
        let mut guard = registry.apply(Stream::Stdout, FAINT)?;
        output.take();

        guard.release()?;
        assert!(guard.is_released());
        assert_eq!(output.take(), "\x1b[39m\x1b[49m\x1b[22m\x1b[24m\x1b[25m");

        guard.release()?;
        guard.apply(BOLD)?;
        assert!(guard.snapshot().is_empty());
        drop(guard);
        assert!(output.is_empty());
        assert_eq!(registry.depth(Stream::Stdout), 0);
        Ok(())
    }

    #[test]
    fn test_clone_is_independent() -> Result<()> {
        let (registry, output) = registry();
        let original = registry.apply(Stream::Stdout, MAGENTA | UNDERLINED)?;
        output.take();

        let mut copy = original.try_clone()?;
        assert_eq!(copy.snapshot(), original.snapshot());
        assert_eq!(output.take(), "\x1b[35m\x1b[4m");
        assert_eq!(registry.depth(Stream::Stdout), 2);

        copy.apply(CYAN)?;
        assert_eq!(original.snapshot(), MAGENTA | UNDERLINED);
        assert_eq!(copy.snapshot(), CYAN | UNDERLINED);

        drop(original);
        assert_eq!(registry.effective(Stream::Stdout, Category::Foreground), CYAN.code());
        drop(copy);
        assert_eq!(registry.depth(Stream::Stdout), 0);
        Ok(())
    }

    #[test]
    fn test_clone_from() -> Result<()> {
        let (registry, _) = registry();
        let source = registry.apply(Stream::Stdout, YELLOW)?;
        let mut target = registry.apply(Stream::Stdout, BLINKING)?;

        target.clone_from(&source);
        assert_eq!(target.snapshot(), EffectSet::from(YELLOW));
        assert_eq!(registry.effective(Stream::Stdout, Category::Blink), NOT_BLINKING.code());
        assert_eq!(registry.effective(Stream::Stdout, Category::Foreground), YELLOW.code());

        let released = Persist::new(registry.clone(), Stream::Stdout, 0);
        assert!(released.clone().is_released());
        Ok(())
    }

    #[test]
    fn test_move_and_take() -> Result<()> {
        let (registry, output) = registry();
        let guards = vec![registry.apply(Stream::Stdout, BOLD)?];
        output.take();

        // Moves are neutral.
        let mut guards: Vec<Persist> = guards.into_iter().collect();
        assert!(output.is_empty());

        let taken = guards[0].take();
        assert!(guards[0].is_released());
        assert_eq!(taken.snapshot(), EffectSet::from(BOLD));
        drop(guards);
        assert!(output.is_empty());

        drop(taken);
        assert_eq!(output.take(), "\x1b[39m\x1b[49m\x1b[22m\x1b[24m\x1b[25m");
        Ok(())
    }

    #[test]
    fn test_print() -> Result<()> {
        let (registry, output) = registry();
        let mut guard = registry.apply(Stream::Stdout, GREEN)?;
        output.take();

        guard.print(&crate::imbue(BLUE, "X"))?;
        assert_eq!(output.take(), "\x1b[34mX\x1b[32m");
        Ok(())
    }

    #[test]
    fn test_apply_below_buried_entry() -> Result<()> {
        let (registry, output) = registry();
        let mut a = registry.persist(Stream::Stdout)?;
        let b = registry.apply(Stream::Stdout, RED)?;
        let _c = registry.apply(Stream::Stdout, BOLD)?;

        drop(b);
        assert_eq!(registry.depth(Stream::Stdout), 3);
        output.take();

        // The destructed entry above no longer masks the foreground.
        a.apply(GREEN)?;
        assert_eq!(output.take(), "\x1b[32m");
        Ok(())
    }

    /// Update the terminal's state with the escape sequences written.
    fn track(written: &str, terminal: &mut [&'static str; Category::COUNT]) {
        for piece in written.split('\x1b').filter(|p| !p.is_empty()) {
            let code = format!("\x1b{}", piece);
            let effect = EFFECTS
                .iter()
                .find(|e| e.code() == code)
                .expect("only known escape sequences are written");
            terminal[effect.category().index()] = effect.code();
        }
    }

    /// Check random sequences of guard operations against a naive model that
    /// recomputes the effective codes from scratch.
    #[test]
    fn test_against_model() -> Result<()> {
        const EFFECTS_POOL: [Effect; 8] = [
            RED, BLUE, BOLD, FAINT, UNDERLINED, BLINKING, BACKGROUND_CYAN, DEFAULT_FOREGROUND,
        ];

        let mut rng = StdRng::seed_from_u64(665);
        let (registry, output) = registry();
        let mut terminal = Category::ALL.map(|c| c.default_code());

        for _ in 0..50 {
            // Each live guard with its creation order and its effects.
            let mut guards: Vec<(usize, Persist, EffectSet)> = Vec::new();
            let mut serial = 0;

            for _ in 0..40 {
                let op = rng.random_range(0..4);
                if op == 0 || guards.is_empty() {
                    let effect = EFFECTS_POOL[rng.random_range(0..EFFECTS_POOL.len())];
                    guards.push((serial, registry.apply(Stream::Stdout, effect)?, effect.into()));
                    serial += 1;
                } else if op == 1 {
                    let index = rng.random_range(0..guards.len());
                    let copy = guards[index].1.try_clone()?;
                    let effects = guards[index].2;
                    guards.push((serial, copy, effects));
                    serial += 1;
                } else if op == 2 {
                    let index = rng.random_range(0..guards.len());
                    let effect = EFFECTS_POOL[rng.random_range(0..EFFECTS_POOL.len())];
                    guards[index].1.apply(effect)?;
                    guards[index].2 |= effect;
                } else {
                    let index = rng.random_range(0..guards.len());
                    let (_, mut guard, _) = guards.swap_remove(index);
                    if rng.random_bool(0.5) {
                        guard.release()?;
                    }
                }

                guards.sort_by_key(|(serial, _, _)| *serial);
                for category in Category::ALL {
                    let expected = guards
                        .iter()
                        .rev()
                        .find_map(|(_, _, effects)| effects.get(category))
                        .unwrap_or_else(|| category.default_code());
                    assert_eq!(registry.effective(Stream::Stdout, category), expected);
                }
                track(&output.take(), &mut terminal);
                for category in Category::ALL {
                    assert_eq!(
                        terminal[category.index()],
                        registry.effective(Stream::Stdout, category),
                        "last {:?} written",
                        category
                    );
                }
                for (_, guard, effects) in guards.iter() {
                    assert_eq!(guard.snapshot(), *effects);
                }
            }

            guards.clear();
            assert_eq!(registry.depth(Stream::Stdout), 0);
            track(&output.take(), &mut terminal);
            assert_eq!(terminal, Category::ALL.map(|c| c.default_code()));
        }
        Ok(())
    }
}
