//! The per-stream effect stack.
//!
//! An [`EffectStack`] tracks, for one output stream, which effects are
//! currently in force. Entry 0 is a sentinel holding every category's default
//! escape sequence; all other entries belong to one [`Persist`] each and hold
//! the effects that guard contributes, with `None` meaning "no opinion".
//!
//! The stack is really a *pseudostack*: Guards may go out of scope in any
//! order. Deleting an entry only marks it as destructed. Destructed entries
//! are removed once they reach the top of the stack, while buried ones simply
//! stop contributing. The escape sequence that should be visible for a
//! category is the code of the topmost live entry with an opinion for that
//! category, which always exists thanks to the sentinel.
//!
//! All methods are pure state transitions. Instead of writing to a stream,
//! they return the escape sequences that need to be written, leaving actual
//! I/O to the [`Registry`](crate::Registry).
//!
//! [`Persist`]: crate::Persist

use crate::effect::{Category, Codes, EffectSet};

#[derive(Clone, Debug)]
struct Entry {
    codes: Codes,
    destructed: bool,
}

impl Entry {
    const fn empty() -> Self {
        Self {
            codes: [None; Category::COUNT],
            destructed: false,
        }
    }

    fn sentinel() -> Self {
        let mut codes = [None; Category::COUNT];
        for category in Category::ALL {
            codes[category.index()] = Some(category.default_code());
        }

        Self {
            codes,
            destructed: false,
        }
    }
}

/// The effect stack for a single stream.
#[derive(Clone, Debug)]
pub struct EffectStack {
    entries: Vec<Entry>,
}

impl Default for EffectStack {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStack {
    /// Create a new stack holding only the sentinel with the default codes.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::sentinel()],
        }
    }

    /// Get the number of entries, including the sentinel and destructed
    /// entries that have not been compacted yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine whether this stack holds nothing but the sentinel.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    /// Determine whether the entry with the given index exists and has not
    /// been destructed. The sentinel is not considered live.
    pub fn is_live(&self, index: usize) -> bool {
        index != 0 && self.entries.get(index).is_some_and(|e| !e.destructed)
    }

    /// Push a new entry without any effects and return its index.
    pub fn push_empty(&mut self) -> usize {
        let index = self.entries.len();
        self.entries.push(Entry::empty());
        log::trace!("push entry {}", index);
        index
    }

    /// Push a new entry with the given effects.
    ///
    /// This method returns the new entry's index as well as the escape
    /// sequences that became visible. Since the new entry is on top of the
    /// stack, the latter are all of the given effects.
    pub fn push(&mut self, effects: &EffectSet) -> (usize, EffectSet) {
        let index = self.push_empty();
        let visible = self.set_all(index, effects);
        (index, visible)
    }

    /// Update the given category of the entry with the given index.
    ///
    /// If no live entry above the updated entry has an opinion on the same
    /// category, this method returns the escape sequence, which now needs to
    /// be written to the stream. Updates to the sentinel, destructed entries,
    /// or nonexistent entries are ignored.
    pub fn set(
        &mut self,
        index: usize,
        category: Category,
        code: &'static str,
    ) -> Option<&'static str> {
        if !self.is_live(index) {
            log::trace!("ignore update of dead entry {}", index);
            return None;
        }

        let slot = category.index();
        self.entries[index].codes[slot] = Some(code);

        let masked = self.entries[index + 1..]
            .iter()
            .any(|e| !e.destructed && e.codes[slot].is_some());
        log::trace!(
            "set entry {} {:?} {}",
            index,
            category,
            if masked { "masked" } else { "visible" }
        );

        if masked {
            None
        } else {
            Some(code)
        }
    }

    /// Update the entry with the given index with all of the given effects.
    ///
    /// This method returns the effects that became visible.
    pub fn set_all(&mut self, index: usize, effects: &EffectSet) -> EffectSet {
        let mut visible = [None; Category::COUNT];
        for (category, code) in effects.iter() {
            visible[category.index()] = self.set(index, category, code);
        }
        EffectSet::from_codes(visible)
    }

    /// Get the effects of the entry with the given index.
    ///
    /// The snapshot of the sentinel, destructed entries, and nonexistent
    /// entries is empty.
    pub fn snapshot(&self, index: usize) -> EffectSet {
        if self.is_live(index) {
            EffectSet::from_codes(self.entries[index].codes)
        } else {
            EffectSet::new()
        }
    }

    /// Delete the entry with the given index.
    ///
    /// The entry is marked as destructed. If it is on top of the stack, it is
    /// removed together with all destructed entries directly below it. Since
    /// that may change any category, this method returns the effective codes
    /// for all categories, which need to be written to the stream. Deleting
    /// the sentinel, destructed entries, or nonexistent entries does nothing
    /// and returns `None`.
    pub fn delete(&mut self, index: usize) -> Option<EffectSet> {
        if !self.is_live(index) {
            log::trace!("ignore deletion of dead entry {}", index);
            return None;
        }

        self.entries[index].destructed = true;
        if index + 1 == self.entries.len() {
            while self.entries.last().is_some_and(|e| e.destructed) {
                self.entries.pop();
            }
        }

        log::trace!("delete entry {}, {} entries remain", index, self.entries.len());
        Some(self.effective_set())
    }

    /// Get the escape sequence currently in force for the given category.
    ///
    /// # Panics
    ///
    /// If the sentinel has gone missing. That is impossible through this
    /// type's interface.
    pub fn effective(&self, category: Category) -> &'static str {
        let slot = category.index();
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.destructed)
            .find_map(|e| e.codes[slot])
            .expect("sentinel entry always provides a default code")
    }

    /// Get the escape sequences currently in force for all categories.
    ///
    /// # Panics
    ///
    /// If the sentinel has gone missing. That is impossible through this
    /// type's interface.
    pub fn effective_set(&self) -> EffectSet {
        let mut codes = [None; Category::COUNT];
        for category in Category::ALL {
            codes[category.index()] = Some(self.effective(category));
        }
        EffectSet::from_codes(codes)
    }
}

// ----------------------------------------------------------------------------------------------------------
