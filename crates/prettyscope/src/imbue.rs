//! Strings with effects that restore the surrounding style.
//!
//! An [`EffectString`] is a sequence of segments, each with some text and the
//! effects to apply to that text. The escape sequences for restoring the
//! style after a segment cannot be known until the string is written, since
//! they depend on the guards alive at that point. Hence effect strings are
//! rendered by a [`Registry`](crate::Registry), which looks up the codes in
//! force on the target stream for every category a segment changes.
//!
//! ```
//! # use prettyscope::{effect::{BLUE, GREEN}, imbue, Registry, Stream};
//! # use prettyscope::opt::{Mirroring, Options};
//! let registry = Registry::with_writers(
//!     Options::builder().mirroring(Mirroring::Never).build(),
//!     std::io::sink(),
//!     std::io::sink(),
//! );
//! let _guard = registry.apply(Stream::Stdout, GREEN)?;
//!
//! let text = imbue(BLUE, "blue") + " and green";
//! assert_eq!(
//!     registry.render(Stream::Stdout, &text),
//!     "\x1b[34mblue\x1b[32m and green"
//! );
//! # Ok::<(), std::io::Error>(())
//! ```

use core::fmt::{Display, Write};

use crate::effect::{Category, EffectSet};

/// A run of text with the effects applied to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    effects: EffectSet,
    text: String,
}

impl Segment {
    /// Get the effects of this segment.
    pub fn effects(&self) -> EffectSet {
        self.effects
    }

    /// Get the text of this segment.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A string with embedded effects.
///
/// Effect strings are built with [`imbue`] and combined with `+`, `+=`,
/// [`EffectString::push`], and [`EffectString::append`]. Pushing plain text
/// onto a string that ends with plain text extends the last segment.
/// Combining two effect strings keeps their segments as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectString {
    segments: Vec<Segment>,
}

/// Create a new effect string for the text with the given effects.
///
/// To combine several values into one segment, use the [`imbue!`](crate::imbue!)
/// macro or pass [`format_args!`].
pub fn imbue(effects: impl Into<EffectSet>, text: impl Display) -> EffectString {
    EffectString::new(effects, text)
}

/// Create a new effect string for one or more values with the given effects.
///
/// All values are formatted with [`Display`] and joined into a single segment.
///
/// ```
/// # use prettyscope::effect::{BOLD, RED};
/// # use prettyscope::imbue;
/// let answer = 42;
/// let text = imbue!(RED | BOLD, "answer = ", answer, '!');
/// assert_eq!(text.text(), "answer = 42!");
/// assert_eq!(text.segments().len(), 1);
/// ```
#[macro_export]
macro_rules! imbue {
    ($effects:expr, $($value:expr),+ $(,)?) => {
        $crate::EffectString::new(
            $effects,
            [$(::std::string::ToString::to_string(&$value)),+].concat(),
        )
    };
}

impl EffectString {
    /// Create a new effect string for the text with the given effects.
    pub fn new(effects: impl Into<EffectSet>, text: impl Display) -> Self {
        Self {
            segments: vec![Segment {
                effects: effects.into(),
                text: text.to_string(),
            }],
        }
    }

    /// Create a new effect string without effects.
    pub fn plain(text: impl Display) -> Self {
        Self::new(EffectSet::new(), text)
    }

    /// Determine whether this effect string has no text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.is_empty())
    }

    /// Get this effect string's segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get the text without any effects.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Append plain text.
    pub fn push(&mut self, text: impl Display) -> &mut Self {
        if let Some(last) = self.segments.last_mut().filter(|s| s.effects.is_empty()) {
            // Writing into a string cannot fail.
            let _ = write!(last.text, "{}", text);
        } else {
            self.segments.push(Segment {
                effects: EffectSet::new(),
                text: text.to_string(),
            });
        }
        self
    }

    /// Append another effect string.
    pub fn append(&mut self, other: EffectString) -> &mut Self {
        self.segments.extend(other.segments);
        self
    }

    /// Render this effect string with the given lookup for the codes in
    /// force.
    pub(crate) fn render_with<F>(&self, effective: F) -> String
    where
        F: Fn(Category) -> &'static str,
    {
        let mut result = String::new();
        for segment in &self.segments {
            // Writing into a string cannot fail.
            let _ = write!(result, "{}", segment.effects);
            result.push_str(&segment.text);
            for (category, _) in segment.effects.iter() {
                result.push_str(effective(category));
            }
        }
        result
    }
}

impl From<&str> for EffectString {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl From<String> for EffectString {
    fn from(value: String) -> Self {
        Self {
            segments: vec![Segment {
                effects: EffectSet::new(),
                text: value,
            }],
        }
    }
}

impl core::ops::Add<EffectString> for EffectString {
    type Output = EffectString;

    fn add(mut self, rhs: EffectString) -> Self::Output {
        self.append(rhs);
        self
    }
}

impl core::ops::Add<&str> for EffectString {
    type Output = EffectString;

    fn add(mut self, rhs: &str) -> Self::Output {
        self.push(rhs);
        self
    }
}

impl core::ops::AddAssign<EffectString> for EffectString {
    fn add_assign(&mut self, rhs: EffectString) {
        self.append(rhs);
    }
}

impl core::ops::AddAssign<&str> for EffectString {
    fn add_assign(&mut self, rhs: &str) {
        self.push(rhs);
    }
}

// ----------------------------------------------------------------------------------------------------------
