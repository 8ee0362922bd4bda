//! Text effects and sets of text effects.
//!
//! An [`Effect`] pairs an attribute [`Category`] with the ANSI SGR escape
//! sequence that switches the terminal to that appearance. Effects cannot be
//! created from arbitrary escape sequences. Instead, this module provides a
//! fixed table of named constants, covering the 16 ANSI foreground colors, the
//! same 16 colors as background, three font weights, and the two states each
//! of underlining and blinking.
//!
//! An [`EffectSet`] bundles up to one effect per category, so that several
//! changes, say bold and red, can be applied atomically. Sets are assembled
//! with the `|` operator, with later effects overriding earlier effects of the
//! same category.
//!
//!
//! # Example
//!
//! ```
//! # use prettyscope::effect::{Category, EffectSet, BOLD, BLUE, RED};
//! let set = RED | BOLD | BLUE;
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.get(Category::Foreground), Some(BLUE.code()));
//! assert_eq!(format!("{}", set), "\x1b[34m\x1b[1m");
//! ```

/// The category of a text attribute.
///
/// Each category is tracked and restored independently of the others. The
/// set of categories is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// The foreground or text color.
    Foreground,
    /// The background color.
    Background,
    /// The font weight, i.e., bold, faint, or normal.
    Weight,
    /// Underlining.
    Underline,
    /// Blinking.
    Blink,
}

impl Category {
    /// The number of categories.
    pub const COUNT: usize = 5;

    /// All categories in their canonical order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Foreground,
        Category::Background,
        Category::Weight,
        Category::Underline,
        Category::Blink,
    ];

    /// Get this category's index into per-category arrays.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Get the escape sequence restoring this category's default appearance.
    pub const fn default_code(&self) -> &'static str {
        match self {
            Self::Foreground => "\x1b[39m",
            Self::Background => "\x1b[49m",
            Self::Weight => "\x1b[22m",
            Self::Underline => "\x1b[24m",
            Self::Blink => "\x1b[25m",
        }
    }

    /// Get the effect restoring this category's default appearance.
    pub const fn default_effect(&self) -> Effect {
        match self {
            Self::Foreground => DEFAULT_FOREGROUND,
            Self::Background => DEFAULT_BACKGROUND,
            Self::Weight => NORMAL_WEIGHT,
            Self::Underline => NOT_UNDERLINED,
            Self::Blink => NOT_BLINKING,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------

/// A text effect.
///
/// Every effect belongs to exactly one [`Category`] and carries the literal
/// escape sequence for enabling it. Since the constructor is private to this
/// crate, the only effects in existence are the constants of this module.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Effect {
    name: &'static str,
    category: Category,
    code: &'static str,
}

impl Effect {
    const fn new(name: &'static str, category: Category, code: &'static str) -> Self {
        Self {
            name,
            category,
            code,
        }
    }

    /// Get this effect's canonical name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Get this effect's category.
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Get this effect's escape sequence.
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Look up an effect by name.
    ///
    /// This function accepts the canonical lowercase names, e.g.,
    /// `bright_red`, as well as the aliases `gray`, `grey`, `underline`,
    /// `background_gray`, and `background_grey`.
    pub fn from_name(name: &str) -> Option<Self> {
        let effect = match name {
            "gray" | "grey" => GRAY,
            "underline" => UNDERLINE,
            "background_gray" | "background_grey" => BACKGROUND_GRAY,
            _ => return EFFECTS.iter().find(|e| e.name == name).copied(),
        };
        Some(effect)
    }
}

impl core::fmt::Debug for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Effect({})", self.name)
    }
}

impl core::fmt::Display for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code)
    }
}

impl core::str::FromStr for Effect {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownEffect(s.to_owned()))
    }
}

/// The error for parsing an unknown effect name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" does not name a text effect")]
pub struct UnknownEffect(pub String);

// ----------------------------------------------------------------------------------------------------------

macro_rules! define_effects {
    ($( $(#[$attr:meta])* $konst:ident = ($name:literal, $category:ident, $code:literal); )*) => {
        $(
            $(#[$attr])*
            #[doc = concat!("The `", $name, "` effect.")]
            pub const $konst: Effect = Effect::new($name, Category::$category, $code);
        )*

        /// All named effects, in declaration order.
        pub const EFFECTS: &[Effect] = &[ $( $konst ),* ];
    };
}

define_effects! {
    BLACK = ("black", Foreground, "\x1b[30m");
    RED = ("red", Foreground, "\x1b[31m");
    GREEN = ("green", Foreground, "\x1b[32m");
    YELLOW = ("yellow", Foreground, "\x1b[33m");
    BLUE = ("blue", Foreground, "\x1b[34m");
    MAGENTA = ("magenta", Foreground, "\x1b[35m");
    CYAN = ("cyan", Foreground, "\x1b[36m");
    WHITE = ("white", Foreground, "\x1b[37m");
    BRIGHT_BLACK = ("bright_black", Foreground, "\x1b[90m");
    BRIGHT_RED = ("bright_red", Foreground, "\x1b[91m");
    BRIGHT_GREEN = ("bright_green", Foreground, "\x1b[92m");
    BRIGHT_YELLOW = ("bright_yellow", Foreground, "\x1b[93m");
    BRIGHT_BLUE = ("bright_blue", Foreground, "\x1b[94m");
    BRIGHT_MAGENTA = ("bright_magenta", Foreground, "\x1b[95m");
    BRIGHT_CYAN = ("bright_cyan", Foreground, "\x1b[96m");
    BRIGHT_WHITE = ("bright_white", Foreground, "\x1b[97m");
    DEFAULT_FOREGROUND = ("default_foreground", Foreground, "\x1b[39m");

    BACKGROUND_BLACK = ("background_black", Background, "\x1b[40m");
    BACKGROUND_RED = ("background_red", Background, "\x1b[41m");
    BACKGROUND_GREEN = ("background_green", Background, "\x1b[42m");
    BACKGROUND_YELLOW = ("background_yellow", Background, "\x1b[43m");
    BACKGROUND_BLUE = ("background_blue", Background, "\x1b[44m");
    BACKGROUND_MAGENTA = ("background_magenta", Background, "\x1b[45m");
    BACKGROUND_CYAN = ("background_cyan", Background, "\x1b[46m");
    BACKGROUND_WHITE = ("background_white", Background, "\x1b[47m");
    BACKGROUND_BRIGHT_BLACK = ("background_bright_black", Background, "\x1b[100m");
    BACKGROUND_BRIGHT_RED = ("background_bright_red", Background, "\x1b[101m");
    BACKGROUND_BRIGHT_GREEN = ("background_bright_green", Background, "\x1b[102m");
    BACKGROUND_BRIGHT_YELLOW = ("background_bright_yellow", Background, "\x1b[103m");
    BACKGROUND_BRIGHT_BLUE = ("background_bright_blue", Background, "\x1b[104m");
    BACKGROUND_BRIGHT_MAGENTA = ("background_bright_magenta", Background, "\x1b[105m");
    BACKGROUND_BRIGHT_CYAN = ("background_bright_cyan", Background, "\x1b[106m");
    BACKGROUND_BRIGHT_WHITE = ("background_bright_white", Background, "\x1b[107m");
    DEFAULT_BACKGROUND = ("default_background", Background, "\x1b[49m");

    BOLD = ("bold", Weight, "\x1b[1m");
    FAINT = ("faint", Weight, "\x1b[2m");
    NORMAL_WEIGHT = ("normal_weight", Weight, "\x1b[22m");

    UNDERLINED = ("underlined", Underline, "\x1b[4m");
    NOT_UNDERLINED = ("not_underlined", Underline, "\x1b[24m");

    BLINKING = ("blinking", Blink, "\x1b[5m");
    NOT_BLINKING = ("not_blinking", Blink, "\x1b[25m");
}

/// An alias for [`BRIGHT_BLACK`].
pub const GRAY: Effect = BRIGHT_BLACK;
/// An alias for [`BRIGHT_BLACK`].
pub const GREY: Effect = BRIGHT_BLACK;
/// An alias for [`BACKGROUND_BRIGHT_BLACK`].
pub const BACKGROUND_GRAY: Effect = BACKGROUND_BRIGHT_BLACK;
/// An alias for [`BACKGROUND_BRIGHT_BLACK`].
pub const BACKGROUND_GREY: Effect = BACKGROUND_BRIGHT_BLACK;
/// An alias for [`UNDERLINED`].
pub const UNDERLINE: Effect = UNDERLINED;

// ----------------------------------------------------------------------------------------------------------

/// Per-category escape sequences, with `None` for "no change".
pub(crate) type Codes = [Option<&'static str>; Category::COUNT];

/// A set of text effects with at most one effect per category.
///
/// Merging sets is last-writer-wins per category, associative, and has the
/// empty set as identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EffectSet {
    codes: Codes,
}

impl EffectSet {
    /// Create a new empty effect set.
    pub const fn new() -> Self {
        Self {
            codes: [None; Category::COUNT],
        }
    }

    pub(crate) const fn from_codes(codes: Codes) -> Self {
        Self { codes }
    }

    pub(crate) const fn codes(&self) -> &Codes {
        &self.codes
    }

    /// Get the escape sequence for the given category.
    pub const fn get(&self, category: Category) -> Option<&'static str> {
        self.codes[category.index()]
    }

    /// Determine whether this set contains an effect of the given category.
    pub const fn contains(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    /// Determine whether this set is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Get the number of categories with effects.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Get an iterator over the categories and escape sequences in this set.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &'static str)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|code| (c, code)))
    }

    /// Create a new set that also includes the given effect.
    ///
    /// The effect replaces any effect of the same category.
    #[must_use = "method returns a new effect set and does not mutate the original"]
    pub const fn with(self, effect: Effect) -> Self {
        let mut codes = self.codes;
        codes[effect.category().index()] = Some(effect.code());
        Self { codes }
    }

    /// Merge this set with the other set.
    ///
    /// Wherever the other set has an effect, it replaces this set's effect.
    #[must_use = "method returns a new effect set and does not mutate the original"]
    pub fn merge(self, other: EffectSet) -> Self {
        let mut codes = self.codes;
        for (code, update) in codes.iter_mut().zip(other.codes) {
            if update.is_some() {
                *code = update;
            }
        }
        Self { codes }
    }
}

impl From<Effect> for EffectSet {
    fn from(value: Effect) -> Self {
        Self::new().with(value)
    }
}

impl From<&Effect> for EffectSet {
    fn from(value: &Effect) -> Self {
        Self::new().with(*value)
    }
}

impl FromIterator<Effect> for EffectSet {
    fn from_iter<T: IntoIterator<Item = Effect>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Effect> for EffectSet {
    fn extend<T: IntoIterator<Item = Effect>>(&mut self, iter: T) {
        for effect in iter {
            *self = self.with(effect);
        }
    }
}

impl core::fmt::Display for EffectSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (_, code) in self.iter() {
            f.write_str(code)?;
        }
        Ok(())
    }
}

macro_rules! implement_union {
    ($lhs:ty, $rhs:ty, $this:ident, $other:ident => $body:expr) => {
        impl core::ops::BitOr<$rhs> for $lhs {
            type Output = EffectSet;

            fn bitor(self, rhs: $rhs) -> Self::Output {
                let ($this, $other) = (self, rhs);
                $body
            }
        }
    };
}

implement_union!(Effect, Effect, this, other => EffectSet::from(this).with(other));
implement_union!(Effect, EffectSet, this, other => EffectSet::from(this).merge(other));
implement_union!(EffectSet, Effect, this, other => this.with(other));
implement_union!(EffectSet, EffectSet, this, other => this.merge(other));

impl core::ops::BitOrAssign<Effect> for EffectSet {
    fn bitor_assign(&mut self, rhs: Effect) {
        *self = self.with(rhs);
    }
}

impl core::ops::BitOrAssign<EffectSet> for EffectSet {
    fn bitor_assign(&mut self, rhs: EffectSet) {
        *self = self.merge(rhs);
    }
}

// ----------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(EFFECTS.len(), 41);
        for category in Category::ALL {
            let count = EFFECTS.iter().filter(|e| e.category() == category).count();
            let expected = match category {
                Category::Foreground | Category::Background => 17,
                Category::Weight => 3,
                Category::Underline | Category::Blink => 2,
            };
            assert_eq!(count, expected, "{:?}", category);
            assert_eq!(category.default_effect().code(), category.default_code());
        }

        assert_eq!(RED.code(), "\x1b[31m");
        assert_eq!(BACKGROUND_BRIGHT_WHITE.code(), "\x1b[107m");
        assert_eq!(FAINT.code(), "\x1b[2m");
        assert_eq!(GREY, BRIGHT_BLACK);
        assert_eq!(BACKGROUND_GRAY.category(), Category::Background);
        assert_eq!(format!("{:?}", UNDERLINE), "Effect(underlined)");
        assert_eq!(format!("{}", BLINKING), "\x1b[5m");
    }

    #[test]
    fn test_names() {
        for effect in EFFECTS {
            assert_eq!(Effect::from_name(effect.name()), Some(*effect));
        }
        assert_eq!("grey".parse::<Effect>(), Ok(BRIGHT_BLACK));
        assert_eq!("background_gray".parse::<Effect>(), Ok(BACKGROUND_BRIGHT_BLACK));
        assert_eq!("underline".parse::<Effect>(), Ok(UNDERLINED));
        assert_eq!(
            "purple".parse::<Effect>(),
            Err(UnknownEffect("purple".to_owned()))
        );
    }

    #[test]
    fn test_merge() {
        let empty = EffectSet::new();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(format!("{}", empty), "");

        let set = RED | BOLD;
        assert_eq!(set.get(Category::Foreground), Some(RED.code()));
        assert_eq!(set.get(Category::Weight), Some(BOLD.code()));
        assert!(!set.contains(Category::Blink));

        // Later operands win.
        assert_eq!((set | BLUE).get(Category::Foreground), Some(BLUE.code()));
        assert_eq!((BLUE | set).get(Category::Foreground), Some(RED.code()));
        assert_eq!(set.merge(FAINT | UNDERLINED), RED | FAINT | UNDERLINED);

        // Identity and associativity.
        assert_eq!(set.merge(empty), set);
        assert_eq!(empty.merge(set), set);
        let (a, b, c) = (RED | BLINKING, BLUE | BOLD, FAINT | BACKGROUND_CYAN);
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));

        let mut set = EffectSet::from(GREEN);
        set |= UNDERLINED;
        set |= BACKGROUND_RED | GREEN;
        assert_eq!(set.len(), 3);
        assert_eq!(format!("{}", set), "\x1b[32m\x1b[41m\x1b[4m");

        let collected: EffectSet = [RED, BOLD, BLUE].into_iter().collect();
        assert_eq!(collected, BOLD | BLUE);
        assert_eq!(
            collected.iter().collect::<Vec<_>>(),
            vec![
                (Category::Foreground, BLUE.code()),
                (Category::Weight, BOLD.code())
            ]
        );
    }
}
