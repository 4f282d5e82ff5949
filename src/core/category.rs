//! Asset category definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a module file, governs aggregation and copy/minify behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Styles,
    Scripts,
    Assets,
    Models,
    Views,
    Lang,
}

impl FileCategory {
    /// Every category, in module expansion order.
    pub const ALL: [Self; 6] = [
        Self::Styles,
        Self::Scripts,
        Self::Assets,
        Self::Models,
        Self::Views,
        Self::Lang,
    ];

    /// Manifest key and default directory name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Assets => "assets",
            Self::Models => "models",
            Self::Views => "views",
            Self::Lang => "lang",
        }
    }

    /// Whether files of this category go through the minifier.
    #[inline]
    pub const fn is_compressible(self) -> bool {
        matches!(
            self,
            Self::Styles | Self::Scripts | Self::Models | Self::Views
        )
    }

    /// Whether files of this category land in the release tree when copied.
    ///
    /// Views and language files only exist to be inlined into the shell.
    #[inline]
    pub const fn is_copied(self) -> bool {
        !matches!(self, Self::Views | Self::Lang)
    }

    /// Default glob pattern list for a module manifest (`"<category>/*"`).
    pub fn default_patterns(self) -> Vec<String> {
        vec![format!("{}/*", self.name())]
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size map keyed by [`FileCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap<T> {
    slots: [T; 6],
}

impl<T: Default> Default for CategoryMap<T> {
    fn default() -> Self {
        Self {
            slots: Default::default(),
        }
    }
}

impl<T> CategoryMap<T> {
    /// Build a map by evaluating `f` for every category, stopping at the
    /// first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(FileCategory) -> Result<T, E>) -> Result<Self, E> {
        use FileCategory::*;
        Ok(Self {
            slots: [
                f(Styles)?,
                f(Scripts)?,
                f(Assets)?,
                f(Models)?,
                f(Views)?,
                f(Lang)?,
            ],
        })
    }

    #[inline]
    pub fn get(&self, category: FileCategory) -> &T {
        &self.slots[category as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, category: FileCategory) -> &mut T {
        &mut self.slots[category as usize]
    }

    /// Iterate `(category, value)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (FileCategory, &T)> {
        FileCategory::ALL.into_iter().zip(self.slots.iter())
    }

    /// Mutable variant of [`CategoryMap::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FileCategory, &mut T)> {
        FileCategory::ALL.into_iter().zip(self.slots.iter_mut())
    }
}
