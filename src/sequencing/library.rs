use std::{collections::HashMap, fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::warn;

use crate::{
    error::{BandError, Result},
    sequencing::{pattern::Pattern, time_signature::TimeSignature},
};

/// Exact lookup key for a style. Genre ids are lowercase slugs ("rock").
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleKey {
    pub genre: String,
    pub style_id: u8,
}

impl StyleKey {
    pub fn new(genre: impl Into<String>, style_id: u8) -> Self {
        Self {
            genre: genre.into(),
            style_id,
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.genre, self.style_id)
    }
}

/// A named groove in a genre.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub key: StyleKey,
    pub name: String,
    pub pattern: Arc<Pattern>,
}

impl Style {
    pub fn new(key: StyleKey, name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            key,
            name: name.into(),
            pattern: Arc::new(pattern),
        }
    }

    pub fn genre(&self) -> &str {
        &self.key.genre
    }

    pub fn style_id(&self) -> u8 {
        self.key.style_id
    }

    pub fn bpm_range(&self) -> (f32, f32) {
        self.pattern.tempo_range()
    }

    /// Middle of the style's tempo range.
    pub fn default_bpm(&self) -> f32 {
        let (low, high) = self.bpm_range();
        ((low + high) / 2.0).round()
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.pattern.time_signature()
    }
}

/// Immutable table of styles keyed by exact `(genre, style_id)`.
///
/// Lookups never match on display names or substrings. An unknown key
/// resolves to one documented fallback style, so playback always has a
/// groove to play.
#[derive(Debug, Clone)]
pub struct StyleLibrary {
    styles: HashMap<StyleKey, Style>,
    fallback: StyleKey,
}

impl StyleLibrary {
    /// Default fallback: ("rock", 1), "Straight Rock".
    pub const FALLBACK_GENRE: &'static str = "rock";
    pub const FALLBACK_STYLE: u8 = 1;

    /// Build a library from any table. Fails on duplicate keys or when the
    /// fallback key is not in the table.
    pub fn new(styles: Vec<Style>, fallback: StyleKey) -> Result<Self> {
        let mut table = HashMap::with_capacity(styles.len());
        for style in styles {
            let key = style.key.clone();
            if table.insert(key.clone(), style).is_some() {
                return Err(BandError::invalid(format!("duplicate style {key}")));
            }
        }
        if !table.contains_key(&fallback) {
            return Err(BandError::invalid(format!(
                "fallback style {fallback} is not in the library"
            )));
        }
        Ok(Self {
            styles: table,
            fallback,
        })
    }

    /// Strict lookup.
    pub fn try_resolve(&self, genre: &str, style_id: u8) -> Option<&Style> {
        self.styles.get(&StyleKey::new(genre, style_id))
    }

    /// Lookup with fallback. Never fails.
    pub fn resolve(&self, genre: &str, style_id: u8) -> &Style {
        match self.try_resolve(genre, style_id) {
            Some(style) => style,
            None => {
                warn!(
                    genre,
                    style_id,
                    fallback = %self.fallback,
                    "unknown style, using fallback"
                );
                self.fallback()
            }
        }
    }

    pub fn fallback(&self) -> &Style {
        // `new` guarantees the key is present
        &self.styles[&self.fallback]
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Genre ids, sorted.
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = self.styles.keys().map(|k| k.genre.as_str()).collect();
        genres.sort_unstable();
        genres.dedup();
        genres
    }

    /// Styles of one genre ordered by id.
    pub fn styles_in(&self, genre: &str) -> Vec<&Style> {
        let mut styles: Vec<&Style> = self
            .styles
            .values()
            .filter(|style| style.genre() == genre)
            .collect();
        styles.sort_by_key(|style| style.style_id());
        styles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.values()
    }
}
