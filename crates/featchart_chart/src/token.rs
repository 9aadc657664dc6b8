//! Input tokens.

use std::fmt;
use std::sync::Arc;

use featchart_grammar::Category;

/// One input token: a surface word and, if a tagger supplied one, its
/// category.
///
/// Untagged tokens only match terminals. Tagged tokens also match any
/// category that unifies with their tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    surface: Arc<str>,
    category: Option<Category>,
}

impl Token {
    /// Creates an untagged token.
    #[must_use]
    pub fn word(surface: &str) -> Self {
        Self {
            surface: surface.into(),
            category: None,
        }
    }

    /// Creates a token tagged with a category.
    #[must_use]
    pub fn tagged(surface: &str, category: Category) -> Self {
        Self {
            surface: surface.into(),
            category: Some(category),
        }
    }

    /// Splits a sentence on whitespace into untagged tokens.
    #[must_use]
    pub fn words(sentence: &str) -> Vec<Self> {
        sentence.split_whitespace().map(Self::word).collect()
    }

    /// Returns the surface word.
    #[must_use]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Returns the tag, if any.
    #[must_use]
    pub const fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Returns true if the token carries a tag.
    #[must_use]
    pub const fn is_tagged(&self) -> bool {
        self.category.is_some()
    }

    pub(crate) fn shared_surface(&self) -> Arc<str> {
        self.surface.clone()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{}/{category}", self.surface),
            None => write!(f, "{}", self.surface),
        }
    }
}
