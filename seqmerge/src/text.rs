//! Diff and merge of text.
//!
//! Text is cut into tokens (lines or words), every distinct token is
//! interned to a small integer, and the engine runs on the integer
//! sequences. Results are mapped back to owned strings.
//!
//! Tokenizers keep every character of the input, so joining the tokens of
//! a merged result reproduces text with the original line endings and
//! spacing.

use rustc_hash::FxHashMap;

use crate::diff::diff;
use crate::error::Result;
use crate::merge::{merge, MergeConfig, MergeResult};
use crate::model::Patch;

/// Splits text into lines, each keeping its trailing newline.
///
/// A final line without a newline is kept as it is.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Splits text into alternating runs of whitespace and non-whitespace.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (offset, c) in text.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|previous| previous != space) {
            words.push(&text[start..offset]);
            start = offset;
        }
        in_space = Some(space);
    }

    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

/// Joins tokens back into text.
pub fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).collect()
}

/// Maps string tokens to dense integer ids.
///
/// Equal tokens get equal ids, so comparing ids is the same as comparing
/// tokens but does not touch the text again.
#[derive(Debug, Default)]
pub struct Interner<'a> {
    ids: FxHashMap<&'a str, u32>,
    tokens: Vec<&'a str>,
}

impl<'a> Interner<'a> {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Interner {
            ids: FxHashMap::default(),
            tokens: Vec::new(),
        }
    }

    /// Returns the id of `token`, assigning a new one if needed.
    pub fn intern(&mut self, token: &'a str) -> u32 {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.tokens.len() as u32;
        self.ids.insert(token, id);
        self.tokens.push(token);
        id
    }

    /// Interns every token of a sequence.
    pub fn intern_all(&mut self, tokens: &[&'a str]) -> Vec<u32> {
        tokens.iter().map(|&token| self.intern(token)).collect()
    }

    /// Returns the token behind `id`.
    pub fn resolve(&self, id: u32) -> Option<&'a str> {
        self.tokens.get(id as usize).copied()
    }

    /// Returns the number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if nothing was interned.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn to_owned_token(&self, id: u32) -> String {
        self.resolve(id).map(str::to_owned).unwrap_or_default()
    }
}

/// Computes the line patch turning `previous` into `next`.
pub fn diff_lines(previous: &str, next: &str) -> Patch<String> {
    let mut interner = Interner::new();
    let previous = interner.intern_all(&split_lines(previous));
    let next = interner.intern_all(&split_lines(next));

    diff(&previous, &next).map(|id| interner.to_owned_token(id))
}

/// Merges three versions of a text line by line.
pub fn merge_lines(
    ancestor: &str,
    current: &str,
    next: &str,
    config: &MergeConfig,
) -> Result<MergeResult<String>> {
    merge_tokens(split_lines, ancestor, current, next, config)
}

/// Merges three versions of a text word by word.
///
/// Whitespace runs are tokens of their own, so edits to spacing merge like
/// any other edit.
pub fn merge_words(
    ancestor: &str,
    current: &str,
    next: &str,
    config: &MergeConfig,
) -> Result<MergeResult<String>> {
    merge_tokens(split_words, ancestor, current, next, config)
}

fn merge_tokens<'a, T>(
    tokenize: T,
    ancestor: &'a str,
    current: &'a str,
    next: &'a str,
    config: &MergeConfig,
) -> Result<MergeResult<String>>
where
    T: Fn(&'a str) -> Vec<&'a str>,
{
    let mut interner = Interner::new();
    let ancestor = interner.intern_all(&tokenize(ancestor));
    let current = interner.intern_all(&tokenize(current));
    let next = interner.intern_all(&tokenize(next));

    let result = merge(&ancestor, &current, &next, config)?;
    Ok(result.map(|id| interner.to_owned_token(id)))
}
