//! Regex match results with named-group access.
//!
//! [`MatchResult`] adds name-based accessors next to the usual index-based
//! ones. [`RegexMatch`] implements it over [`regex::Captures`].
//!
//! # Examples
//!
//! ```rust
//! use memlog_rs_core::{MatchResult, RegexMatch};
//! use regex::Regex;
//!
//! let re = Regex::new(r"(?P<key>\w+)=(?P<value>\w+)").unwrap();
//! let m = RegexMatch::find(&re, "mode=fast").unwrap();
//!
//! assert_eq!(m.named_group("value"), Some("fast"));
//! assert_eq!(m.named_start("value"), Some(5));
//! ```

use regex::{Captures, Regex};
use std::collections::HashMap;

/// A regex match whose capture groups can be read by position or by name.
///
/// Index 0 is the whole match. Group indices, starts and ends follow the
/// underlying engine: absent groups yield `None`.
pub trait MatchResult {
    /// Number of capture groups, not counting the whole match.
    fn group_count(&self) -> usize;

    fn group(&self, index: usize) -> Option<&str>;

    /// Byte offset where group `index` starts.
    fn start(&self, index: usize) -> Option<usize>;

    /// Byte offset just past the end of group `index`.
    fn end(&self, index: usize) -> Option<usize>;

    /// Values of groups 1..=n in pattern order.
    fn ordered_groups(&self) -> Vec<Option<String>> {
        (1..=self.group_count())
            .map(|index| self.group(index).map(str::to_owned))
            .collect()
    }

    /// Every named group that took part in the match, by name.
    fn named_groups(&self) -> HashMap<String, String>;

    fn named_group(&self, name: &str) -> Option<&str>;

    fn named_start(&self, name: &str) -> Option<usize>;

    fn named_end(&self, name: &str) -> Option<usize>;
}

/// [`MatchResult`] over a single set of regex captures.
#[derive(Debug)]
pub struct RegexMatch<'r, 'h> {
    regex: &'r Regex,
    captures: Captures<'h>,
}

impl<'r, 'h> RegexMatch<'r, 'h> {
    /// Wrap captures produced by `regex`.
    pub fn new(regex: &'r Regex, captures: Captures<'h>) -> Self {
        Self { regex, captures }
    }

    /// First match of `regex` in `haystack`.
    pub fn find(regex: &'r Regex, haystack: &'h str) -> Option<Self> {
        regex
            .captures(haystack)
            .map(|captures| Self::new(regex, captures))
    }

    /// Every non-overlapping match of `regex` in `haystack`.
    pub fn find_iter(regex: &'r Regex, haystack: &'h str) -> impl Iterator<Item = Self> + 'r
    where
        'h: 'r,
    {
        regex
            .captures_iter(haystack)
            .map(move |captures| Self::new(regex, captures))
    }

    /// The wrapped captures.
    pub fn captures(&self) -> &Captures<'h> {
        &self.captures
    }
}

impl MatchResult for RegexMatch<'_, '_> {
    fn group_count(&self) -> usize {
        self.captures.len().saturating_sub(1)
    }

    fn group(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    fn start(&self, index: usize) -> Option<usize> {
        self.captures.get(index).map(|m| m.start())
    }

    fn end(&self, index: usize) -> Option<usize> {
        self.captures.get(index).map(|m| m.end())
    }

    fn named_groups(&self) -> HashMap<String, String> {
        self.regex
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| {
                let name = name?;
                let value = self.captures.get(index)?;
                Some((name.to_owned(), value.as_str().to_owned()))
            })
            .collect()
    }

    fn named_group(&self, name: &str) -> Option<&str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    fn named_start(&self, name: &str) -> Option<usize> {
        self.captures.name(name).map(|m| m.start())
    }

    fn named_end(&self, name: &str) -> Option<usize> {
        self.captures.name(name).map(|m| m.end())
    }
}
