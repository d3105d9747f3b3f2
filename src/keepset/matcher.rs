//! Ordered include/exclude glob matching.
//!
//! Patterns are evaluated as one query: the last pattern that matches a path
//! decides whether it is kept. A `!pattern` therefore only removes paths that
//! earlier patterns added, and a later positive pattern can add them back.

use crate::error::{CleanerError, Result};
use globset::{GlobBuilder, GlobMatcher};

/// A single compiled pattern.
#[derive(Debug, Clone)]
struct Rule {
    negated: bool,
    matcher: GlobMatcher,
    /// Segments of the pattern that start with a literal `.`.
    dot_segments: Vec<GlobMatcher>,
}

impl Rule {
    fn matches(&self, path: &str, include_dotfiles: bool) -> bool {
        if !self.matcher.is_match(path) {
            return false;
        }
        include_dotfiles || self.names_hidden_components(path)
    }

    /// Every hidden component of `path` must be matched by a pattern segment
    /// that itself starts with `.`.
    fn names_hidden_components(&self, path: &str) -> bool {
        path.split('/')
            .filter(|component| component.starts_with('.'))
            .all(|component| self.dot_segments.iter().any(|s| s.is_match(component)))
    }
}

/// Compiled, ordered pattern list.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<Rule>,
    include_dotfiles: bool,
}

impl PatternMatcher {
    /// Compile an ordered pattern list.
    ///
    /// A leading `!` negates a pattern. Leading `/` and `./` anchor the
    /// pattern at the root and are dropped. `*` never crosses a `/`.
    pub fn new(patterns: &[String], include_dotfiles: bool) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| compile_rule(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            include_dotfiles,
        })
    }

    /// Whether a root-relative, normalized path is kept.
    pub fn is_kept(&self, path: &str) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(path, self.include_dotfiles))
            .is_some_and(|rule| !rule.negated)
    }

    /// Whether any pattern can keep something.
    pub fn has_positive_patterns(&self) -> bool {
        self.rules.iter().any(|rule| !rule.negated)
    }
}

fn compile_rule(pattern: &str) -> Result<Rule> {
    let (negated, body) = match pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let body = anchor_to_root(body);

    if body.is_empty() {
        return Err(CleanerError::Pattern {
            pattern: pattern.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }

    let matcher = build_glob(body).map_err(|e| CleanerError::Pattern {
        pattern: pattern.to_string(),
        reason: e.kind().to_string(),
    })?;

    // Segments split out of a brace group may not compile on their own;
    // those simply never name a hidden component.
    let dot_segments = body
        .split('/')
        .filter(|segment| segment.starts_with('.'))
        .filter_map(|segment| build_glob(segment).ok())
        .collect();

    Ok(Rule {
        negated,
        matcher,
        dot_segments,
    })
}

fn anchor_to_root(mut body: &str) -> &str {
    loop {
        if let Some(rest) = body.strip_prefix("./") {
            body = rest;
        } else if let Some(rest) = body.strip_prefix('/') {
            body = rest;
        } else {
            return body;
        }
    }
}

fn build_glob(pattern: &str) -> std::result::Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?
        .compile_matcher())
}
