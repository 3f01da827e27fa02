//! Redirect registry
//!
//! A fixed-capacity rule table. Lookup order:
//!
//! 1. an `Exact` rule equal to the path wins outright;
//! 2. otherwise the longest matching `Prefix`/`SegmentPrefix` source wins,
//!    `SegmentPrefix` beating `Prefix` on equal length, and the later rule
//!    beating the earlier one on a full tie.

use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;

use crate::http::response::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Path equals `from`.
    Exact,
    /// Path starts with `from`.
    Prefix,
    /// Path starts with `from` at a segment boundary: `/docs` matches
    /// `/docs` and `/docs/x` but not `/docsify`.
    SegmentPrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    #[default]
    Temporary,
    Permanent,
    /// Temporary, method and body preserved.
    TemporaryPreserve,
    /// Permanent, method and body preserved.
    PermanentPreserve,
}

impl RedirectKind {
    pub fn status(self) -> StatusCode {
        match self {
            RedirectKind::Temporary => StatusCode::Found,
            RedirectKind::Permanent => StatusCode::MovedPermanently,
            RedirectKind::TemporaryPreserve => StatusCode::TemporaryRedirect,
            RedirectKind::PermanentPreserve => StatusCode::PermanentRedirect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    pub match_kind: MatchKind,
    pub redirect_kind: RedirectKind,
    /// Append the unmatched rest of the path to `to`.
    pub append_tail: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("redirect source must not be empty")]
    EmptySource,
    #[error("redirect table is full ({capacity} rules)")]
    CapacityExhausted { capacity: usize },
    #[error("exact redirect rules cannot append a tail")]
    TailOnExactRule,
    #[error("identical redirect rule already registered")]
    DuplicateRule,
}

/// A successful lookup.
///
/// `target` borrows the rule's `to` unless a tail was appended, in which case
/// the caller owns the freshly built string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectMatch<'a> {
    pub target: Cow<'a, str>,
    pub kind: RedirectKind,
}

#[derive(Debug, Clone)]
pub struct RedirectRegistry {
    rules: Vec<RedirectRule>,
    capacity: usize,
}

impl RedirectRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    pub fn add(
        &mut self,
        from: &str,
        to: &str,
        match_kind: MatchKind,
        append_tail: bool,
        redirect_kind: RedirectKind,
    ) -> Result<(), RedirectError> {
        if from.is_empty() {
            return Err(RedirectError::EmptySource);
        }
        if self.rules.len() >= self.capacity {
            return Err(RedirectError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        if match_kind == MatchKind::Exact && append_tail {
            return Err(RedirectError::TailOnExactRule);
        }

        let rule = RedirectRule {
            from: from.to_string(),
            to: to.to_string(),
            match_kind,
            redirect_kind,
            append_tail,
        };
        if self.rules.contains(&rule) {
            return Err(RedirectError::DuplicateRule);
        }

        self.rules.push(rule);
        Ok(())
    }

    pub fn lookup(&self, path: &str) -> Option<RedirectMatch<'_>> {
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.match_kind == MatchKind::Exact && r.from == path)
        {
            return Some(RedirectMatch {
                target: Cow::Borrowed(rule.to.as_str()),
                kind: rule.redirect_kind,
            });
        }

        // Key: (source length, segment rank, index). Greatest wins.
        let best = self
            .rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| {
                let rank = match rule.match_kind {
                    MatchKind::Exact => return None,
                    MatchKind::Prefix => 1,
                    MatchKind::SegmentPrefix => 2,
                };
                prefix_matches(rule, path).then_some((rule.from.len(), rank, i))
            })
            .max()?;

        let rule = &self.rules[best.2];
        let target = if rule.append_tail {
            let tail = &path[rule.from.len()..];
            Cow::Owned(format!("{}{}", rule.to, tail))
        } else {
            Cow::Borrowed(rule.to.as_str())
        };

        Some(RedirectMatch {
            target,
            kind: rule.redirect_kind,
        })
    }
}

fn prefix_matches(rule: &RedirectRule, path: &str) -> bool {
    let Some(rest) = path.strip_prefix(rule.from.as_str()) else {
        return false;
    };
    match rule.match_kind {
        MatchKind::SegmentPrefix => rest.is_empty() || rest.starts_with('/'),
        _ => true,
    }
}
