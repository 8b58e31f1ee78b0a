//! Source-matching conditions that decide when a [`Joiner`](super::Joiner)
//! fires.
//!
//! A condition looks at the set of sources already persisted under a key and
//! answers one question: is the picture complete enough to compose? The
//! built-in matchers ([`MatchAll`], [`MatchAny`], [`MatchNone`]) cover the
//! common cases and combine with [`and`](Condition::and),
//! [`or`](Condition::or) and [`xor`](Condition::xor) into richer predicates.
//! Closures over a [`SourceSet`] are conditions too.

use std::collections::BTreeSet;

/// The distinct sources persisted under one key.
pub type SourceSet = BTreeSet<String>;

/// A predicate over the sources seen so far for a key.
///
/// The combinators leave the receiver untouched, so one base condition can
/// seed any number of derived ones.
pub trait Condition: Send + Sync {
    fn evaluate(&self, sources: &SourceSet) -> bool;

    /// Passes when both `self` and `other` pass. Short-circuits.
    fn and<C: Condition>(&self, other: C) -> And<Self, C>
    where
        Self: Clone + Sized,
    {
        And {
            left: self.clone(),
            right: other,
        }
    }

    /// Passes when either `self` or `other` passes. Short-circuits.
    fn or<C: Condition>(&self, other: C) -> Or<Self, C>
    where
        Self: Clone + Sized,
    {
        Or {
            left: self.clone(),
            right: other,
        }
    }

    /// Passes when exactly one of `self` and `other` passes.
    fn xor<C: Condition>(&self, other: C) -> Xor<Self, C>
    where
        Self: Clone + Sized,
    {
        Xor {
            left: self.clone(),
            right: other,
        }
    }
}

impl<F> Condition for F
where
    F: Fn(&SourceSet) -> bool + Send + Sync,
{
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self(sources)
    }
}

/// Conjunction of two conditions.
#[derive(Clone, Debug)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<L: Condition, R: Condition> Condition for And<L, R> {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.left.evaluate(sources) && self.right.evaluate(sources)
    }
}

/// Disjunction of two conditions.
#[derive(Clone, Debug)]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<L: Condition, R: Condition> Condition for Or<L, R> {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.left.evaluate(sources) || self.right.evaluate(sources)
    }
}

/// Exclusive disjunction of two conditions.
#[derive(Clone, Debug)]
pub struct Xor<L, R> {
    left: L,
    right: R,
}

impl<L: Condition, R: Condition> Condition for Xor<L, R> {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.left.evaluate(sources) != self.right.evaluate(sources)
    }
}

/// Passes once every required source is present.
///
/// With no required sources this passes unconditionally.
#[derive(Clone, Debug)]
pub struct MatchAll {
    required: BTreeSet<String>,
}

impl MatchAll {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

impl Condition for MatchAll {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.required.is_subset(sources)
    }
}

/// Passes once at least one of the candidate sources is present.
///
/// With no candidates this passes unconditionally.
#[derive(Clone, Debug)]
pub struct MatchAny {
    candidates: BTreeSet<String>,
}

impl MatchAny {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl Condition for MatchAny {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.candidates.is_empty() || !self.candidates.is_disjoint(sources)
    }
}

/// Passes while none of the excluded sources is present.
///
/// Passes on an empty source set, and unconditionally when there is nothing
/// to exclude.
#[derive(Clone, Debug)]
pub struct MatchNone {
    excluded: BTreeSet<String>,
}

impl MatchNone {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }
}

impl Condition for MatchNone {
    fn evaluate(&self, sources: &SourceSet) -> bool {
        self.excluded.is_disjoint(sources)
    }
}
