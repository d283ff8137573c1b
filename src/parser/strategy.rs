//! Ordered-fallback execution shared by every field extractor.
//!
//! Two control-flow shapes cover all five pipelines:
//! - [`first_hit`]: strict short-circuit; the first attempt that yields a
//!   value wins and later attempts are never consulted. Misses are recorded
//!   so a total miss can report the full trail.
//! - [`tiered_union`]: tiers of attempts; within a tier every attempt runs
//!   and the results are unioned with first-seen dedup. The first tier that
//!   produces anything ends the scan.

use std::fmt;

/// Why one attempt produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub label: String,
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.reason)
    }
}

/// One labeled attempt. `Err(reason)` is a miss, not a hard failure.
pub struct Attempt<'a, T> {
    pub label: String,
    pub probe: Box<dyn Fn() -> Result<T, String> + 'a>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(label: impl Into<String>, probe: impl Fn() -> Result<T, String> + 'a) -> Self {
        Self {
            label: label.into(),
            probe: Box::new(probe),
        }
    }
}

/// Runs attempts in order, returning the first hit. On a total miss the
/// diagnostic trail of every attempt comes back instead.
pub fn first_hit<T>(attempts: Vec<Attempt<'_, T>>) -> Result<T, Vec<Diagnostic>> {
    let mut trail = Vec::with_capacity(attempts.len());
    for attempt in attempts {
        match (attempt.probe)() {
            Ok(value) => return Ok(value),
            Err(reason) => trail.push(Diagnostic {
                label: attempt.label,
                reason,
            }),
        }
    }
    Err(trail)
}

/// Runs tiers in order. Every attempt of a tier contributes all its values,
/// deduplicated by exact match in first-seen order; the first non-empty tier
/// wins. A probe error aborts the scan: it means the extractor cannot run,
/// which is different from finding nothing.
pub fn tiered_union<T: PartialEq>(tiers: Vec<Vec<Attempt<'_, Vec<T>>>>) -> Result<Vec<T>, String> {
    for tier in tiers {
        let mut found: Vec<T> = Vec::new();
        for attempt in tier {
            let values = (attempt.probe)()
                .map_err(|reason| format!("{}: {}", attempt.label, reason))?;
            for value in values {
                if !found.contains(&value) {
                    found.push(value);
                }
            }
        }
        if !found.is_empty() {
            return Ok(found);
        }
    }
    Ok(Vec::new())
}
