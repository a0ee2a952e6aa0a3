//! Challenge registry.
//!
//! Holds one solved flag per [`ChallengeKey`]. Flags only ever go from
//! unsolved to solved (until [`ChallengeRegistry::reset`]), so concurrent
//! handlers can update them with plain atomic swaps and no lock.
//!
//! Handlers report observations through [`ChallengeRegistry::solve_if`]; the
//! registry never influences the response a handler sends.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use juice_shop_core::{ChallengeCategory, ChallengeKey};

use crate::error::add_breadcrumb;

/// Score board entry for one challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeStatus {
    pub key: ChallengeKey,
    pub name: &'static str,
    pub category: ChallengeCategory,
    pub solved: bool,
}

/// Process-wide solved flags, owned by `AppState`.
#[derive(Debug)]
pub struct ChallengeRegistry {
    flags: [AtomicBool; ChallengeKey::ALL.len()],
}

impl Default for ChallengeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeRegistry {
    /// Create a registry with every challenge unsolved.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    #[allow(clippy::indexing_slicing)] // index() < ALL.len() for every key
    fn flag(&self, challenge: ChallengeKey) -> &AtomicBool {
        &self.flags[challenge.index()]
    }

    #[must_use]
    pub fn is_solved(&self, challenge: ChallengeKey) -> bool {
        self.flag(challenge).load(Ordering::Acquire)
    }

    /// Mark `challenge` solved if it is not yet solved and `predicate` holds.
    ///
    /// The predicate is skipped entirely for an already solved challenge.
    /// Returns `true` only when this call changed the flag.
    pub fn solve_if(&self, challenge: ChallengeKey, predicate: impl FnOnce() -> bool) -> bool {
        if self.is_solved(challenge) || !predicate() {
            return false;
        }
        self.solve(challenge)
    }

    /// Mark `challenge` solved. Returns `true` if it was not solved before.
    pub fn solve(&self, challenge: ChallengeKey) -> bool {
        let newly_solved = !self.flag(challenge).swap(true, Ordering::AcqRel);
        if newly_solved {
            tracing::info!(
                challenge = challenge.key(),
                name = challenge.name(),
                "Challenge solved"
            );
            add_breadcrumb(
                "challenge",
                "Challenge solved",
                Some(&[("challenge", challenge.key())]),
            );
        }
        newly_solved
    }

    /// Current state of every challenge, in score board order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChallengeStatus> {
        ChallengeKey::ALL
            .into_iter()
            .map(|key| ChallengeStatus {
                key,
                name: key.name(),
                category: key.category(),
                solved: self.is_solved(key),
            })
            .collect()
    }

    /// Mark every challenge unsolved again.
    pub fn reset(&self) {
        for flag in &self.flags {
            flag.store(false, Ordering::Release);
        }
    }
}
