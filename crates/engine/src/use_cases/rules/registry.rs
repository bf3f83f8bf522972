//! The current rule corpus and its generation.

use std::sync::{Arc, PoisonError, RwLock};

use moblevels_domain::RuleCorpus;

/// A corpus together with the generation it was installed under.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    pub corpus: Arc<RuleCorpus>,
    pub generation: u64,
}

/// Holds the active rule corpus. Replacing it bumps the generation, which
/// makes every fact cached against the old corpus stale.
pub struct RuleRegistry {
    current: RwLock<CorpusSnapshot>,
}

impl RuleRegistry {
    pub fn new(corpus: RuleCorpus) -> Self {
        Self {
            current: RwLock::new(CorpusSnapshot {
                corpus: Arc::new(corpus),
                generation: 1,
            }),
        }
    }

    pub fn snapshot(&self) -> CorpusSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Install `corpus`, returning the new generation.
    pub fn replace(&self, corpus: RuleCorpus) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.corpus = Arc::new(corpus);
        current.generation += 1;
        current.generation
    }
}
