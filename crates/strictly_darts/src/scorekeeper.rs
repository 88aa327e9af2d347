//! Scorekeeper: one match engine plus the archive it reports to.

use strictly_cricket::{
    Action, MatchArchiver, MatchEngine, MatchSnapshot, MatchSummary, Multiplier, Outcome,
    Rejection,
};
use tracing::{info, instrument, warn};

/// Drives a match and hands the summary to the archiver exactly once.
///
/// After the summary is emitted the match is closed: every further action,
/// undo included, is rejected with [`Rejection::MatchOver`].
#[derive(Debug)]
pub struct Scorekeeper<A: MatchArchiver> {
    engine: MatchEngine,
    archiver: A,
    summary: Option<MatchSummary>,
    archive_error: Option<String>,
}

impl<A: MatchArchiver> Scorekeeper<A> {
    /// Wraps a freshly started engine.
    pub fn new(engine: MatchEngine, archiver: A) -> Self {
        Self {
            engine,
            archiver,
            summary: None,
            archive_error: None,
        }
    }

    /// Engine being scored.
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Archive backend.
    pub fn archiver(&self) -> &A {
        &self.archiver
    }

    /// Gives the archive backend back.
    pub fn into_archiver(self) -> A {
        self.archiver
    }

    /// Summary emitted at the end of the match.
    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    /// True once the summary has been emitted.
    pub fn is_closed(&self) -> bool {
        self.summary.is_some()
    }

    /// Message of a failed archive write, if the write failed.
    pub fn archive_error(&self) -> Option<&str> {
        self.archive_error.as_deref()
    }

    /// Render projection of the live match.
    pub fn snapshot(&self) -> MatchSnapshot {
        self.engine.snapshot()
    }

    /// Stages the multiplier for the next dart.
    pub fn select_multiplier(&mut self, multiplier: Multiplier) {
        if !self.is_closed() {
            self.engine.select_multiplier(multiplier);
        }
    }

    /// Applies an action and archives the match once it is decided.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`Rejection`], or [`Rejection::MatchOver`] once
    /// the summary has been emitted.
    #[instrument(skip(self, action), fields(action = %action))]
    pub fn apply(&mut self, action: Action) -> Result<Outcome, Rejection> {
        if self.is_closed() {
            return Err(Rejection::MatchOver);
        }
        let outcome = self.engine.apply(action)?;
        if let Outcome::Dart {
            winner: Some(winner),
            ..
        } = &outcome
        {
            info!(%winner, "Match decided");
            self.emit_summary();
        }
        Ok(outcome)
    }

    fn emit_summary(&mut self) {
        let Some(summary) = self.engine.summary() else {
            return;
        };
        // Best effort: a failed write is reported but does not reopen the match.
        if let Err(e) = self.archiver.archive(&summary) {
            warn!(error = %e, "Failed to archive match");
            self.archive_error = Some(e.to_string());
        }
        self.summary = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_cricket::{MatchSetup, MemoryArchiver, Player, RuleSet, Target, Variant};

    fn keeper() -> Scorekeeper<MemoryArchiver> {
        let engine = MatchEngine::new(MatchSetup {
            variant: Variant::Singles,
            players: vec![Player::new("ann", "Ann"), Player::new("bob", "Bob")],
            rules: RuleSet {
                pin_enabled: false,
                ..RuleSet::default()
            },
        })
        .expect("valid setup");
        Scorekeeper::new(engine, MemoryArchiver::new())
    }

    #[test]
    fn test_rejection_passes_through() {
        let mut keeper = keeper();
        assert_eq!(keeper.apply(Action::Undo), Err(Rejection::NothingToUndo));
        assert!(!keeper.is_closed());
    }

    #[test]
    fn test_summary_emitted_once() {
        let mut keeper = keeper();
        for target in Target::ALL {
            keeper
                .apply(Action::Score {
                    target,
                    multiplier: Multiplier::Triple,
                })
                .expect("open target");
        }
        assert!(keeper.is_closed());
        assert_eq!(keeper.archiver().summaries().len(), 1);
        assert_eq!(keeper.apply(Action::Undo), Err(Rejection::MatchOver));
        assert_eq!(keeper.apply(Action::Miss), Err(Rejection::MatchOver));
        assert_eq!(keeper.into_archiver().summaries().len(), 1);
    }
}
