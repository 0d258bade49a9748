/// Regeneration domain: releases, outcomes, the retry ledger record,
/// the run report, and the candidate-selection strategies.
pub mod domain;
pub mod strategy;
