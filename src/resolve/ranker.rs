use crate::catalog::Candidate;
use std::cmp::Reverse;
use tracing::{debug, info};

/// Order candidates by match quality.
///
/// With a target year, exact year matches come first and votes break ties
/// within each group; without one, votes alone decide. The sort is stable, so
/// equal keys keep their input order. Unknown years never match.
pub fn rank_candidates(mut candidates: Vec<Candidate>, target_year: Option<i32>) -> Vec<Candidate> {
    debug!(
        "Ranking {} candidate(s) against year {:?}",
        candidates.len(),
        target_year
    );

    match target_year {
        Some(year) => {
            candidates.sort_by_key(|c| (Reverse(c.year == Some(year)), Reverse(c.votes)));
        }
        None => {
            candidates.sort_by_key(|c| Reverse(c.votes));
        }
    }

    for (i, candidate) in candidates.iter().enumerate().take(3) {
        info!(
            "   {}. {} ({:?}) votes={}",
            i + 1,
            candidate.title,
            candidate.year,
            candidate.votes
        );
    }

    candidates
}
