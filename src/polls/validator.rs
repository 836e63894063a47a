//! Ballot Validator
//!
//! Pure decision function for a cast attempt. No I/O, no clock, no locking:
//! given the current poll, a choice index, and a voter, it says what should
//! happen and nothing else.

use super::error::RejectReason;
use super::model::Poll;

/// What a cast attempt turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Add a new ballot for the requested choice
    Cast,
    /// Remove the voter's existing ballot on the requested choice
    Retract,
    /// Leave the poll untouched
    Rejected(RejectReason),
}

/// Decide the transition for `voter_id` pressing `choice` on `poll`.
///
/// Checks run in a fixed order, which also fixes which reason wins when
/// several apply:
/// 1. closed poll
/// 2. choice out of range
/// 3. existing ballot on this choice, which always retracts
/// 4. per-voter ballot limit
/// 5. single-choice polls refuse a second choice
pub fn decide(poll: &Poll, choice: usize, voter_id: &str) -> Outcome {
    if poll.is_closed {
        return Outcome::Rejected(RejectReason::PollClosed);
    }

    if choice >= poll.choices.len() || choice >= poll.ballots_by_choice.len() {
        return Outcome::Rejected(RejectReason::InvalidChoiceIndex);
    }

    let mut held = 0usize;
    for (index, ballots) in poll.ballots_by_choice.iter().enumerate() {
        let mine = ballots.iter().filter(|b| b.voter_id == voter_id).count();
        if mine > 0 && index == choice {
            // Cancelling is allowed regardless of the vote limit.
            return Outcome::Retract;
        }
        held += mine;
    }

    if held >= poll.policy.max_votes_per_user as usize {
        return Outcome::Rejected(RejectReason::MaxVotesReached);
    }

    if !poll.policy.allow_duplicate_per_choice && held > 0 {
        return Outcome::Rejected(RejectReason::AlreadyVotedElsewhere);
    }

    Outcome::Cast
}
