use crate::check::CheckOutcome;
use crate::error::Result;
use cla_github::{HostApi, HostError};
use cla_protocol::ReactionKind;
use regex::Regex;

/// Verdict reaction for a finished check; `None` when the outcome is not known.
pub fn verdict_reaction(outcome: &CheckOutcome) -> Option<ReactionKind> {
    match outcome {
        CheckOutcome::Passed => Some(ReactionKind::PlusOne),
        CheckOutcome::Failed { .. } => Some(ReactionKind::MinusOne),
        CheckOutcome::RegistryUnavailable { .. } => None,
    }
}

/// A comment is pending when it was acknowledged with `eyes` but has no verdict yet.
pub fn is_pending(reactions: &[ReactionKind]) -> bool {
    reactions.contains(&ReactionKind::Eyes) && !reactions.iter().any(|kind| kind.is_verdict())
}

/// Marks pending acknowledgement comments on `number` with the check's verdict.
///
/// Every matching comment is attempted; a failure on one comment is logged and
/// the first one is returned after the rest were processed. Returns how many
/// comments were reacted to.
pub async fn react_to_acknowledgements(
    host: &dyn HostApi,
    number: u64,
    pattern: &Regex,
    outcome: &CheckOutcome,
) -> Result<usize> {
    let Some(verdict) = verdict_reaction(outcome) else {
        return Ok(0);
    };

    let comments = host.list_comments(number).await?;
    let mut reacted = 0;
    let mut first_error = None;
    for comment in comments.iter().filter(|comment| pattern.is_match(&comment.body)) {
        match react_if_pending(host, comment.id, verdict).await {
            Ok(true) => reacted += 1,
            Ok(false) => {}
            Err(err) => {
                log::warn!("CLA: Failed to react to comment {}: {err}", comment.id);
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(reacted),
    }
}

async fn react_if_pending(
    host: &dyn HostApi,
    comment_id: u64,
    verdict: ReactionKind,
) -> std::result::Result<bool, HostError> {
    let reactions = host.list_reactions(comment_id).await?;
    if !is_pending(&reactions) {
        return Ok(false);
    }
    log::info!("CLA: Adding {verdict} reaction to comment {comment_id}");
    host.add_reaction(comment_id, verdict).await?;
    Ok(true)
}
