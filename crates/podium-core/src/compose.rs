//! Announcement message rendering.

use crate::model::AggregatedOutcome;

/// Render an aggregated outcome as a chat message body.
///
/// Pure and total. Field order is part of the contract: competition id,
/// date, dataset size, tested-model count, winning hotkey, score. The
/// occurrence renders in a fixed UTC format and the score with exactly two
/// decimals; the markdown around them is presentation only.
pub fn compose_announcement(outcome: &AggregatedOutcome) -> String {
    format!(
        "# Competition results\n\n\
         **{}**  - `{}`\n\
         Dataset size: {}\n\n\
         Tested models - {}\n\n\
         Winning hotkey - {}\n\n\
         Score: **{:.2}**",
        outcome.competition_id,
        outcome.occurrence.format("%Y.%m.%d %H:%M UTC"),
        outcome.dataset_size,
        outcome.tested_models,
        outcome.winning_hotkey,
        outcome.score,
    )
}
