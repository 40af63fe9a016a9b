// Discord command for the red-text highlighter.
//
// **Notice the pattern:**
// 1. Reject callers without the shared API key
// 2. Call core service
// 3. Format the response based on the outcome
//
// This layer is THIN - no business logic, just translation.

use crate::core::highlight::{HighlightOutcome, HighlightService};
use crate::infra::google_docs::{GoogleDocsClient, GoogleTokenClient};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub highlight: Arc<HighlightService<GoogleDocsClient, GoogleTokenClient>>,
    pub api_key: String,
}

const COLOR_SUCCESS: u32 = 0xF1C40F; // Highlighter yellow
const COLOR_NOOP: u32 = 0x95A5A6; // Grey
const COLOR_FAILURE: u32 = 0xE74C3C; // Red

// Discord rejects embed descriptions longer than this
const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Highlight the red text of one Google Doc wherever it appears in another.
#[poise::command(slash_command, ephemeral)]
pub async fn highlight(
    ctx: Context<'_>,
    #[description = "Source document ID or URL (where the red text is)"] source: String,
    #[description = "Destination document ID or URL (where to highlight)"] destination: String,
    #[description = "Shared API key"] api_key: String,
) -> Result<(), Error> {
    if !api_key_matches(&ctx.data().api_key, &api_key) {
        tracing::warn!(user_id = ctx.author().id.get(), "Rejected /highlight with a bad API key");
        ctx.say("Invalid API key.").await?;
        return Ok(());
    }

    // Three sequential Google calls can easily exceed Discord's 3s window
    ctx.defer_ephemeral().await?;

    let outcome = ctx.data().highlight.highlight(&source, &destination).await;
    tracing::info!(
        user_id = ctx.author().id.get(),
        success = outcome.is_success(),
        "Answered /highlight"
    );

    let embed = serenity::CreateEmbed::new()
        .title("🖍️ Highlight")
        .description(describe_outcome(&outcome))
        .color(outcome_color(&outcome));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

fn api_key_matches(expected: &str, presented: &str) -> bool {
    !expected.is_empty() && expected.as_bytes() == presented.trim().as_bytes()
}

/// Caller-facing text for an outcome, cut to fit an embed description.
pub fn describe_outcome(outcome: &HighlightOutcome) -> String {
    let text = match outcome {
        HighlightOutcome::Highlighted(text) => {
            format!("Text '{}' highlighted successfully.", text)
        }
        HighlightOutcome::NoColoredTextFound => "No red text was found.".to_string(),
        HighlightOutcome::Failed { kind, message, .. } => {
            format!("Failed ({}): {}", kind, message)
        }
    };

    truncate_chars(text, EMBED_DESCRIPTION_LIMIT)
}

/// Keeps at most `limit` characters, ending with an ellipsis when cut.
fn truncate_chars(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }

    let mut cut: String = text.chars().take(limit.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn outcome_color(outcome: &HighlightOutcome) -> u32 {
    match outcome {
        HighlightOutcome::Highlighted(_) => COLOR_SUCCESS,
        HighlightOutcome::NoColoredTextFound => COLOR_NOOP,
        HighlightOutcome::Failed { .. } => COLOR_FAILURE,
    }
}
