// Bot presence glue.
//
// Only Discord SDK types live here (Context, ActivityData, OnlineStatus).

use poise::serenity_prelude as serenity;

/// Called once the bot is ready so users can see what it is for.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for red text | /highlight");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
