//! Prompt builders for the generation service. The persona's tone and
//! engagement style select the system-prompt wording and the sampling
//! temperature.

use crate::persona::{EngagementStyle, Persona, Tone};
use crate::social::Post;

const REPLY_CHAR_LIMIT: u32 = 240;

#[must_use]
pub fn system_prompt(persona: &Persona) -> String {
    let tone_line = match persona.tone {
        Tone::Technical => {
            "You are analytical and data-driven. Use precise language and include relevant metrics."
        }
        Tone::Casual => {
            "You are relaxed and conversational. Use informal language and emojis occasionally."
        }
        Tone::Meme => {
            "You are humorous and use internet culture references. Keep it light and entertaining."
        }
    };
    let style_line = match persona.engagement_style {
        EngagementStyle::Helpful => "Provide valuable insights and constructive contributions.",
        EngagementStyle::Controversial => "Take strong positions and spark debate.",
        EngagementStyle::Neutral => "Present balanced perspectives without taking sides.",
    };

    format!(
        "You are {}, a {}.\nYour expertise includes: {}.\nTone: {tone_line}\nEngagement style: {style_line}",
        persona.name,
        persona.bio,
        persona.expertise.join(", ")
    )
}

#[must_use]
pub fn reply_prompt(post: &Post, persona: &Persona) -> String {
    format!(
        "Respond to this post as {}:\n\nPost: \"{}\"\nAuthor: @{}\n\nWrite a {} response that matches your persona. Keep it under {REPLY_CHAR_LIMIT} characters.",
        persona.name, post.text, post.author_handle, persona.tone
    )
}

#[must_use]
pub fn thread_prompt(post: &Post, persona: &Persona, len: usize) -> String {
    format!(
        "Create a {len}-part thread expanding on this post as {}:\n\nOriginal post: \"{}\"\nAuthor: @{}\n\nWrite {len} connected posts that provide additional value, separated by blank lines. Each post should be under {REPLY_CHAR_LIMIT} characters.",
        persona.name, post.text, post.author_handle
    )
}

/// Sampling temperature per tone: the meme voice runs hottest.
#[must_use]
pub fn temperature_for(tone: Tone) -> f64 {
    match tone {
        Tone::Technical => 0.7,
        Tone::Casual => 0.9,
        Tone::Meme => 1.0,
    }
}
