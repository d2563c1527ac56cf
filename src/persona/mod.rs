mod catalog;

pub use catalog::PersonaCatalog;

use serde::{Deserialize, Serialize};

/// A named behavioral profile used to shape generated content.
///
/// Entries are immutable values; the catalog upserts by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub tone: Tone,
    pub engagement_style: EngagementStyle,
}

impl Persona {
    /// One-line summary used in status output and prompt headers.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.bio,
            self.expertise.join(", "),
            self.tone.summary(),
            self.engagement_style.summary()
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Technical,
    Casual,
    Meme,
}

impl Tone {
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::Technical => "Technical analysis and deep dives",
            Self::Casual => "Casual conversations and memes",
            Self::Meme => "Memes and viral content",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EngagementStyle {
    Helpful,
    Controversial,
    Neutral,
}

impl EngagementStyle {
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::Helpful => "Helpful and informative",
            Self::Controversial => "Controversial and engaging",
            Self::Neutral => "Neutral and balanced",
        }
    }
}
