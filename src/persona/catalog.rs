use super::{EngagementStyle, Persona, Tone};
use std::collections::HashMap;

// Selector rule tables, evaluated in this order. First match wins.
const MEME_TRIGGERS: &[&str] = &["elon", "doge", "shib", "to the moon"];
const CHART_TRIGGERS: &[&str] = &["chart", "technical", "support", "resistance"];
const SIGNAL_TRIGGERS: &[&str] = &["buy", "sell", "long", "short"];
const LEARNING_TRIGGERS: &[&str] = &["how to", "learn", "tutorial", "guide"];

const DEFAULT_PERSONA: &str = "CryptoSavvy";

/// Registry of personas plus the rule-based selector that maps post text to
/// the best-matching persona.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: HashMap<String, Persona>,
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PersonaCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            personas: HashMap::new(),
        }
    }

    /// Catalog seeded with the five stock personas.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();
        for persona in default_personas() {
            catalog.add(persona);
        }
        catalog
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.get(name)
    }

    /// Upsert by name.
    pub fn add(&mut self, persona: Persona) {
        self.personas.insert(persona.name.clone(), persona);
    }

    /// Returns whether a persona with that name existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.personas.remove(name).is_some()
    }

    #[must_use]
    pub fn all(&self) -> Vec<&Persona> {
        self.personas.values().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// First-match rule cascade over lower-cased text. Rule order matters: a
    /// text matching both the meme and chart tables resolves to the meme
    /// persona. Returns `None` only when the matched name has been removed
    /// from the catalog; callers treat that as "skip processing".
    #[must_use]
    pub fn select_for_text(&self, text: &str) -> Option<&Persona> {
        let lower = text.to_lowercase();

        let name = if contains_any(&lower, MEME_TRIGGERS) {
            "MemeMaster"
        } else if contains_any(&lower, CHART_TRIGGERS) {
            "MarketWizard"
        } else if contains_any(&lower, SIGNAL_TRIGGERS) {
            "AlphaCaller"
        } else if contains_any(&lower, LEARNING_TRIGGERS) {
            "NewbieNinja"
        } else {
            DEFAULT_PERSONA
        };

        self.get(name)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn default_personas() -> Vec<Persona> {
    vec![
        Persona {
            name: "CryptoSavvy".into(),
            bio: "Blockchain analyst | DeFi expert | Early adopter".into(),
            expertise: vec!["defi".into(), "smart contracts".into(), "trading".into()],
            tone: Tone::Technical,
            engagement_style: EngagementStyle::Helpful,
        },
        Persona {
            name: "MemeMaster".into(),
            bio: "Meme lord | Trend spotter | Crypto culture".into(),
            expertise: vec!["memes".into(), "trends".into(), "community".into()],
            tone: Tone::Casual,
            engagement_style: EngagementStyle::Controversial,
        },
        Persona {
            name: "MarketWizard".into(),
            bio: "Technical analyst | Chart expert | Market wizard".into(),
            expertise: vec![
                "technical analysis".into(),
                "chart patterns".into(),
                "market cycles".into(),
            ],
            tone: Tone::Technical,
            engagement_style: EngagementStyle::Helpful,
        },
        Persona {
            name: "NewbieNinja".into(),
            bio: "Crypto beginner | Learning journey | Community builder".into(),
            expertise: vec!["learning".into(), "community".into(), "education".into()],
            tone: Tone::Casual,
            engagement_style: EngagementStyle::Helpful,
        },
        Persona {
            name: "AlphaCaller".into(),
            bio: "Alpha hunter | Early mover | Profit seeker".into(),
            expertise: vec![
                "trading signals".into(),
                "early opportunities".into(),
                "profits".into(),
            ],
            tone: Tone::Casual,
            engagement_style: EngagementStyle::Controversial,
        },
    ]
}
