//! Lexical cue extraction
//!
//! Each category scores the number of its list entries found in the page's
//! visible text (case-insensitive substring match). Repeats of one entry
//! count once.

use honeylens_core::SignalName;
use honeylens_dom::Page;

use crate::{Reading, SignalExtractor};

/// A word/phrase list feeding one lexical signal
#[derive(Debug, Clone, Copy)]
pub struct LexicalCategory {
    pub signal: SignalName,
    pub entries: &'static [&'static str],
}

pub const URGENCY_WORDS: &[&str] = &[
    "limited time",
    "act now",
    "don't miss out",
    "hurry",
    "last chance",
    "ending soon",
    "only today",
    "flash sale",
];

pub const REWARD_WORDS: &[&str] = &[
    "free",
    "bonus",
    "instant",
    "guaranteed",
    "exclusive",
    "special offer",
    "discount",
    "save big",
];

pub const SUSPICIOUS_PHRASES: &[&str] = &[
    "no risk",
    "secret method",
    "loophole",
    "hack",
    "trick",
    "insider info",
    "hidden technique",
    "unknown to most",
];

pub const EMOTION_TRIGGERS: &[&str] = &[
    "fear",
    "greed",
    "excitement",
    "curiosity",
    "fomo",
    "regret",
    "shame",
    "envy",
];

pub const DECEPTION_INDICATORS: &[&str] = &[
    "only for you",
    "selected users",
    "secret society",
    "hidden knowledge",
    "confidential offer",
    "not available to public",
];

pub const PRESSURE_TACTICS: &[&str] = &[
    "limited slots",
    "closing soon",
    "one-time offer",
    "never again",
    "act before it's too late",
    "don't miss this chance",
];

pub const TRUST_SIGNALS: &[&str] = &[
    "verified",
    "certified",
    "endorsed by",
    "as seen on",
    "trusted by",
    "official partner",
];

/// All lexical categories, in taxonomy order
pub const LEXICON: [LexicalCategory; 7] = [
    LexicalCategory { signal: SignalName::UrgencyScore, entries: URGENCY_WORDS },
    LexicalCategory { signal: SignalName::RewardScore, entries: REWARD_WORDS },
    LexicalCategory { signal: SignalName::SuspiciousPhraseScore, entries: SUSPICIOUS_PHRASES },
    LexicalCategory { signal: SignalName::EmotionTriggerScore, entries: EMOTION_TRIGGERS },
    LexicalCategory { signal: SignalName::DeceptionScore, entries: DECEPTION_INDICATORS },
    LexicalCategory { signal: SignalName::PressureTacticsScore, entries: PRESSURE_TACTICS },
    LexicalCategory { signal: SignalName::TrustSignalsScore, entries: TRUST_SIGNALS },
];

const LEXICAL_SIGNALS: [SignalName; 7] = [
    SignalName::UrgencyScore,
    SignalName::RewardScore,
    SignalName::SuspiciousPhraseScore,
    SignalName::EmotionTriggerScore,
    SignalName::DeceptionScore,
    SignalName::PressureTacticsScore,
    SignalName::TrustSignalsScore,
];

/// Number of entries present in already-lowercased text
pub fn count_entries(lower_text: &str, entries: &[&str]) -> u32 {
    entries.iter().filter(|entry| lower_text.contains(*entry)).count() as u32
}

/// Score every lexical category against a text
pub fn score_text(text: &str) -> Vec<Reading> {
    let lower = text.to_lowercase();
    LEXICON
        .iter()
        .map(|category| (category.signal, count_entries(&lower, category.entries)))
        .collect()
}

/// Word/phrase list matcher over the visible text
#[derive(Debug, Default)]
pub struct LexicalExtractor;

impl SignalExtractor for LexicalExtractor {
    fn id(&self) -> &str {
        "lexical"
    }

    fn signals(&self) -> &'static [SignalName] {
        &LEXICAL_SIGNALS
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        score_text(page.visible_text())
    }
}
