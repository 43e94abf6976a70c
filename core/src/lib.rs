#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use audio::*;
pub use card::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod audio;
mod card;
mod engine;
mod error;
mod generator;
mod types;

/// Number of cards on the board; always even and backed by enough catalog faces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardCount", into = "CardCount")]
pub struct BoardConfig {
    cards: CardCount,
}

impl BoardConfig {
    pub const MIN_CARDS: CardCount = 2;
    pub const MAX_CARDS: CardCount = Face::CATALOG_SIZE * 2;
    pub const PRESETS: &'static [CardCount] = &[4, 8, 12, 16];

    pub(crate) const fn new_unchecked(cards: CardCount) -> Self {
        Self { cards }
    }

    /// Lenient constructor: rounds odd counts down and clamps into the supported range.
    pub fn new(cards: CardCount) -> Self {
        let clamped = (cards & !1).clamp(Self::MIN_CARDS, Self::MAX_CARDS);
        if clamped != cards {
            log::warn!("Unsupported board of {} cards, using {} instead", cards, clamped);
        }
        Self::new_unchecked(clamped)
    }

    pub fn try_new(cards: CardCount) -> Result<Self> {
        if cards < Self::MIN_CARDS {
            Err(GameError::TooFewCards(cards))
        } else if cards % 2 != 0 {
            Err(GameError::OddCardCount(cards))
        } else if pairs_for(cards) > Face::CATALOG_SIZE {
            Err(GameError::NotEnoughFaces {
                requested: pairs_for(cards),
                available: Face::CATALOG_SIZE,
            })
        } else {
            Ok(Self::new_unchecked(cards))
        }
    }

    pub const fn cards(&self) -> CardCount {
        self.cards
    }

    pub const fn pairs(&self) -> CardCount {
        pairs_for(self.cards)
    }
}

impl TryFrom<CardCount> for BoardConfig {
    type Error = GameError;

    fn try_from(cards: CardCount) -> Result<Self> {
        Self::try_new(cards)
    }
}

impl From<BoardConfig> for CardCount {
    fn from(config: BoardConfig) -> Self {
        config.cards
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked(16)
    }
}

/// Deals a fresh uniformly shuffled board.
pub fn deal(config: BoardConfig, seed: u64) -> Deck {
    RandomDeckGenerator::new(seed).generate(config)
}

/// Handle for the deferred flip-back of a mismatched pair.
///
/// Only the token issued for the current round and attempt resolves anything; tokens from an earlier deal are
/// stale and dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveToken {
    pub generation: Generation,
    pub attempt: CardCount,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    Matched,
    Mismatched(ResolveToken),
    Won,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        use FlipOutcome::*;
        match self {
            NoChange => false,
            Flipped => true,
            Matched => true,
            Mismatched(_) => true,
            Won => true,
        }
    }

    pub const fn pending_resolution(self) -> Option<ResolveToken> {
        match self {
            Self::Mismatched(token) => Some(token),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResolveOutcome {
    Stale,
    FlippedBack,
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Stale => false,
            Self::FlippedBack => true,
        }
    }
}
