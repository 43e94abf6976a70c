use thiserror::Error;

use crate::CardCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card count must be even, got {0}")]
    OddCardCount(CardCount),
    #[error("A board needs at least 2 cards, got {0}")]
    TooFewCards(CardCount),
    #[error("Board needs {requested} faces but the catalog only has {available}")]
    NotEnoughFaces {
        requested: CardCount,
        available: CardCount,
    },
    #[error("Every face must appear exactly twice")]
    BrokenPairing,
    #[error("Invalid card")]
    InvalidCard,
}

pub type Result<T> = core::result::Result<T, GameError>;
