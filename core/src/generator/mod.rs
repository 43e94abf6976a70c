use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::ops::Index;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait DeckGenerator {
    fn generate(self, config: BoardConfig) -> Deck;
}

/// A dealt board: every face appears exactly twice, card ids match their positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Face>", into = "Vec<Face>")]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a deck in the given order, rejecting anything that is not a set of pairs.
    pub fn from_faces(faces: impl IntoIterator<Item = Face>) -> Result<Self> {
        let cards: Vec<Card> = faces
            .into_iter()
            .enumerate()
            .map(|(i, face)| {
                CardId::try_from(i)
                    .map(|id| Card::new(id, face))
                    .map_err(|_| GameError::InvalidCard)
            })
            .collect::<Result<_>>()?;

        let total: CardCount = cards.len().try_into().map_err(|_| GameError::InvalidCard)?;
        BoardConfig::try_new(total)?;

        let mut per_face: BTreeMap<Face, u8> = BTreeMap::new();
        for card in &cards {
            *per_face.entry(card.face).or_default() += 1;
        }
        if per_face.values().any(|&count| count != 2) {
            return Err(GameError::BrokenPairing);
        }

        Ok(Self { cards })
    }

    pub(crate) fn from_shuffled(faces: Vec<Face>) -> Self {
        let cards = faces
            .into_iter()
            .enumerate()
            .map(|(i, face)| Card::new(i as CardId, face))
            .collect();
        Self { cards }
    }

    pub fn total_cards(&self) -> CardCount {
        self.cards.len() as CardCount
    }

    pub fn total_pairs(&self) -> CardCount {
        pairs_for(self.total_cards())
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.to_index())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.cards.iter().map(|card| card.face)
    }

    pub(crate) fn mark_matched(&mut self, id: CardId) {
        if let Some(card) = self.cards.get_mut(id.to_index()) {
            card.matched = true;
        }
    }
}

impl TryFrom<Vec<Face>> for Deck {
    type Error = GameError;

    fn try_from(faces: Vec<Face>) -> Result<Self> {
        Self::from_faces(faces)
    }
}

impl From<Deck> for Vec<Face> {
    fn from(deck: Deck) -> Self {
        deck.faces().collect()
    }
}

impl Index<CardId> for Deck {
    type Output = Card;

    fn index(&self, id: CardId) -> &Self::Output {
        &self.cards[id.to_index()]
    }
}
