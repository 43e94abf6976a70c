use alloc::vec::Vec;
use core::num::Saturating;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// How long a mismatched pair stays face up before it is turned back.
pub const RESOLUTION_DELAY: Duration = Duration::from_millis(1000);

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Where the current pair-attempt stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    OneFlipped,
    Resolving,
}

/// Flip/match state machine for a single dealt board.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundEngine {
    deck: Deck,
    flipped: Vec<CardId>,
    matched_count: Saturating<CardCount>,
    move_count: Saturating<CardCount>,
    pending: Option<ResolveToken>,
    generation: Generation,
    state: EngineState,
}

impl RoundEngine {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            flipped: Vec::with_capacity(2),
            matched_count: Saturating(0),
            move_count: Saturating(0),
            pending: None,
            generation: 0,
            state: Default::default(),
        }
    }

    /// Replaces the board and resets the round; any resolution still in flight becomes stale.
    pub fn restart(&mut self, deck: Deck) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::new(deck)
        };
        log::debug!(
            "round {} started with {} cards",
            generation,
            self.deck.total_cards()
        );
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn phase(&self) -> RoundPhase {
        match (self.pending, self.flipped.len()) {
            (Some(_), _) => RoundPhase::Resolving,
            (None, 0) => RoundPhase::Idle,
            (None, _) => RoundPhase::OneFlipped,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn total_cards(&self) -> CardCount {
        self.deck.total_cards()
    }

    pub fn total_pairs(&self) -> CardCount {
        self.deck.total_pairs()
    }

    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    pub fn matched_count(&self) -> CardCount {
        self.matched_count.0
    }

    pub fn move_count(&self) -> CardCount {
        self.move_count.0
    }

    pub fn card_at(&self, id: CardId) -> CardFace {
        match self.deck.get(id) {
            Some(card) if card.matched => CardFace::Matched(card.face),
            Some(card) if self.flipped.contains(&id) => CardFace::Flipped(card.face),
            _ => CardFace::Hidden,
        }
    }

    pub fn can_flip(&self, id: CardId) -> bool {
        if self.state.is_finished() || self.is_locked() {
            return false;
        }

        match self.deck.get(id) {
            Some(card) => !card.matched && !self.flipped.contains(&id),
            None => false,
        }
    }

    /// Turns a card face up, resolving the pair once two are showing.
    ///
    /// Clicks on locked, already flipped, matched or unknown cards are absorbed as [`FlipOutcome::NoChange`].
    pub fn flip(&mut self, id: CardId) -> FlipOutcome {
        if !self.can_flip(id) {
            log::trace!("ignored flip of card {} in phase {:?}", id, self.phase());
            return FlipOutcome::NoChange;
        }

        self.flipped.push(id);
        self.mark_started();
        log::debug!("flipped card {}", id);

        let &[first, second] = self.flipped.as_slice() else {
            return FlipOutcome::Flipped;
        };

        self.move_count += 1;

        if self.deck[first].face == self.deck[second].face {
            self.deck.mark_matched(first);
            self.deck.mark_matched(second);
            self.matched_count += 1;
            self.flipped.clear();

            if self.matched_count.0 == self.total_pairs() {
                log::debug!("all {} pairs found in {} moves", self.total_pairs(), self.move_count);
                self.state = EngineState::Won;
                FlipOutcome::Won
            } else {
                FlipOutcome::Matched
            }
        } else {
            let token = ResolveToken {
                generation: self.generation,
                attempt: self.move_count.0,
            };
            self.pending = Some(token);
            log::debug!("mismatch {} / {}, resolving with {:?}", first, second, token);
            FlipOutcome::Mismatched(token)
        }
    }

    /// Turns a mismatched pair back face down; tokens from another round or attempt do nothing.
    pub fn resolve(&mut self, token: ResolveToken) -> ResolveOutcome {
        if self.pending != Some(token) {
            log::debug!(
                "dropping stale resolution {:?} (round {})",
                token,
                self.generation
            );
            return ResolveOutcome::Stale;
        }

        self.pending = None;
        self.flipped.clear();
        ResolveOutcome::FlippedBack
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(index: usize) -> Face {
        Face::from_catalog(index).unwrap()
    }

    /// Cards 0/2 share face 0 and cards 1/3 share face 1.
    fn engine() -> RoundEngine {
        RoundEngine::new(Deck::from_faces([face(0), face(1), face(0), face(1)]).unwrap())
    }

    #[test]
    fn first_flip_starts_the_round() {
        let mut engine = engine();
        assert_eq!(engine.state(), EngineState::Ready);

        assert_eq!(engine.flip(0), FlipOutcome::Flipped);

        assert_eq!(engine.state(), EngineState::Active);
        assert_eq!(engine.phase(), RoundPhase::OneFlipped);
        assert_eq!(engine.card_at(0), CardFace::Flipped(face(0)));
        assert_eq!(engine.card_at(1), CardFace::Hidden);
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn third_flip_is_ignored_while_resolving() {
        let mut engine = engine();
        engine.flip(0);
        let outcome = engine.flip(1);
        assert!(matches!(outcome, FlipOutcome::Mismatched(_)));
        assert_eq!(engine.phase(), RoundPhase::Resolving);

        for _ in 0..5 {
            assert_eq!(engine.flip(2), FlipOutcome::NoChange);
        }

        assert_eq!(engine.flipped(), [0, 1]);
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.matched_count(), 0);
        assert_eq!(engine.card_at(2), CardFace::Hidden);
    }

    #[test]
    fn match_resolves_immediately_and_permanently() {
        let mut engine = engine();
        engine.flip(0);

        assert_eq!(engine.flip(2), FlipOutcome::Matched);

        assert_eq!(engine.matched_count(), 1);
        assert_eq!(engine.move_count(), 1);
        assert!(engine.flipped().is_empty());
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert!(engine.deck()[0].matched && engine.deck()[2].matched);
        assert_eq!(engine.card_at(2), CardFace::Matched(face(0)));

        assert_eq!(engine.flip(0), FlipOutcome::NoChange);
        assert_eq!(engine.flip(2), FlipOutcome::NoChange);
        assert_eq!(engine.matched_count(), 1);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn mismatch_stays_up_until_resolved() {
        let mut engine = engine();
        engine.flip(0);
        let token = engine.flip(3).pending_resolution().unwrap();

        assert_eq!(engine.card_at(0), CardFace::Flipped(face(0)));
        assert_eq!(engine.card_at(3), CardFace::Flipped(face(1)));
        assert!(engine.is_locked());

        assert_eq!(engine.resolve(token), ResolveOutcome::FlippedBack);

        assert!(engine.flipped().is_empty());
        assert!(!engine.is_locked());
        assert_eq!(engine.card_at(0), CardFace::Hidden);
        assert_eq!(engine.card_at(3), CardFace::Hidden);
        assert!(engine.can_flip(0) && engine.can_flip(3));
        assert_eq!(engine.resolve(token), ResolveOutcome::Stale);
    }

    #[test]
    fn win_is_detected_and_freezes_the_board() {
        let mut engine = engine();
        engine.flip(0);
        let token = engine.flip(1).pending_resolution().unwrap();
        engine.resolve(token);
        engine.flip(0);
        assert_eq!(engine.flip(2), FlipOutcome::Matched);
        engine.flip(1);

        assert_eq!(engine.flip(3), FlipOutcome::Won);

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.matched_count(), engine.total_pairs());
        assert_eq!(engine.move_count(), 3);
        let before = engine.clone();
        for id in 0..4 {
            assert_eq!(engine.flip(id), FlipOutcome::NoChange);
        }
        assert_eq!(engine, before);
    }

    #[test]
    fn stale_resolution_cannot_unlock_a_new_round() {
        let mut engine = engine();
        engine.flip(0);
        let stale = engine.flip(1).pending_resolution().unwrap();

        engine.restart(Deck::from_faces([face(0), face(1), face(0), face(1)]).unwrap());
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert_eq!(engine.move_count(), 0);
        engine.flip(0);
        let fresh = engine.flip(1).pending_resolution().unwrap();
        assert_ne!(stale, fresh);
        assert_eq!(stale.attempt, fresh.attempt);

        assert_eq!(engine.resolve(stale), ResolveOutcome::Stale);
        assert_eq!(engine.flipped(), [0, 1]);
        assert!(engine.is_locked());

        assert_eq!(engine.resolve(fresh), ResolveOutcome::FlippedBack);
        assert!(!engine.is_locked());
    }

    #[test]
    fn restart_resets_counters_and_deck() {
        let mut engine = engine();
        engine.flip(0);
        engine.flip(2);

        let deck = deal(BoardConfig::try_new(8).unwrap(), 3);
        engine.restart(deck.clone());

        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.matched_count(), 0);
        assert_eq!(engine.move_count(), 0);
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.deck(), &deck);
        assert_eq!(engine.total_pairs(), 4);
    }

    #[test]
    fn repeated_clicks_on_a_flipped_card_change_nothing() {
        let mut engine = engine();
        engine.flip(1);

        assert_eq!(engine.flip(1), FlipOutcome::NoChange);
        assert_eq!(engine.flip(1), FlipOutcome::NoChange);

        assert_eq!(engine.flipped(), [1]);
        assert_eq!(engine.move_count(), 0);
        assert_eq!(engine.matched_count(), 0);
    }

    #[test]
    fn unknown_cards_are_absorbed() {
        let mut engine = engine();
        assert!(!engine.can_flip(4));
        assert_eq!(engine.flip(200), FlipOutcome::NoChange);
        assert_eq!(engine.card_at(200), CardFace::Hidden);
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn moves_count_completed_attempts() {
        let mut engine = RoundEngine::new(deal(BoardConfig::default(), 11));
        let mut attempts = 0;

        while !engine.is_finished() {
            let first = (0..16).find(|&id| engine.can_flip(id)).unwrap();
            let face = engine.deck()[first].face;
            let second = (0..16)
                .find(|&id| id != first && engine.can_flip(id) && engine.deck()[id].face == face)
                .unwrap();
            engine.flip(first);
            engine.flip(second);
            attempts += 1;
        }

        assert_eq!(attempts, 8);
        assert_eq!(engine.move_count(), 8);
        assert_eq!(engine.matched_count(), 8);
    }
}
