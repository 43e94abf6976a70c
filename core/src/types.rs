/// Position of a card in the dealt sequence, also its stable identity.
pub type CardId = u8;

/// Count type used for card counts, pair counts and move counts.
pub type CardCount = u16;

/// Round counter, bumped on every new deal so late resolutions can be told apart.
pub type Generation = u32;

pub const fn pairs_for(cards: CardCount) -> CardCount {
    cards / 2
}

pub trait ToIndex {
    fn to_index(self) -> usize;
}

impl ToIndex for CardId {
    fn to_index(self) -> usize {
        self.into()
    }
}
