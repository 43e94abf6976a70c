use serde::{Deserialize, Serialize};

use crate::*;

const FACE_ASSETS: [&str; 8] = [
    "/img1.svg",
    "/img2.svg",
    "/img3.svg",
    "/img4.svg",
    "/img5.svg",
    "/img6.svg",
    "/img7.svg",
    "/img8.svg",
];

/// Symbol shared by the two cards of a pair, an index into the fixed face catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub const CATALOG_SIZE: CardCount = FACE_ASSETS.len() as CardCount;

    pub fn from_catalog(index: usize) -> Option<Self> {
        (index < FACE_ASSETS.len()).then(|| Self(index as u8))
    }

    /// The first `count` faces of the catalog, in catalog order.
    pub fn catalog(count: CardCount) -> impl Iterator<Item = Face> {
        (0..usize::from(count.min(Self::CATALOG_SIZE))).filter_map(Self::from_catalog)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub fn asset(self) -> &'static str {
        FACE_ASSETS[usize::from(self.0)]
    }
}

impl TryFrom<u8> for Face {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_catalog(usize::from(index)).ok_or(GameError::InvalidCard)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub face: Face,
    pub matched: bool,
}

impl Card {
    pub const fn new(id: CardId, face: Face) -> Self {
        Self {
            id,
            face,
            matched: false,
        }
    }
}

/// Player-visible state of a single card; the face is only exposed once turned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Hidden,
    Flipped(Face),
    Matched(Face),
}

impl CardFace {
    pub const fn face(self) -> Option<Face> {
        match self {
            Self::Hidden => None,
            Self::Flipped(face) | Self::Matched(face) => Some(face),
        }
    }

    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl Default for CardFace {
    fn default() -> Self {
        Self::Hidden
    }
}
