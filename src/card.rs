//! The basics: suits, ranks, cards and the draw pile.

use std::fmt;

use anyhow::bail;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// An enum to denote card suits.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Suit {
    Spades = 0,
    Diamonds = 1,
    Hearts = 2,
    Clubs = 3,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Spades => write!(f, "♠"),
            Suit::Diamonds => write!(f, "♦"),
            Suit::Hearts => write!(f, "♥"),
            Suit::Clubs => write!(f, "♣"),
        }
    }
}

impl TryFrom<usize> for Suit {
    type Error = anyhow::Error;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Suit::Spades),
            1 => Ok(Suit::Diamonds),
            2 => Ok(Suit::Hearts),
            3 => Ok(Suit::Clubs),
            _ => bail!("Value out of range"),
        }
    }
}

/// An enum to denote card ranks.
/// Only includes Sixes to Aces.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Rank {
    Six = 1,
    Seven = 2,
    Eight = 3,
    Nine = 4,
    Ten = 5,
    Jack = 6,
    Queen = 7,
    King = 8,
    Ace = 9,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ace => write!(f, "A"),
            Rank::King => write!(f, "K"),
            Rank::Queen => write!(f, "Q"),
            Rank::Jack => write!(f, "J"),
            Rank::Ten => write!(f, "10"),
            Rank::Nine => write!(f, "9"),
            Rank::Eight => write!(f, "8"),
            Rank::Seven => write!(f, "7"),
            Rank::Six => write!(f, "6"),
        }
    }
}

impl TryFrom<usize> for Rank {
    type Error = anyhow::Error;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rank::Six),
            2 => Ok(Rank::Seven),
            3 => Ok(Rank::Eight),
            4 => Ok(Rank::Nine),
            5 => Ok(Rank::Ten),
            6 => Ok(Rank::Jack),
            7 => Ok(Rank::Queen),
            8 => Ok(Rank::King),
            9 => Ok(Rank::Ace),
            _ => bail!("Value out of range"),
        }
    }
}

/// A single card. Compared by (rank, suit) value, never shared.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Card {
    /// The card's rank.
    pub rank: Rank,
    /// The card's suit.
    pub suit: Suit,
}

impl Card {
    /// Shorthand constructor.
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl TryFrom<usize> for Card {
    type Error = anyhow::Error;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < 36 {
            let r = value % 9 + 1;
            let s = value / 9;
            Ok(Card {
                rank: Rank::try_from(r)?,
                suit: Suit::try_from(s)?,
            })
        } else {
            bail!("Value out of range")
        }
    }
}

impl TryFrom<Card> for usize {
    type Error = &'static str;
    fn try_from(card: Card) -> Result<Self, Self::Error> {
        Ok(card.rank as usize + card.suit as usize * 9 - 1)
    }
}

/// Creates a text representation of a hand of cards.
pub fn hand_fmt(hand: &[Card]) -> String {
    hand.iter()
        .map(|c| format!("{:>4}", format!("{}", c)))
        .collect::<String>()
}

/// The shared draw pile.
///
/// Starts out holding all 36 distinct cards; every card drawn from it is
/// moved into exactly one hand (or set aside as the trump card), so no
/// card value ever exists in two places at once.
#[derive(Debug, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the full 36-card deck, 4 suits by 9 ranks.
    pub fn full() -> Self {
        let mut cards = Vec::with_capacity(36);
        for v in 0..36 {
            // every value below 36 converts
            if let Ok(card) = Card::try_from(v) {
                cards.push(card);
            }
        }
        Deck { cards }
    }

    /// An empty draw pile, the state before dealing.
    pub fn empty() -> Self {
        Deck { cards: Vec::new() }
    }

    // lets tests rig an exact draw pile
    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Deck { cards }
    }

    /// Number of cards left to draw.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True once the pile has been drawn dry.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns `n` uniformly chosen cards, without replacement.
    pub fn draw_random<R: Rng>(&mut self, n: usize, rng: &mut R) -> GameResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(GameError::InsufficientCards);
        }
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            let ind = rng.gen_range(0..self.cards.len());
            drawn.push(self.cards.swap_remove(ind));
        }
        Ok(drawn)
    }
}
