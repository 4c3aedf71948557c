//! A game participant and the hand of cards they hold.

use crate::card::Card;
use crate::error::{GameError, GameResult};
use crate::moves::Move;

/// A participant in a game: a display name, the transport-identity token
/// the session layer knows them by, and their current hand.
#[derive(Debug)]
pub struct Player {
    name: String,
    token: String,
    hand: Vec<Card>,
}

impl Player {
    /// Creates a player with an empty hand. Rejects blank names.
    pub fn new(name: &str, token: &str) -> GameResult<Self> {
        if !Self::valid_name(name) {
            return Err(GameError::InvalidName);
        }
        Ok(Player {
            name: name.to_string(),
            token: token.to_string(),
            hand: Vec::new(),
        })
    }

    /// A name is valid when it contains something other than whitespace.
    pub fn valid_name(name: &str) -> bool {
        !name.trim().is_empty()
    }

    /// The player's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The transport token identifying this player.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The player's current hand.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub(crate) fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub(crate) fn give(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }

    /// Removes one card from the hand, by value.
    pub(crate) fn remove_card(&mut self, card: Card) -> GameResult<()> {
        match self.hand.iter().position(|&c| c == card) {
            Some(ind) => {
                self.hand.swap_remove(ind);
                Ok(())
            }
            None => Err(GameError::CardNotHeld(card)),
        }
    }

    /// Moves every card recorded in `mv` into this hand ("take").
    pub(crate) fn take_move_cards(&mut self, mv: &Move) {
        self.hand.extend(mv.cards());
    }
}
