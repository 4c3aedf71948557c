//! Limited game state made available to clients for broadcast.
//!
//! The session layer reads these after each successful mutation: a player
//! sees their own full hand but only the opponent's card count, and the
//! trump card only while nobody has drawn it.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::{GameError, GameResult};
use crate::game::{Game, GameId};
use crate::moves::Step;

/// Lobby listing entry for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    /// The game's identifier.
    pub id: GameId,
    /// Name of the player who opened the game.
    pub creator: String,
}

/// What a player is told about their opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentInfo {
    /// Opponent's display name.
    pub name: String,
    /// Number of cards in the opponent's hand.
    pub hand_len: usize,
}

/// One attack/defense pairing as broadcast to clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepView {
    /// The attacking card.
    pub attack: Card,
    /// The covering card, if played.
    pub defend: Option<Card>,
}

impl From<&Step> for StepView {
    fn from(step: &Step) -> Self {
        StepView {
            attack: step.attack(),
            defend: step.defend(),
        }
    }
}

/// A per-caller snapshot of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    /// The game's identifier.
    pub id: GameId,
    /// The caller's own hand.
    pub hand: Vec<Card>,
    /// The opponent, once one has joined.
    pub opponent: Option<OpponentInfo>,
    /// Cards left in the draw pile.
    pub deck_len: usize,
    /// The trump card, while it is still unclaimed.
    pub trump: Option<Card>,
    /// Steps of the current move, in play order.
    pub steps: Vec<StepView>,
    /// Transport token of the current attacker.
    pub attacker: String,
    /// The current turn index.
    pub turn: u32,
    /// Set once the game has ended.
    pub finished: bool,
    /// Transport token of the winner, if the game ended with one.
    pub winner: Option<String>,
}

impl GameView {
    /// Builds the snapshot for the participant identified by `token`.
    pub fn for_player(game: &Game, token: &str) -> GameResult<Self> {
        let me = game
            .players()
            .iter()
            .find(|p| p.token() == token)
            .ok_or(GameError::NotAParticipant)?;
        let opponent = game
            .players()
            .iter()
            .find(|p| p.token() != token)
            .map(|p| OpponentInfo {
                name: p.name().to_string(),
                hand_len: p.hand().len(),
            });
        Ok(GameView {
            id: game.id(),
            hand: me.hand().to_vec(),
            opponent,
            deck_len: game.deck_len(),
            trump: if game.trump_taken() { None } else { game.trump() },
            steps: game
                .current_move()
                .map(|m| m.steps().iter().map(StepView::from).collect())
                .unwrap_or_default(),
            attacker: game.attacker().token().to_string(),
            turn: game.turn(),
            finished: game.is_finished(),
            winner: game.winner().map(|p| p.token().to_string()),
        })
    }
}
