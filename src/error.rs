//! Error types for game rule validation.
//!
//! Every variant is a local validation failure: an operation that returns
//! one of these has not touched game state, so the transport layer can
//! relay the message to the offending client and move on.

use thiserror::Error;

use crate::card::Card;

/// Result alias used throughout the engine.
pub type GameResult<T> = Result<T, GameError>;

/// An error type for rejected game operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("player name must not be blank")]
    InvalidName,
    #[error("the game already has two players")]
    GameFull,
    #[error("you are not a participant of this game")]
    NotAParticipant,
    #[error("the game is not active")]
    GameNotActive,
    #[error("you are not the attacker")]
    NotAttacker,
    #[error("card {0} cannot be thrown: its rank has not been played this turn")]
    IllegalPileOn(Card),
    #[error("no more cards can be thrown this turn")]
    TooManyCards,
    #[error("card {1} does not beat card {0}")]
    IllegalDefend(Card, Card),
    #[error("not every card on the table is covered")]
    UncoveredCards,
    #[error("card {0} is not in your hand")]
    CardNotHeld(Card),
    #[error("card {0} is not on the table")]
    CardNotFound(Card),
    #[error("no move is in progress")]
    MoveNotFound,
    #[error("a move is already in progress this turn")]
    MoveAlreadyOpen,
    #[error("not enough cards left in the deck")]
    InsufficientCards,
    #[error("no such game")]
    GameNotFound,
}
