//! Engine prelude.

pub use super::card::{hand_fmt, Card, Rank, Suit};
pub use super::error::{GameError, GameResult};
pub use super::game::{Game, GameId};
pub use super::moves::{Move, Step};
pub use super::registry::GameRegistry;
pub use super::view::{GameSummary, GameView};
