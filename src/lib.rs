//! Rules engine for a head-to-head game of Durak.
//!
//! The crate owns deck construction and dealing, move legality, hand
//! replenishment and win detection; the network transport that routes
//! remote calls here and broadcasts the results lives elsewhere and talks
//! to the engine through [`GameRegistry`] and [`view::GameView`].

pub mod card;
pub mod error;
pub mod game;
pub mod moves;
pub mod player;
pub mod prelude;
pub mod registry;
pub mod view;

pub use card::{hand_fmt, Card, Deck, Rank, Suit};
pub use error::{GameError, GameResult};
pub use game::{Game, GameId, HAND_SIZE};
pub use moves::{beats, rank_matches, Move, Step, MAX_STEPS};
pub use player::Player;
pub use registry::GameRegistry;
pub use view::{GameSummary, GameView, OpponentInfo, StepView};
