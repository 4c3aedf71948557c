//! The keyed store of live games the transport layer dispatches into.
//!
//! Each game sits behind its own mutex, so two connections hammering the
//! same game are serialized against each other while games on different
//! keys never contend beyond the brief map lookup. Games disappear from
//! the store the moment they end, either with a winner or through a
//! participant leaving.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::info;

use crate::card::Card;
use crate::error::{GameError, GameResult};
use crate::game::{Game, GameId};
use crate::view::{GameSummary, GameView};

/// The set of live games, keyed by id.
#[derive(Default)]
pub struct GameRegistry {
    games: RwLock<HashMap<GameId, Arc<Mutex<Game>>>>,
}

impl GameRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game for `creator_name` and registers it.
    pub fn create_game(&self, creator_name: &str, token: &str) -> GameResult<GameId> {
        let game = Game::new(creator_name, token)?;
        let id = game.id();
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(game)));
        Ok(id)
    }

    /// Joins the waiting game `id`, which deals and starts it.
    pub fn join_game(&self, id: GameId, name: &str, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.join(name, token))
    }

    /// A participant leaves; the aborted game is dropped from the store.
    pub fn leave_game(&self, id: GameId, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.leave(token))?;
        self.remove(id);
        Ok(())
    }

    /// See [`Game::open_move`].
    pub fn open_move(&self, id: GameId, card: Card, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.open_move(card, token))
    }

    /// See [`Game::pile_on`].
    pub fn pile_on(&self, id: GameId, card: Card, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.pile_on(card, token))
    }

    /// See [`Game::defend`].
    pub fn defend(&self, id: GameId, attack: Card, defend: Card, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.defend(attack, defend, token))
    }

    /// See [`Game::take_cards`].
    pub fn take_cards(&self, id: GameId, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.take_cards(token))
    }

    /// See [`Game::drop_cards`].
    pub fn drop_cards(&self, id: GameId, token: &str) -> GameResult<()> {
        self.dispatch(id, |game| game.drop_cards(token))
    }

    /// Snapshot of game `id` from `token`'s side of the table.
    pub fn view(&self, id: GameId, token: &str) -> GameResult<GameView> {
        let game = self.game(id)?;
        let game = game.lock().unwrap_or_else(PoisonError::into_inner);
        GameView::for_player(&game, token)
    }

    /// Lobby listing of every registered game.
    pub fn list_games(&self) -> Vec<GameSummary> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entry| {
                let game = entry.lock().unwrap_or_else(PoisonError::into_inner);
                GameSummary {
                    id: game.id(),
                    creator: game.players()[0].name().to_string(),
                }
            })
            .collect()
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no games are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Runs one operation under the game's own lock, then unregisters the
    // game if the operation ended it with a winner.
    fn dispatch<T>(&self, id: GameId, op: impl FnOnce(&mut Game) -> GameResult<T>) -> GameResult<T> {
        let entry = self.game(id)?;
        let result;
        let ended = {
            let mut game = entry.lock().unwrap_or_else(PoisonError::into_inner);
            result = op(&mut *game)?;
            game.is_finished() && game.winner().is_some()
        };
        if ended {
            self.remove(id);
        }
        Ok(result)
    }

    fn game(&self, id: GameId) -> GameResult<Arc<Mutex<Game>>> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(GameError::GameNotFound)
    }

    fn remove(&self, id: GameId) {
        if self
            .games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
        {
            info!("Game {} removed from the registry", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_the_creator() {
        let registry = GameRegistry::new();
        let id = registry.create_game("Misha", "tok-a").unwrap();
        let games = registry.list_games();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, id);
        assert_eq!(games[0].creator, "Misha");
    }

    #[test]
    fn leave_unregisters_the_game() {
        let registry = GameRegistry::new();
        let id = registry.create_game("Misha", "tok-a").unwrap();
        registry.join_game(id, "Olya", "tok-b").unwrap();
        registry.leave_game(id, "tok-b").unwrap();
        assert!(registry.is_empty());
        assert_eq!(
            registry.view(id, "tok-a").unwrap_err(),
            GameError::GameNotFound
        );
    }

    #[test]
    fn errors_reach_only_the_caller_and_change_nothing() {
        let registry = GameRegistry::new();
        let id = registry.create_game("Misha", "tok-a").unwrap();
        registry.join_game(id, "Olya", "tok-b").unwrap();
        let defender_card = registry.view(id, "tok-b").unwrap().hand[0];
        assert_eq!(
            registry.open_move(id, defender_card, "tok-b").unwrap_err(),
            GameError::NotAttacker
        );
        assert_eq!(registry.view(id, "tok-b").unwrap().hand.len(), 6);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let registry = GameRegistry::new();
        let id = registry.create_game("Misha", "tok-a").unwrap();
        registry.leave_game(id, "tok-a").unwrap();
        assert_eq!(
            registry.join_game(id, "Olya", "tok-b").unwrap_err(),
            GameError::GameNotFound
        );
    }
}
