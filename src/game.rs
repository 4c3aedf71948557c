//! The game state machine.
//!
//! One `Game` owns two players, the draw pile, the trump card and the move
//! history, and exposes the mutating operations the session layer invokes
//! on behalf of remote players. Every operation validates first and
//! mutates after, so a rejected call leaves the game exactly as it was.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::card::{hand_fmt, Card, Deck};
use crate::error::{GameError, GameResult};
use crate::moves::{self, Move, MAX_STEPS};
use crate::player::Player;

/// Opening hand size, and the level hands are refilled back up to.
pub const HAND_SIZE: usize = 6;

/// Opaque identifier for one game session.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct GameId(u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

pub struct Game {
    id: GameId,
    players: Vec<Player>,
    deck: Deck,
    trump: Option<Card>,
    trump_taken: bool,
    moves: Vec<Move>,
    turn: u32,
    attacker: usize,
    finished: bool,
    winner: Option<usize>,
    rng: StdRng,
}

impl Game {
    /// Creates a game with its first player, who will be the first
    /// attacker once an opponent joins.
    pub fn new(creator_name: &str, token: &str) -> GameResult<Self> {
        Self::with_rng(creator_name, token, StdRng::from_entropy())
    }

    /// Like [`Game::new`] but with a caller-supplied RNG, so deals and
    /// draws can be reproduced.
    pub fn with_rng(creator_name: &str, token: &str, mut rng: StdRng) -> GameResult<Self> {
        let creator = Player::new(creator_name, token)?;
        let id = GameId(rng.gen());
        info!("Game {} created by {}", id, creator.name());
        Ok(Game {
            id,
            players: vec![creator],
            deck: Deck::empty(),
            trump: None,
            trump_taken: false,
            moves: Vec::new(),
            turn: 0,
            attacker: 0,
            finished: false,
            winner: None,
            rng,
        })
    }

    /// Adds the second player and deals: a fresh 36-card deck, six random
    /// cards to each player in join order, then one more set aside as the
    /// trump. The game is active afterwards.
    pub fn join(&mut self, name: &str, token: &str) -> GameResult<()> {
        if self.finished {
            return Err(GameError::GameNotActive);
        }
        let player = Player::new(name, token)?;
        if self.players.len() >= 2 {
            return Err(GameError::GameFull);
        }
        self.players.push(player);

        self.deck = Deck::full();
        for player in &mut self.players {
            let cards = self.deck.draw_random(HAND_SIZE, &mut self.rng)?;
            player.give(cards);
        }
        let trump = self.deck.draw_random(1, &mut self.rng)?[0];
        self.trump = Some(trump);

        debug!("Game {} dealt, trump is {}", self.id, trump);
        for player in &self.players {
            debug!("Player {} has cards: {}", player.name(), hand_fmt(player.hand()));
        }
        Ok(())
    }

    /// A participant walks away: the game finishes immediately with no
    /// winner. The session layer notifies the opponent and discards the
    /// game.
    pub fn leave(&mut self, token: &str) -> GameResult<()> {
        let ind = self.player_index(token)?;
        if self.finished {
            return Err(GameError::GameNotActive);
        }
        info!("Player {} left game {}", self.players[ind].name(), self.id);
        self.finished = true;
        Ok(())
    }

    /// Opens the current turn's move with one attack card.
    pub fn open_move(&mut self, card: Card, token: &str) -> GameResult<()> {
        self.ensure_active()?;
        let ind = self.player_index(token)?;
        if ind != self.attacker {
            return Err(GameError::NotAttacker);
        }
        if self.current_move().is_some() {
            return Err(GameError::MoveAlreadyOpen);
        }
        self.players[ind].remove_card(card)?;
        self.moves.push(Move::new(self.turn, card));
        debug!("Player {} opened turn {} with {}", self.players[ind].name(), self.turn, card);
        self.check_winner(ind);
        Ok(())
    }

    /// Throws an additional attack card onto the open move. Legal only
    /// when the card's rank already appears on the table, and only while
    /// the defender can still answer everything thrown.
    pub fn pile_on(&mut self, card: Card, token: &str) -> GameResult<()> {
        self.ensure_active()?;
        let ind = self.player_index(token)?;
        if ind != self.attacker {
            return Err(GameError::NotAttacker);
        }
        let mv_ind = self.current_move_index().ok_or(GameError::MoveNotFound)?;
        if !moves::rank_matches(card, self.moves[mv_ind].steps()) {
            return Err(GameError::IllegalPileOn(card));
        }
        let open = self.moves[mv_ind].open_steps();
        let defender_cards = self.players[self.defender_index()].hand().len();
        if self.moves[mv_ind].steps().len() == MAX_STEPS || defender_cards == open {
            return Err(GameError::TooManyCards);
        }
        self.players[ind].remove_card(card)?;
        self.moves[mv_ind].push_attack(card);
        debug!("Player {} piled on {}", self.players[ind].name(), card);
        self.check_winner(ind);
        Ok(())
    }

    /// Covers the open step holding `attack` with `defend` from the
    /// caller's hand.
    pub fn defend(&mut self, attack: Card, defend: Card, token: &str) -> GameResult<()> {
        self.ensure_active()?;
        let ind = self.player_index(token)?;
        let trump = self.trump.ok_or(GameError::GameNotActive)?;
        if !moves::beats(defend, attack, trump) {
            return Err(GameError::IllegalDefend(attack, defend));
        }
        let mv_ind = self.current_move_index().ok_or(GameError::MoveNotFound)?;
        if !self.moves[mv_ind].has_open_attack(attack) {
            return Err(GameError::CardNotFound(attack));
        }
        self.players[ind].remove_card(defend)?;
        self.moves[mv_ind].cover(attack, defend)?;
        debug!("Player {} covered {} with {}", self.players[ind].name(), attack, defend);
        self.check_winner(ind);
        Ok(())
    }

    /// The defender concedes: every card on the table, covered or not,
    /// goes into the caller's hand, then the move is finalized.
    pub fn take_cards(&mut self, token: &str) -> GameResult<()> {
        self.ensure_active()?;
        let ind = self.player_index(token)?;
        let mv_ind = self.current_move_index().ok_or(GameError::MoveNotFound)?;
        self.players[ind].take_move_cards(&self.moves[mv_ind]);
        debug!("Player {} took the table", self.players[ind].name());
        self.finish_move()
    }

    /// The defense held: once every step is covered the table is cleared,
    /// the cards leaving play entirely, and the move is finalized.
    pub fn drop_cards(&mut self, token: &str) -> GameResult<()> {
        self.ensure_active()?;
        self.player_index(token)?;
        let mv_ind = self.current_move_index().ok_or(GameError::MoveNotFound)?;
        if !self.moves[mv_ind].all_covered() {
            return Err(GameError::UncoveredCards);
        }
        debug!("Turn {} dropped", self.turn);
        self.finish_move()
    }

    // Shared tail of take/drop: refill hands in player-list order, hand
    // the trump out once the deck runs dry, advance the turn and swap the
    // attacker. The swap is unconditional, even after a take.
    fn finish_move(&mut self) -> GameResult<()> {
        for ind in 0..self.players.len() {
            let shortfall = HAND_SIZE.saturating_sub(self.players[ind].hand().len());
            let n = shortfall.min(self.deck.len());
            if n > 0 {
                let cards = self.deck.draw_random(n, &mut self.rng)?;
                self.players[ind].give(cards);
            }
            if !self.trump_taken
                && self.deck.is_empty()
                && self.players[ind].hand().len() < HAND_SIZE
            {
                if let Some(trump) = self.trump {
                    debug!("Player {} picks up the trump {}", self.players[ind].name(), trump);
                    self.players[ind].give([trump]);
                    self.trump_taken = true;
                }
            }
        }
        self.attacker = 1 - self.attacker;
        self.turn += 1;
        debug!(
            "Turn {} begins, {} attacks",
            self.turn,
            self.players[self.attacker].name()
        );
        Ok(())
    }

    fn check_winner(&mut self, ind: usize) {
        if self.players[ind].hand().is_empty() && self.deck.is_empty() {
            info!("Player {} wins game {}", self.players[ind].name(), self.id);
            self.winner = Some(ind);
            self.finished = true;
        }
    }

    fn ensure_active(&self) -> GameResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::GameNotActive)
        }
    }

    fn player_index(&self, token: &str) -> GameResult<usize> {
        self.players
            .iter()
            .position(|p| p.token() == token)
            .ok_or(GameError::NotAParticipant)
    }

    fn current_move_index(&self) -> Option<usize> {
        self.moves.iter().position(|m| m.turn() == self.turn)
    }

    fn defender_index(&self) -> usize {
        1 - self.attacker
    }

    /// This game's identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Both players, in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Turns proceed only while two players are present and nobody has
    /// finished the game.
    pub fn is_active(&self) -> bool {
        self.players.len() == 2 && !self.finished
    }

    /// True once a winner is set or a participant left.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The winning player, if the game ended with one.
    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|ind| &self.players[ind])
    }

    /// The player whose turn it is to attack.
    pub fn attacker(&self) -> &Player {
        &self.players[self.attacker]
    }

    /// The defending player, present once the game is active.
    pub fn defender(&self) -> Option<&Player> {
        self.players.get(self.defender_index())
    }

    /// The move belonging to the current turn, if one has been opened.
    pub fn current_move(&self) -> Option<&Move> {
        self.moves.iter().find(|m| m.turn() == self.turn)
    }

    /// All moves played so far, the current one included.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Cards left in the draw pile.
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// The trump card, known once dealing has happened.
    pub fn trump(&self) -> Option<Card> {
        self.trump
    }

    /// Whether the trump card has already been drawn into a hand.
    pub fn trump_taken(&self) -> bool {
        self.trump_taken
    }

    /// The current turn index.
    pub fn turn(&self) -> u32 {
        self.turn
    }
}
