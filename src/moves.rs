//! One turn's worth of attack/defense pairings, and the pure legality
//! rules that govern them.
//!
//! The validators here are stateless so that clients can pre-check a card
//! before submitting it, the same checks the [`Game`](crate::game::Game)
//! state machine enforces.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::{GameError, GameResult};

/// A move can never hold more steps than the 6-card opening hand allows.
pub const MAX_STEPS: usize = 6;

/// One attack card and, once the defender answers it, its covering card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Step {
    attack: Card,
    defend: Option<Card>,
}

impl Step {
    pub(crate) fn new(attack: Card) -> Self {
        Step {
            attack,
            defend: None,
        }
    }

    /// The attack card this step was opened with.
    pub fn attack(&self) -> Card {
        self.attack
    }

    /// The defending card, if one has been played.
    pub fn defend(&self) -> Option<Card> {
        self.defend
    }

    /// A step is covered once a defend card is recorded against it.
    pub fn is_covered(&self) -> bool {
        self.defend.is_some()
    }

    fn cover(&mut self, card: Card) {
        debug_assert!(self.defend.is_none());
        self.defend = Some(card);
    }
}

/// The ordered steps of one turn, tagged with the turn index they belong
/// to. A move is only mutated while its turn is the game's current one;
/// afterwards it is kept as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    turn: u32,
    steps: Vec<Step>,
}

impl Move {
    pub(crate) fn new(turn: u32, opening: Card) -> Self {
        Move {
            turn,
            steps: vec![Step::new(opening)],
        }
    }

    /// The turn index this move was played on.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The steps in play order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps still lacking a defend card.
    pub fn open_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_covered()).count()
    }

    /// True once every step is covered.
    pub fn all_covered(&self) -> bool {
        self.open_steps() == 0
    }

    /// Every card recorded in this move, in step order, attack before
    /// defend within each step. Used for the "take" transfer and for
    /// state broadcasts.
    pub fn cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.steps.len() * 2);
        for step in &self.steps {
            cards.push(step.attack);
            if let Some(defend) = step.defend {
                cards.push(defend);
            }
        }
        cards
    }

    pub(crate) fn push_attack(&mut self, card: Card) {
        self.steps.push(Step::new(card));
    }

    pub(crate) fn has_open_attack(&self, attack: Card) -> bool {
        self.steps
            .iter()
            .any(|s| !s.is_covered() && s.attack == attack)
    }

    /// Records `defend` against the first open step opened with `attack`.
    pub(crate) fn cover(&mut self, attack: Card, defend: Card) -> GameResult<()> {
        match self
            .steps
            .iter_mut()
            .find(|s| !s.is_covered() && s.attack == attack)
        {
            Some(step) => {
                step.cover(defend);
                Ok(())
            }
            None => Err(GameError::CardNotFound(attack)),
        }
    }
}

/// Pile-on legality: a card may be thrown only if its rank already appears
/// on the table, among attack or defend cards alike. Suit is irrelevant.
pub fn rank_matches(card: Card, steps: &[Step]) -> bool {
    steps.iter().any(|step| {
        step.attack.rank == card.rank || step.defend.map_or(false, |d| d.rank == card.rank)
    })
}

/// Defend legality: same suit beats on strictly higher rank only; across
/// suits only a trump beats a non-trump. Trump against trump falls under
/// the same-suit rule.
pub fn beats(defend: Card, attack: Card, trump: Card) -> bool {
    if defend.suit == attack.suit {
        return defend.rank > attack.rank;
    }
    defend.suit == trump.suit && attack.suit != trump.suit
}
