//! Full games driven through the public API, plus concurrent access to
//! the registry from two client threads.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use durak_engine::moves::beats;
use durak_engine::prelude::*;

// every card currently in play, counted from the engine's accessors plus
// the running tally of dropped cards
fn cards_in_play(game: &Game, discarded: usize) -> usize {
    let hands: usize = game.players().iter().map(|p| p.hand().len()).sum();
    let table = game.current_move().map(|m| m.cards().len()).unwrap_or(0);
    let trump = if game.trump_taken() { 0 } else { 1 };
    game.deck_len() + hands + table + trump + discarded
}

// plays one full game with a simple strategy: the attacker opens their
// first card, the defender covers when any held card beats the attack and
// takes otherwise, the attacker drops once everything is covered
fn play_out(seed: u64) {
    let mut game = Game::with_rng("Misha", "tok-a", StdRng::seed_from_u64(seed)).unwrap();
    game.join("Olya", "tok-b").unwrap();
    let mut discarded = 0;

    for _ in 0..500 {
        if game.is_finished() {
            break;
        }
        assert_eq!(cards_in_play(&game, discarded), 36);

        let attacker = game.attacker().token().to_string();
        let defender = game.defender().unwrap().token().to_string();

        match game.current_move() {
            None => {
                let hand = game.attacker().hand().to_vec();
                let Some(&card) = hand.first() else {
                    // deck ran out mid-refill with the trump already gone
                    break;
                };
                game.open_move(card, &attacker).unwrap();
            }
            Some(mv) => {
                let open: Vec<Card> = mv
                    .steps()
                    .iter()
                    .filter(|s| !s.is_covered())
                    .map(|s| s.attack())
                    .collect();
                if open.is_empty() {
                    let table = mv.cards().len();
                    let turn_before = game.turn();
                    game.drop_cards(&attacker).unwrap();
                    discarded += table;
                    assert_eq!(game.turn(), turn_before + 1);
                    assert_eq!(game.attacker().token(), defender);
                } else {
                    let trump = game.trump().unwrap();
                    let hand = game.defender().unwrap().hand().to_vec();
                    let answer = open
                        .iter()
                        .filter_map(|&attack| {
                            hand.iter()
                                .find(|&&card| beats(card, attack, trump))
                                .map(|&card| (attack, card))
                        })
                        .next();
                    match answer {
                        Some((attack, card)) => game.defend(attack, card, &defender).unwrap(),
                        None => {
                            game.take_cards(&defender).unwrap();
                            assert_eq!(game.attacker().token(), defender);
                        }
                    }
                }
            }
        }

        // once a move resolves, nobody is left short while cards remain
        if game.current_move().is_none() && game.deck_len() > 0 {
            for player in game.players() {
                assert!(player.hand().len() >= 6);
            }
        }
    }

    if game.is_finished() {
        let winner = game.winner().expect("finished games have a winner");
        assert!(winner.hand().is_empty());
        assert_eq!(game.deck_len(), 0);
        assert_eq!(cards_in_play(&game, discarded), 36);
    }
}

#[test]
fn seeded_games_play_out_cleanly() {
    for seed in 0..25 {
        play_out(seed);
    }
}

#[test]
fn winning_removes_the_game_from_the_registry() {
    let registry = GameRegistry::new();
    let id = registry.create_game("Misha", "tok-a").unwrap();
    registry.join_game(id, "Olya", "tok-b").unwrap();
    // not finished, still listed
    assert_eq!(registry.list_games().len(), 1);
    registry.leave_game(id, "tok-a").unwrap();
    assert!(registry.list_games().is_empty());
}

#[test]
fn operations_on_one_game_serialize_across_threads() {
    let registry = Arc::new(GameRegistry::new());
    let id = registry.create_game("Misha", "tok-a").unwrap();
    registry.join_game(id, "Olya", "tok-b").unwrap();

    let handles: Vec<_> = ["tok-a", "tok-b"]
        .into_iter()
        .map(|token| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..300 {
                    let view = match registry.view(id, token) {
                        Ok(view) => view,
                        Err(GameError::GameNotFound) => return,
                        Err(e) => panic!("unexpected error: {e}"),
                    };
                    if view.finished {
                        return;
                    }
                    if view.attacker == token {
                        if view.steps.is_empty() {
                            if let Some(&card) = view.hand.first() {
                                let _ = registry.open_move(id, card, token);
                            }
                        }
                    } else if !view.steps.is_empty() {
                        let _ = registry.take_cards(id, token);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // no drops happened, so every card is still in a hand, the deck, the
    // table or the trump slot; a torn read-modify-write would break this
    if let Ok(view) = registry.view(id, "tok-a") {
        let table: usize = view
            .steps
            .iter()
            .map(|s| 1 + s.defend.map_or(0, |_| 1))
            .sum();
        let trump = if view.trump.is_some() { 1 } else { 0 };
        let total =
            view.deck_len + view.hand.len() + view.opponent.unwrap().hand_len + table + trump;
        assert_eq!(total, 36);
    }
}

#[test]
fn distinct_games_do_not_block_each_other() {
    let registry = Arc::new(GameRegistry::new());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let creator = format!("creator-{n}");
                let tok_a = format!("a-{n}");
                let tok_b = format!("b-{n}");
                for _ in 0..50 {
                    let id = registry.create_game(&creator, &tok_a).unwrap();
                    registry.join_game(id, "guest", &tok_b).unwrap();
                    let view = registry.view(id, &tok_b).unwrap();
                    assert_eq!(view.hand.len(), 6);
                    registry.leave_game(id, &tok_b).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(registry.is_empty());
}
