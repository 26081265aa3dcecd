//! Integration tests for the Scotland Yard game engine.
//!
//! These tests verify complete rotations and games, from the first move
//! request through to game over.

use pretty_assertions::assert_eq;
use scotland_core::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Wallet map with the given amounts of every ticket
fn tickets(taxi: u32, bus: u32, underground: u32, double: u32, secret: u32) -> HashMap<Ticket, u32> {
    TicketWallet::with_amounts(taxi, bus, underground, double, secret).to_map()
}

fn taxi(colour: Colour, destination: Location) -> Move {
    Move::Ticket(TicketMove::new(colour, Ticket::Taxi, destination))
}

/// Records every event along with what the view showed for MrX at the time
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(GameEvent, Option<Location>)>>,
}

impl Recorder {
    fn record(&self, view: &dyn ScotlandYardView, event: GameEvent) {
        let mr_x = view.player_location(Colour::Black);
        self.seen.lock().unwrap().push((event, mr_x));
    }

    fn events(&self) -> Vec<GameEvent> {
        self.seen.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    fn seen(&self) -> Vec<(GameEvent, Option<Location>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Spectator for Recorder {
    fn on_move_made(&self, view: &dyn ScotlandYardView, mv: &Move) {
        self.record(view, GameEvent::MoveMade { mv: *mv });
    }

    fn on_round_started(&self, view: &dyn ScotlandYardView, round: usize) {
        self.record(view, GameEvent::RoundStarted { round });
    }

    fn on_rotation_complete(&self, view: &dyn ScotlandYardView) {
        self.record(view, GameEvent::RotationComplete);
    }

    fn on_game_over(&self, view: &dyn ScotlandYardView, winners: &BTreeSet<Colour>) {
        self.record(
            view,
            GameEvent::GameOver {
                winners: winners.clone(),
            },
        );
    }
}

fn expect_request(applied: Applied) -> MoveRequest {
    match applied.turn {
        Turn::Next(request) => request,
        other => panic!("expected another move request, got {:?}", other),
    }
}

/// Ring of twenty stops with bus shortcuts, two underground lines and a ferry
fn city() -> Graph {
    let mut graph = Graph::new();
    for i in 1..=20 {
        graph.add_edge(i, i % 20 + 1, Transport::Taxi);
    }
    for i in (1..=20).step_by(2) {
        graph.add_edge(i, (i + 3) % 20 + 1, Transport::Bus);
    }
    graph.add_edge(1, 11, Transport::Underground);
    graph.add_edge(6, 16, Transport::Underground);
    graph.add_edge(3, 13, Transport::Boat);
    graph
}

#[test]
fn test_detective_captures_mr_x() {
    // 1 - 2 - 3, MrX can only step onto 2, next to the detective
    let graph = Graph::from_edges([(1, 2, Transport::Taxi), (2, 3, Transport::Taxi)]);
    let mut game = ScotlandYard::new(
        vec![false, false, false],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(1, 0, 0, 0, 0)),
        PlayerConfiguration::new(Colour::Blue, 3, tickets(1, 0, 0, 0, 0)),
        vec![],
    )
    .unwrap();

    let request = game.start_rotation().unwrap();
    assert_eq!(request.moves, BTreeSet::from([taxi(Colour::Black, 2)]));

    let request = expect_request(game.apply_move(taxi(Colour::Black, 2)).unwrap());
    assert_eq!(request.colour, Colour::Blue);
    assert!(request.moves.contains(&taxi(Colour::Blue, 2)));

    let applied = game.apply_move(taxi(Colour::Blue, 2)).unwrap();
    let winners = BTreeSet::from([Colour::Blue]);
    assert_eq!(applied.turn, Turn::GameOver(winners.clone()));
    assert_eq!(
        applied.events.last(),
        Some(&GameEvent::GameOver {
            winners: winners.clone()
        })
    );
    assert!(game.is_game_over());
    assert!(game.outcome().captured);
    assert_eq!(game.winning_players(), winners);
}

#[test]
fn test_capture_ends_rotation_early() {
    // Blue captures; Red never gets asked
    let graph = Graph::from_edges([
        (1, 2, Transport::Taxi),
        (2, 3, Transport::Taxi),
        (4, 5, Transport::Taxi),
    ]);
    let mut game = ScotlandYard::new(
        vec![false, false, false],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(1, 0, 0, 0, 0)),
        PlayerConfiguration::new(Colour::Blue, 3, tickets(1, 0, 0, 0, 0)),
        vec![PlayerConfiguration::new(Colour::Red, 4, tickets(1, 0, 0, 0, 0))],
    )
    .unwrap();

    game.start_rotation().unwrap();
    game.apply_move(taxi(Colour::Black, 2)).unwrap();
    let applied = game.apply_move(taxi(Colour::Blue, 2)).unwrap();

    assert_eq!(
        applied.turn,
        Turn::GameOver(BTreeSet::from([Colour::Blue, Colour::Red]))
    );
    assert_eq!(game.player_state(Colour::Red).unwrap().location, 4);
}

#[test]
fn test_mr_x_survives_every_round() {
    let graph = Graph::from_edges((1..=6).map(|i| (i, i % 6 + 1, Transport::Taxi)));
    let mut game = ScotlandYard::new(
        vec![true, false],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(4, 0, 0, 0, 0)),
        PlayerConfiguration::new(Colour::Blue, 4, tickets(4, 0, 0, 0, 0)),
        vec![],
    )
    .unwrap();

    // Rotation 1: MrX reveals on 2
    game.start_rotation().unwrap();
    game.apply_move(taxi(Colour::Black, 2)).unwrap();
    assert_eq!(game.current_round(), 1);
    assert!(game.is_reveal_round());
    assert_eq!(game.player_location(Colour::Black), Some(2));
    let applied = game.apply_move(taxi(Colour::Blue, 5)).unwrap();
    assert_eq!(applied.turn, Turn::RotationComplete);
    assert_eq!(game.current_round(), 1);

    // Rotation 2: MrX hides on 3
    game.start_rotation().unwrap();
    game.apply_move(taxi(Colour::Black, 3)).unwrap();
    assert_eq!(game.current_round(), 2);
    assert_eq!(game.current_round(), game.rounds().len());
    assert!(!game.is_reveal_round());
    assert_eq!(game.player_location(Colour::Black), Some(2));
    assert_eq!(game.player_state(Colour::Black).unwrap().location, 3);
    assert!(game.is_game_over());
    assert_eq!(game.winning_players(), BTreeSet::from([Colour::Black]));

    // Detectives still get their last move
    let applied = game.apply_move(taxi(Colour::Blue, 4)).unwrap();
    assert_eq!(applied.turn, Turn::GameOver(BTreeSet::from([Colour::Black])));
    assert_eq!(game.start_rotation(), Err(GameError::GameOver));
}

#[test]
fn test_stranded_detective_passes() {
    let graph = Graph::from_edges([
        (1, 2, Transport::Taxi),
        (2, 5, Transport::Taxi),
        (3, 4, Transport::Bus),
        (4, 6, Transport::Bus),
    ]);
    let recorder = Arc::new(Recorder::default());
    let mut game = ScotlandYard::new(
        vec![false, false, false],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(3, 0, 0, 0, 0)),
        // Only taxi tickets, but only bus routes leave stop 3
        PlayerConfiguration::new(Colour::Blue, 3, tickets(5, 0, 0, 0, 0)),
        vec![PlayerConfiguration::new(Colour::Green, 6, tickets(0, 5, 0, 0, 0))],
    )
    .unwrap();
    game.register_spectator(recorder.clone()).unwrap();

    game.start_rotation().unwrap();
    let request = expect_request(game.apply_move(taxi(Colour::Black, 2)).unwrap());
    let pass = Move::Pass {
        colour: Colour::Blue,
    };
    assert_eq!(request.moves, BTreeSet::from([pass]));

    let before = game.player_state(Colour::Blue).unwrap().clone();
    let applied = game.apply_move(pass).unwrap();
    let request = expect_request(applied.clone());

    assert_eq!(applied.events, vec![GameEvent::MoveMade { mv: pass }]);
    assert_eq!(game.player_state(Colour::Blue).unwrap(), &before);
    assert_eq!(request.colour, Colour::Green);
    assert_eq!(game.current_player(), Colour::Green);
    assert_eq!(
        recorder.events().last(),
        Some(&GameEvent::MoveMade { mv: pass })
    );
}

#[test]
fn test_spectator_registration_errors() {
    let game = ScotlandYard::new(
        vec![false],
        Arc::new(city()),
        PlayerConfiguration::mr_x_default(1),
        PlayerConfiguration::detective_default(Colour::Blue, 10),
        vec![],
    )
    .unwrap();

    let recorder: Arc<dyn Spectator> = Arc::new(Recorder::default());
    let stranger: Arc<dyn Spectator> = Arc::new(Recorder::default());

    game.register_spectator(Arc::clone(&recorder)).unwrap();
    assert_eq!(
        game.register_spectator(Arc::clone(&recorder)),
        Err(GameError::DuplicateSpectator)
    );
    assert_eq!(
        game.unregister_spectator(&stranger),
        Err(GameError::UnknownSpectator)
    );
    assert_eq!(game.spectators().len(), 1);

    game.unregister_spectator(&recorder).unwrap();
    assert!(game.spectators().is_empty());
}

#[test]
fn test_double_move_across_reveal_boundary() {
    let graph = Graph::from_edges([
        (1, 2, Transport::Taxi),
        (2, 3, Transport::Taxi),
        (3, 4, Transport::Taxi),
        (9, 10, Transport::Taxi),
    ]);
    let recorder = Arc::new(Recorder::default());
    let mut game = ScotlandYard::new(
        vec![true, false, true],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(2, 0, 0, 1, 0)),
        PlayerConfiguration::new(Colour::Blue, 10, tickets(3, 0, 0, 0, 0)),
        vec![],
    )
    .unwrap();
    game.register_spectator(recorder.clone()).unwrap();

    let request = game.start_rotation().unwrap();
    let double = Move::Double(DoubleMove::new(
        Colour::Black,
        TicketMove::new(Colour::Black, Ticket::Taxi, 2),
        TicketMove::new(Colour::Black, Ticket::Taxi, 3),
    ));
    assert!(request.moves.contains(&double));

    let applied = game.apply_move(double).unwrap();

    let shown_leg = TicketMove::new(Colour::Black, Ticket::Taxi, 2);
    let expected = vec![
        (
            GameEvent::MoveMade {
                mv: Move::Double(DoubleMove::new(Colour::Black, shown_leg, shown_leg)),
            },
            Some(0),
        ),
        (GameEvent::RoundStarted { round: 1 }, Some(2)),
        (
            GameEvent::MoveMade {
                mv: Move::Ticket(shown_leg),
            },
            Some(2),
        ),
        (GameEvent::RoundStarted { round: 2 }, Some(2)),
        (
            GameEvent::MoveMade {
                mv: Move::Ticket(shown_leg),
            },
            Some(2),
        ),
    ];
    assert_eq!(recorder.seen(), expected);
    assert_eq!(
        applied.events,
        expected.into_iter().map(|(e, _)| e).collect::<Vec<_>>()
    );

    assert_eq!(game.current_round(), 2);
    assert_eq!(game.player_location(Colour::Black), Some(2));
    assert_eq!(game.player_state(Colour::Black).unwrap().location, 3);
    assert_eq!(game.player_tickets(Colour::Black, Ticket::Taxi), Some(0));
    assert_eq!(game.player_tickets(Colour::Black, Ticket::Double), Some(0));
}

#[test]
fn test_double_revealing_second_leg() {
    let graph = Graph::from_edges([
        (1, 2, Transport::Taxi),
        (2, 3, Transport::Bus),
        (9, 10, Transport::Taxi),
    ]);
    let mut game = ScotlandYard::new(
        vec![false, true, false],
        Arc::new(graph),
        PlayerConfiguration::new(Colour::Black, 1, tickets(1, 1, 0, 1, 0)),
        PlayerConfiguration::new(Colour::Blue, 10, tickets(3, 0, 0, 0, 0)),
        vec![],
    )
    .unwrap();

    game.start_rotation().unwrap();
    let applied = game
        .apply_move(Move::Double(DoubleMove::new(
            Colour::Black,
            TicketMove::new(Colour::Black, Ticket::Taxi, 2),
            TicketMove::new(Colour::Black, Ticket::Bus, 3),
        )))
        .unwrap();

    assert_eq!(
        applied.events[0],
        GameEvent::MoveMade {
            mv: Move::Double(DoubleMove::new(
                Colour::Black,
                TicketMove::new(Colour::Black, Ticket::Taxi, 0),
                TicketMove::new(Colour::Black, Ticket::Bus, 3),
            ))
        }
    );
    assert_eq!(
        applied.events[2],
        GameEvent::MoveMade {
            mv: Move::Ticket(TicketMove::new(Colour::Black, Ticket::Taxi, 0))
        }
    );
    assert_eq!(
        applied.events[4],
        GameEvent::MoveMade {
            mv: Move::Ticket(TicketMove::new(Colour::Black, Ticket::Bus, 3))
        }
    );
    assert_eq!(game.player_location(Colour::Black), Some(3));
}

#[test]
fn test_detective_tickets_go_to_mr_x() {
    let mut game = ScotlandYard::new(
        vec![false; 5],
        Arc::new(city()),
        PlayerConfiguration::mr_x_default(1),
        PlayerConfiguration::detective_default(Colour::Blue, 10),
        vec![],
    )
    .unwrap();

    game.start_rotation().unwrap();
    let round_before = game.current_round();
    expect_request(game.apply_move(taxi(Colour::Black, 2)).unwrap());
    assert_eq!(game.current_round(), round_before + 1);

    let total = |game: &ScotlandYard| {
        game.player_tickets(Colour::Black, Ticket::Taxi).unwrap()
            + game.player_tickets(Colour::Blue, Ticket::Taxi).unwrap()
    };
    let mr_x_before = game.player_tickets(Colour::Black, Ticket::Taxi).unwrap();
    let blue_before = game.player_tickets(Colour::Blue, Ticket::Taxi).unwrap();
    let total_before = total(&game);

    let applied = game.apply_move(taxi(Colour::Blue, 11)).unwrap();

    assert_eq!(applied.turn, Turn::RotationComplete);
    assert_eq!(
        game.player_tickets(Colour::Black, Ticket::Taxi),
        Some(mr_x_before + 1)
    );
    assert_eq!(
        game.player_tickets(Colour::Blue, Ticket::Taxi),
        Some(blue_before - 1)
    );
    assert_eq!(total(&game), total_before);
    assert_eq!(game.current_round(), round_before + 1);
    assert_eq!(game.player_location(Colour::Blue), Some(11));
    assert_eq!(
        applied.events,
        vec![
            GameEvent::MoveMade {
                mv: taxi(Colour::Blue, 11)
            },
            GameEvent::RotationComplete,
        ]
    );
}

#[test]
fn test_legal_moves_are_rederived_after_each_move() {
    let mut game = ScotlandYard::new(
        vec![false; 5],
        Arc::new(city()),
        PlayerConfiguration::mr_x_default(1),
        PlayerConfiguration::detective_default(Colour::Blue, 10),
        vec![PlayerConfiguration::detective_default(Colour::Green, 12)],
    )
    .unwrap();

    game.start_rotation().unwrap();
    game.apply_move(taxi(Colour::Black, 2)).unwrap();
    assert!(game.legal_moves(Colour::Green).contains(&taxi(Colour::Green, 11)));

    // Blue moves onto 11, leaving Green only the other way round the ring
    let request = expect_request(game.apply_move(taxi(Colour::Blue, 11)).unwrap());
    assert_eq!(request.moves, BTreeSet::from([taxi(Colour::Green, 13)]));
    assert_eq!(request.moves, game.legal_moves(Colour::Green));
}

/// Unregisters itself and registers a newcomer on the first event it sees
struct Handoff {
    bus: Arc<SpectatorBus>,
    me: Mutex<Option<Arc<dyn Spectator>>>,
    newcomer: Arc<Recorder>,
    calls: Mutex<usize>,
}

impl Spectator for Handoff {
    fn on_round_started(&self, _view: &dyn ScotlandYardView, _round: usize) {
        *self.calls.lock().unwrap() += 1;
        if let Some(me) = self.me.lock().unwrap().take() {
            self.bus.unregister(&me).unwrap();
            self.bus.register(self.newcomer.clone()).unwrap();
        }
    }

    fn on_move_made(&self, _view: &dyn ScotlandYardView, _mv: &Move) {
        *self.calls.lock().unwrap() += 1;
    }
}

#[test]
fn test_spectators_change_during_delivery() {
    let mut game = ScotlandYard::new(
        vec![false; 5],
        Arc::new(city()),
        PlayerConfiguration::mr_x_default(1),
        PlayerConfiguration::detective_default(Colour::Blue, 10),
        vec![],
    )
    .unwrap();

    let newcomer = Arc::new(Recorder::default());
    let handoff = Arc::new(Handoff {
        bus: game.spectator_bus(),
        me: Mutex::new(None),
        newcomer: newcomer.clone(),
        calls: Mutex::new(0),
    });
    let as_spectator: Arc<dyn Spectator> = handoff.clone();
    *handoff.me.lock().unwrap() = Some(Arc::clone(&as_spectator));
    game.register_spectator(as_spectator).unwrap();

    game.start_rotation().unwrap();
    game.apply_move(taxi(Colour::Black, 2)).unwrap();

    // The whole burst reached the old registration and none of it the new one
    assert_eq!(*handoff.calls.lock().unwrap(), 2);
    assert!(newcomer.events().is_empty());
    assert_eq!(game.spectators().len(), 1);

    game.apply_move(taxi(Colour::Blue, 11)).unwrap();
    assert_eq!(*handoff.calls.lock().unwrap(), 2);
    assert_eq!(
        newcomer.events(),
        vec![
            GameEvent::MoveMade {
                mv: taxi(Colour::Blue, 11)
            },
            GameEvent::RotationComplete,
        ]
    );
}

fn bot_session(seed: u64, recorder: Arc<Recorder>) -> Session {
    let game = ScotlandYard::new(
        rounds::standard(),
        Arc::new(city()),
        PlayerConfiguration::mr_x_default(1),
        PlayerConfiguration::detective_default(Colour::Blue, 6),
        vec![
            PlayerConfiguration::detective_default(Colour::Green, 11),
            PlayerConfiguration::detective_default(Colour::Red, 16),
        ],
    )
    .unwrap();
    game.register_spectator(recorder).unwrap();

    let players: Vec<(Colour, Box<dyn Player>)> = [
        Colour::Black,
        Colour::Blue,
        Colour::Green,
        Colour::Red,
    ]
    .into_iter()
    .enumerate()
    .map(|(i, colour)| {
        let bot: Box<dyn Player> = Box::new(Bot::with_seed(seed * 10 + i as u64));
        (colour, bot)
    })
    .collect();

    Session::new(game, players).unwrap()
}

#[test]
fn test_bot_games_finish_consistently() {
    for seed in 0..20 {
        let recorder = Arc::new(Recorder::default());
        let mut session = bot_session(seed, recorder.clone());

        let winners = session
            .play_until_over(rounds::STANDARD_LENGTH + 1)
            .unwrap()
            .expect("a standard game ends within its schedule");

        let game = session.game();
        let game = game.read().unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.winning_players(), winners);
        assert!(game.current_round() <= rounds::STANDARD_LENGTH);
        assert_eq!(
            recorder.events().last(),
            Some(&GameEvent::GameOver { winners })
        );
    }
}

#[test]
fn test_mr_x_hidden_between_reveals() {
    let schedule = rounds::standard();
    for seed in 100..110 {
        let recorder = Arc::new(Recorder::default());
        let mut session = bot_session(seed, recorder.clone());
        session.play_until_over(rounds::STANDARD_LENGTH + 1).unwrap();

        let mut round = 0;
        let mut shown = 0;
        for event in recorder.events() {
            match event {
                GameEvent::RoundStarted { round: r } => round = r,
                GameEvent::MoveMade {
                    mv: Move::Ticket(m),
                } if m.colour.is_mr_x() => {
                    if !schedule[round - 1] {
                        assert_eq!(m.destination, shown, "MrX leaked in round {round}");
                    }
                    shown = m.destination;
                }
                _ => {}
            }
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    bot_session(3, first.clone()).play_until_over(30).unwrap();
    bot_session(3, second.clone()).play_until_over(30).unwrap();
    assert_eq!(first.events(), second.events());
}
