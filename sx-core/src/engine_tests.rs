use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::bots::{Bot, BotError, RandBot};
use crate::card::{Card, Rank, Suit};
use crate::deal::DeckGenerator;
use crate::engine::{GameError, GamePlayEngine, Lineup, MoveRequester, SimpleMoveRequester};
use crate::moves::Move;
use crate::perspective::PlayerPerspective;
use crate::state::{BotState, GameState, PlayerId, Talon};

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn play_mirror(game_seed: u64, bot_seed: u64) -> crate::engine::GameOutcome {
    let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
    let mut bot = RandBot::new(bot_seed);
    let mut rng = ChaCha8Rng::seed_from_u64(game_seed);
    engine
        .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
        .unwrap()
}

/// Always plays the first valid move.
struct FirstMoveBot;

impl Bot for FirstMoveBot {
    fn get_move(
        &mut self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        Ok(perspective.valid_moves()[0])
    }
}

#[test]
fn same_seeds_reproduce_identical_games() {
    for game_seed in 0..20u64 {
        let a = play_mirror(game_seed, 1000 + game_seed);
        let b = play_mirror(game_seed, 1000 + game_seed);
        assert_eq!(a, b, "game {game_seed} diverged");
    }
}

#[test]
fn different_deal_seeds_change_the_game() {
    let a = play_mirror(1, 7);
    let b = play_mirror(2, 7);
    assert_ne!(a.history, b.history);
}

#[test]
fn random_games_terminate_with_sane_outcomes() {
    for game_seed in 0..200u64 {
        let out = play_mirror(game_seed, game_seed.wrapping_mul(31));
        assert!(out.tricks_played >= 1 && out.tricks_played <= 10);
        assert!((1..=3).contains(&out.game_points));
        let regular_or_marriage = out
            .history
            .iter()
            .filter(|(_, m)| !m.is_trump_exchange())
            .count();
        assert_eq!(regular_or_marriage as u32, 2 * out.tricks_played);
    }
}

#[test]
fn illegal_move_aborts_the_game() {
    struct Cheater;
    impl Bot for Cheater {
        fn get_move(
            &mut self,
            perspective: &PlayerPerspective<'_>,
            _leader_move: Option<&Move>,
        ) -> Result<Move, BotError> {
            // Any card not in hand.
            let held = perspective.hand();
            let card = Card::deck()
                .into_iter()
                .find(|c| !held.contains(c))
                .unwrap();
            Ok(Move::regular(card))
        }
    }
    let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
    let mut bot = Cheater;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let err = engine
        .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::IllegalMove {
            player: PlayerId::One,
            ..
        }
    ));
}

#[test]
fn bot_failure_is_reported_with_its_seat() {
    struct Broken;
    impl Bot for Broken {
        fn get_move(
            &mut self,
            _perspective: &PlayerPerspective<'_>,
            _leader_move: Option<&Move>,
        ) -> Result<Move, BotError> {
            Err(BotError::not_implemented("todo"))
        }
    }
    let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
    let mut rand = RandBot::new(1);
    let mut broken = Broken;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let err = engine
        .play_game(&mut Lineup::Pair(&mut rand, &mut broken), &mut rng)
        .unwrap_err();
    match err {
        GameError::Bot { player, source } => {
            assert_eq!(player, PlayerId::Two);
            assert_eq!(source, BotError::NotImplemented("todo".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn trump_exchange_is_followed_by_a_second_leader_request() {
    struct ExchangeThenFirst;
    impl Bot for ExchangeThenFirst {
        fn get_move(
            &mut self,
            perspective: &PlayerPerspective<'_>,
            _leader_move: Option<&Move>,
        ) -> Result<Move, BotError> {
            let moves = perspective.valid_moves();
            Ok(moves
                .iter()
                .copied()
                .find(Move::is_trump_exchange)
                .unwrap_or(moves[0]))
        }
    }

    let trump_jack = c(Rank::Jack, Suit::Hearts);
    let trump_card = c(Rank::Ace, Suit::Hearts);
    let state = GameState {
        leader: BotState::new(
            PlayerId::One,
            vec![
                trump_jack,
                c(Rank::Ten, Suit::Clubs),
                c(Rank::King, Suit::Clubs),
                c(Rank::Queen, Suit::Spades),
                c(Rank::Jack, Suit::Spades),
            ],
        ),
        follower: BotState::new(
            PlayerId::Two,
            vec![
                c(Rank::Ace, Suit::Clubs),
                c(Rank::Queen, Suit::Clubs),
                c(Rank::Jack, Suit::Clubs),
                c(Rank::Ace, Suit::Spades),
                c(Rank::Ten, Suit::Spades),
            ],
        ),
        talon: Talon::new(vec![
            c(Rank::King, Suit::Spades),
            c(Rank::Ace, Suit::Diamonds),
            c(Rank::Ten, Suit::Diamonds),
            c(Rank::King, Suit::Diamonds),
            c(Rank::Queen, Suit::Diamonds),
            c(Rank::Jack, Suit::Diamonds),
            c(Rank::Ten, Suit::Hearts),
            c(Rank::King, Suit::Hearts),
            c(Rank::Queen, Suit::Hearts),
            trump_card,
        ])
        .unwrap(),
        tricks_played: 0,
    };

    let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
    let mut bot = ExchangeThenFirst;
    let out = engine
        .play_game_from_state(state, &mut Lineup::Mirror(&mut bot))
        .unwrap();
    assert_eq!(out.history[0], (PlayerId::One, Move::trump_exchange(trump_jack)));
    assert_eq!(out.history[1].0, PlayerId::One);
    assert!(out.history[1].1.is_regular_move());
    assert_eq!(out.history[2].0, PlayerId::Two);
}

#[test]
fn requester_sees_every_decision_point() {
    #[derive(Default)]
    struct Counting {
        calls: usize,
        leader_calls: usize,
    }
    impl MoveRequester for Counting {
        fn get_move(
            &mut self,
            bot: &mut dyn Bot,
            perspective: &PlayerPerspective<'_>,
            leader_move: Option<&Move>,
        ) -> Result<Move, GameError> {
            self.calls += 1;
            if leader_move.is_none() {
                self.leader_calls += 1;
                assert!(perspective.am_i_leader());
            }
            SimpleMoveRequester.get_move(bot, perspective, leader_move)
        }
    }

    let mut engine = GamePlayEngine::schnapsen(Counting::default());
    let mut bot = FirstMoveBot;
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let out = engine
        .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
        .unwrap();
    let counting = engine.into_requester();
    assert_eq!(counting.calls, out.history.len());
    assert!(counting.leader_calls >= out.tricks_played as usize);
}

#[test]
fn perspective_hides_unrevealed_opponent_cards_in_phase_one() {
    struct Inspect;
    impl Bot for Inspect {
        fn get_move(
            &mut self,
            perspective: &PlayerPerspective<'_>,
            _leader_move: Option<&Move>,
        ) -> Result<Move, BotError> {
            if perspective.talon_size() > 0 {
                for card in perspective.known_cards_of_opponent_hand() {
                    // Only marriage kings and exchanged trump cards can be known early.
                    assert!(card.rank == Rank::King || card.suit == perspective.trump_suit());
                }
            }
            // Marriages and exchanges are listed last; prefer them so cards get revealed.
            Ok(*perspective.valid_moves().last().unwrap())
        }
    }
    for seed in 0..50u64 {
        let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
        let mut bot = Inspect;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        engine
            .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
            .unwrap();
    }
}

/// Hands out only the first `len` cards of the canonical deck.
struct ShortDeck {
    len: usize,
}

impl DeckGenerator for ShortDeck {
    fn initial_deck(&self) -> Vec<Card> {
        Card::deck().into_iter().take(self.len).collect()
    }

    fn shuffle(&self, deck: Vec<Card>, _rng: &mut ChaCha8Rng) -> Vec<Card> {
        deck
    }
}

#[test]
fn short_deck_is_an_invalid_state_not_a_panic() {
    for len in [0, 7, 10] {
        let mut engine = GamePlayEngine::schnapsen(SimpleMoveRequester);
        engine.deck_generator = Box::new(ShortDeck { len });
        let mut bot = RandBot::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine
            .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidState { .. }), "len {len}: {err}");
    }
}

#[test]
fn talon_requires_a_trump_card() {
    assert!(Talon::new(Vec::new()).is_none());
    let trump = c(Rank::Jack, Suit::Hearts);
    let talon = Talon::new(vec![c(Rank::Ace, Suit::Clubs), trump]).unwrap();
    assert_eq!(talon.trump_suit(), Suit::Hearts);
    assert_eq!(talon.trump_card(), Some(trump));
}

/// Checks score bookkeeping from the deciding seat's side at every decision.
struct ScoreAudit {
    checked: usize,
}

impl MoveRequester for ScoreAudit {
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        let points = |cards: &[Card]| cards.iter().map(|c| c.points()).sum::<u32>();
        let mine = perspective.my_score();
        assert!(mine.direct_points >= points(perspective.won_cards()));
        if !perspective.won_cards().is_empty() {
            assert_eq!(mine.pending_points, 0);
        }
        let theirs = perspective.opponent_score();
        assert!(theirs.direct_points >= points(perspective.opponent_won_cards()));
        if perspective.tricks_played() == 0 && leader_move.is_none() {
            assert_eq!(mine, Default::default());
            assert_eq!(theirs, Default::default());
        }
        self.checked += 1;
        SimpleMoveRequester.get_move(bot, perspective, leader_move)
    }
}

#[test]
fn perspective_scores_track_won_cards() {
    for seed in 0..20u64 {
        let mut engine = GamePlayEngine::schnapsen(ScoreAudit { checked: 0 });
        let mut bot = RandBot::new(500 + seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outcome = engine
            .play_game(&mut Lineup::Mirror(&mut bot), &mut rng)
            .unwrap();
        assert_eq!(engine.into_requester().checked, outcome.history.len());
    }
}
