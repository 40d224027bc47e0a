use crate::card::{Card, Rank, Suit};
use crate::legal::{MoveValidator, SchnapsenMoveValidator};
use crate::moves::Move;
use crate::state::{BotState, GameState, PlayerId, Talon};

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn state(leader: Vec<Card>, follower: Vec<Card>, talon: Talon) -> GameState {
    GameState {
        leader: BotState::new(PlayerId::One, leader),
        follower: BotState::new(PlayerId::Two, follower),
        talon,
        tricks_played: 0,
    }
}

fn regulars(cards: &[Card]) -> Vec<Move> {
    cards.iter().map(|&c| Move::regular(c)).collect()
}

#[test]
fn leader_moves_list_regulars_then_marriages_then_exchange() {
    let hand = vec![
        c(Rank::King, Suit::Hearts),
        c(Rank::Jack, Suit::Spades),
        c(Rank::Queen, Suit::Hearts),
        c(Rank::Queen, Suit::Clubs),
        c(Rank::Ace, Suit::Diamonds),
    ];
    let s = state(
        hand.clone(),
        vec![],
        Talon::new(vec![c(Rank::Ten, Suit::Clubs), c(Rank::Ace, Suit::Spades)]).unwrap(),
    );
    let moves = SchnapsenMoveValidator.legal_leader_moves(&s);
    let mut expected = regulars(&hand);
    expected.push(Move::marriage(
        c(Rank::Queen, Suit::Hearts),
        c(Rank::King, Suit::Hearts),
    ));
    expected.push(Move::trump_exchange(c(Rank::Jack, Suit::Spades)));
    assert_eq!(moves, expected);
}

#[test]
fn no_trump_exchange_in_phase_two() {
    let hand = vec![c(Rank::Jack, Suit::Spades), c(Rank::Ace, Suit::Hearts)];
    let s = state(hand.clone(), vec![], Talon::exhausted(Suit::Spades));
    assert_eq!(SchnapsenMoveValidator.legal_leader_moves(&s), regulars(&hand));
}

#[test]
fn follower_is_free_in_phase_one() {
    let follower = vec![c(Rank::Jack, Suit::Hearts), c(Rank::Ace, Suit::Clubs)];
    let s = state(
        vec![],
        follower.clone(),
        Talon::new(vec![c(Rank::Ten, Suit::Clubs), c(Rank::Ace, Suit::Spades)]).unwrap(),
    );
    let led = Move::regular(c(Rank::Ten, Suit::Hearts));
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&follower)
    );
}

#[test]
fn phase_two_follower_must_beat_in_suit_when_possible() {
    let follower = vec![
        c(Rank::Jack, Suit::Hearts),
        c(Rank::Ace, Suit::Hearts),
        c(Rank::Ace, Suit::Spades),
    ];
    let s = state(vec![], follower, Talon::exhausted(Suit::Spades));
    let led = Move::regular(c(Rank::King, Suit::Hearts));
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&[c(Rank::Ace, Suit::Hearts)])
    );
}

#[test]
fn phase_two_follower_follows_suit_when_unable_to_beat() {
    let follower = vec![
        c(Rank::Jack, Suit::Hearts),
        c(Rank::Queen, Suit::Hearts),
        c(Rank::Ace, Suit::Spades),
    ];
    let s = state(vec![], follower, Talon::exhausted(Suit::Spades));
    let led = Move::regular(c(Rank::Ace, Suit::Hearts));
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&[c(Rank::Jack, Suit::Hearts), c(Rank::Queen, Suit::Hearts)])
    );
}

#[test]
fn phase_two_follower_must_trump_without_suit() {
    let follower = vec![
        c(Rank::Jack, Suit::Clubs),
        c(Rank::Queen, Suit::Spades),
        c(Rank::Ace, Suit::Diamonds),
    ];
    let s = state(vec![], follower.clone(), Talon::exhausted(Suit::Spades));
    let led = Move::regular(c(Rank::Ace, Suit::Hearts));
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&[c(Rank::Queen, Suit::Spades)])
    );

    let s = state(
        vec![],
        vec![c(Rank::Jack, Suit::Clubs), c(Rank::Ace, Suit::Diamonds)],
        Talon::exhausted(Suit::Spades),
    );
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&[c(Rank::Jack, Suit::Clubs), c(Rank::Ace, Suit::Diamonds)])
    );
}

#[test]
fn marriage_led_card_is_the_queen() {
    let follower = vec![c(Rank::Ace, Suit::Clubs), c(Rank::Jack, Suit::Clubs)];
    let s = state(vec![], follower, Talon::exhausted(Suit::Hearts));
    let led = Move::marriage(c(Rank::Queen, Suit::Clubs), c(Rank::King, Suit::Clubs));
    assert_eq!(
        SchnapsenMoveValidator.legal_follower_moves(&s, &led),
        regulars(&[c(Rank::Ace, Suit::Clubs)])
    );
}

#[test]
fn legality_queries_agree_with_the_generated_lists() {
    let leader = vec![c(Rank::Queen, Suit::Clubs), c(Rank::King, Suit::Clubs)];
    let follower = vec![c(Rank::Ten, Suit::Clubs), c(Rank::Jack, Suit::Hearts)];
    let s = state(leader, follower, Talon::exhausted(Suit::Spades));
    let v = SchnapsenMoveValidator;

    let marriage = Move::marriage(c(Rank::Queen, Suit::Clubs), c(Rank::King, Suit::Clubs));
    assert!(v.is_legal_leader_move(&s, &marriage));
    assert!(v.is_legal_leader_move(&s, &Move::regular(c(Rank::King, Suit::Clubs))));
    assert!(!v.is_legal_leader_move(&s, &Move::regular(c(Rank::Ace, Suit::Clubs))));

    // Phase two: the ten beats the queen in suit, so the jack of hearts may not be played.
    let led = Move::regular(c(Rank::Queen, Suit::Clubs));
    assert!(v.is_legal_follower_move(&s, &led, &Move::regular(c(Rank::Ten, Suit::Clubs))));
    assert!(!v.is_legal_follower_move(&s, &led, &Move::regular(c(Rank::Jack, Suit::Hearts))));
}
