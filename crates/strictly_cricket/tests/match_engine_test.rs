//! Scenario tests for the match engine.

use strictly_cricket::{
    Action, ActionKind, Dart, MatchEngine, MatchSetup, Multiplier, Outcome, ParticipantId, Phase,
    Player, Rejection, RuleSet, ScoringMode, Target, TurnChange, Variant,
};

fn id(s: &str) -> ParticipantId {
    ParticipantId::new(s)
}

fn score(target: Target, multiplier: Multiplier) -> Action {
    Action::Score { target, multiplier }
}

fn singles(rules: RuleSet) -> MatchEngine {
    MatchEngine::new(MatchSetup {
        variant: Variant::Singles,
        players: vec![Player::new("a", "Ann"), Player::new("b", "Bob")],
        rules,
    })
    .expect("valid singles setup")
}

fn three_way() -> MatchEngine {
    MatchEngine::new(MatchSetup {
        variant: Variant::ThreeWay,
        players: vec![
            Player::new("a", "Ann").with_ko_number(Target::Twenty),
            Player::new("b", "Bob").with_ko_number(Target::Nineteen),
            Player::new("c", "Cat").with_ko_number(Target::Eighteen),
        ],
        rules: RuleSet::default(),
    })
    .expect("valid 3-way setup")
}

fn four_way() -> MatchEngine {
    MatchEngine::new(MatchSetup {
        variant: Variant::FourWay,
        players: vec![
            Player::new("a", "Ann").with_ko_number(Target::Twenty),
            Player::new("b", "Bob").with_ko_number(Target::Nineteen),
            Player::new("c", "Cat").with_ko_number(Target::Seventeen),
            Player::new("d", "Dan").with_ko_number(Target::Eighteen),
        ],
        rules: RuleSet::default(),
    })
    .expect("valid 4-way setup")
}

fn teams() -> MatchEngine {
    MatchEngine::new(MatchSetup {
        variant: Variant::Teams,
        players: vec![
            Player::new("a", "Ann"),
            Player::new("b", "Bob"),
            Player::new("c", "Cat"),
            Player::new("d", "Dan"),
        ],
        rules: RuleSet::default(),
    })
    .expect("valid team setup")
}

/// Closes every target for the current thrower with nine trebles.
/// Each set of three is a bonus turn, so the seat never changes.
fn close_board(engine: &mut MatchEngine) {
    for target in Target::ALL {
        engine
            .apply(score(target, Multiplier::Triple))
            .expect("open target");
    }
}

fn miss_turn(engine: &mut MatchEngine) {
    for _ in 0..3 {
        engine.apply(Action::Miss).expect("miss accepted");
    }
}

#[test]
fn test_bonus_turn_after_three_scoring_darts() {
    let mut engine = singles(RuleSet::default());
    engine.apply(score(Target::Twenty, Multiplier::Single)).expect("hit");
    engine.apply(score(Target::Nineteen, Multiplier::Double)).expect("hit");
    let outcome = engine.apply(score(Target::Bull, Multiplier::Single)).expect("hit");

    assert!(matches!(outcome, Outcome::Dart { turn: Some(TurnChange::Bonus), .. }));
    assert_eq!(engine.turn().current_seat(), 0);
    assert_eq!(engine.turn().darts_thrown(), 0);
}

#[test]
fn test_miss_forfeits_bonus_turn() {
    let mut engine = singles(RuleSet::default());
    engine.apply(score(Target::Twenty, Multiplier::Single)).expect("hit");
    engine.apply(score(Target::Nineteen, Multiplier::Single)).expect("hit");
    let outcome = engine.apply(Action::Miss).expect("miss");

    assert!(matches!(
        outcome,
        Outcome::Dart {
            turn: Some(TurnChange::Rotated { to_seat: 1 }),
            ..
        }
    ));
    assert_eq!(engine.current_participant(), &id("b"));
}

// Assumption: KO hits count as scoring darts for the bonus turn.
#[test]
fn test_ko_hits_count_toward_bonus_turn() {
    let mut engine = four_way();
    close_board(&mut engine);
    engine.apply(score(Target::Eighteen, Multiplier::Single)).expect("ko d");
    engine.apply(score(Target::Nineteen, Multiplier::Single)).expect("ko b");
    let outcome = engine.apply(score(Target::Seventeen, Multiplier::Single)).expect("ko c");
    assert!(matches!(outcome, Outcome::Dart { turn: Some(TurnChange::Bonus), .. }));
}

#[test]
fn test_closed_target_rejected_and_state_unchanged() {
    let mut engine = singles(RuleSet::default());
    engine.apply(score(Target::Fifteen, Multiplier::Triple)).expect("hit");
    let before = engine.state().clone();

    let err = engine.apply(score(Target::Fifteen, Multiplier::Single)).unwrap_err();
    assert_eq!(err, Rejection::TargetClosed(Target::Fifteen));
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_overflow_on_closing_dart_scores_points() {
    let mut engine = singles(RuleSet::default());
    engine.apply(score(Target::Twenty, Multiplier::Double)).expect("hit");
    engine.apply(score(Target::Twenty, Multiplier::Triple)).expect("hit");
    let ann = engine.ledger().get(&id("a")).expect("ann");
    assert_eq!(ann.marks(Target::Twenty), 3);
    assert_eq!(ann.points(), 40);
}

#[test]
fn test_marks_only_rule_awards_no_points() {
    let mut engine = singles(RuleSet {
        scoring: ScoringMode::MarksOnly,
        ..RuleSet::default()
    });
    engine.apply(score(Target::Twenty, Multiplier::Double)).expect("hit");
    engine.apply(score(Target::Twenty, Multiplier::Triple)).expect("hit");
    assert_eq!(engine.ledger().get(&id("a")).map(|e| e.points()), Some(0));
}

#[test]
fn test_skip_is_not_repeatable_in_the_same_turn() {
    let mut engine = three_way();
    engine.apply(Action::Skip(id("b"))).expect("first skip");
    assert_eq!(
        engine.apply(Action::Skip(id("b"))),
        Err(Rejection::ParticipantIneligible(id("b")))
    );
    assert_eq!(engine.turn().darts_thrown(), 1);
}

#[test]
fn test_skip_repeatable_after_someone_else() {
    let mut engine = four_way();
    engine.apply(Action::Skip(id("b"))).expect("skip b");
    engine.apply(Action::Skip(id("c"))).expect("skip c");
    engine.apply(Action::Skip(id("b"))).expect("b again after c");
}

#[test]
fn test_skip_self_rejected() {
    let mut engine = three_way();
    assert_eq!(
        engine.apply(Action::Skip(id("a"))),
        Err(Rejection::ParticipantIneligible(id("a")))
    );
}

#[test]
fn test_skipped_participant_loses_one_turn() {
    let mut engine = three_way();
    engine.apply(Action::Skip(id("b"))).expect("skip");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");

    assert_eq!(engine.current_participant(), &id("c"));
    assert!(engine.turn().served().contains(&id("b")));
    assert!(engine.turn().skipped().is_empty());
    assert_eq!(engine.turn().last_skipped(), None);

    // Served but not yet back: may be skipped again by someone else.
    engine.apply(Action::Skip(id("b"))).expect("skip served participant");
    assert!(engine.turn().skipped().contains(&id("b")));
    assert!(!engine.turn().served().contains(&id("b")));
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");
    assert_eq!(engine.current_participant(), &id("a"));
    miss_turn(&mut engine);
    assert_eq!(engine.current_participant(), &id("c"));
    miss_turn(&mut engine);
    miss_turn(&mut engine);
    assert_eq!(engine.current_participant(), &id("b"));
    assert!(engine.turn().served().is_empty());
}

#[test]
fn test_four_way_ko_elimination() {
    let mut engine = four_way();
    close_board(&mut engine);
    assert_eq!(engine.phase(), Phase::Ko);

    engine.apply(score(Target::Eighteen, Multiplier::Single)).expect("ko dart");
    assert_eq!(engine.ledger().get(&id("d")).map(|e| e.ko_points()), Some(1));

    let outcome = engine.apply(score(Target::Eighteen, Multiplier::Double)).expect("ko dart");
    assert!(matches!(
        outcome,
        Outcome::Dart {
            dart: Dart::KoHit {
                ko_points: 3,
                eliminated: true,
                ..
            },
            ..
        }
    ));
    assert!(engine.ledger().get(&id("d")).is_some_and(|e| e.is_eliminated()));

    engine.apply(Action::Miss).expect("miss");
    assert_eq!(engine.current_participant(), &id("b"));
    miss_turn(&mut engine);
    assert_eq!(engine.current_participant(), &id("c"));
    miss_turn(&mut engine);
    assert_eq!(engine.current_participant(), &id("a"));
}

#[test]
fn test_double_on_ko_number_adds_two() {
    let mut engine = four_way();
    close_board(&mut engine);
    engine.apply(score(Target::Eighteen, Multiplier::Double)).expect("ko dart");
    let dan = engine.ledger().get(&id("d")).expect("dan");
    assert_eq!(dan.ko_points(), 2);
    assert!(!dan.is_eliminated());
}

#[test]
fn test_ko_requires_complete_board() {
    let mut engine = four_way();
    close_board(&mut engine);
    miss_turn(&mut engine);
    // Bob has nothing closed: his dart at 18 is an ordinary scoring dart.
    engine.apply(score(Target::Eighteen, Multiplier::Single)).expect("hit");
    assert_eq!(engine.ledger().get(&id("d")).map(|e| e.ko_points()), Some(0));
    assert_eq!(
        engine.apply(Action::Ko {
            victim: id("d"),
            multiplier: Multiplier::Single
        }),
        Err(Rejection::ParticipantIneligible(id("b")))
    );
}

#[test]
fn test_self_heal_on_own_ko_number() {
    let mut engine = three_way();
    close_board(&mut engine);
    engine.apply(score(Target::Nineteen, Multiplier::Double)).expect("ko b");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");
    assert_eq!(engine.current_participant(), &id("b"));

    // Bob's 19 is open, so this dart adds marks.
    engine.apply(score(Target::Nineteen, Multiplier::Triple)).expect("close 19");
    assert_eq!(engine.ledger().get(&id("b")).map(|e| e.ko_points()), Some(2));

    // Closed and carrying KO points: the same number now heals.
    engine.apply(score(Target::Nineteen, Multiplier::Single)).expect("heal");
    assert_eq!(engine.ledger().get(&id("b")).map(|e| e.ko_points()), Some(1));

    // Explicit heal works without a complete board.
    let outcome = engine
        .apply(Action::Ko {
            victim: id("b"),
            multiplier: Multiplier::Triple,
        })
        .expect("heal");
    assert!(matches!(outcome, Outcome::Dart { dart: Dart::KoHeal { ko_points: 0 }, .. }));
}

#[test]
fn test_eliminating_to_two_starts_pin() {
    let mut engine = three_way();
    close_board(&mut engine);
    engine.apply(score(Target::Eighteen, Multiplier::Triple)).expect("ko c");
    assert!(engine.ledger().get(&id("c")).is_some_and(|e| e.is_eliminated()));
    assert_eq!(engine.phase(), Phase::Pin);
    engine.apply(Action::Pin).expect("pin push");
    assert_eq!(engine.turn().pin_counter(), 1);
}

#[test]
fn test_pin_win_and_no_further_pins() {
    let mut engine = singles(RuleSet::default());
    close_board(&mut engine);
    assert_eq!(engine.phase(), Phase::Pin);

    engine.apply(Action::Pin).expect("push");
    engine.apply(Action::Pin).expect("push");
    let outcome = engine.apply(Action::Pin).expect("push");
    assert!(matches!(outcome, Outcome::Dart { winner: Some(ref w), turn: None, .. } if *w == id("a")));
    assert_eq!(engine.turn().pin_counter(), 3);
    assert_eq!(engine.apply(Action::Pin), Err(Rejection::MatchOver));
    assert_eq!(engine.apply(Action::Miss), Err(Rejection::MatchOver));

    engine.apply(Action::Undo).expect("undo winning push");
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.turn().pin_counter(), 2);
}

#[test]
fn test_incomplete_board_only_pushes_back_to_zero() {
    let mut engine = singles(RuleSet::default());
    close_board(&mut engine);
    engine.apply(Action::Pin).expect("push");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");
    assert_eq!(engine.current_participant(), &id("b"));

    engine.apply(Action::Pin).expect("push back");
    assert_eq!(engine.turn().pin_counter(), 0);

    assert_eq!(engine.apply(Action::Pin), Err(Rejection::InvalidPinPush));
    assert_eq!(engine.turn().darts_thrown(), 1);
    assert_eq!(engine.history().last().map(|e| e.kind()), Some(ActionKind::Pin));
}

#[test]
fn test_classic_win_without_pin() {
    let mut engine = singles(RuleSet {
        pin_enabled: false,
        ..RuleSet::default()
    });
    for target in &Target::ALL[..8] {
        engine.apply(score(*target, Multiplier::Triple)).expect("hit");
    }
    assert_eq!(engine.winner(), None);
    let outcome = engine.apply(score(Target::Double, Multiplier::Triple)).expect("hit");
    assert!(matches!(outcome, Outcome::Dart { winner: Some(_), turn: None, .. }));
    assert_eq!(engine.winner(), Some(&id("a")));
}

#[test]
fn test_teams_share_a_ledger_entry() {
    let mut engine = teams();
    engine.apply(score(Target::Twenty, Multiplier::Triple)).expect("hit");
    miss_turn_after(&mut engine, 1);
    assert_eq!(engine.current_participant(), &ParticipantId::team(1));

    engine.apply(Action::Skip(ParticipantId::team(0))).expect("skip team");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");

    // Cat (team 0) is passed over; Dan throws for team 1.
    assert_eq!(engine.current_player().id, id("d"));
    miss_turn(&mut engine);
    assert_eq!(engine.current_player().id, id("a"));
    assert!(engine.turn().served().is_empty());
    assert_eq!(
        engine.apply(score(Target::Twenty, Multiplier::Single)),
        Err(Rejection::TargetClosed(Target::Twenty))
    );
}

fn miss_turn_after(engine: &mut MatchEngine, thrown: usize) {
    for _ in thrown..3 {
        engine.apply(Action::Miss).expect("miss accepted");
    }
}

#[test]
fn test_undo_after_rotation_lands_on_third_dart() {
    let mut engine = singles(RuleSet::default());
    engine.apply(score(Target::Twenty, Multiplier::Single)).expect("hit");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");
    assert_eq!(engine.current_participant(), &id("b"));

    let outcome = engine.apply(Action::Undo).expect("undo");
    assert_eq!(outcome, Outcome::Undone { entries: 2 });
    assert_eq!(engine.current_participant(), &id("a"));
    assert_eq!(engine.turn().darts_thrown(), 2);
}

#[test]
fn test_undo_restores_skip_bookkeeping() {
    let mut engine = three_way();
    let initial = engine.state().clone();
    engine.apply(Action::Skip(id("c"))).expect("skip");
    engine.apply(Action::Miss).expect("miss");
    engine.apply(Action::Miss).expect("miss");
    for _ in 0..3 {
        engine.apply(Action::Undo).expect("undo");
    }
    assert_eq!(engine.state(), &initial);
    assert_eq!(engine.apply(Action::Undo), Err(Rejection::NothingToUndo));
}

#[test]
fn test_undo_round_trip_through_elimination() {
    let mut engine = four_way();
    let initial = engine.state().clone();
    close_board(&mut engine);
    engine.apply(score(Target::Eighteen, Multiplier::Triple)).expect("ko d");
    engine.apply(Action::Skip(id("b"))).expect("skip");
    engine.apply(Action::Miss).expect("miss");

    let accepted = 12;
    for _ in 0..accepted {
        engine.apply(Action::Undo).expect("undo");
    }
    assert_eq!(engine.state(), &initial);
    assert!(engine.history().is_empty());
}

#[test]
fn test_summary_recomputes_from_history() {
    let mut engine = singles(RuleSet::default());
    assert!(engine.summary().is_none());
    close_board(&mut engine);
    for _ in 0..3 {
        engine.apply(Action::Pin).expect("push");
    }

    let summary = engine.summary().expect("winner declared");
    assert_eq!(summary.winner, id("a"));
    assert_eq!(summary.total_turns, 4);
    assert_eq!(summary.darts_thrown(&id("a")), 12);
    assert_eq!(summary.count(ActionKind::Pin, &id("a")), 3);
    assert_eq!(summary.count(ActionKind::Score, &id("a")), 9);
    assert_eq!(summary.count(ActionKind::TurnAdvance, &id("a")), 3);
}

#[test]
fn test_snapshot_projection() {
    let mut engine = three_way();
    engine.select_multiplier(Multiplier::Double);
    engine.apply(Action::Skip(id("b"))).expect("skip");
    let snap = engine.snapshot();
    assert_eq!(snap.current_participant, id("a"));
    assert_eq!(snap.skipped, vec![id("b")]);
    assert_eq!(snap.last_skipped, Some(id("b")));
    assert_eq!(snap.selected_multiplier, Multiplier::Single);
    assert_eq!(snap.phase, Phase::Open);
    assert!(snap.can_undo);
}
