use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn refs(names: &[&str]) -> Vec<ImageRef> {
    names.iter().map(|n| ImageRef::from(*n)).collect()
}

fn started(names: &[&str]) -> ComparisonEngine {
    let mut engine = ComparisonEngine::new();
    engine
        .start_session(&refs(names))
        .expect("start session");
    engine
}

fn state(engine: &ComparisonEngine) -> ComparisonState {
    engine.snapshot().expect("active session").clone()
}

#[test]
fn start_session_rejects_batches_smaller_than_two() {
    let mut engine = ComparisonEngine::new();
    assert_eq!(
        engine.start_session(&[]),
        Err(CompareError::InvalidBatch { len: 0 })
    );
    assert_eq!(
        engine.start_session(&refs(&["a"])),
        Err(CompareError::InvalidBatch { len: 1 })
    );
    assert!(!engine.is_active());
    assert!(engine.snapshot().is_none());
}

#[test]
fn start_session_takes_first_image_as_best() {
    let engine = started(&["a", "b", "c", "d"]);
    let s = state(&engine);
    assert_eq!(s.current_best, ImageRef::from("a"));
    assert_eq!(s.candidates, refs(&["b", "c", "d"]));
    assert_eq!(s.cursor, 0);
    assert!(s.saved.is_empty());
    assert!(s.rejected.is_empty());
    assert_eq!(engine.history_depth(), 0);
}

#[test]
fn reference_trace_matches() {
    let mut engine = started(&["A", "B", "C"]);

    engine.select_current_best().expect("select");
    let s = state(&engine);
    assert_eq!(s.current_best, ImageRef::from("B"));
    assert_eq!(s.candidates, refs(&["A", "C"]));
    assert_eq!(s.cursor, 0);

    engine.reject_image().expect("reject");
    let s = state(&engine);
    assert_eq!(s.candidates, refs(&["C"]));
    assert_eq!(s.rejected.to_vec(), refs(&["A"]));

    engine.undo().expect("undo");
    let s = state(&engine);
    assert_eq!(s.candidates, refs(&["A", "C"]));
    assert!(s.rejected.is_empty());

    engine.save_image().expect("save");
    let s = state(&engine);
    assert_eq!(s.saved.to_vec(), refs(&["B"]));

    engine.next_candidate().expect("next");
    let s = state(&engine);
    assert_eq!(s.cursor, 1);
    assert_eq!(s.current_candidate(), Some(&ImageRef::from("C")));
}

#[test]
fn undo_restores_exact_state_for_each_decision() {
    let ops: [fn(&mut ComparisonEngine) -> Result<(), CompareError>; 3] = [
        ComparisonEngine::select_current_best,
        ComparisonEngine::save_image,
        ComparisonEngine::reject_image,
    ];
    for op in ops {
        let mut engine = started(&["a", "b", "c", "d"]);
        engine.next_candidate().expect("next");
        engine.save_image().expect("save");
        let before = state(&engine);

        op(&mut engine).expect("decision");
        engine.undo().expect("undo");
        assert_eq!(state(&engine), before);
    }
}

#[test]
fn undo_with_empty_history_reports_nothing_to_undo() {
    let mut engine = started(&["a", "b"]);
    engine.next_candidate().expect("navigation is not undoable");
    let before = state(&engine);
    assert_eq!(engine.undo(), Err(CompareError::NothingToUndo));
    assert_eq!(state(&engine), before);
}

#[test]
fn rejecting_until_empty_resolves_with_best_unchanged() {
    let mut engine = started(&["a", "b", "c", "d"]);
    while !state(&engine).is_resolved() {
        engine.reject_image().expect("reject");
    }
    let s = state(&engine);
    assert_eq!(s.cursor, 0);
    assert_eq!(s.candidates.len(), 0);
    assert_eq!(s.current_best, ImageRef::from("a"));
    assert_eq!(s.rejected.to_vec(), refs(&["b", "c", "d"]));
}

#[test]
fn decisions_without_active_candidate_are_noops() {
    let mut engine = started(&["a", "b", "c"]);
    engine.next_candidate().expect("to c");
    engine.next_candidate().expect("to end of queue");
    let before = state(&engine);
    assert_eq!(before.cursor, 2);
    assert_eq!(before.current_candidate(), None);

    assert_eq!(engine.next_candidate(), Err(CompareError::NoActiveCandidate));
    assert_eq!(
        engine.select_current_best(),
        Err(CompareError::NoActiveCandidate)
    );
    assert_eq!(engine.reject_image(), Err(CompareError::NoActiveCandidate));
    assert_eq!(state(&engine), before);
    assert_eq!(engine.history_depth(), 0);
}

#[test]
fn previous_candidate_at_end_of_queue_reports_no_candidate() {
    let mut engine = started(&["a", "b", "c"]);
    engine.next_candidate().expect("to c");
    engine.next_candidate().expect("to end of queue");
    let before = state(&engine);

    assert_eq!(
        engine.previous_candidate(),
        Err(CompareError::NoActiveCandidate)
    );
    assert_eq!(state(&engine), before);
    assert_eq!(state(&engine).cursor, 2);
}

#[test]
fn previous_candidate_clamps_at_the_front() {
    let mut engine = started(&["a", "b", "c"]);
    engine.next_candidate().expect("to c");
    engine.previous_candidate().expect("back to b");
    engine.previous_candidate().expect("stays at b");
    assert_eq!(state(&engine).cursor, 0);
}

#[test]
fn navigation_on_resolved_tournament_reports_no_candidate() {
    let mut engine = started(&["a", "b"]);
    engine.reject_image().expect("reject");
    assert_eq!(
        engine.previous_candidate(),
        Err(CompareError::NoActiveCandidate)
    );
    assert_eq!(engine.next_candidate(), Err(CompareError::NoActiveCandidate));
}

#[test]
fn save_after_resolution_is_allowed_and_does_not_exit() {
    let mut engine = started(&["a", "b"]);
    engine.reject_image().expect("reject");
    engine.save_image().expect("save winner");
    assert!(engine.is_active());
    assert_eq!(state(&engine).saved.to_vec(), refs(&["a"]));
}

#[test]
fn saving_twice_keeps_set_semantics() {
    let mut engine = started(&["a", "b"]);
    engine.save_image().expect("save");
    engine.save_image().expect("save again");
    assert_eq!(state(&engine).saved.len(), 1);
    assert_eq!(engine.history_depth(), 2);
}

#[test]
fn saved_candidate_cannot_be_rejected() {
    let mut engine = started(&["a", "b", "c"]);
    engine.save_image().expect("save a");
    engine.select_current_best().expect("b beats a");
    assert_eq!(state(&engine).current_candidate(), Some(&ImageRef::from("a")));

    let before = state(&engine);
    assert_eq!(
        engine.reject_image(),
        Err(CompareError::AlreadySaved(ImageRef::from("a")))
    );
    assert_eq!(state(&engine), before);
}

#[test]
fn operations_without_session_report_no_session() {
    let mut engine = ComparisonEngine::new();
    for cmd in CompareCommand::ALL {
        assert_eq!(engine.apply(cmd), Err(CompareError::NoSession));
    }
}

#[test]
fn exit_returns_summary_and_clears_session() {
    let mut engine = started(&["a", "b", "c"]);
    engine.save_image().expect("save");
    engine.reject_image().expect("reject b");

    let applied = engine
        .apply(CompareCommand::ExitComparison)
        .expect("exit");
    let Applied::Exited(summary) = applied else {
        panic!("expected exit summary");
    };
    assert_eq!(summary.winner, ImageRef::from("a"));
    assert_eq!(summary.saved, refs(&["a"]));
    assert_eq!(summary.rejected, refs(&["b"]));
    assert_eq!(summary.remaining, refs(&["c"]));
    assert!(!summary.resolved);
    assert_eq!(summary.decisions, 2);

    assert!(!engine.is_active());
    assert_eq!(engine.save_image(), Err(CompareError::NoSession));
}

#[test]
fn starting_a_new_batch_discards_previous_session() {
    let mut engine = started(&["a", "b"]);
    engine.save_image().expect("save");
    engine.start_session(&refs(&["x", "y"])).expect("restart");
    assert_eq!(engine.history_depth(), 0);
    assert!(state(&engine).saved.is_empty());
    assert_eq!(engine.undo(), Err(CompareError::NothingToUndo));
}

#[test]
fn subscribers_see_every_successful_mutation() {
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut engine = ComparisonEngine::new();
    let sink = Rc::clone(&seen);
    let id = engine.subscribe(move |change| {
        let label = match change {
            Change::Started(s) => format!("started:{}", s.current_best),
            Change::Updated { command, state } => format!("{}:{}", command, state.cursor),
            Change::Exited(summary) => format!("exited:{}", summary.winner),
        };
        sink.borrow_mut().push(label);
    });

    engine.start_session(&refs(&["a", "b", "c"])).expect("start");
    engine.next_candidate().expect("next");
    assert_eq!(engine.undo(), Err(CompareError::NothingToUndo));
    engine.select_current_best().expect("select");
    engine.exit_comparison().expect("exit");

    assert_eq!(
        *seen.borrow(),
        vec![
            "started:a".to_string(),
            "nextCandidate:1".to_string(),
            "selectCurrentBest:1".to_string(),
            "exited:c".to_string(),
        ]
    );

    assert!(engine.unsubscribe(id));
    engine.start_session(&refs(&["a", "b"])).expect("start");
    assert_eq!(seen.borrow().len(), 4);
}

#[test]
fn command_names_round_trip_through_from_str() {
    for cmd in CompareCommand::ALL {
        assert_eq!(cmd.as_str().parse::<CompareCommand>(), Ok(cmd));
    }
    assert!("toggleHelp".parse::<CompareCommand>().is_err());
}

#[test]
fn only_decisions_grow_the_history() {
    let mut engine = started(&["a", "b", "c"]);
    for cmd in [
        CompareCommand::NextCandidate,
        CompareCommand::PreviousCandidate,
        CompareCommand::SelectCurrentBest,
        CompareCommand::SaveImage,
        CompareCommand::RejectImage,
    ] {
        let depth = engine.history_depth();
        engine.apply(cmd).expect("apply");
        let grew = engine.history_depth() == depth + 1;
        assert_eq!(grew, cmd.is_decision(), "{cmd}");
    }
    assert!(!CompareCommand::Undo.is_decision());
    assert!(!CompareCommand::ExitComparison.is_decision());
}
