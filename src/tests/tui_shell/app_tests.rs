use std::collections::BTreeMap;
use std::time::Duration;

use super::*;
use crate::compare::CompareCommand;
use crate::keymap::{BROWSE, COMPARE, IMAGES};
use crate::test_support::FakeService;

fn app_with(fake: &Arc<FakeService>, config: ClientConfig) -> App {
    App::new(fake.clone(), config).unwrap()
}

fn press(app: &mut App, keys: &str) {
    for k in keys.split_whitespace() {
        app.handle_key_name(k);
    }
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
}

/// Root -> trip folder -> its images.
fn open_trip(app: &mut App) {
    press(app, "arrowdown enter enter");
}

fn settle(app: &mut App) {
    for _ in 0..500 {
        app.poll_saves();
        if app.saves.pending() == 0 {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("saves did not finish");
}

fn marked(app: &App) -> Vec<String> {
    app.view()
        .as_any()
        .downcast_ref::<ImagesView>()
        .unwrap()
        .marked_paths()
}

#[test]
fn starts_in_browse_context() {
    let fake = Arc::new(FakeService::with_trip());
    let app = app_with(&fake, ClientConfig::default());
    assert_eq!(app.view().context(), BROWSE);
    assert_eq!(app.router.active_context(), Some(BROWSE));
    assert!(app.status.is_none());
}

#[test]
fn browsing_into_a_folder_switches_to_images() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    assert_eq!(app.view().context(), IMAGES);
    assert_eq!(app.router.active_context(), Some(IMAGES));

    press(&mut app, "space arrowright arrowright space");
    assert_eq!(marked(&app), vec!["trip/a.jpg", "trip/c.jpg"]);

    press(&mut app, "a");
    assert_eq!(marked(&app).len(), 3);
    press(&mut app, "a");
    assert!(marked(&app).is_empty());
}

#[test]
fn full_comparison_flow_persists_saves_once() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter");

    assert_eq!(app.view().context(), COMPARE);
    assert_eq!(app.router.active_context(), Some(COMPARE));
    {
        let mirrored = app.compare_state.borrow();
        let state = mirrored.as_ref().unwrap();
        assert_eq!(state.current_best.as_str(), "trip/a.jpg");
        assert_eq!(state.candidates.len(), 2);
    }

    press(&mut app, "s s");
    settle(&mut app);
    assert_eq!(
        fake.recorded_saves(),
        vec![(
            "batch_0".to_string(),
            vec!["trip/a.jpg".to_string()],
            "saved".to_string()
        )]
    );
    assert_eq!(
        app.status.as_ref().map(|s| s.text.as_str()),
        Some("saved trip/a.jpg to saved")
    );

    press(&mut app, "enter d x escape");
    assert_eq!(app.view().context(), IMAGES);
    assert!(app.compare_state.borrow().is_none());
    assert!(app.batch.is_none());
    let status = app.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Info);
    assert!(status.text.starts_with("best: trip/b.jpg"), "{}", status.text);
}

#[test]
fn comparison_needs_two_marked_images() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "space enter");
    assert_eq!(app.view().context(), IMAGES);
    assert_eq!(*fake.batches.lock().unwrap(), 0);
    assert!(app.status.as_ref().unwrap().text.contains("at least two"));
}

#[test]
fn batch_failure_stays_on_images() {
    let fake = Arc::new(FakeService {
        fail_batches: true,
        ..FakeService::with_trip()
    });
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter");
    assert_eq!(app.view().context(), IMAGES);
    let status = app.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("server said no"), "{}", status.text);
}

#[test]
fn failed_save_is_reported_but_state_keeps_it() {
    let fake = Arc::new(FakeService {
        fail_saves: true,
        ..FakeService::with_trip()
    });
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter s");
    settle(&mut app);

    let status = app.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("disk full"), "{}", status.text);
    let mirrored = app.compare_state.borrow();
    assert_eq!(mirrored.as_ref().unwrap().saved.len(), 1);
}

#[test]
fn engine_errors_surface_in_status() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter u");
    let status = app.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "nothing to undo");
}

#[test]
fn help_toggles_and_escape_closes_it_first() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter ?");
    assert!(app.show_help);

    press(&mut app, "escape");
    assert!(!app.show_help);
    assert_eq!(app.view().context(), COMPARE);

    press(&mut app, "? ?");
    assert!(!app.show_help);
}

#[test]
fn glob_prompt_marks_matching_images() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);

    press(&mut app, "/");
    assert!(app.glob_open);
    type_text(&mut app, "b*");
    assert!(!app.glob_open);
    assert_eq!(marked(&app), vec!["trip/b.jpg"]);
    assert_eq!(app.status.as_ref().unwrap().text, "1 images match b*");

    press(&mut app, "/");
    type_text(&mut app, "[");
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
}

#[test]
fn keys_typed_into_the_prompt_are_not_routed() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "/");
    app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
    assert!(app.glob_open);
    assert_eq!(app.glob_input.buf, "a");
    app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert!(!app.glob_open);
    assert!(marked(&app).is_empty());
}

#[test]
fn escape_walks_back_and_quits_at_the_root() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "escape");
    assert_eq!(app.view().context(), BROWSE);
    press(&mut app, "escape");
    assert_eq!(app.view().context(), BROWSE);
    assert!(!app.quit);
    press(&mut app, "escape");
    assert!(app.quit);
}

#[test]
fn ctrl_c_quits_from_anywhere() {
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.quit);
}

#[test]
fn configured_keys_extend_the_defaults() {
    let mut keys = BTreeMap::new();
    keys.insert(
        "compare".to_string(),
        BTreeMap::from([("K".to_string(), "saveImage".to_string())]),
    );
    let config = ClientConfig {
        keys,
        save_folder: "keepers".to_string(),
        ..ClientConfig::default()
    };
    let fake = Arc::new(FakeService::with_trip());
    let mut app = app_with(&fake, config);
    open_trip(&mut app);
    press(&mut app, "a enter k");
    settle(&mut app);
    assert_eq!(fake.recorded_saves()[0].2, "keepers");
}

#[test]
fn hints_group_keys_by_command() {
    let fake = Arc::new(FakeService::with_trip());
    let app = app_with(&fake, ClientConfig::default());
    let hints = app.key_hints(COMPARE);
    assert!(hints.contains(&(
        "a/arrowleft".to_string(),
        Command::Compare(CompareCommand::PreviousCandidate)
    )));
    assert!(hints.contains(&(
        "escape/q".to_string(),
        Command::Compare(CompareCommand::ExitComparison)
    )));
    assert!(app.key_hints("nope").is_empty());
}

#[test]
fn finish_reports_failed_saves() {
    let fake = Arc::new(FakeService {
        fail_saves: true,
        ..FakeService::with_trip()
    });
    let mut app = app_with(&fake, ClientConfig::default());
    open_trip(&mut app);
    press(&mut app, "a enter s");
    let failures = app.finish();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("disk full"));
}
