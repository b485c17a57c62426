use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use vanish::app::{App, AppState, KeyOutcome, SetupForm};
use vanish::fade::FadeGranularity;
use vanish::notify::NotificationLevel;
use vanish::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use vanish::session::{GoalType, SessionConfig, SessionPhase};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Drive the app the way the binary does, without a TTY, for at most `steps`
/// events or until `done` holds.
fn drive<F: Fn(&App) -> bool>(
    app: &mut App,
    runner: &mut Runner<TestEventSource, FixedTicker>,
    steps: u32,
    done: F,
) {
    for _ in 0..steps {
        runner.set_ticking(app.wants_ticks());
        runner.wake_at(app.next_wake());
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Wake => app.expire_toasts(),
            AppEvent::Resize => {}
            AppEvent::Closed => break,
            AppEvent::Key(k) => {
                if app.on_key(k) == KeyOutcome::Quit {
                    break;
                }
            }
        }
        if done(app) {
            break;
        }
    }
}

// Setup form -> editor -> words goal reached through the real runner.
#[test]
fn headless_words_session_completes() {
    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let mut app = App::new(SetupForm::default(), FadeGranularity::Coarse);

    // switch to the words tab, enter 5, start
    tx.send(key(KeyCode::Up)).unwrap();
    tx.send(key(KeyCode::Right)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Char('5'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    for c in "one two three four five".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }

    drive(&mut app, &mut runner, 500, |app| {
        app.session
            .as_ref()
            .is_some_and(|s| s.phase() == SessionPhase::Completed)
    });

    assert_eq!(app.state, AppState::Editor);
    let session = app.session.as_ref().expect("session started");
    assert_eq!(session.config().goal_type, GoalType::Words);
    assert_eq!(session.word_count(), 5);
    assert_eq!(session.progress(), 100.0);
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert!(!app.wants_ticks());
    assert_eq!(
        app.toasts.latest().unwrap().notification.level,
        NotificationLevel::Success
    );
}

// Countdown of 1s, hardcore, fine-grained fade: silence erases the text.
#[test]
fn headless_hardcore_erases_after_silence() {
    let (tx, rx) = mpsc::channel();
    let fade = FadeGranularity::Fine;
    // ticks much faster than real time; the session only counts ticks
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    let mut app = App::with_session(
        SessionConfig {
            goal_type: GoalType::Time,
            goal_value: 1,
            countdown_duration: 1,
            hardcore: true,
        },
        fade,
    );

    for c in "gone soon".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }

    drive(&mut app, &mut runner, 2_000, |app| {
        app.toasts
            .visible(Instant::now())
            .any(|t| t.notification.level == NotificationLevel::Destructive)
    });

    let session = app.session.as_ref().unwrap();
    assert_eq!(session.text(), "");
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.state().fade_level, 0.0);
    // idle sessions keep the timer armed so the next keystroke counts down again
    assert!(app.wants_ticks());
}

#[test]
fn headless_invalid_setup_stays_on_setup() {
    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let mut app = App::new(SetupForm::default(), FadeGranularity::Coarse);

    tx.send(key(KeyCode::Enter)).unwrap();
    drop(tx);
    drive(&mut app, &mut runner, 10, |_| false);

    assert_eq!(app.state, AppState::Setup);
    assert!(app.session.is_none());
    assert_eq!(
        app.toasts.latest().unwrap().notification.level,
        NotificationLevel::Error
    );
}
