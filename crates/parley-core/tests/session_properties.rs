//! Property-based tests for the session state machine
//!
//! Drives a [`Session`] with arbitrary event sequences and checks the
//! sequencing rules hold for all of them, not just hand-picked scenarios.

use parley_core::{Session, SessionAction, SessionEvent, SessionState, Termination};
use parley_proto::{DisplayName, Frame};
use proptest::prelude::*;

fn session() -> Session {
    let name = DisplayName::new("tester").unwrap();
    Session::new(name, "10.0.0.1:4000".parse().unwrap())
}

/// Strategy for events a runtime could feed the session (no send failures)
fn event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        4 => "[a-z ]{1,12}".prop_map(|t| SessionEvent::FrameReceived(Frame::new(t).unwrap())),
        1 => Just(SessionEvent::FrameReceived(Frame::shutdown())),
        1 => Just(SessionEvent::PeerClosed),
        1 => Just(SessionEvent::ReceiveFailed { reason: "reset".into() }),
        6 => "[a-z ]{1,12}".prop_map(SessionEvent::Line),
        1 => Just(SessionEvent::Line("bye".into())),
        2 => Just(SessionEvent::EmptyLine),
        2 => Just(SessionEvent::LineTooLong),
        1 => Just(SessionEvent::EndOfInput),
        1 => Just(SessionEvent::InputFailed { reason: "eio".into() }),
    ]
}

/// Feed events until the first terminate, collecting every action produced.
fn run(events: Vec<SessionEvent>) -> (Session, Vec<SessionAction>) {
    let mut session = session();
    let mut actions = session.start();
    for event in events {
        let batch = session.handle(event);
        let done = batch.iter().any(|a| matches!(a, SessionAction::Terminate(_)));
        actions.extend(batch);
        if done {
            break;
        }
    }
    (session, actions)
}

proptest! {
    #[test]
    fn prop_only_name_is_sent_before_first_message(events in prop::collection::vec(event(), 0..40)) {
        let mut session = session();
        let start = session.start();
        prop_assert_eq!(start.len(), 1);

        for event in events {
            let was_waiting = session.state() == SessionState::AwaitingFirstServerMessage;
            let is_frame = matches!(event, SessionEvent::FrameReceived(_));
            let batch = session.handle(event);
            if was_waiting && !is_frame {
                let sends = batch.iter().any(|a| matches!(a, SessionAction::Send(_)));
                prop_assert!(!sends);
            }
            if session.is_terminated() {
                break;
            }
        }
    }

    #[test]
    fn prop_terminate_is_last_and_preceded_by_close(events in prop::collection::vec(event(), 0..40)) {
        let (session, actions) = run(events);

        let terminates = actions.iter().filter(|a| matches!(a, SessionAction::Terminate(_))).count();
        let closes = actions.iter().filter(|a| matches!(a, SessionAction::Close)).count();
        prop_assert!(terminates <= 1);
        prop_assert_eq!(terminates, closes);

        if terminates == 1 {
            prop_assert!(session.is_terminated());
            let n = actions.len();
            prop_assert!(matches!(actions[n - 1], SessionAction::Terminate(_)));
            prop_assert_eq!(&actions[n - 2], &SessionAction::Close);
        }
    }

    #[test]
    fn prop_terminated_session_ignores_further_events(
        events in prop::collection::vec(event(), 0..10),
        later in event(),
    ) {
        let mut session = session();
        session.start();
        session.handle(SessionEvent::FrameReceived(Frame::new("hi").unwrap()));
        session.handle(SessionEvent::EndOfInput);
        for event in events {
            prop_assert!(session.handle(event).is_empty());
        }
        prop_assert!(session.handle(later).is_empty());
    }

    #[test]
    fn prop_interactive_lines_are_forwarded_verbatim(text in "[a-z][a-z ]{0,40}") {
        prop_assume!(text != "bye");
        let mut session = session();
        session.start();
        session.handle(SessionEvent::FrameReceived(Frame::new("hi").unwrap()));

        let actions = session.handle(SessionEvent::Line(text.clone()));
        prop_assert_eq!(&actions[0], &SessionAction::Send(Frame::new(text).unwrap()));
    }
}

#[test]
fn sentinel_from_either_side_succeeds() {
    let (_, actions) = run(vec![
        SessionEvent::FrameReceived(Frame::new("welcome").unwrap()),
        SessionEvent::Line("hello".into()),
        SessionEvent::Line("bye".into()),
    ]);
    assert_eq!(actions.last(), Some(&SessionAction::Terminate(Termination::LocalShutdown)));

    let (_, actions) = run(vec![
        SessionEvent::FrameReceived(Frame::new("welcome").unwrap()),
        SessionEvent::FrameReceived(Frame::shutdown()),
    ]);
    assert_eq!(actions.last(), Some(&SessionAction::Terminate(Termination::PeerShutdown)));
}
