//! End-to-end scenarios: loading a description, driving the machine through
//! the bus, and vetoing transitions from listeners.

use parking_lot::Mutex;
use serde_json::{json, Value};
use statemint::events::{EventBus, LocalBus, Mailbox, Notification, CHANGED};
use statemint::loader::{FsmDescription, FsmLoader, StateDef};
use statemint::{State, StateMachine, TransitionOutcome};
use std::sync::Arc;

const IDLE_RUNNING: &str = r#"{
    "initial": "Idle",
    "states": [
        {
            "name": "Idle",
            "entering": "e:idle",
            "transitions": [{ "action": "start", "target": "Running" }]
        },
        {
            "name": "Running",
            "entering": "e:run",
            "exiting": "x:run",
            "changed": "c:run",
            "transitions": [{ "action": "stop", "target": "Idle" }]
        }
    ]
}"#;

type Log = Arc<Mutex<Vec<(String, Value, Option<String>)>>>;

fn setup() -> (Arc<LocalBus>, StateMachine, Log) {
    let bus = Arc::new(LocalBus::new());
    let mut loader = FsmLoader::from_json(IDLE_RUNNING).unwrap();
    let machine = loader.inject(bus.clone()).unwrap();

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    for name in ["e:idle", "e:run", "x:run", "c:run", CHANGED] {
        let log = Arc::clone(&log);
        bus.subscribe(
            name,
            Arc::new(move |note: &Notification| {
                log.lock()
                    .push((note.name.clone(), note.body.clone(), note.kind.clone()))
            }),
        );
    }
    (bus, machine, log)
}

fn names(log: &Log) -> Vec<String> {
    log.lock().iter().map(|(name, _, _)| name.clone()).collect()
}

#[test]
fn idle_to_running_publishes_in_protocol_order() {
    let (_bus, mut machine, log) = setup();
    assert_eq!(machine.current_state().map(State::name), Some("Idle"));
    assert!(log.lock().is_empty());

    let outcome = machine.handle_action("start", json!({"x": 1}));

    assert!(outcome.is_committed());
    assert_eq!(machine.current_state().map(State::name), Some("Running"));
    let log = log.lock();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], ("e:run".to_string(), json!({"x": 1}), None));
    assert_eq!(log[1], ("c:run".to_string(), json!({"x": 1}), None));
    assert_eq!(log[2].0, CHANGED);
    assert_eq!(log[2].1["name"], "Running");
    assert_eq!(log[2].2.as_deref(), Some("Running"));
}

#[test]
fn enter_veto_on_running_keeps_idle() {
    let (bus, mut machine, log) = setup();
    let cancellation = machine.cancellation();
    bus.subscribe("e:run", Arc::new(move |_: &Notification| cancellation.cancel()));

    let outcome = machine.handle_action("start", json!({"x": 1}));

    assert_eq!(
        outcome,
        TransitionOutcome::VetoedOnEnter {
            from: Some("Idle".to_string()),
            to: "Running".to_string(),
        }
    );
    assert_eq!(machine.current_state().map(State::name), Some("Idle"));
    assert_eq!(names(&log), vec!["e:run"]);
}

#[test]
fn enter_veto_after_exit_was_observed() {
    let (bus, mut machine, log) = setup();
    machine.handle_action("start", json!(null));
    log.lock().clear();
    let cancellation = machine.cancellation();
    bus.subscribe("e:idle", Arc::new(move |_: &Notification| cancellation.cancel()));

    let outcome = machine.handle_action("stop", json!(null));

    assert!(matches!(outcome, TransitionOutcome::VetoedOnEnter { .. }));
    assert_eq!(machine.current_state().map(State::name), Some("Running"));
    assert_eq!(names(&log), vec!["x:run", "e:idle"]);
    assert_eq!(log.lock()[0].2.as_deref(), Some("Idle"));
}

#[test]
fn veto_through_cancel_notification() {
    let (bus, mut machine, log) = setup();
    let mailbox = Mailbox::connect(bus.clone(), machine.cancellation());
    let publisher = Arc::clone(&bus);
    bus.subscribe(
        "e:run",
        Arc::new(move |_: &Notification| publisher.publish(Notification::cancel())),
    );

    bus.publish(Notification::action("start", json!(null)));
    let outcomes = machine.drain(&mailbox);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_vetoed());
    assert_eq!(machine.current_state().map(State::name), Some("Idle"));
    assert_eq!(names(&log), vec!["e:run"]);
}

#[test]
fn exit_veto_through_cancel_notification() {
    let (bus, mut machine, log) = setup();
    machine.handle_action("start", json!(null));
    log.lock().clear();
    let mailbox = Mailbox::connect(bus.clone(), machine.cancellation());
    let publisher = Arc::clone(&bus);
    bus.subscribe(
        "x:run",
        Arc::new(move |_: &Notification| publisher.publish(Notification::cancel())),
    );

    bus.publish(Notification::action("stop", json!(null)));
    let outcomes = machine.drain(&mailbox);

    assert_eq!(
        outcomes,
        vec![TransitionOutcome::VetoedOnExit {
            from: "Running".to_string(),
            to: "Idle".to_string(),
        }]
    );
    assert_eq!(machine.current_state().map(State::name), Some("Running"));
    assert_eq!(names(&log), vec!["x:run"]);
}

#[test]
fn dropping_machine_and_mailbox_releases_the_bus() {
    let (bus, machine, _log) = setup();
    let mailbox = Mailbox::connect(bus.clone(), machine.cancellation());
    let inbox = Arc::downgrade(&mailbox);

    drop(machine);
    drop(mailbox);
    for _ in 0..1000 {
        bus.publish(Notification::action("start", json!(null)));
    }

    assert!(inbox.upgrade().is_none());
    assert_eq!(bus.subscriber_count(statemint::events::ACTION), 0);
    assert_eq!(bus.subscriber_count(statemint::events::CANCEL), 0);
}

#[test]
fn actions_published_by_listeners_run_after_the_current_transition() {
    let (bus, mut machine, log) = setup();
    let mailbox = Mailbox::connect(bus.clone(), machine.cancellation());
    let publisher = Arc::clone(&bus);
    bus.subscribe(
        "c:run",
        Arc::new(move |_: &Notification| {
            publisher.publish(Notification::action("stop", json!("auto")))
        }),
    );

    bus.publish(Notification::action("start", json!(null)));
    let outcomes = machine.drain(&mailbox);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(TransitionOutcome::is_committed));
    assert_eq!(machine.current_state().map(State::name), Some("Idle"));
    assert_eq!(
        names(&log),
        vec!["e:run", "c:run", CHANGED, "x:run", "e:idle", CHANGED]
    );
    assert!(mailbox.is_empty());
}

#[test]
fn initial_b_without_transitions() {
    let description = FsmDescription::new("B", vec![StateDef::named("A"), StateDef::named("B")]);
    let mut loader = FsmLoader::new(description);

    let machine = loader.inject(Arc::new(LocalBus::new())).unwrap();

    assert_eq!(machine.current_state().map(State::name), Some("B"));
    assert_eq!(machine.states().map(State::transition_count).sum::<usize>(), 0);
}

#[test]
fn transitions_can_be_edited_after_loading() {
    let (_bus, mut machine, _log) = setup();
    machine
        .state_mut("Idle")
        .unwrap()
        .define_trans("shortcut", "Running");
    machine.state_mut("Idle").unwrap().remove_trans("start");

    assert_eq!(machine.handle_action("start", json!(null)), TransitionOutcome::Ignored);
    assert!(machine.handle_action("shortcut", json!(null)).is_committed());
}
