use chrono::NaiveDateTime;
use serde_json::json;

use agendalive::{
    error::{AgendaError, ControlError, RemoteError},
    event::{END_DATE_FORMAT, Event, select_next_event},
    remote::{
        churchtools::{decode, decode_envelope},
        memory::InMemoryRemote,
        records::{AgendaRecord, EventRecord, ItemRecord, Keyed, LivePositionRecord, SongRecord},
    },
    session::Session,
};

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-10-18 09:00:00", END_DATE_FORMAT).unwrap()
}

fn event(id: i64, end: &str, agenda_id: Option<i64>) -> EventRecord {
    EventRecord {
        id,
        label: format!("Event {id}"),
        end_date: end.to_string(),
        agenda: None,
        agenda_id,
    }
}

fn item(id: i64, sortkey: i64, label: &str, arrangement_id: Option<i64>, is_header: bool) -> ItemRecord {
    ItemRecord {
        id,
        sortkey,
        is_header,
        label: label.to_string(),
        arrangement_id,
    }
}

fn songs() -> Vec<SongRecord> {
    decode(
        "getAllSongs",
        json!([
            {"id": "1", "bezeichnung": "Amazing Grace", "arrangement": {"42": {"id": "42", "bezeichnung": "Standard"}}},
            {"id": "2", "bezeichnung": "Unarranged", "arrangement": []}
        ]),
    )
    .map(Keyed::into_vec)
    .unwrap()
}

fn remote() -> InMemoryRemote {
    InMemoryRemote::new()
        .with_event(
            event(1, "2026-10-17 12:00:00", Some(100)),
            AgendaRecord { id: 100, label: "Past".to_string() },
            vec![],
        )
        .with_event(
            event(2, "2026-10-25 12:00:00", Some(200)),
            AgendaRecord { id: 200, label: "Later".to_string() },
            vec![],
        )
        .with_event(
            event(3, "2026-10-18 12:00:00", Some(300)),
            AgendaRecord { id: 300, label: "Today".to_string() },
            vec![
                item(1, 30, "Sermon", None, false),
                item(2, 10, "Worship", None, true),
                item(3, 20, "Song slot", Some(42), false),
                item(4, 15, "Welcome", None, false),
            ],
        )
        .with_event(
            event(4, "2026-10-18 10:00:00", None),
            AgendaRecord { id: 400, label: "No agenda".to_string() },
            vec![],
        )
        .with_songs(songs())
}

#[tokio::test]
async fn reload_selects_the_soonest_upcoming_event_with_an_agenda() {
    let session = Session::load(&remote(), now()).await.unwrap();

    assert_eq!(session.event().id, 3);
    assert_eq!(session.agenda().id(), 300);
    assert_eq!(session.agenda().name(), "Today");

    let names: Vec<_> = session
        .agenda()
        .items()
        .map(|i| i.display_name().to_string())
        .collect();
    assert_eq!(names, ["Welcome", "Amazing Grace", "Sermon"]);
}

#[tokio::test]
async fn reload_without_candidates_reports_no_upcoming_event() {
    let remote = InMemoryRemote::new().with_event(
        event(1, "2020-01-01 00:00:00", Some(1)),
        AgendaRecord { id: 1, label: "Old".to_string() },
        vec![],
    );

    let err = Session::load(&remote, now()).await.unwrap_err();
    assert!(matches!(err, ControlError::NoUpcomingEvent));
}

#[tokio::test]
async fn reload_rejects_items_on_sentinel_sortkeys() {
    let remote = InMemoryRemote::new().with_event(
        event(1, "2026-10-18 12:00:00", Some(1)),
        AgendaRecord { id: 1, label: "Broken".to_string() },
        vec![item(7, -2, "Collides with end", None, false)],
    );

    let err = Session::load(&remote, now()).await.unwrap_err();
    assert!(matches!(
        err,
        ControlError::Agenda(AgendaError::SentinelSortkey { item_id: 7, sortkey: -2 })
    ));
}

#[tokio::test]
async fn reload_failure_is_a_remote_error() {
    let remote = remote();
    remote.fail_next_calls(1);

    let err = Session::load(&remote, now()).await.unwrap_err();
    assert!(matches!(err, ControlError::RemoteUnavailable(RemoteError::Transport(_))));
}

#[test]
fn next_event_ignores_unparsable_and_agenda_less_events() {
    assert!(Event::from_record(event(1, "tomorrow", Some(1))).is_err());

    let inline = EventRecord {
        agenda: Some(json!(true)),
        ..event(2, "2026-10-19 08:00:00", None)
    };
    let events = [inline, event(3, "2026-10-18 09:00:00", None), event(4, "2026-10-20 08:00:00", Some(4))]
        .into_iter()
        .map(|r| Event::from_record(r).unwrap());

    let picked = select_next_event(events, now()).unwrap();
    assert_eq!(picked.id, 2);
}

#[test]
fn legacy_payloads_decode_with_string_numbers_and_keyed_maps() {
    let body = json!({
        "status": "success",
        "data": {
            "501": {"id": "501", "sortkey": "3", "header_yn": "0", "bezeichnung": "Welcome", "arrangement_id": null},
            "502": {"id": "502", "sortkey": "1", "header_yn": "1", "bezeichnung": "Start", "arrangement_id": "0"},
            "503": {"id": 503, "sortkey": 8, "header_yn": 0, "bezeichnung": "Song", "arrangement_id": "42"}
        }
    });

    let data = decode_envelope("ChurchService/loadAgendaItems", body).unwrap();
    let mut items = decode::<Keyed<ItemRecord>>("loadAgendaItems", data).unwrap().into_vec();
    items.sort_by_key(|i| i.id);

    assert_eq!(items[0], item(501, 3, "Welcome", None, false));
    assert_eq!(items[1], item(502, 1, "Start", Some(0), true));
    assert_eq!(items[2], item(503, 8, "Song", Some(42), false));
}

#[test]
fn live_position_nulls_read_as_not_started() {
    let empty: LivePositionRecord = decode("pos", json!({"pos_id": null, "addseconds": null})).unwrap();
    assert_eq!(empty, LivePositionRecord::default());

    let set: LivePositionRecord = decode("pos", json!({"pos_id": "4", "addseconds": "-30"})).unwrap();
    assert_eq!((set.position_id, set.extra_seconds), (4, -30));

    assert!(decode::<LivePositionRecord>("pos", json!({"pos_id": "-1"})).is_err());
}

#[test]
fn failed_envelopes_carry_the_server_message() {
    let err = decode_envelope("login/loginWithToken", json!({"status": "error", "message": "bad token"})).unwrap_err();
    match err {
        RemoteError::Envelope { call, message } => {
            assert_eq!(call, "login/loginWithToken");
            assert_eq!(message, "bad token");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(decode_envelope("x", json!({"data": []})).is_err());
}

#[test]
fn header_flag_is_set_only_by_one() {
    let header = |flag: serde_json::Value| {
        decode::<ItemRecord>(
            "loadAgendaItems",
            json!({"id": 1, "sortkey": 1, "header_yn": flag, "bezeichnung": "x"}),
        )
        .unwrap()
        .is_header
    };

    assert!(header(json!("1")));
    assert!(header(json!(1)));
    assert!(!header(json!("2")));
    assert!(!header(json!(-1)));
    assert!(!header(json!(null)));
}

#[test]
fn fractional_numbers_are_rejected_instead_of_truncated() {
    let item = |sortkey: serde_json::Value| {
        decode::<ItemRecord>("loadAgendaItems", json!({"id": 1, "sortkey": sortkey, "bezeichnung": "x"}))
    };

    assert_eq!(item(json!(3.0)).unwrap().sortkey, 3);
    assert!(matches!(item(json!(2.7)), Err(RemoteError::Decode(_))));
    assert!(matches!(item(json!("2.7")), Err(RemoteError::Decode(_))));
}

#[test]
fn inline_agenda_marker_follows_truthiness() {
    let with_marker = |marker: serde_json::Value| EventRecord {
        agenda: Some(marker),
        ..event(1, "2026-10-19 08:00:00", None)
    };

    assert!(with_marker(json!("0")).has_agenda());
    assert!(with_marker(json!("yes")).has_agenda());
    assert!(with_marker(json!({})).has_agenda());
    assert!(!with_marker(json!("")).has_agenda());
    assert!(!with_marker(json!(0)).has_agenda());
    assert!(!with_marker(json!(false)).has_agenda());
    assert!(!event(1, "2026-10-19 08:00:00", None).has_agenda());
}
