use agendalive::{
    core::{Agenda, LivePosition},
    error::AgendaError,
    item::{AgendaItem, END_LABEL, ItemKind, START_LABEL},
    remote::records::{ArrangementRecord, ItemRecord, Keyed, SongRecord},
    song::SongCatalog,
};

fn item(id: i64, sortkey: i64, label: &str) -> AgendaItem {
    AgendaItem::from_record(ItemRecord {
        id,
        sortkey,
        is_header: false,
        label: label.to_string(),
        arrangement_id: None,
    })
}

fn header(id: i64, sortkey: i64) -> AgendaItem {
    AgendaItem::from_record(ItemRecord {
        id,
        sortkey,
        is_header: true,
        label: "Header".to_string(),
        arrangement_id: None,
    })
}

fn song_item(id: i64, sortkey: i64, arrangement_id: i64) -> AgendaItem {
    AgendaItem::from_record(ItemRecord {
        id,
        sortkey,
        is_header: false,
        label: "Song slot".to_string(),
        arrangement_id: Some(arrangement_id),
    })
}

fn sparse_agenda() -> Agenda {
    let mut agenda = Agenda::new(7, "Service");
    agenda.add_item(item(105, 5, "Sermon")).unwrap();
    agenda.add_item(item(102, 2, "Welcome")).unwrap();
    agenda.add_item(item(109, 9, "Blessing")).unwrap();
    agenda
}

#[test]
fn empty_agenda_has_only_sentinels() {
    let agenda = Agenda::new(1, "Empty");

    assert_eq!(agenda.last_position_id(), 0);
    assert_eq!(agenda.item_at_position(0).unwrap().kind(), ItemKind::Start);
    assert_eq!(agenda.item_at_position(1).unwrap().kind(), ItemKind::End);
    assert!(agenda.item_at_position(2).is_none());
    assert_eq!(agenda.sortkey_from_position_id(1), -2);
    assert_eq!(agenda.position_id_from_sortkey(-2), Some(1));
}

#[test]
fn sparse_sortkeys_translate_to_dense_ranks() {
    let agenda = sparse_agenda();

    assert_eq!(agenda.position_id_from_sortkey(5), Some(2));
    assert_eq!(agenda.sortkey_from_position_id(1), 2);
    assert_eq!(agenda.last_position_id(), 3);
    assert_eq!(agenda.position_id_from_sortkey(-1), Some(0));
    assert_eq!(agenda.position_id_from_sortkey(-2), Some(4));
    assert_eq!(agenda.position_id_from_sortkey(6), None);
    assert_eq!(agenda.sortkey_from_position_id(0), -1);
    assert_eq!(agenda.sortkey_from_position_id(4), -2);
    assert_eq!(agenda.sortkey_from_position_id(40), -2);

    let names: Vec<_> = agenda.items().map(|i| i.label().to_string()).collect();
    assert_eq!(names, ["Welcome", "Sermon", "Blessing"]);
}

#[test]
fn item_at_position_covers_sentinel_extended_range() {
    let agenda = sparse_agenda();

    let start = agenda.item_at_position(0).unwrap();
    assert_eq!((start.id(), start.sortkey(), start.label()), (-1, -1, START_LABEL));
    assert_eq!(agenda.item_at_position(3).unwrap().id(), 109);
    let end = agenda.item_at_position(4).unwrap();
    assert_eq!((end.id(), end.sortkey(), end.label()), (-2, -2, END_LABEL));
    assert!(agenda.item_at_position(5).is_none());
}

#[test]
fn headers_are_never_addressable() {
    let mut agenda = sparse_agenda();
    agenda.add_item(header(200, 1)).unwrap();
    agenda.add_item(header(201, 7)).unwrap();

    assert_eq!(agenda.len(), 3);
    assert_eq!(agenda.position_id_from_sortkey(1), None);
    assert_eq!(agenda.position_id_from_sortkey(9), Some(3));
}

#[test]
fn later_insert_with_same_sortkey_overwrites() {
    let mut agenda = sparse_agenda();
    agenda.add_item(item(300, 5, "Sermon (replaced)")).unwrap();

    assert_eq!(agenda.len(), 3);
    assert_eq!(agenda.item_at_position(2).unwrap().id(), 300);
}

#[test]
fn sentinel_sortkeys_are_rejected_without_touching_the_agenda() {
    let mut agenda = sparse_agenda();

    let err = agenda.add_item(item(400, -2, "Broken")).unwrap_err();
    assert_eq!(err, AgendaError::SentinelSortkey { item_id: 400, sortkey: -2 });
    assert!(agenda.add_item(item(401, -1, "Broken")).is_err());

    assert_eq!(agenda.last_position_id(), 3);
    assert_eq!(agenda.item_at_position(4).unwrap().kind(), ItemKind::End);
}

#[test]
fn other_negative_sortkeys_sort_before_positive_ones() {
    let mut agenda = sparse_agenda();
    agenda.add_item(item(500, -7, "Pre-service")).unwrap();

    assert_eq!(agenda.position_id_from_sortkey(-7), Some(1));
    assert_eq!(agenda.position_id_from_sortkey(2), Some(2));
    assert_eq!(agenda.last_position_id(), 4);
}

#[test]
fn header_flag_wins_and_zero_arrangement_is_not_a_song() {
    let headed = AgendaItem::from_record(ItemRecord {
        id: 1,
        sortkey: 1,
        is_header: true,
        label: "Worship".to_string(),
        arrangement_id: Some(42),
    });
    assert!(headed.is_header());
    assert!(!headed.is_song());

    let zero = song_item(2, 2, 0);
    assert_eq!(zero.kind(), ItemKind::Plain);
    assert_eq!(zero.arrangement_id(), None);

    assert_eq!(song_item(3, 3, 42).kind(), ItemKind::Song(42));
}

#[test]
fn song_items_take_their_name_from_the_catalog() {
    let catalog = SongCatalog::from_records(vec![SongRecord {
        id: 9,
        label: "Amazing Grace".to_string(),
        arrangements: Keyed(vec![ArrangementRecord {
            id: 42,
            label: "Default".to_string(),
        }]),
    }]);

    let mut agenda = Agenda::new(1, "Service");
    agenda.add_item(song_item(1, 10, 42)).unwrap();
    agenda.add_item(song_item(2, 20, 77)).unwrap();
    agenda.add_item(item(3, 30, "Prayer")).unwrap();

    assert_eq!(agenda.song_items().count(), 2);
    assert_eq!(agenda.link_songs(&catalog), 1);
    // linking again changes nothing
    assert_eq!(agenda.link_songs(&catalog), 1);

    let linked = agenda.item_at_position(1).unwrap();
    assert_eq!(linked.display_name(), "Amazing Grace");
    let arrangement = linked.linked_arrangement().unwrap();
    assert_eq!((arrangement.song_id, arrangement.arrangement_name.as_str()), (9, "Default"));

    assert_eq!(agenda.item_at_position(2).unwrap().display_name(), "Song slot");
    assert_eq!(agenda.item_at_position(3).unwrap().display_name(), "Prayer");
}

#[test]
fn catalog_navigates_from_arrangement_back_to_song() {
    let catalog = SongCatalog::from_records(vec![SongRecord {
        id: 4,
        label: "Be Thou My Vision".to_string(),
        arrangements: Keyed(vec![
            ArrangementRecord { id: 1, label: "Acoustic".to_string() },
            ArrangementRecord { id: 2, label: "Band".to_string() },
        ]),
    }]);

    assert_eq!(catalog.len(), 2);
    let band = catalog.arrangement(2).unwrap();
    assert_eq!(band.name(), "Band");
    assert_eq!(band.song().name, "Be Thou My Vision");
    assert_eq!(band.song().arrangement_ids().len(), 2);
    assert!(catalog.arrangement(3).is_none());
}

#[test]
fn live_position_resolves_neighbours() {
    let agenda = sparse_agenda();

    let middle = LivePosition::new(&agenda, 2, 0);
    assert_eq!(middle.previous_item().unwrap().id(), 102);
    assert_eq!(middle.current_item().unwrap().id(), 105);
    assert_eq!(middle.next_item().unwrap().id(), 109);

    let start = LivePosition::new(&agenda, 0, 0);
    assert!(start.previous_item().is_none());
    assert_eq!(start.next_item().unwrap().id(), 102);
    assert!(start.is_at_start());

    let end = LivePosition::new(&agenda, 4, 30);
    assert_eq!(end.previous_item().unwrap().id(), 109);
    assert_eq!(end.current_item().unwrap().kind(), ItemKind::End);
    assert!(end.next_item().is_none());
    assert!(end.is_at_end());
    assert_eq!(end.to_record().extra_seconds, 30);
}
