use wbxml_codec::{Decoder, Element, Encoder, Parser, TagName, TagTable};

fn table() -> TagTable {
    wbxml_eas::registry().expect("static pages build")
}

fn tag(name: &str) -> TagName {
    name.into()
}

/// Sync response carrying a change and two deletes, as a server would send it.
fn sync_response(table: &TagTable) -> Vec<u8> {
    let mut enc = Encoder::new(table);
    enc.open("AirSync:Sync").expect("sync");
    enc.open("AirSync:Collections").expect("collections");
    enc.open("AirSync:Collection").expect("collection");
    enc.text("AirSync:SyncKey", "42").expect("key");
    enc.text("AirSync:CollectionId", "5").expect("collection id");
    enc.text_int("AirSync:Status", 1).expect("status");
    enc.open("AirSync:Commands").expect("commands");
    enc.open("AirSync:Change").expect("change");
    enc.text("AirSync:ServerId", "5:3").expect("server id");
    enc.open("AirSync:ApplicationData").expect("data");
    enc.text_int("Email:Read", 1).expect("read");
    enc.close().expect("data").close().expect("change");
    for id in ["5:1", "5:2"] {
        enc.open("AirSync:Delete").expect("delete");
        enc.text("AirSync:ServerId", id).expect("server id");
        enc.close().expect("delete");
    }
    enc.close().expect("commands");
    enc.close().expect("collection").close().expect("collections").close().expect("sync");
    enc.finish().expect("balanced")
}

#[test]
fn parser_collects_deleted_server_ids() {
    let table = table();
    let bytes = sync_response(&table);
    let mut parser = Parser::new(&table, &bytes).expect("preamble");

    let mut deleted = Vec::new();
    let mut read_flags = Vec::new();
    let mut status = None;
    while let Some(tag) = parser.next_tag(None).expect("valid") {
        match tag.as_ref() {
            "AirSync:Status" => status = Some(parser.value_int().expect("status")),
            "AirSync:Delete" => {
                while let Some(inner) = parser.next_tag(Some(&tag)).expect("valid") {
                    if inner.as_ref() == "AirSync:ServerId" {
                        deleted.push(parser.value().expect("server id"));
                    } else {
                        parser.skip_tag().expect("skip");
                    }
                }
            }
            "AirSync:Change" => {
                while let Some(inner) = parser.next_tag(Some(&tag)).expect("valid") {
                    match inner.as_ref() {
                        "AirSync:ApplicationData" => {}
                        "Email:Read" => read_flags.push(parser.value_int().expect("read")),
                        _ => parser.skip_tag().expect("skip"),
                    }
                }
            }
            "AirSync:SyncKey" | "AirSync:CollectionId" => parser.skip_tag().expect("skip"),
            _ => {}
        }
    }
    assert_eq!(status, Some(1));
    assert_eq!(deleted, vec!["5:1", "5:2"]);
    assert_eq!(read_flags, vec![1]);
}

#[test]
fn cross_page_tags_switch_pages_once_each_way() {
    let table = table();
    let bytes = sync_response(&table);
    let switches: Vec<u8> = bytes[4..]
        .windows(2)
        .filter(|w| w[0] == 0x00 && (w[1] == wbxml_eas::EMAIL || w[1] == wbxml_eas::AIRSYNC))
        .map(|w| w[1])
        .collect();
    // Page 0 is current from the start; only the Email detour and its return appear.
    assert_eq!(switches, vec![wbxml_eas::EMAIL, wbxml_eas::AIRSYNC]);
}

#[test]
fn sync_options_fragment_round_trips_as_tree() {
    let table = table();
    let options = Element::with_children(
        "AirSync:Options",
        vec![
            Element::text("AirSync:FilterType", "3"),
            Element::empty("AirSync:MIMESupport"),
            Element::with_children(
                "AirSyncBase:BodyPreference",
                vec![
                    Element::text("AirSyncBase:Type", "2"),
                    Element::text("AirSyncBase:TruncationSize", "200000"),
                ],
            ),
        ],
    );

    let mut enc = Encoder::new(&table);
    enc.write_element(&options).expect("writes");
    let bytes = enc.finish().expect("balanced");

    let decoded = Decoder::new(&table).decode_tree(&bytes).expect("decodes");
    assert_eq!(decoded, vec![options]);
    let preference = decoded[0].child(&tag("AirSyncBase:BodyPreference")).expect("child");
    assert_eq!(
        preference.child(&tag("AirSyncBase:TruncationSize")).and_then(Element::text_value),
        Some("200000")
    );
}

#[test]
fn folder_sync_reply_decodes_display_names() {
    let table = table();
    let mut enc = Encoder::new(&table);
    enc.open("FolderHierarchy:FolderSync").expect("folder sync");
    enc.text_int("FolderHierarchy:Status", 1).expect("status");
    enc.text("FolderHierarchy:SyncKey", "1").expect("key");
    enc.open("FolderHierarchy:Changes").expect("changes");
    enc.text_int("FolderHierarchy:Count", 2).expect("count");
    for (id, name) in [("2", "Inbox"), ("5", "Sent Items")] {
        enc.open("FolderHierarchy:Add").expect("add");
        enc.text("FolderHierarchy:ServerId", id).expect("id");
        enc.text("FolderHierarchy:ParentId", "0").expect("parent");
        enc.text("FolderHierarchy:DisplayName", name).expect("name");
        enc.close().expect("add");
    }
    enc.close().expect("changes").close().expect("folder sync");
    let bytes = enc.finish().expect("balanced");

    let root = Decoder::new(&table).decode_tree(&bytes).expect("decodes").remove(0);
    let changes = root.child(&tag("FolderHierarchy:Changes")).expect("changes");
    let names: Vec<&str> = changes
        .children()
        .iter()
        .filter_map(|add| add.child(&tag("FolderHierarchy:DisplayName")))
        .filter_map(Element::text_value)
        .collect();
    assert_eq!(names, vec!["Inbox", "Sent Items"]);
}
