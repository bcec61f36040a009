use platform_utils::core::whiteboard::live_elements;
use platform_utils::{diff_elements, merge_elements, Element};
use serde_json::json;

fn parse(value: serde_json::Value) -> Vec<Element> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_two_clients_converge_after_exchanging_changes() {
    let base = parse(json!([
        {"id": "r1", "type": "rectangle", "version": 1, "versionNonce": 10, "x": 0},
        {"id": "t1", "type": "text", "version": 1, "versionNonce": 20, "text": "hi"}
    ]));

    // Client A moves the rectangle; client B edits the text and adds an arrow.
    let mut client_a = base.clone();
    client_a[0] = parse(json!([
        {"id": "r1", "type": "rectangle", "version": 2, "versionNonce": 11, "x": 40}
    ]))
    .remove(0);

    let mut client_b = base.clone();
    client_b[1] = parse(json!([
        {"id": "t1", "type": "text", "version": 2, "versionNonce": 21, "text": "hello"}
    ]))
    .remove(0);
    client_b.extend(parse(json!([
        {"id": "a1", "type": "arrow", "version": 1, "versionNonce": 30}
    ])));

    // Each side broadcasts only what changed since the shared base.
    let from_a = diff_elements(&base, &client_a);
    let from_b = diff_elements(&base, &client_b);
    assert_eq!(from_a.updated.len(), 1);
    assert_eq!(from_b.updated.len(), 1);
    assert_eq!(from_b.inserted.len(), 1);

    let a_incoming: Vec<Element> = from_b.inserted.iter().chain(&from_b.updated).cloned().collect();
    let b_incoming: Vec<Element> = from_a.inserted.iter().chain(&from_a.updated).cloned().collect();

    let merged_a = merge_elements(&client_a, &a_incoming);
    let merged_b = merge_elements(&client_b, &b_incoming);

    let mut ids_a: Vec<_> = merged_a.iter().map(|e| e.id.clone()).collect();
    let mut ids_b: Vec<_> = merged_b.iter().map(|e| e.id.clone()).collect();
    ids_a.sort();
    ids_b.sort();
    assert_eq!(ids_a, ids_b);

    for element in &merged_a {
        let twin = merged_b.iter().find(|e| e.id == element.id).unwrap();
        assert_eq!(element, twin);
    }
    assert_eq!(merged_a[0].properties["x"], 40);
}

#[test]
fn test_concurrent_edit_with_same_version_resolves_identically() {
    let ours = parse(json!([{"id": "r1", "version": 3, "versionNonce": 500, "fill": "red"}]));
    let theirs = parse(json!([{"id": "r1", "version": 3, "versionNonce": 120, "fill": "blue"}]));

    let on_our_side = merge_elements(&ours, &theirs);
    let on_their_side = merge_elements(&theirs, &ours);

    assert_eq!(on_our_side, on_their_side);
    assert_eq!(on_our_side[0].properties["fill"], "blue");
}

#[test]
fn test_remote_delete_propagates_and_is_dropped_on_save() {
    let local = parse(json!([
        {"id": "r1", "version": 2, "versionNonce": 1},
        {"id": "r2", "version": 1, "versionNonce": 2}
    ]));
    let remote = parse(json!([
        {"id": "r2", "version": 2, "versionNonce": 3, "isDeleted": true}
    ]));

    let merged = merge_elements(&local, &remote);
    let changes = diff_elements(&local, &merged);

    assert_eq!(changes.deleted, vec!["r2".to_string()]);
    assert_eq!(live_elements(&merged).len(), 1);
}
