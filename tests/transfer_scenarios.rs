//! Transfer Scenario Tests
//!
//! End-to-end generations over in-memory snapshots.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

use spectera_transfer::transfer::{
    graft_routing, PartialMapping, Routing, SelectionMode,
};
use spectera_transfer::{
    Device, Generation, GenerationRequest, Snapshot, TransferError, TransferSession, Uid,
};

fn snapshot(value: Value) -> Snapshot {
    serde_json::from_value(value).expect("valid snapshot")
}

fn accept_all(_: &PartialMapping) -> bool {
    true
}

fn generate(session: &TransferSession, request: GenerationRequest) -> Generation {
    session
        .generate(&request, &mut accept_all)
        .expect("generation succeeds")
}

/// Source with four devices and a routing table touching each of them.
fn rig_source() -> Snapshot {
    snapshot(json!({
        "deviceName": "Base A",
        "pairedDevices": [
            { "mtUid": 1, "name": "Vox", "iemAudiolinkId": 10, "micAudiolinkId": 11, "rf": "A1" },
            { "mtUid": 2, "name": "Gtr", "micAudiolinkId": 12 },
            { "mtUid": 3, "name": "Bass", "iemAudiolinkId": -1 },
            { "mtUid": 4, "name": "Keys", "iemAudiolinkId": 13 }
        ],
        "audiolinks": [
            { "audiolinkId": 10, "kind": "iem" },
            { "audiolinkId": 11, "kind": "mic" },
            { "audiolinkId": 12, "kind": "mic" },
            { "audiolinkId": 13, "kind": "iem" }
        ],
        "audioInputs": [
            { "inputId": 1, "iemAudiolinkId": 10, "source": "Dante 1" },
            { "inputId": 2, "iemAudiolinkId": 13, "source": "Dante 2" }
        ],
        "audioOutputs": [
            { "outputId": 1, "micAudiolinkId": 11, "dest": "XLR 1" },
            { "outputId": 2, "micAudiolinkId": 12, "dest": "XLR 2" }
        ]
    }))
}

fn rig_target(uids: &[u64]) -> Snapshot {
    let devices: Vec<Value> = uids.iter().map(|uid| json!({ "mtUid": uid })).collect();
    snapshot(json!({
        "deviceName": "Base B",
        "network": { "ip": "10.0.0.2", "dhcp": false },
        "pairedDevices": devices,
        "audiolinks": [ { "audiolinkId": 11, "kind": "target-mic" } ],
        "audioInputs": [ { "inputId": 9, "source": "Local" } ],
        "audioOutputs": []
    }))
}

#[test]
fn scenario_a_positional_mapping() {
    let session = TransferSession::new(
        snapshot(json!({
            "pairedDevices": [
                { "mtUid": 1, "iemAudiolinkId": 5 },
                { "mtUid": 2, "micAudiolinkId": 7 }
            ]
        })),
        snapshot(json!({ "pairedDevices": [ { "mtUid": 100 }, { "mtUid": 200 } ] })),
    );

    let generation = generate(&session, GenerationRequest::selected(vec![true, true]));

    assert_eq!(generation.mapping.get(&Uid::from(1u64)), Some(&Uid::from(100u64)));
    assert_eq!(generation.mapping.get(&Uid::from(2u64)), Some(&Uid::from(200u64)));
    assert_eq!(
        serde_json::to_value(&generation.snapshot.paired_devices).unwrap(),
        json!([
            { "mtUid": 100, "iemAudiolinkId": 5 },
            { "mtUid": 200, "micAudiolinkId": 7 }
        ])
    );
}

#[test]
fn scenario_b_identity_fallback_and_warning() {
    let session = TransferSession::new(
        snapshot(json!({ "pairedDevices": [ { "mtUid": 1 }, { "mtUid": 2 }, { "mtUid": 3 } ] })),
        snapshot(json!({ "pairedDevices": [ { "mtUid": 100 } ] })),
    );

    let mut warnings = Vec::new();
    let mut confirm = |warning: &PartialMapping| {
        warnings.push(*warning);
        true
    };
    let generation = session
        .generate(&GenerationRequest::all(), &mut confirm)
        .unwrap();

    assert_eq!(warnings, vec![PartialMapping { mapped: 1, selected: 3 }]);
    let uids: Vec<Uid> = generation
        .snapshot
        .paired_devices
        .iter()
        .map(|d| d.mt_uid.clone())
        .collect();
    assert_eq!(uids, vec![Uid::from(100u64), Uid::from(2u64), Uid::from(3u64)]);
    assert_eq!(generation.mapping.mapped_count(), 1);
}

#[test]
fn scenario_c_transfer_all_overrides_flags() {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 200, 300, 400]));
    let request = GenerationRequest {
        mode: SelectionMode::TransferAll,
        checked: vec![false, true, false, false],
    };

    let generation = generate(&session, request);
    assert_eq!(generation.snapshot.paired_devices.len(), 4);
}

#[test]
fn scenario_d_no_target_devices() {
    let session = TransferSession::new(rig_source(), rig_target(&[]));

    let err = session
        .generate(&GenerationRequest::all(), &mut accept_all)
        .unwrap_err();

    assert!(matches!(err, TransferError::NoTargetDevices));
    assert!(!err.recovery_suggestions().is_empty());
}

#[test]
fn scenario_e_only_used_links_travel() {
    let session = TransferSession::new(
        snapshot(json!({
            "pairedDevices": [
                { "mtUid": 1, "iemAudiolinkId": 5 },
                { "mtUid": 2, "iemAudiolinkId": 6 }
            ],
            "audiolinks": [
                { "audiolinkId": 5, "name": "IEM A", "gain": -3 },
                { "audiolinkId": 6, "name": "IEM B" }
            ]
        })),
        snapshot(json!({ "pairedDevices": [ { "mtUid": 100 }, { "mtUid": 200 } ] })),
    );

    let generation = generate(&session, GenerationRequest::selected(vec![true, false]));

    assert_eq!(
        serde_json::to_value(&generation.snapshot.audiolinks).unwrap(),
        json!([ { "audiolinkId": 5, "name": "IEM A", "gain": -3 } ])
    );
}

#[test]
fn target_top_level_fields_pass_through() {
    let target = rig_target(&[100, 200]);
    let session = TransferSession::new(rig_source(), target.clone());

    let generation = generate(&session, GenerationRequest::selected(vec![true, true]));

    assert_eq!(generation.snapshot.extra, target.extra);
    assert_eq!(generation.snapshot.extra["deviceName"], json!("Base B"));
}

#[test_case(vec![true, false, false, false], 1 ; "single device")]
#[test_case(vec![false, true, true], 2 ; "short flag list")]
#[test_case(vec![true, true, true, true], 4 ; "every device")]
fn output_device_count_matches_selection(checked: Vec<bool>, expected: usize) {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 200]));
    let generation = generate(&session, GenerationRequest::selected(checked));
    assert_eq!(generation.snapshot.paired_devices.len(), expected);
}

#[test_case(0, Uid::from(100u64) ; "slot 0 mapped")]
#[test_case(1, Uid::from(200u64) ; "slot 1 mapped")]
#[test_case(2, Uid::from(3u64) ; "slot 2 keeps source uid")]
#[test_case(3, Uid::from(4u64) ; "slot 3 keeps source uid")]
fn selected_device_uid_follows_slot(index: usize, expected: Uid) {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 200]));
    let mut checked = vec![false; 4];
    checked[index] = true;

    let generation = generate(&session, GenerationRequest::selected(checked));
    assert_eq!(generation.snapshot.paired_devices[0].mt_uid, expected);
}

#[test]
fn device_fields_other_than_uid_keep_source_values() {
    let source = rig_source();
    let session = TransferSession::new(source.clone(), rig_target(&[100]));

    let generation = generate(&session, GenerationRequest::selected(vec![true]));

    let mut expected: Device = source.paired_devices[0].clone();
    expected.mt_uid = Uid::from(100u64);
    assert_eq!(generation.snapshot.paired_devices[0], expected);
}

#[test]
fn shared_link_appears_once() {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 200]));

    let generation = generate(&session, GenerationRequest::selected(vec![true, true]));

    let ids: Vec<i64> = generation
        .snapshot
        .audiolinks
        .iter()
        .map(|l| l.audiolink_id)
        .collect();
    assert_eq!(ids, vec![11, 10, 12]);
    assert_eq!(generation.snapshot.audiolinks[0].extra["kind"], json!("target-mic"));
}

#[test]
fn routing_merge_keeps_target_entries_first() {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 200, 300, 400]));

    let generation = generate(&session, GenerationRequest::all());

    let inputs: Vec<i64> = generation.snapshot.audio_inputs.iter().map(|i| i.input_id).collect();
    let outputs: Vec<i64> = generation.snapshot.audio_outputs.iter().map(|o| o.output_id).collect();
    assert_eq!(inputs, vec![9, 1, 2]);
    assert_eq!(outputs, vec![1, 2]);
}

#[test]
fn regrafting_output_is_stable() {
    let source = rig_source();
    let session = TransferSession::new(source.clone(), rig_target(&[100, 200]));
    let generation = generate(&session, GenerationRequest::selected(vec![true, true, false, true]));

    let selected = [
        &source.paired_devices[0],
        &source.paired_devices[1],
        &source.paired_devices[3],
    ];
    let (again, summary) = graft_routing(&source, selected, &Routing::of(&generation.snapshot));

    assert_eq!(again, Routing::of(&generation.snapshot));
    assert_eq!(summary.links_added + summary.inputs_added + summary.outputs_added, 0);
}

#[test]
fn summary_counts_changed_uids() {
    let session = TransferSession::new(rig_source(), rig_target(&[100, 2]));

    let generation = generate(&session, GenerationRequest::selected(vec![true, true]));

    assert_eq!(generation.summary(), "Transferred 2 device(s), 1 UIDs mapped");
}

#[test]
fn null_link_fields_come_through_unchanged() {
    let session = TransferSession::new(
        snapshot(json!({
            "pairedDevices": [ { "mtUid": 1, "micAudiolinkId": null } ]
        })),
        snapshot(json!({
            "pairedDevices": [ { "mtUid": 100 } ],
            "audioInputs": [ { "inputId": 3, "iemAudiolinkId": null, "gain": 1 } ]
        })),
    );

    let generation = generate(&session, GenerationRequest::all());

    assert_eq!(
        serde_json::to_string(&generation.snapshot.paired_devices).unwrap(),
        r#"[{"mtUid":100,"micAudiolinkId":null}]"#
    );
    assert_eq!(
        serde_json::to_string(&generation.snapshot.audio_inputs).unwrap(),
        r#"[{"inputId":3,"iemAudiolinkId":null,"gain":1}]"#
    );
    assert!(generation.snapshot.audiolinks.is_empty());
}

#[test_case(json!(-7), json!(-7) ; "negative source uid")]
#[test_case(json!(2.5), json!(2.5) ; "float source uid")]
#[test_case(json!("A1"), json!("A1") ; "text source uid")]
fn unusual_uids_map_and_fall_back(source_uid: Value, written: Value) {
    let session = TransferSession::new(
        snapshot(json!({ "pairedDevices": [ { "mtUid": -1 }, { "mtUid": source_uid } ] })),
        snapshot(json!({ "pairedDevices": [ { "mtUid": -300 } ] })),
    );

    let generation = generate(&session, GenerationRequest::all());

    let uids = serde_json::to_value(&generation.snapshot.paired_devices).unwrap();
    assert_eq!(uids, json!([ { "mtUid": -300 }, { "mtUid": written } ]));
}
