//! Tests for datagram decoding, registration and mapping.

mod common;

use common::{Call, RecordingPublisher};
use glam::{DQuat, DVec3, EulerRot};
use json_livelink::{
    BasicMapper, CameraMapper, CancellationToken, DecodeError, DecodeOutcome, Endpoint, FrameData,
    LensChannels, MalformedFieldPolicy, PacketDecoder, PayloadMapper, Role, SourceId, StaticData,
};

fn decoder_with(mapper: impl PayloadMapper + 'static, policy: MalformedFieldPolicy) -> PacketDecoder {
    PacketDecoder::new(
        SourceId::next(),
        Endpoint::localhost(54321),
        Box::new(mapper),
        policy,
        CancellationToken::new(),
    )
}

fn basic_decoder() -> PacketDecoder {
    decoder_with(BasicMapper, MalformedFieldPolicy::AbortDatagram)
}

fn subject_names(calls: &[Call]) -> Vec<String> {
    calls.iter().map(|call| call.subject().name.to_string()).collect()
}

#[test]
fn test_first_sight_registers_once() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();
    let datagram = br#"{"camA": {"UserData": [0,1,2,3,4,5,6,7,8,9]}}"#;

    for _ in 0..3 {
        decoder.decode(datagram, &mut publisher).unwrap();
    }

    let calls = publisher.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[0].is_register());
    assert!(calls[1..].iter().all(|call| !call.is_register()));
    assert_eq!(decoder.registry().len(), 1);
}

#[test]
fn test_registration_precedes_first_frame() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();

    let outcome = decoder
        .decode(br#"{"a": {"UserData": [0,0,0,0,0,0,0,0,0,0]}}"#, &mut publisher)
        .unwrap();
    assert_eq!(outcome.registered, 1);
    assert_eq!(outcome.published, 1);

    match &publisher.calls()[..] {
        [Call::Register { subject: registered, role, .. }, Call::Frame { subject: framed, .. }] => {
            assert_eq!(registered, framed);
            assert_eq!(*role, Role::Basic);
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

#[test]
fn test_subject_names_are_endpoint_scoped() {
    let mut publisher = RecordingPublisher::new();
    let datagram = br#"{"camA": {"UserData": [0,0,0,0,0,0,0,0,0,0]}}"#;

    let mut first = PacketDecoder::new(
        SourceId::next(),
        Endpoint::localhost(5000),
        Box::new(BasicMapper),
        MalformedFieldPolicy::AbortDatagram,
        CancellationToken::new(),
    );
    let mut second = PacketDecoder::new(
        SourceId::next(),
        Endpoint::localhost(5001),
        Box::new(BasicMapper),
        MalformedFieldPolicy::AbortDatagram,
        CancellationToken::new(),
    );
    first.decode(datagram, &mut publisher).unwrap();
    second.decode(datagram, &mut publisher).unwrap();

    let registrations = publisher.registrations();
    assert_eq!(
        subject_names(&registrations),
        vec!["camA@127.0.0.1:5000", "camA@127.0.0.1:5001"]
    );
    assert_ne!(registrations[0].subject(), registrations[1].subject());
}

#[test]
fn test_fields_processed_in_document_order() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();
    let datagram = br#"{
        "zeta":  {"UserData": [0,0,0,0,0,0,0,0,0,0]},
        "alpha": {"UserData": [0,0,0,0,0,0,0,0,0,0]},
        "mid":   {"UserData": [0,0,0,0,0,0,0,0,0,0]}
    }"#;

    decoder.decode(datagram, &mut publisher).unwrap();

    let names: Vec<String> = publisher
        .frames()
        .iter()
        .map(|(subject, _)| subject.name.field().to_string())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_malformed_field_aborts_rest_of_datagram() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();
    let datagram = br#"{
        "good": {"UserData": [0,1,2,3,4,5,6,7,8,9]},
        "bad":  {"UserData": [0,1,2,3,4,5,6,7,8]},
        "late": {"UserData": [0,1,2,3,4,5,6,7,8,9]}
    }"#;

    let outcome = decoder.decode(datagram, &mut publisher).unwrap();

    assert_eq!(outcome.aborted_at, Some(1));
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.malformed, 1);
    assert_eq!(outcome.published, 1);

    // "good" fully processed, "bad" registered only, "late" untouched.
    assert_eq!(
        subject_names(&publisher.calls()),
        vec![
            "good@127.0.0.1:54321",
            "good@127.0.0.1:54321",
            "bad@127.0.0.1:54321"
        ]
    );
    assert_eq!(publisher.frames().len(), 1);
    assert_eq!(decoder.registry().len(), 2);
}

#[test]
fn test_short_user_data_registers_without_frame() {
    let mut decoder = decoder_with(CameraMapper::new(), MalformedFieldPolicy::AbortDatagram);
    let mut publisher = RecordingPublisher::new();

    decoder
        .decode(br#"{"camA": {"UserData": [1,2,3,4,5,6,7,8,9]}}"#, &mut publisher)
        .unwrap();

    assert_eq!(publisher.registrations().len(), 1);
    assert!(publisher.frames().is_empty());
}

#[test]
fn test_skip_field_policy_continues() {
    let mut decoder = decoder_with(BasicMapper, MalformedFieldPolicy::SkipField);
    let mut publisher = RecordingPublisher::new();
    let datagram = br#"{
        "bad":  {"UserData": "oops"},
        "late": {"UserData": [0,1,2,3,4,5,6,7,8,9]}
    }"#;

    let outcome = decoder.decode(datagram, &mut publisher).unwrap();

    assert!(!outcome.was_aborted());
    assert_eq!(outcome.malformed, 1);
    assert_eq!(outcome.published, 1);
    assert_eq!(publisher.registrations().len(), 2);
}

#[test]
fn test_non_object_subject_value_is_malformed() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();

    let outcome = decoder
        .decode(br#"{"a": [0,1,2,3,4,5,6,7,8,9], "b": {"UserData": [0,0,0,0,0,0,0,0,0,0]}}"#, &mut publisher)
        .unwrap();

    assert_eq!(outcome.aborted_at, Some(0));
    assert_eq!(publisher.len(), 1);
}

#[test]
fn test_invalid_json_is_discarded_whole() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();

    let result = decoder.decode(br#"{"a": {"UserData": [0,0,0"#, &mut publisher);
    assert!(matches!(result, Err(DecodeError::InvalidJson(_))));

    let result = decoder.decode(b"[1, 2, 3]", &mut publisher);
    assert!(matches!(result, Err(DecodeError::NotAnObject { found: "array" })));

    assert_eq!(publisher.len(), 0);
    assert!(decoder.registry().is_empty());
}

#[test]
fn test_basic_values_are_exact() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();

    decoder
        .decode(
            br#"{"s": {"UserData": [-1.25, 0, 3.5e2, 1e-3, 4, 5, 6, 7, 8, 123456789]}}"#,
            &mut publisher,
        )
        .unwrap();

    let frames = publisher.frames();
    let FrameData::Basic(frame) = &frames[0].1 else {
        panic!("expected basic frame");
    };
    assert_eq!(
        frame.property_values,
        vec![-1.25, 0.0, 350.0, 0.001, 4.0, 5.0, 6.0, 7.0, 8.0, 123456789.0]
    );

    let StaticData::Basic(schema) = (match &publisher.registrations()[0] {
        Call::Register { data, .. } => data.clone(),
        other => panic!("expected registration, got {other:?}"),
    }) else {
        panic!("expected basic static data");
    };
    assert_eq!(schema.property_names.len(), frame.property_values.len());
}

#[test]
fn test_camera_scenario() {
    let mut decoder = decoder_with(CameraMapper::new(), MalformedFieldPolicy::AbortDatagram);
    let mut publisher = RecordingPublisher::new();

    decoder
        .decode(br#"{"camA": {"UserData": [1,2,3,10,20,30,0,0,0,0]}}"#, &mut publisher)
        .unwrap();

    let calls = publisher.calls();
    assert_eq!(calls.len(), 2);

    let Call::Register { subject, role, data } = &calls[0] else {
        panic!("expected registration first");
    };
    assert_eq!(subject.name.as_str(), "camA@127.0.0.1:54321");
    assert_eq!(*role, Role::Camera);
    let StaticData::Camera(flags) = data else {
        panic!("expected camera static data");
    };
    assert!(flags.is_focal_length_supported);
    assert!(flags.is_focus_distance_supported);
    assert!(flags.is_aperture_supported);

    let Call::Frame { frame: FrameData::Camera(frame), .. } = &calls[1] else {
        panic!("expected camera frame second");
    };
    assert_eq!(frame.transform.translation, DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(frame.transform.scale, DVec3::ONE);

    // Roll 10, pitch 20, yaw 30 in the left-handed rotator convention.
    let expected = DQuat::from_euler(
        EulerRot::ZYX,
        30f64.to_radians(),
        -20f64.to_radians(),
        -10f64.to_radians(),
    );
    assert!(frame.transform.rotation.abs_diff_eq(expected, 1e-9));
    let expected = DQuat::from_xyzw(-0.0381346, -0.1893079, 0.2392983, 0.9515485);
    assert!(frame.transform.rotation.abs_diff_eq(expected, 1e-6));

    assert_eq!(frame.focal_length, 1.0);
    assert_eq!(frame.focus_distance, 2.0);
    assert_eq!(frame.aperture, 3.0);
}

#[test]
fn test_camera_direct_lens_channels() {
    let mapper = CameraMapper::new().lens_channels(LensChannels::Direct);
    let mut decoder = decoder_with(mapper, MalformedFieldPolicy::AbortDatagram);
    let mut publisher = RecordingPublisher::new();

    decoder
        .decode(br#"{"camA": {"UserData": [1,2,3,0,0,0,35,250,2.8,7]}}"#, &mut publisher)
        .unwrap();

    let FrameData::Camera(frame) = &publisher.frames()[0].1 else {
        panic!("expected camera frame");
    };
    assert_eq!(frame.focal_length, 35.0);
    assert_eq!(frame.focus_distance, 250.0);
    assert_eq!(frame.aperture, 2.8);
}

#[test]
fn test_stopping_suppresses_frames_but_not_registration() {
    let stopping = CancellationToken::new();
    let mut decoder = PacketDecoder::new(
        SourceId::next(),
        Endpoint::localhost(54321),
        Box::new(BasicMapper),
        MalformedFieldPolicy::AbortDatagram,
        stopping.clone(),
    );
    let mut publisher = RecordingPublisher::new();

    stopping.cancel();
    let outcome = decoder
        .decode(br#"{"a": {"UserData": [0,0,0,0,0,0,0,0,0,0]}}"#, &mut publisher)
        .unwrap();

    assert_eq!(outcome.registered, 1);
    assert_eq!(outcome.suppressed, 1);
    assert_eq!(outcome.published, 0);
    assert_eq!(publisher.registrations().len(), 1);
    assert!(publisher.frames().is_empty());
}

#[test]
fn test_malformed_field_aborts_while_stopping() {
    let stopping = CancellationToken::new();
    let mut decoder = PacketDecoder::new(
        SourceId::next(),
        Endpoint::localhost(54321),
        Box::new(BasicMapper),
        MalformedFieldPolicy::AbortDatagram,
        stopping.clone(),
    );
    let mut publisher = RecordingPublisher::new();

    stopping.cancel();
    let outcome = decoder
        .decode(
            br#"{"bad": {"UserData": [1]}, "late": {"UserData": [0,1,2,3,4,5,6,7,8,9]}}"#,
            &mut publisher,
        )
        .unwrap();

    assert_eq!(outcome.registered, 1);
    assert_eq!(outcome.malformed, 1);
    assert_eq!(outcome.aborted_at, Some(0));
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.suppressed, 0);
    assert_eq!(subject_names(&publisher.calls()), vec!["bad@127.0.0.1:54321"]);
    assert!(publisher.frames().is_empty());
    assert_eq!(decoder.registry().len(), 1);
}

#[test]
fn test_empty_object_is_a_no_op() {
    let mut decoder = basic_decoder();
    let mut publisher = RecordingPublisher::new();

    let outcome = decoder.decode(b"{}", &mut publisher).unwrap();
    assert_eq!(outcome, DecodeOutcome::default());
    assert_eq!(publisher.len(), 0);
}
