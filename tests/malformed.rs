use pretty_assertions::assert_eq;
use smf_codec::prelude::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A format 1 header at 96 ticks per quarter note, declaring `tracks` tracks.
fn header(tracks: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 6, 0, 1]);
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&[0, 96]);
    bytes
}

fn track(declared: u32, body: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend_from_slice(&declared.to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

const NOTE: [u8; 8] = [0x00, 0x90, 0x3C, 0x40, 0x60, 0x80, 0x3C, 0x00];

fn format_error(bytes: &[u8]) -> FormatError {
    match MidiFile::parse(bytes).unwrap_err().error_kind() {
        ReaderErrorKind::Format(e) => e.clone(),
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn well_formed_file() {
    init();
    let mut bytes = header(2);
    bytes.extend(track(8, &NOTE));
    bytes.extend(track(4, &[0x00, 0xFF, 0x2F, 0x00]));

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.track_count(), 2);
    assert_eq!(
        file.tracks()[0].events(),
        &[
            TrackEvent::note_on(0, Channel::One, NoteNumber::C4, DataByte::saturating(0x40)),
            TrackEvent::note_off(0x60, Channel::One, NoteNumber::C4),
        ]
    );
    assert!(file.tracks()[1].is_terminated());
}

#[test]
fn header_tag_must_be_mthd() {
    init();
    let mut bytes = header(1);
    bytes[..4].copy_from_slice(b"RIFF");
    bytes.extend(track(8, &NOTE));

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_format_error());
    assert_eq!(err.position(), 0);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::InvalidHeaderTag(*b"RIFF"))
    );
}

#[test]
fn header_fields_are_validated() {
    init();
    let mut long = header(1);
    long[7] = 8;
    assert_eq!(format_error(&long), FormatError::InvalidHeaderLength(8));

    let mut format = header(1);
    format[9] = 3;
    assert_eq!(format_error(&format), FormatError::UnknownFormat(3));

    let mut division = header(1);
    division[13] = 0;
    assert_eq!(format_error(&division), FormatError::ZeroDivision);

    let mut fps = header(1);
    fps[12] = 0xE4; // -28
    assert_eq!(format_error(&fps), FormatError::InvalidSmpteFps(-28));

    let mut single = header(2);
    single[9] = 0;
    assert_eq!(format_error(&single), FormatError::SingleTrackCount(2));
}

#[test]
fn smpte_divisions_decode() {
    init();
    let mut bytes = header(1);
    bytes[12] = 0xE7; // -25
    bytes[13] = 40;
    bytes.extend(track(8, &NOTE));

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        file.division(),
        Division::Smpte {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40
        }
    );
    assert_eq!(file.division().tpqn(), None);
}

#[test]
fn track_tag_must_be_mtrk() {
    init();
    let mut bytes = header(1);
    let mut chunk = track(8, &NOTE);
    chunk[..4].copy_from_slice(b"XFIH");
    bytes.extend(chunk);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 14);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::InvalidTrackTag(*b"XFIH"))
    );
}

#[test]
fn event_overrunning_track_length() {
    init();
    // the first event alone is 4 bytes, the track claims 3
    let mut bytes = header(1);
    bytes.extend(track(3, &NOTE));

    assert_eq!(
        format_error(&bytes),
        FormatError::TrackLengthMismatch {
            declared: 3,
            consumed: 4
        }
    );
}

#[test]
fn track_length_beyond_input() {
    init();
    let mut bytes = header(1);
    bytes.extend(track(20, &NOTE));

    assert_eq!(
        format_error(&bytes),
        FormatError::TrackExceedsInput {
            declared: 20,
            available: 8
        }
    );
}

#[test]
fn missing_tracks_are_truncation() {
    init();
    let mut bytes = header(2);
    bytes.extend(track(8, &NOTE));

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), bytes.len());
}

#[test]
fn delta_time_past_the_track_end() {
    init();
    // the delta time of the second event continues past the declared length
    let body = [0x00, 0x90, 0x3C, 0x40, 0x81];
    let expected = FormatError::TrackLengthMismatch {
        declared: 5,
        consumed: 6,
    };

    let mut last = header(1);
    last.extend(track(5, &body));
    assert_eq!(format_error(&last), expected);

    let mut followed = header(2);
    followed.extend(track(5, &body));
    followed.extend(track(8, &NOTE));
    assert_eq!(format_error(&followed), expected);
}

#[test]
fn event_data_past_the_track_end() {
    init();
    let mut bytes = header(1);
    bytes.extend(track(3, &[0x00, 0x90, 0x3C]));

    assert_eq!(
        format_error(&bytes),
        FormatError::TrackLengthMismatch {
            declared: 3,
            consumed: 4
        }
    );
}

#[test]
fn truncated_header() {
    init();
    let bytes = &header(1)[..10];

    let err = MidiFile::parse(bytes).unwrap_err();
    assert!(err.is_truncated());
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Malformed(StreamError::Truncated { .. })
    ));
}

#[test]
fn overlong_delta_time() {
    init();
    let mut bytes = header(1);
    bytes.extend(track(8, &[0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0x90, 0x3C, 0x40]));

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Malformed(StreamError::VlqOverflow)
    );
}

#[test]
fn data_bytes_must_be_seven_bit() {
    init();
    let mut bytes = header(1);
    bytes.extend(track(4, &[0x00, 0x90, 0x3C, 0xC0]));

    assert_eq!(format_error(&bytes), FormatError::InvalidDataByte(0xC0));
}

#[test]
fn trailing_bytes_are_ignored() {
    init();
    let mut bytes = header(1);
    bytes.extend(track(8, &NOTE));
    bytes.extend_from_slice(b"trailing garbage");

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks()[0].len(), 2);
}

#[test]
fn meta_and_sysex_events_keep_their_payload() {
    init();
    let body = [
        0x00, 0xFF, 0x03, 0x04, b'l', b'e', b'a', b'd', //
        0x00, 0xF0, 0x03, 0x7E, 0x7F, 0xF7, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = header(1);
    bytes.extend(track(body.len() as u32, &body));

    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(
        events[0].kind(),
        &EventKind::Meta(MetaEvent::track_name("lead"))
    );
    assert_eq!(
        events[1].kind(),
        &EventKind::SysEx(SysExEvent::new(vec![0x7E, 0x7F, 0xF7]))
    );

    // and are written back byte for byte
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn read_errors_convert_into_the_crate_error() {
    init();
    let err: Error = MidiFile::read_from(&b"MThd"[..]).unwrap_err();
    assert!(matches!(err, Error::Read(e) if e.is_truncated()));
}
