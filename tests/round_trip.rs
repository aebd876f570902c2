use pretty_assertions::assert_eq;
use smf_codec::prelude::*;
use std::time::Duration;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn note(name: &str, millis: u64) -> Note {
    Note::from_name(name)
        .unwrap()
        .with_duration(Duration::from_millis(millis))
}

fn notes_played(track: &Track) -> Vec<(u64, Channel, ChannelMessage)> {
    track
        .ticked()
        .filter_map(|(tick, event)| match event.kind() {
            EventKind::Channel(c) => Some((tick, c.channel(), *c.message())),
            _ => None,
        })
        .collect()
}

#[test]
fn three_note_scale() {
    init();
    let mut file = MidiFile::new(
        Format::Simultaneous,
        Division::ticks_per_quarter_note(480).unwrap(),
    );
    let scale: Vec<Note> = ["C4", "D4", "E4"]
        .into_iter()
        .map(|name| note(name, 100).with_channel(Channel::One).with_velocity(127))
        .collect();
    file.add_notes(&scale).unwrap();

    let bytes = smf_codec::encode_file(&file).unwrap();
    let decoded = smf_codec::decode_file(&bytes).unwrap();

    assert_eq!(decoded.format(), Format::Simultaneous);
    assert_eq!(decoded.division(), Division::TicksPerQuarterNote(480));
    assert_eq!(decoded.track_count(), 1);

    let track = &decoded.tracks()[0];
    assert_eq!(track.len(), 6);

    let deltas: Vec<u32> = track.events().iter().map(TrackEvent::delta_ticks).collect();
    assert_eq!(deltas, vec![0, 96, 0, 96, 0, 96]);

    let keys: Vec<u8> = track
        .channel_messages()
        .filter(|(_, m)| !m.is_release())
        .filter_map(|(_, m)| m.key())
        .map(|k| k.value())
        .collect();
    assert_eq!(keys, vec![60, 62, 64]);

    for (channel, message) in track.channel_messages() {
        assert_eq!(channel, Channel::One);
        match message {
            ChannelMessage::NoteOn { velocity, .. } => assert_eq!(velocity.value(), 127),
            ChannelMessage::NoteOff { velocity, .. } => assert_eq!(velocity.value(), 0),
            other => panic!("unexpected message {other:?}"),
        }
    }
}

#[test]
fn decoded_file_matches_built_file() {
    init();
    let mut file = MidiFile::default().with_tempo(Bpm::new(90.0).unwrap());
    file.add_notes_with(
        &[
            note("A4", 333).with_program(40),
            note("C#5", 150).bent(true).with_channel(Channel::Ten),
            note("E5", 700).with_previous().with_velocity(64),
            note("G3", 20).after(Duration::from_secs(2)),
        ],
        TrackOptions::default()
            .named("lead")
            .with_tempo_event()
            .with_end_of_track(),
    )
    .unwrap();
    file.add_notes(&[note("C2", 1000).with_channel(Channel::Sixteen)])
        .unwrap();

    let bytes = file.to_bytes().unwrap();
    let decoded = MidiFile::parse(&bytes).unwrap();

    assert_eq!(decoded.track_count(), file.track_count());
    assert_eq!(decoded.tracks(), file.tracks());
    let first_length = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
    assert_eq!(first_length as usize, file.tracks()[0].byte_len());
    assert!(decoded.tracks()[0].is_terminated());
}

#[test]
fn chord_notes_share_a_tick() {
    init();
    let mut file = MidiFile::default();
    let track = file
        .add_notes(&[
            note("C4", 500),
            note("E4", 500).with_previous(),
            note("G4", 500).with_previous(),
        ])
        .unwrap();

    let deltas: Vec<u32> = track.events().iter().map(TrackEvent::delta_ticks).collect();
    assert_eq!(deltas, vec![0, 0, 0, 480, 0, 0]);

    let played = notes_played(track);
    assert!(played[..3].iter().all(|(tick, _, m)| *tick == 0 && !m.is_release()));
    assert!(played[3..].iter().all(|(tick, _, m)| *tick == 480 && m.is_release()));
}

#[test]
fn overlapping_notes_release_in_time_order() {
    init();
    let mut file = MidiFile::default();
    let track = file
        .add_notes(&[
            note("C4", 1000),
            note("E4", 250).at(Duration::from_millis(250)),
        ])
        .unwrap();

    let played: Vec<(u64, bool, u8)> = notes_played(track)
        .into_iter()
        .map(|(tick, _, m)| (tick, m.is_release(), m.key().unwrap().value()))
        .collect();
    assert_eq!(
        played,
        vec![
            (0, false, 60),
            (240, false, 64),
            (480, true, 64),
            (960, true, 60),
        ]
    );
}

#[test]
fn program_change_precedes_note_on() {
    init();
    let mut file = MidiFile::default();
    let track = file
        .add_notes(&[
            note("C4", 500).with_program(19).with_channel(Channel::Three),
            note("D4", 500).with_program(19).with_channel(Channel::Three),
            note("E4", 500).with_program(0).with_channel(Channel::Three),
        ])
        .unwrap();

    let messages: Vec<ChannelMessage> = track
        .channel_messages()
        .map(|(_, m)| *m)
        .collect();
    let kinds: Vec<StatusKind> = messages.iter().map(ChannelMessage::kind).collect();
    assert_eq!(
        kinds,
        vec![
            StatusKind::ProgramChange,
            StatusKind::NoteOn,
            StatusKind::NoteOff,
            StatusKind::NoteOn,
            StatusKind::NoteOff,
            StatusKind::ProgramChange,
            StatusKind::NoteOn,
            StatusKind::NoteOff,
        ]
    );
    assert_eq!(file.program(Channel::Three), 0);
}

#[test]
fn slurred_note_releases_after_next_note_on() {
    init();
    let mut file = MidiFile::default();
    let track = file
        .add_notes(&[
            note("C4", 500).slurred(true),
            note("D4", 500).slurred(true),
            note("E4", 500),
        ])
        .unwrap();

    let played: Vec<(u64, StatusKind, Option<u8>)> = notes_played(track)
        .into_iter()
        .map(|(tick, _, m)| (tick, m.kind(), m.key().map(|k| k.value())))
        .collect();
    assert_eq!(
        played,
        vec![
            (0, StatusKind::PitchBend, None),
            (0, StatusKind::NoteOn, Some(60)),
            (480, StatusKind::PitchBend, None),
            (480, StatusKind::NoteOn, Some(62)),
            (480, StatusKind::NoteOff, Some(60)),
            (960, StatusKind::NoteOn, Some(64)),
            (960, StatusKind::NoteOff, Some(62)),
            (1440, StatusKind::NoteOff, Some(64)),
        ]
    );
}

#[test]
fn slur_into_the_same_key_releases_first() {
    init();
    let mut file = MidiFile::default();
    let track = file
        .add_notes(&[note("A4", 500).slurred(true), note("A4", 500)])
        .unwrap();

    let played: Vec<(u64, StatusKind)> = notes_played(track)
        .into_iter()
        .map(|(tick, _, m)| (tick, m.kind()))
        .collect();
    assert_eq!(
        played,
        vec![
            (0, StatusKind::PitchBend),
            (0, StatusKind::NoteOn),
            (480, StatusKind::NoteOff),
            (480, StatusKind::NoteOn),
            (960, StatusKind::NoteOff),
        ]
    );
}

#[test]
fn last_slurred_note_ends_on_its_own() {
    init();
    let mut file = MidiFile::default();
    let track = file.add_notes(&[note("B3", 250).slurred(true)]).unwrap();

    let played: Vec<(u64, StatusKind)> = notes_played(track)
        .into_iter()
        .map(|(tick, _, m)| (tick, m.kind()))
        .collect();
    assert_eq!(
        played,
        vec![
            (0, StatusKind::PitchBend),
            (0, StatusKind::NoteOn),
            (240, StatusKind::NoteOff),
        ]
    );
}

#[test]
fn single_track_format_writes_one_track() {
    init();
    let mut file = MidiFile::new(Format::SingleMultiChannel, Division::default());
    file.add_notes(&[note("F4", 100)]).unwrap();

    let bytes = file.to_bytes().unwrap();
    assert_eq!(&bytes[8..12], &[0, 0, 0, 1]);
    assert_eq!(MidiFile::parse(&bytes).unwrap().tracks(), file.tracks());

    let empty = MidiFile::new(Format::SingleMultiChannel, Division::default());
    assert!(matches!(
        empty.to_bytes(),
        Err(WriteError::SingleTrackFormat(0))
    ));
}

#[test]
fn reads_from_a_stream() {
    init();
    let mut file = MidiFile::default();
    file.add_notes(&[note("D3", 100)]).unwrap();
    let bytes = file.to_bytes().unwrap();

    let decoded = MidiFile::read_from(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(decoded.tracks(), file.tracks());
}

#[test]
fn write_failures_surface_as_io_errors() {
    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut file = MidiFile::default();
    file.add_notes(&[note("C4", 100)]).unwrap();
    assert!(matches!(file.write_to(Broken), Err(WriteError::Io(_))));
}
