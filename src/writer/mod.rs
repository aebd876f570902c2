#![doc = r#"
Writing Standard MIDI Files.

Each track is serialized into a buffer first so its chunk can be prefixed
with the exact byte count. Running status is never used.
"#]

mod error;
pub use error::*;

use std::io::Write;

use log::{debug, trace};

use crate::{
    file::Header,
    prelude::*,
    vlq::{MAX_VLQ, write_vlq},
};

/// Write `file` as a complete SMF byte stream.
pub fn encode<W: Write>(file: &MidiFile, writer: &mut W) -> WriteResult<()> {
    let tracks = file.tracks();
    if file.format().is_single_track() && tracks.len() != 1 {
        return Err(WriteError::SingleTrackFormat(tracks.len()));
    }
    let track_count =
        u16::try_from(tracks.len()).map_err(|_| WriteError::TooManyTracks(tracks.len()))?;

    let header = Header::new(file.format(), track_count, file.division());
    debug!(
        "writing header: format {:?}, {track_count} tracks, division {:?}",
        header.format(),
        header.division()
    );
    header.write(writer)?;

    let mut body = Vec::new();
    for track in tracks {
        body.clear();
        write_track_body(track, &mut body)?;
        write_track_chunk(&body, writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes an `MTrk` chunk around already serialized events.
fn write_track_chunk<W: Write>(body: &[u8], writer: &mut W) -> WriteResult<()> {
    let len = u32::try_from(body.len()).map_err(|_| WriteError::TrackTooLong(body.len()))?;
    debug!("writing track: {len} bytes");
    writer.write_all(b"MTrk")?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(body)?;
    Ok(())
}

fn write_track_body(track: &Track, out: &mut Vec<u8>) -> WriteResult<()> {
    for event in track.events() {
        trace!("{event:?}");
        write_event(event, out)?;
    }
    Ok(())
}

fn checked_vlq<W: Write>(writer: &mut W, value: u64) -> WriteResult<()> {
    match u32::try_from(value) {
        Ok(v) if v <= MAX_VLQ => {
            write_vlq(writer, v)?;
            Ok(())
        }
        _ => Err(WriteError::VlqOverflow(value)),
    }
}

/// Serializes one event: delta time, status and data.
pub fn write_event<W: Write>(event: &TrackEvent, writer: &mut W) -> WriteResult<()> {
    checked_vlq(writer, event.delta_ticks() as u64)?;
    match event.kind() {
        EventKind::Channel(c) => {
            let data = c.message().data();
            writer.write_all(&[c.status()])?;
            writer.write_all(&data[..c.message().kind().data_len()])?;
        }
        EventKind::Meta(m) => {
            writer.write_all(&[0xFF, m.kind()])?;
            checked_vlq(writer, m.data().len() as u64)?;
            writer.write_all(m.data())?;
        }
        EventKind::SysEx(s) => {
            writer.write_all(&[s.status()])?;
            checked_vlq(writer, s.data().len() as u64)?;
            writer.write_all(s.data())?;
        }
    }
    Ok(())
}

#[test]
fn event_bytes() {
    let mut out = Vec::new();
    write_event(
        &TrackEvent::note_on(0, Channel::One, NoteNumber::C4, DataByte(127)),
        &mut out,
    )
    .unwrap();
    write_event(&TrackEvent::note_off(200, Channel::One, NoteNumber::C4), &mut out).unwrap();
    write_event(
        &TrackEvent::program_change(0, Channel::Sixteen, DataByte(19)),
        &mut out,
    )
    .unwrap();
    write_event(
        &TrackEvent::pitch_bend(0, Channel::Two, PitchBend::CENTER),
        &mut out,
    )
    .unwrap();
    write_event(&TrackEvent::meta(0, MetaEvent::end_of_track()), &mut out).unwrap();

    assert_eq!(
        out,
        [
            0x00, 0x90, 0x3C, 0x7F, //
            0x81, 0x48, 0x80, 0x3C, 0x00, //
            0x00, 0xCF, 0x13, //
            0x00, 0xE1, 0x00, 0x40, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn oversized_delta_is_refused() {
    let mut out = Vec::new();
    let err = write_event(
        &TrackEvent::note_off(MAX_VLQ + 1, Channel::One, NoteNumber::C4),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, WriteError::VlqOverflow(v) if v == MAX_VLQ as u64 + 1));
}
