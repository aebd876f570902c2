use log::{debug, trace};

use super::Reader;
use crate::{file::Header, prelude::*};

/// The chunk the decoder expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `MThd`
    ExpectHeaderTag,
    /// length, format, track count and division
    ExpectHeaderBody,
    /// `MTrk`, with the number of tracks still to come
    ExpectTrackTag {
        /// tracks left, including this one
        remaining: u16,
    },
    /// the events of a track
    ExpectTrackBody {
        /// tracks left, including this one
        remaining: u16,
    },
    /// Every declared track has been read
    Done,
}

/// Decode a complete file.
///
/// Nothing is returned unless the header and every declared track parse,
/// each track ending exactly on its declared length.
pub fn decode(bytes: &[u8]) -> ReadResult<MidiFile> {
    let mut reader = Reader::from_byte_slice(bytes);
    let mut stage = Stage::ExpectHeaderTag;
    let mut header = Header::default();
    let mut tracks = Vec::new();

    loop {
        stage = match stage {
            Stage::ExpectHeaderTag => {
                let position = reader.buffer_position();
                let tag = reader.read_exact_size::<4>()?;
                if &tag != b"MThd" {
                    return Err(ReaderError::format_error(
                        position,
                        FormatError::InvalidHeaderTag(tag),
                    ));
                }
                Stage::ExpectHeaderBody
            }
            Stage::ExpectHeaderBody => {
                let h = Header::read(&mut reader)?;
                debug!(
                    "header: format {:?}, {} tracks, division {:?}",
                    h.format(),
                    h.track_count(),
                    h.division()
                );
                let remaining = h.track_count();
                header = h;
                if remaining == 0 {
                    Stage::Done
                } else {
                    Stage::ExpectTrackTag { remaining }
                }
            }
            Stage::ExpectTrackTag { remaining } => {
                let position = reader.buffer_position();
                let tag = reader.read_exact_size::<4>()?;
                if &tag != b"MTrk" {
                    return Err(ReaderError::format_error(
                        position,
                        FormatError::InvalidTrackTag(tag),
                    ));
                }
                Stage::ExpectTrackBody { remaining }
            }
            Stage::ExpectTrackBody { remaining } => {
                tracks.push(read_track(&mut reader)?);
                match remaining - 1 {
                    0 => Stage::Done,
                    remaining => Stage::ExpectTrackTag { remaining },
                }
            }
            Stage::Done => break,
        };
    }

    if !reader.is_at_end() {
        debug!(
            "ignoring {} bytes after the last declared track",
            reader.remaining()
        );
    }

    Ok(MidiFile::from_parts(header.format(), header.division(), tracks))
}

/// Reads a track length and then events until exactly that many bytes are consumed.
///
/// Events only see the declared bytes of their track, so an event running past
/// the end is a length mismatch whatever follows the track.
fn read_track(reader: &mut Reader<'_>) -> ReadResult<Track> {
    let declared = reader.read_u32()?;
    let start = reader.buffer_position();
    debug!("track at {start}: {declared} bytes");
    if declared as usize > reader.remaining() {
        return Err(ReaderError::format_error(
            start,
            FormatError::TrackExceedsInput {
                declared,
                available: reader.remaining(),
            },
        ));
    }

    let mut body = reader.split_off(declared as usize)?;
    let mut events = Vec::new();
    let mut running_status = None;
    while !body.is_at_end() {
        let event = read_event(&mut body, &mut running_status).map_err(|e| {
            if let ReaderErrorKind::Malformed(StreamError::Truncated { needed, .. }) =
                *e.error_kind()
            {
                let consumed = (e.position() - start + needed) as u64;
                ReaderError::format_error(
                    e.position(),
                    FormatError::TrackLengthMismatch { declared, consumed },
                )
            } else {
                e
            }
        })?;
        trace!("{event:?}");
        events.push(event);
    }
    Ok(Track::new(events))
}

/// Reads one event. `running_status` holds the last channel status seen in the track.
fn read_event(reader: &mut Reader<'_>, running_status: &mut Option<u8>) -> ReadResult<TrackEvent> {
    let delta_ticks = reader.read_vlq()?;
    let position = reader.buffer_position();
    let first = reader.peek_u8()?;

    let kind = match first {
        0xFF => {
            reader.read_u8()?;
            *running_status = None;
            let kind = reader.read_u8()?;
            let len = reader.read_vlq()?;
            let data = reader.read_slice(len as usize)?;
            EventKind::Meta(MetaEvent::new(kind, data))
        }
        0xF0 | 0xF7 => {
            reader.read_u8()?;
            *running_status = None;
            let len = reader.read_vlq()?;
            let data = reader.read_slice(len as usize)?;
            if first == 0xF0 {
                EventKind::SysEx(SysExEvent::new(data))
            } else {
                EventKind::SysEx(SysExEvent::escape(data))
            }
        }
        0xF1..=0xFE => {
            return Err(ReaderError::format_error(
                position,
                FormatError::UnsupportedStatus(first),
            ));
        }
        0x80..=0xEF => {
            reader.read_u8()?;
            *running_status = Some(first);
            EventKind::Channel(read_channel_event(reader, first)?)
        }
        _ => {
            // a data byte: repeat the previous channel status
            let Some(status) = *running_status else {
                return Err(ReaderError::format_error(
                    position,
                    FormatError::MissingRunningStatus,
                ));
            };
            EventKind::Channel(read_channel_event(reader, status)?)
        }
    };

    Ok(TrackEvent::new(delta_ticks, kind))
}

fn read_channel_event(reader: &mut Reader<'_>, status: u8) -> ReadResult<ChannelEvent> {
    let Some(kind) = StatusKind::from_status(status) else {
        return Err(ReaderError::format_error(
            reader.buffer_position(),
            FormatError::UnsupportedStatus(status),
        ));
    };
    let first = read_data_byte(reader)?;
    let second = if kind.data_len() == 2 {
        read_data_byte(reader)?
    } else {
        DataByte::default()
    };
    Ok(ChannelEvent::new(
        Channel::from_nibble(status),
        ChannelMessage::from_parts(kind, first, second),
    ))
}

fn read_data_byte(reader: &mut Reader<'_>) -> ReadResult<DataByte> {
    let position = reader.buffer_position();
    let byte = reader.read_u8()?;
    DataByte::new(byte).map_err(|e| ReaderError::format_error(position, e))
}

#[test]
fn running_status_repeats_previous_channel_status() {
    // on C4, running on E4, then a meta clears running status
    let body = [
        0x00, 0x90, 0x3C, 0x40, //
        0x00, 0x40, 0x40, //
        0x60, 0x80, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);

    let mut reader = Reader::from_byte_slice(&bytes);
    let track = read_track(&mut reader).unwrap();
    assert_eq!(track.len(), 4);
    assert_eq!(
        track.events()[1],
        TrackEvent::note_on(0, Channel::One, NoteNumber::saturating(0x40), DataByte(0x40))
    );
    assert!(track.is_terminated());
}

#[test]
fn running_status_without_prior_status() {
    let bytes = [0x00, 0x00, 0x00, 0x03, 0x00, 0x3C, 0x40];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = read_track(&mut reader).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::MissingRunningStatus)
    );
    assert_eq!(err.position(), 5);
}

#[test]
fn system_common_status_is_rejected() {
    let bytes = [0x00, 0x00, 0x00, 0x02, 0x00, 0xF2];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = read_track(&mut reader).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::UnsupportedStatus(0xF2))
    );
}

#[test]
fn event_past_the_declared_length() {
    // the second delta time continues past the five declared bytes
    let body = [0x00, 0x90, 0x3C, 0x40, 0x81];
    let expected = FormatError::TrackLengthMismatch {
        declared: 5,
        consumed: 6,
    };

    let mut last = vec![0x00, 0x00, 0x00, 0x05];
    last.extend_from_slice(&body);
    let err = read_track(&mut Reader::from_byte_slice(&last)).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::Format(expected.clone()));

    let mut followed = last.clone();
    followed.extend_from_slice(b"MTrk\x00\x00\x00\x00");
    let err = read_track(&mut Reader::from_byte_slice(&followed)).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::Format(expected));
    assert_eq!(err.position(), 8);
}
