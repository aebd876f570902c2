use pretty_assertions::assert_eq;
use smf_codec::prelude::*;

#[test]
fn concert_a_is_note_69() {
    assert_eq!(frequency_to_midi_note(440.0), (NoteNumber::A4, PitchBend::CENTER));
}

#[test]
fn middle_c_bends_slightly() {
    let (note, bend) = frequency_to_midi_note(261.63);
    assert_eq!(note, NoteNumber::C4);
    assert_eq!(bend.value(), 8194);
    assert!(bend.offset().abs() < 8);
}

#[test]
fn flat_frequency_bends_down() {
    // a little under a quarter tone below A4
    let (note, bend) = frequency_to_midi_note(430.0);
    assert_eq!(note, NoteNumber::A4);
    assert!(bend.value() < PitchBend::CENTER.value());
    assert!(bend.offset() > -4096);
}

#[test]
fn frequencies_outside_the_keyboard_clamp() {
    let (low, _) = frequency_to_midi_note(1.0);
    assert_eq!(low.value(), 0);
    let (high, _) = frequency_to_midi_note(40_000.0);
    assert_eq!(high.value(), 127);
}

#[test]
fn note_names() {
    let a4 = note_name_to_frequency("A4").unwrap();
    assert!((a4 - 440.0).abs() < 0.5);

    let c4 = note_name_to_frequency("C4").unwrap();
    assert!((c4 - 261.63).abs() < 0.5);

    let h3 = note_name_to_frequency("H3").unwrap();
    let b3 = note_name_to_frequency("B3").unwrap();
    assert_eq!(h3, b3);

    let c_sharp = note_name_to_frequency("C#4").unwrap();
    let d_flat = note_name_to_frequency("Db4").unwrap();
    assert!((c_sharp - d_flat).abs() < 1e-9);
    assert!((c_sharp - 277.18).abs() < 0.01);
}

#[test]
fn invalid_note_names() {
    assert_eq!(
        note_name_to_frequency("Zz9"),
        Err(NoteNameError::UnknownLetter('Z'))
    );
    assert_eq!(note_name_to_frequency(""), Err(NoteNameError::Empty));
    assert_eq!(
        note_name_to_frequency("A"),
        Err(NoteNameError::InvalidLength(1))
    );
    assert_eq!(
        note_name_to_frequency("Ax4"),
        Err(NoteNameError::InvalidAccidental('x'))
    );
    assert_eq!(
        note_name_to_frequency("Bb"),
        Err(NoteNameError::InvalidOctave('b'))
    );
}

#[test]
fn note_numbers_display_and_parse() {
    let c_sharp: NoteNumber = "C#4".parse().unwrap();
    assert_eq!(c_sharp.value(), 61);
    assert_eq!(c_sharp.to_string(), "C#4");
    assert_eq!(c_sharp.pitch_class(), PitchClass::CSharp);
    assert_eq!(c_sharp.octave().value(), 4);

    // octave -1 has no name in the `[A-H][#b]?[0-9]` grammar
    for value in 12..=127 {
        let note = NoteNumber::saturating(value);
        let parsed: NoteNumber = note.to_string().parse().unwrap();
        assert_eq!(parsed, note);
    }
}

#[test]
fn midi_frequencies_invert_quantization() {
    for value in 0..=127 {
        let note = NoteNumber::saturating(value);
        assert_eq!(
            frequency_to_midi_note(midi_to_frequency(note)),
            (note, PitchBend::CENTER)
        );
    }
}
