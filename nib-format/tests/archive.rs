use std::io::Read;

use nib_format::{
    Archive, ClassName, DecodeOptions, Entry, NibError, Object, Section, Value, Version,
};

const OBJECTS: usize = 0;
const KEYS: usize = 1;
const ENTRIES: usize = 2;
const CLASS_NAMES: usize = 3;

struct RawSection {
    count: i32,
    bytes: Vec<u8>,
}

/// Lay out `sections` (given in table order) in the file in `order`, writing
/// the offsets each one ended up at into the table of contents.
fn layout(version: (i32, i32), sections: &[RawSection; 4], order: [usize; 4]) -> Vec<u8> {
    const HEADER_SIZE: usize = 50;

    let mut offsets = [0i32; 4];
    let mut body = vec![];
    for &i in order.iter() {
        offsets[i] = (HEADER_SIZE + body.len()) as i32;
        body.extend_from_slice(&sections[i].bytes);
    }

    let mut out = b"NIBArchive".to_vec();
    out.extend_from_slice(&version.0.to_le_bytes());
    out.extend_from_slice(&version.1.to_le_bytes());
    for i in 0..4 {
        out.extend_from_slice(&sections[i].count.to_le_bytes());
        out.extend_from_slice(&offsets[i].to_le_bytes());
    }
    assert_eq!(out.len(), HEADER_SIZE);
    out.extend_from_slice(&body);
    out
}

fn window_sections() -> [RawSection; 4] {
    [
        RawSection {
            count: 2,
            bytes: vec![0x80, 0x80, 0x82, 0x81, 0x82, 0x81],
        },
        RawSection {
            count: 2,
            bytes: b"\x85title\x85child".to_vec(),
        },
        RawSection {
            count: 3,
            bytes: vec![
                0x80, 0x08, 0x82, b'H', b'i', // data
                0x81, 0x0a, 0x01, 0x00, 0x00, 0x00, // object 1
                0x80, 0x02, 0xfb, 0xff, 0xff, 0xff, // int32 -5
            ],
        },
        RawSection {
            count: 2,
            bytes: b"\x89\x80NSWindow\0\x87\x81\x07\0\0\0NSView\0".to_vec(),
        },
    ]
}

fn window_archive() -> Archive {
    Archive {
        version: Version::new(1, 10),
        objects: vec![
            Object {
                class_name_index: 0,
                values_start_index: 0,
                values_count: 2,
            },
            Object {
                class_name_index: 1,
                values_start_index: 2,
                values_count: 1,
            },
        ],
        keys: vec!["title".into(), "child".into()],
        entries: vec![
            Entry {
                key_index: 0,
                value: Value::Data(b"Hi".to_vec()),
            },
            Entry {
                key_index: 1,
                value: Value::Object(1),
            },
            Entry {
                key_index: 0,
                value: Value::Int32(-5),
            },
        ],
        class_names: vec![
            ClassName::new("NSWindow"),
            ClassName {
                extra_values: vec![7],
                class_name: "NSView".into(),
            },
        ],
    }
}

fn canonical() -> Vec<u8> {
    layout((1, 10), &window_sections(), [OBJECTS, KEYS, ENTRIES, CLASS_NAMES])
}

#[test]
fn decodes_and_reencodes_byte_exact() {
    let bytes = canonical();
    let archive = Archive::from_bytes(&bytes).unwrap();
    assert_eq!(archive, window_archive());
    assert_eq!(archive.encode().unwrap(), bytes);
}

#[test]
fn encodes_reference_layout() {
    assert_eq!(window_archive().encode().unwrap(), canonical());
}

#[test]
fn sections_in_any_order() {
    let bytes = layout(
        (1, 10),
        &window_sections(),
        [CLASS_NAMES, KEYS, OBJECTS, ENTRIES],
    );
    let archive = Archive::from_bytes(&bytes).unwrap();
    assert_eq!(archive, window_archive());

    // Written back in table order
    assert_eq!(archive.encode().unwrap(), canonical());
}

#[test]
fn swapped_offsets() {
    let mut bytes = canonical();
    let objects_offset: [u8; 4] = bytes[22..26].try_into().unwrap();
    let keys_offset: [u8; 4] = bytes[30..34].try_into().unwrap();
    bytes[22..26].copy_from_slice(&keys_offset);
    bytes[30..34].copy_from_slice(&objects_offset);

    // The keys section is now read from the object bytes: two empty keys,
    // leaving the cursor short of where the objects claim to start.
    match Archive::from_bytes(&bytes) {
        Err(NibError::UnexpectedData { offset }) => assert_eq!(offset, 52),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn padding_between_sections() {
    let mut sections = window_sections();
    sections[KEYS].bytes.push(0);
    let bytes = layout((1, 10), &sections, [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);

    // Entries are declared one byte after where the keys really end.
    match Archive::from_bytes(&bytes) {
        Err(NibError::UnexpectedData { offset }) => assert_eq!(offset, 68),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn bad_magic() {
    let mut bytes = canonical();
    bytes[9] = b'X';
    assert!(matches!(
        Archive::from_bytes(&bytes),
        Err(NibError::InvalidHeader)
    ));

    assert!(matches!(
        Archive::from_bytes(b"bplist00"),
        Err(NibError::InvalidHeader)
    ));
}

#[test]
fn version_gate() {
    let bytes = layout((2, 0), &window_sections(), [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);

    assert!(matches!(
        Archive::from_bytes(&bytes),
        Err(NibError::UnsupportedVersion { major: 2, minor: 0 })
    ));

    let archive = Archive::decode_with_options(
        &bytes[..],
        &DecodeOptions {
            check_version: false,
        },
    )
    .unwrap();
    assert_eq!(archive.version, Version::new(2, 0));
    assert_eq!(archive.encode().unwrap(), bytes);

    let bytes = layout((1, 11), &window_sections(), [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);
    assert!(matches!(
        Archive::from_bytes(&bytes),
        Err(NibError::UnsupportedVersion { major: 1, minor: 11 })
    ));

    let bytes = layout((1, 9), &window_sections(), [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);
    assert!(Archive::from_bytes(&bytes).is_ok());
}

#[test]
fn unknown_tag() {
    let mut sections = window_sections();
    // retag the int32 entry
    sections[ENTRIES].bytes[12] = 11;
    let bytes = layout((1, 10), &sections, [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);

    assert!(matches!(
        Archive::from_bytes(&bytes),
        Err(NibError::UnknownValueType(11))
    ));
}

#[test]
fn unterminated_class_name() {
    let mut sections = window_sections();
    let last = sections[CLASS_NAMES].bytes.len() - 1;
    sections[CLASS_NAMES].bytes[last] = b'!';
    let bytes = layout((1, 10), &sections, [OBJECTS, KEYS, ENTRIES, CLASS_NAMES]);

    match Archive::from_bytes(&bytes) {
        Err(NibError::UnterminatedString(raw)) => assert_eq!(raw, b"NSView!"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn truncated_section() {
    let bytes = canonical();
    assert!(matches!(
        Archive::from_bytes(&bytes[..bytes.len() - 3]),
        Err(NibError::ReadFailure(_))
    ));
}

#[test]
fn offsets_are_relative_to_reader_start() {
    let mut stream = b"leading junk".to_vec();
    stream.extend_from_slice(&canonical());

    let mut reader = &stream[..];
    let mut junk = [0u8; 12];
    reader.read_exact(&mut junk).unwrap();

    assert_eq!(Archive::decode(reader).unwrap(), window_archive());
}

#[test]
fn every_value_kind_survives() {
    let values = vec![
        Value::Int8(i8::MIN),
        Value::Int8(i8::MAX),
        Value::Int16(-12345),
        Value::Int32(i32::MIN),
        Value::Int64(-1),
        Value::Int64(i64::MAX),
        Value::True,
        Value::False,
        Value::Float(-0.25),
        Value::Float(f32::MAX),
        Value::Double(std::f64::consts::PI),
        Value::Double(f64::NEG_INFINITY),
        Value::Data(vec![]),
        Value::Data((0..=255).collect()),
        Value::Nil,
        Value::Object(0),
        Value::Object(-1),
        Value::Object(i32::MAX),
        Value::Object(i32::MIN),
    ];

    let mut archive = Archive::default();
    archive.keys.push("value".into());
    archive.class_names.push(ClassName::new("NSObject"));
    archive.objects.push(Object {
        class_name_index: 0,
        values_start_index: 0,
        values_count: values.len(),
    });
    archive.entries = values
        .into_iter()
        .map(|value| Entry {
            key_index: 0,
            value,
        })
        .collect();

    let bytes = archive.encode().unwrap();
    let decoded = Archive::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, archive);
    assert_eq!(decoded.encode().unwrap(), bytes);

    let header = Archive::read_header(&bytes[..], &DecodeOptions::default()).unwrap();
    assert_eq!(header.toc[Section::Entries].count, 19);
}
