// deckrs/tests/roundtrip_tests.rs

//! Parse, write and parse again: the second document must equal the first.

use deckrs::{reads, read, to_deck_string, Dialect, Document, WriteOptions};
use std::io::Write;
use std::path::PathBuf;

fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

fn roundtrip(doc: &Document, options: &WriteOptions) -> Document {
    let text = to_deck_string(doc, options).unwrap();
    reads(&text, doc.dialect()).unwrap_or_else(|e| panic!("reparse failed: {}\n{}", e, text))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_fixture_roundtrips() {
    init_logging();
    for (name, dialect) in [
        ("qe_input_1.in", Dialect::Namelist),
        ("cp2k_input_1.in", Dialect::Nested),
    ] {
        let doc = read(fixture(name), dialect).unwrap();
        assert_eq!(roundtrip(&doc, &WriteOptions::default()), doc, "{}", name);

        let options = WriteOptions::default()
            .with_indent("\t")
            .with_end_comma(true)
            .with_uppercase_names(true);
        assert_eq!(roundtrip(&doc, &options), doc, "{}", name);
    }
}

#[test]
fn test_serialization_is_idempotent() {
    init_logging();
    let doc = read(fixture("cp2k_input_1.in"), Dialect::Nested).unwrap();

    let once = to_deck_string(&doc, &WriteOptions::default()).unwrap();
    let reparsed = reads(&once, Dialect::Nested).unwrap();
    let twice = to_deck_string(&reparsed, &WriteOptions::default()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_namelist_roundtrip_keeps_value_text() {
    init_logging();
    let input = r#"&INPUTPH
  tr2_ph = 1.0d-14
  prefix = "si"
  amass(1) = 28.086
  title = 'don''t panic'
  flag = .T.
  nq = 1, 2, 3,
  fildyn = 'si.dyn' ! trailing comment
/
"#;
    let doc = reads(input, Dialect::Namelist).unwrap();
    let output = to_deck_string(&doc, &WriteOptions::default()).unwrap();

    assert!(output.contains("    tr2_ph = 1.0d-14\n"));
    assert!(output.contains("    title = 'don''t panic'\n"));
    assert!(output.contains("    flag = .T.\n"));
    assert!(output.contains("    nq = 1, 2, 3\n"));
    assert!(!output.contains("trailing comment"));
    assert_eq!(reads(&output, Dialect::Namelist).unwrap(), doc);
}

#[test]
fn test_nested_roundtrip_mixed_children() {
    init_logging();
    let input = "\
&MOTION
  &MD
    ENSEMBLE NVT
    STEPS 1000
    TIMESTEP 0.5
    &THERMOSTAT
      TYPE NOSE
    &END
  &END MD
  &CONSTRAINT
    &COLLECTIVE
      COLVAR 1
      INTERMOLECULAR
    &END COLLECTIVE
  &END CONSTRAINT
&END MOTION
&FORCE_EVAL
  &SUBSYS
    &COORD
      1 2 3
      4 5 6
    &END COORD
  &END SUBSYS
&END FORCE_EVAL
";
    let doc = reads(input, Dialect::Nested).unwrap();
    let text = to_deck_string(&doc, &WriteOptions::default()).unwrap();

    assert!(text.contains("        &THERMOSTAT\n            TYPE NOSE\n        &END THERMOSTAT\n"));
    assert!(text.contains("            INTERMOLECULAR\n"));
    assert_eq!(roundtrip(&doc, &WriteOptions::default()), doc);
}

#[test]
fn test_equality_ignores_formatting() {
    init_logging();
    let compact = "&A\nX 1\n&B on\nY 2.0\n&END\n&END\n";
    let spaced = "# header\n&A   # open\n\n    X    1\n    &B   on\n        Y 2.0\n    &END B\n&END A\n";

    let a = reads(compact, Dialect::Nested).unwrap();
    let b = reads(spaced, Dialect::Nested).unwrap();
    assert_eq!(a, b);

    let c = reads("&A\nX 1\n&B on\nY 2.00\n&END\n&END\n", Dialect::Nested).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_deep_nesting_roundtrip() {
    init_logging();
    const DEPTH: usize = 10_000;

    let mut input = String::new();
    for level in 0..DEPTH {
        input.push_str(&format!("&S{}\n", level));
    }
    input.push_str("VALUE 42\n");
    for level in (0..DEPTH).rev() {
        input.push_str(&format!("&END S{}\n", level));
    }

    let doc = reads(&input, Dialect::Nested).unwrap();
    assert_eq!(doc.walk().count(), 2 * DEPTH + 1);

    let options = WriteOptions::default().with_indent("");
    let text = to_deck_string(&doc, &options).unwrap();
    let again = reads(&text, Dialect::Nested).unwrap();
    assert_eq!(again, doc);

    drop(again);
    drop(doc);
}

#[test]
fn test_deep_document_clone_and_debug() {
    init_logging();
    const DEPTH: usize = 10_000;

    let mut input: String = (0..DEPTH).map(|level| format!("&S{}\n", level)).collect();
    input.push_str("VALUE 42\n");
    input.push_str(&"&END\n".repeat(DEPTH));

    let doc = reads(&input, Dialect::Nested).unwrap();
    assert_eq!(doc.depth(), DEPTH);

    let copy = doc.clone();
    assert_eq!(copy, doc);
    assert_eq!(copy.find("S0.S1.S2").unwrap().name(), "S2");

    let debug = format!("{:?}", copy);
    assert!(debug.contains("Enter(\"S9999\", None, Nested)"));
    assert!(debug.contains("VALUE"));
}

#[test]
fn test_quoted_modifier_roundtrip() {
    init_logging();
    let doc = reads("&PRINT 'every   step'\n  LEVEL 2\n&END PRINT\n", Dialect::Nested).unwrap();
    assert_eq!(doc.section("PRINT").unwrap().modifier(), Some("'every   step'"));

    let text = to_deck_string(&doc, &WriteOptions::default()).unwrap();
    assert!(text.starts_with("&PRINT 'every   step'\n"));
    assert_eq!(roundtrip(&doc, &WriteOptions::default()), doc);
}

#[test]
fn test_write_to_file() {
    init_logging();
    let doc = read(fixture("qe_input_1.in"), Dialect::Namelist).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    deckrs::write_to_writer(&doc, &mut file, &WriteOptions::default()).unwrap();
    file.flush().unwrap();

    let reread = read(file.path(), Dialect::Namelist).unwrap();
    assert_eq!(reread, doc);
}
