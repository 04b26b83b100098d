//! Error trace normalization tests.

use proptest::prelude::*;
use translator_snapshots::normalize::{strip_ansi, Normalizer};

fn normalizer() -> Normalizer {
    Normalizer::new("/home/u/proj", "packages")
}

#[test]
fn test_strips_working_directory_prefix() {
    let out = normalizer().normalize("Error: boom in /home/u/proj/src/x.js:1:2");

    assert_eq!(out, "Error: boom in src/x.js:1:2");
}

#[test]
fn test_strips_every_occurrence() {
    let out = normalizer().normalize("/home/u/proj/a.js and /home/u/proj/b.js");

    assert_eq!(out, "a.js and b.js");
}

#[test]
fn test_bare_working_directory_becomes_dot() {
    let out = normalizer().normalize("could not compile /home/u/proj");

    assert_eq!(out, "could not compile .");
}

#[test]
fn test_similar_directory_is_left_alone() {
    let out = normalizer().normalize("see /home/u/project/x.js");

    assert_eq!(out, "see /home/u/project/x.js");
}

#[test]
fn test_strips_ansi_styling() {
    let raw = "\u{1b}[31mError\u{1b}[39m: \u{1b}[1mbad tag\u{1b}[22m";

    assert_eq!(strip_ansi(raw), "Error: bad tag");
    assert_eq!(normalizer().normalize(raw), "Error: bad tag");
}

#[test]
fn test_strips_foreign_stack_frames_only() {
    let raw = "Error: bad tag\n    at packages/compiler/src/parse.js:10:3\n    at Module._compile (node:internal/modules/cjs/loader:1105:14)\n    at /home/u/proj/node_modules/x/index.js:3:1\n    at /home/u/proj/packages/compiler/src/index.js:4:2";

    assert_eq!(
        normalizer().normalize(raw),
        "Error: bad tag\n    at packages/compiler/src/parse.js:10:3\n    at packages/compiler/src/index.js:4:2"
    );
}

#[test]
fn test_windows_separator_frames_are_project_frames() {
    let raw = "Error: x\n    at packages\\compiler\\src\\a.js:1:1";

    assert_eq!(normalizer().normalize(raw), raw);
}

#[test]
fn test_text_without_noise_is_unchanged() {
    let raw = "Error: nothing to strip here\nsecond line";

    assert_eq!(normalizer().normalize(raw), raw);
}

#[test]
fn test_empty_cwd_only_strips_ansi_and_frames() {
    let normalizer = Normalizer::new("", "packages");
    let raw = "/abs/path.js\n    at node:internal/x:1:1";

    assert_eq!(normalizer.normalize(raw), "/abs/path.js");
}

fn trace_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("/home/u/proj/".to_string()),
        Just("/home/u/proj".to_string()),
        Just("\u{1b}[31m".to_string()),
        Just("\u{1b}".to_string()),
        Just("\n    at node:internal/loader:1:2".to_string()),
        Just("\n    at packages/compiler/src/a.js:3:4".to_string()),
        Just("\r\n  at ".to_string()),
        "[a-zA-Z0-9 ./:()]{0,12}",
        "\n",
    ];
    proptest::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in trace_strategy()) {
        let normalizer = normalizer();
        let once = normalizer.normalize(&raw);

        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn normalization_is_idempotent_on_arbitrary_text(raw in ".*") {
        let normalizer = normalizer();
        let once = normalizer.normalize(&raw);

        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn normalized_trace_has_no_escape_bytes(raw in trace_strategy()) {
        let out = normalizer().normalize(&raw);

        prop_assert!(!out.contains('\x1b'));
    }
}
