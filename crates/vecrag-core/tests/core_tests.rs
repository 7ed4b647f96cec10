use std::fs;
use tempfile::TempDir;

use vecrag_core::answer::{naive_answer, NO_CONTEXT_MESSAGE};
use vecrag_core::chunker::{chunk_text, normalize, ChunkParams};
use vecrag_core::reader::read_file;
use vecrag_core::types::{Chunk, Hit};
use vecrag_core::walk::{list_files, DEFAULT_EXTENSIONS};

fn ascii_text(len: usize) -> String {
    ('a'..='z').cycle().take(len).collect()
}

#[test]
fn empty_input_yields_no_chunks() {
    let params = ChunkParams::default();
    assert!(chunk_text("", &params).is_empty());
    assert!(chunk_text("   \n\n  \n", &params).is_empty(), "whitespace-only input normalizes away");
}

#[test]
fn short_input_yields_exactly_one_chunk() {
    let params = ChunkParams::default();
    let text = ascii_text(400);
    let chunks = chunk_text(&text, &params);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], text);
}

#[test]
fn thousand_chars_yield_two_overlapping_chunks() {
    // The end-to-end scenario from the pipeline contract: 1000 chars at
    // size 900 / overlap 150 must produce exactly two windows.
    let params = ChunkParams::default();
    let text = ascii_text(1000);
    let chunks = chunk_text(&text, &params);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chars().count(), 900);
    assert_eq!(chunks[1].chars().count(), 250);
    assert_eq!(chunks[1], text[750..1000]);
}

#[test]
fn chunks_reconstruct_normalized_input() {
    let params = ChunkParams { size: 100, overlap: 20 };
    let text = "  line one  \n\n line two \n".repeat(40);
    let normalized = normalize(&text);
    let chunks = chunk_text(&text, &params);

    let mut rebuilt = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            rebuilt.push_str(chunk);
        } else {
            rebuilt.extend(chunk.chars().skip(params.overlap));
        }
    }
    assert_eq!(rebuilt, normalized);
}

#[test]
fn chunk_count_matches_window_formula() {
    let params = ChunkParams::default();
    for len in [1000usize, 2000, 5000] {
        let text = ascii_text(len);
        let expected = (len - params.overlap).div_ceil(params.size - params.overlap);
        assert_eq!(chunk_text(&text, &params).len(), expected, "len={len}");
    }
}

#[test]
fn normalize_trims_and_drops_blank_lines() {
    let text = "  alpha  \n\n\t\n   beta\ngamma   \n";
    assert_eq!(normalize(text), "alpha\nbeta\ngamma");
}

#[test]
fn chunk_params_reject_stalling_overlap() {
    assert!(ChunkParams::validated(900, 150).is_ok());
    assert!(ChunkParams::validated(100, 100).is_err());
    assert!(ChunkParams::validated(100, 200).is_err());
    assert!(ChunkParams::validated(0, 0).is_err());
}

#[test]
fn record_ids_are_deterministic_and_distinct() {
    let a = Chunk { text: "x".into(), source: "notes.txt".into(), idx: 0 };
    let b = Chunk { text: "x".into(), source: "notes.txt".into(), idx: 1 };
    let c = Chunk { text: "x".into(), source: "other.txt".into(), idx: 0 };
    assert_eq!(a.record_id(), "notes.txt::chunk0");
    assert_eq!(b.record_id(), "notes.txt::chunk1");
    assert_ne!(a.record_id(), c.record_id());
}

#[test]
fn html_markup_is_stripped_to_visible_text() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("page.html");
    fs::write(
        &path,
        "<html><body><h1>Title</h1><p>Hello <b>world</b></p><p>Second block</p></body></html>",
    )
    .expect("write");

    let text = read_file(&path).expect("read");
    assert!(!text.contains('<'), "no tags survive: {text}");
    assert!(text.contains("Title"));
    assert!(text.contains("world"));
    // Block boundaries become line boundaries.
    assert!(text.lines().count() >= 3, "fragments on separate lines: {text:?}");
}

#[test]
fn plain_text_is_returned_raw() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("notes.txt");
    fs::write(&path, "<h1>not html, kept as-is</h1>").expect("write");
    let text = read_file(&path).expect("read");
    assert_eq!(text, "<h1>not html, kept as-is</h1>");
}

#[test]
fn invalid_bytes_are_replaced_not_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("notes.txt");
    fs::write(&path, b"caf\xff\xfe tail").expect("write");
    let text = read_file(&path).expect("read");
    assert!(text.starts_with("caf"));
    assert!(text.ends_with("tail"));
}

#[test]
fn missing_file_propagates_io_error() {
    let tmp = TempDir::new().expect("tempdir");
    assert!(read_file(&tmp.path().join("absent.txt")).is_err());
}

#[test]
fn walk_filters_and_sorts_by_full_path() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "b").expect("write");
    fs::write(dir.join("a.md"), "a").expect("write");
    fs::write(dir.join("c.rs"), "ignored").expect("write");
    fs::create_dir(dir.join("sub")).expect("mkdir");
    fs::write(dir.join("sub").join("d.json"), "{}").expect("write");

    let files = list_files(dir, DEFAULT_EXTENSIONS);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir).expect("prefix").to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.md", "b.txt", "sub/d.json"]);
}

#[test]
fn compound_extension_matches_only_final_suffix() {
    // A file literally named x.md.txt is a .txt file and counts once.
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("x.md.txt"), "text").expect("write");
    let files = list_files(tmp.path(), DEFAULT_EXTENSIONS);
    assert_eq!(files.len(), 1);

    let only_md = list_files(tmp.path(), &["md"]);
    assert!(only_md.is_empty(), ".md must not match x.md.txt");
}

fn sample_hits() -> Vec<Hit> {
    vec![
        Hit {
            text: "first\nresult ".to_string() + &ascii_text(400),
            source: "notes.txt".to_string(),
            chunk_index: 0,
            distance: 0.1,
        },
        Hit { text: "short".to_string(), source: "sub/more.md".to_string(), chunk_index: 3, distance: 0.4 },
    ]
}

#[test]
fn empty_hits_give_fixed_no_context_message() {
    assert_eq!(naive_answer("anything", &[]), NO_CONTEXT_MESSAGE);
}

#[test]
fn answer_lists_hits_with_truncated_snippets() {
    let answer = naive_answer("q", &sample_hits());
    let lines: Vec<&str> = answer.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one line per hit");
    assert!(lines[1].starts_with("1. [notes.txt#chunk0] "));
    assert!(lines[2].starts_with("2. [sub/more.md#chunk3] "));
    assert!(lines[1].ends_with("..."));

    // 280 chars max, newlines collapsed to spaces.
    let snippet = lines[1]
        .trim_start_matches("1. [notes.txt#chunk0] ")
        .trim_end_matches("...");
    assert_eq!(snippet.chars().count(), 280);
    assert!(snippet.starts_with("first result "));
}

#[test]
fn answer_depends_only_on_hits() {
    let hits = sample_hits();
    assert_eq!(naive_answer("who", &hits), naive_answer("completely different", &hits));
}
