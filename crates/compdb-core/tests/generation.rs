//! Integration tests for compilation database generation.
//!
//! Tests the full pipeline: manifest → graph walk → compile_commands.json.

use std::fs;
use std::path::{Path, PathBuf};

use compdb_core::{
    CompdbConfig, CompdbPaths, CompilationDatabase, FilePublisher, Format, GenerationPass,
    ManifestGraph, collect_entries, generate, render,
};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a temporary directory for test artifacts.
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Write a manifest into `dir` and load it.
fn load(dir: &Path, json: &str) -> ManifestGraph {
    let path = dir.join("graph.json");
    fs::write(&path, json).expect("Failed to write manifest");
    ManifestGraph::from_path(&path).expect("Failed to load manifest")
}

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Two modules sharing `a.c`, plus variables and a non-compiled module.
fn shared_source_manifest() -> &'static str {
    r#"{
        "variables": {
            "Opt": "-O2 -g",
            "IncludeRoot": "/inc"
        },
        "modules": [
            {
                "name": "module_a",
                "srcs": ["a.c", "start.S", "foo.xyz"],
                "flags": {
                    "global": ["-Wall"],
                    "c": ["-std=c11"],
                    "cpp": ["-std=c++17"],
                    "conly": ["-Wstrict-prototypes"],
                    "system_include": ["-I$IncludeRoot"]
                }
            },
            {
                "name": "module_b",
                "srcs": ["a.c", "b.cpp"],
                "flags": {
                    "global": ["$Opt", "", "-I${Undefined}/x"],
                    "cpp": ["-fno-exceptions"]
                },
                "deps": ["module_a", "prebuilt_ssl"]
            },
            { "name": "prebuilt_ssl", "kind": "prebuilt" }
        ]
    }"#
}

// =============================================================================
// Argument Reconstruction
// =============================================================================

#[test]
fn test_single_module_scenario() {
    let temp = temp_dir();
    let graph = load(
        temp.path(),
        r#"{ "modules": [ {
            "name": "A",
            "srcs": ["a.c"],
            "flags": { "global": ["-Wall"], "c": ["-std=c11"], "system_include": ["-I/inc"] }
        } ] }"#,
    );

    let entries = collect_entries(&graph).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].arguments,
        strings(&["/bin/false", "-Wall", "-std=c11", "-I/inc", "a.c"])
    );
    assert_eq!(entries[0].file, "a.c");
    assert_eq!(entries[0].directory, temp.path().to_string_lossy());
    assert_eq!(entries[0].output, None);
}

#[test]
fn test_first_visited_module_wins() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let entries = collect_entries(&graph).unwrap();
    let a = entries.iter().find(|e| e.file == "a.c").unwrap();

    assert_eq!(
        a.arguments,
        strings(&["/bin/false", "-Wall", "-std=c11", "-Wstrict-prototypes", "-I/inc", "a.c"])
    );
    assert_eq!(entries.iter().filter(|e| e.file == "a.c").count(), 1);
}

#[test]
fn test_expansion_and_fallback() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let entries = collect_entries(&graph).unwrap();
    let b = entries.iter().find(|e| e.file == "b.cpp").unwrap();

    // Empty flag dropped, unexpandable flag kept verbatim
    assert_eq!(
        b.arguments,
        strings(&["/bin/false", "-O2", "-g", "-I${Undefined}/x", "-fno-exceptions", "b.cpp"])
    );
    assert!(entries.iter().all(|e| e.arguments.iter().all(|arg| !arg.is_empty())));
}

#[test]
fn test_assembly_and_unknown_sources() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let entries = collect_entries(&graph).unwrap();
    for file in ["start.S", "foo.xyz"] {
        let entry = entries.iter().find(|e| e.file == file).unwrap();
        assert_eq!(
            entry.arguments,
            strings(&["/bin/false", "-Wall", "-std=c11", "-I/inc", file])
        );
    }
}

#[test]
fn test_every_entry_is_unique_and_non_empty() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let entries = collect_entries(&graph).unwrap();
    let mut files: Vec<&str> = entries.iter().map(|e| e.file.as_str()).collect();
    files.dedup();

    assert_eq!(files, vec!["a.c", "b.cpp", "foo.xyz", "start.S"]);
    assert!(entries.iter().all(|e| e.arguments.first().map(String::as_str) == Some("/bin/false")));
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_round_trip() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());
    let entries = collect_entries(&graph).unwrap();

    for format in [Format::Compact, Format::Pretty] {
        let json = render(&entries, format).unwrap();
        let parsed = CompilationDatabase::parse(&json).unwrap();
        assert_eq!(parsed.entries(), entries.as_slice());
    }
}

#[test]
fn test_generation_is_idempotent() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let first = render(&collect_entries(&graph).unwrap(), Format::Compact).unwrap();
    let second = render(&collect_entries(&graph).unwrap(), Format::Compact).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_module_order_only_affects_shared_sources() {
    let temp = temp_dir();
    let forward = load(
        temp.path(),
        r#"{ "modules": [
            { "name": "x", "srcs": ["x.c"], "flags": { "global": ["-DX"] } },
            { "name": "y", "srcs": ["y.c"], "flags": { "global": ["-DY"] } }
        ] }"#,
    );
    let reverse = load(
        temp.path(),
        r#"{ "modules": [
            { "name": "y", "srcs": ["y.c"], "flags": { "global": ["-DY"] } },
            { "name": "x", "srcs": ["x.c"], "flags": { "global": ["-DX"] } }
        ] }"#,
    );

    assert_eq!(
        render(&collect_entries(&forward).unwrap(), Format::Compact).unwrap(),
        render(&collect_entries(&reverse).unwrap(), Format::Compact).unwrap()
    );
}

// =============================================================================
// Publishing
// =============================================================================

#[test]
fn test_disabled_generation_writes_nothing() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let report = generate(&graph, CompdbConfig::from_lookup(|_| None)).unwrap();

    assert!(report.is_none());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_generate_writes_standard_location() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());

    let report = generate(&graph, CompdbConfig::enabled())
        .unwrap()
        .expect("generation should run");

    let expected = temp
        .path()
        .join("out/development/ide/compdb/compile_commands.json");
    assert_eq!(report.output_path, expected);
    assert_eq!(report.entries, 4);
    assert_eq!(report.modules_visited, 3);
    assert_eq!(report.compiled_modules, 2);
    assert_eq!(report.duplicates_skipped, 1);

    let db = CompilationDatabase::from_path(&expected).unwrap();
    assert_eq!(db.len(), 4);
    assert!(db.entry("b.cpp").is_some());
}

#[cfg(unix)]
#[test]
fn test_generate_links_into_configured_directory() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());
    let link_dir = temp.path().join("ide");
    fs::create_dir_all(&link_dir).unwrap();

    let config = CompdbConfig::from_lookup(|name| match name {
        "GEN_COMPDB" => Some("1".to_string()),
        "GEN_COMPDB_DEBUG" => Some("true".to_string()),
        "LINK_COMPDB_TO" => Some(link_dir.to_string_lossy().into_owned()),
        _ => None,
    });
    let report = generate(&graph, config).unwrap().unwrap();

    let link = link_dir.join("compile_commands.json");
    assert_eq!(report.link_path, Some(link.clone()));
    assert_eq!(fs::read_link(&link).unwrap(), report.output_path);

    let contents = fs::read_to_string(&link).unwrap();
    assert!(contents.starts_with("[\n {"));
}

#[test]
fn test_pass_with_custom_output_dir() {
    let temp = temp_dir();
    let graph = load(temp.path(), shared_source_manifest());
    let out = temp.path().join("custom");

    let publisher = FilePublisher::new(CompdbPaths::in_dir(&out));
    let report = GenerationPass::new(&graph, publisher, CompdbConfig::enabled())
        .run()
        .unwrap()
        .unwrap();

    assert_eq!(report.output_path, out.join("compile_commands.json"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_output_paths_from_obj_dir() {
    let temp = temp_dir();
    let graph = load(
        temp.path(),
        r#"{ "modules": [ {
            "name": "libfoo",
            "srcs": ["foo/a.cpp"],
            "obj_dir": "out/obj/libfoo"
        } ] }"#,
    );

    let entries = collect_entries(&graph).unwrap();
    assert_eq!(
        entries[0].output.as_deref().map(PathBuf::from),
        Some(PathBuf::from("out/obj/libfoo/foo/a.o"))
    );
}
