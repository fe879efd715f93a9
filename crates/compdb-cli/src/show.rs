//! Show command implementation for compdb CLI.
//!
//! Summarizes a compile_commands.json, or prints one entry.

use std::path::Path;

use compdb_core::{CompilationDatabase, CompilationEntry, SourceKind};

use crate::colors;

/// Execute the show command.
pub fn execute(database_path: &Path, file: Option<&str>) -> anyhow::Result<()> {
    let db = CompilationDatabase::from_path(database_path)?;

    match file {
        Some(file) => {
            let Some(entry) = db.entry(file) else {
                anyhow::bail!("No entry for {} in {}", file, database_path.display());
            };
            print_entry(entry);
        }
        None => print_summary(&db, database_path),
    }

    Ok(())
}

fn print_entry(entry: &CompilationEntry) {
    println!("{}{}{}", colors::BOLD, entry.file, colors::RESET);
    println!("  {}directory:{} {}", colors::DIM, colors::RESET, entry.directory);
    if let Some(output) = &entry.output {
        println!("  {}output:{}    {}", colors::DIM, colors::RESET, output);
    }
    println!("  {}arguments:{}", colors::DIM, colors::RESET);
    for arg in &entry.arguments {
        println!("    {}", arg);
    }
}

/// Per-language entry counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct KindCounts {
    c: usize,
    cpp: usize,
    assembly: usize,
    unknown: usize,
}

impl KindCounts {
    fn tally(entries: &[CompilationEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match SourceKind::from_path(Path::new(&entry.file)) {
                SourceKind::C => counts.c += 1,
                SourceKind::Cpp => counts.cpp += 1,
                SourceKind::Assembly => counts.assembly += 1,
                SourceKind::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

fn print_summary(db: &CompilationDatabase, path: &Path) {
    let counts = KindCounts::tally(db.entries());

    println!(
        "\n{}compdb{} - {}",
        colors::BOLD,
        colors::RESET,
        path.display()
    );
    println!("{}", "─".repeat(50));
    println!("  {} entries", db.len());
    println!(
        "  {}C:{} {}  {}C++:{} {}  {}asm:{} {}  {}other:{} {}",
        colors::CYAN,
        colors::RESET,
        counts.c,
        colors::CYAN,
        colors::RESET,
        counts.cpp,
        colors::CYAN,
        colors::RESET,
        counts.assembly,
        colors::CYAN,
        colors::RESET,
        counts.unknown
    );
    let with_output = db.entries().iter().filter(|e| e.output.is_some()).count();
    println!("  {} entries with output paths", with_output);
}
