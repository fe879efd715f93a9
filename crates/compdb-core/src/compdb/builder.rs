//! Argument reconstruction for a single source file.

use std::path::{Path, PathBuf};

use crate::expand::{MacroEvaluator, expand_all};
use crate::graph::FlagSet;

/// Program name placed first in every argument list.
///
/// Consumers only need a non-empty executable; the real compiler is irrelevant.
pub const PLACEHOLDER_COMPILER: &str = "/bin/false";

/// Language of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    C,
    Cpp,
    Assembly,
    /// Unrecognized extension; compiled like assembly.
    Unknown,
}

impl SourceKind {
    /// Classify a path by extension. Matching is case-sensitive (`.S` and `.s` are both assembly).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("S" | "s" | "asm") => Self::Assembly,
            Some("c") => Self::C,
            Some("cpp" | "cc" | "mm") => Self::Cpp,
            _ => Self::Unknown,
        }
    }

    pub fn is_cpp(self) -> bool {
        self == Self::Cpp
    }

    /// Whether language-specific flag groups are skipped.
    pub fn is_assembly_like(self) -> bool {
        matches!(self, Self::Assembly | Self::Unknown)
    }
}

/// A source path together with its classified kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    /// Classify `path`, warning when its extension is not recognized.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = SourceKind::from_path(&path);
        if kind == SourceKind::Unknown {
            tracing::warn!(
                "Unknown file extension {:?} on file {}, treating as assembly",
                path.extension().map(|ext| ext.to_string_lossy()).unwrap_or_default(),
                path.display()
            );
        }
        Self { path, kind }
    }

    /// The path as it appears in the database.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Builds the argument list that reproduces one compilation.
pub struct ArgumentBuilder<'a> {
    evaluator: &'a dyn MacroEvaluator,
}

impl<'a> ArgumentBuilder<'a> {
    pub fn new(evaluator: &'a dyn MacroEvaluator) -> Self {
        Self { evaluator }
    }

    /// Assemble the arguments for `src` compiled with `flags`.
    ///
    /// Order: placeholder compiler, global, C, then C++ (C++ sources) or
    /// C-only (C sources), system includes, and finally the source itself.
    /// Nothing is deduplicated.
    pub fn build(&self, src: &SourceFile, flags: &FlagSet) -> Vec<String> {
        let mut args = vec![PLACEHOLDER_COMPILER.to_string()];
        args.extend(expand_all(self.evaluator, &flags.global));
        args.extend(expand_all(self.evaluator, &flags.c));
        if src.kind.is_cpp() {
            args.extend(expand_all(self.evaluator, &flags.cpp));
        } else if !src.kind.is_assembly_like() {
            args.extend(expand_all(self.evaluator, &flags.conly));
        }
        args.extend(expand_all(self.evaluator, &flags.system_include));
        args.push(src.display_path());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::MacroScope;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn flags() -> FlagSet {
        FlagSet {
            global: strings(&["-Wall"]),
            c: strings(&["-std=c11"]),
            cpp: strings(&["-std=c++17"]),
            conly: strings(&["-Wstrict-prototypes"]),
            system_include: strings(&["-I/inc"]),
        }
    }

    #[test]
    fn test_classify_extensions() {
        let cases = [
            ("a.c", SourceKind::C),
            ("a.cpp", SourceKind::Cpp),
            ("a.cc", SourceKind::Cpp),
            ("a.mm", SourceKind::Cpp),
            ("a.S", SourceKind::Assembly),
            ("a.s", SourceKind::Assembly),
            ("a.asm", SourceKind::Assembly),
            ("a.xyz", SourceKind::Unknown),
            ("Makefile", SourceKind::Unknown),
            ("a.C", SourceKind::Unknown),
        ];
        for (path, expected) in cases {
            assert_eq!(SourceKind::from_path(Path::new(path)), expected, "{path}");
        }
    }

    #[test]
    fn test_c_source_gets_conly_flags() {
        let scope = MacroScope::new();
        let args = ArgumentBuilder::new(&scope).build(&SourceFile::classify("a.c"), &flags());
        assert_eq!(
            args,
            vec!["/bin/false", "-Wall", "-std=c11", "-Wstrict-prototypes", "-I/inc", "a.c"]
        );
    }

    #[test]
    fn test_cpp_source_gets_cpp_flags() {
        let scope = MacroScope::new();
        let args = ArgumentBuilder::new(&scope).build(&SourceFile::classify("b.cc"), &flags());
        assert_eq!(
            args,
            vec!["/bin/false", "-Wall", "-std=c11", "-std=c++17", "-I/inc", "b.cc"]
        );
    }

    #[test]
    fn test_assembly_skips_language_flags() {
        let scope = MacroScope::new();
        let args = ArgumentBuilder::new(&scope).build(&SourceFile::classify("start.S"), &flags());
        assert_eq!(args, vec!["/bin/false", "-Wall", "-std=c11", "-I/inc", "start.S"]);
    }

    #[test]
    fn test_unknown_extension_is_treated_as_assembly() {
        let scope = MacroScope::new();
        let src = SourceFile::classify("foo.xyz");
        assert_eq!(src.kind, SourceKind::Unknown);

        let args = ArgumentBuilder::new(&scope).build(&src, &flags());
        assert_eq!(args, vec!["/bin/false", "-Wall", "-std=c11", "-I/inc", "foo.xyz"]);
    }

    #[test]
    fn test_flags_are_expanded_and_not_deduplicated() {
        let scope = MacroScope::from_iter([("Opt", "-O2 -Wall")]);
        let flags = FlagSet {
            global: strings(&["-Wall", "$Opt", ""]),
            ..FlagSet::default()
        };
        let args = ArgumentBuilder::new(&scope).build(&SourceFile::classify("a.c"), &flags);
        assert_eq!(args, vec!["/bin/false", "-Wall", "-O2", "-Wall", "a.c"]);
    }

    #[test]
    fn test_empty_flags_still_yield_compiler_and_source() {
        let scope = MacroScope::new();
        let args = ArgumentBuilder::new(&scope)
            .build(&SourceFile::classify("dir/a.cpp"), &FlagSet::default());
        assert_eq!(args, vec!["/bin/false", "dir/a.cpp"]);
    }
}
