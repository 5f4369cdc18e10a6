//! Include resolution.
//!
//! The parser never touches the filesystem itself. It is handed a
//! [`SourceResolver`], which may be backed by a real directory
//! ([`DirResolver`]) or an in-memory virtual one ([`MemoryResolver`]).
//! The latter also ships the standard `qelib1.inc` gate library so a
//! program can be compiled with no files on disk at all.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// Text of `qelib1.inc`: the standard gate library, defined over the
/// built-ins `U` and `CX`.
pub const QELIB1: &str = r#"// Standard gate library over U and CX.
gate u3(theta,phi,lambda) q { U(theta,phi,lambda) q; }
gate u2(phi,lambda) q { U(pi/2,phi,lambda) q; }
gate u1(lambda) q { U(0,0,lambda) q; }
gate cx c,t { CX c,t; }
gate id a { U(0,0,0) a; }
gate x a { u3(pi,0,pi) a; }
gate y a { u3(pi,pi/2,pi/2) a; }
gate z a { u1(pi) a; }
gate h a { u2(0,pi) a; }
gate s a { u1(pi/2) a; }
gate sdg a { u1(-pi/2) a; }
gate t a { u1(pi/4) a; }
gate tdg a { u1(-pi/4) a; }
gate rx(theta) a { u3(theta,-pi/2,pi/2) a; }
gate ry(theta) a { u3(theta,0,0) a; }
gate rz(phi) a { u1(phi) a; }
gate cz a,b { h b; cx a,b; h b; }
gate cy a,b { sdg b; cx a,b; s b; }
gate ch a,b { h b; sdg b; cx a,b; h b; t b; cx a,b; t b; h b; s b; x b; s a; }
gate swap a,b { cx a,b; cx b,a; cx a,b; }
gate ccx a,b,c { h c; cx b,c; tdg c; cx a,c; t c; cx b,c; tdg c; cx a,c; t b; t c; h c; cx a,b; t a; tdg b; cx a,b; }
gate crz(lambda) a,b { u1(lambda/2) b; cx a,b; u1(-lambda/2) b; cx a,b; }
gate cu1(lambda) a,b { u1(lambda/2) a; cx a,b; u1(-lambda/2) b; cx a,b; u1(lambda/2) b; }
gate cu3(theta,phi,lambda) c,t { u1((lambda-phi)/2) t; cx c,t; u3(-theta/2,0,-(phi+lambda)/2) t; cx c,t; u3(theta/2,phi,0) t; }
"#;

/// Resolves `include` filenames to source text.
///
/// Returning `None` means the file is not available; the parser turns
/// that into an include error at the directive's position.
pub trait SourceResolver {
    /// Look up `filename` and return its contents.
    fn resolve(&self, filename: &str) -> Option<String>;
}

/// In-memory virtual directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: FxHashMap<String, String>,
}

impl MemoryResolver {
    /// An empty virtual directory.
    pub fn new() -> Self {
        MemoryResolver::default()
    }

    /// A virtual directory holding `qelib1.inc`.
    pub fn with_standard_library() -> Self {
        MemoryResolver::new().with_file("qelib1.inc", QELIB1)
    }

    /// Add a file, replacing any previous contents under that name.
    pub fn insert(&mut self, filename: impl Into<String>, text: impl Into<String>) {
        self.files.insert(filename.into(), text.into());
    }

    /// Builder form of [`MemoryResolver::insert`].
    #[must_use]
    pub fn with_file(mut self, filename: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(filename, text);
        self
    }
}

impl SourceResolver for MemoryResolver {
    fn resolve(&self, filename: &str) -> Option<String> {
        self.files.get(filename).cloned()
    }
}

/// Resolver over a real directory.
#[derive(Debug, Clone)]
pub struct DirResolver {
    base: PathBuf,
}

impl DirResolver {
    /// Resolve includes relative to `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirResolver { base: base.into() }
    }
}

impl SourceResolver for DirResolver {
    fn resolve(&self, filename: &str) -> Option<String> {
        std::fs::read_to_string(self.base.join(filename)).ok()
    }
}
