//! Reuse: `@const` + `@use`, typography presets, and theme defines.

use ctrl_core::{CtrlError, ScopeRegistry, Theme, compile};
use insta::assert_snapshot;

fn compile_with(theme: &Theme, source: &str) -> Result<String, CtrlError> {
    let mut registry = ScopeRegistry::new();
    compile(source, theme, &mut registry)
}

fn compile_one(source: &str) -> Result<String, CtrlError> {
    compile_with(&Theme::standard(), source)
}

// ============================================================================
// CONSTANTS
// ============================================================================

#[test]
fn test_use_merges_constant_first() {
    let source = "\
@const base {
  bg[red] c[white]
  hover(c[gray])
}

.box {
  @use base
  bg[blue]
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(css, @".box{background:blue;color:white;}.box:hover{color:gray;}");
}

#[test]
fn test_use_several_constants() {
    let source = "\
@const a {
  w[1px] h[1px]
}
@const b {
  h[2px]
  screen(max-w[10px], d[none])
}

.box {
  @use a b
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @".box{width:1px;height:2px;}@media only screen and (max-width:10px){.box{display:none;}}"
    );
}

#[test]
fn test_constant_runtime_variable_is_qualified_per_class() {
    let source = "\
@const dyn {
  $bg[red]
}

.a {
  @use dyn
}
.b {
  @use dyn
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @":root{--bg-a:red;}.a{background:var(--bg-a);}:root{--bg-b:red;}.b{background:var(--bg-b);}"
    );
}

#[test]
fn test_constant_local_reference_resolves_in_class() {
    let source = "\
@const spaced {
  p[--&gap]
}

.box {
  --&gap[4px]
  @use spaced
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(css, @".box{--gap-box:4px;padding:var(--gap-box);}");

    let missing = "@const spaced {\n  p[--&gap]\n}\n.box {\n  @use spaced\n}";
    assert!(matches!(compile_one(missing).unwrap_err(), CtrlError::VariableScope(_)));
}

#[test]
fn test_constant_errors() {
    let unknown = ".box {\n  @use nope\n}";
    assert!(matches!(compile_one(unknown).unwrap_err(), CtrlError::LookupMiss(_)));

    let important = "@const a {\n  bg[red]!\n}";
    assert!(matches!(compile_one(important).unwrap_err(), CtrlError::DirectiveSyntax(_)));

    let local = "@const a {\n  --&gap[1px]\n}";
    assert!(matches!(compile_one(local).unwrap_err(), CtrlError::VariableScope(_)));

    let query = "@const a {\n  @query .x {\n    c[red]\n  }\n}";
    assert!(matches!(compile_one(query).unwrap_err(), CtrlError::DirectiveSyntax(_)));

    let duplicate = "@const a {\n  c[red]\n}\n@const a {\n  c[blue]\n}";
    assert!(matches!(compile_one(duplicate).unwrap_err(), CtrlError::NameCollision(_)));

    let bad_name = "@const my.base {\n  c[red]\n}";
    assert!(matches!(compile_one(bad_name).unwrap_err(), CtrlError::DirectiveSyntax(_)));

    let twice = "@const a {\n  c[red]\n}\n.box {\n  @use a\n  @use a\n}";
    assert!(matches!(compile_one(twice).unwrap_err(), CtrlError::Syntax(_)));
}

// ============================================================================
// TYPOGRAPHY
// ============================================================================

#[test]
fn test_typography_expands_inline() {
    let theme = Theme::standard().with_typography("h1", "fs[32px] fw[700]");
    let css = compile_with(&theme, ".t { ty[h1] c[red] }").unwrap();
    assert_snapshot!(css, @".t{font-size:32px;font-weight:700;color:red;}");
}

#[test]
fn test_typography_in_state() {
    let theme = Theme::standard().with_typography("h1", "fs[32px] fw[700]");
    let css = compile_with(&theme, ".t { hover(ty[h1]) }").unwrap();
    assert_snapshot!(css, @".t:hover{font-size:32px;font-weight:700;}");
}

#[test]
fn test_typography_errors() {
    let theme = Theme::standard().with_typography("h1", "fs[32px]");
    let err = compile_with(&theme, ".t { ty[h2] }").unwrap_err();
    assert!(matches!(err, CtrlError::LookupMiss(_)));

    let err = compile_with(&theme, ".t { ty[h1]! }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));

    let err = compile_with(&theme, ".t { hover(ty[h1]!) }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));
}

// ============================================================================
// THEME DEFINES
// ============================================================================

fn themed() -> Theme {
    let mut theme = Theme::standard();
    theme
        .define("btn", "primary", "bg[blue] c[white]\nhover(bg[navy])")
        .unwrap();
    theme
}

#[test]
fn test_define_is_merged() {
    let css = compile_with(&themed(), ".b { btn[primary] p[4px] }").unwrap();
    assert_snapshot!(
        css,
        @".b{background:blue;color:white;padding:4px;}.b:hover{background:navy;}"
    );
}

#[test]
fn test_define_errors() {
    let theme = themed();

    let err = compile_with(&theme, ".b { btn[ghost] }").unwrap_err();
    assert!(matches!(err, CtrlError::LookupMiss(_)));

    let err = compile_with(&theme, ".b { btn[primary ghost] }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));

    let err = compile_with(&theme, ".b { btn[primary]! }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));
}

#[test]
fn test_define_name_colliding_with_abbreviation() {
    let mut theme = Theme::standard();
    theme.define("bg", "x", "c[red]").unwrap();
    let err = compile_with(&theme, ".b { bg[x] }").unwrap_err();
    assert!(matches!(err, CtrlError::NameCollision(_)));
}

// ============================================================================
// ABBREVIATIONS
// ============================================================================

#[test]
fn test_abbreviation_override() {
    let theme = Theme::standard().with_abbreviation("bg", "background-color");
    let css = compile_with(&theme, ".b { bg[red] }").unwrap();
    assert_snapshot!(css, @".b{background-color:red;}");
}

#[test]
fn test_unknown_abbreviation() {
    let err = compile_one(".b { nope[1px] }").unwrap_err();
    assert!(matches!(err, CtrlError::UnknownAbbreviation(_)));
    assert!(err.to_string().contains("nope"));
}
