//! `@query` blocks, media and container conditions, and pseudo-elements.

use ctrl_core::{CtrlError, ScopeRegistry, Theme, compile};
use insta::assert_snapshot;

fn theme() -> Theme {
    Theme::standard()
        .with_breakpoint("md", "min-w[768px]")
        .with_breakpoint("sm", "max-w[300px]")
}

fn compile_one(source: &str) -> Result<String, CtrlError> {
    let mut registry = ScopeRegistry::new();
    compile(source, &theme(), &mut registry)
}

// ============================================================================
// QUERY BLOCKS
// ============================================================================

#[test]
fn test_descendant_query() {
    let source = "\
.box {
  bg[white]
  @query .child {
    c[red]
    hover(c[blue])
  }
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @".box{background:white;}.box .child{color:red;}.box .child:hover{color:blue;}"
    );
}

#[test]
fn test_ampersand_query() {
    let source = "\
@scope app
.list {
  d[flex]
  @query &:focus-within > p {
    op[0.5]
  }
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @".app_list{display:flex;}.app_list:focus-within > p{opacity:0.5;}"
    );
}

#[test]
fn test_query_inherits_local_variables() {
    let source = "\
.box {
  --&c[red]
  c[--&c]
  @query .t {
    bg[--&c]
  }
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @".box{--c-box:red;color:var(--c-box);}.box .t{--c-box:red;background:var(--c-box);}"
    );
}

#[test]
fn test_query_with_pseudo_and_screen() {
    let source = "\
.box {
  @query .icon {
    after(ct[x])
    screen(md, d[none])
  }
}";
    let css = compile_one(source).unwrap();
    assert_snapshot!(
        css,
        @r#"@media only screen and (min-width:768px){.box .icon{display:none;}}.box .icon::after{content:"x";}"#
    );
}

#[test]
fn test_query_errors() {
    let nested = "\
.box {
  @query .a {
    @query .b {
      c[red]
    }
  }
}";
    assert!(matches!(compile_one(nested).unwrap_err(), CtrlError::Syntax(_)));

    let local = "\
.box {
  @query .a {
    --&c[red]
  }
}";
    assert!(matches!(compile_one(local).unwrap_err(), CtrlError::VariableScope(_)));

    let unterminated = ".box {\n  @query .a {\n    c[red]\n}";
    assert!(matches!(compile_one(unterminated).unwrap_err(), CtrlError::Syntax(_)));
}

// ============================================================================
// SCREEN AND CONTAINER
// ============================================================================

#[test]
fn test_screen_and_container() {
    let css = compile_one(".box { w[50px] screen(md, w[100px]) container(sm, d[none]) }").unwrap();
    assert_snapshot!(
        css,
        @".box{width:50px;}@media only screen and (min-width:768px){.box{width:100px;}}@container (max-width:300px){.box{display:none;}}"
    );
}

#[test]
fn test_literal_conditions() {
    let css = compile_one(".box { screen(max-w[600px], p[0]) container(min-w[20rem], gap[1rem]) }")
        .unwrap();
    assert_snapshot!(
        css,
        @"@media only screen and (max-width:600px){.box{padding:0;}}@container (min-width:20rem){.box{gap:1rem;}}"
    );
}

#[test]
fn test_repeated_screens_are_kept() {
    let css = compile_one(".box { screen(md, w[1px]) screen(md, h[1px]) }").unwrap();
    assert_snapshot!(
        css,
        @"@media only screen and (min-width:768px){.box{width:1px;}}@media only screen and (min-width:768px){.box{height:1px;}}"
    );
}

#[test]
fn test_condition_errors() {
    let err = compile_one(".box { container(xl, d[none]) }").unwrap_err();
    assert!(matches!(err, CtrlError::LookupMiss(_)));

    let err = compile_one(".box { screen(md d[none]) }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));

    let err = compile_one(".box { screen(md, zz[1px]) }").unwrap_err();
    assert!(matches!(err, CtrlError::UnknownAbbreviation(_)));
}

// ============================================================================
// STATES AND PSEUDO-ELEMENTS
// ============================================================================

#[test]
fn test_pseudo_content_is_quoted() {
    let css = compile_one(".box { before(ct[★] c[red]) }").unwrap();
    assert_snapshot!(css, @r#".box::before{content:"★";color:red;}"#);
}

#[test]
fn test_states_keep_declaration_order() {
    let css = compile_one(".btn { focus(ol[none]) hover(c[red]) focus(bd[0]) }").unwrap();
    assert_snapshot!(
        css,
        @".btn:focus{outline:none;border:0;}.btn:hover{color:red;}"
    );
}

#[test]
fn test_unknown_call_is_malformed() {
    let err = compile_one(".box { wobble(c[red]) }").unwrap_err();
    assert!(matches!(err, CtrlError::Syntax(_)));
}
