use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn strip_joins_trimmed_lines() {
    assert_eq!(strip_space("  <a>\n    <b>  \n\t</a>\n"), "<a><b></a>");
}

#[test]
fn strip_keeps_inner_spaces() {
    assert_eq!(strip_space("  hello  world  "), "hello  world");
}

#[test]
fn collapse_runs() {
    assert_eq!(collapse_space("  a \n\n b\t\tc "), " a b c ");
}

#[test]
fn collapse_plain_text_unchanged() {
    assert_eq!(collapse_space("a b"), "a b");
}

proptest! {
    #[test]
    fn strip_output_has_no_newlines(s in "[ a-z\t\n]{0,40}") {
        prop_assert!(!strip_space(&s).contains('\n'));
    }

    #[test]
    fn collapse_never_has_double_space(s in "[ a-z\t\n]{0,40}") {
        let out = collapse_space(&s);
        prop_assert!(!out.contains("  "));
        prop_assert!(out.len() <= s.len());
    }
}
