#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use crate::TokenKind::{TagContents, TagName, Text};

fn collect(src: &str) -> (Vec<(TokenKind, String)>, Option<ScanError>) {
    let mut s = Scanner::new(src, "test.qtpl");
    let mut out = Vec::new();
    while s.next() {
        let t = s.token();
        out.push((t.kind, t.value.clone()));
    }
    (out, s.last_error().cloned())
}

fn tokens(src: &str) -> Vec<(TokenKind, String)> {
    let (toks, err) = collect(src);
    assert_eq!(err, None);
    toks
}

fn t(kind: TokenKind, v: &str) -> (TokenKind, String) {
    (kind, v.to_string())
}

#[test]
fn text_and_tags() {
    assert_eq!(
        tokens("Hi {% s name %}!"),
        vec![
            t(Text, "Hi "),
            t(TagName, "s"),
            t(TagContents, "name"),
            t(Text, "!"),
        ]
    );
}

#[test]
fn tag_without_contents_still_yields_contents_token() {
    assert_eq!(
        tokens("{% endfunc %}"),
        vec![t(TagName, "endfunc"), t(TagContents, "")]
    );
}

#[test]
fn contents_are_trimmed_and_keep_inner_space() {
    assert_eq!(
        tokens("{%func  Greet(a, b int)   %}"),
        vec![t(TagName, "func"), t(TagContents, "Greet(a, b int)")]
    );
}

#[test]
fn multiline_contents() {
    assert_eq!(
        tokens("{% code\n  x := 1\n  y := 2\n%}"),
        vec![t(TagName, "code"), t(TagContents, "x := 1\n  y := 2")]
    );
}

#[test]
fn plain_block_is_verbatim() {
    assert_eq!(
        tokens("{% plain %}{% s x %}{% endplain %}"),
        vec![t(Text, "{% s x %}")]
    );
}

#[test]
fn comment_block_is_dropped() {
    assert_eq!(
        tokens("a{% comment %} {% for %} {% endcomment %}b"),
        vec![t(Text, "a"), t(Text, "b")]
    );
}

#[test]
fn stripspace_block() {
    assert_eq!(
        tokens("{% stripspace %}\n  <a>\n  <b>\n{% endstripspace %}"),
        vec![t(Text, "<a><b>")]
    );
}

#[test]
fn collapsespace_block() {
    assert_eq!(
        tokens("{% collapsespace %}  a  \n b {% endcollapsespace %}"),
        vec![t(Text, " a b ")]
    );
}

#[test]
fn space_and_newline_tags() {
    assert_eq!(
        tokens("{% stripspace %}a{% space %}b{% newline %}{% endstripspace %}"),
        vec![t(Text, "a"), t(Text, " "), t(Text, "b"), t(Text, "\n")]
    );
}

#[test]
fn positions_are_line_and_column() {
    let mut s = Scanner::new("line1\n  {% s x %}", "p.qtpl");
    assert!(s.next());
    assert_eq!(s.token().pos, Position::new(1, 1));
    assert!(s.next());
    assert_eq!(s.token().kind, TokenKind::TagName);
    assert_eq!(s.token().pos, Position::new(2, 3));
}

#[test]
fn rewind_replays_current_token() {
    let mut s = Scanner::new("{% case 1 %}", "p.qtpl");
    assert!(s.next());
    assert_eq!(s.token().value, "case");
    s.rewind();
    assert!(s.next());
    assert_eq!(s.token().value, "case");
    assert!(s.next());
    assert_eq!(s.token().kind, TokenKind::TagContents);
    assert!(!s.next());
}

#[test]
fn context_names_file_and_token() {
    let mut s = Scanner::new("{% func F() %}", "dir/p.qtpl");
    s.next();
    let ctx = s.context();
    assert!(ctx.contains("\"dir/p.qtpl\""), "{ctx}");
    assert!(ctx.contains("line 1"), "{ctx}");
    assert!(ctx.contains("tagName \"func\""), "{ctx}");
}

#[test]
fn unclosed_tag_is_an_error() {
    let (toks, err) = collect("abc {% s x ");
    assert_eq!(toks, vec![t(Text, "abc ")]);
    assert!(matches!(err, Some(ScanError::UnclosedTag { .. })));
}

#[test]
fn empty_tag_name_is_an_error() {
    let (_, err) = collect("{% %}");
    assert!(matches!(err, Some(ScanError::EmptyTagName { .. })));
}

#[test]
fn unterminated_plain_is_an_error() {
    let (_, err) = collect("{% plain %} abc");
    assert!(matches!(
        err,
        Some(ScanError::UnterminatedBlock { start: "plain", .. })
    ));
}

#[test]
fn unmatched_endstripspace_is_an_error() {
    let (_, err) = collect("{% endstripspace %}");
    assert!(matches!(err, Some(ScanError::UnmatchedEnd { .. })));
}

#[test]
fn error_is_sticky() {
    let mut s = Scanner::new("{% x", "p.qtpl");
    assert!(!s.next());
    assert!(!s.next());
    assert!(s.last_error().is_some());
}

proptest! {
    #[test]
    fn text_without_tags_is_one_token(src in "[a-zA-Z0-9 \n<>/]{1,60}") {
        let toks = tokens(&src);
        prop_assert_eq!(toks, vec![(Text, src.clone())]);
    }

    #[test]
    fn tags_always_come_in_pairs(name in "[a-z]{1,8}", body in "[a-z0-9 ]{0,16}") {
        prop_assume!(!matches!(
            name.as_str(),
            "plain" | "comment" | "stripspace" | "endstripspace"
                | "collapsespace" | "endcollapsespace" | "space" | "newline"
        ));
        let toks = tokens(&format!("{{% {name} {body} %}}"));
        prop_assert_eq!(toks.len(), 2);
        prop_assert_eq!(&toks[0], &(TagName, name.clone()));
        prop_assert_eq!(&toks[1], &(TagContents, body.trim().to_string()));
    }
}
