//! Go lexer built on logos, with automatic semicolon insertion.
//!
//! Logos produces raw tokens including trivia. [`lex`] drops spaces and
//! comments and turns a newline into an implicit `;` when the previous
//! token can end a statement, exactly like the Go scanner does.

use logos::Logos;

use crate::error::SyntaxError;
use crate::token::{Span, Token, TokenKind};

/// Raw token from logos (before trivia removal).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
#[logos(subpattern dec = r"[0-9](_?[0-9])*")]
#[logos(subpattern hex = r"[0-9a-fA-F](_?[0-9a-fA-F])*")]
#[logos(subpattern exp = r"[eE][+-]?(?&dec)")]
#[logos(subpattern esc = r"\\([abfnrtv\\]|[0-7][0-7][0-7]|x[0-9a-fA-F][0-9a-fA-F]|u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]|U[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F])")]
enum RawToken {
    // === Trivia ===
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // === Keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    Define,
    #[token("...")]
    Ellipsis,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token("[")]
    LBracket,
    #[token("{")]
    LBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(")")]
    RParen,
    #[token("]")]
    RBracket,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // === Literals ===
    #[regex(r"0[xX]_?(?&hex)i?")]
    #[regex(r"0[bB]_?[01](_?[01])*i?")]
    #[regex(r"0[oO]_?[0-7](_?[0-7])*i?")]
    #[regex(r"(?&dec)i?")]
    #[regex(r"(?&dec)\.(?&dec)?(?&exp)?i?")]
    #[regex(r"(?&dec)(?&exp)i?")]
    #[regex(r"\.(?&dec)(?&exp)?i?")]
    #[regex(r"0[xX]_?((?&hex)(\.(?&hex)?)?|\.(?&hex))[pP][+-]?(?&dec)i?")]
    Number,

    #[regex(r"'([^'\\\n]|(?&esc))'")]
    #[regex(r"'\\''")]
    Rune,

    #[regex(r#""([^"\\\n]|(?&esc)|\\")*""#)]
    Str,

    #[regex(r"`[^`]*`")]
    RawStr,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Ident,
}

impl RawToken {
    /// Map a non-trivia raw token to the parser's token kind.
    fn cook(self) -> Option<TokenKind> {
        let kind = match self {
            RawToken::Newline | RawToken::LineComment | RawToken::BlockComment => return None,
            RawToken::Break => TokenKind::Break,
            RawToken::Case => TokenKind::Case,
            RawToken::Chan => TokenKind::Chan,
            RawToken::Const => TokenKind::Const,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Default => TokenKind::Default,
            RawToken::Defer => TokenKind::Defer,
            RawToken::Else => TokenKind::Else,
            RawToken::Fallthrough => TokenKind::Fallthrough,
            RawToken::For => TokenKind::For,
            RawToken::Func => TokenKind::Func,
            RawToken::Go => TokenKind::Go,
            RawToken::Goto => TokenKind::Goto,
            RawToken::If => TokenKind::If,
            RawToken::Import => TokenKind::Import,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Map => TokenKind::Map,
            RawToken::Package => TokenKind::Package,
            RawToken::Range => TokenKind::Range,
            RawToken::Return => TokenKind::Return,
            RawToken::Select => TokenKind::Select,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Switch => TokenKind::Switch,
            RawToken::Type => TokenKind::Type,
            RawToken::Var => TokenKind::Var,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Shl => TokenKind::Shl,
            RawToken::Shr => TokenKind::Shr,
            RawToken::AndNot => TokenKind::AndNot,
            RawToken::PlusAssign => TokenKind::PlusAssign,
            RawToken::MinusAssign => TokenKind::MinusAssign,
            RawToken::StarAssign => TokenKind::StarAssign,
            RawToken::SlashAssign => TokenKind::SlashAssign,
            RawToken::PercentAssign => TokenKind::PercentAssign,
            RawToken::AmpAssign => TokenKind::AmpAssign,
            RawToken::PipeAssign => TokenKind::PipeAssign,
            RawToken::CaretAssign => TokenKind::CaretAssign,
            RawToken::ShlAssign => TokenKind::ShlAssign,
            RawToken::ShrAssign => TokenKind::ShrAssign,
            RawToken::AndNotAssign => TokenKind::AndNotAssign,
            RawToken::AndAnd => TokenKind::AndAnd,
            RawToken::OrOr => TokenKind::OrOr,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Inc => TokenKind::Inc,
            RawToken::Dec => TokenKind::Dec,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Assign => TokenKind::Assign,
            RawToken::Not => TokenKind::Not,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Define => TokenKind::Define,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::LParen => TokenKind::LParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::RParen => TokenKind::RParen,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Number => TokenKind::Number,
            RawToken::Rune => TokenKind::Rune,
            RawToken::Str => TokenKind::Str,
            RawToken::RawStr => TokenKind::RawStr,
            RawToken::Ident => TokenKind::Ident,
        };
        Some(kind)
    }
}

#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Tokenize Go source. The result always ends with an `Eof` token.
pub(crate) fn lex(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut last: Option<TokenKind> = None;
    let mut lexer = RawToken::lexer(src);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(to_u32(range.start), to_u32(range.end));
        let Ok(raw) = result else {
            let message = if lexer.slice().starts_with(['"', '\'', '`']) {
                "invalid or unterminated literal".to_string()
            } else {
                format!("illegal character {:?}", lexer.slice())
            };
            return Err(SyntaxError::at(src, range.start, message));
        };

        match raw {
            RawToken::Newline => insert_semi(&mut tokens, &mut last, span),
            // The newline that ends the comment decides about insertion.
            RawToken::LineComment => {}
            RawToken::BlockComment => {
                if lexer.slice().contains('\n') {
                    insert_semi(&mut tokens, &mut last, span);
                }
            }
            _ => {
                if let Some(kind) = raw.cook() {
                    tokens.push(Token {
                        kind,
                        span,
                        implicit: false,
                    });
                    last = Some(kind);
                }
            }
        }
    }

    let end = to_u32(src.len());
    insert_semi(&mut tokens, &mut last, Span::new(end, end));
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        implicit: false,
    });
    Ok(tokens)
}

fn insert_semi(tokens: &mut Vec<Token>, last: &mut Option<TokenKind>, span: Span) {
    if last.is_some_and(TokenKind::ends_statement) {
        tokens.push(Token {
            kind: TokenKind::Semi,
            span,
            implicit: true,
        });
        *last = Some(TokenKind::Semi);
    }
}
