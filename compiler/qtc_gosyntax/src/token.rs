//! Go token kinds as seen by the parser.

/// Byte range in the checked source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Cooked token kinds. Trivia (spaces, comments, newlines) never reach the
/// parser; newlines that end a statement arrive as an implicit [`Semi`].
///
/// [`Semi`]: TokenKind::Semi
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // === Literals ===
    Ident,
    Number,
    Rune,
    Str,
    RawStr,

    // === Keywords ===
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndNot,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AndAnd,
    OrOr,
    Arrow,
    Inc,
    Dec,
    EqEq,
    Lt,
    Gt,
    Assign,
    Not,
    Tilde,
    NotEq,
    LtEq,
    GtEq,
    Define,
    Ellipsis,

    // === Delimiters ===
    LParen,
    LBracket,
    LBrace,
    Comma,
    Dot,
    RParen,
    RBracket,
    RBrace,
    Semi,
    Colon,

    Eof,
}

impl TokenKind {
    /// Binary operator precedence, or 0 for non-operators.
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::OrOr => 1,
            TokenKind::AndAnd => 2,
            TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => 3,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Pipe | TokenKind::Caret => 4,
            TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Shl
            | TokenKind::Shr
            | TokenKind::Amp
            | TokenKind::AndNot => 5,
            _ => 0,
        }
    }

    /// Assignment operators (`=` and the `op=` family).
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::PercentAssign
                | TokenKind::AmpAssign
                | TokenKind::PipeAssign
                | TokenKind::CaretAssign
                | TokenKind::ShlAssign
                | TokenKind::ShrAssign
                | TokenKind::AndNotAssign
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::Rune | TokenKind::Str | TokenKind::RawStr
        )
    }

    /// Whether a newline after this token ends the statement.
    pub fn ends_statement(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Ident
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Fallthrough
                    | TokenKind::Return
                    | TokenKind::Inc
                    | TokenKind::Dec
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
            )
    }

    /// Spelling used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Rune => "rune literal",
            TokenKind::Str | TokenKind::RawStr => "string literal",
            TokenKind::Break => "'break'",
            TokenKind::Case => "'case'",
            TokenKind::Chan => "'chan'",
            TokenKind::Const => "'const'",
            TokenKind::Continue => "'continue'",
            TokenKind::Default => "'default'",
            TokenKind::Defer => "'defer'",
            TokenKind::Else => "'else'",
            TokenKind::Fallthrough => "'fallthrough'",
            TokenKind::For => "'for'",
            TokenKind::Func => "'func'",
            TokenKind::Go => "'go'",
            TokenKind::Goto => "'goto'",
            TokenKind::If => "'if'",
            TokenKind::Import => "'import'",
            TokenKind::Interface => "'interface'",
            TokenKind::Map => "'map'",
            TokenKind::Package => "'package'",
            TokenKind::Range => "'range'",
            TokenKind::Return => "'return'",
            TokenKind::Select => "'select'",
            TokenKind::Struct => "'struct'",
            TokenKind::Switch => "'switch'",
            TokenKind::Type => "'type'",
            TokenKind::Var => "'var'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::AndNot => "'&^'",
            TokenKind::PlusAssign => "'+='",
            TokenKind::MinusAssign => "'-='",
            TokenKind::StarAssign => "'*='",
            TokenKind::SlashAssign => "'/='",
            TokenKind::PercentAssign => "'%='",
            TokenKind::AmpAssign => "'&='",
            TokenKind::PipeAssign => "'|='",
            TokenKind::CaretAssign => "'^='",
            TokenKind::ShlAssign => "'<<='",
            TokenKind::ShrAssign => "'>>='",
            TokenKind::AndNotAssign => "'&^='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Arrow => "'<-'",
            TokenKind::Inc => "'++'",
            TokenKind::Dec => "'--'",
            TokenKind::EqEq => "'=='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::Not => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::NotEq => "'!='",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Define => "':='",
            TokenKind::Ellipsis => "'...'",
            TokenKind::LParen => "'('",
            TokenKind::LBracket => "'['",
            TokenKind::LBrace => "'{'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::RParen => "')'",
            TokenKind::RBracket => "']'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semi => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Eof => "EOF",
        }
    }
}

/// A cooked token.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Set on semicolons inserted at a newline or at end of input.
    pub implicit: bool,
}

impl Token {
    /// Spelling used in diagnostics; implicit semicolons read as "newline".
    pub fn describe(&self) -> &'static str {
        if self.implicit {
            if self.span.start == self.span.end {
                "EOF"
            } else {
                "newline"
            }
        } else {
            self.kind.describe()
        }
    }
}
