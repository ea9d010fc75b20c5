//! Structured nginx configuration source.
//!
//! Turns raw configuration text into an ordered tree of [`ConfigNode`]s.
//! Only the block/directive structure is recognized; directive names and
//! arguments are not validated.
//!
//! - `{` `}` delimit blocks, `;` ends a directive
//! - `"..."` and `'...'` are quoted strings (quotes removed)
//! - `#` starts a comment that runs to the end of the line
//! - whitespace, including newlines, only separates words

use logos::Logos;
use thiserror::Error;

/// One node of a parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNode {
    /// `name params { children }`
    Block {
        /// Block name, e.g. `server`.
        name: String,
        /// Words between the name and `{`, joined by single spaces.
        params: String,
        /// Nested nodes in declaration order.
        children: Vec<ConfigNode>,
    },
    /// `name argument;`
    Directive {
        /// Directive name, e.g. `listen`.
        name: String,
        /// Argument words joined by single spaces; empty if there are none.
        argument: String,
    },
}

impl ConfigNode {
    /// Creates a directive node.
    #[must_use]
    pub fn directive(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::Directive {
            name: name.into(),
            argument: argument.into(),
        }
    }

    /// Creates a block node without parameters.
    #[must_use]
    pub fn block(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Block {
            name: name.into(),
            params: String::new(),
            children,
        }
    }

    /// Returns the block or directive name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Block { name, .. } | Self::Directive { name, .. } => name,
        }
    }

    /// Returns `true` for a block called `name`.
    #[must_use]
    pub fn is_block(&self, name: &str) -> bool {
        matches!(self, Self::Block { name: n, .. } if n == name)
    }

    /// Returns the argument of a directive called `name`.
    #[must_use]
    pub fn directive_argument(&self, name: &str) -> Option<&str> {
        match self {
            Self::Directive { name: n, argument } if n == name => Some(argument),
            _ => None,
        }
    }
}

/// Why a document could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A character that cannot start any token, such as an unterminated quote.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(String),
    /// `}` with no open block.
    #[error("unexpected \"}}\"")]
    UnexpectedClose,
    /// `;` or `{` without a directive name in front of it.
    #[error("unexpected {0:?} without a directive name")]
    MissingName(char),
    /// A directive was not terminated with `;`.
    #[error("directive \"{0}\" is not terminated by \";\"")]
    MissingSemicolon(String),
    /// End of input inside a block.
    #[error("unexpected end of file, expecting \"}}\" for block opened on line {0}")]
    UnclosedBlock(usize),
}

/// A parse failure and the 1-based line where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// Line of the offending token (or of the end of input).
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+|#[^\n]*")]
enum Token {
    #[token("{")]
    BlockOpen,

    #[token("}")]
    BlockClose,

    #[token(";")]
    Semicolon,

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unquote(lex.slice()))]
    Quoted(String),

    #[regex(r#"[^ \t\r\n\f{};#"'][^ \t\r\n\f{};]*"#, |lex| lex.slice().to_string())]
    Word(String),
}

/// Strips the surrounding quotes and resolves `\"`, `\'` and `\\`.
///
/// Other escapes are kept verbatim since nginx passes them through.
fn unquote(s: &str) -> String {
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(e @ ('"' | '\'' | '\\')) => out.push(e),
                Some(e) => {
                    out.push('\\');
                    out.push(e);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses configuration text into its top-level nodes.
///
/// ```
/// use nginx_hosts::parser::{parse, ConfigNode};
///
/// let nodes = parse("server { listen 80; }").unwrap();
/// assert_eq!(
///     nodes,
///     vec![ConfigNode::block("server", vec![ConfigNode::directive("listen", "80")])]
/// );
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a well-formed sequence of
/// blocks and directives.
pub fn parse(source: &str) -> Result<Vec<ConfigNode>, ParseError> {
    let tokens = tokenize(source)?;
    let eof_line = source.lines().count().max(1);
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof_line,
    };
    parser.body(None)
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut lex = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted = 0;

    while let Some(token) = lex.next() {
        let span = lex.span();
        line += source[counted..span.start].matches('\n').count();
        counted = span.start;
        match token {
            Ok(token) => tokens.push((token, line)),
            Err(()) => {
                return Err(ParseError {
                    line,
                    kind: ParseErrorKind::UnexpectedChar(lex.slice().to_string()),
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    eof_line: usize,
}

impl Parser {
    fn bump(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        item
    }

    /// Parses nodes until the matching `}` (or end of input at top level).
    fn body(&mut self, opened_on: Option<usize>) -> Result<Vec<ConfigNode>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            match self.bump() {
                None => {
                    return match opened_on {
                        None => Ok(nodes),
                        Some(open) => Err(ParseError {
                            line: self.eof_line,
                            kind: ParseErrorKind::UnclosedBlock(open),
                        }),
                    };
                }
                Some((Token::BlockClose, line)) => {
                    return if opened_on.is_some() {
                        Ok(nodes)
                    } else {
                        Err(ParseError {
                            line,
                            kind: ParseErrorKind::UnexpectedClose,
                        })
                    };
                }
                Some((Token::Semicolon, line)) => {
                    return Err(ParseError {
                        line,
                        kind: ParseErrorKind::MissingName(';'),
                    });
                }
                Some((Token::BlockOpen, line)) => {
                    return Err(ParseError {
                        line,
                        kind: ParseErrorKind::MissingName('{'),
                    });
                }
                Some((Token::Word(name) | Token::Quoted(name), line)) => {
                    nodes.push(self.statement(name, line)?);
                }
            }
        }
    }

    fn statement(&mut self, name: String, line: usize) -> Result<ConfigNode, ParseError> {
        let mut args: Vec<String> = Vec::new();
        loop {
            match self.bump() {
                Some((Token::Word(arg) | Token::Quoted(arg), _)) => args.push(arg),
                Some((Token::Semicolon, _)) => {
                    return Ok(ConfigNode::Directive {
                        name,
                        argument: args.join(" "),
                    });
                }
                Some((Token::BlockOpen, _)) => {
                    let children = self.body(Some(line))?;
                    return Ok(ConfigNode::Block {
                        name,
                        params: args.join(" "),
                        children,
                    });
                }
                Some((Token::BlockClose, at)) => {
                    return Err(ParseError {
                        line: at,
                        kind: ParseErrorKind::MissingSemicolon(name),
                    });
                }
                None => {
                    return Err(ParseError {
                        line: self.eof_line,
                        kind: ParseErrorKind::MissingSemicolon(name),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directives_and_blocks_in_order() {
        let nodes = parse(
            "user nginx;\n\
             http {\n\
                 include mime.types;\n\
                 server {\n\
                     listen 80;\n\
                     server_name a.com  b.com;\n\
                 }\n\
             }\n",
        )
        .unwrap();

        assert_eq!(
            nodes,
            vec![
                ConfigNode::directive("user", "nginx"),
                ConfigNode::block(
                    "http",
                    vec![
                        ConfigNode::directive("include", "mime.types"),
                        ConfigNode::block(
                            "server",
                            vec![
                                ConfigNode::directive("listen", "80"),
                                ConfigNode::directive("server_name", "a.com b.com"),
                            ],
                        ),
                    ],
                ),
            ]
        );
    }

    #[test]
    fn comments_and_quotes() {
        let nodes = parse(
            "# leading comment\n\
             server_name \"quoted name\" 'x\\'y'; # trailing\n\
             ip_hash;\n",
        )
        .unwrap();
        assert_eq!(nodes[0].directive_argument("server_name"), Some("quoted name x'y"));
        assert_eq!(nodes[1].directive_argument("ip_hash"), Some(""));
    }

    #[test]
    fn block_params_are_kept() {
        let nodes = parse("location ~ \\.php$ { fastcgi_pass unix:/run/php.sock; }").unwrap();
        assert!(nodes[0].is_block("location"));
        assert!(!nodes[0].is_block("server"));
        match &nodes[0] {
            ConfigNode::Block { name, params, children } => {
                assert_eq!(name, "location");
                assert_eq!(params, "~ \\.php$");
                assert_eq!(children.len(), 1);
            }
            ConfigNode::Directive { .. } => panic!("expected block"),
        }
    }

    #[test]
    fn hash_inside_word_is_not_a_comment() {
        let nodes = parse("return 301 https://x.com/#top;").unwrap();
        assert_eq!(
            nodes[0].directive_argument("return"),
            Some("301 https://x.com/#top")
        );
    }

    #[test]
    fn empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  # only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn unclosed_block_reports_opening_line() {
        let err = parse("events {}\nhttp {\n  server {\n  }\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedBlock(2));
        assert_eq!(err.line, 4);
    }

    #[test]
    fn stray_close_brace() {
        let err = parse("listen 80;\n}\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_semicolon() {
        let err = parse("server { listen 80 }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSemicolon("listen".into()));
        let err = parse("worker_processes 4").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSemicolon("worker_processes".into()));
    }

    #[test]
    fn missing_name() {
        assert_eq!(parse(";").unwrap_err().kind, ParseErrorKind::MissingName(';'));
        assert_eq!(parse("{ }").unwrap_err().kind, ParseErrorKind::MissingName('{'));
    }

    #[test]
    fn unterminated_quote() {
        let err = parse("server_name \"oops;\n").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedChar(_)));
        assert_eq!(err.line, 1);
    }
}
