//! Operand expressions.
//!
//! The engine never evaluates expressions itself. It asks an
//! [`ExprEvaluator`] to parse one at the current position and gets back an
//! [`Expr`] plus the unparsed remainder. [`BasicEvaluator`] handles integer
//! literals, symbols with an optional constant addend, and register names.

use core::fmt;

use crate::names::{self, RegisterClass};

/// A parsed operand expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Fully evaluated constant.
    Constant(i64),
    /// `name + addend`, resolved at layout or by the linker.
    Symbol { name: String, addend: i64 },
    /// A bare register name. Never accepted where an immediate is expected.
    Register(String),
}

impl Expr {
    /// A symbol reference without addend.
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol {
            name: name.into(),
            addend: 0,
        }
    }

    /// The value of a constant expression.
    pub fn constant(&self) -> Option<i64> {
        match self {
            Expr::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the expression names a symbol.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Expr::Symbol { .. })
    }

    /// Shift the expression by `delta`. Registers are returned unchanged.
    pub fn offset(self, delta: i64) -> Self {
        match self {
            Expr::Constant(v) => Expr::Constant(v.wrapping_add(delta)),
            Expr::Symbol { name, addend } => Expr::Symbol {
                name,
                addend: addend.wrapping_add(delta),
            },
            reg @ Expr::Register(_) => reg,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(v) => write!(f, "{v}"),
            Expr::Symbol { name, addend: 0 } => write!(f, "{name}"),
            Expr::Symbol { name, addend } if *addend < 0 => write!(f, "{name}{addend}"),
            Expr::Symbol { name, addend } => write!(f, "{name}+{addend}"),
            Expr::Register(name) => write!(f, "{name}"),
        }
    }
}

/// Parses an expression at the start of operand text.
pub trait ExprEvaluator: Send + Sync {
    /// Parse one expression from the start of `text`, returning it together
    /// with the unconsumed remainder. `None` means no expression starts here.
    fn parse<'a>(&self, text: &'a str) -> Option<(Expr, &'a str)>;
}

/// Literal, symbol and `sym ± const` expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEvaluator;

enum Term {
    Number(i64),
    Name(String),
}

fn skip_blanks(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'.' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn parse_number(s: &str) -> Option<(i64, &str)> {
    let bytes = s.as_bytes();
    let (radix, start) = match bytes {
        [b'0', b'x' | b'X', ..] => (16, 2),
        [b'0', b'b' | b'B', d, ..] if matches!(d, b'0' | b'1') => (2, 2),
        [b'0', b'o' | b'O', ..] => (8, 2),
        _ => (10, 0),
    };
    let digits = s[start..]
        .bytes()
        .position(|b| !b.is_ascii_alphanumeric() && b != b'_')
        .map_or(s.len(), |p| p + start);
    let text = s[start..digits].replace('_', "");
    if text.is_empty() {
        return None;
    }
    let value = u64::from_str_radix(&text, radix).ok()?;
    Some((value as i64, &s[digits..]))
}

fn parse_term(s: &str) -> Option<(bool, Term, &str)> {
    let mut s = skip_blanks(s);
    let mut negate = false;
    loop {
        if let Some(rest) = s.strip_prefix('-') {
            negate = !negate;
            s = skip_blanks(rest);
        } else if let Some(rest) = s.strip_prefix('+') {
            s = skip_blanks(rest);
        } else {
            break;
        }
    }
    let first = *s.as_bytes().first()?;
    if first.is_ascii_digit() {
        let (v, rest) = parse_number(s)?;
        return Some((negate, Term::Number(v), rest));
    }
    if is_ident_start(first) {
        let len = s
            .bytes()
            .position(|b| !is_ident_continue(b))
            .unwrap_or(s.len());
        return Some((negate, Term::Name(s[..len].to_string()), &s[len..]));
    }
    None
}

fn is_register(name: &str) -> bool {
    [RegisterClass::GeneralPurpose, RegisterClass::FloatingPoint]
        .into_iter()
        .any(|class| {
            names::lookup_register(name, class, false).is_some_and(|(_, len)| len == name.len())
        })
}

impl ExprEvaluator for BasicEvaluator {
    fn parse<'a>(&self, text: &'a str) -> Option<(Expr, &'a str)> {
        let (negate, term, mut rest) = parse_term(text)?;
        let mut constant = 0i64;
        let mut symbol = None;
        let mut terms = 1usize;

        let mut absorb = |negate: bool, term: Term| -> Option<()> {
            match term {
                Term::Number(v) => {
                    constant = if negate {
                        constant.wrapping_sub(v)
                    } else {
                        constant.wrapping_add(v)
                    };
                }
                Term::Name(name) => {
                    if negate || symbol.is_some() {
                        return None;
                    }
                    symbol = Some(name);
                }
            }
            Some(())
        };
        absorb(negate, term)?;

        loop {
            let after = skip_blanks(rest);
            let negate = match after.as_bytes().first() {
                Some(b'+') => false,
                Some(b'-') => true,
                _ => break,
            };
            let (inner_negate, term, next) = parse_term(&after[1..])?;
            absorb(negate != inner_negate, term)?;
            terms += 1;
            rest = next;
        }

        let expr = match symbol {
            Some(name) if terms == 1 && is_register(&name) => Expr::Register(name),
            Some(name) if is_register(&name) => return None,
            Some(name) => Expr::Symbol {
                name,
                addend: constant,
            },
            None => Expr::Constant(constant),
        };
        Some((expr, rest))
    }
}
