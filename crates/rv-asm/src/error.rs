//! Error types and the diagnostics boundary.
//!
//! User-facing failures ([`IsaError`], [`MatchError`], [`DirectiveError`])
//! are recoverable: the session reports them and moves on to the next line.
//! An [`InternalError`] means the static tables or the relaxation bookkeeping
//! are inconsistent and stops the session.

use thiserror::Error;

// ── ISA string errors ───────────────────────────────────────────────────

/// What went wrong while parsing an ISA string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsaErrorKind {
    /// The string contains upper-case letters.
    #[error("ISA string must not contain upper case letters")]
    Uppercase,
    /// The string does not start with `rv32` or `rv64`.
    #[error("ISA string must begin with rv32 or rv64")]
    MalformedBase,
    /// The first subset is not `i`, `e` or `g`.
    #[error("first ISA subset must be `e', `i' or `g'")]
    InvalidFirst,
    /// A subset appears after one that should follow it.
    #[error("ISA string is not in canonical order")]
    OutOfOrder,
    /// The subset is not in the extension catalog.
    #[error("unknown extension")]
    UnknownExtension,
    /// The subset was already given.
    #[error("duplicate extension")]
    DuplicateExtension,
    /// Two multi-letter extensions are not separated by `_`.
    #[error("multi-letter extensions must be separated by `_'")]
    MissingSeparator,
    /// A version number is malformed.
    #[error("expect number after `p'")]
    InvalidVersion,
    /// Unparsed text remains at the end of the string.
    #[error("unexpected ISA string at end")]
    UnexpectedSuffix,
    /// A subset needs another subset that is absent.
    #[error("extension requires `{requires}'")]
    MissingCompanion {
        /// The subset that must also be present.
        requires: String,
    },
    /// The `e` base is only valid as rv32 and without floating point.
    #[error("the `e' base is only valid as rv32 without the `f' extension")]
    Rv32eOnly,
    /// The subset needs a wider word than the base provides.
    #[error("extension requires rv64")]
    WidthIncompatible,
}

/// A rejected ISA string, with the offending substring and the full input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("-march={arch}: {kind} `{offending}'")]
pub struct IsaError {
    /// Classification of the failure.
    pub kind: IsaErrorKind,
    /// The part of the string the parser stopped at.
    pub offending: String,
    /// The whole ISA string as given.
    pub arch: String,
}

impl IsaError {
    pub(crate) fn new(kind: IsaErrorKind, offending: &str, arch: &str) -> Self {
        Self {
            kind,
            offending: offending.into(),
            arch: arch.into(),
        }
    }
}

// ── Instruction matching errors ─────────────────────────────────────────

/// Failure to turn a mnemonic and its operand text into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchError {
    /// No template carries this mnemonic under the active ISA.
    #[error("unrecognized opcode `{0}'")]
    UnknownMnemonic(String),

    /// Templates exist but none accepted the operands.
    #[error("illegal operands `{mnemonic} {operands}'")]
    IllegalOperands {
        /// The mnemonic being assembled.
        mnemonic: String,
        /// The operand text as given.
        operands: String,
    },

    /// A strictly numeric operand is outside its declared range.
    #[error("improper {what} ({value}), expected [{min}..{max}]")]
    OperandOutOfRange {
        /// Operand description, e.g. "shift amount".
        what: String,
        /// The rejected value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// A CSR operand is neither a known name nor a number.
    #[error("unknown CSR `{0}'")]
    UnknownCsr(String),

    /// The operand asks for a relocation the output format cannot express.
    #[error("relocation `{0}' is not supported here")]
    UnsupportedRelocation(String),

    /// A pseudo-instruction needs a compile-time constant.
    #[error("`{0}' requires a constant operand")]
    RequiresConstant(String),

    /// A `(` has no matching `)`.
    #[error("unclosed '('")]
    UnclosedParen,
}

// ── Directive errors ────────────────────────────────────────────────────

/// Failure while processing an assembler directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectiveError {
    /// `.option pop` with nothing pushed.
    #[error(".option pop with no .option push")]
    OptionStackEmpty,
    /// `.attribute arch` after code was emitted.
    #[error(".attribute arch must be set before any instructions")]
    ArchAfterInstructions,
    /// The directive is recognized but its arguments are not.
    #[error("{directive}: {detail}")]
    Malformed {
        /// Directive name including the leading dot.
        directive: String,
        /// What is wrong with it.
        detail: String,
    },
    /// The directive is not handled by this backend.
    #[error("unknown directive `{0}'")]
    Unknown(String),
    /// `.option` with a name it does not know. Reported as a warning.
    #[error("unrecognized .option directive: {0}")]
    UnrecognizedOption(String),
}

// ── Internal consistency errors ─────────────────────────────────────────

/// Defect in the static tables or relaxation bookkeeping. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InternalError {
    /// A template uses an operand code with no [`OperandKind`](crate::operand::OperandKind).
    #[error("internal: unknown operand `{code}' in `{mnemonic}'")]
    UnknownOperand {
        /// Template mnemonic.
        mnemonic: String,
        /// The unrecognized format code.
        code: String,
    },

    /// `match` has bits set outside `mask`.
    #[error("internal: bad opcode (mask error): {mnemonic} {args}")]
    MaskMismatch {
        /// Template mnemonic.
        mnemonic: String,
        /// Template operand format.
        args: String,
    },

    /// `mask` and the operand fields do not cover the instruction word.
    #[error("internal: bad opcode (bits {missing:#x} undefined): {mnemonic} {args}")]
    UncoveredBits {
        /// Template mnemonic.
        mnemonic: String,
        /// Template operand format.
        args: String,
        /// Bits claimed by neither the mask nor an operand, or claimed past the
        /// instruction length.
        missing: u64,
    },

    /// An operand field lies under the mask, so the operand could never
    /// change the encoding.
    #[error("internal: bad opcode (operand bits {overlap:#x} fixed by mask): {mnemonic} {args}")]
    FixedOperand {
        /// Template mnemonic.
        mnemonic: String,
        /// Template operand format.
        args: String,
        /// Operand bits that are also mask bits.
        overlap: u64,
    },

    /// A relaxed branch was committed to a length its distance no longer fits.
    #[error("internal: relaxed branch of {length} bytes cannot reach {distance:?}")]
    RelaxationMismatch {
        /// The committed length.
        length: u8,
        /// The distance at emission time, if known.
        distance: Option<i64>,
    },

    /// A code path that the tables should make impossible.
    #[error("internal: unreachable: {0}")]
    Unreachable(String),
}

// ── Top-level error ─────────────────────────────────────────────────────

/// Any error raised by an assembler session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// ISA string rejected.
    #[error(transparent)]
    Isa(#[from] IsaError),
    /// Instruction rejected.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Directive rejected.
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    /// Table or bookkeeping defect.
    #[error(transparent)]
    Internal(#[from] InternalError),
    /// A label was defined twice.
    #[error("symbol `{0}' is already defined")]
    DuplicateSymbol(String),
    /// A numeric local label reference has no matching definition.
    #[error("undefined local label `{0}'")]
    UndefinedLocalLabel(String),
    /// Layout did not reach a fixed point.
    #[error("assembly exceeded maximum of {max} relaxation passes")]
    RelaxationLimit {
        /// Number of passes attempted.
        max: usize,
    },
}

impl AsmError {
    /// Whether this error must abort the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AsmError::Internal(_) | AsmError::RelaxationLimit { .. })
    }

    /// Severity this error is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            AsmError::Directive(DirectiveError::UnrecognizedOption(_)) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

// ── Diagnostics ─────────────────────────────────────────────────────────

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Assembly continues with unchanged output.
    Warning,
    /// The offending line produced no output.
    Error,
}

/// One reported problem with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// The source text that triggered it.
    pub offending: String,
}

impl Diagnostic {
    /// A diagnostic built from an [`AsmError`], at the error's severity.
    pub fn error(err: &AsmError, offending: &str) -> Self {
        Self {
            severity: err.severity(),
            message: err.to_string(),
            offending: offending.into(),
        }
    }

    /// A warning diagnostic.
    pub fn warning(message: impl Into<String>, offending: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            offending: offending.into(),
        }
    }
}

/// Receiver for user-facing diagnostics.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A sink that keeps every diagnostic in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isa_error_display() {
        let err = IsaError::new(IsaErrorKind::OutOfOrder, "m", "rv32icm");
        assert_eq!(
            err.to_string(),
            "-march=rv32icm: ISA string is not in canonical order `m'"
        );
    }

    #[test]
    fn isa_error_companion_display() {
        let err = IsaError::new(
            IsaErrorKind::MissingCompanion {
                requires: "f".into(),
            },
            "d",
            "rv32id",
        );
        assert_eq!(err.to_string(), "-march=rv32id: extension requires `f' `d'");
    }

    #[test]
    fn match_error_range_display() {
        let err = MatchError::OperandOutOfRange {
            what: "shift amount".into(),
            value: 40,
            min: 0,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "improper shift amount (40), expected [0..31]"
        );
    }

    #[test]
    fn match_error_illegal_operands_display() {
        let err = MatchError::IllegalOperands {
            mnemonic: "add".into(),
            operands: "a0,a1".into(),
        };
        assert_eq!(err.to_string(), "illegal operands `add a0,a1'");
    }

    #[test]
    fn asm_error_is_transparent() {
        let err: AsmError = MatchError::UnknownMnemonic("frob".into()).into();
        assert_eq!(err.to_string(), "unrecognized opcode `frob'");
        assert!(!err.is_fatal());
    }

    #[test]
    fn internal_errors_are_fatal() {
        let err: AsmError = InternalError::MaskMismatch {
            mnemonic: "add".into(),
            args: "d,s,t".into(),
        }
        .into();
        assert!(err.is_fatal());
        assert!(AsmError::RelaxationLimit { max: 10 }.is_fatal());
    }

    #[test]
    fn uncovered_bits_display() {
        let err = InternalError::UncoveredBits {
            mnemonic: "addi".into(),
            args: "d,s".into(),
            missing: 0xfff0_0000,
        };
        assert_eq!(
            err.to_string(),
            "internal: bad opcode (bits 0xfff00000 undefined): addi d,s"
        );
    }

    #[test]
    fn collecting_sink_counts_errors() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::warning("unrecognized .option directive", "foo"));
        let err: AsmError = DirectiveError::OptionStackEmpty.into();
        sink.report(Diagnostic::error(&err, ".option pop"));
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.diagnostics()[1].message, ".option pop with no .option push");
    }

    #[test]
    fn unrecognized_option_is_a_warning() {
        let err: AsmError = DirectiveError::UnrecognizedOption("frob".into()).into();
        let diag = Diagnostic::error(&err, ".option frob");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "unrecognized .option directive: frob");
    }
}
