//! # rv-asm — RISC-V instruction selection, encoding and branch relaxation
//!
//! `rv-asm` is the machine-dependent core of a RISC-V assembler. It turns a
//! mnemonic and its operand text into encoded instruction words, tracks which
//! ISA extensions are active, expands pseudo-instructions and sizes branches
//! once their targets are known.
//!
//! ## Quick Start
//!
//! ```rust
//! use rv_asm::assemble;
//!
//! let code = assemble("add a0, a1, a2", "rv64gc").unwrap();
//! assert_eq!(code, 0x00c5_8533u32.to_le_bytes());
//! ```
//!
//! ## Features
//!
//! - **ISA strings** — `rv64gc`, `rv32emc`, `rv64imafdc_zicsr_xfoo2p0`, with
//!   canonical ordering, versions and companion checks.
//! - **Template matching** — overloads tried in table order, compressed forms
//!   preferred when `c` is active and `.option rvc` is on.
//! - **Pseudo-instructions** — `li`, `la`, `lla`, `call`, `tail`, symbolic
//!   loads and stores.
//! - **Branch relaxation** — 2, 4, 6 or 8 byte branches, shrinking
//!   monotonically to a fixed point.
//! - **Relocations** — every ELF RISC-V relocation type with its field layout.

#![forbid(unsafe_code)]
// ── Pedantic lint policy ─────────────────────────────────────────────────
// Instruction encoding narrows and sign-converts between integer widths all
// the time and writes opcodes as dense hex literals.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::redundant_closure_for_method_calls,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::single_match_else,
    clippy::manual_let_else,
    clippy::missing_errors_doc,
    clippy::return_self_not_must_use
)]

/// Matching engine: operand parsing and bit encoding against templates.
pub mod encoder;
/// Error types and the diagnostics boundary.
pub mod error;
/// Operand expressions and the evaluator boundary.
pub mod expr;
/// Known extensions, canonical order and default versions.
pub mod extension;
/// Output stream, symbol table and the layout fixed point.
pub mod layout;
/// Register, CSR, rounding-mode and fence-set names.
pub mod names;
/// Instruction template table and its startup validation.
pub mod opcodes;
/// Operand kinds and instruction field layouts.
pub mod operand;
/// Session configuration and `.option` flags.
pub mod options;
/// Pseudo-instruction expansion.
pub mod pseudo;
/// Branch relaxation state machine.
pub mod relax;
/// ELF RISC-V relocation descriptors.
pub mod reloc;
/// The assembler session.
pub mod session;
/// ISA string parsing into an ordered subset list.
pub mod subset;

// Re-exports
pub use encoder::{Encoder, MatchContext, Matched};
pub use error::{
    AsmError, CollectingSink, Diagnostic, DiagnosticSink, DirectiveError, InternalError, IsaError,
    IsaErrorKind, MatchError, Severity,
};
pub use expr::{BasicEvaluator, Expr, ExprEvaluator};
pub use layout::{Fixup, Layout, OutputStream, Placement, ResolvedFixup};
pub use names::RegisterClass;
pub use operand::OperandKind;
pub use options::{Options, SessionConfig};
pub use pseudo::{MacroKind, MacroStep};
pub use relax::{FragHandle, RelaxArena};
pub use reloc::{RelocDescriptor, RelocKind};
pub use session::{AssemblerSession, EncodedInstruction};
pub use subset::{FloatAbi, Subset, SubsetList, Xlen};

/// Assemble a block of source for `arch` and return the laid-out bytes.
///
/// Statements are separated by newlines or `;`, labels end in `:` and `#`
/// starts a comment. Unlike [`AssemblerSession::assemble`], the first error
/// is returned; warnings are only logged.
///
/// # Errors
///
/// Returns [`AsmError`] for a rejected ISA string, an unknown mnemonic,
/// illegal operands, a bad directive or a relaxation failure.
///
/// # Examples
///
/// ```rust
/// use rv_asm::assemble;
///
/// let code = assemble("loop: addi a0, a0, -1; bnez a0, loop", "rv32i").unwrap();
/// assert_eq!(code.len(), 8);
/// ```
pub fn assemble(source: &str, arch: &str) -> Result<Vec<u8>, AsmError> {
    assemble_layout(source, &SessionConfig::new(arch)).map(Layout::into_bytes)
}

/// Assemble with a full configuration and keep the relocations and symbol
/// addresses.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_layout(source: &str, config: &SessionConfig) -> Result<Layout, AsmError> {
    let mut session = AssemblerSession::new(config)?;
    for stmt in session::statements(source) {
        match session.assemble_line(stmt) {
            Err(err) if err.severity() == Severity::Error => return Err(err),
            Err(err) => tracing::warn!(error = %err, line = stmt, "ignored"),
            Ok(()) => {}
        }
    }
    session.finish()
}
