//! Pseudo-instruction expansion.
//!
//! Macro templates only capture operands. The [`Expander`] turns a matched
//! macro into a short sequence of real instructions, each of which is fed
//! back through the encoder. Steps that carry a fixup are encoded without
//! compression so the relocated field keeps its 32-bit layout.

use crate::encoder::Matched;
use crate::error::MatchError;
use crate::expr::Expr;
use crate::operand::{RD, RS1, RS2};
use crate::reloc::RelocKind;
use crate::subset::Xlen;

/// Which expansion a macro template asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MacroKind {
    /// `li rd, imm`: materialize a constant.
    Li,
    /// `la rd, sym`: through the GOT when position independent.
    La,
    /// `lla rd, sym`: always PC-relative.
    Lla,
    /// `la.tls.gd rd, sym`.
    LaTlsGd,
    /// `la.tls.ie rd, sym`.
    LaTlsIe,
    /// Integer load from a symbol address.
    Load,
    /// Floating-point load; the address goes through a scratch register.
    FpLoad,
    /// Store to a symbol address through a scratch register.
    Store,
    /// `call`, `tail` and `jump`.
    Call,
}

/// One element of an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MacroStep {
    /// Assemble `mnemonic operands`. When `reloc` is set, its kind and target
    /// replace whatever immediate the operands produced.
    Instr {
        mnemonic: String,
        operands: String,
        reloc: Option<(RelocKind, Expr)>,
    },
    /// Define a local label at the current position.
    Label(String),
}

impl MacroStep {
    fn plain(mnemonic: &str, operands: String) -> Self {
        MacroStep::Instr {
            mnemonic: mnemonic.into(),
            operands,
            reloc: None,
        }
    }

    fn relocated(mnemonic: &str, operands: String, kind: RelocKind, target: Expr) -> Self {
        MacroStep::Instr {
            mnemonic: mnemonic.into(),
            operands,
            reloc: Some((kind, target)),
        }
    }

    /// Whether the step may use a compressed encoding.
    pub fn allows_compression(&self) -> bool {
        matches!(self, MacroStep::Instr { reloc: None, .. })
    }
}

impl core::fmt::Display for MacroStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MacroStep::Instr {
                mnemonic,
                operands,
                reloc: None,
            } => write!(f, "{mnemonic} {operands}"),
            MacroStep::Instr {
                mnemonic,
                operands,
                reloc: Some((kind, target)),
            } => write!(f, "{mnemonic} {operands} # {kind} {target}"),
            MacroStep::Label(name) => write!(f, "{name}:"),
        }
    }
}

fn sext12(value: i64) -> i64 {
    ((value & 0xfff) ^ 0x800) - 0x800
}

fn is_sext32(value: i64) -> bool {
    value == i64::from(value as i32)
}

/// Emit the shortest `lui`/`addi`/`slli` chain that puts `value` in `x{reg}`.
pub fn load_const(steps: &mut Vec<MacroStep>, reg: u32, value: i64, xlen: Xlen) {
    let lower = sext12(value);
    let upper = value.wrapping_sub(lower);

    if xlen == Xlen::Rv64 && !is_sext32(value) {
        let mut shift = 12;
        while shift < 63 && ((upper as u64) >> shift) & 1 == 0 {
            shift += 1;
        }
        load_const(steps, reg, upper >> shift, xlen);
        steps.push(MacroStep::plain("slli", format!("x{reg}, x{reg}, {shift}")));
        if lower != 0 {
            steps.push(MacroStep::plain("addi", format!("x{reg}, x{reg}, {lower}")));
        }
        return;
    }

    let mut hi_reg = 0;
    if upper != 0 {
        let upper_imm = (upper as u32) >> 12;
        steps.push(MacroStep::plain("lui", format!("x{reg}, {upper_imm}")));
        hi_reg = reg;
    }
    if lower != 0 || hi_reg == 0 {
        let add = if xlen == Xlen::Rv64 { "addiw" } else { "addi" };
        steps.push(MacroStep::plain(add, format!("x{reg}, x{hi_reg}, {lower}")));
    }
}

/// Expands macro templates, numbering the local labels it creates.
#[derive(Debug, Default)]
pub struct Expander {
    next_label: u32,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(&mut self) -> String {
        let name = format!(".Lpcrel_hi{}", self.next_label);
        self.next_label += 1;
        name
    }

    /// `auipc` against `symbol` followed by a low-part instruction against
    /// the `auipc`'s own label.
    #[allow(clippy::too_many_arguments)]
    fn pcrel_access(
        &mut self,
        steps: &mut Vec<MacroStep>,
        temp: u32,
        symbol: Expr,
        lo_insn: &str,
        lo_operands: String,
        hi: RelocKind,
        lo: RelocKind,
    ) {
        let label = self.label();
        steps.push(MacroStep::Label(label.clone()));
        steps.push(MacroStep::relocated("auipc", format!("x{temp}, 0"), hi, symbol));
        steps.push(MacroStep::relocated(lo_insn, lo_operands, lo, Expr::symbol(label)));
    }

    /// Expand a matched macro template into real instruction steps.
    pub fn expand(
        &mut self,
        kind: MacroKind,
        matched: &Matched,
        xlen: Xlen,
        pic: bool,
    ) -> Result<Vec<MacroStep>, MatchError> {
        let mnemonic = matched.template.mnemonic;
        let rd = matched.register(RD);
        let rs1 = matched.register(RS1);
        let rs2 = matched.register(RS2);
        let imm = matched
            .imm
            .clone()
            .ok_or_else(|| MatchError::RequiresConstant(mnemonic.into()))?;
        let load_address = if xlen == Xlen::Rv64 { "ld" } else { "lw" };
        let mut steps = Vec::with_capacity(3);

        match kind {
            MacroKind::Li => {
                let value = imm
                    .constant()
                    .ok_or_else(|| MatchError::RequiresConstant(mnemonic.into()))?;
                load_const(&mut steps, rd, value, xlen);
            }
            MacroKind::La | MacroKind::Lla => {
                let offset = match &imm {
                    Expr::Constant(v) | Expr::Symbol { addend: v, .. } => *v,
                    Expr::Register(_) => 0,
                };
                if !is_sext32(offset) {
                    return Err(MatchError::OperandOutOfRange {
                        what: "address offset".into(),
                        value: offset,
                        min: i64::from(i32::MIN),
                        max: i64::from(i32::MAX),
                    });
                }
                if let Expr::Constant(value) = imm {
                    load_const(&mut steps, rd, value, xlen);
                } else if pic && kind == MacroKind::La {
                    self.pcrel_access(
                        &mut steps,
                        rd,
                        imm,
                        load_address,
                        format!("x{rd}, 0(x{rd})"),
                        RelocKind::GotHi20,
                        RelocKind::PcrelLo12I,
                    );
                } else {
                    self.pcrel_access(
                        &mut steps,
                        rd,
                        imm,
                        "addi",
                        format!("x{rd}, x{rd}, 0"),
                        RelocKind::PcrelHi20,
                        RelocKind::PcrelLo12I,
                    );
                }
            }
            MacroKind::LaTlsGd => self.pcrel_access(
                &mut steps,
                rd,
                imm,
                "addi",
                format!("x{rd}, x{rd}, 0"),
                RelocKind::TlsGdHi20,
                RelocKind::PcrelLo12I,
            ),
            MacroKind::LaTlsIe => self.pcrel_access(
                &mut steps,
                rd,
                imm,
                load_address,
                format!("x{rd}, 0(x{rd})"),
                RelocKind::TlsGotHi20,
                RelocKind::PcrelLo12I,
            ),
            MacroKind::Load => self.pcrel_access(
                &mut steps,
                rd,
                imm,
                mnemonic,
                format!("x{rd}, 0(x{rd})"),
                RelocKind::PcrelHi20,
                RelocKind::PcrelLo12I,
            ),
            MacroKind::FpLoad => self.pcrel_access(
                &mut steps,
                rs1,
                imm,
                mnemonic,
                format!("f{rd}, 0(x{rs1})"),
                RelocKind::PcrelHi20,
                RelocKind::PcrelLo12I,
            ),
            MacroKind::Store => {
                let src = if mnemonic.starts_with('f') { 'f' } else { 'x' };
                self.pcrel_access(
                    &mut steps,
                    rs1,
                    imm,
                    mnemonic,
                    format!("{src}{rs2}, 0(x{rs1})"),
                    RelocKind::PcrelHi20,
                    RelocKind::PcrelLo12S,
                );
            }
            MacroKind::Call => {
                let reloc = matched.reloc.unwrap_or(RelocKind::Call);
                steps.push(MacroStep::relocated("auipc", format!("x{rs1}, 0"), reloc, imm));
                steps.push(MacroStep::plain("jalr", format!("x{rd}, x{rs1}")));
            }
        }

        tracing::trace!(mnemonic, steps = steps.len(), "macro expanded");
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn li(value: i64, xlen: Xlen) -> Vec<String> {
        let mut steps = Vec::new();
        load_const(&mut steps, 10, value, xlen);
        steps.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn small_constants() {
        assert_eq!(li(5, Xlen::Rv32), ["addi x10, x0, 5"]);
        assert_eq!(li(-1, Xlen::Rv64), ["addiw x10, x0, -1"]);
        assert_eq!(li(0, Xlen::Rv32), ["addi x10, x0, 0"]);
    }

    #[test]
    fn lui_and_addi() {
        assert_eq!(
            li(0x1234_5678, Xlen::Rv32),
            ["lui x10, 74565", "addi x10, x10, 1656"]
        );
        assert_eq!(li(0x800, Xlen::Rv32), ["lui x10, 1", "addi x10, x10, -2048"]);
        assert_eq!(li(0x1000, Xlen::Rv32), ["lui x10, 1"]);
        assert_eq!(
            li(0x7fff_f800, Xlen::Rv32),
            ["lui x10, 524288", "addi x10, x10, -2048"]
        );
    }

    #[test]
    fn wide_constants_shift() {
        assert_eq!(
            li(1 << 32, Xlen::Rv64),
            ["addiw x10, x0, 1", "slli x10, x10, 32"]
        );
        assert_eq!(
            li(0xffff_ffff, Xlen::Rv64),
            ["addiw x10, x0, 1", "slli x10, x10, 32", "addi x10, x10, -1"]
        );
    }

    #[test]
    fn compression_follows_relocation() {
        let plain = MacroStep::plain("addi", "x10, x10, 1".into());
        let fixed = MacroStep::relocated(
            "auipc",
            "x10, 0".into(),
            RelocKind::PcrelHi20,
            Expr::symbol("s"),
        );
        assert!(plain.allows_compression());
        assert!(!fixed.allows_compression());
        assert!(!MacroStep::Label(".L".into()).allows_compression());
    }
}
