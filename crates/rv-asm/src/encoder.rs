//! Operand matching and bit encoding.
//!
//! [`Encoder::encode`] walks a mnemonic's templates in table order and returns
//! the first one whose operand format accepts the text. A template that does
//! not fit is skipped silently; a template that fits syntactically but carries
//! an unusable value (an out-of-range shift, an unknown CSR) stops the search
//! with a [`MatchError`].

use crate::error::{InternalError, MatchError};
use crate::expr::{Expr, ExprEvaluator};
use crate::names::{self, RegisterClass};
use crate::opcodes::{Tables, Template};
use crate::operand::{self, OperandKind};
use crate::reloc::{self, RelocKind};
use crate::subset::{SubsetList, Xlen};

// ── Percent operators ───────────────────────────────────────────────────

type PercentOps = &'static [(&'static str, RelocKind)];

const PERCENT_U: PercentOps = &[
    ("%tprel_hi", RelocKind::TprelHi20),
    ("%pcrel_hi", RelocKind::PcrelHi20),
    ("%got_pcrel_hi", RelocKind::GotHi20),
    ("%tls_ie_pcrel_hi", RelocKind::TlsGotHi20),
    ("%tls_gd_pcrel_hi", RelocKind::TlsGdHi20),
    ("%hi", RelocKind::Hi20),
];

const PERCENT_I: PercentOps = &[
    ("%lo", RelocKind::Lo12I),
    ("%pcrel_lo", RelocKind::PcrelLo12I),
    ("%tprel_lo", RelocKind::TprelLo12I),
];

const PERCENT_S: PercentOps = &[
    ("%lo", RelocKind::Lo12S),
    ("%pcrel_lo", RelocKind::PcrelLo12S),
    ("%tprel_lo", RelocKind::TprelLo12S),
];

const PERCENT_R: PercentOps = &[("%tprel_add", RelocKind::TprelAdd)];

/// Strip an ASCII-case-insensitive `prefix`.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn skip_blanks(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

/// An offset may be left out when only the base register remains.
fn is_implicit_zero(s: &str) -> bool {
    s.starts_with('(') && !s[1..].contains('(')
}

// ── Context and result ──────────────────────────────────────────────────

/// Everything the engine needs from the surrounding session.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub subsets: &'a SubsetList,
    pub xlen: Xlen,
    /// Whether compressed encodings may be produced.
    pub rvc: bool,
    /// Whether the RV32E register file is in effect.
    pub rve: bool,
    /// Cleared by the expander for steps that carry a fixup.
    pub allow_compressed: bool,
    pub evaluator: &'a dyn ExprEvaluator,
}

impl core::fmt::Debug for MatchContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MatchContext")
            .field("xlen", &self.xlen)
            .field("rvc", &self.rvc)
            .field("rve", &self.rve)
            .field("allow_compressed", &self.allow_compressed)
            .finish_non_exhaustive()
    }
}

/// A template that accepted the operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    pub template: &'static Template,
    /// The assembled word. For macro templates this holds the preset plus
    /// the register fields the expander reads back.
    pub bits: u64,
    /// The immediate left for a fixup or the expander, if any.
    pub imm: Option<Expr>,
    /// Relocation to apply against `imm`.
    pub reloc: Option<RelocKind>,
}

impl Matched {
    /// Encoded size in bytes.
    pub fn length(&self) -> usize {
        self.template.length
    }

    /// Whether the expander must take over.
    pub fn is_macro(&self) -> bool {
        self.template.is_macro()
    }

    /// Little-endian bytes of the instruction word.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_le_bytes()[..self.length()].to_vec()
    }

    /// Register field `field` of the assembled word.
    pub fn register(&self, field: operand::Field) -> u32 {
        field.extract(self.bits) as u32
    }
}

// ── Engine ──────────────────────────────────────────────────────────────

/// Template-driven instruction encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    tables: &'static Tables,
}

impl Encoder {
    /// Build an encoder over the validated tables.
    pub fn new() -> Result<Self, InternalError> {
        Ok(Self {
            tables: Tables::get()?,
        })
    }

    /// The tables this encoder searches.
    pub fn tables(&self) -> &'static Tables {
        self.tables
    }

    /// Encode `mnemonic` with its operand text.
    pub fn encode(
        &self,
        mnemonic: &str,
        operands: &str,
        ctx: &MatchContext<'_>,
    ) -> Result<Matched, MatchError> {
        select(mnemonic, self.tables.lookup(mnemonic), operands, ctx)
    }

    /// Encode a `.insn` line of the given format type.
    pub fn encode_insn(
        &self,
        type_name: &str,
        operands: &str,
        ctx: &MatchContext<'_>,
    ) -> Result<Matched, MatchError> {
        select(type_name, self.tables.lookup_insn_type(type_name), operands, ctx)
    }
}

fn select(
    mnemonic: &str,
    candidates: &'static [Template],
    operands: &str,
    ctx: &MatchContext<'_>,
) -> Result<Matched, MatchError> {
    let mut eligible = false;
    for template in candidates {
        if template.xlen != 0 && template.xlen != ctx.xlen.bits() {
            continue;
        }
        if !template.class.is_supported(ctx.subsets, ctx.rvc) {
            continue;
        }
        if !ctx.allow_compressed && template.is_compressed() {
            continue;
        }
        eligible = true;
        match Candidate::new(template, ctx).run(operands)? {
            Some(matched) => {
                tracing::trace!(template = %template, bits = matched.bits, "matched");
                return Ok(matched);
            }
            None => tracing::trace!(template = %template, "template rejected"),
        }
    }
    if eligible {
        Err(MatchError::IllegalOperands {
            mnemonic: mnemonic.into(),
            operands: operands.trim().into(),
        })
    } else {
        Err(MatchError::UnknownMnemonic(mnemonic.into()))
    }
}

// ── Per-template operand walk ───────────────────────────────────────────

/// Outcome of one operand: the remaining text, or `None` when this template
/// does not fit.
type Step<'s> = Result<Option<&'s str>, MatchError>;

struct Small<'s> {
    expr: Expr,
    reloc: Option<RelocKind>,
    rest: &'s str,
}

struct Candidate<'c> {
    template: &'static Template,
    ctx: &'c MatchContext<'c>,
    bits: u64,
    imm: Option<Expr>,
    reloc: Option<RelocKind>,
}

impl<'c> Candidate<'c> {
    fn new(template: &'static Template, ctx: &'c MatchContext<'c>) -> Self {
        Self {
            template,
            ctx,
            bits: template.match_bits,
            imm: None,
            reloc: None,
        }
    }

    fn run(mut self, text: &str) -> Result<Option<Matched>, MatchError> {
        let mut s = text;
        for &kind in &self.template.operands {
            s = skip_blanks(s);
            let next = match kind {
                OperandKind::Punct(c) => s.strip_prefix(c),
                _ => self.operand(kind, s)?,
            };
            match next {
                Some(rest) => s = rest,
                None => return Ok(None),
            }
        }
        if !skip_blanks(s).is_empty() {
            return Ok(None);
        }
        if !self.template.is_macro() {
            if !self.template.guard.check(self.template, self.bits) {
                return Ok(None);
            }
            if self.template.length == 2 && !self.ctx.rvc {
                return Ok(None);
            }
        }
        Ok(Some(Matched {
            template: self.template,
            bits: self.bits,
            imm: self.imm,
            reloc: self.reloc,
        }))
    }

    fn set(&mut self, field: operand::Field, value: u64) {
        self.bits = field.insert(self.bits, value);
    }

    fn set_layout(&mut self, kind: OperandKind, value: i64) {
        if let Some(layout) = kind.layout() {
            self.bits |= layout.encode(value);
        }
    }

    /// On RV32, a 32-bit pattern with bit 31 set reads as negative.
    fn normalize(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Constant(v)
                if self.ctx.xlen == Xlen::Rv32
                    && (v as u64) & !0xffff_ffff == 0
                    && v & 0x8000_0000 != 0 =>
            {
                Expr::Constant(i64::from(v as i32))
            }
            other => other,
        }
    }

    fn expr<'s>(&self, s: &'s str) -> Option<(Expr, &'s str)> {
        let (expr, rest) = self.ctx.evaluator.parse(s)?;
        Some((self.normalize(expr), rest))
    }

    fn register<'s>(&self, s: &'s str, class: RegisterClass) -> Option<(u32, &'s str)> {
        let (n, len) = names::lookup_register(s, class, self.ctx.rve)?;
        Some((n, &s[len..]))
    }

    /// Parse an expression optionally wrapped in one of `ops`.
    fn small<'s>(&self, s: &'s str, ops: PercentOps) -> Result<Option<Small<'s>>, MatchError> {
        if !s.starts_with('%') {
            return Ok(self.expr(s).map(|(expr, rest)| Small {
                expr,
                reloc: None,
                rest,
            }));
        }
        let found = ops.iter().find_map(|&(name, kind)| {
            strip_prefix_ci(s, name)
                .filter(|r| r.starts_with(['(', ' ', '\t']))
                .map(|r| (kind, r))
        });
        let Some((kind, after)) = found else {
            return Ok(None);
        };
        let Some(inner) = skip_blanks(after).strip_prefix('(') else {
            return Ok(None);
        };
        let Some((expr, rest)) = self.expr(inner) else {
            return Ok(None);
        };
        let Some(rest) = skip_blanks(rest).strip_prefix(')') else {
            return Err(MatchError::UnclosedParen);
        };
        Ok(Some(Small {
            expr,
            reloc: Some(kind),
            rest,
        }))
    }

    /// Record a percent-operator relocation, folding it when the value is
    /// already known.
    fn apply_reloc(&mut self, kind: RelocKind, expr: Expr) -> Result<bool, MatchError> {
        match expr {
            Expr::Constant(v) => match reloc::apply_const(kind, v) {
                Some(bits) => {
                    self.bits |= bits;
                    Ok(true)
                }
                None => Err(MatchError::UnsupportedRelocation(kind.to_string())),
            },
            sym @ Expr::Symbol { .. } => {
                self.imm = Some(sym);
                self.reloc = Some(kind);
                Ok(true)
            }
            Expr::Register(_) => Ok(false),
        }
    }

    /// A 12-bit immediate: a percent operator from `ops` or a small constant.
    fn imm12<'s>(&mut self, kind: OperandKind, s: &'s str, ops: PercentOps) -> Step<'s> {
        let Some(small) = self.small(s, ops)? else {
            return Ok(None);
        };
        if let Some(reloc) = small.reloc {
            return Ok(self.apply_reloc(reloc, small.expr)?.then_some(small.rest));
        }
        match small.expr {
            Expr::Constant(v) if (-2048..=2047).contains(&v) => {
                self.set_layout(kind, v);
                Ok(Some(small.rest))
            }
            _ => Ok(None),
        }
    }

    /// A value that must be a constant within `min..=max`.
    fn ranged<'s>(&mut self, kind: OperandKind, s: &'s str, min: i64, max: i64) -> Step<'s> {
        let (v, rest) = match self.expr(s) {
            Some((Expr::Constant(v), rest)) => (v, rest),
            Some((Expr::Symbol { .. }, _)) => {
                return Err(MatchError::RequiresConstant(self.template.mnemonic.into()))
            }
            _ => return Ok(None),
        };
        if v < min || v > max {
            return Err(MatchError::OperandOutOfRange {
                what: kind.describe().into(),
                value: v,
                min,
                max,
            });
        }
        if let Some(field) = kind.field() {
            self.set(field, v as u64);
        } else {
            self.set_layout(kind, v);
        }
        Ok(Some(rest))
    }

    /// A compressed immediate that must be a constant passing `valid`.
    fn c_imm<'s>(&mut self, kind: OperandKind, s: &'s str, valid: impl Fn(i64) -> bool) -> Step<'s> {
        if kind.allows_implicit_zero() && is_implicit_zero(s) {
            return Ok(valid(0).then_some(s));
        }
        match self.expr(s) {
            Some((Expr::Constant(v), rest)) if valid(v) => {
                self.set_layout(kind, v);
                Ok(Some(rest))
            }
            _ => Ok(None),
        }
    }

    fn target<'s>(&mut self, s: &'s str, reloc: RelocKind) -> Step<'s> {
        match self.expr(s) {
            Some((sym @ Expr::Symbol { .. }, rest)) => {
                self.imm = Some(sym);
                self.reloc = Some(reloc);
                Ok(Some(rest))
            }
            _ => Ok(None),
        }
    }

    fn operand<'s>(&mut self, kind: OperandKind, s: &'s str) -> Step<'s> {
        use OperandKind::*;
        use RegisterClass::{FloatingPoint as Fpr, GeneralPurpose as Gpr};

        let xlen = i64::from(self.ctx.xlen.bits());
        match kind {
            Punct(c) => Ok(s.strip_prefix(c)),

            // ── full registers ──
            Rd | Rs1 | Rs2 | Rs3 | FRd | FRs1 | FRs2 | FRs3 | CRs2 | CFRs2 => {
                let class = if matches!(kind, FRd | FRs1 | FRs2 | FRs3 | CFRs2) {
                    Fpr
                } else {
                    Gpr
                };
                let Some((n, rest)) = self.register(s, class) else {
                    return Ok(None);
                };
                if let Some(field) = kind.field() {
                    self.set(field, u64::from(n));
                }
                Ok(Some(rest))
            }
            FRs1Rs2 => {
                let Some((n, rest)) = self.register(s, Fpr) else {
                    return Ok(None);
                };
                self.set(operand::RS1, u64::from(n));
                self.set(operand::RS2, u64::from(n));
                Ok(Some(rest))
            }

            // ── compressed registers ──
            CRs1S | CRs2S | CFRs1S | CFRs2S => {
                let class = if matches!(kind, CFRs1S | CFRs2S) { Fpr } else { Gpr };
                match self.register(s, class) {
                    Some((n, rest)) if (8..16).contains(&n) => {
                        if let Some(field) = kind.field() {
                            self.set(field, u64::from(n - 8));
                        }
                        Ok(Some(rest))
                    }
                    _ => Ok(None),
                }
            }
            CRs1SEq | CRs2SEq | CRdEq => {
                let expected = match kind {
                    CRs1SEq => operand::CRS1S.extract(self.bits) + 8,
                    CRs2SEq => operand::CRS2S.extract(self.bits) + 8,
                    _ => operand::RD.extract(self.bits),
                };
                Ok(self
                    .register(s, Gpr)
                    .filter(|&(n, _)| u64::from(n) == expected)
                    .map(|(_, rest)| rest))
            }
            CSp | CZero => {
                let expected = if kind == CSp { 2 } else { 0 };
                Ok(self
                    .register(s, Gpr)
                    .filter(|&(n, _)| n == expected)
                    .map(|(_, rest)| rest))
            }

            // ── shifts, CSRs and keywords ──
            ShamtW => self.ranged(kind, s, 0, 31),
            Shamt => self.ranged(kind, s, 0, xlen - 1),
            CsrImm => self.ranged(kind, s, 0, 31),
            Csr => {
                if let Some((n, rest)) = self.register(s, RegisterClass::ControlStatus) {
                    self.set(operand::CSR, u64::from(n));
                    return Ok(Some(rest));
                }
                match self.expr(s) {
                    Some((Expr::Constant(_), _)) => self.ranged(kind, s, 0, 0xfff),
                    Some((Expr::Symbol { name, .. }, _)) => Err(MatchError::UnknownCsr(name)),
                    _ => Ok(None),
                }
            }
            RoundingMode | Pred | Succ => {
                let found = if kind == RoundingMode {
                    names::lookup_rounding_mode(s)
                } else {
                    names::lookup_fence_set(s)
                };
                let Some((value, len)) = found else {
                    return Ok(None);
                };
                if let Some(field) = kind.field() {
                    self.set(field, u64::from(value));
                }
                Ok(Some(&s[len..]))
            }

            // ── immediates ──
            ImmI => self.imm12(kind, s, PERCENT_I),
            LoadOffset if is_implicit_zero(s) => Ok(Some(s)),
            LoadOffset => self.imm12(kind, s, PERCENT_I),
            StoreOffset if is_implicit_zero(s) => Ok(Some(s)),
            StoreOffset => self.imm12(kind, s, PERCENT_S),
            ZeroOffset if is_implicit_zero(s) => Ok(Some(s)),
            ZeroOffset | Zero => match self.expr(s) {
                Some((Expr::Constant(0), rest)) => Ok(Some(rest)),
                _ => Ok(None),
            },
            TprelAdd => {
                let Some(small) = self.small(s, PERCENT_R)? else {
                    return Ok(None);
                };
                match small.reloc {
                    Some(reloc) => Ok(self.apply_reloc(reloc, small.expr)?.then_some(small.rest)),
                    None => Ok(None),
                }
            }
            Upper => {
                let Some(small) = self.small(s, PERCENT_U)? else {
                    return Ok(None);
                };
                if let Some(reloc) = small.reloc {
                    return Ok(self.apply_reloc(reloc, small.expr)?.then_some(small.rest));
                }
                match small.expr {
                    Expr::Constant(v) if (0..=0xfffff).contains(&v) => {
                        self.set_layout(kind, v << 12);
                        Ok(Some(small.rest))
                    }
                    Expr::Constant(v) => Err(MatchError::OperandOutOfRange {
                        what: kind.describe().into(),
                        value: v,
                        min: 0,
                        max: 0xfffff,
                    }),
                    _ => Ok(None),
                }
            }

            // ── symbolic targets ──
            Branch => self.target(s, RelocKind::Branch),
            Jump => self.target(s, RelocKind::Jal),
            CBranch => self.target(s, RelocKind::RvcBranch),
            CJump => self.target(s, RelocKind::RvcJump),
            Call => {
                let Some(rest) = self.target(s, RelocKind::Call)? else {
                    return Ok(None);
                };
                Ok(Some(match rest.strip_prefix("@plt") {
                    Some(after) => {
                        self.reloc = Some(RelocKind::CallPlt);
                        after
                    }
                    None => rest,
                }))
            }

            // ── macro operands ──
            Const => match self.expr(s) {
                Some((c @ Expr::Constant(_), rest)) => {
                    self.imm = Some(c);
                    Ok(Some(rest))
                }
                _ => Ok(None),
            },
            Symbol | SymbolOrConst => match self.expr(s) {
                Some((sym @ Expr::Symbol { .. }, rest)) => {
                    self.imm = Some(sym);
                    self.reloc = Some(RelocKind::Abs32);
                    Ok(Some(rest))
                }
                Some((c @ Expr::Constant(_), rest)) if kind == SymbolOrConst => {
                    self.imm = Some(c);
                    Ok(Some(rest))
                }
                _ => Ok(None),
            },

            // ── .insn fields ──
            Opcode7 => {
                if let Some((value, len)) = names::lookup_opcode_alias(s) {
                    self.set(operand::OP, u64::from(value));
                    return Ok(Some(&s[len..]));
                }
                let step = self.ranged(kind, s, 0, 127)?;
                if step.is_some() && operand::OP.extract(self.bits) & 0b11 != 0b11 {
                    return Err(MatchError::OperandOutOfRange {
                        what: "32-bit opcode (low bits must be 0b11)".into(),
                        value: operand::OP.extract(self.bits) as i64,
                        min: 3,
                        max: 127,
                    });
                }
                Ok(step)
            }
            Opcode2 => self.ranged(kind, s, 0, 2),
            Funct7 => self.ranged(kind, s, 0, 127),
            Funct3 | CFunct3 => self.ranged(kind, s, 0, 7),
            Funct2 | CFunct2 => self.ranged(kind, s, 0, 3),
            CFunct6 => self.ranged(kind, s, 0, 63),
            CFunct4 => self.ranged(kind, s, 0, 15),

            // ── compressed immediates ──
            CShamt => {
                let max = if self.ctx.xlen == Xlen::Rv64 { 63 } else { 31 };
                self.c_imm(kind, s, |v| (1..=max).contains(&v))
            }
            CShamtW => self.c_imm(kind, s, |v| (1..=31).contains(&v)),
            CUimm8 => self.c_imm(kind, s, |v| operand::C_UIMM8.fits(v)),
            CSimm3 => self.c_imm(kind, s, |v| v != 0 && operand::C_SIMM3.fits(v)),
            CImmNonZero => self.c_imm(kind, s, |v| v != 0 && operand::CI_IMM.fits(v)),
            CImm => self.c_imm(kind, s, |v| operand::CI_IMM.fits(v)),
            CLwOffset | CLdOffset | CLwspOffset | CLdspOffset | CSwspOffset | CSdspOffset => {
                let Some(layout) = kind.layout() else {
                    return Ok(None);
                };
                self.c_imm(kind, s, |v| layout.fits(v))
            }
            CAddi4spn => self.c_imm(kind, s, |v| v != 0 && operand::C_ADDI4SPN.fits(v)),
            CAddi16sp => self.c_imm(kind, s, |v| v != 0 && operand::C_ADDI16SP.fits(v)),
            CLui => self.c_imm(kind, s, |v| {
                (1..32).contains(&v) || (0xfffe0..=0xfffff).contains(&v)
            }),
            CLuiFull => match self.expr(s) {
                Some((Expr::Constant(v), rest))
                    if v != 0 && v & 0xfff == 0 && operand::CI_IMM.fits(v >> 12) =>
                {
                    self.set_layout(kind, v >> 12);
                    Ok(Some(rest))
                }
                _ => Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BasicEvaluator;

    struct Fixture {
        subsets: SubsetList,
        xlen: Xlen,
        rvc: bool,
    }

    impl Fixture {
        fn new(arch: &str, rvc: bool) -> Self {
            let (xlen, subsets) = SubsetList::parse_default(arch).unwrap();
            Self { subsets, xlen, rvc }
        }

        fn ctx(&self) -> MatchContext<'_> {
            MatchContext {
                subsets: &self.subsets,
                xlen: self.xlen,
                rvc: self.rvc,
                rve: self.subsets.is_rve(),
                allow_compressed: true,
                evaluator: &BasicEvaluator,
            }
        }

        fn encode(&self, mnemonic: &str, operands: &str) -> Result<Matched, MatchError> {
            Encoder::new().unwrap().encode(mnemonic, operands, &self.ctx())
        }

        fn word(&self, mnemonic: &str, operands: &str) -> (u64, usize) {
            let m = self.encode(mnemonic, operands).unwrap();
            (m.bits, m.length())
        }
    }

    #[test]
    fn base_integer() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(rv.word("add", "a0, a1, a2"), (0x00c5_8533, 4));
        assert_eq!(rv.word("addi", "a0, a1, -1"), (0xfff5_8513, 4));
        assert_eq!(rv.word("lw", "a0, 8(sp)"), (0x0081_2503, 4));
        assert_eq!(rv.word("lw", "a0, (sp)"), (0x0001_2503, 4));
        assert_eq!(rv.word("sw", "a0, -4(s0)"), (0xfea4_2e23, 4));
        assert_eq!(rv.word("lui", "a0, 0x12345"), (0x1234_5537, 4));
        assert_eq!(rv.word("nop", ""), (0x0000_0013, 4));
        assert_eq!(rv.word("ret", ""), (0x0000_8067, 4));
    }

    #[test]
    fn compressed_aliases() {
        let rv = Fixture::new("rv32ic", true);
        assert_eq!(rv.word("addi", "a0, a0, 1"), (0x0505, 2));
        assert_eq!(rv.word("add", "a0, a0, a1"), (0x952e, 2));
        assert_eq!(rv.word("lw", "a0, 0(a1)"), (0x4188, 2));
        assert_eq!(rv.word("nop", ""), (0x0001, 2));
        assert_eq!(rv.word("ret", ""), (0x8082, 2));
        // out of compressed range falls through to the 32-bit form
        assert_eq!(rv.word("addi", "a0, a0, 100").1, 4);
    }

    #[test]
    fn rvc_off_suppresses_compression() {
        let rv = Fixture::new("rv32ic", false);
        assert_eq!(rv.word("addi", "a0, a0, 1"), (0x0015_0513, 4));
        assert!(matches!(
            rv.encode("c.addi", "a0, 1"),
            Err(MatchError::UnknownMnemonic(_))
        ));
    }

    #[test]
    fn symbolic_operands() {
        let rv = Fixture::new("rv64i", false);
        let m = rv.encode("lui", "a0, %hi(sym)").unwrap();
        assert_eq!(m.reloc, Some(RelocKind::Hi20));
        assert_eq!(m.imm, Some(Expr::symbol("sym")));
        let m = rv.encode("addi", "a0, a0, %lo(sym+4)").unwrap();
        assert_eq!(m.reloc, Some(RelocKind::Lo12I));
        let m = rv.encode("sd", "a0, %pcrel_lo(.L1)(a1)").unwrap();
        assert_eq!(m.reloc, Some(RelocKind::PcrelLo12S));
        let m = rv.encode("beq", "a0, a1, loop").unwrap();
        assert_eq!((m.bits, m.reloc), (0x00b5_0063, Some(RelocKind::Branch)));
        let m = rv.encode("call", "memcpy@plt").unwrap();
        assert!(m.is_macro());
        assert_eq!(m.reloc, Some(RelocKind::CallPlt));
    }

    #[test]
    fn constant_percent_ops_fold() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(rv.word("lui", "a0, %hi(0x12345fff)"), (0x1234_6537, 4));
        assert_eq!(rv.word("addi", "a0, a0, %lo(0x12345fff)"), (0xfff5_0513, 4));
        assert_eq!(
            rv.encode("lui", "a0, %pcrel_hi(0x1000)"),
            Err(MatchError::UnsupportedRelocation("R_RISCV_PCREL_HI20".into()))
        );
    }

    #[test]
    fn hard_errors() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(
            rv.encode("slli", "a0, a0, 32"),
            Err(MatchError::OperandOutOfRange {
                what: "shift amount".into(),
                value: 32,
                min: 0,
                max: 31
            })
        );
        assert_eq!(
            rv.encode("csrr", "a0, nosuchcsr"),
            Err(MatchError::UnknownCsr("nosuchcsr".into()))
        );
        assert_eq!(
            rv.encode("lui", "a0, 0x100000"),
            Err(MatchError::OperandOutOfRange {
                what: "lui immediate".into(),
                value: 0x100000,
                min: 0,
                max: 0xfffff
            })
        );
        assert_eq!(rv.encode("lw", "a0, %lo(x"), Err(MatchError::UnclosedParen));
    }

    #[test]
    fn unknown_and_illegal() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(
            rv.encode("mul", "a0, a1, a2"),
            Err(MatchError::UnknownMnemonic("mul".into()))
        );
        assert_eq!(
            rv.encode("frob", ""),
            Err(MatchError::UnknownMnemonic("frob".into()))
        );
        assert_eq!(
            rv.encode("add", "a0, a1"),
            Err(MatchError::IllegalOperands {
                mnemonic: "add".into(),
                operands: "a0, a1".into()
            })
        );
        // a register is never an immediate
        assert!(rv.encode("addi", "a0, a1, a2").is_err());
    }

    #[test]
    fn csr_by_name_and_number() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(rv.word("csrr", "a0, mstatus"), (0x3000_2573, 4));
        assert_eq!(rv.word("csrr", "a0, 0x300"), (0x3000_2573, 4));
    }

    #[test]
    fn rv32_sign_extends_wide_constants() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(rv.word("addi", "a0, a0, 0xffffffff"), (0xfff5_0513, 4));
    }

    #[test]
    fn rve_rejects_upper_registers() {
        let rv = Fixture::new("rv32e", false);
        assert!(rv.encode("add", "a0, a1, a5").is_ok());
        assert!(rv.encode("add", "a0, a1, a6").is_err());
    }

    #[test]
    fn jalr_register_is_not_an_offset() {
        let rv = Fixture::new("rv32i", false);
        assert_eq!(rv.word("jalr", "ra, t1"), (0x0003_00e7, 4));
        assert_eq!(rv.word("jalr", "t1"), (0x0003_00e7, 4));
    }

    #[test]
    fn insn_directive_types() {
        let rv = Fixture::new("rv32ic", true);
        let enc = Encoder::new().unwrap();
        let m = enc
            .encode_insn("r", "OP, 0, 0, a0, a1, a2", &rv.ctx())
            .unwrap();
        assert_eq!((m.bits, m.length()), (0x00c5_8533, 4));
        let m = enc.encode_insn("i", "0x13, 0, a0, a1, 1", &rv.ctx()).unwrap();
        assert_eq!(m.bits, 0x0015_8513);
        let m = enc.encode_insn("cr", "2, 9, a0, a1", &rv.ctx()).unwrap();
        assert_eq!((m.bits, m.length()), (0x952e, 2));
        assert!(matches!(
            enc.encode_insn("i", "0x10, 0, a0, a1, 1", &rv.ctx()),
            Err(MatchError::OperandOutOfRange { .. })
        ));
    }

    #[test]
    fn macro_templates_capture_operands() {
        let rv = Fixture::new("rv64i", false);
        let m = rv.encode("li", "a0, 0x12345678").unwrap();
        assert!(m.is_macro());
        assert_eq!(m.imm, Some(Expr::Constant(0x1234_5678)));
        assert_eq!(m.register(operand::RD), 10);
        let m = rv.encode("la", "a0, sym").unwrap();
        assert_eq!(m.reloc, Some(RelocKind::Abs32));
        let m = rv.encode("sw", "a0, sym, t0").unwrap();
        assert_eq!((m.register(operand::RS2), m.register(operand::RS1)), (10, 5));
    }
}
