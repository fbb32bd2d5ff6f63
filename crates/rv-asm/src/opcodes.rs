//! Instruction template table.
//!
//! Every mnemonic maps to a contiguous run of templates tried in order:
//! compressed aliases first, then the 32-bit forms, then the macro forms the
//! pseudo-instruction expander handles. The table is checked once at startup
//! so that each template's mask plus its operand fields cover exactly the
//! bits of its instruction word.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

use crate::error::InternalError;
use crate::operand::{self, OperandKind, CI_IMM, C_ADDI4SPN};
use crate::pseudo::MacroKind;
use crate::subset::SubsetList;

// ── Classes and guards ──────────────────────────────────────────────────

/// Extension set a template requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsnClass {
    I,
    C,
    A,
    M,
    F,
    D,
    Q,
    FAndC,
    DAndC,
}

impl InsnClass {
    /// Whether the class is available. Compressed classes also need `rvc`.
    pub fn is_supported(self, subsets: &SubsetList, rvc: bool) -> bool {
        let c = rvc && subsets.contains("c");
        match self {
            InsnClass::I => subsets.contains("i"),
            InsnClass::C => c,
            InsnClass::A => subsets.contains("a"),
            InsnClass::M => subsets.contains("m"),
            InsnClass::F => subsets.contains("f"),
            InsnClass::D => subsets.contains("d"),
            InsnClass::Q => subsets.contains("q"),
            InsnClass::FAndC => c && subsets.contains("f"),
            InsnClass::DAndC => c && subsets.contains("d"),
        }
    }
}

/// Extra predicate on the assembled word, checked after all operands parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchGuard {
    /// Only the fixed opcode bits.
    Opcode,
    /// `rd != x0`.
    RdNonZero,
    /// `rd != x0` and the 5-bit `rs2` field is not `x0`.
    CAdd,
    /// `rd == x0`.
    CNop,
    /// `rd == sp`.
    CAddi16sp,
    /// `rd` is neither `x0` nor `sp` and the immediate is non-zero.
    CLui,
    /// Non-zero `c.addi4spn` immediate.
    CAddi4spn,
    /// `rd != x0` and a non-zero shift.
    SlliAsCSlli,
    /// Non-zero shift.
    SrxiAsCSrxi,
    /// Never matches; used by macro templates.
    Never,
}

impl MatchGuard {
    /// Evaluate the guard for `template` against the assembled `word`.
    pub fn check(self, template: &Template, word: u64) -> bool {
        let opcode = ((word ^ template.match_bits) & template.mask_bits) == 0;
        let rd = operand::RD.extract(word);
        let ci = CI_IMM.extract(word);
        match self {
            MatchGuard::Opcode => opcode,
            MatchGuard::RdNonZero => opcode && rd != 0,
            MatchGuard::CAdd => opcode && rd != 0 && operand::CRS2.extract(word) != 0,
            MatchGuard::CNop => opcode && rd == 0,
            MatchGuard::CAddi16sp => opcode && rd == 2,
            MatchGuard::CLui => opcode && rd != 0 && rd != 2 && ci != 0,
            MatchGuard::CAddi4spn => opcode && C_ADDI4SPN.extract(word) != 0,
            MatchGuard::SlliAsCSlli => opcode && rd != 0 && ci != 0,
            MatchGuard::SrxiAsCSrxi => opcode && ci != 0,
            MatchGuard::Never => false,
        }
    }
}

/// Whether a template encodes directly or goes through the expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Real,
    Macro(MacroKind),
}

// ── Templates ───────────────────────────────────────────────────────────

/// One static table row before its format string is parsed.
#[derive(Debug, Clone, Copy)]
struct Entry {
    mnemonic: &'static str,
    xlen: u32,
    class: InsnClass,
    args: &'static str,
    match_bits: u64,
    mask_bits: u64,
    guard: MatchGuard,
    kind: TemplateKind,
}

const fn insn(
    mnemonic: &'static str,
    xlen: u32,
    class: InsnClass,
    args: &'static str,
    match_bits: u64,
    mask_bits: u64,
    guard: MatchGuard,
) -> Entry {
    Entry {
        mnemonic,
        xlen,
        class,
        args,
        match_bits,
        mask_bits,
        guard,
        kind: TemplateKind::Real,
    }
}

/// A macro row. `preset` carries register fields the expander reads back,
/// the way `call` fixes its temporary register.
const fn mac(
    mnemonic: &'static str,
    xlen: u32,
    class: InsnClass,
    args: &'static str,
    preset: u64,
    kind: MacroKind,
) -> Entry {
    Entry {
        mnemonic,
        xlen,
        class,
        args,
        match_bits: preset,
        mask_bits: 0,
        guard: MatchGuard::Never,
        kind: TemplateKind::Macro(kind),
    }
}

/// A parsed instruction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub mnemonic: &'static str,
    /// Required word width in bits, or 0 for any.
    pub xlen: u32,
    pub class: InsnClass,
    /// The format string the operands were parsed from.
    pub args: &'static str,
    pub match_bits: u64,
    pub mask_bits: u64,
    pub guard: MatchGuard,
    pub kind: TemplateKind,
    pub operands: Vec<OperandKind>,
    /// Encoded length in bytes.
    pub length: usize,
}

impl Template {
    fn from_entry(e: &Entry, fixed_length: Option<usize>) -> Result<Self, InternalError> {
        Ok(Self {
            mnemonic: e.mnemonic,
            xlen: e.xlen,
            class: e.class,
            args: e.args,
            match_bits: e.match_bits,
            mask_bits: e.mask_bits,
            guard: e.guard,
            kind: e.kind,
            operands: OperandKind::parse_format(e.mnemonic, e.args)?,
            length: fixed_length.unwrap_or_else(|| insn_length(e.match_bits)),
        })
    }

    /// Whether this is a macro template.
    pub fn is_macro(&self) -> bool {
        matches!(self.kind, TemplateKind::Macro(_))
    }

    /// Whether this template produces a 16-bit instruction.
    pub fn is_compressed(&self) -> bool {
        !self.is_macro() && self.length == 2
    }
}

impl core::fmt::Display for Template {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.args)
        }
    }
}

/// Length in bytes implied by the low bits of an instruction word.
pub fn insn_length(word: u64) -> usize {
    if word & 0b11 != 0b11 {
        2
    } else if word & 0x1f != 0x1f {
        4
    } else if word & 0x3f == 0x1f {
        6
    } else if word & 0x7f == 0x3f {
        8
    } else {
        2
    }
}

/// Check that a template's bits are consistent.
///
/// `length` is the encoded size in bytes; `None` derives it from the match
/// bits. Macro templates are not checked.
///
/// Operands must not share bits with the mask. Operands that only name a
/// fixed register, such as `Cc` or `Cz`, occupy no bits and are unaffected.
pub fn validate_template(template: &Template, length: Option<usize>) -> Result<(), InternalError> {
    if template.is_macro() {
        return Ok(());
    }
    let width = 8 * length.unwrap_or_else(|| insn_length(template.match_bits)) as u32;
    let required = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };

    if (template.mask_bits & template.match_bits) != (template.match_bits & required) {
        return Err(InternalError::MaskMismatch {
            mnemonic: template.mnemonic.into(),
            args: template.args.into(),
        });
    }

    let overlap = template
        .operands
        .iter()
        .fold(0, |acc, op| acc | (op.used_bits() & template.mask_bits));
    if overlap != 0 {
        return Err(InternalError::FixedOperand {
            mnemonic: template.mnemonic.into(),
            args: template.args.into(),
            overlap,
        });
    }

    let used = template
        .operands
        .iter()
        .fold(template.mask_bits, |acc, op| acc | op.used_bits());
    if used != required {
        return Err(InternalError::UncoveredBits {
            mnemonic: template.mnemonic.into(),
            args: template.args.into(),
            missing: used ^ required,
        });
    }
    Ok(())
}

// ── Table storage ───────────────────────────────────────────────────────

/// The validated instruction and `.insn` tables.
#[derive(Debug)]
pub struct Tables {
    templates: Vec<Template>,
    by_mnemonic: HashMap<&'static str, Range<usize>>,
    insn_types: Vec<Template>,
    by_insn_type: HashMap<&'static str, Range<usize>>,
}

static TABLES: OnceLock<Result<Tables, InternalError>> = OnceLock::new();

impl Tables {
    /// The process-wide tables, built and validated on first use.
    pub fn get() -> Result<&'static Tables, InternalError> {
        TABLES.get_or_init(Tables::build).as_ref().map_err(Clone::clone)
    }

    fn build() -> Result<Tables, InternalError> {
        let (templates, by_mnemonic) = index(TEMPLATES, |_| None)?;
        let (insn_types, by_insn_type) = index(INSN_TYPES, |e| {
            Some(if e.mnemonic.starts_with('c') { 2 } else { 4 })
        })?;
        tracing::debug!(
            templates = templates.len(),
            insn_types = insn_types.len(),
            "instruction tables validated"
        );
        Ok(Tables {
            templates,
            by_mnemonic,
            insn_types,
            by_insn_type,
        })
    }

    /// All templates for `mnemonic`, in match order.
    pub fn lookup(&self, mnemonic: &str) -> &[Template] {
        self.by_mnemonic
            .get(mnemonic)
            .map_or(&[], |r| &self.templates[r.clone()])
    }

    /// All `.insn` templates for a type name such as `r` or `ci`.
    pub fn lookup_insn_type(&self, name: &str) -> &[Template] {
        self.by_insn_type
            .get(name)
            .map_or(&[], |r| &self.insn_types[r.clone()])
    }

    /// Every instruction template.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Every `.insn` template.
    pub fn insn_types(&self) -> &[Template] {
        &self.insn_types
    }
}

type Index = (Vec<Template>, HashMap<&'static str, Range<usize>>);

fn index(entries: &[Entry], fixed_length: impl Fn(&Entry) -> Option<usize>) -> Result<Index, InternalError> {
    let mut templates = Vec::with_capacity(entries.len());
    let mut map: HashMap<&'static str, Range<usize>> = HashMap::new();
    for (i, e) in entries.iter().enumerate() {
        let length = fixed_length(e);
        let t = Template::from_entry(e, length)?;
        validate_template(&t, length)?;
        match map.get_mut(e.mnemonic) {
            Some(r) if r.end == i => r.end = i + 1,
            Some(_) => {
                return Err(InternalError::Unreachable(format!(
                    "templates for `{}' are not contiguous",
                    e.mnemonic
                )))
            }
            None => {
                map.insert(e.mnemonic, i..i + 1);
            }
        }
        templates.push(t);
    }
    Ok((templates, map))
}

// ── Encodings ───────────────────────────────────────────────────────────

pub(crate) const X_RA: u64 = 1;
const X_T1: u64 = 6;

const MASK_RD: u64 = 0x1f << 7;
const MASK_RS1: u64 = 0x1f << 15;
const MASK_RS2: u64 = 0x1f << 20;
const MASK_IMM: u64 = 0xfff << 20;
const MASK_RM: u64 = 0x7 << 12;
const MASK_PRED: u64 = 0xf << 24;
const MASK_SUCC: u64 = 0xf << 20;
const MASK_AQ: u64 = 1 << 26;
const MASK_RL: u64 = 1 << 25;
const MASK_AQRL: u64 = MASK_AQ | MASK_RL;
const MASK_RVC_IMM: u64 = 0x107c;

/// opcode + funct3
const MASK_I: u64 = 0x707f;
/// opcode only
const MASK_U: u64 = 0x7f;
/// opcode + funct3 + funct7
const MASK_R: u64 = 0xfe00_707f;
/// RV64 immediate shifts: funct6
const MASK_SHIFT: u64 = 0xfc00_707f;
const MASK_AMO: u64 = 0xf800_707f;
const MASK_LR: u64 = 0xf9f0_707f;
/// FP op with a rounding-mode field
const MASK_FP_RM: u64 = 0xfe00_007f;
/// FP op with a fixed rs2 and a rounding-mode field
const MASK_FP1_RM: u64 = 0xfff0_007f;
/// FP op with a fixed rs2 and funct3
const MASK_FP1: u64 = 0xfff0_707f;
const MASK_R4: u64 = 0x0600_007f;
const MASK_CSR_READ: u64 = 0xffff_f07f;
const MASK_FULL: u64 = 0xffff_ffff;

pub(crate) const MATCH_JAL: u64 = 0x6f;
const MATCH_JALR: u64 = 0x67;
pub(crate) const MATCH_BEQ: u64 = 0x63;
pub(crate) const MATCH_BNE: u64 = 0x1063;
const MATCH_BLT: u64 = 0x4063;
const MATCH_BGE: u64 = 0x5063;
const MATCH_BLTU: u64 = 0x6063;
const MATCH_BGEU: u64 = 0x7063;
const MATCH_ADDI: u64 = 0x13;
const MATCH_SLTI: u64 = 0x2013;
const MATCH_SLTIU: u64 = 0x3013;
const MATCH_XORI: u64 = 0x4013;
const MATCH_ORI: u64 = 0x6013;
const MATCH_ANDI: u64 = 0x7013;
const MATCH_SLLI: u64 = 0x1013;
const MATCH_SRLI: u64 = 0x5013;
const MATCH_SRAI: u64 = 0x4000_5013;
const MATCH_ADD: u64 = 0x33;
const MATCH_SUB: u64 = 0x4000_0033;
const MATCH_SLL: u64 = 0x1033;
const MATCH_SLT: u64 = 0x2033;
const MATCH_SLTU: u64 = 0x3033;
const MATCH_XOR: u64 = 0x4033;
const MATCH_SRL: u64 = 0x5033;
const MATCH_SRA: u64 = 0x4000_5033;
const MATCH_OR: u64 = 0x6033;
const MATCH_AND: u64 = 0x7033;
const MATCH_ADDIW: u64 = 0x1b;
const MATCH_SLLIW: u64 = 0x101b;
const MATCH_SRLIW: u64 = 0x501b;
const MATCH_SRAIW: u64 = 0x4000_501b;
const MATCH_ADDW: u64 = 0x3b;
const MATCH_SUBW: u64 = 0x4000_003b;
const MATCH_SLLW: u64 = 0x103b;
const MATCH_SRLW: u64 = 0x503b;
const MATCH_SRAW: u64 = 0x4000_503b;
const MATCH_FENCE: u64 = 0xf;
const MATCH_CSRRW: u64 = 0x1073;
const MATCH_CSRRS: u64 = 0x2073;
const MATCH_CSRRC: u64 = 0x3073;
const MATCH_CSRRWI: u64 = 0x5073;
const MATCH_CSRRSI: u64 = 0x6073;
const MATCH_CSRRCI: u64 = 0x7073;
const MATCH_SFENCE_VMA: u64 = 0x1200_0073;
const MATCH_FLT_S: u64 = 0xa000_1053;
const MATCH_FLE_S: u64 = 0xa000_0053;
const MATCH_FLT_D: u64 = 0xa200_1053;
const MATCH_FLE_D: u64 = 0xa200_0053;
const MATCH_FLT_Q: u64 = 0xa600_1053;
const MATCH_FLE_Q: u64 = 0xa600_0053;
const MATCH_LR_W: u64 = 0x1000_202f;
const MATCH_SC_W: u64 = 0x1800_202f;
const MATCH_LR_D: u64 = 0x1000_302f;
const MATCH_SC_D: u64 = 0x1800_302f;

/// Fixed rounding mode `dyn` in the rm field.
const RM_DYN: u64 = MASK_RM;
const CSR_CYCLE: u64 = 0xc00;

const MATCH_C_ADDI4SPN: u64 = 0x0000;
const MATCH_C_FLD: u64 = 0x2000;
const MATCH_C_LW: u64 = 0x4000;
const MATCH_C_FLW: u64 = 0x6000;
const MATCH_C_LD: u64 = 0x6000;
const MATCH_C_FSD: u64 = 0xa000;
const MATCH_C_SW: u64 = 0xc000;
const MATCH_C_FSW: u64 = 0xe000;
const MATCH_C_SD: u64 = 0xe000;
const MATCH_C_ADDI: u64 = 0x0001;
pub(crate) const MATCH_C_JAL: u64 = 0x2001;
const MATCH_C_ADDIW: u64 = 0x2001;
const MATCH_C_LI: u64 = 0x4001;
const MATCH_C_LUI: u64 = 0x6001;
const MATCH_C_ADDI16SP: u64 = 0x6101;
const MATCH_C_SRLI: u64 = 0x8001;
const MATCH_C_SRAI: u64 = 0x8401;
const MATCH_C_ANDI: u64 = 0x8801;
const MATCH_C_SUB: u64 = 0x8c01;
const MATCH_C_XOR: u64 = 0x8c21;
const MATCH_C_OR: u64 = 0x8c41;
const MATCH_C_AND: u64 = 0x8c61;
const MATCH_C_SUBW: u64 = 0x9c01;
const MATCH_C_ADDW: u64 = 0x9c21;
pub(crate) const MATCH_C_J: u64 = 0xa001;
pub(crate) const MATCH_C_BEQZ: u64 = 0xc001;
pub(crate) const MATCH_C_BNEZ: u64 = 0xe001;
const MATCH_C_SLLI: u64 = 0x0002;
const MATCH_C_FLDSP: u64 = 0x2002;
const MATCH_C_LWSP: u64 = 0x4002;
const MATCH_C_FLWSP: u64 = 0x6002;
const MATCH_C_LDSP: u64 = 0x6002;
const MATCH_C_JR: u64 = 0x8002;
const MATCH_C_MV: u64 = 0x8002;
const MATCH_C_EBREAK: u64 = 0x9002;
const MATCH_C_JALR: u64 = 0x9002;
const MATCH_C_ADD: u64 = 0x9002;
const MATCH_C_FSDSP: u64 = 0xa002;
const MATCH_C_SWSP: u64 = 0xc002;
const MATCH_C_FSWSP: u64 = 0xe002;
const MATCH_C_SDSP: u64 = 0xe002;

/// funct3 + quadrant
pub(crate) const MASK_CQ: u64 = 0xe003;
/// c.srli / c.srai / c.andi
const MASK_CB: u64 = 0xec03;
/// c.sub / c.xor / c.or / c.and / c.subw / c.addw
const MASK_CA: u64 = 0xfc63;
/// c.mv / c.add
const MASK_CR: u64 = 0xf003;
/// c.jr / c.jalr
const MASK_CJR: u64 = 0xf07f;
const MASK_C_ADDI16SP: u64 = 0xef83;
const MASK_C_FULL: u64 = 0xffff;

use InsnClass::{A, C, D, DAndC, FAndC, F, I, M, Q};
use MatchGuard::{
    CAdd, CAddi16sp, CAddi4spn, CLui, CNop, Opcode, RdNonZero, SlliAsCSlli, SrxiAsCSrxi,
};

// ── Instruction table ───────────────────────────────────────────────────

#[rustfmt::skip]
static TEMPLATES: &[Entry] = &[
    // base integer instructions and aliases
    insn("unimp",      0, C, "",          0, MASK_C_FULL, Opcode),
    insn("unimp",      0, I, "",          MATCH_CSRRW | (CSR_CYCLE << 20), MASK_FULL, Opcode),
    insn("ebreak",     0, C, "",          MATCH_C_EBREAK, MASK_C_FULL, Opcode),
    insn("ebreak",     0, I, "",          0x0010_0073, MASK_FULL, Opcode),
    insn("sbreak",     0, C, "",          MATCH_C_EBREAK, MASK_C_FULL, Opcode),
    insn("sbreak",     0, I, "",          0x0010_0073, MASK_FULL, Opcode),
    insn("ret",        0, C, "",          MATCH_C_JR | (X_RA << 7), MASK_CJR | MASK_RD, Opcode),
    insn("ret",        0, I, "",          MATCH_JALR | (X_RA << 15), MASK_I | MASK_RD | MASK_RS1 | MASK_IMM, Opcode),
    insn("jr",         0, C, "d",         MATCH_C_JR, MASK_CJR, RdNonZero),
    insn("jr",         0, I, "s",         MATCH_JALR, MASK_I | MASK_RD | MASK_IMM, Opcode),
    insn("jr",         0, I, "o(s)",      MATCH_JALR, MASK_I | MASK_RD, Opcode),
    insn("jr",         0, I, "s,j",       MATCH_JALR, MASK_I | MASK_RD, Opcode),
    insn("jalr",       0, C, "d",         MATCH_C_JALR, MASK_CJR, RdNonZero),
    insn("jalr",       0, I, "s",         MATCH_JALR | (X_RA << 7), MASK_I | MASK_RD | MASK_IMM, Opcode),
    insn("jalr",       0, I, "o(s)",      MATCH_JALR | (X_RA << 7), MASK_I | MASK_RD, Opcode),
    insn("jalr",       0, I, "s,j",       MATCH_JALR | (X_RA << 7), MASK_I | MASK_RD, Opcode),
    insn("jalr",       0, I, "d,s",       MATCH_JALR, MASK_I | MASK_IMM, Opcode),
    insn("jalr",       0, I, "d,o(s)",    MATCH_JALR, MASK_I, Opcode),
    insn("jalr",       0, I, "d,s,j",     MATCH_JALR, MASK_I, Opcode),
    insn("j",          0, C, "Ca",        MATCH_C_J, MASK_CQ, Opcode),
    insn("j",          0, I, "a",         MATCH_JAL, MASK_U | MASK_RD, Opcode),
    insn("jal",        0, I, "a",         MATCH_JAL | (X_RA << 7), MASK_U | MASK_RD, Opcode),
    insn("jal",        0, I, "d,a",       MATCH_JAL, MASK_U, Opcode),
    insn("jal",       32, C, "Ca",        MATCH_C_JAL, MASK_CQ, Opcode),
    mac("call",        0, I, "d,c",       X_T1 << 15, MacroKind::Call),
    mac("call",        0, I, "c",         (X_RA << 15) | (X_RA << 7), MacroKind::Call),
    mac("tail",        0, I, "c",         X_T1 << 15, MacroKind::Call),
    mac("jump",        0, I, "c,s",       0, MacroKind::Call),
    insn("nop",        0, C, "",          MATCH_C_ADDI, MASK_C_FULL, Opcode),
    insn("nop",        0, I, "",          MATCH_ADDI, MASK_I | MASK_RD | MASK_RS1 | MASK_IMM, Opcode),
    insn("lui",        0, C, "d,Cu",      MATCH_C_LUI, MASK_CQ, CLui),
    insn("lui",        0, I, "d,u",       0x37, MASK_U, Opcode),
    insn("li",         0, C, "d,Cv",      MATCH_C_LUI, MASK_CQ, CLui),
    insn("li",         0, C, "d,Co",      MATCH_C_LI, MASK_CQ, RdNonZero),
    insn("li",         0, I, "d,j",       MATCH_ADDI, MASK_I | MASK_RS1, Opcode),
    mac("li",          0, I, "d,I",       0, MacroKind::Li),
    insn("mv",         0, C, "d,CV",      MATCH_C_MV, MASK_CR, CAdd),
    insn("mv",         0, I, "d,s",       MATCH_ADDI, MASK_I | MASK_IMM, Opcode),
    insn("move",       0, C, "d,CV",      MATCH_C_MV, MASK_CR, CAdd),
    insn("move",       0, I, "d,s",       MATCH_ADDI, MASK_I | MASK_IMM, Opcode),
    insn("zext.b",     0, I, "d,s",       MATCH_ANDI | (255 << 20), MASK_I | MASK_IMM, Opcode),
    insn("and",        0, C, "Cs,Cw,Ct",  MATCH_C_AND, MASK_CA, Opcode),
    insn("and",        0, C, "Cs,Ct,Cw",  MATCH_C_AND, MASK_CA, Opcode),
    insn("and",        0, C, "Cs,Cw,Co",  MATCH_C_ANDI, MASK_CB, Opcode),
    insn("and",        0, I, "d,s,t",     MATCH_AND, MASK_R, Opcode),
    insn("and",        0, I, "d,s,j",     MATCH_ANDI, MASK_I, Opcode),
    insn("andi",       0, C, "Cs,Cw,Co",  MATCH_C_ANDI, MASK_CB, Opcode),
    insn("andi",       0, I, "d,s,j",     MATCH_ANDI, MASK_I, Opcode),
    insn("beqz",       0, C, "Cs,Cp",     MATCH_C_BEQZ, MASK_CQ, Opcode),
    insn("beqz",       0, I, "s,p",       MATCH_BEQ, MASK_I | MASK_RS2, Opcode),
    insn("beq",        0, C, "Cs,Cz,Cp",  MATCH_C_BEQZ, MASK_CQ, Opcode),
    insn("beq",        0, I, "s,t,p",     MATCH_BEQ, MASK_I, Opcode),
    insn("blez",       0, I, "t,p",       MATCH_BGE, MASK_I | MASK_RS1, Opcode),
    insn("bgez",       0, I, "s,p",       MATCH_BGE, MASK_I | MASK_RS2, Opcode),
    insn("bge",        0, I, "s,t,p",     MATCH_BGE, MASK_I, Opcode),
    insn("bgeu",       0, I, "s,t,p",     MATCH_BGEU, MASK_I, Opcode),
    insn("ble",        0, I, "t,s,p",     MATCH_BGE, MASK_I, Opcode),
    insn("bleu",       0, I, "t,s,p",     MATCH_BGEU, MASK_I, Opcode),
    insn("bltz",       0, I, "s,p",       MATCH_BLT, MASK_I | MASK_RS2, Opcode),
    insn("bgtz",       0, I, "t,p",       MATCH_BLT, MASK_I | MASK_RS1, Opcode),
    insn("blt",        0, I, "s,t,p",     MATCH_BLT, MASK_I, Opcode),
    insn("bltu",       0, I, "s,t,p",     MATCH_BLTU, MASK_I, Opcode),
    insn("bgt",        0, I, "t,s,p",     MATCH_BLT, MASK_I, Opcode),
    insn("bgtu",       0, I, "t,s,p",     MATCH_BLTU, MASK_I, Opcode),
    insn("bnez",       0, C, "Cs,Cp",     MATCH_C_BNEZ, MASK_CQ, Opcode),
    insn("bnez",       0, I, "s,p",       MATCH_BNE, MASK_I | MASK_RS2, Opcode),
    insn("bne",        0, C, "Cs,Cz,Cp",  MATCH_C_BNEZ, MASK_CQ, Opcode),
    insn("bne",        0, I, "s,t,p",     MATCH_BNE, MASK_I, Opcode),
    insn("add",        0, C, "d,CU,CV",   MATCH_C_ADD, MASK_CR, CAdd),
    insn("add",        0, C, "d,CV,CU",   MATCH_C_ADD, MASK_CR, CAdd),
    insn("add",        0, C, "d,CU,Co",   MATCH_C_ADDI, MASK_CQ, RdNonZero),
    insn("add",        0, C, "Ct,Cc,CK",  MATCH_C_ADDI4SPN, MASK_CQ, CAddi4spn),
    insn("add",        0, C, "Cc,Cc,CL",  MATCH_C_ADDI16SP, MASK_C_ADDI16SP, CAddi16sp),
    insn("add",        0, C, "d,Cz,CV",   MATCH_C_MV, MASK_CR, CAdd),
    insn("add",        0, I, "d,s,t",     MATCH_ADD, MASK_R, Opcode),
    insn("add",        0, I, "d,s,t,1",   MATCH_ADD, MASK_R, Opcode),
    insn("add",        0, I, "d,s,j",     MATCH_ADDI, MASK_I, Opcode),
    insn("addi",       0, C, "Ct,Cc,CK",  MATCH_C_ADDI4SPN, MASK_CQ, CAddi4spn),
    insn("addi",       0, C, "d,CU,Cj",   MATCH_C_ADDI, MASK_CQ, RdNonZero),
    insn("addi",       0, C, "d,CU,z",    MATCH_C_ADDI, MASK_CQ | MASK_RVC_IMM, CNop),
    insn("addi",       0, C, "Cc,Cc,CL",  MATCH_C_ADDI16SP, MASK_C_ADDI16SP, CAddi16sp),
    insn("addi",       0, C, "d,Cz,Co",   MATCH_C_LI, MASK_CQ, RdNonZero),
    insn("addi",       0, C, "d,CV,z",    MATCH_C_MV, MASK_CR, CAdd),
    insn("addi",       0, I, "d,s,j",     MATCH_ADDI, MASK_I, Opcode),
    mac("la",          0, I, "d,B",       0, MacroKind::La),
    mac("lla",         0, I, "d,B",       0, MacroKind::Lla),
    mac("la.tls.gd",   0, I, "d,A",       0, MacroKind::LaTlsGd),
    mac("la.tls.ie",   0, I, "d,A",       0, MacroKind::LaTlsIe),
    insn("neg",        0, I, "d,t",       MATCH_SUB, MASK_R | MASK_RS1, Opcode),
    insn("sll",        0, C, "d,CU,C>",   MATCH_C_SLLI, MASK_CQ, SlliAsCSlli),
    insn("sll",        0, I, "d,s,t",     MATCH_SLL, MASK_R, Opcode),
    insn("sll",        0, I, "d,s,>",     MATCH_SLLI, MASK_SHIFT, Opcode),
    insn("slli",       0, C, "d,CU,C>",   MATCH_C_SLLI, MASK_CQ, SlliAsCSlli),
    insn("slli",       0, I, "d,s,>",     MATCH_SLLI, MASK_SHIFT, Opcode),
    insn("srl",        0, C, "Cs,Cw,C>",  MATCH_C_SRLI, MASK_CB, SrxiAsCSrxi),
    insn("srl",        0, I, "d,s,t",     MATCH_SRL, MASK_R, Opcode),
    insn("srl",        0, I, "d,s,>",     MATCH_SRLI, MASK_SHIFT, Opcode),
    insn("srli",       0, C, "Cs,Cw,C>",  MATCH_C_SRLI, MASK_CB, SrxiAsCSrxi),
    insn("srli",       0, I, "d,s,>",     MATCH_SRLI, MASK_SHIFT, Opcode),
    insn("sra",        0, C, "Cs,Cw,C>",  MATCH_C_SRAI, MASK_CB, SrxiAsCSrxi),
    insn("sra",        0, I, "d,s,t",     MATCH_SRA, MASK_R, Opcode),
    insn("sra",        0, I, "d,s,>",     MATCH_SRAI, MASK_SHIFT, Opcode),
    insn("srai",       0, C, "Cs,Cw,C>",  MATCH_C_SRAI, MASK_CB, SrxiAsCSrxi),
    insn("srai",       0, I, "d,s,>",     MATCH_SRAI, MASK_SHIFT, Opcode),
    insn("sub",        0, C, "Cs,Cw,Ct",  MATCH_C_SUB, MASK_CA, Opcode),
    insn("sub",        0, I, "d,s,t",     MATCH_SUB, MASK_R, Opcode),
    insn("lb",         0, I, "d,o(s)",    0x0003, MASK_I, Opcode),
    mac("lb",          0, I, "d,A",       0, MacroKind::Load),
    insn("lbu",        0, I, "d,o(s)",    0x4003, MASK_I, Opcode),
    mac("lbu",         0, I, "d,A",       0, MacroKind::Load),
    insn("lh",         0, I, "d,o(s)",    0x1003, MASK_I, Opcode),
    mac("lh",          0, I, "d,A",       0, MacroKind::Load),
    insn("lhu",        0, I, "d,o(s)",    0x5003, MASK_I, Opcode),
    mac("lhu",         0, I, "d,A",       0, MacroKind::Load),
    insn("lw",         0, C, "d,Cm(Cc)",  MATCH_C_LWSP, MASK_CQ, RdNonZero),
    insn("lw",         0, C, "Ct,Ck(Cs)", MATCH_C_LW, MASK_CQ, Opcode),
    insn("lw",         0, I, "d,o(s)",    0x2003, MASK_I, Opcode),
    mac("lw",          0, I, "d,A",       0, MacroKind::Load),
    insn("not",        0, I, "d,s",       MATCH_XORI | MASK_IMM, MASK_I | MASK_IMM, Opcode),
    insn("or",         0, I, "d,s,j",     MATCH_ORI, MASK_I, Opcode),
    insn("or",         0, C, "Cs,Cw,Ct",  MATCH_C_OR, MASK_CA, Opcode),
    insn("or",         0, C, "Cs,Ct,Cw",  MATCH_C_OR, MASK_CA, Opcode),
    insn("or",         0, I, "d,s,t",     MATCH_OR, MASK_R, Opcode),
    insn("ori",        0, I, "d,s,j",     MATCH_ORI, MASK_I, Opcode),
    insn("auipc",      0, I, "d,u",       0x17, MASK_U, Opcode),
    insn("seqz",       0, I, "d,s",       MATCH_SLTIU | (1 << 20), MASK_I | MASK_IMM, Opcode),
    insn("snez",       0, I, "d,t",       MATCH_SLTU, MASK_R | MASK_RS1, Opcode),
    insn("sltz",       0, I, "d,s",       MATCH_SLT, MASK_R | MASK_RS2, Opcode),
    insn("sgtz",       0, I, "d,t",       MATCH_SLT, MASK_R | MASK_RS1, Opcode),
    insn("slti",       0, I, "d,s,j",     MATCH_SLTI, MASK_I, Opcode),
    insn("slt",        0, I, "d,s,t",     MATCH_SLT, MASK_R, Opcode),
    insn("slt",        0, I, "d,s,j",     MATCH_SLTI, MASK_I, Opcode),
    insn("sltiu",      0, I, "d,s,j",     MATCH_SLTIU, MASK_I, Opcode),
    insn("sltu",       0, I, "d,s,t",     MATCH_SLTU, MASK_R, Opcode),
    insn("sltu",       0, I, "d,s,j",     MATCH_SLTIU, MASK_I, Opcode),
    insn("sgt",        0, I, "d,t,s",     MATCH_SLT, MASK_R, Opcode),
    insn("sgtu",       0, I, "d,t,s",     MATCH_SLTU, MASK_R, Opcode),
    insn("sb",         0, I, "t,q(s)",    0x0023, MASK_I, Opcode),
    mac("sb",          0, I, "t,A,s",     0, MacroKind::Store),
    insn("sh",         0, I, "t,q(s)",    0x1023, MASK_I, Opcode),
    mac("sh",          0, I, "t,A,s",     0, MacroKind::Store),
    insn("sw",         0, C, "CV,CM(Cc)", MATCH_C_SWSP, MASK_CQ, Opcode),
    insn("sw",         0, C, "Ct,Ck(Cs)", MATCH_C_SW, MASK_CQ, Opcode),
    insn("sw",         0, I, "t,q(s)",    0x2023, MASK_I, Opcode),
    mac("sw",          0, I, "t,A,s",     0, MacroKind::Store),
    insn("fence",      0, I, "",          MATCH_FENCE | MASK_PRED | MASK_SUCC, MASK_I | MASK_RD | MASK_RS1 | MASK_IMM, Opcode),
    insn("fence",      0, I, "P,Q",       MATCH_FENCE, MASK_I | MASK_RD | MASK_RS1 | (MASK_IMM & !MASK_PRED & !MASK_SUCC), Opcode),
    insn("fence.i",    0, I, "",          0x100f, MASK_I | MASK_RD | MASK_RS1 | MASK_IMM, Opcode),
    insn("fence.tso",  0, I, "",          0x8330_000f, 0xfff0_707f | MASK_RD | MASK_RS1, Opcode),
    insn("rdcycle",    0, I, "d",         0xc000_2073, MASK_CSR_READ, Opcode),
    insn("rdinstret",  0, I, "d",         0xc020_2073, MASK_CSR_READ, Opcode),
    insn("rdtime",     0, I, "d",         0xc010_2073, MASK_CSR_READ, Opcode),
    insn("rdcycleh",  32, I, "d",         0xc800_2073, MASK_CSR_READ, Opcode),
    insn("rdinstreth",32, I, "d",         0xc820_2073, MASK_CSR_READ, Opcode),
    insn("rdtimeh",   32, I, "d",         0xc810_2073, MASK_CSR_READ, Opcode),
    insn("ecall",      0, I, "",          0x73, MASK_FULL, Opcode),
    insn("scall",      0, I, "",          0x73, MASK_FULL, Opcode),
    insn("xor",        0, I, "d,s,j",     MATCH_XORI, MASK_I, Opcode),
    insn("xor",        0, C, "Cs,Cw,Ct",  MATCH_C_XOR, MASK_CA, Opcode),
    insn("xor",        0, C, "Cs,Ct,Cw",  MATCH_C_XOR, MASK_CA, Opcode),
    insn("xor",        0, I, "d,s,t",     MATCH_XOR, MASK_R, Opcode),
    insn("xori",       0, I, "d,s,j",     MATCH_XORI, MASK_I, Opcode),
    insn("lwu",       64, I, "d,o(s)",    0x6003, MASK_I, Opcode),
    mac("lwu",        64, I, "d,A",       0, MacroKind::Load),
    insn("ld",        64, C, "d,Cn(Cc)",  MATCH_C_LDSP, MASK_CQ, RdNonZero),
    insn("ld",        64, C, "Ct,Cl(Cs)", MATCH_C_LD, MASK_CQ, Opcode),
    insn("ld",        64, I, "d,o(s)",    0x3003, MASK_I, Opcode),
    mac("ld",         64, I, "d,A",       0, MacroKind::Load),
    insn("sd",        64, C, "CV,CN(Cc)", MATCH_C_SDSP, MASK_CQ, Opcode),
    insn("sd",        64, C, "Ct,Cl(Cs)", MATCH_C_SD, MASK_CQ, Opcode),
    insn("sd",        64, I, "t,q(s)",    0x3023, MASK_I, Opcode),
    mac("sd",         64, I, "t,A,s",     0, MacroKind::Store),
    insn("sext.w",    64, C, "d,CU",      MATCH_C_ADDIW, MASK_CQ | MASK_RVC_IMM, RdNonZero),
    insn("sext.w",    64, I, "d,s",       MATCH_ADDIW, MASK_I | MASK_IMM, Opcode),
    insn("addw",      64, C, "Cs,Cw,Ct",  MATCH_C_ADDW, MASK_CA, Opcode),
    insn("addw",      64, C, "Cs,Ct,Cw",  MATCH_C_ADDW, MASK_CA, Opcode),
    insn("addw",      64, C, "d,CU,Co",   MATCH_C_ADDIW, MASK_CQ, RdNonZero),
    insn("addw",      64, I, "d,s,t",     MATCH_ADDW, MASK_R, Opcode),
    insn("addw",      64, I, "d,s,j",     MATCH_ADDIW, MASK_I, Opcode),
    insn("addiw",     64, C, "d,CU,Co",   MATCH_C_ADDIW, MASK_CQ, RdNonZero),
    insn("addiw",     64, I, "d,s,j",     MATCH_ADDIW, MASK_I, Opcode),
    insn("negw",      64, I, "d,t",       MATCH_SUBW, MASK_R | MASK_RS1, Opcode),
    insn("sllw",      64, I, "d,s,t",     MATCH_SLLW, MASK_R, Opcode),
    insn("sllw",      64, I, "d,s,<",     MATCH_SLLIW, MASK_R, Opcode),
    insn("slliw",     64, I, "d,s,<",     MATCH_SLLIW, MASK_R, Opcode),
    insn("srlw",      64, I, "d,s,t",     MATCH_SRLW, MASK_R, Opcode),
    insn("srlw",      64, I, "d,s,<",     MATCH_SRLIW, MASK_R, Opcode),
    insn("srliw",     64, I, "d,s,<",     MATCH_SRLIW, MASK_R, Opcode),
    insn("sraw",      64, I, "d,s,t",     MATCH_SRAW, MASK_R, Opcode),
    insn("sraw",      64, I, "d,s,<",     MATCH_SRAIW, MASK_R, Opcode),
    insn("sraiw",     64, I, "d,s,<",     MATCH_SRAIW, MASK_R, Opcode),
    insn("subw",      64, C, "Cs,Cw,Ct",  MATCH_C_SUBW, MASK_CA, Opcode),
    insn("subw",      64, I, "d,s,t",     MATCH_SUBW, MASK_R, Opcode),

    // atomic memory operations
    insn("lr.w",            0, A, "d,0(s)",   MATCH_LR_W, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.w",            0, A, "d,t,0(s)", MATCH_SC_W, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.w",        0, A, "d,t,0(s)", 0x0000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.w",       0, A, "d,t,0(s)", 0x0800_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.w",        0, A, "d,t,0(s)", 0x6000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.w",         0, A, "d,t,0(s)", 0x4000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.w",        0, A, "d,t,0(s)", 0x2000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.w",        0, A, "d,t,0(s)", 0xa000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.w",       0, A, "d,t,0(s)", 0xe000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.w",        0, A, "d,t,0(s)", 0x8000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.w",       0, A, "d,t,0(s)", 0xc000_202f, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.w.aq",         0, A, "d,0(s)",   MATCH_LR_W | MASK_AQ, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.w.aq",         0, A, "d,t,0(s)", MATCH_SC_W | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.w.aq",     0, A, "d,t,0(s)", 0x0000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.w.aq",    0, A, "d,t,0(s)", 0x0800_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.w.aq",     0, A, "d,t,0(s)", 0x6000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.w.aq",      0, A, "d,t,0(s)", 0x4000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.w.aq",     0, A, "d,t,0(s)", 0x2000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.w.aq",     0, A, "d,t,0(s)", 0xa000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.w.aq",    0, A, "d,t,0(s)", 0xe000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.w.aq",     0, A, "d,t,0(s)", 0x8000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.w.aq",    0, A, "d,t,0(s)", 0xc000_202f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.w.rl",         0, A, "d,0(s)",   MATCH_LR_W | MASK_RL, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.w.rl",         0, A, "d,t,0(s)", MATCH_SC_W | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.w.rl",     0, A, "d,t,0(s)", 0x0000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.w.rl",    0, A, "d,t,0(s)", 0x0800_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.w.rl",     0, A, "d,t,0(s)", 0x6000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.w.rl",      0, A, "d,t,0(s)", 0x4000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.w.rl",     0, A, "d,t,0(s)", 0x2000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.w.rl",     0, A, "d,t,0(s)", 0xa000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.w.rl",    0, A, "d,t,0(s)", 0xe000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.w.rl",     0, A, "d,t,0(s)", 0x8000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.w.rl",    0, A, "d,t,0(s)", 0xc000_202f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.w.aqrl",       0, A, "d,0(s)",   MATCH_LR_W | MASK_AQRL, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.w.aqrl",       0, A, "d,t,0(s)", MATCH_SC_W | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.w.aqrl",   0, A, "d,t,0(s)", 0x0000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.w.aqrl",  0, A, "d,t,0(s)", 0x0800_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.w.aqrl",   0, A, "d,t,0(s)", 0x6000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.w.aqrl",    0, A, "d,t,0(s)", 0x4000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.w.aqrl",   0, A, "d,t,0(s)", 0x2000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.w.aqrl",   0, A, "d,t,0(s)", 0xa000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.w.aqrl",  0, A, "d,t,0(s)", 0xe000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.w.aqrl",   0, A, "d,t,0(s)", 0x8000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.w.aqrl",  0, A, "d,t,0(s)", 0xc000_202f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.d",           64, A, "d,0(s)",   MATCH_LR_D, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.d",           64, A, "d,t,0(s)", MATCH_SC_D, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.d",       64, A, "d,t,0(s)", 0x0000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.d",      64, A, "d,t,0(s)", 0x0800_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.d",       64, A, "d,t,0(s)", 0x6000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.d",        64, A, "d,t,0(s)", 0x4000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.d",       64, A, "d,t,0(s)", 0x2000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.d",       64, A, "d,t,0(s)", 0xa000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.d",      64, A, "d,t,0(s)", 0xe000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.d",       64, A, "d,t,0(s)", 0x8000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.d",      64, A, "d,t,0(s)", 0xc000_302f, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.d.aq",        64, A, "d,0(s)",   MATCH_LR_D | MASK_AQ, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.d.aq",        64, A, "d,t,0(s)", MATCH_SC_D | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.d.aq",    64, A, "d,t,0(s)", 0x0000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.d.aq",   64, A, "d,t,0(s)", 0x0800_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.d.aq",    64, A, "d,t,0(s)", 0x6000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.d.aq",     64, A, "d,t,0(s)", 0x4000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.d.aq",    64, A, "d,t,0(s)", 0x2000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.d.aq",    64, A, "d,t,0(s)", 0xa000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.d.aq",   64, A, "d,t,0(s)", 0xe000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.d.aq",    64, A, "d,t,0(s)", 0x8000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.d.aq",   64, A, "d,t,0(s)", 0xc000_302f | MASK_AQ, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.d.rl",        64, A, "d,0(s)",   MATCH_LR_D | MASK_RL, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.d.rl",        64, A, "d,t,0(s)", MATCH_SC_D | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.d.rl",    64, A, "d,t,0(s)", 0x0000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.d.rl",   64, A, "d,t,0(s)", 0x0800_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.d.rl",    64, A, "d,t,0(s)", 0x6000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.d.rl",     64, A, "d,t,0(s)", 0x4000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.d.rl",    64, A, "d,t,0(s)", 0x2000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.d.rl",    64, A, "d,t,0(s)", 0xa000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.d.rl",   64, A, "d,t,0(s)", 0xe000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.d.rl",    64, A, "d,t,0(s)", 0x8000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.d.rl",   64, A, "d,t,0(s)", 0xc000_302f | MASK_RL, MASK_AMO | MASK_AQRL, Opcode),
    insn("lr.d.aqrl",      64, A, "d,0(s)",   MATCH_LR_D | MASK_AQRL, MASK_LR | MASK_AQRL, Opcode),
    insn("sc.d.aqrl",      64, A, "d,t,0(s)", MATCH_SC_D | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoadd.d.aqrl",  64, A, "d,t,0(s)", 0x0000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoswap.d.aqrl", 64, A, "d,t,0(s)", 0x0800_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoand.d.aqrl",  64, A, "d,t,0(s)", 0x6000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoor.d.aqrl",   64, A, "d,t,0(s)", 0x4000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amoxor.d.aqrl",  64, A, "d,t,0(s)", 0x2000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomax.d.aqrl",  64, A, "d,t,0(s)", 0xa000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomaxu.d.aqrl", 64, A, "d,t,0(s)", 0xe000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amomin.d.aqrl",  64, A, "d,t,0(s)", 0x8000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),
    insn("amominu.d.aqrl", 64, A, "d,t,0(s)", 0xc000_302f | MASK_AQRL, MASK_AMO | MASK_AQRL, Opcode),

    // multiply / divide
    insn("mul",        0, M, "d,s,t",     0x0200_0033, MASK_R, Opcode),
    insn("mulh",       0, M, "d,s,t",     0x0200_1033, MASK_R, Opcode),
    insn("mulhu",      0, M, "d,s,t",     0x0200_3033, MASK_R, Opcode),
    insn("mulhsu",     0, M, "d,s,t",     0x0200_2033, MASK_R, Opcode),
    insn("div",        0, M, "d,s,t",     0x0200_4033, MASK_R, Opcode),
    insn("divu",       0, M, "d,s,t",     0x0200_5033, MASK_R, Opcode),
    insn("rem",        0, M, "d,s,t",     0x0200_6033, MASK_R, Opcode),
    insn("remu",       0, M, "d,s,t",     0x0200_7033, MASK_R, Opcode),
    insn("mulw",      64, M, "d,s,t",     0x0200_003b, MASK_R, Opcode),
    insn("divw",      64, M, "d,s,t",     0x0200_403b, MASK_R, Opcode),
    insn("divuw",     64, M, "d,s,t",     0x0200_503b, MASK_R, Opcode),
    insn("remw",      64, M, "d,s,t",     0x0200_603b, MASK_R, Opcode),
    insn("remuw",     64, M, "d,s,t",     0x0200_703b, MASK_R, Opcode),

    // single-precision floating point
    insn("frcsr",      0, F, "d",         0x0030_2073, MASK_CSR_READ, Opcode),
    insn("fscsr",      0, F, "s",         0x0030_1073, MASK_FP1 | MASK_RD, Opcode),
    insn("fscsr",      0, F, "d,s",       0x0030_1073, MASK_FP1, Opcode),
    insn("frrm",       0, F, "d",         0x0020_2073, MASK_CSR_READ, Opcode),
    insn("fsrm",       0, F, "s",         0x0020_1073, MASK_FP1 | MASK_RD, Opcode),
    insn("fsrm",       0, F, "d,s",       0x0020_1073, MASK_FP1, Opcode),
    insn("fsrmi",      0, F, "d,Z",       0x0020_5073, MASK_FP1, Opcode),
    insn("fsrmi",      0, F, "Z",         0x0020_5073, MASK_FP1 | MASK_RD, Opcode),
    insn("frflags",    0, F, "d",         0x0010_2073, MASK_CSR_READ, Opcode),
    insn("fsflags",    0, F, "s",         0x0010_1073, MASK_FP1 | MASK_RD, Opcode),
    insn("fsflags",    0, F, "d,s",       0x0010_1073, MASK_FP1, Opcode),
    insn("fsflagsi",   0, F, "d,Z",       0x0010_5073, MASK_FP1, Opcode),
    insn("fsflagsi",   0, F, "Z",         0x0010_5073, MASK_FP1 | MASK_RD, Opcode),
    insn("flw",       32, FAndC, "D,Cm(Cc)",  MATCH_C_FLWSP, MASK_CQ, Opcode),
    insn("flw",       32, FAndC, "CD,Ck(Cs)", MATCH_C_FLW, MASK_CQ, Opcode),
    insn("flw",        0, F, "D,o(s)",    0x2007, MASK_I, Opcode),
    mac("flw",         0, F, "D,A,s",     0, MacroKind::FpLoad),
    insn("fsw",       32, FAndC, "CT,CM(Cc)", MATCH_C_FSWSP, MASK_CQ, Opcode),
    insn("fsw",       32, FAndC, "CD,Ck(Cs)", MATCH_C_FSW, MASK_CQ, Opcode),
    insn("fsw",        0, F, "T,q(s)",    0x2027, MASK_I, Opcode),
    mac("fsw",         0, F, "T,A,s",     0, MacroKind::Store),
    insn("fmv.x.w",    0, F, "d,S",       0xe000_0053, MASK_FP1, Opcode),
    insn("fmv.w.x",    0, F, "D,s",       0xf000_0053, MASK_FP1, Opcode),
    insn("fmv.x.s",    0, F, "d,S",       0xe000_0053, MASK_FP1, Opcode),
    insn("fmv.s.x",    0, F, "D,s",       0xf000_0053, MASK_FP1, Opcode),
    insn("fmv.s",      0, F, "D,U",       0x2000_0053, MASK_R, Opcode),
    insn("fneg.s",     0, F, "D,U",       0x2000_1053, MASK_R, Opcode),
    insn("fabs.s",     0, F, "D,U",       0x2000_2053, MASK_R, Opcode),
    insn("fsgnj.s",    0, F, "D,S,T",     0x2000_0053, MASK_R, Opcode),
    insn("fsgnjn.s",   0, F, "D,S,T",     0x2000_1053, MASK_R, Opcode),
    insn("fsgnjx.s",   0, F, "D,S,T",     0x2000_2053, MASK_R, Opcode),
    insn("fadd.s",     0, F, "D,S,T",     0x0000_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fadd.s",     0, F, "D,S,T,m",   0x0000_0053, MASK_FP_RM, Opcode),
    insn("fsub.s",     0, F, "D,S,T",     0x0800_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fsub.s",     0, F, "D,S,T,m",   0x0800_0053, MASK_FP_RM, Opcode),
    insn("fmul.s",     0, F, "D,S,T",     0x1000_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fmul.s",     0, F, "D,S,T,m",   0x1000_0053, MASK_FP_RM, Opcode),
    insn("fdiv.s",     0, F, "D,S,T",     0x1800_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fdiv.s",     0, F, "D,S,T,m",   0x1800_0053, MASK_FP_RM, Opcode),
    insn("fsqrt.s",    0, F, "D,S",       0x5800_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fsqrt.s",    0, F, "D,S,m",     0x5800_0053, MASK_FP1_RM, Opcode),
    insn("fmin.s",     0, F, "D,S,T",     0x2800_0053, MASK_R, Opcode),
    insn("fmax.s",     0, F, "D,S,T",     0x2800_1053, MASK_R, Opcode),
    insn("fmadd.s",    0, F, "D,S,T,R",   0x0000_0043 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmadd.s",    0, F, "D,S,T,R,m", 0x0000_0043, MASK_R4, Opcode),
    insn("fnmadd.s",   0, F, "D,S,T,R",   0x0000_004f | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmadd.s",   0, F, "D,S,T,R,m", 0x0000_004f, MASK_R4, Opcode),
    insn("fmsub.s",    0, F, "D,S,T,R",   0x0000_0047 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmsub.s",    0, F, "D,S,T,R,m", 0x0000_0047, MASK_R4, Opcode),
    insn("fnmsub.s",   0, F, "D,S,T,R",   0x0000_004b | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmsub.s",   0, F, "D,S,T,R,m", 0x0000_004b, MASK_R4, Opcode),
    insn("fcvt.w.s",   0, F, "d,S",       0xc000_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.w.s",   0, F, "d,S,m",     0xc000_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.wu.s",  0, F, "d,S",       0xc010_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.wu.s",  0, F, "d,S,m",     0xc010_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.s.w",   0, F, "D,s",       0xd000_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.w",   0, F, "D,s,m",     0xd000_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.s.wu",  0, F, "D,s",       0xd010_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.wu",  0, F, "D,s,m",     0xd010_0053, MASK_FP1_RM, Opcode),
    insn("fclass.s",   0, F, "d,S",       0xe000_1053, MASK_FP1, Opcode),
    insn("feq.s",      0, F, "d,S,T",     0xa000_2053, MASK_R, Opcode),
    insn("flt.s",      0, F, "d,S,T",     MATCH_FLT_S, MASK_R, Opcode),
    insn("fle.s",      0, F, "d,S,T",     MATCH_FLE_S, MASK_R, Opcode),
    insn("fgt.s",      0, F, "d,T,S",     MATCH_FLT_S, MASK_R, Opcode),
    insn("fge.s",      0, F, "d,T,S",     MATCH_FLE_S, MASK_R, Opcode),
    insn("fcvt.l.s",  64, F, "d,S",       0xc020_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.l.s",  64, F, "d,S,m",     0xc020_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.lu.s", 64, F, "d,S",       0xc030_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.lu.s", 64, F, "d,S,m",     0xc030_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.s.l",  64, F, "D,s",       0xd020_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.l",  64, F, "D,s,m",     0xd020_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.s.lu", 64, F, "D,s",       0xd030_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.lu", 64, F, "D,s,m",     0xd030_0053, MASK_FP1_RM, Opcode),

    // double-precision floating point
    insn("fld",        0, DAndC, "D,Cn(Cc)",  MATCH_C_FLDSP, MASK_CQ, Opcode),
    insn("fld",        0, DAndC, "CD,Cl(Cs)", MATCH_C_FLD, MASK_CQ, Opcode),
    insn("fld",        0, D, "D,o(s)",    0x3007, MASK_I, Opcode),
    mac("fld",         0, D, "D,A,s",     0, MacroKind::FpLoad),
    insn("fsd",        0, DAndC, "CT,CN(Cc)", MATCH_C_FSDSP, MASK_CQ, Opcode),
    insn("fsd",        0, DAndC, "CD,Cl(Cs)", MATCH_C_FSD, MASK_CQ, Opcode),
    insn("fsd",        0, D, "T,q(s)",    0x3027, MASK_I, Opcode),
    mac("fsd",         0, D, "T,A,s",     0, MacroKind::Store),
    insn("fmv.d",      0, D, "D,U",       0x2200_0053, MASK_R, Opcode),
    insn("fneg.d",     0, D, "D,U",       0x2200_1053, MASK_R, Opcode),
    insn("fabs.d",     0, D, "D,U",       0x2200_2053, MASK_R, Opcode),
    insn("fsgnj.d",    0, D, "D,S,T",     0x2200_0053, MASK_R, Opcode),
    insn("fsgnjn.d",   0, D, "D,S,T",     0x2200_1053, MASK_R, Opcode),
    insn("fsgnjx.d",   0, D, "D,S,T",     0x2200_2053, MASK_R, Opcode),
    insn("fadd.d",     0, D, "D,S,T",     0x0200_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fadd.d",     0, D, "D,S,T,m",   0x0200_0053, MASK_FP_RM, Opcode),
    insn("fsub.d",     0, D, "D,S,T",     0x0a00_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fsub.d",     0, D, "D,S,T,m",   0x0a00_0053, MASK_FP_RM, Opcode),
    insn("fmul.d",     0, D, "D,S,T",     0x1200_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fmul.d",     0, D, "D,S,T,m",   0x1200_0053, MASK_FP_RM, Opcode),
    insn("fdiv.d",     0, D, "D,S,T",     0x1a00_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fdiv.d",     0, D, "D,S,T,m",   0x1a00_0053, MASK_FP_RM, Opcode),
    insn("fsqrt.d",    0, D, "D,S",       0x5a00_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fsqrt.d",    0, D, "D,S,m",     0x5a00_0053, MASK_FP1_RM, Opcode),
    insn("fmin.d",     0, D, "D,S,T",     0x2a00_0053, MASK_R, Opcode),
    insn("fmax.d",     0, D, "D,S,T",     0x2a00_1053, MASK_R, Opcode),
    insn("fmadd.d",    0, D, "D,S,T,R",   0x0200_0043 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmadd.d",    0, D, "D,S,T,R,m", 0x0200_0043, MASK_R4, Opcode),
    insn("fnmadd.d",   0, D, "D,S,T,R",   0x0200_004f | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmadd.d",   0, D, "D,S,T,R,m", 0x0200_004f, MASK_R4, Opcode),
    insn("fmsub.d",    0, D, "D,S,T,R",   0x0200_0047 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmsub.d",    0, D, "D,S,T,R,m", 0x0200_0047, MASK_R4, Opcode),
    insn("fnmsub.d",   0, D, "D,S,T,R",   0x0200_004b | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmsub.d",   0, D, "D,S,T,R,m", 0x0200_004b, MASK_R4, Opcode),
    insn("fcvt.w.d",   0, D, "d,S",       0xc200_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.w.d",   0, D, "d,S,m",     0xc200_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.wu.d",  0, D, "d,S",       0xc210_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.wu.d",  0, D, "d,S,m",     0xc210_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.d.w",   0, D, "D,s",       0xd200_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.d.wu",  0, D, "D,s",       0xd210_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.d.s",   0, D, "D,S",       0x4200_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.d",   0, D, "D,S",       0x4010_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.d",   0, D, "D,S,m",     0x4010_0053, MASK_FP1_RM, Opcode),
    insn("fclass.d",   0, D, "d,S",       0xe200_1053, MASK_FP1, Opcode),
    insn("feq.d",      0, D, "d,S,T",     0xa200_2053, MASK_R, Opcode),
    insn("flt.d",      0, D, "d,S,T",     MATCH_FLT_D, MASK_R, Opcode),
    insn("fle.d",      0, D, "d,S,T",     MATCH_FLE_D, MASK_R, Opcode),
    insn("fgt.d",      0, D, "d,T,S",     MATCH_FLT_D, MASK_R, Opcode),
    insn("fge.d",      0, D, "d,T,S",     MATCH_FLE_D, MASK_R, Opcode),
    insn("fmv.x.d",   64, D, "d,S",       0xe200_0053, MASK_FP1, Opcode),
    insn("fmv.d.x",   64, D, "D,s",       0xf200_0053, MASK_FP1, Opcode),
    insn("fcvt.l.d",  64, D, "d,S",       0xc220_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.l.d",  64, D, "d,S,m",     0xc220_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.lu.d", 64, D, "d,S",       0xc230_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.lu.d", 64, D, "d,S,m",     0xc230_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.d.l",  64, D, "D,s",       0xd220_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.d.l",  64, D, "D,s,m",     0xd220_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.d.lu", 64, D, "D,s",       0xd230_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.d.lu", 64, D, "D,s,m",     0xd230_0053, MASK_FP1_RM, Opcode),

    // quad-precision floating point
    insn("flq",        0, Q, "D,o(s)",    0x4007, MASK_I, Opcode),
    mac("flq",         0, Q, "D,A,s",     0, MacroKind::FpLoad),
    insn("fsq",        0, Q, "T,q(s)",    0x4027, MASK_I, Opcode),
    mac("fsq",         0, Q, "T,A,s",     0, MacroKind::Store),
    insn("fmv.q",      0, Q, "D,U",       0x2600_0053, MASK_R, Opcode),
    insn("fneg.q",     0, Q, "D,U",       0x2600_1053, MASK_R, Opcode),
    insn("fabs.q",     0, Q, "D,U",       0x2600_2053, MASK_R, Opcode),
    insn("fsgnj.q",    0, Q, "D,S,T",     0x2600_0053, MASK_R, Opcode),
    insn("fsgnjn.q",   0, Q, "D,S,T",     0x2600_1053, MASK_R, Opcode),
    insn("fsgnjx.q",   0, Q, "D,S,T",     0x2600_2053, MASK_R, Opcode),
    insn("fadd.q",     0, Q, "D,S,T",     0x0600_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fadd.q",     0, Q, "D,S,T,m",   0x0600_0053, MASK_FP_RM, Opcode),
    insn("fsub.q",     0, Q, "D,S,T",     0x0e00_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fsub.q",     0, Q, "D,S,T,m",   0x0e00_0053, MASK_FP_RM, Opcode),
    insn("fmul.q",     0, Q, "D,S,T",     0x1600_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fmul.q",     0, Q, "D,S,T,m",   0x1600_0053, MASK_FP_RM, Opcode),
    insn("fdiv.q",     0, Q, "D,S,T",     0x1e00_0053 | RM_DYN, MASK_FP_RM | MASK_RM, Opcode),
    insn("fdiv.q",     0, Q, "D,S,T,m",   0x1e00_0053, MASK_FP_RM, Opcode),
    insn("fsqrt.q",    0, Q, "D,S",       0x5e00_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fsqrt.q",    0, Q, "D,S,m",     0x5e00_0053, MASK_FP1_RM, Opcode),
    insn("fmin.q",     0, Q, "D,S,T",     0x2e00_0053, MASK_R, Opcode),
    insn("fmax.q",     0, Q, "D,S,T",     0x2e00_1053, MASK_R, Opcode),
    insn("fmadd.q",    0, Q, "D,S,T,R",   0x0600_0043 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmadd.q",    0, Q, "D,S,T,R,m", 0x0600_0043, MASK_R4, Opcode),
    insn("fnmadd.q",   0, Q, "D,S,T,R",   0x0600_004f | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmadd.q",   0, Q, "D,S,T,R,m", 0x0600_004f, MASK_R4, Opcode),
    insn("fmsub.q",    0, Q, "D,S,T,R",   0x0600_0047 | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fmsub.q",    0, Q, "D,S,T,R,m", 0x0600_0047, MASK_R4, Opcode),
    insn("fnmsub.q",   0, Q, "D,S,T,R",   0x0600_004b | RM_DYN, MASK_R4 | MASK_RM, Opcode),
    insn("fnmsub.q",   0, Q, "D,S,T,R,m", 0x0600_004b, MASK_R4, Opcode),
    insn("fcvt.w.q",   0, Q, "d,S",       0xc600_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.w.q",   0, Q, "d,S,m",     0xc600_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.wu.q",  0, Q, "d,S",       0xc610_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.wu.q",  0, Q, "d,S,m",     0xc610_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.q.w",   0, Q, "D,s",       0xd600_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.q.wu",  0, Q, "D,s",       0xd610_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.q.s",   0, Q, "D,S",       0x4600_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.q.d",   0, Q, "D,S",       0x4610_0053, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.q",   0, Q, "D,S",       0x4030_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.s.q",   0, Q, "D,S,m",     0x4030_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.d.q",   0, Q, "D,S",       0x4230_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.d.q",   0, Q, "D,S,m",     0x4230_0053, MASK_FP1_RM, Opcode),
    insn("fclass.q",   0, Q, "d,S",       0xe600_1053, MASK_FP1, Opcode),
    insn("feq.q",      0, Q, "d,S,T",     0xa600_2053, MASK_R, Opcode),
    insn("flt.q",      0, Q, "d,S,T",     MATCH_FLT_Q, MASK_R, Opcode),
    insn("fle.q",      0, Q, "d,S,T",     MATCH_FLE_Q, MASK_R, Opcode),
    insn("fgt.q",      0, Q, "d,T,S",     MATCH_FLT_Q, MASK_R, Opcode),
    insn("fge.q",      0, Q, "d,T,S",     MATCH_FLE_Q, MASK_R, Opcode),
    insn("fcvt.l.q",  64, Q, "d,S",       0xc620_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.l.q",  64, Q, "d,S,m",     0xc620_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.lu.q", 64, Q, "d,S",       0xc630_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.lu.q", 64, Q, "d,S,m",     0xc630_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.q.l",  64, Q, "D,s",       0xd620_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.q.l",  64, Q, "D,s,m",     0xd620_0053, MASK_FP1_RM, Opcode),
    insn("fcvt.q.lu", 64, Q, "D,s",       0xd630_0053 | RM_DYN, MASK_FP1_RM | MASK_RM, Opcode),
    insn("fcvt.q.lu", 64, Q, "D,s,m",     0xd630_0053, MASK_FP1_RM, Opcode),

    // explicit compressed mnemonics
    insn("c.unimp",    0, C, "",          0, MASK_C_FULL, Opcode),
    insn("c.ebreak",   0, C, "",          MATCH_C_EBREAK, MASK_C_FULL, Opcode),
    insn("c.jr",       0, C, "d",         MATCH_C_JR, MASK_CJR, RdNonZero),
    insn("c.jalr",     0, C, "d",         MATCH_C_JALR, MASK_CJR, RdNonZero),
    insn("c.j",        0, C, "Ca",        MATCH_C_J, MASK_CQ, Opcode),
    insn("c.jal",     32, C, "Ca",        MATCH_C_JAL, MASK_CQ, Opcode),
    insn("c.beqz",     0, C, "Cs,Cp",     MATCH_C_BEQZ, MASK_CQ, Opcode),
    insn("c.bnez",     0, C, "Cs,Cp",     MATCH_C_BNEZ, MASK_CQ, Opcode),
    insn("c.lwsp",     0, C, "d,Cm(Cc)",  MATCH_C_LWSP, MASK_CQ, RdNonZero),
    insn("c.lw",       0, C, "Ct,Ck(Cs)", MATCH_C_LW, MASK_CQ, Opcode),
    insn("c.swsp",     0, C, "CV,CM(Cc)", MATCH_C_SWSP, MASK_CQ, Opcode),
    insn("c.sw",       0, C, "Ct,Ck(Cs)", MATCH_C_SW, MASK_CQ, Opcode),
    insn("c.nop",      0, C, "",          MATCH_C_ADDI, MASK_C_FULL, Opcode),
    insn("c.mv",       0, C, "d,CV",      MATCH_C_MV, MASK_CR, CAdd),
    insn("c.lui",      0, C, "d,Cu",      MATCH_C_LUI, MASK_CQ, CLui),
    insn("c.li",       0, C, "d,Co",      MATCH_C_LI, MASK_CQ, RdNonZero),
    insn("c.addi4spn", 0, C, "Ct,Cc,CK",  MATCH_C_ADDI4SPN, MASK_CQ, CAddi4spn),
    insn("c.addi16sp", 0, C, "Cc,CL",     MATCH_C_ADDI16SP, MASK_C_ADDI16SP, CAddi16sp),
    insn("c.addi",     0, C, "d,Cj",      MATCH_C_ADDI, MASK_CQ, RdNonZero),
    insn("c.add",      0, C, "d,CV",      MATCH_C_ADD, MASK_CR, CAdd),
    insn("c.sub",      0, C, "Cs,Ct",     MATCH_C_SUB, MASK_CA, Opcode),
    insn("c.and",      0, C, "Cs,Ct",     MATCH_C_AND, MASK_CA, Opcode),
    insn("c.or",       0, C, "Cs,Ct",     MATCH_C_OR, MASK_CA, Opcode),
    insn("c.xor",      0, C, "Cs,Ct",     MATCH_C_XOR, MASK_CA, Opcode),
    insn("c.slli",     0, C, "d,C>",      MATCH_C_SLLI, MASK_CQ, RdNonZero),
    insn("c.srli",     0, C, "Cs,C>",     MATCH_C_SRLI, MASK_CB, Opcode),
    insn("c.srai",     0, C, "Cs,C>",     MATCH_C_SRAI, MASK_CB, Opcode),
    insn("c.andi",     0, C, "Cs,Co",     MATCH_C_ANDI, MASK_CB, Opcode),
    insn("c.addiw",   64, C, "d,Co",      MATCH_C_ADDIW, MASK_CQ, RdNonZero),
    insn("c.addw",    64, C, "Cs,Ct",     MATCH_C_ADDW, MASK_CA, Opcode),
    insn("c.subw",    64, C, "Cs,Ct",     MATCH_C_SUBW, MASK_CA, Opcode),
    insn("c.ldsp",    64, C, "d,Cn(Cc)",  MATCH_C_LDSP, MASK_CQ, RdNonZero),
    insn("c.ld",      64, C, "Ct,Cl(Cs)", MATCH_C_LD, MASK_CQ, Opcode),
    insn("c.sdsp",    64, C, "CV,CN(Cc)", MATCH_C_SDSP, MASK_CQ, Opcode),
    insn("c.sd",      64, C, "Ct,Cl(Cs)", MATCH_C_SD, MASK_CQ, Opcode),
    insn("c.fldsp",    0, DAndC, "D,Cn(Cc)",  MATCH_C_FLDSP, MASK_CQ, Opcode),
    insn("c.fld",      0, DAndC, "CD,Cl(Cs)", MATCH_C_FLD, MASK_CQ, Opcode),
    insn("c.fsdsp",    0, DAndC, "CT,CN(Cc)", MATCH_C_FSDSP, MASK_CQ, Opcode),
    insn("c.fsd",      0, DAndC, "CD,Cl(Cs)", MATCH_C_FSD, MASK_CQ, Opcode),
    insn("c.flwsp",   32, FAndC, "D,Cm(Cc)",  MATCH_C_FLWSP, MASK_CQ, Opcode),
    insn("c.flw",     32, FAndC, "CD,Ck(Cs)", MATCH_C_FLW, MASK_CQ, Opcode),
    insn("c.fswsp",   32, FAndC, "CT,CM(Cc)", MATCH_C_FSWSP, MASK_CQ, Opcode),
    insn("c.fsw",     32, FAndC, "CD,Ck(Cs)", MATCH_C_FSW, MASK_CQ, Opcode),

    // control and status registers
    insn("csrr",       0, I, "d,E",       MATCH_CSRRS, MASK_I | MASK_RS1, Opcode),
    insn("csrw",       0, I, "E,s",       MATCH_CSRRW, MASK_I | MASK_RD, Opcode),
    insn("csrw",       0, I, "E,Z",       MATCH_CSRRWI, MASK_I | MASK_RD, Opcode),
    insn("csrwi",      0, I, "E,Z",       MATCH_CSRRWI, MASK_I | MASK_RD, Opcode),
    insn("csrs",       0, I, "E,s",       MATCH_CSRRS, MASK_I | MASK_RD, Opcode),
    insn("csrs",       0, I, "E,Z",       MATCH_CSRRSI, MASK_I | MASK_RD, Opcode),
    insn("csrsi",      0, I, "E,Z",       MATCH_CSRRSI, MASK_I | MASK_RD, Opcode),
    insn("csrc",       0, I, "E,s",       MATCH_CSRRC, MASK_I | MASK_RD, Opcode),
    insn("csrc",       0, I, "E,Z",       MATCH_CSRRCI, MASK_I | MASK_RD, Opcode),
    insn("csrci",      0, I, "E,Z",       MATCH_CSRRCI, MASK_I | MASK_RD, Opcode),
    insn("csrrw",      0, I, "d,E,s",     MATCH_CSRRW, MASK_I, Opcode),
    insn("csrrw",      0, I, "d,E,Z",     MATCH_CSRRWI, MASK_I, Opcode),
    insn("csrrwi",     0, I, "d,E,Z",     MATCH_CSRRWI, MASK_I, Opcode),
    insn("csrrs",      0, I, "d,E,s",     MATCH_CSRRS, MASK_I, Opcode),
    insn("csrrs",      0, I, "d,E,Z",     MATCH_CSRRSI, MASK_I, Opcode),
    insn("csrrsi",     0, I, "d,E,Z",     MATCH_CSRRSI, MASK_I, Opcode),
    insn("csrrc",      0, I, "d,E,s",     MATCH_CSRRC, MASK_I, Opcode),
    insn("csrrc",      0, I, "d,E,Z",     MATCH_CSRRCI, MASK_I, Opcode),
    insn("csrrci",     0, I, "d,E,Z",     MATCH_CSRRCI, MASK_I, Opcode),

    // privileged
    insn("uret",       0, I, "",          0x0020_0073, MASK_FULL, Opcode),
    insn("sret",       0, I, "",          0x1020_0073, MASK_FULL, Opcode),
    insn("hret",       0, I, "",          0x2020_0073, MASK_FULL, Opcode),
    insn("mret",       0, I, "",          0x3020_0073, MASK_FULL, Opcode),
    insn("dret",       0, I, "",          0x7b20_0073, MASK_FULL, Opcode),
    insn("sfence.vm",  0, I, "",          0x1040_0073, MASK_FULL, Opcode),
    insn("sfence.vm",  0, I, "s",         0x1040_0073, 0xfff0_7fff, Opcode),
    insn("sfence.vma", 0, I, "",          MATCH_SFENCE_VMA, 0xfe00_7fff | MASK_RS1 | MASK_RS2, Opcode),
    insn("sfence.vma", 0, I, "s",         MATCH_SFENCE_VMA, 0xfe00_7fff | MASK_RS2, Opcode),
    insn("sfence.vma", 0, I, "s,t",       MATCH_SFENCE_VMA, 0xfe00_7fff, Opcode),
    insn("wfi",        0, I, "",          0x1050_0073, MASK_FULL, Opcode),
];

// ── .insn type table ────────────────────────────────────────────────────

#[rustfmt::skip]
static INSN_TYPES: &[Entry] = &[
    insn("r",   0, I, "O4,F3,F7,d,s,t",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,D,s,t",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,d,S,t",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,D,S,t",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,d,s,T",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,D,s,T",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,d,S,T",   0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F7,D,S,T",   0, 0, Opcode),
    insn("r",   0, I, "O4,F3,F2,d,s,t,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,s,t,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,S,t,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,S,t,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,s,T,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,s,T,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,S,T,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,S,T,r", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,s,t,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,s,t,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,S,t,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,S,t,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,s,T,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,s,T,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,d,S,T,R", 0, 0, Opcode),
    insn("r",   0, F, "O4,F3,F2,D,S,T,R", 0, 0, Opcode),
    insn("r4",  0, I, "O4,F3,F2,d,s,t,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,s,t,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,S,t,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,S,t,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,s,T,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,s,T,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,S,T,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,S,T,r", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,s,t,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,s,t,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,S,t,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,S,t,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,s,T,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,s,T,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,d,S,T,R", 0, 0, Opcode),
    insn("r4",  0, F, "O4,F3,F2,D,S,T,R", 0, 0, Opcode),
    insn("i",   0, I, "O4,F3,d,s,j",      0, 0, Opcode),
    insn("i",   0, F, "O4,F3,D,s,j",      0, 0, Opcode),
    insn("i",   0, F, "O4,F3,d,S,j",      0, 0, Opcode),
    insn("i",   0, F, "O4,F3,D,S,j",      0, 0, Opcode),
    insn("i",   0, I, "O4,F3,d,o(s)",     0, 0, Opcode),
    insn("i",   0, F, "O4,F3,D,o(s)",     0, 0, Opcode),
    insn("s",   0, I, "O4,F3,t,q(s)",     0, 0, Opcode),
    insn("s",   0, F, "O4,F3,T,q(s)",     0, 0, Opcode),
    insn("sb",  0, I, "O4,F3,s,t,p",      0, 0, Opcode),
    insn("sb",  0, F, "O4,F3,S,t,p",      0, 0, Opcode),
    insn("sb",  0, F, "O4,F3,s,T,p",      0, 0, Opcode),
    insn("sb",  0, F, "O4,F3,S,T,p",      0, 0, Opcode),
    insn("b",   0, I, "O4,F3,s,t,p",      0, 0, Opcode),
    insn("b",   0, F, "O4,F3,S,t,p",      0, 0, Opcode),
    insn("b",   0, F, "O4,F3,s,T,p",      0, 0, Opcode),
    insn("b",   0, F, "O4,F3,S,T,p",      0, 0, Opcode),
    insn("u",   0, I, "O4,d,u",           0, 0, Opcode),
    insn("u",   0, F, "O4,D,u",           0, 0, Opcode),
    insn("uj",  0, I, "O4,d,a",           0, 0, Opcode),
    insn("uj",  0, F, "O4,D,a",           0, 0, Opcode),
    insn("j",   0, I, "O4,d,a",           0, 0, Opcode),
    insn("j",   0, F, "O4,D,a",           0, 0, Opcode),
    insn("cr",  0, C, "O2,CF4,d,CV",      0, 0, Opcode),
    insn("cr",  0, FAndC, "O2,CF4,D,CV",  0, 0, Opcode),
    insn("cr",  0, FAndC, "O2,CF4,d,CT",  0, 0, Opcode),
    insn("cr",  0, FAndC, "O2,CF4,D,CT",  0, 0, Opcode),
    insn("ci",  0, C, "O2,CF3,d,Co",      0, 0, Opcode),
    insn("ci",  0, FAndC, "O2,CF3,D,Co",  0, 0, Opcode),
    insn("ciw", 0, C, "O2,CF3,Ct,C8",     0, 0, Opcode),
    insn("ciw", 0, FAndC, "O2,CF3,CD,C8", 0, 0, Opcode),
    insn("cb",  0, C, "O2,CF3,Cs,Cp",     0, 0, Opcode),
    insn("cb",  0, FAndC, "O2,CF3,CS,Cp", 0, 0, Opcode),
    insn("cj",  0, C, "O2,CF3,Ca",        0, 0, Opcode),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> &'static Tables {
        Tables::get().expect("tables validate")
    }

    #[test]
    fn every_template_validates() {
        let t = tables();
        assert!(t.templates().len() > 400);
        for tpl in t.templates() {
            validate_template(tpl, None).unwrap();
        }
    }

    #[test]
    fn lookup_is_ordered() {
        let add = tables().lookup("add");
        assert_eq!(add.len(), 9);
        assert!(add[0].is_compressed());
        assert_eq!(add[6].args, "d,s,t");
        assert_eq!(add[6].match_bits, 0x33);
        assert!(tables().lookup("frobnicate").is_empty());
    }

    #[test]
    fn macro_templates_are_flagged() {
        let li = tables().lookup("li");
        let last = li.last().unwrap();
        assert!(last.is_macro());
        assert_eq!(last.kind, TemplateKind::Macro(MacroKind::Li));
    }

    #[test]
    fn insn_types_have_fixed_lengths() {
        let t = tables();
        assert_eq!(t.lookup_insn_type("cr")[0].length, 2);
        assert_eq!(t.lookup_insn_type("r")[0].length, 4);
        assert_eq!(t.lookup_insn_type("r4").len(), 16);
    }

    #[test]
    fn insn_length_from_low_bits() {
        assert_eq!(insn_length(0x0001), 2);
        assert_eq!(insn_length(0x0033), 4);
        assert_eq!(insn_length(0x001f), 6);
        assert_eq!(insn_length(0x003f), 8);
    }

    fn synthetic(args: &'static str, match_bits: u64, mask_bits: u64) -> Template {
        Template::from_entry(&insn("test", 0, I, args, match_bits, mask_bits, Opcode), None)
            .unwrap()
    }

    #[test]
    fn rejects_uncovered_bits() {
        // addi without its immediate field
        let err = validate_template(&synthetic("d,s", 0x13, MASK_I), None).unwrap_err();
        assert_eq!(
            err,
            InternalError::UncoveredBits {
                mnemonic: "test".into(),
                args: "d,s".into(),
                missing: 0xfff0_0000,
            }
        );
    }

    #[test]
    fn rejects_match_outside_mask() {
        let err = validate_template(&synthetic("d,s,j", 0x13 | (1 << 7), MASK_I), None).unwrap_err();
        assert!(matches!(err, InternalError::MaskMismatch { .. }));
    }

    #[test]
    fn rejects_operand_under_mask() {
        let err = validate_template(&synthetic("d,s,j", 0x13, MASK_I | MASK_RD), None).unwrap_err();
        assert_eq!(
            err,
            InternalError::FixedOperand {
                mnemonic: "test".into(),
                args: "d,s,j".into(),
                overlap: MASK_RD,
            }
        );
        // only the shared bits are reported
        let err = validate_template(&synthetic("d,s,j", 0x13, MASK_I | (1 << 20)), None).unwrap_err();
        assert!(matches!(err, InternalError::FixedOperand { overlap, .. } if overlap == 1 << 20));
    }

    #[test]
    fn fixed_register_operands_take_no_bits() {
        // c.addi16sp pins rd to sp through the mask
        let tpl = &tables().lookup("c.addi16sp")[0];
        assert_eq!(tpl.args, "Cc,CL");
        validate_template(tpl, None).unwrap();
        validate_template(&synthetic("Cc,Cz", 0x13, MASK_FULL), None).unwrap();
    }

    #[test]
    fn coverage_beyond_length_is_rejected() {
        // a 2-byte template must not claim upper bits
        let err = validate_template(&synthetic("", 0x0001, 0xffff_ffff), None).unwrap_err();
        assert_eq!(
            err,
            InternalError::UncoveredBits {
                mnemonic: "test".into(),
                args: "".into(),
                missing: 0xffff_0000,
            }
        );
    }

    #[test]
    fn class_gating() {
        let (_, subsets) = SubsetList::parse_default("rv64imac").unwrap();
        assert!(InsnClass::C.is_supported(&subsets, true));
        assert!(!InsnClass::C.is_supported(&subsets, false));
        assert!(!InsnClass::F.is_supported(&subsets, true));
        assert!(!InsnClass::DAndC.is_supported(&subsets, true));
    }

    #[test]
    fn guards_check_fields() {
        let add = &tables().lookup("add")[0];
        // c.add a0, a1
        let word = MATCH_C_ADD | (10 << 7) | (11 << 2);
        assert!(add.guard.check(add, word));
        assert!(!add.guard.check(add, MATCH_C_ADD | (11 << 2)));
    }
}
