//! Operand kinds of the template format strings and their bit layouts.
//!
//! A template's operand list is written as a compact format string such as
//! `"d,s,j"` or `"Ct,Ck(Cs)"`. [`OperandKind::parse_format`] turns it into a
//! list of [`OperandKind`]s; each kind knows which bits of the instruction
//! word it owns, so the template table can be checked for full coverage.
//!
//! ```text
//! I-imm:  [ imm[11:0] | rs1 | funct3 | rd | opcode ]
//! S-imm:  [ imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode ]
//! B-imm:  [ imm[12|10:5] | rs2 | rs1 | funct3 | imm[4:1|11] | opcode ]
//! U-imm:  [ imm[31:12] | rd | opcode ]
//! J-imm:  [ imm[20|10:1|11|19:12] | rd | opcode ]
//! ```

use crate::error::InternalError;

// ── Register and function fields ────────────────────────────────────────

/// A contiguous bit field of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Position of the least significant bit.
    pub shift: u32,
    /// Width in bits.
    pub width: u32,
}

impl Field {
    const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Bits covered by the field, in place.
    pub const fn mask(self) -> u64 {
        ((1u64 << self.width) - 1) << self.shift
    }

    /// Replace the field's bits in `word` with `value`.
    pub const fn insert(self, word: u64, value: u64) -> u64 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }

    /// Read the field out of `word`.
    pub const fn extract(self, word: u64) -> u64 {
        (word & self.mask()) >> self.shift
    }
}

pub const OP: Field = Field::new(0, 7);
pub const OP2: Field = Field::new(0, 2);
pub const RD: Field = Field::new(7, 5);
pub const RS1: Field = Field::new(15, 5);
pub const RS2: Field = Field::new(20, 5);
pub const RS3: Field = Field::new(27, 5);
pub const RM: Field = Field::new(12, 3);
pub const PRED: Field = Field::new(24, 4);
pub const SUCC: Field = Field::new(20, 4);
pub const CSR: Field = Field::new(20, 12);
pub const SHAMT: Field = Field::new(20, 6);
pub const SHAMTW: Field = Field::new(20, 5);
pub const FUNCT7: Field = Field::new(25, 7);
pub const FUNCT3: Field = Field::new(12, 3);
pub const FUNCT2: Field = Field::new(25, 2);
pub const CRS1S: Field = Field::new(7, 3);
pub const CRS2S: Field = Field::new(2, 3);
pub const CRS2: Field = Field::new(2, 5);
pub const CFUNCT6: Field = Field::new(10, 6);
pub const CFUNCT4: Field = Field::new(12, 4);
pub const CFUNCT3: Field = Field::new(13, 3);
pub const CFUNCT2: Field = Field::new(5, 2);

// ── Scattered immediates ────────────────────────────────────────────────

/// One run of immediate bits: `width` bits starting at immediate bit
/// `imm_lsb` land at word bit `word_lsb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub imm_lsb: u32,
    pub width: u32,
    pub word_lsb: u32,
}

const fn seg(imm_lsb: u32, width: u32, word_lsb: u32) -> Segment {
    Segment {
        imm_lsb,
        width,
        word_lsb,
    }
}

/// How an immediate value is scattered over the instruction word.
///
/// A value fits the layout exactly when extracting what was encoded gives
/// the value back, so alignment and range checks fall out of the segment
/// list without per-layout code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmLayout {
    pub segments: &'static [Segment],
    pub signed: bool,
}

impl ImmLayout {
    /// Bits of the instruction word the immediate occupies.
    pub fn word_mask(&self) -> u64 {
        self.segments
            .iter()
            .fold(0, |acc, s| acc | (((1u64 << s.width) - 1) << s.word_lsb))
    }

    /// Number of immediate bits up to and including the most significant one.
    pub fn top_bit(&self) -> u32 {
        self.segments
            .iter()
            .map(|s| s.imm_lsb + s.width)
            .max()
            .unwrap_or(0)
    }

    /// Scatter `value` into word bits. Bits the layout does not carry are dropped.
    pub fn encode(&self, value: i64) -> u64 {
        let v = value as u64;
        self.segments.iter().fold(0, |acc, s| {
            let bits = (v >> s.imm_lsb) & ((1u64 << s.width) - 1);
            acc | (bits << s.word_lsb)
        })
    }

    /// Gather the immediate back out of `word`, sign-extending signed layouts.
    pub fn extract(&self, word: u64) -> i64 {
        let raw = self.segments.iter().fold(0u64, |acc, s| {
            let bits = (word >> s.word_lsb) & ((1u64 << s.width) - 1);
            acc | (bits << s.imm_lsb)
        });
        let top = self.top_bit();
        if self.signed && top > 0 && top < 64 {
            let shift = 64 - top;
            ((raw << shift) as i64) >> shift
        } else {
            raw as i64
        }
    }

    /// Whether `value` is representable without loss.
    pub fn fits(&self, value: i64) -> bool {
        self.extract(self.encode(value)) == value
    }
}

pub const I_IMM: ImmLayout = ImmLayout {
    segments: &[seg(0, 12, 20)],
    signed: true,
};
pub const S_IMM: ImmLayout = ImmLayout {
    segments: &[seg(0, 5, 7), seg(5, 7, 25)],
    signed: true,
};
pub const B_IMM: ImmLayout = ImmLayout {
    segments: &[seg(1, 4, 8), seg(5, 6, 25), seg(11, 1, 7), seg(12, 1, 31)],
    signed: true,
};
pub const U_IMM: ImmLayout = ImmLayout {
    segments: &[seg(12, 20, 12)],
    signed: true,
};
pub const J_IMM: ImmLayout = ImmLayout {
    segments: &[seg(1, 10, 21), seg(11, 1, 20), seg(12, 8, 12), seg(20, 1, 31)],
    signed: true,
};
pub const CI_IMM: ImmLayout = ImmLayout {
    segments: &[seg(0, 5, 2), seg(5, 1, 12)],
    signed: true,
};
pub const C_SIMM3: ImmLayout = ImmLayout {
    segments: &[seg(0, 3, 10)],
    signed: true,
};
pub const C_UIMM8: ImmLayout = ImmLayout {
    segments: &[seg(0, 8, 5)],
    signed: false,
};
pub const C_ADDI4SPN: ImmLayout = ImmLayout {
    segments: &[seg(2, 1, 6), seg(3, 1, 5), seg(4, 2, 11), seg(6, 4, 7)],
    signed: false,
};
pub const C_ADDI16SP: ImmLayout = ImmLayout {
    segments: &[
        seg(4, 1, 6),
        seg(5, 1, 2),
        seg(6, 1, 5),
        seg(7, 2, 3),
        seg(9, 1, 12),
    ],
    signed: true,
};
pub const C_LW: ImmLayout = ImmLayout {
    segments: &[seg(2, 1, 6), seg(3, 3, 10), seg(6, 1, 5)],
    signed: false,
};
pub const C_LD: ImmLayout = ImmLayout {
    segments: &[seg(3, 3, 10), seg(6, 2, 5)],
    signed: false,
};
pub const C_LWSP: ImmLayout = ImmLayout {
    segments: &[seg(2, 3, 4), seg(5, 1, 12), seg(6, 2, 2)],
    signed: false,
};
pub const C_LDSP: ImmLayout = ImmLayout {
    segments: &[seg(3, 2, 5), seg(5, 1, 12), seg(6, 3, 2)],
    signed: false,
};
pub const C_SWSP: ImmLayout = ImmLayout {
    segments: &[seg(2, 4, 9), seg(6, 2, 7)],
    signed: false,
};
pub const C_SDSP: ImmLayout = ImmLayout {
    segments: &[seg(3, 3, 10), seg(6, 3, 7)],
    signed: false,
};
pub const C_B_IMM: ImmLayout = ImmLayout {
    segments: &[
        seg(1, 2, 3),
        seg(3, 2, 10),
        seg(5, 1, 2),
        seg(6, 2, 5),
        seg(8, 1, 12),
    ],
    signed: true,
};
pub const C_J_IMM: ImmLayout = ImmLayout {
    segments: &[
        seg(1, 3, 3),
        seg(4, 1, 11),
        seg(5, 1, 2),
        seg(6, 1, 7),
        seg(7, 1, 6),
        seg(8, 2, 9),
        seg(10, 1, 8),
        seg(11, 1, 12),
    ],
    signed: true,
};

// ── Operand kinds ───────────────────────────────────────────────────────

/// One element of a template's operand format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Literal `,`, `(` or `)`.
    Punct(char),

    // integer registers
    /// `d`: destination GPR.
    Rd,
    /// `s`: first source GPR.
    Rs1,
    /// `t`: second source GPR.
    Rs2,
    /// `r`: third source GPR (`.insn r4`).
    Rs3,

    // floating-point registers
    /// `D`: destination FPR.
    FRd,
    /// `S`: first source FPR.
    FRs1,
    /// `T`: second source FPR.
    FRs2,
    /// `R`: third source FPR.
    FRs3,
    /// `U`: one FPR written to both source fields.
    FRs1Rs2,

    // small unsigned fields
    /// `<`: 5-bit shift amount.
    ShamtW,
    /// `>`: shift amount up to `xlen - 1`.
    Shamt,
    /// `Z`: 5-bit CSR immediate in the rs1 field.
    CsrImm,
    /// `E`: CSR number or name.
    Csr,
    /// `m`: rounding mode keyword.
    RoundingMode,
    /// `P`: fence predecessor set.
    Pred,
    /// `Q`: fence successor set.
    Succ,

    // immediates and targets
    /// `j`: I-type immediate.
    ImmI,
    /// `o`: I-type load offset.
    LoadOffset,
    /// `q`: S-type store offset.
    StoreOffset,
    /// `1`: `%tprel_add` marker operand.
    TprelAdd,
    /// `0`: AMO offset, must be zero.
    ZeroOffset,
    /// `u`: U-type upper immediate.
    Upper,
    /// `p`: conditional branch target.
    Branch,
    /// `a`: jump target.
    Jump,
    /// `c`: call target, optionally suffixed `@plt`.
    Call,
    /// `I`: macro constant.
    Const,
    /// `A`: macro symbol.
    Symbol,
    /// `B`: macro symbol or constant.
    SymbolOrConst,
    /// `z`: literal zero, no encoding.
    Zero,

    // .insn fields
    /// `O4`: 7-bit major opcode.
    Opcode7,
    /// `O2`: 2-bit compressed quadrant.
    Opcode2,
    /// `F7`: funct7.
    Funct7,
    /// `F3`: funct3.
    Funct3,
    /// `F2`: funct2.
    Funct2,

    // compressed registers
    /// `Cs`: GPR x8-x15 in the rs1' field.
    CRs1S,
    /// `Cw`: GPR equal to the rs1' field already set.
    CRs1SEq,
    /// `Ct`: GPR x8-x15 in the rs2' field.
    CRs2S,
    /// `Cx`: GPR equal to the rs2' field already set.
    CRs2SEq,
    /// `CU`: GPR equal to rd.
    CRdEq,
    /// `CV`: any GPR in the 5-bit rs2 field.
    CRs2,
    /// `Cc`: must be `sp`.
    CSp,
    /// `Cz`: must be `x0`.
    CZero,
    /// `CS`: FPR f8-f15 in the rs1' field.
    CFRs1S,
    /// `CD`: FPR f8-f15 in the rs2' field.
    CFRs2S,
    /// `CT`: any FPR in the 5-bit rs2 field.
    CFRs2,

    // compressed immediates
    /// `C>`: shift amount 1..63.
    CShamt,
    /// `C<`: shift amount 1..31.
    CShamtW,
    /// `C8`: 8-bit unsigned (`.insn ciw`).
    CUimm8,
    /// `Ci`: non-zero 3-bit signed.
    CSimm3,
    /// `Cj`: non-zero 6-bit signed.
    CImmNonZero,
    /// `Co`: 6-bit signed.
    CImm,
    /// `Ck`: `c.lw` offset.
    CLwOffset,
    /// `Cl`: `c.ld` offset.
    CLdOffset,
    /// `Cm`: `c.lwsp` offset.
    CLwspOffset,
    /// `Cn`: `c.ldsp` offset.
    CLdspOffset,
    /// `CM`: `c.swsp` offset.
    CSwspOffset,
    /// `CN`: `c.sdsp` offset.
    CSdspOffset,
    /// `CK`: `c.addi4spn` immediate.
    CAddi4spn,
    /// `CL`: `c.addi16sp` immediate.
    CAddi16sp,
    /// `Cu`: `c.lui` immediate as written.
    CLui,
    /// `Cv`: `c.lui` immediate written as the full value (`lui` alias).
    CLuiFull,
    /// `Cp`: compressed branch target.
    CBranch,
    /// `Ca`: compressed jump target.
    CJump,
    /// `CF6`: compressed funct6.
    CFunct6,
    /// `CF4`: compressed funct4.
    CFunct4,
    /// `CF3`: compressed funct3.
    CFunct3,
    /// `CF2`: compressed funct2.
    CFunct2,
}

impl OperandKind {
    /// Parse a template format string into operand kinds.
    pub fn parse_format(mnemonic: &str, args: &str) -> Result<Vec<OperandKind>, InternalError> {
        let bytes = args.as_bytes();
        let mut out = Vec::with_capacity(args.len());
        let mut i = 0;
        let unknown = |code: &str| InternalError::UnknownOperand {
            mnemonic: mnemonic.into(),
            code: code.into(),
        };
        while i < bytes.len() {
            let c = bytes[i];
            i += 1;
            let kind = match c {
                b',' | b'(' | b')' => OperandKind::Punct(c as char),
                b'd' => OperandKind::Rd,
                b's' => OperandKind::Rs1,
                b't' => OperandKind::Rs2,
                b'r' => OperandKind::Rs3,
                b'D' => OperandKind::FRd,
                b'S' => OperandKind::FRs1,
                b'T' => OperandKind::FRs2,
                b'R' => OperandKind::FRs3,
                b'U' => OperandKind::FRs1Rs2,
                b'<' => OperandKind::ShamtW,
                b'>' => OperandKind::Shamt,
                b'Z' => OperandKind::CsrImm,
                b'E' => OperandKind::Csr,
                b'm' => OperandKind::RoundingMode,
                b'P' => OperandKind::Pred,
                b'Q' => OperandKind::Succ,
                b'j' => OperandKind::ImmI,
                b'o' => OperandKind::LoadOffset,
                b'q' => OperandKind::StoreOffset,
                b'1' => OperandKind::TprelAdd,
                b'0' => OperandKind::ZeroOffset,
                b'u' => OperandKind::Upper,
                b'p' => OperandKind::Branch,
                b'a' => OperandKind::Jump,
                b'c' => OperandKind::Call,
                b'I' => OperandKind::Const,
                b'A' => OperandKind::Symbol,
                b'B' => OperandKind::SymbolOrConst,
                b'z' => OperandKind::Zero,
                b'O' | b'F' => {
                    let sub = bytes.get(i).copied();
                    i += 1;
                    match (c, sub) {
                        (b'O', Some(b'4')) => OperandKind::Opcode7,
                        (b'O', Some(b'2')) => OperandKind::Opcode2,
                        (b'F', Some(b'7')) => OperandKind::Funct7,
                        (b'F', Some(b'3')) => OperandKind::Funct3,
                        (b'F', Some(b'2')) => OperandKind::Funct2,
                        _ => return Err(unknown(&args[i - 2..i.min(args.len())])),
                    }
                }
                b'C' => {
                    let sub = bytes.get(i).copied();
                    i += 1;
                    match sub {
                        Some(b's') => OperandKind::CRs1S,
                        Some(b'w') => OperandKind::CRs1SEq,
                        Some(b't') => OperandKind::CRs2S,
                        Some(b'x') => OperandKind::CRs2SEq,
                        Some(b'U') => OperandKind::CRdEq,
                        Some(b'V') => OperandKind::CRs2,
                        Some(b'c') => OperandKind::CSp,
                        Some(b'z') => OperandKind::CZero,
                        Some(b'S') => OperandKind::CFRs1S,
                        Some(b'D') => OperandKind::CFRs2S,
                        Some(b'T') => OperandKind::CFRs2,
                        Some(b'>') => OperandKind::CShamt,
                        Some(b'<') => OperandKind::CShamtW,
                        Some(b'8') => OperandKind::CUimm8,
                        Some(b'i') => OperandKind::CSimm3,
                        Some(b'j') => OperandKind::CImmNonZero,
                        Some(b'o') => OperandKind::CImm,
                        Some(b'k') => OperandKind::CLwOffset,
                        Some(b'l') => OperandKind::CLdOffset,
                        Some(b'm') => OperandKind::CLwspOffset,
                        Some(b'n') => OperandKind::CLdspOffset,
                        Some(b'M') => OperandKind::CSwspOffset,
                        Some(b'N') => OperandKind::CSdspOffset,
                        Some(b'K') => OperandKind::CAddi4spn,
                        Some(b'L') => OperandKind::CAddi16sp,
                        Some(b'u') => OperandKind::CLui,
                        Some(b'v') => OperandKind::CLuiFull,
                        Some(b'p') => OperandKind::CBranch,
                        Some(b'a') => OperandKind::CJump,
                        Some(b'F') => {
                            let w = bytes.get(i).copied();
                            i += 1;
                            match w {
                                Some(b'6') => OperandKind::CFunct6,
                                Some(b'4') => OperandKind::CFunct4,
                                Some(b'3') => OperandKind::CFunct3,
                                Some(b'2') => OperandKind::CFunct2,
                                _ => return Err(unknown(&args[i - 3..i.min(args.len())])),
                            }
                        }
                        _ => return Err(unknown(&args[i - 2..i.min(args.len())])),
                    }
                }
                _ => return Err(unknown(&args[i - 1..i])),
            };
            out.push(kind);
        }
        Ok(out)
    }

    /// The register field this operand writes, if it is a plain field.
    pub fn field(self) -> Option<Field> {
        use OperandKind::*;
        Some(match self {
            Rd | FRd => RD,
            Rs1 | FRs1 | CsrImm => RS1,
            Rs2 | FRs2 => RS2,
            Rs3 | FRs3 => RS3,
            ShamtW => SHAMTW,
            Shamt => SHAMT,
            Csr => CSR,
            RoundingMode => RM,
            Pred => PRED,
            Succ => SUCC,
            Opcode7 => OP,
            Opcode2 => OP2,
            Funct7 => FUNCT7,
            Funct3 => FUNCT3,
            Funct2 => FUNCT2,
            CRs1S | CFRs1S => CRS1S,
            CRs2S | CFRs2S => CRS2S,
            CRs2 | CFRs2 => CRS2,
            CFunct6 => CFUNCT6,
            CFunct4 => CFUNCT4,
            CFunct3 => CFUNCT3,
            CFunct2 => CFUNCT2,
            _ => return None,
        })
    }

    /// The immediate layout this operand scatters into the word, if any.
    pub fn layout(self) -> Option<&'static ImmLayout> {
        use OperandKind::*;
        Some(match self {
            ImmI | LoadOffset => &I_IMM,
            StoreOffset => &S_IMM,
            Upper => &U_IMM,
            Branch => &B_IMM,
            Jump => &J_IMM,
            CShamt | CShamtW | CImmNonZero | CImm | CLui | CLuiFull => &CI_IMM,
            CSimm3 => &C_SIMM3,
            CUimm8 => &C_UIMM8,
            CLwOffset => &C_LW,
            CLdOffset => &C_LD,
            CLwspOffset => &C_LWSP,
            CLdspOffset => &C_LDSP,
            CSwspOffset => &C_SWSP,
            CSdspOffset => &C_SDSP,
            CAddi4spn => &C_ADDI4SPN,
            CAddi16sp => &C_ADDI16SP,
            CBranch => &C_B_IMM,
            CJump => &C_J_IMM,
            _ => return None,
        })
    }

    /// Instruction-word bits this operand accounts for.
    pub fn used_bits(self) -> u64 {
        match self {
            OperandKind::FRs1Rs2 => RS1.mask() | RS2.mask(),
            _ => match (self.field(), self.layout()) {
                (Some(f), _) => f.mask(),
                (None, Some(l)) => l.word_mask(),
                (None, None) => 0,
            },
        }
    }

    /// Whether the operand takes an offset that may be omitted before `(`.
    pub fn allows_implicit_zero(self) -> bool {
        use OperandKind::*;
        matches!(
            self,
            LoadOffset
                | StoreOffset
                | ZeroOffset
                | CLwOffset
                | CLdOffset
                | CLwspOffset
                | CLdspOffset
                | CSwspOffset
                | CSdspOffset
        )
    }

    /// Register operands in the 3-bit compressed fields hold `x8`..`x15`.
    pub fn is_compressed_register(self) -> bool {
        matches!(
            self,
            OperandKind::CRs1S | OperandKind::CRs2S | OperandKind::CFRs1S | OperandKind::CFRs2S
        )
    }

    /// Decode this operand's value back out of an encoded word.
    ///
    /// Constrained and textual-only operands return `None`.
    pub fn extract(self, word: u64) -> Option<i64> {
        if self == OperandKind::FRs1Rs2 {
            return Some(RS1.extract(word) as i64);
        }
        if self == OperandKind::CLuiFull {
            return Some(CI_IMM.extract(word) << 12);
        }
        if self == OperandKind::CLui {
            return Some(CI_IMM.extract(word) & 0xfffff);
        }
        if let Some(f) = self.field() {
            let v = f.extract(word) as i64;
            return Some(if self.is_compressed_register() { v + 8 } else { v });
        }
        self.layout().map(|l| match self {
            OperandKind::Upper => l.extract(word) >> 12,
            _ => l.extract(word),
        })
    }

    /// Short description used in range diagnostics.
    pub fn describe(self) -> &'static str {
        use OperandKind::*;
        match self {
            ShamtW | Shamt | CShamt | CShamtW => "shift amount",
            CsrImm => "CSR immediate",
            Csr => "CSR address",
            Upper | CLui | CLuiFull => "lui immediate",
            Opcode7 | Opcode2 => "opcode",
            Funct7 | Funct3 | Funct2 | CFunct6 | CFunct4 | CFunct3 | CFunct2 => "function field",
            ZeroOffset | Zero => "zero operand",
            _ => "immediate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_format() {
        let kinds = OperandKind::parse_format("addi", "d,s,j").unwrap();
        assert_eq!(
            kinds,
            vec![
                OperandKind::Rd,
                OperandKind::Punct(','),
                OperandKind::Rs1,
                OperandKind::Punct(','),
                OperandKind::ImmI,
            ]
        );
    }

    #[test]
    fn parse_compressed_format() {
        let kinds = OperandKind::parse_format("c.lw", "Ct,Ck(Cs)").unwrap();
        assert_eq!(
            kinds,
            vec![
                OperandKind::CRs2S,
                OperandKind::Punct(','),
                OperandKind::CLwOffset,
                OperandKind::Punct('('),
                OperandKind::CRs1S,
                OperandKind::Punct(')'),
            ]
        );
    }

    #[test]
    fn parse_insn_fields() {
        let kinds = OperandKind::parse_format("cr", "O2,CF4,d,CV").unwrap();
        assert_eq!(kinds[0], OperandKind::Opcode2);
        assert_eq!(kinds[2], OperandKind::CFunct4);
    }

    #[test]
    fn unknown_code_is_internal_error() {
        let err = OperandKind::parse_format("bogus", "d,Cq").unwrap_err();
        assert_eq!(
            err,
            InternalError::UnknownOperand {
                mnemonic: "bogus".into(),
                code: "Cq".into(),
            }
        );
        assert!(OperandKind::parse_format("bogus", "X").is_err());
    }

    #[test]
    fn branch_layout_round_trip() {
        for v in [-4096i64, -2, 0, 2, 4094] {
            assert!(B_IMM.fits(v), "{v}");
            assert_eq!(B_IMM.extract(B_IMM.encode(v)), v);
        }
        assert!(!B_IMM.fits(3));
        assert!(!B_IMM.fits(4096));
    }

    #[test]
    fn layout_word_masks() {
        assert_eq!(I_IMM.word_mask(), 0xfff0_0000);
        assert_eq!(S_IMM.word_mask(), 0xfe00_0f80);
        assert_eq!(B_IMM.word_mask(), 0xfe00_0f80);
        assert_eq!(J_IMM.word_mask(), 0xffff_f000);
        assert_eq!(CI_IMM.word_mask(), 0x107c);
        assert_eq!(C_J_IMM.word_mask(), 0x1ffc);
        assert_eq!(C_B_IMM.word_mask(), 0x1c7c);
        assert_eq!(C_ADDI4SPN.word_mask(), 0x1fe0);
        assert_eq!(C_ADDI16SP.word_mask(), 0x107c);
    }

    #[test]
    fn compressed_offsets() {
        assert!(C_LW.fits(124));
        assert!(!C_LW.fits(128));
        assert!(!C_LW.fits(2));
        assert!(C_LDSP.fits(504));
        assert!(!C_LDSP.fits(-8));
        assert!(C_ADDI16SP.fits(-512));
        assert!(!C_ADDI16SP.fits(8));
    }

    #[test]
    fn field_insert_extract() {
        let word = RD.insert(0, 10);
        assert_eq!(word, 10 << 7);
        assert_eq!(RD.extract(word), 10);
        assert_eq!(OperandKind::CRs2S.extract(CRS2S.insert(0, 2)), Some(10));
    }

    #[test]
    fn used_bits_of_shared_register() {
        assert_eq!(OperandKind::FRs1Rs2.used_bits(), RS1.mask() | RS2.mask());
        assert_eq!(OperandKind::CSp.used_bits(), 0);
        assert_eq!(OperandKind::Zero.used_bits(), 0);
    }
}
