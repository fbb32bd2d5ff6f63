//! ELF RISC-V relocation descriptors and constant patching.

use core::fmt;

use crate::operand::{B_IMM, C_B_IMM, C_J_IMM, I_IMM, J_IMM, S_IMM, U_IMM};

/// Every ELF RISC-V relocation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelocKind {
    None,
    Abs32,
    Abs64,
    Relative,
    Copy,
    JumpSlot,
    TlsDtpmod32,
    TlsDtpmod64,
    TlsDtprel32,
    TlsDtprel64,
    TlsTprel32,
    TlsTprel64,
    /// B-type conditional branch.
    Branch,
    /// J-type jump.
    Jal,
    /// `auipc` + `jalr` pair.
    Call,
    /// `auipc` + `jalr` pair through the PLT.
    CallPlt,
    GotHi20,
    TlsGotHi20,
    TlsGdHi20,
    PcrelHi20,
    PcrelLo12I,
    PcrelLo12S,
    Hi20,
    Lo12I,
    Lo12S,
    TprelHi20,
    TprelLo12I,
    TprelLo12S,
    TprelAdd,
    Add8,
    Add16,
    Add32,
    Add64,
    Sub8,
    Sub16,
    Sub32,
    Sub64,
    GnuVtinherit,
    GnuVtentry,
    Align,
    /// CB-type compressed branch.
    RvcBranch,
    /// CJ-type compressed jump.
    RvcJump,
    RvcLui,
    GprelI,
    GprelS,
    TprelI,
    TprelS,
    /// Marks the preceding relocation as a linker-relaxation candidate.
    Relax,
    Sub6,
    Set6,
    Set8,
    Set16,
    Set32,
    Pcrel32,
    Irelative,
}

/// How a relocated value is checked for overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Dont,
    Signed,
    Unsigned,
    Bitfield,
}

/// Static description of one relocation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocDescriptor {
    pub kind: RelocKind,
    /// ELF `r_type` value.
    pub elf_id: u32,
    /// ELF name without the `R_RISCV_` prefix.
    pub name: &'static str,
    /// Size of the patched field in bytes.
    pub size: u8,
    pub bit_width: u8,
    pub rightshift: u8,
    pub is_pc_relative: bool,
    /// Bits of the patched field the relocation replaces.
    pub dst_mask: u64,
    pub overflow: Overflow,
}

#[allow(clippy::too_many_arguments)]
const fn d(
    kind: RelocKind,
    elf_id: u32,
    name: &'static str,
    size: u8,
    bit_width: u8,
    is_pc_relative: bool,
    dst_mask: u64,
    overflow: Overflow,
) -> RelocDescriptor {
    RelocDescriptor {
        kind,
        elf_id,
        name,
        size,
        bit_width,
        rightshift: 0,
        is_pc_relative,
        dst_mask,
        overflow,
    }
}

const W32: u64 = 0xffff_ffff;
const I_MASK: u64 = 0xfff0_0000;
const S_MASK: u64 = 0xfe00_0f80;
const U_MASK: u64 = 0xffff_f000;
const CALL_MASK: u64 = U_MASK | (I_MASK << 32);

use Overflow::{Bitfield, Dont, Signed};
use RelocKind as K;

/// Indexed by `RelocKind as usize`.
#[rustfmt::skip]
static DESCRIPTORS: [RelocDescriptor; 55] = [
    d(K::None,         0,  "NONE",          0,  0, false, 0, Dont),
    d(K::Abs32,        1,  "32",            4, 32, false, W32, Dont),
    d(K::Abs64,        2,  "64",            8, 64, false, u64::MAX, Dont),
    d(K::Relative,     3,  "RELATIVE",      4, 32, false, W32, Dont),
    d(K::Copy,         4,  "COPY",          0,  0, false, 0, Bitfield),
    d(K::JumpSlot,     5,  "JUMP_SLOT",     0,  0, false, 0, Bitfield),
    d(K::TlsDtpmod32,  6,  "TLS_DTPMOD32",  4, 32, false, W32, Dont),
    d(K::TlsDtpmod64,  7,  "TLS_DTPMOD64",  8, 64, false, u64::MAX, Dont),
    d(K::TlsDtprel32,  8,  "TLS_DTPREL32",  4, 32, false, W32, Dont),
    d(K::TlsDtprel64,  9,  "TLS_DTPREL64",  8, 64, false, u64::MAX, Dont),
    d(K::TlsTprel32,   10, "TLS_TPREL32",   4, 32, false, W32, Dont),
    d(K::TlsTprel64,   11, "TLS_TPREL64",   8, 64, false, u64::MAX, Dont),
    d(K::Branch,       16, "BRANCH",        4, 32, true,  S_MASK, Signed),
    d(K::Jal,          17, "JAL",           4, 32, true,  U_MASK, Dont),
    d(K::Call,         18, "CALL",          8, 64, true,  CALL_MASK, Dont),
    d(K::CallPlt,      19, "CALL_PLT",      8, 64, true,  CALL_MASK, Dont),
    d(K::GotHi20,      20, "GOT_HI20",      4, 32, true,  U_MASK, Dont),
    d(K::TlsGotHi20,   21, "TLS_GOT_HI20",  4, 32, true,  U_MASK, Dont),
    d(K::TlsGdHi20,    22, "TLS_GD_HI20",   4, 32, true,  U_MASK, Dont),
    d(K::PcrelHi20,    23, "PCREL_HI20",    4, 32, true,  U_MASK, Dont),
    d(K::PcrelLo12I,   24, "PCREL_LO12_I",  4, 32, false, I_MASK, Dont),
    d(K::PcrelLo12S,   25, "PCREL_LO12_S",  4, 32, false, S_MASK, Dont),
    d(K::Hi20,         26, "HI20",          4, 32, false, U_MASK, Dont),
    d(K::Lo12I,        27, "LO12_I",        4, 32, false, I_MASK, Dont),
    d(K::Lo12S,        28, "LO12_S",        4, 32, false, S_MASK, Dont),
    d(K::TprelHi20,    29, "TPREL_HI20",    4, 32, false, U_MASK, Dont),
    d(K::TprelLo12I,   30, "TPREL_LO12_I",  4, 32, false, I_MASK, Dont),
    d(K::TprelLo12S,   31, "TPREL_LO12_S",  4, 32, false, S_MASK, Dont),
    d(K::TprelAdd,     32, "TPREL_ADD",     4, 32, false, 0, Dont),
    d(K::Add8,         33, "ADD8",          1,  8, false, 0xff, Dont),
    d(K::Add16,        34, "ADD16",         2, 16, false, 0xffff, Dont),
    d(K::Add32,        35, "ADD32",         4, 32, false, W32, Dont),
    d(K::Add64,        36, "ADD64",         8, 64, false, u64::MAX, Dont),
    d(K::Sub8,         37, "SUB8",          1,  8, false, 0xff, Dont),
    d(K::Sub16,        38, "SUB16",         2, 16, false, 0xffff, Dont),
    d(K::Sub32,        39, "SUB32",         4, 32, false, W32, Dont),
    d(K::Sub64,        40, "SUB64",         8, 64, false, u64::MAX, Dont),
    d(K::GnuVtinherit, 41, "GNU_VTINHERIT", 0,  0, false, 0, Dont),
    d(K::GnuVtentry,   42, "GNU_VTENTRY",   0,  0, false, 0, Dont),
    d(K::Align,        43, "ALIGN",         0,  0, false, 0, Dont),
    d(K::RvcBranch,    44, "RVC_BRANCH",    2, 16, true,  0x1c7c, Signed),
    d(K::RvcJump,      45, "RVC_JUMP",      2, 16, true,  0x1ffc, Dont),
    d(K::RvcLui,       46, "RVC_LUI",       2, 16, false, 0x107c, Dont),
    d(K::GprelI,       47, "GPREL_I",       4, 32, false, I_MASK, Dont),
    d(K::GprelS,       48, "GPREL_S",       4, 32, false, S_MASK, Dont),
    d(K::TprelI,       49, "TPREL_I",       4, 32, false, I_MASK, Dont),
    d(K::TprelS,       50, "TPREL_S",       4, 32, false, S_MASK, Dont),
    d(K::Relax,        51, "RELAX",         0,  0, false, 0, Dont),
    d(K::Sub6,         52, "SUB6",          1,  8, false, 0x3f, Dont),
    d(K::Set6,         53, "SET6",          1,  8, false, 0x3f, Dont),
    d(K::Set8,         54, "SET8",          1,  8, false, 0xff, Dont),
    d(K::Set16,        55, "SET16",         2, 16, false, 0xffff, Dont),
    d(K::Set32,        56, "SET32",         4, 32, false, W32, Dont),
    d(K::Pcrel32,      57, "32_PCREL",      4, 32, true,  W32, Dont),
    d(K::Irelative,    58, "IRELATIVE",     4, 32, false, W32, Dont),
];

/// Descriptor for `kind`.
pub fn by_kind(kind: RelocKind) -> &'static RelocDescriptor {
    &DESCRIPTORS[kind as usize]
}

/// Descriptor for an ELF relocation name, with or without the `R_RISCV_` prefix.
pub fn by_name(name: &str) -> Option<&'static RelocDescriptor> {
    let bare = name.strip_prefix("R_RISCV_").unwrap_or(name);
    DESCRIPTORS.iter().find(|d| d.name == bare)
}

/// Descriptor for an ELF `r_type` value.
pub fn by_id(id: u32) -> Option<&'static RelocDescriptor> {
    DESCRIPTORS.iter().find(|d| d.elf_id == id)
}

impl RelocKind {
    /// The static descriptor.
    pub fn descriptor(self) -> &'static RelocDescriptor {
        by_kind(self)
    }

    /// Whether the value is relative to the patched location.
    pub fn is_pc_relative(self) -> bool {
        by_kind(self).is_pc_relative
    }
}

impl fmt::Display for RelocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R_RISCV_{}", by_kind(*self).name)
    }
}

/// Value of an ADD/SUB/SET relocation given the existing field contents.
///
/// Bits outside the descriptor's mask are preserved. Other kinds give `None`.
pub fn add_sub_special(kind: RelocKind, old: u64, sym: u64) -> Option<u64> {
    let value = match kind {
        K::Add8 | K::Add16 | K::Add32 | K::Add64 => old.wrapping_add(sym),
        K::Sub6 | K::Sub8 | K::Sub16 | K::Sub32 | K::Sub64 => old.wrapping_sub(sym),
        K::Set6 | K::Set8 | K::Set16 | K::Set32 => sym,
        _ => return None,
    };
    let mask = by_kind(kind).dst_mask;
    Some((old & !mask) | (value & mask))
}

/// Upper part of a constant for `lui`, rounded so the low part sign-extends.
pub fn const_high_part(value: i64) -> i64 {
    value.wrapping_add(0x800) & !0xfff
}

/// Instruction bits for a relocation applied to a known constant.
///
/// Only the absolute kinds an assembler can resolve without a symbol are
/// supported; the result is ORed into the instruction word.
pub fn apply_const(kind: RelocKind, value: i64) -> Option<u64> {
    match kind {
        K::Abs32 => Some(value as u64 & W32),
        K::Hi20 => Some(U_IMM.encode(const_high_part(value))),
        K::Lo12I => Some(I_IMM.encode(value)),
        K::Lo12S => Some(S_IMM.encode(value)),
        _ => None,
    }
}

/// Place a PC-relative `delta` into a branch or jump field.
///
/// Returns `None` for other kinds or when the delta is out of reach or
/// misaligned.
pub fn encode_field(kind: RelocKind, delta: i64) -> Option<u64> {
    let layout = match kind {
        K::Branch => &B_IMM,
        K::Jal => &J_IMM,
        K::RvcBranch => &C_B_IMM,
        K::RvcJump => &C_J_IMM,
        _ => return None,
    };
    layout.fits(delta).then(|| layout.encode(delta))
}

/// Whether a relocation of this kind gets an `R_RISCV_RELAX` companion.
pub fn is_relaxable(kind: RelocKind, relax_on: bool) -> bool {
    relax_on
        && matches!(
            kind,
            K::Hi20
                | K::Lo12I
                | K::Lo12S
                | K::GotHi20
                | K::TprelHi20
                | K::TprelLo12I
                | K::TprelLo12S
                | K::TprelAdd
                | K::Call
                | K::CallPlt
                | K::PcrelHi20
                | K::PcrelLo12I
                | K::PcrelLo12S
                | K::Add8
                | K::Add16
                | K::Add32
                | K::Add64
                | K::Sub8
                | K::Sub16
                | K::Sub32
                | K::Sub64
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_is_indexed_by_kind() {
        for (i, d) in DESCRIPTORS.iter().enumerate() {
            assert_eq!(d.kind as usize, i, "{}", d.name);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = HashSet::new();
        for d in &DESCRIPTORS {
            assert!(seen.insert(d.elf_id), "duplicate id {}", d.elf_id);
        }
        assert!(by_id(12).is_none());
        assert_eq!(by_id(58).map(|d| d.kind), Some(K::Irelative));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("R_RISCV_PCREL_HI20").map(|d| d.elf_id), Some(23));
        assert_eq!(by_name("CALL_PLT").map(|d| d.kind), Some(K::CallPlt));
        assert!(by_name("r_riscv_call").is_none());
        assert_eq!(K::Pcrel32.to_string(), "R_RISCV_32_PCREL");
    }

    #[test]
    fn add_sub_set() {
        assert_eq!(add_sub_special(K::Add8, 0x12ff, 0x02), Some(0x1201));
        assert_eq!(add_sub_special(K::Sub16, 0x0001_0000, 1), Some(0x0001_ffff));
        assert_eq!(add_sub_special(K::Set6, 0xc0, 0x7f), Some(0xff));
        assert_eq!(add_sub_special(K::Sub6, 0xc1, 2), Some(0xff));
        assert_eq!(add_sub_special(K::Hi20, 0, 0), None);
    }

    #[test]
    fn constant_patches() {
        // lui a0, %hi(0x12345fff) rounds up
        assert_eq!(apply_const(K::Hi20, 0x1234_5fff), Some(0x1234_6000));
        assert_eq!(apply_const(K::Lo12I, -1), Some(0xfff0_0000));
        assert_eq!(apply_const(K::Lo12S, 0x7ff), Some(0x7e00_0f80));
        assert_eq!(apply_const(K::Abs32, -1), Some(0xffff_ffff));
        assert_eq!(apply_const(K::PcrelHi20, 0), None);
    }

    #[test]
    fn branch_fields() {
        assert_eq!(encode_field(K::Branch, 8), Some(0x400));
        assert_eq!(encode_field(K::Branch, 4096), None);
        assert_eq!(encode_field(K::RvcJump, 2046), C_J_IMM.fits(2046).then(|| C_J_IMM.encode(2046)));
        assert_eq!(encode_field(K::Jal, 3), None);
        assert_eq!(encode_field(K::Hi20, 0), None);
    }

    #[test]
    fn relax_companions() {
        assert!(is_relaxable(K::Call, true));
        assert!(!is_relaxable(K::Call, false));
        assert!(!is_relaxable(K::Branch, true));
    }
}
