//! Register, CSR, opcode and keyword name tables.
//!
//! All maps are immutable and built on first use. Register names compare
//! case-insensitively; every other table is case-sensitive.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Register file a name binds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterClass {
    /// `x0`..`x31`.
    GeneralPurpose,
    /// `f0`..`f31`.
    FloatingPoint,
    /// 12-bit control and status register space.
    ControlStatus,
}

// ── Static name lists ───────────────────────────────────────────────────

const GPR_ABI: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

const FPR_ABI: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// Frame pointer alias.
const GPR_FP: u32 = 8;

const CSRS: &[(&str, u32)] = &[
    // User
    ("ustatus", 0x000),
    ("fflags", 0x001),
    ("frm", 0x002),
    ("fcsr", 0x003),
    ("uie", 0x004),
    ("utvec", 0x005),
    ("uscratch", 0x040),
    ("uepc", 0x041),
    ("ucause", 0x042),
    ("utval", 0x043),
    ("uip", 0x044),
    ("cycle", 0xc00),
    ("time", 0xc01),
    ("instret", 0xc02),
    ("cycleh", 0xc80),
    ("timeh", 0xc81),
    ("instreth", 0xc82),
    // Supervisor
    ("sstatus", 0x100),
    ("sedeleg", 0x102),
    ("sideleg", 0x103),
    ("sie", 0x104),
    ("stvec", 0x105),
    ("scounteren", 0x106),
    ("sscratch", 0x140),
    ("sepc", 0x141),
    ("scause", 0x142),
    ("stval", 0x143),
    ("sip", 0x144),
    ("satp", 0x180),
    // Machine
    ("mvendorid", 0xf11),
    ("marchid", 0xf12),
    ("mimpid", 0xf13),
    ("mhartid", 0xf14),
    ("mstatus", 0x300),
    ("misa", 0x301),
    ("medeleg", 0x302),
    ("mideleg", 0x303),
    ("mie", 0x304),
    ("mtvec", 0x305),
    ("mcounteren", 0x306),
    ("mstatush", 0x310),
    ("mcountinhibit", 0x320),
    ("mscratch", 0x340),
    ("mepc", 0x341),
    ("mcause", 0x342),
    ("mtval", 0x343),
    ("mip", 0x344),
    ("pmpcfg0", 0x3a0),
    ("pmpcfg1", 0x3a1),
    ("pmpcfg2", 0x3a2),
    ("pmpcfg3", 0x3a3),
    ("mcycle", 0xb00),
    ("minstret", 0xb02),
    ("mcycleh", 0xb80),
    ("minstreth", 0xb82),
    // Debug
    ("tselect", 0x7a0),
    ("tdata1", 0x7a1),
    ("tdata2", 0x7a2),
    ("tdata3", 0x7a3),
    ("dcsr", 0x7b0),
    ("dpc", 0x7b1),
    ("dscratch", 0x7b2),
];

/// `.insn` major opcode names.
const OPCODE_NAMES: &[(&str, u32)] = &[
    ("C0", 0x0),
    ("C1", 0x1),
    ("C2", 0x2),
    ("LOAD", 0x03),
    ("LOAD_FP", 0x07),
    ("CUSTOM_0", 0x0b),
    ("MISC_MEM", 0x0f),
    ("OP_IMM", 0x13),
    ("AUIPC", 0x17),
    ("OP_IMM_32", 0x1b),
    ("STORE", 0x23),
    ("STORE_FP", 0x27),
    ("CUSTOM_1", 0x2b),
    ("AMO", 0x2f),
    ("OP", 0x33),
    ("LUI", 0x37),
    ("OP_32", 0x3b),
    ("MADD", 0x43),
    ("MSUB", 0x47),
    ("NMSUB", 0x4b),
    ("NMADD", 0x4f),
    ("OP_FP", 0x53),
    ("CUSTOM_2", 0x5b),
    ("BRANCH", 0x63),
    ("JALR", 0x67),
    ("JAL", 0x6f),
    ("SYSTEM", 0x73),
    ("CUSTOM_3", 0x7b),
];

/// Rounding-mode keywords indexed by their `rm` field value.
pub const ROUNDING_MODES: [Option<&str>; 8] = [
    Some("rne"),
    Some("rtz"),
    Some("rdn"),
    Some("rup"),
    Some("rmm"),
    None,
    None,
    Some("dyn"),
];

/// Fence predecessor/successor sets indexed by their 4-bit field value.
pub const FENCE_SETS: [Option<&str>; 16] = [
    None,
    Some("w"),
    Some("r"),
    Some("rw"),
    Some("o"),
    Some("ow"),
    Some("or"),
    Some("orw"),
    Some("i"),
    Some("iw"),
    Some("ir"),
    Some("irw"),
    Some("io"),
    Some("iow"),
    Some("ior"),
    Some("iorw"),
];

// ── Maps ────────────────────────────────────────────────────────────────

struct NameMaps {
    gpr: HashMap<String, u32>,
    fpr: HashMap<String, u32>,
    csr: HashMap<String, u32>,
    opcode: HashMap<&'static str, u32>,
}

fn maps() -> &'static NameMaps {
    static MAPS: OnceLock<NameMaps> = OnceLock::new();
    MAPS.get_or_init(|| {
        let mut gpr = HashMap::with_capacity(65);
        let mut fpr = HashMap::with_capacity(64);
        for n in 0..32u32 {
            gpr.insert(format!("x{n}"), n);
            gpr.insert(GPR_ABI[n as usize].to_string(), n);
            fpr.insert(format!("f{n}"), n);
            fpr.insert(FPR_ABI[n as usize].to_string(), n);
        }
        gpr.insert("fp".to_string(), GPR_FP);

        let mut csr: HashMap<String, u32> = CSRS.iter().map(|&(n, v)| (n.to_string(), v)).collect();
        for n in 0..4u32 {
            csr.insert(format!("pmpaddr{n}"), 0x3b0 + n);
        }
        for n in 3..32u32 {
            csr.insert(format!("hpmcounter{n}"), 0xc00 + n);
            csr.insert(format!("hpmcounter{n}h"), 0xc80 + n);
            csr.insert(format!("mhpmcounter{n}"), 0xb00 + n);
            csr.insert(format!("mhpmcounter{n}h"), 0xb80 + n);
            csr.insert(format!("mhpmevent{n}"), 0x320 + n);
        }

        let opcode = OPCODE_NAMES.iter().copied().collect();
        NameMaps {
            gpr,
            fpr,
            csr,
            opcode,
        }
    })
}

/// Length of the alphanumeric token at the start of `text`.
fn token_len(text: &str) -> usize {
    text.bytes()
        .position(|b| !(b.is_ascii_alphanumeric() || b == b'_'))
        .unwrap_or(text.len())
}

// ── Lookups ─────────────────────────────────────────────────────────────

/// Look up a register name at the start of `text`.
///
/// Returns the register index and the number of bytes consumed. With `rve`
/// set, general-purpose indices above 15 are rejected.
pub fn lookup_register(text: &str, class: RegisterClass, rve: bool) -> Option<(u32, usize)> {
    let len = token_len(text);
    if len == 0 {
        return None;
    }
    let name = text[..len].to_ascii_lowercase();
    let maps = maps();
    let index = match class {
        RegisterClass::GeneralPurpose => *maps.gpr.get(&name)?,
        RegisterClass::FloatingPoint => *maps.fpr.get(&name)?,
        RegisterClass::ControlStatus => *maps.csr.get(&name)?,
    };
    if rve && class == RegisterClass::GeneralPurpose && index > 15 {
        return None;
    }
    Some((index, len))
}

/// Look up a `.insn` major opcode name at the start of `text`.
pub fn lookup_opcode_alias(text: &str) -> Option<(u32, usize)> {
    let len = token_len(text);
    maps().opcode.get(&text[..len]).map(|v| (*v, len))
}

fn keyword_len(text: &str) -> usize {
    text.bytes()
        .position(|b| b == b',' || b == b')' || b.is_ascii_whitespace())
        .unwrap_or(text.len())
}

fn lookup_keyword(text: &str, table: &[Option<&str>]) -> Option<(u32, usize)> {
    let len = keyword_len(text);
    if len == 0 {
        return None;
    }
    let word = &text[..len];
    table
        .iter()
        .position(|n| *n == Some(word))
        .map(|i| (i as u32, len))
}

/// Look up a floating-point rounding-mode keyword.
pub fn lookup_rounding_mode(text: &str) -> Option<(u32, usize)> {
    lookup_keyword(text, &ROUNDING_MODES)
}

/// Look up a fence predecessor/successor set such as `rw` or `iorw`.
pub fn lookup_fence_set(text: &str) -> Option<(u32, usize)> {
    lookup_keyword(text, &FENCE_SETS)
}

/// DWARF register number for a register name.
pub fn dwarf_regnum(name: &str) -> Option<u32> {
    let full = |class| lookup_register(name, class, false).filter(|&(_, len)| len == name.len());
    if let Some((n, _)) = full(RegisterClass::GeneralPurpose) {
        return Some(n);
    }
    if let Some((n, _)) = full(RegisterClass::FloatingPoint) {
        return Some(n + 32);
    }
    full(RegisterClass::ControlStatus).map(|(n, _)| n + 4096)
}
