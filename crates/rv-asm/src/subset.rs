//! ISA string parsing into an ordered, versioned subset list.
//!
//! ```text
//! rv64imafdc_zicsr_zifencei
//! ^^^^                       base width
//!     ^                      first subset (i, e or g)
//!      ^^^^^                 standard letters, canonical order "mafdqlcbjtpvn"
//!           ^^^^^^^^^^^^^^^^ multi-letter subsets, class order s, z, x
//! ```
//!
//! Each subset may carry a `<major>[p<minor>]` version. A missing version is
//! filled in from a caller-supplied lookup.

use core::fmt;

use crate::error::{IsaError, IsaErrorKind};
use crate::extension::{self, G_BUNDLE, PREFIX_ORDER};

/// Integer register width selected by the ISA string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Xlen {
    /// 32-bit base.
    Rv32,
    /// 64-bit base.
    Rv64,
}

impl Xlen {
    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Xlen::Rv32 => 32,
            Xlen::Rv64 => 64,
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> u32 {
        self.bits() / 8
    }
}

impl fmt::Display for Xlen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rv{}", self.bits())
    }
}

/// Floating-point calling convention implied by the subset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatAbi {
    /// Floats passed in integer registers.
    Soft,
    /// Single-precision registers.
    Single,
    /// Double-precision registers.
    Double,
    /// Quad-precision registers.
    Quad,
}

/// One named, versioned ISA subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subset {
    /// Subset name, e.g. `"m"` or `"zicsr"`.
    pub name: String,
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl Subset {
    /// Create a subset record.
    pub fn new(name: impl Into<String>, major: u32, minor: u32) -> Self {
        Self {
            name: name.into(),
            major,
            minor,
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}p{}", self.name, self.major, self.minor)
    }
}

/// Ordered list of active subsets.
///
/// Always produced whole by [`SubsetList::parse`]; there is no way to add or
/// remove individual entries afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetList {
    subsets: Vec<Subset>,
}

/// Default-version lookup signature used by the parser.
pub type VersionLookup<'a> = &'a dyn Fn(&str) -> Option<(u32, u32)>;

impl SubsetList {
    /// Parse `arch` using the built-in default versions.
    pub fn parse_default(arch: &str) -> Result<(Xlen, SubsetList), IsaError> {
        Self::parse(arch, &extension::default_version)
    }

    /// Parse `arch`, asking `defaults` for the version of every subset given
    /// without one.
    pub fn parse(arch: &str, defaults: VersionLookup<'_>) -> Result<(Xlen, SubsetList), IsaError> {
        let mut parser = Parser {
            arch,
            bytes: arch.as_bytes(),
            pos: 0,
            defaults,
            list: Vec::new(),
        };
        let xlen = parser.base()?;
        parser.first_subset()?;
        parser.standard()?;
        parser.prefixed()?;
        if parser.pos < parser.bytes.len() {
            let rest = parser.rest();
            let kind = if PREFIX_ORDER
                .iter()
                .filter_map(|c| c.prefix())
                .any(|p| rest.starts_with(p))
            {
                IsaErrorKind::OutOfOrder
            } else {
                IsaErrorKind::UnexpectedSuffix
            };
            return Err(parser.error(kind, rest));
        }
        let list = SubsetList {
            subsets: parser.list,
        };
        list.check_consistency(xlen, arch)?;
        tracing::debug!(arch, subsets = list.len(), "parsed ISA string");
        Ok((xlen, list))
    }

    fn check_consistency(&self, xlen: Xlen, arch: &str) -> Result<(), IsaError> {
        let err = |kind, offending: &str| Err(IsaError::new(kind, offending, arch));
        if self.contains("e") {
            if self.contains("f") {
                return err(IsaErrorKind::Rv32eOnly, "f");
            }
            if xlen == Xlen::Rv64 {
                return err(IsaErrorKind::Rv32eOnly, "rv64e");
            }
        }
        if self.contains("d") && !self.contains("f") {
            return err(IsaErrorKind::MissingCompanion { requires: "f".into() }, "d");
        }
        if self.contains("q") {
            if !self.contains("d") {
                return err(IsaErrorKind::MissingCompanion { requires: "d".into() }, "q");
            }
            if xlen == Xlen::Rv32 {
                return err(IsaErrorKind::WidthIncompatible, "q");
            }
        }
        Ok(())
    }

    /// Whether a subset with this name is active.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The record for `name`, if active.
    pub fn get(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|s| s.name == name)
    }

    /// Subsets in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Subset> {
        self.subsets.iter()
    }

    /// Number of subsets.
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    /// Whether the list is empty (only before the first parse).
    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Whether the reduced register file base is in use.
    pub fn is_rve(&self) -> bool {
        self.contains("e")
    }

    /// Float ABI inferred when none is configured: soft unless `d` or `q`
    /// is present. `f` alone never selects the single-precision ABI.
    pub fn float_abi(&self) -> FloatAbi {
        if self.contains("q") {
            FloatAbi::Quad
        } else if self.contains("d") {
            FloatAbi::Double
        } else {
            FloatAbi::Soft
        }
    }

    /// Canonical ISA string, e.g. `rv64i2p0_m2p0_c2p0`.
    ///
    /// Re-parsing the result yields an identical list.
    pub fn arch_string(&self, xlen: Xlen) -> String {
        let mut out = xlen.to_string();
        for (i, subset) in self.subsets.iter().enumerate() {
            if i > 0 {
                out.push('_');
            }
            out.push_str(&subset.to_string());
        }
        out
    }
}

// ── Parser ──────────────────────────────────────────────────────────────

struct Parser<'a> {
    arch: &'a str,
    bytes: &'a [u8],
    pos: usize,
    defaults: VersionLookup<'a>,
    list: Vec<Subset>,
}

impl<'a> Parser<'a> {
    fn error(&self, kind: IsaErrorKind, offending: &str) -> IsaError {
        IsaError::new(kind, offending, self.arch)
    }

    fn rest(&self) -> &'a str {
        &self.arch[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn base(&mut self) -> Result<Xlen, IsaError> {
        if self.bytes.iter().any(u8::is_ascii_uppercase) {
            return Err(self.error(IsaErrorKind::Uppercase, self.arch));
        }
        if !self.arch.is_ascii() {
            return Err(self.error(IsaErrorKind::UnknownExtension, self.arch));
        }
        let xlen = if self.arch.starts_with("rv32") {
            Xlen::Rv32
        } else if self.arch.starts_with("rv64") {
            Xlen::Rv64
        } else {
            return Err(self.error(IsaErrorKind::MalformedBase, self.arch));
        };
        self.pos = 4;
        Ok(xlen)
    }

    fn push(&mut self, name: &str, version: Option<(u32, u32)>) {
        let (major, minor) = version
            .or_else(|| (self.defaults)(name))
            .unwrap_or((0, 0));
        self.list.push(Subset::new(name, major, minor));
    }

    fn first_subset(&mut self) -> Result<(), IsaError> {
        match self.peek() {
            Some(b'i') => {
                self.pos += 1;
                let v = self.version(true)?;
                self.push("i", v);
            }
            Some(b'e') => {
                self.pos += 1;
                let v = self.version(true)?;
                self.push("e", v);
                // A canonical string spells the implied `i` out; fold it back.
                let save = self.pos;
                if self.peek() == Some(b'_') {
                    self.pos += 1;
                }
                if self.peek() == Some(b'i') {
                    self.pos += 1;
                    let v = self.version(true)?;
                    self.push("i", v);
                } else {
                    self.pos = save;
                    self.push("i", None);
                }
            }
            Some(b'g') => {
                self.pos += 1;
                let v = self.version(true)?;
                self.push("i", v);
                for ext in G_BUNDLE.chars() {
                    self.push(ext.encode_utf8(&mut [0; 4]), v);
                }
            }
            _ => {
                let rest = self.rest();
                return Err(self.error(IsaErrorKind::InvalidFirst, rest));
            }
        }
        Ok(())
    }

    fn standard(&mut self) -> Result<(), IsaError> {
        // Next acceptable index into CANONICAL_ORDER.
        let mut order = 0;
        // `g` already consumed its bundle.
        if let Some(last) = self.list.last() {
            if let Some(rank) = last.name.chars().next().and_then(extension::canonical_rank) {
                order = rank + 1;
            }
        }
        while let Some(b) = self.peek() {
            if b == b'_' {
                self.pos += 1;
                continue;
            }
            if matches!(b, b's' | b'z' | b'x') {
                break;
            }
            let start = self.pos;
            let c = b as char;
            let letter = &self.arch[start..start + 1];
            if self.list.iter().any(|s| s.name == letter) {
                return Err(self.error(IsaErrorKind::DuplicateExtension, &self.arch[start..]));
            }
            let rank = match extension::canonical_rank(c) {
                Some(r) => r,
                None => {
                    return Err(self.error(IsaErrorKind::UnknownExtension, &self.arch[start..]))
                }
            };
            if rank < order {
                return Err(self.error(IsaErrorKind::OutOfOrder, &self.arch[start..]));
            }
            order = rank + 1;
            self.pos += 1;
            let v = self.version(true)?;
            self.push(letter, v);
        }
        Ok(())
    }

    fn prefixed(&mut self) -> Result<(), IsaError> {
        for class in PREFIX_ORDER {
            let Some(prefix) = class.prefix() else {
                continue;
            };
            let mut last: Option<&'a str> = None;
            while self.peek() == Some(prefix as u8) {
                let start = self.pos;
                let len = self.bytes[start..]
                    .iter()
                    .position(|b| *b == b'_' || b.is_ascii_digit())
                    .unwrap_or(self.bytes.len() - start);
                let name = &self.arch[start..start + len];
                if !class.accepts(name) {
                    return Err(self.error(IsaErrorKind::UnknownExtension, name));
                }
                if self.list.iter().any(|s| s.name == name) {
                    return Err(self.error(IsaErrorKind::DuplicateExtension, name));
                }
                if last.is_some_and(|prev| prev > name) {
                    return Err(self.error(IsaErrorKind::OutOfOrder, name));
                }
                self.pos += len;
                let v = self.version(false)?;
                self.push(name, v);
                last = Some(name);

                match self.peek() {
                    None => return Ok(()),
                    Some(b'_') => self.pos += 1,
                    Some(_) => {
                        let rest = self.rest();
                        return Err(self.error(IsaErrorKind::MissingSeparator, rest));
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse `<major>[p<minor>]`. `None` means no version was written.
    ///
    /// For standard letters a `p` without a following digit is left for the
    /// next subset (`p` is itself an extension letter).
    fn version(&mut self, std_ext: bool) -> Result<Option<(u32, u32)>, IsaError> {
        let start = self.pos;
        let major = self.number()?;
        let mut minor = None;
        if self.peek() == Some(b'p') {
            let next_is_digit = self
                .bytes
                .get(self.pos + 1)
                .is_some_and(u8::is_ascii_digit);
            if next_is_digit && major.is_some() {
                self.pos += 1;
                minor = self.number()?;
            } else if !std_ext {
                let rest = &self.arch[start..];
                return Err(self.error(IsaErrorKind::InvalidVersion, rest));
            }
        }
        Ok(match (major, minor) {
            (None, _) => None,
            (Some(0), None | Some(0)) => None,
            (Some(major), minor) => Some((major, minor.unwrap_or(0))),
        })
    }

    fn number(&mut self) -> Result<Option<u32>, IsaError> {
        let start = self.pos;
        let mut value: Option<u32> = None;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            let digit = u32::from(b - b'0');
            value = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .map(Some)
                .ok_or_else(|| self.error(IsaErrorKind::InvalidVersion, &self.arch[start..]))?;
            self.pos += 1;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(arch: &str) -> Vec<String> {
        let (_, list) = SubsetList::parse_default(arch).unwrap();
        list.iter().map(|s| s.name.clone()).collect()
    }

    fn kind(arch: &str) -> IsaErrorKind {
        SubsetList::parse_default(arch).unwrap_err().kind
    }

    #[test]
    fn canonicalize_imc() {
        let (xlen, list) = SubsetList::parse_default("rv64imc").unwrap();
        assert_eq!(xlen, Xlen::Rv64);
        assert_eq!(names("rv64imc"), ["i", "m", "c"]);
        assert_eq!(list.arch_string(xlen), "rv64i2p0_m2p0_c2p0");
    }

    #[test]
    fn rv32e_implies_i() {
        assert_eq!(names("rv32e"), ["e", "i"]);
        let (xlen, list) = SubsetList::parse_default("rv32e").unwrap();
        assert_eq!(list.arch_string(xlen), "rv32e1p9_i2p0");
        assert!(list.is_rve());
    }

    #[test]
    fn rv32e_rejects_f() {
        assert_eq!(kind("rv32ef"), IsaErrorKind::Rv32eOnly);
        assert_eq!(kind("rv64e"), IsaErrorKind::Rv32eOnly);
    }

    #[test]
    fn g_expands_to_mafd() {
        assert_eq!(names("rv64g"), ["i", "m", "a", "f", "d"]);
        assert_eq!(names("rv64gq"), ["i", "m", "a", "f", "d", "q"]);
        assert_eq!(names("rv64gc"), ["i", "m", "a", "f", "d", "c"]);
    }

    #[test]
    fn g_version_applies_to_bundle() {
        let (_, list) = SubsetList::parse_default("rv64g3p1").unwrap();
        assert!(list.iter().all(|s| s.major == 3 && s.minor == 1));
    }

    #[test]
    fn companions() {
        assert_eq!(
            kind("rv32id"),
            IsaErrorKind::MissingCompanion {
                requires: "f".into()
            }
        );
        assert_eq!(
            kind("rv64ifq"),
            IsaErrorKind::MissingCompanion {
                requires: "d".into()
            }
        );
        assert_eq!(kind("rv32ifdq"), IsaErrorKind::WidthIncompatible);
    }

    #[test]
    fn base_errors() {
        assert_eq!(kind("rv16i"), IsaErrorKind::MalformedBase);
        assert_eq!(kind("rv64"), IsaErrorKind::InvalidFirst);
        assert_eq!(kind("rv64m"), IsaErrorKind::InvalidFirst);
        assert_eq!(kind("RV64I"), IsaErrorKind::Uppercase);
    }

    #[test]
    fn standard_order() {
        let err = SubsetList::parse_default("rv32icm").unwrap_err();
        assert_eq!(err.kind, IsaErrorKind::OutOfOrder);
        assert_eq!(err.offending, "m");
        assert_eq!(err.arch, "rv32icm");
        assert_eq!(kind("rv32imm"), IsaErrorKind::DuplicateExtension);
        assert_eq!(kind("rv32iy"), IsaErrorKind::UnknownExtension);
        assert_eq!(kind("rv32ii"), IsaErrorKind::DuplicateExtension);
    }

    #[test]
    fn underscores_between_letters() {
        assert_eq!(names("rv32i_m_a"), ["i", "m", "a"]);
    }

    #[test]
    fn explicit_versions() {
        let (xlen, list) = SubsetList::parse_default("rv32i2p1m3").unwrap();
        assert_eq!(list.get("i"), Some(&Subset::new("i", 2, 1)));
        assert_eq!(list.get("m"), Some(&Subset::new("m", 3, 0)));
        assert_eq!(list.arch_string(xlen), "rv32i2p1_m3p0");
    }

    #[test]
    fn p_after_version_starts_packed_extension() {
        assert_eq!(names("rv32i2p"), ["i", "p"]);
        assert_eq!(names("rv32ip"), ["i", "p"]);
    }

    #[test]
    fn prefixed_extensions() {
        assert_eq!(
            names("rv64i_zicsr_zifencei_xfoo"),
            ["i", "zicsr", "zifencei", "xfoo"]
        );
        assert_eq!(names("rv64i_svinval_zba"), ["i", "svinval", "zba"]);
        assert_eq!(names("rv32izicsr"), ["i", "zicsr"]);
    }

    #[test]
    fn prefixed_errors() {
        assert_eq!(kind("rv64i_zifencei_zicsr"), IsaErrorKind::OutOfOrder);
        assert_eq!(kind("rv64i_zicsr_zicsr"), IsaErrorKind::DuplicateExtension);
        assert_eq!(kind("rv64i_zfoo"), IsaErrorKind::UnknownExtension);
        assert_eq!(kind("rv64i_x"), IsaErrorKind::UnknownExtension);
        assert_eq!(kind("rv64i_zicsr_svinval"), IsaErrorKind::OutOfOrder);
        assert_eq!(kind("rv64i_zicsrp"), IsaErrorKind::UnknownExtension);
        assert_eq!(kind("rv64i_xfoo2p"), IsaErrorKind::InvalidVersion);
        assert_eq!(kind("rv64i_xfoo2.0"), IsaErrorKind::MissingSeparator);
    }

    #[test]
    fn unknown_versions_default_to_zero() {
        let (xlen, list) = SubsetList::parse_default("rv32i_xbar").unwrap();
        assert_eq!(list.arch_string(xlen), "rv32i2p0_xbar0p0");
    }

    #[test]
    fn custom_defaults() {
        let lookup = |name: &str| if name == "m" { Some((9, 9)) } else { Some((1, 1)) };
        let (xlen, list) = SubsetList::parse("rv32im", &lookup).unwrap();
        assert_eq!(list.arch_string(xlen), "rv32i1p1_m9p9");
    }

    #[test]
    fn canonical_round_trip() {
        for arch in ["rv64gc", "rv32e", "rv32emc", "rv64imafdqc_zicsr_xfoo2p3"] {
            let (xlen, list) = SubsetList::parse_default(arch).unwrap();
            let canon = list.arch_string(xlen);
            let (xlen2, again) = SubsetList::parse_default(&canon).unwrap();
            assert_eq!(xlen, xlen2);
            assert_eq!(list, again, "{canon}");
        }
    }

    #[test]
    fn float_abi() {
        let abi = |arch| SubsetList::parse_default(arch).unwrap().1.float_abi();
        assert_eq!(abi("rv64imac"), FloatAbi::Soft);
        assert_eq!(abi("rv32imf"), FloatAbi::Soft);
        assert_eq!(abi("rv64gc"), FloatAbi::Double);
        assert_eq!(abi("rv64gqc"), FloatAbi::Quad);
    }
}
