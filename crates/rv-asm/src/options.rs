//! Session configuration and the `.option` state.

use std::collections::BTreeMap;

use crate::extension;
use crate::subset::{FloatAbi, Xlen};

/// Flags toggled by `.option` and saved by `.option push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// Compressed encodings may be produced.
    pub rvc: bool,
    /// Position-independent address loads (`la` through the GOT).
    pub pic: bool,
    /// Emit `R_RISCV_RELAX` companions for linker relaxation.
    pub relax: bool,
    /// Record the canonical ISA string as an attribute.
    pub arch_attr: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rvc: false,
            pic: false,
            relax: true,
            arch_attr: false,
        }
    }
}

/// Start-up configuration for an [`AssemblerSession`](crate::AssemblerSession).
///
/// # Examples
///
/// ```
/// use rv_asm::{SessionConfig, Xlen};
///
/// let mut config = SessionConfig::new("rv32imac");
/// config.pic(true).relax(false).abi_xlen(Xlen::Rv32);
/// assert_eq!(config.arch_name(), "rv32imac");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    arch: String,
    pic: bool,
    relax: bool,
    arch_attr: bool,
    abi_xlen: Option<Xlen>,
    float_abi: Option<FloatAbi>,
    default_versions: BTreeMap<String, (u32, u32)>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("rv64gc")
    }
}

impl SessionConfig {
    /// A configuration for the given ISA string with default options.
    pub fn new(arch: &str) -> Self {
        Self {
            arch: arch.into(),
            pic: false,
            relax: true,
            arch_attr: false,
            abi_xlen: None,
            float_abi: None,
            default_versions: BTreeMap::new(),
        }
    }

    /// Replace the ISA string.
    pub fn arch(&mut self, arch: &str) -> &mut Self {
        self.arch = arch.into();
        self
    }

    pub fn pic(&mut self, on: bool) -> &mut Self {
        self.pic = on;
        self
    }

    pub fn relax(&mut self, on: bool) -> &mut Self {
        self.relax = on;
        self
    }

    pub fn arch_attr(&mut self, on: bool) -> &mut Self {
        self.arch_attr = on;
        self
    }

    /// Pointer width of the ABI. Must match the ISA width.
    pub fn abi_xlen(&mut self, xlen: Xlen) -> &mut Self {
        self.abi_xlen = Some(xlen);
        self
    }

    /// Float ABI recorded in the ELF flags. Inferred from the ISA when unset.
    pub fn float_abi(&mut self, abi: FloatAbi) -> &mut Self {
        self.float_abi = Some(abi);
        self
    }

    /// Version assumed for `name` when the ISA string omits one.
    pub fn default_version(&mut self, name: &str, major: u32, minor: u32) -> &mut Self {
        self.default_versions.insert(name.into(), (major, minor));
        self
    }

    pub fn arch_name(&self) -> &str {
        &self.arch
    }

    pub fn abi_xlen_value(&self) -> Option<Xlen> {
        self.abi_xlen
    }

    pub fn float_abi_value(&self) -> Option<FloatAbi> {
        self.float_abi
    }

    /// Default version for `name`: the override if one was given, else the
    /// extension catalog.
    pub fn version_for(&self, name: &str) -> Option<(u32, u32)> {
        self.default_versions
            .get(name)
            .copied()
            .or_else(|| extension::default_version(name))
    }

    /// Initial `.option` state. `rvc` is settled once the ISA is known.
    pub fn initial_options(&self) -> Options {
        Options {
            rvc: false,
            pic: self.pic,
            relax: self.relax,
            arch_attr: self.arch_attr,
        }
    }
}
