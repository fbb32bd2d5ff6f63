//! Output stream and layout driver.
//!
//! The stream collects fixed bytes, relaxable branches and symbol
//! definitions. [`OutputStream::layout`] sizes every branch (estimate, then
//! tighten until no length changes), emits the final bytes and lists the
//! relocations an object writer would need.

use std::collections::BTreeMap;

use crate::error::{AsmError, InternalError};
use crate::expr::Expr;
use crate::reloc::{self, RelocKind};
use crate::relax::{FragHandle, RelaxArena};

/// Maximum number of tighten passes before giving up.
const MAX_RELAXATION_ITERS: usize = 100;

// ── Public types ────────────────────────────────────────────────────────

/// A relocation request attached to an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fixup {
    pub kind: RelocKind,
    pub target: Expr,
    /// Emit an `R_RISCV_RELAX` companion.
    pub is_relaxable: bool,
}

/// Where an instruction landed: fragment index and byte offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub fragment: usize,
    pub offset: usize,
}

/// A relocation at its final position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedFixup {
    /// Byte offset in [`Layout::bytes`].
    pub offset: u64,
    pub kind: RelocKind,
    /// `None` for `R_RISCV_RELAX` and constant targets.
    pub symbol: Option<String>,
    pub addend: i64,
}

/// Final bytes, relocations and symbol addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    bytes: Vec<u8>,
    fixups: Vec<ResolvedFixup>,
    symbols: BTreeMap<String, u64>,
}

impl Layout {
    /// The encoded section contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Relocations left for the linker, in emission order.
    pub fn fixups(&self) -> &[ResolvedFixup] {
        &self.fixups
    }

    /// Every defined symbol and its final address.
    pub fn symbols(&self) -> &BTreeMap<String, u64> {
        &self.symbols
    }

    /// Address of a defined symbol.
    pub fn symbol(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }

    /// Consume the layout, keeping only the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// ── Fragments ───────────────────────────────────────────────────────────

/// A piece of the output stream.
#[derive(Debug, Clone)]
enum Fragment {
    /// Bytes whose size never changes, with fixups at fragment-relative
    /// offsets.
    Fixed {
        bytes: Vec<u8>,
        fixups: Vec<(usize, Fixup)>,
    },
    /// A branch sized by the relaxation arena.
    Relaxed { handle: FragHandle, relax: bool },
}

/// Accumulates assembled output for one section.
#[derive(Debug, Default)]
pub struct OutputStream {
    fragments: Vec<Fragment>,
    symbols: BTreeMap<String, Placement>,
    arena: RelaxArena,
}

impl OutputStream {
    /// An empty stream at address zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been appended.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The current end of the stream.
    pub fn position(&self) -> Placement {
        match self.fragments.last() {
            Some(Fragment::Fixed { bytes, .. }) => Placement {
                fragment: self.fragments.len() - 1,
                offset: bytes.len(),
            },
            _ => Placement {
                fragment: self.fragments.len(),
                offset: 0,
            },
        }
    }

    /// Append fixed bytes with an optional fixup on their first byte.
    pub fn append_fixed(&mut self, data: &[u8], fixup: Option<Fixup>) -> Placement {
        let at = self.position();
        if at.fragment == self.fragments.len() {
            self.fragments.push(Fragment::Fixed {
                bytes: Vec::with_capacity(64),
                fixups: Vec::new(),
            });
        }
        if let Some(Fragment::Fixed { bytes, fixups }) = self.fragments.last_mut() {
            bytes.extend_from_slice(data);
            if let Some(fixup) = fixup {
                fixups.push((at.offset, fixup));
            }
        }
        at
    }

    /// Append a branch whose size is decided at layout time.
    ///
    /// `kind` is the relocation the branch was matched with; `target` must
    /// be a symbol.
    pub fn append_relaxed(
        &mut self,
        insn: u64,
        kind: RelocKind,
        target: &Expr,
        relax: bool,
    ) -> Result<(Placement, FragHandle), AsmError> {
        let Expr::Symbol { name, addend } = target else {
            return Err(InternalError::Unreachable(format!(
                "relaxed branch against non-symbol `{target}'"
            ))
            .into());
        };
        let handle = self.arena.create(insn, kind, name.as_str(), *addend)?;
        let at = Placement {
            fragment: self.fragments.len(),
            offset: 0,
        };
        self.fragments.push(Fragment::Relaxed { handle, relax });
        Ok((at, handle))
    }

    /// Define `name` at the current position.
    pub fn define_symbol(&mut self, name: &str) -> Result<Placement, AsmError> {
        if self.symbols.contains_key(name) {
            return Err(AsmError::DuplicateSymbol(name.into()));
        }
        let at = self.position();
        self.symbols.insert(name.into(), at);
        Ok(at)
    }

    /// Whether `name` has been defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// The relaxation frags created so far.
    pub fn arena(&self) -> &RelaxArena {
        &self.arena
    }

    // ── layout ─────────────────────────────────────────────

    /// Relax every branch to a fixed point, then produce the final bytes.
    pub fn layout(&mut self) -> Result<Layout, AsmError> {
        let mut offsets = Vec::with_capacity(self.fragments.len() + 1);

        for pass in 0..MAX_RELAXATION_ITERS {
            self.compute_offsets_into(&mut offsets);
            let mut changed = false;
            for (i, frag) in self.fragments.iter().enumerate() {
                if let Fragment::Relaxed { handle, .. } = frag {
                    let before = self.arena.estimate(*handle);
                    let distance = self.distance(*handle, offsets[i], &offsets);
                    let after = self.arena.tighten(*handle, distance)?;
                    changed |= after != before;
                }
            }
            if !changed {
                tracing::debug!(passes = pass + 1, frags = self.arena.len(), "layout converged");
                return self.emit_final(&offsets);
            }
        }

        Err(AsmError::RelaxationLimit {
            max: MAX_RELAXATION_ITERS,
        })
    }

    /// `offsets[i]` is the address of fragment `i`; the last entry is the
    /// end of the stream.
    fn compute_offsets_into(&self, offsets: &mut Vec<u64>) {
        offsets.clear();
        let mut current = 0u64;
        for frag in &self.fragments {
            offsets.push(current);
            current += match frag {
                Fragment::Fixed { bytes, .. } => bytes.len() as u64,
                Fragment::Relaxed { handle, .. } => u64::from(self.arena.estimate(*handle)),
            };
        }
        offsets.push(current);
    }

    fn address_of(&self, name: &str, offsets: &[u64]) -> Option<u64> {
        let at = self.symbols.get(name)?;
        offsets.get(at.fragment).map(|base| base + at.offset as u64)
    }

    /// Byte distance from `from` to a frag's target, when the target is
    /// defined in this stream.
    fn distance(&self, handle: FragHandle, from: u64, offsets: &[u64]) -> Option<i64> {
        let frag = self.arena.get(handle)?;
        let target = self.address_of(&frag.target, offsets)?;
        Some((target as i64).wrapping_add(frag.offset).wrapping_sub(from as i64))
    }

    fn emit_final(&mut self, offsets: &[u64]) -> Result<Layout, AsmError> {
        let total = offsets.last().copied().unwrap_or(0) as usize;
        let mut bytes = Vec::with_capacity(total);
        let mut pending: Vec<(u64, Fixup)> = Vec::new();

        for (i, frag) in self.fragments.iter().enumerate() {
            let base = offsets[i];
            match frag {
                Fragment::Fixed {
                    bytes: data,
                    fixups,
                } => {
                    bytes.extend_from_slice(data);
                    pending.extend(
                        fixups
                            .iter()
                            .map(|(off, fixup)| (base + *off as u64, fixup.clone())),
                    );
                }
                Fragment::Relaxed { handle, relax } => {
                    let distance = self.distance(*handle, base, offsets);
                    let out = self.arena.emit(*handle, distance)?;
                    let target = self
                        .arena
                        .get(*handle)
                        .map(|f| Expr::Symbol {
                            name: f.target.clone(),
                            addend: f.offset,
                        })
                        .ok_or_else(|| InternalError::Unreachable("frag vanished".into()))?;
                    bytes.extend_from_slice(&out.bytes);
                    pending.push((
                        base + out.fixup_offset as u64,
                        Fixup {
                            kind: out.kind,
                            target,
                            is_relaxable: reloc::is_relaxable(out.kind, *relax),
                        },
                    ));
                }
            }
        }

        let mut fixups = Vec::with_capacity(pending.len());
        for (offset, fixup) in pending {
            let (symbol, addend) = match fixup.target {
                Expr::Symbol { name, addend } => {
                    if let Some(target) = self.address_of(&name, offsets) {
                        let delta = (target as i64)
                            .wrapping_add(addend)
                            .wrapping_sub(offset as i64);
                        patch_pc_relative(&mut bytes, offset as usize, fixup.kind, delta);
                    }
                    (Some(name), addend)
                }
                Expr::Constant(v) => (None, v),
                Expr::Register(name) => {
                    return Err(InternalError::Unreachable(format!(
                        "fixup against register `{name}'"
                    ))
                    .into())
                }
            };
            fixups.push(ResolvedFixup {
                offset,
                kind: fixup.kind,
                symbol,
                addend,
            });
            if fixup.is_relaxable {
                fixups.push(ResolvedFixup {
                    offset,
                    kind: RelocKind::Relax,
                    symbol: None,
                    addend: 0,
                });
            }
        }

        let symbols = self
            .symbols
            .keys()
            .filter_map(|name| Some((name.clone(), self.address_of(name, offsets)?)))
            .collect();

        Ok(Layout {
            bytes,
            fixups,
            symbols,
        })
    }
}

/// Fill a branch or jump field with its tentative in-section value.
fn patch_pc_relative(bytes: &mut [u8], offset: usize, kind: RelocKind, delta: i64) {
    let Some(field) = reloc::encode_field(kind, delta) else {
        return;
    };
    let size = usize::from(kind.descriptor().size);
    let Some(slot) = bytes.get_mut(offset..offset + size) else {
        return;
    };
    let mut word = [0u8; 8];
    word[..size].copy_from_slice(slot);
    let patched = u64::from_le_bytes(word) | field;
    slot.copy_from_slice(&patched.to_le_bytes()[..size]);
}
