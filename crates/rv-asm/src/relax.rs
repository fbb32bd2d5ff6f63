//! Branch and jump relaxation.
//!
//! A branch or jump with a symbolic target does not get fixed bytes when it
//! is assembled. It becomes a [`RelaxationFrag`] in a [`RelaxArena`] and the
//! layout driver picks its final size:
//!
//! ```text
//! 2  c.beqz/c.bnez/c.j/c.jal           RVC_BRANCH / RVC_JUMP
//! 4  beq.../jal                         BRANCH / JAL
//! 6  c.bnez rs1', +6 ; jal x0, target   JAL at +2
//! 8  bne rs1, rs2, +8 ; jal x0, target  JAL at +4
//! ```
//!
//! Lengths only ever shrink, so the layout fixed point terminates.

use crate::error::InternalError;
use crate::opcodes::{
    MASK_CQ, MATCH_BEQ, MATCH_BNE, MATCH_C_BEQZ, MATCH_C_BNEZ, MATCH_C_J, MATCH_C_JAL, MATCH_JAL,
    X_RA,
};
use crate::operand::{B_IMM, CRS1S, C_B_IMM, RD, RS1};
use crate::reloc::RelocKind;

/// Total span of a compressed branch (±256 bytes).
pub const RVC_BRANCH_REACH: i64 = 1 << 9;
/// Total span of a compressed jump (±2 KiB).
pub const RVC_JUMP_REACH: i64 = 1 << 12;
/// Total span of a standard conditional branch (±4 KiB).
pub const BRANCH_REACH: i64 = 1 << 13;

fn within(distance: i64, reach: i64) -> bool {
    (-reach / 2..reach / 2).contains(&distance)
}

// ── Frag model ──────────────────────────────────────────────────────────

/// Index of a frag in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragHandle(u32);

impl FragHandle {
    /// Position of the frag in creation order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shape of a relaxable branch and its currently chosen length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtype {
    /// `jal`/`c.j`/`c.jal` rather than a conditional branch.
    pub is_unconditional: bool,
    /// The instruction was matched in its compressed form.
    pub rvc_eligible: bool,
    /// Committed length in bytes: 2, 4, 6 or 8.
    pub length: u8,
}

impl Subtype {
    /// The length a target `distance` bytes away calls for. `None` means the
    /// distance cannot be known at assembly time.
    pub fn length_for(&self, distance: Option<i64>) -> u8 {
        let base = if self.is_unconditional { 4 } else { 8 };
        let Some(d) = distance else {
            return base;
        };
        let rvc_reach = if self.is_unconditional {
            RVC_JUMP_REACH
        } else {
            RVC_BRANCH_REACH
        };
        if self.rvc_eligible && within(d, rvc_reach) {
            2
        } else if within(d, BRANCH_REACH) {
            4
        } else if !self.is_unconditional && self.rvc_eligible {
            6
        } else {
            base
        }
    }

    /// Whether `length` bytes still reach a target `distance` bytes away.
    pub fn reaches(&self, length: u8, distance: Option<i64>) -> bool {
        match (length, distance) {
            (2, Some(_)) | (4, Some(_)) => self.length_for(distance) <= length,
            (4, None) => self.is_unconditional,
            (6, _) => self.rvc_eligible && !self.is_unconditional,
            (8, _) => !self.is_unconditional,
            _ => false,
        }
    }
}

/// Lifecycle of a frag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragState {
    /// Space reserved at the worst-case length.
    Unresolved,
    /// Tightened at least once.
    Resolved,
    /// Bytes produced; the length is final.
    Emitted,
}

/// A branch or jump whose length depends on layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxationFrag {
    pub subtype: Subtype,
    pub target: String,
    pub offset: i64,
    /// The instruction as matched, with a zero offset field.
    pub insn: u64,
    pub state: FragState,
}

/// Bytes synthesized for a frag plus the one fixup they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedBranch {
    pub bytes: Vec<u8>,
    /// Byte offset of the relocated instruction within `bytes`.
    pub fixup_offset: usize,
    pub kind: RelocKind,
}

// ── Arena ───────────────────────────────────────────────────────────────

/// Owner of every relaxation frag of a session.
#[derive(Debug, Default)]
pub struct RelaxArena {
    frags: Vec<RelaxationFrag>,
}

impl RelaxArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a branch matched with relocation `kind` against
    /// `target + offset`.
    pub fn create(
        &mut self,
        insn: u64,
        kind: RelocKind,
        target: impl Into<String>,
        offset: i64,
    ) -> Result<FragHandle, InternalError> {
        let (is_unconditional, rvc_eligible) = match kind {
            RelocKind::Branch => (false, false),
            RelocKind::Jal => (true, false),
            RelocKind::RvcBranch => (false, true),
            RelocKind::RvcJump => (true, true),
            other => {
                return Err(InternalError::Unreachable(format!(
                    "{other} is not a relaxable branch"
                )))
            }
        };
        let handle = FragHandle(self.frags.len() as u32);
        self.frags.push(RelaxationFrag {
            subtype: Subtype {
                is_unconditional,
                rvc_eligible,
                length: 8,
            },
            target: target.into(),
            offset,
            insn,
            state: FragState::Unresolved,
        });
        Ok(handle)
    }

    /// The frag behind `handle`, if it belongs to this arena.
    pub fn get(&self, handle: FragHandle) -> Option<&RelaxationFrag> {
        self.frags.get(handle.index())
    }

    fn frag_mut(&mut self, handle: FragHandle) -> Result<&mut RelaxationFrag, InternalError> {
        self.frags
            .get_mut(handle.index())
            .ok_or_else(|| InternalError::Unreachable(format!("no frag {}", handle.0)))
    }

    /// Number of frags created.
    pub fn len(&self) -> usize {
        self.frags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frags.is_empty()
    }

    /// Worst-case length used to reserve space before any layout pass.
    pub fn estimate(&self, handle: FragHandle) -> u8 {
        self.get(handle).map_or(8, |f| f.subtype.length)
    }

    /// Recompute the length for a target `distance` bytes away. The result
    /// never exceeds the previous length. Emitted frags are left alone.
    pub fn tighten(
        &mut self,
        handle: FragHandle,
        distance: Option<i64>,
    ) -> Result<u8, InternalError> {
        let frag = self.frag_mut(handle)?;
        if frag.state == FragState::Emitted {
            return Ok(frag.subtype.length);
        }
        let length = frag.subtype.length_for(distance).min(frag.subtype.length);
        if length != frag.subtype.length {
            tracing::debug!(
                symbol = %frag.target,
                from = frag.subtype.length,
                to = length,
                ?distance,
                "branch relaxed"
            );
        }
        frag.subtype.length = length;
        frag.state = FragState::Resolved;
        Ok(length)
    }

    /// Produce the final bytes for the committed length.
    pub fn emit(
        &mut self,
        handle: FragHandle,
        distance: Option<i64>,
    ) -> Result<EmittedBranch, InternalError> {
        let frag = self.frag_mut(handle)?;
        let subtype = frag.subtype;
        let mismatch = InternalError::RelaxationMismatch {
            length: subtype.length,
            distance,
        };
        if frag.state == FragState::Unresolved || !subtype.reaches(subtype.length, distance) {
            return Err(mismatch);
        }

        let mut insn = frag.insn;
        let mut bytes = Vec::with_capacity(usize::from(subtype.length));

        if subtype.rvc_eligible {
            match subtype.length {
                2 => {
                    frag.state = FragState::Emitted;
                    let kind = if subtype.is_unconditional {
                        RelocKind::RvcJump
                    } else {
                        RelocKind::RvcBranch
                    };
                    return Ok(EmittedBranch {
                        bytes: (insn as u16).to_le_bytes().to_vec(),
                        fixup_offset: 0,
                        kind,
                    });
                }
                6 => {
                    insn ^= MATCH_C_BEQZ ^ MATCH_C_BNEZ;
                    insn |= C_B_IMM.encode(6);
                    bytes.extend_from_slice(&(insn as u16).to_le_bytes());
                    bytes.extend_from_slice(&(MATCH_JAL as u32).to_le_bytes());
                    frag.state = FragState::Emitted;
                    return Ok(EmittedBranch {
                        bytes,
                        fixup_offset: 2,
                        kind: RelocKind::Jal,
                    });
                }
                _ => insn = expand_compressed(insn)?,
            }
        }

        let emitted = match subtype.length {
            8 => {
                insn ^= MATCH_BEQ ^ MATCH_BNE;
                insn |= B_IMM.encode(8);
                bytes.extend_from_slice(&(insn as u32).to_le_bytes());
                bytes.extend_from_slice(&(MATCH_JAL as u32).to_le_bytes());
                EmittedBranch {
                    bytes,
                    fixup_offset: 4,
                    kind: RelocKind::Jal,
                }
            }
            4 => {
                bytes.extend_from_slice(&(insn as u32).to_le_bytes());
                let kind = if subtype.is_unconditional {
                    RelocKind::Jal
                } else {
                    RelocKind::Branch
                };
                EmittedBranch {
                    bytes,
                    fixup_offset: 0,
                    kind,
                }
            }
            _ => return Err(mismatch),
        };
        frag.state = FragState::Emitted;
        Ok(emitted)
    }

    /// All frags with their handles, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (FragHandle, &RelaxationFrag)> {
        self.frags
            .iter()
            .enumerate()
            .map(|(i, f)| (FragHandle(i as u32), f))
    }
}

/// The 32-bit equivalent of a compressed branch or jump.
fn expand_compressed(insn: u64) -> Result<u64, InternalError> {
    let rs1 = 8 + CRS1S.extract(insn);
    Ok(match insn & MASK_CQ {
        MATCH_C_J => MATCH_JAL,
        MATCH_C_JAL => RD.insert(MATCH_JAL, X_RA),
        MATCH_C_BEQZ => RS1.insert(MATCH_BEQ, rs1),
        MATCH_C_BNEZ => RS1.insert(MATCH_BNE, rs1),
        _ => {
            return Err(InternalError::Unreachable(format!(
                "{insn:#06x} is not a compressed branch"
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // beq a0, a1, <sym>
    const BEQ: u64 = 0x00b5_0063;
    // c.beqz a0, <sym>
    const C_BEQZ: u64 = 0xc101;
    // c.j <sym>
    const C_J: u64 = 0xa001;

    fn frag(insn: u64, kind: RelocKind) -> (RelaxArena, FragHandle) {
        let mut arena = RelaxArena::new();
        let h = arena.create(insn, kind, "target", 0).unwrap();
        (arena, h)
    }

    #[test]
    fn estimate_is_worst_case() {
        let (arena, h) = frag(BEQ, RelocKind::Branch);
        assert_eq!(arena.estimate(h), 8);
        assert_eq!(arena.get(h).unwrap().state, FragState::Unresolved);
    }

    #[test]
    fn handles_follow_creation_order() {
        let mut arena = RelaxArena::new();
        assert!(arena.is_empty());
        let first = arena.create(BEQ, RelocKind::Branch, "a", 0).unwrap();
        let second = arena.create(C_J, RelocKind::RvcJump, "b", 4).unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!((first.index(), second.index()), (0, 1));
        let targets: Vec<_> = arena.iter().map(|(h, f)| (h, f.target.as_str())).collect();
        assert_eq!(targets, vec![(first, "a"), (second, "b")]);
        assert!(arena.get(FragHandle(2)).is_none());
    }

    #[test]
    fn length_selection() {
        let branch = Subtype {
            is_unconditional: false,
            rvc_eligible: false,
            length: 8,
        };
        assert_eq!(branch.length_for(Some(3000)), 4);
        assert_eq!(branch.length_for(Some(-4096)), 4);
        assert_eq!(branch.length_for(Some(4096)), 8);
        assert_eq!(branch.length_for(None), 8);

        let c_branch = Subtype {
            rvc_eligible: true,
            ..branch
        };
        assert_eq!(c_branch.length_for(Some(254)), 2);
        assert_eq!(c_branch.length_for(Some(256)), 4);
        assert_eq!(c_branch.length_for(Some(-256)), 2);
        assert_eq!(c_branch.length_for(Some(10_000)), 6);

        let c_jump = Subtype {
            is_unconditional: true,
            rvc_eligible: true,
            length: 8,
        };
        assert_eq!(c_jump.length_for(Some(2046)), 2);
        assert_eq!(c_jump.length_for(Some(2048)), 4);
        assert_eq!(c_jump.length_for(Some(1 << 20)), 4);
        assert_eq!(c_jump.length_for(None), 4);
    }

    #[test]
    fn tighten_is_monotonic() {
        let (mut arena, h) = frag(C_BEQZ, RelocKind::RvcBranch);
        assert_eq!(arena.tighten(h, Some(100)).unwrap(), 2);
        // a later, longer distance does not grow the frag
        assert_eq!(arena.tighten(h, Some(10_000)).unwrap(), 2);
        assert_eq!(arena.get(h).unwrap().state, FragState::Resolved);
    }

    #[test]
    fn emit_unresolved_is_fatal() {
        let (mut arena, h) = frag(BEQ, RelocKind::Branch);
        assert_eq!(
            arena.emit(h, Some(8)),
            Err(InternalError::RelaxationMismatch {
                length: 8,
                distance: Some(8)
            })
        );
    }

    #[test]
    fn emit_detects_stale_length() {
        let (mut arena, h) = frag(C_BEQZ, RelocKind::RvcBranch);
        arena.tighten(h, Some(16)).unwrap();
        assert!(matches!(
            arena.emit(h, Some(1000)),
            Err(InternalError::RelaxationMismatch { length: 2, .. })
        ));
    }

    #[test]
    fn emit_compressed_and_standard() {
        let (mut arena, h) = frag(C_J, RelocKind::RvcJump);
        arena.tighten(h, Some(-20)).unwrap();
        let out = arena.emit(h, Some(-20)).unwrap();
        assert_eq!(out.bytes, vec![0x01, 0xa0]);
        assert_eq!(out.kind, RelocKind::RvcJump);

        let (mut arena, h) = frag(C_BEQZ, RelocKind::RvcBranch);
        arena.tighten(h, Some(1000)).unwrap();
        let out = arena.emit(h, Some(1000)).unwrap();
        // c.beqz a0 becomes beq a0, x0
        assert_eq!(out.bytes, 0x0005_0063u32.to_le_bytes().to_vec());
        assert_eq!((out.fixup_offset, out.kind), (0, RelocKind::Branch));
    }

    #[test]
    fn emit_long_forms() {
        let (mut arena, h) = frag(BEQ, RelocKind::Branch);
        arena.tighten(h, None).unwrap();
        let out = arena.emit(h, None).unwrap();
        // bne a0, a1, .+8 ; jal x0, target
        assert_eq!(&out.bytes[..4], &0x00b5_1463u32.to_le_bytes());
        assert_eq!(&out.bytes[4..], &0x0000_006fu32.to_le_bytes());
        assert_eq!((out.fixup_offset, out.kind), (4, RelocKind::Jal));

        let (mut arena, h) = frag(C_BEQZ, RelocKind::RvcBranch);
        arena.tighten(h, Some(100_000)).unwrap();
        let out = arena.emit(h, Some(100_000)).unwrap();
        // c.bnez a0, .+6 ; jal x0, target
        assert_eq!(&out.bytes[..2], &0xe119u16.to_le_bytes());
        assert_eq!(out.bytes.len(), 6);
        assert_eq!((out.fixup_offset, out.kind), (2, RelocKind::Jal));

        // emitted frags stay put
        assert_eq!(arena.tighten(h, Some(0)).unwrap(), 6);
    }

    #[test]
    fn only_branch_kinds_relax() {
        let mut arena = RelaxArena::new();
        assert!(arena.create(0, RelocKind::Hi20, "x", 0).is_err());
        assert!(arena.is_empty());
    }
}
