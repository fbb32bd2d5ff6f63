//! Property-based tests using proptest.
//!
//! These tests check encoder, ISA parser and relaxation invariants across
//! randomly generated inputs, complementing the targeted unit and
//! integration tests and the libfuzzer targets.

use proptest::prelude::*;

use rv_asm::{
    assemble, BasicEvaluator, Encoder, MatchContext, OperandKind, RelaxArena, RelocKind,
    SubsetList,
};

// ── Strategies ──────────────────────────────────────────────────────────

/// Arbitrary printable ASCII, newlines included.
fn arb_asm_input() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range(' ', '\x7f'), 0..128)
        .prop_map(|v| v.into_iter().collect())
}

fn gpr() -> impl Strategy<Value = u32> {
    0u32..32
}

fn imm12() -> impl Strategy<Value = i64> {
    -2048i64..2048
}

/// ISA strings assembled from valid pieces, in canonical order or not.
fn arb_isa() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["rv32i", "rv64i", "rv32e", "rv64g", "rv32g"]),
        prop::collection::vec(prop::sample::select(vec!["m", "a", "f", "d", "q", "c"]), 0..4),
        prop::collection::vec(
            prop::sample::select(vec!["_zicsr", "_zifencei", "_zba", "_xfoo", "_svinval"]),
            0..3,
        ),
    )
        .prop_map(|(base, std, prefixed)| format!("{base}{}{}", std.concat(), prefixed.concat()))
}

fn encode(arch: &str, mnemonic: &str, operands: &str) -> u64 {
    let (xlen, subsets) = SubsetList::parse_default(arch).unwrap();
    let ctx = MatchContext {
        subsets: &subsets,
        xlen,
        rvc: false,
        rve: subsets.is_rve(),
        allow_compressed: false,
        evaluator: &BasicEvaluator,
    };
    Encoder::new()
        .unwrap()
        .encode(mnemonic, operands, &ctx)
        .unwrap()
        .bits
}

// ── Round trips ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn i_type_fields_round_trip(rd in gpr(), rs1 in gpr(), imm in imm12()) {
        let bits = encode("rv64i", "addi", &format!("x{rd}, x{rs1}, {imm}"));
        prop_assert_eq!(OperandKind::Rd.extract(bits), Some(i64::from(rd)));
        prop_assert_eq!(OperandKind::Rs1.extract(bits), Some(i64::from(rs1)));
        prop_assert_eq!(OperandKind::ImmI.extract(bits), Some(imm));
    }

    #[test]
    fn load_offset_round_trip(rd in gpr(), rs1 in gpr(), imm in imm12()) {
        let bits = encode("rv32i", "lw", &format!("x{rd}, {imm}(x{rs1})"));
        prop_assert_eq!(OperandKind::LoadOffset.extract(bits), Some(imm));
        prop_assert_eq!(OperandKind::Rs1.extract(bits), Some(i64::from(rs1)));
    }

    #[test]
    fn store_offset_round_trip(rs2 in gpr(), rs1 in gpr(), imm in imm12()) {
        let bits = encode("rv64i", "sd", &format!("x{rs2}, {imm}(x{rs1})"));
        prop_assert_eq!(OperandKind::StoreOffset.extract(bits), Some(imm));
        prop_assert_eq!(OperandKind::Rs2.extract(bits), Some(i64::from(rs2)));
        prop_assert_eq!(OperandKind::Rs1.extract(bits), Some(i64::from(rs1)));
    }

    #[test]
    fn upper_immediate_round_trip(rd in gpr(), imm in 0i64..=0xfffff) {
        let bits = encode("rv32i", "lui", &format!("x{rd}, {imm}"));
        // The field decodes as the sign-extended upper 20 bits.
        let expected = i64::from(((imm as i32) << 12) >> 12);
        prop_assert_eq!(OperandKind::Upper.extract(bits), Some(expected));
        prop_assert_eq!(OperandKind::Upper.extract(bits).map(|v| v & 0xfffff), Some(imm));
    }

    #[test]
    fn shift_amount_round_trip(rd in gpr(), sh in 0i64..64) {
        let bits = encode("rv64i", "srai", &format!("x{rd}, x{rd}, {sh}"));
        prop_assert_eq!(OperandKind::Shamt.extract(bits), Some(sh));
    }

    #[test]
    fn r_type_round_trip(rd in gpr(), rs1 in gpr(), rs2 in gpr()) {
        let bits = encode("rv32i", "sub", &format!("x{rd}, x{rs1}, x{rs2}"));
        prop_assert_eq!(OperandKind::Rd.extract(bits), Some(i64::from(rd)));
        prop_assert_eq!(OperandKind::Rs1.extract(bits), Some(i64::from(rs1)));
        prop_assert_eq!(OperandKind::Rs2.extract(bits), Some(i64::from(rs2)));
    }
}

// ── ISA strings ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn canonical_isa_is_idempotent(arch in arb_isa()) {
        if let Ok((xlen, list)) = SubsetList::parse_default(&arch) {
            let canon = list.arch_string(xlen);
            let (xlen2, again) = SubsetList::parse_default(&canon).unwrap();
            prop_assert_eq!(xlen, xlen2);
            prop_assert_eq!(&list, &again);
            prop_assert_eq!(again.arch_string(xlen2), canon);
        }
    }

    #[test]
    fn isa_parser_never_panics(arch in "[a-z0-9_]{0,24}") {
        let _ = SubsetList::parse_default(&arch);
    }
}

// ── Relaxation ──────────────────────────────────────────────────────────

/// A branch kind with a matching encoding: beq a0,a1 / jal x0 / c.beqz a0 / c.j.
fn arb_branch() -> impl Strategy<Value = (RelocKind, u64)> {
    prop::sample::select(vec![
        (RelocKind::Branch, 0x00b5_0063),
        (RelocKind::Jal, 0x0000_006f),
        (RelocKind::RvcBranch, 0xc101),
        (RelocKind::RvcJump, 0xa001),
    ])
}

proptest! {
    #[test]
    fn relaxation_is_monotonic(
        (kind, insn) in arb_branch(),
        distances in prop::collection::vec(prop::option::of(-10_000i64..10_000), 1..16),
    ) {
        let mut arena = RelaxArena::new();
        let h = arena.create(insn, kind, "t", 0).unwrap();
        let mut previous = arena.estimate(h);
        for d in distances {
            let length = arena.tighten(h, d).unwrap();
            prop_assert!(length <= previous);
            prop_assert!(matches!(length, 2 | 4 | 6 | 8));
            previous = length;
        }
        // A second pass with the same input changes nothing.
        prop_assert_eq!(arena.tighten(h, Some(0)).unwrap(), arena.tighten(h, Some(0)).unwrap());
    }

    #[test]
    fn emitted_length_matches_commitment((kind, insn) in arb_branch(), d in -3000i64..3000) {
        let mut arena = RelaxArena::new();
        let h = arena.create(insn, kind, "t", 0).unwrap();
        let length = arena.tighten(h, Some(d & !1)).unwrap();
        let out = arena.emit(h, Some(d & !1)).unwrap();
        prop_assert_eq!(out.bytes.len(), usize::from(length));
    }
}

// ── Robustness ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn assembler_never_panics(input in arb_asm_input()) {
        let _ = assemble(&input, "rv64gc");
        let _ = assemble(&input, "rv32e");
    }
}
