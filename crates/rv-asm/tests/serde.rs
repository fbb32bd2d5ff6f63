//! Serde round-trip tests for `rv_asm` public types.
//!
//! Validates that configuration, results and errors serialize to JSON and
//! deserialize back to identical values.

#![cfg(feature = "serde")]

use rv_asm::{
    assemble_layout, AsmError, Diagnostic, DirectiveError, Expr, FloatAbi, InternalError,
    IsaErrorKind, MacroKind, MacroStep, MatchError, Options, RegisterClass, RelocKind,
    SessionConfig, Severity, Subset, SubsetList, Xlen,
};

/// Helper: serialize to JSON, deserialize back, assert equality.
fn round_trip<T>(val: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + core::fmt::Debug,
{
    let json = serde_json::to_string(val).expect("serialize");
    let back: T = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(val, &back, "round-trip mismatch for JSON: {json}");
}

// ─── ISA ────────────────────────────────────────────────────────────────────

#[test]
fn serde_xlen_and_float_abi() {
    round_trip(&Xlen::Rv32);
    round_trip(&Xlen::Rv64);
    for abi in [FloatAbi::Soft, FloatAbi::Single, FloatAbi::Double, FloatAbi::Quad] {
        round_trip(&abi);
    }
}

#[test]
fn serde_subsets() {
    round_trip(&Subset::new("zicsr", 2, 0));
    let (_, list) = SubsetList::parse_default("rv64imafdc_zicsr_xfoo2p1").unwrap();
    round_trip(&list);
}

#[test]
fn serde_register_class() {
    for class in [
        RegisterClass::GeneralPurpose,
        RegisterClass::FloatingPoint,
        RegisterClass::ControlStatus,
    ] {
        round_trip(&class);
    }
}

// ─── Configuration ──────────────────────────────────────────────────────────

#[test]
fn serde_options() {
    round_trip(&Options::default());
    round_trip(&Options {
        rvc: true,
        pic: true,
        relax: false,
        arch_attr: true,
    });
}

#[test]
fn serde_session_config() {
    round_trip(&SessionConfig::default());
    let mut config = SessionConfig::new("rv32emc");
    config
        .pic(true)
        .abi_xlen(Xlen::Rv32)
        .float_abi(FloatAbi::Soft)
        .default_version("c", 2, 0);
    round_trip(&config);
}

// ─── Operands and relocations ───────────────────────────────────────────────

#[test]
fn serde_expr() {
    round_trip(&Expr::Constant(-2048));
    round_trip(&Expr::symbol("main"));
    round_trip(&Expr::Symbol {
        name: ".L1".into(),
        addend: 12,
    });
    round_trip(&Expr::Register("a0".into()));
}

#[test]
fn serde_reloc_kinds() {
    for kind in [
        RelocKind::None,
        RelocKind::Branch,
        RelocKind::Jal,
        RelocKind::CallPlt,
        RelocKind::PcrelHi20,
        RelocKind::Lo12S,
        RelocKind::RvcJump,
        RelocKind::Relax,
        RelocKind::Irelative,
    ] {
        round_trip(&kind);
    }
}

#[test]
fn serde_macro_steps() {
    round_trip(&MacroKind::LaTlsGd);
    round_trip(&MacroStep::Label(".Lpcrel_hi3".into()));
    round_trip(&MacroStep::Instr {
        mnemonic: "auipc".into(),
        operands: "a0, 0".into(),
        reloc: Some((RelocKind::PcrelHi20, Expr::symbol("msg"))),
    });
    round_trip(&MacroStep::Instr {
        mnemonic: "slli".into(),
        operands: "a0, a0, 12".into(),
        reloc: None,
    });
}

// ─── Results ────────────────────────────────────────────────────────────────

#[test]
fn serde_layout() {
    let layout = assemble_layout(
        "start: lla a0, msg\nbeq a0, zero, start\nmsg: nop",
        &SessionConfig::new("rv64gc"),
    )
    .unwrap();
    assert!(!layout.fixups().is_empty());
    round_trip(&layout);
    for fixup in layout.fixups() {
        round_trip(fixup);
    }
}

#[test]
fn serde_diagnostic() {
    round_trip(&Diagnostic::warning("odd", ".option bogus"));
    round_trip(&Diagnostic::error(
        &AsmError::Match(MatchError::UnknownMnemonic("frob".into())),
        "frob a0",
    ));
    round_trip(&Severity::Error);
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[test]
fn serde_errors() {
    let isa = SubsetList::parse_default("rv32ef").unwrap_err();
    assert_eq!(isa.kind, IsaErrorKind::Rv32eOnly);
    round_trip(&isa);
    round_trip(&IsaErrorKind::MissingCompanion {
        requires: "f".into(),
    });

    for err in [
        AsmError::Isa(isa),
        AsmError::Match(MatchError::OperandOutOfRange {
            what: "shift amount".into(),
            value: 40,
            min: 0,
            max: 31,
        }),
        AsmError::Match(MatchError::IllegalOperands {
            mnemonic: "add".into(),
            operands: "a0".into(),
        }),
        AsmError::Directive(DirectiveError::OptionStackEmpty),
        AsmError::Directive(DirectiveError::Malformed {
            directive: ".attribute".into(),
            detail: "expected a tag".into(),
        }),
        AsmError::Internal(InternalError::RelaxationMismatch {
            length: 2,
            distance: Some(4096),
        }),
        AsmError::DuplicateSymbol("loop".into()),
        AsmError::UndefinedLocalLabel("1b".into()),
        AsmError::RelaxationLimit { max: 64 },
    ] {
        round_trip(&err);
    }
}
