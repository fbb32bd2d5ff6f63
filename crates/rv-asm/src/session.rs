//! The assembler session: ISA state, `.option` stack and output stream.
//!
//! Every entry point goes through an [`AssemblerSession`]. There is no global
//! state; two sessions never see each other's options or symbols.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::encoder::{Encoder, MatchContext, Matched};
use crate::error::{
    AsmError, Diagnostic, DiagnosticSink, DirectiveError, InternalError, IsaError, Severity,
};
use crate::expr::{BasicEvaluator, Expr, ExprEvaluator};
use crate::layout::{Fixup, Layout, OutputStream, Placement};
use crate::names;
use crate::opcodes::TemplateKind;
use crate::options::{Options, SessionConfig};
use crate::pseudo::{Expander, MacroKind, MacroStep};
use crate::relax::FragHandle;
use crate::reloc::{self, RelocKind};
use crate::subset::{FloatAbi, SubsetList, Xlen};

/// ELF header flag: the object contains compressed instructions.
pub const EF_RISCV_RVC: u32 = 0x0001;
/// ELF header mask of the float ABI field.
pub const EF_RISCV_FLOAT_ABI: u32 = 0x0006;
pub const EF_RISCV_FLOAT_ABI_SOFT: u32 = 0x0000;
pub const EF_RISCV_FLOAT_ABI_SINGLE: u32 = 0x0002;
pub const EF_RISCV_FLOAT_ABI_DOUBLE: u32 = 0x0004;
pub const EF_RISCV_FLOAT_ABI_QUAD: u32 = 0x0006;
/// ELF header flag: the RV32E register file is used.
pub const EF_RISCV_RVE: u32 = 0x0008;

/// One instruction appended to the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInstruction {
    /// Mnemonic of the template that produced it.
    pub mnemonic: &'static str,
    /// The instruction word as matched. Branch offsets are still zero.
    pub bits: u64,
    /// Length in bytes. For a relaxed branch this is the matched form; the
    /// final size is decided at layout.
    pub length: usize,
    pub placement: Placement,
    pub fixup: Option<Fixup>,
    /// Set when the instruction became a relaxation frag.
    pub relaxed: Option<FragHandle>,
}

impl EncodedInstruction {
    /// Little-endian bytes of [`bits`](Self::bits).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_le_bytes()[..self.length].to_vec()
    }
}

fn is_branch(kind: RelocKind) -> bool {
    matches!(
        kind,
        RelocKind::Branch | RelocKind::Jal | RelocKind::RvcBranch | RelocKind::RvcJump
    )
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.find([' ', '\t']) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

fn is_symbol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$')
}

/// `N` of a numeric local label.
fn local_label_number(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Symbol standing for the `instance`-th definition of local label `N`.
fn local_label_name(number: u32, instance: u32) -> String {
    format!(".Llocal{number}_{instance}")
}

/// `name:` at the start of `line`, with the text after the colon. `name` is
/// a symbol or the number of a local label.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let name = line[..colon].trim_end();
    let valid = local_label_number(name).is_some()
        || (!name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name.bytes().all(is_symbol_byte));
    valid.then(|| (name, line[colon + 1..].trim_start()))
}

/// A single-threaded assembler context.
///
/// # Examples
///
/// ```
/// use rv_asm::{AssemblerSession, SessionConfig};
///
/// let mut session = AssemblerSession::new(&SessionConfig::new("rv64gc"))?;
/// let out = session.encode_line("add", "a0,a1,a2")?;
/// assert_eq!(out[0].bits, 0x00c5_8533);
/// # Ok::<(), rv_asm::AsmError>(())
/// ```
pub struct AssemblerSession {
    config: SessionConfig,
    xlen: Xlen,
    subsets: SubsetList,
    options: Options,
    /// Snapshots saved by `.option push`.
    saved: Vec<Options>,
    encoder: Encoder,
    evaluator: Box<dyn ExprEvaluator>,
    expander: Expander,
    stream: OutputStream,
    /// An instruction has been assembled.
    started: bool,
    /// `.attribute arch` was given.
    explicit_arch_attr: bool,
    /// Sticky: compressed code was enabled at some point.
    elf_rvc: bool,
    next_dot: u32,
    /// Definitions seen so far per numeric local label.
    local_labels: HashMap<u32, u32>,
    /// `Nf` references as (number, instance), checked at `finish`.
    forward_refs: Vec<(u32, u32)>,
}

impl core::fmt::Debug for AssemblerSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AssemblerSession")
            .field("xlen", &self.xlen)
            .field("subsets", &self.subsets)
            .field("options", &self.options)
            .field("saved", &self.saved.len())
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl AssemblerSession {
    /// Start a session for `config`.
    ///
    /// # Errors
    ///
    /// Fails when the ISA string is rejected, the ABI width disagrees with
    /// the ISA width, or the instruction tables are inconsistent.
    pub fn new(config: &SessionConfig) -> Result<Self, AsmError> {
        let mut session = Self {
            config: config.clone(),
            xlen: Xlen::Rv64,
            subsets: SubsetList::default(),
            options: config.initial_options(),
            saved: Vec::new(),
            encoder: Encoder::new()?,
            evaluator: Box::new(BasicEvaluator),
            expander: Expander::new(),
            stream: OutputStream::new(),
            started: false,
            explicit_arch_attr: false,
            elf_rvc: false,
            next_dot: 0,
            local_labels: HashMap::new(),
            forward_refs: Vec::new(),
        };
        session.configure_isa(config.arch_name())?;

        if let Some(abi) = config.abi_xlen_value() {
            let (abi_bits, isa_bits) = (abi.bits(), session.xlen.bits());
            let detail = if abi_bits > isa_bits {
                format!("can't have {abi_bits}-bit ABI on {isa_bits}-bit ISA")
            } else if abi_bits < isa_bits {
                format!("{abi_bits}-bit ABI not yet supported on {isa_bits}-bit ISA")
            } else {
                String::new()
            };
            if !detail.is_empty() {
                return Err(DirectiveError::Malformed {
                    directive: "-mabi".into(),
                    detail,
                }
                .into());
            }
        }
        Ok(session)
    }

    /// Install a different expression evaluator.
    pub fn set_evaluator(&mut self, evaluator: impl ExprEvaluator + 'static) -> &mut Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    pub fn subsets(&self) -> &SubsetList {
        &self.subsets
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn stream(&self) -> &OutputStream {
        &self.stream
    }

    // ── ISA ────────────────────────────────────────────────

    /// Replace the active subset list with the one `arch` describes.
    ///
    /// On error the previous list stays in effect. Compressed encoding
    /// follows the presence of `c` in the new list.
    pub fn configure_isa(&mut self, arch: &str) -> Result<(), IsaError> {
        let (xlen, subsets) = {
            let config = &self.config;
            SubsetList::parse(arch, &|name: &str| config.version_for(name))?
        };
        self.xlen = xlen;
        self.subsets = subsets;
        self.options.rvc = self.subsets.contains("c");
        self.elf_rvc |= self.options.rvc;
        tracing::debug!(arch = %self.arch_string(), rvc = self.options.rvc, "ISA configured");
        Ok(())
    }

    /// Canonical ISA string of the active subset list.
    pub fn arch_string(&self) -> String {
        self.subsets.arch_string(self.xlen)
    }

    /// The `Tag_RISCV_arch` value to record, if any was requested.
    pub fn arch_attribute(&self) -> Option<String> {
        (self.options.arch_attr || self.explicit_arch_attr).then(|| self.arch_string())
    }

    /// `.attribute arch, "<isa>"`. Only allowed before the first instruction.
    pub fn set_arch_attribute(&mut self, arch: &str) -> Result<(), AsmError> {
        if self.started {
            return Err(DirectiveError::ArchAfterInstructions.into());
        }
        self.configure_isa(arch)?;
        self.explicit_arch_attr = true;
        Ok(())
    }

    /// ELF header flags for the current state.
    pub fn elf_flags(&self) -> u32 {
        let mut flags = 0;
        if self.elf_rvc {
            flags |= EF_RISCV_RVC;
        }
        let abi = self
            .config
            .float_abi_value()
            .unwrap_or_else(|| self.subsets.float_abi());
        flags |= match abi {
            FloatAbi::Soft => EF_RISCV_FLOAT_ABI_SOFT,
            FloatAbi::Single => EF_RISCV_FLOAT_ABI_SINGLE,
            FloatAbi::Double => EF_RISCV_FLOAT_ABI_DOUBLE,
            FloatAbi::Quad => EF_RISCV_FLOAT_ABI_QUAD,
        };
        if self.subsets.is_rve() {
            flags |= EF_RISCV_RVE;
        }
        flags
    }

    /// DWARF register number for `name`.
    pub fn dwarf_regnum(&self, name: &str) -> Option<u32> {
        names::dwarf_regnum(name)
    }

    // ── .option ────────────────────────────────────────────

    /// Apply `.option <name>`.
    pub fn option(&mut self, name: &str) -> Result<(), DirectiveError> {
        match name {
            "rvc" => {
                self.options.rvc = true;
                self.elf_rvc = true;
            }
            "norvc" => self.options.rvc = false,
            "pic" => self.options.pic = true,
            "nopic" => self.options.pic = false,
            "relax" => self.options.relax = true,
            "norelax" => self.options.relax = false,
            "push" => self.saved.push(self.options),
            "pop" => self.options = self.saved.pop().ok_or(DirectiveError::OptionStackEmpty)?,
            other => return Err(DirectiveError::UnrecognizedOption(other.into())),
        }
        tracing::debug!(option = name, options = ?self.options, "option set");
        Ok(())
    }

    // ── Instructions ───────────────────────────────────────

    fn context(&self, allow_compressed: bool) -> MatchContext<'_> {
        MatchContext {
            subsets: &self.subsets,
            xlen: self.xlen,
            rvc: self.options.rvc,
            rve: self.subsets.is_rve(),
            allow_compressed,
            evaluator: self.evaluator.as_ref(),
        }
    }

    /// Encode one instruction and append it to the output stream.
    ///
    /// A pseudo-instruction yields one entry per real instruction of its
    /// expansion.
    pub fn encode_line(
        &mut self,
        mnemonic: &str,
        operands: &str,
    ) -> Result<Vec<EncodedInstruction>, AsmError> {
        self.started = true;
        let operands = self.resolve_local_refs(operands)?;
        let matched = self.encoder.encode(mnemonic, &operands, &self.context(true))?;
        let matched = self.bind_dot(matched)?;
        match matched.template.kind {
            TemplateKind::Macro(kind) => self.expand(kind, &matched),
            TemplateKind::Real => Ok(vec![self.place(matched)?]),
        }
    }

    /// `.insn <type> <fields>`.
    pub fn insn_directive(&mut self, text: &str) -> Result<Vec<EncodedInstruction>, AsmError> {
        let (type_name, fields) = split_word(text);
        if type_name.is_empty() {
            return Err(DirectiveError::Malformed {
                directive: ".insn".into(),
                detail: "missing instruction type".into(),
            }
            .into());
        }
        self.started = true;
        let fields = self.resolve_local_refs(fields)?;
        let matched = self
            .encoder
            .encode_insn(type_name, &fields, &self.context(true))?;
        let matched = self.bind_dot(matched)?;
        Ok(vec![self.place(matched)?])
    }

    /// Define a label at the current position. A numeric name starts a new
    /// instance of that local label.
    fn define_label(&mut self, name: &str) -> Result<(), AsmError> {
        let Some(number) = local_label_number(name) else {
            self.stream.define_symbol(name)?;
            return Ok(());
        };
        let defined = self.local_labels.entry(number).or_insert(0);
        let label = local_label_name(number, *defined);
        *defined += 1;
        self.stream.define_symbol(&label)?;
        Ok(())
    }

    /// Rewrite `Nb` and `Nf` in operand text to the local label instance
    /// they name: the latest definition of `N`, or the next one.
    fn resolve_local_refs<'a>(&mut self, text: &'a str) -> Result<Cow<'a, str>, AsmError> {
        let bytes = text.as_bytes();
        let mut out = String::new();
        let mut copied = 0;
        let mut i = 0;
        while i < bytes.len() {
            if !is_symbol_byte(bytes[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && is_symbol_byte(bytes[i]) {
                i += 1;
            }
            let token = &text[start..i];
            let (digits, direction) = token.split_at(token.len() - 1);
            let Some(number) = local_label_number(digits) else {
                continue;
            };
            let defined = self.local_labels.get(&number).copied().unwrap_or(0);
            let label = match direction {
                "b" => match defined.checked_sub(1) {
                    Some(last) => local_label_name(number, last),
                    None => return Err(AsmError::UndefinedLocalLabel(token.into())),
                },
                "f" => {
                    self.forward_refs.push((number, defined));
                    local_label_name(number, defined)
                }
                _ => continue,
            };
            out.push_str(&text[copied..start]);
            out.push_str(&label);
            copied = i;
        }
        if copied == 0 {
            return Ok(Cow::Borrowed(text));
        }
        out.push_str(&text[copied..]);
        Ok(Cow::Owned(out))
    }

    /// Replace a `.` target with a label at the current position.
    fn bind_dot(&mut self, mut matched: Matched) -> Result<Matched, AsmError> {
        if let Some(Expr::Symbol { name, .. }) = &mut matched.imm {
            if name == "." {
                let label = format!(".Ldot{}", self.next_dot);
                self.next_dot += 1;
                self.stream.define_symbol(&label)?;
                *name = label;
            }
        }
        Ok(matched)
    }

    fn expand(
        &mut self,
        kind: MacroKind,
        matched: &Matched,
    ) -> Result<Vec<EncodedInstruction>, AsmError> {
        let steps = self
            .expander
            .expand(kind, matched, self.xlen, self.options.pic)?;
        let mut out = Vec::with_capacity(steps.len());
        for step in steps {
            let allow_compressed = step.allows_compression();
            match step {
                MacroStep::Label(name) => {
                    self.stream.define_symbol(&name)?;
                }
                MacroStep::Instr {
                    mnemonic,
                    operands,
                    reloc,
                } => {
                    let ctx = self.context(allow_compressed);
                    let mut sub = self
                        .encoder
                        .encode(&mnemonic, &operands, &ctx)
                        .map_err(|err| {
                            InternalError::Unreachable(format!(
                                "expansion of `{}' produced `{mnemonic} {operands}': {err}",
                                matched.template.mnemonic
                            ))
                        })?;
                    if let Some((kind, target)) = reloc {
                        sub.imm = Some(target);
                        sub.reloc = Some(kind);
                    }
                    out.push(self.place(sub)?);
                }
            }
        }
        Ok(out)
    }

    /// Append a matched instruction: a relaxation frag for a branch to a
    /// symbol, fixed bytes otherwise.
    fn place(&mut self, matched: Matched) -> Result<EncodedInstruction, AsmError> {
        let relax = self.options.relax;
        let (placement, fixup, relaxed) = match (matched.reloc, &matched.imm) {
            (Some(kind), Some(target @ Expr::Symbol { .. })) if is_branch(kind) => {
                let (at, handle) = self
                    .stream
                    .append_relaxed(matched.bits, kind, target, relax)?;
                let fixup = Fixup {
                    kind,
                    target: target.clone(),
                    is_relaxable: false,
                };
                (at, Some(fixup), Some(handle))
            }
            (Some(kind), Some(target @ Expr::Symbol { .. })) => {
                let fixup = Fixup {
                    kind,
                    target: target.clone(),
                    is_relaxable: reloc::is_relaxable(kind, relax),
                };
                let at = self
                    .stream
                    .append_fixed(&matched.to_bytes(), Some(fixup.clone()));
                (at, Some(fixup), None)
            }
            (None, _) => (self.stream.append_fixed(&matched.to_bytes(), None), None, None),
            (Some(kind), other) => {
                return Err(InternalError::Unreachable(format!(
                    "{kind} without a symbolic target ({other:?})"
                ))
                .into())
            }
        };
        tracing::debug!(
            mnemonic = matched.template.mnemonic,
            bits = matched.bits,
            length = matched.length(),
            relaxed = relaxed.is_some(),
            "instruction placed"
        );
        Ok(EncodedInstruction {
            mnemonic: matched.template.mnemonic,
            bits: matched.bits,
            length: matched.length(),
            placement,
            fixup,
            relaxed,
        })
    }

    // ── Lines ──────────────────────────────────────────────

    /// Assemble one statement: any leading labels, then a directive or an
    /// instruction.
    pub fn assemble_line(&mut self, line: &str) -> Result<(), AsmError> {
        let mut rest = line.trim();
        while let Some((label, after)) = split_label(rest) {
            self.define_label(label)?;
            rest = after;
        }
        if rest.is_empty() {
            return Ok(());
        }

        let (head, tail) = split_word(rest);
        match head {
            ".option" => Ok(self.option(tail.trim())?),
            ".insn" => self.insn_directive(tail).map(drop),
            ".attribute" => self.attribute(tail),
            directive if directive.starts_with('.') => {
                Err(DirectiveError::Unknown(directive.into()).into())
            }
            mnemonic => self.encode_line(mnemonic, tail).map(drop),
        }
    }

    /// `.attribute <tag>, <value>`. Only the arch tag changes state.
    fn attribute(&mut self, args: &str) -> Result<(), AsmError> {
        let malformed = |detail: String| -> AsmError {
            DirectiveError::Malformed {
                directive: ".attribute".into(),
                detail,
            }
            .into()
        };
        let Some((tag, value)) = args.split_once(',') else {
            return Err(malformed(format!("expected `<tag>, <value>', got `{}'", args.trim())));
        };
        let tag = tag.trim();
        let value = value.trim();
        let name = tag.strip_prefix("Tag_RISCV_").unwrap_or(tag);
        match name {
            "arch" | "5" => {
                let arch = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .ok_or_else(|| malformed(format!("expected a quoted string, got `{value}'")))?;
                self.set_arch_attribute(arch)
            }
            "priv_spec" | "priv_spec_minor" | "priv_spec_revision" | "unaligned_access"
            | "stack_align" => Ok(()),
            _ if name.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
            _ => Err(malformed(format!("unknown attribute `{tag}'"))),
        }
    }

    /// Assemble a block of source. Statements are separated by newlines or
    /// `;` and `#` starts a comment.
    ///
    /// User errors are reported to `sink` and assembly continues with the
    /// next statement. The first fatal error is returned.
    pub fn assemble(&mut self, text: &str, sink: &mut dyn DiagnosticSink) -> Result<(), AsmError> {
        for stmt in statements(text) {
            if let Err(err) = self.assemble_line(stmt) {
                if err.is_fatal() {
                    tracing::error!(error = %err, line = stmt, "fatal");
                    return Err(err);
                }
                report(sink, &err, stmt);
            }
        }
        Ok(())
    }

    /// Lay out the output stream and return the final bytes.
    pub fn finish(mut self) -> Result<Layout, AsmError> {
        for &(number, instance) in &self.forward_refs {
            if self.local_labels.get(&number).copied().unwrap_or(0) <= instance {
                return Err(AsmError::UndefinedLocalLabel(format!("{number}f")));
            }
        }
        tracing::debug!(
            arch = %self.arch_string(),
            frags = self.stream.arena().len(),
            "finishing"
        );
        self.stream.layout()
    }
}

/// Statements of a source block, comments stripped, blank ones skipped.
pub(crate) fn statements(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split('#').next().unwrap_or("").split(';'))
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
}

fn report(sink: &mut dyn DiagnosticSink, err: &AsmError, line: &str) {
    let diagnostic = Diagnostic::error(err, line);
    match diagnostic.severity {
        Severity::Warning => tracing::warn!(message = %diagnostic.message, line, "diagnostic"),
        Severity::Error => tracing::error!(message = %diagnostic.message, line, "diagnostic"),
    }
    sink.report(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CollectingSink, MatchError};

    fn session(arch: &str) -> AssemblerSession {
        AssemblerSession::new(&SessionConfig::new(arch)).unwrap()
    }

    fn words(out: &[EncodedInstruction]) -> Vec<(&str, u64)> {
        out.iter().map(|i| (i.mnemonic, i.bits)).collect()
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AssemblerSession>();
    }

    #[test]
    fn encodes_real_instruction() {
        let mut s = session("rv64gc");
        let out = s.encode_line("add", "a0,a1,a2").unwrap();
        assert_eq!(words(&out), [("add", 0x00c5_8533)]);
        assert_eq!(out[0].length, 4);
        assert_eq!(out[0].fixup, None);
    }

    #[test]
    fn compresses_when_c_is_active() {
        let mut s = session("rv64gc");
        let out = s.encode_line("addi", "a0,a0,1").unwrap();
        assert_eq!(out[0].length, 2);
        assert_eq!(out[0].bits, 0x0505);

        s.option("norvc").unwrap();
        let out = s.encode_line("addi", "a0,a0,1").unwrap();
        assert_eq!(out[0].length, 4);
    }

    #[test]
    fn rejects_mismatched_abi() {
        let mut config = SessionConfig::new("rv32i");
        config.abi_xlen(Xlen::Rv64);
        let err = AssemblerSession::new(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "-mabi: can't have 64-bit ABI on 32-bit ISA"
        );
    }

    #[test]
    fn configure_isa_keeps_old_list_on_error() {
        let mut s = session("rv64imc");
        assert!(s.configure_isa("rv32ef").is_err());
        assert_eq!(s.arch_string(), "rv64i2p0_m2p0_c2p0");
        s.configure_isa("rv32i").unwrap();
        assert_eq!(s.xlen(), Xlen::Rv32);
        assert!(!s.options().rvc);
    }

    #[test]
    fn option_stack() {
        let mut s = session("rv64gc");
        s.option("push").unwrap();
        s.option("norelax").unwrap();
        s.option("pic").unwrap();
        assert!(!s.options().relax);
        s.option("pop").unwrap();
        assert!(s.options().relax);
        assert!(!s.options().pic);
        assert_eq!(s.option("pop"), Err(DirectiveError::OptionStackEmpty));
        assert_eq!(
            s.option("frob"),
            Err(DirectiveError::UnrecognizedOption("frob".into()))
        );
    }

    #[test]
    fn macro_steps_are_placed() {
        let mut s = session("rv64gc");
        let out = s.encode_line("lla", "a0, msg").unwrap();
        assert_eq!(words(&out), [("auipc", 0x0000_0517), ("addi", 0x0005_0513)]);
        let hi = out[0].fixup.as_ref().unwrap();
        assert_eq!(hi.kind, RelocKind::PcrelHi20);
        assert_eq!(hi.target, Expr::symbol("msg"));
        assert!(hi.is_relaxable);
        let lo = out[1].fixup.as_ref().unwrap();
        assert_eq!(lo.kind, RelocKind::PcrelLo12I);
        assert_eq!(lo.target, Expr::symbol(".Lpcrel_hi0"));
        assert!(s.stream().is_defined(".Lpcrel_hi0"));
    }

    #[test]
    fn call_uses_plt_suffix() {
        let mut s = session("rv64gc");
        let out = s.encode_line("call", "puts@plt").unwrap();
        // auipc ra, 0 ; jalr ra, ra
        assert_eq!(words(&out), [("auipc", 0x0000_0097), ("jalr", 0x0000_80e7)]);
        assert_eq!(out[0].fixup.as_ref().unwrap().kind, RelocKind::CallPlt);
    }

    #[test]
    fn branches_become_frags() {
        let mut s = session("rv64gc");
        let out = s.encode_line("beqz", "a0, done").unwrap();
        assert_eq!(out[0].length, 2);
        assert!(out[0].relaxed.is_some());
        assert_eq!(out[0].fixup.as_ref().unwrap().kind, RelocKind::RvcBranch);
        assert_eq!(s.stream().arena().len(), 1);
    }

    #[test]
    fn numeric_local_labels() {
        let mut s = session("rv64i");
        for line in ["1: nop", "j 1b", "1: nop", "j 1b", "j 1f", "1: nop"] {
            s.assemble_line(line).unwrap();
        }
        let layout = s.finish().unwrap();
        let word = |at: usize| u32::from_le_bytes(layout.bytes()[at..at + 4].try_into().unwrap());
        // jal x0, -4
        assert_eq!(word(4), 0xffdf_f06f);
        assert_eq!(word(12), 0xffdf_f06f);
        // jal x0, 4
        assert_eq!(word(16), 0x0040_006f);
        assert_eq!(layout.symbol(".Llocal1_2"), Some(20));
    }

    #[test]
    fn numeric_label_pairs_pcrel_lo() {
        let mut s = session("rv64i");
        s.assemble_line("1: auipc a0, %pcrel_hi(msg)").unwrap();
        let out = s.encode_line("addi", "a0, a0, %pcrel_lo(1b)").unwrap();
        let lo = out[0].fixup.as_ref().unwrap();
        assert_eq!(lo.kind, RelocKind::PcrelLo12I);
        assert_eq!(lo.target, Expr::symbol(".Llocal1_0"));
        // a hex literal ending in `b` is not a label reference
        let out = s.encode_line("addi", "a0, a0, 0x1b").unwrap();
        assert_eq!(words(&out), [("addi", 0x01b5_0513)]);
    }

    #[test]
    fn undefined_local_labels() {
        let mut s = session("rv64i");
        assert_eq!(
            s.assemble_line("j 1b"),
            Err(AsmError::UndefinedLocalLabel("1b".into()))
        );
        s.assemble_line("j 2f").unwrap();
        s.assemble_line("2: nop").unwrap();
        s.assemble_line("j 2f").unwrap();
        assert_eq!(
            s.finish().unwrap_err(),
            AsmError::UndefinedLocalLabel("2f".into())
        );
    }

    #[test]
    fn split_label_forms() {
        assert_eq!(split_label("loop: nop"), Some(("loop", "nop")));
        assert_eq!(split_label("42:"), Some(("42", "")));
        assert_eq!(split_label("4x: nop"), None);
        assert_eq!(split_label("nop"), None);
    }

    #[test]
    fn dot_binds_to_instruction_start() {
        let mut s = session("rv64i");
        s.encode_line("nop", "").unwrap();
        s.encode_line("j", ".").unwrap();
        let layout = s.finish().unwrap();
        assert_eq!(layout.symbol(".Ldot0"), Some(4));
        // jal x0, 0
        assert_eq!(&layout.bytes()[4..8], &0x0000_006fu32.to_le_bytes());
    }

    #[test]
    fn attribute_arch_only_before_code() {
        let mut s = session("rv64gc");
        s.assemble_line(".attribute arch, \"rv32imac\"").unwrap();
        assert_eq!(s.xlen(), Xlen::Rv32);
        assert_eq!(
            s.arch_attribute().as_deref(),
            Some("rv32i2p0_m2p0_a2p0_c2p0")
        );
        s.assemble_line("nop").unwrap();
        assert_eq!(
            s.assemble_line(".attribute arch, \"rv64i\""),
            Err(DirectiveError::ArchAfterInstructions.into())
        );
    }

    #[test]
    fn elf_flags() {
        assert_eq!(session("rv64gc").elf_flags(), EF_RISCV_RVC | EF_RISCV_FLOAT_ABI_DOUBLE);
        assert_eq!(session("rv32emc").elf_flags(), EF_RISCV_RVC | EF_RISCV_RVE);
        assert_eq!(session("rv64imafdqc").elf_flags() & EF_RISCV_FLOAT_ABI, EF_RISCV_FLOAT_ABI_QUAD);

        let mut s = session("rv32i");
        assert_eq!(s.elf_flags(), 0);
        s.option("rvc").unwrap();
        s.option("norvc").unwrap();
        assert_eq!(s.elf_flags(), EF_RISCV_RVC);

        let mut config = SessionConfig::new("rv32if");
        config.float_abi(FloatAbi::Single);
        let s = AssemblerSession::new(&config).unwrap();
        assert_eq!(s.elf_flags(), EF_RISCV_FLOAT_ABI_SINGLE);
    }

    #[test]
    fn assemble_reports_and_continues() {
        let mut s = session("rv64gc");
        let mut sink = CollectingSink::new();
        s.assemble(
            "start: addi a0, a0, 1 # bump\n frob a0\n.option wat ; .option pop\n ret",
            &mut sink,
        )
        .unwrap();
        let messages: Vec<_> = sink.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                MatchError::UnknownMnemonic("frob".into()).to_string().as_str(),
                "unrecognized .option directive: wat",
                ".option pop with no .option push",
            ]
        );
        assert_eq!(sink.error_count(), 2);
        let layout = s.finish().unwrap();
        assert_eq!(layout.symbol("start"), Some(0));
        assert_eq!(layout.bytes().len(), 4);
    }

    #[test]
    fn dwarf_numbers() {
        let s = session("rv64gc");
        assert_eq!(s.dwarf_regnum("sp"), Some(2));
        assert_eq!(s.dwarf_regnum("fa0"), Some(42));
        assert_eq!(s.dwarf_regnum("bogus"), None);
    }
}
