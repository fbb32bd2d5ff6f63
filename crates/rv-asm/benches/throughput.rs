//! Performance benchmarks for `rv_asm`.
//!
//! Measures:
//! - Single instruction latency, full width and compressed
//! - Multi-instruction throughput (KB/s of source text)
//! - Label-heavy workloads with many relaxable jumps
//! - Branch relaxation across the short and long reach boundaries
//! - ISA string parsing and session start-up
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use rv_asm::{assemble, AssemblerSession, SessionConfig, SubsetList};

// ─── Single-Instruction Latency ──────────────────────────────────────────────

fn bench_single_instruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_instruction");

    group.bench_function("rv64i_add", |b| {
        b.iter(|| assemble(black_box("add a0, a1, a2"), "rv64i").unwrap())
    });

    group.bench_function("rv64gc_add_compressed", |b| {
        b.iter(|| assemble(black_box("add a0, a0, a1"), "rv64gc").unwrap())
    });

    group.bench_function("rv64i_load", |b| {
        b.iter(|| assemble(black_box("ld a0, 16(sp)"), "rv64i").unwrap())
    });

    group.bench_function("rv64gc_csr", |b| {
        b.iter(|| assemble(black_box("csrrw a0, mstatus, a1"), "rv64gc").unwrap())
    });

    group.bench_function("rv64i_li_64bit", |b| {
        b.iter(|| assemble(black_box("li a0, 0x123456789abcdef0"), "rv64i").unwrap())
    });

    group.bench_function("rv64gc_call", |b| {
        b.iter(|| assemble(black_box("call printf"), "rv64gc").unwrap())
    });

    group.finish();
}

// ─── Multi-Instruction Throughput ─────────────────────────────────────────────

/// Generate a block of N instructions (no labels).
fn gen_block(n: usize) -> String {
    let mut s = String::with_capacity(n * 20);
    for i in 0..n {
        match i % 4 {
            0 => s.push_str("add a0, a1, a2\n"),
            1 => s.push_str("sub a3, a4, a5\n"),
            2 => s.push_str("and a6, a7, t0\n"),
            3 => s.push_str("or t1, t2, t3\n"),
            _ => unreachable!(),
        }
    }
    s
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    for (n, arch) in [(100, "rv64i"), (1000, "rv64i"), (1000, "rv64gc"), (5000, "rv32imac")] {
        let src = gen_block(n);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_function(format!("{arch}_{n}_insn"), |b| {
            b.iter(|| assemble(black_box(&src), arch).unwrap())
        });
    }

    group.finish();
}

// ─── Labels ───────────────────────────────────────────────────────────────────

/// Generate `n_labels` labels, each followed by a jump to a distant label.
fn gen_label_heavy(n_labels: usize) -> String {
    let mut s = String::with_capacity(n_labels * 40);
    for i in 0..n_labels {
        s.push_str(&format!("label_{i}:\n"));
        s.push_str("addi a0, a0, 1\n");
        let target = (i * 7 + 3) % n_labels;
        s.push_str(&format!("j label_{target}\n"));
    }
    s
}

fn bench_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("labels");

    let src_100 = gen_label_heavy(100);
    group.bench_function("100_labels", |b| {
        b.iter(|| assemble(black_box(&src_100), "rv64gc").unwrap())
    });

    let src_1k = gen_label_heavy(1000);
    group.bench_function("1000_labels", |b| {
        b.iter(|| assemble(black_box(&src_1k), "rv64gc").unwrap())
    });

    group.finish();
}

// ─── Branch Relaxation ────────────────────────────────────────────────────────

/// Conditional branches over a sled of `n_nops` full-width nops.
fn gen_relaxation_workload(n_nops: usize) -> String {
    let mut s = String::with_capacity(n_nops * 4 + 200);
    s.push_str("start:\n");
    s.push_str("beqz a0, far_target\n");
    s.push_str("bnez a1, far_target\n");
    s.push_str("blt a2, a3, far_target\n");
    s.push_str(".option norvc\n");
    for _ in 0..n_nops {
        s.push_str("nop\n");
    }
    s.push_str(".option rvc\n");
    s.push_str("far_target:\n");
    s.push_str("ret\n");
    s
}

fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation");

    // Within compressed branch reach.
    let src_short = gen_relaxation_workload(10);
    group.bench_function("short_branch_10_nop", |b| {
        b.iter(|| assemble(black_box(&src_short), "rv64gc").unwrap())
    });

    // Past the compressed reach, within the 4-byte reach.
    let src_mid = gen_relaxation_workload(200);
    group.bench_function("mid_branch_200_nop", |b| {
        b.iter(|| assemble(black_box(&src_mid), "rv64gc").unwrap())
    });

    // Past the 4-byte reach: inverted branch plus jal.
    let src_long = gen_relaxation_workload(1200);
    group.bench_function("long_branch_1200_nop", |b| {
        b.iter(|| assemble(black_box(&src_long), "rv64gc").unwrap())
    });

    group.finish();
}

// ─── ISA Strings and Sessions ────────────────────────────────────────────────

fn bench_isa(c: &mut Criterion) {
    let mut group = c.benchmark_group("isa");

    for arch in ["rv64gc", "rv32emc", "rv64imafdqc_zicsr_zifencei_zba_xfoo2p0"] {
        group.bench_function(format!("parse_{arch}"), |b| {
            b.iter(|| SubsetList::parse_default(black_box(arch)).unwrap())
        });
    }

    let config = SessionConfig::new("rv64gc");
    group.bench_function("session_new", |b| {
        b.iter(|| AssemblerSession::new(black_box(&config)).unwrap())
    });

    group.finish();
}

// ─── Realistic Code ──────────────────────────────────────────────────────────

fn bench_realistic(c: &mut Criterion) {
    let mut group = c.benchmark_group("realistic");

    let function = "\
addi sp, sp, -16
sd ra, 8(sp)
sd s0, 0(sp)
addi s0, sp, 16
lla a0, msg
call puts
li a0, 0
ld ra, 8(sp)
ld s0, 0(sp)
addi sp, sp, 16
ret
msg:
";
    group.bench_function("rv64gc_function", |b| {
        b.iter(|| assemble(black_box(function), "rv64gc").unwrap())
    });

    let mut config = SessionConfig::new("rv64gc");
    config.pic(true);
    group.bench_function("rv64gc_function_pic", |b| {
        b.iter(|| rv_asm::assemble_layout(black_box(function), &config).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_instruction,
    bench_throughput,
    bench_labels,
    bench_relaxation,
    bench_isa,
    bench_realistic,
);
criterion_main!(benches);
