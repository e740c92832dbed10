//! Integration tests using Tom Harte's `SingleStepTests` for the WDC 65C02.
//!
//! Runs 256 opcode files x 10,000 tests comparing register state, memory
//! and the per-cycle bus trace after each instruction.
//!
//! Test data lives in `test-data/65x02/wdc65c02/v1/XX.json`.

use emu_core::{Bus, Clock, Component, Memory};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use wdc_65c02::{Registers, StatusRegister, W65C02};

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuSnapshot,
    #[serde(rename = "final")]
    final_state: CpuSnapshot,
    cycles: Vec<(u16, u8, String)>,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuSnapshot {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(state: &CpuSnapshot) -> (W65C02, Memory) {
    let mut ram = Memory::ram(0x0000, 0x10000).expect("64K RAM");
    for &(addr, value) in &state.ram {
        ram.poke(addr, value);
    }
    let mut cpu = W65C02::new();
    cpu.start_at(Registers {
        a: state.a,
        x: state.x,
        y: state.y,
        sp: state.s,
        pc: state.pc,
        p: StatusRegister::from_value(state.p),
    });
    (cpu, ram)
}

/// Run the test's cycle count and return the observed bus trace.
fn execute(cpu: &mut W65C02, ram: &mut Memory, edges: usize) -> Vec<(u16, u8, bool)> {
    let mut bus = Bus::new();
    let mut clock = Clock::new();
    let mut trace = Vec::with_capacity(edges);
    for _ in 0..edges {
        clock.edge(&mut bus, &mut [&mut *cpu as &mut dyn Component, &mut *ram]);
        trace.push((bus.address, bus.data, bus.is_write()));
    }
    trace
}

/// Compare the CPU/memory state and bus trace against expected.
fn compare(
    cpu: &W65C02,
    ram: &Memory,
    trace: &[(u16, u8, bool)],
    test: &TestCase,
) -> Vec<String> {
    let mut errors = Vec::new();
    let regs = cpu.regs();
    let expected = &test.final_state;

    let mut check = |name: &str, got: u16, want: u16| {
        if got != want {
            errors.push(format!("{name}: got ${got:02X}, want ${want:02X}"));
        }
    };
    check("PC", regs.pc, expected.pc);
    check("S", regs.sp.into(), expected.s.into());
    check("A", regs.a.into(), expected.a.into());
    check("X", regs.x.into(), expected.x.into());
    check("Y", regs.y.into(), expected.y.into());
    // Bits 4 and 5 always read as 1 on the 65C02.
    check("P", regs.p.read_value().into(), (expected.p | 0x30).into());

    for &(addr, want) in &expected.ram {
        let got = ram.peek(addr);
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }

    for (i, (&(addr, data, write), (want_addr, want_data, kind))) in
        trace.iter().zip(&test.cycles).enumerate()
    {
        let want_write = kind == "write";
        if addr != *want_addr || data != *want_data || write != want_write {
            errors.push(format!(
                "cycle {i}: got ${addr:04X} ${data:02X} {}, want ${want_addr:04X} ${want_data:02X} {kind}",
                if write { "write" } else { "read" }
            ));
            break;
        }
    }

    errors
}

#[test]
#[ignore = "requires test-data/65x02 — run with --ignored"]
fn run_all() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent of crate dir")
        .parent()
        .expect("workspace root")
        .join("test-data/65x02/wdc65c02/v1");

    if !test_dir.exists() {
        eprintln!("Test data not found at {}", test_dir.display());
        eprintln!("Skipping SingleStepTests.");
        return;
    }

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;
    let mut total_files = 0u32;

    for opcode in 0..=0xFF_u8 {
        let filename = format!("{opcode:02x}.json");
        let path = test_dir.join(&filename);
        if !path.exists() {
            continue;
        }

        let data = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("Failed to read {}: {e}", path.display());
        });
        let tests: Vec<TestCase> = serde_json::from_str(&data).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {e}", path.display());
        });

        let mut file_pass = 0u32;
        let mut file_fail = 0u32;
        let mut first_failures: Vec<String> = Vec::new();

        for test in &tests {
            let (mut cpu, mut ram) = setup(&test.initial);
            let trace = execute(&mut cpu, &mut ram, test.cycles.len());

            let errors = compare(&cpu, &ram, &trace, test);
            if errors.is_empty() {
                file_pass += 1;
            } else {
                file_fail += 1;
                if first_failures.len() < 5 {
                    first_failures.push(format!("  FAIL [{}]: {}", test.name, errors.join(", ")));
                }
            }
        }

        let status = if file_fail == 0 { "PASS" } else { "FAIL" };
        println!(
            "Opcode ${opcode:02X} ({filename}): {status} — {file_pass}/{} passed",
            file_pass + file_fail
        );
        for msg in &first_failures {
            println!("{msg}");
        }

        total_pass += u64::from(file_pass);
        total_fail += u64::from(file_fail);
        total_files += 1;
    }

    println!();
    println!("=== SingleStepTests Summary ===");
    println!(
        "Files: {total_files}, Total: {}, Pass: {total_pass}, Fail: {total_fail}",
        total_pass + total_fail
    );

    assert_eq!(total_fail, 0, "{total_fail} tests failed");
}
