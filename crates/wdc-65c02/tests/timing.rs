//! Cycle counts per addressing mode and the datasheet timing scenarios.

mod common;

use common::{Board, IRQ_HANDLER, PROGRAM};
use emu_core::Cpu;
use wdc_65c02::{CpuConfig, Registers, UndocumentedOpcodes, W65C02};

/// Run the first instruction of `program` and return its cycle count.
fn cycles_with(program: &[u8], prepare: impl FnOnce(&mut Board)) -> usize {
    let mut board = Board::booted(program);
    prepare(&mut board);
    board.step()
}

fn cycles(program: &[u8]) -> usize {
    cycles_with(program, |_| {})
}

fn with_x(x: u8) -> impl FnOnce(&mut Board) {
    move |board: &mut Board| board.cpu.regs_mut().x = x
}

fn with_y(y: u8) -> impl FnOnce(&mut Board) {
    move |board: &mut Board| board.cpu.regs_mut().y = y
}

#[test]
fn implied_accumulator_immediate() {
    assert_eq!(cycles(&[0xEA]), 2); // NOP
    assert_eq!(cycles(&[0xE8]), 2); // INX
    assert_eq!(cycles(&[0x0A]), 2); // ASL A
    assert_eq!(cycles(&[0x1A]), 2); // INC A
    assert_eq!(cycles(&[0xA9, 0x01]), 2); // LDA #
    assert_eq!(cycles(&[0x89, 0x01]), 2); // BIT #
}

#[test]
fn zero_page() {
    assert_eq!(cycles(&[0xA5, 0x10]), 3); // LDA zp
    assert_eq!(cycles(&[0x85, 0x10]), 3); // STA zp
    assert_eq!(cycles(&[0x64, 0x10]), 3); // STZ zp
    assert_eq!(cycles(&[0x06, 0x10]), 5); // ASL zp
    assert_eq!(cycles(&[0x04, 0x10]), 5); // TSB zp
    assert_eq!(cycles(&[0x87, 0x10]), 5); // SMB0 zp
}

#[test]
fn zero_page_indexed() {
    assert_eq!(cycles_with(&[0xB5, 0x10], with_x(0xF5)), 4); // LDA zp,X
    assert_eq!(cycles_with(&[0x95, 0x10], with_x(1)), 4); // STA zp,X
    assert_eq!(cycles_with(&[0x16, 0x10], with_x(1)), 6); // ASL zp,X
    assert_eq!(cycles_with(&[0xB6, 0x10], with_y(1)), 4); // LDX zp,Y
    assert_eq!(cycles_with(&[0x96, 0x10], with_y(1)), 4); // STX zp,Y
}

#[test]
fn absolute() {
    assert_eq!(cycles(&[0xAD, 0x00, 0x12]), 4); // LDA abs
    assert_eq!(cycles(&[0x8D, 0x00, 0x12]), 4); // STA abs
    assert_eq!(cycles(&[0x0E, 0x00, 0x12]), 6); // ASL abs
    assert_eq!(cycles(&[0x1C, 0x00, 0x12]), 6); // TRB abs
}

#[test]
fn absolute_indexed_reads_pay_only_on_page_cross() {
    assert_eq!(cycles_with(&[0xBD, 0x00, 0x12], with_x(1)), 4);
    assert_eq!(cycles_with(&[0xBD, 0xFF, 0x12], with_x(1)), 5);
    assert_eq!(cycles_with(&[0xB9, 0x00, 0x12], with_y(1)), 4);
    assert_eq!(cycles_with(&[0xB9, 0xFF, 0x12], with_y(1)), 5);
    assert_eq!(cycles_with(&[0x3C, 0xFF, 0x12], with_x(1)), 5); // BIT abs,X
}

#[test]
fn shift_abs_x_pays_only_on_page_cross() {
    assert_eq!(cycles_with(&[0x1E, 0xF0, 0xCF], with_x(5)), 6);
    assert_eq!(cycles_with(&[0x1E, 0xFF, 0xCF], with_x(5)), 7);
}

#[test]
fn always_extra_opcodes_ignore_page_cross() {
    assert_eq!(cycles_with(&[0x9D, 0x00, 0x12], with_x(1)), 5); // STA abs,X
    assert_eq!(cycles_with(&[0x99, 0x00, 0x12], with_y(1)), 5); // STA abs,Y
    assert_eq!(cycles_with(&[0x9E, 0x00, 0x12], with_x(1)), 5); // STZ abs,X
    assert_eq!(cycles_with(&[0xFE, 0xF0, 0xCF], with_x(5)), 7); // INC abs,X
    assert_eq!(cycles_with(&[0xDE, 0xF0, 0xCF], with_x(5)), 7); // DEC abs,X
    assert_eq!(cycles_with(&[0x91, 0x40], with_y(1)), 6); // STA (zp),Y
}

#[test]
fn indirect_modes() {
    let pointer = |board: &mut Board| {
        board.poke(0x0040, 0xFF);
        board.poke(0x0041, 0x12);
    };
    assert_eq!(cycles_with(&[0xB2, 0x40], pointer), 5); // LDA (zp)
    assert_eq!(cycles_with(&[0x92, 0x40], pointer), 5); // STA (zp)
    assert_eq!(cycles_with(&[0xA1, 0x3F], |b| { pointer(b); b.cpu.regs_mut().x = 1 }), 6);
    assert_eq!(cycles_with(&[0x81, 0x3F], |b| { pointer(b); b.cpu.regs_mut().x = 1 }), 6);
    assert_eq!(cycles_with(&[0xB1, 0x40], pointer), 5); // (zp),Y, Y=0
    assert_eq!(cycles_with(&[0xB1, 0x40], |b| { pointer(b); b.cpu.regs_mut().y = 1 }), 6);
}

#[test]
fn jumps_and_stack() {
    assert_eq!(cycles(&[0x4C, 0x00, 0x12]), 3); // JMP abs
    assert_eq!(cycles(&[0x6C, 0x00, 0x12]), 6); // JMP (abs)
    assert_eq!(cycles(&[0x7C, 0x00, 0x12]), 6); // JMP (abs,X)
    assert_eq!(cycles(&[0x48]), 3); // PHA
    assert_eq!(cycles(&[0xDA]), 3); // PHX
    assert_eq!(cycles(&[0x68]), 4); // PLA
    assert_eq!(cycles(&[0x28]), 4); // PLP
    assert_eq!(cycles(&[0x20, 0x00, 0x12]), 6); // JSR
    assert_eq!(cycles(&[0x60]), 6); // RTS
    assert_eq!(cycles(&[0x40]), 6); // RTI
    assert_eq!(cycles(&[0x00, 0x00]), 7); // BRK
    assert_eq!(cycles(&[0xCB]), 3); // WAI
    assert_eq!(cycles(&[0xDB]), 3); // STP
}

#[test]
fn relative_branches() {
    // P after reset has C clear.
    assert_eq!(cycles(&[0xB0, 0x10]), 2); // BCS not taken
    assert_eq!(cycles(&[0x90, 0x10]), 3); // BCC taken, same page
    assert_eq!(cycles(&[0x80, 0x10]), 3); // BRA
}

#[test]
fn branches_end_on_their_last_bus_cycle() {
    let mut board = Board::booted(&[0xB0, 0x10, 0x90, 0x00, 0x8F, 0x00, 0x10, 0xEA]);
    assert_eq!(board.step(), 2); // BCS not taken
    assert_eq!(board.cpu.pc(), PROGRAM + 2);
    assert_eq!(board.step(), 3); // BCC +0, taken
    assert_eq!(board.cpu.pc(), PROGRAM + 4);
    assert_eq!(board.step(), 5); // BBS0 $00, not taken
    assert!(board.cpu.is_instruction_boundary());
    assert_eq!(board.cpu.pc(), PROGRAM + 7);
}

#[test]
fn branch_across_page_takes_four_cycles() {
    let mut board = Board::booted(&[]);
    board.poke(0xC0FD, 0x90); // BCC +3
    board.poke(0xC0FE, 0x03);
    board.cpu.start_at(Registers {
        pc: 0xC0FD,
        ..Registers::power_on()
    });
    assert_eq!(board.step(), 4);
    assert_eq!(board.cpu.pc(), 0xC102);
}

#[test]
fn branch_backwards_across_page() {
    let mut board = Board::booted(&[]);
    board.poke(0xC100, 0x80); // BRA -4
    board.poke(0xC101, 0xFC);
    board.cpu.start_at(Registers {
        pc: 0xC100,
        ..Registers::power_on()
    });
    assert_eq!(board.step(), 4);
    assert_eq!(board.cpu.pc(), 0xC0FE);
}

#[test]
fn zero_page_bit_branches() {
    // $10 holds 0 after power-on: BBR0 is taken, BBS0 is not.
    assert_eq!(cycles(&[0x0F, 0x10, 0x02]), 6);
    assert_eq!(cycles(&[0x8F, 0x10, 0x02]), 5);

    let mut board = Board::booted(&[]);
    board.poke(0x02FA, 0x0F); // BBR0 $10,+$10 from $02FD lands on $030D
    board.poke(0x02FB, 0x10);
    board.poke(0x02FC, 0x10);
    board.cpu.start_at(Registers {
        pc: 0x02FA,
        ..Registers::power_on()
    });
    assert_eq!(board.step(), 7);
    assert_eq!(board.cpu.pc(), 0x030D);
}

#[test]
fn lda_immediate_after_reset() {
    let mut board = Board::booted(&[0xA9, 0xFF]);
    board.run(2);
    assert_eq!(board.cpu.regs().a, 0xFF);
    let sync: Vec<bool> = board.cycles.iter().map(|c| c.sync).collect();
    assert_eq!(sync, [true, false]);
}

#[test]
fn inc_abs_x_across_page() {
    let mut board = Board::booted(&[0xFE, 0xFF, 0xCF]);
    board.cpu.regs_mut().x = 5;
    board.poke(0xD004, 0x41);
    assert_eq!(board.step(), 7);
    assert_eq!(board.peek(0xD004), 0x42);

    let trace: Vec<(u16, bool)> = board.cycles.iter().map(|c| (c.address, c.write)).collect();
    assert_eq!(
        trace,
        [
            (0x0200, false), // opcode
            (0x0201, false), // low operand
            (0x0202, false), // high operand
            (0x0202, false), // page fixup
            (0xD004, false), // read
            (0xD004, false), // modify
            (0xD004, true),  // write
        ]
    );
}

#[test]
fn jsr_then_rts() {
    let mut board = Board::booted(&[0x20, 0x00, 0xD0]);
    board.poke(0xD000, 0x60); // RTS

    assert_eq!(board.step(), 6);
    assert_eq!(board.cpu.pc(), 0xD000);
    assert_eq!(board.cpu.regs().sp, 0xFB);
    // Return address minus one, high byte pushed first.
    assert_eq!(board.peek(0x01FD), 0x02);
    assert_eq!(board.peek(0x01FC), 0x02);

    assert_eq!(board.step(), 6);
    assert_eq!(board.cpu.pc(), 0x0203);
    assert_eq!(board.cpu.regs().sp, 0xFD);
}

#[test]
fn brk_pushes_and_vectors() {
    let mut board = Board::booted(&[0x00, 0xEA]);
    board.poke(0xFFFE, 0x00);
    board.poke(0xFFFF, 0xD0);

    assert_eq!(board.step(), 7);
    assert_eq!(board.cpu.pc(), 0xD000);
    assert_eq!(board.peek(0x01FD), 0x02);
    assert_eq!(board.peek(0x01FC), 0x02); // skips the signature byte
    assert_ne!(board.peek(0x01FB) & 0x10, 0, "BRK pushes B set");

    let vector_pull: Vec<bool> = board.cycles.iter().map(|c| c.vector_pull).collect();
    assert_eq!(vector_pull, [false, false, false, false, false, true, true]);
}

#[test]
fn sized_nops_consume_operands() {
    let mut board = Board::booted(&[0x02, 0xFF, 0x44, 0xFF, 0x5C, 0xFF, 0xFF, 0x03, 0xEA]);
    assert_eq!(board.step(), 2);
    assert_eq!(board.cpu.pc(), PROGRAM + 2);
    assert_eq!(board.step(), 3);
    assert_eq!(board.cpu.pc(), PROGRAM + 4);
    assert_eq!(board.step(), 4);
    assert_eq!(board.cpu.pc(), PROGRAM + 7);
    assert_eq!(board.step(), 2);
    assert_eq!(board.cpu.pc(), PROGRAM + 8);
}

#[test]
fn implied_nop_policy() {
    let cpu = W65C02::with_config(CpuConfig {
        undocumented: UndocumentedOpcodes::ImpliedNop,
        ..CpuConfig::default()
    });
    let mut board = Board::new(cpu, &[0x5C, 0x02]);
    board.run(7);
    assert_eq!(board.step(), 2);
    assert_eq!(board.cpu.pc(), PROGRAM + 1);
    assert_eq!(board.step(), 2);
    assert_eq!(board.cpu.pc(), PROGRAM + 2);
}

#[test]
fn interrupt_sequences_take_seven_cycles() {
    let mut board = Board::booted(&[0x58, 0xEA]); // CLI; NOP
    board.bus.irq.set_enabled(true);
    assert_eq!(board.step(), 2);
    assert_eq!(board.step(), 7);
    assert_eq!(board.cpu.pc(), IRQ_HANDLER);
}
