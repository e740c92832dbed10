//! Per-mnemonic instruction semantics.
//!
//! An [`Operation`] knows what an instruction does to registers and to the
//! operand byte. It never decides when the bus is touched; that belongs to
//! the addressing mode's micro-op sequence, which calls back into the
//! operation at the right cycle through one of the entry points below.

use crate::CpuState;
use crate::status::{C, D, I, N, V, Z};

/// How an operation interacts with its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Consumes a byte read from memory (LDA, ADC, PLA).
    Read,
    /// Produces a byte to be written (STA, PHA).
    Write,
    /// Reads, transforms and writes back a byte (ASL, INC, TSB).
    Modify,
    /// Works on registers only (TAX, CLC).
    Implied,
    /// Decides whether a relative branch is taken.
    Branch,
    /// Flow control carried out entirely by the addressing mode (JMP, JSR, RTS).
    Control,
}

/// Every 65C02 mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Loads, stores, ALU
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Stz,
    Adc,
    Sbc,
    And,
    Ora,
    Eor,
    Cmp,
    Cpx,
    Cpy,
    Bit,
    /// `BIT #` only touches Z.
    BitImmediate,

    // Read-modify-write
    Asl,
    Lsr,
    Rol,
    Ror,
    Inc,
    Dec,
    Tsb,
    Trb,
    Rmb(u8),
    Smb(u8),

    // Register transfers and counters
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    Inx,
    Iny,
    Dex,
    Dey,

    // Flags
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,

    // Stack
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,

    // Branches
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    Bra,
    Bbr(u8),
    Bbs(u8),

    // Flow control
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,

    // Processor control
    Nop,
    Wai,
    Stp,
}

const RMB: [&str; 8] = ["RMB0", "RMB1", "RMB2", "RMB3", "RMB4", "RMB5", "RMB6", "RMB7"];
const SMB: [&str; 8] = ["SMB0", "SMB1", "SMB2", "SMB3", "SMB4", "SMB5", "SMB6", "SMB7"];
const BBR: [&str; 8] = ["BBR0", "BBR1", "BBR2", "BBR3", "BBR4", "BBR5", "BBR6", "BBR7"];
const BBS: [&str; 8] = ["BBS0", "BBS1", "BBS2", "BBS3", "BBS4", "BBS5", "BBS6", "BBS7"];

impl Operation {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Stz => "STZ",
            Self::Adc => "ADC",
            Self::Sbc => "SBC",
            Self::And => "AND",
            Self::Ora => "ORA",
            Self::Eor => "EOR",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Bit | Self::BitImmediate => "BIT",
            Self::Asl => "ASL",
            Self::Lsr => "LSR",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Tsb => "TSB",
            Self::Trb => "TRB",
            Self::Rmb(bit) => RMB[(bit & 7) as usize],
            Self::Smb(bit) => SMB[(bit & 7) as usize],
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Txa => "TXA",
            Self::Tya => "TYA",
            Self::Tsx => "TSX",
            Self::Txs => "TXS",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Clc => "CLC",
            Self::Sec => "SEC",
            Self::Cli => "CLI",
            Self::Sei => "SEI",
            Self::Cld => "CLD",
            Self::Sed => "SED",
            Self::Clv => "CLV",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Phx => "PHX",
            Self::Phy => "PHY",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Plx => "PLX",
            Self::Ply => "PLY",
            Self::Bpl => "BPL",
            Self::Bmi => "BMI",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Bne => "BNE",
            Self::Beq => "BEQ",
            Self::Bra => "BRA",
            Self::Bbr(bit) => BBR[(bit & 7) as usize],
            Self::Bbs(bit) => BBS[(bit & 7) as usize],
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Rts => "RTS",
            Self::Rti => "RTI",
            Self::Brk => "BRK",
            Self::Nop => "NOP",
            Self::Wai => "WAI",
            Self::Stp => "STP",
        }
    }

    /// The operand access class this operation expects from its mode.
    ///
    /// `Nop` is listed as `Implied` but is also accepted by read modes;
    /// see [`Operation::accepts`].
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Lda
            | Self::Ldx
            | Self::Ldy
            | Self::Adc
            | Self::Sbc
            | Self::And
            | Self::Ora
            | Self::Eor
            | Self::Cmp
            | Self::Cpx
            | Self::Cpy
            | Self::Bit
            | Self::BitImmediate
            | Self::Pla
            | Self::Plp
            | Self::Plx
            | Self::Ply => Access::Read,

            Self::Sta | Self::Stx | Self::Sty | Self::Stz => Access::Write,
            Self::Pha | Self::Php | Self::Phx | Self::Phy => Access::Write,

            Self::Asl
            | Self::Lsr
            | Self::Rol
            | Self::Ror
            | Self::Inc
            | Self::Dec
            | Self::Tsb
            | Self::Trb
            | Self::Rmb(_)
            | Self::Smb(_) => Access::Modify,

            Self::Bpl
            | Self::Bmi
            | Self::Bvc
            | Self::Bvs
            | Self::Bcc
            | Self::Bcs
            | Self::Bne
            | Self::Beq
            | Self::Bra
            | Self::Bbr(_)
            | Self::Bbs(_) => Access::Branch,

            Self::Jmp | Self::Jsr | Self::Rts | Self::Rti | Self::Brk => Access::Control,

            _ => Access::Implied,
        }
    }

    /// True if this operation can be bound to a mode of the given class.
    #[must_use]
    pub const fn accepts(self, access: Access) -> bool {
        match (self, access) {
            // Undocumented NOPs borrow read modes to consume their operands.
            (Self::Nop, Access::Read) => true,
            _ => self.access() as u8 == access as u8,
        }
    }

    /// Consume an operand byte.
    pub fn read(self, cpu: &mut CpuState, value: u8) {
        let regs = &mut cpu.regs;
        match self {
            Self::Lda | Self::Pla => {
                regs.a = value;
                regs.p.update_nz(value);
            }
            Self::Ldx | Self::Plx => {
                regs.x = value;
                regs.p.update_nz(value);
            }
            Self::Ldy | Self::Ply => {
                regs.y = value;
                regs.p.update_nz(value);
            }
            Self::Plp => regs.p.set_value(value),
            Self::Ora => {
                regs.a |= value;
                regs.p.update_nz(regs.a);
            }
            Self::And => {
                regs.a &= value;
                regs.p.update_nz(regs.a);
            }
            Self::Eor => {
                regs.a ^= value;
                regs.p.update_nz(regs.a);
            }
            Self::Adc => adc(cpu, value),
            Self::Sbc => sbc(cpu, value),
            Self::Cmp => {
                let a = regs.a;
                compare(cpu, a, value);
            }
            Self::Cpx => {
                let x = regs.x;
                compare(cpu, x, value);
            }
            Self::Cpy => {
                let y = regs.y;
                compare(cpu, y, value);
            }
            Self::Bit => {
                regs.p.set_flag(Z, regs.a & value == 0);
                regs.p.set_flag(N, value & 0x80 != 0);
                regs.p.set_flag(V, value & 0x40 != 0);
            }
            Self::BitImmediate => regs.p.set_flag(Z, regs.a & value == 0),
            _ => {}
        }
    }

    /// Produce the byte a store or push writes.
    #[must_use]
    pub fn write(self, cpu: &CpuState) -> u8 {
        let regs = &cpu.regs;
        match self {
            Self::Sta | Self::Pha => regs.a,
            Self::Stx | Self::Phx => regs.x,
            Self::Sty | Self::Phy => regs.y,
            Self::Php => regs.p.read_value(),
            _ => 0,
        }
    }

    /// Transform an operand byte in place (memory or accumulator).
    pub fn modify(self, cpu: &mut CpuState, value: u8) -> u8 {
        let p = &mut cpu.regs.p;
        match self {
            Self::Asl => {
                p.set_flag(C, value & 0x80 != 0);
                let result = value << 1;
                p.update_nz(result);
                result
            }
            Self::Lsr => {
                p.set_flag(C, value & 0x01 != 0);
                let result = value >> 1;
                p.update_nz(result);
                result
            }
            Self::Rol => {
                let carry = u8::from(p.flag(C));
                p.set_flag(C, value & 0x80 != 0);
                let result = (value << 1) | carry;
                p.update_nz(result);
                result
            }
            Self::Ror => {
                let carry = if p.flag(C) { 0x80 } else { 0 };
                p.set_flag(C, value & 0x01 != 0);
                let result = (value >> 1) | carry;
                p.update_nz(result);
                result
            }
            Self::Inc => {
                let result = value.wrapping_add(1);
                p.update_nz(result);
                result
            }
            Self::Dec => {
                let result = value.wrapping_sub(1);
                p.update_nz(result);
                result
            }
            Self::Tsb => {
                p.set_flag(Z, cpu.regs.a & value == 0);
                value | cpu.regs.a
            }
            Self::Trb => {
                p.set_flag(Z, cpu.regs.a & value == 0);
                value & !cpu.regs.a
            }
            Self::Rmb(bit) => value & !(1 << (bit & 7)),
            Self::Smb(bit) => value | (1 << (bit & 7)),
            _ => value,
        }
    }

    /// Register-only work.
    pub fn implied(self, cpu: &mut CpuState) {
        let regs = &mut cpu.regs;
        match self {
            Self::Tax => {
                regs.x = regs.a;
                regs.p.update_nz(regs.x);
            }
            Self::Tay => {
                regs.y = regs.a;
                regs.p.update_nz(regs.y);
            }
            Self::Txa => {
                regs.a = regs.x;
                regs.p.update_nz(regs.a);
            }
            Self::Tya => {
                regs.a = regs.y;
                regs.p.update_nz(regs.a);
            }
            Self::Tsx => {
                regs.x = regs.sp;
                regs.p.update_nz(regs.x);
            }
            // TXS does not affect flags
            Self::Txs => regs.sp = regs.x,
            Self::Inx => {
                regs.x = regs.x.wrapping_add(1);
                regs.p.update_nz(regs.x);
            }
            Self::Iny => {
                regs.y = regs.y.wrapping_add(1);
                regs.p.update_nz(regs.y);
            }
            Self::Dex => {
                regs.x = regs.x.wrapping_sub(1);
                regs.p.update_nz(regs.x);
            }
            Self::Dey => {
                regs.y = regs.y.wrapping_sub(1);
                regs.p.update_nz(regs.y);
            }
            Self::Clc => regs.p.set_flag(C, false),
            Self::Sec => regs.p.set_flag(C, true),
            Self::Cli => regs.p.set_flag(I, false),
            Self::Sei => regs.p.set_flag(I, true),
            Self::Cld => regs.p.set_flag(D, false),
            Self::Sed => regs.p.set_flag(D, true),
            Self::Clv => regs.p.set_flag(V, false),
            Self::Wai => {
                log::debug!("WAI at ${:04X}: waiting for interrupt", regs.pc);
                cpu.paused = true;
            }
            Self::Stp => {
                log::debug!("STP at ${:04X}: stopped until reset", regs.pc);
                cpu.stopped = true;
            }
            _ => {}
        }
    }

    /// Branch condition. For BBR/BBS the tested byte is in the data register.
    #[must_use]
    pub fn condition(self, cpu: &CpuState) -> bool {
        let p = cpu.regs.p;
        match self {
            Self::Bpl => !p.flag(N),
            Self::Bmi => p.flag(N),
            Self::Bvc => !p.flag(V),
            Self::Bvs => p.flag(V),
            Self::Bcc => !p.flag(C),
            Self::Bcs => p.flag(C),
            Self::Bne => !p.flag(Z),
            Self::Beq => p.flag(Z),
            Self::Bra => true,
            Self::Bbr(bit) => cpu.data_register & (1 << (bit & 7)) == 0,
            Self::Bbs(bit) => cpu.data_register & (1 << (bit & 7)) != 0,
            _ => false,
        }
    }
}

fn compare(cpu: &mut CpuState, register: u8, value: u8) {
    let p = &mut cpu.regs.p;
    p.set_flag(C, register >= value);
    p.update_nz(register.wrapping_sub(value));
}

fn adc(cpu: &mut CpuState, value: u8) {
    if cpu.regs.p.flag(D) {
        adc_decimal(cpu, value);
    } else {
        adc_binary(cpu, value);
    }
}

fn adc_binary(cpu: &mut CpuState, value: u8) {
    let regs = &mut cpu.regs;
    let a = regs.a;
    let sum = u16::from(a) + u16::from(value) + u16::from(regs.p.flag(C));
    let result = sum as u8;

    regs.p.set_flag(C, sum > 0xFF);
    regs.p.set_flag(V, (a ^ result) & (value ^ result) & 0x80 != 0);
    regs.a = result;
    regs.p.update_nz(result);
}

/// 65C02 BCD add: unlike NMOS, N and Z reflect the decimal result.
fn adc_decimal(cpu: &mut CpuState, value: u8) {
    let regs = &mut cpu.regs;
    let a = regs.a;
    let carry = u8::from(regs.p.flag(C));

    let mut lo = (a & 0x0F) + (value & 0x0F) + carry;
    if lo > 9 {
        lo += 6;
    }
    let mut hi = u16::from(a >> 4) + u16::from(value >> 4) + u16::from(lo > 0x0F);

    let intermediate = ((hi << 4) as u8) | (lo & 0x0F);
    regs.p.set_flag(V, (a ^ intermediate) & (value ^ intermediate) & 0x80 != 0);

    if hi > 9 {
        hi += 6;
    }
    regs.p.set_flag(C, hi > 0x0F);
    let result = ((hi << 4) as u8) | (lo & 0x0F);
    regs.a = result;
    regs.p.update_nz(result);
}

fn sbc(cpu: &mut CpuState, value: u8) {
    if cpu.regs.p.flag(D) {
        sbc_decimal(cpu, value);
    } else {
        // SBC is ADC with inverted operand
        adc_binary(cpu, !value);
    }
}

/// 65C02 BCD subtract. C and V follow the binary subtraction.
fn sbc_decimal(cpu: &mut CpuState, value: u8) {
    let regs = &mut cpu.regs;
    let a = regs.a;
    let borrow = i16::from(!regs.p.flag(C));

    let binary = i16::from(a) - i16::from(value) - borrow;
    regs.p.set_flag(C, binary >= 0);
    regs.p.set_flag(
        V,
        (i16::from(a) ^ binary) & (i16::from(a) ^ i16::from(value)) & 0x80 != 0,
    );

    let lo = i16::from(a & 0x0F) - i16::from(value & 0x0F) - borrow;
    let mut result = binary;
    if result < 0 {
        result -= 0x60;
    }
    if lo < 0 {
        result -= 0x06;
    }

    let result = result as u8;
    regs.a = result;
    regs.p.update_nz(result);
}
