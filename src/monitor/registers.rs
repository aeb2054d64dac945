/*
 * Filename: /src/monitor/registers.rs
 * Project: rv68kmon
 * Created Date: 2022-10-02, 11:02:31
 * Author: valerino <xoanino@gmail.com>
 * Copyright (c) 2022 valerino
 *
 * MIT License
 *
 * Copyright (c) 2022 valerino
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of
 * this software and associated documentation files (the "Software"), to deal in
 * the Software without restriction, including without limitation the rights to
 * use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies
 * of the Software, and to permit persons to whom the Software is furnished to do
 * so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use bitflags::bitflags;
use std::fmt::{Display, Error, Formatter};

/// supervisor stack pointer after power up.
pub const INIT_SSP: u32 = 0x20000;

/// user stack pointer after power up.
pub const INIT_USP: u32 = 0x1fc00;

/// user program counter after power up (first ram location past the vectors).
pub const INIT_PC: u32 = 0x00400;

/// status register after power up (supervisor, all interrupts masked).
pub const INIT_SR: u16 = 0x2700;

bitflags! {
    /**
     * flags (values for the SR register).
     */
    pub struct SrFlags : u16 {
        /// C (bit 0), carry.
        const C = 0x0001;
        /// V (bit 1), overflow.
        const V = 0x0002;
        /// Z (bit 2), zero.
        const Z = 0x0004;
        /// N (bit 3), negative.
        const N = 0x0008;
        /// X (bit 4), extend.
        const X = 0x0010;
        /// S (bit 13), supervisor mode.
        const S = 0x2000;
        /// T (bit 15), trace mode.
        const T = 0x8000;
    }
}

/// mask for the interrupt priority level, bits 8-10.
pub const SR_IPL_MASK: u16 = 0x0700;

/**
 * the user registers saved by the monitor when the target traps back.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFile {
    /// data registers D0-D7.
    pub d: [u32; 8],
    /// address registers A0-A6 (A7 is the active stack pointer).
    pub a: [u32; 7],
    /// user stack pointer.
    pub usp: u32,
    /// supervisor stack pointer.
    pub ssp: u32,
    /// status register.
    pub sr: u16,
    /// program counter.
    pub pc: u32,
}

/**
 * selects one register of the file for display/edit, instead of
 * aliasing pointers into it like the original firmware did.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reg {
    /// data register D0-D7.
    D(u8),
    /// address register A0-A6.
    A(u8),
    /// user stack pointer.
    Usp,
    /// supervisor stack pointer.
    Ssp,
}

impl Reg {
    /**
     * true for data registers, the only ones editable in partial widths.
     */
    pub fn is_data(&self) -> bool {
        match self {
            Reg::D(_) => true,
            _ => false,
        }
    }

    /**
     * true for registers holding addresses (An and both stack pointers).
     */
    pub fn is_address(&self) -> bool {
        !self.is_data()
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Reg::D(n) => write!(f, "D{}", n),
            Reg::A(n) => write!(f, "A{}", n),
            Reg::Usp => write!(f, "USP"),
            Reg::Ssp => write!(f, "SSP"),
        }
    }
}

/**
 * how many low-order bytes of a data register the next nibble entry affects.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditSize {
    Byte,
    Word,
    Long,
}

impl EditSize {
    /**
     * size in bytes (1, 2 or 4).
     */
    pub fn bytes(&self) -> u32 {
        match self {
            EditSize::Byte => 1,
            EditSize::Word => 2,
            EditSize::Long => 4,
        }
    }

    /**
     * cycle 4 -> 2 -> 1 -> 4, the DATA key order.
     */
    pub fn cycled(&self) -> EditSize {
        match self {
            EditSize::Long => EditSize::Word,
            EditSize::Word => EditSize::Byte,
            EditSize::Byte => EditSize::Long,
        }
    }
}

impl RegisterFile {
    /**
     * register file with the kit power-up defaults.
     */
    pub fn new() -> RegisterFile {
        RegisterFile {
            d: [0; 8],
            a: [0; 7],
            usp: INIT_USP,
            ssp: INIT_SSP,
            sr: INIT_SR,
            pc: INIT_PC,
        }
    }

    /**
     * read the selected register.
     */
    pub fn get(&self, r: Reg) -> u32 {
        match r {
            Reg::D(n) => self.d[n as usize],
            Reg::A(n) => self.a[n as usize],
            Reg::Usp => self.usp,
            Reg::Ssp => self.ssp,
        }
    }

    /**
     * write the selected register.
     */
    pub fn set(&mut self, r: Reg, v: u32) {
        match r {
            Reg::D(n) => self.d[n as usize] = v,
            Reg::A(n) => self.a[n as usize] = v,
            Reg::Usp => self.usp = v,
            Reg::Ssp => self.ssp = v,
        }
    }

    /**
     * key one hex nibble into the selected register.
     *
     * only the low edit_size bytes rotate, higher bytes are untouched.
     * when the entry is not started yet the affected part is zeroed first.
     */
    pub fn key_nibble(&mut self, r: Reg, size: EditSize, started: bool, nibble: u8) {
        let old = self.get(r);
        let (mask, keep) = match size {
            EditSize::Byte => (0xffu32, old & !0xffu32),
            EditSize::Word => (0xffffu32, old & !0xffffu32),
            EditSize::Long => (0xffffffffu32, 0),
        };
        let low = if started { old & mask } else { 0 };
        let low = ((low << 4) | nibble as u32) & mask;
        self.set(r, keep | low);
    }

    /**
     * true if the supervisor bit is set.
     */
    pub fn supervisor(&self) -> bool {
        (self.sr & SrFlags::S.bits()) != 0
    }

    /**
     * the stack pointer selected by the supervisor bit.
     */
    pub fn active_sp(&self) -> Reg {
        if self.supervisor() {
            Reg::Ssp
        } else {
            Reg::Usp
        }
    }

    /**
     * convert SR to a meaningful string, "TS7XNZVC" style
     */
    pub fn sr_to_string(&self) -> String {
        let sr = self.sr;
        let p = SrFlags::from_bits_truncate(sr);
        format!(
            "{}{}{}{}{}{}{}{}",
            if p.contains(SrFlags::T) { "T" } else { "-" },
            if p.contains(SrFlags::S) { "S" } else { "-" },
            ((sr & SR_IPL_MASK) >> 8),
            if p.contains(SrFlags::X) { "X" } else { "-" },
            if p.contains(SrFlags::N) { "N" } else { "-" },
            if p.contains(SrFlags::Z) { "Z" } else { "-" },
            if p.contains(SrFlags::V) { "V" } else { "-" },
            if p.contains(SrFlags::C) { "C" } else { "-" },
        )
    }
}

impl Display for RegisterFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "PC: ${:08x}, SR: ${:04x}({}), USP: ${:08x}, SSP: ${:08x}",
            self.pc,
            self.sr,
            self.sr_to_string(),
            self.usp,
            self.ssp,
        )
    }
}
