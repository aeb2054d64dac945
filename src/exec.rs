/*
 * Filename: /src/exec.rs
 * Project: rv68kmon
 * Created Date: 2022-10-03, 10:40:08
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

use crate::memory::Memory;
use crate::monitor::breakpoints::BreakpointSet;
use crate::monitor::mon_error::MonError;
use crate::monitor::registers::RegisterFile;
use std::fmt::{Display, Error, Formatter};

/**
 * exception raised by the target program, observed by the monitor after
 * control comes back through the trap handlers.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exception {
    BusError,
    AddressError,
    IllegalInstruction,
    DivideByZero,
    Check,
    TrapOverflow,
    Privilege,
    LineA,
    LineF,
    SpuriousInterrupt,
    UnhandledTrap,
}

impl Exception {
    /**
     * the short code shown on the LED next to "Err ".
     */
    pub fn led_label(&self) -> &'static str {
        match self {
            Exception::BusError => "bUS ",
            Exception::AddressError => "Addr",
            Exception::IllegalInstruction => "1LLE",
            Exception::DivideByZero => "div0",
            Exception::Check => "Chk ",
            Exception::TrapOverflow => "trPv",
            Exception::Privilege => "Priv",
            Exception::LineA => "LinA",
            Exception::LineF => "LinF",
            Exception::SpuriousInterrupt => "1ntr",
            Exception::UnhandledTrap => "trAP",
        }
    }
}

impl Display for Exception {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.led_label().trim_end())
    }
}

/**
 * the target-execution primitives, implemented board-side in assembly:
 * context switch to/from the user program, trap vector installation,
 * TRAP #1 patching while breakpoints are armed.
 *
 * run/step calls block until the target traps back to the monitor; the
 * register file then holds the updated user context and the return value
 * carries the exception kind, if one was raised.
 */
pub trait ExecControl {
    /// run from the user PC until a breakpoint or exception.
    fn continue_run(&mut self, regs: &mut RegisterFile, mem: &mut dyn Memory) -> Option<Exception>;

    /// execute one instruction, following calls and traps.
    fn step_into(&mut self, regs: &mut RegisterFile, mem: &mut dyn Memory) -> Option<Exception>;

    /// execute one instruction, running subroutine calls to completion.
    fn step_over(&mut self, regs: &mut RegisterFile, mem: &mut dyn Memory) -> Option<Exception>;

    /// run until the current subroutine returns.
    fn step_out(&mut self, regs: &mut RegisterFile, mem: &mut dyn Memory) -> Option<Exception>;

    /// resume after a breakpoint hit without immediately re-trapping.
    fn continue_after_breakpoint(
        &mut self,
        regs: &mut RegisterFile,
        mem: &mut dyn Memory,
    ) -> Option<Exception>;

    /**
     * install TRAP #1 at every breakpoint address, saving the original
     * instruction words into the set.
     */
    fn arm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        mem: &mut dyn Memory,
    ) -> Result<(), MonError>;

    /**
     * restore the original instruction words if the set is armed.
     */
    fn disarm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        mem: &mut dyn Memory,
    ) -> Result<(), MonError>;

    /// unmask interrupt level 2 (the kit's IRQ key).
    fn enable_interrupt_level(&mut self);
}

/**
 * consumes a code address, renders one instruction and returns the address
 * past it.
 */
pub trait Disassembler {
    fn disassemble(&mut self, mem: &mut dyn Memory, cursor: u32) -> Result<(String, u32), MonError>;
}

/// TRAP #1 opcode, installed at armed breakpoint addresses.
pub const TRAP1_OPCODE: u16 = 0x4e41;

/**
 * execution control that never runs anything: register file untouched, no
 * exception. arm/disarm still patch TRAP #1 opcodes in and out of target
 * memory through the breakpoint table. stands in when no target back-end
 * is attached (tests, the kit_sim binary).
 */
struct NullExec;

impl ExecControl for NullExec {
    fn continue_run(
        &mut self,
        _regs: &mut RegisterFile,
        _mem: &mut dyn Memory,
    ) -> Option<Exception> {
        None
    }

    fn step_into(&mut self, _regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        None
    }

    fn step_over(&mut self, _regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        None
    }

    fn step_out(&mut self, _regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        None
    }

    fn continue_after_breakpoint(
        &mut self,
        _regs: &mut RegisterFile,
        _mem: &mut dyn Memory,
    ) -> Option<Exception> {
        None
    }

    fn arm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        mem: &mut dyn Memory,
    ) -> Result<(), MonError> {
        if bps.is_armed() {
            return Ok(());
        }
        for idx in 0..bps.len() {
            let addr = bps.addresses()[idx] as usize;
            let w = mem.read_word_be(addr)?;
            bps.set_orig_instr(idx, w);
            mem.write_word_be(addr, TRAP1_OPCODE)?;
        }
        bps.set_armed(true);
        Ok(())
    }

    fn disarm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        mem: &mut dyn Memory,
    ) -> Result<(), MonError> {
        if bps.is_armed() {
            for idx in 0..bps.len() {
                let addr = bps.addresses()[idx] as usize;
                mem.write_word_be(addr, bps.orig_instr(idx))?;
            }
        }
        bps.set_armed(false);
        Ok(())
    }

    fn enable_interrupt_level(&mut self) {}
}

/**
 * fallback disassembler: renders every instruction as a dc.w constant and
 * advances one word.
 */
struct DcwDisassembler;

impl Disassembler for DcwDisassembler {
    fn disassemble(&mut self, mem: &mut dyn Memory, cursor: u32) -> Result<(String, u32), MonError> {
        let aligned = cursor & !1;
        let w = mem.read_word_be(aligned as usize)?;
        Ok((format!("dc.w\t${:04x}", w), aligned.wrapping_add(2)))
    }
}

pub fn new_null_exec() -> Box<dyn ExecControl> {
    Box::new(NullExec {})
}

pub fn new_dcw_disassembler() -> Box<dyn Disassembler> {
    Box::new(DcwDisassembler {})
}
