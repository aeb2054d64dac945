/*
 * Filename: /src/monitor/editor.rs
 * Project: rv68kmon
 * Created Date: 2022-10-05, 11:44:17
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

//! memory and register editing: nibble entry, insert/delete, block copy and
//! relative offset computation.

use super::{Monitor, State};
use crate::monitor::mon_error::MonError;
use crate::monitor::registers::EditSize;
use log::*;

impl Monitor {
    /**
     * hex key in address entry: rotate the nibble into the active address.
     * the first nibble after selecting the field replaces the old value.
     */
    pub(super) fn address_hex(&mut self, nibble: u8) -> Result<(), MonError> {
        if !self.entry_started {
            self.display_pc = 0;
        }
        self.entry_started = true;
        self.display_pc = (self.display_pc << 4) | nibble as u32;
        self.curr_inst = self.display_pc;
        self.read_memory()?;
        self.led.dot_range(3, 8);
        Ok(())
    }

    /**
     * hex key in data entry: rotate the nibble into the byte at the active
     * address. the updated byte is written back immediately.
     */
    pub(super) fn data_hex(&mut self, nibble: u8) -> Result<(), MonError> {
        let mut b = self.mem.read_byte(self.display_pc as usize)?;
        if !self.entry_started {
            b = 0;
        }
        self.entry_started = true;
        b = (b << 4) | nibble;
        self.mem.write_byte(self.display_pc as usize, b)?;
        self.read_memory()?;
        self.led.dot_range(0, 2);
        Ok(())
    }

    /**
     * hex key in register entry: rotate the nibble into the low edit_size
     * bytes of the selected register.
     */
    pub(super) fn reg_hex(&mut self, nibble: u8) {
        if let Some(r) = self.edit_register {
            let size = if r.is_data() {
                self.edit_size
            } else {
                EditSize::Long
            };
            self.regs
                .key_nibble(r, size, self.entry_started, nibble);
            self.entry_started = true;
            self.led.put_long(self.regs.get(r));
            self.dot_register();
        }
    }

    /**
     * hex key in the copy/offset states: rotate the nibble into the active
     * address. unlike address entry no memory read occurs, the captured
     * value may point anywhere.
     */
    pub(super) fn word_enter(&mut self, nibble: u8) {
        if !self.entry_started {
            self.display_pc = 0;
        }
        self.entry_started = true;
        self.display_pc = (self.display_pc << 4) | nibble as u32;
        self.led.put_address(self.display_pc);
        self.led.dot_range(3, 8);
    }

    /**
     * COPY: begin the three-stage block copy, prompting for the start
     * address.
     */
    pub(super) fn copy_block(&mut self) {
        self.state = State::CopyStart;
        self.led.put_address(self.display_pc);
        self.led.dot_range(3, 8);
        self.led.print(5, " -S");
        self.entry_started = false;
    }

    /**
     * GO in the copy-destination stage: perform the copy. end must lie
     * strictly above start. the copy runs forward a byte at a time, a
     * destination inside the source range above start corrupts the data.
     */
    pub(super) fn copy_data(&mut self) -> Result<(), MonError> {
        let destination = self.display_pc;
        if self.end <= self.start {
            warn!(
                "copy with end ${:06x} <= start ${:06x}",
                self.end, self.start
            );
            self.print_error();
            return Ok(());
        }

        let count = self.end - self.start;
        debug!(
            "copying {} bytes, ${:06x} -> ${:06x}",
            count, self.start, destination
        );
        for j in 0..count {
            let b = self.mem.read_byte((self.start.wrapping_add(j)) as usize)?;
            self.mem
                .write_byte((destination.wrapping_add(j)) as usize, b)?;
        }

        self.curr_inst = destination;
        self.display_pc = destination;
        self.read_memory()?;
        self.led.dot_range(0, 2);
        self.state = State::InputData;
        Ok(())
    }

    /**
     * REL: begin offset computation, the active address is the patch
     * location.
     */
    pub(super) fn compute_relative(&mut self) {
        self.state = State::CompOffset;
        self.start = self.display_pc;
        self.led.put_address(self.display_pc);
        self.led.dot_range(3, 8);
        self.led.print(5, " -d");
        self.entry_started = false;
    }

    /**
     * GO in the offset state: compute the relative branch offset from the
     * patch location to the entered destination and write it back.
     *
     * an odd patch address means an 8-bit displacement (the second byte of
     * a Bcc.S, or of a (d8,An,Xn) extension word when it does not start
     * the current instruction). an even one means a 16-bit displacement
     * (Bcc.W, DBcc, (d16,PC)).
     */
    pub(super) fn find_offset(&mut self) -> Result<(), MonError> {
        let destination = self.display_pc;
        if self.start & 1 != 0 {
            let delta = if self.start.wrapping_sub(1) == (self.curr_inst & !1) {
                // second byte of a short branch opcode
                destination.wrapping_sub(self.start).wrapping_sub(1)
            } else {
                // second byte of an extension word
                destination.wrapping_sub(self.start).wrapping_add(1)
            };
            self.mem.write_byte(self.start as usize, delta as u8)?;
        } else {
            let delta = destination.wrapping_sub(self.start);
            self.mem.write_word_be(self.start as usize, delta as u16)?;
        }

        self.display_pc = self.start;
        self.read_memory()?;
        self.led.dot_range(0, 2);
        self.state = State::InputData;
        Ok(())
    }

    /**
     * INS: make room for one byte at the active address by shifting the
     * following shift_size bytes up. the freed byte is zeroed and the
     * active address advances onto it.
     */
    pub(super) fn insert_byte(&mut self) -> Result<(), MonError> {
        let base = self.display_pc as usize;
        for j in (1..=self.shift_size as usize).rev() {
            let b = self.mem.read_byte(base + j - 1)?;
            self.mem.write_byte(base + j, b)?;
        }
        self.mem.write_byte(base + 1, 0)?;

        self.display_pc = self.display_pc.wrapping_add(1);
        if self.display_pc >= self.next_inst {
            self.curr_inst = self.display_pc;
        }
        self.read_memory()?;
        self.led.dot_range(0, 2);
        self.state = State::InputData;
        Ok(())
    }

    /**
     * DEL: drop the byte at the active address by shifting the following
     * shift_size bytes down. the active address stays put, now showing
     * the byte that followed.
     */
    pub(super) fn delete_byte(&mut self) -> Result<(), MonError> {
        let base = self.display_pc as usize;
        for j in 0..self.shift_size as usize {
            let b = self.mem.read_byte(base + j + 1)?;
            self.mem.write_byte(base + j, b)?;
        }

        self.read_memory()?;
        self.led.dot_range(0, 2);
        self.state = State::InputData;
        Ok(())
    }
}
