/*
 * Filename: /src/monitor/breakpoints.rs
 * Project: rv68kmon
 * Created Date: 2022-10-02, 11:25:46
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

/// how many breakpoints fit in the table.
pub const MAX_BP: usize = 8;

/**
 * the breakpoint table: a bounded set of target addresses, kept strictly
 * ascending and dense.
 *
 * the companion word for each slot holds the original instruction replaced
 * by TRAP #1 while the table is armed; patching itself is done board-side
 * by the execution-control collaborator, the table only carries the words
 * for the hand-off.
 */
pub struct BreakpointSet {
    addrs: [u32; MAX_BP],
    orig_instr: [u16; MAX_BP],
    num: usize,
    armed: bool,
}

impl BreakpointSet {
    /**
     * creates an empty, disarmed set.
     */
    pub fn new() -> BreakpointSet {
        BreakpointSet {
            addrs: [0; MAX_BP],
            orig_instr: [0; MAX_BP],
            num: 0,
            armed: false,
        }
    }

    /**
     * add the address if absent, remove it if present.
     *
     * odd addresses are silently rejected (68000 instructions are word
     * aligned). when the table is full the insert is silently dropped,
     * bounded-resource policy inherited from the firmware.
     */
    pub fn toggle(&mut self, address: u32) {
        if address & 1 != 0 {
            return;
        }

        for j in 0..self.num {
            if address == self.addrs[j] {
                // breakpoint exists at address, delete it sliding down the ones above
                for k in j..self.num - 1 {
                    self.addrs[k] = self.addrs[k + 1];
                    self.orig_instr[k] = self.orig_instr[k + 1];
                }
                self.num -= 1;
                return;
            } else if address < self.addrs[j] {
                // insert new breakpoint here, sliding up the ones above
                if self.num < MAX_BP {
                    for k in (j + 1..=self.num).rev() {
                        self.addrs[k] = self.addrs[k - 1];
                        self.orig_instr[k] = self.orig_instr[k - 1];
                    }
                    self.addrs[j] = address;
                    self.num += 1;
                }
                // no space for breakpoint otherwise
                return;
            }
            // else next
        }
        if self.num < MAX_BP {
            // insert new breakpoint above all previous ones
            self.addrs[self.num] = address;
            self.num += 1;
        }
    }

    /**
     * true if a breakpoint is registered exactly at the given address.
     */
    pub fn contains(&self, address: u32) -> bool {
        for j in 0..self.num {
            if self.addrs[j] == address {
                return true;
            }
        }
        false
    }

    /**
     * empties the table and drops the armed flag.
     */
    pub fn clear_all(&mut self) {
        self.num = 0;
        self.armed = false;
    }

    /**
     * number of breakpoints set.
     */
    pub fn len(&self) -> usize {
        self.num
    }

    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /**
     * the registered addresses, ascending (snapshot, do not mutate while
     * holding it).
     */
    pub fn addresses(&self) -> &[u32] {
        &self.addrs[..self.num]
    }

    /**
     * the original instruction word carried for slot idx.
     */
    pub fn orig_instr(&self, idx: usize) -> u16 {
        self.orig_instr[idx]
    }

    /**
     * store the original instruction word for slot idx (called by the
     * execution-control collaborator while arming).
     */
    pub fn set_orig_instr(&mut self, idx: usize, word: u16) {
        self.orig_instr[idx] = word;
    }

    /**
     * whether trap opcodes are currently installed at the addresses.
     */
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }
}
