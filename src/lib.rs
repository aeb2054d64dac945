/*
 * Filename: /src/lib.rs
 * Project: rv68kmon
 * Created Date: 2022-10-02, 10:05:12
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

//! monitor core for the 68008 microprocessor kit: keypad state machine,
//! breakpoints, software uart + s-record loader, memory/register editor.
//!
//! cpu execution (context switch, trap patching), the disassembler and the
//! physical display/keypad drivers live board-side and are attached through
//! the traits in [exec] and [display].

pub mod display;
pub mod exec;
pub mod memory;
pub mod monitor;
pub mod serial;
