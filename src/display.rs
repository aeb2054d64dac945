/*
 * Filename: /src/display.rs
 * Project: rv68kmon
 * Created Date: 2022-10-03, 09:12:40
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

use lazy_static::*;

lazy_static! {
    /**
     * bit patterns for the LED segments, indexed 0-9, A-Z, [\]^_.
     *
     * segment bit numbers:
     *
     * ```text
     *    .-3-.
     *    2   4
     *    .-1-.
     *    0   5
     *    .-7-.*6
     * ```
     */
    pub(crate) static ref LED_FONT: Vec<u8> = vec![
        0xbd, 0x30, 0x9b, 0xba, 0x36, 0xae, 0xaf, 0x38, 0xbf, 0xbe, // 0123456789
        0x3f, 0xa7, 0x8d, 0xb3, 0x8f, 0x0f, 0xad, 0x37, 0x20, 0xb1, // AbCdEFGhiJ
        0x97, 0x85, 0x29, 0x23, 0xa3, 0x1f, 0x3e, 0x03, 0xae, 0x87, // KLMnoPqrSt
        0xb5, 0xa1, 0x94, 0x8a, 0xb6, 0x9b,                         // UvWXyZ
        0x8d, 0x26, 0xb8, 0x1c, 0x80                                // [\]^_
    ];
}

/// decimal point segment.
pub const LED_SEG_POINT: u8 = 0x40;

/// the minus sign (middle segment only).
pub const LED_SEG_MINUS: u8 = 0x02;

/// marker pattern shown on cell 2 when a breakpoint sits at the address.
pub const LED_SEG_BREAK: u8 = 0x1e;

/**
 * font index for an ascii digit or (uppercase) letter.
 */
fn font_index(c: u8) -> usize {
    if c < 0x40 {
        (c - 0x30) as usize
    } else {
        (c - 0x37) as usize
    }
}

/**
 * segment pattern for a hex nibble.
 */
pub(crate) fn font_nibble(n: u8) -> u8 {
    LED_FONT[(n & 0xf) as usize]
}

/**
 * the 8-cell segment buffer the monitor renders into.
 *
 * cell 0 is the rightmost digit. cells 0-1 show the data byte, cell 2 the
 * breakpoint marker, cells 3-7 the address.
 */
pub struct LedBuffer {
    cells: [u8; 8],
}

impl LedBuffer {
    pub fn new() -> LedBuffer {
        LedBuffer { cells: [0; 8] }
    }

    /**
     * the raw segment cells, for the panel driver.
     */
    pub fn cells(&self) -> &[u8; 8] {
        &self.cells
    }

    pub fn set(&mut self, idx: usize, pattern: u8) {
        self.cells[idx] = pattern;
    }

    /**
     * print text starting at offset (0 = leftmost). allowed chars are
     * digits, letters (upper and lower), space and minus. if bit 7 of the
     * byte is set, the decimal point of that cell is switched on too.
     */
    pub fn print(&mut self, offset: usize, text: &str) {
        let mut i = 7i32 - offset as i32;
        for &b in text.as_bytes() {
            if i < 0 {
                break;
            }
            let c = b & 0x7f;
            if c == b'-' {
                self.cells[i as usize] = LED_SEG_MINUS;
            } else if c < b'0' || (c > b'9' && c < b'A') {
                // unimplemented character
                self.cells[i as usize] = 0;
            } else {
                let folded = if c >= 0x60 { c - 0x20 } else { c };
                self.cells[i as usize] = LED_FONT[font_index(folded)];
            }
            if b & 0x80 != 0 {
                self.cells[i as usize] |= LED_SEG_POINT;
            }
            i -= 1;
        }
    }

    /**
     * switch on the dots from lower (incl.) to upper (excl.), counted from
     * the right, and off everywhere else. marks the active entry field.
     */
    pub fn dot_range(&mut self, lower: usize, upper: usize) {
        for k in 0..8 {
            if k >= lower && k < upper {
                self.cells[k] |= LED_SEG_POINT;
            } else {
                self.cells[k] &= !LED_SEG_POINT;
            }
        }
    }

    /**
     * show a 32-bit value on all 8 digits.
     */
    pub fn put_long(&mut self, n: u32) {
        let mut n = n;
        for k in 0..8 {
            self.cells[k] = LED_FONT[(n & 0xf) as usize];
            n >>= 4;
        }
    }

    /**
     * show the low 20 bits of an address on cells 3-7.
     */
    pub fn put_address(&mut self, addr: u32) {
        let mut a = addr;
        for k in 3..8 {
            self.cells[k] = LED_FONT[(a & 0xf) as usize];
            a >>= 4;
        }
    }

    /**
     * show a byte on cells 0-1.
     */
    pub fn put_data_byte(&mut self, b: u8) {
        self.cells[0] = LED_FONT[(b & 0xf) as usize];
        self.cells[1] = LED_FONT[(b >> 4) as usize];
    }
}

/**
 * driver for the multiplexed 7-segment panel; consumes the rendered cells,
 * performs no monitor logic.
 */
pub trait LedPanel {
    fn render(&mut self, cells: &[u8; 8]);
}

/**
 * driver for the character LCD.
 */
pub trait CharDisplay {
    fn clear(&mut self);
    fn goto_xy(&mut self, x: usize, y: usize);
    fn puts(&mut self, s: &str);
}

struct NullPanel;

impl LedPanel for NullPanel {
    fn render(&mut self, _cells: &[u8; 8]) {}
}

struct NullCharDisplay;

impl CharDisplay for NullCharDisplay {
    fn clear(&mut self) {}
    fn goto_xy(&mut self, _x: usize, _y: usize) {}
    fn puts(&mut self, _s: &str) {}
}

/**
 * a panel driver that drops everything, for boards without the LED array
 * and for tests.
 */
pub fn new_null_panel() -> Box<dyn LedPanel> {
    Box::new(NullPanel {})
}

/**
 * an LCD driver that drops everything.
 */
pub fn new_null_char_display() -> Box<dyn CharDisplay> {
    Box::new(NullCharDisplay {})
}
