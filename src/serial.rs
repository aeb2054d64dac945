/*
 * Filename: /src/serial.rs
 * Project: rv68kmon
 * Created Date: 2022-10-04, 08:50:33
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

pub mod srecord;

/**
 * decode an ascii hex digit (must be 0-9 or A-F).
 */
pub fn from_hex_digit(c: u8) -> u8 {
    if c < 0x40 {
        c.wrapping_sub(0x30)
    } else {
        c.wrapping_sub(0x37)
    }
}

/**
 * supported line speeds for the software uart, 8n1.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baud {
    B2400,
    B4800,
    B9600,
}

impl Baud {
    /**
     * tuned spin counts for (one bit period, one and a half bit periods).
     */
    pub fn delay_counts(&self) -> (u32, u32) {
        match self {
            Baud::B2400 => (0x1a, 0x2b),
            Baud::B4800 => (0x0a, 0x15),
            Baud::B9600 => (0x02, 0x06),
        }
    }
}

/**
 * the bit-period wait, injected as a capability so tests can substitute a
 * deterministic clock for the calibrated busy loops.
 */
pub trait BitPeriod {
    /// block for one bit period.
    fn wait_bit(&mut self);

    /// block for one and a half bit periods, to reach the center of the
    /// first data bit after a start-bit edge.
    fn wait_bit_and_half(&mut self);
}

/**
 * calibrated busy-wait bit periods. the counts are tuned for the kit's
 * 10MHz 68008, on a host they only preserve the ratio.
 */
struct SpinWait {
    b1: u32,
    b2: u32,
}

impl BitPeriod for SpinWait {
    fn wait_bit(&mut self) {
        for _ in 0..self.b1 {
            std::hint::spin_loop();
        }
    }

    fn wait_bit_and_half(&mut self) {
        for _ in 0..self.b2 {
            std::hint::spin_loop();
        }
    }
}

pub fn new_spin_wait(baud: Baud) -> Box<dyn BitPeriod> {
    let (b1, b2) = baud.delay_counts();
    Box::new(SpinWait { b1: b1, b2: b2 })
}

/**
 * the physical serial line, one output and one input level.
 */
pub trait SerialPort {
    /// drive TXD (true = high / idle).
    fn set_tx(&mut self, high: bool);

    /// sample RXD (true = high / idle).
    fn rx_high(&mut self) -> bool;
}

/**
 * byte transport towards the operator terminal, with the ascii-hex and
 * line helpers every monitor report uses.
 *
 * both directions block by construction: send busy-waits every bit period,
 * receive busy-waits for the start bit with no timeout.
 */
pub trait Transport {
    /// transmit one byte.
    fn send_byte(&mut self, b: u8);

    /// block until one byte has been received.
    fn get_byte(&mut self) -> u8;

    /**
     * transmit a byte as two ascii hex digits.
     */
    fn send_hex(&mut self, n: u8) {
        let k = (n >> 4) & 0xf;
        self.send_byte(if k > 9 { k + 0x37 } else { k + 0x30 });
        let k = n & 0xf;
        self.send_byte(if k > 9 { k + 0x37 } else { k + 0x30 });
    }

    /**
     * transmit a 16-bit value as four hex digits.
     */
    fn send_word_hex(&mut self, n: u16) {
        self.send_hex((n >> 8) as u8);
        self.send_hex(n as u8);
    }

    /**
     * transmit a 32-bit value as eight hex digits.
     */
    fn send_long_hex(&mut self, n: u32) {
        self.send_hex((n >> 24) as u8);
        self.send_hex((n >> 16) as u8);
        self.send_hex((n >> 8) as u8);
        self.send_hex(n as u8);
    }

    /**
     * transmit a string byte by byte.
     */
    fn puts(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.send_byte(b);
        }
    }

    fn newline(&mut self) {
        self.send_byte(0x0a);
        self.send_byte(0x0d);
    }
}

/**
 * bit-banged uart over a SerialPort: start bit low, eight data bits lsb
 * first, stop bit high, software timed.
 */
struct SoftUart {
    port: Box<dyn SerialPort>,
    clock: Box<dyn BitPeriod>,
}

impl Transport for SoftUart {
    fn send_byte(&mut self, b: u8) {
        // start bit
        self.port.set_tx(false);
        self.clock.wait_bit();

        let mut n = b;
        for _ in 0..8 {
            self.port.set_tx(n & 1 != 0);
            self.clock.wait_bit();
            n >>= 1;
        }

        // stop bit
        self.port.set_tx(true);
        self.clock.wait_bit();
    }

    fn get_byte(&mut self) -> u8 {
        let mut n: u8 = 0;

        // wait for the start bit
        while self.port.rx_high() {
            continue;
        }
        // align to the center of D0
        self.clock.wait_bit_and_half();

        for _ in 0..7 {
            if self.port.rx_high() {
                n |= 0x80;
            }
            n >>= 1;
            self.clock.wait_bit();
        }
        // center of D7. bit 7 is never sampled and stays clear, monitor
        // traffic is ascii; the remaining half bit plus the stop bit are
        // spent in monitor processing.
        self.clock.wait_bit();
        n
    }
}

/**
 * creates the uart with the calibrated busy-wait clock for the given speed.
 */
pub fn new_soft_uart(port: Box<dyn SerialPort>, baud: Baud) -> Box<dyn Transport> {
    new_soft_uart_with_clock(port, new_spin_wait(baud))
}

/**
 * creates the uart with an explicit bit-period clock (tests pass a
 * simulated one).
 */
pub fn new_soft_uart_with_clock(
    port: Box<dyn SerialPort>,
    clock: Box<dyn BitPeriod>,
) -> Box<dyn Transport> {
    Box::new(SoftUart {
        port: port,
        clock: clock,
    })
}
