/*
 * Filename: /src/serial/srecord.rs
 * Project: rv68kmon
 * Created Date: 2022-10-04, 09:32:17
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
use crate::monitor::mon_error::MonError;
use crate::serial::{from_hex_digit, Transport};
use log::*;

/**
 * one inbound motorola s-record load session.
 *
 * accepted record types: S0 (header, ignored), S1 (16-bit address), S2
 * (24-bit address), S8/S9 (end of session). payload bytes are written
 * straight to target memory as they decode; a checksum mismatch marks the
 * session but never aborts it, the final report goes to the transport
 * after the terminating record.
 */
pub struct LoadSession<'a> {
    transport: &'a mut dyn Transport,

    /// running 8-bit sum of the decoded record bytes.
    bcc: u8,

    /// sticky for the whole session.
    bcc_error: bool,
}

impl<'a> LoadSession<'a> {
    pub fn new(transport: &'a mut dyn Transport) -> LoadSession<'a> {
        LoadSession {
            transport: transport,
            bcc: 0,
            bcc_error: false,
        }
    }

    /**
     * decode one byte from two ascii hex chars, accumulating the checksum.
     */
    fn get_hex(&mut self) -> u8 {
        let a = self.transport.get_byte();
        let b = self.transport.get_byte();
        let v = (from_hex_digit(a) << 4) | from_hex_digit(b);
        self.bcc = self.bcc.wrapping_add(v);
        v
    }

    fn get_16bit_address(&mut self) -> u32 {
        let mut load_address: u32 = 0;
        load_address |= self.get_hex() as u32;
        load_address <<= 8;
        load_address |= self.get_hex() as u32;
        load_address
    }

    fn get_24bit_address(&mut self) -> u32 {
        let mut load_address: u32 = 0;
        load_address |= self.get_hex() as u32;
        load_address <<= 8;
        load_address |= self.get_hex() as u32;
        load_address <<= 8;
        load_address |= self.get_hex() as u32;
        load_address
    }

    /**
     * decode one data record (S1 or S2) and write its payload to memory.
     *
     * the declared byte count covers address + payload + checksum, so the
     * payload length is count minus 3 (S1) or 4 (S2).
     */
    fn read_data_record(&mut self, mem: &mut dyn Memory, wide: bool) -> Result<(), MonError> {
        self.bcc = 0;
        let overhead = if wide { 4u8 } else { 3u8 };
        let byte_count = self.get_hex().wrapping_sub(overhead);
        let address = if wide {
            self.get_24bit_address()
        } else {
            self.get_16bit_address()
        };

        for i in 0..byte_count as u32 {
            let b = self.get_hex();
            mem.write_byte((address + i) as usize, b)?;
        }

        // one's complement of the running sum against the trailing byte
        let sum = !self.bcc;
        debug!(
            "record: {} bytes at ${:06x}, bcc=${:02x}",
            byte_count, address, sum
        );
        if sum != self.get_hex() {
            warn!("check sum mismatch in record at ${:06x}", address);
            self.bcc_error = true;
        }
        Ok(())
    }

    /**
     * run the session to its terminating record.
     *
     * returns false if any record had a checksum mismatch; the matching
     * report has already been sent to the transport either way.
     */
    pub fn run(&mut self, mem: &mut dyn Memory) -> Result<bool, MonError> {
        self.bcc_error = false;
        let mut done = false;

        while !done {
            // scan for the sync byte, discard anything else
            while self.transport.get_byte() != b'S' {
                continue;
            }

            match self.transport.get_byte() {
                // header record, nothing to do (its body carries no 'S')
                b'0' => (),
                b'1' => self.read_data_record(mem, false)?,
                b'2' => self.read_data_record(mem, true)?,
                b'8' | b'9' => done = true,
                _ => (),
            }
        }

        if self.bcc_error {
            self.transport.puts("\r\ncheck sum errors!\r\n");
            Ok(false)
        } else {
            self.transport.puts("\r\nload successfull!\r\n");
            Ok(true)
        }
    }
}
