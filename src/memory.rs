/*
 * Filename: /src/memory.rs
 * Project: rv68kmon
 * Created Date: 2022-10-02, 10:44:18
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

use crate::monitor::mon_error;
use crate::monitor::mon_error::{MonError, MonErrorType};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::prelude::*;
use std::io::Cursor;

/**
 * trait for the target address space seen by the monitor.
 *
 * the 68000 bus is big-endian, all word/long accessors are BE.
 */
pub trait Memory {
    /**
     * reads a byte at address.
     */
    fn read_byte(&mut self, address: usize) -> Result<u8, MonError>;

    /**
     * reads a word (big-endian) at address.
     */
    fn read_word_be(&mut self, address: usize) -> Result<u16, MonError>;

    /**
     * reads a long (big-endian) at address.
     */
    fn read_long_be(&mut self, address: usize) -> Result<u32, MonError>;

    /**
     * writes a byte at address.
     */
    fn write_byte(&mut self, address: usize, b: u8) -> Result<(), MonError>;

    /**
     * writes a word (big-endian) at address.
     */
    fn write_word_be(&mut self, address: usize, w: u16) -> Result<(), MonError>;

    /**
     * writes a long (big-endian) at address.
     */
    fn write_long_be(&mut self, address: usize, l: u32) -> Result<(), MonError>;

    /**
     * get memory size.
     */
    fn get_size(&self) -> usize;

    /**
     * load a raw image in memory at address.
     */
    fn load(&mut self, path: &str, address: usize) -> Result<(), MonError>;

    /**
     * gets a reference to the underlying buffer.
     */
    fn as_vec(&self) -> &Vec<u8>;
}

/**
 * default implementation of the Memory trait, a flat ram window
 * (the kit maps 128kB of ram at 0x00000-0x1ffff).
 */
struct DefaultMemory {
    size: usize,
    cur: Cursor<Vec<u8>>,
}

impl Memory for DefaultMemory {
    fn as_vec(&self) -> &Vec<u8> {
        let v = self.cur.get_ref();
        v
    }

    fn read_byte(&mut self, address: usize) -> Result<u8, MonError> {
        mon_error::check_address_boundaries(self.size, address, 1, MonErrorType::MemoryRead, None)?;
        self.cur.set_position(address as u64);
        let res = self.cur.read_u8()?;
        Ok(res)
    }

    fn read_word_be(&mut self, address: usize) -> Result<u16, MonError> {
        mon_error::check_address_boundaries(self.size, address, 2, MonErrorType::MemoryRead, None)?;
        self.cur.set_position(address as u64);
        let res = self.cur.read_u16::<BigEndian>()?;
        Ok(res)
    }

    fn read_long_be(&mut self, address: usize) -> Result<u32, MonError> {
        mon_error::check_address_boundaries(self.size, address, 4, MonErrorType::MemoryRead, None)?;
        self.cur.set_position(address as u64);
        let res = self.cur.read_u32::<BigEndian>()?;
        Ok(res)
    }

    fn write_byte(&mut self, address: usize, b: u8) -> Result<(), MonError> {
        mon_error::check_address_boundaries(self.size, address, 1, MonErrorType::MemoryWrite, None)?;
        self.cur.set_position(address as u64);
        self.cur.write_u8(b)?;
        Ok(())
    }

    fn write_word_be(&mut self, address: usize, w: u16) -> Result<(), MonError> {
        mon_error::check_address_boundaries(self.size, address, 2, MonErrorType::MemoryWrite, None)?;
        self.cur.set_position(address as u64);
        let res = self.cur.write_u16::<BigEndian>(w)?;
        Ok(res)
    }

    fn write_long_be(&mut self, address: usize, l: u32) -> Result<(), MonError> {
        mon_error::check_address_boundaries(self.size, address, 4, MonErrorType::MemoryWrite, None)?;
        self.cur.set_position(address as u64);
        let res = self.cur.write_u32::<BigEndian>(l)?;
        Ok(res)
    }

    fn get_size(&self) -> usize {
        self.size
    }

    fn load(&mut self, path: &str, address: usize) -> Result<(), MonError> {
        // check filesize
        let attr = std::fs::metadata(path)?;
        mon_error::check_address_boundaries(
            self.size,
            address,
            attr.len() as usize,
            MonErrorType::MemoryLoad,
            None,
        )?;

        // read file to a tmp vec
        let mut f = File::open(path)?;
        let mut tmp: Vec<u8> = Vec::new();
        f.read_to_end(&mut tmp)?;

        // copy in memory at the given offset
        let m = self.cur.get_mut();
        m[address..address + tmp.len()].copy_from_slice(&tmp);
        Ok(())
    }
}

/**
 * returns an instance of DefaultMemory with the given size.
 */
pub fn new_default(size: usize) -> Box<dyn Memory> {
    // create memory, filled with zeroes
    let m = DefaultMemory {
        size: size,
        cur: Cursor::new(vec![0; size]),
    };

    Box::new(m)
}
