/*
 * Filename: /src/monitor/mon_error.rs
 * Project: rv68kmon
 * Created Date: 2022-10-02, 10:21:55
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

use std::fmt;

/**
 * type of monitor error.
 */
#[derive(PartialEq, Debug)]
pub enum ErrorType {
    /// reads from target memory.
    MemoryRead,
    /// writes to target memory.
    MemoryWrite,
    /// loads an image to target memory.
    MemoryLoad,
}
pub type MonErrorType = self::ErrorType;

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::MemoryRead => write!(f, "MemRead"),
            ErrorType::MemoryWrite => write!(f, "MemWrite"),
            ErrorType::MemoryLoad => write!(f, "MemLoad"),
        }
    }
}

/**
 * to report errors within the whole crate
 */
#[derive(Debug)]
pub struct Error {
    pub operation: ErrorType,
    address: usize,
    access_size: usize,
    mem_size: usize,
    msg: Option<String>,
}
pub type MonError = self::Error;

impl std::error::Error for MonError {}

impl std::fmt::Display for MonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        if self.operation == ErrorType::MemoryLoad {
            write!(
                f,
                "Error ({}), msg={}",
                self.operation,
                self.msg.as_ref().unwrap_or(&String::new()),
            )
        } else {
            write!(
                f,
                "Error ({}) at address=${:x}, access size={}, max memory size={}",
                self.operation, self.address, self.access_size, self.mem_size,
            )
        }
    }
}

impl From<std::io::Error> for MonError {
    fn from(err: std::io::Error) -> Self {
        let e = MonError {
            operation: ErrorType::MemoryLoad,
            address: 0,
            mem_size: 0,
            access_size: 0,
            msg: Some(err.to_string()),
        };
        e
    }
}

/**
 * check memory boundaries during access
 */
pub(crate) fn check_address_boundaries(
    mem_size: usize,
    address: usize,
    access_size: usize,
    // we use the ErrorType to identify the operation (read/write/load)
    op: ErrorType,
    msg: Option<String>,
) -> Result<(), Error> {
    // check if memory access overflows
    if address + access_size > mem_size {
        // report read or write error
        let e = MonError {
            operation: op,
            address: address,
            mem_size: mem_size,
            access_size: access_size,
            msg: msg,
        };
        return Err(e);
    }
    Ok(())
}
