/*
 * Filename: /src/bin/bin.rs
 * Project: rv68kmon
 * Created Date: 2022-10-06, 10:21:44
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

//! kit_sim: drive the monitor from the terminal, one key name per line.
//! the kit's serial port is mapped to stdin/stdout, the LED panel and LCD
//! are printed after every key.

use rv68kmon::display::{CharDisplay, LedPanel, LED_SEG_POINT};
use rv68kmon::exec::{new_dcw_disassembler, new_null_exec};
use rv68kmon::memory;
use rv68kmon::monitor::{Key, Monitor};
use rv68kmon::serial::Transport;
use std::io::{BufRead, Read, Write};

/// 128k RAM + 128k ROM, as on the real board.
const MEM_SIZE: usize = 0x40000;

/**
 * serial transport over the process stdin/stdout.
 */
struct StdioTransport;

impl Transport for StdioTransport {
    fn send_byte(&mut self, b: u8) {
        let mut out = std::io::stdout();
        let _ = out.write_all(&[b]);
        let _ = out.flush();
    }

    fn get_byte(&mut self) -> u8 {
        let mut b = [0u8; 1];
        match std::io::stdin().read_exact(&mut b) {
            // treat a closed stdin as an endless stream of CR, the
            // s-record loader then terminates on the next S8/S9 scan
            Err(_) => b'\r',
            Ok(_) => b[0],
        }
    }
}

/**
 * LED panel printed as an ascii approximation, one line per refresh.
 */
struct ConsolePanel;

impl LedPanel for ConsolePanel {
    fn render(&mut self, cells: &[u8; 8]) {
        let mut line = String::from("[");
        for k in (0..8).rev() {
            line.push_str(&format!(" {:02x}", cells[k] & !LED_SEG_POINT));
            line.push(if cells[k] & LED_SEG_POINT != 0 { '.' } else { ' ' });
        }
        line.push(']');
        println!("{}", line);
    }
}

/**
 * character LCD printed one row per write.
 */
struct ConsoleLcd {
    cursor: usize,
}

impl CharDisplay for ConsoleLcd {
    fn clear(&mut self) {
        self.cursor = 0;
    }

    fn goto_xy(&mut self, x: usize, y: usize) {
        // the monitor only ever writes full rows from column 0
        let _ = x;
        self.cursor = y;
    }

    fn puts(&mut self, s: &str) {
        println!("lcd{}| {}", self.cursor, s);
    }
}

fn parse_key(token: &str) -> Option<Key> {
    let t = token.to_ascii_lowercase();
    let k = match t.as_str() {
        "addr" => Key::Addr,
        "data" => Key::Data,
        "+" | "plus" => Key::Plus,
        "-" | "minus" => Key::Minus,
        "pc" => Key::Pc,
        "go" => Key::Go,
        "reg" => Key::Reg,
        "copy" => Key::Copy,
        "step" => Key::Step,
        "user" => Key::User,
        "ins" => Key::Ins,
        "del" => Key::Del,
        "rel" => Key::Rel,
        "test" => Key::Test,
        "dump" => Key::Dump,
        "load" => Key::Load,
        "mute" => Key::Mute,
        _ => {
            // single hex digit ?
            if t.len() == 1 {
                let c = t.as_bytes()[0];
                if c.is_ascii_hexdigit() {
                    let n = if c <= b'9' { c - b'0' } else { c - b'a' + 10 };
                    return Some(Key::Hex(n));
                }
            }
            return None;
        }
    };
    Some(k)
}

fn main() {
    let mem = memory::new_default(MEM_SIZE);
    let lcd = ConsoleLcd { cursor: 0 };
    let mut m = Monitor::new(
        mem,
        new_null_exec(),
        new_dcw_disassembler(),
        Box::new(StdioTransport {}),
        Box::new(ConsolePanel {}),
        Box::new(lcd),
    )
    .unwrap();
    m.enable_logging(std::env::var("KIT_DEBUG").is_ok());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        for token in line.split_whitespace() {
            if token == "q" || token == "quit" {
                return;
            }
            match parse_key(token) {
                Some(k) => {
                    if let Err(e) = m.handle_key(k) {
                        eprintln!("{}", e);
                    }
                }
                None => eprintln!("unknown key: {}", token),
            }
        }
    }
}
