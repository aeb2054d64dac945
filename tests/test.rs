/*
 * Filename: /tests/test.rs
 * Project: rv68kmon
 * Created Date: 2022-10-07, 09:02:13
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

use rv68kmon::display::{new_null_char_display, new_null_panel, LedBuffer, LED_SEG_POINT};
use rv68kmon::exec::{new_dcw_disassembler, new_null_exec, Exception, ExecControl, TRAP1_OPCODE};
use rv68kmon::memory::{self, Memory};
use rv68kmon::monitor::breakpoints::{BreakpointSet, MAX_BP};
use rv68kmon::monitor::registers::{EditSize, RegisterFile, INIT_PC, INIT_SSP};
use rv68kmon::monitor::{Key, Monitor, State};
use rv68kmon::serial::srecord::LoadSession;
use rv68kmon::serial::{
    from_hex_digit, new_soft_uart_with_clock, BitPeriod, SerialPort, Transport,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/**
 * transport fed from a canned input and recording everything sent.
 */
struct ScriptTransport {
    input: VecDeque<u8>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl ScriptTransport {
    fn new(input: &str) -> (ScriptTransport, Rc<RefCell<Vec<u8>>>) {
        let out = Rc::new(RefCell::new(Vec::new()));
        let t = ScriptTransport {
            input: input.bytes().collect(),
            output: out.clone(),
        };
        (t, out)
    }
}

impl Transport for ScriptTransport {
    fn send_byte(&mut self, b: u8) {
        self.output.borrow_mut().push(b);
    }

    fn get_byte(&mut self) -> u8 {
        // exhausted input reads as CR, harmless to the record scanner
        self.input.pop_front().unwrap_or(b'\r')
    }
}

/**
 * execution control recording each call, simulating a target that always
 * stops at stop_pc (or raises exc).
 */
struct RecordingExec {
    calls: Rc<RefCell<Vec<String>>>,
    stop_pc: u32,
    exc: Option<Exception>,
}

impl RecordingExec {
    fn new(stop_pc: u32) -> (RecordingExec, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let e = RecordingExec {
            calls: calls.clone(),
            stop_pc: stop_pc,
            exc: None,
        };
        (e, calls)
    }

    fn finish(&mut self, regs: &mut RegisterFile, what: &str) -> Option<Exception> {
        self.calls.borrow_mut().push(what.to_string());
        match self.exc {
            Some(e) => Some(e),
            None => {
                regs.pc = self.stop_pc;
                None
            }
        }
    }
}

impl ExecControl for RecordingExec {
    fn continue_run(
        &mut self,
        regs: &mut RegisterFile,
        _mem: &mut dyn Memory,
    ) -> Option<Exception> {
        self.finish(regs, "run")
    }

    fn step_into(&mut self, regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        self.finish(regs, "step")
    }

    fn step_over(&mut self, regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        self.finish(regs, "over")
    }

    fn step_out(&mut self, regs: &mut RegisterFile, _mem: &mut dyn Memory) -> Option<Exception> {
        self.finish(regs, "out")
    }

    fn continue_after_breakpoint(
        &mut self,
        regs: &mut RegisterFile,
        _mem: &mut dyn Memory,
    ) -> Option<Exception> {
        self.finish(regs, "cont")
    }

    fn arm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        _mem: &mut dyn Memory,
    ) -> Result<(), rv68kmon::monitor::mon_error::MonError> {
        self.calls.borrow_mut().push("arm".to_string());
        bps.set_armed(true);
        Ok(())
    }

    fn disarm_breakpoints(
        &mut self,
        bps: &mut BreakpointSet,
        _mem: &mut dyn Memory,
    ) -> Result<(), rv68kmon::monitor::mon_error::MonError> {
        self.calls.borrow_mut().push("disarm".to_string());
        bps.set_armed(false);
        Ok(())
    }

    fn enable_interrupt_level(&mut self) {
        self.calls.borrow_mut().push("irq".to_string());
    }
}

const MEM_SIZE: usize = 0x40000;

fn make_monitor(input: &str) -> (Monitor, Rc<RefCell<Vec<u8>>>, Rc<RefCell<Vec<String>>>) {
    let (transport, out) = ScriptTransport::new(input);
    let (exec, calls) = RecordingExec::new(0x600);
    let m = Monitor::new(
        memory::new_default(MEM_SIZE),
        Box::new(exec),
        new_dcw_disassembler(),
        Box::new(transport),
        new_null_panel(),
        new_null_char_display(),
    )
    .unwrap();
    (m, out, calls)
}

fn press(m: &mut Monitor, keys: &[Key]) {
    for k in keys {
        m.handle_key(*k).unwrap();
    }
}

/**
 * type a hex address on the keypad.
 */
fn enter_address(m: &mut Monitor, addr: &str) {
    m.handle_key(Key::Addr).unwrap();
    for c in addr.bytes() {
        m.handle_key(Key::Hex(from_hex_digit(c))).unwrap();
    }
}

#[test]
fn test_breakpoint_toggle() {
    let mut b = BreakpointSet::new();

    // unordered insertion keeps the table sorted
    b.toggle(0x1006);
    b.toggle(0x1002);
    b.toggle(0x1004);
    assert_eq!(b.addresses(), &[0x1002, 0x1004, 0x1006]);

    // toggling an existing address removes it
    b.toggle(0x1004);
    assert_eq!(b.addresses(), &[0x1002, 0x1006]);
    assert!(!b.contains(0x1004));

    // and toggling it back re-inserts in order
    b.toggle(0x1004);
    assert_eq!(b.addresses(), &[0x1002, 0x1004, 0x1006]);

    // odd addresses are never accepted
    b.toggle(0x1001);
    assert_eq!(b.len(), 3);
    assert!(!b.contains(0x1001));
}

#[test]
fn test_breakpoint_capacity() {
    let mut b = BreakpointSet::new();
    for j in 0..MAX_BP as u32 {
        b.toggle(0x1000 + j * 2);
    }
    assert_eq!(b.len(), MAX_BP);

    // a full table drops new addresses silently, above or below
    b.toggle(0x2000);
    assert_eq!(b.len(), MAX_BP);
    assert!(!b.contains(0x2000));
    b.toggle(0x0100);
    assert_eq!(b.len(), MAX_BP);
    assert!(!b.contains(0x0100));

    // but removal still works when full
    b.toggle(0x1004);
    assert_eq!(b.len(), MAX_BP - 1);

    b.clear_all();
    assert!(b.is_empty());
}

#[test]
fn test_hex_digits() {
    for v in 0..=255u32 {
        let s = format!("{:02X}", v);
        let n =
            (from_hex_digit(s.as_bytes()[0]) << 4) | from_hex_digit(s.as_bytes()[1]);
        assert_eq!(n as u32, v);
    }
}

#[test]
fn test_srecord_load() {
    // two bytes 12 34 at $1000, then the end record
    let (mut t, out) = ScriptTransport::new("S10510001234A4\r\nS9030000FC\r\n");
    let mut mem = memory::new_default(0x10000);
    let ok = LoadSession::new(&mut t).run(mem.as_mut()).unwrap();
    assert!(ok);
    assert_eq!(mem.read_byte(0x1000).unwrap(), 0x12);
    assert_eq!(mem.read_byte(0x1001).unwrap(), 0x34);
    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(sent.contains("load successfull!"));
}

#[test]
fn test_srecord_wide_record() {
    // one byte AA at $012345 through an S2 record
    let (mut t, _out) = ScriptTransport::new("S205012345AAE7\r\nS804000000FB\r\n");
    let mut mem = memory::new_default(0x20000);
    let ok = LoadSession::new(&mut t).run(mem.as_mut()).unwrap();
    assert!(ok);
    assert_eq!(mem.read_byte(0x12345).unwrap(), 0xaa);
}

#[test]
fn test_srecord_checksum_sticky() {
    // first record carries a wrong checksum, second one is fine; the
    // session keeps loading but reports the error at the end
    let (mut t, out) =
        ScriptTransport::new("S10510001234A5\r\nS105100455AAE7\r\nS9030000FC\r\n");
    let mut mem = memory::new_default(0x10000);
    let ok = LoadSession::new(&mut t).run(mem.as_mut()).unwrap();
    assert!(!ok);

    // both payloads landed anyway
    assert_eq!(mem.read_byte(0x1000).unwrap(), 0x12);
    assert_eq!(mem.read_byte(0x1004).unwrap(), 0x55);
    assert_eq!(mem.read_byte(0x1005).unwrap(), 0xaa);
    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(sent.contains("check sum errors!"));
}

#[test]
fn test_address_and_data_entry() {
    let (mut m, _out, _calls) = make_monitor("");

    enter_address(&mut m, "1000");
    assert_eq!(m.state(), State::InputAddr);
    assert_eq!(m.active_address(), 0x1000);

    // DATA then two nibbles write one byte
    press(&mut m, &[Key::Data, Key::Hex(0xa), Key::Hex(0xb)]);
    assert_eq!(m.state(), State::InputData);
    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 0xab);

    // a third nibble keeps rotating the same byte
    press(&mut m, &[Key::Hex(0xc)]);
    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 0xbc);

    // + and - move the active address
    press(&mut m, &[Key::Plus]);
    assert_eq!(m.active_address(), 0x1001);
    press(&mut m, &[Key::Minus, Key::Minus]);
    assert_eq!(m.active_address(), 0xfff);

    // address entry restarts on the first nibble
    press(&mut m, &[Key::Addr, Key::Hex(2)]);
    assert_eq!(m.active_address(), 2);
}

#[test]
fn test_register_edit_sizes() {
    let (mut m, _out, _calls) = make_monitor("");
    m.regs.d[0] = 0x11223344;

    // SHIFT 0 shows D0, DATA starts editing at full width
    press(&mut m, &[Key::Reg, Key::Hex(0), Key::Data]);
    assert_eq!(m.state(), State::InputRegister);
    assert_eq!(m.edit_size(), EditSize::Long);

    // DATA cycles 4 -> 2 -> 1 bytes before the first nibble
    press(&mut m, &[Key::Data]);
    assert_eq!(m.edit_size(), EditSize::Word);
    press(&mut m, &[Key::Data]);
    assert_eq!(m.edit_size(), EditSize::Byte);

    // byte-size entry only touches the low byte
    press(&mut m, &[Key::Hex(0xf), Key::Hex(0xf)]);
    assert_eq!(m.regs.d[0], 0x112233ff);

    // once entry started the size is locked
    press(&mut m, &[Key::Data]);
    assert_eq!(m.edit_size(), EditSize::Byte);

    // address registers always edit at full width
    m.regs.a[0] = 0xdeadbeef;
    press(&mut m, &[Key::Reg, Key::Hex(8), Key::Data]);
    assert_eq!(m.edit_size(), EditSize::Long);
    press(&mut m, &[Key::Data]);
    assert_eq!(m.edit_size(), EditSize::Long);
    press(&mut m, &[Key::Hex(1), Key::Hex(2)]);
    assert_eq!(m.regs.a[0], 0x12);
}

#[test]
fn test_register_sr_view_not_editable() {
    let (mut m, _out, _calls) = make_monitor("");

    // register 14 first shows the status view, which DATA cannot edit
    press(&mut m, &[Key::Reg, Key::Hex(14), Key::Data]);
    assert_eq!(m.state(), State::ShowRegister);

    // a second 14 goes back to A6 which is editable
    m.regs.a[6] = 0xcafe;
    press(&mut m, &[Key::Hex(14), Key::Data]);
    assert_eq!(m.state(), State::InputRegister);
}

#[test]
fn test_copy_block() {
    let (mut m, _out, _calls) = make_monitor("");
    for (j, b) in [1u8, 2, 3, 4].iter().enumerate() {
        m.mem.write_byte(0x1000 + j, *b).unwrap();
    }

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Copy]);
    assert_eq!(m.state(), State::CopyStart);

    // start $1000, end $1004 (exclusive), destination $2000
    press(&mut m, &[Key::Hex(1), Key::Hex(0), Key::Hex(0), Key::Hex(0), Key::Plus]);
    assert_eq!(m.state(), State::CopyEnd);
    press(&mut m, &[Key::Hex(1), Key::Hex(0), Key::Hex(0), Key::Hex(4), Key::Plus]);
    assert_eq!(m.state(), State::CopyDest);
    press(&mut m, &[Key::Hex(2), Key::Hex(0), Key::Hex(0), Key::Hex(0), Key::Go]);

    assert_eq!(m.state(), State::InputData);
    assert_eq!(m.active_address(), 0x2000);
    for j in 0..4usize {
        assert_eq!(m.mem.read_byte(0x2000 + j).unwrap(), (j + 1) as u8);
    }
    // source untouched
    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 1);
}

#[test]
fn test_copy_block_bad_range() {
    let (mut m, _out, _calls) = make_monitor("");
    m.mem.write_byte(0x2000, 0x77).unwrap();

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Copy]);
    // end below start
    press(&mut m, &[Key::Hex(1), Key::Hex(0), Key::Hex(0), Key::Hex(4), Key::Plus]);
    press(&mut m, &[Key::Hex(1), Key::Hex(0), Key::Hex(0), Key::Hex(0), Key::Plus]);
    press(&mut m, &[Key::Hex(2), Key::Hex(0), Key::Hex(0), Key::Hex(0), Key::Go]);

    assert_eq!(m.state(), State::AfterReset);
    assert_eq!(m.mem.read_byte(0x2000).unwrap(), 0x77);
}

#[test]
fn test_find_offset_word() {
    let (mut m, _out, _calls) = make_monitor("");

    // even patch address -> 16 bit displacement, big endian
    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Rel]);
    assert_eq!(m.state(), State::CompOffset);
    press(&mut m, &[Key::Hex(1), Key::Hex(1), Key::Hex(0), Key::Hex(0), Key::Go]);

    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 0x01);
    assert_eq!(m.mem.read_byte(0x1001).unwrap(), 0x00);
    assert_eq!(m.active_address(), 0x1000);
    assert_eq!(m.state(), State::InputData);
}

#[test]
fn test_find_offset_short_branch() {
    let (mut m, _out, _calls) = make_monitor("");

    // odd patch address right after the opcode word start -> the pc the
    // displacement is relative to sits one byte further
    enter_address(&mut m, "1001");
    press(&mut m, &[Key::Rel]);
    press(&mut m, &[Key::Hex(1), Key::Hex(0), Key::Hex(1), Key::Hex(0), Key::Go]);
    assert_eq!(m.mem.read_byte(0x1001).unwrap(), 0x0e);
}

#[test]
fn test_insert_delete() {
    let (mut m, _out, _calls) = make_monitor("");
    m.set_shift_size(16);
    for (j, b) in [0xaau8, 0xbb, 0xcc].iter().enumerate() {
        m.mem.write_byte(0x1000 + j, *b).unwrap();
    }

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Ins]);

    // a zero byte opened up after the first one, the rest moved up
    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 0xaa);
    assert_eq!(m.mem.read_byte(0x1001).unwrap(), 0x00);
    assert_eq!(m.mem.read_byte(0x1002).unwrap(), 0xbb);
    assert_eq!(m.mem.read_byte(0x1003).unwrap(), 0xcc);
    assert_eq!(m.active_address(), 0x1001);
    assert_eq!(m.state(), State::InputData);

    // deleting it restores the old content, the address stays
    press(&mut m, &[Key::Del]);
    assert_eq!(m.mem.read_byte(0x1001).unwrap(), 0xbb);
    assert_eq!(m.mem.read_byte(0x1002).unwrap(), 0xcc);
    assert_eq!(m.active_address(), 0x1001);
}

#[test]
fn test_go_dispatch() {
    let (mut m, _out, calls) = make_monitor("");

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Go]);
    assert_eq!(*calls.borrow(), ["disarm", "arm", "run", "disarm"]);
    // the monitor followed the target to where it stopped
    assert_eq!(m.active_address(), 0x600);
    assert_eq!(m.regs.pc, 0x600);

    calls.borrow_mut().clear();

    // with a breakpoint on the resume address a single step goes first
    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Reg, Key::Ins]);
    assert!(m.breakpoints.contains(0x1000));
    // back on the breakpoint address
    enter_address(&mut m, "1000");
    calls.borrow_mut().clear();
    press(&mut m, &[Key::Go]);
    assert_eq!(*calls.borrow(), ["arm", "step", "run", "disarm"]);
}

#[test]
fn test_step_and_trap_skip() {
    let (mut m, _out, calls) = make_monitor("");

    // TRAP #0 at the active address is skipped, not stepped into
    m.mem.write_byte(0x1000, 0x4e).unwrap();
    m.mem.write_byte(0x1001, 0x40).unwrap();
    enter_address(&mut m, "1000");
    calls.borrow_mut().clear();
    press(&mut m, &[Key::User]);
    assert_eq!(m.active_address(), 0x1002);
    assert!(calls.borrow().is_empty());

    // anything else goes through step-over
    enter_address(&mut m, "2000");
    calls.borrow_mut().clear();
    press(&mut m, &[Key::User]);
    assert_eq!(*calls.borrow(), ["over"]);

    // plain STEP is a step-into
    calls.borrow_mut().clear();
    press(&mut m, &[Key::Step]);
    assert_eq!(*calls.borrow(), ["step"]);
}

#[test]
fn test_step_out_refused_at_top_of_stack() {
    let (mut m, _out, calls) = make_monitor("");
    assert_eq!(m.regs.ssp, INIT_SSP);

    enter_address(&mut m, "1000");
    calls.borrow_mut().clear();
    press(&mut m, &[Key::Reg, Key::User]);

    // nothing to return to, no exec call happened
    assert!(calls.borrow().is_empty());
    assert_eq!(m.state(), State::InputAddr);
}

#[test]
fn test_exception_report() {
    let (transport, _out) = ScriptTransport::new("");
    let (mut exec, calls) = RecordingExec::new(0x600);
    exec.exc = Some(Exception::IllegalInstruction);
    let mut m = Monitor::new(
        memory::new_default(MEM_SIZE),
        Box::new(exec),
        new_dcw_disassembler(),
        Box::new(transport),
        new_null_panel(),
        new_null_char_display(),
    )
    .unwrap();

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Go]);
    assert!(calls.borrow().contains(&"run".to_string()));
    assert_eq!(m.state(), State::AfterReset);
}

#[test]
fn test_monitor_load_key() {
    let (mut m, out, _calls) = make_monitor("S10510001234A4\r\nS9030000FC\r\n");

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Load]);

    assert_eq!(m.mem.read_byte(0x1000).unwrap(), 0x12);
    assert_eq!(m.mem.read_byte(0x1001).unwrap(), 0x34);
    assert_eq!(m.state(), State::InputData);
    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(sent.contains("Load Motorola s-record"));
    assert!(sent.contains("load successfull!"));
}

#[test]
fn test_memory_dump() {
    let (mut m, out, _calls) = make_monitor("");
    m.set_hexdump_lines(2);

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Dump]);

    // two 16-byte rows went out and the active address moved past them
    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(!sent.is_empty());
    assert_eq!(m.active_address(), 0x1020);
    assert_eq!(m.state(), State::InputAddr);
}

#[test]
fn test_breakpoint_list_report() {
    let (mut m, out, _calls) = make_monitor("");

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Reg, Key::Ins]);
    enter_address(&mut m, "1004");
    press(&mut m, &[Key::Reg, Key::Ins]);

    press(&mut m, &[Key::Reg, Key::Load]);
    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(sent.contains("; 2 breakpoints set"));
    // both lines carry the breakpoint marker
    assert!(sent.contains("00001000:*"));
    assert!(sent.contains("00001004:*"));
}

#[test]
fn test_register_dump() {
    let (mut m, out, _calls) = make_monitor("");
    m.regs.d[0] = 0x11223344;

    enter_address(&mut m, "400");
    press(&mut m, &[Key::Reg, Key::Dump]);

    let sent = String::from_utf8(out.borrow().clone()).unwrap();
    assert!(sent.contains("D0: 11223344"));
    assert!(sent.contains("A0: 00000000"));
    assert!(sent.contains("SR: 2700"));
    assert!(sent.contains("-S7-----"));
}

#[test]
fn test_pointer_chase() {
    let (mut m, _out, _calls) = make_monitor("");
    m.mem.write_long_be(0x1000, 0x2345).unwrap();

    // SHIFT ADDR dereferences the long at the active address
    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Reg, Key::Addr]);
    assert_eq!(m.active_address(), 0x2345);
    assert_eq!(m.state(), State::InputAddr);

    // odd active address refuses the chase
    enter_address(&mut m, "1001");
    press(&mut m, &[Key::Reg, Key::Addr]);
    assert_eq!(m.active_address(), 0x1001);
    assert_eq!(m.state(), State::InputAddr);
}

#[test]
fn test_address_register_as_address() {
    let (mut m, _out, _calls) = make_monitor("");
    m.regs.a[1] = 0x3000;

    // show A1, then ADDR navigates to where it points
    press(&mut m, &[Key::Reg, Key::Hex(9), Key::Addr]);
    assert_eq!(m.active_address(), 0x3000);
    assert_eq!(m.state(), State::InputAddr);
}

#[test]
fn test_led_rendering() {
    let mut led = LedBuffer::new();

    led.print(0, "0");
    assert_eq!(led.cells()[7], 0xbd);
    led.print(7, "E");
    assert_eq!(led.cells()[0], 0x8f);

    // dots mark the active field and clear everywhere else
    led.dot_range(3, 8);
    for k in 3..8 {
        assert_ne!(led.cells()[k] & LED_SEG_POINT, 0);
    }
    assert_eq!(led.cells()[0] & LED_SEG_POINT, 0);

    led.put_data_byte(0xaf);
    assert_eq!(led.cells()[1], 0x3f);
    assert_eq!(led.cells()[0], 0x0f);
}

/**
 * no-op bit clock for uart tests.
 */
struct NullClock;

impl BitPeriod for NullClock {
    fn wait_bit(&mut self) {}
    fn wait_bit_and_half(&mut self) {}
}

/**
 * serial port with a scripted rx line, recording tx transitions.
 */
struct FakePort {
    tx: Rc<RefCell<Vec<bool>>>,
    rx: VecDeque<bool>,
}

impl SerialPort for FakePort {
    fn set_tx(&mut self, high: bool) {
        self.tx.borrow_mut().push(high);
    }

    fn rx_high(&mut self) -> bool {
        self.rx.pop_front().unwrap_or(true)
    }
}

#[test]
fn test_uart_send_lsb_first() {
    let tx = Rc::new(RefCell::new(Vec::new()));
    let port = FakePort {
        tx: tx.clone(),
        rx: VecDeque::new(),
    };
    let mut uart = new_soft_uart_with_clock(Box::new(port), Box::new(NullClock {}));

    uart.send_byte(0x55);
    // start bit, $55 lsb first, stop bit
    let expected = [
        false, true, false, true, false, true, false, true, false, true,
    ];
    assert_eq!(tx.borrow().as_slice(), &expected);
}

#[test]
fn test_uart_receive_seven_bits() {
    // 'A' = $41, lsb first on the wire; the first sample is the start bit
    // poll finding the line low
    let rx: VecDeque<bool> = [false, true, false, false, false, false, false, true]
        .iter()
        .cloned()
        .collect();
    let port = FakePort {
        tx: Rc::new(RefCell::new(Vec::new())),
        rx: rx,
    };
    let mut uart = new_soft_uart_with_clock(Box::new(port), Box::new(NullClock {}));
    assert_eq!(uart.get_byte(), 0x41);

    // bit 7 can never come back set
    let rx: VecDeque<bool> = [false, true, true, true, true, true, true, true]
        .iter()
        .cloned()
        .collect();
    let port = FakePort {
        tx: Rc::new(RefCell::new(Vec::new())),
        rx: rx,
    };
    let mut uart = new_soft_uart_with_clock(Box::new(port), Box::new(NullClock {}));
    assert_eq!(uart.get_byte(), 0x7f);
}

#[test]
fn test_arm_disarm_patches_traps() {
    let mut exec = new_null_exec();
    let mut mem = memory::new_default(0x10000);
    mem.write_word_be(0x1000, 0x7001).unwrap();
    let mut bps = BreakpointSet::new();
    bps.toggle(0x1000);

    exec.arm_breakpoints(&mut bps, mem.as_mut()).unwrap();
    assert!(bps.is_armed());
    assert_eq!(mem.read_word_be(0x1000).unwrap(), TRAP1_OPCODE);
    assert_eq!(bps.orig_instr(0), 0x7001);

    // arming twice must not clobber the saved word with the trap opcode
    exec.arm_breakpoints(&mut bps, mem.as_mut()).unwrap();
    exec.disarm_breakpoints(&mut bps, mem.as_mut()).unwrap();
    assert!(!bps.is_armed());
    assert_eq!(mem.read_word_be(0x1000).unwrap(), 0x7001);
}

#[test]
fn test_warm_reset_keeps_breakpoints() {
    let (mut m, _out, _calls) = make_monitor("");

    enter_address(&mut m, "1000");
    press(&mut m, &[Key::Reg, Key::Ins]);
    m.regs.d[3] = 0x1234;

    m.reset().unwrap();
    assert_eq!(m.state(), State::AfterReset);
    assert_eq!(m.active_address(), INIT_PC);
    // breakpoints and data registers survive, stack pointers do not
    assert!(m.breakpoints.contains(0x1000));
    assert!(!m.breakpoints.is_armed());
    assert_eq!(m.regs.d[3], 0x1234);
    assert_eq!(m.regs.ssp, INIT_SSP);
}
