/*
 * Filename: /src/monitor.rs
 * Project: rv68kmon
 * Created Date: 2022-10-05, 09:10:02
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

use crate::display::{font_nibble, CharDisplay, LedBuffer, LedPanel, LED_SEG_BREAK};
use crate::exec::{Disassembler, Exception, ExecControl};
use crate::memory::Memory;
use crate::monitor::breakpoints::BreakpointSet;
use crate::monitor::mon_error::{MonError, MonErrorType};
use crate::monitor::registers::{EditSize, Reg, RegisterFile, INIT_PC, INIT_SSP, INIT_USP};
use crate::serial::srecord::LoadSession;
use crate::serial::Transport;
use ::function_name::named;
use hexplay::HexViewBuilder;
use log::*;

pub mod breakpoints;
mod editor;
pub mod mon_error;
pub mod registers;

/// monitor version shown in the power-up banner.
pub const VERSION: &str = "V4.8";

/**
 * the monitor mode. exactly one value is current at any time, mutated only
 * by key dispatch.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    AfterReset,
    InputAddr,
    InputData,
    Shift,
    CompOffset,
    CopyStart,
    CopyEnd,
    CopyDest,
    InputRegister,
    ShowRegister,
    ToggleTrap1,
}

/**
 * a resolved, debounced keypad key. the raw matrix scan lives board-side.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key {
    /// ADDR, address entry / pointer chase in shift.
    Addr,
    /// DATA, data entry / register edit start / edit size cycle.
    Data,
    /// +, step forward / capture copy stage / newline in shift.
    Plus,
    /// -, step backward.
    Minus,
    /// PC, back to the user program counter.
    Pc,
    /// GO, run / complete copy / complete offset.
    Go,
    /// REG, enter shift state.
    Reg,
    /// COPY, block copy / TRAP #1 toggle in shift.
    Copy,
    /// STEP, step into / continue after breakpoint in shift.
    Step,
    /// USER, step over (skipping monitor traps) / step out in shift.
    User,
    /// INS, insert byte / toggle breakpoint in shift.
    Ins,
    /// DEL, delete byte / clear breakpoints in shift.
    Del,
    /// REL, offset computation / disassembly listing in shift.
    Rel,
    /// TEST, self test.
    Test,
    /// DUMP, memory dump / register dump in shift.
    Dump,
    /// LOAD, s-record load / breakpoint list in shift.
    Load,
    /// MUTE, beeper toggle.
    Mute,
    /// hex digit 0-F.
    Hex(u8),
}

/**
 * status register display format for the register-14 view.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SrFormat {
    /// one LED digit per flag, XNZVC.
    Classic,
    /// the raw SR value in hex.
    Numeric,
    /// the "TS7XNZVC" string.
    Symbolic,
}

/**
 * the whole monitor context: mode state, active address, accumulators,
 * register file and breakpoint set, plus the attached collaborators.
 *
 * everything the original firmware kept in globals lives here; dispatch is
 * strictly single threaded, one key runs to completion before the next.
 */
pub struct Monitor {
    /// saved user registers.
    pub regs: RegisterFile,

    /// the breakpoint table.
    pub breakpoints: BreakpointSet,

    /// the target address space.
    pub mem: Box<dyn Memory>,

    state: State,

    /// the address currently displayed/edited.
    display_pc: u32,

    /// where PC key navigates back to.
    save_pc: u32,

    /// false until the first nibble of the current value.
    entry_started: bool,

    /// register selected for display/edit, if any.
    edit_register: Option<Reg>,

    /// low bytes of a data register affected by nibble entry.
    edit_size: EditSize,

    /// toggles register 14 between A6 and the status view.
    hit_a6: bool,

    show_sr: SrFormat,

    /// copy/offset capture.
    start: u32,
    end: u32,

    /// 1 -> TRAP #1 stops the program, 0 -> TRAP #1 is ignored.
    enable_trap1: bool,

    /// beeper off when set.
    mute: bool,

    /// bytes moved by INS and DEL.
    shift_size: u32,

    /// how many lines to disassemble to the terminal.
    disasm_lines: u16,

    /// how many 16-byte lines the memory dump sends.
    hexdump_lines: u16,

    /// disassembly window cursors.
    curr_inst: u32,
    next_inst: u32,

    disasm_on_lcd: bool,
    lcd_width: usize,
    lcd_lines: usize,

    led: LedBuffer,

    exec: Box<dyn ExecControl>,
    disasm: Box<dyn Disassembler>,
    transport: Box<dyn Transport>,
    panel: Box<dyn LedPanel>,
    lcd: Box<dyn CharDisplay>,
}

impl Monitor {
    /**
     * cold boot: documented power-up defaults, startup banner to the LED
     * and the terminal, breakpoint table empty and disarmed.
     */
    pub fn new(
        mem: Box<dyn Memory>,
        exec: Box<dyn ExecControl>,
        disasm: Box<dyn Disassembler>,
        transport: Box<dyn Transport>,
        panel: Box<dyn LedPanel>,
        lcd: Box<dyn CharDisplay>,
    ) -> Result<Monitor, MonError> {
        let mut m = Monitor {
            regs: RegisterFile::new(),
            breakpoints: BreakpointSet::new(),
            mem: mem,
            state: State::AfterReset,
            display_pc: INIT_PC,
            save_pc: INIT_PC,
            entry_started: false,
            edit_register: None,
            edit_size: EditSize::Long,
            hit_a6: false,
            show_sr: SrFormat::Symbolic,
            start: 0,
            end: 0,
            enable_trap1: false,
            mute: false,
            shift_size: 512,
            disasm_lines: 16,
            hexdump_lines: 16,
            curr_inst: INIT_PC,
            next_inst: INIT_PC,
            disasm_on_lcd: true,
            lcd_width: 16,
            lcd_lines: 2,
            led: LedBuffer::new(),
            exec: exec,
            disasm: disasm,
            transport: transport,
            panel: panel,
            lcd: lcd,
        };

        m.led.print(0, "68008 ");
        m.transport
            .puts("\r\n68008 MICROPROCESSOR KIT\r\nmonitor ");
        m.transport.puts(VERSION);
        m.transport.puts("\r\n");
        m.reset()?;
        Ok(m)
    }

    /**
     * warm reset: back to the reset state, stack pointers/SR/PC to their
     * defaults, breakpoint table kept but disarmed so stale trap patches
     * are never acted upon.
     */
    pub fn reset(&mut self) -> Result<(), MonError> {
        self.state = State::AfterReset;
        self.entry_started = false;
        self.edit_register = None;
        self.hit_a6 = false;
        self.display_pc = INIT_PC;
        self.save_pc = INIT_PC;
        self.curr_inst = INIT_PC;
        self.next_inst = INIT_PC;
        self.regs.usp = INIT_USP;
        self.regs.ssp = INIT_SSP;
        self.regs.sr = registers::INIT_SR;
        self.regs.pc = INIT_PC;
        self.exec
            .disarm_breakpoints(&mut self.breakpoints, self.mem.as_mut())?;
        Ok(())
    }

    /**
     * activate logging on stdout through env_logger (max level).
     */
    pub fn enable_logging(&self, enable: bool) {
        if enable == true {
            let _ = env_logger::builder()
                .filter_level(log::LevelFilter::max())
                .try_init();
            log::set_max_level(log::LevelFilter::max());
        } else {
            let _ = env_logger::builder()
                .filter_level(log::LevelFilter::Off)
                .try_init();
            log::set_max_level(log::LevelFilter::Off);
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /**
     * the address currently displayed/edited.
     */
    pub fn active_address(&self) -> u32 {
        self.display_pc
    }

    pub fn edit_size(&self) -> EditSize {
        self.edit_size
    }

    /**
     * bytes moved by the INS and DEL keys.
     */
    pub fn set_shift_size(&mut self, n: u32) {
        self.shift_size = n;
    }

    pub fn set_hexdump_lines(&mut self, n: u16) {
        self.hexdump_lines = n;
    }

    pub fn set_disasm_lines(&mut self, n: u16) {
        self.disasm_lines = n;
    }

    pub fn set_sr_format(&mut self, f: SrFormat) {
        self.show_sr = f;
    }

    /**
     * dispatch one logical key against the current state. every operator
     * workflow enters here; the panel is re-rendered before returning.
     */
    pub fn handle_key(&mut self, key: Key) -> Result<(), MonError> {
        debug!("key {:?} in state {:?}", key, self.state);

        match key {
            Key::Addr => self.key_addr()?,
            Key::Data => {
                if self.state == State::ShowRegister {
                    self.start_edit_reg();
                } else if self.state == State::InputRegister {
                    self.change_edit_size();
                } else {
                    self.key_data()?;
                }
            }
            Key::Plus => self.key_plus()?,
            Key::Minus => self.key_minus()?,
            Key::Pc => self.key_pc()?,
            Key::Go => self.key_go()?,
            Key::Reg => self.key_reg(),
            Key::Copy => {
                if self.state == State::Shift || self.state == State::ToggleTrap1 {
                    self.toggle_trap1();
                } else {
                    self.copy_block();
                }
            }
            Key::Step => {
                if self.state == State::Shift {
                    self.step_cont()?;
                } else {
                    let exc = self.exec.step_into(&mut self.regs, self.mem.as_mut());
                    self.after_exec(exc)?;
                }
            }
            Key::User => self.key_user()?,
            Key::Ins => {
                if self.state == State::Shift {
                    self.breakpoints.toggle(self.display_pc);
                    self.key_data()?;
                } else {
                    self.insert_byte()?;
                }
            }
            Key::Del => {
                if self.state == State::Shift {
                    self.breakpoints.clear_all();
                    self.key_data()?;
                } else {
                    self.delete_byte()?;
                }
            }
            Key::Rel => {
                if self.state == State::Shift {
                    self.disassemble_list()?;
                } else {
                    self.compute_relative();
                }
            }
            Key::Test => self.key_test(),
            Key::Dump => {
                if self.state == State::Shift {
                    self.dump_registers()?;
                } else {
                    self.dump_memory()?;
                }
            }
            Key::Load => {
                if self.state == State::Shift {
                    self.dump_breakpoints()?;
                } else {
                    self.load_srecord()?;
                }
            }
            Key::Mute => self.mute = !self.mute,
            Key::Hex(n) => {
                let n = n & 0xf;
                match self.state {
                    State::InputAddr => self.address_hex(n)?,
                    State::InputData => self.data_hex(n)?,
                    State::InputRegister => self.reg_hex(n),
                    State::ShowRegister | State::Shift => self.select_register(n),
                    State::CompOffset | State::CopyStart | State::CopyEnd | State::CopyDest => {
                        self.word_enter(n)
                    }
                    // hex keys are dead in the remaining states
                    State::AfterReset | State::ToggleTrap1 => (),
                }
            }
        }

        self.panel.render(self.led.cells());
        Ok(())
    }

    /**
     * refresh the LED from the active address: address digits, data byte,
     * breakpoint marker. keeps the LCD disassembly in sync.
     */
    fn read_memory(&mut self) -> Result<(), MonError> {
        self.led.put_address(self.display_pc);
        let b = self.mem.read_byte(self.display_pc as usize)?;
        self.led.put_data_byte(b);
        let marker = if self.breakpoints.contains(self.display_pc) {
            LED_SEG_BREAK
        } else {
            0
        };
        self.led.set(2, marker);
        self.disassemble_lcd()
    }

    /**
     * select address-entry mode on the active address.
     */
    pub(crate) fn key_address(&mut self) -> Result<(), MonError> {
        self.read_memory()?;
        self.led.dot_range(3, 8);
        self.entry_started = false;
        self.curr_inst = self.display_pc;
        self.disassemble_lcd()?;
        self.state = State::InputAddr;
        Ok(())
    }

    /**
     * select data-entry mode on the active address.
     */
    pub(crate) fn key_data(&mut self) -> Result<(), MonError> {
        self.read_memory()?;
        self.led.dot_range(0, 2);
        self.entry_started = false;
        self.state = State::InputData;
        Ok(())
    }

    fn key_addr(&mut self) -> Result<(), MonError> {
        if self.state == State::Shift {
            // use memory content as address (chase the pointer)
            if self.display_pc & 1 != 0 {
                self.led.print(0, "odd Addr");
                self.state = State::InputAddr;
                return Ok(());
            }
            self.display_pc = self.mem.read_long_be(self.display_pc as usize)?;
        } else if self.state == State::ShowRegister || self.state == State::InputRegister {
            if let Some(r) = self.edit_register {
                if r.is_address() {
                    // use An (or a stack pointer) as address
                    self.display_pc = self.regs.get(r);
                }
            }
        }
        self.key_address()
    }

    fn key_plus(&mut self) -> Result<(), MonError> {
        match self.state {
            State::CopyStart => {
                self.start = self.display_pc;
                self.led.print(7, "E");
                self.state = State::CopyEnd;
                self.entry_started = false;
            }
            State::CopyEnd => {
                self.end = self.display_pc;
                self.led.print(7, "d");
                self.state = State::CopyDest;
                self.entry_started = false;
            }
            State::Shift => {
                self.transport.newline();
            }
            State::InputAddr | State::InputData | State::CompOffset => {
                self.display_pc = self.display_pc.wrapping_add(1);
                if self.display_pc >= self.next_inst {
                    self.curr_inst = self.display_pc;
                }
                self.key_data()?;
            }
            _ => (),
        }
        Ok(())
    }

    fn key_minus(&mut self) -> Result<(), MonError> {
        match self.state {
            State::InputAddr | State::InputData | State::CompOffset => {
                self.display_pc = self.display_pc.wrapping_sub(1);
                if self.display_pc < self.curr_inst {
                    self.curr_inst = self.display_pc;
                }
                self.key_data()?;
            }
            _ => (),
        }
        Ok(())
    }

    fn key_pc(&mut self) -> Result<(), MonError> {
        self.display_pc = self.save_pc;
        self.curr_inst = self.display_pc;
        self.key_data()
    }

    #[named]
    fn key_go(&mut self) -> Result<(), MonError> {
        match self.state {
            State::CopyDest => self.copy_data()?,
            State::CompOffset => self.find_offset()?,
            State::InputAddr
            | State::InputData
            | State::InputRegister
            | State::ShowRegister
            | State::ToggleTrap1
            | State::Shift => {
                trace!("{}: running target at ${:08x}", function_name!(), self.regs.pc);
                self.exec
                    .arm_breakpoints(&mut self.breakpoints, self.mem.as_mut())?;
                let exc = if self.breakpoints.contains(self.display_pc) {
                    // a breakpoint sits right here: single-step past it
                    // first so it does not halt execution again
                    match self.exec.step_into(&mut self.regs, self.mem.as_mut()) {
                        Some(e) => Some(e),
                        None => self.exec.continue_run(&mut self.regs, self.mem.as_mut()),
                    }
                } else {
                    self.exec.continue_run(&mut self.regs, self.mem.as_mut())
                };
                self.exec
                    .disarm_breakpoints(&mut self.breakpoints, self.mem.as_mut())?;
                self.after_exec(exc)?;
            }
            State::AfterReset | State::CopyStart | State::CopyEnd => (),
        }
        Ok(())
    }

    /**
     * SHIFT STEP: resume after a breakpoint hit.
     */
    fn step_cont(&mut self) -> Result<(), MonError> {
        self.exec
            .arm_breakpoints(&mut self.breakpoints, self.mem.as_mut())?;
        let exc = self
            .exec
            .continue_after_breakpoint(&mut self.regs, self.mem.as_mut());
        self.exec
            .disarm_breakpoints(&mut self.breakpoints, self.mem.as_mut())?;
        self.after_exec(exc)
    }

    #[named]
    fn key_user(&mut self) -> Result<(), MonError> {
        if self.state == State::Shift {
            let at_top = if self.regs.supervisor() {
                self.regs.ssp >= INIT_SSP
            } else {
                self.regs.usp >= INIT_USP
            };
            if at_top {
                // top of stack, no caller to return to
                self.led.print(0, " toP SP ");
                self.state = State::InputAddr;
            } else {
                let exc = self.exec.step_out(&mut self.regs, self.mem.as_mut());
                self.after_exec(exc)?;
            }
        } else {
            let b0 = self.mem.read_byte(self.display_pc as usize)?;
            let b1 = self.mem.read_byte(self.display_pc as usize + 1)?;
            if b0 == 0x4e && (b1 == 0x40 || b1 == 0x41) {
                // TRAP #0 or TRAP #1, always skip over these instead of
                // stepping into monitor code
                trace!("{}: skipping monitor trap", function_name!());
                self.display_pc = self.display_pc.wrapping_add(2);
                self.key_address()?;
            } else {
                let exc = self.exec.step_over(&mut self.regs, self.mem.as_mut());
                self.after_exec(exc)?;
            }
        }
        Ok(())
    }

    /**
     * back from the execution-control collaborator: show where the target
     * stopped, or the exception it raised. any multi-step workflow in
     * progress is discarded either way.
     */
    fn after_exec(&mut self, exc: Option<Exception>) -> Result<(), MonError> {
        match exc {
            Some(e) => {
                warn!("target exception: {}", e);
                self.print_exception(e);
                Ok(())
            }
            None => {
                self.save_pc = self.regs.pc;
                self.display_pc = self.regs.pc;
                self.curr_inst = self.display_pc;
                self.key_address()
            }
        }
    }

    fn key_reg(&mut self) {
        self.led.print(0, " SH1Ft  ");
        self.state = State::Shift;
        self.edit_register = None;
    }

    /**
     * SHIFT (or register view) + hex key: select a register, the status
     * view or the active stack pointer by digit value.
     */
    fn select_register(&mut self, n: u8) {
        self.state = State::ShowRegister;

        if n < 8 {
            self.display_register(Reg::D(n));
        } else if n < 14 {
            self.display_register(Reg::A(n - 8));
        } else if n == 14 {
            self.hit_a6 = !self.hit_a6;
            if self.hit_a6 {
                match self.show_sr {
                    SrFormat::Classic => self.display_ccr(),
                    SrFormat::Numeric => self.display_sr(),
                    SrFormat::Symbolic => self.display_fmt_sr(),
                }
                // not editable
                self.edit_register = None;
            } else {
                self.display_register(Reg::A(6));
            }
        } else {
            // n == 15
            self.display_register(self.regs.active_sp());
        }
    }

    fn display_register(&mut self, r: Reg) {
        self.led.put_long(self.regs.get(r));
        self.edit_register = Some(r);
    }

    fn display_sr(&mut self) {
        let mut temp = self.regs.sr;
        for k in 3..7 {
            self.led.set(k, font_nibble((temp & 0xf) as u8));
            temp >>= 4;
        }
        self.led.set(7, 0);
        self.led.print(5, " Sr");
    }

    /// XNZVC, one digit per flag.
    fn display_ccr(&mut self) {
        let temp = self.regs.sr;
        self.led.set(3, font_nibble((temp & 0x01 != 0) as u8)); // carry
        self.led.set(4, font_nibble((temp & 0x02 != 0) as u8)); // overflow
        self.led.set(5, font_nibble((temp & 0x04 != 0) as u8)); // zero
        self.led.set(6, font_nibble((temp & 0x08 != 0) as u8)); // negative
        self.led.set(7, font_nibble((temp & 0x10 != 0) as u8)); // extend
        self.led.print(5, " Cr");
    }

    fn display_fmt_sr(&mut self) {
        let line = self.regs.sr_to_string();
        self.led.print(0, &line);
    }

    /**
     * DATA on a register view: begin editing the selected register, full
     * width first.
     */
    fn start_edit_reg(&mut self) {
        if let Some(r) = self.edit_register {
            self.edit_size = EditSize::Long;
            self.display_register(r);
            self.dot_register();
            self.entry_started = false;
            self.state = State::InputRegister;
        }
    }

    /**
     * DATA while editing: cycle 4 -> 2 -> 1 bytes. only data registers,
     * and only before the first nibble of the current value.
     */
    fn change_edit_size(&mut self) {
        if let Some(r) = self.edit_register {
            if !self.entry_started && r.is_data() {
                self.edit_size = self.edit_size.cycled();
                self.dot_register();
            }
        }
    }

    pub(crate) fn dot_register(&mut self) {
        self.led.dot_range(0, 2 * self.edit_size.bytes() as usize);
    }

    fn toggle_trap1(&mut self) {
        self.enable_trap1 = !self.enable_trap1;
        self.led.print(0, "trP1 0");
        self.led.print(6, if self.enable_trap1 { "n " } else { "FF" });
        // avoid an accidental shift state here
        self.state = State::ToggleTrap1;
    }

    fn key_test(&mut self) {
        self.exec.enable_interrupt_level();
        self.lcd.clear();
        self.lcd.puts("68008 Kit ");
        self.lcd.puts(VERSION);
        self.lcd.goto_xy(0, 1);
        self.lcd.puts("128kRAM 128kROM");
    }

    pub(crate) fn print_error(&mut self) {
        self.led.print(0, "  Err   ");
        if !self.mute {
            // terminal bell stands in for the kit beeper
            self.transport.send_byte(0x07);
        }
        self.state = State::AfterReset;
    }

    fn print_exception(&mut self, e: Exception) {
        self.led.print(0, "Err ");
        self.led.print(4, e.led_label());
        self.state = State::AfterReset;
    }

    /**
     * send a memory hex dump to the terminal and move past it.
     */
    #[named]
    fn dump_memory(&mut self) -> Result<(), MonError> {
        let addr = self.display_pc as usize;
        let num_bytes = self.hexdump_lines as usize * 16;
        mon_error::check_address_boundaries(
            self.mem.get_size(),
            addr,
            num_bytes,
            MonErrorType::MemoryRead,
            None,
        )?;
        trace!("{}: {} bytes at ${:06x}", function_name!(), num_bytes, addr);

        let slice = self.mem.as_vec()[addr..addr + num_bytes].to_vec();
        let dump = HexViewBuilder::new(&slice)
            .address_offset(addr)
            .row_width(16)
            .finish();
        let text = format!("{}", dump);
        for line in text.lines() {
            self.transport.puts(line);
            self.transport.newline();
        }

        // move the active address past the dumped window
        self.display_pc = (addr + num_bytes) as u32;
        self.key_address()
    }

    /**
     * send one line of disassembly to the terminal, returns the address of
     * the next instruction.
     */
    fn dump_disassembly(&mut self, addr: u32) -> Result<u32, MonError> {
        // start at an even address
        let laddr = addr & !1;
        self.transport.send_long_hex(laddr);
        self.transport.send_byte(b':');
        self.transport.send_byte(if self.breakpoints.contains(laddr) {
            b'*'
        } else {
            b' '
        });

        let (text, next) = self.disasm.disassemble(self.mem.as_mut(), laddr)?;

        // print up to 5 code words
        let mut p = laddr;
        for _ in 0..5 {
            if p < next {
                let w = self.mem.read_word_be(p as usize)?;
                self.transport.send_word_hex(w);
                p = p.wrapping_add(2);
            } else {
                self.transport.puts("    ");
            }
            self.transport.send_byte(b' ');
        }
        self.transport.puts("  ");
        self.transport.puts(&text);
        self.transport.newline();
        Ok(next)
    }

    /**
     * send a disassembly listing to the terminal.
     */
    fn disassemble_list(&mut self) -> Result<(), MonError> {
        for _ in 0..self.disasm_lines {
            self.display_pc = self.dump_disassembly(self.display_pc)?;
        }
        // update the 7-segment as well
        self.key_address()
    }

    /**
     * send a dump of the register contents to the terminal.
     */
    fn dump_registers(&mut self) -> Result<(), MonError> {
        // first line: the 8 data registers
        self.transport.puts("D0:");
        for j in 0..8 {
            self.transport.send_byte(b' ');
            self.transport.send_long_hex(self.regs.d[j]);
        }
        self.transport.newline();

        // second line: the 7 address registers, then USP or SSP depending
        // on mode
        self.transport.puts("A0:");
        for j in 0..7 {
            self.transport.send_byte(b' ');
            self.transport.send_long_hex(self.regs.a[j]);
        }
        self.transport.send_byte(b' ');
        let sp = self.regs.get(self.regs.active_sp());
        self.transport.send_long_hex(sp);
        self.transport.newline();

        // third line: status register raw and formatted, both stack pointers
        self.transport.puts("SR: ");
        self.transport.send_word_hex(self.regs.sr);
        self.transport.puts("     ");
        let line = self.regs.sr_to_string();
        self.transport.puts(&line);
        self.transport.puts("     USP: ");
        self.transport.send_long_hex(self.regs.usp);
        self.transport.puts("     SSP: ");
        self.transport.send_long_hex(self.regs.ssp);
        self.transport.newline();

        // fourth line: the next instruction
        self.dump_disassembly(self.display_pc)?;
        self.key_address()
    }

    /**
     * send all breakpoints to the terminal, one disassembly line each.
     */
    fn dump_breakpoints(&mut self) -> Result<(), MonError> {
        self.transport.puts("; ");
        self.transport.send_byte(b'0' + self.breakpoints.len() as u8);
        self.transport.puts(" breakpoint");
        if self.breakpoints.len() != 1 {
            self.transport.send_byte(b's');
        }
        self.transport.puts(" set");
        self.transport.newline();

        let addrs: Vec<u32> = self.breakpoints.addresses().to_vec();
        for a in addrs {
            self.dump_disassembly(a)?;
        }
        self.key_address()
    }

    /**
     * disassemble the current instruction window onto the LCD.
     */
    fn disassemble_lcd(&mut self) -> Result<(), MonError> {
        if !self.disasm_on_lcd {
            return Ok(());
        }
        // sanity check to avoid trashing the panel
        let width = self.lcd_width.max(1).min(20);
        let lines = self.lcd_lines.max(1).min(4);

        let addr = self.curr_inst & !1;
        let (text, next) = self.disasm.disassemble(self.mem.as_mut(), addr)?;
        // tabs don't render on the LCD
        let text = text.replace('\t', " ");

        self.lcd.clear();
        for k in 0..lines {
            let lo = k * width;
            if lo >= text.len() {
                break;
            }
            let hi = ((k + 1) * width).min(text.len());
            self.lcd.goto_xy(0, k);
            self.lcd.puts(&text[lo..hi]);
        }

        self.next_inst = next;
        Ok(())
    }

    /**
     * LOAD: run one s-record session from the transport.
     */
    #[named]
    fn load_srecord(&mut self) -> Result<(), MonError> {
        self.transport.puts("\r\nLoad Motorola s-record: ");
        let transport = self.transport.as_mut();
        let mem = self.mem.as_mut();
        let ok = LoadSession::new(transport).run(mem)?;
        debug!("{}: session ok={}", function_name!(), ok);

        self.curr_inst = self.display_pc;
        self.key_data()
    }
}
