//! A single script's runtime state and its per-instruction stepping.

use {
    crate::{
        error::RuntimeError,
        label::{CommunicatorId, ScriptId},
        manifest::ManifestEntry,
        program::Program,
        tape::Tape,
    },
    std::{collections::HashMap, path::PathBuf},
};

/// What a script's `run()` produced when it stopped driving instructions.
///
/// Mirrors the `(signal, parent_mode, port)` tuple the original
/// implementation threads back to its caller; here it is a proper sum
/// type the Engine matches on instead of an untyped tuple.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal
{
    /// Suspended on a port opcode. `parent_mode` and `port` identify
    /// which Communicator the Engine must resolve the peer through.
    Pause{parent_mode: bool, port: i64},

    /// A non-root script reached its sentinel.
    SubEof,

    /// The root script reached its sentinel.
    MainEof,
}

/// Whether a script is the graph's entry point or was reached while
/// expanding some other script's manifest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role
{
    Root,
    Sub,
}

/// One loaded script: its instruction stream, tape, pointers, and port
/// bindings.
pub struct Script
{
    pub id: ScriptId,
    pub path: PathBuf,
    pub role: Role,
    program: Box<dyn Program>,
    cursor: usize,
    tape: Tape,
    data_ptr: i64,
    port_ptr: i64,
    parent_mode: bool,
    pub children: HashMap<i64, CommunicatorId>,
    pub parents: HashMap<i64, CommunicatorId>,

    /// This script's own manifest entries, not yet expanded into child
    /// Scripts and Communicators. The Engine takes this during its
    /// worklist walk; `None` after expansion (or if there never was a
    /// manifest).
    pub(crate) manifest: Option<Vec<ManifestEntry>>,
}

impl Script
{
    pub fn new(id: ScriptId, path: PathBuf, role: Role, program: Box<dyn Program>) -> Self
    {
        Self{
            id,
            path,
            role,
            program,
            cursor: 0,
            tape: Tape::new(),
            data_ptr: 0,
            port_ptr: 0,
            parent_mode: false,
            children: HashMap::new(),
            parents: HashMap::new(),
            manifest: None,
        }
    }

    /// The Communicator bound to the currently-selected port, under the
    /// currently-selected direction (parents if parent-mode, else
    /// children).
    pub fn current_port_communicator(&self) -> Option<CommunicatorId>
    {
        let map = if self.parent_mode { &self.parents } else { &self.children };
        map.get(&self.port_ptr).copied()
    }

    pub fn parent_mode(&self) -> bool
    {
        self.parent_mode
    }

    pub fn port_ptr(&self) -> i64
    {
        self.port_ptr
    }

    /// The value at the current data pointer, used by the Engine to
    /// fill the outgoing slot on a port write.
    pub fn current_cell(&self) -> i64
    {
        self.tape.get(self.data_ptr)
    }

    /// Overwrite the value at the current data pointer, used by the
    /// Engine to deliver a received value.
    pub fn set_current_cell(&mut self, value: i64)
    {
        self.tape.set(self.data_ptr, value);
    }

    /// Drive instructions until a [`Signal`] is produced (pause or EOF)
    /// or a fatal error occurs.
    ///
    /// `send`/`receive` are handed the resolved [`CommunicatorId`] for
    /// the currently-selected port (this script looks up its own
    /// `children`/`parents` map itself, since that part needs no access
    /// to the Engine's Communicator arena) and this script's own
    /// [`ScriptId`] as the calling endpoint. The Engine supplies
    /// closures that index into its arena; see [`crate::engine::Engine`].
    pub fn step_until_signal<Send, Receive, Input, Output>(
        &mut self,
        debug: bool,
        mut send: Send,
        mut receive: Receive,
        mut input: Input,
        mut output: Output,
    ) -> Result<Signal, RuntimeError>
    where
        Send: FnMut(CommunicatorId, ScriptId, i64, i64) -> Result<(), RuntimeError>,
        Receive: FnMut(CommunicatorId, ScriptId) -> Option<i64>,
        Input: FnMut() -> u8,
        Output: FnMut(std::fmt::Arguments),
    {
        use nyan_format::Opcode::*;

        loop {
            if self.program.is_end(self.cursor) {
                return Ok(match self.role {
                    Role::Root => Signal::MainEof,
                    Role::Sub => Signal::SubEof,
                });
            }

            let fetch = self.program.fetch(self.cursor)?;
            let repeat = fetch.repeat as u64;

            match fetch.opcode {
                PtrRight => { self.data_ptr = self.data_ptr.wrapping_add(repeat as i64); }
                PtrLeft => { self.data_ptr = self.data_ptr.wrapping_sub(repeat as i64); }
                CellInc => {
                    let v = self.tape.get(self.data_ptr).wrapping_add(repeat as i64);
                    self.tape.set(self.data_ptr, v);
                }
                CellDec => {
                    let v = self.tape.get(self.data_ptr).wrapping_sub(repeat as i64);
                    self.tape.set(self.data_ptr, v);
                }
                PortRight => { self.port_ptr = self.port_ptr.wrapping_add(repeat as i64); }
                PortLeft => { self.port_ptr = self.port_ptr.wrapping_sub(repeat as i64); }
                Output => {
                    for _ in 0..repeat {
                        let value = self.tape.get(self.data_ptr);
                        if debug {
                            output(format_args!("{{{value}}}"));
                        } else {
                            let c = char::from_u32(value.rem_euclid(0x11_0000) as u32)
                                .unwrap_or(char::REPLACEMENT_CHARACTER);
                            output(format_args!("{c}"));
                        }
                    }
                }
                Input => {
                    for _ in 0..repeat {
                        let byte = input();
                        self.tape.set(self.data_ptr, byte as i64);
                    }
                }
                ToggleParentMode => { self.parent_mode = !self.parent_mode; }
                DebugPrint => {
                    let value = self.tape.get(self.data_ptr);
                    output(format_args!("{{{value}}}"));
                }
                LoopStart => {
                    if self.tape.get(self.data_ptr) == 0 {
                        let end = self.program.brackets().matching_end(self.cursor)
                            .expect("bracket table was built from this same program");
                        self.cursor = end;
                        self.cursor += fetch.stride;
                        continue;
                    }
                }
                LoopEnd => {
                    if self.tape.get(self.data_ptr) != 0 {
                        let start = self.program.brackets().matching_start(self.cursor)
                            .expect("bracket table was built from this same program");
                        self.cursor = start;
                        self.cursor += fetch.stride;
                        continue;
                    }
                }
                PortWrite => {
                    let port = self.port_ptr;
                    let parent_mode = self.parent_mode;
                    let comm_id = self.current_port_communicator()
                        .ok_or(RuntimeError::PortUnbound{port, parent_mode})?;
                    let value = self.current_cell();
                    send(comm_id, self.id, value, port)?;
                    self.cursor += fetch.stride;
                    return Ok(Signal::Pause{parent_mode, port});
                }
                PortRead => {
                    let port = self.port_ptr;
                    let parent_mode = self.parent_mode;
                    let comm_id = self.current_port_communicator()
                        .ok_or(RuntimeError::PortUnbound{port, parent_mode})?;
                    match receive(comm_id, self.id) {
                        Some(value) => { self.set_current_cell(value); }
                        None => {
                            return Ok(Signal::Pause{parent_mode, port});
                        }
                    }
                }
            }

            self.cursor += fetch.stride;
        }
    }

    /// Restore a sub-script to its just-loaded state: zero cursor, tape,
    /// pointers, and parent-mode, but keep the parent/child bindings and
    /// instruction stream untouched.
    pub fn reset(&mut self)
    {
        self.cursor = 0;
        self.tape.clear();
        self.data_ptr = 0;
        self.port_ptr = 0;
        self.parent_mode = false;
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{parser::parse_source, program::SourceProgram};

    fn script_from_source(text: &str, role: Role) -> Script
    {
        let tokens = parse_source(text).unwrap();
        let program = SourceProgram::new(tokens).unwrap();
        Script::new(ScriptId(0), PathBuf::from("t.nyan"), role, Box::new(program))
    }

    fn run_no_ports(script: &mut Script) -> (Signal, String)
    {
        let mut out = String::new();
        let mut stdin = std::io::Cursor::new(Vec::<u8>::new());
        let signal = script.step_until_signal(
            false,
            |_, _, _, _| unreachable!("no ports in this program"),
            |_, _| unreachable!("no ports in this program"),
            || { use std::io::Read; let mut b = [0u8]; if stdin.read(&mut b).unwrap_or(0) == 1 { b[0] } else { 0 } },
            |args| { use std::fmt::Write; write!(out, "{args}").unwrap(); },
        ).unwrap();
        (signal, out)
    }

    #[test]
    fn increments_and_prints_a_code_point()
    {
        let mut script = script_from_source("냥냥.", Role::Root);
        let (signal, out) = run_no_ports(&mut script);
        assert_eq!(signal, Signal::MainEof);
        assert_eq!(out, "\u{2}");
    }

    #[test]
    fn sub_script_reaching_sentinel_is_sub_eof()
    {
        let mut script = script_from_source(".", Role::Sub);
        let (signal, _) = run_no_ports(&mut script);
        assert_eq!(signal, Signal::SubEof);
    }

    #[test]
    fn loop_runs_until_cell_is_zero()
    {
        // cell starts 0 -> 냥냥냥 (cell=3) -> loop decrements to 0, printing each time
        let mut script = script_from_source("냥냥냥~.냐-", Role::Root);
        let (_, out) = run_no_ports(&mut script);
        assert_eq!(out, "\u{3}\u{2}\u{1}");
    }

    #[test]
    fn loop_is_skipped_when_cell_already_zero()
    {
        let mut script = script_from_source("~.-뀨", Role::Root);
        let (_, out) = run_no_ports(&mut script);
        assert_eq!(out, "{0}");
    }

    #[test]
    fn debug_mode_prints_decimal_value()
    {
        let mut script = script_from_source("냥냥.", Role::Root);
        let mut out = String::new();
        script.step_until_signal(
            true,
            |_, _, _, _| unreachable!(),
            |_, _| unreachable!(),
            || 0,
            |args| { use std::fmt::Write; write!(out, "{args}").unwrap(); },
        ).unwrap();
        assert_eq!(out, "{2}");
    }

    #[test]
    fn port_write_pauses_with_parent_mode_and_port()
    {
        let mut script = script_from_source(";", Role::Root);
        script.children.insert(0, CommunicatorId(0));

        let signal = script.step_until_signal(
            false,
            |comm, caller, value, port| {
                assert_eq!(comm, CommunicatorId(0));
                assert_eq!(caller, ScriptId(0));
                assert_eq!(value, 0);
                assert_eq!(port, 0);
                Ok(())
            },
            |_, _| unreachable!(),
            || 0,
            |_| {},
        ).unwrap();
        assert_eq!(signal, Signal::Pause{parent_mode: false, port: 0});
    }

    #[test]
    fn port_read_on_empty_slot_pauses_without_advancing()
    {
        let mut script = script_from_source(":.", Role::Root);
        script.children.insert(0, CommunicatorId(0));

        let signal = script.step_until_signal(
            false,
            |_, _, _, _| unreachable!(),
            |_, _| None,
            || 0,
            |_| {},
        ).unwrap();
        assert_eq!(signal, Signal::Pause{parent_mode: false, port: 0});
        assert_eq!(script.cursor, 0); // retries `:` on resume
    }

    #[test]
    fn unbound_port_write_is_fatal()
    {
        let mut script = script_from_source(";", Role::Root);
        let result = script.step_until_signal(
            false,
            |_, _, _, _| unreachable!(),
            |_, _| unreachable!(),
            || 0,
            |_| {},
        );
        assert!(matches!(result, Err(RuntimeError::PortUnbound{port: 0, parent_mode: false})));
    }

    #[test]
    fn reset_zeroes_state_but_keeps_bindings()
    {
        let mut script = script_from_source("냥?", Role::Sub);
        script.children.insert(3, CommunicatorId(7));
        run_no_ports(&mut script);

        script.reset();
        assert_eq!(script.current_cell(), 0);
        assert_eq!(script.data_ptr, 0);
        assert_eq!(script.cursor, 0);
        assert!(!script.parent_mode);
        assert_eq!(script.children.get(&3), Some(&CommunicatorId(7)));
    }
}
