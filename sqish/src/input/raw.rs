//! Decoder for raw terminal input bytes.
//!
//! Used by the inline front end, which reads stdin directly in raw mode.
//! Unprintable bytes, invalid UTF-8 and unknown escape sequences are dropped
//! silently.

use super::{InputAdapter, InputEvent};
use anyhow::Result;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const BS: u8 = 0x08;
const LF: u8 = 0x0a;
const CTRL_L: u8 = 0x0c;
const CR: u8 = 0x0d;
const CTRL_N: u8 = 0x0e;
const CTRL_P: u8 = 0x10;
const CTRL_S: u8 = 0x13;
const CTRL_W: u8 = 0x17;
const DEL: u8 = 0x7f;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum State {
    #[default]
    Ground,
    /// After ESC.
    Escape,
    /// Inside `ESC [`; collects parameter bytes.
    Csi(Vec<u8>),
    /// After `ESC O` (application cursor keys).
    Ss3,
}

/// Incremental byte-to-event decoder. Sequences may be split across reads.
#[derive(Debug, Default)]
pub struct ByteDecoder {
    state: State,
    utf8: Vec<u8>,
}

impl ByteDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns an event when one is complete.
    pub fn feed(&mut self, byte: u8) -> Option<InputEvent> {
        match std::mem::take(&mut self.state) {
            State::Ground => self.ground(byte),
            State::Escape => {
                match byte {
                    b'[' => self.state = State::Csi(Vec::new()),
                    b'O' => self.state = State::Ss3,
                    ESC => self.state = State::Escape,
                    _ => {}
                }
                None
            }
            State::Csi(mut params) => match byte {
                0x20..=0x3f => {
                    params.push(byte);
                    self.state = State::Csi(params);
                    None
                }
                b'A' if params.is_empty() => Some(InputEvent::MoveUp),
                b'B' if params.is_empty() => Some(InputEvent::MoveDown),
                _ => None,
            },
            State::Ss3 => match byte {
                b'A' => Some(InputEvent::MoveUp),
                b'B' => Some(InputEvent::MoveDown),
                _ => None,
            },
        }
    }

    fn ground(&mut self, byte: u8) -> Option<InputEvent> {
        if byte < 0x80 {
            // A pending multi-byte char can't be completed by ASCII.
            self.utf8.clear();
        }

        match byte {
            ESC => {
                self.state = State::Escape;
                None
            }
            CTRL_C | CTRL_D => Some(InputEvent::Quit),
            CR | LF => Some(InputEvent::Commit),
            DEL | BS => Some(InputEvent::Backspace),
            CTRL_S => Some(InputEvent::ToggleSortMode),
            CTRL_L => Some(InputEvent::ToggleSessionFilter),
            CTRL_W => Some(InputEvent::ToggleCwdFilter),
            CTRL_P => Some(InputEvent::MoveUp),
            CTRL_N => Some(InputEvent::MoveDown),
            0x00..=0x1f => None,
            0x20..=0x7e => Some(InputEvent::InsertChar(byte as char)),
            _ => self.multibyte(byte),
        }
    }

    fn multibyte(&mut self, byte: u8) -> Option<InputEvent> {
        self.utf8.push(byte);
        match std::str::from_utf8(&self.utf8) {
            Ok(s) => {
                let ch = s.chars().next();
                self.utf8.clear();
                ch.filter(|c| !c.is_control()).map(InputEvent::InsertChar)
            }
            Err(err) if err.error_len().is_some() => {
                // Invalid sequence. Keep the byte if it can start a new char.
                self.utf8.clear();
                if (0xc2..=0xf4).contains(&byte) {
                    self.utf8.push(byte);
                }
                None
            }
            Err(_) => None,
        }
    }
}

/// [`InputAdapter`] over a raw byte stream such as stdin in raw mode.
pub struct RawByteInput<R> {
    reader: R,
    decoder: ByteDecoder,
    pending: VecDeque<InputEvent>,
}

impl<R: Read> RawByteInput<R> {
    pub fn new(reader: R) -> Self {
        RawByteInput {
            reader,
            decoder: ByteDecoder::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R: Read> InputAdapter for RawByteInput<R> {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        let mut buf = [0u8; 64];
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            let n = match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            for &byte in &buf[..n] {
                if let Some(event) = self.decoder.feed(byte) {
                    self.pending.push_back(event);
                }
            }
        }
    }
}
