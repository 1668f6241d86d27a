//! Protocol table types: the data a caller configures once at startup, plus
//! the in-progress matcher state each [`Symbol`] and [`Protocol`] carries
//! between calls to [`Protocol::feed`] (see `matcher.rs`).

use crate::error::ConfigError;
use crate::role::SymbolRole;

/// Longest sub-duration sequence a single [`Symbol`] may have.
pub const MAX_TIME_LENGTH: usize = 8;
/// Most symbols a single [`Protocol`]'s alphabet may contain.
pub const MAX_SYMBOLS: usize = 8;
/// Longest symbol sequence a single packet may have.
pub const MAX_SEQ_LEN: usize = 120;
/// Buffer size for a protocol name, including the terminating `0` byte.
pub const PROTOCOL_NAME_LEN: usize = 12;

pub(crate) const fn name_from_str(s: &str) -> [u8; PROTOCOL_NAME_LEN] {
    let bytes = s.as_bytes();
    let mut out = [0u8; PROTOCOL_NAME_LEN];
    let mut i = 0;
    while i < bytes.len() && i < PROTOCOL_NAME_LEN - 1 {
        out[i] = bytes[i];
        i += 1;
    }
    out
}

fn compute_time_length(time: &[u16; MAX_TIME_LENGTH]) -> u8 {
    let mut n = 0usize;
    while n < MAX_TIME_LENGTH && time[n] != 0 {
        n += 1;
    }
    n as u8
}

fn compute_windows(
    base_time: u32,
    tolerance: u8,
    time: &[u16; MAX_TIME_LENGTH],
    time_length: u8,
) -> ([u32; MAX_TIME_LENGTH], [u32; MAX_TIME_LENGTH]) {
    let mut min_time = [0u32; MAX_TIME_LENGTH];
    let mut max_time = [0u32; MAX_TIME_LENGTH];
    for i in 0..time_length as usize {
        let nominal = base_time * time[i] as u32;
        let radius = (nominal * tolerance as u32) / 100;
        min_time[i] = nominal.saturating_sub(radius);
        max_time[i] = nominal + radius;
    }
    (min_time, max_time)
}

/// One symbol of a protocol's alphabet: a name, a role, and the sequence of
/// sub-durations (as integer multiples of the protocol's base time) that
/// spell it out on the wire.
///
/// `time_length`, `min_time` and `max_time` are derived by [`Protocol::load`]
/// from `time` and the owning protocol's `base_time`/`tolerance`; they are
/// left zeroed at construction. `cnt`, `valid` and `total` are matcher state,
/// mutated by [`Protocol::feed`] and reset between packets.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbol {
    pub(crate) name: u8,
    pub role: SymbolRole,
    pub time: [u16; MAX_TIME_LENGTH],
    pub time_length: u8,
    pub min_time: [u32; MAX_TIME_LENGTH],
    pub max_time: [u32; MAX_TIME_LENGTH],
    pub(crate) cnt: u8,
    pub(crate) valid: bool,
    pub(crate) total: u32,
}

impl Symbol {
    /// An unused alphabet slot; pads a protocol's `symbols` array out to
    /// [`MAX_SYMBOLS`].
    pub const EMPTY: Self = Self {
        name: 0,
        role: SymbolRole::DATA,
        time: [0; MAX_TIME_LENGTH],
        time_length: 0,
        min_time: [0; MAX_TIME_LENGTH],
        max_time: [0; MAX_TIME_LENGTH],
        cnt: 0,
        valid: true,
        total: 0,
    };

    /// Defines a symbol's name, role and sub-duration multipliers. `time`
    /// entries after the first `0` are ignored; `0` itself is never a valid
    /// multiplier.
    pub const fn new(name: char, role: SymbolRole, time: [u16; MAX_TIME_LENGTH]) -> Self {
        Self {
            name: name as u8,
            role,
            time,
            time_length: 0,
            min_time: [0; MAX_TIME_LENGTH],
            max_time: [0; MAX_TIME_LENGTH],
            cnt: 0,
            valid: true,
            total: 0,
        }
    }

    /// The symbol's name as a `char`. Names are always ASCII.
    pub fn name(&self) -> char {
        self.name as char
    }

    fn reset(&mut self) {
        self.cnt = 0;
        self.valid = true;
        self.total = 0;
    }
}

/// A configured protocol: its alphabet, timing base, and the matcher state
/// for the packet currently in progress.
///
/// Constructed with [`Protocol::new`] and finished with [`Protocol::load`],
/// which derives every symbol's `min_time`/`max_time` windows and resets
/// packet state. `load` is idempotent and safe to call again after changing
/// `base_time` or `tolerance`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Protocol {
    pub(crate) name: [u8; PROTOCOL_NAME_LEN],
    pub min_code_len: u8,
    pub max_code_len: u8,
    pub tolerance: u8,
    pub send_repeat: u8,
    pub base_time: u32,
    pub(crate) real_base: Option<u32>,
    pub symbols: [Symbol; MAX_SYMBOLS],
    pub symbol_count: u8,
    pub(crate) seq: [u8; MAX_SEQ_LEN],
    pub(crate) seq_len: u8,
}

impl Protocol {
    /// Defines a protocol. Call [`Protocol::load`] once before feeding it any
    /// durations.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        name: &str,
        min_code_len: u8,
        max_code_len: u8,
        tolerance: u8,
        send_repeat: u8,
        base_time: u32,
        symbols: [Symbol; MAX_SYMBOLS],
        symbol_count: u8,
    ) -> Self {
        Self {
            name: name_from_str(name),
            min_code_len,
            max_code_len,
            tolerance,
            send_repeat,
            base_time,
            real_base: None,
            symbols,
            symbol_count,
            seq: [0; MAX_SEQ_LEN],
            seq_len: 0,
        }
    }

    /// Derives every symbol's `time_length`/`min_time`/`max_time` from
    /// `base_time` and `tolerance`, and resets packet-in-progress state.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        if self.min_code_len > self.max_code_len {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: min_code_len > max_code_len", self.name_str());
            return Err(ConfigError::CodeLenRange);
        }
        if self.base_time == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}: base_time is zero", self.name_str());
            return Err(ConfigError::ZeroBaseTime);
        }
        for symbol in self.symbols[..self.symbol_count as usize].iter_mut() {
            symbol.time_length = compute_time_length(&symbol.time);
            let (min_time, max_time) =
                compute_windows(self.base_time, self.tolerance, &symbol.time, symbol.time_length);
            symbol.min_time = min_time;
            symbol.max_time = max_time;
        }
        self.reset_packet();
        Ok(())
    }

    /// The protocol's configured name.
    pub fn name_str(&self) -> &str {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(PROTOCOL_NAME_LEN);
        core::str::from_utf8(&self.name[..len]).unwrap_or("")
    }

    /// Finds an alphabet symbol by name, if this protocol defines one.
    pub fn find_symbol(&self, name: char) -> Option<&Symbol> {
        self.symbols[..self.symbol_count as usize]
            .iter()
            .find(|s| s.name() == name)
    }

    /// The symbol sequence of the packet currently in progress (or just
    /// completed, before the next call to [`Protocol::feed`]).
    pub fn sequence(&self) -> &[u8] {
        &self.seq[..self.seq_len as usize]
    }

    pub(crate) fn reset_packet(&mut self) {
        self.seq_len = 0;
        self.real_base = None;
        for symbol in self.symbols.iter_mut() {
            symbol.reset();
        }
    }

    pub(crate) fn recompute_windows(&mut self, base_time: u32) {
        for symbol in self.symbols[..self.symbol_count as usize].iter_mut() {
            let (min_time, max_time) =
                compute_windows(base_time, self.tolerance, &symbol.time, symbol.time_length);
            symbol.min_time = min_time;
            symbol.max_time = max_time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Protocol {
        let mut p = Protocol::new(
            "test",
            2,
            2,
            20,
            1,
            100,
            [
                Symbol::new('B', SymbolRole::START, [1, 10, 0, 0, 0, 0, 0, 0]),
                Symbol::new('0', SymbolRole::DATA | SymbolRole::END, [1, 2, 0, 0, 0, 0, 0, 0]),
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
            ],
            2,
        );
        p.load().unwrap();
        p
    }

    #[test]
    fn load_derives_time_length_and_symmetric_windows() {
        let p = sample();
        assert_eq!(p.symbols[0].time_length, 2);
        assert_eq!(p.symbols[0].min_time[0], 80);
        assert_eq!(p.symbols[0].max_time[0], 120);
        assert_eq!(p.symbols[0].min_time[1], 800);
        assert_eq!(p.symbols[0].max_time[1], 1200);
    }

    #[test]
    fn load_rejects_inverted_code_length_range() {
        let mut p = sample();
        p.min_code_len = 5;
        p.max_code_len = 1;
        assert_eq!(p.load(), Err(ConfigError::CodeLenRange));
    }

    #[test]
    fn load_rejects_zero_base_time() {
        let mut p = sample();
        p.base_time = 0;
        assert_eq!(p.load(), Err(ConfigError::ZeroBaseTime));
    }

    #[test]
    fn load_is_idempotent() {
        let mut p = sample();
        p.seq_len = 1;
        p.load().unwrap();
        assert_eq!(p.seq_len, 0);
        assert_eq!(p.symbols[0].min_time[0], 80);
    }

    #[test]
    fn name_str_round_trips() {
        let p = sample();
        assert_eq!(p.name_str(), "test");
    }
}
