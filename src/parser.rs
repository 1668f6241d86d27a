//! The orchestrator: owns a bounded set of protocols, dispatches each
//! observed duration to every one of them, and turns a completed packet into
//! a callback invocation.

use crate::error::ConfigError;
use crate::matcher::MatchOutcome;
use crate::protocol::{Protocol, MAX_SEQ_LEN, MAX_TIME_LENGTH, PROTOCOL_NAME_LEN};

/// Longest composed timing buffer a packet's sequence can produce:
/// worst case, every symbol in the sequence needs every sub-duration slot.
pub const MAX_TIMING_BUFFER: usize = MAX_TIME_LENGTH * MAX_SEQ_LEN;

const MAX_TEXT_LEN: usize = PROTOCOL_NAME_LEN + 1 + MAX_SEQ_LEN;

/// Holds a fixed set of `N` protocols and drives them from a stream of
/// observed durations.
///
/// `N` is a compile-time bound so the parser never allocates; protocols are
/// loaded once at construction via [`Protocol::load`].
pub struct Parser<const N: usize> {
    protocols: [Protocol; N],
    callback: Option<fn(&str)>,
}

impl<const N: usize> Parser<N> {
    /// Loads every protocol in `protocols` and builds a parser over them.
    /// Fails on the first protocol that fails to load.
    pub fn new(mut protocols: [Protocol; N]) -> Result<Self, ConfigError> {
        for protocol in protocols.iter_mut() {
            protocol.load()?;
        }
        Ok(Self {
            protocols,
            callback: None,
        })
    }

    /// Registers the function called with a composed `"<name> <sequence>"`
    /// string each time a protocol completes a packet. Replaces any
    /// previously attached callback.
    pub fn attach_callback(&mut self, callback: fn(&str)) {
        self.callback = Some(callback);
    }

    /// Removes any registered callback.
    pub fn detach_callback(&mut self) {
        self.callback = None;
    }

    /// Feeds one observed duration to every configured protocol in turn.
    ///
    /// Each protocol's matcher is entirely independent: a duration rejected
    /// by one protocol has no effect on any other protocol's state.
    pub fn parse(&mut self, duration: u32) {
        for idx in 0..N {
            if self.protocols[idx].feed(duration) == MatchOutcome::Emit {
                self.emit(idx);
            }
        }
    }

    /// Read-only access to the configured protocols, eg for diagnostics.
    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    /// Finds a configured protocol by name.
    pub fn find_protocol(&self, name: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.name_str() == name)
    }

    /// How many times a send of this protocol's name should repeat the
    /// composed waveform. `0` if the protocol is unknown.
    pub fn get_send_repeat(&self, name: &str) -> u8 {
        self.find_protocol(name).map_or(0, |p| p.send_repeat)
    }

    /// Composes a `"<name> <sequence>"` string (as produced by a callback)
    /// back into a sequence of durations, writing the midpoint of each
    /// sub-duration's window into `buf`. Returns the number of durations
    /// written. Unknown protocols or symbols produce no output for that
    /// token; unknown protocol names yield `0`.
    pub fn compose(&self, text: &str, buf: &mut [u32]) -> usize {
        let mut parts = text.splitn(2, ' ');
        let Some(name) = parts.next() else {
            return 0;
        };
        let Some(protocol) = self.find_protocol(name) else {
            return 0;
        };
        let symbols = parts.next().unwrap_or("");

        let mut n = 0;
        for ch in symbols.chars() {
            let Some(symbol) = protocol.find_symbol(ch) else {
                continue;
            };
            for i in 0..symbol.time_length as usize {
                if n >= buf.len() {
                    return n;
                }
                buf[n] = (symbol.min_time[i] + symbol.max_time[i]) / 2;
                n += 1;
            }
        }
        n
    }

    fn emit(&mut self, idx: usize) {
        if let Some(callback) = self.callback {
            let mut buf = [0u8; MAX_TEXT_LEN];
            let mut n = 0;
            for b in self.protocols[idx].name_str().bytes() {
                if n >= buf.len() {
                    break;
                }
                buf[n] = b;
                n += 1;
            }
            if n < buf.len() {
                buf[n] = b' ';
                n += 1;
            }
            for &b in self.protocols[idx].sequence() {
                if n >= buf.len() {
                    break;
                }
                buf[n] = b;
                n += 1;
            }
            if let Ok(text) = core::str::from_utf8(&buf[..n]) {
                callback(text);
            }
        }
        self.protocols[idx].reset_packet();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Symbol;
    use crate::role::SymbolRole;

    fn it1() -> Protocol {
        Protocol::new(
            "it1",
            13,
            13,
            20,
            4,
            380,
            [
                Symbol::new('B', SymbolRole::START, [1, 31, 0, 0, 0, 0, 0, 0]),
                Symbol::new('0', SymbolRole::DATA, [1, 3, 3, 1, 0, 0, 0, 0]),
                Symbol::new('1', SymbolRole::DATA, [1, 3, 1, 3, 0, 0, 0, 0]),
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
            ],
            3,
        )
    }

    fn sc5() -> Protocol {
        Protocol::new(
            "sc5",
            13,
            13,
            25,
            4,
            100,
            [
                Symbol::new('0', SymbolRole::START | SymbolRole::DATA, [1, 3, 0, 0, 0, 0, 0, 0]),
                Symbol::new('1', SymbolRole::START | SymbolRole::DATA, [3, 1, 0, 0, 0, 0, 0, 0]),
                Symbol::new('S', SymbolRole::END, [1, 31, 0, 0, 0, 0, 0, 0]),
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
                Symbol::EMPTY,
            ],
            3,
        )
    }

    #[test]
    fn cross_protocol_isolation_only_the_owning_protocol_emits() {
        use core::sync::atomic::{AtomicU32, Ordering};
        static CALLS: AtomicU32 = AtomicU32::new(0);
        fn cb(_s: &str) {
            CALLS.fetch_add(1, Ordering::Relaxed);
        }

        let mut parser = Parser::new([it1(), sc5()]).unwrap();
        parser.attach_callback(cb);

        // it1's full thirteen-symbol packet.
        parser.parse(380);
        parser.parse(11780);
        for _ in 0..12 {
            parser.parse(380);
            parser.parse(1140);
            parser.parse(1140);
            parser.parse(380);
        }

        assert_eq!(CALLS.load(Ordering::Relaxed), 1);
        assert_eq!(parser.protocols()[1].seq_len, 0);
    }

    #[test]
    fn compose_round_trips_into_midpoint_durations() {
        let parser = Parser::new([it1()]).unwrap();
        let mut buf = [0u32; MAX_TIMING_BUFFER];
        let n = parser.compose("it1 B0", &mut buf);
        assert_eq!(n, 2 + 4);
        assert_eq!(buf[0], 380);
        assert_eq!(buf[1], 11780);
        assert_eq!(buf[2], 380);
        assert_eq!(buf[3], 1140);
        assert_eq!(buf[4], 1140);
        assert_eq!(buf[5], 380);
    }

    #[test]
    fn compose_of_unknown_protocol_yields_nothing() {
        let parser = Parser::new([it1()]).unwrap();
        let mut buf = [0u32; 8];
        assert_eq!(parser.compose("nope B0", &mut buf), 0);
    }

    #[test]
    fn get_send_repeat_is_zero_for_unknown_protocol() {
        let parser = Parser::new([it1()]).unwrap();
        assert_eq!(parser.get_send_repeat("it1"), 4);
        assert_eq!(parser.get_send_repeat("nope"), 0);
    }
}
