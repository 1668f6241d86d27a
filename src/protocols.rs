//! Bundled protocol definitions for common 433 MHz remote-control encodings
//! and NEC-style infrared. Illustrative input data, not part of the matching
//! logic; callers are free to define their own [`Protocol`] tables instead
//! or alongside these.
//!
//! Every constant here still needs [`Protocol::load`] called once before use;
//! [`crate::Parser::new`] does this automatically.

use crate::protocol::{Protocol, Symbol};
use crate::role::SymbolRole;

/// Intertechno / PT2262-style protocol, tri-state encoded: Start `B`, data
/// symbols `0`/`1`.
pub const IT1: Protocol = Protocol::new(
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
);

/// Intertechno self-learning variant: explicit start `s`, data `0`/`1`, end
/// `x`.
pub const IT2: Protocol = Protocol::new(
    "it2",
    34,
    48,
    25,
    10,
    280,
    [
        Symbol::new('s', SymbolRole::START, [1, 2, 0, 0, 0, 0, 0, 0]),
        Symbol::new('0', SymbolRole::DATA, [1, 5, 0, 0, 0, 0, 0, 0]),
        Symbol::new('1', SymbolRole::DATA, [5, 1, 0, 0, 0, 0, 0, 0]),
        Symbol::new('x', SymbolRole::END, [1, 38, 0, 0, 0, 0, 0, 0]),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    4,
);

/// SC5272 / PT2272-style protocol: data symbols legal as the first symbol
/// too, explicit end `S`.
pub const SC5: Protocol = Protocol::new(
    "sc5",
    13,
    13,
    25,
    4,
    100,
    [
        Symbol::new('0', SymbolRole::START | SymbolRole::DATA, [1, 3, 0, 0, 0, 0, 0, 0]),
        Symbol::new('1', SymbolRole::START | SymbolRole::DATA, [3, 1, 0, 0, 0, 0, 0, 0]),
        Symbol::new('f', SymbolRole::START | SymbolRole::DATA, [1, 1, 0, 0, 0, 0, 0, 0]),
        Symbol::new('S', SymbolRole::END, [1, 31, 0, 0, 0, 0, 0, 0]),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    4,
);

/// EV1527-style fixed-code protocol.
pub const EV1527: Protocol = Protocol::new(
    "ev1527",
    25,
    25,
    25,
    3,
    320,
    [
        Symbol::new('S', SymbolRole::START, [1, 31, 0, 0, 0, 0, 0, 0]),
        Symbol::new('0', SymbolRole::DATA, [1, 3, 0, 0, 0, 0, 0, 0]),
        Symbol::new('1', SymbolRole::DATA, [3, 1, 0, 0, 0, 0, 0, 0]),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    3,
);

/// Cresta-style weather-sensor protocol ("cw"), wide tolerance to absorb the
/// transmitter clock drift typical of these sensors.
pub const CW: Protocol = Protocol::new(
    "cw",
    40,
    88,
    16,
    1,
    500,
    [
        Symbol::new('y', SymbolRole::START, [2, 0, 0, 0, 0, 0, 0, 0]),
        Symbol::new('0', SymbolRole::DATA, [1, 1, 0, 0, 0, 0, 0, 0]),
        Symbol::new('1', SymbolRole::DATA, [1, 2, 0, 0, 0, 0, 0, 0]),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    3,
);

/// NEC infrared protocol. `base_time` is `1`, so every `time` entry below is
/// already an absolute microsecond duration rather than a multiplier; NEC's
/// AGC burst and bit timings don't share a common base unit.
pub const NEC: Protocol = Protocol::new(
    "nec",
    33,
    33,
    20,
    1,
    1,
    [
        Symbol::new('N', SymbolRole::START, [9000, 4500, 0, 0, 0, 0, 0, 0]),
        Symbol::new('0', SymbolRole::DATA, [560, 560, 0, 0, 0, 0, 0, 0]),
        Symbol::new('1', SymbolRole::DATA, [560, 1680, 0, 0, 0, 0, 0, 0]),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    3,
);

/// NEC repeat code, sent on its own between held-button AGC bursts.
pub const NEC_REPEAT: Protocol = Protocol::new(
    "necR",
    1,
    1,
    20,
    1,
    1,
    [
        Symbol::new(
            'X',
            SymbolRole::START | SymbolRole::END,
            [9000, 2250, 560, 0, 0, 0, 0, 0],
        ),
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
        Symbol::EMPTY,
    ],
    1,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_protocol_loads_cleanly() {
        for mut p in [IT1, IT2, SC5, EV1527, CW, NEC, NEC_REPEAT] {
            p.load().unwrap();
        }
    }

    #[test]
    fn it1_matches_its_worked_example_timings() {
        let mut p = IT1;
        p.load().unwrap();
        let b = p.find_symbol('B').unwrap();
        assert_eq!((b.min_time[0] + b.max_time[0]) / 2, 380);
        assert_eq!((b.min_time[1] + b.max_time[1]) / 2, 11780);
    }
}
