//! Edge collection and send: the hardware-facing half of the crate.
//!
//! This crate cannot assume any particular HAL, so the collaborators a real
//! firmware would reach for, an input pin, an output pin, a microsecond
//! clock, a busy-wait delay, an interrupt mask, are injected as trait
//! objects' worth of small traits instead.

use crate::parser::Parser;
use crate::ring::RingBuffer;
use core::sync::atomic::{AtomicU32, Ordering};

/// A digital input pin, read from the edge interrupt handler.
pub trait InputPin {
    type Error;
    fn is_high(&self) -> Result<bool, Self::Error>;
}

/// A digital output pin, driven while sending a code.
pub trait OutputPin {
    type Error;
    fn set_low(&mut self) -> Result<(), Self::Error>;
    fn set_high(&mut self) -> Result<(), Self::Error>;
}

/// A free-running microsecond clock.
pub trait MonotonicMicros {
    fn now_micros(&self) -> u32;
}

/// A busy-wait delay, used while driving the send waveform.
pub trait MicrosDelay {
    fn delay_us(&mut self, us: u32);
}

/// Masks the edge interrupt for the lifetime of the guard, restoring it on
/// drop (or on an explicit call to [`InterruptGuard::unmask`]).
pub trait InterruptGuard {
    fn mask() -> Self;
    fn unmask(self);
}

/// Collects edge timings into a ring buffer and drains them into a
/// [`Parser`]; optionally drives an output pin to transmit a composed code.
///
/// `on_edge` takes `&self` deliberately: it only ever touches the ring
/// buffer, the last-edge timestamp, and a read of `recv_pin`, all of which
/// are safe to reach through a shared reference, so a `Collector` can be
/// reached from an interrupt handler through a single shared static without
/// any locking.
pub struct Collector<I, O, C, D, const CAP: usize> {
    ring: RingBuffer<CAP>,
    recv_pin: Option<I>,
    send_pin: Option<O>,
    clock: C,
    delay: D,
    trim: i32,
    last_edge_micros: AtomicU32,
}

impl<I, O, C, D, const CAP: usize> Collector<I, O, C, D, CAP>
where
    I: InputPin,
    O: OutputPin,
    C: MonotonicMicros,
    D: MicrosDelay,
{
    /// Builds a collector with no pins attached yet; call [`Collector::init`]
    /// before enabling the edge interrupt.
    pub const fn new(clock: C, delay: D) -> Self {
        Self {
            ring: RingBuffer::new(),
            recv_pin: None,
            send_pin: None,
            clock,
            delay,
            trim: 0,
            last_edge_micros: AtomicU32::new(0),
        }
    }

    /// Attaches the receive and (optional) send pins, and a trim adjustment
    /// applied to edge timings to compensate receiver asymmetry. Pass `None`
    /// for `send_pin` on a receive-only setup.
    pub fn init(&mut self, recv_pin: Option<I>, mut send_pin: Option<O>, trim: i32) {
        self.trim = trim;
        if let Some(pin) = send_pin.as_mut() {
            let _ = pin.set_low();
        }
        self.send_pin = send_pin;
        self.recv_pin = recv_pin;
        self.last_edge_micros.store(self.clock.now_micros(), Ordering::Relaxed);
    }

    /// Called from the edge interrupt handler. Computes the duration since
    /// the last edge and pushes it to the ring buffer. `level_high` is the
    /// newly observed input level, used only to bias `trim`.
    ///
    /// Takes `&self` so it can be called through a shared reference from
    /// interrupt context while the main loop independently drains the ring
    /// buffer through [`Collector::poll`].
    pub fn on_edge(&self, level_high: bool) {
        let now = self.clock.now_micros();
        let last = self.last_edge_micros.swap(now, Ordering::Relaxed);
        let raw = now.wrapping_sub(last);

        let adjusted = if self.trim == 0 {
            raw
        } else if level_high {
            (raw as i64 + self.trim as i64).max(0) as u32
        } else {
            (raw as i64 - self.trim as i64).max(0) as u32
        };

        self.ring.push(adjusted);
    }

    /// Injects a duration directly into the ring buffer, bypassing the edge
    /// interrupt. Intended for tests and for replaying a captured trace.
    pub fn inject_timing(&self, duration: u32) -> bool {
        self.ring.push(duration)
    }

    /// Drains every duration currently buffered into `parser`.
    pub fn poll<const N: usize>(&mut self, parser: &mut Parser<N>) {
        self.poll_with(parser, || {});
    }

    /// Like [`Collector::poll`], but calls `yield_fn` after each drained
    /// duration, useful to hand control back to a cooperative scheduler on
    /// platforms that have one.
    pub fn poll_with<const N: usize>(&mut self, parser: &mut Parser<N>, mut yield_fn: impl FnMut()) {
        while let Some(duration) = self.ring.pop() {
            parser.parse(duration);
            yield_fn();
        }
    }

    /// Whether the receive pin is currently driven high.
    pub fn recv_level(&self) -> Result<bool, I::Error> {
        match &self.recv_pin {
            Some(pin) => pin.is_high(),
            None => Ok(false),
        }
    }

    /// Copies up to `out.len() - 1` of the most recently observed durations
    /// into `out`, oldest first, followed by a terminating `0`. Returns the
    /// number of durations written (excluding the terminator).
    pub fn get_buffer_data(&self, out: &mut [u32]) -> usize {
        if out.is_empty() {
            return 0;
        }
        let n = self.ring.snapshot_last_n(out.len() - 1, out);
        out[n] = 0;
        n
    }

    /// Sends a composed `"<name> <sequence>"` code by toggling the send pin
    /// according to [`Parser::compose`]'s output, repeated `send_repeat`
    /// times. Masks the edge interrupt for the duration of the send via `G`
    /// so self-induced edges never reach the receive path. A no-op if there
    /// is no send pin attached, the protocol is unknown, or it composes to
    /// nothing.
    pub fn send<const N: usize, G: InterruptGuard>(&mut self, parser: &Parser<N>, text: &str) {
        let name = text.split(' ').next().unwrap_or("");
        if parser.get_send_repeat(name) == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("send: unknown protocol {}", name);
            return;
        }
        let Some(send_pin) = self.send_pin.as_mut() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("send: no send pin attached");
            return;
        };

        let mut timings = [0u32; crate::parser::MAX_TIMING_BUFFER];
        let n = parser.compose(text, &mut timings);
        if n == 0 {
            return;
        }
        let repeat = parser.get_send_repeat(name);

        let guard = G::mask();
        let _ = send_pin.set_low();
        for _ in 0..repeat {
            let mut level_high = false;
            for &duration in &timings[..n] {
                level_high = !level_high;
                if level_high {
                    let _ = send_pin.set_high();
                } else {
                    let _ = send_pin.set_low();
                }
                self.delay.delay_us(duration);
            }
        }
        let _ = send_pin.set_low();
        guard.unmask();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Protocol, Symbol};
    use crate::role::SymbolRole;
    use core::cell::Cell;
    use core::convert::Infallible;

    struct FakeClock(Cell<u32>);
    impl MonotonicMicros for FakeClock {
        fn now_micros(&self) -> u32 {
            self.0.get()
        }
    }

    struct NoDelay;
    impl MicrosDelay for NoDelay {
        fn delay_us(&mut self, _us: u32) {}
    }

    struct NoPin;
    impl InputPin for NoPin {
        type Error = Infallible;
        fn is_high(&self) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }
    impl OutputPin for NoPin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn it1() -> Protocol {
        let mut p = Protocol::new(
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
        p.load().unwrap();
        p
    }

    #[test]
    fn on_edge_pushes_observed_delta_to_the_ring() {
        let clock = FakeClock(Cell::new(1_000));
        let mut collector: Collector<NoPin, NoPin, _, _, 16> = Collector::new(clock, NoDelay);
        collector.init(Some(NoPin), None, 0);
        collector.clock.0.set(1_380);
        collector.on_edge(true);
        assert_eq!(collector.ring.len(), 1);
        assert_eq!(collector.ring.pop(), Some(380));
    }

    #[test]
    fn poll_drains_ring_into_parser() {
        let clock = FakeClock(Cell::new(0));
        let mut collector: Collector<NoPin, NoPin, _, _, 16> = Collector::new(clock, NoDelay);
        collector.init(None, None, 0);
        collector.inject_timing(380);
        collector.inject_timing(11780);

        let mut parser = Parser::new([it1()]).unwrap();
        collector.poll(&mut parser);
        assert_eq!(parser.protocols()[0].sequence(), b"B");
    }

    #[test]
    fn get_buffer_data_terminates_with_zero() {
        let clock = FakeClock(Cell::new(0));
        let mut collector: Collector<NoPin, NoPin, _, _, 16> = Collector::new(clock, NoDelay);
        collector.init(None, None, 0);
        collector.inject_timing(10);
        collector.inject_timing(20);

        let mut out = [1u32; 4];
        let n = collector.get_buffer_data(&mut out);
        assert_eq!(n, 2);
        assert_eq!(&out[..2], &[10, 20]);
        assert_eq!(out[2], 0);
    }
}
