//! Per-protocol incremental matching: feeding one observed duration at a time
//! into a [`crate::Protocol`] and discovering, as late as possible, whether it
//! completes a symbol, completes a packet, or breaks the attempt in progress.

use crate::protocol::Protocol;
use crate::role::SymbolRole;

/// What happened to a protocol as a result of [`Protocol::feed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchOutcome {
    /// The duration matched nothing; the protocol is idle (or was reset).
    Idle,
    /// The duration advanced a symbol still in progress.
    Advancing,
    /// A symbol completed but the packet continues.
    SymbolComplete,
    /// The packet is complete. The protocol's `name`/`sequence()` still
    /// describe it; the caller must read them and then call
    /// [`Protocol::reset_packet`].
    Emit,
}

enum StepOutcome {
    NoMatch,
    Retry,
    Advancing,
    Complete(usize),
}

impl Protocol {
    /// Feeds one observed duration (in the same unit as `base_time`,
    /// conventionally microseconds) into this protocol's matcher.
    ///
    /// Internally this may reset the protocol and re-attempt the same
    /// duration once, to support the Start-symbol resync policy (see
    /// `step`'s retry branch), at most one retry per call, so this always
    /// terminates.
    pub(crate) fn feed(&mut self, duration: u32) -> MatchOutcome {
        match self.step(duration) {
            StepOutcome::Retry => match self.step(duration) {
                StepOutcome::Retry | StepOutcome::NoMatch => MatchOutcome::Idle,
                StepOutcome::Advancing => MatchOutcome::Advancing,
                StepOutcome::Complete(idx) => self.complete_symbol(idx),
            },
            StepOutcome::NoMatch => MatchOutcome::Idle,
            StepOutcome::Advancing => MatchOutcome::Advancing,
            StepOutcome::Complete(idx) => self.complete_symbol(idx),
        }
    }

    fn step(&mut self, duration: u32) -> StepOutcome {
        let seq_len = self.seq_len;
        let mut any_matched = false;
        let mut retry = false;
        let mut completed: Option<usize> = None;

        for idx in 0..self.symbol_count as usize {
            if !self.symbols[idx].valid {
                continue;
            }

            let required_role = if seq_len == 0 {
                SymbolRole::START
            } else {
                SymbolRole::ANY
            };
            if !self.symbols[idx].role.intersects(required_role) {
                self.symbols[idx].valid = false;
                continue;
            }

            let i = self.symbols[idx].cnt as usize;
            let lo = self.symbols[idx].min_time[i];
            let hi = self.symbols[idx].max_time[i];
            if duration < lo || duration > hi {
                self.symbols[idx].valid = false;
                if seq_len == 0 && i == 1 {
                    retry = true;
                    break;
                }
                continue;
            }

            any_matched = true;
            self.symbols[idx].cnt += 1;
            self.symbols[idx].total += duration;
            if self.symbols[idx].cnt as usize == self.symbols[idx].time_length as usize {
                completed = Some(idx);
                break;
            }
        }

        if retry {
            self.reset_packet();
            return StepOutcome::Retry;
        }
        if let Some(idx) = completed {
            return StepOutcome::Complete(idx);
        }
        if !any_matched {
            self.reset_packet();
            return StepOutcome::NoMatch;
        }
        StepOutcome::Advancing
    }

    fn complete_symbol(&mut self, idx: usize) -> MatchOutcome {
        if self.seq_len == 0 {
            let time_length = self.symbols[idx].time_length as usize;
            let multiplier_sum: u32 = self.symbols[idx].time[..time_length]
                .iter()
                .map(|&t| t as u32)
                .sum();
            if multiplier_sum > 0 {
                let real_base = self.symbols[idx].total / multiplier_sum;
                #[cfg(feature = "defmt")]
                defmt::trace!(
                    "{}: recalibrated base_time {} -> {}",
                    self.name_str(),
                    self.base_time,
                    real_base
                );
                self.real_base = Some(real_base);
                self.recompute_windows(real_base);
            }
        }

        let role = self.symbols[idx].role;
        let name = self.symbols[idx].name;
        self.seq[self.seq_len as usize] = name;
        self.seq_len += 1;

        for symbol in self.symbols.iter_mut() {
            symbol.cnt = 0;
            symbol.valid = true;
            symbol.total = 0;
        }

        if role.bits() == SymbolRole::END.bits() && self.seq_len < self.min_code_len {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "{}: discarding fragment, {} of {} symbols",
                self.name_str(),
                self.seq_len,
                self.min_code_len
            );
            self.reset_packet();
            return MatchOutcome::Idle;
        }
        if role.intersects(SymbolRole::END) {
            return MatchOutcome::Emit;
        }
        if self.seq_len == self.max_code_len {
            return MatchOutcome::Emit;
        }
        MatchOutcome::SymbolComplete
    }
}
