//! Read-only, state-preserving renderings of protocol and timing state, for
//! development and debugging. None of these touch matcher state.

use core::fmt;

use crate::protocol::Protocol;

/// Renders a raw duration trace (as returned by
/// [`crate::Collector::get_buffer_data`]) as space-separated microsecond
/// values, stopping at the first `0` terminator.
pub struct TimingsDump<'a>(pub &'a [u32]);

impl fmt::Display for TimingsDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for &t in self.0 {
            if t == 0 {
                break;
            }
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{t}")?;
            first = false;
        }
        Ok(())
    }
}

/// Renders one protocol's configuration and derived symbol windows.
pub struct ProtocolDump<'a>(pub &'a Protocol);

impl fmt::Display for ProtocolDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(
            f,
            "{} codeLen=[{},{}] tolerance={}% base={} repeat={}",
            p.name_str(),
            p.min_code_len,
            p.max_code_len,
            p.tolerance,
            p.base_time,
            p.send_repeat,
        )?;
        for symbol in &p.symbols[..p.symbol_count as usize] {
            write!(f, "  {} role={:?}", symbol.name(), symbol.role)?;
            for i in 0..symbol.time_length as usize {
                write!(f, " [{},{}]", symbol.min_time[i], symbol.max_time[i])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders every protocol in a table, one per line via [`ProtocolDump`].
pub struct TableDump<'a>(pub &'a [Protocol]);

impl fmt::Display for TableDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for protocol in self.0 {
            write!(f, "{}", ProtocolDump(protocol))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_dump_stops_at_terminator() {
        use std::string::ToString;
        let data = [10u32, 20, 0, 99];
        assert_eq!(TimingsDump(&data).to_string(), "10 20");
    }
}
