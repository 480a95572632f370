//! Human-readable per-run report.

use std::fmt;

use crate::footprint::Napkin;
use crate::runner::PhaseTimings;
use crate::variant::Variant;

/// One variant run, ready to print.
///
/// ```text
///     HashMap<Key, Box<Cell88>>, ~106.8 MiB
///         Napkin math generation: 11 ms
///         Napkin math Multiplication: 16 ms
///         Node generation 412 ms
///         Multiplication 187 ms
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    pub variant: &'a Variant,
    pub count: usize,
    pub timings: PhaseTimings,
}

impl<'a> Report<'a> {
    pub fn new(variant: &'a Variant, count: usize, timings: PhaseTimings) -> Self {
        Self {
            variant,
            count,
            timings,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mib = self.variant.footprint_mib(self.count);
        let napkin = Napkin::for_mib(mib);
        let op = self.variant.op.label();

        writeln!(f, "\t{}, ~{:.1} MiB", self.variant.description(), mib)?;
        writeln!(f, "\t\tNapkin math generation: {:.0} ms", napkin.generation_ms)?;
        writeln!(f, "\t\tNapkin math {op}: {:.0} ms", napkin.compute_ms)?;
        writeln!(f, "\t\tNode generation {} ms", self.timings.generation_ms())?;
        write!(f, "\t\t{op} {} ms", self.timings.compute_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant;
    use std::time::Duration;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn formats_all_lines() {
        let v = variant::find("vec-box-88").unwrap();
        let timings = PhaseTimings {
            generation: Duration::from_millis(412),
            compute: Duration::from_micros(187_900),
        };
        let text = Report::new(v, 1_000_000, timings).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "\tVec<Box<Cell88>>, ~91.6 MiB");
        assert_eq!(lines[1], "\t\tNapkin math generation: 9 ms");
        assert_eq!(lines[2], "\t\tNapkin math Multiplication: 14 ms");
        assert_eq!(lines[3], "\t\tNode generation 412 ms");
        assert_eq!(lines[4], "\t\tMultiplication 187 ms");
    }
}
