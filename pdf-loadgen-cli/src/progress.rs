use pdf_loadgen::{BatchSummary, GeneratedFile, ProgressReporter};
use std::io::Write;
use std::time::Instant;

const BAR_WIDTH: usize = 30;

/// Single-line progress bar redrawn in place with `\r`:
/// `Progreso:  40%|████████████                  | 2/5 [3.2s, pdf]`
///
/// Write errors are ignored; a broken terminal must not abort the batch.
pub struct TerminalProgress<W: Write> {
    out: W,
    description: &'static str,
    unit: &'static str,
    total: u64,
    started: Option<Instant>,
}

impl<W: Write> TerminalProgress<W> {
    pub fn new(out: W, description: &'static str, unit: &'static str) -> Self {
        Self {
            out,
            description,
            unit,
            total: 0,
            started: None,
        }
    }

    fn render(&mut self, current: u64) {
        let (percent, filled) = match self.total {
            0 => (100, BAR_WIDTH),
            total => (
                current * 100 / total,
                (current as usize * BAR_WIDTH) / total as usize,
            ),
        };
        let elapsed = self
            .started
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or_default();

        let _ = write!(
            self.out,
            "\r{}: {:>3}%|{}{}| {}/{} [{:.1}s, {}]",
            self.description,
            percent,
            "█".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            current,
            self.total,
            elapsed,
            self.unit
        );
        let _ = self.out.flush();
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressReporter for TerminalProgress<W> {
    fn start(&mut self, total: u64) {
        self.total = total;
        self.started = Some(Instant::now());
        self.render(0);
    }

    fn file_done(&mut self, current: u64, _total: u64, _file: &GeneratedFile) {
        self.render(current);
    }

    fn finish(&mut self, _summary: &BatchSummary) {
        let _ = writeln!(self.out);
    }
}
