use super::Formatter;
use crate::analysis::strouhal::StrouhalRecord;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &StrouhalRecord) -> String {
        if self.verbose {
            format!(
                "Re={:<6} D={:<5} m: St={:.4} [U0: {:.6} m/s, T: {:.4} s, f: {:.4} Hz]",
                record.re, record.d, record.strouhal, record.u0, record.period, record.frequency
            )
        } else {
            format!(
                "Re={:<6} D={:<5} m: St={:.4} (f={:.4} Hz)",
                record.re, record.d, record.strouhal, record.frequency
            )
        }
    }
}
