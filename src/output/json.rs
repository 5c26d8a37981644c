use super::Formatter;
use crate::analysis::strouhal::StrouhalRecord;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, record: &StrouhalRecord) -> String {
        // StrouhalRecord is a flat struct of numbers; serialization cannot
        // fail
        serde_json::to_string(record).unwrap_or_default()
    }
}
