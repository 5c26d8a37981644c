use super::Formatter;
use crate::analysis::strouhal::StrouhalRecord;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, record: &StrouhalRecord) -> String {
        format!(
            "{},{},{:.8},{:.6},{:.6},{:.6}",
            record.re, record.d, record.u0, record.period, record.frequency, record.strouhal
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("re,d,u0_m_per_s,period_s,frequency_hz,strouhal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row_matches_header() {
        let record = StrouhalRecord {
            re: 200.0,
            d: 1.0,
            u0: 0.00293878,
            period: 2.0,
            frequency: 0.5,
            strouhal: 170.14,
        };
        let formatter = CsvFormatter;

        let header_fields = formatter.header().unwrap().split(',').count();
        let row_fields = formatter.format(&record).split(',').count();
        assert_eq!(header_fields, row_fields);

        let row = formatter.format(&record);
        assert!(row.starts_with("200,1,"), "unexpected row: {row}");
    }
}
