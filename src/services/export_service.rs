/// CSV building for the export endpoints. Fields containing a comma,
/// quote, or newline are quoted and inner quotes doubled.
pub struct ExportService;

impl ExportService {
    pub fn escape(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            headers
                .iter()
                .map(|h| Self::escape(h))
                .collect::<Vec<_>>()
                .join(","),
        );
        for row in rows {
            lines.push(
                row.iter()
                    .map(|field| Self::escape(field))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(ExportService::escape("hello"), "hello");
        assert_eq!(ExportService::escape(""), "");
    }

    #[test]
    fn commas_quotes_and_newlines_are_quoted() {
        assert_eq!(ExportService::escape("a,b"), "\"a,b\"");
        assert_eq!(ExportService::escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(ExportService::escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn csv_joins_headers_and_rows() {
        let csv = ExportService::to_csv(
            &["Name", "Score"],
            &[
                vec!["Ada".to_string(), "95".to_string()],
                vec!["Grace, H".to_string(), "100".to_string()],
            ],
        );
        assert_eq!(csv, "Name,Score\nAda,95\n\"Grace, H\",100");
    }
}
