//! CSV export.

use super::date_cell;
use crate::models::ExtractedArticle;
use std::error::Error;

const HEADER: [&str; 4] = ["Blog", "Title", "Date", "URL"];

/// Header plus one row per article, quoted only where a field needs it.
///
/// # Errors
///
/// Returns an error if the `csv` writer fails to encode a record.
pub fn render(articles: &[ExtractedArticle]) -> Result<String, Box<dyn Error>> {
    let mut w = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    w.write_record(HEADER)?;
    for article in articles {
        let date = date_cell(article);
        w.write_record([
            article.source_name.as_str(),
            article.title.as_str(),
            date.as_str(),
            article.url.as_str(),
        ])?;
    }

    let bytes = w.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::article;

    #[test]
    fn test_header_and_rows() {
        let csv = render(&[article("Sophos", "Patch now", 21)]).unwrap();
        assert_eq!(
            csv,
            "Blog,Title,Date,URL\nSophos,Patch now,2025-04-21,https://sophos.example.com/21\n"
        );
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_quoted() {
        let csv = render(&[article("Unit 42", r#"Loaders, droppers and "stagers""#, 20)]).unwrap();
        assert!(csv.contains(r#"Unit 42,"Loaders, droppers and ""stagers""",2025-04-20"#));
    }

    #[test]
    fn test_multiline_title_reads_back_as_one_record() {
        let csv = render(&[article("ESET", "Line one\nline two", 20)]).unwrap();
        let mut reader = ::csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "Line one\nline two");
        assert_eq!(&rows[0][2], "2025-04-20");
    }

    #[test]
    fn test_empty_run_is_header_only() {
        assert_eq!(render(&[]).unwrap(), "Blog,Title,Date,URL\n");
    }
}
