use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("cell selector"));

/// Extracts every `<tr>` that owns at least one `<th>`/`<td>` as a row of
/// trimmed cell texts. Rows of unequal length are the caller's problem.
pub fn extract_rows(html: &str) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);
    let mut rows = Vec::new();

    for tr in document.select(&ROW_SELECTOR) {
        let cells: Vec<String> = tr
            .select(&CELL_SELECTOR)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::extract_rows;

    #[test]
    fn extracts_header_and_body_rows() {
        let html = r#"
            <table>
              <tr><th>Data</th><th>Placar</th></tr>
              <tr><td> 01/01/2026 </td><td>2 x 1</td></tr>
            </table>
        "#;
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Data", "Placar"]);
        assert_eq!(rows[1], vec!["01/01/2026", "2 x 1"]);
    }

    #[test]
    fn skips_rows_without_cells() {
        let rows = extract_rows("<table><tr></tr><tr><td>only</td></tr></table>");
        assert_eq!(rows, vec![vec!["only".to_string()]]);
    }

    #[test]
    fn tolerates_unequal_row_lengths() {
        let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>";
        let rows = extract_rows(html);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn garbage_input_yields_no_rows() {
        assert!(extract_rows("not html at all").is_empty());
    }
}
