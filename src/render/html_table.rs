//! HTML table reading for Markdown and text output.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;

/// Column span cap, as HTML table processing applies it.
const MAX_COLSPAN: usize = 1000;

fn row_selector() -> &'static Selector {
    static ROW: OnceLock<Selector> = OnceLock::new();
    ROW.get_or_init(|| Selector::parse("tr").unwrap())
}

/// A cell read from HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCell {
    /// Text content with tags removed and entities decoded
    pub text: String,
    /// Rows covered (>= 1)
    pub rowspan: usize,
    /// Columns covered (>= 1)
    pub colspan: usize,
    /// Whether the cell was a `<th>`
    pub header: bool,
}

/// A table read from HTML markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    /// Rows as written, covered positions absent
    pub rows: Vec<Vec<HtmlCell>>,
}

impl HtmlTable {
    /// Read the rows and cells of an HTML table.
    ///
    /// Only the direct `<td>`/`<th>` children of each `<tr>` are cells;
    /// rows of tables nested inside a cell belong to that cell's text.
    pub fn parse(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let rows = fragment
            .select(row_selector())
            .filter(|row| !inside_cell(*row))
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| matches!(el.value().name(), "td" | "th"))
                    .map(|el| HtmlCell {
                        text: cell_text(el),
                        rowspan: span_attr(el, "rowspan"),
                        colspan: span_attr(el, "colspan"),
                        header: el.value().name() == "th",
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Expand spans into a dense grid.
    ///
    /// Each spanning cell keeps its text at its top-left position; the
    /// other positions it covers are empty strings. Row spans stop at the
    /// last parsed row.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid: Vec<Vec<Option<String>>> = vec![Vec::new(); self.rows.len()];

        for (r, row) in self.rows.iter().enumerate() {
            let mut c = 0;
            for cell in row {
                while grid[r].get(c).is_some_and(Option::is_some) {
                    c += 1;
                }
                let rowspan = cell.rowspan.min(self.rows.len() - r);
                let colspan = cell.colspan.min(MAX_COLSPAN);
                for dr in 0..rowspan {
                    for dc in 0..colspan {
                        let slot = &mut grid[r + dr];
                        if slot.len() <= c + dc {
                            slot.resize(c + dc + 1, None);
                        }
                        slot[c + dc] = Some(if dr == 0 && dc == 0 {
                            cell.text.clone()
                        } else {
                            String::new()
                        });
                    }
                }
                c += colspan;
            }
        }

        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        grid.into_iter()
            .map(|row| {
                let mut row: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
                row.resize(width, String::new());
                row
            })
            .collect()
    }

    /// Render as a Markdown pipe table; the first row is the header.
    pub fn to_markdown(&self) -> String {
        let grid = self.to_grid();
        let Some(first) = grid.first() else {
            return String::new();
        };

        let mut output = String::new();
        for (i, row) in grid.iter().enumerate() {
            output.push('|');
            for cell in row {
                output.push(' ');
                output.push_str(&escape_pipe(cell));
                output.push_str(" |");
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                for _ in first {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }
        output
    }

    /// Render as tab-separated rows.
    pub fn to_plain_text(&self) -> String {
        self.to_grid()
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn inside_cell(row: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| matches!(el.value().name(), "td" | "th"))
}

fn span_attr(el: ElementRef<'_>, name: &str) -> usize {
    el.value()
        .attr(name)
        .and_then(|v| v.trim().parse().ok())
        .filter(|&span: &usize| span >= 1)
        .unwrap_or(1)
}

/// Text of a cell with markup removed; `<br>` separates words.
fn cell_text(el: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape_pipe(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spans_and_text() {
        let table = HtmlTable::parse(
            "<table><tr><td rowspan='2' colspan='1'>a &amp; b</td><th colspan=\"2\">H<br/>2</th></tr></table>",
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0][0],
            HtmlCell {
                text: "a & b".to_string(),
                rowspan: 2,
                colspan: 1,
                header: false,
            }
        );
        assert_eq!(table.rows[0][1].text, "H 2");
        assert_eq!(table.rows[0][1].colspan, 2);
        assert!(table.rows[0][1].header);
    }

    #[test]
    fn test_grid_expands_merged_cell() {
        let table =
            HtmlTable::parse("<table><tr><td rowspan='2' colspan='2'>merged</td></tr></table>");
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["merged".to_string(), String::new()],
                vec![String::new(), String::new()],
            ]
        );
    }

    #[test]
    fn test_grid_skips_positions_taken_by_rowspan() {
        let table = HtmlTable::parse(
            "<table><tr><td rowspan='2' colspan='1'>A</td><td rowspan='1' colspan='1'>B</td></tr>\
             <tr><td rowspan='1' colspan='1'>C</td></tr></table>",
        );
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec![String::new(), "C".to_string()],
            ]
        );
    }

    #[test]
    fn test_to_markdown() {
        let table = HtmlTable::parse(
            "<table><tr><td>Name</td><td>Qty</td></tr><tr><td>a|b</td><td>3</td></tr></table>",
        );
        assert_eq!(
            table.to_markdown(),
            "| Name | Qty |\n| --- | --- |\n| a\\|b | 3 |\n"
        );
    }

    #[test]
    fn test_plain_text_and_empty() {
        let table = HtmlTable::parse("<table><tr><td>x</td><td>y</td></tr></table>");
        assert_eq!(table.to_plain_text(), "x\ty");

        let empty = HtmlTable::parse("<table></table>");
        assert!(empty.is_empty());
        assert_eq!(empty.to_markdown(), "");
    }

    #[test]
    fn test_entities_and_nested_markup() {
        let table = HtmlTable::parse(
            "<table><tr><td>caf&eacute; &#8364;5 &apos;x&apos;</td>\
             <td><b>bold</b> <i>text</i>&nbsp;here</td></tr></table>",
        );
        assert_eq!(table.rows[0][0].text, "caf\u{e9} \u{20ac}5 'x'");
        assert_eq!(table.rows[0][1].text, "bold text here");
    }

    #[test]
    fn test_nested_table_cells_stay_inside_their_cell() {
        let table = HtmlTable::parse(
            "<table><tr><td>outer</td><td><table><tr><td>inner</td></tr></table></td></tr></table>",
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0][1].text, "inner");
    }

    #[test]
    fn test_huge_spans_are_clamped() {
        let table = HtmlTable::parse(
            "<table><tr><td rowspan='100000000' colspan='100000000'>x</td></tr></table>",
        );
        assert_eq!(table.rows[0][0].rowspan, 100_000_000);

        let grid = table.to_grid();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), MAX_COLSPAN);
        assert_eq!(grid[0][0], "x");
    }

    #[test]
    fn test_rowspan_past_last_row_is_cut() {
        let table = HtmlTable::parse(
            "<table><tr><td rowspan='5'>A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec![String::new(), "C".to_string()],
            ]
        );
    }
}
