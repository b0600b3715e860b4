//! Generic HTML table reader.
//!
//! Every `<table>` of a document becomes one [`Table`], nested tables
//! included. A table only reads its own rows: the `tr` children of its
//! `thead`, `tbody` and `tfoot` sections, plus any bare `tr` children.
//!
//! Header rows come from `thead`; without one, the leading body rows made
//! only of `th` cells are used. `colspan` repeats a cell across columns and
//! `rowspan` carries it down through the rest of its section.

use crate::domain::model::Table;
use crate::utils::error::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;

const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

#[derive(Debug)]
struct RawCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

type RawRow = Vec<RawCell>;

/// Parses every table of `html`, in document order.
pub fn extract_tables(html: &str) -> Result<Vec<Table>> {
    let selector = Selector::parse("table").map_err(|e| HarvestError::Parse {
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    Ok(document.select(&selector).filter_map(read_table).collect())
}

fn read_table(table: ElementRef<'_>) -> Option<Table> {
    let mut head: Vec<RawRow> = Vec::new();
    let mut body: Vec<RawRow> = Vec::new();
    let mut foot: Vec<RawRow> = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => head.extend(section_rows(child)),
            "tbody" => body.extend(section_rows(child)),
            "tfoot" => foot.extend(section_rows(child)),
            "tr" => body.push(read_row(child)),
            _ => {}
        }
    }
    head.retain(|row| !row.is_empty());
    body.retain(|row| !row.is_empty());
    foot.retain(|row| !row.is_empty());

    if head.is_empty() {
        let leading = body
            .iter()
            .take_while(|row| row.iter().all(|cell| cell.is_header))
            .count();
        head = body.drain(..leading).collect();
    }

    let has_text = [&head, &body, &foot]
        .iter()
        .flat_map(|rows| rows.iter().flatten())
        .any(|cell| !cell.text.is_empty());
    if !has_text {
        return None;
    }

    let header_rows = expand_spans(head);
    let mut rows = expand_spans(body);
    rows.extend(expand_spans(foot));

    let width = header_rows
        .iter()
        .chain(rows.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let headers = (0..width)
        .map(|col| column_name(&header_rows, col))
        .collect();
    for row in &mut rows {
        row.resize(width, String::new());
    }

    Some(Table { headers, rows })
}

fn section_rows(section: ElementRef<'_>) -> Vec<RawRow> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(read_row)
        .collect()
}

fn read_row(tr: ElementRef<'_>) -> RawRow {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|cell| {
            let is_header = match cell.value().name() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            Some(RawCell {
                text: cell_text(cell),
                is_header,
                colspan: span(cell, "colspan", MAX_COLSPAN),
                rowspan: span(cell, "rowspan", MAX_ROWSPAN),
            })
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .map_or(1, |n| n.min(max))
}

/// Lays cells out on a grid, repeating spanned cells. Row spans stop at the
/// end of the section.
fn expand_spans(rows: Vec<RawRow>) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(rows.len());
    // (column, text, rows still to fill)
    let mut carried: VecDeque<(usize, String, usize)> = VecDeque::new();

    for row in rows {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        let mut index = 0;

        for cell in row {
            while carried.front().is_some_and(|(col, _, _)| *col <= index) {
                if let Some((col, text, left)) = carried.pop_front() {
                    texts.push(text.clone());
                    if left > 1 {
                        next.push_back((col, text, left - 1));
                    }
                    index += 1;
                }
            }

            for _ in 0..cell.colspan {
                texts.push(cell.text.clone());
                if cell.rowspan > 1 {
                    next.push_back((index, cell.text.clone(), cell.rowspan - 1));
                }
                index += 1;
            }
        }

        for (col, text, left) in carried.drain(..) {
            texts.push(text.clone());
            if left > 1 {
                next.push_back((col, text, left - 1));
            }
        }

        grid.push(texts);
        carried = next;
    }

    grid
}

fn column_name(header_rows: &[Vec<String>], col: usize) -> String {
    if header_rows.is_empty() {
        return col.to_string();
    }

    let mut levels: Vec<&str> = Vec::new();
    for level in header_rows.iter().filter_map(|row| row.get(col)) {
        if !level.is_empty() && !levels.contains(&level.as_str()) {
            levels.push(level);
        }
    }

    if levels.is_empty() {
        format!("Unnamed: {}", col)
    } else {
        levels.join(" ")
    }
}
