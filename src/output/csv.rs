use crate::record::FullRecord;
use std::borrow::Cow;
use std::io::{self, Write};

/// Field separator
const SEP: char = ',';

/// Column titles, in export order
pub const HEADERS: [&str; 13] = [
    "店名",
    "URL",
    "住所",
    "アクセス・道案内",
    "営業時間",
    "定休日",
    "支払い方法",
    "カット価格",
    "スタッフ数",
    "こだわり条件",
    "備考",
    "その他",
    "電話番号",
];

/// Cells of one record, in [`HEADERS`] order; absent fields are empty
pub fn record_cells(record: &FullRecord) -> [&str; 13] {
    fn cell(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("")
    }

    let detail = &record.detail;
    [
        record.listing.name.as_str(),
        record.listing.url.as_str(),
        cell(&detail.address),
        cell(&detail.access),
        cell(&detail.business_hours),
        cell(&detail.holiday),
        cell(&detail.payment),
        cell(&detail.cut_price),
        cell(&detail.staff_count),
        cell(&detail.features),
        cell(&detail.remarks),
        cell(&detail.others),
        cell(&record.tel_real),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Quote-wraps a field when needed, doubling inner quotes
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if needs_quotes(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn format_row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| escape_field(cell))
        .collect::<Vec<_>>()
        .join(&SEP.to_string())
}

/// Writes records to any writer, one line per record
///
/// The header line is written first when `include_header` is set, so chunked
/// runs can append to the same file.
pub fn write_rows<W: Write>(mut w: W, records: &[FullRecord], include_header: bool) -> io::Result<()> {
    if include_header {
        writeln!(w, "{}", format_row(&HEADERS))?;
    }
    for record in records {
        writeln!(w, "{}", format_row(&record_cells(record)))?;
    }
    Ok(())
}

/// Renders the complete export (header plus one row per record)
pub fn to_csv(records: &[FullRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format_row(&HEADERS));
    lines.extend(records.iter().map(|r| format_row(&record_cells(r))));
    lines.join("\n")
}
