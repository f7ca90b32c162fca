use crate::extract::{element_text, selector};
use crate::record::DetailFields;
use crate::ExtractResult;
use scraper::Html;

/// Maps a detail table label to the field it fills
///
/// The label set is closed; anything else is ignored.
fn field_for_label<'a>(fields: &'a mut DetailFields, label: &str) -> Option<&'a mut Option<String>> {
    let field = match label {
        "電話番号" => &mut fields.tel_mask,
        "住所" => &mut fields.address,
        "アクセス・道案内" => &mut fields.access,
        "営業時間" => &mut fields.business_hours,
        "定休日" => &mut fields.holiday,
        "支払い方法" => &mut fields.payment,
        "カット価格" => &mut fields.cut_price,
        "スタッフ数" => &mut fields.staff_count,
        "こだわり条件" => &mut fields.features,
        "備考" => &mut fields.remarks,
        "その他" => &mut fields.others,
        _ => return None,
    };
    Some(field)
}

/// Parses the labeled data table of a salon detail page
///
/// Within each row of `table.slnDataTbl`, the Nth `th` label is paired with
/// the Nth `td` value, so rows holding several label/value pairs are read in
/// full. Recognised labels fill their field; empty values leave the field
/// absent. When a label repeats, the later non-empty value wins.
///
/// # Example
///
/// ```
/// use salon_harvest::extract::parse_detail_page;
///
/// let html = r#"<table class="slnDataTbl"><tr><th>住所</th><td>Tokyo</td></tr></table>"#;
/// let detail = parse_detail_page(html).unwrap();
/// assert_eq!(detail.address.as_deref(), Some("Tokyo"));
/// ```
pub fn parse_detail_page(html: &str) -> ExtractResult<DetailFields> {
    let row_selector = selector("table.slnDataTbl tr")?;
    let label_selector = selector("th")?;
    let value_selector = selector("td")?;

    let document = Html::parse_document(html);
    let mut fields = DetailFields::default();

    for row in document.select(&row_selector) {
        let labels = row.select(&label_selector).map(element_text);
        let values = row.select(&value_selector).map(element_text);

        for (label, value) in labels.zip(values) {
            if value.is_empty() {
                continue;
            }
            if let Some(field) = field_for_label(&mut fields, &label) {
                *field = Some(value);
            }
        }
    }

    Ok(fields)
}
