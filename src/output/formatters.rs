//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。
//! すべてのフォーマッターは状態を持たず、シートと使用範囲だけから出力を生成します。

use serde_json::{Map, Number, Value};

use crate::error::ConvertError;
use crate::formatter::{iso_datetime, CellFormatter};
use crate::grid::resolve_used_range;
use crate::types::{CellValue, Sheet, UsedRange};

/// 空シートの番兵テキスト（Markdown / HTML）
pub(crate) const EMPTY_SHEET_SENTINEL: &str = "(empty sheet)";

/// ワークブック全体のHTML文書のタイトル
pub(crate) const WORKBOOK_TITLE: &str = "Excel Workbook";

/// Markdown形式のフォーマッター
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// 1シートをMarkdownテーブルとして出力
    ///
    /// 1行目は内容に関わらず常にヘッダーとして扱い、直後に区切り行を出力します。
    pub(crate) fn render(
        &self,
        sheet: &Sheet,
        range: Option<UsedRange>,
        cells: &CellFormatter,
    ) -> String {
        let Some(range) = range else {
            return EMPTY_SHEET_SENTINEL.to_string();
        };

        let mut lines = Vec::with_capacity(range.last_row as usize + 1);
        for row in range.rows() {
            let row_cells: Vec<String> = range
                .cols()
                .map(|col| escape_markdown(&cells.display_string(sheet.cell(row, col))))
                .collect();
            lines.push(format!("| {} |", row_cells.join(" | ")));

            if row == 1 {
                let separator = vec!["---"; range.last_col as usize];
                lines.push(format!("| {} |", separator.join(" | ")));
            }
        }

        lines.join("\n")
    }

    /// ワークブック全体: シートごとに`# シート名`の見出しを付けて連結
    pub(crate) fn render_workbook(&self, sheets: &[Sheet], cells: &CellFormatter) -> String {
        let sections: Vec<String> = sheets
            .iter()
            .map(|sheet| {
                let table = self.render(sheet, resolve_used_range(sheet), cells);
                format!("# {}\n\n{}", sheet.name, table)
            })
            .collect();

        sections.join("\n\n").trim_end().to_string()
    }
}

/// Markdownテーブルのセル内容をエスケープ
///
/// `|`は`\|`に、改行は空白1つに置換し、復帰文字は削除します。
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\r', "").replace('\n', " ")
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    /// 1シートをCSVとして出力
    ///
    /// グリッドをそのまま書き写すだけで、1行目に特別な意味はありません。
    /// 空シートの場合は空文字列です（番兵テキストはありません）。
    pub(crate) fn render(
        &self,
        sheet: &Sheet,
        range: Option<UsedRange>,
        cells: &CellFormatter,
    ) -> String {
        let Some(range) = range else {
            return String::new();
        };

        range
            .rows()
            .map(|row| {
                range
                    .cols()
                    .map(|col| escape_csv(&cells.display_string(sheet.cell(row, col))))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// ワークブック全体: シートごとに`# Sheet: シート名`の行を付けて連結
    pub(crate) fn render_workbook(&self, sheets: &[Sheet], cells: &CellFormatter) -> String {
        let sections: Vec<String> = sheets
            .iter()
            .map(|sheet| {
                let csv = self.render(sheet, resolve_used_range(sheet), cells);
                if csv.is_empty() {
                    format!("# Sheet: {}", sheet.name)
                } else {
                    format!("# Sheet: {}\n{}", sheet.name, csv)
                }
            })
            .collect();

        sections.join("\n\n").trim_end().to_string()
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    /// 1シートをレコードの配列として構築
    ///
    /// 1行目をヘッダー行とし、空のヘッダーには`Column_<列番号>`を割り当てます。
    /// 重複したヘッダー名は重複排除せず、後の列の値で上書きされます（最初の位置は維持）。
    pub(crate) fn sheet_value(
        &self,
        sheet: &Sheet,
        range: Option<UsedRange>,
        cells: &CellFormatter,
    ) -> Value {
        let range = match range {
            Some(range) if range.last_row >= 2 => range,
            _ => return Value::Array(Vec::new()),
        };

        let headers: Vec<String> = range
            .cols()
            .map(|col| {
                let name = cells.display_string(sheet.cell(1, col));
                if name.trim().is_empty() {
                    format!("Column_{}", col)
                } else {
                    name
                }
            })
            .collect();

        let records = (2..=range.last_row)
            .map(|row| {
                let mut record = Map::new();
                for (header, col) in headers.iter().zip(range.cols()) {
                    record.insert(header.clone(), json_value(sheet.cell(row, col), cells));
                }
                Value::Object(record)
            })
            .collect();

        Value::Array(records)
    }

    /// 1シートを整形済みJSON配列として出力
    pub(crate) fn render(
        &self,
        sheet: &Sheet,
        range: Option<UsedRange>,
        cells: &CellFormatter,
    ) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(
            &self.sheet_value(sheet, range, cells),
        )?)
    }

    /// ワークブック全体: シート名をキー（格納順）、各シートの配列を値とするオブジェクト
    ///
    /// 値は単独シート変換と同じ配列を構造化データのまま埋め込みます。
    pub(crate) fn render_workbook(
        &self,
        sheets: &[Sheet],
        cells: &CellFormatter,
    ) -> Result<String, ConvertError> {
        let mut workbook = Map::new();
        for sheet in sheets {
            let value = self.sheet_value(sheet, resolve_used_range(sheet), cells);
            workbook.insert(sheet.name.clone(), value);
        }

        Ok(serde_json::to_string_pretty(&Value::Object(workbook))?)
    }
}

/// 2^53: f64で整数を正確に表現できる上限
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// セルの型に応じたJSON値
///
/// - 数値: 数値リテラル（整数値は整数として出力）
/// - 論理値: 真偽値リテラル
/// - 日時: `yyyy-MM-ddTHH:mm:ss`形式の文字列
/// - 文字列 / 空: 表示文字列
fn json_value(value: &CellValue, cells: &CellFormatter) -> Value {
    match value {
        CellValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                Value::from(*n as i64)
            } else {
                Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(cells.display_string(value)))
            }
        }
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::DateTime(dt) => Value::String(iso_datetime(dt)),
        CellValue::Text(_) | CellValue::Empty => Value::String(cells.display_string(value)),
    }
}

/// HTML形式のフォーマッター
pub struct HtmlFormatter;

const HTML_STYLE: &str = "\
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; vertical-align: top; }
th { background-color: #e8e8e8; font-weight: bold; }";

impl HtmlFormatter {
    /// 1シートを単独で表示可能なHTML文書として出力
    pub(crate) fn render(
        &self,
        sheet: &Sheet,
        range: Option<UsedRange>,
        cells: &CellFormatter,
    ) -> String {
        let name = escape_html(&sheet.name);
        let body = format!(
            "<h1>{}</h1>\n{}",
            name,
            self.render_table(sheet, range, cells)
        );
        html_document(&name, &body)
    }

    /// ワークブック全体: 1つの文書に、シートごとの`<h2>`とテーブルを並べる
    pub(crate) fn render_workbook(&self, sheets: &[Sheet], cells: &CellFormatter) -> String {
        let mut body = format!("<h1>{}</h1>\n", WORKBOOK_TITLE);
        for sheet in sheets {
            body.push_str(&format!("<h2>{}</h2>\n", escape_html(&sheet.name)));
            body.push_str(&self.render_table(sheet, resolve_used_range(sheet), cells));
            body.push('\n');
        }
        html_document(WORKBOOK_TITLE, body.trim_end())
    }

    /// テーブル部分（空シートの場合は番兵の段落）
    fn render_table(&self, sheet: &Sheet, range: Option<UsedRange>, cells: &CellFormatter) -> String {
        let Some(range) = range else {
            return format!("<p>{}</p>", EMPTY_SHEET_SENTINEL);
        };

        let mut table = String::from("<table>\n");
        for row in range.rows() {
            let tag = if row == 1 { "th" } else { "td" };
            table.push_str("  <tr>");
            for col in range.cols() {
                let content = escape_html(&cells.display_string(sheet.cell(row, col)));
                table.push_str(&format!("<{tag}>{content}</{tag}>"));
            }
            table.push_str("</tr>\n");
        }
        table.push_str("</table>");
        table
    }
}

/// HTML文書の骨格（タイトルはエスケープ済みであること）
fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n\
         <style>\n{HTML_STYLE}\n</style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>"
    )
}

/// HTML特殊文字をエスケープ（`& < > " '`の5文字すべて）
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::text;
    use chrono::NaiveDate;

    fn render_md(sheet: &Sheet) -> String {
        MarkdownFormatter.render(sheet, resolve_used_range(sheet), &CellFormatter::default())
    }

    fn render_csv(sheet: &Sheet) -> String {
        CsvFormatter.render(sheet, resolve_used_range(sheet), &CellFormatter::default())
    }

    fn render_json(sheet: &Sheet) -> Value {
        JsonFormatter.sheet_value(sheet, resolve_used_range(sheet), &CellFormatter::default())
    }

    fn render_html(sheet: &Sheet) -> String {
        HtmlFormatter.render(sheet, resolve_used_range(sheet), &CellFormatter::default())
    }

    // Markdown
    #[test]
    fn test_markdown_table_shape() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("Name"), text("Age")],
                vec![text("Alice"), CellValue::Number(30.0)],
            ],
        );

        assert_eq!(
            render_md(&sheet),
            "| Name | Age |\n| --- | --- |\n| Alice | 30 |"
        );
    }

    #[test]
    fn test_markdown_header_only() {
        let sheet = Sheet::from_rows("S", vec![vec![text("only")]]);
        assert_eq!(render_md(&sheet), "| only |\n| --- |");
    }

    #[test]
    fn test_markdown_escaping() {
        let sheet = Sheet::from_rows(
            "S",
            vec![vec![text("a|b"), text("line1\nline2"), text("x\r\ny")]],
        );
        assert_eq!(
            render_md(&sheet),
            "| a\\|b | line1 line2 | x y |\n| --- | --- | --- |"
        );
    }

    #[test]
    fn test_markdown_fills_gaps_inside_range() {
        let mut sheet = Sheet::new("S");
        sheet.insert(crate::types::CellCoord::new(2, 2), text("x"));

        assert_eq!(render_md(&sheet), "|  |  |\n| --- | --- |\n|  | x |");
    }

    #[test]
    fn test_markdown_empty_sheet_sentinel() {
        assert_eq!(render_md(&Sheet::new("Empty")), "(empty sheet)");
    }

    #[test]
    fn test_markdown_workbook_sections() {
        let sheets = vec![
            Sheet::from_rows("First", vec![vec![text("a")]]),
            Sheet::new("Second"),
        ];
        let output = MarkdownFormatter.render_workbook(&sheets, &CellFormatter::default());

        assert_eq!(
            output,
            "# First\n\n| a |\n| --- |\n\n# Second\n\n(empty sheet)"
        );
    }

    // CSV
    #[test]
    fn test_csv_quoting() {
        let sheet = Sheet::from_rows(
            "S",
            vec![vec![
                text("He said, \"hi\""),
                text("plain"),
                text("two\nlines"),
                text("a,b"),
            ]],
        );

        assert_eq!(
            render_csv(&sheet),
            "\"He said, \"\"hi\"\"\",plain,\"two\nlines\",\"a,b\""
        );
    }

    #[test]
    fn test_csv_no_header_semantics() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("h1"), text("h2")],
                vec![CellValue::Boolean(true), CellValue::Number(1.5)],
            ],
        );
        assert_eq!(render_csv(&sheet), "h1,h2\nTRUE,1.5");
    }

    #[test]
    fn test_csv_empty_sheet_is_empty_string() {
        assert_eq!(render_csv(&Sheet::new("Empty")), "");
    }

    #[test]
    fn test_csv_workbook_sections() {
        let sheets = vec![
            Sheet::from_rows("A", vec![vec![text("1"), text("2")]]),
            Sheet::new("E"),
            Sheet::from_rows("B", vec![vec![text("3")]]),
        ];
        let output = CsvFormatter.render_workbook(&sheets, &CellFormatter::default());
        assert_eq!(output, "# Sheet: A\n1,2\n\n# Sheet: E\n\n# Sheet: B\n3");
    }

    // JSON
    #[test]
    fn test_json_blank_header_gets_synthetic_name() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("Name"), text(""), text("Age")],
                vec![text("Alice"), text("x"), CellValue::Number(30.0)],
            ],
        );

        assert_eq!(
            serde_json::to_string(&render_json(&sheet)).unwrap(),
            r#"[{"Name":"Alice","Column_2":"x","Age":30}]"#
        );
    }

    #[test]
    fn test_json_whitespace_header_is_blank() {
        let sheet = Sheet::from_rows(
            "S",
            vec![vec![text("  ")], vec![text("v")]],
        );
        assert_eq!(render_json(&sheet), serde_json::json!([{ "Column_1": "v" }]));
    }

    #[test]
    fn test_json_value_shapes() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("n"), text("f"), text("b"), text("d"), text("s"), text("e")],
                vec![
                    CellValue::Number(42.0),
                    CellValue::Number(2.5),
                    CellValue::Boolean(false),
                    CellValue::DateTime(dt),
                    text("hello"),
                    CellValue::Empty,
                ],
            ],
        );

        assert_eq!(
            render_json(&sheet),
            serde_json::json!([{
                "n": 42,
                "f": 2.5,
                "b": false,
                "d": "2024-01-15T10:30:00",
                "s": "hello",
                "e": ""
            }])
        );
    }

    #[test]
    fn test_json_fewer_than_two_rows_is_empty_array() {
        let header_only = Sheet::from_rows("S", vec![vec![text("a"), text("b")]]);
        assert_eq!(render_json(&header_only), serde_json::json!([]));
        assert_eq!(render_json(&Sheet::new("Empty")), serde_json::json!([]));

        let output = JsonFormatter
            .render(&Sheet::new("Empty"), None, &CellFormatter::default())
            .unwrap();
        assert_eq!(output, "[]");
    }

    // Duplicate header names are not deduplicated: the later column overwrites the
    // earlier value while the key keeps its first position.
    #[test]
    fn test_json_duplicate_headers_last_write_wins() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("Key"), text("Other"), text("Key")],
                vec![text("first"), text("o"), text("second")],
            ],
        );

        assert_eq!(
            serde_json::to_string(&render_json(&sheet)).unwrap(),
            r#"[{"Key":"second","Other":"o"}]"#
        );
    }

    // A real header literally named "Column_2" collides with the synthetic name for a
    // blank second header; the same last-write-wins rule applies.
    #[test]
    fn test_json_synthetic_name_collision_last_write_wins() {
        let sheet = Sheet::from_rows(
            "S",
            vec![
                vec![text("Column_2"), text("")],
                vec![text("real"), text("synthetic")],
            ],
        );

        assert_eq!(
            serde_json::to_string(&render_json(&sheet)).unwrap(),
            r#"[{"Column_2":"synthetic"}]"#
        );
    }

    #[test]
    fn test_json_pretty_printed() {
        let sheet = Sheet::from_rows("S", vec![vec![text("a")], vec![CellValue::Number(1.0)]]);
        let output = JsonFormatter
            .render(&sheet, resolve_used_range(&sheet), &CellFormatter::default())
            .unwrap();
        assert_eq!(output, "[\n  {\n    \"a\": 1\n  }\n]");
    }

    #[test]
    fn test_json_workbook_keyed_by_sheet_in_order() {
        let sheets = vec![
            Sheet::from_rows("Zeta", vec![vec![text("h")], vec![text("z")]]),
            Sheet::from_rows("Alpha", vec![vec![text("h")], vec![text("a")]]),
            Sheet::new("Empty"),
        ];
        let output = JsonFormatter
            .render_workbook(&sheets, &CellFormatter::default())
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        let object = parsed.as_object().unwrap();

        let keys: Vec<&String> = object.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Empty"]);
        for sheet in &sheets {
            assert_eq!(object[&sheet.name], render_json(sheet));
        }
    }

    #[test]
    fn test_json_non_finite_number_falls_back_to_string() {
        let cells = CellFormatter::default();
        assert_eq!(
            json_value(&CellValue::Number(f64::INFINITY), &cells),
            Value::String("inf".to_string())
        );
    }

    // HTML
    #[test]
    fn test_html_escapes_all_five_characters() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_html_document_structure() {
        let sheet = Sheet::from_rows(
            "Data",
            vec![vec![text("<h>")], vec![text("<b>&\"'")]],
        );
        let html = render_html(&sheet);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<title>Data</title>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<h1>Data</h1>"));
        assert!(html.contains("<th>&lt;h&gt;</th>"));
        assert!(html.contains("<td>&lt;b&gt;&amp;&quot;&#39;</td>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_html_empty_sheet_sentinel() {
        let html = render_html(&Sheet::new("Empty"));
        assert!(html.contains("<p>(empty sheet)</p>"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_html_workbook() {
        let sheets = vec![
            Sheet::from_rows("One", vec![vec![text("a")]]),
            Sheet::new("Two"),
        ];
        let html = HtmlFormatter.render_workbook(&sheets, &CellFormatter::default());

        assert!(html.contains("<title>Excel Workbook</title>"));
        assert!(html.contains("<h1>Excel Workbook</h1>"));
        assert_eq!(html.matches("<!DOCTYPE html>").count(), 1);
        assert!(html.contains("<h2>One</h2>\n<table>"));
        assert!(html.contains("<h2>Two</h2>\n<p>(empty sheet)</p>"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn grid() -> impl Strategy<Value = Vec<Vec<String>>> {
            (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
                prop::collection::vec(
                    prop::collection::vec("[a-z,\"|\n ]{0,6}", cols..=cols),
                    rows..=rows,
                )
            })
        }

        fn sheet_from(grid: &[Vec<String>]) -> Sheet {
            Sheet::from_rows(
                "P",
                grid.iter()
                    .map(|row| row.iter().map(|s| text(s)).collect())
                    .collect(),
            )
        }

        proptest! {
            #[test]
            fn test_markdown_row_and_cell_counts(grid in grid()) {
                let sheet = sheet_from(&grid);
                if let Some(range) = resolve_used_range(&sheet) {
                    let output = render_md(&sheet);
                    let lines: Vec<&str> = output.split('\n').collect();
                    prop_assert_eq!(lines.len(), range.last_row as usize + 1);
                    for line in lines {
                        // エスケープされていない区切り文字の数 = 列数 + 1
                        let pipes = line.replace("\\|", "").matches('|').count();
                        prop_assert_eq!(pipes, range.last_col as usize + 1);
                    }
                }
            }

            #[test]
            fn test_csv_field_round_trip(value in "[a-z,\" ]{0,12}") {
                let escaped = escape_csv(&value);
                if value.contains(',') || value.contains('"') {
                    prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
                    let inner = &escaped[1..escaped.len() - 1];
                    prop_assert_eq!(inner.replace("\"\"", "\""), value);
                } else {
                    prop_assert_eq!(escaped, value);
                }
            }

            #[test]
            fn test_html_escape_leaves_no_raw_specials(value in "[a-z<>&\"' ]{0,12}") {
                let escaped = escape_html(&value);
                prop_assert!(!escaped.contains('<'));
                prop_assert!(!escaped.contains('>'));
                prop_assert!(!escaped.contains('"'));
                prop_assert!(!escaped.contains('\''));
            }
        }
    }
}
