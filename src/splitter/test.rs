use super::{split_query, QuerySplitter, RichItem, SpecialMarker, SplitItem};
use crate::dialect::{SplitterFlags, SplitterOptions};
use crate::lexer::Pos;

fn pos(offset: usize, line: usize, column: usize) -> Pos {
    Pos {
        offset,
        line,
        column,
    }
}

fn texts(items: Vec<SplitItem>) -> Vec<String> {
    items.into_iter().map(SplitItem::into_text).collect()
}

#[test]
fn rich_positions() {
    let options = SplitterOptions::mysql().with(SplitterFlags::RETURN_RICH_INFO);
    let items = split_query(
        "SELECT * FROM `table1`;\nSELECT * FROM `table2`;",
        &options,
    );
    assert_eq!(items.len(), 2);
    let first = items[0].rich().unwrap();
    assert_eq!(first.text, "SELECT * FROM `table1`");
    assert_eq!(first.start, pos(0, 0, 0));
    assert_eq!(first.trim_start, Some(pos(0, 0, 0)));
    assert_eq!(first.end, pos(22, 0, 22));
    assert_eq!(first.trim_end, Some(pos(22, 0, 22)));
    let second = items[1].rich().unwrap();
    assert_eq!(second.start, pos(23, 0, 23));
    assert_eq!(second.trim_start, Some(pos(24, 1, 0)));
    assert_eq!(second.end, pos(46, 1, 22));
}

#[test]
fn positions_count_characters() {
    let options = SplitterOptions::default().with(SplitterFlags::RETURN_RICH_INFO);
    let items = split_query("SELECT 'é';  SELECT 2", &options);
    let second = items[1].rich().unwrap();
    assert_eq!(second.text, "SELECT 2");
    assert_eq!(second.start, pos(11, 0, 11));
    assert_eq!(second.trim_start, Some(pos(13, 0, 13)));
    assert_eq!(second.end, pos(21, 0, 21));
}

#[test]
fn copy_from_stdin_items() {
    let options = SplitterOptions::postgres()
        .with(SplitterFlags::COPY_FROM_STDIN | SplitterFlags::RETURN_RICH_INFO);
    let items = split_query("COPY t (a) FROM stdin;\n1\n\n\\.\nSELECT 1", &options);
    let markers: Vec<_> = items.iter().map(SplitItem::special_marker).collect();
    assert_eq!(
        markers,
        vec![
            Some(SpecialMarker::CopyStdinStart),
            Some(SpecialMarker::CopyStdinLine),
            Some(SpecialMarker::CopyStdinLine),
            Some(SpecialMarker::CopyStdinEnd),
            None,
        ]
    );
    assert_eq!(
        texts(items.clone()),
        vec!["COPY t (a) FROM stdin", "1\n", "\n", "\\.", "SELECT 1"]
    );
    assert_eq!(
        items[1].rich(),
        Some(&RichItem {
            text: "1\n".to_owned(),
            start: pos(23, 1, 0),
            end: pos(25, 2, 0),
            trim_start: Some(pos(23, 1, 0)),
            trim_end: Some(pos(25, 2, 0)),
            special_marker: Some(SpecialMarker::CopyStdinLine),
        })
    );
}

#[test]
fn copy_candidate_is_reset_by_delimiter() {
    let options = SplitterOptions::postgres().with(SplitterFlags::COPY_FROM_STDIN);
    let items = split_query("COPY t TO stdout; SELECT 1 FROM stdin;\n1", &options);
    assert_eq!(
        texts(items),
        vec!["COPY t TO stdout", "SELECT 1 FROM stdin", "1"]
    );
}

#[test]
fn finish_is_idempotent() {
    let options = SplitterOptions::default();
    let mut splitter = QuerySplitter::new(&options);
    assert_eq!(splitter.push("SELECT 1;\nSELECT").count(), 1);
    assert_eq!(texts(splitter.finish().collect()), vec!["SELECT"]);
    assert_eq!(splitter.finish().count(), 0);
}

#[test]
fn push_waits_for_complete_lines() {
    let options = SplitterOptions::default();
    let mut splitter = QuerySplitter::new(&options);
    // nothing is scanned before a line feed
    assert_eq!(splitter.push("SELECT 1;").count(), 0);
    assert_eq!(texts(splitter.push("\nSELECT 2;").collect()), vec!["SELECT 1"]);
    assert_eq!(texts(splitter.finish().collect()), vec!["SELECT 2"]);
}

#[test]
fn unmatched_dollar_quote_holds_output() {
    let options = SplitterOptions::postgres();
    let sql = "SELECT a$$b;\nSELECT 2;\nSELECT 3;\n";
    let mut splitter = QuerySplitter::new(&options);
    assert_eq!(splitter.push("SELECT a$$b;\n").count(), 0);
    assert_eq!(splitter.push("SELECT 2;\nSELECT 3;\n").count(), 0);
    let items: Vec<_> = splitter.finish().collect();
    assert_eq!(items, split_query(sql, &options));
    assert_eq!(texts(items), vec!["SELECT a$$b", "SELECT 2", "SELECT 3"]);
}

#[test]
fn compaction_keeps_positions() {
    let options = SplitterOptions::default().with(SplitterFlags::RETURN_RICH_INFO);
    let mut splitter = QuerySplitter::new(&options);
    let first: Vec<_> = splitter.push("SELECT 1;\nSELECT").collect();
    assert_eq!(first.len(), 1);
    assert_eq!(splitter.scanner.input(), "\nSELECT");
    let second: Vec<_> = splitter.push(" 2\n;").collect();
    assert!(second.is_empty());
    let rest: Vec<_> = splitter.finish().collect();
    let item = rest[0].rich().unwrap();
    assert_eq!(item.text, "SELECT 2");
    assert_eq!(item.trim_start, Some(pos(10, 1, 0)));
    assert_eq!(item.trim_end, Some(pos(18, 1, 8)));
    assert_eq!(item.end, pos(19, 2, 0));
}

#[test]
fn split_lines() {
    let options = SplitterOptions::redis().with(SplitterFlags::RETURN_RICH_INFO);
    let items = split_query("  SET x 1 \r\n\nSET y 2", &options);
    assert_eq!(items.len(), 2);
    let first = items[0].rich().unwrap();
    assert_eq!(first.text, "SET x 1");
    assert_eq!(first.trim_start, Some(pos(2, 0, 2)));
    assert_eq!(first.trim_end, Some(pos(9, 0, 9)));
    assert_eq!(first.end, pos(11, 0, 11));
    assert_eq!(items[1].text(), "SET y 2");
}

#[test]
fn no_split_trims() {
    let options = SplitterOptions::no_split();
    assert_eq!(
        texts(split_query("\n SELECT 1;\nSELECT 2; \n", &options)),
        vec!["SELECT 1;\nSELECT 2;"]
    );
    assert!(split_query(" \n ", &options).is_empty());
}

#[test]
fn blank_data_is_not_content() {
    let options = SplitterOptions::default();
    assert_eq!(
        texts(split_query("\u{c}SELECT 1\u{c};\u{c}", &options)),
        vec!["SELECT 1"]
    );
}
