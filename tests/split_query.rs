use query_splitter::{
    split_query, Dialect, Quote, SpecialMarker, SplitItem, SplitterFlags, SplitterOptions,
};

fn split(sql: &str, options: &SplitterOptions) -> Vec<String> {
    split_query(sql, options)
        .into_iter()
        .map(SplitItem::into_text)
        .collect()
}

#[test]
fn mysql_statements() {
    let options = SplitterOptions::mysql();
    assert_eq!(
        split("SELECT * FROM `table1`;SELECT * FROM `table2`;", &options),
        vec!["SELECT * FROM `table1`", "SELECT * FROM `table2`"]
    );
    assert_eq!(
        split(
            "INSERT INTO names (name) VALUES('one\\\\');INSERT INTO names (name) VALUES('two\\\\');",
            &options
        ),
        vec![
            "INSERT INTO names (name) VALUES('one\\\\')",
            "INSERT INTO names (name) VALUES('two\\\\')"
        ]
    );
    assert_eq!(split("query1\\", &options), vec!["query1\\"]);
}

#[test]
fn mysql_double_quotes() {
    let options = SplitterOptions {
        quotes: vec![
            Quote::escaped('\'', '\'', '\\'),
            Quote::escaped('"', '"', '\\'),
            Quote::doubled('`', '`'),
        ],
        ..SplitterOptions::mysql()
    };
    assert_eq!(
        split("SELECT \"'\";SELECT '\"';SELECT 3", &options),
        vec!["SELECT \"'\"", "SELECT '\"'", "SELECT 3"]
    );
}

#[test]
fn empty_statements() {
    let options = SplitterOptions::mysql();
    assert_eq!(split(";;;SELECT 1;;;", &options), vec!["SELECT 1"]);
    assert_eq!(
        split(";;;\n;;SELECT 1;;;\n;SELECT 2;;;", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
    assert!(split("", &options).is_empty());
    assert!(split(" ;\n ; ", &options).is_empty());
}

#[test]
fn delimiter_in_string() {
    let options = SplitterOptions::mysql();
    assert_eq!(
        split("CREATE TABLE a;INSERT INTO a VALUES ('1;2;3')", &options),
        vec!["CREATE TABLE a", "INSERT INTO a VALUES ('1;2;3')"]
    );
}

#[test]
fn doubled_backtick() {
    let input = ["CREATE TABLE `a``b` (`c\"d` INT)", "SELECT `a``b` FROM x"];
    assert_eq!(
        split(&input.join(";\n"), &SplitterOptions::mysql()),
        input
    );
}

#[test]
fn brackets() {
    let options = SplitterOptions::mssql().with(SplitterFlags::ALLOW_SEMICOLON);
    assert_eq!(
        split("SELECT [a;1] FROM t;SELECT 2", &options),
        vec!["SELECT [a;1] FROM t", "SELECT 2"]
    );
}

#[test]
fn prevent_single_line_split() {
    let options = SplitterOptions::mysql().with(SplitterFlags::PREVENT_SINGLE_LINE_SPLIT);
    assert_eq!(
        split(
            "SELECT * FROM `table1`;SELECT * FROM `table2`;\nSELECT * FROM `table3`",
            &options
        ),
        vec![
            "SELECT * FROM `table1`;SELECT * FROM `table2`",
            "SELECT * FROM `table3`"
        ]
    );
    assert_eq!(
        split("SELECT 1; -- comm 1\nSELECT 2", &options),
        vec!["SELECT 1", "-- comm 1\nSELECT 2"]
    );
    assert_eq!(
        split("SELECT 1;;\nSELECT 2", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
    let options = options.with(SplitterFlags::IGNORE_COMMENTS);
    assert_eq!(
        split("SELECT 1; -- comm 1\nSELECT 2", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
}

#[test]
fn adaptive_go_split() {
    let options = SplitterOptions::mssql().with(SplitterFlags::ADAPTIVE_GO_SPLIT);
    assert_eq!(
        split(
            "SELECT 1;CREATE PROCEDURE p1 AS BEGIN SELECT 2;SELECT 3;END\nGO\nSELECT 4;SELECT 5;ALTER PROCEDURE p1 AS BEGIN SELECT 2;SELECT 3;END",
            &options
        ),
        vec![
            "SELECT 1",
            "CREATE PROCEDURE p1 AS BEGIN SELECT 2;SELECT 3;END",
            "SELECT 4",
            "SELECT 5",
            "ALTER PROCEDURE p1 AS BEGIN SELECT 2;SELECT 3;END"
        ]
    );
    assert_eq!(
        split(
            "CREATE OR ALTER FUNCTION f() AS BEGIN RETURN 1; END\nGO\nSELECT 1;SELECT 2",
            &options
        ),
        vec![
            "CREATE OR ALTER FUNCTION f() AS BEGIN RETURN 1; END",
            "SELECT 1",
            "SELECT 2"
        ]
    );
}

#[test]
fn custom_delimiter() {
    let options = SplitterOptions::mysql();
    assert_eq!(
        split(
            "SELECT 1;\n DELIMITER $$\n SELECT 2; SELECT 3; \n DELIMITER ;",
            &options
        ),
        vec!["SELECT 1", "SELECT 2; SELECT 3;"]
    );
    assert_eq!(
        split(
            "DELIMITER //\nCREATE PROCEDURE p() BEGIN SELECT 1; END//\nDELIMITER ;\nCALL p();",
            &options
        ),
        vec!["CREATE PROCEDURE p() BEGIN SELECT 1; END", "CALL p()"]
    );
}

#[test]
fn comments() {
    let options = SplitterOptions::mysql();
    assert_eq!(
        split("SELECT 1 -- comment1;comment2\n;SELECT 2", &options),
        vec!["SELECT 1 -- comment1;comment2", "SELECT 2"]
    );
    assert_eq!(
        split("SELECT 1 /* comment1;comment2 */;SELECT 2", &options),
        vec!["SELECT 1 /* comment1;comment2 */", "SELECT 2"]
    );
    let options = options.with(SplitterFlags::IGNORE_COMMENTS);
    assert_eq!(
        split("-- header\nSELECT 1 -- trailer\n;SELECT 2", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
}

#[test]
fn dollar_quotes() {
    let options = SplitterOptions::postgres();
    assert_eq!(
        split("CREATE PROC $$ SELECT 1; SELECT 2; $$ ; SELECT 3", &options),
        vec!["CREATE PROC $$ SELECT 1; SELECT 2; $$", "SELECT 3"]
    );
    assert_eq!(
        split(
            "CREATE FUNCTION f() AS $body$\nBEGIN\n  RETURN 1;\nEND;\n$body$ LANGUAGE plpgsql;SELECT 1",
            &options
        ),
        vec![
            "CREATE FUNCTION f() AS $body$\nBEGIN\n  RETURN 1;\nEND;\n$body$ LANGUAGE plpgsql",
            "SELECT 1"
        ]
    );
}

#[test]
fn go_delimiter() {
    let options = SplitterOptions::mssql();
    assert_eq!(
        split("SELECT 1\ngo\nSELECT 2", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
    assert_eq!(split("SELECT 1\nGO", &options), vec!["SELECT 1"]);
    assert_eq!(split("SELECT 1;SELECT 2", &options), vec!["SELECT 1;SELECT 2"]);
}

#[test]
fn no_split() {
    assert_eq!(
        split("SELECT 1;SELECT 2", &SplitterOptions::no_split()),
        vec!["SELECT 1;SELECT 2"]
    );
}

#[test]
fn mongo() {
    assert_eq!(
        split(
            "db.collection.insert({x:1});db.collection.insert({y:2})",
            &SplitterOptions::mongo()
        ),
        vec!["db.collection.insert({x:1})", "db.collection.insert({y:2})"]
    );
    let options = SplitterOptions::mongo().with(SplitterFlags::JAVASCRIPT_COMMENTS);
    assert_eq!(
        split("db.c.find() // first;\ndb.c.count()", &options),
        vec!["db.c.find() // first;\ndb.c.count()"]
    );
}

#[test]
fn redis() {
    assert_eq!(
        split("SET x 1\n\nSET y 2\n", &SplitterOptions::redis()),
        vec!["SET x 1", "SET y 2"]
    );
}

#[test]
fn split_by_empty_line() {
    let options = SplitterOptions::default().with(SplitterFlags::SPLIT_BY_EMPTY_LINE);
    assert_eq!(
        split("SELECT 1\n\n   \nSELECT 2\nSELECT 3\n", &options),
        vec!["SELECT 1", "SELECT 2\nSELECT 3"]
    );
}

#[test]
fn oracle() {
    let options = SplitterOptions::oracle();
    assert_eq!(
        split("SELECT 1\n/\nSELECT 2\n", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
    assert_eq!(
        split("SET SQLT OFF\nCREATE PROC1\nSELECT 1;\nEND\n/", &options),
        vec!["CREATE PROC1\nSELECT 1;\nEND"]
    );
    assert_eq!(
        split("SET SQLTERMINATOR \"%\"\nSELECT 1%\nSELECT 2", &options),
        vec!["SELECT 1", "SELECT 2"]
    );
    assert_eq!(
        split("SET SQLT OFF\nSELECT 1;\n/\nSET SQLT ON\nSELECT 2;SELECT 3", &options),
        vec!["SELECT 1;", "SELECT 2", "SELECT 3"]
    );
}

#[test]
fn sqlite_trigger() {
    let options = SplitterOptions::sqlite();
    let trigger = "CREATE TRIGGER t AFTER INSERT ON a BEGIN UPDATE b SET x = 1; DELETE FROM c; END";
    assert_eq!(
        split(&format!("{trigger};SELECT 1"), &options),
        vec![trigger, "SELECT 1"]
    );
    let lower = trigger.to_lowercase();
    assert_eq!(split(&format!("{lower};"), &options), vec![lower]);
    assert_eq!(
        split("BEGIN TRANSACTION; UPDATE t1 SET x=0;; END;", &options),
        vec!["BEGIN TRANSACTION", "UPDATE t1 SET x=0", "END"]
    );
}

#[test]
fn copy_from_stdin() {
    let options = SplitterOptions::postgres()
        .with(SplitterFlags::COPY_FROM_STDIN | SplitterFlags::RETURN_RICH_INFO);
    let items = split_query(
        "COPY public.\"Genre\" (\"GenreId\", \"Name\") FROM stdin;\n1\tRock\n2\tJazz\n3\tMetal\n\\.\nCREATE TABLE xxx",
        &options,
    );
    let items: Vec<_> = items
        .iter()
        .map(|item| (item.text(), item.special_marker()))
        .collect();
    assert_eq!(
        items,
        vec![
            (
                "COPY public.\"Genre\" (\"GenreId\", \"Name\") FROM stdin",
                Some(SpecialMarker::CopyStdinStart)
            ),
            ("1\tRock\n", Some(SpecialMarker::CopyStdinLine)),
            ("2\tJazz\n", Some(SpecialMarker::CopyStdinLine)),
            ("3\tMetal\n", Some(SpecialMarker::CopyStdinLine)),
            ("\\.", Some(SpecialMarker::CopyStdinEnd)),
            ("CREATE TABLE xxx", None),
        ]
    );
}

#[test]
fn copy_without_flag() {
    assert_eq!(
        split(
            "COPY t FROM stdin;\n1\tRock\n\\.\n",
            &SplitterOptions::postgres()
        ),
        vec!["COPY t FROM stdin", "1\tRock\n\\."]
    );
}

#[test]
fn dialect_presets() {
    let options = "mssql".parse::<Dialect>().unwrap().options();
    assert_eq!(options, SplitterOptions::mssql());
    assert!("sybase".parse::<Dialect>().is_err());
}
