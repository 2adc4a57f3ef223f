use std::env;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

use phf_codegen::Map;
use uncased::UncasedStr;

/// Words recognized by the scanner (case-insensitive)
static KEYWORDS: &[(&str, &str)] = &[
    ("ALTER", "Keyword::Alter"),
    ("BEGIN", "Keyword::Begin"),
    ("CREATE", "Keyword::Create"),
    ("DEFERRED", "Keyword::Deferred"),
    ("DELIMITER", "Keyword::Delimiter"),
    ("END", "Keyword::End"),
    ("EXCLUSIVE", "Keyword::Exclusive"),
    ("FUNCTION", "Keyword::Function"),
    ("GO", "Keyword::Go"),
    ("IF", "Keyword::If"),
    ("IMMEDIATE", "Keyword::Immediate"),
    ("OFF", "Keyword::Off"),
    ("ON", "Keyword::On"),
    ("OR", "Keyword::Or"),
    ("PROCEDURE", "Keyword::Procedure"),
    ("REPLACE", "Keyword::Replace"),
    ("SET", "Keyword::Set"),
    ("SQLT", "Keyword::SqlTerminator"),
    ("SQLTERMINATOR", "Keyword::SqlTerminator"),
    ("TRANSACTION", "Keyword::Transaction"),
    ("TRIGGER", "Keyword::Trigger"),
];

/// generate keyword map
fn build_keyword_map(writer: &mut impl Write, keywords: &[(&'static str, &'static str)]) -> Result<()> {
    let max_len = keywords.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut map = Map::<&'static UncasedStr>::new();
    for (keyword, variant) in keywords {
        map.entry(UncasedStr::new(keyword), *variant);
    }
    writeln!(
        writer,
        "/// Length of the longest keyword\npub(crate) const MAX_KEYWORD_LEN: usize = {max_len};"
    )?;
    writeln!(
        writer,
        "static KEYWORDS: ::phf::Map<&'static UncasedStr, Keyword> = \n{};",
        map.build()
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    let mut keywords = BufWriter::new(File::create(out_path.join("keywords.rs"))?);
    build_keyword_map(&mut keywords, KEYWORDS)?;
    keywords.flush()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
