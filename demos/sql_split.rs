use fallible_iterator::FallibleIterator;
use std::env;
use std::fs::File;

use query_splitter::{Dialect, SplitItem, SplitQueryReader, SplitterFlags};

/// Split specified files and print all statements.
/// First argument is the dialect (mysql, mssql, postgres, ...).
// RUST_LOG=splitter=debug
fn main() {
    env_logger::init();
    let mut args = env::args().skip(1);
    let Some(dialect) = args.next() else {
        eprintln!("Usage: sql_split DIALECT FILE...");
        return;
    };
    let dialect: Dialect = match dialect.parse() {
        Ok(dialect) => dialect,
        Err(err) => {
            eprintln!("Err: {err}");
            return;
        }
    };
    let options = dialect.options().with(SplitterFlags::RETURN_RICH_INFO);
    for arg in args {
        println!("{arg}");
        let f = File::open(arg.clone()).unwrap();
        let mut reader = SplitQueryReader::new(f, &options);
        loop {
            match reader.next() {
                Ok(None) => break,
                Err(err) => {
                    eprintln!("Err: {err} in {arg}");
                    break;
                }
                Ok(Some(SplitItem::Rich(item))) => match item.special_marker {
                    Some(marker) => println!("{marker}: {:?}", item.text),
                    None => println!("{}: {}", item.start, item.text),
                },
                Ok(Some(item)) => println!("{item}"),
            }
        }
    }
}
