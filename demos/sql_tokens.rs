use std::env;
use std::fs::read_to_string;

use query_splitter::lexer::sql::Tokenizer;
use query_splitter::lexer::Scanner;
use query_splitter::Dialect;

/// Tokenize specified files with the default dialect (or `DIALECT`)
fn main() {
    let dialect: Dialect = env::var("DIALECT")
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Dialect::Default);
    let options = dialect.options();
    for arg in env::args().skip(1) {
        let input = read_to_string(&arg).unwrap();
        let mut s = Scanner::with_input(input, Tokenizer::new(&options));
        loop {
            let pos = s.position();
            match s.scan(true) {
                None => break,
                Some((token, token_type)) => {
                    println!("{pos}: {token:?}, {token_type:?}");
                }
            }
        }
    }
}
