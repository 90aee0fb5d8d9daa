/// # keys: Visualizing Key Tokens
///
/// This example puts the terminal into raw mode and prints every key as a
/// token, together with its classification and display width. Typing `q`
/// exits the program, as do control-c and control-d. Set `RUST_LOG=trace` to
/// also see the reader's log on standard error.
use std::io::Write;

use ttyline::err::report;
use ttyline::util::c_escape;
use ttyline::{confirm, sgr, KeyReader, RawMode, ReadKey, Token};
use tracing_subscriber::EnvFilter;

fn kind(token: &Token) -> &'static str {
    if token.is_color(true) {
        "color"
    } else if token.is_escape(true) {
        "escape"
    } else if token.is_control(true) {
        "control"
    } else if token.is_ascii() {
        "ascii"
    } else if token.is_unicode(true) {
        "unicode"
    } else {
        "invalid"
    }
}

fn run() -> std::io::Result<()> {
    let (rows, columns) = ttyline::terminal_size()?;
    println!(
        "{}Terminal has {} rows and {} columns, press ‹q› to quit{}",
        Token::color(&[sgr::BOLD]),
        rows,
        columns,
        Token::color(&[sgr::CLEAR])
    );

    let mut session = RawMode::acquire()?;
    let mut reader = KeyReader::stdin();
    let mut stdout = std::io::stdout();

    loop {
        let token = reader.read_key()?;
        write!(
            stdout,
            "{:<10} {:<24} {:<8} width {}\r\n",
            c_escape(token.as_bytes()),
            format!("{:?}", token),
            kind(&token),
            token.display_width()
        )?;
        stdout.flush()?;

        if token == b'q' || token == Token::ABORT || token == Token::EOT {
            break;
        }
    }

    session.release()?;

    if confirm("Show a circled number?")? == Some(true) {
        println!("{}", Token::numeric(7));
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        report(&err);
    }
}
