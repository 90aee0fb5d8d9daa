/// # readline: Editing a Single Line
///
/// This example reads one line with the default verifiers and prints it.
/// Enter accepts the line, escape or control-c cancel. Set `RUST_LOG=debug`
/// to see the editor's log on standard error.
use ttyline::err::report;
use ttyline::LineEditor;
use tracing_subscriber::EnvFilter;

fn run() -> std::io::Result<()> {
    let mut editor = LineEditor::new("O'really?");
    match editor.read("")? {
        Some(line) => println!("You gave the line: \"{}\"", line),
        None => println!("Aborted..."),
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
