// Simple REPL that echoes what you type with a "typed: " prefix.
// Run with: cargo run --example repl

use keyline::terminals::StdioTerminal;
use keyline::EditorBuilder;

fn main() {
    env_logger::init();

    println!("Simple REPL - Type something and press Enter");
    println!("Type 'exit' or press Ctrl-D to quit");
    println!("Features: line editing, history (up/down), word navigation (Alt+b/f)");
    println!("Ctrl-C terminates immediately");
    println!();

    let history_path = std::env::temp_dir().join("keyline-demo.history");
    let mut editor = EditorBuilder::new()
        .buffer_capacity(1024)
        .history_capacity(50)
        .history_file(&history_path)
        .build(StdioTerminal::new())
        .expect("failed to initialize editor");

    loop {
        match editor.read("keyline>") {
            Ok(line) => {
                if line == "exit" {
                    println!("\nGoodbye!");
                    break;
                } else if !line.is_empty() {
                    println!("typed: {line}");
                }
            }
            Err(e) => {
                eprintln!("\nerror reading input: {e}");
                break;
            }
        }
    }
}
