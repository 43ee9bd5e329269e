use std::process;

fn main() {
    match slide_deck_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("slide-deck error: {err:#}");
            process::exit(slide_deck_cli::exit_code_for(&err));
        }
    }
}
