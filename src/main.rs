use std::process::ExitCode;

use term_gemini::cli::Gemini;

fn main() -> ExitCode {
    Gemini::new().run()
}
