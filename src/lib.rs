pub mod cli;
pub mod gemini;
pub mod repl;
