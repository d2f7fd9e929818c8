use std::process::ExitCode;

use clap::Parser;

use crate::{
    gemini::{GeminiApiKey, GeminiClient, GeminiModel},
    repl::{GeminiChat, GeminiRepl},
};

#[derive(Parser)]
pub struct Gemini {}

impl Gemini {
    pub fn new() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> ExitCode {
        // A local .env is optional; the process environment wins either way.
        dotenvy::dotenv().ok();
        let key = match GeminiApiKey::from_env() {
            Ok(key) => key,
            Err(_) => {
                Self::print_key_guide();
                return ExitCode::FAILURE;
            }
        };
        let chat = GeminiChat::new(GeminiClient::new(key), GeminiModel::default());
        let stdin = std::io::stdin();
        let mut repl = GeminiRepl::new(chat, stdin.lock());
        match repl.startup() {
            Ok(answer) => println!("{}", answer),
            Err(e) => {
                // Every later turn would fail the same way, so stop here.
                println!("초기 요청 중 오류가 발생했습니다: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Self::print_init();
        repl.repl();
        ExitCode::SUCCESS
    }
    fn print_key_guide() {
        println!("오류: GEMINI_API_KEY 환경변수가 설정되어 있지 않습니다.");
        println!("- .env 파일에 GEMINI_API_KEY=your_key 를 추가하거나");
        println!("- 터미널에서 export GEMINI_API_KEY=\"your_key\" 로 설정한 뒤 다시 실행하세요.");
    }
    fn print_init() {
        println!("\n=== Gemini AI 대화 시작 ===");
        println!("질문을 입력하세요. 종료하려면 'exit'를 입력하세요.\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli는_인자나_서브커맨드_없이_실행된다() {
        assert!(Gemini::try_parse_from(["term-gemini"]).is_ok());
    }
    #[test]
    fn cli는_알_수_없는_인자를_거부한다() {
        assert!(Gemini::try_parse_from(["term-gemini", "--model", "pro"]).is_err());
    }
}
