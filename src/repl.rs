use std::io::{BufRead, Write};

use crate::gemini::{GeminiClient, GeminiClientError, GeminiModel, Result};

/// Fixed warm-up prompt sent once at startup. Its answer is printed as-is
/// and never validated beyond the call succeeding.
pub const PROBE_PROMPT: &str = "인공지능이 어떻게 작동하는지 한두 문장으로 설명해 줘.";

pub trait Chat {
    fn chat(&mut self, message: &str) -> Result<String>;
}

pub struct GeminiChat {
    client: GeminiClient,
    model: GeminiModel,
}

impl GeminiChat {
    pub fn new(client: GeminiClient, model: GeminiModel) -> Self {
        Self { client, model }
    }
    pub fn from_env(model: GeminiModel) -> Result<Self> {
        Ok(Self::new(GeminiClient::from_env()?, model))
    }
}
impl Chat for GeminiChat {
    fn chat(&mut self, message: &str) -> Result<String> {
        self.client.generate(self.model, message)
    }
}

pub struct StubChat {
    count: usize,
    responses: Vec<Result<String>>,
    requests: Vec<String>,
}

impl StubChat {
    pub fn new() -> Self {
        StubChat {
            count: 0,
            responses: Vec::new(),
            requests: Vec::new(),
        }
    }
    pub fn add_response(&mut self, response: impl Into<String>) {
        self.responses.push(Ok(response.into()));
    }
    pub fn add_error(&mut self, error: GeminiClientError) {
        self.responses.push(Err(error));
    }
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}
impl Default for StubChat {
    fn default() -> Self {
        Self::new()
    }
}

impl Chat for StubChat {
    fn chat(&mut self, message: &str) -> Result<String> {
        self.requests.push(message.to_string());
        let index = self.count;
        self.count += 1;
        match self.responses.get(index) {
            Some(response) => response.clone(),
            // Out of scripted answers: echo the question back.
            None => Ok(message.to_string()),
        }
    }
}

pub struct GeminiRepl<T: Chat, R: BufRead> {
    chat: T,
    lines: R,
}

impl<T: Chat, R: BufRead> GeminiRepl<T, R> {
    pub fn new(chat: T, lines: R) -> Self {
        GeminiRepl { chat, lines }
    }
    pub fn chat(&self) -> &T {
        &self.chat
    }

    /// The one mandatory call before the interactive phase. The caller
    /// decides what a failure means; here it is just returned.
    pub fn startup(&mut self) -> Result<String> {
        self.chat.chat(PROBE_PROMPT)
    }

    pub fn repl(&mut self) {
        loop {
            self.question_first();
            let Some(line) = self.read_line() else {
                return;
            };
            let message = line.trim();
            if Self::is_exit(message) {
                println!("프로그램을 종료합니다.");
                return;
            }
            if message.is_empty() {
                println!("질문을 입력해주세요.\n");
                continue;
            }
            // A failed turn is reported and the loop keeps going. Only the
            // exit keyword and end of input leave the loop.
            match self.chat.chat(message) {
                Ok(answer) => println!("\n답변: {}\n", answer),
                Err(e) => println!("오류가 발생했습니다: {}\n", e),
            }
        }
    }
    fn question_first(&self) {
        print!("질문: ");
        std::io::stdout().flush().unwrap();
    }
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.lines.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
    fn is_exit(message: &str) -> bool {
        message.eq_ignore_ascii_case("exit")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::gemini::GeminiClientErrorKind;

    fn repl_with(input: &str, chat: StubChat) -> GeminiRepl<StubChat, Cursor<Vec<u8>>> {
        GeminiRepl::new(chat, Cursor::new(input.as_bytes().to_vec()))
    }
    fn request_error() -> GeminiClientError {
        GeminiClientError::new(
            "Cause Error at GeminiClient::generate".to_string(),
            GeminiClientErrorKind::RequestError("connection refused".to_string()),
        )
    }

    #[test]
    fn 시작_확인_요청은_고정_프롬프트를_한_번만_보낸다() {
        let mut stub = StubChat::new();
        stub.add_response("ok");
        let mut sut = repl_with("", stub);

        let answer = sut.startup().unwrap();

        assert_eq!(answer, "ok");
        assert_eq!(sut.chat().requests(), [PROBE_PROMPT]);
    }
    #[test]
    fn 시작_확인_요청의_실패는_호출자에게_그대로_돌아간다() {
        let mut stub = StubChat::new();
        stub.add_error(request_error());
        let mut sut = repl_with("", stub);

        let result = sut.startup();

        assert_eq!(result, Err(request_error()));
        assert_eq!(sut.chat().requests(), [PROBE_PROMPT]);
    }
    #[test]
    fn 공백만_입력하면_요청을_보내지_않고_다시_묻는다() {
        let mut sut = repl_with("   \n\t\nexit\n", StubChat::new());

        sut.repl();

        assert!(sut.chat().requests().is_empty());
    }
    #[test]
    fn exit는_대소문자와_앞뒤_공백에_관계없이_종료한다() {
        for input in ["exit\n", "Exit\n", "EXIT\n", "  eXiT  \n"] {
            let mut sut = repl_with(input, StubChat::new());

            sut.repl();

            assert!(sut.chat().requests().is_empty());
        }
    }
    #[test]
    fn 질문의_앞뒤_공백은_제거되어_전송된다() {
        let mut stub = StubChat::new();
        stub.add_response("hi there");
        let mut sut = repl_with(" hello \nexit\n", stub);

        sut.repl();

        assert_eq!(sut.chat().requests(), ["hello"]);
    }
    #[test]
    fn 턴_요청이_실패해도_다음_질문을_계속_받는다() {
        let mut stub = StubChat::new();
        stub.add_error(request_error());
        stub.add_response("ok");
        let mut sut = repl_with("first\nsecond\nexit\n", stub);

        sut.repl();

        assert_eq!(sut.chat().requests(), ["first", "second"]);
    }
    #[test]
    fn 입력이_끝나면_루프를_종료한다() {
        let mut sut = repl_with("", StubChat::new());

        sut.repl();

        assert!(sut.chat().requests().is_empty());
    }
    #[test]
    fn 시작부터_종료까지_한_세션을_수행한다() {
        let mut stub = StubChat::new();
        stub.add_response("ok");
        stub.add_response("hi there");
        let mut sut = repl_with(" hello \nexit\n", stub);

        assert_eq!(sut.startup().unwrap(), "ok");
        sut.repl();

        assert_eq!(sut.chat().requests(), [PROBE_PROMPT, "hello"]);
    }
}
