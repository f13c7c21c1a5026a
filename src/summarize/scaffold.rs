// src/summarize/scaffold.rs
// Persona and few-shot exemplars for title generation. Data only.

use std::fmt;
use std::str::FromStr;

use crate::conversation::ChatTurn;

/// Bump when the persona or any exemplar changes
pub const SCAFFOLD_VERSION: u32 = 1;

/// Emoji prepended when the backend's answer does not start with one
pub const DEFAULT_EMOJI: &str = "💬";

/// Exemplar (question, title) pairs. Titles are emoji-prefixed, four words or fewer.
const EXEMPLARS: [(&str, &str); 7] = [
    ("Who is the president of Gabon?", "🇬🇦 President of Gabon"),
    ("Who is Julien Chaumond?", "🧑 Julien Chaumond"),
    ("what is 1 + 1?", "🔢 Simple math operation"),
    ("What are the latest news?", "📰 Latest news"),
    ("How to make a great cheesecake?", "🍰 Cheesecake recipe"),
    ("what is your favorite movie? do a short answer.", "🎥 Favorite movie"),
    (
        "Explain the concept of artificial intelligence in one sentence",
        "🤖 AI definition",
    ),
];

const PERSONA_EN: &str = "You are a summarization AI. You will never answer the user's question \
     directly; instead, summarize the user's request into a single short sentence of four words \
     or less. Always start your answer with an emoji relevant to the summary.";

const PERSONA_VI: &str = "Bạn là một AI tóm tắt văn bản. Bạn sẽ không bao giờ trả lời trực tiếp \
     câu hỏi của người dùng mà thay vào đó hãy tóm tắt yêu cầu của người dùng thành một câu ngắn \
     gồm bốn từ trở xuống. Luôn bắt đầu câu trả lời của bạn bằng biểu tượng cảm xúc có liên quan \
     đến bản tóm tắt.";

/// Language of the persona text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleLocale {
    #[default]
    English,
    Vietnamese,
}

impl FromStr for TitleLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(TitleLocale::English),
            "vi" | "vietnamese" => Ok(TitleLocale::Vietnamese),
            other => Err(format!("unknown title locale '{}'", other)),
        }
    }
}

impl fmt::Display for TitleLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TitleLocale::English => "en",
            TitleLocale::Vietnamese => "vi",
        })
    }
}

/// Fixed conversation scaffold handed to the backend
#[derive(Debug, Clone, Copy)]
pub struct TitleScaffold {
    pub version: u32,
    pub persona: &'static str,
    pub exemplars: &'static [(&'static str, &'static str)],
}

pub const SCAFFOLD_EN: TitleScaffold = TitleScaffold {
    version: SCAFFOLD_VERSION,
    persona: PERSONA_EN,
    exemplars: &EXEMPLARS,
};

pub const SCAFFOLD_VI: TitleScaffold = TitleScaffold {
    version: SCAFFOLD_VERSION,
    persona: PERSONA_VI,
    exemplars: &EXEMPLARS,
};

impl TitleScaffold {
    pub fn for_locale(locale: TitleLocale) -> &'static TitleScaffold {
        match locale {
            TitleLocale::English => &SCAFFOLD_EN,
            TitleLocale::Vietnamese => &SCAFFOLD_VI,
        }
    }

    /// Exemplar turns followed by `prompt` as the final user turn
    pub fn turns(&self, prompt: &str) -> Vec<ChatTurn> {
        let mut turns = Vec::with_capacity(self.exemplars.len() * 2 + 1);
        for (question, title) in self.exemplars {
            turns.push(ChatTurn::user(*question));
            turns.push(ChatTurn::assistant(*title));
        }
        turns.push(ChatTurn::user(prompt));
        turns
    }
}
