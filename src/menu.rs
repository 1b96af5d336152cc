use crate::config::{EventInfo, Links};
use crate::content;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Tickets,
    Schedule,
    Cosplay,
    Market,
    Faq,
    Social,
    Support,
    AiAssistant,
}

impl Section {
    // Keyboard order, two buttons per row.
    pub const ALL: [Section; 8] = [
        Section::Tickets,
        Section::Schedule,
        Section::Cosplay,
        Section::Market,
        Section::Faq,
        Section::Social,
        Section::Support,
        Section::AiAssistant,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Tickets => "🎫 Купить билет",
            Section::Schedule => "📅 Расписание",
            Section::Cosplay => "🎭 Косплей-шоу",
            Section::Market => "💎 Маркет",
            Section::Faq => "❓ FAQ",
            Section::Social => "📱 Соцсети",
            Section::Support => "🛟 Поддержка",
            Section::AiAssistant => "🤖 AI-ассистент",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(text: &str) -> Option<Self> {
        let section = match text {
            "🎫 Купить билет" => Section::Tickets,
            "📅 Расписание" => Section::Schedule,
            "🎭 Косплей-шоу" => Section::Cosplay,
            "💎 Маркет" => Section::Market,
            "❓ FAQ" => Section::Faq,
            "📱 Соцсети" => Section::Social,
            "🛟 Поддержка" => Section::Support,
            "🤖 AI-ассистент" => Section::AiAssistant,
            _ => return None,
        };
        Some(section)
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub markup: Option<ReplyMarkup>,
}

pub fn create_main_menu() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = Section::ALL
        .chunks(2)
        .map(|row| row.iter().map(|s| KeyboardButton::new(s.label())).collect())
        .collect();

    KeyboardMarkup::new(rows).resize_keyboard(true)
}

pub fn section_keyboard(section: Section, links: &Links) -> Option<InlineKeyboardMarkup> {
    let link = |text: &str, url: &reqwest::Url| InlineKeyboardButton::url(text, url.clone());

    let rows = match section {
        Section::Tickets => vec![
            vec![link("🎫 Купить билет", &links.tickets)],
            vec![link("📜 Правила посещения", &links.visit_rules)],
        ],
        Section::Schedule => vec![vec![link("📅 Полное расписание", &links.schedule)]],
        Section::Cosplay => vec![
            vec![
                link("👤 Соло", &links.cosplay_solo),
                link("👥 Группа", &links.cosplay_group),
            ],
            vec![link("📋 Правила", &links.cosplay_rules)],
        ],
        Section::Market => vec![
            vec![link("📝 Подать заявку", &links.market_apply)],
            vec![link("ℹ️ Подробнее", &links.market_info)],
        ],
        Section::Social => vec![
            vec![link("ВКонтакте", &links.vk_group)],
            vec![link("Telegram", &links.telegram_channel)],
        ],
        Section::Support => vec![
            vec![link("✍️ Написать организатору", &links.organizer)],
            vec![link("📋 Правила чата", &links.chat_rules)],
        ],
        Section::Faq | Section::AiAssistant => return None,
    };

    Some(InlineKeyboardMarkup::new(rows))
}

#[derive(Debug, Clone)]
pub struct Menu {
    event: EventInfo,
    links: Links,
}

impl Menu {
    pub fn new(event: EventInfo, links: Links) -> Self {
        Self { event, links }
    }

    pub fn welcome(&self) -> Reply {
        Reply {
            text: content::welcome_text(&self.event),
            markup: Some(ReplyMarkup::Keyboard(create_main_menu())),
        }
    }

    pub fn resolve(&self, text: Option<&str>) -> Option<Reply> {
        let section = Section::from_label(text?)?;
        Some(self.section_reply(section))
    }

    pub fn section_reply(&self, section: Section) -> Reply {
        if section == Section::AiAssistant {
            return Reply {
                text: content::AI_ASSISTANT_TEXT.to_string(),
                markup: None,
            };
        }

        Reply {
            text: content::section_text(section).to_string(),
            markup: section_keyboard(section, &self.links).map(ReplyMarkup::InlineKeyboard),
        }
    }
}
