use crate::config::EventInfo;
use crate::menu::Section;
use teloxide::utils::html::{bold, escape};

const DIVIDER: &str = "➿➿➿➿➿➿➿➿➿➿➿➿";

pub fn welcome_text(event: &EventInfo) -> String {
    format!(
        r#"🤖 {title}

Это был долгий путь, не так ли?
Присаживайся, ты как раз успел к самому началу, дорогой друг))

{DIVIDER}

{highlights}
• 🎁 Подарки к каждому билету!
• 🎭 Конкурсное косплей-дефиле с крутыми призами!
• 💎 Маркет с разнообразным мерчом по лору от художников!
• 📸 Фото-зоны
• 🌊 Комфортная лаундж-зона с выходом к заливу
• 🎮 Интерактивные стенды с мини-играми и призами!
• 🎵 Концерт и автограф-сессия с группой Восход!
• 🍹 Обновлённый мини-бар с напитками прямо из сезонов!
• 🍱 Вкуснейший японский стрит-фуд

{date_label} {date}
{place_label} {location}
{address_label} {address}

{DIVIDER}

Используйте меню для навигации 👇"#,
        title = bold(&escape(&format!("Добро пожаловать на {}!", event.name))),
        highlights = bold("НА МЕРОПРИЯТИИ ВАС ОЖИДАЮТ:"),
        date_label = bold("Дата:"),
        date = escape(&event.date),
        place_label = bold("Место:"),
        location = escape(&event.location),
        address_label = bold("Адрес:"),
        address = escape(&event.address),
    )
}

pub const AI_ASSISTANT_TEXT: &str = r#"🤖 <b>AI-ассистент П.Е.Р.С.И.К.</b>

💡 <b>Задайте любой вопрос о фестивале!</b>

Я могу помочь вам:
• Узнать подробности о мероприятии
• Получить информацию о билетах
• Разобраться с правилами
• Найти нужные контакты
• Ответить на частые вопросы

<i>Просто напишите свой вопрос в чат</i>"#;

pub fn section_text(section: Section) -> &'static str {
    match section {
        Section::Tickets => {
            r#"🎫 <b>Билеты</b>

Билеты продаются онлайн, к каждому билету полагается подарок.
Перед покупкой обязательно ознакомьтесь с правилами посещения.

Электронный билет достаточно показать на входе с телефона."#
        }
        Section::Schedule => {
            r#"📅 <b>Расписание</b>

Подробное расписание сцены, конкурсов и автограф-сессий публикуется в нашем канале ближе к дате фестиваля.

Следите за анонсами, чтобы ничего не пропустить!"#
        }
        Section::Cosplay => {
            r#"🎭 <b>Косплей-шоу</b>

Конкурсное дефиле проходит в двух номинациях: соло и группы.
Регистрация открыта до объявления финального списка участников.

Перед подачей заявки прочитайте правила конкурса."#
        }
        Section::Market => {
            r#"💎 <b>Маркет</b>

Художники и мастера, приглашаем вас в маркет фестиваля!
Заполните заявку, и организаторы свяжутся с вами после рассмотрения."#
        }
        Section::Faq => {
            r#"❓ <b>Частые вопросы</b>

<b>Есть ли возрастные ограничения?</b>
Гостям младше 14 лет нужно прийти в сопровождении взрослого.

<b>Можно ли прийти в костюме?</b>
Конечно! Ознакомьтесь с правилами посещения: реквизит не должен быть опасным.

<b>Можно ли вернуть билет?</b>
Возврат возможен по правилам площадки продажи билетов.

<b>Будет ли еда?</b>
Да, работают фудкорт и мини-бар."#
        }
        Section::Social => {
            r#"📱 <b>Мы в соцсетях</b>

Новости, анонсы и фотоотчёты публикуются в наших группах. Подписывайтесь!"#
        }
        Section::Support => {
            r#"🛟 <b>Поддержка</b>

Возникли вопросы или проблемы? Напишите организатору напрямую, мы постараемся ответить как можно скорее."#
        }
        Section::AiAssistant => AI_ASSISTANT_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> EventInfo {
        EventInfo {
            name: "Fest <2025>".to_string(),
            date: "1 июня".to_string(),
            location: "Набережная".to_string(),
            address: "ул. Морская, 1".to_string(),
        }
    }

    #[test]
    fn welcome_escapes_event_fields() {
        let text = welcome_text(&event());
        assert!(text.contains("<b>Добро пожаловать на Fest &lt;2025&gt;!</b>"));
        assert!(text.contains("<b>Дата:</b> 1 июня"));
        assert!(text.contains("<b>Адрес:</b> ул. Морская, 1"));
    }

    #[test]
    fn every_section_has_text() {
        for section in Section::ALL {
            assert!(!section_text(section).is_empty(), "{:?}", section);
        }
    }
}
