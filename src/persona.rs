//! Fixed wording of the assistant
//!
//! GreenBot speaks German with an informal tone. Every line the bot can say
//! on its own, and both outbound instruction templates, live here.

/// First bot message of every session, asks for the user's name
pub const GREETING: &str =
    "Hallo! 🌱 Ich bin GreenBot, dein Nachhaltigkeits-Assistent für den Büroalltag. Wie heißt du denn?";

/// Second staged reply after the name has been captured
pub const CAPABILITIES: &str = "Du kannst mich zu allem rund um Nachhaltigkeit im Büro fragen - von Reisen über Meetings bis hin zu Büromaterial! 🌱";

/// The service answered but reported an error in-band
pub const SERVICE_ERROR_APOLOGY: &str =
    "Entschuldigung, ich habe gerade technische Probleme. Kannst du es nochmal versuchen? 🌱";

/// The remote call could not be completed at all
pub const TRANSPORT_APOLOGY: &str =
    "Ups, da ist etwas schiefgelaufen. Versuche es gerne nochmal! 🌱";

/// The answer task died before producing anything
pub const PROCESSING_APOLOGY: &str =
    "Entschuldigung, ich konnte deine Nachricht nicht verarbeiten. 😔";

/// Shown by the front-end while a request is outstanding
pub const THINKING_LABEL: &str = "Denkt grün nach... 🌱";

pub const TITLE: &str = "GreenBot";

/// Topics offered as quick replies once the user's name is known
pub const QUICK_REPLIES: [&str; 6] = [
    "Nachhaltige Reise nach Berlin",
    "Umweltfreundliche Meeting-Optionen",
    "Nachhaltige Büromaterialien",
    "Grüne Kantinen-Tipps",
    "Energie sparen im Büro",
    "Papierlos arbeiten",
];

const WELCOME_TEMPLATE_COUNT: usize = 4;

/// Render one of the personalized welcome lines.
///
/// `variant` is taken modulo the number of templates so callers can pass any
/// random number.
pub fn welcome_line(variant: usize, name: &str) -> String {
    match variant % WELCOME_TEMPLATE_COUNT {
        0 => format!(
            "Schön dich kennenzulernen, {name}! 🌿 Ich helfe dir gerne dabei, deinen Arbeitsalltag nachhaltiger zu gestalten."
        ),
        1 => format!(
            "Hallo {name}! 🌱 Freut mich sehr! Lass uns gemeinsam für mehr Nachhaltigkeit im Büro sorgen."
        ),
        2 => format!(
            "Willkommen {name}! 🌍 Wie kann ich dir heute bei nachhaltigen Entscheidungen helfen?"
        ),
        _ => format!("Hi {name}! 🌿 Schön, dass du da bist! Bereit für grüne Tipps?"),
    }
}

pub fn welcome_template_count() -> usize {
    WELCOME_TEMPLATE_COUNT
}

/// Instruction asking for a warm, personal answer that may use the name
pub fn personal_instruction(name: &str, question: &str) -> String {
    format!(
        "Der Nutzer heißt {name}. Antworte freundlich und persönlich zu Nachhaltigkeit. Frage: {question}"
    )
}

/// Instruction asking for a friendly answer that must not use the name
pub fn impersonal_instruction(question: &str) -> String {
    format!(
        "Beantworte die Nachhaltigkeitsfrage freundlich und konkret. Verwende NICHT den Namen des Nutzers. Frage: {question}"
    )
}

pub fn input_placeholder(name_known: bool) -> &'static str {
    if name_known {
        "Frage mich zu Nachhaltigkeit im Büro..."
    } else {
        "Gib deinen Namen ein..."
    }
}

pub fn subtitle(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Nachhaltigkeits-Beratung für {name}"),
        None => "Dein Nachhaltigkeits-Assistent".to_string(),
    }
}
