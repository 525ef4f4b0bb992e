//! Reply text tables.

use crate::topic::Topic;

/// A section of the companion app's practice library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    /// "Практики" → "Основы CBT"
    CbtBasics,
    /// "Практики" → "Модули по состояниям"
    ConditionModules,
    /// "Практики" → "Техники терапии"
    TherapyTechniques,
    /// "Практики" root
    Practices,
}

impl ContentCategory {
    /// Library section recommended for a topic.
    pub fn for_topic(topic: Topic) -> Option<Self> {
        match topic {
            Topic::Anxiety | Topic::Sleep => Some(ContentCategory::ConditionModules),
            Topic::Depression => Some(ContentCategory::CbtBasics),
            Topic::Work => Some(ContentCategory::TherapyTechniques),
            Topic::Relationships | Topic::SelfEsteem => Some(ContentCategory::Practices),
            Topic::Health => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentCategory::CbtBasics => "cbt_basics",
            ContentCategory::ConditionModules => "condition_modules",
            ContentCategory::TherapyTechniques => "therapy_techniques",
            ContentCategory::Practices => "practices",
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every fixed string the selector can emit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTemplates {
    // Priority/trend state machine (first entry is used).
    pub crisis: Vec<String>,
    pub high_priority: Vec<String>,
    pub improving: Vec<String>,
    pub declining: Vec<String>,
    pub open_prompt: String,

    // Rule-based generator (random choice among entries).
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
    pub follow_up: Vec<String>,
    pub rule_crisis: Vec<String>,
    pub crisis_invitation: String,
    pub improving_note: String,
    pub declining_note: String,
    pub follow_up_suffix: String,

    // Assessment intake.
    pub intake_opening: String,
    pub intake_other_answers: String,
    pub intake_negative: String,
    pub intake_positive: String,
    pub intake_focus_prefix: String,
    pub intake_default_advice: String,
    pub intake_closing: String,

    // Minimal fallbacks when a reply comes out empty or too short.
    pub fallback_crisis: String,
    pub fallback_positive: String,
    pub fallback_negative: String,
    pub fallback_neutral: String,
}

impl ResponseTemplates {
    /// One-sentence guidance appended to state-machine replies.
    pub fn topic_guidance(&self, topic: Topic) -> Option<&'static str> {
        match topic {
            Topic::Work => Some(
                "Рабочий стресс может быть очень тяжелым. Давайте обсудим техники управления стрессом.",
            ),
            Topic::Relationships => Some(
                "Отношения с близкими могут вызывать сильные эмоции. Расскажите подробнее.",
            ),
            Topic::Anxiety => Some(
                "Тревога - это нормальная реакция. Есть техники, которые могут помочь снизить её.",
            ),
            Topic::Depression => Some(
                "Депрессия - серьезное состояние, и важно работать над её преодолением.",
            ),
            Topic::Sleep => Some(
                "Проблемы со сном могут влиять на все аспекты жизни. Давайте обсудим это.",
            ),
            Topic::Health | Topic::SelfEsteem => None,
        }
    }

    /// Empathy plus library pointer appended to negative rule-based replies.
    pub fn topic_elaboration(&self, topic: Topic) -> Option<&'static str> {
        match topic {
            Topic::Work => Some(
                "Рабочий стресс действительно может быть очень тяжелым и выматывающим. Я понимаю, как это может давить. Есть техники, которые помогают справляться с такими ситуациями - посмотри в разделе 'Практики' → 'Техники терапии', там найдешь упражнения по управлению стрессом.",
            ),
            Topic::Relationships => Some(
                "Отношения с близкими людьми действительно могут вызывать очень сильные и противоречивые эмоции. Это нормально. Расскажи, что именно происходит? А пока можешь посмотреть техники для работы с эмоциями в разделе 'Практики'.",
            ),
            Topic::Anxiety => Some(
                "Тревога - это нормальная реакция, но когда она становится слишком сильной, с ней нужно работать. Ты не один в этом. В разделе 'Практики' → 'Модули по состояниям' есть специальные упражнения для работы с тревогой, которые могут помочь.",
            ),
            Topic::Depression => Some(
                "Депрессия - это серьезное состояние, но важно помнить, что с ней можно работать и становится лучше. Я вижу, что тебе тяжело. В разделе 'Практики' есть модули, которые помогут справиться с этим. Начни с основ CBT - это может дать хорошие результаты.",
            ),
            Topic::Sleep => Some(
                "Проблемы со сном действительно могут влиять на все аспекты жизни - настроение, энергию, концентрацию. Это серьезная проблема. Давай обсудим, что происходит. А еще посмотри в 'Практики' → 'Модули по состояниям' - там есть техники для улучшения сна.",
            ),
            Topic::SelfEsteem => Some(
                "Низкая самооценка может сильно влиять на нашу жизнь. Важно понимать, что ты достоин хорошего отношения, в том числе и к себе. Давай обсудим это подробнее. В разделе 'Практики' есть материалы, которые могут помочь с этим.",
            ),
            Topic::Health => None,
        }
    }

    /// Library recommendation for an assessment intake.
    pub fn intake_advice(&self, topic: Option<Topic>) -> &str {
        match topic {
            Some(Topic::Anxiety) => {
                "Если ты чувствуешь тревогу, рекомендую пройти курс в разделе 'Практики' → 'Модули по состояниям'. Там есть специальные техники для снижения тревоги."
            }
            Some(Topic::Depression) => {
                "Если тебе тяжело, важно знать, что это временно. Начни с основ CBT в разделе 'Практики' → 'Основы CBT' - это поможет справиться с депрессией."
            }
            Some(Topic::Sleep) => {
                "Проблемы со сном могут влиять на все аспекты жизни. Посмотри 'Практики' → 'Модули по состояниям' для техник улучшения сна."
            }
            _ => self.intake_default_advice.as_str(),
        }
    }
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            crisis: strings(&[
                "Я очень обеспокоен тем, что вы сейчас чувствуете. Важно знать, что помощь доступна, и вы не одни.",
                "Понимаю, что вам сейчас очень тяжело. Давайте обсудим, как мы можем помочь вам прямо сейчас.",
            ]),
            high_priority: strings(&[
                "Я вижу, что вам сейчас непросто. Это нормально просить о помощи, и я здесь, чтобы поддержать вас.",
                "Ваши чувства важны. Давайте вместе разберемся, что можно сделать, чтобы улучшить ситуацию.",
            ]),
            improving: strings(&[
                "Замечаю, что у вас становится лучше. Это отличный прогресс! Что помогает вам чувствовать себя лучше?",
                "Приятно видеть позитивные изменения. Продолжайте в том же духе!",
            ]),
            declining: strings(&[
                "Я замечаю, что вам становится тяжелее. Это важный момент для обсуждения. Расскажите, что изменилось?",
                "Понимаю, что ситуация усложняется. Давайте поговорим о том, как мы можем помочь.",
            ]),
            open_prompt: "Расскажи мне больше о том, что происходит.".to_string(),

            positive: strings(&[
                "Отлично! Это здорово слышать. Расскажи мне, что помогло тебе почувствовать себя лучше?",
                "Рад это слышать! Что происходит в твоей жизни, что дарит тебе такие хорошие эмоции?",
                "Прекрасно! Вижу, что у тебя всё складывается хорошо. Хочешь поделиться, чем именно?",
                "Это замечательно! Расскажи больше о том, что вызывает у тебя такие позитивные эмоции.",
            ]),
            negative: strings(&[
                "Понимаю, что тебе непросто. Ты можешь рассказать мне подробнее, что именно тебя беспокоит?",
                "Я здесь, чтобы выслушать и помочь. Что происходит? Что именно вызывает у тебя такие чувства?",
                "Важно, что ты делишься своими переживаниями. Расскажи мне больше - что случилось?",
                "Вижу, что тебе тяжело. Давай разберемся вместе. Что именно вызывает у тебя негативные эмоции?",
            ]),
            neutral: strings(&[
                "Расскажи мне, как дела? Как ты себя чувствуешь сегодня?",
                "Привет! Как настроение? Что происходит в твоей жизни?",
                "Здравствуй! Расскажи, как проходит твой день? Что на душе?",
                "Давай начнем наш разговор. Как ты себя чувствуешь? Что тебя беспокоит или радует?",
            ]),
            follow_up: strings(&[
                "Расскажи мне больше об этом.",
                "Это интересно. Продолжай.",
                "Я слушаю. Что еще ты хочешь сказать?",
                "Понятно. А что ты об этом думаешь?",
            ]),
            rule_crisis: strings(&[
                "Я понимаю, что ты переживаешь очень трудные времена. Важно помнить, что помощь доступна.",
                "Твои чувства важны, и я здесь, чтобы помочь. Давай обсудим, что происходит.",
                "Я вижу, что тебе нужна поддержка. Ты не один. Давай поговорим о том, как помочь тебе сейчас.",
            ]),
            crisis_invitation: "Хочешь поговорить о том, что тебя беспокоит?".to_string(),
            improving_note: "Замечаю, что у тебя становится лучше. Продолжай в том же духе!"
                .to_string(),
            declining_note: "Я замечаю, что тебе становится тяжелее. Это важно обсудить."
                .to_string(),
            follow_up_suffix: "Это важная тема для обсуждения.".to_string(),

            intake_opening: "Спасибо за твои ответы! Я внимательно их изучил.".to_string(),
            intake_other_answers: "Вижу, что ты выбрал 'Другое' в некоторых вопросах. Это интересно! Давай обсудим это подробнее в нашем разговоре - я задам несколько уточняющих вопросов.".to_string(),
            intake_negative: "Я вижу, что тебе сейчас непросто. Это нормально просить о помощи, и ты уже сделал важный шаг.".to_string(),
            intake_positive: "Приятно видеть, что ты в хорошем настроении.".to_string(),
            intake_focus_prefix: "На основе твоих ответов я вижу, что стоит обратить внимание на:"
                .to_string(),
            intake_default_advice: "Рекомендую изучить материалы в разделе 'Практики' - там много полезных техник для работы над собой.".to_string(),
            intake_closing: "Теперь давай начнем наш разговор - я готов задать уточняющие вопросы и составить для тебя индивидуальный план работы. Что бы ты хотел обсудить в первую очередь?".to_string(),

            fallback_crisis: "Я понимаю, что тебе сейчас трудно. Я здесь, чтобы помочь.".to_string(),
            fallback_positive: "Отлично! Расскажи мне больше об этом.".to_string(),
            fallback_negative: "Понимаю. Расскажи подробнее, что тебя беспокоит?".to_string(),
            fallback_neutral: "Понял тебя. Что еще ты хотел бы обсудить?".to_string(),
        }
    }
}
