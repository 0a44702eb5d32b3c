//! Topic tagging by keyword lookup.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::language::Language;
use super::normalizer::normalize;

const MAX_TOPICS: usize = 3;

type TopicTable = Vec<(&'static str, HashSet<String>)>;

fn table(language: Language, entries: &[(&'static str, &[&str])]) -> TopicTable {
    entries
        .iter()
        .map(|(topic, words)| {
            let keywords = words
                .iter()
                .flat_map(|w| normalize(w, language))
                .collect();
            (*topic, keywords)
        })
        .collect()
}

static ENGLISH_TOPICS: Lazy<TopicTable> = Lazy::new(|| {
    table(
        Language::English,
        &[
            ("technology", &["technology", "software", "computer", "internet", "digital", "algorithm", "data", "ai", "robot", "device", "app"]),
            ("health", &["health", "medical", "doctor", "hospital", "disease", "patient", "medicine", "vaccine", "treatment", "nutrition"]),
            ("politics", &["government", "election", "minister", "parliament", "policy", "president", "vote", "law", "political", "party"]),
            ("economy", &["economy", "market", "finance", "bank", "inflation", "trade", "investment", "price", "budget", "business"]),
            ("sports", &["sport", "football", "match", "team", "player", "league", "tournament", "coach", "olympic", "goal"]),
            ("science", &["science", "research", "scientist", "experiment", "physics", "biology", "chemistry", "laboratory", "study", "discovery"]),
            ("education", &["education", "school", "student", "teacher", "university", "learning", "curriculum", "classroom", "exam", "teaching"]),
            ("environment", &["environment", "climate", "pollution", "energy", "renewable", "solar", "emissions", "wildlife", "sustainability", "recycling"]),
        ],
    )
});

static ARABIC_TOPICS: Lazy<TopicTable> = Lazy::new(|| {
    table(
        Language::Arabic,
        &[
            ("technology", &["تقنية", "التقنية", "تكنولوجيا", "التكنولوجيا", "برمجيات", "حاسوب", "الحاسوب", "الإنترنت", "رقمي", "الرقمية", "الذكاء", "تطبيق"]),
            ("health", &["صحة", "الصحة", "طبيب", "الطبيب", "مستشفى", "المستشفى", "مرض", "المرض", "مريض", "علاج", "العلاج", "دواء", "لقاح"]),
            ("politics", &["حكومة", "الحكومة", "انتخابات", "الانتخابات", "وزير", "الوزير", "برلمان", "البرلمان", "رئيس", "الرئيس", "سياسة", "السياسة", "قانون"]),
            ("economy", &["اقتصاد", "الاقتصاد", "سوق", "السوق", "مالية", "بنك", "البنك", "التضخم", "تجارة", "التجارة", "استثمار", "الاستثمار", "ميزانية"]),
            ("sports", &["رياضة", "الرياضة", "كرة", "مباراة", "المباراة", "فريق", "الفريق", "لاعب", "اللاعب", "بطولة", "البطولة", "مدرب"]),
            ("science", &["علم", "العلم", "علوم", "العلوم", "بحث", "البحث", "باحث", "تجربة", "التجربة", "فيزياء", "الفيزياء", "كيمياء", "اكتشاف"]),
            ("education", &["تعليم", "التعليم", "مدرسة", "المدرسة", "المدارس", "طالب", "الطالب", "الطلاب", "معلم", "المعلم", "المعلمون", "جامعة", "الجامعة", "والجامعات", "الجامعات"]),
            ("environment", &["بيئة", "البيئة", "مناخ", "المناخ", "تلوث", "التلوث", "طاقة", "الطاقة", "المتجددة", "انبعاثات", "الشمسية"]),
        ],
    )
});

/// Topics whose keywords occur in the text, most hits first, at most three.
pub fn detect_topics(text: &str, language: Language) -> Vec<String> {
    let topics: &TopicTable = match language {
        Language::English => &ENGLISH_TOPICS,
        Language::Arabic => &ARABIC_TOPICS,
    };
    let tokens = normalize(text, language);

    let mut hits: Vec<(usize, &str)> = topics
        .iter()
        .map(|(topic, keywords)| {
            let count = tokens
                .iter()
                .filter(|t| keywords.contains(t.as_str()) || singular(t, language).map(|s| keywords.contains(s)).unwrap_or(false))
                .count();
            (count, *topic)
        })
        .filter(|(count, _)| *count > 0)
        .collect();

    // Stable: equal counts keep table order.
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.into_iter()
        .take(MAX_TOPICS)
        .map(|(_, topic)| topic.to_string())
        .collect()
}

fn singular(token: &str, language: Language) -> Option<&str> {
    match language {
        Language::English => token.strip_suffix('s').filter(|s| s.len() > 2),
        Language::Arabic => None,
    }
}
