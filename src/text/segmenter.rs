/// Максимальная длина сегмента, отправляемого в синтез речи (в символах)
pub const DEFAULT_SEGMENT_CHARS: usize = 300;

/// Длина описания видео по умолчанию (в символах)
pub const DEFAULT_DESCRIPTION_CHARS: usize = 200;

/// Разбивает текст на предложения по точкам.
///
/// Каждое предложение обрезается по краям и снова получает точку в конце;
/// пустые куски (например, после "..." или в конце текста) отбрасываются.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{}.", s))
        .collect()
}

/// Жадно группирует предложения в сегменты длиной меньше `max_chars` символов.
///
/// Предложение добавляется к текущему сегменту через пробел, пока суммарная
/// длина строго меньше `max_chars`; иначе сегмент закрывается. Предложение
/// длиннее лимита образует отдельный сегмент и не режется.
pub fn group_sentences<S: AsRef<str>>(sentences: &[S], max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let sentence = sentence.as_ref();
        let sentence_len = sentence.chars().count();

        if current_len + sentence_len < max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        } else {
            push_trimmed(&mut segments, &current);
            current = sentence.to_string();
            current_len = sentence_len;
        }
    }
    push_trimmed(&mut segments, &current);

    segments
}

fn push_trimmed(segments: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

/// Разбивает текст на сегменты для синтеза речи
pub fn segment_text(text: &str) -> Vec<String> {
    segment_text_with_limit(text, DEFAULT_SEGMENT_CHARS)
}

/// Разбивает текст на сегменты с заданным лимитом длины
pub fn segment_text_with_limit(text: &str, max_chars: usize) -> Vec<String> {
    group_sentences(&split_sentences(text), max_chars)
}

/// Возвращает первые `max_chars` символов текста (для описания видео)
pub fn description_excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
