/// Жадно переносит текст по словам так, чтобы ширина строки не превышала `max_width`.
///
/// `measure` возвращает ширину строки в пикселях. Явные переводы строк
/// сохраняются. Слово шире `max_width` остается на отдельной строке.
pub fn wrap_lines<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if measure(&candidate) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // моноширинная метрика: 10 пикселей на символ
    fn mono(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    #[test]
    fn test_short_text_single_line() {
        assert_eq!(wrap_lines("hola mundo", 200, mono), vec!["hola mundo"]);
    }

    #[test]
    fn test_wraps_when_width_exceeds_bound() {
        // "uno dos" = 70, "uno dos tres" = 120 > 100, "tres cuatro" = 110 > 100
        let lines = wrap_lines("uno dos tres cuatro", 100, mono);
        assert_eq!(lines, vec!["uno dos", "tres", "cuatro"]);

        let lines = wrap_lines("uno dos tres cuatro", 110, mono);
        assert_eq!(lines, vec!["uno dos", "tres cuatro"]);
    }

    #[test]
    fn test_exact_width_fits() {
        assert_eq!(wrap_lines("abcd efgh", 90, mono), vec!["abcd efgh"]);
    }

    #[test]
    fn test_long_word_stays_alone() {
        let lines = wrap_lines("a supercalifragilistico b", 50, mono);
        assert_eq!(lines, vec!["a", "supercalifragilistico", "b"]);
    }

    #[test]
    fn test_explicit_newlines_are_kept() {
        let lines = wrap_lines("¡SUSCRÍBETE!\nDale like", 1000, mono);
        assert_eq!(lines, vec!["¡SUSCRÍBETE!", "Dale like"]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(wrap_lines("  \n\t ", 100, mono).is_empty());
    }
}
