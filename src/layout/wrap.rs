//! Greedy word wrapping with a character-level fallback.

/// Measures the rendered advance width of a run of text, in pixels.
///
/// Takes `&mut self` because real measurers shape through cached font contexts.
pub trait TextMeasure {
    /// Width of `text` when rendered on a single line.
    fn measure(&mut self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> f32,
{
    fn measure(&mut self, text: &str) -> f32 {
        self(text)
    }
}

/// Wrap one caption line so every produced line measures at most `max_width`.
///
/// Words are separated by single spaces and accumulated greedily. A word that is too wide
/// on its own is broken between characters with the same greedy rule. The only line that can
/// exceed `max_width` is a single character that is itself wider than the limit.
///
/// ASCII whitespace (tab, line feed, form feed, carriage return) is drawn as a plain space,
/// so a wrapped line always occupies exactly one row.
///
/// Always returns at least one line; an empty input yields one empty line.
pub fn wrap_line<M>(text: &str, max_width: f32, measure: &mut M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    if text.is_empty() {
        return vec![String::new()];
    }
    flatten_whitespace(text)
        .split(' ')
        .fold(Wrapped::default(), |acc, word| {
            acc.push_word(word, max_width, measure)
        })
        .finish()
}

/// Wrap every caption line and flatten the result, preserving order.
pub fn wrap_lines<S, M>(lines: &[S], max_width: f32, measure: &mut M) -> Vec<String>
where
    S: AsRef<str>,
    M: TextMeasure + ?Sized,
{
    lines
        .iter()
        .flat_map(|line| wrap_line(line.as_ref(), max_width, measure))
        .collect()
}

fn flatten_whitespace(text: &str) -> std::borrow::Cow<'_, str> {
    const BREAKING: [char; 4] = ['\t', '\n', '\x0C', '\r'];
    if text.contains(BREAKING) {
        text.replace(BREAKING, " ").into()
    } else {
        text.into()
    }
}

#[derive(Default)]
struct Wrapped {
    lines: Vec<String>,
    current: String,
}

impl Wrapped {
    fn push_word<M>(mut self, word: &str, max_width: f32, measure: &mut M) -> Self
    where
        M: TextMeasure + ?Sized,
    {
        let candidate = if self.current.is_empty() {
            word.to_owned()
        } else {
            format!("{} {word}", self.current)
        };
        if measure.measure(&candidate) <= max_width {
            self.current = candidate;
            return self;
        }

        self.flush();
        if measure.measure(word) > max_width {
            self.push_chars(word, max_width, measure);
        } else {
            self.current = word.to_owned();
        }
        self
    }

    fn push_chars<M>(&mut self, word: &str, max_width: f32, measure: &mut M)
    where
        M: TextMeasure + ?Sized,
    {
        let mut chunk = String::new();
        for ch in word.chars() {
            let mut candidate = chunk.clone();
            candidate.push(ch);
            if measure.measure(&candidate) <= max_width {
                chunk = candidate;
            } else {
                if !chunk.is_empty() {
                    self.lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(ch);
            }
        }
        self.current = chunk;
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
