//! Log redaction for user demographics.
//!
//! Formatted log lines pass through [`RedactingMakeWriter`] before reaching the
//! sink. Patterns masked:
//! - `age=NN` and `age: NN`
//! - `gender=X` and `gender: X`
//! - saved assessment ids (`assessment 17`, `assessment #17`)
//!
//! Symptom lists and predicted diseases are never logged at `info` or above;
//! redaction here is a fallback for fields that slip into formatted strings.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Lines longer than this are cut before scanning.
const MAX_LINE_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Rules {
    set: RegexSet,
    rules: Vec<Rule>,
}

static RULES: OnceLock<Rules> = OnceLock::new();

fn rules() -> &'static Rules {
    RULES.get_or_init(|| {
        let table: [(&str, &str); 3] = [
            (r"(?i)\b(age)\s*[=:]\s*\d+", "$1=[REDACTED]"),
            (r"(?i)\b(gender)\s*[=:]\s*[A-Za-z]+", "$1=[REDACTED]"),
            (r"(?i)\b(assessment)\s+#?\d+", "$1 [REDACTED-ID]"),
        ];
        let set = RegexSet::new(table.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = table
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        Rules { set, rules }
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Mask demographic fields and assessment ids in `input`.
#[must_use]
pub fn redact(input: &str) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, MAX_LINE_BYTES);
    let rules = rules();

    let mut out = prefix.to_string();
    for idx in rules.set.matches(prefix).into_iter() {
        let rule = &rules.rules[idx];
        out = rule.regex.replace_all(&out, rule.replacement).into_owned();
    }
    if truncated {
        out.push_str(" [TRUNCATED]\n");
    }
    out
}

/// Wraps a `MakeWriter` so every formatted line is passed through [`redact`].
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn write_complete_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.inner
                .write_all(redact(&String::from_utf8_lossy(&line)).as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.write_complete_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.write_complete_lines()?;
        if !self.buffer.is_empty() {
            let rest = String::from_utf8_lossy(&self.buffer).into_owned();
            self.inner.write_all(redact(&rest).as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_redact_demographics() {
        let out = redact("user age=40 gender=M submitted");
        assert_eq!(out, "user age=[REDACTED] gender=[REDACTED] submitted");

        let out = redact("Age: 67, Gender: female");
        assert!(!out.contains("67"));
        assert!(!out.contains("female"));
    }

    #[test]
    fn test_redact_assessment_id() {
        let out = redact("Saved assessment 17 to storage");
        assert_eq!(out, "Saved assessment [REDACTED-ID] to storage");
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Trained decision tree on 8 rows (depth 3)";
        assert_eq!(redact(line), line);
    }

    #[test]
    fn test_truncates_long_lines() {
        let long = "x".repeat(MAX_LINE_BYTES + 10);
        assert!(redact(&long).ends_with("[TRUNCATED]\n"));
    }

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("Lock failed").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Sink {
        type Writer = Sink;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_writer_redacts_split_writes() {
        let sink = Sink::default();
        let make = RedactingMakeWriter::new(sink.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"request ag").expect("Should write");
            writer.write_all(b"e=52 done\n").expect("Should write");
        }
        let written = String::from_utf8(sink.0.lock().expect("Lock failed").clone()).expect("utf8");
        assert_eq!(written, "request age=[REDACTED] done\n");
    }
}
