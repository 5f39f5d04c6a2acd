//! Line templates for logger sinks.
use chrono::{DateTime, Local};
use log::Record;
use std::io::{self, Write};

/// Template used for the `log.log` sink of every run.
pub const DEFAULT_FORMAT: &str = "{time} -- {level} -- {message}";

/// Rendering of `{time}`: local time with microseconds and UTC offset.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Time,
    Level,
    Message,
    Target,
    File,
    Line,
}

/// A parsed line template.
///
/// Recognized placeholders are `{time}`, `{level}`, `{message}`, `{target}`,
/// `{file}` and `{line}`. Any other text, including unknown placeholders, is
/// copied as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    template: String,
    segments: Vec<Segment>,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT)
    }
}

impl LineFormat {
    /// Parses a template.
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = match after.find('}') {
                Some(close) => close,
                None => {
                    literal.push_str(&rest[open..]);
                    rest = "";
                    break;
                }
            };
            let segment = match &after[..close] {
                "time" => Segment::Time,
                "level" => Segment::Level,
                "message" => Segment::Message,
                "target" => Segment::Target,
                "file" => Segment::File,
                "line" => Segment::Line,
                other => {
                    literal.push('{');
                    literal.push_str(other);
                    literal.push('}');
                    rest = &after[close + 1..];
                    continue;
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            template: template.to_string(),
            segments,
        }
    }

    /// The template this format was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Writes one line for `record`, including the trailing newline.
    pub fn render(&self, w: &mut impl Write, record: &Record) -> io::Result<()> {
        self.render_at(w, record, &Local::now())
    }

    pub(crate) fn render_at(
        &self,
        w: &mut impl Write,
        record: &Record,
        now: &DateTime<Local>,
    ) -> io::Result<()> {
        for segment in self.segments.iter() {
            match segment {
                Segment::Literal(s) => w.write_all(s.as_bytes())?,
                Segment::Time => write!(w, "{}", now.format(TIME_FORMAT))?,
                Segment::Level => write!(w, "{}", record.level())?,
                Segment::Message => write!(w, "{}", record.args())?,
                Segment::Target => w.write_all(record.target().as_bytes())?,
                Segment::File => w.write_all(record.file().unwrap_or("?").as_bytes())?,
                Segment::Line => match record.line() {
                    Some(line) => write!(w, "{}", line)?,
                    None => w.write_all(b"?")?,
                },
            }
        }
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use log::Level;

    fn render(format: &LineFormat) -> String {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut buf = Vec::new();
        format
            .render_at(
                &mut buf,
                &Record::builder()
                    .args(format_args!("episode {} done", 3))
                    .level(Level::Warn)
                    .target("train")
                    .file(Some("main.rs"))
                    .line(Some(12))
                    .build(),
                &now,
            )
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_default_format() {
        let line = render(&LineFormat::default());
        assert!(line.starts_with("2024-01-01T00:00:00.000000"));
        assert!(line.ends_with(" -- WARN -- episode 3 done\n"));
    }

    #[test]
    fn test_all_placeholders() {
        let format = LineFormat::parse("[{level}] {target} {file}:{line} {message}");
        assert_eq!(render(&format), "[WARN] train main.rs:12 episode 3 done\n");
        assert_eq!(format.template(), "[{level}] {target} {file}:{line} {message}");
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders() {
        assert_eq!(
            render(&LineFormat::parse("{name} {level} {oops")),
            "{name} WARN {oops\n"
        );
        assert_eq!(render(&LineFormat::parse("")), "\n");
    }
}
