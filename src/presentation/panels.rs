//! Builders for the panels of the main "class" view.

#![allow(missing_docs)]

use super::syntax::{SourceLine, Token, TokenKind};
use crate::clock::{ClockState, pad2};
use crate::display::pulse::PulseFlags;

/// Gutter length of the source editor.
pub const GUTTER_LINES: usize = 32;
/// Fake object address shown by the inspector and the compiler log.
pub const INSTANCE_ADDRESS: &str = "0x9F8B2";
pub const SOURCE_FILE: &str = "SystemClock.java";

/// Decorative side panel with the implemented interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfacePanel {
    pub title: &'static str,
    pub lines: Vec<SourceLine>,
}

/// Decorative heap gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryPanel {
    pub title: &'static str,
    pub used_pct: u8,
    pub heap_range: &'static str,
}

/// Editor window with `SystemClock.java`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePanel {
    pub file_name: &'static str,
    pub gutter: usize,
    pub lines: Vec<SourceLine>,
    pub status: StatusBar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub runtime: &'static str,
    pub thread: &'static str,
    pub jvm: &'static str,
    pub encoding: &'static str,
}

/// Value styling in the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTone {
    Number,
    Str,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceField {
    pub name: &'static str,
    pub value: String,
    pub tone: FieldTone,
    pub pulse: bool,
}

/// "Live Instance Data" inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePanel {
    pub address: String,
    pub fields: Vec<InstanceField>,
    /// Result of `toString()`, i.e. the display string, quoted.
    pub to_string: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Ok,
    Jvm,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// Fake compiler log, ending in a blinking cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerLog {
    pub lines: Vec<LogLine>,
    pub cursor: &'static str,
}

/// Everything shown once booting has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPanel {
    pub interface: InterfacePanel,
    pub memory: MemoryPanel,
    pub source: SourcePanel,
    pub instance: InstancePanel,
    pub log: CompilerLog,
}

impl ClassPanel {
    #[must_use]
    pub fn build(state: &ClockState, pulse: PulseFlags) -> Self {
        Self {
            interface: interface_panel(),
            memory: MemoryPanel {
                title: "Memory Allocation",
                used_pct: 62,
                heap_range: "Heap: 0x7FA2...0x8E11",
            },
            source: source_panel(state, pulse),
            instance: instance_panel(state, pulse),
            log: compiler_log(state),
        }
    }
}

fn interface_panel() -> InterfacePanel {
    InterfacePanel {
        title: "Interface Definition",
        lines: vec![
            SourceLine::blank()
                .kw("public interface")
                .plain(" ")
                .ty("Ticking")
                .plain(" {"),
            SourceLine::indented(1)
                .ty("void")
                .plain(" ")
                .method("tick")
                .plain("();"),
            SourceLine::indented(1)
                .ty("String")
                .plain(" ")
                .method("toString")
                .plain("();"),
            SourceLine::blank().push(TokenKind::Brace, "}"),
        ],
    }
}

/// `this.<field> = <value>;`
fn assignment(field: &str, value: Token) -> SourceLine {
    SourceLine::indented(2)
        .kw("this")
        .plain(".")
        .var(field)
        .plain(" ")
        .push(TokenKind::Operator, "=")
        .plain(" ")
        .push_token(value)
        .plain(";")
}

fn field_decl(keyword: &str, names: &[&str]) -> SourceLine {
    let mut line = SourceLine::indented(1).kw(keyword).plain(" ");
    for (idx, name) in names.iter().enumerate() {
        if idx > 0 {
            line = line.plain(", ");
        }
        line = line.var(*name);
    }
    line.plain(";")
}

fn source_panel(state: &ClockState, pulse: PulseFlags) -> SourcePanel {
    let number = |value: String, pulsing: bool| Token::new(TokenKind::Value, value).pulsing(pulsing);
    let leap = if state.is_leap_year { "true" } else { "false" };

    let lines = vec![
        SourceLine::blank()
            .kw("public class")
            .plain(" ")
            .ty("SystemClock")
            .plain(" ")
            .kw("implements")
            .plain(" ")
            .ty("Ticking")
            .plain(" {"),
        SourceLine::blank(),
        SourceLine::indented(1).push(TokenKind::Comment, "// Encapsulation: Temporal state"),
        field_decl("private int", &["hour", "minute", "second"]),
        field_decl("private int", &["day", "month", "year"]),
        field_decl("private String", &["dayOfWeek"]),
        field_decl("private boolean", &["isLeapYear"]),
        SourceLine::blank(),
        SourceLine::indented(1).kw("@Override"),
        SourceLine::indented(1)
            .kw("public void")
            .plain(" ")
            .method("tick")
            .plain("() {"),
        assignment("hour", number(state.hour.to_string(), pulse.hour)),
        assignment("minute", number(state.minute.to_string(), pulse.minute)),
        assignment("second", number(state.second.to_string(), pulse.second)),
        assignment("day", number(state.day.to_string(), false)),
        assignment("month", number(state.month.to_string(), false)),
        assignment("year", number(state.year.to_string(), false)),
        assignment(
            "dayOfWeek",
            Token::new(TokenKind::Str, format!("\"{}\"", state.day_of_week)),
        ),
        assignment("isLeapYear", Token::new(TokenKind::Value, leap)),
        SourceLine::indented(1).push(TokenKind::Brace, "}"),
        SourceLine::blank(),
        SourceLine::indented(1).kw("@Override"),
        SourceLine::indented(1)
            .kw("public")
            .plain(" ")
            .ty("String")
            .plain(" ")
            .method("toString")
            .plain("() {"),
        SourceLine::indented(2)
            .kw("return")
            .plain(" ")
            .push(TokenKind::Str, "String.format")
            .plain("(")
            .push(TokenKind::Str, "\"%s, %04d-%02d-%02d %02d:%02d:%02d\"")
            .plain(","),
        SourceLine::indented(3)
            .var("dayOfWeek")
            .plain(", ")
            .var("year")
            .plain(", ")
            .var("month")
            .plain(", ")
            .var("day")
            .plain(", ")
            .var("hour")
            .plain(", ")
            .var("minute")
            .plain(", ")
            .var("second")
            .plain(");"),
        SourceLine::indented(1).push(TokenKind::Brace, "}"),
        SourceLine::blank().push(TokenKind::Brace, "}"),
    ];

    SourcePanel {
        file_name: SOURCE_FILE,
        gutter: GUTTER_LINES,
        lines,
        status: StatusBar {
            runtime: "Runtime: Running",
            thread: "Thread: Main-0",
            jvm: "JVM 21.0.1",
            encoding: "UTF-8",
        },
    }
}

fn instance_panel(state: &ClockState, pulse: PulseFlags) -> InstancePanel {
    let field = |name, value: String, tone, pulse| InstanceField {
        name,
        value,
        tone,
        pulse,
    };
    InstancePanel {
        address: format!("@{INSTANCE_ADDRESS}"),
        fields: vec![
            field("hour", pad2(state.hour), FieldTone::Number, false),
            field("minute", pad2(state.minute), FieldTone::Number, false),
            field("second", pad2(state.second), FieldTone::Number, pulse.second),
            field("day", state.day.to_string(), FieldTone::Number, false),
            field("month", state.month.to_string(), FieldTone::Number, false),
            field("year", state.year.to_string(), FieldTone::Number, false),
            field(
                "dayOfWeek",
                format!("\"{}\"", state.day_of_week),
                FieldTone::Str,
                false,
            ),
            field(
                "leapYear",
                state.is_leap_year.to_string(),
                FieldTone::Boolean,
                false,
            ),
        ],
        to_string: format!("\"{}\"", state.display_string()),
    }
}

fn compiler_log(state: &ClockState) -> CompilerLog {
    let line = |level, text: String| LogLine { level, text };
    CompilerLog {
        lines: vec![
            line(
                LogLevel::Info,
                format!("[INFO] Compiling {SOURCE_FILE}..."),
            ),
            line(LogLevel::Ok, "[OK] Class loaded into Metaspace.".to_string()),
            line(
                LogLevel::Jvm,
                format!("[JVM] Instance created at {INSTANCE_ADDRESS}"),
            ),
            line(
                LogLevel::Log,
                format!("[LOG] Tick event @ {}", state.timestamp),
            ),
        ],
        cursor: "_",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{EnglishWeekdays, FixedInstantSource, TimeSampler};

    fn sample() -> ClockState {
        TimeSampler::new(
            Box::new(FixedInstantSource::parse("2024-03-05T09:02:07+00:00", "UTC").unwrap()),
            Box::new(EnglishWeekdays),
        )
        .sample()
    }

    fn field<'a>(panel: &'a InstancePanel, name: &str) -> &'a InstanceField {
        panel
            .fields
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn inspector_pads_time_but_not_date() {
        let panel = ClassPanel::build(&sample(), PulseFlags::default());
        let inst = &panel.instance;
        assert_eq!(field(inst, "hour").value, "09");
        assert_eq!(field(inst, "minute").value, "02");
        assert_eq!(field(inst, "second").value, "07");
        assert_eq!(field(inst, "day").value, "5");
        assert_eq!(field(inst, "month").value, "3");
        assert_eq!(field(inst, "year").value, "2024");
        assert_eq!(field(inst, "dayOfWeek").value, "\"Tuesday\"");
        assert_eq!(field(inst, "leapYear").value, "true");
        assert_eq!(inst.to_string, "\"Tuesday, 2024-03-05 09:02:07\"");
        assert_eq!(inst.address, "@0x9F8B2");
    }

    #[test]
    fn source_assigns_raw_unpadded_values() {
        let panel = ClassPanel::build(&sample(), PulseFlags::default());
        let text: Vec<String> = panel.source.lines.iter().map(SourceLine::text).collect();
        assert!(text.contains(&"    this.hour = 9;".to_string()));
        assert!(text.contains(&"    this.second = 7;".to_string()));
        assert!(text.contains(&"    this.dayOfWeek = \"Tuesday\";".to_string()));
        assert!(text.contains(&"    this.isLeapYear = true;".to_string()));
        assert!(panel.source.lines.len() <= panel.source.gutter);
        assert_eq!(text[0], "public class SystemClock implements Ticking {");
    }

    #[test]
    fn pulse_marks_source_time_values_and_inspector_second() {
        let pulse = PulseFlags {
            hour: false,
            minute: true,
            second: true,
            day: true,
        };
        let panel = ClassPanel::build(&sample(), pulse);
        let pulsing: Vec<String> = panel
            .source
            .lines
            .iter()
            .flat_map(|line| line.tokens.iter())
            .filter(|token| token.pulse)
            .map(|token| token.text.clone())
            .collect();
        // Day is not highlighted in the source view.
        assert_eq!(pulsing, vec!["2".to_string(), "7".to_string()]);
        assert!(field(&panel.instance, "second").pulse);
        assert!(!field(&panel.instance, "minute").pulse);
    }

    #[test]
    fn compiler_log_reports_tick_timestamp() {
        let state = sample();
        let panel = ClassPanel::build(&state, PulseFlags::default());
        let last = panel.log.lines.last().unwrap();
        assert_eq!(last.level, LogLevel::Log);
        assert_eq!(last.text, format!("[LOG] Tick event @ {}", state.timestamp));
    }
}
