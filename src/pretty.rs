//! Pretty printing for settings issues.
//!
//! Colorized, grouped issue reports with hints and truncation.
//!
//! # Example
//!
//! ```ignore
//! use configvar::{PrettyPrintOptions, Settings};
//!
//! match Settings::<App>::builder().schema(schema).source(Env::all()).build() {
//!     Ok(settings) => run(settings),
//!     Err(err) => err.pretty_print(&PrettyPrintOptions::default()),
//! }
//! ```
//!
//! # Output Format
//!
//! ```text
//! Settings issues (3):
//!
//!   database:
//!     • database.host: is required
//!     • database.port: must be an integer
//!
//!   debug:
//!     • debug: must be a boolean (true/t/1/false/f/0)
//!
//! Hints:
//!   • Provide a value for 'database.host'
//! ```

use std::io::Write;

use crate::error::{PathSegment, SettingsError, VariableIssue, VariableIssues};

/// Options for pretty printing issues.
#[derive(Debug, Clone)]
pub struct PrettyPrintOptions {
    /// Enable colored output (auto-detected by default).
    pub color: ColorOption,
    /// Group issues by their top-level key.
    pub group_by_section: bool,
    /// Show hints for missing values.
    pub show_hints: bool,
    /// Maximum issues to display (None for all).
    pub max_issues: Option<usize>,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self {
            color: ColorOption::Auto,
            group_by_section: true,
            show_hints: true,
            max_issues: Some(20),
        }
    }
}

impl PrettyPrintOptions {
    /// Create options with colors disabled.
    pub fn no_color() -> Self {
        Self {
            color: ColorOption::Never,
            ..Default::default()
        }
    }

    /// Create options that show every issue.
    pub fn show_all() -> Self {
        Self {
            max_issues: None,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: ColorOption) -> Self {
        self.color = color;
        self
    }

    pub fn with_grouping(mut self, group: bool) -> Self {
        self.group_by_section = group;
        self
    }

    pub fn with_hints(mut self, show: bool) -> Self {
        self.show_hints = show;
        self
    }

    pub fn with_max_issues(mut self, max: Option<usize>) -> Self {
        self.max_issues = max;
        self
    }
}

/// Color output option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOption {
    /// Auto-detect based on terminal capability.
    Auto,
    Always,
    Never,
}

/// ANSI color codes for terminal output.
struct Colors {
    error: &'static str,
    warning: &'static str,
    section: &'static str,
    path: &'static str,
    hint: &'static str,
    reset: &'static str,
}

impl Colors {
    fn enabled() -> Self {
        Self {
            error: "\x1b[1;31m",   // bold red
            warning: "\x1b[1;33m", // bold yellow
            section: "\x1b[1;36m", // bold cyan
            path: "\x1b[1;37m",    // bold white
            hint: "\x1b[32m",      // green
            reset: "\x1b[0m",
        }
    }

    fn disabled() -> Self {
        Self {
            error: "",
            warning: "",
            section: "",
            path: "",
            hint: "",
            reset: "",
        }
    }
}

/// Top-level key of an issue path; issues on a root variable share "settings".
fn section_of(issue: &VariableIssue) -> String {
    match issue.key.first() {
        Some(PathSegment::Key(key)) => key.clone(),
        _ => "settings".to_string(),
    }
}

struct IssuePrinter<'a> {
    options: &'a PrettyPrintOptions,
    colors: Colors,
}

impl<'a> IssuePrinter<'a> {
    fn new(options: &'a PrettyPrintOptions, use_color: bool) -> Self {
        let colors = if use_color {
            Colors::enabled()
        } else {
            Colors::disabled()
        };
        Self { options, colors }
    }

    fn print(&self, issues: &VariableIssues, writer: &mut dyn Write) {
        let c = &self.colors;

        writeln!(
            writer,
            "\n{}Settings issues ({}):{}\n",
            c.error,
            issues.len(),
            c.reset
        )
        .ok();

        if self.options.group_by_section {
            self.print_grouped(issues, writer);
        } else {
            self.print_flat(issues, writer);
        }

        if self.options.show_hints {
            self.print_hints(issues, writer);
        }
    }

    /// Returns false once the display limit is reached.
    fn check_limit(&self, shown: usize, total: usize, writer: &mut dyn Write) -> bool {
        match self.options.max_issues {
            Some(max) if shown >= max => {
                let c = &self.colors;
                writeln!(
                    writer,
                    "\n  {}...and {} more issues{}\n",
                    c.warning,
                    total - shown,
                    c.reset
                )
                .ok();
                false
            }
            _ => true,
        }
    }

    fn print_grouped(&self, issues: &VariableIssues, writer: &mut dyn Write) {
        let c = &self.colors;

        // Sections in first-seen order.
        let mut groups: Vec<(String, Vec<&VariableIssue>)> = Vec::new();
        for issue in issues.iter() {
            let section = section_of(issue);
            match groups.iter_mut().find(|(name, _)| *name == section) {
                Some((_, members)) => members.push(issue),
                None => groups.push((section, vec![issue])),
            }
        }

        let mut shown = 0;
        for (section, members) in groups {
            writeln!(writer, "  {}{}:{}", c.section, section, c.reset).ok();
            for issue in members {
                if !self.check_limit(shown, issues.len(), writer) {
                    return;
                }
                self.print_issue(issue, writer);
                shown += 1;
            }
            writeln!(writer).ok();
        }
    }

    fn print_flat(&self, issues: &VariableIssues, writer: &mut dyn Write) {
        for (shown, issue) in issues.iter().enumerate() {
            if !self.check_limit(shown, issues.len(), writer) {
                return;
            }
            self.print_issue(issue, writer);
        }
        writeln!(writer).ok();
    }

    fn print_issue(&self, issue: &VariableIssue, writer: &mut dyn Write) {
        let c = &self.colors;
        writeln!(
            writer,
            "    {}•{} {}{}{}: {}",
            c.error,
            c.reset,
            c.path,
            issue.path(),
            c.reset,
            issue.issues.join("; ")
        )
        .ok();
    }

    fn print_hints(&self, issues: &VariableIssues, writer: &mut dyn Write) {
        let c = &self.colors;
        let hints: Vec<String> = issues
            .iter()
            .filter(|issue| issue.is_missing())
            .map(|issue| format!("Provide a value for '{}'", issue.path()))
            .take(3)
            .collect();

        if !hints.is_empty() {
            writeln!(writer, "{}Hints:{}", c.hint, c.reset).ok();
            for hint in hints {
                writeln!(writer, "  • {}", hint).ok();
            }
            writeln!(writer).ok();
        }
    }
}

fn should_use_color(color_option: ColorOption) -> bool {
    match color_option {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
    }
}

fn string_color(color_option: ColorOption) -> bool {
    // No terminal behind a string buffer.
    color_option == ColorOption::Always
}

impl VariableIssues {
    /// Pretty print issues to stderr.
    pub fn pretty_print(&self, options: &PrettyPrintOptions) {
        let printer = IssuePrinter::new(options, should_use_color(options.color));
        printer.print(self, &mut std::io::stderr());
    }

    /// Pretty print into any writer.
    pub fn write_pretty(&self, options: &PrettyPrintOptions, writer: &mut dyn Write) {
        IssuePrinter::new(options, string_color(options.color)).print(self, writer);
    }

    /// Pretty print to a string.
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        let mut buf = Vec::new();
        self.write_pretty(options, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl SettingsError {
    /// Pretty print to stderr; issue lists get the full report.
    pub fn pretty_print(&self, options: &PrettyPrintOptions) {
        match self {
            SettingsError::Invalid(issues) => issues.pretty_print(options),
            other => {
                let c = if should_use_color(options.color) {
                    Colors::enabled()
                } else {
                    Colors::disabled()
                };
                eprintln!("\n{}Settings error:{} {}\n", c.error, c.reset, other);
            }
        }
    }

    /// Pretty print to a string.
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        match self {
            SettingsError::Invalid(issues) => issues.format(options),
            SettingsError::Sources(errors) => {
                let c = if string_color(options.color) {
                    Colors::enabled()
                } else {
                    Colors::disabled()
                };
                let mut out = format!(
                    "\n{}Settings sources failed ({}):{}\n\n",
                    c.error,
                    errors.len(),
                    c.reset
                );
                for error in errors {
                    out.push_str(&format!("    {}•{} {}\n", c.error, c.reset, error));
                }
                out
            }
            other => format!("\nSettings error: {}\n", other),
        }
    }
}

/// Extension for ending a program on settings failure.
pub trait SettingsResultExt<T> {
    /// Unwrap or pretty print the error and exit with code 1.
    ///
    /// ```ignore
    /// use configvar::{Settings, SettingsResultExt};
    ///
    /// let settings = Settings::<App>::builder()
    ///     .schema(schema)
    ///     .source(Env::all())
    ///     .build()
    ///     .unwrap_or_exit();
    /// ```
    fn unwrap_or_exit(self) -> T;

    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T;

    /// Pretty print on error but hand the error back.
    fn unwrap_or_print(self) -> Result<T, SettingsError>;
}

impl<T> SettingsResultExt<T> for Result<T, SettingsError> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_exit_with(&PrettyPrintOptions::default())
    }

    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                err.pretty_print(options);
                std::process::exit(1);
            }
        }
    }

    fn unwrap_or_print(self) -> Result<T, SettingsError> {
        self.inspect_err(|err| err.pretty_print(&PrettyPrintOptions::default()))
    }
}
