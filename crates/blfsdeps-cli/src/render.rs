use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use blfsdeps_core::PackageRecord;
use blfsdeps_installer::{FetchReport, InstallReport};
use blfsdeps_resolver::ResolvedPackages;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    if std::io::stdout().is_terminal() && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        "skip" => "[SKIP]",
        _ => "[..]",
    }
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> String {
    match style {
        OutputStyle::Plain => format!("{title}:"),
        OutputStyle::Rich => colorize(section_style(), &format!("== {title} ==")),
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

/// One line per package, leaves first; names missing from the database are
/// flagged rather than dropped.
pub(crate) fn format_install_order_lines(
    resolved: &ResolvedPackages,
    style: OutputStyle,
) -> Vec<String> {
    resolved
        .install_order()
        .into_iter()
        .map(|package| {
            if resolved.dangling.contains(&package) {
                render_status_line(
                    style,
                    "warn",
                    &format!("{package} (not in package database)"),
                )
            } else {
                package
            }
        })
        .collect()
}

pub(crate) fn format_command_listing(
    package: &str,
    record: &PackageRecord,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    let notes = record.kernel_config_notes();
    if !notes.is_empty() {
        lines.push(render_section_header(
            style,
            &format!("kernel configuration for {package}"),
        ));
        lines.extend(notes.iter().cloned());
    }
    lines.push(render_section_header(
        style,
        &format!("install commands for {package}"),
    ));
    if record.install_commands.is_empty() {
        lines.push(render_status_line(style, "skip", "no install commands"));
    } else {
        lines.extend(record.install_commands.iter().cloned());
    }
    lines
}

pub(crate) fn format_fetch_report_lines(report: &FetchReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.downloaded {
        lines.push(render_status_line(
            style,
            "ok",
            &format!("downloaded {}", path.display()),
        ));
    }
    for path in &report.cached {
        lines.push(render_status_line(
            style,
            "skip",
            &format!("cached {}", path.display()),
        ));
    }
    for package in &report.unknown_packages {
        lines.push(render_status_line(
            style,
            "warn",
            &format!("{package}: not in package database"),
        ));
    }
    lines.push(format!(
        "{} downloaded, {} cached, {} ignored",
        report.downloaded.len(),
        report.cached.len(),
        report.ignored_urls.len()
    ));
    lines
}

pub(crate) fn format_install_report_lines(
    report: &InstallReport,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    for command in &report.failed {
        lines.push(render_status_line(
            style,
            "err",
            &format!("{}: failed: {command}", report.package),
        ));
    }
    for command in &report.declined {
        lines.push(render_status_line(
            style,
            "skip",
            &format!("{}: declined: {command}", report.package),
        ));
    }
    let status = if report.failed.is_empty() { "ok" } else { "warn" };
    lines.push(render_status_line(
        style,
        status,
        &format!(
            "{}: {} run, {} declined, {} failed",
            report.package,
            report.executed.len(),
            report.declined.len(),
            report.failed.len()
        ),
    ));
    lines
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
