use crate::core::{BaselineStatus, NewsCategory, SignalKind};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn rate_cell(rate: f64) -> Cell {
    if rate == 0.0 {
        return Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right);
    }
    Cell::new(format!("{rate:.2}")).set_alignment(CellAlignment::Right)
}

/// Percentage change cell. A rising rate costs the buyer more, so it is red.
pub fn change_cell(change: f64) -> Cell {
    let text = format!("{change:+.2}%");
    let color = if change > 0.0 {
        Color::Red
    } else if change < 0.0 {
        Color::Blue
    } else {
        Color::DarkGrey
    };
    Cell::new(text)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn signal_cell(signal: SignalKind) -> Cell {
    let color = match signal {
        SignalKind::Buy => Color::Green,
        SignalKind::Wait => Color::Red,
        SignalKind::Neutral => Color::DarkGrey,
    };
    Cell::new(format!("{signal} ({})", signal.message()))
        .fg(color)
        .add_attribute(Attribute::Bold)
}

pub fn category_cell(category: NewsCategory) -> Cell {
    let color = match category {
        NewsCategory::Urgent => Color::Red,
        NewsCategory::Important => Color::Yellow,
        NewsCategory::Normal => Color::Reset,
    };
    Cell::new(category.label()).fg(color)
}

pub fn status_text(status: BaselineStatus) -> String {
    match status {
        BaselineStatus::Ok => style_text("ok", StyleType::Subtle),
        BaselineStatus::Degraded => style_text("degraded", StyleType::Warning),
    }
}

/// Arrow-prefixed change used in plain-text output, e.g. `📈 +0.35%`.
pub fn change_indicator(change: f64) -> String {
    if change > 0.0 {
        format!("📈 {change:+.2}%")
    } else if change < 0.0 {
        format!("📉 {change:.2}%")
    } else {
        "➡️ 0.00%".to_string()
    }
}

/// Creates a spinner shown while inputs are being fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
