use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Tracked pairs with their changes and signals, followed by cross-rates.
pub fn render(dashboard: &Dashboard) -> String {
    let mut pairs = ui::new_styled_table();
    pairs.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Rate"),
        ui::header_cell("vs Last Year"),
        ui::header_cell("vs 7D"),
        ui::header_cell("vs 30D"),
        ui::header_cell("Signal"),
    ]);
    for pair in &dashboard.pairs {
        pairs.add_row(vec![
            Cell::new(&pair.pair),
            ui::rate_cell(pair.rate),
            ui::change_cell(pair.changes.vs_last_year),
            ui::change_cell(pair.changes.vs_seven_day),
            ui::change_cell(pair.changes.vs_thirty_day),
            ui::signal_cell(pair.signal.signal),
        ]);
    }

    let mut cross = ui::new_styled_table();
    cross.set_header(vec![
        ui::header_cell("Cross Rate"),
        ui::header_cell(&format!("Rate ({})", dashboard.quote_currency)),
    ]);
    for derived in &dashboard.derived_rates {
        cross.add_row(vec![Cell::new(&derived.pair), ui::rate_cell(derived.rate)]);
    }

    let baselines = &dashboard.baselines;
    format!(
        "{}\n\n{pairs}\n\n{}\n\n{cross}\n\nBaselines: last year {}, 7 days {}, 30 days {}",
        ui::style_text(
            &format!("Exchange Rates (per 1 {})", dashboard.base_currency),
            ui::StyleType::Title
        ),
        ui::style_text("Cross Rates", ui::StyleType::Title),
        ui::status_text(baselines.last_year.status),
        ui::status_text(baselines.seven_day.status),
        ui::status_text(baselines.thirty_day.status),
    )
}
