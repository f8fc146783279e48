use super::ui;
use crate::core::Curation;
use comfy_table::Cell;

pub fn render(curation: &Curation) -> String {
    let title = ui::style_text("Pharma News", ui::StyleType::Title);
    if curation.selected.is_empty() {
        return format!(
            "{title}\n\n{}",
            ui::style_text("No news from allowed sources.", ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Headline"),
        ui::header_cell("Published"),
        ui::header_cell("Link"),
    ]);
    for news in &curation.selected {
        let published = news
            .item
            .published_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| news.item.pub_date.clone());
        let link = news.item.original_link.as_deref().unwrap_or(&news.item.link);
        table.add_row(vec![
            ui::category_cell(news.category),
            Cell::new(&news.item.title),
            Cell::new(published),
            Cell::new(link),
        ]);
    }

    format!(
        "{title}\n\n{table}\n\n{}",
        ui::style_text(
            &format!(
                "Showing {} of {} matched articles",
                curation.selected.len(),
                curation.total_matched
            ),
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategorizedNewsItem, NewsCategory, NewsItem};

    #[test]
    fn test_render_empty() {
        let output = render(&Curation::default());
        assert!(output.contains("No news from allowed sources."));
    }

    #[test]
    fn test_render_prefers_original_link() {
        let curation = Curation {
            selected: vec![CategorizedNewsItem::new(
                NewsItem {
                    title: "혈압약 리콜".into(),
                    description: String::new(),
                    link: "https://n.news.naver.com/1".into(),
                    original_link: Some("https://www.yakup.com/1".into()),
                    pub_date: "Sun, 18 Oct 2026 08:00:00 +0900".into(),
                },
                NewsCategory::Urgent,
            )],
            total_matched: 4,
        };

        let output = render(&curation);
        assert!(output.contains("https://www.yakup.com/1"));
        assert!(output.contains("2026-10-18 08:00"));
        assert!(output.contains("Showing 1 of 4 matched articles"));
    }
}
