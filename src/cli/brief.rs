//! Plain-text daily briefing for the purchasing team mailing list.
use super::ui::change_indicator;
use crate::core::Dashboard;
use std::fmt::{self, Display, Formatter};

fn currency_symbol(code: &str) -> &'static str {
    match code {
        "KRW" => "₩",
        "JPY" | "CNY" => "¥",
        "EUR" => "€",
        "USD" => "$",
        _ => "",
    }
}

fn format_rate(code: &str, rate: f64) -> String {
    if rate == 0.0 {
        return "N/A".to_string();
    }
    format!("{}{rate:.2}", currency_symbol(code))
}

/// The briefing as a displayable value, one section per block.
pub struct Briefing<'a>(pub &'a Dashboard);

impl Briefing<'_> {
    fn write_header(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let date = self
            .0
            .generated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d");
        writeln!(f, "수신: 구매팀 전체")?;
        writeln!(f, "발신: 경제지표 브리핑 시스템")?;
        writeln!(f, "제목: [제약구매팀] 일일 경제지표 브리핑 - {date}")
    }

    fn write_rates(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let dashboard = self.0;
        writeln!(f, "📊 주요 환율")?;
        for pair in &dashboard.pairs {
            writeln!(
                f,
                "{:<8} {:>12}  전년 평균 대비 {}  7일 {}  30일 {}  → {}",
                pair.pair,
                format_rate(&pair.currency, pair.rate),
                change_indicator(pair.changes.vs_last_year),
                change_indicator(pair.changes.vs_seven_day),
                change_indicator(pair.changes.vs_thirty_day),
                pair.signal.message,
            )?;
        }
        if dashboard.baselines.any_degraded() {
            writeln!(
                f,
                "⚠️ 일부 과거 환율을 불러오지 못해 해당 기간 변동률은 0으로 표시됩니다."
            )?;
        }
        Ok(())
    }

    fn write_cross_rates(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "🤝 협상용 크로스 환율")?;
        for derived in &self.0.derived_rates {
            writeln!(
                f,
                "{:<14} {:>12}",
                derived.pair,
                format_rate(&self.0.quote_currency, derived.rate)
            )?;
        }
        Ok(())
    }

    fn write_news(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "📰 주요 뉴스")?;
        let selected = &self.0.news.selected;
        if selected.is_empty() {
            writeln!(f, "오늘은 선별된 뉴스가 없습니다.")?;
        }
        for news in selected {
            writeln!(f, "[{}] {}", news.label, news.item.title)?;
            if !news.item.description.is_empty() {
                writeln!(f, "    {}", news.item.description)?;
            }
            writeln!(
                f,
                "    {}",
                news.item.original_link.as_deref().unwrap_or(&news.item.link)
            )?;
        }
        Ok(())
    }
}

impl Display for Briefing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        writeln!(f)?;
        self.write_rates(f)?;
        writeln!(f)?;
        self.write_cross_rates(f)?;
        writeln!(f)?;
        self.write_news(f)?;
        writeln!(f)?;
        write!(f, "💡 이 내용을 복사해서 팀 메일로 발송하실 수 있습니다.")
    }
}

/// Renders the briefing. Output is plain text meant to be pasted into e-mail.
pub fn render(dashboard: &Dashboard) -> String {
    Briefing(dashboard).to_string()
}
