use crate::domain::model::{
    AlertSeverity, ForecastDay, NewsItem, PestAlert, PriceData, PriceTrend, WeatherData,
};
use crate::utils::error::{Result, SearchError};
use chrono::Utc;
use regex::Regex;

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Pulls cited sources and light structure out of free-form answers.
pub struct AnswerParser {
    url: Regex,
    price: Regex,
    day_label: Regex,
    rising: Regex,
    falling: Regex,
    impact: Regex,
    high_severity: Regex,
    low_severity: Regex,
}

impl AnswerParser {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| SearchError::ConfigError {
                message: format!("invalid answer pattern: {}", e),
            })
        };

        Ok(Self {
            url: compile(r#"https?://[^\s<>()\[\]"'`]+"#)?,
            price: compile(
                r"(?i)(?:€\s*(?P<eur_pre>\d[\d.,]*)|(?P<eur>\d[\d.,]*)\s*(?:EUR\b|€|euros?\b)|\$\s*(?P<usd_pre>\d[\d.,]*)|(?P<usd>\d[\d.,]*)\s*(?:USD\b|US\s*dollars?\b|dollars?\b))",
            )?,
            day_label: compile(r"(?i)^(day\s+\d+)\b")?,
            rising: compile(
                r"(?i)\b(?:ris(?:e|es|ing)|rose|increas(?:e|es|ed|ing)|higher|gain(?:s|ed)?|up\s+by|surg(?:e|es|ed|ing))\b",
            )?,
            falling: compile(
                r"(?i)\b(?:fall(?:s|ing)?|fell|decreas(?:e|es|ed|ing)|declin(?:e|es|ed|ing)|lower|drop(?:s|ped)?|down\s+by)\b",
            )?,
            impact: compile(
                r"(?i)\b(?:farm\w*|plant(?:s|ing|ed)?|spray\w*|harvest\w*|sowing|field\s+work|crops?)\b",
            )?,
            high_severity: compile(r"(?i)\b(?:high|severe|critical|urgent)\b")?,
            low_severity: compile(r"(?i)\b(?:low|minor)\b")?,
        })
    }

    /// Provider citations first, then URLs found in the text, first-seen order.
    pub fn extract_sources(&self, answer: &str, citations: &[String]) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        let found = self
            .url
            .find_iter(answer)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', '*']));

        for url in citations.iter().map(String::as_str).chain(found) {
            let url = url.trim();
            if !url.is_empty() && !sources.iter().any(|s| s == url) {
                sources.push(url.to_string());
            }
        }
        sources
    }

    pub fn parse_weather(&self, answer: &str) -> WeatherData {
        let summary = first_sentence(answer);

        let mut forecast = Vec::new();
        for line in answer.lines().map(clean_line).filter(|l| !l.is_empty()) {
            let lower = line.to_lowercase();
            let day = if let Some(weekday) = WEEKDAYS.iter().find(|d| lower.starts_with(**d)) {
                line.get(..weekday.len()).map(str::to_string)
            } else {
                self.day_label
                    .captures(&line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            };

            if let Some(day) = day {
                let rest = line
                    .get(day.len()..)
                    .unwrap_or_default()
                    .trim_start_matches(|c: char| c == ':' || c == '-' || c == '–' || c.is_whitespace())
                    .to_string();
                forecast.push(ForecastDay { day, text: rest });
            }
        }

        let agricultural_impact = answer
            .lines()
            .map(clean_line)
            .find(|line| self.impact.is_match(line));

        WeatherData {
            summary,
            forecast,
            agricultural_impact,
        }
    }

    pub fn parse_price(&self, answer: &str, commodity: &str) -> PriceData {
        let mut current_price = None;
        let mut currency = "EUR";

        if let Some(caps) = self.price.captures(answer) {
            let (amount, code) = if let Some(m) = caps.name("eur_pre").or(caps.name("eur")) {
                (m.as_str(), "EUR")
            } else if let Some(m) = caps.name("usd_pre").or(caps.name("usd")) {
                (m.as_str(), "USD")
            } else {
                ("", "EUR")
            };
            current_price = parse_amount(amount);
            currency = code;
        }

        let lower = answer.to_lowercase();
        let unit = if lower.contains("per kg") || lower.contains("/kg") {
            "kg"
        } else if lower.contains("per bushel") || lower.contains("/bu") {
            "bushel"
        } else {
            "ton"
        };

        PriceData {
            commodity: commodity.trim().to_string(),
            current_price,
            currency: currency.to_string(),
            unit: unit.to_string(),
            trend: self.detect_trend(answer),
            last_updated: Utc::now(),
        }
    }

    pub fn parse_news(&self, answer: &str) -> Vec<NewsItem> {
        bullet_lines(answer)
            .into_iter()
            .map(|line| {
                let (title, summary) = split_title(&line);
                NewsItem { title, summary }
            })
            .collect()
    }

    pub fn parse_alerts(&self, answer: &str) -> Vec<PestAlert> {
        bullet_lines(answer)
            .into_iter()
            .map(|line| {
                let severity = if self.high_severity.is_match(&line) {
                    AlertSeverity::High
                } else if self.low_severity.is_match(&line) {
                    AlertSeverity::Low
                } else {
                    AlertSeverity::Medium
                };
                let (name, _) = split_title(&line);
                PestAlert {
                    name,
                    severity,
                    text: line,
                }
            })
            .collect()
    }

    /// Whole-word trend vocabulary counts; ties are stable.
    fn detect_trend(&self, text: &str) -> PriceTrend {
        let rising = self.rising.find_iter(text).count();
        let falling = self.falling.find_iter(text).count();
        match rising.cmp(&falling) {
            std::cmp::Ordering::Greater => PriceTrend::Rising,
            std::cmp::Ordering::Less => PriceTrend::Falling,
            std::cmp::Ordering::Equal => PriceTrend::Stable,
        }
    }
}

fn clean_line(line: &str) -> String {
    line.replace("**", "")
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

fn first_sentence(answer: &str) -> String {
    let first_line = answer
        .lines()
        .map(clean_line)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    match first_line.find(". ") {
        Some(idx) => first_line[..=idx].to_string(),
        None => first_line,
    }
}

/// Lines written as list items, markers removed.
fn bullet_lines(answer: &str) -> Vec<String> {
    answer
        .lines()
        .filter_map(|raw| {
            let line = raw.trim();
            let stripped = if let Some(rest) = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .or_else(|| line.strip_prefix("• "))
            {
                rest
            } else {
                let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
                if digits == 0 {
                    return None;
                }
                line[digits..]
                    .strip_prefix(". ")
                    .or_else(|| line[digits..].strip_prefix(") "))?
            };
            let cleaned = clean_line(stripped);
            (!cleaned.is_empty()).then_some(cleaned)
        })
        .collect()
}

fn split_title(line: &str) -> (String, String) {
    for separator in [": ", " - ", " – "] {
        if let Some((title, rest)) = line.split_once(separator) {
            return (title.trim().to_string(), rest.trim().to_string());
        }
    }
    (line.trim().to_string(), String::new())
}

/// Accepts `1,250.50`, `1.250,50`, `215` and `215,5` style amounts.
fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim().trim_end_matches(['.', ',']);
    if raw.is_empty() {
        return None;
    }

    let last_dot = raw.rfind('.');
    let last_comma = raw.rfind(',');
    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => raw.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => raw.replace(',', ""),
        (None, Some(comma)) if raw.len() - comma - 1 == 3 => raw.replace(',', ""),
        (None, Some(_)) => raw.replace(',', "."),
        (Some(dot), None) if raw.len() - dot - 1 == 3 && raw.matches('.').count() > 1 => {
            raw.replace('.', "")
        }
        _ => raw.to_string(),
    };
    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> AnswerParser {
        AnswerParser::new().unwrap()
    }

    #[test]
    fn test_extract_sources_dedupes_and_trims() {
        let answer = "Prices rose (see https://www.agroklub.com/market.). \
                      More at https://ec.europa.eu/agri, and https://www.agroklub.com/market";
        let citations = vec!["https://ec.europa.eu/agri".to_string()];

        let sources = parser().extract_sources(answer, &citations);

        assert_eq!(
            sources,
            vec![
                "https://ec.europa.eu/agri".to_string(),
                "https://www.agroklub.com/market".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_price() {
        let answer = "Milling wheat is trading at 215,50 EUR per ton, a slight increase \
                      on last month.";
        let price = parser().parse_price(answer, " wheat ");

        assert_eq!(price.commodity, "wheat");
        assert_eq!(price.current_price, Some(215.5));
        assert_eq!(price.currency, "EUR");
        assert_eq!(price.unit, "ton");
        assert_eq!(price.trend, PriceTrend::Rising);
    }

    #[test]
    fn test_parse_price_without_amount() {
        let price = parser().parse_price("No reliable quotes were published this week.", "barley");
        assert_eq!(price.current_price, None);
        assert_eq!(price.trend, PriceTrend::Stable);
    }

    #[test]
    fn test_trend_ignores_words_containing_keywords() {
        let parser = parser();

        let price =
            parser.parse_price("Wheat is rising to 220 EUR per ton after heavy rainfall.", "wheat");
        assert_eq!(price.trend, PriceTrend::Rising);

        let price = parser.parse_price("Barley prices are falling as stocks build up.", "barley");
        assert_eq!(price.trend, PriceTrend::Falling);

        let price = parser.parse_price("Follow the market; rainfall was normal.", "oats");
        assert_eq!(price.trend, PriceTrend::Stable);
    }

    #[test]
    fn test_alert_severity_matches_whole_words() {
        let alerts = parser().parse_alerts(
            "- Colorado beetle: larvae below leaves, spray now
             - Yellow rust: spreading in the highlands
             - Fire blight: severe outbreaks reported",
        );

        assert_eq!(alerts[0].severity, AlertSeverity::Medium);
        assert_eq!(alerts[1].severity, AlertSeverity::Medium);
        assert_eq!(alerts[2].severity, AlertSeverity::High);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1,250.50"), Some(1250.5));
        assert_eq!(parse_amount("1.250,50"), Some(1250.5));
        assert_eq!(parse_amount("1,250"), Some(1250.0));
        assert_eq!(parse_amount("215."), Some(215.0));
        assert_eq!(parse_amount("0.125"), Some(0.125));
    }

    #[test]
    fn test_parse_weather() {
        let answer = "## Mild week ahead. Showers mid-week.\n\
                      **Monday**: 18°C, dry\n\
                      Tuesday - 16°C, 5 mm rain\n\
                      Day 3: windy\n\
                      Good window for spraying on Monday morning.";
        let weather = parser().parse_weather(answer);

        assert_eq!(weather.summary, "Mild week ahead.");
        assert_eq!(weather.forecast.len(), 3);
        assert_eq!(weather.forecast[0].day, "Monday");
        assert_eq!(weather.forecast[0].text, "18°C, dry");
        assert_eq!(weather.forecast[1].text, "16°C, 5 mm rain");
        assert_eq!(weather.forecast[2].day, "Day 3");
        assert_eq!(
            weather.agricultural_impact.as_deref(),
            Some("Good window for spraying on Monday morning.")
        );
    }

    #[test]
    fn test_parse_news_and_alerts() {
        let answer = "Recent updates:\n\
                      1. **CAP reform**: new eco-schemes announced\n\
                      - Fertilizer prices - nitrogen costs eased\n\
                      * Drought relief fund opened";
        let news = parser().parse_news(answer);

        assert_eq!(news.len(), 3);
        assert_eq!(news[0].title, "CAP reform");
        assert_eq!(news[0].summary, "new eco-schemes announced");
        assert_eq!(news[1].title, "Fertilizer prices");
        assert_eq!(news[2].summary, "");

        let alerts = parser().parse_alerts(
            "- Downy mildew: severe risk after rain\n- Aphids: minor presence\n- Corn borer: monitor traps",
        );
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].name, "Downy mildew");
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[1].severity, AlertSeverity::Low);
        assert_eq!(alerts[2].severity, AlertSeverity::Medium);
    }
}
