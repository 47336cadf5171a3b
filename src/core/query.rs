use crate::domain::model::SearchType;

pub fn enhancement(search_type: SearchType) -> &'static str {
    match search_type {
        SearchType::Weather => {
            "Include temperature, rainfall, humidity, wind speed. Provide daily breakdown."
        }
        SearchType::Prices => {
            "Include current market prices, price trends, and comparison with previous period."
        }
        SearchType::News => "Include recent developments, policy changes, and market updates.",
        SearchType::Alerts => "Include severity level, affected areas, and recommended actions.",
        SearchType::General => "Provide comprehensive agricultural information with sources.",
    }
}

/// Appends the per-type instruction to an already sanitized query.
pub fn enhance_query(query: &str, search_type: SearchType) -> String {
    let trimmed = query.trim().trim_end_matches('.');
    if trimmed.ends_with(|c: char| c == '?' || c == '!') {
        format!("{} {}", trimmed, enhancement(search_type))
    } else {
        format!("{}. {}", trimmed, enhancement(search_type))
    }
}

pub fn weather_query(location: &str, days: u32) -> String {
    format!(
        "Weather forecast for {} next {} days for farming agricultural planning temperature rainfall humidity",
        location.trim(),
        days
    )
}

pub fn market_price_query(commodity: &str, market: &str) -> String {
    format!(
        "Current {} prices in {} agricultural market EUR per ton",
        commodity.trim(),
        market.trim()
    )
}

pub fn news_query(topic: Option<&str>, region: &str) -> String {
    let mut query = format!("Recent agricultural news {}", region.trim());
    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        query.push_str(" about ");
        query.push_str(topic);
    }
    query
}

pub fn pest_alert_query(region: &str, crops: &[String]) -> String {
    let crops = crops
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Current pest disease alerts warnings {} for {} crops",
        region.trim(),
        crops
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_query_appends_type_instruction() {
        assert_eq!(
            enhance_query("Wheat prices in Europe.", SearchType::Prices),
            "Wheat prices in Europe. Include current market prices, price trends, and comparison with previous period."
        );
        assert_eq!(
            enhance_query("Will it rain in Osijek?", SearchType::Weather),
            "Will it rain in Osijek? Include temperature, rainfall, humidity, wind speed. Provide daily breakdown."
        );
        assert!(enhance_query("Soil pH for blueberries", SearchType::General)
            .ends_with("Provide comprehensive agricultural information with sources."));
    }

    #[test]
    fn test_topic_queries() {
        assert_eq!(
            market_price_query("wheat", "Croatia"),
            "Current wheat prices in Croatia agricultural market EUR per ton"
        );
        assert_eq!(news_query(None, "Slavonia"), "Recent agricultural news Slavonia");
        assert_eq!(
            news_query(Some(" subsidies "), "EU"),
            "Recent agricultural news EU about subsidies"
        );
        assert_eq!(
            pest_alert_query("Istria", &["olive".to_string(), " ".to_string(), "grape".to_string()]),
            "Current pest disease alerts warnings Istria for olive, grape crops"
        );
        assert!(weather_query("Osijek", 7).starts_with("Weather forecast for Osijek next 7 days"));
    }
}
