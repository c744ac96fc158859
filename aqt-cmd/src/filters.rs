//! `filters`: show how a tracking URL query is interpreted.

use aqt_core::filters::FilterState;
use aqt_core::store::MemoryStore;

pub fn describe(filters: &FilterState) -> String {
    let places = if filters.selected_places.is_empty() {
        "-".to_string()
    } else {
        filters.selected_places.join(", ")
    };
    let or_dash = |s: String| if s.is_empty() { "-".to_string() } else { s };
    [
        format!("range:     {}", filters.range.as_str()),
        format!("metric:    {}", filters.metric),
        format!("province:  {}", or_dash(filters.province.clone())),
        format!("place:     {}", or_dash(filters.place.clone())),
        format!("comparing: {places}"),
        format!("chart:     {}", or_dash(filters.effective_filter())),
        format!("heatmap:   {}", or_dash(filters.heatmap_filter())),
        format!("latest:    {}", or_dash(filters.latest_filter())),
        format!("query:     {}", filters.to_query_string()),
    ]
    .join("\n")
}

pub fn run_filters(query: &str) -> anyhow::Result<()> {
    let filters = FilterState::from_query(query, &MemoryStore::new());
    println!("{}", describe(&filters));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_comparison_query() {
        let filters = FilterState::from_query(
            "?range=1+Week&metric=aqi&places=Bangkok,Chiang+Mai",
            &MemoryStore::new(),
        );
        let text = describe(&filters);
        assert!(text.contains("range:     1 Week"));
        assert!(text.contains("comparing: Bangkok, Chiang Mai"));
        assert!(text.contains("chart:     -"));
        assert!(text.contains("heatmap:   Bangkok"));
        assert!(text.contains("latest:    Bangkok"));
    }
}
