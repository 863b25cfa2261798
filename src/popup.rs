use htmlize::escape_text;

use crate::locations::location_name;
use crate::marker::RegionType;
use crate::model::{Category, FlowDefinition, Site};

/// Groups the integer part in thousands and keeps at most three fraction digits.
/// Zero and missing values render as `N/A`.
pub fn format_number(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => return "N/A".to_string(),
    };

    // Group the decimal rendering itself; a cast to an integer type saturates on large values.
    let formatted = format!("{:.3}", value.abs());
    let (digits, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

pub fn format_currency(value: Option<f64>) -> String {
    match format_number(value).as_str() {
        "N/A" => "N/A".to_string(),
        formatted => format!("${}", formatted),
    }
}

/// "mineral_extraction" -> "Mineral Extraction". Only the first underscore becomes a space.
pub fn category_label(category: Category) -> String {
    let spaced = category.as_str().replacen('_', " ", 1);
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for ch in spaced.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !prev_is_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}

pub fn site_popup(site: &Site, region: RegionType) -> String {
    let subcategory = site
        .subcategory
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A");

    let mut content = format!(
        "<div class=\"popup-header\">{}</div>\
         <div class=\"popup-details\">\
         <strong>Location:</strong> {}, {}<br>\
         <strong>Region Type:</strong> {}<br>\
         <strong>Category:</strong> {}<br>\
         <strong>Subcategory:</strong> {}<br>",
        escape_text(&site.site_name),
        escape_text(&site.country),
        escape_text(&site.region),
        region.label(),
        category_label(site.category),
        escape_text(subcategory),
    );

    if site.production_volume.is_some_and(|v| v != 0.0) {
        content.push_str(&format!(
            "<strong>Production:</strong> {} {}<br>",
            format_number(site.production_volume),
            escape_text(site.production_unit.as_deref().unwrap_or(""))
        ));
    }

    if site.workforce_size.is_some_and(|w| w != 0.0) {
        content.push_str(&format!(
            "<strong>Workforce:</strong> {} workers<br>",
            format_number(site.workforce_size)
        ));
    }

    if site.avg_wage_usd_monthly.is_some_and(|w| w != 0.0) {
        content.push_str(&format!(
            "<strong>Avg. Monthly Wage:</strong> {}<br>",
            format_currency(site.avg_wage_usd_monthly)
        ));
    }

    if let Some(score) = site.environmental_impact_score.filter(|s| *s != 0.0) {
        content.push_str(&format!(
            "<strong>Environmental Impact:</strong> {}/10<br>",
            score
        ));
    }

    if let Some(violations) = site
        .human_rights_violations
        .as_deref()
        .filter(|v| !v.is_empty() && *v != "none_reported")
    {
        content.push_str(&format!(
            "<strong>Human Rights Issues:</strong> {}<br>",
            escape_text(&violations.replace('_', ", "))
        ));
    }

    if let Some(companies) = site.key_companies.as_deref().filter(|c| !c.is_empty()) {
        content.push_str(&format!(
            "<strong>Key Companies:</strong> {}<br>",
            escape_text(companies)
        ));
    }

    content.push_str(&format!("<strong>Data Year:</strong> {}<br>", site.data_year));
    content.push_str(&format!(
        "<strong>Source:</strong> {}",
        escape_text(&site.source_authors)
    ));
    content.push_str("</div>");

    content
}

pub fn flow_popup(flow: &FlowDefinition) -> String {
    format!(
        "<strong>{} Flow</strong><br>From: {}<br>To: {}",
        escape_text(flow.label),
        location_name(flow.start),
        location_name(flow.end)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::tests::site;
    use crate::model::FlowKind;

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(Some(23_000_000.0)), "23,000,000");
        assert_eq!(format_number(Some(800.0)), "800");
        assert_eq!(format_number(Some(1799.0)), "1,799");
        assert_eq!(format_number(Some(1234.5678)), "1,234.568");
        assert_eq!(format_number(Some(0.0)), "N/A");
        assert_eq!(format_number(None), "N/A");
        assert_eq!(format_currency(Some(18_000.0)), "$18,000");
        assert_eq!(format_currency(None), "N/A");
    }

    #[test]
    fn values_beyond_u64_keep_their_digits() {
        assert_eq!(format_number(Some(1e20)), "100,000,000,000,000,000,000");
        assert_eq!(format_currency(Some(2.5e19)), "$25,000,000,000,000,000,000");
        assert_eq!(format_number(Some(-1234.0)), "-1,234");
        assert_eq!(format_number(Some(0.5)), "0.5");
    }

    #[test]
    fn category_labels_are_title_cased() {
        assert_eq!(category_label(Category::MineralExtraction), "Mineral Extraction");
        assert_eq!(category_label(Category::AiResearch), "Ai Research");
        assert_eq!(category_label(Category::DataCenters), "Data Centers");
    }

    #[test]
    fn site_popup_lists_present_fields_only() {
        let mut s = site(Category::MineralExtraction);
        s.site_name = "Kolwezi <District>".to_string();
        s.country = "Democratic Republic of Congo".to_string();
        s.subcategory = Some("cobalt".to_string());
        s.production_volume = Some(84_000.0);
        s.production_unit = Some("MT_annual_district".to_string());
        s.environmental_impact_score = Some(10.0);
        s.human_rights_violations = Some("child_labor_water_contamination".to_string());

        let html = site_popup(&s, RegionType::of_country(&s.country));
        assert!(html.contains("Kolwezi &lt;District&gt;"));
        assert!(html.contains("<strong>Region Type:</strong> Global South"));
        assert!(html.contains("<strong>Category:</strong> Mineral Extraction"));
        assert!(html.contains("<strong>Production:</strong> 84,000 MT_annual_district"));
        assert!(html.contains("<strong>Environmental Impact:</strong> 10/10"));
        assert!(html.contains("child, labor, water, contamination"));
        assert!(!html.contains("Workforce"));
        assert!(!html.contains("Key Companies"));
        assert!(html.ends_with("<strong>Source:</strong> Nobody</div>"));
    }

    #[test]
    fn none_reported_violations_are_hidden() {
        let mut s = site(Category::DataCenters);
        s.human_rights_violations = Some("none_reported".to_string());
        let html = site_popup(&s, RegionType::GlobalNorth);
        assert!(!html.contains("Human Rights Issues"));
        assert!(html.contains("<strong>Subcategory:</strong> N/A"));
    }

    #[test]
    fn flow_popup_names_known_endpoints() {
        let flow = FlowDefinition {
            kind: FlowKind::Labor,
            start: [77.6, 12.97],
            end: [-79.4, 43.7],
            weight: 2,
            label: "Data Annotation",
        };
        assert_eq!(
            flow_popup(&flow),
            "<strong>Data Annotation Flow</strong><br>From: Bangalore<br>To: Unknown Location"
        );
    }
}
