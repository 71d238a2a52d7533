use tabled::{Table, Tabled, settings::Style};

use crate::models::{CarbonRecord, CarbonUnitRecord, ProformaRow, ProformaSummary};

/// `$1,234.56`, `-$42.00`
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct CarbonLine {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "C_Score")]
    cumulative: String,
    #[tabled(rename = "Annual_C_Score")]
    annual: String,
}

pub fn carbon_table(records: &[CarbonRecord]) -> String {
    render(records.iter().map(|r| CarbonLine {
        year: r.year,
        cumulative: format!("{:.4}", r.cumulative_score),
        annual: format!("{:.4}", r.annual_score),
    }))
}

#[derive(Tabled)]
struct UnitLine {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "delta_project")]
    delta_project: String,
    #[tabled(rename = "C_total")]
    net_delta: String,
    #[tabled(rename = "BUF")]
    buffer: String,
    #[tabled(rename = "CU")]
    units: String,
}

pub fn units_table(records: &[CarbonUnitRecord]) -> String {
    render(records.iter().map(|r| UnitLine {
        year: r.year,
        protocol: r.protocol_id.clone(),
        delta_project: format!("{:.2}", r.delta_project),
        net_delta: format!("{:.2}", r.net_delta),
        buffer: format!("{:.2}", r.buffer_amount),
        units: format!("{:.2}", r.carbon_units),
    }))
}

#[derive(Tabled)]
struct ProformaLine {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "CU")]
    units: String,
    #[tabled(rename = "Sold")]
    sold: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Costs")]
    costs: String,
    #[tabled(rename = "Net")]
    net: String,
}

pub fn proforma_table(rows: &[ProformaRow]) -> String {
    render(rows.iter().map(|r| ProformaLine {
        year: r.year,
        protocol: r.protocol_id.clone(),
        units: format!("{:.2}", r.units_available),
        sold: format!("{:.2}", r.units_sold),
        price: format_money(r.credit_price),
        revenue: format_money(r.revenue),
        costs: format_money(r.total_cost),
        net: format_money(r.net_revenue),
    }))
}

#[derive(Tabled)]
struct SummaryLine {
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Total net revenue")]
    total: String,
    #[tabled(rename = "NPV")]
    npv: String,
    #[tabled(rename = "NPV / acre")]
    npv_per_acre: String,
}

pub fn summary_table(summaries: &[ProformaSummary]) -> String {
    render(summaries.iter().map(|s| SummaryLine {
        protocol: s.protocol_id.clone(),
        total: format_money(s.total_net_revenue),
        npv: format_money(s.npv_at_year_20),
        npv_per_acre: format_money(s.npv_per_acre),
    }))
}
