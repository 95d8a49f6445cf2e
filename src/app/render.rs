use crate::config::OutputFormat;
use crate::domain::model::Plan;
use crate::utils::error::{ClientError, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

pub fn render_plans(plans: &[Plan], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(plans)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plans)?),
        OutputFormat::Csv => render_csv(plans),
    }
}

fn render_table(plans: &[Plan]) -> String {
    if plans.is_empty() {
        return "No plans available.\n".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "Name", "Price", "Interval", "Features"]);

    for plan in plans {
        table.add_row(vec![
            plan.id.clone(),
            plan.name.clone(),
            format!("{:.2}", plan.price),
            plan.interval.clone(),
            plan.features.join(", "),
        ]);
    }

    format!("{}\n", table)
}

fn render_csv(plans: &[Plan]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "name", "price", "interval", "description", "features"])?;
    for plan in plans {
        writer.write_record([
            plan.id.as_str(),
            plan.name.as_str(),
            &plan.price.to_string(),
            plan.interval.as_str(),
            plan.description.as_str(),
            &plan.features.join(";"),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClientError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        ClientError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
