//! Output formatting for product records (table, JSON, markdown).

use crate::amazon::ProductRecord;
use crate::config::OutputFormat;

/// Formats product records for terminal output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single record.
    pub fn format_record(&self, record: &ProductRecord) -> String {
        match self.format {
            OutputFormat::Json => self.json(record),
            OutputFormat::Table => self.table(record),
            OutputFormat::Markdown => self.markdown(record),
        }
    }

    fn json(&self, record: &ProductRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    fn table(&self, record: &ProductRecord) -> String {
        let lines = [
            format!("ASIN:      {}", record.identifier),
            format!("Title:     {}", record.title),
            format!("Price:     {}", record.price),
            format!("URL:       {}", record.canonical_url),
            format!("Affiliate: {}", record.affiliate_url),
            format!("Image:     {}", record.image_url.as_deref().unwrap_or("N/A")),
        ];

        lines.join("\n")
    }

    fn markdown(&self, record: &ProductRecord) -> String {
        let mut lines = vec![
            format!("## {}", escape_markdown(&record.title)),
            String::new(),
            format!("- **ASIN:** {}", record.identifier),
            format!("- **Price:** {}", escape_markdown(&record.price)),
            format!("- **Link:** [{}]({})", record.identifier, record.affiliate_url),
        ];

        if let Some(image) = &record.image_url {
            lines.push(String::new());
            lines.push(format!("![{}]({})", escape_markdown(&record.title), image));
        }

        lines.join("\n")
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '[' | ']' | '`' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
