use crate::store::InventoryItem;
use crate::utils::errors::Result;
use sha2::{Digest, Sha256};

/// How job results are written to stdout
#[derive(Clone, Debug, Default)]
pub struct OutputFormat {
    pub raw: bool,
    pub json: bool,
}

impl OutputFormat {
    pub fn new(raw: bool, json: bool) -> Self {
        Self { raw, json }
    }

    /// Write the submitted inventory: JSON document, tab-separated rows or an aligned table
    pub fn print_inventory(&self, items: &[InventoryItem]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
            return Ok(());
        }

        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                vec![
                    item.alias.clone(),
                    if item.private_key_entry { "key" } else { "-" }.to_string(),
                    item.certificates
                        .first()
                        .map(|b64| sha256_fingerprint(b64))
                        .unwrap_or_default(),
                ]
            })
            .collect();

        print!("{}", self.render_table(&rows));
        Ok(())
    }

    /// Render rows either raw (tab-separated) or column-aligned like `column -t`
    pub fn render_table<T>(&self, data: &[Vec<T>]) -> String
    where
        T: AsRef<str>,
    {
        if data.is_empty() {
            return String::new();
        }

        if self.raw {
            return data
                .iter()
                .map(|row| {
                    let cells: Vec<&str> = row.iter().map(|cell| cell.as_ref()).collect();
                    format!("{}\n", cells.join("\t"))
                })
                .collect();
        }

        let num_cols = data.iter().map(Vec::len).max().unwrap_or(0);
        let mut col_widths = vec![0; num_cols];
        for row in data {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(cell.as_ref().len());
            }
        }

        let mut rendered = String::new();
        for row in data {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == row.len() - 1 {
                        cell.as_ref().to_string()
                    } else {
                        format!("{:<width$}", cell.as_ref(), width = col_widths[i])
                    }
                })
                .collect();
            rendered.push_str(&cells.join("  "));
            rendered.push('\n');
        }
        rendered
    }
}

/// Colon-separated SHA-256 of a base64 DER certificate; empty when it does not decode.
/// Line breaks in the base64 are ignored.
pub fn sha256_fingerprint(der_base64: &str) -> String {
    use base64::{engine::general_purpose, Engine as _};

    let compact: String = der_base64.split_whitespace().collect();
    match general_purpose::STANDARD.decode(compact) {
        Ok(der) => {
            let digest = Sha256::digest(&der);
            digest
                .iter()
                .map(|byte| hex::encode([*byte]))
                .collect::<Vec<_>>()
                .join(":")
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output() {
        let format = OutputFormat::new(true, false);
        let data = vec![
            vec!["short", "medium", "very_long_column"],
            vec!["a", "bb", "ccc"],
        ];

        assert_eq!(
            format.render_table(&data),
            "short\tmedium\tvery_long_column\na\tbb\tccc\n"
        );
    }

    #[test]
    fn test_formatted_output() {
        let format = OutputFormat::new(false, false);
        let data = vec![
            vec!["short", "medium", "very_long_column"],
            vec!["a", "bb", "ccc"],
        ];

        assert_eq!(
            format.render_table(&data),
            "short  medium  very_long_column\na      bb      ccc\n"
        );
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let format = OutputFormat::default();
        let data: Vec<Vec<String>> = Vec::new();
        assert_eq!(format.render_table(&data), "");
    }

    #[test]
    fn test_fingerprint() {
        // SHA-256 of "abc"
        let fp = sha256_fingerprint("YWJj");
        assert!(fp.starts_with("ba:78:16:bf"));
        assert_eq!(fp.split(':').count(), 32);
        assert_eq!(sha256_fingerprint("not base64!"), "");
        assert_eq!(sha256_fingerprint("YW\nJj"), fp);
    }
}
