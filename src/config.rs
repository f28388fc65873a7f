use std::collections::HashSet;

/// Field values read as missing cells when parsing CSV.
pub const DEFAULT_NULL_VALUES: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>"];

/// Settings shared by every file of a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// CSV null literals
    pub null_values: HashSet<String>,
    /// Number of rows shown in the preview
    pub preview_rows: usize,
    /// Maximum number of rows drawn in the text bar chart
    pub chart_rows: usize,
    /// Width in characters of the longest bar
    pub chart_width: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            null_values: DEFAULT_NULL_VALUES.iter().map(|value| value.to_string()).collect(),
            preview_rows: 5,
            chart_rows: 20,
            chart_width: 40,
        }
    }
}

impl PipelineConfig {
    /// Replaces the null literal set. The empty field always stays a null literal.
    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self.null_values.insert(String::new());
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_chart(mut self, rows: usize, width: usize) -> Self {
        self.chart_rows = rows;
        self.chart_width = width.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_null_values_keep_empty_field() {
        let config = PipelineConfig::default().with_null_values(["-"]);
        assert!(config.null_values.contains("-"));
        assert!(config.null_values.contains(""));
        assert!(!config.null_values.contains("NA"));
    }
}
