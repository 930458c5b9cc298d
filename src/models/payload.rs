// Heatmap payload as written by the upstream plotting job (Plotly figure JSON).
// Only `data[].name` and `data[].values` (or Plotly's `z`) are read.

use serde::Deserialize;

/// One heatmap figure for a monitored location.
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapPayload {
    pub data: Vec<HeatmapSeries>,
}

/// One trace of the figure. `name` is "<year> ... <depth>", e.g. "2012 2m".
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapSeries {
    pub name: String,
    #[serde(alias = "z")]
    pub values: Samples,
}

/// Possibly nested numeric array; `null` marks a missing sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Samples {
    Value(Option<f64>),
    Nested(Vec<Samples>),
}

impl HeatmapSeries {
    /// First whitespace-delimited token of the name.
    pub fn year(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }

    /// Last whitespace-delimited token of the name (depth with unit).
    pub fn depth(&self) -> Option<&str> {
        self.name.split_whitespace().next_back()
    }
}

impl Samples {
    /// Flattens into row-major order, missing samples become NaN.
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Samples::Value(v) => out.push(v.unwrap_or(f64::NAN)),
            Samples::Nested(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_nested_rows_with_nulls() {
        let s: Samples = serde_json::from_str("[[1.0, null], [3, 4.5]]").unwrap();
        let flat = s.flatten();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0], 1.0);
        assert!(flat[1].is_nan());
        assert_eq!(flat[2], 3.0);
        assert_eq!(flat[3], 4.5);
    }

    #[test]
    fn year_and_depth_tokens() {
        let series: HeatmapSeries =
            serde_json::from_str(r#"{"name": "2012 Maria Island 21m", "z": []}"#).unwrap();
        assert_eq!(series.year(), Some("2012"));
        assert_eq!(series.depth(), Some("21m"));
    }

    #[test]
    fn non_numeric_sample_is_rejected() {
        let r = serde_json::from_str::<Samples>(r#"[1.0, "hot"]"#);
        assert!(r.is_err());
    }
}
