//! The metric query-expression surface the scenarios exercise.
//!
//! A query is a metric selector — identifier, optional `{key="value"}`
//! label filters, optional `[duration]` range — wrapped in zero or more
//! function applications: `rate(...)`, `irate(...)`, `avg(...)`, or
//! `histogram_quantile(p, ...)`. Expressions render to a single line with
//! no embedded newline, which is what the line framer requires.

use std::fmt;

/// A metric selector: `name{key="value",...}[range]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    metric: String,
    labels: Vec<(String, String)>,
    range: Option<String>,
}

impl Selector {
    /// Select a metric by name.
    pub fn metric(name: impl Into<String>) -> Self {
        Self {
            metric: name.into(),
            labels: Vec::new(),
            range: None,
        }
    }

    /// Add a `key="value"` label filter.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Add a `[duration]` range selector, e.g. `"5m"` or `"1m"`.
    pub fn range(mut self, duration: impl Into<String>) -> Self {
        self.range = Some(duration.into());
        self
    }

    /// The metric identifier.
    pub fn metric_name(&self) -> &str {
        &self.metric
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metric)?;
        if !self.labels.is_empty() {
            write!(f, "{{")?;
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{key}=\"{value}\"")?;
            }
            write!(f, "}}")?;
        }
        if let Some(range) = &self.range {
            write!(f, "[{range}]")?;
        }
        Ok(())
    }
}

/// A query expression: a selector under function applications.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    Selector(Selector),
    Rate(Box<QueryExpr>),
    Irate(Box<QueryExpr>),
    Avg(Box<QueryExpr>),
    HistogramQuantile(f64, Box<QueryExpr>),
}

impl QueryExpr {
    /// Per-second rate over the range.
    pub fn rate(inner: impl Into<QueryExpr>) -> Self {
        Self::Rate(Box::new(inner.into()))
    }

    /// Instantaneous rate from the last two samples in the range.
    pub fn irate(inner: impl Into<QueryExpr>) -> Self {
        Self::Irate(Box::new(inner.into()))
    }

    /// Average across series.
    pub fn avg(inner: impl Into<QueryExpr>) -> Self {
        Self::Avg(Box::new(inner.into()))
    }

    /// Quantile estimate from a histogram metric.
    pub fn histogram_quantile(quantile: f64, inner: impl Into<QueryExpr>) -> Self {
        Self::HistogramQuantile(quantile, Box::new(inner.into()))
    }

    /// Render to the wire form. The output never contains a newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl From<Selector> for QueryExpr {
    fn from(selector: Selector) -> Self {
        Self::Selector(selector)
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => write!(f, "{selector}"),
            Self::Rate(inner) => write!(f, "rate({inner})"),
            Self::Irate(inner) => write!(f, "irate({inner})"),
            Self::Avg(inner) => write!(f, "avg({inner})"),
            Self::HistogramQuantile(q, inner) => write!(f, "histogram_quantile({q}, {inner})"),
        }
    }
}
