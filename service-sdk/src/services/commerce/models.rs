//! Commerce platform data models
//!
//! Request records and conversation messages are loosely structured and
//! travel as `serde_json::Value`; this module only types the query side:
//! a composable RQL filter expression and the request-listing query.

use serde::Serialize;

/// Composable RQL filter expression
///
/// Renders to the commerce platform's query syntax, e.g.
/// `and(eq(status,pending),in(asset.product.id,(PRD-1,PRD-2)))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RqlFilter {
    /// Field equals value: `eq(field,value)`
    Eq(String, String),

    /// Field is one of the values: `in(field,(a,b))`
    OneOf(String, Vec<String>),

    /// All sub-expressions hold: `and(a,b,...)`
    And(Vec<RqlFilter>),
}

impl RqlFilter {
    /// Equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        RqlFilter::Eq(field.into(), value.into())
    }

    /// Membership filter
    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RqlFilter::OneOf(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Conjunction; flattens nested `and` expressions
    pub fn and(self, other: RqlFilter) -> Self {
        match self {
            RqlFilter::And(mut parts) => {
                parts.push(other);
                RqlFilter::And(parts)
            }
            first => RqlFilter::And(vec![first, other]),
        }
    }

    /// Render the expression to the platform's query syntax
    pub fn render(&self) -> String {
        match self {
            RqlFilter::Eq(field, value) => format!("eq({},{})", field, value),
            RqlFilter::OneOf(field, values) => {
                format!("in({},({}))", field, values.join(","))
            }
            RqlFilter::And(parts) => {
                let rendered: Vec<String> = parts.iter().map(RqlFilter::render).collect();
                format!("and({})", rendered.join(","))
            }
        }
    }
}

/// Query for the request-listing endpoint: filter expression, field
/// exclusions and sort order
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    filter: Option<RqlFilter>,
    exclusions: Vec<String>,
    ordering: Option<String>,
}

impl RequestQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression
    pub fn filter(mut self, filter: RqlFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Exclude fields from the projection (rendered as `select(-field)`)
    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sort the result by the given field
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.ordering = Some(field.into());
        self
    }

    /// Render the query string (without leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref filter) = self.filter {
            parts.push(filter.render());
        }

        if !self.exclusions.is_empty() {
            let excluded: Vec<String> =
                self.exclusions.iter().map(|f| format!("-{}", f)).collect();
            parts.push(format!("select({})", excluded.join(",")));
        }

        if let Some(ref ordering) = self.ordering {
            parts.push(format!("ordering({})", ordering));
        }

        parts.join("&")
    }
}

/// Body for creating a conversation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageSeed {
    pub text: String,
}
