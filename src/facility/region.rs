//! Hierarchical search over the hospital registry.
//!
//! The most specific administrative level supplied wins (ward, then
//! constituency, then sub-county, then county); a generic `location` only
//! applies when no level is given and matches any of the four. Attribute
//! filters are ANDed on top. All matching is case-insensitive substring
//! matching through `LIKE` with bound, escaped patterns.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use serde::Deserialize;

use super::hospitals::{hospital_from_row, HOSPITAL_COLUMNS};
use super::types::{AdminLevel, Hospital};
use crate::error::Result;

pub const DEFAULT_LIMIT: usize = 10;

/// Structured filters for [`search_by_region`]. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionFilter {
    pub county: Option<String>,
    pub sub_county: Option<String>,
    pub constituency: Option<String>,
    pub ward: Option<String>,
    /// Matched against every administrative level when none is given.
    pub location: Option<String>,
    pub facility_name: Option<String>,
    pub facility_type: Option<String>,
    pub keph_level: Option<String>,
    pub owner: Option<String>,
    /// Defaults to [`DEFAULT_LIMIT`]; no upper bound, minimum 1.
    pub limit: Option<usize>,
}

/// The single location constraint derived from a [`RegionFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationClause {
    Level(AdminLevel, String),
    AnyLevel(String),
    Unconstrained,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RegionFilter {
    pub fn for_county(county: impl Into<String>) -> Self {
        Self {
            county: Some(county.into()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn location_clause(&self) -> LocationClause {
        let levels = [
            (AdminLevel::Ward, &self.ward),
            (AdminLevel::Constituency, &self.constituency),
            (AdminLevel::SubCounty, &self.sub_county),
            (AdminLevel::County, &self.county),
        ];
        for (level, value) in levels {
            if let Some(v) = filled(value) {
                return LocationClause::Level(level, v.to_string());
            }
        }
        match filled(&self.location) {
            Some(v) => LocationClause::AnyLevel(v.to_string()),
            None => LocationClause::Unconstrained,
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).max(1)
    }
}

/// Escape `LIKE` metacharacters and wrap in `%..%`. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// A parameterized `SELECT` over `hospital_referrals`.
///
/// Only column names known at compile time reach the SQL text; every user
/// value is a bound parameter.
#[derive(Debug, Clone)]
pub struct RegionQuery {
    conditions: Vec<String>,
    params: Vec<Value>,
    limit: usize,
}

impl RegionQuery {
    pub fn from_filter(filter: &RegionFilter) -> Self {
        let mut query = Self {
            conditions: Vec::new(),
            params: Vec::new(),
            limit: filter.effective_limit(),
        };

        match filter.location_clause() {
            LocationClause::Level(level, value) => query.contains(level.column(), &value),
            LocationClause::AnyLevel(value) => {
                let columns: Vec<&str> = AdminLevel::ALL.iter().map(|l| l.column()).collect();
                query.contains_any(&columns, &value);
            }
            LocationClause::Unconstrained => {}
        }

        let attributes = [
            ("facility_name", &filter.facility_name),
            ("facility_type", &filter.facility_type),
            ("keph_level", &filter.keph_level),
            ("owner", &filter.owner),
        ];
        for (column, value) in attributes {
            if let Some(v) = filled(value) {
                query.contains(column, v);
            }
        }

        query
    }

    fn contains(&mut self, column: &'static str, needle: &str) {
        self.contains_any(&[column], needle);
    }

    fn contains_any(&mut self, columns: &[&'static str], needle: &str) {
        let pattern = contains_pattern(needle);
        let alternatives: Vec<String> = columns
            .iter()
            .map(|column| {
                self.params.push(Value::Text(pattern.clone()));
                format!("{column} LIKE ? ESCAPE '\\'")
            })
            .collect();
        if alternatives.len() == 1 {
            self.conditions.extend(alternatives);
        } else {
            self.conditions.push(format!("({})", alternatives.join(" OR ")));
        }
    }

    pub fn sql(&self) -> String {
        let where_clause = if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", self.conditions.join(" AND "))
        };
        format!(
            "SELECT {HOSPITAL_COLUMNS} FROM hospital_referrals {where_clause}\
             ORDER BY facility_name COLLATE NOCASE, code LIMIT ?"
        )
    }

    /// Bound values in placeholder order, the limit last.
    pub fn params(&self) -> Vec<Value> {
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        self.params
            .iter()
            .cloned()
            .chain(std::iter::once(Value::Integer(limit)))
            .collect()
    }
}

/// Run a region search. An empty result is a normal outcome.
pub fn search_by_region(conn: &Connection, filter: &RegionFilter) -> Result<Vec<Hospital>> {
    let query = RegionQuery::from_filter(filter);
    let mut stmt = conn.prepare(&query.sql())?;
    let hospitals = stmt
        .query_map(params_from_iter(query.params()), hospital_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    tracing::debug!(
        clause = ?filter.location_clause(),
        limit = query.limit,
        results = hospitals.len(),
        "region search"
    );

    Ok(hospitals)
}
