//! Query Builder
//!
//! Maps filter and sort state onto the parameters of `GET /issues`.

use serde_json::{Map, Value};

use crate::filters::{FilterDimension, FilterState};
use crate::sorts::{SortDirection, SortField, SortState};
use it_core::traits::Id;

/// Parameters for one issue list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub sort: SortField,
    pub direction: SortDirection,
    /// `None` when the search text is empty
    pub search: Option<String>,
    /// Non-empty selections only, in dimension order
    pub filters: Vec<(FilterDimension, Vec<Id>)>,
}

impl QueryParams {
    /// Build parameters from the current UI state
    ///
    /// The unassigned flag is not part of the request; see [`crate::local`].
    pub fn build(filters: &FilterState, sort: &SortState) -> Self {
        let search = match filters.search() {
            "" => None,
            text => Some(text.to_string()),
        };

        Self {
            sort: sort.field,
            direction: sort.direction,
            search,
            filters: filters
                .active_dimensions()
                .map(|(dimension, ids)| (dimension, ids.to_vec()))
                .collect(),
        }
    }

    /// Selected ids for a dimension, if it is sent at all
    pub fn filter(&self, dimension: FilterDimension) -> Option<&[Id]> {
        self.filters
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, ids)| ids.as_slice())
    }

    /// Flat `(key, value)` pairs with repeated keys for array parameters
    ///
    /// This is the form handed to the HTTP client for URL encoding:
    /// `filter_type[]=2&filter_type[]=5`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("sort".to_string(), self.sort.as_str().to_string()),
            ("direction".to_string(), self.direction.as_str().to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        for (dimension, ids) in &self.filters {
            for id in ids {
                pairs.push((dimension.param_name().to_string(), id.to_string()));
            }
        }
        pairs
    }

    /// JSON object view, with filter selections as arrays
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("sort".into(), Value::from(self.sort.as_str()));
        object.insert("direction".into(), Value::from(self.direction.as_str()));
        if let Some(search) = &self.search {
            object.insert("search".into(), Value::from(search.as_str()));
        }
        for (dimension, ids) in &self.filters {
            object.insert(dimension.param_name().into(), Value::from(ids.clone()));
        }
        Value::Object(object)
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::build(&FilterState::default(), &SortState::default())
    }
}
