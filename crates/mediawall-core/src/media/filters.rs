use serde::{Deserialize, Serialize};

/// Media type constraint for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKindFilter {
    #[default]
    All,
    Image,
    Video,
}

/// Orientation constraint, derived from stored width/height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationFilter {
    #[default]
    All,
    Horizontal,
    Vertical,
    Square,
}

/// Sort column for the index query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Filename,
    SizeBytes,
    Resolution,
    DurationSec,
    /// Non-deterministic across calls; the index reshuffles every query
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Full filter snapshot for one query scope.
///
/// `folder_paths` is computed (home scope or a feed's saved set), never set
/// directly by the user; `favorites_only` backs the built-in favorites feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub media_type: MediaKindFilter,
    #[serde(default)]
    pub orientation: OrientationFilter,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub min_height: Option<u32>,
    #[serde(default)]
    pub min_duration: Option<f64>,
    #[serde(default)]
    pub max_duration: Option<f64>,
    #[serde(default)]
    pub min_size: Option<i64>,
    #[serde(default)]
    pub max_size: Option<i64>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub folder_paths: Option<Vec<String>>,
    #[serde(default)]
    pub favorites_only: Option<bool>,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            media_type: MediaKindFilter::All,
            orientation: OrientationFilter::All,
            min_width: None,
            min_height: None,
            min_duration: None,
            max_duration: None,
            min_size: None,
            max_size: None,
            extensions: None,
            folder_paths: None,
            favorites_only: None,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterOptions {
    /// Apply a partial update on top of this snapshot
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(media_type) = update.media_type {
            self.media_type = media_type;
        }
        if let Some(orientation) = update.orientation {
            self.orientation = orientation;
        }
        if let Some(min_width) = update.min_width {
            self.min_width = min_width;
        }
        if let Some(min_height) = update.min_height {
            self.min_height = min_height;
        }
        if let Some(min_duration) = update.min_duration {
            self.min_duration = min_duration;
        }
        if let Some(max_duration) = update.max_duration {
            self.max_duration = max_duration;
        }
        if let Some(min_size) = update.min_size {
            self.min_size = min_size;
        }
        if let Some(max_size) = update.max_size {
            self.max_size = max_size;
        }
        if let Some(extensions) = update.extensions {
            self.extensions = extensions;
        }
        if let Some(sort_by) = update.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
    }
}

/// Partial filter change; `None` fields keep their current value.
///
/// Optional fields use a double `Option` so an update can explicitly clear a
/// bound (`Some(None)`) as well as leave it untouched (`None`).
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub media_type: Option<MediaKindFilter>,
    pub orientation: Option<OrientationFilter>,
    pub min_width: Option<Option<u32>>,
    pub min_height: Option<Option<u32>>,
    pub min_duration: Option<Option<f64>>,
    pub max_duration: Option<Option<f64>>,
    pub min_size: Option<Option<i64>>,
    pub max_size: Option<Option<i64>>,
    pub extensions: Option<Option<Vec<String>>>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut filters = FilterOptions {
            min_width: Some(640),
            sort_by: SortBy::Filename,
            ..Default::default()
        };

        filters.merge(FilterUpdate {
            media_type: Some(MediaKindFilter::Video),
            ..Default::default()
        });

        assert_eq!(filters.media_type, MediaKindFilter::Video);
        assert_eq!(filters.min_width, Some(640));
        assert_eq!(filters.sort_by, SortBy::Filename);
    }

    #[test]
    fn test_merge_can_clear_a_bound() {
        let mut filters = FilterOptions {
            max_size: Some(1 << 20),
            ..Default::default()
        };

        filters.merge(FilterUpdate {
            max_size: Some(None),
            ..Default::default()
        });

        assert_eq!(filters.max_size, None);
    }

    #[test]
    fn test_filter_snapshot_round_trips_as_json() {
        let filters = FilterOptions {
            media_type: MediaKindFilter::Image,
            orientation: OrientationFilter::Vertical,
            extensions: Some(vec!["jpg".into(), "png".into()]),
            sort_by: SortBy::Resolution,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };

        let json = serde_json::to_string(&filters).unwrap();
        let back: FilterOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filters);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let back: FilterOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(back, FilterOptions::default());
    }
}
