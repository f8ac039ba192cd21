//! Filter engine: query-filtered, group-partitioned projection of an option
//! list.
//!
//! The view stores indices into the option list it was computed from, so it
//! stays cheap to rebuild on every keystroke and never clones option values.
//!
//! # Examples
//!
//! ```
//! use selectkit::{filter, SelectOption};
//!
//! let options = vec![
//!     SelectOption::new(1, "Maputo"),
//!     SelectOption::new(2, "Beira"),
//!     SelectOption::new(3, "Nampula"),
//! ];
//! let view = filter(&options, "a");
//! let labels: Vec<_> = view.iter(&options).map(|o| o.label.as_str()).collect();
//! assert_eq!(labels, ["Maputo", "Beira", "Nampula"]);
//!
//! let view = filter(&options, "PUL");
//! assert_eq!(view.indices(), &[2]);
//! ```

use crate::option::SelectOption;
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::Range;

/// A contiguous run of the view sharing one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Group name, `None` for the ungrouped bucket
    pub group: Option<String>,
    /// Positions in the view covered by this section
    pub range: Range<usize>,
}

impl Section {
    /// Number of entries in the section.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Check if the section has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Result of filtering an option list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredView {
    query: String,
    indices: Vec<usize>,
    sections: Vec<Section>,
}

#[derive(Default)]
struct Bucket {
    group_matches: bool,
    members: Vec<usize>,
}

/// Filter `options` by `query`.
///
/// Case-insensitive substring match against the label, or against the group
/// name for grouped options. Ungrouped matches come first in input order,
/// followed by one section per group in the order the group is first seen in
/// the unfiltered list.
pub fn filter<T>(options: &[SelectOption<T>], query: &str) -> FilteredView {
    let needle = query.to_lowercase();
    let mut ungrouped = Vec::new();
    let mut groups: IndexMap<&str, Bucket> = IndexMap::new();

    for (index, option) in options.iter().enumerate() {
        match option.group.as_deref() {
            None => {
                if option.matches_lowercase(&needle) {
                    ungrouped.push(index);
                }
            }
            Some(name) => {
                // Buckets are created for every group, matching or not, so
                // their order is decided by the unfiltered list.
                let bucket = groups.entry(name).or_insert_with(|| Bucket {
                    group_matches: needle.is_empty() || name.to_lowercase().contains(&needle),
                    members: Vec::new(),
                });
                if bucket.group_matches || option.label.to_lowercase().contains(&needle) {
                    bucket.members.push(index);
                }
            }
        }
    }

    let mut indices = Vec::with_capacity(options.len());
    let mut sections = Vec::new();

    if !ungrouped.is_empty() {
        sections.push(Section {
            group: None,
            range: 0..ungrouped.len(),
        });
        indices.extend(ungrouped);
    }

    for (name, bucket) in groups {
        if bucket.members.is_empty() {
            continue;
        }
        let start = indices.len();
        indices.extend(bucket.members);
        sections.push(Section {
            group: Some(name.to_string()),
            range: start..indices.len(),
        });
    }

    FilteredView {
        query: query.to_string(),
        indices,
        sections,
    }
}

impl FilteredView {
    /// Query this view was computed for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of entries in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if nothing matched. Callers show an "empty" indicator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Option-list index of the entry at view position `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    /// View position of the option at `option_index`, if it is visible.
    #[must_use]
    pub fn position_of(&self, option_index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == option_index)
    }

    /// Option-list indices in view order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Sections in view order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section containing view position `position`.
    #[must_use]
    pub fn section_of(&self, position: usize) -> Option<&Section> {
        self.sections.iter().find(|s| s.range.contains(&position))
    }

    /// Iterate the options of the view, resolved against `options`.
    ///
    /// `options` must be the list the view was computed from.
    pub fn iter<'a, T>(
        &'a self,
        options: &'a [SelectOption<T>],
    ) -> impl Iterator<Item = &'a SelectOption<T>> + 'a {
        self.indices.iter().filter_map(move |&i| options.get(i))
    }
}
