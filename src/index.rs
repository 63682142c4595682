//! Entry indexing.
//!
//! Stage 2 of the build pipeline. Takes the parsed entries and the build
//! time and derives every structure the page generators read:
//!
//! - **Visibility**: entries without a date are dropped; entries dated
//!   after the build time are hidden until a later build (scheduled
//!   publishing).
//! - **Canonical order**: ascending by publish time, then title, then
//!   source order. Descending views are the exact reverse.
//! - **Anchors**: `YYYY-MM-DD` for the first entry of a day, then
//!   `YYYY-MM-DDA`, `YYYY-MM-DDB`, … in canonical order. Computed over the
//!   whole visible set so they do not depend on pagination.
//! - **Groupings**: by [`MonthKey`] and by category label. An entry with
//!   no category is filed under the empty label; one with N categories is
//!   filed under all N.
//! - **Recency**: the newest `recent_count` entries.
//!
//! The resulting [`SiteIndex`] is read-only for the rest of the build.

use crate::naming::CategorySlugs;
use crate::types::{Entry, MonthKey};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use tracing::{debug, info, warn};

/// Entries per category page.
pub const CATEGORY_PAGE_SIZE: usize = 10;

/// A visible entry plus everything assigned to it during indexing.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: Entry,
    pub published: DateTime<FixedOffset>,
    /// Unique fragment id, see module docs.
    pub anchor: String,
    pub month: MonthKey,
    /// Resolved categories; `[""]` for uncategorized entries.
    pub categories: Vec<CategoryRef>,
}

impl IndexedEntry {
    pub fn title(&self) -> &str {
        &self.entry.title
    }

    /// Archive page path plus fragment, relative to the site root.
    pub fn archive_link(&self) -> String {
        format!("{}#{}", self.month.archive_path(), self.anchor)
    }
}

/// A category membership with its resolved directory slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub label: String,
    pub slug: String,
}

impl CategoryRef {
    /// Link target of the category's page `page` (1-based), relative to the site root.
    pub fn page_href(&self, page: usize) -> String {
        category_page_href(&self.slug, page)
    }
}

/// Bytes escaped when a slug becomes a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Path of category page `page` (1-based) under `slug`, as written to disk.
pub fn category_page_path(slug: &str, page: usize) -> String {
    format!("category/{slug}/{page:03}.html")
}

/// [`category_page_path`] with the slug percent-encoded, for use in `href`.
pub fn category_page_href(slug: &str, page: usize) -> String {
    let segment = utf8_percent_encode(slug, SEGMENT);
    format!("category/{segment}/{page:03}.html")
}

/// All members of one category label.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub label: String,
    pub slug: String,
    /// Indices into [`SiteIndex::entries`], ascending.
    pub members: Vec<usize>,
}

impl CategoryGroup {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn page_count(&self) -> usize {
        page_ranges(self.members.len(), CATEGORY_PAGE_SIZE).len()
    }
}

/// The rolling top index: the two newest months plus the month its
/// "older" link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopIndex {
    /// Newest first; one or two months.
    pub months: Vec<MonthKey>,
    pub older: Option<MonthKey>,
}

/// Everything derived from the visible entry set.
#[derive(Debug)]
pub struct SiteIndex {
    pub build_time: DateTime<FixedOffset>,
    /// Visible entries in canonical (ascending) order.
    pub entries: Vec<IndexedEntry>,
    /// Month → member indices, ascending.
    pub months: BTreeMap<MonthKey, Vec<usize>>,
    /// Label → group. The empty label holds uncategorized entries.
    pub categories: BTreeMap<String, CategoryGroup>,
    /// Newest entries first, at most `recent_count`.
    pub recent: Vec<usize>,
    /// Entries dropped for having no date.
    pub undated: usize,
    /// Entries hidden because they are dated after the build time.
    pub scheduled: usize,
}

/// Build the index over `entries` as seen at `now`.
pub fn build_index(
    entries: Vec<Entry>,
    now: DateTime<FixedOffset>,
    slugs: &CategorySlugs,
    recent_count: usize,
) -> SiteIndex {
    let mut undated = 0;
    let mut scheduled = 0;
    let mut visible: Vec<(DateTime<FixedOffset>, Entry)> = Vec::new();

    for entry in entries {
        match entry.published {
            None => {
                debug!(title = %entry.title, source = %entry.source, "skipping undated entry");
                undated += 1;
            }
            Some(published) if published > now => {
                info!(title = %entry.title, %published, "entry scheduled for later, hidden");
                scheduled += 1;
            }
            Some(published) => visible.push((published, entry)),
        }
    }

    visible.sort_by(|(a_ts, a), (b_ts, b)| a_ts.cmp(b_ts).then_with(|| a.title.cmp(&b.title)));

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    let mut indexed = Vec::with_capacity(visible.len());
    for (published, entry) in visible {
        let day = published.date_naive();
        let seen = per_day.entry(day).or_insert(0);
        let anchor = format!("{}{}", day.format("%Y-%m-%d"), anchor_suffix(*seen));
        *seen += 1;

        let labels: Vec<&str> = if entry.categories.is_empty() {
            vec![""]
        } else {
            entry.categories.iter().map(String::as_str).collect()
        };
        let categories = labels
            .into_iter()
            .map(|label| CategoryRef {
                label: label.to_string(),
                slug: slugs.resolve(label),
            })
            .collect();

        indexed.push(IndexedEntry {
            month: MonthKey::of(&published),
            published,
            anchor,
            categories,
            entry,
        });
    }

    let mut months: BTreeMap<MonthKey, Vec<usize>> = BTreeMap::new();
    let mut categories: BTreeMap<String, CategoryGroup> = BTreeMap::new();
    for (idx, e) in indexed.iter().enumerate() {
        months.entry(e.month).or_default().push(idx);
        for cat in &e.categories {
            categories
                .entry(cat.label.clone())
                .or_insert_with(|| CategoryGroup {
                    label: cat.label.clone(),
                    slug: cat.slug.clone(),
                    members: Vec::new(),
                })
                .members
                .push(idx);
        }
    }
    warn_slug_collisions(&categories);

    let recent = (0..indexed.len()).rev().take(recent_count).collect();

    SiteIndex {
        build_time: now,
        entries: indexed,
        months,
        categories,
        recent,
        undated,
        scheduled,
    }
}

/// Letter suffix for the `n`th (0-based) entry of a day: `""`, `A`, …,
/// `Z`, `AA`, `AB`, ….
pub fn anchor_suffix(n: usize) -> String {
    let mut letters = Vec::new();
    let mut rest = n;
    while rest > 0 {
        rest -= 1;
        letters.push(char::from(b'A' + (rest % 26) as u8));
        rest /= 26;
    }
    letters.iter().rev().collect()
}

/// Two category labels that resolve to the same output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    /// Label written first, whose pages are overwritten.
    pub shadowed: String,
    /// Label later in label order, whose pages end up on disk.
    pub winner: String,
}

/// Collisions among `categories`, in label order.
pub fn slug_collisions(categories: &BTreeMap<String, CategoryGroup>) -> Vec<SlugCollision> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut collisions = Vec::new();
    for group in categories.values() {
        if let Some(previous) = owners.insert(&group.slug, &group.label) {
            collisions.push(SlugCollision {
                slug: group.slug.clone(),
                shadowed: previous.to_string(),
                winner: group.label.clone(),
            });
        }
    }
    collisions
}

fn warn_slug_collisions(categories: &BTreeMap<String, CategoryGroup>) {
    for collision in slug_collisions(categories) {
        warn!(
            slug = %collision.slug,
            first = %collision.shadowed,
            second = %collision.winner,
            "two categories share an output directory; the second overwrites the first"
        );
    }
}

/// Split `len` items into pages of `per_page`: `ceil(len / per_page)`
/// contiguous ranges, all full except possibly the last.
pub fn page_ranges(len: usize, per_page: usize) -> Vec<Range<usize>> {
    let per_page = per_page.max(1);
    (0..len)
        .step_by(per_page)
        .map(|start| start..(start + per_page).min(len))
        .collect()
}

impl SiteIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve<'a>(&'a self, indices: impl Iterator<Item = &'a usize>) -> Vec<&'a IndexedEntry> {
        indices.map(|&i| &self.entries[i]).collect()
    }

    /// All visible entries, newest first.
    pub fn entries_desc(&self) -> Vec<&IndexedEntry> {
        self.entries.iter().rev().collect()
    }

    /// Month keys, oldest first.
    pub fn months_ascending(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    /// Entries of one month, newest first. Empty for unknown months.
    pub fn month_entries_desc(&self, key: MonthKey) -> Vec<&IndexedEntry> {
        self.months
            .get(&key)
            .map(|members| self.resolve(members.iter().rev()))
            .unwrap_or_default()
    }

    /// Chronological neighbours of a month: `(older, newer)`.
    pub fn month_neighbors(&self, key: MonthKey) -> (Option<MonthKey>, Option<MonthKey>) {
        let older = self.months.range(..key).next_back().map(|(k, _)| *k);
        let newer = self
            .months
            .range(key..)
            .map(|(k, _)| *k)
            .find(|k| *k != key);
        (older, newer)
    }

    /// The two newest months and the month before them.
    pub fn top_index(&self) -> Option<TopIndex> {
        let mut newest = self.months.keys().rev().copied();
        let first = newest.next()?;
        let months = std::iter::once(first).chain(newest.next()).collect();
        Some(TopIndex {
            months,
            older: newest.next(),
        })
    }

    /// Entries of the top index, newest first.
    pub fn top_entries(&self, top: &TopIndex) -> Vec<&IndexedEntry> {
        top.months
            .iter()
            .flat_map(|key| self.month_entries_desc(*key))
            .collect()
    }

    /// Members of a category, newest first. Empty for unknown labels.
    pub fn category_entries_desc(&self, label: &str) -> Vec<&IndexedEntry> {
        self.categories
            .get(label)
            .map(|group| self.resolve(group.members.iter().rev()))
            .unwrap_or_default()
    }

    /// Category groups by descending member count, then label.
    pub fn categories_by_count(&self) -> Vec<&CategoryGroup> {
        let mut groups: Vec<&CategoryGroup> = self.categories.values().collect();
        groups.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.label.cmp(&b.label)));
        groups
    }

    /// Visible entries grouped by year, newest year first, entries newest first.
    pub fn years_desc(&self) -> Vec<(i32, Vec<&IndexedEntry>)> {
        let mut years: Vec<(i32, Vec<&IndexedEntry>)> = Vec::new();
        for e in self.entries.iter().rev() {
            let year = e.published.year();
            match years.last_mut() {
                Some((y, list)) if *y == year => list.push(e),
                _ => years.push((year, vec![e])),
            }
        }
        years
    }

    /// Months grouped by year for the archive tree, newest first at both levels.
    pub fn month_tree(&self) -> Vec<(i32, Vec<(MonthKey, usize)>)> {
        let mut tree: Vec<(i32, Vec<(MonthKey, usize)>)> = Vec::new();
        for (key, members) in self.months.iter().rev() {
            match tree.last_mut() {
                Some((y, list)) if *y == key.year => list.push((*key, members.len())),
                _ => tree.push((key.year, vec![(*key, members.len())])),
            }
        }
        tree
    }

    /// The newest entries, newest first.
    pub fn recent_entries(&self) -> Vec<&IndexedEntry> {
        self.resolve(self.recent.iter())
    }
}
