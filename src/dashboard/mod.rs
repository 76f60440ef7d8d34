//! Keyword tagging and the dashboard view model.
//!
//! [`render`] is pure: it turns a snapshot and a [`Vocabulary`] into a
//! [`Dashboard`] with one [`Row`] per entry and one [`Control`] per keyword.
//! Turning that into markup is [`html`]'s job.
//!
//! The filter rule the page implements in JavaScript is [`Filter::shows`];
//! the markup uses it for the initial visibility of each row, and the tests
//! use it to check button clicks without a browser.

pub mod html;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::source::FeedEntry;

/// Ordered, de-duplicated keywords plus the (inert) seeder rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    keywords: Vec<String>,
    rules: BTreeMap<String, u32>,
}

impl Vocabulary {
    /// Keywords are trimmed; blank ones and later duplicates are dropped.
    /// Order is otherwise kept.
    pub fn new(keywords: Vec<String>, rules: BTreeMap<String, u32>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.trim();
            if !kw.is_empty() && !unique.iter().any(|u| u == kw) {
                unique.push(kw.to_string());
            }
        }
        Self {
            keywords: unique,
            rules,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Minimum seeder counts per keyword.
    ///
    /// Carried through to rendering but not consulted: whether a rule should
    /// suppress a tag, hide a row, or only highlight is still undecided.
    pub fn rules(&self) -> &BTreeMap<String, u32> {
        &self.rules
    }

    /// Keywords whose lowercase form occurs in the lowercase `title`, in
    /// vocabulary order.
    pub fn tags(&self, title: &str) -> Vec<String> {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .filter(|kw| title.contains(&kw.to_lowercase()))
            .cloned()
            .collect()
    }
}

/// Which rows a control shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Keyword(String),
}

impl Filter {
    pub fn shows(&self, row: &Row) -> bool {
        match self {
            Filter::All => true,
            Filter::Keyword(kw) => row.tags.iter().any(|t| t == kw),
        }
    }

    /// Value of the control's `data-kw` attribute. `All` has none; its
    /// button is marked `data-all` instead.
    pub fn token(&self) -> Option<String> {
        match self {
            Filter::All => None,
            Filter::Keyword(kw) => Some(tag_token(kw)),
        }
    }
}

/// One filter button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub filter: Filter,
    pub active: bool,
    /// The keyword's seeder rule, exposed as `data-min-seeders`. The page
    /// script does not read it.
    pub min_seeders: Option<u32>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    /// Displayed value and numeric sort key both.
    pub seeders: u32,
    pub size: String,
    pub link: String,
    /// Matched keywords, in vocabulary order.
    pub tags: Vec<String>,
}

impl Row {
    /// Space-joined tag tokens for the `data-tags` attribute.
    pub fn tag_list(&self) -> String {
        self.tags
            .iter()
            .map(|t| tag_token(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything the page shows, before it becomes markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub controls: Vec<Control>,
    pub rows: Vec<Row>,
}

/// Build the view model for `snapshot`, dated `date`.
pub fn render(snapshot: &[FeedEntry], vocabulary: &Vocabulary, date: NaiveDate) -> Dashboard {
    let mut controls = vec![Control {
        label: "ALL".to_string(),
        filter: Filter::All,
        active: true,
        min_seeders: None,
    }];
    controls.extend(vocabulary.keywords().iter().map(|kw| Control {
        label: kw.clone(),
        filter: Filter::Keyword(kw.clone()),
        active: false,
        min_seeders: vocabulary.rules().get(kw).copied(),
    }));

    let rows = snapshot
        .iter()
        .map(|entry| Row {
            title: entry.title.clone(),
            seeders: entry.seeders,
            size: entry.size.clone(),
            link: entry.link.clone(),
            tags: vocabulary.tags(&entry.title),
        })
        .collect();

    Dashboard {
        date,
        controls,
        rows,
    }
}

impl Dashboard {
    /// Filter of the active control, `ALL` if somehow none is.
    pub fn active_filter(&self) -> &Filter {
        self.controls
            .iter()
            .find(|c| c.active)
            .map(|c| &c.filter)
            .unwrap_or(&Filter::All)
    }
}

#[cfg(test)]
impl Dashboard {
    /// Make the control at `index` the only active one, as clicking it in
    /// the page does. Returns `false` if there is no such control.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.controls.len() {
            return false;
        }
        for (i, control) in self.controls.iter_mut().enumerate() {
            control.active = i == index;
        }
        true
    }

    /// Rows shown under the active control.
    pub fn visible_rows(&self) -> Vec<&Row> {
        let filter = self.active_filter();
        self.rows.iter().filter(|row| filter.shows(row)).collect()
    }
}

/// Keywords go into a whitespace-separated attribute, so internal whitespace
/// becomes `_`.
fn tag_token(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
