//! Page list and per-page records.
//!
//! A page is spread over three keys with different write rules:
//! - `pages:list` holds membership and order. Only create and delete touch it,
//!   always as read-modify-write of the whole list.
//! - `note:{id}` holds content. Save overwrites it without consulting the list.
//! - `title:{id}` is written once by create and removed by delete.
//!
//! Nothing is rolled back if a later write in the same operation fails, and two
//! concurrent list updates can lose one of them. Readers therefore tolerate
//! listed ids with no content and content keys with no list entry.

use super::{KvStore, StoreError};
use crate::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The landing page. Always listed, never deletable.
pub const DEFAULT_PAGE_ID: &str = "page1";

/// Titles are cut to this many characters after trimming.
pub const MAX_TITLE_CHARS: usize = 20;

const PAGES_LIST_KEY: &str = "pages:list";
const PAGE_ID_PREFIX: &str = "page_";

fn content_key(id: &str) -> String {
    format!("note:{}", id)
}

fn title_key(id: &str) -> String {
    format!("title:{}", id)
}

/// Ordered, duplicate-free list of page ids.
///
/// Always contains [`DEFAULT_PAGE_ID`]. The comma-joined form exists only at
/// the store boundary (`parse` / `to_stored`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageList {
    ids: Vec<String>,
}

impl Default for PageList {
    fn default() -> Self {
        Self {
            ids: vec![DEFAULT_PAGE_ID.to_string()],
        }
    }
}

impl PageList {
    /// Decode the stored comma-joined value.
    ///
    /// Blank tokens and repeats are dropped. If the default page went missing
    /// from a hand-edited value it is put back at the front.
    pub fn parse(stored: &str) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for token in stored.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !ids.iter().any(|id| id == token) {
                ids.push(token.to_string());
            }
        }
        if !ids.iter().any(|id| id == DEFAULT_PAGE_ID) {
            ids.insert(0, DEFAULT_PAGE_ID.to_string());
        }
        Self { ids }
    }

    pub fn to_stored(&self) -> String {
        self.ids.join(",")
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|p| p == id)
    }

    /// Append an id. Returns false if it was already listed.
    pub fn push(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id. Returns false if it was not listed or is the default page.
    pub fn remove(&mut self, id: &str) -> bool {
        if id == DEFAULT_PAGE_ID {
            return false;
        }
        match self.ids.iter().position(|p| p == id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ids
    }
}

/// A page assembled from its content and title keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Trim a requested page name and cut it to [`MAX_TITLE_CHARS`].
///
/// Returns `None` when nothing is left.
pub fn normalize_title(name: &str) -> Option<String> {
    let title: String = name.trim().chars().take(MAX_TITLE_CHARS).collect();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Build a fresh id of the form `page_{unix millis}`.
///
/// Uniqueness rests on the clock. An id already present in `existing` (two
/// creates in the same millisecond) gets a random suffix; a backwards clock
/// step can still reproduce an id that was deleted earlier.
fn new_page_id(existing: &PageList) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let id = format!("{}{}", PAGE_ID_PREFIX, millis);
    if existing.contains(&id) {
        format!("{}_{}", id, nanoid::nanoid!(6))
    } else {
        id
    }
}

/// Page operations over a [`KvStore`].
#[derive(Clone)]
pub struct PageStore {
    store: Arc<dyn KvStore>,
}

impl PageStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Read the page list, falling back to `[page1]` when unset.
    pub async fn list_pages(&self) -> Result<PageList, StoreError> {
        Ok(match self.store.get(PAGES_LIST_KEY).await? {
            Some(stored) => PageList::parse(&stored),
            None => PageList::default(),
        })
    }

    async fn save_list(&self, list: &PageList) -> Result<(), StoreError> {
        self.store.put(PAGES_LIST_KEY, &list.to_stored()).await
    }

    /// Page content, or an empty string when the key is absent.
    pub async fn get_page(&self, id: &str) -> Result<String, StoreError> {
        Ok(self.store.get(&content_key(id)).await?.unwrap_or_default())
    }

    /// Page title, or the id itself when no title is stored.
    pub async fn get_title(&self, id: &str) -> Result<String, StoreError> {
        Ok(self
            .store
            .get(&title_key(id))
            .await?
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| id.to_string()))
    }

    pub async fn page(&self, id: &str) -> Result<Page, StoreError> {
        let content = self.get_page(id).await?;
        let title = self.get_title(id).await?;
        Ok(Page {
            id: id.to_string(),
            title,
            content,
        })
    }

    /// Create an empty page titled `name` and append it to the list.
    ///
    /// Writes the list first, then content, then title.
    pub async fn create_page(&self, name: &str) -> Result<String, AppError> {
        let title = normalize_title(name)
            .ok_or_else(|| AppError::BadRequest("Page name is required".to_string()))?;

        let mut pages = self.list_pages().await?;
        let id = new_page_id(&pages);
        pages.push(id.clone());
        self.save_list(&pages).await?;
        self.store.put(&content_key(&id), "").await?;
        self.store.put(&title_key(&id), &title).await?;

        Ok(id)
    }

    /// Remove a page from the list and delete its content and title keys.
    ///
    /// Unknown ids are not an error; their keys are deleted anyway so orphaned
    /// content can be cleaned up.
    pub async fn delete_page(&self, id: &str) -> Result<(), AppError> {
        if id == DEFAULT_PAGE_ID {
            return Err(AppError::Protected(
                "Cannot delete default page".to_string(),
            ));
        }

        let mut pages = self.list_pages().await?;
        if pages.remove(id) {
            self.save_list(&pages).await?;
        }
        self.store.delete(&content_key(id)).await?;
        self.store.delete(&title_key(id)).await?;

        Ok(())
    }

    /// Overwrite page content. The id does not have to be listed and the
    /// title is left untouched.
    pub async fn save_page(&self, id: &str, content: &str) -> Result<(), StoreError> {
        self.store.put(&content_key(id), content).await
    }
}
