//! リンク管理
//!
//! ブックマークの追加・編集・削除。一意性はインポート時のマージでのみ扱う。

use crate::error::{Error, Result};
use crate::store::CollectionStore;
use crate::types::Link;
use regex::Regex;

/// 名前とURLを検証して `Link` を作る
pub fn validate_link(name: &str, url: &str) -> Result<Link> {
    lazy_static::lazy_static! {
        // scheme://host... 形式の絶対URL
        static ref URL_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+\S*$").unwrap();
    }

    let name = name.trim();
    let url = url.trim();

    if name.is_empty() || url.is_empty() {
        return Err(Error::InvalidLink("name and URL are required".into()));
    }
    if !URL_RE.is_match(url) {
        return Err(Error::InvalidLink(format!("not an absolute URL: {}", url)));
    }

    Ok(Link::new(name, url))
}

impl CollectionStore {
    pub fn add_link(&mut self, name: &str, url: &str) -> Result<Link> {
        let link = validate_link(name, url)?;
        let mut next = self.links().to_vec();
        next.push(link.clone());
        self.replace_links(next);
        Ok(link)
    }

    pub fn edit_link(&mut self, index: usize, name: &str, url: &str) -> Result<Link> {
        if index >= self.links().len() {
            return Err(Error::LinkNotFound(index));
        }
        let link = validate_link(name, url)?;
        let mut next = self.links().to_vec();
        next[index] = link.clone();
        self.replace_links(next);
        Ok(link)
    }

    pub fn delete_link(&mut self, index: usize) -> Result<Link> {
        if index >= self.links().len() {
            return Err(Error::LinkNotFound(index));
        }
        let mut next = self.links().to_vec();
        let removed = next.remove(index);
        self.replace_links(next);
        Ok(removed)
    }
}
