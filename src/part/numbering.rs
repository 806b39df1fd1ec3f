//! Per-category number allocation.
//!
//! Numbers are derived from the files already exported: the next number of
//! a category is one past the highest `category_NNNN.svg` in its folder.
//! The state lives for one run only.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::Category;
use crate::debug;

/// `category_NNNN.svg`
static PART_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)_([0-9]+)\.svg$").unwrap());

/// Next free number per category.
#[derive(Debug, Default)]
pub struct Numbering {
    next: FxHashMap<Category, u32>,
    /// Explicit numbers claimed in this run; allocation steps over them.
    reserved: FxHashSet<(Category, u32)>,
}

impl Numbering {
    /// Scan `<root>/<category>/` for every category.
    ///
    /// Missing folders count as empty.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut numbering = Self::default();
        for category in Category::ALL {
            let next = scan_folder(&root.join(category.name()), category)?;
            numbering.next.insert(category, next);
        }
        Ok(numbering)
    }

    /// Number the next auto-numbered part of `category` would get.
    pub fn peek(&self, category: Category) -> u32 {
        let mut number = self.next.get(&category).copied().unwrap_or(0);
        while self.reserved.contains(&(category, number)) {
            number += 1;
        }
        number
    }

    /// Take the next free number of `category`.
    pub fn allocate(&mut self, category: Category) -> u32 {
        let number = self.peek(category);
        self.next.insert(category, number + 1);
        number
    }

    /// Claim an explicit number so allocation never hands it out.
    ///
    /// Returns `false` when the number was already claimed in this run.
    pub fn reserve(&mut self, category: Category, number: u32) -> bool {
        self.reserved.insert((category, number))
    }
}

/// Highest `category_NNNN.svg` number in `dir` plus one, or 0.
fn scan_folder(dir: &Path, category: Category) -> Result<u32> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut next = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("Invalid entry in {}", dir.display()))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        match parse_part_file(file_name, category) {
            Some(number) => next = next.max(number.saturating_add(1)),
            None if file_name.ends_with(".svg") => {
                debug!("numbering"; "ignoring {}/{}", category, file_name);
            }
            None => {}
        }
    }
    Ok(next)
}

fn parse_part_file(file_name: &str, category: Category) -> Option<u32> {
    let caps = PART_FILE.captures(file_name)?;
    if &caps[1] != category.name() {
        return None;
    }
    caps[2].parse().ok()
}
