//! Lithology registry: categorical ids to colors and names.
//!
//! Ids seen for the first time are registered explicitly through
//! [`LithologyRegistry::get_or_insert`] with a color from the host's
//! [`DefaultColorSource`]. Every mutation bumps [`LithologyRegistry::version`].

use raster_common::{Color, DefaultColorSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved id for NaN categories. Always rendered transparent.
pub const INVALID_LITHOLOGY_ID: i32 = i32::MIN;

/// Map a categorical sample value to its lithology id.
pub fn lithology_id(category: f64) -> i32 {
    if category.is_nan() {
        return INVALID_LITHOLOGY_ID;
    }
    // Saturating cast; i32::MIN itself is reserved for NaN.
    (category.floor() as i32).max(INVALID_LITHOLOGY_ID + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LithologyItem {
    pub id: i32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub name: String,
}

impl LithologyItem {
    pub fn new(id: i32, color: Color, name: impl Into<String>) -> Self {
        Self {
            id,
            color,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LithologyRegistry {
    items: BTreeMap<i32, LithologyItem>,
    version: u64,
}

impl LithologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = LithologyItem>) -> Self {
        let mut registry = Self::new();
        for item in items {
            registry.insert(item);
        }
        registry
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: LithologyItem) {
        self.items.insert(item.id, item);
        self.version += 1;
    }

    /// Returns false if `id` is not registered.
    pub fn set_color(&mut self, id: i32, color: Color) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.color = color;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: i32) -> Option<&LithologyItem> {
        self.items.get(&id)
    }

    /// Fetch `id`, registering it with a default color and its numeric name if absent.
    ///
    /// The item is read-only; edits go through [`insert`](Self::insert) or
    /// [`set_color`](Self::set_color) so the version tracks them.
    pub fn get_or_insert(
        &mut self,
        id: i32,
        defaults: &mut dyn DefaultColorSource,
    ) -> &LithologyItem {
        self.entry(id, defaults)
    }

    fn entry(&mut self, id: i32, defaults: &mut dyn DefaultColorSource) -> &mut LithologyItem {
        if !self.items.contains_key(&id) {
            self.version += 1;
        }
        self.items
            .entry(id)
            .or_insert_with(|| LithologyItem::new(id, defaults.default_color(), id.to_string()))
    }

    /// Color for `id`, registering unknown ids and replacing an `Automatic`
    /// color with a host default the first time it is seen.
    pub fn resolve_color(&mut self, id: i32, defaults: &mut dyn DefaultColorSource) -> Color {
        if id == INVALID_LITHOLOGY_ID {
            return Color::TRANSPARENT;
        }
        let item = self.entry(id, defaults);
        if item.color.is_automatic() {
            item.color = defaults.default_color();
            let color = item.color;
            self.version += 1;
            return color;
        }
        item.color
    }

    /// Display name, falling back to the numeric id.
    pub fn name_of(&self, id: i32) -> String {
        match self.items.get(&id) {
            Some(item) if !item.name.is_empty() => item.name.clone(),
            _ => id.to_string(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LithologyItem> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lithology_id_floors() {
        assert_eq!(lithology_id(3.9), 3);
        assert_eq!(lithology_id(-0.5), -1);
        assert_eq!(lithology_id(f64::NAN), INVALID_LITHOLOGY_ID);
        assert_eq!(lithology_id(f64::NEG_INFINITY), INVALID_LITHOLOGY_ID + 1);
    }

    #[test]
    fn test_unknown_id_is_registered_once() {
        let mut registry = LithologyRegistry::new();
        let mut calls = 0;
        let mut defaults = || {
            calls += 1;
            Color::rgb(1, 2, 3)
        };

        assert_eq!(registry.resolve_color(7, &mut defaults), Color::rgb(1, 2, 3));
        assert_eq!(registry.resolve_color(7, &mut defaults), Color::rgb(1, 2, 3));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name_of(7), "7");
        drop(defaults);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_automatic_color_replaced_on_first_resolve() {
        let mut registry =
            LithologyRegistry::from_items([LithologyItem::new(2, Color::Automatic, "Shale")]);
        let before = registry.version();
        let mut defaults = || Color::rgb(9, 9, 9);

        assert_eq!(registry.resolve_color(2, &mut defaults), Color::rgb(9, 9, 9));
        assert_eq!(registry.get(2).map(|i| i.color), Some(Color::rgb(9, 9, 9)));
        assert!(registry.version() > before);
        assert_eq!(registry.name_of(2), "Shale");
    }

    #[test]
    fn test_invalid_id_is_transparent_and_not_registered() {
        let mut registry = LithologyRegistry::new();
        let mut defaults = || Color::rgb(9, 9, 9);
        assert_eq!(
            registry.resolve_color(INVALID_LITHOLOGY_ID, &mut defaults),
            Color::TRANSPARENT
        );
        assert!(registry.is_empty());
    }
}
