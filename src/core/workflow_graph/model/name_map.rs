use indexmap::IndexMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Entities addressed by a unique name inside a workflow.
pub trait Named {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

/// Insertion-ordered, name-keyed collection of places or transitions.
///
/// Inserting an entry whose name already exists replaces it. When the
/// collection is built from raw input (a JSON list, or an object whose bodies
/// carry their own `name`), names that collided are remembered in
/// [`NameMap::duplicates`] so the validator can still report them. Any later
/// edit that settles a name (insert, remove, rename) clears its record.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMap<T> {
    entries: IndexMap<String, T>,
    duplicates: Vec<String>,
}

impl<T> Default for NameMap<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            duplicates: Vec::new(),
        }
    }
}

impl<T: Named> NameMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw entries, recording every name seen more than once.
    pub fn from_entries(items: impl IntoIterator<Item = T>) -> Self {
        let mut map = Self::new();
        for item in items {
            map.insert_recording(item);
        }
        map
    }

    /// Insert or overwrite by name, returning the replaced entry.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let name = item.name().to_string();
        self.settle(&name);
        self.entries.insert(name, item)
    }

    fn insert_recording(&mut self, item: T) {
        let name = item.name().to_string();
        if self.entries.contains_key(&name) && !self.duplicates.contains(&name) {
            self.duplicates.push(name.clone());
        }
        self.entries.insert(name, item);
    }

    fn settle(&mut self, name: &str) {
        self.duplicates.retain(|duplicate| duplicate != name);
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.settle(name);
        self.entries.shift_remove(name)
    }

    /// Re-key an entry in place, keeping its position. An existing entry under
    /// `to` is replaced.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        let Some(index) = self.entries.get_index_of(from) else {
            return false;
        };
        self.settle(from);
        self.settle(to);
        if from == to {
            return true;
        }
        self.entries.shift_remove(to);
        let index = self.entries.get_index_of(from).unwrap_or(index);
        let Some((_, mut item)) = self.entries.shift_remove_index(index) else {
            return false;
        };
        item.set_name(to.to_string());
        let (inserted, _) = self.entries.insert_full(to.to_string(), item);
        self.entries.move_index(inserted, index);
        true
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Names that appeared more than once in the raw input this map was built from.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

impl<T: Named> FromIterator<T> for NameMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<T: Serialize> Serialize for NameMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}

impl<'de, T> Deserialize<'de> for NameMap<T>
where
    T: Named + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NameMapVisitor(PhantomData))
    }
}

struct NameMapVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for NameMapVisitor<T>
where
    T: Named + Deserialize<'de>,
{
    type Value = NameMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map keyed by name or a list of named entries")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut map = NameMap::new();
        while let Some(item) = seq.next_element::<T>()? {
            map.insert_recording(item);
        }
        Ok(map)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = NameMap::new();
        while let Some((key, mut item)) = access.next_entry::<String, T>()? {
            if item.name().is_empty() {
                item.set_name(key);
            }
            map.insert_recording(item);
        }
        Ok(map)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(NameMap::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(NameMap::new())
    }
}
