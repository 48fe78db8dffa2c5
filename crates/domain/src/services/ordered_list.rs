//! Order-preserving list editing.
//!
//! Every editable collection (menu, staff, gallery, FAQ, hero images) is an
//! [`OrderedList`] of records implementing [`ListRecord`]. A [`ListEditor`]
//! applies the four admin operations (append, update, remove, reorder) and
//! keeps each record's `order` equal to its position.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::image_attachment::ImageDetacher;

/// A record that lives in an ordered, id-addressed list.
pub trait ListRecord: Clone + PartialEq + Send + Sync + 'static {
    /// Single-field change understood by [`ListRecord::apply`].
    type Field;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Records without a stored position ignore this.
    fn set_order(&mut self, _order: i32) {}

    fn apply(&mut self, field: Self::Field);

    /// Uploaded pictures owned by this record, released when it is removed.
    fn image_urls(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Default record used by "add" when the admin supplies none.
    fn template() -> Self;
}

/// Moves the element at `from` so that it ends up at index `to`, shifting
/// the elements in between. Returns false (and leaves the list alone) when
/// either index is out of range or they are equal.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// An ordered collection of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedList<T>(Vec<T>);

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> OrderedList<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T: ListRecord> OrderedList<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.0.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.0.iter_mut().find(|r| r.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Adds a record at the end with its position as `order`.
    pub fn push(&mut self, mut record: T) {
        record.set_order(self.0.len() as i32);
        self.0.push(record);
    }

    /// Sets `order = index` on every record.
    pub fn renumber(&mut self) {
        for (index, record) in self.0.iter_mut().enumerate() {
            record.set_order(index as i32);
        }
    }
}

impl<T> From<Vec<T>> for OrderedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Applies admin edits to one list.
pub struct ListEditor<'a, T: ListRecord> {
    list: &'a mut OrderedList<T>,
    detacher: &'a ImageDetacher,
}

impl<'a, T: ListRecord> ListEditor<'a, T> {
    pub fn new(list: &'a mut OrderedList<T>, detacher: &'a ImageDetacher) -> Self {
        Self { list, detacher }
    }

    /// Appends a record (the type's template when `record` is `None`) under
    /// a fresh id and returns that id.
    pub fn append(&mut self, record: Option<T>) -> String {
        let mut record = record.unwrap_or_else(T::template);
        let id = Uuid::new_v4().to_string();
        record.set_id(id.clone());
        self.list.push(record);
        id
    }

    /// Replaces one field of the record with `id`. Returns true when the
    /// record exists and its value changed.
    pub fn update(&mut self, id: &str, field: T::Field) -> bool {
        let Some(record) = self.list.get_mut(id) else {
            return false;
        };
        let before = record.clone();
        record.apply(field);
        *record != before
    }

    /// Removes the record with `id` and releases the pictures it owned.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.list.position(id)?;
        let removed = self.list.0.remove(index);
        self.list.renumber();

        for url in removed.image_urls() {
            self.detacher.detach(url);
        }
        Some(removed)
    }

    /// Moves the record `from_id` to the position currently held by `to_id`.
    /// Nothing happens when the drop target is missing, equal to the dragged
    /// record, or either id is unknown.
    pub fn reorder(&mut self, from_id: &str, to_id: Option<&str>) -> bool {
        let Some(to_id) = to_id else {
            return false;
        };
        if from_id == to_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.list.position(from_id), self.list.position(to_id))
        else {
            return false;
        };

        let moved = move_item(&mut self.list.0, from, to);
        if moved {
            self.list.renumber();
        }
        moved
    }
}
