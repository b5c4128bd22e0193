use shared::error::EmptyCollection;

/// Clamped, non-wrapping position over an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Carousel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_item(&self) -> Result<&T, EmptyCollection> {
        self.items.get(self.index).ok_or(EmptyCollection)
    }

    /// Moves to `index`, clamping into `0..len`. A no-op on an empty carousel.
    pub fn go_to(&mut self, index: isize) {
        let last = self.items.len().saturating_sub(1);
        self.index = if index <= 0 {
            0
        } else {
            (index as usize).min(last)
        };
    }

    pub fn next(&mut self) {
        self.go_to(self.index as isize + 1);
    }

    pub fn prev(&mut self) {
        self.go_to(self.index as isize - 1);
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.items.len()
    }

    /// Extends the addressable range without moving the current position.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the list, keeping the position clamped to the new bounds.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.go_to(self.index as isize);
    }
}
