use std::rc::Rc;

/// Persistent singly-linked list, newest element first.
///
/// `cons` shares the existing list as its tail, so extending a scope for a
/// nested binder is O(1) and leaves the shared tail untouched.
#[derive(Debug)]
pub struct Seq<T>(Option<Rc<Node<T>>>);

#[derive(Debug)]
struct Node<T> {
    head: T,
    tail: Seq<T>,
    len: usize,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Seq(self.0.clone())
    }
}

impl<T> Default for Seq<T> {
    fn default() -> Self {
        Seq(None)
    }
}

impl<T> Seq<T> {
    pub fn nil() -> Self {
        Seq(None)
    }

    pub fn cons(&self, head: T) -> Self {
        Seq(Some(Rc::new(Node {
            head,
            tail: self.clone(),
            len: self.len() + 1,
        })))
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |node| node.len)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn split_first(&self) -> Option<(&T, &Seq<T>)> {
        self.0.as_deref().map(|node| (&node.head, &node.tail))
    }

    pub fn lookup(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        self.iter().nth(index)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.0.as_deref(),
        }
    }

    /// Whether both lists are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.tail.0.as_deref();
        Some(&node.head)
    }
}

impl<'a, T> IntoIterator for &'a Seq<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects newest-first: the first item yielded ends up at index 0.
impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Seq::nil(), |tail, head| tail.cons(head))
    }
}
