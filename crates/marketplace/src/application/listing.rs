/// A filtered view over a snapshot of catalog records.
///
/// Nothing is filtered until the listing is iterated, and it can be
/// iterated any number of times with the same result.
pub struct Listing<T> {
    records: Vec<T>,
    keep: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Listing<T> {
    pub fn new(records: Vec<T>, keep: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            records,
            keep: Box::new(keep),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter().filter(move |r| (self.keep)(*r))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<T: Clone> Listing<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> std::fmt::Debug for Listing<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listing")
            .field("snapshot", &self.records.len())
            .finish()
    }
}
