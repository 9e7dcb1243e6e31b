/// Label frequency count that remembers first-insertion order.
///
/// Ties in [`LabelTally::leader`] go to the label inserted first, so the
/// result never depends on hashing or alphabetical order. Emotion
/// vocabularies are tiny, so a linear scan over a `Vec` is enough.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTally {
    entries: Vec<(String, u64)>,
}

impl LabelTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `label`, inserting it at the end if new.
    pub fn increment(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn count(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, c)| *c)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// The label with the highest count; earliest inserted wins ties.
    pub fn leader(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (label, count) in &self.entries {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((label.as_str(), *count));
            }
        }
        best
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> FromIterator<&'a str> for LabelTally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = LabelTally::new();
        for label in iter {
            tally.increment(label);
        }
        tally
    }
}
