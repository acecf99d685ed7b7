use crate::record::Taggable;
use crate::types::{Tag, TagFrequency};
use std::collections::{BTreeMap, BTreeSet};

/// Tag frequency tables over a set of records.
#[derive(Debug, Default)]
pub struct TagAggregator {
    counts: BTreeMap<Tag, usize>,
    records: usize,
}

impl TagAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record. A tag repeated within the record counts once.
    pub fn add<R: Taggable + ?Sized>(&mut self, record: &R) {
        let distinct: BTreeSet<&Tag> = record.tag_set().iter().collect();
        for tag in distinct {
            *self.counts.entry(tag.clone()).or_insert(0) += 1;
        }
        self.records += 1;
    }

    pub fn extend<'a, R, I>(&mut self, records: I)
    where
        R: Taggable + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        for record in records {
            self.add(record);
        }
    }

    /// Number of records seen so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Distinct tags seen, ascending.
    pub fn tag_names(&self) -> Vec<Tag> {
        self.counts.keys().cloned().collect()
    }

    /// Frequency table sorted by tag name.
    pub fn finish(self) -> Vec<TagFrequency> {
        self.counts
            .into_iter()
            .map(|(name, count)| TagFrequency { name, count })
            .collect()
    }
}

/// Frequency table for `records` in one pass.
pub fn tag_frequencies<'a, R, I>(records: I) -> Vec<TagFrequency>
where
    R: Taggable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut aggregator = TagAggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}
