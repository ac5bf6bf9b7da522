use crate::{
    error::LedgerError,
    record::{Fields, Record},
};

type ResultCache<T> = Result<T, LedgerError>;

/// Ordered mirror of one collection's confirmed remote state.
///
/// Fetched records keep the remote order, created records are appended. The
/// cache is only ever mutated after the store confirmed the change.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordCache {
    records: Vec<Record>,
}

impl RecordCache {
    /// Replaces the whole sequence.
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn append(&mut self, record: Record) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Replaces the fields of the record at `index`, keeping its identifier.
    pub fn replace_at(&mut self, index: usize, fields: Fields) -> ResultCache<&Record> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        record.fields = fields;
        Ok(&*record)
    }

    /// Removes the record at `index`, shifting later records down.
    pub fn remove_at(&mut self, index: usize) -> ResultCache<Record> {
        self.check(index)?;
        Ok(self.records.remove(index))
    }

    pub fn get(&self, index: usize) -> ResultCache<&Record> {
        self.check(index)?;
        Ok(&self.records[index])
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn check(&self, index: usize) -> ResultCache<()> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(LedgerError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DocumentId, fields};

    fn record(id: &str, name: &str) -> Record {
        Record::new(DocumentId::new(id).unwrap(), fields([("name", name)]))
    }

    fn names(cache: &RecordCache) -> Vec<String> {
        cache.all().iter().map(|r| r.text("name")).collect()
    }

    #[test]
    fn load_replaces_everything() {
        let mut cache = RecordCache::default();
        cache.append(record("a", "A"));
        cache.load(vec![record("b", "B"), record("c", "C")]);
        assert_eq!(names(&cache), vec!["B", "C"]);
    }

    #[test]
    fn append_returns_the_new_index() {
        let mut cache = RecordCache::default();
        assert_eq!(cache.append(record("a", "A")), 0);
        assert_eq!(cache.append(record("b", "B")), 1);
    }

    #[test]
    fn replace_at_keeps_identifier_and_order() {
        let mut cache = RecordCache::default();
        cache.load(vec![record("a", "A"), record("b", "B"), record("c", "C")]);

        let replaced = cache.replace_at(1, fields([("name", "B2")])).unwrap();
        assert_eq!(replaced.id, DocumentId::new("b"));

        assert_eq!(names(&cache), vec!["A", "B2", "C"]);
    }

    #[test]
    fn remove_at_shifts_later_records() {
        let mut cache = RecordCache::default();
        cache.load(vec![record("a", "A"), record("b", "B"), record("c", "C")]);

        let removed = cache.remove_at(0).unwrap();
        assert_eq!(removed.text("name"), "A");
        assert_eq!(names(&cache), vec!["B", "C"]);
        assert_eq!(cache.get(0).unwrap().id, DocumentId::new("b"));
    }

    #[test]
    fn out_of_range_is_an_error() {
        let mut cache = RecordCache::default();
        cache.append(record("a", "A"));
        assert_eq!(
            cache.remove_at(3).unwrap_err(),
            LedgerError::IndexOutOfRange { index: 3, len: 1 }
        );
        assert!(cache.replace_at(1, Fields::new()).is_err());
        assert_eq!(cache.len(), 1);
    }
}
