use crate::support::Arena;
use rustc_hash::{FxBuildHasher, FxHashMap};

crate::define_id!(pub NameID);

/// Deduplicating string repository.
/// Two equal strings intern to the same `NameID`, so identifier
/// comparison everywhere else is plain id equality.
pub struct InternPool<'intern> {
    arena: Arena<'intern>,
    values: Vec<&'intern str>,
    intern_map: FxHashMap<&'intern str, NameID>,
}

impl<'intern> InternPool<'intern> {
    pub fn new(cap: usize) -> InternPool<'intern> {
        InternPool {
            arena: Arena::new(),
            values: Vec::with_capacity(cap),
            intern_map: FxHashMap::with_capacity_and_hasher(cap, FxBuildHasher),
        }
    }

    pub fn intern(&mut self, string: &str) -> NameID {
        if let Some(id) = self.intern_map.get(string).copied() {
            return id;
        }
        let id = NameID::new(self.values.len());
        let str = self.arena.alloc_str(string);
        self.values.push(str);
        self.intern_map.insert(str, id);
        id
    }

    pub fn intern_concat(&mut self, a: NameID, b: NameID) -> NameID {
        let mut joined = String::with_capacity(self.get(a).len() + self.get(b).len());
        joined.push_str(self.get(a));
        joined.push_str(self.get(b));
        self.intern(&joined)
    }

    pub fn get(&self, id: NameID) -> &'intern str {
        self.values[id.index()]
    }
    pub fn get_all(&self) -> &[&'intern str] {
        &self.values
    }
    pub fn get_id(&self, string: &str) -> Option<NameID> {
        self.intern_map.get(string).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::InternPool;

    #[test]
    fn intern_identity() {
        let mut pool = InternPool::new(0);
        let a = pool.intern("WriteString");
        let b = pool.intern("WriteLn");
        let c = pool.intern("WriteString");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.get(a), "WriteString");
        assert_eq!(pool.get_id("WriteLn"), Some(b));
        assert_eq!(pool.get_id("Write"), None);
    }

    #[test]
    fn intern_concat_dedups() {
        let mut pool = InternPool::new(0);
        let a = pool.intern("In");
        let b = pool.intern("Out");
        let ab = pool.intern_concat(a, b);
        assert_eq!(pool.get(ab), "InOut");
        assert_eq!(pool.intern("InOut"), ab);
    }
}
