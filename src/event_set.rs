use{
    rand::Rng,
    std::collections::HashMap,
    std::hash::Hash,
    thiserror::Error
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventSetError{
    #[error("cannot pick from an empty event set")]
    Empty,
    #[error("item is not a member of the event set")]
    NotFound,
}

/// Set of pending events (infected nodes, or infectious IS links) with O(1)
/// insertion, removal and uniform random choice.
///
/// The members live in a dense `Vec` so a uniform index is a uniform member;
/// a position map makes removal a swap-with-last plus truncate, so no
/// operation ever scans.
#[derive(Clone, Debug)]
pub struct EventSet<T>{
    items: Vec<T>,
    positions: HashMap<T, usize>,
}

impl<T> Default for EventSet<T>
where T: Copy + Eq + Hash
{
    fn default() -> Self{
        Self::new()
    }
}

impl<T> EventSet<T>
where T: Copy + Eq + Hash
{
    pub fn new() -> Self{
        Self{
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self{
        Self{
            items: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize{
        self.items.len()
    }

    pub fn is_empty(&self) -> bool{
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool{
        self.positions.contains_key(item)
    }

    /// Inserts `item`. A no-op if it is already a member.
    pub fn add(&mut self, item: T) -> bool{
        if self.contains(&item){
            return false;
        }
        self.positions.insert(item, self.items.len());
        self.items.push(item);
        true
    }

    /// Removes `item` by swapping the last member into its slot.
    pub fn remove(&mut self, item: &T) -> Result<(), EventSetError>{
        let position = self.positions
            .remove(item)
            .ok_or(EventSetError::NotFound)?;
        let last = self.items.pop()
            .ok_or(EventSetError::NotFound)?;
        if position != self.items.len(){
            self.items[position] = last;
            self.positions.insert(last, position);
        }
        Ok(())
    }

    /// Uniform random member, set unchanged.
    pub fn choose_uniform<R: Rng>(&self, rng: &mut R) -> Result<T, EventSetError>{
        if self.items.is_empty(){
            return Err(EventSetError::Empty);
        }
        let index = rng.gen_range(0..self.items.len());
        Ok(self.items[index])
    }

    /// Uniformly chooses a member and removes it.
    pub fn remove_random<R: Rng>(&mut self, rng: &mut R) -> Result<T, EventSetError>{
        let choice = self.choose_uniform(rng)?;
        self.remove(&choice)?;
        Ok(choice)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T>{
        self.items.iter()
    }
}

#[cfg(test)]
mod tests{
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn add_remove_size(){
        let mut set = EventSet::new();
        assert!(set.add(3_u32));
        assert!(set.add(7));
        assert!(set.add(11));
        // duplicate insertion is a no-op
        assert!(!set.add(7));
        assert_eq!(set.len(), 3);

        set.remove(&7).unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&7));
        assert!(set.contains(&3));
        assert!(set.contains(&11));
    }

    #[test]
    fn remove_absent_fails(){
        let mut set = EventSet::new();
        set.add(1_u32);
        assert_eq!(set.remove(&2), Err(EventSetError::NotFound));
        set.remove(&1).unwrap();
        assert_eq!(set.remove(&1), Err(EventSetError::NotFound));
    }

    #[test]
    fn choose_from_empty_fails(){
        let mut rng = Pcg64::seed_from_u64(0);
        let set: EventSet<u32> = EventSet::new();
        assert_eq!(set.choose_uniform(&mut rng), Err(EventSetError::Empty));
    }

    #[test]
    fn remove_random_drains_all_members(){
        let mut rng = Pcg64::seed_from_u64(42);
        let mut set = EventSet::new();
        for i in 0..10_u32{
            set.add(i);
        }
        let mut drained = Vec::new();
        while !set.is_empty(){
            drained.push(set.remove_random(&mut rng).unwrap());
        }
        drained.sort_unstable();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert_eq!(set.remove_random(&mut rng), Err(EventSetError::Empty));
    }

    #[test]
    fn choice_is_close_to_uniform(){
        let mut rng = Pcg64::seed_from_u64(1234567);
        let mut set = EventSet::new();
        let k = 5_usize;
        for i in 0..k as u32{
            set.add(i);
        }

        let trials = 100_000;
        let mut counts = vec![0_u32; k];
        for _ in 0..trials{
            let choice = set.choose_uniform(&mut rng).unwrap();
            counts[choice as usize] += 1;
        }

        let expected = trials as f64 / k as f64;
        for count in counts{
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "deviation {} too large", deviation);
        }
    }

    #[test]
    fn swap_remove_keeps_positions_consistent(){
        let mut set = EventSet::new();
        for i in 0..6_u32{
            set.add(i);
        }
        // removing the first member moves the last into its slot
        set.remove(&0).unwrap();
        set.remove(&5).unwrap();
        for i in 1..5_u32{
            assert!(set.contains(&i));
            set.remove(&i).unwrap();
        }
        assert!(set.is_empty());
    }
}
