use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// A discovered cell waiting to be visited. `index` points into the engine's node map and
/// `seq` is the insertion counter used to break priority ties.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrontierEntry {
    pub priority: u64,
    pub cost: u64,
    pub seq: u64,
    pub index: usize,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest priority first, then earliest insertion, which
        // follows neighbour enumeration order
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Frontier {
    Queue(VecDeque<FrontierEntry>),
    Stack(Vec<FrontierEntry>),
    Heap(BinaryHeap<FrontierEntry>),
}

impl Frontier {
    pub fn queue() -> Frontier {
        Frontier::Queue(VecDeque::new())
    }

    pub fn stack() -> Frontier {
        Frontier::Stack(Vec::new())
    }

    pub fn heap() -> Frontier {
        Frontier::Heap(BinaryHeap::new())
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        match self {
            Frontier::Queue(q) => q.push_back(entry),
            Frontier::Stack(s) => s.push(entry),
            Frontier::Heap(h) => h.push(entry),
        }
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match self {
            Frontier::Queue(q) => q.pop_front(),
            Frontier::Stack(s) => s.pop(),
            Frontier::Heap(h) => h.pop(),
        }
    }

    /// Number of entries, including superseded heap entries that will be skipped on pop.
    pub fn len(&self) -> usize {
        match self {
            Frontier::Queue(q) => q.len(),
            Frontier::Stack(s) => s.len(),
            Frontier::Heap(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(priority: u64, seq: u64) -> FrontierEntry {
        FrontierEntry {
            priority,
            cost: 0,
            seq,
            index: seq as usize,
        }
    }

    fn drain(mut frontier: Frontier) -> Vec<usize> {
        std::iter::from_fn(|| frontier.pop().map(|e| e.index)).collect()
    }

    #[test]
    fn queue_and_stack_order() {
        let mut queue = Frontier::queue();
        let mut stack = Frontier::stack();
        for seq in 0..3 {
            queue.push(entry(0, seq));
            stack.push(entry(0, seq));
        }
        assert_eq!(drain(queue), vec![0, 1, 2]);
        assert_eq!(drain(stack), vec![2, 1, 0]);
    }

    #[test]
    fn heap_breaks_ties_by_insertion() {
        let mut heap = Frontier::heap();
        heap.push(entry(5, 0));
        heap.push(entry(3, 1));
        heap.push(entry(5, 2));
        heap.push(entry(3, 3));
        assert_eq!(heap.len(), 4);
        assert_eq!(drain(heap), vec![1, 3, 0, 2]);
    }
}
