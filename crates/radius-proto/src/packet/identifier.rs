use std::sync::atomic::{AtomicU8, Ordering};

/// Packet identifier source
///
/// Identifiers are correlation tokens, not secrets: successive allocations
/// count upward and wrap from 255 back to 0. Each client or server owns its
/// own allocator.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    last: AtomicU8,
}

impl IdentifierAllocator {
    /// New allocator whose first identifier is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// New allocator whose first identifier follows `last`
    pub fn starting_after(last: u8) -> Self {
        IdentifierAllocator {
            last: AtomicU8::new(last),
        }
    }

    /// Allocate the next identifier
    pub fn next_identifier(&self) -> u8 {
        self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_at_one() {
        let ids = IdentifierAllocator::new();
        assert_eq!(ids.next_identifier(), 1);
        assert_eq!(ids.next_identifier(), 2);
    }

    #[test]
    fn test_wraps_after_255() {
        let ids = IdentifierAllocator::starting_after(253);
        assert_eq!(ids.next_identifier(), 254);
        assert_eq!(ids.next_identifier(), 255);
        assert_eq!(ids.next_identifier(), 0);
        assert_eq!(ids.next_identifier(), 1);
    }

    #[test]
    fn test_full_cycle_covers_every_value() {
        let ids = IdentifierAllocator::new();
        let mut seen = [false; 256];
        for _ in 0..256 {
            seen[ids.next_identifier() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_concurrent_allocation() {
        let ids = Arc::new(IdentifierAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..64).map(|_| ids.next_identifier()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u8> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 256);
    }
}
