use std::rc::Rc;

use crate::work::Work;

/// Single-slot memo of the last works list.
///
/// Each fetch takes a ticket; only the newest ticket may fill the slot, and
/// `invalidate` retires every outstanding ticket.
#[derive(Debug, Default)]
pub struct WorkCache {
    works: Option<Rc<[Work]>>,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What became of a finished fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was the newest and now fills the slot.
    Stored(Rc<[Work]>),
    /// A newer fetch already filled the slot; its list is returned.
    Cached(Rc<[Work]>),
    /// A newer fetch is still outstanding and the slot is empty.
    Superseded,
}

impl WorkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Rc<[Work]>> {
        self.works.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.works.is_some()
    }

    pub fn store(&mut self, works: Vec<Work>) -> Rc<[Work]> {
        self.generation = self.generation.wrapping_add(1);
        let works: Rc<[Work]> = works.into();
        self.works = Some(works.clone());
        works
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        FetchTicket(self.generation)
    }

    pub fn store_if_current(&mut self, ticket: FetchTicket, works: Vec<Work>) -> Option<Rc<[Work]>> {
        if ticket.0 != self.generation {
            return None;
        }
        let works: Rc<[Work]> = works.into();
        self.works = Some(works.clone());
        Some(works)
    }

    pub fn settle(&mut self, ticket: FetchTicket, works: Vec<Work>) -> FetchOutcome {
        if let Some(stored) = self.store_if_current(ticket, works) {
            return FetchOutcome::Stored(stored);
        }
        match self.get() {
            Some(current) => FetchOutcome::Cached(current),
            None => FetchOutcome::Superseded,
        }
    }

    pub fn invalidate(&mut self) {
        self.works = None;
        self.generation = self.generation.wrapping_add(1);
    }
}
